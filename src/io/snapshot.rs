//! Final dump of area memberships and descriptor effects.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Atlas;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub name: String,
    pub state: String,
    pub descriptors: Vec<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSnapshot {
    pub name: String,
    pub fixed: bool,
    /// Nonzero effects only.
    pub effects: BTreeMap<String, f64>,
}

/// The state of an [`Atlas`] at the end of a run.
///
/// The text form has one line per area, then one per descriptor:
///
/// ```text
/// Autauga, AL: [Nation, AL, Descriptor 12]
/// Nation: {black: 0.21, white: 0.68}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub aggregate_score: f64,
    pub areas: Vec<AreaSnapshot>,
    pub descriptors: Vec<DescriptorSnapshot>,
}

impl Snapshot {
    pub fn capture(atlas: &Atlas) -> Self {
        let registry = atlas.registry();
        let areas = atlas
            .areas()
            .iter()
            .map(|area| AreaSnapshot {
                name: area.name().to_string(),
                state: area.state().to_string(),
                descriptors: area
                    .descriptors()
                    .iter()
                    .map(|&id| registry.get(id).name().to_string())
                    .collect(),
                score: area.score(),
            })
            .collect();
        let descriptors = registry
            .iter()
            .map(|(_, d)| DescriptorSnapshot {
                name: d.name().to_string(),
                fixed: d.is_fixed(),
                effects: d
                    .nonzero_effects()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            })
            .collect();
        Self {
            aggregate_score: atlas.aggregate_score(),
            areas,
            descriptors,
        }
    }

    /// Writes the text form to `path`.
    pub fn write_text(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Writes the JSON form to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for area in &self.areas {
            writeln!(
                f,
                "{}, {}: [{}]",
                area.name,
                area.state,
                area.descriptors.join(", ")
            )?;
        }
        for descriptor in &self.descriptors {
            let effects: Vec<String> = descriptor
                .effects
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            writeln!(f, "{}: {{{}}}", descriptor.name, effects.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Metric;
    use crate::model::Area;
    use crate::mutation::{reweight, Edit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn atlas() -> Atlas {
        let target = BTreeMap::from([("white".to_string(), 0.75), ("black".to_string(), 0.25)]);
        let areas = vec![
            Area::new("Autauga", "AL", target.clone()),
            Area::new("Kent", "DE", target),
        ];
        Atlas::initialize(areas, Metric::L1, 4)
    }

    #[test]
    fn test_text_form() {
        let snapshot = Snapshot::capture(&atlas());
        assert_eq!(
            snapshot.to_string(),
            "Autauga, AL: [Nation, AL]\n\
             Kent, DE: [Nation, DE]\n\
             Nation: {}\n\
             AL: {}\n\
             DE: {}\n\
             Descriptor 3: {}\n"
        );
    }

    #[test]
    fn test_effects_are_nonzero_only() {
        let mut atlas = atlas();
        let mut rng = StdRng::seed_from_u64(4);
        loop {
            if let Some(Edit::Reweight { after, .. }) = reweight(&mut atlas, 0.5, true, &mut rng) {
                if after > 0.0 {
                    break;
                }
            }
        }
        let snapshot = Snapshot::capture(&atlas);
        let total: usize = snapshot.descriptors.iter().map(|d| d.effects.len()).sum();
        assert_eq!(total, 1);
        assert!(snapshot
            .descriptors
            .iter()
            .flat_map(|d| d.effects.values())
            .all(|&v| v != 0.0));
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::capture(&atlas());

        let text = dir.path().join("log.out");
        snapshot.write_text(&text).unwrap();
        assert!(fs::read_to_string(&text).unwrap().starts_with("Autauga, AL: "));

        let json = dir.path().join("snapshot.json");
        snapshot.write_json(&json).unwrap();
        let back: Snapshot = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(back, snapshot);
    }
}
