//! Loading areas from the ingestion pipeline's JSON output.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Area;

/// Separator joining nested demographic keys, e.g. `race->white`.
pub const KEY_SEPARATOR: &str = "->";

/// One area as written by the ingestion pipeline.
///
/// `demographics` may nest objects; leaves must be numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaRecord {
    pub name: String,
    pub state: String,
    #[serde(default, alias = "FIPS")]
    pub fips: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    pub demographics: Value,
}

impl AreaRecord {
    /// Converts the record into an [`Area`] with a flattened target.
    pub fn into_area(self) -> Result<Area> {
        let mut target = BTreeMap::new();
        flatten_into(&self.demographics, "", &mut target)
            .map_err(|e| Error::InvalidInput(format!("area {}: {e}", self.name)))?;
        Ok(Area::new(self.name, self.state, target))
    }
}

/// Flattens nested demographic objects into `parent->child` keys.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use u_descriptors::io::flatten_demographics;
///
/// let flat = flatten_demographics(&json!({"race": {"white": 0.7, "black": 0.3}, "urban": 1})).unwrap();
/// assert_eq!(flat["race->white"], 0.7);
/// assert_eq!(flat["urban"], 1.0);
/// ```
pub fn flatten_demographics(value: &Value) -> Result<BTreeMap<String, f64>> {
    let mut out = BTreeMap::new();
    flatten_into(value, "", &mut out).map_err(Error::InvalidInput)?;
    Ok(out)
}

fn flatten_into(
    value: &Value,
    parent: &str,
    out: &mut BTreeMap<String, f64>,
) -> std::result::Result<(), String> {
    let Value::Object(map) = value else {
        return Err(format!("demographics must be an object, got {value}"));
    };
    for (key, child) in map {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}{KEY_SEPARATOR}{key}")
        };
        match child {
            Value::Object(_) => flatten_into(child, &path, out)?,
            Value::Number(n) => {
                let v = n
                    .as_f64()
                    .ok_or_else(|| format!("value for {path} is not representable as f64"))?;
                out.insert(path, v);
            }
            other => return Err(format!("unsupported value for {path}: {other}")),
        }
    }
    Ok(())
}

/// Parses areas from a JSON document.
///
/// Accepts either an object keyed by area id (FIPS) or an array of
/// records. Areas come back in key order for objects, document order for
/// arrays.
pub fn parse_areas(json: &str) -> Result<Vec<Area>> {
    let doc: Value = serde_json::from_str(json)?;
    let records: Vec<AreaRecord> = match doc {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries
                .into_iter()
                .map(|(_, v)| serde_json::from_value::<AreaRecord>(v))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        Value::Array(_) => serde_json::from_value(doc)?,
        _ => {
            return Err(Error::InvalidInput(
                "areas file must hold an object or an array".into(),
            ))
        }
    };

    let areas = records
        .into_iter()
        .map(AreaRecord::into_area)
        .collect::<Result<Vec<_>>>()?;
    for area in &areas {
        let total: f64 = area.target().values().sum();
        if (total - 1.0).abs() > 0.05 {
            warn!(
                "target for {}, {} sums to {total:.4}",
                area.name(),
                area.state()
            );
        }
    }
    Ok(areas)
}

/// Reads areas from a JSON file. See [`parse_areas`].
pub fn load_areas(path: impl AsRef<Path>) -> Result<Vec<Area>> {
    let path = path.as_ref();
    let areas = parse_areas(&fs::read_to_string(path)?)?;
    info!("loaded {} areas from {}", areas.len(), path.display());
    Ok(areas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested() {
        let flat = flatten_demographics(&json!({
            "race": {"white": 0.6, "black": {"african": 0.1, "caribbean": 0.05}},
            "urban": 0.25
        }))
        .unwrap();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat["race->black->african"], 0.1);
        assert_eq!(flat["urban"], 0.25);
    }

    #[test]
    fn test_flatten_rejects_strings() {
        let err = flatten_demographics(&json!({"a": "high"})).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(flatten_demographics(&json!([0.1])).is_err());
    }

    #[test]
    fn test_parse_keyed_object() {
        let areas = parse_areas(
            r#"{
                "01003": {"name": "Baldwin", "state": "AL", "FIPS": "01003", "population": 231767,
                          "demographics": {"white": 0.83, "black": 0.17}},
                "01001": {"name": "Autauga", "state": "AL",
                          "demographics": {"white": 0.75, "black": 0.25}}
            }"#,
        )
        .unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name(), "Autauga");
        assert_eq!(areas[1].target()["white"], 0.83);
    }

    #[test]
    fn test_parse_array() {
        let areas = parse_areas(
            r#"[{"name": "Kent", "state": "DE", "demographics": {"x": 1}}]"#,
        )
        .unwrap();
        assert_eq!(areas[0].state(), "DE");
        assert_eq!(areas[0].target()["x"], 1.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_areas("42"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_areas("{"), Err(Error::Json(_))));
        assert!(parse_areas(r#"[{"name": "x", "demographics": {}}]"#).is_err());
    }

    #[test]
    fn test_load_areas_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.json");
        fs::write(
            &path,
            r#"[{"name": "Sussex", "state": "DE", "demographics": {"white": 1.0}}]"#,
        )
        .unwrap();
        let areas = load_areas(&path).unwrap();
        assert_eq!(areas.len(), 1);

        let missing = load_areas(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
