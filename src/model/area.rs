//! Areas (counties) and their derived distributions.

use std::collections::BTreeMap;

use super::descriptor::DescriptorId;
use super::registry::Registry;
use crate::compare::{compare, Metric};

/// A geographic unit with a target distribution and attached descriptors.
#[derive(Debug, Clone)]
pub struct Area {
    name: String,
    state: String,
    target: BTreeMap<String, f64>,
    descriptors: Vec<DescriptorId>,
    score: f64,
}

impl Area {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        target: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            target,
            descriptors: Vec::new(),
            score: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn target(&self) -> &BTreeMap<String, f64> {
        &self.target
    }

    /// Attached descriptors in attachment order.
    pub fn descriptors(&self) -> &[DescriptorId] {
        &self.descriptors
    }

    /// Cached similarity score from the last rescoring.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn has(&self, id: DescriptorId) -> bool {
        self.descriptors.contains(&id)
    }

    /// Appends `id` unless already attached. Returns whether it was added.
    pub fn attach(&mut self, id: DescriptorId) -> bool {
        if self.has(id) {
            return false;
        }
        self.descriptors.push(id);
        true
    }

    /// Inserts `id` at `position` (clamped to the end) unless already attached.
    pub(crate) fn attach_at(&mut self, id: DescriptorId, position: usize) -> bool {
        if self.has(id) {
            return false;
        }
        let position = position.min(self.descriptors.len());
        self.descriptors.insert(position, id);
        true
    }

    /// Removes `id`, returning the position it occupied.
    pub fn detach(&mut self, id: DescriptorId) -> Option<usize> {
        let position = self.descriptors.iter().position(|&d| d == id)?;
        self.descriptors.remove(position);
        Some(position)
    }

    /// Sum of the attached descriptors' effects for every known group.
    ///
    /// Not normalized or clamped; the comparator normalizes.
    pub fn derived(&self, registry: &Registry) -> BTreeMap<String, f64> {
        registry
            .groups()
            .iter()
            .map(|group| {
                let total = self
                    .descriptors
                    .iter()
                    .map(|&id| registry.get(id).effect_on(group))
                    .sum();
                (group.clone(), total)
            })
            .collect()
    }

    /// Recomputes and caches the score against the derived distribution.
    pub fn rescore(&mut self, registry: &Registry, metric: Metric) -> f64 {
        self.score = compare(&self.target, &self.derived(registry), metric);
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Descriptor;

    fn target(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_derived_sums_attached_effects() {
        let mut registry = Registry::new();
        let nation = registry.insert(Descriptor::fixed("Nation").with_effect("white", 0.5));
        let state = registry.insert(Descriptor::fixed("AL").with_effect("white", -0.25));
        let county = registry.insert(Descriptor::new("d").with_effect("white", 0.125));

        let mut area = Area::new("Autauga", "AL", target(&[("white", 0.375)]));
        area.attach(nation);
        area.attach(state);
        area.attach(county);

        let derived = area.derived(&registry);
        assert!((derived["white"] - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_derived_covers_every_known_group() {
        let mut registry = Registry::new();
        registry.add_groups(["a", "b", "c"]);
        let area = Area::new("x", "y", target(&[("a", 1.0)]));
        let derived = area.derived(&registry);
        assert_eq!(derived.len(), 3);
        assert!(derived.values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_attach_detach_preserves_order() {
        let mut area = Area::new("x", "y", BTreeMap::new());
        for i in 0..4 {
            assert!(area.attach(DescriptorId(i)));
        }
        assert!(!area.attach(DescriptorId(2)));
        assert_eq!(area.detach(DescriptorId(1)), Some(1));
        assert_eq!(area.detach(DescriptorId(1)), None);
        assert!(area.attach_at(DescriptorId(1), 1));
        assert_eq!(
            area.descriptors(),
            &[DescriptorId(0), DescriptorId(1), DescriptorId(2), DescriptorId(3)]
        );
    }

    #[test]
    fn test_rescore_caches() {
        let mut registry = Registry::new();
        let d = registry.insert(Descriptor::new("d").with_effect("A", 1.0));
        let mut area = Area::new("x", "y", target(&[("A", 0.5), ("B", 0.5)]));
        assert_eq!(area.rescore(&registry, Metric::L1), 0.0);
        area.attach(d);
        let score = area.rescore(&registry, Metric::L1);
        assert!((score - 0.5).abs() < 1e-12);
        assert_eq!(area.score(), score);
    }
}
