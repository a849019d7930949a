//! Descriptors: named additive effect vectors over demographic groups.

use std::collections::BTreeMap;
use std::fmt;

/// Stable handle to a descriptor, assigned when it enters a [`Registry`].
///
/// [`Registry`]: super::Registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorId(pub(crate) usize);

impl DescriptorId {
    /// Position of the descriptor in its registry.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named, additive effect vector over demographic groups.
///
/// Summing the effects of every descriptor attached to an area yields the
/// area's derived distribution. A group with no entry has effect 0.0.
///
/// `fixed` descriptors stand for structural facts (the nation, a state):
/// their area membership never changes during search.
///
/// Equality is by name and effects; the `fixed` flag does not participate.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    effects: BTreeMap<String, f64>,
    fixed: bool,
}

impl Descriptor {
    /// Creates a tunable descriptor with no effects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effects: BTreeMap::new(),
            fixed: false,
        }
    }

    /// Creates a descriptor whose membership is fixed.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            fixed: true,
            ..Self::new(name)
        }
    }

    /// Sets an initial effect.
    pub fn with_effect(mut self, group: impl Into<String>, value: f64) -> Self {
        self.effects.insert(group.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn effects(&self) -> &BTreeMap<String, f64> {
        &self.effects
    }

    /// Effect on `group`, 0.0 when unset.
    pub fn effect_on(&self, group: &str) -> f64 {
        self.effects.get(group).copied().unwrap_or(0.0)
    }

    /// Overwrites the effect on `group`, returning the previous value.
    pub fn set_effect(&mut self, group: &str, value: f64) -> f64 {
        match self.effects.get_mut(group) {
            Some(slot) => std::mem::replace(slot, value),
            None => {
                self.effects.insert(group.to_string(), value);
                0.0
            }
        }
    }

    /// Effects whose value is not zero.
    pub fn nonzero_effects(&self) -> impl Iterator<Item = (&str, f64)> {
        self.effects
            .iter()
            .filter(|(_, &v)| v != 0.0)
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Adds a 0.0 entry for every group in `groups` not already present.
    pub(crate) fn fill_effects<'a>(&mut self, groups: impl IntoIterator<Item = &'a String>) {
        for group in groups {
            self.effects.entry(group.clone()).or_insert(0.0);
        }
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.effects == other.effects
    }
}

impl fmt::Display for Descriptor {
    /// `name: {group: value, ...}` listing only nonzero effects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {{", self.name)?;
        for (i, (group, value)) in self.nonzero_effects().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{group}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_effect_is_zero() {
        let d = Descriptor::new("rural").with_effect("white", 0.25);
        assert_eq!(d.effect_on("white"), 0.25);
        assert_eq!(d.effect_on("urban"), 0.0);
    }

    #[test]
    fn test_set_effect_returns_previous() {
        let mut d = Descriptor::new("d");
        assert_eq!(d.set_effect("a", 0.5), 0.0);
        assert_eq!(d.set_effect("a", 0.75), 0.5);
        assert_eq!(d.effect_on("a"), 0.75);
    }

    #[test]
    fn test_equality_ignores_fixed_flag() {
        assert_eq!(Descriptor::new("AL"), Descriptor::fixed("AL"));
        assert_ne!(
            Descriptor::new("AL"),
            Descriptor::new("AL").with_effect("x", 0.1)
        );
    }

    #[test]
    fn test_display_lists_nonzero_only() {
        let mut d = Descriptor::fixed("Nation")
            .with_effect("black", 0.125)
            .with_effect("white", 0.5);
        d.fill_effects(&["asian".to_string()]);
        assert_eq!(d.effects().len(), 3);
        assert_eq!(d.to_string(), "Nation: {black: 0.125, white: 0.5}");
    }
}
