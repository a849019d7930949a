//! Descriptor and demographic-group catalogs.

use super::descriptor::{Descriptor, DescriptorId};

/// Owns every descriptor and the list of known demographic-group names.
///
/// Both catalogs are append-only. Every descriptor carries an explicit
/// entry (0.0 by default) for every known group, so a newly seen group is
/// filled into all existing descriptors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
    groups: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers demographic-group names, ignoring ones already known.
    ///
    /// Returns the number of new groups added.
    pub fn add_groups<I, S>(&mut self, groups: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.groups.len();
        for group in groups {
            let group = group.as_ref();
            if !self.groups.iter().any(|g| g == group) {
                self.groups.push(group.to_string());
            }
        }
        let added = self.groups.len() - before;
        if added > 0 {
            let new_groups = &self.groups[before..];
            for descriptor in &mut self.descriptors {
                descriptor.fill_effects(new_groups);
            }
        }
        added
    }

    /// Inserts a descriptor, returning its id.
    ///
    /// A descriptor equal (same name and effects, after filling in known
    /// groups) to one already registered is not inserted again; the
    /// existing id is returned instead.
    pub fn insert(&mut self, mut descriptor: Descriptor) -> DescriptorId {
        let introduced: Vec<String> = descriptor
            .effects()
            .keys()
            .filter(|k| !self.groups.contains(k))
            .cloned()
            .collect();
        self.add_groups(&introduced);
        descriptor.fill_effects(&self.groups);

        if let Some(pos) = self.descriptors.iter().position(|d| *d == descriptor) {
            return DescriptorId(pos);
        }
        self.descriptors.push(descriptor);
        DescriptorId(self.descriptors.len() - 1)
    }

    pub fn get(&self, id: DescriptorId) -> &Descriptor {
        &self.descriptors[id.0]
    }

    pub fn get_mut(&mut self, id: DescriptorId) -> &mut Descriptor {
        &mut self.descriptors[id.0]
    }

    /// Finds a descriptor id by name.
    pub fn find(&self, name: &str) -> Option<DescriptorId> {
        self.descriptors
            .iter()
            .position(|d| d.name() == name)
            .map(DescriptorId)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &Descriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (DescriptorId(i), d))
    }

    /// Ids of descriptors whose membership may change.
    pub fn tunable_ids(&self) -> Vec<DescriptorId> {
        self.iter()
            .filter(|(_, d)| !d.is_fixed())
            .map(|(id, _)| id)
            .collect()
    }
}
