//! The owned repository of areas and descriptors.

use log::{info, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::area::Area;
use super::descriptor::{Descriptor, DescriptorId};
use super::registry::Registry;
use crate::compare::Metric;

/// Name of the fixed descriptor attached to every area.
pub const NATION: &str = "Nation";

/// All areas together with the descriptor registry they draw on.
///
/// Every component that reads or mutates the model receives the `Atlas`
/// explicitly; there is no ambient global state.
#[derive(Debug, Clone)]
pub struct Atlas {
    registry: Registry,
    areas: Vec<Area>,
    metric: Metric,
    parallel: bool,
}

impl Atlas {
    /// Builds an atlas from an existing registry and areas and scores every
    /// area under `metric`.
    pub fn from_parts(registry: Registry, areas: Vec<Area>, metric: Metric) -> Self {
        let mut atlas = Self {
            registry,
            areas,
            metric,
            parallel: false,
        };
        atlas.rescore_all();
        atlas
    }

    /// Creates the starting configuration for a search.
    ///
    /// 1. Registers every group named by any area's target.
    /// 2. Creates the fixed nation descriptor and attaches it everywhere.
    /// 3. Creates one fixed descriptor per distinct state and attaches it
    ///    to that state's areas.
    /// 4. Scores every area.
    /// 5. Adds blank tunable descriptors until the registry holds
    ///    `max_descriptors` (fixed ones included).
    pub fn initialize(areas: Vec<Area>, metric: Metric, max_descriptors: usize) -> Self {
        let mut registry = Registry::new();
        for area in &areas {
            registry.add_groups(area.target().keys());
        }

        let mut areas = areas;
        let nation = registry.insert(Descriptor::fixed(NATION));
        for area in &mut areas {
            area.attach(nation);
            let state = registry.insert(Descriptor::fixed(area.state()));
            area.attach(state);
        }
        let fixed_count = registry.len();

        let mut atlas = Self::from_parts(registry, areas, metric);

        let mut next = atlas.registry.len();
        while atlas.registry.len() < max_descriptors {
            let name = format!("Descriptor {next}");
            next += 1;
            if atlas.registry.find(&name).is_some() {
                continue;
            }
            atlas.registry.insert(Descriptor::new(name));
        }

        info!(
            "initialized {} areas, {} groups, {} descriptors ({} fixed), score {:.6}",
            atlas.areas.len(),
            atlas.registry.groups().len(),
            atlas.registry.len(),
            fixed_count,
            atlas.aggregate_score()
        );
        atlas
    }

    /// Enables rayon-parallel rescoring (requires the `parallel` feature;
    /// ignored otherwise).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub(crate) fn area_mut(&mut self, index: usize) -> &mut Area {
        &mut self.areas[index]
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Switches the comparison metric and rescores every area.
    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
        self.rescore_all();
    }

    /// Rescores one area and returns its new score.
    pub fn score_area(&mut self, index: usize) -> f64 {
        let Self {
            registry,
            areas,
            metric,
            ..
        } = self;
        areas[index].rescore(registry, *metric)
    }

    /// Rescores every area that has `id` attached. Returns how many were
    /// rescored.
    pub fn rescore_where_attached(&mut self, id: DescriptorId) -> usize {
        let Self {
            registry,
            areas,
            metric,
            parallel,
        } = self;
        let registry: &Registry = registry;
        let metric = *metric;
        let affected = areas.iter().filter(|a| a.has(id)).count();
        for_each_area(areas, *parallel, |area| {
            if area.has(id) {
                area.rescore(registry, metric);
            }
        });
        trace!("rescored {affected} areas holding descriptor {}", id.index());
        affected
    }

    /// Rescores every area.
    pub fn rescore_all(&mut self) {
        let Self {
            registry,
            areas,
            metric,
            parallel,
        } = self;
        let registry: &Registry = registry;
        let metric = *metric;
        for_each_area(areas, *parallel, |area| {
            area.rescore(registry, metric);
        });
    }

    /// Mean of the cached per-area scores; 0.0 with no areas.
    pub fn aggregate_score(&self) -> f64 {
        if self.areas.is_empty() {
            return 0.0;
        }
        self.areas.iter().map(Area::score).sum::<f64>() / self.areas.len() as f64
    }
}

#[cfg(feature = "parallel")]
fn for_each_area<F>(areas: &mut [Area], parallel: bool, f: F)
where
    F: Fn(&mut Area) + Send + Sync,
{
    if parallel {
        areas.par_iter_mut().for_each(f);
    } else {
        areas.iter_mut().for_each(f);
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_area<F>(areas: &mut [Area], _parallel: bool, f: F)
where
    F: Fn(&mut Area),
{
    areas.iter_mut().for_each(f);
}
