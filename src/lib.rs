//! Fits additive area descriptors to target demographic distributions.
//!
//! Every area (county) carries a bundle of *descriptors*, each a named
//! vector of additive effects over demographic groups. Summing the effects
//! of an area's descriptors gives its derived distribution; the search
//! tunes effect values and memberships so that derived distributions match
//! externally supplied targets as closely as possible.
//!
//! - **Compare** (`compare`): similarity of two sparse distributions under
//!   L1, L2, cosine, or Jensen-Shannon metrics, normalized to `[0, 1]`.
//! - **Model** (`model`): descriptors, the group catalog, areas, and the
//!   [`Atlas`](model::Atlas) that owns them and caches per-area scores.
//! - **Mutation** (`mutation`): reweight and membership-toggle operators
//!   returning reversible [`Edit`](mutation::Edit)s.
//! - **Search** (`search`): greedy accept/revert loop with optional
//!   Metropolis acceptance, progress sinks, and cancellation.
//! - **IO** (`io`): area JSON loading, CSV progress log, final snapshot.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use u_descriptors::compare::Metric;
//! use u_descriptors::model::{Area, Atlas};
//! use u_descriptors::search::{NullSink, SearchConfig, SearchRunner};
//!
//! let target = BTreeMap::from([("white".to_string(), 0.7), ("black".to_string(), 0.3)]);
//! let areas = vec![Area::new("Autauga", "AL", target)];
//!
//! let config = SearchConfig::default()
//!     .with_max_descriptors(4)
//!     .with_max_iterations(500)
//!     .with_seed(42);
//! let mut atlas = Atlas::initialize(areas, Metric::L1, config.max_descriptors);
//! let result = SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap();
//! assert!(result.final_score >= result.initial_score);
//! ```

pub mod compare;
pub mod error;
pub mod io;
pub mod model;
pub mod mutation;
pub mod search;

pub use error::{Error, Result};
