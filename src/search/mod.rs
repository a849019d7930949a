//! Greedy descriptor search.
//!
//! A single-solution local search over the [`Atlas`](crate::model::Atlas):
//! each iteration reweights one descriptor effect, then toggles one area
//! membership, keeping each edit only if the aggregate score does not
//! drop. [`Acceptance::Metropolis`] optionally tolerates worsening edits
//! with a temperature-controlled probability.
//!
//! # References
//!
//! - Russell & Norvig, "Artificial Intelligence: A Modern Approach", §4.1 (hill climbing)
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::{Acceptance, SearchConfig};
pub use runner::{SearchResult, SearchRunner};
pub use types::{NullSink, ProgressSample, ProgressSink, SearchState};
