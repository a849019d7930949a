//! Search execution loop.
//!
//! # Algorithm
//!
//! Each iteration applies the two operators in turn. After each one:
//!
//! 1. Recompute the aggregate score.
//! 2. If an edit was made and the score dropped below the last accepted
//!    score (and the acceptance rule does not tolerate it), undo the edit.
//! 3. Otherwise commit: the new score becomes the accepted score and a
//!    progress sample is recorded.
//!
//! The loop stops only when cancelled or when `max_iterations` is reached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{Acceptance, SearchConfig};
use super::types::{ProgressSample, ProgressSink, SearchState};
use crate::error::Result;
use crate::model::Atlas;
use crate::mutation::{reweight, toggle_membership, Operator};

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Completed iterations (each applies both operators).
    pub iterations: usize,

    /// Edits kept.
    pub accepted: usize,

    /// Edits reverted.
    pub rejected: usize,

    /// Operator applications that produced no edit.
    pub skipped: usize,

    /// Aggregate score before the first mutation.
    pub initial_score: f64,

    /// Last accepted aggregate score.
    pub final_score: f64,

    /// Always [`SearchState::Stopped`] once the runner returns.
    pub state: SearchState,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Wall-clock duration of the run in seconds.
    pub elapsed_seconds: f64,

    /// Accepted score sampled every `history_interval` iterations.
    pub score_history: Vec<f64>,
}

/// Executes the descriptor search.
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search until `config.max_iterations` is reached.
    ///
    /// With `max_iterations == 0` this never returns; use
    /// [`run_with_cancel`](Self::run_with_cancel) instead.
    pub fn run<S: ProgressSink>(
        atlas: &mut Atlas,
        config: &SearchConfig,
        sink: &mut S,
    ) -> Result<SearchResult> {
        Self::run_with_cancel(atlas, config, sink, None)
    }

    /// Runs the search with an optional cancellation flag.
    ///
    /// Setting the flag is the external interruption: the loop finishes the
    /// operator step in progress, then stops at the next iteration boundary
    /// with every rejected edit already reverted.
    pub fn run_with_cancel<S: ProgressSink>(
        atlas: &mut Atlas,
        config: &SearchConfig,
        sink: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        atlas.set_parallel(config.parallel);
        if atlas.metric() != config.metric {
            atlas.set_metric(config.metric);
        }

        let start = Instant::now();
        let initial_score = atlas.aggregate_score();
        let mut previous = initial_score;

        let mut state = SearchState::Running;
        let mut iterations = 0usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;
        let mut skipped = 0usize;
        let mut cancelled = false;

        let mut score_history = vec![initial_score];

        info!(
            "search started: {} areas, {} descriptors, metric {}, score {:.6}",
            atlas.areas().len(),
            atlas.registry().len(),
            config.metric,
            initial_score
        );

        while state == SearchState::Running {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    state = SearchState::Stopped;
                    break;
                }
            }
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                state = SearchState::Stopped;
                break;
            }

            for op in Operator::ALL {
                let edit = match op {
                    Operator::Reweight => reweight(
                        atlas,
                        config.max_perturbation,
                        config.reweight_fixed,
                        &mut rng,
                    ),
                    Operator::Membership => toggle_membership(atlas, &mut rng),
                };
                let score = atlas.aggregate_score();

                match edit {
                    Some(edit) if !accept(config, previous, score, &mut rng) => {
                        edit.undo(atlas);
                        rejected += 1;
                        trace!("{iterations} {} rejected {score}", op.tag());
                    }
                    edit => {
                        if edit.is_some() {
                            accepted += 1;
                        } else {
                            skipped += 1;
                        }
                        previous = score;
                        sink.record(ProgressSample {
                            elapsed_seconds: start.elapsed().as_secs_f64(),
                            score,
                        })?;
                        debug!("{iterations} {} {score}", op.tag());
                    }
                }
            }

            iterations += 1;
            if iterations % config.history_interval == 0 {
                score_history.push(previous);
            }
        }

        if score_history.last() != Some(&previous) {
            score_history.push(previous);
        }

        let elapsed_seconds = start.elapsed().as_secs_f64();
        info!(
            "search stopped after {iterations} iterations ({accepted} accepted, {rejected} rejected, {skipped} skipped), score {initial_score:.6} -> {previous:.6}{}",
            if cancelled { ", cancelled" } else { "" }
        );

        Ok(SearchResult {
            iterations,
            accepted,
            rejected,
            skipped,
            initial_score,
            final_score: previous,
            state,
            cancelled,
            elapsed_seconds,
            score_history,
        })
    }
}

/// Whether to keep an edit that moved the aggregate from `previous` to
/// `candidate`. Ties are kept.
fn accept<R: Rng>(config: &SearchConfig, previous: f64, candidate: f64, rng: &mut R) -> bool {
    if candidate >= previous {
        return true;
    }
    match config.acceptance {
        Acceptance::Greedy => false,
        Acceptance::Metropolis => {
            let probability = (-(previous - candidate) / config.temperature).exp();
            rng.random_range(0.0..1.0) < probability
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Metric;
    use crate::error::Error;
    use crate::model::Area;
    use crate::search::NullSink;
    use std::collections::BTreeMap;

    fn area(name: &str, state: &str, pairs: &[(&str, f64)]) -> Area {
        let target: BTreeMap<String, f64> =
            pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect();
        Area::new(name, state, target)
    }

    fn atlas(max_descriptors: usize) -> Atlas {
        let areas = vec![
            area("Autauga", "AL", &[("white", 0.7), ("black", 0.25), ("asian", 0.05)]),
            area("Baldwin", "AL", &[("white", 0.8), ("black", 0.15), ("asian", 0.05)]),
            area("Barbour", "AL", &[("white", 0.45), ("black", 0.5), ("asian", 0.05)]),
            area("Kent", "DE", &[("white", 0.6), ("black", 0.3), ("asian", 0.1)]),
            area("Sussex", "DE", &[("white", 0.75), ("black", 0.15), ("asian", 0.1)]),
        ];
        Atlas::initialize(areas, Metric::L1, max_descriptors)
    }

    #[test]
    fn test_search_improves_score() {
        let mut atlas = atlas(12);
        let config = SearchConfig::default()
            .with_max_iterations(2000)
            .with_seed(42);
        let result = SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap();

        assert_eq!(result.iterations, 2000);
        assert_eq!(result.state, SearchState::Stopped);
        assert!(!result.cancelled);
        assert_eq!(result.initial_score, 0.0);
        assert!(
            result.final_score > 0.7,
            "expected a good fit, got {}",
            result.final_score
        );
        assert_eq!(result.accepted + result.rejected + result.skipped, 4000);
        assert!((atlas.aggregate_score() - result.final_score).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_progress_is_monotonic() {
        let mut atlas = atlas(10);
        let config = SearchConfig::default()
            .with_max_iterations(1000)
            .with_seed(7);
        let mut samples: Vec<ProgressSample> = Vec::new();
        let result = SearchRunner::run(&mut atlas, &config, &mut samples).unwrap();

        assert_eq!(samples.len(), result.accepted + result.skipped);
        for window in samples.windows(2) {
            assert!(
                window[1].score >= window[0].score,
                "accepted score decreased: {} -> {}",
                window[0].score,
                window[1].score
            );
            assert!(window[1].elapsed_seconds >= window[0].elapsed_seconds);
        }
        for window in result.score_history.windows(2) {
            assert!(window[1] >= window[0]);
        }
    }

    #[test]
    fn test_rejected_edits_are_reverted() {
        let mut atlas = atlas(10);
        let config = SearchConfig::default()
            .with_max_iterations(500)
            .with_seed(3);
        let result = SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap();
        assert!(result.rejected > 0);

        // The cached scores must agree with a full rescore of the final state.
        let cached: Vec<f64> = atlas.areas().iter().map(Area::score).collect();
        atlas.rescore_all();
        let fresh: Vec<f64> = atlas.areas().iter().map(Area::score).collect();
        assert_eq!(cached, fresh);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = SearchConfig::default()
            .with_max_iterations(300)
            .with_seed(99);
        let mut a = atlas(8);
        let mut b = atlas(8);
        let ra = SearchRunner::run(&mut a, &config, &mut NullSink).unwrap();
        let rb = SearchRunner::run(&mut b, &config, &mut NullSink).unwrap();
        assert_eq!(ra.final_score.to_bits(), rb.final_score.to_bits());
        assert_eq!(ra.accepted, rb.accepted);
    }

    #[test]
    fn test_cancellation() {
        let mut atlas = atlas(8);
        let config = SearchConfig::default().with_seed(42);

        // Set before running so cancellation is deterministic with an
        // unbounded iteration budget.
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            SearchRunner::run_with_cancel(&mut atlas, &config, &mut NullSink, Some(cancel))
                .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.state, SearchState::Stopped);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_no_tunable_descriptors_skips_membership() {
        let mut atlas = atlas(1);
        let config = SearchConfig::default()
            .with_max_iterations(50)
            .with_seed(1);
        let result = SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap();
        assert_eq!(result.skipped, 50);
        assert_eq!(result.accepted + result.rejected, 50);
    }

    #[test]
    fn test_no_areas() {
        let mut atlas = Atlas::initialize(Vec::new(), Metric::L1, 4);
        let config = SearchConfig::default()
            .with_max_iterations(10)
            .with_seed(1);
        let mut samples: Vec<ProgressSample> = Vec::new();
        let result = SearchRunner::run(&mut atlas, &config, &mut samples).unwrap();
        assert_eq!(result.final_score, 0.0);
        // No groups means no effects to reweight and no areas to toggle, yet
        // every skipped step is still logged.
        assert_eq!(result.skipped, 20);
        assert_eq!(samples.len(), 20);
    }

    #[test]
    fn test_metric_from_config_applied() {
        let mut atlas = atlas(6);
        let config = SearchConfig::default()
            .with_metric(Metric::JensenShannon)
            .with_max_iterations(10)
            .with_seed(5);
        SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap();
        assert_eq!(atlas.metric(), Metric::JensenShannon);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut atlas = atlas(6);
        let config = SearchConfig::default()
            .with_max_perturbation(-1.0)
            .with_max_iterations(10);
        let err = SearchRunner::run(&mut atlas, &config, &mut NullSink).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_metropolis_accepts_downhill() {
        let mut atlas = atlas(10);
        let config = SearchConfig::default()
            .with_acceptance(Acceptance::Metropolis)
            .with_temperature(1e6)
            .with_max_iterations(500)
            .with_seed(42);
        let mut samples: Vec<ProgressSample> = Vec::new();
        let result = SearchRunner::run(&mut atlas, &config, &mut samples).unwrap();

        // At extreme temperature nearly every worsening edit is kept.
        assert!(result.rejected < 10, "rejected {}", result.rejected);
        assert!(samples.windows(2).any(|w| w[1].score < w[0].score));
    }

    #[test]
    fn test_accept_rule() {
        let mut rng = StdRng::seed_from_u64(0);
        let greedy = SearchConfig::default();
        assert!(accept(&greedy, 0.5, 0.5, &mut rng));
        assert!(accept(&greedy, 0.5, 0.6, &mut rng));
        assert!(!accept(&greedy, 0.5, 0.4999, &mut rng));
    }
}
