use crate::{
    entropy::{CpuEntropyCalculator, EntropyCalculator},
    layout::WaveLayout,
    output::OutputSynthesizer,
    propagator::{ConstraintPropagator, CpuConstraintPropagator, PropagationError},
    topology::Topology,
    validation::count_violations,
    wave::Wave,
    ProgressInfo, SolveStats, WfcError, WfcRng,
};
use bitvec::prelude::*;
use forge_rules::{Grid, Model, PatternId, Symbol};
use log::{debug, error, info, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Alias for the complex progress callback function type.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) -> Result<(), WfcError> + Send + Sync>;

/// Restarts allowed before a run gives up, unless configured otherwise.
pub const DEFAULT_MAXIMUM_TRIES: u32 = 5000;

/// Configuration options for the WFC runner.
pub struct SolverConfig {
    /// Seed of the run's generator. A random one is drawn (and logged) when unset.
    pub seed: Option<u64>,
    /// Full re-initializations allowed before giving up.
    pub maximum_tries: u32,
    /// Consecutive snapshot rollbacks allowed before a restart. `0` restarts
    /// on the first contradiction.
    pub max_propagation_tries: u32,
    /// Raised from outside to stop the run with [`WfcError::Interrupted`].
    pub shutdown_signal: Arc<AtomicBool>,
    /// Called after every successful collapse. An error aborts the run.
    pub progress_callback: Option<ProgressCallback>,
}

impl SolverConfig {
    /// Creates a new builder for `SolverConfig`.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: None,
            maximum_tries: DEFAULT_MAXIMUM_TRIES,
            max_propagation_tries: 0,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("seed", &self.seed)
            .field("maximum_tries", &self.maximum_tries)
            .field("max_propagation_tries", &self.max_propagation_tries)
            .field("shutdown_signal", &self.shutdown_signal)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// Builder for `SolverConfig`.
#[derive(Default)]
pub struct SolverConfigBuilder {
    seed: Option<u64>,
    maximum_tries: Option<u32>,
    max_propagation_tries: Option<u32>,
    shutdown_signal: Option<Arc<AtomicBool>>,
    progress_callback: Option<ProgressCallback>,
}

impl SolverConfigBuilder {
    /// Sets the seed for the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how many full restarts are allowed.
    pub fn maximum_tries(mut self, tries: u32) -> Self {
        self.maximum_tries = Some(tries);
        self
    }

    /// Sets how many consecutive rollbacks are allowed before a restart.
    pub fn max_propagation_tries(mut self, tries: u32) -> Self {
        self.max_propagation_tries = Some(tries);
        self
    }

    /// Provides an external shutdown signal.
    /// If not provided, a new signal will be created.
    pub fn shutdown_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(signal);
        self
    }

    /// Sets the progress callback function.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Builds the `SolverConfig`, filling unset options with defaults.
    pub fn build(self) -> SolverConfig {
        SolverConfig {
            seed: self.seed,
            maximum_tries: self.maximum_tries.unwrap_or(DEFAULT_MAXIMUM_TRIES),
            max_propagation_tries: self.max_propagation_tries.unwrap_or(0),
            shutdown_signal: self
                .shutdown_signal
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            progress_callback: self.progress_callback,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The stitched symbol grid.
    pub output: Grid<Symbol>,
    /// Chosen pattern id of every wave cell, boundary cells included.
    pub pattern_ids: Grid<usize>,
    /// Seed the run actually used.
    pub seed: u64,
    /// Counters of the run.
    pub stats: SolveStats,
}

/// Solves `model` into `output_size` cells with the CPU propagator and
/// entropy calculator.
pub fn solve(
    model: &Model,
    output_size: (usize, usize, usize),
    config: &SolverConfig,
) -> Result<Solution, WfcError> {
    solve_with(
        model,
        output_size,
        config,
        Box::new(CpuConstraintPropagator::new()),
        Box::new(CpuEntropyCalculator::new()),
    )
}

/// Runs the observe/collapse/propagate loop until every cell holds a single
/// pattern.
///
/// Every iteration snapshots the wave before collapsing. A contradiction
/// rolls back to that snapshot while fewer than
/// `config.max_propagation_tries` rollbacks happened in a row; past that, or
/// when the boundary itself cannot be propagated, the wave is rebuilt from
/// scratch. The run fails with [`WfcError::NoSolutionFound`] once
/// `config.maximum_tries` restarts are used up.
///
/// A finished wave is checked against the full adjacency index before the
/// output is stitched, so an `Ok` result never contains a disallowed contact.
///
/// # Errors
///
/// * `WfcError::InvalidInput` for a zero output extent, a deep 2D request or
///   `maximum_tries == 0`.
/// * `WfcError::NoSolutionFound` when every restart ended in a contradiction.
/// * `WfcError::Interrupted` when the shutdown signal was raised.
/// * `WfcError::ConstraintViolation` if the finished wave fails validation.
/// * Any error returned by the progress callback.
pub fn solve_with(
    model: &Model,
    output_size: (usize, usize, usize),
    config: &SolverConfig,
    mut propagator: Box<dyn ConstraintPropagator>,
    entropy_calculator: Box<dyn EntropyCalculator>,
) -> Result<Solution, WfcError> {
    if config.maximum_tries == 0 {
        return Err(WfcError::InvalidInput(
            "maximum_tries must be at least 1".to_owned(),
        ));
    }
    let layout = WaveLayout::for_model(model, output_size)?;
    let topology = Topology::new(layout.wave_size(), model.dimensionality());
    let rules = model.adjacency();
    let weights = model.library().weights();

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = WfcRng::seed_from_u64(seed);
    info!(
        "Starting {:?} run: {} patterns, wave {:?}, seed {}",
        model.kind(),
        model.num_patterns(),
        layout.wave_size(),
        seed
    );

    let start_time = Instant::now();
    let total_cells = topology.len();
    let mut stats = SolveStats::default();

    let wave = 'attempt: loop {
        let mut wave = match initialize_wave(
            &layout,
            &topology,
            model,
            propagator.as_mut(),
            entropy_calculator.as_ref(),
            &mut rng,
        ) {
            Ok(wave) => wave,
            Err(WfcError::Propagation(PropagationError::Contradiction(x, y, z))) => {
                warn!("Boundary propagation failed at ({x}, {y}, {z})");
                restart(&mut stats, config)?;
                continue 'attempt;
            }
            Err(e) => return Err(e),
        };
        let mut consecutive_rollbacks = 0u32;

        loop {
            if config.shutdown_signal.load(Ordering::Relaxed) {
                warn!("Shutdown signal received, stopping WFC run prematurely.");
                return Err(WfcError::Interrupted);
            }

            let Some(cell) = entropy_calculator.select_lowest_entropy_cell(wave.entropies())
            else {
                break 'attempt wave;
            };
            stats.iterations += 1;
            let snapshot = wave.clone();

            match collapse_and_propagate(
                &mut wave,
                cell,
                &topology,
                model,
                propagator.as_mut(),
                entropy_calculator.as_ref(),
                &mut rng,
            ) {
                Ok(()) => {
                    consecutive_rollbacks = 0;
                    if let Some(ref callback) = config.progress_callback {
                        callback(ProgressInfo {
                            collapsed_cells: wave.collapsed_count(),
                            total_cells,
                            elapsed_time: start_time.elapsed(),
                            iterations: stats.iterations,
                            restarts: stats.restarts,
                            rollbacks: stats.rollbacks,
                        })?;
                    }
                }
                Err(WfcError::Propagation(PropagationError::Contradiction(x, y, z))) => {
                    if consecutive_rollbacks < config.max_propagation_tries {
                        consecutive_rollbacks += 1;
                        stats.rollbacks += 1;
                        debug!(
                            "Iter {}: contradiction at ({x}, {y}, {z}), rollback {consecutive_rollbacks}",
                            stats.iterations
                        );
                        wave = snapshot;
                        // Fresh noise, so the retry need not pick the same cell.
                        let entropies = entropy_calculator.calculate_entropy(
                            wave.possibilities(),
                            weights,
                            &mut rng,
                        );
                        *wave.entropies_mut() = entropies;
                    } else {
                        debug!(
                            "Iter {}: contradiction at ({x}, {y}, {z}), restarting",
                            stats.iterations
                        );
                        restart(&mut stats, config)?;
                        continue 'attempt;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    };

    let pattern_ids = wave.pattern_ids().ok_or_else(|| {
        WfcError::InternalError("no cell left to observe but the wave is not collapsed".to_owned())
    })?;
    let violations = count_violations(&pattern_ids, rules, &topology);
    if violations > 0 {
        error!("Solved wave breaks {violations} adjacency constraints");
        return Err(WfcError::ConstraintViolation(violations));
    }
    let output = OutputSynthesizer::new(model.library(), &layout).synthesize(&pattern_ids)?;

    stats.elapsed = start_time.elapsed();
    info!(
        "WFC run finished in {:?} after {} iterations ({} restarts, {} rollbacks).",
        stats.elapsed, stats.iterations, stats.restarts, stats.rollbacks
    );
    Ok(Solution {
        output,
        pattern_ids,
        seed,
        stats,
    })
}

/// Counts a restart, failing once the budget is spent.
fn restart(stats: &mut SolveStats, config: &SolverConfig) -> Result<(), WfcError> {
    stats.restarts += 1;
    if stats.restarts >= config.maximum_tries {
        error!("Giving up after {} tries", stats.restarts);
        return Err(WfcError::NoSolutionFound {
            tries: stats.restarts,
        });
    }
    Ok(())
}

/// Builds a fresh wave: every real pattern possible, boundary cells pinned,
/// the whole grid propagated once and entropies computed.
fn initialize_wave(
    layout: &WaveLayout,
    topology: &Topology,
    model: &Model,
    propagator: &mut dyn ConstraintPropagator,
    entropy_calculator: &dyn EntropyCalculator,
    rng: &mut WfcRng,
) -> Result<Wave, WfcError> {
    let rules = model.adjacency();
    let mut initial = bitvec![1; rules.domain_width()];
    initial.set(rules.void_id().0, false);

    let mut wave = Wave::new(layout.wave_size(), &initial);
    for (index, id) in layout.forced_cells() {
        wave.pin(index, id);
    }

    let all_cells: Vec<usize> = (0..wave.len()).collect();
    propagator.propagate(wave.possibilities_mut(), all_cells, rules, topology)?;

    let entropies =
        entropy_calculator.calculate_entropy(wave.possibilities(), model.library().weights(), rng);
    *wave.entropies_mut() = entropies;
    debug!(
        "Initial wave ready: {}/{} cells collapsed",
        wave.collapsed_count(),
        wave.len()
    );
    Ok(wave)
}

/// Draws a pattern for `cell` by weight, then propagates the choice and
/// refreshes the entropy of every narrowed cell.
fn collapse_and_propagate(
    wave: &mut Wave,
    cell: usize,
    topology: &Topology,
    model: &Model,
    propagator: &mut dyn ConstraintPropagator,
    entropy_calculator: &dyn EntropyCalculator,
    rng: &mut WfcRng,
) -> Result<(), WfcError> {
    let library = model.library();
    let candidates: Vec<usize> = wave
        .domain(cell)
        .ok_or_else(|| WfcError::InternalError(format!("selected cell {cell} out of range")))?
        .iter_ones()
        .collect();
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&id| library.weight(PatternId(id)))
        .collect();
    let chosen = candidates[WeightedIndex::new(&weights)?.sample(rng)];
    debug!(
        "Collapsing cell {:?} to pattern {chosen}",
        topology.coords(cell)
    );

    wave.pin(cell, chosen);
    let changed = propagator.propagate(
        wave.possibilities_mut(),
        vec![cell],
        model.adjacency(),
        topology,
    )?;

    for index in changed {
        let entropy = wave
            .domain(index)
            .map(|domain| entropy_calculator.cell_entropy(domain, library.weights(), rng))
            .unwrap_or(0.0);
        if let Some(slot) = wave.entropies_mut().as_mut_slice().get_mut(index) {
            *slot = entropy;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_rules::{Dimensionality, ModelOptions, Tile, TileCatalogue};
    use std::sync::Mutex;

    fn checkerboard() -> Model {
        let exemplar = Grid::from_rows(&[
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 1],
            vec![1, 0, 1, 0],
        ])
        .unwrap();
        Model::overlapping(&exemplar, 2, &ModelOptions::default()).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let config = SolverConfig::builder().seed(3).build();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.maximum_tries, DEFAULT_MAXIMUM_TRIES);
        assert_eq!(config.max_propagation_tries, 0);
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn test_run_success() {
        let model = checkerboard();
        let config = SolverConfig::builder().seed(11).build();
        let solution = solve(&model, (3, 3, 1), &config).unwrap();
        assert_eq!(solution.output.dimensions(), (4, 4, 1));
        assert_eq!(solution.seed, 11);
        for y in 0..4 {
            for x in 1..4 {
                assert_ne!(solution.output[(x, y, 0)], solution.output[(x - 1, y, 0)]);
            }
        }
    }

    #[test]
    fn test_progress_callback_sees_every_collapse() {
        let model = checkerboard();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = SolverConfig::builder()
            .seed(5)
            .progress_callback(Box::new(move |info| {
                sink.lock().unwrap().push(info.collapsed_cells);
                Ok(())
            }))
            .build();
        let solution = solve(&model, (3, 3, 1), &config).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len() as u64, solution.stats.iterations);
        assert_eq!(seen.last().copied(), Some(9));
    }

    #[test]
    fn test_callback_error_stops_run() {
        let model = checkerboard();
        let config = SolverConfig::builder()
            .seed(1)
            .progress_callback(Box::new(|_| Err(WfcError::Interrupted)))
            .build();
        assert!(matches!(
            solve(&model, (3, 3, 1), &config),
            Err(WfcError::Interrupted)
        ));
    }

    #[test]
    fn test_unsatisfiable_catalogue_exhausts_tries() {
        let mut catalogue = TileCatalogue::new(1, Dimensionality::Two);
        catalogue.push(Tile::new("loner", Grid::filled(1, 1, 1, 7), 1));
        let model = Model::from_tiles(catalogue).unwrap();
        let config = SolverConfig::builder().seed(0).maximum_tries(3).build();
        assert!(matches!(
            solve(&model, (2, 1, 1), &config),
            Err(WfcError::NoSolutionFound { tries: 3 })
        ));
    }

    #[test]
    fn test_zero_tries_rejected() {
        let model = checkerboard();
        let config = SolverConfig::builder().maximum_tries(0).build();
        assert!(matches!(
            solve(&model, (2, 2, 1), &config),
            Err(WfcError::InvalidInput(_))
        ));
    }
}
