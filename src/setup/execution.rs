//! Builds the model, runs the solver on a worker thread and saves the output.

use crate::{
    config::{AppConfig, SolverSettings},
    error::AppError,
    io,
    progress::{ConsoleProgressReporter, ProgressReporter},
};
use forge_core::{solve, ProgressCallback, ProgressInfo, Solution, SolverConfig, WfcError};
use forge_rules::{build_model, build_model_from_tiles, loader::load_from_file, Model, ModelOptions};
use log::{error, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
        Arc, Mutex,
    },
    thread,
};

type SharedReporter = Arc<Mutex<dyn ProgressReporter>>;

/// Builds the model selected by the input flags.
pub fn load_model(config: &AppConfig, settings: &SolverSettings) -> Result<Model, AppError> {
    if let Some(path) = &config.exemplar {
        info!("Loading exemplar from: {}", path.display());
        let exemplar = io::read_grid(path)?;
        let options = ModelOptions {
            rotation: settings.rotation,
            symmetry: settings.symmetry,
            avoid_empty_pattern: settings.avoid_empty_pattern,
        };
        return Ok(build_model(&exemplar, settings.pattern_size, &options)?);
    }
    if let Some(path) = &config.tiles {
        info!("Loading tile catalogue from: {}", path.display());
        let catalogue = load_from_file(path)?;
        return Ok(build_model_from_tiles(catalogue)?);
    }
    Err(AppError::Config(
        "either --exemplar or --tiles is required".to_owned(),
    ))
}

fn progress_callback(reporter: SharedReporter) -> ProgressCallback {
    Box::new(move |info: ProgressInfo| {
        let mut guard = reporter
            .lock()
            .map_err(|_| WfcError::InternalError("Progress reporter mutex poisoned".to_owned()))?;
        guard
            .report(&info)
            .map_err(|e| WfcError::InternalError(format!("Progress reporting failed: {e}")))
    })
}

/// Runs one generation request end to end.
///
/// The solve happens on a dedicated thread. With `--time-limit` the calling
/// thread waits at most that long for it and then raises the shutdown flag,
/// which the solver honors at its next iteration.
pub fn run(config: &AppConfig) -> Result<Solution, AppError> {
    let settings = config.solver_settings()?;
    let model = load_model(config, &settings)?;
    let output_size = settings.output_size();

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let reporter: Option<SharedReporter> = config.report_progress_interval.map(|interval| {
        Arc::new(Mutex::new(ConsoleProgressReporter::new(interval))) as SharedReporter
    });

    let mut builder = SolverConfig::builder()
        .maximum_tries(settings.maximum_tries)
        .max_propagation_tries(settings.max_propagation_tries)
        .shutdown_signal(Arc::clone(&shutdown_signal));
    if let Some(seed) = settings.seed {
        builder = builder.seed(seed);
    }
    if let Some(reporter) = &reporter {
        builder = builder.progress_callback(progress_callback(Arc::clone(reporter)));
    }
    let solver_config = builder.build();

    info!(
        "Solving {:?} model into {}x{}x{} cells...",
        model.kind(),
        output_size.0,
        output_size.1,
        output_size.2
    );
    let (done_tx, done_rx) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("wfc-solver".to_owned())
        .spawn(move || {
            let result = solve(&model, output_size, &solver_config);
            let _ = done_tx.send(());
            result
        })?;

    if let Some(limit) = config.time_limit {
        match done_rx.recv_timeout(limit) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            Err(RecvTimeoutError::Timeout) => {
                warn!("Time limit of {limit:?} reached, cancelling the run.");
                shutdown_signal.store(true, Ordering::SeqCst);
            }
        }
    }
    let result = worker.join().map_err(|_| AppError::WorkerPanicked)?;

    match result {
        Ok(solution) => {
            if let Some(reporter) = &reporter {
                match reporter.lock() {
                    Ok(mut guard) => guard.finish(&solution.stats)?,
                    Err(_) => error!("Progress reporter mutex poisoned!"),
                }
            }
            info!(
                "Generated a {:?} grid with seed {}",
                solution.output.dimensions(),
                solution.seed
            );
            io::save_grid_to_file(&solution.output, &config.output_path)?;
            Ok(solution)
        }
        Err(e) => {
            if let Some(reporter) = &reporter {
                match reporter.lock() {
                    Ok(mut guard) => guard.fail(&e)?,
                    Err(_) => error!("Progress reporter mutex poisoned!"),
                }
            }
            Err(e.into())
        }
    }
}
