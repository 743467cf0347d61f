use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use libautoz_aligner::config::Config;
use libautoz_aligner::process::process;
use libautoz_aligner::statistics::{Axis, AxisSeries, AxisStatistics};
use libautoz_aligner::wafer::AnalysisResult;
use libautoz_aligner::worker_status::WorkerStatus;

fn make_template_config(path: &Path) {
    match Config::default().write_config_file(path) {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Could not create template config file: {e}"),
    }
}

fn log_summary(result: &AnalysisResult) {
    for (wafer_id, record) in result.sorted_wafers() {
        log::info!(
            "Wafer {wafer_id}: start {} with {} points",
            record.start_time,
            record.len()
        );
    }
    for axis in Axis::ALL {
        let stats = AxisStatistics::new(&AxisSeries::new(result, axis).values);
        log::info!(
            "{} min {:.4} max {:.4} mean {:.4} median {:.4} std {:.4} (n = {})",
            axis.to_string().to_uppercase(),
            stats.min,
            stats.max,
            stats.mean,
            stats.median,
            stats.std,
            stats.count
        );
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("autoz_aligner_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    if let Err(e) = LogWrapper::new(pb_manager.clone(), logger).try_init() {
        eprintln!("Could not create logging/progress: {e}");
        return;
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required (-p/--path)");
            return;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Machine: {}", config.machine);
    log::info!("AutoZ Log Path: {}", config.autoz_log_path.to_string_lossy());
    log::info!("ALL Log Path: {}", config.all_log_path.to_string_lossy());
    if let Some(report_path) = &config.report_path {
        log::info!("Report Path: {}", report_path.to_string_lossy());
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    let (tx, rx) = mpsc::channel::<WorkerStatus>();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, tx));

    // The worker drops its sender when it finishes, which ends this loop
    for status in rx.iter() {
        pb.set_message(status.stage.message());
        pb.set_position((status.progress * 100.0) as u64);
    }

    match handle.join() {
        Ok(Ok(result)) => {
            log_summary(&result);
            log::info!("Successfully analyzed AutoZ data!");
        }
        Ok(Err(e)) => log::error!("Analysis failed with error: {e}"),
        Err(_) => log::error!("Failed to join analysis task!"),
    }

    pb.finish();

    log::info!("Done.");
}
