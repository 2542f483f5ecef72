use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use libcalo_layer1::config::EmulatorConfig;

mod runner;

fn make_template_config(path: &Path) {
    let config = EmulatorConfig::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn main() {
    // Create a cli
    let matches = Command::new("calo_layer1_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the config file"),
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

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );

        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match EmulatorConfig::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Run Number: {}", config.run_number);
    log::info!("Events: {}", config.n_events);
    log::info!(
        "Mean ECAL towers: {} Mean HCAL towers: {}",
        config.mean_ecal_towers,
        config.mean_hcal_towers
    );
    log::info!("Seed: {}", config.seed);
    match &config.capture_path {
        Some(p) => log::info!("Capture Path: {}", p.to_string_lossy()),
        None => log::info!("Capture output disabled"),
    }

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    let status = Arc::new(Mutex::new(0.0f32));
    let sent_status = status.clone();
    // Spawn the task!
    let handle = std::thread::spawn(move || runner::run(config, sent_status));

    loop {
        std::thread::sleep(std::time::Duration::from_millis(200));
        match status.lock() {
            Ok(stat) => pb.set_position((*stat * 100.0) as u64),
            Err(e) => log::error!("{e}"),
        }

        if handle.is_finished() {
            match handle.join() {
                Ok(result) => match result {
                    Ok(summary) => {
                        log::info!(
                            "Emulated {} events with {} conservation failures.",
                            summary.n_events,
                            summary.failed_events
                        );
                        if summary.bytes_written > 0 {
                            log::info!(
                                "Wrote {} of capture data.",
                                human_bytes::human_bytes(summary.bytes_written as f64)
                            );
                        }
                    }
                    Err(e) => log::error!("Emulation failed with error: {e}"),
                },
                Err(_) => log::error!("Failed to join emulation task!"),
            }
            break;
        }
    }

    pb.finish();

    log::info!("Done.");
}
