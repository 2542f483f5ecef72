use fxhash::FxHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use libcalo_layer1::capture::CaptureWriter;
use libcalo_layer1::config::EmulatorConfig;
use libcalo_layer1::coordinates::TowerCoord;
use libcalo_layer1::error::{CaptureError, Layer1Error};
use libcalo_layer1::layer1::CaloLayer1;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Runner failed due to layer1 error: {0}")]
    Layer1(#[from] Layer1Error),
    #[error("Runner failed due to capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Runner failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub n_events: u32,
    pub failed_events: u32,
    pub bytes_written: u64,
}

/// Draw a Poisson count by multiplying uniform deviates until they fall
/// below exp(-mean). Fine for the modest occupancies used here.
fn poisson(rng: &mut StdRng, mean: f64) -> u32 {
    if mean <= 0.0 {
        return 0;
    }
    let g = (-mean).exp();
    let mut count = 0;
    let mut t = 1.0;
    loop {
        t *= rng.gen::<f64>();
        if t <= g {
            return count;
        }
        count += 1;
    }
}

/// Uniform draw over the central towers, both sides.
fn random_central_tower(rng: &mut StdRng) -> TowerCoord {
    let mut calo_eta: i32 = rng.gen_range(1..=28);
    if rng.gen_bool(0.5) {
        calo_eta = -calo_eta;
    }
    let calo_phi: i32 = rng.gen_range(1..=72);
    TowerCoord::new(calo_eta, calo_phi)
}

/// Drive the engine with randomized events and check energy conservation
/// online: the emulated total may fall below the loaded total only by the
/// region-saturation budget (~1%), and must never exceed it.
pub fn run(config: EmulatorConfig, progress: Arc<Mutex<f32>>) -> Result<RunSummary, RunnerError> {
    let mut uct = CaloLayer1::new(&config.calibration)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut writer = match &config.capture_path {
        Some(path) => Some(CaptureWriter::create(path, config.run_number)?),
        None => None,
    };

    let mut summary = RunSummary::default();
    for event in 0..config.n_events {
        uct.clear_event()?;

        let mut ecal_loads: FxHashMap<TowerCoord, u32> = FxHashMap::default();
        let mut hcal_loads: FxHashMap<TowerCoord, u32> = FxHashMap::default();

        let n_ecal = poisson(&mut rng, config.mean_ecal_towers);
        for _ in 0..n_ecal {
            let t = random_central_tower(&mut rng);
            if ecal_loads.contains_key(&t) {
                continue;
            }
            let et: u32 = rng.gen_range(0..=255);
            let fine_grain = rng.gen_bool(0.05);
            uct.set_ecal_data(t, fine_grain, et)?;
            ecal_loads.insert(t, et);
        }

        let n_hcal = poisson(&mut rng, config.mean_hcal_towers);
        for _ in 0..n_hcal {
            let t = random_central_tower(&mut rng);
            if hcal_loads.contains_key(&t) {
                continue;
            }
            let et: u32 = rng.gen_range(0..=255);
            let feature_bits: u32 = rng.gen_range(0..=0x1F);
            uct.set_hcal_data(t, feature_bits, et)?;
            hcal_loads.insert(t, et);
        }

        uct.process()?;

        let expected: u32 =
            ecal_loads.values().sum::<u32>() + hcal_loads.values().sum::<u32>();
        let total = uct.et();
        if total > expected || (total as f64) < expected as f64 * 0.99 {
            log::error!(
                "Event {event}: total ET {total} outside the saturation budget of loaded {expected}"
            );
            summary.failed_events += 1;
        }

        if let Some(w) = writer.as_mut() {
            w.write_event(event, &uct)?;
        }
        summary.n_events += 1;

        match progress.lock() {
            Ok(mut status) => *status = (event + 1) as f32 / config.n_events as f32,
            Err(e) => log::error!("{e}"),
        }
    }

    if let Some(w) = writer {
        w.finish()?;
        if let Some(path) = &config.capture_path {
            summary.bytes_written = std::fs::metadata(path)?.len();
        }
    }

    Ok(summary)
}
