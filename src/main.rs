use std::process::ExitCode;

use arcgauge::abs::Material;
use arcgauge::logger::setup_logger;
use arcgauge::widgets::arcgauge::{ArcGauge, DEFAULT_COLOR_PROPERTY, GaugeConfig};
use glam::Vec4;
use log::{LevelFilter, error, info};

const USAGE: &str = "usage: arcgauge [CONFIG.json] [--mesh]";

fn load_config(path: Option<&str>) -> Result<GaugeConfig, String> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            GaugeConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))
        }
        None => Ok(GaugeConfig::default()),
    }
}

fn run() -> Result<(), String> {
    let mut path = None;
    let mut dump_mesh = false;
    for arg in std::env::args().skip(1) {
        if arg == "--mesh" {
            dump_mesh = true;
        } else if arg == "-h" || arg == "--help" {
            println!("{}", USAGE);
            return Ok(());
        } else if path.is_none() {
            path = Some(arg);
        } else {
            return Err(USAGE.to_string());
        }
    }

    let config = load_config(path.as_deref())?;
    let material = Material::new().with_color(DEFAULT_COLOR_PROPERTY, Vec4::ONE);
    let gauge = ArcGauge::new(config, material);
    let mesh = gauge
        .live_mesh()
        .ok_or_else(|| "gauge has no live mesh".to_string())?;

    if dump_mesh {
        let json = serde_json::to_string_pretty(mesh).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        let layout = gauge.layout();
        info!(
            "{} sections of {:.3} degrees, border {:.3} degrees",
            gauge.config().sections,
            layout.section_spread(),
            layout.border_spread()
        );
        println!("quads:    {}", mesh.data.quad_count());
        println!("vertices: {}", mesh.data.vertex_count());
        println!("indices:  {}", mesh.data.indices.len());
        println!("bounds:   {} .. {}", mesh.bounds.min, mesh.bounds.max);
    }

    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = setup_logger(LevelFilter::Info) {
        eprintln!("Failed to set up logging: {}", e);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
