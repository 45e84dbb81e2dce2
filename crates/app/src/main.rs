use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use modviz_core::{
    BandEnergies, Curve, LfoBank, ModRoute, ModSource, ModSourceAggregator, ModulationConfig,
    ModulationEngine, RoutePreset, Waveform,
};
use tracing_subscriber::EnvFilter;

fn main() -> modviz_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            seconds,
            fps,
            preset,
        } => run_demo(seconds, fps, preset.as_deref()),
        Commands::Export { output } => run_export(&output),
    }
}

/// Stands in for the real host: fabricates analysis input, drives the
/// bank/aggregator/engine once per frame, and logs the modulated values.
fn run_demo(seconds: f32, fps: u32, preset: Option<&Path>) -> modviz_core::Result<()> {
    tracing::info!(seconds, fps, ?preset, "starting modulation demo");

    let mut bank = LfoBank::new();
    let mut config = ModulationConfig::default();
    config.lfos[0].enabled = true;
    config.lfos[0].rate = 0.5;
    config.lfos[1].enabled = true;
    config.lfos[1].rate = 2.0;
    config.lfos[1].waveform = Waveform::Triangle;
    config.apply_to(&mut bank);

    let aggregator = ModSourceAggregator::new();
    let mut engine = ModulationEngine::new();

    // The parameters an effect would normally register from its own setup.
    let zoom = engine.register_param("tunnel.zoom", 1.0, 0.5, 3.0);
    let hue = engine.register_param("tunnel.hue_shift", 0.0, 0.0, 1.0);
    let pulse = engine.register_param("tunnel.pulse", 0.2, 0.0, 1.0);

    match preset {
        Some(path) => {
            let loaded = RoutePreset::from_json(&std::fs::read_to_string(path)?)?;
            tracing::info!(routes = loaded.routes.len(), "restoring routes from preset");
            engine.apply_preset(&loaded);
            engine.sync_bases();
        }
        None => {
            for route in default_routes() {
                engine.set_route(route);
            }
        }
    }

    let delta = 1.0 / fps.max(1) as f32;
    let frames = (seconds.max(0.0) * fps as f32) as u32;
    let mut time = 0.0_f32;

    for frame in 0..frames {
        let lfo_outputs = bank.process(delta);
        let (bands, beat) = fabricate_analysis(time);
        let sources = aggregator.aggregate(&bands, beat, lfo_outputs);
        engine.update(&sources);

        if frame % fps.max(1) == 0 {
            tracing::info!(
                time,
                bass = sources.value(ModSource::Bass),
                zoom = engine.value(zoom),
                hue = engine.value(hue),
                pulse = engine.value(pulse),
                "frame"
            );
        }

        time += delta;
    }

    tracing::info!(frames, "demo finished");
    Ok(())
}

/// Writes the default routing as a preset file, mostly so there is a JSON
/// sample to hand-edit and feed back into `demo --preset`.
fn run_export(output: &PathBuf) -> modviz_core::Result<()> {
    let mut engine = ModulationEngine::new();
    for route in default_routes() {
        engine.set_route(route);
    }

    let json = engine.snapshot().to_json()?;
    std::fs::write(output, json)?;
    tracing::info!(?output, routes = engine.route_count(), "preset written");
    Ok(())
}

fn default_routes() -> Vec<ModRoute> {
    vec![
        ModRoute::new("tunnel.zoom", ModSource::Bass.index(), 0.8, Curve::Curve2),
        ModRoute::new("tunnel.hue_shift", ModSource::Lfo1.index(), 1.0, Curve::Linear),
        ModRoute::new("tunnel.pulse", ModSource::Beat.index(), 1.0, Curve::Linear),
    ]
}

/// Deterministic stand-in for the audio analysis stage: slow sinusoidal
/// band energies around a fixed running average, with a beat pulse every
/// half second.
fn fabricate_analysis(time: f32) -> (BandEnergies, f32) {
    let bands = BandEnergies {
        bass_smooth: 1.0 + 0.8 * (time * TAU * 0.25).sin(),
        bass_avg: 1.0,
        mid_smooth: 0.6 + 0.3 * (time * TAU * 0.4).sin(),
        mid_avg: 0.6,
        treble_smooth: 0.3 + 0.2 * (time * TAU * 0.9).sin(),
        treble_avg: 0.3,
    };
    let beat = if time.fract() < 0.5 {
        (1.0 - time.fract() * 2.0).max(0.0)
    } else {
        0.0
    };
    (bands, beat)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Demo host for the ModViz modulation core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a synthetic frame loop and log the modulated parameters.
    Demo {
        /// How long the simulated session lasts.
        #[arg(long, default_value_t = 5.0)]
        seconds: f32,
        /// Frames per second of the simulated render loop.
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Optional route preset to restore before the loop starts.
        #[arg(short, long)]
        preset: Option<PathBuf>,
    },
    /// Write the default routing to a preset JSON file.
    Export {
        /// Output path for the generated preset.
        output: PathBuf,
    },
}
