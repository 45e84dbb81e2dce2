//! Real-time modulation core for the ModViz shader visualiser.
//!
//! The crate owns the subsystem that routes normalised audio and LFO
//! signals onto named visual parameters every frame: a bank of
//! low-frequency oscillators, an aggregator that folds band energies and
//! oscillator outputs into one [0, 1] source vector, a registry of
//! modulatable parameters, and the engine that evaluates routes against
//! that vector. Audio analysis and rendering live elsewhere; this crate
//! only consumes their numbers and hands modulated values back.
//!
//! The whole subsystem is single-threaded by design: the host drives
//! [`LfoBank::process`], [`ModSourceAggregator::aggregate`] and
//! [`ModulationEngine::update`] once per rendered frame from the thread
//! that owns the parameters.

pub mod config;
pub mod engine;
pub mod error;
pub mod lfo;
pub mod params;
pub mod preset;
pub mod routes;
pub mod sources;

pub use config::ModulationConfig;
pub use engine::ModulationEngine;
pub use error::{ModVizError, Result};
pub use lfo::{Lfo, LfoBank, LfoConfig, LfoState, Waveform, LFO_COUNT};
pub use params::{ParamHandle, ParameterRegistry, MAX_ID_LEN};
pub use preset::RoutePreset;
pub use routes::{Curve, ModRoute, RouteTable};
pub use sources::{BandEnergies, ModSource, ModSourceAggregator, ModSources, MOD_SOURCE_COUNT};
