use serde::{Deserialize, Serialize};

use crate::lfo::LFO_COUNT;

/// Guard against division by a near-silent running average.
const NORM_EPSILON: f32 = 1e-4;

/// The closed set of modulation source channels.
///
/// The numeric discriminants are the indices into [`ModSources`] and the
/// values persisted in route presets, so the order here is part of the
/// on-disk contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModSource {
    Bass = 0,
    Mid = 1,
    Treble = 2,
    Beat = 3,
    Lfo1 = 4,
    Lfo2 = 5,
    Lfo3 = 6,
    Lfo4 = 7,
}

/// Total number of modulation source channels.
pub const MOD_SOURCE_COUNT: usize = 4 + LFO_COUNT;

impl ModSource {
    pub const ALL: [ModSource; MOD_SOURCE_COUNT] = [
        ModSource::Bass,
        ModSource::Mid,
        ModSource::Treble,
        ModSource::Beat,
        ModSource::Lfo1,
        ModSource::Lfo2,
        ModSource::Lfo3,
        ModSource::Lfo4,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<ModSource> {
        Self::ALL.get(index).copied()
    }

    /// Short label used by UI and log output.
    pub fn label(self) -> &'static str {
        match self {
            ModSource::Bass => "Bass",
            ModSource::Mid => "Mid",
            ModSource::Treble => "Treble",
            ModSource::Beat => "Beat",
            ModSource::Lfo1 => "LFO 1",
            ModSource::Lfo2 => "LFO 2",
            ModSource::Lfo3 => "LFO 3",
            ModSource::Lfo4 => "LFO 4",
        }
    }
}

/// Normalised [0, 1] signal vector rebuilt every frame; it carries no
/// identity across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModSources {
    values: [f32; MOD_SOURCE_COUNT],
}

impl ModSources {
    /// Reads a channel by raw index. Out-of-range indices read as 0 so a
    /// stale route degrades to "no signal" instead of faulting.
    pub fn get(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    pub fn value(&self, source: ModSource) -> f32 {
        self.values[source.index()]
    }

    pub fn set(&mut self, source: ModSource, value: f32) {
        self.values[source.index()] = value;
    }
}

/// Smoothed and slow-averaged energies for the three analysis bands, as
/// produced by the (external) audio analysis stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandEnergies {
    pub bass_smooth: f32,
    pub bass_avg: f32,
    pub mid_smooth: f32,
    pub mid_avg: f32,
    pub treble_smooth: f32,
    pub treble_avg: f32,
}

/// Folds heterogeneous inputs into one comparable [0, 1] vector. Pure
/// function of its inputs; the struct only exists to give the operation a
/// home alongside its tuning constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModSourceAggregator;

impl ModSourceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the per-frame source vector.
    ///
    /// Bands self-calibrate against their slow running average and saturate
    /// at twice that average. Beat intensity is already [0, 1] from the
    /// detector and passes through untouched. LFO outputs are remapped from
    /// bipolar [-1, 1] to unipolar [0, 1].
    pub fn aggregate(
        &self,
        bands: &BandEnergies,
        beat_intensity: f32,
        lfo_outputs: [f32; LFO_COUNT],
    ) -> ModSources {
        let mut sources = ModSources::default();
        sources.set(
            ModSource::Bass,
            normalize_band(bands.bass_smooth, bands.bass_avg),
        );
        sources.set(
            ModSource::Mid,
            normalize_band(bands.mid_smooth, bands.mid_avg),
        );
        sources.set(
            ModSource::Treble,
            normalize_band(bands.treble_smooth, bands.treble_avg),
        );
        sources.set(ModSource::Beat, beat_intensity);

        for (offset, output) in lfo_outputs.iter().enumerate() {
            let source = ModSource::from_index(ModSource::Lfo1.index() + offset)
                .expect("bank size matches the LFO source channels");
            sources.set(source, (output + 1.0) * 0.5);
        }

        sources
    }
}

fn normalize_band(smoothed: f32, running_avg: f32) -> f32 {
    (smoothed / running_avg.max(NORM_EPSILON)).clamp(0.0, 2.0) / 2.0
}
