use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of oscillators in a [`LfoBank`]. The modulation source vector
/// reserves one channel per oscillator, so this is part of the routing
/// contract and not just a tuning knob.
pub const LFO_COUNT: usize = 4;

/// Working range for oscillator rates in Hz. Rates outside this range are
/// clamped at process time rather than rejected.
pub const MIN_RATE_HZ: f32 = 0.01;
pub const MAX_RATE_HZ: f32 = 20.0;

/// Waveform shapes an oscillator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
    /// Emits a constant random value for a whole cycle, redrawn at wrap.
    SampleHold,
    /// Eases between the previous and current held random values across
    /// the cycle.
    SmoothRandom,
}

/// User-facing oscillator settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LfoConfig {
    pub enabled: bool,
    /// Cycle rate in Hz, clamped to [`MIN_RATE_HZ`]..=[`MAX_RATE_HZ`] when
    /// the oscillator is processed.
    pub rate: f32,
    pub waveform: Waveform,
}

impl Default for LfoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: 1.0,
            waveform: Waveform::Sine,
        }
    }
}

/// Mutable run state for one oscillator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LfoState {
    /// Position within the current cycle, kept in [0, 1).
    pub phase: f32,
    /// Last sample produced, in [-1, 1].
    pub current_output: f32,
    /// Random value drawn at the most recent phase wrap.
    pub held_value: f32,
    /// Value that was held before the most recent wrap.
    pub prev_held_value: f32,
}

/// A single low-frequency oscillator: one phase accumulator with a wrap
/// event, no state shared with its siblings.
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    pub config: LfoConfig,
    state: LfoState,
}

impl Lfo {
    pub fn new(config: LfoConfig) -> Self {
        Self {
            config,
            state: LfoState::default(),
        }
    }

    /// Returns the run state, mainly for UI phase displays.
    pub fn state(&self) -> &LfoState {
        &self.state
    }

    /// Resets the accumulator and held values while keeping the config.
    pub fn reset(&mut self) {
        self.state = LfoState::default();
    }

    /// Samples the oscillator at its current phase, then advances it by
    /// `delta_time` seconds. Crossing the end of the cycle wraps the phase
    /// back into [0, 1) and redraws the held random value.
    ///
    /// A disabled oscillator outputs 0 and does not advance its phase, so
    /// re-enabling resumes exactly where it stopped.
    pub fn process(&mut self, delta_time: f32) -> f32 {
        if !self.config.enabled {
            self.state.current_output = 0.0;
            return 0.0;
        }

        let phase = self.state.phase;
        let sample = match self.config.waveform {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Triangle => {
                if phase < 0.5 {
                    phase * 4.0 - 1.0
                } else {
                    3.0 - phase * 4.0
                }
            }
            Waveform::Sawtooth => phase * 2.0 - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::SampleHold => self.state.held_value,
            Waveform::SmoothRandom => {
                let t = phase * phase * (3.0 - 2.0 * phase);
                self.state.prev_held_value
                    + (self.state.held_value - self.state.prev_held_value) * t
            }
        };

        let rate = self.config.rate.clamp(MIN_RATE_HZ, MAX_RATE_HZ);
        self.state.phase += rate * delta_time;
        if self.state.phase >= 1.0 {
            self.state.phase -= self.state.phase.floor();
            self.state.prev_held_value = self.state.held_value;
            self.state.held_value = rand::thread_rng().gen_range(-1.0..=1.0);
        }

        self.state.current_output = sample;
        sample
    }
}

/// Fixed bank of [`LFO_COUNT`] independent oscillators.
#[derive(Debug, Clone, Default)]
pub struct LfoBank {
    lfos: [Lfo; LFO_COUNT],
}

impl LfoBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lfo(&self, index: usize) -> Option<&Lfo> {
        self.lfos.get(index)
    }

    pub fn config_mut(&mut self, index: usize) -> Option<&mut LfoConfig> {
        self.lfos.get_mut(index).map(|lfo| &mut lfo.config)
    }

    /// Reinitialises every oscillator's run state.
    pub fn reset(&mut self) {
        for lfo in &mut self.lfos {
            lfo.reset();
        }
    }

    /// Advances every oscillator and returns their outputs in bank order.
    pub fn process(&mut self, delta_time: f32) -> [f32; LFO_COUNT] {
        let mut outputs = [0.0; LFO_COUNT];
        for (output, lfo) in outputs.iter_mut().zip(&mut self.lfos) {
            *output = lfo.process(delta_time);
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(rate: f32, waveform: Waveform) -> Lfo {
        Lfo::new(LfoConfig {
            enabled: true,
            rate,
            waveform,
        })
    }

    #[test]
    fn sine_quarter_cycle_steps() {
        let mut lfo = enabled(1.0, Waveform::Sine);
        let expected = [0.0, 1.0, 0.0, -1.0];
        for value in expected {
            let sample = lfo.process(0.25);
            assert!(
                (sample - value).abs() < 1e-5,
                "expected {value}, got {sample}"
            );
        }
        // The fourth step wraps the phase back to the start of the cycle.
        assert!(lfo.state().phase < 1e-5);
    }

    #[test]
    fn disabled_lfo_outputs_zero_and_holds_phase() {
        let mut lfo = enabled(1.0, Waveform::Sawtooth);
        lfo.process(0.3);
        let phase = lfo.state().phase;

        lfo.config.enabled = false;
        assert_eq!(lfo.process(0.3), 0.0);
        assert_eq!(lfo.state().current_output, 0.0);
        assert_eq!(lfo.state().phase, phase);
    }

    #[test]
    fn triangle_hits_extremes() {
        let mut lfo = enabled(1.0, Waveform::Triangle);
        assert!((lfo.process(0.25) + 1.0).abs() < 1e-5);
        assert!((lfo.process(0.25) - 0.0).abs() < 1e-5);
        // The rising edge peaks at the half-cycle point.
        assert!((lfo.process(0.25) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn square_switches_at_half_cycle() {
        let mut lfo = enabled(1.0, Waveform::Square);
        assert_eq!(lfo.process(0.25), 1.0);
        assert_eq!(lfo.process(0.25), 1.0);
        assert_eq!(lfo.process(0.25), -1.0);
    }

    #[test]
    fn sample_hold_is_constant_within_a_cycle() {
        let mut lfo = enabled(1.0, Waveform::SampleHold);
        // Force one wrap so a non-default value is held.
        lfo.process(1.5);
        let held = lfo.state().held_value;
        for _ in 0..3 {
            assert_eq!(lfo.process(0.1), held);
        }
        assert!((-1.0..=1.0).contains(&held));
    }

    #[test]
    fn rate_is_clamped_to_working_range() {
        let mut lfo = enabled(1000.0, Waveform::Sine);
        lfo.process(0.01);
        // 1000 Hz clamps to 20 Hz, so 10 ms advances 0.2 of a cycle.
        assert!((lfo.state().phase - 0.2).abs() < 1e-5);
    }

    #[test]
    fn outputs_stay_in_range_for_all_waveforms() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Sawtooth,
            Waveform::Square,
            Waveform::SampleHold,
            Waveform::SmoothRandom,
        ] {
            let mut lfo = enabled(5.0, waveform);
            for _ in 0..200 {
                let sample = lfo.process(0.013);
                assert!(
                    (-1.0..=1.0).contains(&sample),
                    "{waveform:?} produced {sample}"
                );
            }
        }
    }

    #[test]
    fn bank_processes_all_oscillators() {
        let mut bank = LfoBank::new();
        if let Some(config) = bank.config_mut(1) {
            config.enabled = true;
            config.waveform = Waveform::Square;
        }

        let outputs = bank.process(0.25);
        assert_eq!(outputs[0], 0.0);
        assert_eq!(outputs[1], 1.0);
        assert_eq!(outputs.len(), LFO_COUNT);
    }
}
