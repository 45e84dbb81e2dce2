use serde::{Deserialize, Serialize};

use crate::lfo::{LfoBank, LfoConfig, LFO_COUNT};

/// Persisted settings for the modulation subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulationConfig {
    pub lfos: Vec<LfoConfig>,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            lfos: vec![LfoConfig::default(); LFO_COUNT],
        }
    }
}

impl ModulationConfig {
    /// Copies the configured settings onto a bank. Entries beyond the bank
    /// size are ignored; missing entries leave the oscillator untouched.
    pub fn apply_to(&self, bank: &mut LfoBank) {
        for (index, config) in self.lfos.iter().take(LFO_COUNT).enumerate() {
            if let Some(slot) = bank.config_mut(index) {
                *slot = *config;
            }
        }
    }
}
