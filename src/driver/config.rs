//! Driver configuration — pools and policy loaded from ~/.cadence/driver.yaml.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::types::{NoteLength, NotePlan, Rearm};
use super::PlanFn;
use crate::pick::{PoolError, WeightPool, Weighted};

/// Driver configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Grid subdivisions per beat.
    #[serde(default = "default_division")]
    pub division: u32,
    /// RNG seed for deterministic selection.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Weighted MIDI pitches to choose from.
    #[serde(default = "DriverConfig::default_pitches")]
    pub pitches: Vec<Weighted<u8>>,
    /// Velocity for every emitted start event, 0.0–1.0.
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    /// Weighted note lengths in beats. Ignored when `gate_ms` is set.
    #[serde(default = "DriverConfig::default_lengths")]
    pub lengths_beats: Vec<Weighted<f64>>,
    /// Fixed note length in milliseconds, overriding `lengths_beats`.
    #[serde(default)]
    pub gate_ms: Option<f64>,
    /// Weighted re-arm intervals in beats. Empty means back-to-back
    /// triggering (next note at the previous note's stop beat).
    #[serde(default)]
    pub intervals_beats: Vec<Weighted<f64>>,
}

fn default_division() -> u32 {
    4
}

fn default_seed() -> u64 {
    42
}

fn default_velocity() -> f32 {
    0.8
}

impl DriverConfig {
    /// Default pitches: a C minor pentatonic octave, root-weighted.
    fn default_pitches() -> Vec<Weighted<u8>> {
        vec![
            Weighted::new(3, 48),
            Weighted::new(1, 51),
            Weighted::new(2, 53),
            Weighted::new(2, 55),
            Weighted::new(1, 58),
            Weighted::new(2, 60),
        ]
    }

    /// Default lengths: mostly one beat, occasionally a half.
    fn default_lengths() -> Vec<Weighted<f64>> {
        vec![Weighted::new(3, 1.0), Weighted::new(1, 0.5)]
    }

    /// Load config from the standard path (~/.cadence/driver.yaml).
    /// Returns None if the file doesn't exist (graceful fallback).
    pub fn load() -> Option<Self> {
        let content = std::fs::read_to_string(Self::default_path()?).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, yaml)
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::home_dir()?;
        path.push(".cadence");
        path.push("driver.yaml");
        Some(path)
    }

    /// Build the selection callback from the configured pools.
    pub fn into_plan_fn(&self) -> Result<PlanFn, PoolError> {
        let pitches = WeightPool::new(&self.pitches)?;
        let lengths = match self.gate_ms {
            Some(_) => None,
            None => Some(WeightPool::new(&self.lengths_beats)?),
        };
        let intervals = if self.intervals_beats.is_empty() {
            None
        } else {
            Some(WeightPool::new(&self.intervals_beats)?)
        };
        let velocity = self.velocity;
        let gate_ms = self.gate_ms;

        Ok(Box::new(move |_fire, rng| {
            let pitch = *pitches.pick(rng);
            let length = match (gate_ms, &lengths) {
                (Some(ms), _) => NoteLength::Millis(ms),
                (None, Some(pool)) => NoteLength::Beats(*pool.pick(rng)),
                // Unreachable by construction; a zero-length note is the
                // safe degenerate answer.
                (None, None) => NoteLength::Beats(0.0),
            };
            let rearm = match &intervals {
                Some(pool) => Rearm::After(*pool.pick(rng)),
                None => Rearm::AtStop,
            };
            NotePlan {
                pitch,
                velocity,
                length,
                rearm,
            }
        }))
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            division: default_division(),
            seed: default_seed(),
            pitches: Self::default_pitches(),
            velocity: default_velocity(),
            lengths_beats: Self::default_lengths(),
            gate_ms: None,
            intervals_beats: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.division, 4);
        assert!(!config.pitches.is_empty());
        assert!(config.gate_ms.is_none());
        assert!(config.intervals_beats.is_empty());
    }

    #[test]
    fn serialize_deserialize() {
        let config = DriverConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: DriverConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.division, config.division);
        assert_eq!(parsed.pitches.len(), config.pitches.len());
        assert_eq!(parsed.lengths_beats.len(), config.lengths_beats.len());
    }

    #[test]
    fn custom_config_deserialize() {
        let yaml = r#"
division: 8
seed: 7
pitches:
  - { weight: 1, value: 36 }
gate_ms: 90.0
intervals_beats:
  - { weight: 1, value: 0.5 }
"#;
        let config: DriverConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.division, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.pitches.len(), 1);
        assert_eq!(config.gate_ms, Some(90.0));
        assert_eq!(config.intervals_beats.len(), 1);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DriverConfig = serde_yaml::from_str("division: 16").unwrap();
        assert_eq!(config.division, 16);
        assert_eq!(config.seed, default_seed());
        assert!(!config.pitches.is_empty());
    }

    #[test]
    fn load_missing_file_returns_none() {
        let _ = DriverConfig::load();
    }

    #[test]
    fn plan_fn_uses_gate_ms_when_set() {
        let config = DriverConfig {
            gate_ms: Some(125.0),
            lengths_beats: Vec::new(),
            ..DriverConfig::default()
        };
        let mut plan = config.into_plan_fn().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let p = plan(crate::sched::FireEvent { beat: 0.0 }, &mut rng);
        assert_eq!(p.length, NoteLength::Millis(125.0));
        assert_eq!(p.rearm, Rearm::AtStop);
    }

    #[test]
    fn plan_fn_rejects_empty_pitch_pool() {
        let config = DriverConfig {
            pitches: Vec::new(),
            ..DriverConfig::default()
        };
        assert!(matches!(config.into_plan_fn(), Err(PoolError::Empty)));
    }

    #[test]
    fn plan_fn_uses_interval_pool() {
        let config = DriverConfig {
            intervals_beats: vec![Weighted::new(1, 2.0)],
            ..DriverConfig::default()
        };
        let mut plan = config.into_plan_fn().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let p = plan(crate::sched::FireEvent { beat: 1.0 }, &mut rng);
        assert_eq!(p.rearm, Rearm::After(2.0));
    }
}
