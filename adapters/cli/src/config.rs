use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use lane_blast_core::Tuning;
use serde::Deserialize;

/// Tuning overrides read from a TOML file. Every duration is in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TuningFile {
    slot_count: Option<u32>,
    fire_interval_ms: Option<u64>,
    scan_backoff_ms: Option<u64>,
    dock_travel_ms: Option<u64>,
    exit_travel_ms: Option<u64>,
    lose_poll_interval_ms: Option<u64>,
    effect_lifetime_ms: Option<u64>,
    projectile_speed: Option<f32>,
    slot_spacing: Option<f32>,
    slot_distance: Option<f32>,
    wave: WaveFile,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WaveFile {
    base_delay_ms: Option<u64>,
    base_amplitude: Option<f32>,
    decay: Option<f32>,
    cutoff: Option<f32>,
}

impl TuningFile {
    /// Parses a tuning file from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents).context("failed to parse tuning file")?;
        if file.slot_count == Some(0) {
            bail!("slot_count must be at least 1");
        }
        if file.lose_poll_interval_ms == Some(0) {
            bail!("lose_poll_interval_ms must be positive");
        }
        Ok(file)
    }

    /// Reads and parses the tuning file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid tuning file {}", path.display()))
    }

    /// Applies the overrides on top of `base`.
    #[must_use]
    pub(crate) fn apply(&self, base: Tuning) -> Tuning {
        let millis = |value: Option<u64>, fallback: Duration| {
            value.map_or(fallback, Duration::from_millis)
        };

        let mut tuning = base;
        tuning.slot_count = self.slot_count.unwrap_or(base.slot_count);
        tuning.fire_interval = millis(self.fire_interval_ms, base.fire_interval);
        tuning.scan_backoff = millis(self.scan_backoff_ms, base.scan_backoff);
        tuning.dock_travel = millis(self.dock_travel_ms, base.dock_travel);
        tuning.exit_travel = millis(self.exit_travel_ms, base.exit_travel);
        tuning.lose_poll_interval = millis(self.lose_poll_interval_ms, base.lose_poll_interval);
        tuning.effect_lifetime = millis(self.effect_lifetime_ms, base.effect_lifetime);
        tuning.projectile_speed = self.projectile_speed.unwrap_or(base.projectile_speed);
        tuning.slot_spacing = self.slot_spacing.unwrap_or(base.slot_spacing);
        tuning.slot_distance = self.slot_distance.unwrap_or(base.slot_distance);

        tuning.wave.base_delay = millis(self.wave.base_delay_ms, base.wave.base_delay);
        tuning.wave.base_amplitude = self.wave.base_amplitude.unwrap_or(base.wave.base_amplitude);
        tuning.wave.decay = self.wave.decay.unwrap_or(base.wave.decay);
        tuning.wave.cutoff = self.wave.cutoff.unwrap_or(base.wave.cutoff);
        tuning
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lane_blast_core::Tuning;

    use super::TuningFile;

    #[test]
    fn empty_file_keeps_the_defaults() {
        let file = TuningFile::parse("").expect("empty file parses");

        assert_eq!(file.apply(Tuning::default()), Tuning::default());
    }

    #[test]
    fn overrides_replace_only_the_named_fields() {
        let file = TuningFile::parse(
            r#"
            slot_count = 3
            fire_interval_ms = 250

            [wave]
            decay = 0.8
            "#,
        )
        .expect("valid file");

        let tuning = file.apply(Tuning::default());

        assert_eq!(tuning.slot_count, 3);
        assert_eq!(tuning.fire_interval, Duration::from_millis(250));
        assert_eq!(tuning.scan_backoff, Duration::from_millis(100));
        assert_eq!(tuning.wave.decay, 0.8);
        assert_eq!(tuning.wave.cutoff, 0.05);
    }

    #[test]
    fn bundled_tuning_file_matches_the_defaults() {
        let path = std::path::Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../levels/tuning.toml"
        ));
        let file = TuningFile::load(path).expect("bundled tuning file");

        assert_eq!(file.apply(Tuning::default()), Tuning::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(TuningFile::parse("slots = 3").is_err());
    }

    #[test]
    fn zero_slots_are_rejected() {
        assert!(TuningFile::parse("slot_count = 0").is_err());
    }
}
