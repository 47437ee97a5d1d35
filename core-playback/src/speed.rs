//! Speed presets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered playback-rate presets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    Half,
    #[default]
    Normal,
    Double,
    Triple,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 4] = [
        SpeedPreset::Half,
        SpeedPreset::Normal,
        SpeedPreset::Double,
        SpeedPreset::Triple,
    ];

    pub fn factor(self) -> f32 {
        match self {
            SpeedPreset::Half => 0.5,
            SpeedPreset::Normal => 1.0,
            SpeedPreset::Double => 2.0,
            SpeedPreset::Triple => 3.0,
        }
    }

    /// Preset cycle of the speed button: 1x, 2x, 3x, 0.5x, back to 1x.
    pub fn next(self) -> SpeedPreset {
        match self {
            SpeedPreset::Normal => SpeedPreset::Double,
            SpeedPreset::Double => SpeedPreset::Triple,
            SpeedPreset::Triple => SpeedPreset::Half,
            SpeedPreset::Half => SpeedPreset::Normal,
        }
    }

    /// Preset whose factor equals `factor`, if any.
    pub fn from_factor(factor: f32) -> Option<SpeedPreset> {
        Self::ALL
            .into_iter()
            .find(|preset| (preset.factor() - factor).abs() < f32::EPSILON)
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedPreset::Half => "0.5x",
            SpeedPreset::Normal => "1x",
            SpeedPreset::Double => "2x",
            SpeedPreset::Triple => "3x",
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an arbitrary factor: the preset label when one matches.
pub fn speed_label(factor: f32) -> String {
    match SpeedPreset::from_factor(factor) {
        Some(preset) => preset.label().to_string(),
        None => format!("{}x", factor),
    }
}
