//! Lock-screen configuration and partial updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Built-in lock-screen layouts, indexed by `preset_index`.
pub const PRESETS: [&str; 6] = ["Classic", "Minimal", "Bold", "Split", "Stacked", "Widgets"];

/// Widgets the lock screen can host.
pub const WIDGET_IDS: [&str; 6] = ["clock", "date", "notifications", "weather", "battery", "media"];

/// Animated background behind the lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    None,
    Blur,
    Gradient,
    Particles,
    Aurora,
}

impl EffectKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "blur" => Some(Self::Blur),
            "gradient" => Some(Self::Gradient),
            "particles" => Some(Self::Particles),
            "aurora" => Some(Self::Aurora),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub color: String,
}

impl Default for BackgroundEffect {
    fn default() -> Self {
        Self {
            kind: EffectKind::None,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// The lock screen's look. Stored as JSON under `lockScreenConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockScreenConfig {
    pub preset_index: usize,
    pub background_effect: BackgroundEffect,
    pub active_widgets: BTreeMap<String, bool>,
    pub orientation: Orientation,
}

impl Default for LockScreenConfig {
    fn default() -> Self {
        let active_widgets = WIDGET_IDS
            .iter()
            .map(|id| {
                let on = matches!(*id, "clock" | "date" | "notifications");
                (id.to_string(), on)
            })
            .collect();
        Self {
            preset_index: 0,
            background_effect: BackgroundEffect::default(),
            active_widgets,
            orientation: Orientation::Portrait,
        }
    }
}

impl LockScreenConfig {
    pub fn preset_name(&self) -> &'static str {
        PRESETS[self.preset_index % PRESETS.len()]
    }

    pub fn widget_enabled(&self, id: &str) -> bool {
        self.active_widgets.get(id).copied().unwrap_or(false)
    }

    /// Ids of enabled widgets in sorted order.
    pub fn enabled_widgets(&self) -> Vec<&str> {
        self.active_widgets
            .iter()
            .filter(|(_, on)| **on)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Replace every field the patch carries. No per-field diffing: a
    /// submitted widget map replaces the whole map.
    pub fn merged(&self, patch: &LockConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(i) = patch.preset_index {
            next.preset_index = i % PRESETS.len();
        }
        if let Some(effect) = &patch.background_effect {
            next.background_effect = effect.clone();
        }
        if let Some(widgets) = &patch.active_widgets {
            next.active_widgets = widgets.clone();
        }
        if let Some(orientation) = patch.orientation {
            next.orientation = orientation;
        }
        next
    }
}

/// A partial configuration submitted by the customizer or a profile load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockConfigPatch {
    pub preset_index: Option<usize>,
    pub background_effect: Option<BackgroundEffect>,
    pub active_widgets: Option<BTreeMap<String, bool>>,
    pub orientation: Option<Orientation>,
}

impl From<&LockScreenConfig> for LockConfigPatch {
    /// A patch that replaces every field.
    fn from(config: &LockScreenConfig) -> Self {
        Self {
            preset_index: Some(config.preset_index),
            background_effect: Some(config.background_effect.clone()),
            active_widgets: Some(config.active_widgets.clone()),
            orientation: Some(config.orientation),
        }
    }
}
