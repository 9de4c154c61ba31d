//! Lock screen: configuration, persistence, and the hold-to-customize
//! gesture.

pub mod config;
pub mod controller;
pub mod store;

pub use config::{
    BackgroundEffect, EffectKind, LockConfigPatch, LockScreenConfig, Orientation, PRESETS,
    WIDGET_IDS,
};
pub use controller::{LockPhase, LockSessionController, TapOutcome};
