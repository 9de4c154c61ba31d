//! Shell configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock timings of the simulated device.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PocketError, Result};

/// Timing and behaviour knobs for a device session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// How long the boot screen stays up before the device locks.
    pub boot_ms: u64,
    /// Delay between "Shutting down..." and the screen going dark.
    pub shutdown_ms: u64,
    /// Delay between "Restarting..." and the boot sequence.
    pub restart_ms: u64,
    /// Power button hold time that opens the power menu.
    pub power_hold_ms: u64,
    /// Lock-screen hold time that opens the customizer.
    pub lock_hold_ms: u64,
    /// How long a notification peek stays on the lock screen.
    pub lock_peek_ms: u64,
    /// Volume HUD auto-dismiss delay.
    pub volume_hud_ms: u64,
    /// Clock refresh interval.
    pub clock_tick_ms: u64,
    /// Simulated duration of boot-menu recovery and factory-reset tasks.
    pub boot_task_ms: u64,
    /// How long a boot-menu status line stays visible.
    pub boot_status_ms: u64,
    /// Simulated duration of bootloader unlock/relock.
    pub bootloader_op_ms: u64,
    /// Simulated duration of a factory wipe from settings.
    pub factory_wipe_ms: u64,
    /// Maximum navigation history depth.
    pub history_limit: usize,
    /// Volume change per rocker press (percent).
    pub volume_step: u8,
    /// Pointer travel beyond which a press counts as a drag.
    pub drag_threshold_px: i32,
    /// Optional file for persisted key-value state.
    pub store_path: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            boot_ms: 3000,
            shutdown_ms: 2000,
            restart_ms: 2000,
            power_hold_ms: 1000,
            lock_hold_ms: 1200,
            lock_peek_ms: 5000,
            volume_hud_ms: 2000,
            clock_tick_ms: 1000,
            boot_task_ms: 3000,
            boot_status_ms: 1500,
            bootloader_op_ms: 3000,
            factory_wipe_ms: 4000,
            history_limit: 20,
            volume_step: 10,
            drag_threshold_px: 10,
            store_path: None,
        }
    }
}

impl ShellConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded shell config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would stall or break the state machine.
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("boot_ms", self.boot_ms),
            ("shutdown_ms", self.shutdown_ms),
            ("restart_ms", self.restart_ms),
            ("power_hold_ms", self.power_hold_ms),
            ("lock_hold_ms", self.lock_hold_ms),
            ("lock_peek_ms", self.lock_peek_ms),
            ("volume_hud_ms", self.volume_hud_ms),
            ("clock_tick_ms", self.clock_tick_ms),
            ("boot_task_ms", self.boot_task_ms),
            ("boot_status_ms", self.boot_status_ms),
            ("bootloader_op_ms", self.bootloader_op_ms),
            ("factory_wipe_ms", self.factory_wipe_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, v)| *v == 0) {
            return Err(PocketError::Config(format!("{name} must be non-zero")));
        }
        if self.history_limit == 0 {
            return Err(PocketError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.volume_step == 0 || self.volume_step > 100 {
            return Err(PocketError::Config(
                "volume_step must be within 1..=100".to_string(),
            ));
        }
        if self.drag_threshold_px < 0 {
            return Err(PocketError::Config(
                "drag_threshold_px must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
