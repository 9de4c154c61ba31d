//! pocket-shell session core.
//!
//! A simulated handheld device shell: power state, exclusive overlays,
//! navigation history, notifications, and the lock screen, all driven by
//! hardware-style events and a virtual millisecond clock. Nothing here
//! draws; front ends observe [`DeviceShell`] through its accessors and
//! [`ShellEvent`] hooks.

pub use pocket_types::{config, error, input};

pub mod history;
pub mod hooks;
pub mod lockscreen;
pub mod notify;
pub mod overlay;
pub mod power;
pub mod shell;
pub mod timer;

pub use hooks::ShellEvent;
pub use shell::{DestructiveAction, DeviceShell, DeviceState};
