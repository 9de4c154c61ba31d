//! Transient surfaces layered over the base screen.
//!
//! Five overlays are exclusive and share a single tagged slot, so two of them
//! can never be active together. The notification shade and the volume HUD
//! are independent flags that the same "hide all" gate clears.

use crate::timer::{ShellTimers, TimerAction, TimerPurpose};

/// Every overlay the shell knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    PowerMenu,
    VolumeHud,
    NotificationShade,
    SystemMessage,
    BootScreen,
    AlbumArt,
    LockCustomize,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 7] = [
        OverlayKind::PowerMenu,
        OverlayKind::VolumeHud,
        OverlayKind::NotificationShade,
        OverlayKind::SystemMessage,
        OverlayKind::BootScreen,
        OverlayKind::AlbumArt,
        OverlayKind::LockCustomize,
    ];

    /// Whether this kind lives in the exclusive slot.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::VolumeHud | Self::NotificationShade)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PowerMenu => "power menu",
            Self::VolumeHud => "volume",
            Self::NotificationShade => "notifications",
            Self::SystemMessage => "system message",
            Self::BootScreen => "boot screen",
            Self::AlbumArt => "album art",
            Self::LockCustomize => "lock customizer",
        }
    }
}

/// Contents of the exclusive slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusiveOverlay {
    PowerMenu,
    SystemMessage { text: String, spinner: bool },
    BootScreen,
    AlbumArt,
    LockCustomize,
}

impl ExclusiveOverlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Self::PowerMenu => OverlayKind::PowerMenu,
            Self::SystemMessage { .. } => OverlayKind::SystemMessage,
            Self::BootScreen => OverlayKind::BootScreen,
            Self::AlbumArt => OverlayKind::AlbumArt,
            Self::LockCustomize => OverlayKind::LockCustomize,
        }
    }

    /// Convenience constructor for a system message.
    pub fn message(text: impl Into<String>, spinner: bool) -> Self {
        Self::SystemMessage {
            text: text.into(),
            spinner,
        }
    }
}

/// The overlay state of one device.
#[derive(Debug, Clone)]
pub struct OverlaySet {
    exclusive: Option<ExclusiveOverlay>,
    shade: bool,
    volume_hud: bool,
    volume_hud_ms: u64,
}

impl OverlaySet {
    /// `volume_hud_ms` is the HUD auto-dismiss delay.
    pub fn new(volume_hud_ms: u64) -> Self {
        Self {
            exclusive: None,
            shade: false,
            volume_hud: false,
            volume_hud_ms,
        }
    }

    /// Clear everything, then put `overlay` in the exclusive slot.
    pub fn show_exclusive(&mut self, overlay: ExclusiveOverlay) {
        self.hide_all();
        log::debug!("overlay shown: {}", overlay.kind().label());
        self.exclusive = Some(overlay);
    }

    /// Deactivate every overlay. Returns whether anything was visible.
    pub fn hide_all(&mut self) -> bool {
        let was_visible = !self.is_empty();
        self.exclusive = None;
        self.shade = false;
        self.volume_hud = false;
        was_visible
    }

    /// Hide one overlay if it is active. Returns whether it was.
    pub fn hide(&mut self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::NotificationShade => std::mem::take(&mut self.shade),
            OverlayKind::VolumeHud => std::mem::take(&mut self.volume_hud),
            _ => {
                if self.exclusive_kind() == Some(kind) {
                    self.exclusive = None;
                    true
                } else {
                    false
                }
            },
        }
    }

    /// Flip the shade or the volume HUD. Activation is refused while the
    /// screen is off; exclusive kinds are not toggleable. Returns the new
    /// visibility of `kind`.
    pub fn toggle(&mut self, kind: OverlayKind, screen_on: bool, timers: &mut ShellTimers) -> bool {
        match kind {
            OverlayKind::NotificationShade => {
                if self.shade {
                    self.shade = false;
                } else if screen_on {
                    self.shade = true;
                } else {
                    log::debug!("shade toggle ignored: screen off");
                }
                self.shade
            },
            OverlayKind::VolumeHud => {
                if self.volume_hud {
                    self.volume_hud = false;
                    timers.cancel(TimerPurpose::VolumeHud);
                } else {
                    self.bump_volume_hud(screen_on, timers);
                }
                self.volume_hud
            },
            other => {
                log::debug!("toggle ignored for exclusive overlay {}", other.label());
                self.is_active(other)
            },
        }
    }

    /// Show the volume HUD and restart its dismiss timer. Returns whether
    /// the HUD is visible afterwards.
    pub fn bump_volume_hud(&mut self, screen_on: bool, timers: &mut ShellTimers) -> bool {
        if !screen_on {
            return false;
        }
        self.volume_hud = true;
        timers.arm(
            TimerPurpose::VolumeHud,
            self.volume_hud_ms,
            TimerAction::DismissVolumeHud,
        );
        true
    }

    pub fn is_active(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::NotificationShade => self.shade,
            OverlayKind::VolumeHud => self.volume_hud,
            _ => self.exclusive_kind() == Some(kind),
        }
    }

    pub fn exclusive(&self) -> Option<&ExclusiveOverlay> {
        self.exclusive.as_ref()
    }

    pub fn exclusive_kind(&self) -> Option<OverlayKind> {
        self.exclusive.as_ref().map(ExclusiveOverlay::kind)
    }

    /// Text and spinner flag of the active system message.
    pub fn system_message(&self) -> Option<(&str, bool)> {
        match &self.exclusive {
            Some(ExclusiveOverlay::SystemMessage { text, spinner }) => Some((text.as_str(), *spinner)),
            _ => None,
        }
    }

    /// Active kinds in declaration order.
    pub fn active_kinds(&self) -> Vec<OverlayKind> {
        OverlayKind::ALL
            .into_iter()
            .filter(|k| self.is_active(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.exclusive.is_none() && !self.shade && !self.volume_hud
    }
}
