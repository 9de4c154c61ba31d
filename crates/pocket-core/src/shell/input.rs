//! Hardware event routing.

use pocket_types::input::{HardwareEvent, Key};

use super::{DeviceShell, DeviceState};
use crate::overlay::OverlayKind;

impl DeviceShell {
    /// Route one hardware event. Events that make no sense in the current
    /// state are dropped.
    pub fn handle_event(&mut self, event: HardwareEvent) {
        log::trace!("event {event:?} in {}", self.state.device);
        match event {
            HardwareEvent::PowerPress => self.power_pressed(),
            HardwareEvent::PowerRelease => self.power_released(),
            HardwareEvent::VolumeUp => {
                self.volume_up();
            },
            HardwareEvent::VolumeDown => {
                self.volume_down();
            },
            HardwareEvent::SnapKey => {
                self.take_screenshot();
            },
            HardwareEvent::Key(key) => self.key_pressed(key),
            HardwareEvent::PointerDown { x, y, region } => self.lock_pointer_down(x, y, region),
            HardwareEvent::PointerMove { x, y } => self.lock_pointer_move(x, y),
            HardwareEvent::PointerUp { .. } => self.lock_pointer_up(),
            HardwareEvent::PointerLeave | HardwareEvent::PointerCancel => {
                self.lock_pointer_abort();
            },
        }
    }

    fn key_pressed(&mut self, key: Key) {
        if self.state.overlays.is_active(OverlayKind::BootScreen) {
            match key {
                Key::Up => {
                    self.boot_menu_move(true);
                },
                Key::Down => {
                    self.boot_menu_move(false);
                },
                Key::Enter => {
                    self.commit_boot_selection();
                },
                Key::Escape => {
                    self.abort_boot();
                },
            }
            return;
        }
        if key != Key::Escape {
            return;
        }
        // Escape closes the innermost surface: customizer, then any overlay,
        // then the current app.
        if self.lock_session.is_customizing() {
            self.cancel_customizer();
        } else if matches!(
            self.state.device,
            DeviceState::SystemMessage | DeviceState::Booting
        ) {
            log::debug!("escape ignored: device {}", self.state.device);
        } else if !self.state.overlays.is_empty() {
            self.hide_overlays();
        } else if self.state.device == DeviceState::Unlocked {
            self.navigate_back();
        }
    }
}
