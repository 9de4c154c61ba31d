//! Boot, shutdown, restart, screen toggling, the power and boot menus, and
//! volume.

use super::{DeviceShell, DeviceState};
use crate::history::HOME_SCREEN;
use crate::hooks::ShellEvent;
use crate::overlay::{ExclusiveOverlay, OverlayKind};
use crate::power::{BootMenuItem, PowerMenuChoice, ReleaseOutcome};
use crate::timer::{TimerAction, TimerPurpose};

/// Timers owned by the boot sequence.
const BOOT_TIMERS: [TimerPurpose; 3] = [
    TimerPurpose::Boot,
    TimerPurpose::BootTask,
    TimerPurpose::BootStatus,
];

impl DeviceShell {
    /// Run the boot sequence from a powered-off device.
    pub fn boot(&mut self) -> bool {
        if self.state.device != DeviceState::Off {
            log::debug!("boot ignored: device {}", self.state.device);
            return false;
        }
        self.begin_boot();
        true
    }

    pub(super) fn begin_boot(&mut self) {
        self.leave_session_surfaces();
        for purpose in BOOT_TIMERS {
            self.state.timers.cancel(purpose);
        }
        self.state.timers.cancel(TimerPurpose::ClockTick);
        self.state.boot_menu.reset(&mut self.state.timers);
        self.set_device(DeviceState::Booting);
        self.show_exclusive(ExclusiveOverlay::BootScreen);
        self.state
            .timers
            .arm(TimerPurpose::Boot, self.config.boot_ms, TimerAction::FinishBoot);
    }

    /// End of the boot delay (or an aborted boot): land on the lock screen
    /// with the clock running.
    pub(super) fn finish_boot(&mut self) {
        for purpose in BOOT_TIMERS {
            self.state.timers.cancel(purpose);
        }
        self.state.boot_menu.clear_status();
        self.show_lock_screen();
        self.start_clock();
    }

    pub(super) fn finish_boot_task(&mut self, item: BootMenuItem) {
        if self.state.device != DeviceState::Booting {
            return;
        }
        if item == BootMenuItem::FactoryReset {
            self.wipe_user_data();
        }
        self.finish_boot();
        let (title, message) = item.completion_notice();
        self.create_notification(title, message);
    }

    fn start_clock(&mut self) {
        self.state.timers.arm_periodic(
            TimerPurpose::ClockTick,
            self.config.clock_tick_ms,
            TimerAction::ClockTick,
        );
        self.refresh_clock();
    }

    /// Drop everything tied to the current screen before a power transition.
    fn leave_session_surfaces(&mut self) {
        self.lock_session.reset(&mut self.state.timers);
        self.state.notifications.clear_peek(&mut self.state.timers);
        self.state.pending_confirmation = None;
        self.hide_overlays();
    }

    /// Show "Shutting down..." and power off after the shutdown delay.
    pub fn shutdown(&mut self) -> bool {
        if matches!(
            self.state.device,
            DeviceState::Off | DeviceState::SystemMessage
        ) {
            log::debug!("shutdown ignored: device {}", self.state.device);
            return false;
        }
        self.leave_session_surfaces();
        for purpose in BOOT_TIMERS {
            self.state.timers.cancel(purpose);
        }
        self.show_exclusive(ExclusiveOverlay::message("Shutting down...", false));
        self.set_device(DeviceState::SystemMessage);
        self.state.timers.arm(
            TimerPurpose::PowerSequence,
            self.config.shutdown_ms,
            TimerAction::FinishShutdown,
        );
        true
    }

    pub(super) fn finish_shutdown(&mut self) {
        self.state.timers.cancel_all();
        self.power.reset(&mut self.state.timers);
        self.leave_session_surfaces();
        self.state.history.clear();
        self.state.current_view = HOME_SCREEN.to_string();
        self.state.flashlight = false;
        self.set_device(DeviceState::Off);
    }

    /// Show "Restarting..." with a spinner, then boot. Works from off too.
    pub fn restart(&mut self) -> bool {
        if self.state.device == DeviceState::SystemMessage {
            log::debug!("restart ignored: already in a system message");
            return false;
        }
        self.begin_restart();
        true
    }

    pub(super) fn begin_restart(&mut self) {
        self.leave_session_surfaces();
        for purpose in BOOT_TIMERS {
            self.state.timers.cancel(purpose);
        }
        self.state.timers.cancel(TimerPurpose::ClockTick);
        self.show_exclusive(ExclusiveOverlay::message("Restarting...", true));
        self.set_device(DeviceState::SystemMessage);
        self.state.timers.arm(
            TimerPurpose::PowerSequence,
            self.config.restart_ms,
            TimerAction::FinishRestart,
        );
    }

    pub(super) fn finish_restart(&mut self) {
        self.state.history.clear();
        self.state.current_view = HOME_SCREEN.to_string();
        self.begin_boot();
    }

    /// Screen off from an interactive state. History survives.
    fn screen_off(&mut self) {
        self.leave_session_surfaces();
        self.state.timers.cancel(TimerPurpose::ClockTick);
        self.set_device(DeviceState::Off);
    }

    /// Screen on from off: straight to the lock screen, no boot sequence.
    fn screen_on(&mut self) {
        self.show_lock_screen();
        self.start_clock();
    }

    // -- Power button -------------------------------------------------------

    pub(super) fn power_pressed(&mut self) {
        if self.state.overlays.is_active(OverlayKind::BootScreen) {
            self.commit_boot_selection();
            return;
        }
        match self.state.device {
            DeviceState::Off => {
                self.power.press(false, &mut self.state.timers);
            },
            DeviceState::Locked | DeviceState::Unlocked => {
                if self.state.overlays.is_active(OverlayKind::PowerMenu) {
                    log::debug!("power press ignored: power menu open");
                    return;
                }
                self.power.press(true, &mut self.state.timers);
            },
            DeviceState::Booting | DeviceState::SystemMessage => {
                log::debug!("power press ignored: device {}", self.state.device);
            },
        }
    }

    pub(super) fn power_released(&mut self) {
        if self.power.release(&mut self.state.timers) != ReleaseOutcome::TogglePower {
            return;
        }
        match self.state.device {
            DeviceState::Off => self.screen_on(),
            DeviceState::Locked | DeviceState::Unlocked => self.screen_off(),
            other => log::debug!("power toggle ignored: device {other}"),
        }
    }

    pub(super) fn open_power_menu(&mut self) {
        self.power.mark_hold_fired();
        if !self.state.device.is_interactive() {
            return;
        }
        self.lock_session.reset(&mut self.state.timers);
        self.show_exclusive(ExclusiveOverlay::PowerMenu);
    }

    /// Act on a power-menu entry. Ignored unless the menu is open.
    pub fn select_power_menu(&mut self, choice: PowerMenuChoice) -> bool {
        if !self.state.overlays.is_active(OverlayKind::PowerMenu) {
            log::debug!("power menu choice {choice:?} ignored: menu closed");
            return false;
        }
        self.hide_overlays();
        match choice {
            PowerMenuChoice::PowerOff => self.shutdown(),
            PowerMenuChoice::Restart => self.restart(),
            PowerMenuChoice::Lock => self.lock(),
            PowerMenuChoice::Dismiss => true,
        }
    }

    // -- Boot menu ----------------------------------------------------------

    /// Move the boot menu cursor. Only while the boot screen is up.
    pub fn boot_menu_move(&mut self, up: bool) -> bool {
        if !self.state.overlays.is_active(OverlayKind::BootScreen) {
            return false;
        }
        let item = if up {
            self.state.boot_menu.move_up()
        } else {
            self.state.boot_menu.move_down()
        };
        log::debug!("boot menu: {}", item.label());
        true
    }

    /// Run the selected boot menu entry.
    pub fn commit_boot_selection(&mut self) -> bool {
        if !self.state.overlays.is_active(OverlayKind::BootScreen) {
            return false;
        }
        let item = self.state.boot_menu.selected();
        log::info!("boot menu: {} selected", item.label());
        match item {
            BootMenuItem::Reboot => self.begin_boot(),
            task if task.is_task() => {
                self.state.timers.cancel(TimerPurpose::Boot);
                self.state.boot_menu.clear_status();
                self.show_exclusive(ExclusiveOverlay::message(task.task_message(), true));
                self.state.timers.arm(
                    TimerPurpose::BootTask,
                    self.config.boot_task_ms,
                    TimerAction::FinishBootTask(task),
                );
            },
            info => {
                let text = info.status_text();
                self.state.boot_menu.set_status(
                    text,
                    self.config.boot_status_ms,
                    &mut self.state.timers,
                );
            },
        }
        true
    }

    /// Escape during boot: skip straight to the lock screen.
    pub fn abort_boot(&mut self) -> bool {
        if !self.state.overlays.is_active(OverlayKind::BootScreen) {
            return false;
        }
        log::info!("boot aborted");
        self.finish_boot();
        true
    }

    // -- Volume -------------------------------------------------------------

    /// Volume up. Drives the boot menu while the boot screen is up.
    pub fn volume_up(&mut self) -> bool {
        self.step_volume(true)
    }

    pub fn volume_down(&mut self) -> bool {
        self.step_volume(false)
    }

    fn step_volume(&mut self, up: bool) -> bool {
        if self.state.overlays.is_active(OverlayKind::BootScreen) {
            return self.boot_menu_move(up);
        }
        if !self.state.device.is_screen_on() {
            log::debug!("volume ignored: screen off");
            return false;
        }
        if self.transition_in_progress() {
            log::debug!("volume ignored: device {}", self.state.device);
            return false;
        }
        let step = self.config.volume_step;
        self.state.volume = if up {
            self.state.volume.saturating_add(step).min(100)
        } else {
            self.state.volume.saturating_sub(step)
        };
        log::debug!("volume {}", self.state.volume);
        if self.state.overlays.bump_volume_hud(true, &mut self.state.timers) {
            self.hooks
                .emit(&ShellEvent::OverlayShown(OverlayKind::VolumeHud));
        }
        true
    }
}
