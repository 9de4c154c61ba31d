//! Lock screen, customizer, profiles, and confirmation-gated settings
//! actions.

use pocket_types::input::PointerRegion;

use super::{BOOTLOADER_KEY, DestructiveAction, DeviceShell, DeviceState, SystemTask};
use crate::history::HOME_SCREEN;
use crate::hooks::ShellEvent;
use crate::lockscreen::{
    BackgroundEffect, LockConfigPatch, LockScreenConfig, Orientation, TapOutcome,
    store as lock_store,
};
use crate::overlay::ExclusiveOverlay;
use crate::timer::{TimerAction, TimerPurpose};

const LOCK_SCREEN_TITLE: &str = "Lock screen";

impl DeviceShell {
    /// Clear overlays and show the lock screen. Also the exit path of the
    /// customizer.
    pub fn show_lock_screen(&mut self) {
        self.lock_session.reset(&mut self.state.timers);
        self.hide_overlays();
        self.set_device(DeviceState::Locked);
        self.redraw_lock_screen();
    }

    fn redraw_lock_screen(&mut self) {
        self.state.lock_redraws += 1;
        self.hooks.emit(&ShellEvent::LockScreenRedrawn);
    }

    /// Lock an interactive device.
    pub fn lock(&mut self) -> bool {
        if !self.state.device.is_interactive() {
            log::debug!("lock ignored: device {}", self.state.device);
            return false;
        }
        self.show_lock_screen();
        true
    }

    /// Dismiss the lock screen to the last foreground app.
    pub fn unlock(&mut self) -> bool {
        if self.state.device != DeviceState::Locked {
            log::debug!("unlock ignored: device {}", self.state.device);
            return false;
        }
        // An open customizer is discarded through the lock screen first.
        self.cancel_customizer();
        self.lock_session.reset(&mut self.state.timers);
        self.state.notifications.clear_peek(&mut self.state.timers);
        self.hide_overlays();
        self.set_device(DeviceState::Unlocked);
        if self.state.history.is_empty() {
            self.state.history.push(HOME_SCREEN);
        }
        let view = self.state.history.top().unwrap_or(HOME_SCREEN).to_string();
        self.show_view(view);
        true
    }

    /// Pointer streams reach the gesture machine only on the bare lock
    /// screen.
    fn lock_surface_active(&self) -> bool {
        self.state.device == DeviceState::Locked && self.state.overlays.exclusive().is_none()
    }

    pub(super) fn lock_pointer_down(&mut self, x: i32, y: i32, region: PointerRegion) {
        if self.lock_surface_active() {
            self.lock_session.pointer_down(x, y, region, &mut self.state.timers);
        }
    }

    pub(super) fn lock_pointer_move(&mut self, x: i32, y: i32) {
        self.lock_session.pointer_move(x, y, &mut self.state.timers);
    }

    pub(super) fn lock_pointer_up(&mut self) {
        let outcome = self.lock_session.pointer_up(&mut self.state.timers);
        if outcome == TapOutcome::Unlock && self.lock_surface_active() {
            self.unlock();
        }
    }

    pub(super) fn lock_pointer_abort(&mut self) {
        self.lock_session.abort_gesture(&mut self.state.timers);
    }

    /// The hold timer fired: open the customizer.
    pub(super) fn begin_customize(&mut self) {
        if self.state.device != DeviceState::Locked {
            self.lock_session.reset(&mut self.state.timers);
            return;
        }
        if self.lock_session.hold_expired(&self.state.lock_config) {
            self.show_exclusive(ExclusiveOverlay::LockCustomize);
        }
    }

    // -- Customizer draft ---------------------------------------------------

    pub fn set_draft_preset(&mut self, index: usize) -> bool {
        self.lock_session.set_preset(index)
    }

    pub fn set_draft_effect(&mut self, effect: BackgroundEffect) -> bool {
        self.lock_session.set_effect(effect)
    }

    pub fn toggle_draft_widget(&mut self, id: &str) -> bool {
        self.lock_session.toggle_widget(id)
    }

    pub fn set_draft_orientation(&mut self, orientation: Orientation) -> bool {
        self.lock_session.set_orientation(orientation)
    }

    /// Apply the draft and return to the lock screen.
    pub fn apply_customizer(&mut self) -> bool {
        let Some(draft) = self.lock_session.finish() else {
            return false;
        };
        self.merge_lock_config(&LockConfigPatch::from(&draft));
        self.show_lock_screen();
        true
    }

    /// Discard the draft and return to the lock screen.
    pub fn cancel_customizer(&mut self) -> bool {
        if self.lock_session.finish().is_none() {
            return false;
        }
        self.show_lock_screen();
        true
    }

    // -- Configuration ------------------------------------------------------

    /// Merge `patch` into the current configuration, persist it, and redraw.
    pub fn apply_lock_screen_config(&mut self, patch: LockConfigPatch) {
        self.merge_lock_config(&patch);
        self.redraw_lock_screen();
    }

    fn merge_lock_config(&mut self, patch: &LockConfigPatch) {
        self.state.lock_config = self.state.lock_config.merged(patch);
        lock_store::save_config(&mut *self.store, &self.state.lock_config);
        log::info!(
            "lock screen: preset {}, widgets {:?}",
            self.state.lock_config.preset_name(),
            self.state.lock_config.enabled_widgets()
        );
    }

    // -- Profiles -----------------------------------------------------------

    /// Names of saved profiles, sorted.
    pub fn lock_profiles(&self) -> Vec<String> {
        lock_store::load_profiles(&*self.store).into_keys().collect()
    }

    /// Save the current configuration under `name`, replacing any profile
    /// of that name.
    pub fn save_lock_profile(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            log::debug!("profile save ignored: empty name");
            return false;
        }
        let mut profiles = lock_store::load_profiles(&*self.store);
        profiles.insert(name.to_string(), self.state.lock_config.clone());
        if !lock_store::save_profiles(&mut *self.store, &profiles) {
            return false;
        }
        self.create_notification(LOCK_SCREEN_TITLE, &format!("Profile '{name}' saved"));
        true
    }

    /// Apply a saved profile. A missing profile is reported as a
    /// notification.
    pub fn load_lock_profile(&mut self, name: &str) -> bool {
        let profiles = lock_store::load_profiles(&*self.store);
        match profiles.get(name.trim()) {
            Some(config) => {
                self.apply_lock_screen_config(LockConfigPatch::from(config));
                true
            },
            None => {
                self.create_notification(LOCK_SCREEN_TITLE, "Profile not found");
                false
            },
        }
    }

    /// Ask to delete a saved profile.
    pub fn delete_lock_profile(&mut self, name: &str) -> bool {
        let name = name.trim();
        if !lock_store::load_profiles(&*self.store).contains_key(name) {
            self.create_notification(LOCK_SCREEN_TITLE, "Profile not found");
            return false;
        }
        self.request_confirmation(DestructiveAction::DeleteProfile(name.to_string()))
    }

    // -- Confirmation-gated actions -----------------------------------------

    /// Ask to unlock or relock the bootloader.
    pub fn set_bootloader_unlocked(&mut self, unlocked: bool) -> bool {
        let action = if unlocked {
            DestructiveAction::BootloaderUnlock
        } else {
            DestructiveAction::BootloaderRelock
        };
        self.request_confirmation(action)
    }

    /// Ask to erase all data and restart.
    pub fn factory_wipe(&mut self) -> bool {
        self.request_confirmation(DestructiveAction::FactoryWipe)
    }

    /// Stage `action` until [`resolve_confirmation`](Self::resolve_confirmation).
    /// A newer request replaces an unanswered one.
    pub fn request_confirmation(&mut self, action: DestructiveAction) -> bool {
        let allowed = match &action {
            DestructiveAction::BootloaderUnlock => {
                self.state.device == DeviceState::Unlocked && !self.state.bootloader_unlocked
            },
            DestructiveAction::BootloaderRelock => {
                self.state.device == DeviceState::Unlocked && self.state.bootloader_unlocked
            },
            DestructiveAction::FactoryWipe => self.state.device == DeviceState::Unlocked,
            DestructiveAction::DeleteProfile(_) => self.state.device.is_interactive(),
        };
        if !allowed {
            log::debug!("{action:?} not available: device {}", self.state.device);
            return false;
        }
        log::info!("confirm: {}", action.prompt());
        self.state.pending_confirmation = Some(action);
        true
    }

    /// Answer the staged confirmation. Declining changes nothing.
    pub fn resolve_confirmation(&mut self, accepted: bool) -> bool {
        let Some(action) = self.state.pending_confirmation.take() else {
            return false;
        };
        if !accepted {
            log::debug!("{action:?} declined");
            return false;
        }
        let needs_unlocked = !matches!(action, DestructiveAction::DeleteProfile(_));
        if needs_unlocked && self.state.device != DeviceState::Unlocked {
            log::debug!("{action:?} dropped: device {}", self.state.device);
            return false;
        }
        match action {
            DestructiveAction::BootloaderUnlock => {
                self.start_system_task(SystemTask::BootloaderUnlock)
            },
            DestructiveAction::BootloaderRelock => {
                self.start_system_task(SystemTask::BootloaderRelock)
            },
            DestructiveAction::FactoryWipe => self.start_system_task(SystemTask::FactoryWipe),
            DestructiveAction::DeleteProfile(name) => {
                let mut profiles = lock_store::load_profiles(&*self.store);
                if profiles.remove(&name).is_some()
                    && lock_store::save_profiles(&mut *self.store, &profiles)
                {
                    self.create_notification(
                        LOCK_SCREEN_TITLE,
                        &format!("Profile '{name}' deleted"),
                    );
                }
            },
        }
        true
    }

    fn start_system_task(&mut self, task: SystemTask) {
        let duration_ms = match task {
            SystemTask::FactoryWipe => self.config.factory_wipe_ms,
            _ => self.config.bootloader_op_ms,
        };
        self.hide_overlays();
        self.show_exclusive(ExclusiveOverlay::message(task.message(), true));
        self.set_device(DeviceState::SystemMessage);
        self.state.timers.arm(
            TimerPurpose::SystemTask,
            duration_ms,
            TimerAction::FinishSystemTask(task),
        );
    }

    pub(super) fn finish_system_task(&mut self, task: SystemTask) {
        match task {
            SystemTask::BootloaderUnlock | SystemTask::BootloaderRelock => {
                let unlocked = task == SystemTask::BootloaderUnlock;
                self.state.bootloader_unlocked = unlocked;
                if let Err(e) = self
                    .store
                    .set(BOOTLOADER_KEY, if unlocked { "true" } else { "false" })
                {
                    log::warn!("failed to write {BOOTLOADER_KEY}: {e}");
                }
                self.hide_overlays();
                self.set_device(DeviceState::Unlocked);
                let view = self.state.current_view.clone();
                self.show_view(view);
                let message = if unlocked {
                    "Bootloader unlocked"
                } else {
                    "Bootloader locked"
                };
                self.create_notification("System", message);
            },
            SystemTask::FactoryWipe => {
                self.wipe_user_data();
                self.begin_restart();
            },
        }
    }

    /// Erase the store and reset everything it backs to defaults.
    pub(super) fn wipe_user_data(&mut self) {
        log::info!("erasing user data");
        if let Err(e) = self.store.clear() {
            log::warn!("failed to clear store: {e}");
        }
        self.state.lock_config = LockScreenConfig::default();
        lock_store::save_config(&mut *self.store, &self.state.lock_config);
        self.state.bootloader_unlocked = false;
        self.state.notifications.clear_all(&mut self.state.timers);
        self.state.history.clear();
        self.state.current_view = HOME_SCREEN.to_string();
    }
}
