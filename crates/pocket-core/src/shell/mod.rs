//! The device session: one owned aggregate of all shell state plus the
//! command surface front ends and apps call into.
//!
//! Every change to the visible surfaces goes through
//! [`DeviceShell::hide_overlays`] or [`DeviceShell::show_exclusive`], and
//! every delayed behaviour is a [`ShellTimers`] entry drained by
//! [`DeviceShell::advance`].

mod input;
mod lock_flow;
mod power_flow;


use std::fmt;

use pocket_platform::{KeyValueStore, TimeService};
use pocket_types::config::ShellConfig;

use crate::history::{HOME_SCREEN, NavigationHistory, is_pseudo_view};
use crate::hooks::{ShellEvent, ShellHooks};
use crate::lockscreen::{LockPhase, LockScreenConfig, LockSessionController, store as lock_store};
use crate::notify::NotificationCenter;
use crate::overlay::{ExclusiveOverlay, OverlayKind, OverlaySet};
use crate::power::{BootMenu, PowerController};
use crate::timer::{ShellTimers, TimerAction, TimerPurpose};

/// Store key of the persisted bootloader flag (`"true"` / `"false"`).
pub const BOOTLOADER_KEY: &str = "bootloaderUnlocked";
/// App id shown by the camera shortcut.
pub const CAMERA_APP: &str = "cameraApp";
/// Initial volume level.
pub const DEFAULT_VOLUME: u8 = 50;

/// Top-level power state. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Off,
    Booting,
    Locked,
    Unlocked,
    /// A transient full-screen message (shutdown, restart, system task).
    SystemMessage,
}

impl DeviceState {
    pub fn is_screen_on(self) -> bool {
        self != Self::Off
    }

    /// Locked or unlocked: the states a user interacts with.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Locked | Self::Unlocked)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Booting => "booting",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::SystemMessage => "system message",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Simulated long-running settings operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemTask {
    BootloaderUnlock,
    BootloaderRelock,
    FactoryWipe,
}

impl SystemTask {
    fn message(self) -> &'static str {
        match self {
            Self::BootloaderUnlock => "Unlocking bootloader...",
            Self::BootloaderRelock => "Locking bootloader...",
            Self::FactoryWipe => "Erasing all data...",
        }
    }
}

/// Actions that only run after an explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
    BootloaderUnlock,
    BootloaderRelock,
    FactoryWipe,
    DeleteProfile(String),
}

impl DestructiveAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::BootloaderUnlock => "Unlock the bootloader?".to_string(),
            Self::BootloaderRelock => "Relock the bootloader?".to_string(),
            Self::FactoryWipe => "Erase all data and restart?".to_string(),
            Self::DeleteProfile(name) => format!("Delete lock-screen profile '{name}'?"),
        }
    }
}

/// All mutable session state, owned by [`DeviceShell`].
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) device: DeviceState,
    pub(crate) overlays: OverlaySet,
    pub(crate) history: NavigationHistory,
    pub(crate) notifications: NotificationCenter,
    pub(crate) timers: ShellTimers,
    pub(crate) current_view: String,
    pub(crate) lock_config: LockScreenConfig,
    pub(crate) boot_menu: BootMenu,
    pub(crate) volume: u8,
    pub(crate) flashlight: bool,
    pub(crate) bootloader_unlocked: bool,
    pub(crate) clock_text: String,
    pub(crate) clock_ticks: u64,
    pub(crate) lock_redraws: u64,
    pub(crate) pending_confirmation: Option<DestructiveAction>,
}

/// A simulated device: power state, overlays, navigation, notifications and
/// the lock screen, driven by hardware events and a virtual clock.
pub struct DeviceShell {
    config: ShellConfig,
    state: SessionState,
    lock_session: LockSessionController,
    power: PowerController,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn TimeService>,
    hooks: ShellHooks,
}

impl DeviceShell {
    /// Build a powered-off device. Persisted lock-screen settings and the
    /// bootloader flag are read from `store`.
    pub fn new(
        config: ShellConfig,
        mut store: Box<dyn KeyValueStore>,
        clock: Box<dyn TimeService>,
    ) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("invalid shell config: {e}");
        }
        let lock_config = lock_store::load_config(&mut *store);
        let bootloader_unlocked = match store.get(BOOTLOADER_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::warn!("failed to read {BOOTLOADER_KEY}: {e}");
                false
            },
        };
        let state = SessionState {
            device: DeviceState::Off,
            overlays: OverlaySet::new(config.volume_hud_ms),
            history: NavigationHistory::new(config.history_limit),
            notifications: NotificationCenter::new(config.lock_peek_ms),
            timers: ShellTimers::new(),
            current_view: HOME_SCREEN.to_string(),
            lock_config,
            boot_menu: BootMenu::new(),
            volume: DEFAULT_VOLUME,
            flashlight: false,
            bootloader_unlocked,
            clock_text: "--:--".to_string(),
            clock_ticks: 0,
            lock_redraws: 0,
            pending_confirmation: None,
        };
        Self {
            lock_session: LockSessionController::new(config.lock_hold_ms, config.drag_threshold_px),
            power: PowerController::new(config.power_hold_ms),
            config,
            state,
            store,
            clock,
            hooks: ShellHooks::new(),
        }
    }

    /// Register an observer for [`ShellEvent`]s.
    pub fn on_event(&mut self, hook: impl FnMut(&ShellEvent) + 'static) {
        self.hooks.add(Box::new(hook));
    }

    // -- Virtual time -------------------------------------------------------

    /// Move the virtual clock forward by `dt_ms`, running every timer that
    /// comes due in deadline order.
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.state.timers.now_ms().saturating_add(dt_ms);
        while let Some(fired) = self.state.timers.pop_due(until) {
            log::trace!("timer {:?} fired at {}ms", fired.purpose, fired.at_ms);
            self.on_timer(fired.action);
        }
        self.state.timers.settle(until);
    }

    fn on_timer(&mut self, action: TimerAction) {
        match action {
            TimerAction::OpenPowerMenu => self.open_power_menu(),
            TimerAction::FinishShutdown => self.finish_shutdown(),
            TimerAction::FinishRestart => self.finish_restart(),
            TimerAction::FinishBoot => self.finish_boot(),
            TimerAction::FinishBootTask(item) => self.finish_boot_task(item),
            TimerAction::ClearBootStatus => self.state.boot_menu.clear_status(),
            TimerAction::ClockTick => self.refresh_clock(),
            TimerAction::BeginCustomize => self.begin_customize(),
            TimerAction::ClearPeek => {
                if self.state.notifications.clear_peek(&mut self.state.timers) {
                    self.hooks.emit(&ShellEvent::PeekCleared);
                }
            },
            TimerAction::DismissVolumeHud => {
                if self.state.overlays.hide(OverlayKind::VolumeHud) {
                    self.hooks.emit(&ShellEvent::OverlaysCleared);
                }
            },
            TimerAction::FinishSystemTask(task) => self.finish_system_task(task),
        }
    }

    // -- Overlay gate -------------------------------------------------------

    /// Deactivate every overlay.
    pub fn hide_overlays(&mut self) {
        self.state.timers.cancel(TimerPurpose::VolumeHud);
        if self.state.overlays.hide_all() {
            self.hooks.emit(&ShellEvent::OverlaysCleared);
        }
    }

    /// Clear all overlays and activate `overlay`. Screen-on-only overlays
    /// are dropped while the device is off.
    pub fn show_exclusive(&mut self, overlay: ExclusiveOverlay) -> bool {
        let kind = overlay.kind();
        let needs_screen = matches!(
            kind,
            OverlayKind::PowerMenu | OverlayKind::AlbumArt | OverlayKind::LockCustomize
        );
        if needs_screen && !self.state.device.is_screen_on() {
            log::debug!("{} dropped: screen off", kind.label());
            return false;
        }
        self.state.timers.cancel(TimerPurpose::VolumeHud);
        self.state.overlays.show_exclusive(overlay);
        self.hooks.emit(&ShellEvent::OverlayShown(kind));
        true
    }

    /// A boot, power sequence, or system message owns the screen. The shade
    /// and the volume HUD stay closed until it ends.
    pub(super) fn transition_in_progress(&self) -> bool {
        matches!(
            self.state.device,
            DeviceState::Booting | DeviceState::SystemMessage
        ) || matches!(
            self.state.overlays.exclusive_kind(),
            Some(OverlayKind::SystemMessage | OverlayKind::BootScreen)
        )
    }

    fn set_device(&mut self, to: DeviceState) {
        let from = self.state.device;
        if from == to {
            return;
        }
        log::info!("device {from} -> {to}");
        self.state.device = to;
        self.hooks.emit(&ShellEvent::StateChanged { from, to });
    }

    // -- Navigation ---------------------------------------------------------

    /// Bring `app_id` to the foreground. Pseudo-views are shown without
    /// being recorded. Only works while unlocked.
    pub fn show_app(&mut self, app_id: &str) -> bool {
        if self.state.device != DeviceState::Unlocked {
            log::debug!("show_app({app_id}) ignored: device {}", self.state.device);
            return false;
        }
        self.hide_overlays();
        if !is_pseudo_view(app_id) {
            self.state.history.push(app_id);
        }
        self.show_view(app_id.to_string());
        true
    }

    /// Return to the previous view (home when there is none).
    pub fn navigate_back(&mut self) -> bool {
        if self.state.device != DeviceState::Unlocked {
            log::debug!("back ignored: device {}", self.state.device);
            return false;
        }
        self.hide_overlays();
        let view = self.state.history.back();
        self.show_view(view);
        true
    }

    fn show_view(&mut self, view: String) {
        log::debug!("view shown: {view}");
        self.state.current_view = view.clone();
        self.hooks.emit(&ShellEvent::ViewShown(view));
    }

    // -- Notifications and messages ----------------------------------------

    /// Post a notification. It peeks on the lock screen while locked.
    pub fn create_notification(&mut self, title: &str, message: &str) -> u64 {
        let locked = self.state.device == DeviceState::Locked;
        let id = self
            .state
            .notifications
            .post(title, message, locked, &mut self.state.timers);
        self.hooks.emit(&ShellEvent::NotificationPosted {
            id,
            title: title.to_string(),
        });
        id
    }

    pub fn show_system_message(&mut self, text: &str, with_spinner: bool) -> bool {
        if !self.state.device.is_screen_on() {
            log::debug!("system message dropped: screen off");
            return false;
        }
        self.show_exclusive(ExclusiveOverlay::message(text, with_spinner))
    }

    pub fn hide_system_message(&mut self) -> bool {
        let hidden = self.state.overlays.hide(OverlayKind::SystemMessage);
        if hidden {
            self.hooks.emit(&ShellEvent::OverlaysCleared);
        }
        hidden
    }

    // -- Screen-on controls -------------------------------------------------

    /// Open or close the notification shade. Opening marks everything read.
    pub fn toggle_notification_shade(&mut self) -> bool {
        if !self.state.overlays.is_active(OverlayKind::NotificationShade)
            && self.transition_in_progress()
        {
            log::debug!("shade ignored: device {}", self.state.device);
            return false;
        }
        let screen_on = self.state.device.is_screen_on();
        let open = self.state.overlays.toggle(
            OverlayKind::NotificationShade,
            screen_on,
            &mut self.state.timers,
        );
        if open {
            self.state.notifications.mark_all_read();
            self.hooks.emit(&ShellEvent::OverlayShown(OverlayKind::NotificationShade));
        }
        open
    }

    pub fn show_album_art(&mut self) -> bool {
        if !self.state.device.is_interactive() {
            log::debug!("album art ignored: device {}", self.state.device);
            return false;
        }
        self.show_exclusive(ExclusiveOverlay::AlbumArt)
    }

    pub fn hide_album_art(&mut self) -> bool {
        let hidden = self.state.overlays.hide(OverlayKind::AlbumArt);
        if hidden {
            self.hooks.emit(&ShellEvent::OverlaysCleared);
        }
        hidden
    }

    /// Show the camera app. Unlocked only.
    pub fn open_camera(&mut self) -> bool {
        self.show_app(CAMERA_APP)
    }

    pub fn toggle_flashlight(&mut self) -> bool {
        if !self.state.device.is_screen_on() {
            log::debug!("flashlight ignored: screen off");
            return false;
        }
        self.state.flashlight = !self.state.flashlight;
        log::info!("flashlight {}", if self.state.flashlight { "on" } else { "off" });
        true
    }

    /// Snap key: record a screenshot notification.
    pub fn take_screenshot(&mut self) -> bool {
        if !self.state.device.is_interactive() {
            log::debug!("screenshot ignored: device {}", self.state.device);
            return false;
        }
        let view = if self.state.device == DeviceState::Locked {
            "lock screen".to_string()
        } else {
            self.state.current_view.clone()
        };
        self.create_notification("Screenshot saved", &format!("Captured {view}"));
        true
    }

    fn refresh_clock(&mut self) {
        match self.clock.now() {
            Ok(now) => {
                self.state.clock_text = now.clock_text();
                self.state.clock_ticks += 1;
                self.hooks
                    .emit(&ShellEvent::ClockTicked(self.state.clock_text.clone()));
            },
            Err(e) => log::warn!("clock unavailable: {e}"),
        }
    }

    // -- Read accessors -----------------------------------------------------

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn state(&self) -> DeviceState {
        self.state.device
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.state.overlays
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.state.history
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.state.notifications
    }

    pub fn timers(&self) -> &ShellTimers {
        &self.state.timers
    }

    pub fn now_ms(&self) -> u64 {
        self.state.timers.now_ms()
    }

    /// The view on screen while unlocked.
    pub fn current_view(&self) -> &str {
        &self.state.current_view
    }

    pub fn lock_config(&self) -> &LockScreenConfig {
        &self.state.lock_config
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock_session.phase()
    }

    pub fn lock_draft(&self) -> Option<&LockScreenConfig> {
        self.lock_session.draft()
    }

    /// How many times the lock screen was drawn.
    pub fn lock_redraws(&self) -> u64 {
        self.state.lock_redraws
    }

    pub fn boot_menu(&self) -> &BootMenu {
        &self.state.boot_menu
    }

    pub fn volume(&self) -> u8 {
        self.state.volume
    }

    pub fn flashlight_on(&self) -> bool {
        self.state.flashlight
    }

    pub fn bootloader_unlocked(&self) -> bool {
        self.state.bootloader_unlocked
    }

    pub fn clock_text(&self) -> &str {
        &self.state.clock_text
    }

    pub fn clock_ticks(&self) -> u64 {
        self.state.clock_ticks
    }

    pub fn pending_confirmation(&self) -> Option<&DestructiveAction> {
        self.state.pending_confirmation.as_ref()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        &*self.store
    }
}

impl fmt::Debug for DeviceShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceShell")
            .field("state", &self.state.device)
            .field("overlays", &self.state.overlays.active_kinds())
            .field("view", &self.state.current_view)
            .field("now_ms", &self.state.timers.now_ms())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
