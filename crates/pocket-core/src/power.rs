//! Power button press/hold tracking, the boot menu, and power-menu choices.
//!
//! These are the leaf pieces of the power state machine. The transitions
//! they drive (boot, shutdown, restart) live on
//! [`DeviceShell`](crate::shell::DeviceShell).

use crate::timer::{ShellTimers, TimerAction, TimerPurpose};

// ---------------------------------------------------------------------------
// Boot menu
// ---------------------------------------------------------------------------

/// Entries of the boot menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootMenuItem {
    Reboot,
    Recovery,
    FactoryReset,
    Barcodes,
    BootloaderLogs,
}

impl BootMenuItem {
    pub const ALL: [BootMenuItem; 5] = [
        BootMenuItem::Reboot,
        BootMenuItem::Recovery,
        BootMenuItem::FactoryReset,
        BootMenuItem::Barcodes,
        BootMenuItem::BootloaderLogs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Reboot => "Reboot",
            Self::Recovery => "Recovery mode",
            Self::FactoryReset => "Factory reset",
            Self::Barcodes => "Barcodes",
            Self::BootloaderLogs => "Bootloader logs",
        }
    }

    /// Items that run as a long task before the boot completes.
    pub fn is_task(self) -> bool {
        matches!(self, Self::Recovery | Self::FactoryReset)
    }

    /// Spinner text while a task item runs.
    pub fn task_message(self) -> &'static str {
        match self {
            Self::FactoryReset => "Erasing data...",
            _ => "Starting recovery...",
        }
    }

    /// Notification posted when a task item completes.
    pub fn completion_notice(self) -> (&'static str, &'static str) {
        match self {
            Self::FactoryReset => ("Factory reset", "Device data was erased"),
            _ => ("Recovery", "Recovery completed"),
        }
    }

    /// Transient status line for informational items.
    pub fn status_text(self) -> String {
        match self {
            Self::Barcodes => "Barcodes: SN 0000-POCKET".to_string(),
            Self::BootloaderLogs => "Bootloader logs: no errors".to_string(),
            other => format!("{}...", other.label()),
        }
    }
}

/// Selection cursor over [`BootMenuItem::ALL`].
#[derive(Debug, Clone, Default)]
pub struct BootMenu {
    selected: usize,
    status: Option<String>,
}

impl BootMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> BootMenuItem {
        BootMenuItem::ALL[self.selected % BootMenuItem::ALL.len()]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Move the cursor up, wrapping to the last item.
    pub fn move_up(&mut self) -> BootMenuItem {
        let n = BootMenuItem::ALL.len();
        self.selected = (self.selected + n - 1) % n;
        self.selected()
    }

    /// Move the cursor down, wrapping to the first item.
    pub fn move_down(&mut self) -> BootMenuItem {
        self.selected = (self.selected + 1) % BootMenuItem::ALL.len();
        self.selected()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Show `text` and (re)start its dismiss timer.
    pub fn set_status(&mut self, text: String, duration_ms: u64, timers: &mut ShellTimers) {
        self.status = Some(text);
        timers.arm(TimerPurpose::BootStatus, duration_ms, TimerAction::ClearBootStatus);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Back to the first item with no status line.
    pub fn reset(&mut self, timers: &mut ShellTimers) {
        self.selected = 0;
        self.status = None;
        timers.cancel(TimerPurpose::BootStatus);
    }
}

// ---------------------------------------------------------------------------
// Power menu
// ---------------------------------------------------------------------------

/// Options of the long-press power menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerMenuChoice {
    PowerOff,
    Restart,
    Lock,
    Dismiss,
}

impl PowerMenuChoice {
    pub const ALL: [PowerMenuChoice; 4] = [
        PowerMenuChoice::PowerOff,
        PowerMenuChoice::Restart,
        PowerMenuChoice::Lock,
        PowerMenuChoice::Dismiss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PowerOff => "Power off",
            Self::Restart => "Restart",
            Self::Lock => "Lock",
            Self::Dismiss => "Cancel",
        }
    }

    /// Case-insensitive lookup accepting a few spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "poweroff" | "power-off" | "shutdown" => Some(Self::PowerOff),
            "restart" | "reboot" => Some(Self::Restart),
            "lock" => Some(Self::Lock),
            "dismiss" | "cancel" => Some(Self::Dismiss),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Power button
// ---------------------------------------------------------------------------

/// What a power release asks the shell to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Short press: flip the screen between off and on.
    TogglePower,
    /// Nothing to do (the hold already fired, or no press was tracked).
    Ignored,
}

/// Press/hold tracking for the power button.
#[derive(Debug)]
pub struct PowerController {
    pressed_at_ms: Option<u64>,
    hold_fired: bool,
    hold_ms: u64,
}

impl PowerController {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            pressed_at_ms: None,
            hold_fired: false,
            hold_ms,
        }
    }

    /// Record a press. When `arm_hold` is set, holding past the threshold
    /// opens the power menu. A repeated press without a release is ignored.
    pub fn press(&mut self, arm_hold: bool, timers: &mut ShellTimers) -> bool {
        if self.pressed_at_ms.is_some() {
            log::debug!("power press ignored: already down");
            return false;
        }
        self.pressed_at_ms = Some(timers.now_ms());
        self.hold_fired = false;
        if arm_hold {
            timers.arm(TimerPurpose::PowerHold, self.hold_ms, TimerAction::OpenPowerMenu);
        }
        true
    }

    /// The hold timer fired while the button is still down.
    pub fn mark_hold_fired(&mut self) {
        if self.pressed_at_ms.is_some() {
            self.hold_fired = true;
        }
    }

    pub fn release(&mut self, timers: &mut ShellTimers) -> ReleaseOutcome {
        timers.cancel(TimerPurpose::PowerHold);
        let Some(at) = self.pressed_at_ms.take() else {
            return ReleaseOutcome::Ignored;
        };
        let held = timers.now_ms().saturating_sub(at);
        if std::mem::take(&mut self.hold_fired) {
            log::debug!("power release after {held}ms hold: menu already open");
            ReleaseOutcome::Ignored
        } else {
            log::debug!("power short press ({held}ms)");
            ReleaseOutcome::TogglePower
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at_ms.is_some()
    }

    /// Forget any in-flight press.
    pub fn reset(&mut self, timers: &mut ShellTimers) {
        self.pressed_at_ms = None;
        self.hold_fired = false;
        timers.cancel(TimerPurpose::PowerHold);
    }
}
