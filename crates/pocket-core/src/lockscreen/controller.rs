//! Lock-screen gesture state machine and customizer draft.

use pocket_types::input::PointerRegion;

use super::config::{BackgroundEffect, LockScreenConfig, Orientation, PRESETS};
use crate::timer::{ShellTimers, TimerAction, TimerPurpose};

/// Where the lock-screen gesture machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    Idle,
    /// Pointer is down on the background and the hold timer is running.
    HoldPending,
    /// The customizer is open with an editable draft.
    Customizing,
}

/// What a pointer release means for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// A quick tap on the background: dismiss the lock screen.
    Unlock,
    Nothing,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    origin: (i32, i32),
    dragged: bool,
}

#[derive(Debug)]
pub struct LockSessionController {
    phase: LockPhase,
    gesture: Option<Gesture>,
    draft: Option<LockScreenConfig>,
    hold_ms: u64,
    drag_threshold_px: i32,
}

impl LockSessionController {
    pub fn new(hold_ms: u64, drag_threshold_px: i32) -> Self {
        Self {
            phase: LockPhase::Idle,
            gesture: None,
            draft: None,
            hold_ms,
            drag_threshold_px,
        }
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn is_customizing(&self) -> bool {
        self.phase == LockPhase::Customizing
    }

    /// Start a gesture. Only bare background starts the hold timer.
    pub fn pointer_down(
        &mut self,
        x: i32,
        y: i32,
        region: PointerRegion,
        timers: &mut ShellTimers,
    ) -> bool {
        if self.phase != LockPhase::Idle {
            return false;
        }
        if region == PointerRegion::Interactive {
            log::debug!("lock gesture ignored: interactive region at ({x}, {y})");
            return false;
        }
        self.gesture = Some(Gesture {
            origin: (x, y),
            dragged: false,
        });
        self.phase = LockPhase::HoldPending;
        timers.arm(TimerPurpose::LockHold, self.hold_ms, TimerAction::BeginCustomize);
        true
    }

    /// Track movement. Travel past the drag threshold turns the gesture into
    /// a drag: the hold is abandoned and release is no longer a tap.
    pub fn pointer_move(&mut self, x: i32, y: i32, timers: &mut ShellTimers) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if gesture.dragged {
            return;
        }
        // Widen before subtracting: coordinates span the whole i32 range.
        let dx = i64::from(x) - i64::from(gesture.origin.0);
        let dy = i64::from(y) - i64::from(gesture.origin.1);
        let limit = i64::from(self.drag_threshold_px);
        let travel = dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy));
        if travel > limit * limit {
            log::debug!("lock gesture became a drag");
            gesture.dragged = true;
            timers.cancel(TimerPurpose::LockHold);
            self.phase = LockPhase::Idle;
        }
    }

    /// Finish a gesture. A release before the hold expired, without a drag,
    /// is a tap.
    pub fn pointer_up(&mut self, timers: &mut ShellTimers) -> TapOutcome {
        let Some(gesture) = self.gesture.take() else {
            return TapOutcome::Nothing;
        };
        let was_pending = self.phase == LockPhase::HoldPending;
        timers.cancel(TimerPurpose::LockHold);
        if was_pending {
            self.phase = LockPhase::Idle;
        }
        if was_pending && !gesture.dragged {
            TapOutcome::Unlock
        } else {
            TapOutcome::Nothing
        }
    }

    /// Pointer left the surface or the platform cancelled the touch.
    pub fn abort_gesture(&mut self, timers: &mut ShellTimers) {
        if self.gesture.take().is_some() {
            timers.cancel(TimerPurpose::LockHold);
        }
        if self.phase == LockPhase::HoldPending {
            self.phase = LockPhase::Idle;
        }
    }

    /// The hold timer fired. Opens a draft of `current` if a hold was pending.
    pub fn hold_expired(&mut self, current: &LockScreenConfig) -> bool {
        if self.phase != LockPhase::HoldPending {
            return false;
        }
        self.gesture = None;
        self.draft = Some(current.clone());
        self.phase = LockPhase::Customizing;
        log::info!("lock-screen customizer opened");
        true
    }

    pub fn draft(&self) -> Option<&LockScreenConfig> {
        self.draft.as_ref()
    }

    fn draft_mut(&mut self) -> Option<&mut LockScreenConfig> {
        if self.phase == LockPhase::Customizing {
            self.draft.as_mut()
        } else {
            log::debug!("draft edit ignored: customizer closed");
            None
        }
    }

    pub fn set_preset(&mut self, index: usize) -> bool {
        self.draft_mut()
            .map(|d| d.preset_index = index % PRESETS.len())
            .is_some()
    }

    pub fn set_effect(&mut self, effect: BackgroundEffect) -> bool {
        self.draft_mut().map(|d| d.background_effect = effect).is_some()
    }

    /// Flip one widget. Unknown ids are added as enabled.
    pub fn toggle_widget(&mut self, id: &str) -> bool {
        self.draft_mut()
            .map(|d| {
                let on = d.active_widgets.entry(id.to_string()).or_insert(false);
                *on = !*on;
            })
            .is_some()
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        self.draft_mut().map(|d| d.orientation = orientation).is_some()
    }

    /// Close the customizer and hand back the draft.
    pub fn finish(&mut self) -> Option<LockScreenConfig> {
        if self.phase != LockPhase::Customizing {
            return None;
        }
        self.phase = LockPhase::Idle;
        self.draft.take()
    }

    /// Drop any gesture or draft.
    pub fn reset(&mut self, timers: &mut ShellTimers) {
        self.abort_gesture(timers);
        self.draft = None;
        self.phase = LockPhase::Idle;
    }
}
