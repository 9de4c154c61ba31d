//! Purpose-keyed timers driven by a virtual millisecond clock.
//!
//! Every delayed or repeating behaviour in the shell (boot delay, hold
//! gestures, auto-dismiss) is an entry here, keyed by what it is *for*.
//! Arming a purpose that already has a live entry replaces it, so a purpose
//! never has two pending callbacks.
//!
//! The registry never runs anything itself. The owner pulls due entries one
//! at a time with [`TimerRegistry::pop_due`] and handles each before pulling
//! the next, so a handler that re-arms or cancels a purpose is seen by the
//! following pull.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::power::BootMenuItem;
use crate::shell::SystemTask;

/// Whether an entry fires once or repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    OneShot,
    Periodic,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    kind: TimerKind,
    duration_ms: u64,
    due_ms: u64,
    seq: u64,
    action: A,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<P, A> {
    pub purpose: P,
    pub action: A,
    /// Virtual time at which the entry was due.
    pub at_ms: u64,
}

/// Registry of pending timers keyed by purpose.
#[derive(Debug)]
pub struct TimerRegistry<P, A> {
    entries: HashMap<P, Entry<A>>,
    now_ms: u64,
    next_seq: u64,
}

impl<P, A> TimerRegistry<P, A>
where
    P: Copy + Eq + Hash + Debug,
    A: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            now_ms: 0,
            next_seq: 0,
        }
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a one-shot `action` after `duration_ms`, replacing any live
    /// entry for `purpose`.
    pub fn arm(&mut self, purpose: P, duration_ms: u64, action: A) {
        self.insert(purpose, TimerKind::OneShot, duration_ms, action);
    }

    /// Schedule a repeating `action` every `interval_ms`, replacing any live
    /// entry for `purpose`. Intervals below 1 ms are treated as 1 ms.
    pub fn arm_periodic(&mut self, purpose: P, interval_ms: u64, action: A) {
        self.insert(purpose, TimerKind::Periodic, interval_ms.max(1), action);
    }

    fn insert(&mut self, purpose: P, kind: TimerKind, duration_ms: u64, action: A) {
        let seq = self.bump_seq();
        let replaced = self
            .entries
            .insert(
                purpose,
                Entry {
                    kind,
                    duration_ms,
                    due_ms: self.now_ms.saturating_add(duration_ms),
                    seq,
                    action,
                },
            )
            .is_some();
        log::trace!("timer {purpose:?} armed for {duration_ms}ms (replaced: {replaced})");
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel the entry for `purpose`. Returns whether one was pending.
    pub fn cancel(&mut self, purpose: P) -> bool {
        self.entries.remove(&purpose).is_some()
    }

    /// Drop every pending entry.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_armed(&self, purpose: P) -> bool {
        self.entries.contains_key(&purpose)
    }

    pub fn kind(&self, purpose: P) -> Option<TimerKind> {
        self.entries.get(&purpose).map(|e| e.kind)
    }

    /// Milliseconds until `purpose` next fires.
    pub fn remaining(&self, purpose: P) -> Option<u64> {
        self.entries
            .get(&purpose)
            .map(|e| e.due_ms.saturating_sub(self.now_ms))
    }

    /// Number of pending entries.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Virtual time of the earliest pending entry.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.values().map(|e| e.due_ms).min()
    }

    /// Take the earliest entry due at or before `until_ms`, moving the clock
    /// to its due time. Ties go to the entry armed first. Periodic entries
    /// are rescheduled rather than removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<P, A>> {
        let purpose = self
            .entries
            .iter()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(p, _)| *p)?;

        let seq = self.bump_seq();
        let entry = self.entries.get_mut(&purpose)?;
        let at_ms = entry.due_ms;
        self.now_ms = self.now_ms.max(at_ms);

        let action = match entry.kind {
            TimerKind::Periodic => {
                let next = entry.due_ms.saturating_add(entry.duration_ms);
                if next == entry.due_ms {
                    // Cannot recur past the end of virtual time.
                    self.entries.remove(&purpose)?.action
                } else {
                    entry.due_ms = next;
                    entry.seq = seq;
                    entry.action.clone()
                }
            },
            TimerKind::OneShot => self.entries.remove(&purpose)?.action,
        };
        Some(Fired {
            purpose,
            action,
            at_ms,
        })
    }

    /// Move the clock forward to `until_ms` without firing anything. Callers
    /// drain [`pop_due`](Self::pop_due) first.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

impl<P, A> Default for TimerRegistry<P, A>
where
    P: Copy + Eq + Hash + Debug,
    A: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shell timer vocabulary
// ---------------------------------------------------------------------------

/// What a shell timer is for. At most one entry per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Power button held long enough to open the power menu.
    PowerHold,
    /// Shutdown or restart delay.
    PowerSequence,
    /// Boot screen delay.
    Boot,
    /// Recovery / factory reset launched from the boot menu.
    BootTask,
    /// Boot menu status line.
    BootStatus,
    /// Lock-screen and home-widget clock refresh.
    ClockTick,
    /// Lock-screen hold-to-customize gesture.
    LockHold,
    /// Lock-screen notification peek.
    LockPeek,
    /// Volume HUD auto-dismiss.
    VolumeHud,
    /// Long-running simulated settings operation.
    SystemTask,
}

/// What to do when a shell timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    OpenPowerMenu,
    FinishShutdown,
    FinishRestart,
    FinishBoot,
    FinishBootTask(BootMenuItem),
    ClearBootStatus,
    ClockTick,
    BeginCustomize,
    ClearPeek,
    DismissVolumeHud,
    FinishSystemTask(SystemTask),
}

/// The registry type used by the device shell.
pub type ShellTimers = TimerRegistry<TimerPurpose, TimerAction>;
