//! Notification log and the lock-screen peek.

use std::collections::VecDeque;

use crate::timer::{ShellTimers, TimerAction, TimerPurpose};

/// A posted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    /// Virtual time of posting.
    pub created_at_ms: u64,
    pub read: bool,
}

/// In-memory, newest-first notification log.
#[derive(Debug)]
pub struct NotificationCenter {
    list: VecDeque<Notification>,
    peek: Option<Notification>,
    next_id: u64,
    peek_ms: u64,
}

impl NotificationCenter {
    /// `peek_ms` is how long a lock-screen peek stays visible.
    pub fn new(peek_ms: u64) -> Self {
        Self {
            list: VecDeque::new(),
            peek: None,
            next_id: 1,
            peek_ms,
        }
    }

    /// Prepend a notification. While `locked`, it also becomes the peek and
    /// the peek timer restarts.
    pub fn post(
        &mut self,
        title: &str,
        message: &str,
        locked: bool,
        timers: &mut ShellTimers,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let notification = Notification {
            id,
            title: title.to_string(),
            message: message.to_string(),
            created_at_ms: timers.now_ms(),
            read: false,
        };
        log::info!("notification #{id}: {title}: {message}");
        if locked {
            self.peek = Some(notification.clone());
            timers.arm(TimerPurpose::LockPeek, self.peek_ms, TimerAction::ClearPeek);
        }
        self.list.push_front(notification);
        id
    }

    /// Drop the peek and its timer. Returns whether one was showing.
    pub fn clear_peek(&mut self, timers: &mut ShellTimers) -> bool {
        timers.cancel(TimerPurpose::LockPeek);
        self.peek.take().is_some()
    }

    /// Empty the log and any visible peek.
    pub fn clear_all(&mut self, timers: &mut ShellTimers) {
        self.list.clear();
        self.clear_peek(timers);
    }

    /// Mark everything read (the shade was opened).
    pub fn mark_all_read(&mut self) {
        for n in &mut self.list {
            n.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.list.iter().filter(|n| !n.read).count()
    }

    pub fn peek(&self) -> Option<&Notification> {
        self.peek.as_ref()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.list.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.list.front()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
