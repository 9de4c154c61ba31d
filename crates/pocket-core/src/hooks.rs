//! Observer hooks for shell state changes.
//!
//! Front ends register closures with
//! [`DeviceShell::on_event`](crate::shell::DeviceShell::on_event) to redraw
//! or log when the session changes. Hooks observe; they cannot veto.

use std::fmt;

use crate::overlay::OverlayKind;
use crate::shell::DeviceState;

/// Something observable happened in the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    StateChanged { from: DeviceState, to: DeviceState },
    OverlayShown(OverlayKind),
    OverlaysCleared,
    /// A foreground view (app or pseudo-view) was shown.
    ViewShown(String),
    NotificationPosted { id: u64, title: String },
    LockScreenRedrawn,
    /// The lock-screen peek expired.
    PeekCleared,
    /// The clock text was refreshed.
    ClockTicked(String),
}

pub type Hook = Box<dyn FnMut(&ShellEvent)>;

/// Registered observers, called in registration order.
#[derive(Default)]
pub struct ShellHooks {
    hooks: Vec<Hook>,
}

impl ShellHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    pub fn emit(&mut self, event: &ShellEvent) {
        for hook in &mut self.hooks {
            hook(event);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for ShellHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellHooks")
            .field("count", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn emits_to_every_hook_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = ShellHooks::new();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            hooks.add(Box::new(move |e| seen.borrow_mut().push((tag, e.clone()))));
        }
        hooks.emit(&ShellEvent::LockScreenRedrawn);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("a", ShellEvent::LockScreenRedrawn),
                ("b", ShellEvent::LockScreenRedrawn),
            ]
        );
        assert_eq!(hooks.len(), 2);
    }

    #[test]
    fn empty_registry_is_fine() {
        let mut hooks = ShellHooks::new();
        hooks.emit(&ShellEvent::OverlaysCleared);
        assert!(hooks.is_empty());
        assert_eq!(format!("{hooks:?}"), "ShellHooks { count: 0 }");
    }
}
