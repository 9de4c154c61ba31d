//! Text rendering of the device for the console.

use pocket_core::DeviceShell;
use pocket_core::DeviceState;
use pocket_core::overlay::ExclusiveOverlay;
use pocket_core::power::BootMenuItem;

/// One-line summary printed after every command.
pub fn status_line(shell: &DeviceShell) -> String {
    let mut line = format!("[{}] {}", shell.clock_text(), shell.state());
    if shell.state() == DeviceState::Unlocked {
        line.push_str(&format!(" | {}", shell.current_view()));
    }
    let overlays = shell.overlays().active_kinds();
    if !overlays.is_empty() {
        let labels: Vec<&str> = overlays.iter().map(|k| k.label()).collect();
        line.push_str(&format!(" | overlays: {}", labels.join(", ")));
    }
    let unread = shell.notifications().unread_count();
    if unread > 0 {
        line.push_str(&format!(" | {unread} unread"));
    }
    line
}

/// Full multi-line dump used by `status`.
pub fn status_report(shell: &DeviceShell) -> String {
    let mut lines = vec![status_line(shell)];
    lines.push(format!(
        "volume {}%  flashlight {}  bootloader {}",
        shell.volume(),
        on_off(shell.flashlight_on()),
        if shell.bootloader_unlocked() {
            "unlocked"
        } else {
            "locked"
        },
    ));

    match shell.overlays().exclusive() {
        Some(ExclusiveOverlay::SystemMessage { text, spinner }) => {
            let suffix = if *spinner { " (working)" } else { "" };
            lines.push(format!("message: {text}{suffix}"));
        },
        Some(ExclusiveOverlay::BootScreen) => {
            lines.extend(boot_menu_lines(shell));
        },
        Some(ExclusiveOverlay::LockCustomize) => {
            if let Some(draft) = shell.lock_draft() {
                lines.push(format!(
                    "customizing: preset {}, effect {:?}, widgets {}",
                    draft.preset_name(),
                    draft.background_effect.kind,
                    draft.enabled_widgets().join(",")
                ));
            }
        },
        _ => {},
    }

    if shell.state() == DeviceState::Locked {
        let cfg = shell.lock_config();
        lines.push(format!(
            "lock screen: {} ({:?}), widgets {}",
            cfg.preset_name(),
            cfg.orientation,
            cfg.enabled_widgets().join(",")
        ));
        if let Some(peek) = shell.notifications().peek() {
            lines.push(format!("peek: {}: {}", peek.title, peek.message));
        }
    }

    let history = shell.history().entries();
    if !history.is_empty() {
        lines.push(format!("history: {}", history.join(" > ")));
    }
    if let Some(action) = shell.pending_confirmation() {
        lines.push(format!("confirm: {} (confirm yes|no)", action.prompt()));
    }
    lines.join("\n")
}

fn boot_menu_lines(shell: &DeviceShell) -> Vec<String> {
    let menu = shell.boot_menu();
    let mut lines: Vec<String> = BootMenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let cursor = if i == menu.selected_index() { '>' } else { ' ' };
            format!(" {cursor} {}", item.label())
        })
        .collect();
    if let Some(status) = menu.status() {
        lines.push(format!("   {status}"));
    }
    lines
}

/// Notification list, newest first.
pub fn notification_lines(shell: &DeviceShell) -> String {
    if shell.notifications().is_empty() {
        return "no notifications".to_string();
    }
    shell
        .notifications()
        .iter()
        .map(|n| {
            let mark = if n.read { ' ' } else { '*' };
            format!("{mark} #{} {}: {}", n.id, n.title, n.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::test_shell;

    #[test]
    fn off_device_has_bare_status() {
        let shell = test_shell();
        assert_eq!(status_line(&shell), "[--:--] off");
    }

    #[test]
    fn booting_shows_boot_menu() {
        let mut shell = test_shell();
        shell.boot();
        let report = status_report(&shell);
        assert!(report.contains("booting"));
        assert!(report.contains(" > Reboot"));
        assert!(report.contains("   Recovery mode"));
    }

    #[test]
    fn unlocked_shows_current_view() {
        let mut shell = test_shell();
        shell.boot();
        shell.advance(shell.config().boot_ms);
        assert!(shell.unlock());
        shell.show_app("notesApp");
        let line = status_line(&shell);
        assert!(line.starts_with("[07:05] unlocked | notesApp"), "{line}");
    }

    #[test]
    fn notifications_listed_newest_first() {
        let mut shell = test_shell();
        assert_eq!(notification_lines(&shell), "no notifications");
        shell.create_notification("A", "first");
        shell.create_notification("B", "second");
        let text = notification_lines(&shell);
        let b = text.find("second").unwrap();
        let a = text.find("first").unwrap();
        assert!(b < a);
        assert!(status_line(&shell).contains("2 unread"));
    }
}
