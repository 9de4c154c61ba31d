//! Built-in console commands. Each one drives a [`DeviceShell`] operation or
//! a short hardware event sequence.

use pocket_core::DeviceShell;
use pocket_core::history::{ALL_APPS_VIEW, HOME_SCREEN, RECENT_APPS_VIEW};
use pocket_core::input::{HardwareEvent, Key, PointerRegion};
use pocket_core::lockscreen::{BackgroundEffect, EffectKind, Orientation, PRESETS, WIDGET_IDS};
use pocket_core::power::PowerMenuChoice;
use pocket_types::error::{PocketError, Result};

use crate::console::{Command, CommandOutput, CommandRegistry};
use crate::render;

/// Register every built-in command.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(BootCmd));
    reg.register(Box::new(PressCmd));
    reg.register(Box::new(HoldCmd));
    reg.register(Box::new(ShutdownCmd));
    reg.register(Box::new(RestartCmd));
    reg.register(Box::new(LockCmd));
    reg.register(Box::new(UnlockCmd));
    reg.register(Box::new(MenuCmd));
    reg.register(Box::new(VolCmd));
    reg.register(Box::new(SnapCmd));
    reg.register(Box::new(KeyCmd));
    reg.register(Box::new(TapCmd));
    reg.register(Box::new(LockHoldCmd));
    reg.register(Box::new(WaitCmd));
    reg.register(Box::new(OpenCmd));
    reg.register(Box::new(BackCmd));
    reg.register(Box::new(HomeCmd));
    reg.register(Box::new(RecentsCmd));
    reg.register(Box::new(AppsCmd));
    reg.register(Box::new(NotifyCmd));
    reg.register(Box::new(ShadeCmd));
    reg.register(Box::new(NotificationsCmd));
    reg.register(Box::new(MsgCmd));
    reg.register(Box::new(HideMsgCmd));
    reg.register(Box::new(AlbumCmd));
    reg.register(Box::new(CameraCmd));
    reg.register(Box::new(FlashCmd));
    reg.register(Box::new(CustomizeCmd));
    reg.register(Box::new(ProfileCmd));
    reg.register(Box::new(LockCfgCmd));
    reg.register(Box::new(BootloaderCmd));
    reg.register(Box::new(WipeCmd));
    reg.register(Box::new(ConfirmCmd));
    reg.register(Box::new(StatusCmd));
    reg.register(Box::new(QuitCmd));
    reg.register(Box::new(ExitCmd));
}

/// Map a shell result to console output: silence on success, a short note
/// when the device ignored the request.
fn outcome(done: bool, what: &str) -> CommandOutput {
    if done {
        CommandOutput::None
    } else {
        CommandOutput::Text(format!("{what}: not available now"))
    }
}

fn usage_error(cmd: &dyn Command) -> PocketError {
    PocketError::Command(format!("usage: {}", cmd.usage()))
}

fn parse_num<T: std::str::FromStr>(s: &str, what: &str) -> Result<T> {
    s.parse()
        .map_err(|_| PocketError::Command(format!("invalid {what}: {s}")))
}

// ---------------------------------------------------------------------------
// Power
// ---------------------------------------------------------------------------

struct BootCmd;
impl Command for BootCmd {
    fn name(&self) -> &str {
        "boot"
    }
    fn description(&self) -> &str {
        "Power on and run the boot sequence"
    }
    fn usage(&self) -> &str {
        "boot"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.boot(), "boot"))
    }
}

struct PressCmd;
impl Command for PressCmd {
    fn name(&self) -> &str {
        "press"
    }
    fn description(&self) -> &str {
        "Short press of the power button"
    }
    fn usage(&self) -> &str {
        "press"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        shell.handle_event(HardwareEvent::PowerPress);
        shell.handle_event(HardwareEvent::PowerRelease);
        Ok(CommandOutput::None)
    }
}

struct HoldCmd;
impl Command for HoldCmd {
    fn name(&self) -> &str {
        "hold"
    }
    fn description(&self) -> &str {
        "Hold the power button long enough to open the power menu"
    }
    fn usage(&self) -> &str {
        "hold"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        shell.handle_event(HardwareEvent::PowerPress);
        shell.advance(shell.config().power_hold_ms);
        shell.handle_event(HardwareEvent::PowerRelease);
        Ok(CommandOutput::None)
    }
}

struct ShutdownCmd;
impl Command for ShutdownCmd {
    fn name(&self) -> &str {
        "shutdown"
    }
    fn description(&self) -> &str {
        "Power the device off"
    }
    fn usage(&self) -> &str {
        "shutdown"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.shutdown(), "shutdown"))
    }
}

struct RestartCmd;
impl Command for RestartCmd {
    fn name(&self) -> &str {
        "restart"
    }
    fn description(&self) -> &str {
        "Restart the device"
    }
    fn usage(&self) -> &str {
        "restart"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.restart(), "restart"))
    }
}

struct LockCmd;
impl Command for LockCmd {
    fn name(&self) -> &str {
        "lock"
    }
    fn description(&self) -> &str {
        "Show the lock screen"
    }
    fn usage(&self) -> &str {
        "lock"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.lock(), "lock"))
    }
}

struct UnlockCmd;
impl Command for UnlockCmd {
    fn name(&self) -> &str {
        "unlock"
    }
    fn description(&self) -> &str {
        "Dismiss the lock screen"
    }
    fn usage(&self) -> &str {
        "unlock"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.unlock(), "unlock"))
    }
}

struct MenuCmd;
impl Command for MenuCmd {
    fn name(&self) -> &str {
        "menu"
    }
    fn description(&self) -> &str {
        "Pick a power menu entry"
    }
    fn usage(&self) -> &str {
        "menu <off|restart|lock|cancel>"
    }
    fn category(&self) -> &str {
        "power"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let choice = args
            .first()
            .and_then(|s| PowerMenuChoice::parse(s))
            .ok_or_else(|| usage_error(self))?;
        Ok(outcome(shell.select_power_menu(choice), choice.label()))
    }
}

// ---------------------------------------------------------------------------
// Buttons and keys
// ---------------------------------------------------------------------------

struct VolCmd;
impl Command for VolCmd {
    fn name(&self) -> &str {
        "vol"
    }
    fn description(&self) -> &str {
        "Press a volume rocker button"
    }
    fn usage(&self) -> &str {
        "vol <up|down> [count]"
    }
    fn category(&self) -> &str {
        "buttons"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let event = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("up" | "+") => HardwareEvent::VolumeUp,
            Some("down" | "-") => HardwareEvent::VolumeDown,
            _ => return Err(usage_error(self)),
        };
        let count: u32 = match args.get(1) {
            Some(n) => parse_num(n, "count")?,
            None => 1,
        };
        for _ in 0..count {
            shell.handle_event(event.clone());
        }
        Ok(CommandOutput::None)
    }
}

struct SnapCmd;
impl Command for SnapCmd {
    fn name(&self) -> &str {
        "snap"
    }
    fn description(&self) -> &str {
        "Press the snapshot key"
    }
    fn usage(&self) -> &str {
        "snap"
    }
    fn category(&self) -> &str {
        "buttons"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.take_screenshot(), "screenshot"))
    }
}

struct KeyCmd;
impl Command for KeyCmd {
    fn name(&self) -> &str {
        "key"
    }
    fn description(&self) -> &str {
        "Send a keyboard key"
    }
    fn usage(&self) -> &str {
        "key <up|down|enter|esc>"
    }
    fn category(&self) -> &str {
        "buttons"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let key = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("up") => Key::Up,
            Some("down") => Key::Down,
            Some("enter" | "return") => Key::Enter,
            Some("esc" | "escape") => Key::Escape,
            _ => return Err(usage_error(self)),
        };
        shell.handle_event(HardwareEvent::Key(key));
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// Touch
// ---------------------------------------------------------------------------

fn pointer_args(cmd: &dyn Command, args: &[&str]) -> Result<(i32, i32)> {
    match args {
        [] => Ok((160, 240)),
        [x, y] => Ok((parse_num(x, "x")?, parse_num(y, "y")?)),
        _ => Err(usage_error(cmd)),
    }
}

struct TapCmd;
impl Command for TapCmd {
    fn name(&self) -> &str {
        "tap"
    }
    fn description(&self) -> &str {
        "Tap the screen background"
    }
    fn usage(&self) -> &str {
        "tap [x y]"
    }
    fn category(&self) -> &str {
        "touch"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let (x, y) = pointer_args(self, args)?;
        shell.handle_event(HardwareEvent::PointerDown {
            x,
            y,
            region: PointerRegion::Background,
        });
        shell.handle_event(HardwareEvent::PointerUp { x, y });
        Ok(CommandOutput::None)
    }
}

struct LockHoldCmd;
impl Command for LockHoldCmd {
    fn name(&self) -> &str {
        "lockhold"
    }
    fn description(&self) -> &str {
        "Press and hold the lock screen to customize it"
    }
    fn usage(&self) -> &str {
        "lockhold [x y]"
    }
    fn category(&self) -> &str {
        "touch"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let (x, y) = pointer_args(self, args)?;
        shell.handle_event(HardwareEvent::PointerDown {
            x,
            y,
            region: PointerRegion::Background,
        });
        shell.advance(shell.config().lock_hold_ms);
        shell.handle_event(HardwareEvent::PointerUp { x, y });
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

struct WaitCmd;
impl Command for WaitCmd {
    fn name(&self) -> &str {
        "wait"
    }
    fn description(&self) -> &str {
        "Advance the virtual clock"
    }
    fn usage(&self) -> &str {
        "wait <ms>"
    }
    fn category(&self) -> &str {
        "time"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let ms: u64 = match args {
            [ms] => parse_num(ms, "duration")?,
            _ => return Err(usage_error(self)),
        };
        shell.advance(ms);
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

struct OpenCmd;
impl Command for OpenCmd {
    fn name(&self) -> &str {
        "open"
    }
    fn description(&self) -> &str {
        "Bring an app to the foreground"
    }
    fn usage(&self) -> &str {
        "open <app>"
    }
    fn category(&self) -> &str {
        "nav"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let app = args.first().ok_or_else(|| usage_error(self))?;
        Ok(outcome(shell.show_app(app), app))
    }
}

struct BackCmd;
impl Command for BackCmd {
    fn name(&self) -> &str {
        "back"
    }
    fn description(&self) -> &str {
        "Go back to the previous view"
    }
    fn usage(&self) -> &str {
        "back"
    }
    fn category(&self) -> &str {
        "nav"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.navigate_back(), "back"))
    }
}

struct HomeCmd;
impl Command for HomeCmd {
    fn name(&self) -> &str {
        "home"
    }
    fn description(&self) -> &str {
        "Show the home screen"
    }
    fn usage(&self) -> &str {
        "home"
    }
    fn category(&self) -> &str {
        "nav"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.show_app(HOME_SCREEN), "home"))
    }
}

struct RecentsCmd;
impl Command for RecentsCmd {
    fn name(&self) -> &str {
        "recents"
    }
    fn description(&self) -> &str {
        "Open the app switcher and list recent apps"
    }
    fn usage(&self) -> &str {
        "recents"
    }
    fn category(&self) -> &str {
        "nav"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        if !shell.show_app(RECENT_APPS_VIEW) {
            return Ok(outcome(false, "recents"));
        }
        let recents = shell.history().recents();
        if recents.is_empty() {
            return Ok(CommandOutput::Text("no recent apps".to_string()));
        }
        Ok(CommandOutput::Text(recents.join("\n")))
    }
}

struct AppsCmd;
impl Command for AppsCmd {
    fn name(&self) -> &str {
        "apps"
    }
    fn description(&self) -> &str {
        "Open the app drawer"
    }
    fn usage(&self) -> &str {
        "apps"
    }
    fn category(&self) -> &str {
        "nav"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.show_app(ALL_APPS_VIEW), "apps"))
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

struct NotifyCmd;
impl Command for NotifyCmd {
    fn name(&self) -> &str {
        "notify"
    }
    fn description(&self) -> &str {
        "Post a notification"
    }
    fn usage(&self) -> &str {
        "notify <title> <message...>"
    }
    fn category(&self) -> &str {
        "notifications"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let [title, message @ ..] = args else {
            return Err(usage_error(self));
        };
        let id = shell.create_notification(title, &message.join(" "));
        Ok(CommandOutput::Text(format!("posted #{id}")))
    }
}

struct ShadeCmd;
impl Command for ShadeCmd {
    fn name(&self) -> &str {
        "shade"
    }
    fn description(&self) -> &str {
        "Toggle the notification shade"
    }
    fn usage(&self) -> &str {
        "shade"
    }
    fn category(&self) -> &str {
        "notifications"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        if shell.toggle_notification_shade() {
            Ok(CommandOutput::Text(render::notification_lines(shell)))
        } else {
            Ok(CommandOutput::None)
        }
    }
}

struct NotificationsCmd;
impl Command for NotificationsCmd {
    fn name(&self) -> &str {
        "notifications"
    }
    fn description(&self) -> &str {
        "List notifications, newest first"
    }
    fn usage(&self) -> &str {
        "notifications"
    }
    fn category(&self) -> &str {
        "notifications"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(render::notification_lines(shell)))
    }
}

// ---------------------------------------------------------------------------
// System surfaces
// ---------------------------------------------------------------------------

struct MsgCmd;
impl Command for MsgCmd {
    fn name(&self) -> &str {
        "msg"
    }
    fn description(&self) -> &str {
        "Show a full-screen system message"
    }
    fn usage(&self) -> &str {
        "msg [--spinner] <text...>"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let (spinner, words) = match args {
            ["--spinner", rest @ ..] => (true, rest),
            rest => (false, rest),
        };
        if words.is_empty() {
            return Err(usage_error(self));
        }
        Ok(outcome(
            shell.show_system_message(&words.join(" "), spinner),
            "message",
        ))
    }
}

struct HideMsgCmd;
impl Command for HideMsgCmd {
    fn name(&self) -> &str {
        "hidemsg"
    }
    fn description(&self) -> &str {
        "Hide the system message"
    }
    fn usage(&self) -> &str {
        "hidemsg"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        shell.hide_system_message();
        Ok(CommandOutput::None)
    }
}

struct AlbumCmd;
impl Command for AlbumCmd {
    fn name(&self) -> &str {
        "album"
    }
    fn description(&self) -> &str {
        "Show or hide the album art overlay"
    }
    fn usage(&self) -> &str {
        "album <show|hide>"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("show") => Ok(outcome(shell.show_album_art(), "album art")),
            Some("hide") => {
                shell.hide_album_art();
                Ok(CommandOutput::None)
            },
            _ => Err(usage_error(self)),
        }
    }
}

struct CameraCmd;
impl Command for CameraCmd {
    fn name(&self) -> &str {
        "camera"
    }
    fn description(&self) -> &str {
        "Open the camera"
    }
    fn usage(&self) -> &str {
        "camera"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(outcome(shell.open_camera(), "camera"))
    }
}

struct FlashCmd;
impl Command for FlashCmd {
    fn name(&self) -> &str {
        "flash"
    }
    fn description(&self) -> &str {
        "Toggle the flashlight"
    }
    fn usage(&self) -> &str {
        "flash"
    }
    fn category(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        if !shell.toggle_flashlight() {
            return Ok(outcome(false, "flashlight"));
        }
        let state = if shell.flashlight_on() { "on" } else { "off" };
        Ok(CommandOutput::Text(format!("flashlight {state}")))
    }
}

// ---------------------------------------------------------------------------
// Lock screen
// ---------------------------------------------------------------------------

struct CustomizeCmd;
impl Command for CustomizeCmd {
    fn name(&self) -> &str {
        "customize"
    }
    fn description(&self) -> &str {
        "Edit the lock screen draft (after lockhold)"
    }
    fn usage(&self) -> &str {
        "customize <preset N|effect KIND [COLOR]|widget ID|orientation O|apply|cancel>"
    }
    fn category(&self) -> &str {
        "lockscreen"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let done = match args {
            ["preset", n] => {
                let index: usize = parse_num(n, "preset")?;
                shell.set_draft_preset(index)
            },
            ["effect", kind, rest @ ..] => {
                let kind = EffectKind::parse(kind).ok_or_else(|| {
                    PocketError::Command(format!("unknown effect: {kind}"))
                })?;
                let color = rest.first().map_or_else(
                    || BackgroundEffect::default().color,
                    |c| c.to_string(),
                );
                shell.set_draft_effect(BackgroundEffect { kind, color })
            },
            ["widget", id] => {
                if !WIDGET_IDS.iter().any(|w| *w == *id) {
                    return Err(PocketError::Command(format!(
                        "unknown widget: {id} (one of {})",
                        WIDGET_IDS.join(", ")
                    )));
                }
                shell.toggle_draft_widget(id)
            },
            ["orientation", o] => {
                let orientation = match o.to_ascii_lowercase().as_str() {
                    "portrait" => Orientation::Portrait,
                    "landscape" => Orientation::Landscape,
                    _ => return Err(usage_error(self)),
                };
                shell.set_draft_orientation(orientation)
            },
            ["apply"] => shell.apply_customizer(),
            ["cancel"] => shell.cancel_customizer(),
            _ => return Err(usage_error(self)),
        };
        Ok(outcome(done, "customize"))
    }
}

struct ProfileCmd;
impl Command for ProfileCmd {
    fn name(&self) -> &str {
        "profile"
    }
    fn description(&self) -> &str {
        "Manage saved lock screen profiles"
    }
    fn usage(&self) -> &str {
        "profile <list|save NAME|load NAME|delete NAME>"
    }
    fn category(&self) -> &str {
        "lockscreen"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        match args {
            ["list"] | [] => {
                let names = shell.lock_profiles();
                if names.is_empty() {
                    Ok(CommandOutput::Text("no profiles".to_string()))
                } else {
                    Ok(CommandOutput::Text(names.join("\n")))
                }
            },
            ["save", name @ ..] if !name.is_empty() => {
                Ok(outcome(shell.save_lock_profile(&name.join(" ")), "save"))
            },
            ["load", name @ ..] if !name.is_empty() => {
                Ok(outcome(shell.load_lock_profile(&name.join(" ")), "load"))
            },
            ["delete", name @ ..] if !name.is_empty() => {
                Ok(outcome(shell.delete_lock_profile(&name.join(" ")), "delete"))
            },
            _ => Err(usage_error(self)),
        }
    }
}

struct LockCfgCmd;
impl Command for LockCfgCmd {
    fn name(&self) -> &str {
        "lockcfg"
    }
    fn description(&self) -> &str {
        "Print the lock screen configuration"
    }
    fn usage(&self) -> &str {
        "lockcfg"
    }
    fn category(&self) -> &str {
        "lockscreen"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let json = serde_json::to_string_pretty(shell.lock_config())?;
        Ok(CommandOutput::Text(format!(
            "{json}\npresets: {}",
            PRESETS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

struct BootloaderCmd;
impl Command for BootloaderCmd {
    fn name(&self) -> &str {
        "bootloader"
    }
    fn description(&self) -> &str {
        "Request a bootloader unlock or relock"
    }
    fn usage(&self) -> &str {
        "bootloader <unlock|relock>"
    }
    fn category(&self) -> &str {
        "settings"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let unlock = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("unlock") => true,
            Some("relock" | "lock") => false,
            _ => return Err(usage_error(self)),
        };
        let requested = shell.set_bootloader_unlocked(unlock);
        Ok(confirm_prompt(shell, requested, "bootloader"))
    }
}

struct WipeCmd;
impl Command for WipeCmd {
    fn name(&self) -> &str {
        "wipe"
    }
    fn description(&self) -> &str {
        "Request a factory wipe"
    }
    fn usage(&self) -> &str {
        "wipe"
    }
    fn category(&self) -> &str {
        "settings"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let requested = shell.factory_wipe();
        Ok(confirm_prompt(shell, requested, "wipe"))
    }
}

/// After a confirmation request, show its prompt.
fn confirm_prompt(shell: &DeviceShell, requested: bool, what: &str) -> CommandOutput {
    match shell.pending_confirmation() {
        Some(action) if requested => {
            CommandOutput::Text(format!("{} (confirm yes|no)", action.prompt()))
        },
        _ => outcome(false, what),
    }
}

struct ConfirmCmd;
impl Command for ConfirmCmd {
    fn name(&self) -> &str {
        "confirm"
    }
    fn description(&self) -> &str {
        "Answer the pending confirmation"
    }
    fn usage(&self) -> &str {
        "confirm <yes|no>"
    }
    fn category(&self) -> &str {
        "settings"
    }
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        let accepted = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("yes" | "y") => true,
            Some("no" | "n") => false,
            _ => return Err(usage_error(self)),
        };
        if shell.pending_confirmation().is_none() {
            return Ok(CommandOutput::Text("nothing to confirm".to_string()));
        }
        shell.resolve_confirmation(accepted);
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct StatusCmd;
impl Command for StatusCmd {
    fn name(&self) -> &str {
        "status"
    }
    fn description(&self) -> &str {
        "Show the full device state"
    }
    fn usage(&self) -> &str {
        "status"
    }
    fn execute(&self, _args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(CommandOutput::Text(render::status_report(shell)))
    }
}

struct QuitCmd;
impl Command for QuitCmd {
    fn name(&self) -> &str {
        "quit"
    }
    fn description(&self) -> &str {
        "Leave the console"
    }
    fn usage(&self) -> &str {
        "quit"
    }
    fn execute(&self, _args: &[&str], _shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Leave the console"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _shell: &mut DeviceShell) -> Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::test_shell;
    use pocket_core::DeviceState;
    use pocket_core::lockscreen::LockPhase;
    use pocket_core::overlay::OverlayKind;

    fn setup() -> (CommandRegistry, DeviceShell) {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg);
        (reg, test_shell())
    }

    fn run(reg: &CommandRegistry, shell: &mut DeviceShell, line: &str) -> CommandOutput {
        reg.execute(line, shell).unwrap()
    }

    fn unlocked() -> (CommandRegistry, DeviceShell) {
        let (reg, mut shell) = setup();
        run(&reg, &mut shell, "boot");
        run(&reg, &mut shell, "wait 3000");
        run(&reg, &mut shell, "tap");
        assert_eq!(shell.state(), DeviceState::Unlocked);
        (reg, shell)
    }

    #[test]
    fn builtins_registered() {
        let (reg, _) = setup();
        let names = reg.names();
        assert!(names.len() >= 30);
        assert!(names.contains(&"customize"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn boot_then_wait_reaches_lock_screen() {
        let (reg, mut shell) = setup();
        assert_eq!(run(&reg, &mut shell, "boot"), CommandOutput::None);
        assert_eq!(shell.state(), DeviceState::Booting);
        run(&reg, &mut shell, "wait 3000");
        assert_eq!(shell.state(), DeviceState::Locked);
    }

    #[test]
    fn rejected_operation_reports_not_available() {
        let (reg, mut shell) = setup();
        let out = run(&reg, &mut shell, "open notesApp");
        assert_eq!(
            out,
            CommandOutput::Text("notesApp: not available now".to_string())
        );
    }

    #[test]
    fn hold_opens_power_menu_and_menu_picks_lock() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "hold");
        assert!(shell.overlays().is_active(OverlayKind::PowerMenu));
        run(&reg, &mut shell, "menu lock");
        assert_eq!(shell.state(), DeviceState::Locked);
        assert!(reg.execute("menu sideways", &mut shell).is_err());
    }

    #[test]
    fn press_toggles_screen() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "press");
        assert_eq!(shell.state(), DeviceState::Off);
        run(&reg, &mut shell, "press");
        assert_eq!(shell.state(), DeviceState::Locked);
    }

    #[test]
    fn navigation_commands() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "open notesApp");
        run(&reg, &mut shell, "open mapsApp");
        assert_eq!(shell.current_view(), "mapsApp");
        let CommandOutput::Text(recents) = run(&reg, &mut shell, "recents") else {
            panic!("expected recents list");
        };
        assert_eq!(recents, "mapsApp\nnotesApp");
        run(&reg, &mut shell, "back");
        assert_eq!(shell.current_view(), "notesApp");
        run(&reg, &mut shell, "home");
        assert_eq!(shell.current_view(), HOME_SCREEN);
    }

    #[test]
    fn volume_with_count() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "vol up 3");
        assert_eq!(shell.volume(), 80);
        run(&reg, &mut shell, "vol down");
        assert_eq!(shell.volume(), 70);
        assert!(reg.execute("vol sideways", &mut shell).is_err());
        assert!(reg.execute("vol up many", &mut shell).is_err());
    }

    #[test]
    fn notify_joins_message_words() {
        let (reg, mut shell) = unlocked();
        let out = run(&reg, &mut shell, "notify Mail you have post");
        assert_eq!(out, CommandOutput::Text("posted #1".to_string()));
        let latest = shell.notifications().latest().unwrap();
        assert_eq!(latest.title, "Mail");
        assert_eq!(latest.message, "you have post");
        assert!(reg.execute("notify", &mut shell).is_err());
    }

    #[test]
    fn shade_lists_and_marks_read() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "notify A one");
        let CommandOutput::Text(text) = run(&reg, &mut shell, "shade") else {
            panic!("expected list");
        };
        assert!(text.contains("A: one"));
        assert_eq!(shell.notifications().unread_count(), 0);
        assert_eq!(run(&reg, &mut shell, "shade"), CommandOutput::None);
    }

    #[test]
    fn msg_with_spinner() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "msg --spinner Please wait");
        assert_eq!(
            shell.overlays().system_message(),
            Some(("Please wait", true))
        );
        run(&reg, &mut shell, "hidemsg");
        assert!(shell.overlays().system_message().is_none());
    }

    #[test]
    fn flash_reports_state() {
        let (reg, mut shell) = unlocked();
        assert_eq!(
            run(&reg, &mut shell, "flash"),
            CommandOutput::Text("flashlight on".to_string())
        );
        assert!(shell.flashlight_on());
    }

    #[test]
    fn customize_flow_persists_draft() {
        let (reg, mut shell) = setup();
        run(&reg, &mut shell, "boot");
        run(&reg, &mut shell, "wait 3000");
        run(&reg, &mut shell, "lockhold");
        assert_eq!(shell.lock_phase(), LockPhase::Customizing);
        run(&reg, &mut shell, "customize preset 2");
        run(&reg, &mut shell, "customize effect aurora #112233");
        run(&reg, &mut shell, "customize widget weather");
        run(&reg, &mut shell, "customize orientation landscape");
        assert!(reg.execute("customize widget toaster", &mut shell).is_err());
        run(&reg, &mut shell, "customize apply");
        let cfg = shell.lock_config();
        assert_eq!(cfg.preset_name(), "Bold");
        assert_eq!(cfg.background_effect.kind, EffectKind::Aurora);
        assert_eq!(cfg.background_effect.color, "#112233");
        assert!(cfg.widget_enabled("weather"));
        assert_eq!(cfg.orientation, Orientation::Landscape);
        assert_eq!(shell.state(), DeviceState::Locked);
    }

    #[test]
    fn customize_outside_customizer_is_rejected() {
        let (reg, mut shell) = unlocked();
        assert_eq!(
            run(&reg, &mut shell, "customize preset 1"),
            CommandOutput::Text("customize: not available now".to_string())
        );
    }

    #[test]
    fn profile_save_list_delete() {
        let (reg, mut shell) = unlocked();
        assert_eq!(
            run(&reg, &mut shell, "profile list"),
            CommandOutput::Text("no profiles".to_string())
        );
        run(&reg, &mut shell, "profile save night mode");
        assert_eq!(
            run(&reg, &mut shell, "profile"),
            CommandOutput::Text("night mode".to_string())
        );
        run(&reg, &mut shell, "profile delete night mode");
        run(&reg, &mut shell, "confirm yes");
        assert!(shell.lock_profiles().is_empty());
    }

    #[test]
    fn lockcfg_prints_json() {
        let (reg, mut shell) = setup();
        let CommandOutput::Text(text) = run(&reg, &mut shell, "lockcfg") else {
            panic!("expected json");
        };
        assert!(text.contains("\"presetIndex\": 0"));
        assert!(text.contains("presets: Classic"));
    }

    #[test]
    fn bootloader_unlock_needs_confirmation() {
        let (reg, mut shell) = unlocked();
        let CommandOutput::Text(prompt) = run(&reg, &mut shell, "bootloader unlock") else {
            panic!("expected prompt");
        };
        assert!(prompt.contains("Unlock the bootloader?"));
        run(&reg, &mut shell, "confirm yes");
        assert_eq!(shell.state(), DeviceState::SystemMessage);
        run(&reg, &mut shell, "wait 3000");
        assert!(shell.bootloader_unlocked());
        assert_eq!(shell.state(), DeviceState::Unlocked);
    }

    #[test]
    fn wipe_declined_changes_nothing() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "open notesApp");
        run(&reg, &mut shell, "wipe");
        run(&reg, &mut shell, "confirm no");
        assert_eq!(shell.state(), DeviceState::Unlocked);
        assert_eq!(shell.current_view(), "notesApp");
        assert_eq!(
            run(&reg, &mut shell, "confirm yes"),
            CommandOutput::Text("nothing to confirm".to_string())
        );
    }

    #[test]
    fn key_escape_goes_back() {
        let (reg, mut shell) = unlocked();
        run(&reg, &mut shell, "open notesApp");
        run(&reg, &mut shell, "open mapsApp");
        run(&reg, &mut shell, "key esc");
        assert_eq!(shell.current_view(), "notesApp");
    }

    #[test]
    fn quit_and_exit() {
        let (reg, mut shell) = setup();
        assert_eq!(run(&reg, &mut shell, "quit"), CommandOutput::Quit);
        assert_eq!(run(&reg, &mut shell, "EXIT"), CommandOutput::Quit);
    }
}
