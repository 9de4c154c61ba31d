//! pocket-shell console.
//!
//! Runs one simulated device and reads commands from stdin. Wall-clock time
//! is fed to the device's virtual clock on a short tick, so timers fire while
//! the console sits idle; `wait <ms>` skips ahead explicitly.

mod commands;
mod console;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use pocket_core::DeviceShell;
use pocket_core::config::ShellConfig;
use pocket_platform::{DesktopPlatform, FileStore, KeyValueStore, MemoryStore};

use crate::console::{CommandOutput, CommandRegistry};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("POCKET_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ShellConfig::default(),
    };

    let store: Box<dyn KeyValueStore> = match &config.store_path {
        Some(path) => Box::new(
            FileStore::open(path).with_context(|| format!("opening store {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };
    log::info!(
        "pocket-shell starting (store: {})",
        config
            .store_path
            .as_ref()
            .map_or_else(|| "memory".to_string(), |p| p.display().to_string())
    );

    let mut shell = DeviceShell::new(config, store, Box::new(DesktopPlatform::new()));
    shell.on_event(|event| log::debug!("shell event: {event:?}"));

    let mut registry = CommandRegistry::new();
    commands::register_builtins(&mut registry);
    log::info!("{} console commands registered", registry.names().len());

    run_console(&mut shell, &registry)
}

/// Wall-clock interval between virtual-clock updates while idle.
const TICK: Duration = Duration::from_millis(100);

fn run_console(shell: &mut DeviceShell, registry: &CommandRegistry) -> Result<()> {
    let lines = spawn_stdin_reader();
    let mut stdout = io::stdout();
    let mut last = Instant::now();
    let mut shown = render::status_line(shell);

    writeln!(stdout, "pocket-shell console. Type 'help' for commands.")?;
    writeln!(stdout, "{shown}")?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    loop {
        let received = lines.recv_timeout(TICK);
        let changed = tick(shell, elapsed_ms(&mut last), &mut shown);
        // Timers fired while idle.
        if let (Some(status), Err(RecvTimeoutError::Timeout)) = (&changed, &received) {
            writeln!(stdout)?;
            writeln!(stdout, "{status}")?;
            write!(stdout, "> ")?;
            stdout.flush()?;
        }
        let line = match received {
            Ok(line) => line?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match registry.execute(line.trim(), shell) {
            Ok(CommandOutput::Quit) => break,
            Ok(CommandOutput::Text(text)) => writeln!(stdout, "{text}")?,
            Ok(CommandOutput::None) => {},
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
        shown = render::status_line(shell);
        writeln!(stdout, "{shown}")?;
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    log::info!("console closed");
    Ok(())
}

/// Read stdin on its own thread so the device keeps running between
/// commands. The channel closes at end of input.
fn spawn_stdin_reader() -> Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

fn elapsed_ms(last: &mut Instant) -> u64 {
    let now = Instant::now();
    let elapsed = now.duration_since(*last);
    *last = now;
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Feed `elapsed_ms` to the virtual clock. Returns the new status line when
/// it differs from what was last shown.
fn tick(shell: &mut DeviceShell, elapsed_ms: u64, shown: &mut String) -> Option<String> {
    shell.advance(elapsed_ms);
    let status = render::status_line(shell);
    if status == *shown {
        return None;
    }
    *shown = status.clone();
    Some(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::test_shell;

    #[test]
    fn idle_ticks_surface_timer_transitions() {
        let mut shell = test_shell();
        shell.boot();
        let mut shown = render::status_line(&shell);
        assert_eq!(tick(&mut shell, 100, &mut shown), None);

        let boot_ms = shell.config().boot_ms;
        let status = tick(&mut shell, boot_ms, &mut shown).unwrap();
        assert!(status.contains("locked"), "{status}");
        assert_eq!(shown, status);
        assert_eq!(tick(&mut shell, 0, &mut shown), None);
    }

    #[test]
    fn idle_ticks_clear_volume_hud() {
        let mut shell = test_shell();
        shell.boot();
        shell.advance(shell.config().boot_ms);
        assert!(shell.unlock());
        assert!(shell.volume_up());
        let mut shown = render::status_line(&shell);
        assert!(shown.contains("overlays"), "{shown}");

        let hud_ms = shell.config().volume_hud_ms;
        let status = tick(&mut shell, hud_ms, &mut shown).unwrap();
        assert!(!status.contains("overlays"), "{status}");
    }
}
