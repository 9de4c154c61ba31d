//! Command trait, registry, and line tokenizer for the device console.

use std::collections::BTreeMap;

use pocket_core::DeviceShell;
use pocket_types::error::{PocketError, Result};

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the console loop to exit.
    Quit,
}

/// A single console command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "open <app>").
    fn usage(&self) -> &str;

    /// Command category for grouping in `help` output.
    fn category(&self) -> &str {
        "general"
    }

    /// Run against the device.
    fn execute(&self, args: &[&str], shell: &mut DeviceShell) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Parse and run one line. Command names are case-insensitive; `help`
    /// is built in.
    pub fn execute(&self, line: &str, shell: &mut DeviceShell) -> Result<CommandOutput> {
        let tokens = tokenize(line)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };
        let name = name.to_ascii_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        if name == "help" {
            return self.help(args.first().copied());
        }
        let cmd = self
            .commands
            .get(&name)
            .ok_or_else(|| PocketError::Command(format!("unknown command: {name}")))?;
        cmd.execute(&args, shell)
    }

    fn help(&self, topic: Option<&str>) -> Result<CommandOutput> {
        if let Some(topic) = topic {
            let cmd = self
                .commands
                .get(&topic.to_ascii_lowercase())
                .ok_or_else(|| PocketError::Command(format!("no help for: {topic}")))?;
            return Ok(CommandOutput::Text(format!(
                "{}\n  {}",
                cmd.usage(),
                cmd.description()
            )));
        }
        let mut by_category: BTreeMap<&str, Vec<&dyn Command>> = BTreeMap::new();
        for cmd in self.commands.values() {
            by_category
                .entry(cmd.category())
                .or_default()
                .push(cmd.as_ref());
        }
        let mut lines = Vec::new();
        for (category, cmds) in by_category {
            lines.push(format!("[{category}]"));
            for cmd in cmds {
                lines.push(format!("  {:<28} {}", cmd.usage(), cmd.description()));
            }
        }
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

/// Split a line into words, honouring single and double quotes and
/// backslash escapes.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => match chars.peek() {
                    Some(&next @ ('"' | '\\')) => {
                        chars.next();
                        current.push(next);
                    },
                    _ => current.push('\\'),
                },
                _ => current.push(ch),
            }
        } else {
            match ch {
                '\'' => in_single = true,
                '"' => in_double = true,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                },
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                },
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(PocketError::Command("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(PocketError::Command("unterminated double quote".to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pocket_platform::{FixedClock, MemoryStore, SystemTime};
    use pocket_types::config::ShellConfig;

    pub(crate) fn test_shell() -> DeviceShell {
        let clock = FixedClock(SystemTime {
            year: 2024,
            month: 6,
            day: 1,
            hour: 7,
            minute: 5,
            second: 0,
        });
        DeviceShell::new(
            ShellConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(clock),
        )
    }

    struct Echo;
    impl Command for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [words...]"
        }
        fn execute(&self, args: &[&str], _shell: &mut DeviceShell) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ")))
        }
    }

    #[test]
    fn tokenize_simple() {
        assert_eq!(tokenize("open notesApp").unwrap(), vec!["open", "notesApp"]);
    }

    #[test]
    fn tokenize_quotes() {
        assert_eq!(
            tokenize(r#"notify "New mail" 'from bob'"#).unwrap(),
            vec!["notify", "New mail", "from bob"]
        );
    }

    #[test]
    fn tokenize_escapes() {
        assert_eq!(
            tokenize(r#"msg "say \"hi\"" a\ b"#).unwrap(),
            vec!["msg", "say \"hi\"", "a b"]
        );
    }

    #[test]
    fn tokenize_unterminated() {
        assert!(tokenize("notify 'oops").is_err());
        assert!(tokenize("notify \"oops").is_err());
    }

    #[test]
    fn tokenize_blank() {
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn dispatch_is_case_insensitive() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Echo));
        let mut shell = test_shell();
        let out = reg.execute("ECHO a b", &mut shell).unwrap();
        assert_eq!(out, CommandOutput::Text("a b".to_string()));
        assert_eq!(reg.execute("", &mut shell).unwrap(), CommandOutput::None);
    }

    #[test]
    fn unknown_command_errors() {
        let reg = CommandRegistry::new();
        let mut shell = test_shell();
        let err = reg.execute("frobnicate", &mut shell).unwrap_err();
        assert!(err.to_string().contains("unknown command: frobnicate"));
    }

    #[test]
    fn help_lists_by_category() {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(Echo));
        let mut shell = test_shell();
        let CommandOutput::Text(text) = reg.execute("help", &mut shell).unwrap() else {
            panic!("expected text");
        };
        assert!(text.contains("[general]"));
        assert!(text.contains("echo [words...]"));
        let CommandOutput::Text(one) = reg.execute("help echo", &mut shell).unwrap() else {
            panic!("expected text");
        };
        assert!(one.contains("Print arguments"));
        assert!(reg.execute("help nope", &mut shell).is_err());
    }
}
