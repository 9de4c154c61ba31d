//! Error types for pocket-shell.

use std::io;

/// Errors produced by the pocket-shell crates.
///
/// The session core never lets one of these escape an input handler; they
/// surface from configuration loading, the key-value store, and the console.
#[derive(Debug, thiserror::Error)]
pub enum PocketError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PocketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = PocketError::Config("boot_ms must be non-zero".into());
        assert_eq!(format!("{e}"), "config error: boot_ms must be non-zero");
    }

    #[test]
    fn store_error_display() {
        let e = PocketError::Store("read-only".into());
        assert_eq!(format!("{e}"), "store error: read-only");
    }

    #[test]
    fn command_error_display() {
        let e = PocketError::Command("unknown command: frob".into());
        assert_eq!(format!("{e}"), "command error: unknown command: frob");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: PocketError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: PocketError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: PocketError = json_err.into();
        assert!(format!("{e}").contains("JSON error"));
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(PocketError::Store("oops".into()));
        assert!(r.is_err());
    }
}
