//! Persistence of the lock-screen configuration and named profiles.
//!
//! Storage is best effort: a missing or unreadable value falls back to
//! defaults and a failed write is logged, never propagated.

use std::collections::BTreeMap;

use pocket_platform::KeyValueStore;

use super::config::LockScreenConfig;

/// Store key of the current configuration.
pub const CONFIG_KEY: &str = "lockScreenConfig";
/// Store key of the named profile map.
pub const PROFILES_KEY: &str = "lockScreenProfiles";

/// Read the current configuration. On first run the defaults are written
/// back so later reads find them.
pub fn load_config(store: &mut dyn KeyValueStore) -> LockScreenConfig {
    match store.get(CONFIG_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("unreadable {CONFIG_KEY}, using defaults: {e}");
                LockScreenConfig::default()
            },
        },
        Ok(None) => {
            let config = LockScreenConfig::default();
            save_config(store, &config);
            config
        },
        Err(e) => {
            log::warn!("failed to read {CONFIG_KEY}: {e}");
            LockScreenConfig::default()
        },
    }
}

/// Write the current configuration. Returns whether the write succeeded.
pub fn save_config(store: &mut dyn KeyValueStore, config: &LockScreenConfig) -> bool {
    write_json(store, CONFIG_KEY, config)
}

/// Read every named profile. Unreadable data yields an empty map.
pub fn load_profiles(store: &dyn KeyValueStore) -> BTreeMap<String, LockScreenConfig> {
    match store.get(PROFILES_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("unreadable {PROFILES_KEY}, ignoring: {e}");
            BTreeMap::new()
        }),
        Ok(None) => BTreeMap::new(),
        Err(e) => {
            log::warn!("failed to read {PROFILES_KEY}: {e}");
            BTreeMap::new()
        },
    }
}

pub fn save_profiles(
    store: &mut dyn KeyValueStore,
    profiles: &BTreeMap<String, LockScreenConfig>,
) -> bool {
    write_json(store, PROFILES_KEY, profiles)
}

fn write_json<T: serde::Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("failed to encode {key}: {e}");
            return false;
        },
    };
    match store.set(key, &raw) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to write {key}: {e}");
            false
        },
    }
}
