//! Application configuration.
//!
//! The configuration is a JSON file.  It is looked up at, in order,
//! `--config <path>`, `$XDG_CONFIG_HOME/i3switch/config.json` and
//! `/etc/i3switch/config.json`; the first one that exists wins.
//!
//! # Example
//!
//! ```json
//! {
//!   "bindings": {
//!     "Mod4+Tab": "switch_tab next wrap",
//!     "Mod4+Shift+Tab": "switch_tab prev wrap",
//!     "Mod4+1": "switch_to_tab 1",
//!     "Mod4+h": "switch left group",
//!     "Mod4+q": ""
//!   },
//!   "socket_path": "/run/user/1000/i3switch.sock"
//! }
//! ```
//!
//! User bindings are layered over the built-in defaults one key at a time;
//! an empty action string removes a default binding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional. A minimal `{}` file is valid and falls back to
/// the compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Combo name → action string, as written in the file.  Use
    /// [`Config::bindings`] for the effective table.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,

    /// Where the trigger listener binds.  See [`Config::socket_path`].
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

/// Built-in bindings.
pub fn default_bindings() -> BTreeMap<String, String> {
    let mut bindings: BTreeMap<String, String> = [
        ("Mod4+h", "switch left group"),
        ("Mod4+j", "switch down group"),
        ("Mod4+k", "switch up group"),
        ("Mod4+l", "switch right group"),
        ("Mod4+Tab", "switch_tab next wrap"),
        ("Mod4+Shift+Tab", "switch_tab prev wrap"),
    ]
    .iter()
    .map(|(combo, action)| (combo.to_string(), action.to_string()))
    .collect();
    for n in 1..=9 {
        bindings.insert(format!("Mod4+{}", n), format!("switch_to_tab {}", n));
    }
    bindings
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Try each of `candidates` in order and load the first that exists.
    ///
    /// A file that exists but fails to parse is an error rather than being
    /// skipped.  Returns `Ok(None)` when none exist.
    pub fn discover(candidates: &[PathBuf]) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for path in candidates {
            if path.is_file() {
                return Self::load(path).map(|cfg| Some((path.clone(), cfg)));
            }
        }
        Ok(None)
    }

    /// Effective binding table: defaults overlaid with the file's bindings.
    pub fn bindings(&self) -> BTreeMap<String, String> {
        let mut merged = default_bindings();
        for (combo, action) in &self.bindings {
            if action.trim().is_empty() {
                merged.remove(combo);
            } else {
                merged.insert(combo.clone(), action.clone());
            }
        }
        merged
    }

    /// Socket path for the trigger listener: the configured one, else
    /// `$XDG_RUNTIME_DIR/i3switch.sock`, else `/tmp/i3switch.sock`.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| {
            let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
            PathBuf::from(runtime).join("i3switch.sock")
        })
    }
}

/// Standard config locations, most specific first.
///
/// `explicit` (from `--config`) comes first when given.
pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    let base = std::env::var("XDG_CONFIG_HOME").ok().map(PathBuf::from).or_else(|| {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"))
    });
    if let Some(base) = base {
        paths.push(base.join("i3switch").join("config.json"));
    }
    paths.push(PathBuf::from("/etc/i3switch/config.json"));
    paths
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "bindings": { "Mod4+n": "switch_tab next" },
            "socket_path": "/tmp/custom.sock"
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.bindings.get("Mod4+n").map(String::as_str), Some("switch_tab next"));
        assert_eq!(cfg.socket_path(), PathBuf::from("/tmp/custom.sock"));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert!(cfg.bindings.is_empty());
        assert_eq!(cfg.bindings(), default_bindings());
    }

    #[test]
    fn defaults_cover_tabs_and_directions() {
        let d = default_bindings();
        assert_eq!(d.get("Mod4+Tab").map(String::as_str), Some("switch_tab next wrap"));
        assert_eq!(d.get("Mod4+h").map(String::as_str), Some("switch left group"));
        assert_eq!(d.get("Mod4+9").map(String::as_str), Some("switch_to_tab 9"));
        assert_eq!(d.len(), 15);
    }

    #[test]
    fn user_bindings_override_and_remove() {
        let json = r#"{ "bindings": {
            "Mod4+Tab": "switch_tab next",
            "Mod4+1": "",
            "Mod4+p": "switch parent"
        } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        let merged = cfg.bindings();
        assert_eq!(merged.get("Mod4+Tab").map(String::as_str), Some("switch_tab next"));
        assert!(!merged.contains_key("Mod4+1"));
        assert_eq!(merged.get("Mod4+p").map(String::as_str), Some("switch parent"));
        // Untouched defaults survive.
        assert_eq!(merged.get("Mod4+l").map(String::as_str), Some("switch right group"));
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "bindings": {}, "future_section": { "key": 42 } }"#;
        // Unknown keys are silently ignored.
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn search_paths_put_explicit_first() {
        let paths = search_paths(Some(Path::new("/tmp/mine.json")));
        assert_eq!(paths.first(), Some(&PathBuf::from("/tmp/mine.json")));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/i3switch/config.json")));
    }

    #[test]
    fn discover_loads_first_existing() {
        let dir = std::env::temp_dir();
        let missing = dir.join(format!("i3switch-missing-{}.json", std::process::id()));
        let present = dir.join(format!("i3switch-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&present).unwrap();
        write!(file, r#"{{ "bindings": {{ "Mod4+n": "switch_tab next" }} }}"#).unwrap();
        drop(file);

        let found = Config::discover(&[missing.clone(), present.clone()]).unwrap();
        let (path, cfg) = found.expect("config should be found");
        assert_eq!(path, present);
        assert_eq!(cfg.bindings.len(), 1);

        assert!(Config::discover(&[missing]).unwrap().is_none());
        let _ = std::fs::remove_file(&present);
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("i3switch-broken-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::discover(&[path.clone()]).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
