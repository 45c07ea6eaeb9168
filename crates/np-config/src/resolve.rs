//! Settings file resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → defaults.

use std::path::{Path, PathBuf};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/np-regions/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered settings path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPath {
    /// Path to settings.json (None means built-in defaults).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_SETTINGS_PATH: &str = "NP_SETTINGS";
pub const ENV_CONFIG_DIR: &str = "NP_CONFIG_DIR";

/// Standard settings file name.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Application name for XDG and system directories.
const APP_NAME: &str = "np-regions";

/// Locations searched after the CLI argument.
///
/// Captured once so resolution can be tested without touching the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct SearchRoots {
    /// Value of `NP_SETTINGS`.
    pub settings_env: Option<PathBuf>,
    /// Value of `NP_CONFIG_DIR`.
    pub config_dir_env: Option<PathBuf>,
    /// Per-user config directory for this application.
    pub xdg_dir: Option<PathBuf>,
    /// System-wide config directory.
    pub system_dir: Option<PathBuf>,
}

impl SearchRoots {
    /// Read the roots from the current process environment.
    pub fn from_env() -> Self {
        SearchRoots {
            settings_env: std::env::var_os(ENV_SETTINGS_PATH).map(PathBuf::from),
            config_dir_env: std::env::var_os(ENV_CONFIG_DIR).map(PathBuf::from),
            xdg_dir: xdg_config_dir(),
            system_dir: Some(system_config_dir()),
        }
    }
}

/// Resolve the settings path using the standard resolution order.
///
/// Resolution order:
/// 1. Explicit CLI path (returned even if missing, so loading can fail loudly)
/// 2. `NP_SETTINGS` environment variable
/// 3. `NP_CONFIG_DIR` environment variable + settings.json
/// 4. XDG config directory (~/.config/np-regions/)
/// 5. System config (/etc/np-regions/)
/// 6. Built-in defaults (None)
pub fn resolve_settings(cli_path: Option<&Path>) -> SettingsPath {
    resolve_settings_in(cli_path, &SearchRoots::from_env())
}

/// Resolve the settings path against explicit search roots.
pub fn resolve_settings_in(cli_path: Option<&Path>, roots: &SearchRoots) -> SettingsPath {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return SettingsPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    // 2. Environment variable (direct path)
    if let Some(path) = &roots.settings_env {
        if path.exists() {
            return found(path.clone(), ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Some(dir) = &roots.config_dir_env {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = &roots.xdg_dir {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    // 5. System config
    if let Some(dir) = &roots.system_dir {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::SystemConfig);
        }
    }

    // 6. Built-in default
    SettingsPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> SettingsPath {
    SettingsPath {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for np-regions.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(format!("{}", ConfigSource::SystemConfig), "system config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_empty_roots_give_defaults() {
        let resolved = resolve_settings_in(None, &SearchRoots::default());
        assert!(resolved.path.is_none());
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);
    }

    #[test]
    fn test_cli_path_wins_even_if_missing() {
        let missing = Path::new("/definitely/not/here/settings.json");
        let resolved = resolve_settings_in(Some(missing), &SearchRoots::default());
        assert_eq!(resolved.path.as_deref(), Some(missing));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_missing_env_paths_fall_through() {
        let roots = SearchRoots {
            settings_env: Some(PathBuf::from("/nope/settings.json")),
            config_dir_env: Some(PathBuf::from("/nope")),
            ..SearchRoots::default()
        };
        let resolved = resolve_settings_in(None, &roots);
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/np-regions"));
    }
}
