//! Settings loaded once at startup and read-only thereafter.
//!
//! Fetch tunables feed [`crate::store::StoreSettings`]; view settings are
//! presentation configuration (background, dark mode, default sort) that
//! gets injected into consuming views rather than read from globals.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::SortField;
use crate::store::StoreSettings;

/// Commented starter configuration written on first run.
pub(crate) const SKELETON_CONFIG_CONTENT: &str = "# Guidepost configuration\n\
#\n\
# Values below are the defaults; uncomment and edit to override.\n\
\n\
[fetch]\n\
# Deadline for a collection fetch, in seconds. Expiry cancels the request\n\
# and shows the timed-out retry affordance.\n\
# timeout_secs = 10\n\
# How long a fetched collection stays fresh enough to serve a remount\n\
# without a network call, in seconds.\n\
# staleness_secs = 300\n\
# Retries after the first failed attempt before giving up.\n\
# retry_limit = 2\n\
# Base delay between attempts, in milliseconds.\n\
# retry_backoff_ms = 250\n\
\n\
[view]\n\
# Background texture name used by the site shell.\n\
# background = \"default\"\n\
# dark_mode = false\n\
# Default sort field for content lists.\n\
# Allowed values: title | linked_guide | created\n\
# default_sort = \"title\"\n";

/// Fetch lifecycle tunables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Deadline for the whole attempt sequence, in seconds.
    pub timeout_secs: u64,
    /// Staleness window for cached snapshots, in seconds.
    pub staleness_secs: u64,
    /// Retries after the first failed attempt.
    pub retry_limit: u32,
    /// Base backoff between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            staleness_secs: 300,
            retry_limit: 2,
            retry_backoff_ms: 250,
        }
    }
}

/// Presentation configuration injected into views; loaded once, never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Background texture name used by the site shell.
    pub background: String,
    /// Whether the dark palette is active.
    pub dark_mode: bool,
    /// Config key of the default sort field; unknown values fall back to
    /// the title field.
    pub default_sort: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            background: "default".to_string(),
            dark_mode: false,
            default_sort: SortField::Title.as_config_key().to_string(),
        }
    }
}

/// Root settings document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fetch lifecycle tunables.
    pub fetch: FetchSettings,
    /// Presentation configuration.
    pub view: ViewSettings,
}

impl Settings {
    /// What: Load settings from a TOML file, falling back to defaults.
    ///
    /// Inputs:
    /// - `path`: Settings file location.
    ///
    /// Output:
    /// - Parsed settings; a missing or invalid file yields defaults with a
    ///   warning rather than an error.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid settings file; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable settings file; using defaults");
                }
                Self::default()
            }
        }
    }

    /// What: Translate fetch settings into store tunables.
    ///
    /// Inputs: none
    ///
    /// Output: [`StoreSettings`] with durations built from the configured
    /// seconds/milliseconds.
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            fetch_timeout: Duration::from_secs(self.fetch.timeout_secs),
            staleness_window: Duration::from_secs(self.fetch.staleness_secs),
            retry_limit: self.fetch.retry_limit,
            retry_backoff: Duration::from_millis(self.fetch.retry_backoff_ms),
        }
    }

    /// What: Resolve the configured default sort field.
    ///
    /// Inputs: none
    ///
    /// Output: Parsed [`SortField`]; unknown keys fall back to the default
    /// field instead of erroring.
    #[must_use]
    pub fn default_sort_field(&self) -> SortField {
        SortField::from_config_key(&self.view.default_sort).unwrap_or_default()
    }
}

/// What: Write the commented skeleton configuration when none exists.
///
/// Inputs:
/// - `path`: Settings file location; parent directories are created.
///
/// Output:
/// - Existing files are left untouched. Write failures are logged and
///   swallowed; the caller proceeds with defaults either way.
pub fn ensure_config_file(path: &Path) {
    if path.exists() {
        return;
    }
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        tracing::warn!(path = %path.display(), error = %e, "cannot create settings directory");
        return;
    }
    match std::fs::write(path, SKELETON_CONFIG_CONTENT) {
        Ok(()) => tracing::info!(path = %path.display(), "wrote starter settings"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot write starter settings"),
    }
}
