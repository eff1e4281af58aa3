//! Logging configuration read from the `[Log]` section of an INI file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, Properties};
use proven_logger::Level;
use tracing::debug;

/// Well-known location of the configuration file.
#[cfg(windows)]
pub const DEFAULT_CONFIG_PATH: &str = r"C:\ProgramData\SimplyLive.TV\Vibox\Backend\LogConfig.ini";

/// Well-known location of the configuration file.
#[cfg(not(windows))]
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vibox/LogConfig.ini";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "VIBOX_LOG_CONFIG";

/// Default rotation threshold, in megabytes.
pub const DEFAULT_FILE_SIZE_MB: u64 = 20;

/// Default number of rotated files kept next to the active one.
pub const DEFAULT_MAX_FILES: usize = 5;

/// How often buffered output is flushed when instant flush is off.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Slots in the queue shared by asynchronous loggers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8192;

const SECTION: &str = "Log";
const KEY_FILE_SIZE_MB: &str = "size_per_file_MB";
const KEY_FILE_NUM: &str = "file_num";
const KEY_ENABLE_DEBUG: &str = "EnableDebug";
const KEY_ASYNC: &str = "Async";
const KEY_INSTANT_FLUSH: &str = "InstantFlush";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Settings shared by every logger of a registry.
///
/// Immutable once handed to a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Size in bytes at which the active file is rotated
    pub max_file_size: u64,
    /// Number of rotated files kept
    pub max_files: usize,
    /// Whether `Debug` records are emitted
    pub enable_debug: bool,
    /// Deliver records through the background writer thread
    pub async_mode: bool,
    /// Flush after every record instead of periodically
    pub instant_flush: bool,
    /// Inserted into every file name, e.g. `_host`
    pub app_tag: String,
    /// Period of the background flush when `instant_flush` is off
    pub flush_interval: Duration,
    /// Capacity of the asynchronous queue
    pub queue_capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_FILE_SIZE_MB * BYTES_PER_MB,
            max_files: DEFAULT_MAX_FILES,
            enable_debug: false,
            async_mode: true,
            instant_flush: false,
            app_tag: app_tag_from_current_exe(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl LogConfig {
    /// Path the process-wide configuration is read from.
    ///
    /// [`CONFIG_PATH_ENV`] wins over [`DEFAULT_CONFIG_PATH`].
    #[must_use]
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Loads the configuration from [`LogConfig::config_path`].
    #[must_use]
    pub fn load() -> Self {
        Self::from_file(Self::config_path())
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing or unparsable file yields the defaults.
    #[must_use]
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Ini::load_from_file_noescape(path) {
            Ok(ini) => {
                let config = Self::from_ini(&ini);
                debug!(path = %path.display(), ?config, "loaded logging configuration");
                config
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "using default logging configuration");
                Self::default()
            }
        }
    }

    /// Parses configuration text in INI format.
    ///
    /// Unparsable text yields the defaults.
    #[must_use]
    pub fn from_ini_str(text: &str) -> Self {
        match Ini::load_from_str_noescape(text) {
            Ok(ini) => Self::from_ini(&ini),
            Err(e) => {
                debug!(error = %e, "using default logging configuration");
                Self::default()
            }
        }
    }

    fn from_ini(ini: &Ini) -> Self {
        let defaults = Self::default();
        let Some(section) = ini
            .iter()
            .find(|(name, _)| name.is_some_and(|name| name.eq_ignore_ascii_case(SECTION)))
            .map(|(_, properties)| properties)
        else {
            return defaults;
        };

        let size_mb = read_int(section, KEY_FILE_SIZE_MB, DEFAULT_FILE_SIZE_MB);
        Self {
            max_file_size: size_mb.saturating_mul(BYTES_PER_MB),
            max_files: usize::try_from(read_int(section, KEY_FILE_NUM, DEFAULT_MAX_FILES as u64))
                .unwrap_or(DEFAULT_MAX_FILES),
            enable_debug: read_bool(section, KEY_ENABLE_DEBUG, defaults.enable_debug),
            async_mode: read_bool(section, KEY_ASYNC, defaults.async_mode),
            instant_flush: read_bool(section, KEY_INSTANT_FLUSH, defaults.instant_flush),
            ..defaults
        }
    }

    /// Sets the rotation threshold in bytes.
    #[must_use]
    pub const fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets the number of rotated files kept.
    #[must_use]
    pub const fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }

    /// Enables or disables `Debug` output.
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.enable_debug = enabled;
        self
    }

    /// Selects asynchronous or synchronous delivery.
    #[must_use]
    pub const fn with_async(mut self, enabled: bool) -> Self {
        self.async_mode = enabled;
        self
    }

    /// Enables or disables flushing after every record.
    #[must_use]
    pub const fn with_instant_flush(mut self, enabled: bool) -> Self {
        self.instant_flush = enabled;
        self
    }

    /// Overrides the tag derived from the executable name.
    #[must_use]
    pub fn with_app_tag(mut self, tag: impl Into<String>) -> Self {
        self.app_tag = tag.into();
        self
    }

    /// Sets the period of the background flush.
    #[must_use]
    pub const fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Sets the capacity of the asynchronous queue.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Least severe level loggers emit.
    #[must_use]
    pub const fn min_level(&self) -> Level {
        if self.enable_debug {
            Level::Debug
        } else {
            Level::Info
        }
    }

    /// Level at or above which loggers flush after each record, if any.
    #[must_use]
    pub const fn flush_level(&self) -> Option<Level> {
        if self.instant_flush {
            None
        } else {
            Some(Level::Error)
        }
    }
}

/// `_` followed by the running executable's file stem.
#[must_use]
pub fn app_tag_from_current_exe() -> String {
    let stem = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default();
    format!("_{stem}")
}

fn lookup<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

fn read_int(section: &Properties, key: &str, default: u64) -> u64 {
    lookup(section, key).map_or(default, parse_profile_int)
}

fn read_bool(section: &Properties, key: &str, default: bool) -> bool {
    lookup(section, key).map_or(default, |value| parse_profile_int(value) != 0)
}

/// Reads an integer the way the Windows profile API does: leading digits
/// count, anything after them is ignored, no digits or a negative value
/// reads as zero.
fn parse_profile_int(value: &str) -> u64 {
    let value = value.trim();
    if value.starts_with('-') {
        return 0;
    }
    let digits = value.strip_prefix('+').unwrap_or(value);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();

        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
        assert_eq!(config.max_files, 5);
        assert!(!config.enable_debug);
        assert!(config.async_mode);
        assert!(!config.instant_flush);
        assert!(config.app_tag.starts_with('_'));
        assert_eq!(config.flush_interval, Duration::from_secs(5));
        assert_eq!(config.queue_capacity, 8192);
        assert_eq!(config.min_level(), Level::Info);
        assert_eq!(config.flush_level(), Some(Level::Error));
    }

    #[test]
    fn test_full_section() {
        let config = LogConfig::from_ini_str(
            "[Log]\n\
             size_per_file_MB=2\n\
             file_num=9\n\
             EnableDebug=1\n\
             Async=0\n\
             InstantFlush=1\n",
        );

        assert_eq!(config.max_file_size, 2 * 1024 * 1024);
        assert_eq!(config.max_files, 9);
        assert!(config.enable_debug);
        assert!(!config.async_mode);
        assert!(config.instant_flush);
        assert_eq!(config.min_level(), Level::Debug);
        assert_eq!(config.flush_level(), None);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = LogConfig::from_ini_str("[Log]\nfile_num=3\n");

        assert_eq!(config.max_files, 3);
        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
        assert!(config.async_mode);
    }

    #[test]
    fn test_other_sections_are_ignored() {
        let config = LogConfig::from_ini_str("[Other]\nfile_num=3\nEnableDebug=1\n");

        assert_eq!(config.max_files, 5);
        assert!(!config.enable_debug);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let config = LogConfig::from_ini_str("[log]\nFILE_NUM=7\nenabledebug=1\n");

        assert_eq!(config.max_files, 7);
        assert!(config.enable_debug);
    }

    #[test]
    fn test_lenient_integers() {
        assert_eq!(parse_profile_int("32"), 32);
        assert_eq!(parse_profile_int(" 32MB"), 32);
        assert_eq!(parse_profile_int("+4"), 4);
        assert_eq!(parse_profile_int("-4"), 0);
        assert_eq!(parse_profile_int("yes"), 0);
        assert_eq!(parse_profile_int(""), 0);

        let config = LogConfig::from_ini_str("[Log]\nAsync=no\nEnableDebug=2\n");
        assert!(!config.async_mode);
        assert!(config.enable_debug);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = LogConfig::from_file(dir.path().join("absent.ini"));

        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("LogConfig.ini");
        std::fs::write(
            &path,
            "; comment\r\n[Log]\r\nsize_per_file_MB=1\r\nInstantFlush=1\r\n",
        )
        .unwrap();

        let config = LogConfig::from_file(&path);

        assert_eq!(config.max_file_size, 1024 * 1024);
        assert!(config.instant_flush);
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default()
            .with_max_file_size(10)
            .with_max_files(1)
            .with_debug(true)
            .with_async(false)
            .with_instant_flush(true)
            .with_app_tag("_tool")
            .with_flush_interval(Duration::from_millis(50))
            .with_queue_capacity(4);

        assert_eq!(config.max_file_size, 10);
        assert_eq!(config.max_files, 1);
        assert!(config.enable_debug);
        assert!(!config.async_mode);
        assert!(config.instant_flush);
        assert_eq!(config.app_tag, "_tool");
        assert_eq!(config.flush_interval, Duration::from_millis(50));
        assert_eq!(config.queue_capacity, 4);
    }
}
