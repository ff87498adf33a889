//! Configuration module for camsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for camsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub shell: ShellConfig,
    pub staging: StagingConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub settings: SettingsConfig,
}

/// Camera directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Base directory the camera hook reads media and markers from.
    pub base_dir: PathBuf,
}

/// Privileged shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Binary used to elevate; invoked as `<su_binary> -c <command>`.
    pub su_binary: String,
    /// Seconds before a privileged command is killed.
    pub timeout_secs: u64,
}

/// Scratch storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Private directory holding scratch copies of selected media.
    pub scratch_dir: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Path to the debug log file written by the file sink.
    pub file: PathBuf,
}

/// Log export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Public directory the debug log is copied into.
    pub destination_dir: PathBuf,
}

/// Persisted selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// YAML file holding the picked media and the target app.
    pub file: PathBuf,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/camsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("camsync")
            .join("config.yaml")
    }

    /// Full path of the debug log inside the export directory.
    pub fn export_destination(&self) -> PathBuf {
        let file_name = self
            .logging
            .file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEBUG_LOG_FILE_NAME));
        self.export.destination_dir.join(file_name)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default filename of the debug log.
pub const DEBUG_LOG_FILE_NAME: &str = "camsync_debug.log";

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("camsync")
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/sdcard/DCIM/Camera1"),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            su_binary: "su".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            scratch_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("~/.cache"))
                .join("camsync")
                .join("staging"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: data_dir().join(DEBUG_LOG_FILE_NAME),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            destination_dir: PathBuf::from("/sdcard/Download"),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            file: data_dir().join("settings.yaml"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"shell.timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `shell.timeout_secs`.
const MAX_SHELL_TIMEOUT_SECS: u64 = 600;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- camera ---
        if self.camera.base_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "camera.base_dir".into(),
                message: "must not be empty".into(),
            });
        } else if !self.camera.base_dir.is_absolute() {
            errors.push(ValidationError {
                field: "camera.base_dir".into(),
                message: format!(
                    "must be an absolute path: {}",
                    self.camera.base_dir.display()
                ),
            });
        }

        // --- shell ---
        if self.shell.su_binary.trim().is_empty() {
            errors.push(ValidationError {
                field: "shell.su_binary".into(),
                message: "must not be empty".into(),
            });
        }
        if self.shell.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "shell.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        } else if self.shell.timeout_secs > MAX_SHELL_TIMEOUT_SECS {
            errors.push(ValidationError {
                field: "shell.timeout_secs".into(),
                message: format!("must not exceed {MAX_SHELL_TIMEOUT_SECS}"),
            });
        }

        // --- staging ---
        if self.staging.scratch_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "staging.scratch_dir".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.logging.file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "logging.file".into(),
                message: "must not be empty".into(),
            });
        }

        // --- export ---
        if self.export.destination_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "export.destination_dir".into(),
                message: "must not be empty".into(),
            });
        }

        // --- settings ---
        if self.settings.file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "settings.file".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use camsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .camera_base_dir(PathBuf::from("/sdcard/DCIM/Camera1"))
///     .shell_timeout_secs(10)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn camera_base_dir(mut self, dir: PathBuf) -> Self {
        self.config.camera.base_dir = dir;
        self
    }

    pub fn shell_su_binary(mut self, binary: impl Into<String>) -> Self {
        self.config.shell.su_binary = binary.into();
        self
    }

    pub fn shell_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.shell.timeout_secs = seconds;
        self
    }

    pub fn staging_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.config.staging.scratch_dir = dir;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_file(mut self, file: PathBuf) -> Self {
        self.config.logging.file = file;
        self
    }

    pub fn export_destination_dir(mut self, dir: PathBuf) -> Self {
        self.config.export.destination_dir = dir;
        self
    }

    pub fn settings_file(mut self, file: PathBuf) -> Self {
        self.config.settings.file = file;
        self
    }

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.camera.base_dir, PathBuf::from("/sdcard/DCIM/Camera1"));
        assert_eq!(cfg.shell.su_binary, "su");
        assert_eq!(cfg.shell.timeout_secs, 30);
        assert!(cfg.staging.scratch_dir.ends_with("camsync/staging"));
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.file.ends_with(DEBUG_LOG_FILE_NAME));
        assert_eq!(cfg.export.destination_dir, PathBuf::from("/sdcard/Download"));
        assert!(cfg.settings.file.ends_with("settings.yaml"));
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
camera:
  base_dir: /tmp/camera
shell:
  su_binary: /system/xbin/su
  timeout_secs: 10
staging:
  scratch_dir: /tmp/scratch
logging:
  level: debug
  file: /tmp/debug.log
export:
  destination_dir: /tmp/export
settings:
  file: /tmp/settings.yaml
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.camera.base_dir, PathBuf::from("/tmp/camera"));
        assert_eq!(cfg.shell.su_binary, "/system/xbin/su");
        assert_eq!(cfg.shell.timeout_secs, 10);
        assert_eq!(cfg.staging.scratch_dir, PathBuf::from("/tmp/scratch"));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.file, PathBuf::from("/tmp/debug.log"));
        assert_eq!(cfg.export.destination_dir, PathBuf::from("/tmp/export"));
        assert_eq!(cfg.settings.file, PathBuf::from("/tmp/settings.yaml"));
    }

    #[test]
    fn load_partial_yaml_fills_defaults() {
        let yaml = "shell:\n  timeout_secs: 5\n";
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.shell.timeout_secs, 5);
        assert_eq!(cfg.shell.su_binary, "su");
        assert_eq!(cfg.camera.base_dir, PathBuf::from("/sdcard/DCIM/Camera1"));
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/camsync/config.yaml"));
        assert_eq!(cfg.shell.timeout_secs, 30);
    }

    #[test]
    fn load_rejects_malformed_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"shell: [not, a, map]").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    // -- Validation --

    #[test]
    fn validate_reports_every_problem() {
        let cfg = ConfigBuilder::new()
            .camera_base_dir(PathBuf::from("relative/dir"))
            .shell_su_binary("  ")
            .shell_timeout_secs(0)
            .logging_level("verbose")
            .build();

        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"camera.base_dir".to_string()));
        assert!(fields.contains(&"shell.su_binary".to_string()));
        assert!(fields.contains(&"shell.timeout_secs".to_string()));
        assert!(fields.contains(&"logging.level".to_string()));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn validate_rejects_excessive_timeout() {
        let result = ConfigBuilder::new().shell_timeout_secs(601).build_validated();
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "shell.timeout_secs");
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "shell.timeout_secs".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "shell.timeout_secs: must be greater than 0");
    }

    // -- Export destination --

    #[test]
    fn export_destination_uses_log_file_name() {
        let cfg = ConfigBuilder::new()
            .logging_file(PathBuf::from("/data/app/my_debug.log"))
            .export_destination_dir(PathBuf::from("/sdcard/Download"))
            .build();
        assert_eq!(
            cfg.export_destination(),
            PathBuf::from("/sdcard/Download/my_debug.log")
        );
    }

    // -- Builder --

    #[test]
    fn builder_overrides_and_validates() {
        let cfg = ConfigBuilder::new()
            .camera_base_dir(PathBuf::from("/data/camera"))
            .staging_scratch_dir(PathBuf::from("/data/scratch"))
            .settings_file(PathBuf::from("/data/settings.yaml"))
            .build_validated()
            .expect("valid config");
        assert_eq!(cfg.camera.base_dir, PathBuf::from("/data/camera"));
        assert_eq!(cfg.staging.scratch_dir, PathBuf::from("/data/scratch"));
    }
}
