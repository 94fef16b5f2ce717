//! `.phpclasscheck.toml` loading and document filtering.

use std::path::Path;

use crate::error::Error;
use crate::types::Severity;

/// Name of the project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".phpclasscheck.toml";

/// Extension analyzed when the config does not name one.
const DEFAULT_EXTENSION: &str = "php";

/// Project configuration loaded from `.phpclasscheck.toml`.
/// Include/exclude patterns are path prefixes applied to document paths.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path prefixes that are never analyzed.
    exclude: Vec<String>,
    /// Document extension without the leading dot.
    extension: String,
    /// Path prefixes to analyze; empty means everything.
    include: Vec<String>,
    /// Severity attached to every diagnostic.
    severity: Severity,
}

/// Raw TOML structure for `.phpclasscheck.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PhpClassCheckTomlConfig {
    /// `exclude = ["vendor/"]`
    #[serde(default)]
    exclude: Vec<String>,
    /// `extension = "php"`, leading dot optional.
    #[serde(default = "default_extension")]
    extension: String,
    /// `include = ["src/"]`
    #[serde(default)]
    include: Vec<String>,
    /// `severity = "error"` or `"warning"`.
    #[serde(default)]
    severity: Severity,
}

impl Config {
    /// Extension of the documents to analyze, without the leading dot.
    pub fn extension(&self) -> &str {
        return &self.extension;
    }

    /// Whether `path` has the configured extension and passes the prefix filters.
    pub fn is_document(&self, path: &Path) -> bool {
        let has_extension = path.extension().is_some_and(|ext| return ext == self.extension.as_str());
        return has_extension && self.should_scan(&path.to_string_lossy());
    }

    /// Load config from `.phpclasscheck.toml` in the given root directory.
    /// Returns a default that scans everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::scan_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        return Self::parse(&content);
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: PhpClassCheckTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            extension: raw.extension.trim_start_matches('.').to_string(),
            include: raw.include,
            severity: raw.severity,
        });
    }

    /// Default config that includes everything, excludes nothing, and reports errors.
    pub fn scan_everything_by_default() -> Self {
        return Self {
            exclude: Vec::new(),
            extension: default_extension(),
            include: Vec::new(),
            severity: Severity::Error,
        };
    }

    /// Severity every diagnostic is reported with.
    pub const fn severity(&self) -> Severity {
        return self.severity;
    }

    /// Check whether a document path should be analyzed.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// Serde default for `extension`.
fn default_extension() -> String {
    return DEFAULT_EXTENSION.to_string();
}
