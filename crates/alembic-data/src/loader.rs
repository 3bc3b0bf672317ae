//! Configuration discovery and loading.
//!
//! Provides format detection (RON/TOML/JSON), file discovery, and
//! deserialization into [`ConfigData`].

use crate::schema::ConfigData;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file with the given base name exists.
    #[error("configuration '{base}' not found in {dir}")]
    MissingFile { base: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Look for `{base_name}.ron`, `.toml`, and `.json` in `dir`.
///
/// Returns `Ok(None)` if none exists, or `Err(ConflictingFormats)` if more
/// than one does.
pub fn find_config_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, ConfigError> {
    let mut found: Option<PathBuf> = None;

    for format in Format::ALL {
        let candidate = dir.join(format!("{base_name}.{}", format.extension()));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(ConfigError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` as `format`. `file` only labels errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, ConfigError> {
    let parse_error = |detail: String| ConfigError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Load the configuration document at `path`.
pub fn load_config(path: &Path) -> Result<ConfigData, ConfigError> {
    let data = deserialize_file(path)?;
    info!(file = %path.display(), "Loaded configuration");
    Ok(data)
}

/// Find `{base_name}.{ron,toml,json}` in `dir` and load it.
pub fn load_config_from_dir(dir: &Path, base_name: &str) -> Result<ConfigData, ConfigError> {
    let path = find_config_file(dir, base_name)?.ok_or_else(|| ConfigError::MissingFile {
        base: base_name.to_string(),
        dir: dir.to_path_buf(),
    })?;
    load_config(&path)
}
