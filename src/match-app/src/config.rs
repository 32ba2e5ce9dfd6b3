// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name shared by every match binary.
pub const CONFIG_FILE_NAME: &str = "match-rs.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Returns the default search paths for `match-rs.toml`
/// (current directory → XDG config → /etc).
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("match-rs").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc/match-rs").join(CONFIG_FILE_NAME));
    paths
}

/// Extract and deserialize a named section from TOML text.
fn parse_section<T: DeserializeOwned>(
    path: &Path,
    content: &str,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let table: toml::Table = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

    let Some(section) = table.get(key) else {
        return Ok(None);
    };

    // Re-serialize the section then parse as T so all serde defaults apply.
    let section_toml = toml::to_string(section)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
    let cfg = toml::from_str::<T>(&section_toml)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
    Ok(Some(cfg))
}

/// Extract and deserialize a named section from a TOML file.
///
/// Returns `Ok(Some(cfg))` when the section is present and parses cleanly,
/// `Ok(None)` when the section is absent, or `Err` on I/O / parse failure.
fn load_section_from_file<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
    parse_section(path, &content, key)
}

/// Trait for loading configuration from a `match-rs.toml` section.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key in `match-rs.toml` (e.g. `"match-device"`).
    fn section_key() -> &'static str;

    /// Load the section from a specific file path.
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// does not contain the expected `[<section_key>]` header.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_section_from_file::<Self>(path, Self::section_key())?.ok_or_else(|| {
            ConfigError::ParseError(
                path.to_path_buf(),
                format!("missing [{}] section", Self::section_key()),
            )
        })
    }

    /// Search default paths (`match-rs.toml` in CWD → XDG → /etc) and load
    /// the first file that contains the expected section.
    ///
    /// Returns `(config, path_where_found)` or `(Default::default(), None)`
    /// when no config file is found.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if path.exists() {
                if let Some(cfg) = load_section_from_file::<Self>(&path, Self::section_key())? {
                    return Ok((cfg, Some(path)));
                }
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: String,
        retries: u32,
    }

    impl ConfigFile for Sample {
        fn section_key() -> &'static str {
            "sample"
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("match-app-{}-{}.toml", tag, std::process::id()))
    }

    #[test]
    fn test_search_paths_order() {
        let paths = config_search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("match-rs.toml")));
        assert_eq!(
            paths.last(),
            Some(&PathBuf::from("/etc/match-rs/match-rs.toml"))
        );
    }

    #[test]
    fn test_section_defaults_apply() {
        let doc = "[sample]\nname = \"a\"\n\n[other]\nretries = 9\n";
        let cfg = parse_section::<Sample>(Path::new("inline"), doc, "sample").unwrap();
        assert_eq!(
            cfg,
            Some(Sample {
                name: "a".to_string(),
                retries: 0
            })
        );
    }

    #[test]
    fn test_missing_section_is_none() {
        let doc = "[other]\nx = 1\n";
        let cfg = parse_section::<Sample>(Path::new("inline"), doc, "sample").unwrap();
        assert_eq!(cfg, None);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = parse_section::<Sample>(Path::new("inline"), "[sample\n", "sample");
        let err = err.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
    }

    #[test]
    fn test_load_from_file_requires_section() {
        let path = temp_path("nosection");
        std::fs::write(&path, "[other]\nx = 1\n").unwrap();
        let err = Sample::load_from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("missing [sample] section"));
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_path("ok");
        std::fs::write(&path, "[sample]\nretries = 3\n").unwrap();
        let cfg = Sample::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.unwrap().retries, 3);
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let err = Sample::load_from_file(Path::new("/nonexistent/match-rs.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_, _)));
    }
}
