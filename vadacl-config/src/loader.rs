// Configuration file loaders

use crate::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported file formats for message tables and rule catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Parses configuration text into a `serde_json::Value` tree, whatever
/// the source format.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension.
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError(format!("No file extension: {}", path.display())))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))?;

        Ok(Self::new(format))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        vadacl_log::debug!("Loaded configuration file {}", path.display());

        self.parse(&content)
    }

    pub fn parse(&self, content: &str) -> Result<Value> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e))),
            FileFormat::Toml => {
                let toml_value: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(toml_value)
                    .map_err(|e| ConfigError::ParseError(format!("TOML conversion error: {}", e)))
            }
        }
    }

    /// Parse and deserialize straight into `T`.
    pub fn parse_into<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let value = self.parse(content)?;
        serde_json::from_value(value).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Load a file, detecting its format, and deserialize it into `T`.
pub fn load_typed<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let value = ConfigLoader::auto(path)?.load_file(path)?;
    serde_json::from_value(value).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let value = loader.parse(r#"{"required": "Needed", "n": 3}"#).unwrap();
        assert_eq!(value["required"], "Needed");
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let value = loader
            .parse("required = \"Needed\"\n\n[Company.name]\nrequired = \"Name please\"\n")
            .unwrap();
        assert_eq!(value["required"], "Needed");
        assert_eq!(value["Company"]["name"]["required"], "Name please");
    }

    #[test]
    fn test_parse_error() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(loader.parse("{not json"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_auto_detects_format() {
        assert_eq!(ConfigLoader::auto("rules.TOML").unwrap().format(), FileFormat::Toml);
        assert_eq!(ConfigLoader::auto("messages.json").unwrap().format(), FileFormat::Json);
        assert!(matches!(
            ConfigLoader::auto("messages.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(ConfigLoader::auto("messages"), Err(ConfigError::LoadError(_))));
    }
}
