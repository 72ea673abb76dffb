use std::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::ingestion::cache::SourceLocation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error("Unknown URL scheme for network input: {0}")]
    UnknownScheme(String),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub build: BuildConfig,
    pub serve: ServeConfig,
}

#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Network description, `path:` prefixed.
    pub input: String,
    /// Snapshot written by the build phase.
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct ServeConfig {
    pub snapshot: String,
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl BuildConfig {
    pub fn location(&self) -> Result<SourceLocation, ConfigError> {
        let url = &self.input;
        if let Some(path) = url.strip_prefix("path:") {
            Ok(SourceLocation::Local(path.to_string()))
        } else if url.starts_with("http://") || url.starts_with("https://") {
            Ok(SourceLocation::Remote(url.to_string()))
        } else {
            Err(ConfigError::UnknownScheme(url.to_string()))
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = Config::parse(
            "build:\n  input: path:data/network.yml\n  output: data/network.bin\n\
             serve:\n  snapshot: data/network.bin\n  bind: 0.0.0.0:8080\n",
        )
        .unwrap();
        assert_eq!(config.build.output, "data/network.bin");
        assert_eq!(config.serve.bind, "0.0.0.0:8080");
        assert!(matches!(
            config.build.location().unwrap(),
            SourceLocation::Local(p) if p == "data/network.yml"
        ));
    }

    #[test]
    fn bind_has_default() {
        let config = Config::parse(
            "build:\n  input: https://example.org/net.yml\n  output: out.bin\n\
             serve:\n  snapshot: out.bin\n",
        )
        .unwrap();
        assert_eq!(config.serve.bind, "127.0.0.1:3000");
        assert!(matches!(
            config.build.location().unwrap(),
            SourceLocation::Remote(_)
        ));
    }

    #[test]
    fn unknown_scheme() {
        let config = Config::parse(
            "build:\n  input: ftp://example.org/net.yml\n  output: out.bin\n\
             serve:\n  snapshot: out.bin\n",
        )
        .unwrap();
        assert!(matches!(
            config.build.location(),
            Err(ConfigError::UnknownScheme(_))
        ));
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(matches!(
            Config::parse("build:\n  input: path:x\n  output: y\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
