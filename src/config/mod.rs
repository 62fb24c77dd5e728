mod file_config;

pub use file_config::FileConfig;

use crate::lyrics::genius::GENIUS_API_BASE;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "library.db";

/// CLI arguments that can be used for config resolution.
/// Environment fallbacks are already applied by clap.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub genius_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub genius_token: Option<String>,
    pub genius_api_base: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let genius_token =
            non_blank(file.genius_token).or_else(|| non_blank(cli.genius_token.clone()));

        let genius_api_base = file
            .genius_api_base
            .unwrap_or_else(|| GENIUS_API_BASE.to_string());

        Ok(Self {
            db_path,
            genius_token,
            genius_api_base,
        })
    }

    /// The Genius access token, required by the lyrics sync.
    pub fn require_genius_token(&self) -> Result<&str> {
        self.genius_token.as_deref().ok_or_else(|| {
            anyhow!(
                "Genius access token must be specified via --genius-token, LYRIC_GENIUS_TOKEN or genius_token in config file"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::resolve(&CliConfig::default(), None).unwrap();

        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.genius_api_base, GENIUS_API_BASE);
        assert!(config.require_genius_token().is_err());
    }

    #[test]
    fn test_cli_values_used_when_file_silent() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/cli/library.db")),
            genius_token: Some("cli-token".to_string()),
        };

        let config = AppConfig::resolve(&cli, Some(FileConfig::default())).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/cli/library.db"));
        assert_eq!(config.require_genius_token().unwrap(), "cli-token");
    }

    #[test]
    fn test_file_overrides_cli() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/cli/library.db")),
            genius_token: Some("cli-token".to_string()),
        };
        let file = FileConfig {
            db_path: Some("/file/library.db".to_string()),
            genius_token: Some("file-token".to_string()),
            genius_api_base: Some("http://localhost:9999".to_string()),
        };

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/file/library.db"));
        assert_eq!(config.require_genius_token().unwrap(), "file-token");
        assert_eq!(config.genius_api_base, "http://localhost:9999");
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let cli = CliConfig {
            db_path: None,
            genius_token: Some("   ".to_string()),
        };
        let file = FileConfig {
            genius_token: Some(String::new()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file)).unwrap();

        let err = config.require_genius_token().unwrap_err();
        assert!(err.to_string().contains("LYRIC_GENIUS_TOKEN"));
    }
}
