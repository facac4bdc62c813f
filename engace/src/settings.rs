use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use engace_api::{ClientConfig, DEFAULT_API_URL};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "engace.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub token_path: PathBuf,
    pub log_level: String,
    /// Render built-in sample responses instead of calling the backend.
    pub use_sample_data: bool,
}

impl Settings {
    /// Defaults, then `engace.toml` if present, then `ENGACE_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("token_path", ".engace/auth_token")?
            .set_default("log_level", "warn")?
            .set_default("use_sample_data", false)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix("ENGACE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            token_path: Some(self.token_path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load_from(Path::new("does-not-exist/engace.toml")).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.token_path, PathBuf::from(".engace/auth_token"));
        assert_eq!(settings.log_level, "warn");
        assert!(!settings.use_sample_data);
    }

    #[test]
    fn client_config_persists_the_token() {
        let settings = Settings::load_from(Path::new("does-not-exist/engace.toml")).unwrap();
        let config = settings.client_config();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.token_path, Some(PathBuf::from(".engace/auth_token")));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("engace-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("engace.toml");
        fs::write(
            &file,
            "api_url = \"http://localhost:5000/api\"\nuse_sample_data = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(&file).unwrap();
        assert_eq!(settings.api_url, "http://localhost:5000/api");
        assert!(settings.use_sample_data);
        assert_eq!(settings.log_level, "warn");

        fs::remove_dir_all(&dir).unwrap();
    }
}
