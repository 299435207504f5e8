use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub screenshot: ScreenshotConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Never read from the file, filled in from `api_key_env`.
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScreenshotConfig {
    pub pdftoppm_path: String,
    pub dpi: u32,
    pub temp_dir: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "deepseek-r1-distill-llama-70b".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            pdftoppm_path: "pdftoppm".to_string(),
            dpi: 200,
            temp_dir: std::env::temp_dir().to_string_lossy().to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults, then pull the
    /// API key from the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            log::info!("No {} found, using default configuration", path.display());
            Config::default()
        };

        config.api.api_key = std::env::var(&config.api.api_key_env).with_context(|| {
            format!(
                "{} is not set. Export it or add it to a .env file.",
                config.api.api_key_env
            )
        })?;

        Ok(config)
    }
}
