pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_socket_addr,
    validate_url, Validate,
};
use clap::{Args, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use toml_config::TomlConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_PDF_FILENAME: &str = "podcast-script.pdf";
pub const DEFAULT_PDF_FONT_SIZE: f32 = 11.0;

/// 生成服務相關的命令列參數，server 與 CLI 共用
#[derive(Debug, Clone, Args)]
pub struct GeneratorArgs {
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Optional TOML config file; its values override flags")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "podscript")]
#[command(about = "Turns a podcast topic into a full episode script")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    #[command(flatten)]
    pub generator: GeneratorArgs,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub api_base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GeneratorSettings {
    /// 空字串或未替換的 `${VAR}` 視同沒有設定
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl std::fmt::Debug for GeneratorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSettings")
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Validate for GeneratorSettings {
    fn validate(&self) -> Result<()> {
        validate_url("generator.api_base_url", &self.api_base_url)?;
        validate_non_empty_string("generator.model", &self.model)?;
        validate_positive_number("generator.timeout_seconds", self.timeout_seconds, 1)?;
        if let Some(temperature) = self.temperature {
            validate_range("generator.temperature", temperature, 0.0, 2.0)?;
        }
        if let Some(tokens) = self.max_output_tokens {
            validate_positive_number("generator.max_output_tokens", u64::from(tokens), 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfSettings {
    pub filename: String,
    pub font_size: f32,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            filename: DEFAULT_PDF_FILENAME.to_string(),
            font_size: DEFAULT_PDF_FONT_SIZE,
        }
    }
}

impl Validate for PdfSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pdf.filename", &self.filename)?;
        validate_range("pdf.font_size", self.font_size, 6.0, 24.0)
    }
}

/// 合併命令列與 TOML 檔之後的最終設定
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub bind: String,
    pub json_logs: bool,
    pub generator: GeneratorSettings,
    pub pdf: PdfSettings,
}

impl GeneratorArgs {
    pub fn to_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            api_base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            timeout_seconds: self.timeout_seconds,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// 讀取 `--config` 指定的 TOML 檔（若有）
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path.display());
                TomlConfig::from_file(path).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl AppSettings {
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut settings = Self {
            bind: cli.bind.clone(),
            json_logs: cli.json_logs,
            generator: cli.generator.to_settings(),
            pdf: PdfSettings::default(),
        };

        if let Some(file) = cli.generator.load_toml()? {
            file.apply_to(&mut settings);
        }

        Ok(settings)
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.bind)?;
        self.generator.validate()?;
        self.pdf.validate()
    }
}
