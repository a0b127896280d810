use crate::config::{AppSettings, GeneratorSettings, PdfSettings};
use crate::utils::error::{Result, ScriptError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub api_base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    pub filename: Option<String>,
    pub font_size: Option<f32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScriptError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScriptError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScriptError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 檔案中有寫的值覆蓋命令列的值
    pub fn apply_to(self, settings: &mut AppSettings) {
        if let Some(bind) = self.server.bind {
            settings.bind = bind;
        }
        if let Some(json_logs) = self.server.json_logs {
            settings.json_logs = json_logs;
        }
        self.generator.apply_to(&mut settings.generator);
        self.pdf.apply_to(&mut settings.pdf);
    }
}

impl GeneratorConfig {
    pub fn apply_to(self, settings: &mut GeneratorSettings) {
        if let Some(api_base_url) = self.api_base_url {
            settings.api_base_url = api_base_url;
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        // 未替換的 `${VAR}` 或空字串不覆蓋命令列給的金鑰
        if let Some(api_key) = self
            .api_key
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
        {
            settings.api_key = Some(api_key);
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if self.temperature.is_some() {
            settings.temperature = self.temperature;
        }
        if self.max_output_tokens.is_some() {
            settings.max_output_tokens = self.max_output_tokens;
        }
    }
}

impl PdfConfig {
    pub fn apply_to(self, settings: &mut PdfSettings) {
        if let Some(filename) = self.filename {
            settings.filename = filename;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfig, DEFAULT_MODEL};
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn base_settings() -> AppSettings {
        let cli = CliConfig::parse_from(["podscript", "--api-key", "from-cli"]);
        AppSettings {
            bind: cli.bind.clone(),
            json_logs: false,
            generator: cli.generator.to_settings(),
            pdf: PdfSettings::default(),
        }
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind = "0.0.0.0:8080"
json_logs = true

[generator]
model = "gemini-2.5-pro"
timeout_seconds = 90
temperature = 0.8
max_output_tokens = 4096

[pdf]
filename = "episode.pdf"
font_size = 12.0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = base_settings();
        config.apply_to(&mut settings);

        assert_eq!(settings.bind, "0.0.0.0:8080");
        assert!(settings.json_logs);
        assert_eq!(settings.generator.model, "gemini-2.5-pro");
        assert_eq!(settings.generator.timeout_seconds, 90);
        assert_eq!(settings.generator.temperature, Some(0.8));
        assert_eq!(settings.generator.max_output_tokens, Some(4096));
        assert_eq!(settings.generator.api_key(), Some("from-cli"));
        assert_eq!(settings.pdf.filename, "episode.pdf");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_file_keeps_cli_values() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let mut settings = base_settings();
        config.apply_to(&mut settings);

        assert_eq!(settings.generator.model, DEFAULT_MODEL);
        assert_eq!(settings.generator.api_key(), Some("from-cli"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PODSCRIPT_TEST_GEMINI_KEY", "key-from-env");

        let toml_content = r#"
[generator]
api_key = "${PODSCRIPT_TEST_GEMINI_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.generator.api_key.as_deref(), Some("key-from-env"));

        std::env::remove_var("PODSCRIPT_TEST_GEMINI_KEY");
    }

    #[test]
    fn test_unresolved_env_var_is_kept() {
        let toml_content = r#"
[generator]
api_key = "${PODSCRIPT_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.generator.api_key.as_deref(),
            Some("${PODSCRIPT_TEST_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_unresolved_api_key_keeps_cli_key() {
        let toml_content = r#"
[generator]
api_key = "${PODSCRIPT_TEST_UNSET_KEY_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = base_settings();
        config.apply_to(&mut settings);

        assert_eq!(settings.generator.api_key(), Some("from-cli"));
    }

    #[test]
    fn test_resolved_api_key_overrides_cli_key() {
        let toml_content = r#"
[generator]
api_key = "from-file"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = base_settings();
        config.apply_to(&mut settings);

        assert_eq!(settings.generator.api_key(), Some("from-file"));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[generator]
api_base_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let mut settings = base_settings();
        config.apply_to(&mut settings);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[generator\nmodel = ");
        assert!(matches!(
            result,
            Err(ScriptError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
bind = "127.0.0.1:4000"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:4000"));
    }
}
