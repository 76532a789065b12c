use crate::config::{validate_formats, validate_query};
use crate::core::pipeline::DEFAULT_ZIP_FILENAME;
use crate::core::source::SEED_SOURCE;
use crate::core::{CatalogSource, ConfigProvider};
use crate::domain::catalog::InstitutionQuery;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: Option<InstitutionQuery>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `seed` 或 `file`
    pub r#type: String,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CATALOG_FILE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type.as_str() {
            SEED_SOURCE => {}
            "file" => {
                let path = validate_required_field("source.path", &self.source.path)?;
                validate_path("source.path", path)?;
                validate_file_extension("source.path", path, &["json", "toml"])?;
            }
            other => {
                return Err(CatalogError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Valid source types: seed, file".to_string(),
                })
            }
        }

        validate_path("load.output_path", &self.load.output_path)?;
        validate_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(filename) = self.zip_filename() {
            validate_path("load.compression.filename", filename)?;
        }

        if let Some(filter) = &self.filter {
            validate_query("filter.", filter)?;
        }

        Ok(())
    }

    /// 依 `[source]` 建立資料來源
    pub fn build_source(&self) -> Result<Box<dyn CatalogSource>> {
        let spec = match self.source.r#type.as_str() {
            "file" => validate_required_field("source.path", &self.source.path)?.as_str(),
            _ => SEED_SOURCE,
        };
        crate::core::source::source_from_spec(spec)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn query(&self) -> InstitutionQuery {
        self.filter.clone().unwrap_or_default()
    }

    fn zip_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or(DEFAULT_ZIP_FILENAME))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
