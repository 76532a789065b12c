use crate::core::{CatalogSource, Result};
use crate::domain::model::Institution;
use crate::domain::seed::mock_institutions;
use crate::utils::error::CatalogError;
use crate::utils::validation::validate_file_extension;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const SEED_SOURCE: &str = "seed";

/// Built-in demo listings.
#[derive(Debug, Clone, Default)]
pub struct SeedSource;

#[async_trait]
impl CatalogSource for SeedSource {
    fn describe(&self) -> String {
        "built-in seed catalog".to_string()
    }

    async fn load(&self) -> Result<Vec<Institution>> {
        Ok(mock_institutions())
    }
}

// JSON 檔可為陣列，或包含 institutions 欄位的物件
#[derive(Deserialize)]
struct WrappedCatalog {
    institutions: Vec<Institution>,
}

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    institutions: Vec<Institution>,
}

/// Institutions read from a `.json` or `.toml` file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(path: &Path, content: &str) -> Result<Vec<Institution>> {
        let display = path.to_string_lossy();
        validate_file_extension("source.path", &display, &["json", "toml"])?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        if extension.as_deref() == Some("toml") {
            let catalog: TomlCatalog = toml::from_str(content)?;
            return Ok(catalog.institutions);
        }

        // 直接反序列化成目標型別，錯誤訊息才會保留欄位與行號
        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str::<WrappedCatalog>(content)?.institutions)
        } else {
            Ok(serde_json::from_str::<Vec<Institution>>(content)?)
        }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn load(&self) -> Result<Vec<Institution>> {
        tracing::debug!("Reading institutions from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        let institutions = Self::parse(&self.path, &content)?;
        tracing::debug!("Parsed {} institutions", institutions.len());
        Ok(institutions)
    }
}

/// `"seed"` selects the built-in data, anything else is a file path.
pub fn source_from_spec(spec: &str) -> Result<Box<dyn CatalogSource>> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(CatalogError::MissingConfigError {
            field: "source".to_string(),
        });
    }
    if spec.eq_ignore_ascii_case(SEED_SOURCE) {
        return Ok(Box::new(SeedSource));
    }
    validate_file_extension("source", spec, &["json", "toml"])?;
    Ok(Box::new(FileSource::new(spec)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML_CATALOG: &str = r#"
[[institutions]]
id = "10"
name = "光大·汇晨（朝阳）"
image = "https://example.com/huichen.jpg"
priceRange = [6000, 12000]
location = "北京市朝阳区"
rating = 4.5
tags = ["全托"]
careTypes = ["介助", "介护"]
features = ["24h呼叫"]
description = "社区嵌入式养老机构"
isVR = false
isLive = true
originalPrice = 6800
offerDeadline = "2026-12-31"
"#;

    #[tokio::test]
    async fn test_seed_source() {
        let institutions = SeedSource.load().await.unwrap();
        assert_eq!(institutions.len(), 3);
    }

    #[test]
    fn test_parse_toml_catalog() {
        let institutions = FileSource::parse(Path::new("c.toml"), TOML_CATALOG).unwrap();
        assert_eq!(institutions.len(), 1);
        let inst = &institutions[0];
        assert_eq!(inst.brand_name, None);
        assert_eq!(inst.distance, None);
        assert_eq!(inst.original_price, Some(6800));
        assert!(inst.is_live);
    }

    #[test]
    fn test_parse_json_array_and_wrapped() {
        let seed = mock_institutions();
        let array = serde_json::to_string(&seed).unwrap();
        let wrapped = serde_json::json!({ "institutions": seed }).to_string();

        assert_eq!(FileSource::parse(Path::new("a.json"), &array).unwrap(), seed);
        assert_eq!(FileSource::parse(Path::new("b.json"), &wrapped).unwrap(), seed);
    }

    #[test]
    fn test_parse_rejects_unknown_extension() {
        assert!(matches!(
            FileSource::parse(Path::new("c.yaml"), "[]"),
            Err(CatalogError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_parse_accepts_uppercase_extension() {
        let seed = mock_institutions();
        let array = serde_json::to_string(&seed).unwrap();
        assert_eq!(FileSource::parse(Path::new("catalog.JSON"), &array).unwrap(), seed);
        assert_eq!(
            FileSource::parse(Path::new("catalog.Toml"), TOML_CATALOG).unwrap()[0].id,
            "10"
        );
        assert!(source_from_spec("data/catalog.JSON").is_ok());
    }

    #[test]
    fn test_json_errors_keep_field_and_line() {
        let mut records = serde_json::to_value(mock_institutions()).unwrap();
        records[2]["rating"] = serde_json::json!("4.8");
        let pretty = serde_json::to_string_pretty(&records).unwrap();

        let err = FileSource::parse(Path::new("c.json"), &pretty).unwrap_err();
        assert!(matches!(err, CatalogError::SerializationError(_)));
        let message = err.to_string();
        assert!(message.contains("expected f64"), "{}", message);
        assert!(message.contains("line"), "{}", message);
        assert!(!message.contains("untagged"), "{}", message);

        records[0].as_object_mut().unwrap().remove("image");
        let wrapped = serde_json::json!({ "institutions": records }).to_string();
        let err = FileSource::parse(Path::new("c.json"), &wrapped).unwrap_err();
        assert!(err.to_string().contains("missing field `image`"), "{}", err);
    }

    #[tokio::test]
    async fn test_file_source_reads_from_disk() {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        temp_file.write_all(TOML_CATALOG.as_bytes()).unwrap();

        let source = FileSource::new(temp_file.path());
        let institutions = source.load().await.unwrap();
        assert_eq!(institutions[0].id, "10");
    }

    #[test]
    fn test_source_from_spec() {
        assert_eq!(source_from_spec("seed").unwrap().describe(), "built-in seed catalog");
        assert!(source_from_spec("data/catalog.json")
            .unwrap()
            .describe()
            .contains("catalog.json"));
        assert!(source_from_spec("").is_err());
        assert!(source_from_spec("catalog.csv").is_err());
    }
}
