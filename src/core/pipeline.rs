use crate::core::{CatalogSource, ConfigProvider, ExportBundle, Pipeline, Result, Storage};
use crate::domain::catalog::Catalog;
use crate::domain::model::{validate_catalog, Institution};
use crate::utils::error::CatalogError;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const JSON_FILENAME: &str = "institutions.json";
pub const CSV_FILENAME: &str = "institutions.csv";
pub const TSV_FILENAME: &str = "institutions.tsv";
pub const DEFAULT_ZIP_FILENAME: &str = "catalog_export.zip";
pub const SUPPORTED_FORMATS: [&str; 3] = ["json", "csv", "tsv"];

const COLUMNS: [&str; 16] = [
    "id",
    "name",
    "brand_name",
    "price_min",
    "price_max",
    "location",
    "distance",
    "rating",
    "care_types",
    "tags",
    "features",
    "is_vr",
    "is_live",
    "original_price",
    "offer_deadline",
    "description",
];

// 清單欄位在表格中以 | 連接
const LIST_SEPARATOR: &str = "|";

fn render_table(institutions: &[Institution], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for inst in institutions {
        writer.write_record([
            inst.id.clone(),
            inst.name.clone(),
            inst.brand_name.clone().unwrap_or_default(),
            inst.price_range.min().to_string(),
            inst.price_range.max().to_string(),
            inst.location.clone(),
            inst.distance.clone().unwrap_or_default(),
            inst.rating.to_string(),
            inst.care_types.join(LIST_SEPARATOR),
            inst.tags.join(LIST_SEPARATOR),
            inst.features.join(LIST_SEPARATOR),
            inst.is_vr.to_string(),
            inst.is_live.to_string(),
            inst.original_price.map(|p| p.to_string()).unwrap_or_default(),
            inst.offer_deadline.clone().unwrap_or_default(),
            inst.description.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract institutions from a source, validate and filter them, then export.
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    source: Box<dyn CatalogSource>,
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(source: Box<dyn CatalogSource>, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config
            .output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }

    fn outputs<'a>(&self, bundle: &'a ExportBundle) -> Vec<(&'static str, &'a str)> {
        let mut files = Vec::new();
        if self.wants("json") {
            files.push((JSON_FILENAME, bundle.json_output.as_str()));
        }
        if self.wants("csv") {
            files.push((CSV_FILENAME, bundle.csv_output.as_str()));
        }
        if self.wants("tsv") {
            files.push((TSV_FILENAME, bundle.tsv_output.as_str()));
        }
        files
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CatalogPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Institution>> {
        tracing::debug!("Loading institutions from {}", self.source.describe());
        self.source.load().await
    }

    async fn transform(&self, data: Vec<Institution>) -> Result<ExportBundle> {
        let normalized: Vec<Institution> = data.into_iter().map(Institution::normalized).collect();

        // 匯入邊界驗證：任何錯誤都中止匯出
        validate_catalog(&normalized)?;

        let query = self.config.query();
        let catalog = Catalog::new(normalized);
        let institutions: Vec<Institution> = if query.is_empty() {
            catalog.into_inner()
        } else {
            let selected: Vec<Institution> = catalog.search(&query).into_iter().cloned().collect();
            tracing::debug!(
                "Query kept {} of {} institutions",
                selected.len(),
                catalog.len()
            );
            selected
        };

        Ok(ExportBundle {
            json_output: serde_json::to_string_pretty(&institutions)?,
            csv_output: render_table(&institutions, b',')?,
            tsv_output: render_table(&institutions, b'\t')?,
            institutions,
        })
    }

    async fn load(&self, bundle: ExportBundle) -> Result<String> {
        let files = self.outputs(&bundle);
        if files.is_empty() {
            return Err(CatalogError::MissingConfigError {
                field: "output_formats".to_string(),
            });
        }

        let Some(zip_filename) = self.config.zip_filename() else {
            for (name, content) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, content.len());
                self.storage.write_file(name, content.as_bytes()).await?;
            }
            return Ok(self.config.output_path().to_string());
        };

        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, content) in &files {
                zip.start_file::<_, ()>(*name, FileOptions::default())?;
                zip.write_all(content.as_bytes())?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(zip_filename, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), zip_filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::SeedSource;
    use crate::domain::catalog::InstitutionQuery;
    use crate::domain::model::PriceRange;
    use crate::domain::seed::mock_institutions;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<String>,
        query: InstitutionQuery,
        zip: Option<String>,
    }

    impl MockConfig {
        fn new(formats: &[&str], zip: Option<&str>) -> Self {
            Self {
                formats: formats.iter().map(|f| f.to_string()).collect(),
                query: InstitutionQuery::default(),
                zip: zip.map(str::to_string),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "/tmp/test"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn query(&self) -> InstitutionQuery {
            self.query.clone()
        }

        fn zip_filename(&self) -> Option<&str> {
            self.zip.as_deref()
        }
    }

    #[tokio::test]
    async fn test_transform_renders_tables() {
        let pipeline = CatalogPipeline::new(
            Box::new(SeedSource),
            MockStorage::new(),
            MockConfig::new(&["csv"], None),
        );

        let data = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(data).await.unwrap();

        assert_eq!(bundle.institutions.len(), 3);
        let mut lines = bundle.csv_output.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        let first = lines.next().unwrap();
        assert!(first.starts_with("1,泰康之家·燕园,泰康之家,8000,25000,"));
        assert!(first.contains("自理|介助|介护"));

        assert!(bundle.tsv_output.starts_with("id\tname\tbrand_name"));
        let parsed: Vec<Institution> = serde_json::from_str(&bundle.json_output).unwrap();
        assert_eq!(parsed, mock_institutions());
    }

    #[tokio::test]
    async fn test_transform_rejects_invalid_data() {
        let pipeline = CatalogPipeline::new(
            Box::new(SeedSource),
            MockStorage::new(),
            MockConfig::new(&["json"], None),
        );

        let mut data = mock_institutions();
        data[1].price_range = PriceRange(30000, 12000);
        let result = pipeline.transform(data).await;
        assert!(matches!(result, Err(CatalogError::ValidationError { .. })));

        let mut data = mock_institutions();
        data[2].id = " 1 ".to_string();
        let result = pipeline.transform(data).await;
        assert!(matches!(result, Err(CatalogError::DuplicateIdError { .. })));
    }

    #[tokio::test]
    async fn test_transform_applies_query() {
        let mut config = MockConfig::new(&["json"], None);
        config.query.live_only = true;
        let pipeline = CatalogPipeline::new(Box::new(SeedSource), MockStorage::new(), config);

        let bundle = pipeline.transform(mock_institutions()).await.unwrap();
        let ids: Vec<&str> = bundle.institutions.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_load_writes_separate_files() {
        let storage = MockStorage::new();
        let pipeline = CatalogPipeline::new(
            Box::new(SeedSource),
            storage.clone(),
            MockConfig::new(&["json", "tsv"], None),
        );

        let bundle = pipeline.transform(mock_institutions()).await.unwrap();
        let output = pipeline.load(bundle).await.unwrap();

        assert_eq!(output, "/tmp/test");
        assert!(storage.get_file(JSON_FILENAME).await.is_some());
        assert!(storage.get_file(TSV_FILENAME).await.is_some());
        assert!(storage.get_file(CSV_FILENAME).await.is_none());
    }

    #[tokio::test]
    async fn test_load_bundles_zip() {
        let storage = MockStorage::new();
        let pipeline = CatalogPipeline::new(
            Box::new(SeedSource),
            storage.clone(),
            MockConfig::new(&["json", "csv", "tsv"], Some(DEFAULT_ZIP_FILENAME)),
        );

        let bundle = pipeline.transform(mock_institutions()).await.unwrap();
        let output = pipeline.load(bundle).await.unwrap();
        assert_eq!(output, format!("/tmp/test/{}", DEFAULT_ZIP_FILENAME));

        let zip_data = storage.get_file(DEFAULT_ZIP_FILENAME).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&CSV_FILENAME));
    }

    #[tokio::test]
    async fn test_load_without_formats_fails() {
        let pipeline = CatalogPipeline::new(
            Box::new(SeedSource),
            MockStorage::new(),
            MockConfig::new(&["xlsx"], None),
        );
        let bundle = pipeline.transform(mock_institutions()).await.unwrap();
        assert!(matches!(
            pipeline.load(bundle).await,
            Err(CatalogError::MissingConfigError { .. })
        ));
    }
}
