use crate::domain::catalog::InstitutionQuery;
use crate::domain::model::{ExportBundle, Institution};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for exported files, keyed by path relative to the output root.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where institution records come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn describe(&self) -> String;
    async fn load(&self) -> Result<Vec<Institution>>;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn query(&self) -> InstitutionQuery;
    fn zip_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Institution>>;
    async fn transform(&self, data: Vec<Institution>) -> Result<ExportBundle>;
    async fn load(&self, bundle: ExportBundle) -> Result<String>;
}
