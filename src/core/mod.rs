pub mod engine;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{ExportBundle, Institution};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
