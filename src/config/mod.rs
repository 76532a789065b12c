pub mod cli;
pub mod toml_config;

use crate::core::pipeline::{DEFAULT_ZIP_FILENAME, SUPPORTED_FORMATS};
use crate::core::ConfigProvider;
use crate::domain::catalog::{InstitutionQuery, SortKey};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "yijia-catalog"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Validate, query and export the elder-care institution catalog")
)]
pub struct CliConfig {
    /// `seed` or a path to a .json / .toml institution file
    #[cfg_attr(feature = "cli", arg(long, default_value = "seed"))]
    pub source: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_value = "json,csv,tsv"))]
    pub formats: Vec<String>,

    /// Bundle all outputs in one ZIP archive
    #[cfg_attr(feature = "cli", arg(long))]
    pub zip: bool,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_ZIP_FILENAME))]
    pub zip_name: String,

    #[cfg_attr(feature = "cli", arg(long))]
    pub keyword: Option<String>,

    /// Required care type, repeatable (e.g. --care-type 介护)
    #[cfg_attr(feature = "cli", arg(long = "care-type"))]
    pub care_types: Vec<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub min_price: Option<u32>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub max_price: Option<u32>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub min_rating: Option<f64>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub vr_only: bool,

    #[cfg_attr(feature = "cli", arg(long))]
    pub live_only: bool,

    #[cfg_attr(feature = "cli", arg(long, value_enum))]
    pub sort: Option<SortKey>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub limit: Option<usize>,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log process CPU and memory usage"))]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            source: "seed".to_string(),
            output_path: "./output".to_string(),
            formats: SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect(),
            zip: false,
            zip_name: DEFAULT_ZIP_FILENAME.to_string(),
            keyword: None,
            care_types: Vec::new(),
            min_price: None,
            max_price: None,
            min_rating: None,
            vr_only: false,
            live_only: false,
            sort: None,
            limit: None,
            verbose: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn query(&self) -> InstitutionQuery {
        InstitutionQuery {
            keyword: self.keyword.clone(),
            care_types: self.care_types.clone(),
            tags: Vec::new(),
            min_price: self.min_price,
            max_price: self.max_price,
            vr_only: self.vr_only,
            live_only: self.live_only,
            min_rating: self.min_rating,
            sort: self.sort,
            limit: self.limit,
        }
    }

    fn zip_filename(&self) -> Option<&str> {
        self.zip.then_some(self.zip_name.as_str())
    }
}

/// Shared checks for the query part of CLI flags and TOML `[filter]` tables.
pub(crate) fn validate_query(prefix: &str, query: &InstitutionQuery) -> Result<()> {
    if let Some(limit) = query.limit {
        validate_positive_number(&format!("{}limit", prefix), limit, 1)?;
    }
    if let Some(min_rating) = query.min_rating {
        validate_range(&format!("{}min_rating", prefix), min_rating, 0.0, 5.0)?;
    }
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(CatalogError::InvalidConfigValueError {
                field: format!("{}min_price", prefix),
                value: min.to_string(),
                reason: format!("min_price exceeds max_price {}", max),
            });
        }
    }
    Ok(())
}

pub(crate) fn validate_formats(field: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(CatalogError::MissingConfigError {
            field: field.to_string(),
        });
    }
    for format in formats {
        validate_one_of(field, &format.to_ascii_lowercase(), &SUPPORTED_FORMATS)?;
    }
    Ok(())
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("source", &self.source)?;
        validate_path("output_path", &self.output_path)?;
        validate_formats("formats", &self.formats)?;
        if self.zip {
            validate_path("zip_name", &self.zip_name)?;
        }
        validate_query("", &self.query())
    }
}
