pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{engine::CatalogEngine, pipeline::CatalogPipeline};
pub use domain::catalog::{Catalog, InstitutionQuery, SortKey};
pub use domain::model::{
    Booking, BookingStatus, Contract, ContractStatus, Institution, PriceRange, ViewType,
};
pub use domain::seed::{mock_institutions, PRIMARY_COLOR};
pub use utils::error::{CatalogError, Result};
