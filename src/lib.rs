pub mod config;
pub mod core;
pub mod directory;
pub mod domain;
pub mod providers;
pub mod utils;

pub use config::{CliConfig, FileConfig, Settings};
pub use core::dispatcher::BatchDispatcher;
pub use core::engine::CheckEngine;
pub use core::report::BatchReport;
pub use directory::Directory;
pub use domain::model::{
    AvailabilityRequest, AvailabilityResult, Outcome, Provider, ProviderReply, RequestTemplate,
    RestaurantRecord, Slot,
};
pub use domain::ports::{ClientRouter, ProviderClient};
pub use providers::{OntopoClient, ProviderSet, ProviderSettings, TabitClient};
pub use utils::error::{CheckError, QueryError, Result};
