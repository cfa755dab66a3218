pub mod dispatcher;
pub mod engine;
pub mod report;

pub use crate::domain::model::{
    AvailabilityRequest, AvailabilityResult, Outcome, Provider, RequestTemplate, RestaurantRecord,
};
pub use crate::domain::ports::{ClientRouter, ProviderClient};
pub use crate::utils::error::Result;
