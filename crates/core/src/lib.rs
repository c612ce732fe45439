//! Shared foundation of the marketing-mix workspace: error type, application
//! configuration, generative-model constants, and the weekly dataset.

pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod types;

pub use config::AppConfig;
pub use dataset::MarketingDataset;
pub use error::{checked_ln, MmmError, MmmResult};
pub use model::ModelConfig;
pub use types::{Channel, ChannelMap, WeeklyRecord};
