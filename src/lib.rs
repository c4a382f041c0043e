pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod domain;
pub mod features;
pub mod periodic_tasks;
pub mod scheduler;
pub mod strategies;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use cache::{FileCache, MemoryCache};
pub use client::UnleashClient;
pub use config::ClientConfig;
pub use domain::{CacheStore, Context, Parameters, Strategy, StrategyFactory};
pub use strategies::{factory, StrategyRegistry};
pub use utils::error::{Result, UnleashError};
