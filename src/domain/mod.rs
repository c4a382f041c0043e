// Domain layer: wire models, evaluation context and ports (interfaces).

pub mod model;
pub mod ports;

pub use model::{
    Context, FeatureDefinition, FeaturesResponse, MetricsBucket, MetricsRequest, Parameters,
    RegistrationRequest, StrategyDefinition, ToggleStats,
};
pub use ports::{CacheStore, Strategy, StrategyFactory};
