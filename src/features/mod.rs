pub mod feature;
pub mod loader;

pub use feature::Feature;
pub use loader::{load_features, FeatureMap};
