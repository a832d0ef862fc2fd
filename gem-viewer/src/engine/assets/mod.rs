pub mod catalog;
pub mod model_assets;
