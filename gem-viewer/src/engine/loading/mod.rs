pub mod environment;
pub mod model_loader;
pub mod progress;
