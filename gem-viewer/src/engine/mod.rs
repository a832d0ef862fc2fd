pub mod assets;
pub mod camera;
pub mod classification;
pub mod core;
pub mod loading;
pub mod materials;
pub mod perf;
pub mod systems;
