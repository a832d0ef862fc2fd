//! Shared tuning constants for the gem viewer.
//!
//! Everything here is deployment-tunable data rather than behaviour. The
//! viewer crate owns the logic; this crate centralises the knobs so a tuning
//! pass never has to touch system code.

pub mod monitor;
pub mod optics;
pub mod palette;
pub mod path;
pub mod render_settings;
