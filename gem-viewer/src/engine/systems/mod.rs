pub mod fps_tracking;
pub mod pretest;
pub mod quality;
