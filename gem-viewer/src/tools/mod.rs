pub mod debug_panel;
pub mod palette_ui;
