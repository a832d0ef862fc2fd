//! Device capability classification.
//!
//! Mobile is decided by viewport width, Safari by user-agent sniff. Both
//! feed the quality mapping: Safari's GPU stack misreports shader
//! precision, so it gets the conservative render profile instead of a
//! crash deep inside the driver.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::MOBILE_WIDTH;

#[derive(Resource, Debug, Clone, Default)]
pub struct DeviceProfile {
    pub mobile: bool,
    pub safari: bool,
}

/// Startup: classify the device from the primary window and, on the web,
/// the user agent.
pub fn detect_device(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut profile: ResMut<DeviceProfile>,
) {
    if let Ok(window) = windows.single() {
        profile.mobile = window.width() < MOBILE_WIDTH;
    }
    profile.safari = user_agent_is_safari();
    info!(
        "device profile: mobile={}, safari={}",
        profile.mobile, profile.safari
    );
}

#[cfg(target_arch = "wasm32")]
fn user_agent_is_safari() -> bool {
    let Some(agent) = web_sys::window().and_then(|w| w.navigator().user_agent().ok()) else {
        return false;
    };
    // Chrome and Edge embed "Safari" in their agent strings as well.
    agent.contains("Safari") && !agent.contains("Chrome") && !agent.contains("Chromium")
}

#[cfg(not(target_arch = "wasm32"))]
fn user_agent_is_safari() -> bool {
    false
}
