//! Orbit camera around the displayed piece.
//!
//! Pointer drag orbits, scroll or two-finger pinch zooms within a clamped
//! distance range. The transform chases the target pose with a frame-time
//! lerp so input reads as smooth rather than stepped.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use constants::render_settings::{CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE};

#[derive(Resource)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: 0.6,
            pitch: -0.35,
            distance: 4.0,
        }
    }
}

impl OrbitCamera {
    pub fn zoom_by(&mut self, amount: f32) {
        self.distance =
            (self.distance - amount).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    fn target_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    fn target_position(&self) -> Vec3 {
        self.focus + self.target_rotation() * (Vec3::Z * self.distance)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    touches: Res<Touches>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Drag to orbit.
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0045;
        let pitch_sens = 0.0040;
        orbit.yaw -= mouse_delta.x * yaw_sens;
        orbit.pitch -= mouse_delta.y * pitch_sens;
        orbit.pitch = orbit.pitch.clamp(-1.35, 1.35);
    }

    // Wheel zoom, pixel and line scroll.
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let zoom_speed = (orbit.distance * 0.2).clamp(0.05, 2.0);
        orbit.zoom_by(scroll_accum * zoom_speed);
    }

    // Two-finger pinch zoom.
    let active: Vec<_> = touches.iter().collect();
    if active.len() == 2 {
        let current = active[0].position().distance(active[1].position());
        let previous = active[0]
            .previous_position()
            .distance(active[1].previous_position());
        let pinch = current - previous;
        if pinch.abs() > f32::EPSILON {
            let amount = pinch * 0.01 * orbit.distance.max(1.0);
            orbit.zoom_by(amount);
        }
    }

    let target_rot = orbit.target_rotation();
    let target_pos = orbit.target_position();

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_respects_distance_clamp() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom_by(100.0);
        assert_eq!(orbit.distance, CAMERA_MIN_DISTANCE);
        orbit.zoom_by(-100.0);
        assert_eq!(orbit.distance, CAMERA_MAX_DISTANCE);
    }
}
