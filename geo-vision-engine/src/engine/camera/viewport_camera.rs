use bevy::input::mouse::{AccumulatedMouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

const YAW_SENSITIVITY: f32 = 0.0035;
const PITCH_SENSITIVITY: f32 = 0.0030;
const MIN_DISTANCE: f32 = 10.0;
const MAX_DISTANCE: f32 = 5000.0;

/// Orbit camera around a focus point on the scene origin.
#[derive(Resource, Debug, Clone)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewportCamera {
    /// Orbit parameters that reproduce a camera at `position` looking at `focus_point`.
    pub fn looking_from(position: Vec3, focus_point: Vec3) -> Self {
        let offset = position - focus_point;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            focus_point,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: -(offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera transform implied by the current orbit parameters.
    pub fn transform(&self) -> Transform {
        let rotation = self.rotation();
        Transform {
            translation: self.focus_point + rotation * Vec3::Z * self.distance,
            rotation,
            ..default()
        }
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::looking_from(constants::render_settings::CAMERA_START, Vec3::ZERO)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Right drag orbits
    let mouse_delta = mouse_motion.delta;
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        viewport_camera.yaw -= mouse_delta.x * YAW_SENSITIVITY;
        viewport_camera.pitch -= mouse_delta.y * PITCH_SENSITIVITY;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    // Wheel dollies towards the focus point
    let scroll: f32 = scroll_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        })
        .sum();
    if scroll.abs() > f32::EPSILON {
        let dolly = viewport_camera.distance * 0.1 * scroll;
        viewport_camera.distance = (viewport_camera.distance - dolly).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    let target = viewport_camera.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_from_round_trips_position() {
        let start = Vec3::new(0.0, 400.0, 500.0);
        let camera = ViewportCamera::looking_from(start, Vec3::ZERO);
        let transform = camera.transform();
        assert!(transform.translation.distance(start) < 1e-2);
    }

    #[test]
    fn test_camera_faces_focus_point() {
        let camera = ViewportCamera::looking_from(Vec3::new(300.0, 200.0, -100.0), Vec3::ZERO);
        let transform = camera.transform();
        let towards_focus = (camera.focus_point - transform.translation).normalize();
        assert!(transform.forward().dot(towards_focus) > 0.999);
    }
}
