use raylib::prelude::*;

/// Orbit camera around the orb: drag to look, wheel to zoom, no pan.
/// Distance and polar angle are clamped so the view never dives under
/// the poles or into the sphere.
pub struct OrbitCamera {
    pub target: Vector3,
    pub yaw: f32,   // degrees
    pub pitch: f32, // degrees, 0 = equator
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_pitch: f32, // degrees above/below the equator
    pub mouse_sensitivity: f32,
    pub zoom_speed: f32,
}

impl OrbitCamera {
    pub fn new(target: Vector3) -> Self {
        Self {
            target,
            yaw: -90.0,
            pitch: 0.0,
            distance: 5.0,
            min_distance: 3.0,
            max_distance: 8.0,
            max_pitch: 30.0,
            mouse_sensitivity: 0.25,
            zoom_speed: 0.5,
        }
    }

    pub fn to_camera3d(&self) -> Camera3D {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        let offset = Vector3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        ) * self.distance;
        Camera3D::perspective(
            self.target + offset,
            self.target,
            Vector3::new(0.0, 1.0, 0.0),
            50.0,
        )
    }

    pub fn update(&mut self, rl: &mut RaylibHandle) {
        if rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT) {
            let md = rl.get_mouse_delta();
            self.yaw += md.x * self.mouse_sensitivity;
            self.pitch += md.y * self.mouse_sensitivity;
            self.pitch = self.pitch.clamp(-self.max_pitch, self.max_pitch);
        }
        let wheel = rl.get_mouse_wheel_move();
        if wheel != 0.0 {
            self.distance -= wheel * self.zoom_speed;
            self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        }
    }
}
