//! Orbit camera for the panorama viewer and framing camera for the grid
//!
//! Both cameras look at the world origin. The orbit is stored in spherical
//! coordinates and eased toward a goal each frame; its distance is clamped so
//! the viewer never leaves the panorama sphere.

use glam::{Mat4, Vec3};

use crate::geometry::SPHERE_RADIUS;

/// Closest the viewer camera may get to the sphere center
pub const MIN_ORBIT_DISTANCE: f32 = 8.0;

/// Farthest the viewer camera may get from the sphere center
pub const MAX_ORBIT_DISTANCE: f32 = SPHERE_RADIUS;

/// Fraction of the remaining gap closed per frame
const EASING: f32 = 0.12;

/// Gap below which an eased value snaps to its goal
const SETTLE: f32 = 0.001;

/// Polar angles kept this far from the poles
const POLE_MARGIN: f32 = 0.1;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Spherical camera placement around the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub distance: f32,
    /// Azimuth in radians, 0 on +Z
    pub theta: f32,
    /// Polar angle from +Y in radians
    pub phi: f32,
}

impl Orbit {
    fn on_z_axis(distance: f32) -> Self {
        Self {
            distance,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.distance * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    /// Move one easing step toward `goal`; false once every component has settled
    fn ease_toward(&mut self, goal: &Orbit) -> bool {
        let mut moving = false;
        for (value, target) in [
            (&mut self.distance, goal.distance),
            (&mut self.theta, goal.theta),
            (&mut self.phi, goal.phi),
        ] {
            if (target - *value).abs() > SETTLE {
                *value += (target - *value) * EASING;
                moving = true;
            } else {
                *value = target;
            }
        }
        moving
    }
}

/// Perspective camera orbiting the origin
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    orbit: Orbit,
    goal: Orbit,
    distance_range: (f32, f32),
    animating: bool,
}

impl Camera3D {
    /// Camera for the panorama viewer: 75° field of view, starting at the
    /// minimum orbit distance on the +Z axis.
    pub fn panorama(aspect: f32) -> Self {
        Self::new(
            aspect,
            75f32.to_radians(),
            MIN_ORBIT_DISTANCE,
            (MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE),
        )
    }

    /// Camera for the portfolio grid: 45° field of view looking down -Z.
    pub fn framing(aspect: f32) -> Self {
        Self::new(aspect, 45f32.to_radians(), 2.0, (0.5, 100.0))
    }

    fn new(aspect: f32, fov: f32, distance: f32, distance_range: (f32, f32)) -> Self {
        let orbit = Orbit::on_z_axis(distance);
        Self {
            fov,
            aspect,
            orbit,
            goal: orbit,
            distance_range,
            animating: false,
        }
    }

    /// Current placement
    pub fn orbit(&self) -> Orbit {
        self.orbit
    }

    /// Placement the camera is easing toward
    pub fn goal(&self) -> Orbit {
        self.goal
    }

    pub fn position(&self) -> [f32; 3] {
        self.orbit.eye().to_array()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Turn the goal azimuth by `delta` radians
    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.goal.theta += delta;
        self.animating = true;
    }

    /// Tilt the goal polar angle by `delta` radians, stopping short of the poles
    pub fn orbit_vertical(&mut self, delta: f32) {
        self.goal.phi =
            (self.goal.phi + delta).clamp(POLE_MARGIN, std::f32::consts::PI - POLE_MARGIN);
        self.animating = true;
    }

    /// Scale the goal distance, clamped to this camera's range
    pub fn zoom(&mut self, factor: f32) {
        let (min, max) = self.distance_range;
        self.goal.distance = (self.goal.distance * factor).clamp(min, max);
        self.animating = true;
    }

    /// Back off until a `width` x `height` rectangle centered at the origin in
    /// the XY plane, grown by `padding` on every side, fills the view. Jumps
    /// without easing.
    pub fn frame_rect(&mut self, width: f32, height: f32, padding: f32) {
        let tan = (self.fov / 2.0).tan();
        let fit_height = (height / 2.0 + padding) / tan;
        let fit_width = (width / 2.0 + padding) / (tan * self.aspect.max(1e-3));
        let (min, max) = self.distance_range;

        let distance = fit_height.max(fit_width).clamp(min, max);
        self.orbit.distance = distance;
        self.goal.distance = distance;
        self.animating = false;
    }

    /// Ease toward the goal; call once per frame. Returns true while moving.
    pub fn update_animation(&mut self) -> bool {
        self.animating = self.orbit.ease_toward(&self.goal);
        self.animating
    }

    fn view_projection(&self) -> Mat4 {
        let projection = Mat4::perspective_rh(self.fov, self.aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(self.orbit.eye(), Vec3::ZERO, Vec3::Y);
        projection * view
    }

    /// Column-major view-projection matrix with WebGPU depth range 0..1
    pub fn view_projection_matrix(&self) -> [f32; 16] {
        self.view_projection().to_cols_array()
    }

    /// Project a world-space point to normalized device coordinates.
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_ndc(&self, point: [f32; 3]) -> Option<[f32; 2]> {
        let clip = self.view_projection() * Vec3::from_array(point).extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        Some([clip.x / clip.w, clip.y / clip.w])
    }

    /// Project a world-space point to pixel coordinates (origin top-left).
    pub fn project_to_screen(&self, point: [f32; 3], width: f32, height: f32) -> Option<[f32; 2]> {
        let [x, y] = self.project_ndc(point)?;
        Some([(x + 1.0) * 0.5 * width, (1.0 - y) * 0.5 * height])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panorama_camera_starts_inside_sphere() {
        let cam = Camera3D::panorama(16.0 / 9.0);
        assert_eq!(cam.orbit().distance, MIN_ORBIT_DISTANCE);
        assert!((cam.position()[2] - MIN_ORBIT_DISTANCE).abs() < 1e-4);
        assert!(!cam.is_animating());
    }

    #[test]
    fn zoom_clamps_to_orbit_limits() {
        let mut cam = Camera3D::panorama(1.0);
        cam.zoom(0.01);
        assert_eq!(cam.goal().distance, MIN_ORBIT_DISTANCE);
        cam.zoom(100.0);
        assert_eq!(cam.goal().distance, MAX_ORBIT_DISTANCE);
    }

    #[test]
    fn vertical_orbit_stops_short_of_the_pole() {
        let mut cam = Camera3D::panorama(1.0);
        cam.orbit_vertical(10.0);
        assert!((cam.goal().phi - (std::f32::consts::PI - POLE_MARGIN)).abs() < 1e-6);
        cam.orbit_vertical(-10.0);
        assert!((cam.goal().phi - POLE_MARGIN).abs() < 1e-6);
    }

    #[test]
    fn easing_settles_on_the_goal() {
        let mut cam = Camera3D::panorama(1.0);
        cam.zoom(4.0);
        cam.orbit_horizontal(0.5);
        assert!(cam.update_animation());

        let mut frames = 1;
        while cam.update_animation() {
            frames += 1;
            assert!(frames < 200, "camera never settled");
        }

        assert!(!cam.is_animating());
        assert_eq!(cam.orbit(), cam.goal());
        assert_eq!(cam.orbit().theta, 0.5);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera3D::panorama(1.0);
        let [x, y] = cam.project_to_screen([0.0, 0.0, 0.0], 800.0, 600.0).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn point_behind_camera_is_not_projected() {
        let cam = Camera3D::panorama(1.0);
        // Camera sits at +Z looking toward the origin
        assert!(cam.project_ndc([0.0, 0.0, 20.0]).is_none());
    }

    #[test]
    fn point_above_origin_projects_upward() {
        let cam = Camera3D::framing(1.0);
        let [_, y] = cam.project_ndc([0.0, 0.5, 0.0]).unwrap();
        assert!(y > 0.0);
    }

    #[test]
    fn frame_rect_moves_camera_back_for_wider_content() {
        let mut cam = Camera3D::framing(1.0);
        cam.frame_rect(2.0, 2.0, 0.0);
        let small = cam.orbit().distance;
        cam.frame_rect(8.0, 2.0, 0.0);
        assert!(cam.orbit().distance > small);
        assert!(!cam.is_animating());
    }

    #[test]
    fn quarter_turn_moves_eye_to_positive_x() {
        let mut cam = Camera3D::panorama(1.0);
        cam.orbit_horizontal(std::f32::consts::FRAC_PI_2);
        while cam.update_animation() {}
        let [x, y, z] = cam.position();
        assert!((x - MIN_ORBIT_DISTANCE).abs() < 1e-3);
        assert!(y.abs() < 1e-3 && z.abs() < 1e-3);
    }
}
