use cartonview_common::{CameraConfig, MoveDirection};
use glam::{Mat4, Vec3};

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const PITCH_LIMIT: f32 = 89.0;

/// Position, orientation and speed the camera returns to on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HomePose {
    position: Vec3,
    yaw: f32,
    pitch: f32,
}

/// Free-look camera. Yaw and pitch are stored in degrees; `front` and
/// `right` are re-derived from them whenever they change. `up` is always
/// world-up: there is no roll, and Q/E move straight down and up.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    speed: f32,
    min_speed: f32,
    max_speed: f32,
    frame_time: f32,
    home: HomePose,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

/// Unit view direction for yaw/pitch in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Speed bounds from `config`, ordered. Non-finite bounds fall back to the
/// defaults so an unvalidated config cannot make the clamp panic.
fn speed_bounds(config: &CameraConfig) -> (f32, f32) {
    let (a, b) = (config.min_speed, config.max_speed);
    if a.is_finite() && b.is_finite() {
        (a.min(b), a.max(b))
    } else {
        let defaults = CameraConfig::default();
        (defaults.min_speed, defaults.max_speed)
    }
}

impl FlyCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let (min_speed, max_speed) = speed_bounds(config);
        let home = HomePose {
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        };
        let mut camera = Self {
            position: home.position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: WORLD_UP,
            yaw: home.yaw,
            pitch: home.pitch,
            speed: config.speed.clamp(min_speed, max_speed),
            min_speed,
            max_speed,
            frame_time: 0.0,
            home,
        };
        camera.update_basis();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Movement scalar in world units per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Record the elapsed seconds of the frame about to be applied.
    pub fn begin_frame(&mut self, dt: f32) {
        self.frame_time = dt.max(0.0);
    }

    /// Distance one held movement key covers this frame.
    pub fn frame_step(&self) -> f32 {
        self.speed * self.frame_time
    }

    /// Unit vector for a camera-relative axis.
    pub fn axis(&self, direction: MoveDirection) -> Vec3 {
        match direction {
            MoveDirection::Forward => self.front,
            MoveDirection::Backward => -self.front,
            MoveDirection::Right => self.right,
            MoveDirection::Left => -self.right,
            MoveDirection::Up => self.up,
            MoveDirection::Down => -self.up,
        }
    }

    pub fn apply_translation(&mut self, direction: MoveDirection, speed: f32) {
        self.position += self.axis(direction) * speed;
    }

    /// Accumulate yaw/pitch (degrees) and rebuild the basis. Pitch stops
    /// short of vertical so the view never flips.
    pub fn apply_look(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Subtract a scroll offset from the movement speed, clamped to the
    /// configured bounds.
    pub fn adjust_speed(&mut self, scroll: f32) {
        self.speed = (self.speed - scroll).clamp(self.min_speed, self.max_speed);
    }

    /// Return to the startup pose. Speed is kept.
    pub fn reset(&mut self) {
        self.position = self.home.position;
        self.yaw = self.home.yaw;
        self.pitch = self.home.pitch;
        self.update_basis();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn update_basis(&mut self) {
        self.front = front_from_angles(self.yaw, self.pitch);
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = WORLD_UP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, EPS), "{a:?} != {b:?}");
    }

    #[test]
    fn default_pose() {
        let cam = FlyCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, -3.0, 10.0));
        assert_vec_near(cam.front(), Vec3::NEG_Z);
        assert_vec_near(cam.right(), Vec3::X);
        assert_vec_near(cam.up(), Vec3::Y);
        assert_eq!(cam.speed(), 10.0);
    }

    #[test]
    fn front_is_unit_over_pitch_range() {
        let mut yaw = -360.0;
        while yaw <= 360.0 {
            let mut pitch = -89.0;
            while pitch <= 89.0 {
                let f = front_from_angles(yaw, pitch);
                assert!((f.length() - 1.0).abs() < 1e-5, "yaw={yaw} pitch={pitch}");
                pitch += 7.5;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn look_keeps_up_at_world_up() {
        let mut cam = FlyCamera::default();
        for (dy, dp) in [(12.0, 30.0), (-200.0, 70.0), (45.0, -150.0), (3.3, 1.1)] {
            cam.apply_look(dy, dp);
            let (f, r) = (cam.front(), cam.right());
            assert_eq!(cam.up(), WORLD_UP);
            assert!((f.length() - 1.0).abs() < EPS);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!(f.dot(r).abs() < EPS);
            assert!(r.y.abs() < EPS, "right must stay horizontal: {r:?}");
        }
    }

    #[test]
    fn vertical_moves_ignore_pitch() {
        let mut cam = FlyCamera::default();
        cam.apply_look(0.0, 45.0);
        let start = cam.position;
        cam.apply_translation(MoveDirection::Up, 1.0);
        assert_vec_near(cam.position - start, Vec3::Y);
        cam.apply_translation(MoveDirection::Down, 3.0);
        assert_vec_near(cam.position - start, Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn pitched_view_matrix_stays_valid() {
        let mut cam = FlyCamera::default();
        cam.apply_look(30.0, 60.0);
        let v = cam.view_matrix();
        assert!(v.is_finite());
        let ahead = v.transform_point3(cam.position + cam.front() * 2.0);
        assert_vec_near(ahead, Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn pitch_clamped() {
        let mut cam = FlyCamera::default();
        cam.apply_look(0.0, 500.0);
        assert_eq!(cam.pitch(), 89.0);
        cam.apply_look(0.0, -1000.0);
        assert_eq!(cam.pitch(), -89.0);
        assert!(cam.front().y < 0.0);
    }

    #[test]
    fn yaw_accumulates_unbounded() {
        let mut cam = FlyCamera::default();
        cam.apply_look(720.0, 0.0);
        assert_eq!(cam.yaw(), 630.0);
        assert_vec_near(cam.front(), Vec3::NEG_Z);
    }

    #[test]
    fn hold_forward_one_second() {
        let mut cam = FlyCamera::default();
        cam.begin_frame(1.0);
        cam.apply_translation(MoveDirection::Forward, cam.frame_step());
        assert_vec_near(cam.position, Vec3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn translation_axes() {
        let mut cam = FlyCamera::default();
        cam.apply_translation(MoveDirection::Right, 2.0);
        cam.apply_translation(MoveDirection::Up, 1.0);
        cam.apply_translation(MoveDirection::Backward, 4.0);
        assert_vec_near(cam.position, Vec3::new(2.0, -2.0, 14.0));
        cam.apply_translation(MoveDirection::Left, 2.0);
        cam.apply_translation(MoveDirection::Down, 1.0);
        cam.apply_translation(MoveDirection::Forward, 4.0);
        assert_vec_near(cam.position, Vec3::new(0.0, -3.0, 10.0));
    }

    #[test]
    fn speed_scroll_clamps() {
        let mut cam = FlyCamera::default();
        cam.adjust_speed(10.0);
        assert_eq!(cam.speed(), 1.0);
        cam.adjust_speed(-100.0);
        assert_eq!(cam.speed(), 55.0);
        cam.adjust_speed(5.0);
        assert_eq!(cam.speed(), 50.0);
    }

    #[test]
    fn speed_stays_in_bounds_for_any_scroll_sequence() {
        let mut cam = FlyCamera::default();
        let mut x = 17u32;
        for _ in 0..500 {
            // xorshift-ish sequence of offsets in [-20, 20)
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            let offset = (x % 400) as f32 / 10.0 - 20.0;
            cam.adjust_speed(offset);
            assert!((1.0..=55.0).contains(&cam.speed()));
        }
    }

    #[test]
    fn frame_step_scales_with_time() {
        let mut cam = FlyCamera::default();
        cam.begin_frame(0.5);
        assert_eq!(cam.frame_step(), 5.0);
        cam.begin_frame(-1.0);
        assert_eq!(cam.frame_step(), 0.0);
    }

    #[test]
    fn reset_restores_pose_and_is_idempotent() {
        let mut cam = FlyCamera::default();
        cam.apply_look(37.0, -20.0);
        cam.apply_translation(MoveDirection::Left, 3.0);
        cam.adjust_speed(-5.0);

        cam.reset();
        let once = cam.clone();
        cam.reset();
        assert_eq!(cam, once);

        assert_eq!(cam.position, Vec3::new(0.0, -3.0, 10.0));
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_vec_near(cam.front(), Vec3::NEG_Z);
        assert_eq!(cam.speed(), 15.0);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let cam = FlyCamera::default();
        let v = cam.view_matrix();
        let eye = v.transform_point3(cam.position);
        assert!(eye.abs_diff_eq(Vec3::ZERO, EPS));
        // A point straight ahead lands on the camera's -Z axis.
        let ahead = v.transform_point3(cam.position + cam.front() * 5.0);
        assert_vec_near(ahead, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn inverted_speed_bounds_do_not_panic() {
        let mut cam = FlyCamera::new(&CameraConfig {
            speed: 100.0,
            min_speed: 20.0,
            max_speed: 5.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.speed(), 20.0);
        cam.adjust_speed(100.0);
        assert_eq!(cam.speed(), 5.0);
    }

    #[test]
    fn non_finite_speed_bounds_use_defaults() {
        let cam = FlyCamera::new(&CameraConfig {
            speed: 100.0,
            max_speed: f32::NAN,
            ..CameraConfig::default()
        });
        assert_eq!(cam.speed(), 55.0);
    }

    #[test]
    fn configured_pitch_is_clamped() {
        let cam = FlyCamera::new(&CameraConfig {
            pitch: 120.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.pitch(), 89.0);
    }
}
