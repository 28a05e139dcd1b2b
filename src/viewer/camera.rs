//! dolly orbit rig for the ray viewport

use dolly::prelude::*;
use glam::{EulerRot, Mat4, Quat, Vec3};

const HOME_YAW_DEG: f32 = 45.0;
const HOME_PITCH_DEG: f32 = -30.0;
const HOME_DISTANCE: f32 = 15.0;

/// Arm length limits; scaled scenes span roughly 0.1 to 100 units.
const MIN_DISTANCE: f32 = 0.05;
const MAX_DISTANCE: f32 = 5000.0;

const ORBIT_DEG_PER_PX: f32 = 0.5;

fn point(v: Vec3) -> mint::Point3<f32> {
    mint::Point3 { x: v.x, y: v.y, z: v.z }
}

pub struct OrbitCamera {
    rig: CameraRig,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        let rig = CameraRig::builder()
            .with(YawPitch::new().yaw_degrees(HOME_YAW_DEG).pitch_degrees(HOME_PITCH_DEG))
            .with(Smooth::new_rotation(0.0))
            .with(Arm::new(mint::Vector3 { x: 0.0, y: 0.0, z: distance }))
            .with(Smooth::new_position(0.0))
            .with(LookAt::new(point(target)).tracking_smoothness(0.0))
            .build();

        Self { rig, fov_deg: 45.0, near: 0.01, far: 2.0 * MAX_DISTANCE }
    }

    /// Left drag
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.rig
            .driver_mut::<YawPitch>()
            .rotate_yaw_pitch(-dx * ORBIT_DEG_PER_PX, -dy * ORBIT_DEG_PER_PX);
    }

    /// Middle drag, moves the target in the screen plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let t = &self.rig.final_transform;
        let (right, up): (Vec3, Vec3) = (t.right(), t.up());
        let step = 0.002 * self.arm();
        let shift = right * (-dx * step) + up * (dy * step);

        let target = &mut self.rig.driver_mut::<LookAt>().target;
        target.x += shift.x;
        target.y += shift.y;
        target.z += shift.z;
    }

    /// Scroll or right drag; positive `delta` moves closer
    pub fn zoom(&mut self, delta: f32) {
        let arm = self.arm() * (1.0 - delta * 0.01);
        self.set_arm(arm);
    }

    /// Look at `center` from far enough to see a sphere of `radius`
    pub fn focus(&mut self, center: Vec3, radius: f32) {
        self.rig.driver_mut::<LookAt>().target = point(center);
        self.set_arm(radius * 2.5);
    }

    /// Back to the home view around the origin
    pub fn reset(&mut self) {
        let home = Quat::from_euler(EulerRot::YXZ, HOME_YAW_DEG.to_radians(), HOME_PITCH_DEG.to_radians(), 0.0);
        self.rig.driver_mut::<YawPitch>().set_rotation_quat(mint::Quaternion::from(home));
        self.rig.driver_mut::<LookAt>().target = point(Vec3::ZERO);
        self.set_arm(HOME_DISTANCE);
    }

    pub fn update(&mut self, dt: f32) {
        self.rig.update(dt);
    }

    fn arm(&self) -> f32 {
        self.rig.driver::<Arm>().offset.z
    }

    fn set_arm(&mut self, distance: f32) {
        self.rig.driver_mut::<Arm>().offset.z = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn view_matrix(&self) -> Mat4 {
        let t = &self.rig.final_transform;
        let eye = Vec3::new(t.position.x, t.position.y, t.position.z);
        let forward: Vec3 = t.forward();
        Mat4::look_at_rh(eye, eye + forward, t.up())
    }

    pub fn view_proj_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, self.near, self.far) * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, HOME_DISTANCE)
    }
}
