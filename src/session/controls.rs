use crate::foundation::core::{Mat4, Vec3};

/// Perspective camera looking at a target point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Eye position.
    pub position: Vec3,
    /// Look-at point.
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 3000.0,
            position: Vec3::new(0.0, 0.0, 2.5),
            target: Vec3::ZERO,
        }
    }
}

impl Camera {
    /// World to view transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// View to clip transform with an OpenGL depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

/// Per-frame camera manipulation, updated once per tick.
pub trait CameraControls: std::fmt::Debug {
    /// Apply pending motion. Returns `true` when the camera moved.
    fn update(&mut self, camera: &mut Camera) -> bool;
}

/// Orbit around the camera target with exponential damping.
///
/// Input accumulates into a pending delta; each update applies `damping` of it and keeps the
/// rest, so motion eases out over several frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitControls {
    /// Fraction of pending motion applied per update, in `(0, 1]`.
    pub damping: f32,
    /// Smallest camera distance.
    pub min_distance: f32,
    /// Largest camera distance.
    pub max_distance: f32,
    theta: f32,
    phi: f32,
    zoom: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(0.05)
    }
}

const SETTLED: f32 = 1e-6;

impl OrbitControls {
    /// Controls with the given damping factor.
    pub fn new(damping: f32) -> Self {
        Self {
            damping: damping.clamp(f32::EPSILON, 1.0),
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta: 0.0,
            phi: 0.0,
            zoom: 1.0,
        }
    }

    /// Queue a rotation around the vertical axis.
    pub fn rotate_left(&mut self, radians: f32) {
        self.theta -= radians;
    }

    /// Queue a rotation toward the poles.
    pub fn rotate_up(&mut self, radians: f32) {
        self.phi -= radians;
    }

    /// Queue a distance change by `scale` (`< 1` moves closer).
    pub fn dolly(&mut self, scale: f32) {
        if scale > 0.0 {
            self.zoom *= scale;
        }
    }

    /// Return `true` when no motion is pending.
    pub fn is_settled(&self) -> bool {
        self.theta.abs() < SETTLED && self.phi.abs() < SETTLED && (self.zoom - 1.0).abs() < SETTLED
    }
}

impl CameraControls for OrbitControls {
    fn update(&mut self, camera: &mut Camera) -> bool {
        if self.is_settled() {
            return false;
        }
        let offset = camera.position - camera.target;
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let k = self.damping;
        theta += self.theta * k;
        phi = (phi + self.phi * k).clamp(SETTLED, std::f32::consts::PI - SETTLED);
        let zoom = 1.0 + (self.zoom - 1.0) * k;
        let radius = (radius * zoom).clamp(self.min_distance, self.max_distance);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        self.theta *= 1.0 - k;
        self.phi *= 1.0 - k;
        self.zoom = 1.0 + (self.zoom - 1.0) * (1.0 - k);
        true
    }
}
