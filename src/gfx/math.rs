use std::ops::Mul;

pub type Vec3 = [f32; 3];

/// Column-major 4x4 matrix, laid out the way `glUniformMatrix4fv` expects
/// with `transpose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [v[0], v[1], v[2], 1.0];
        m
    }

    /// Rotation of `angle` radians around `axis`. The axis does not need to
    /// be normalized; a zero axis gives the identity.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let [x, y, z] = [axis[0] / len, axis[1] / len, axis[2] / len];
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        Mat4 {
            cols: [
                [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
                [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
                [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// `self * translation(v)`: the translation applies before `self`.
    pub fn translate(self, v: Vec3) -> Self {
        self * Self::from_translation(v)
    }

    /// `self * rotation(axis, angle)`.
    pub fn rotate(self, angle: f32, axis: Vec3) -> Self {
        self * Self::from_axis_angle(axis, angle)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let mut out = [0.0; 3];
        for (row, value) in out.iter_mut().enumerate() {
            *value = self.cols[0][row] * p[0]
                + self.cols[1][row] * p[1]
                + self.cols[2][row] * p[2]
                + self.cols[3][row];
        }
        out
    }

    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.cols)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut cols = [[0.0; 4]; 4];
        for (c, col) in cols.iter_mut().enumerate() {
            for (r, value) in col.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols }
    }
}
