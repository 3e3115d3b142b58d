//! Agent orientation and slot geometry.
//!
//! Slots sit on the faces of an agent's local frame:
//!
//! | Slot | Direction   |
//! |------|-------------|
//! | 0    | `+right`    |
//! | 1    | `-right`    |
//! | 2    | `+forward`  |
//! | 3    | `-forward`  |
//! | 4    | `+up`       |
//! | 5    | `-up`       |
//! | ≥ 6  | `+right`    |
//!
//! A slot's world position is `position + slot_direction(slot) * scale / 2`.

use sa_core::Vec3;

const ALIGNED_EPS: f32 = 1e-6;

/// Orthonormal right-handed frame: `right × up = forward`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub right:   Vec3,
    pub up:      Vec3,
    pub forward: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        right:   Vec3::X,
        up:      Vec3::Y,
        forward: Vec3::Z,
    };

    /// Unit world-space direction of `slot`.
    pub fn slot_direction(&self, slot: usize) -> Vec3 {
        match slot {
            1 => -self.right,
            2 => self.forward,
            3 => -self.forward,
            4 => self.up,
            5 => -self.up,
            _ => self.right,
        }
    }

    /// Rotate the frame by the smallest rotation that makes
    /// `slot_direction(slot)` point along `target`.
    pub fn face_slot(&mut self, slot: usize, target: Vec3) {
        let from = self.slot_direction(slot);
        let to = target.normalized();
        if to == Vec3::ZERO {
            return;
        }
        self.rotate(from, to);
    }

    /// Apply the minimal rotation carrying unit vector `from` onto `to`.
    fn rotate(&mut self, from: Vec3, to: Vec3) {
        let cos = from.dot(to);
        if cos > 1.0 - ALIGNED_EPS {
            return;
        }

        if cos < -1.0 + ALIGNED_EPS {
            // Half turn about any axis perpendicular to `from`.
            let axis = from.any_orthogonal();
            let half_turn = |v: Vec3| axis * (2.0 * axis.dot(v)) - v;
            self.right = half_turn(self.right);
            self.up = half_turn(self.up);
        } else {
            // Rodrigues with an unnormalised axis k = from × to (|k| = sin θ).
            let k = from.cross(to);
            let scale = 1.0 / (1.0 + cos);
            let turn = |v: Vec3| v * cos + k.cross(v) + k * (k.dot(v) * scale);
            self.right = turn(self.right);
            self.up = turn(self.up);
        }
        self.orthonormalize();
    }

    /// Gram-Schmidt so repeated rotations do not drift.
    fn orthonormalize(&mut self) {
        let right = self.right.normalized();
        let up = (self.up - right * right.dot(self.up)).normalized();
        self.right = right;
        self.up = up;
        self.forward = right.cross(up);
    }
}
