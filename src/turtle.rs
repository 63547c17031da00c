//! Turtle state and the fixed command alphabet.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Squared-norm drift beyond which the orientation is re-normalized.
const NORMALIZE_EPSILON: f32 = 1e-4;

/// The drawing cursor.
///
/// Tracks position, orientation and the current line thickness. The turtle starts
/// at the origin looking along `+Y`, with `+Z` as up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the pen.
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,

    /// Width given to the next segment drawn.
    pub thickness: f32,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            thickness: 0.05,
        }
    }
}

impl TurtleState {
    pub fn new(thickness: f32) -> Self {
        Self {
            thickness,
            ..Default::default()
        }
    }

    /// Returns the turtle's heading (local Y axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's left direction (local -X axis) in world space.
    pub fn left(&self) -> Vec3 {
        self.rotation * Vec3::NEG_X
    }

    /// Returns the turtle's up direction (local Z axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Moves the pen `distance` units along its heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    /// Rotates by `angle` radians around the world-space `axis`.
    pub fn rotate_around(&mut self, angle: f32, axis: Vec3) {
        self.rotation = Quat::from_axis_angle(axis, angle) * self.rotation;

        let norm = self.rotation.length_squared();
        if (norm - 1.0).abs() > NORMALIZE_EPSILON {
            self.rotation = self.rotation.normalize();
        }
    }

    /// Rotates around the up axis (`+`/`-`).
    pub fn yaw(&mut self, degrees: f32) {
        self.rotate_around(degrees.to_radians(), self.up());
    }

    /// Rotates around the left axis (`&`/`^`).
    pub fn pitch(&mut self, degrees: f32) {
        self.rotate_around(degrees.to_radians(), self.left());
    }

    /// Rotates around the heading (`/`/`\`).
    pub fn roll(&mut self, degrees: f32) {
        self.rotate_around(degrees.to_radians(), self.forward());
    }

    /// Turns 180 degrees around the left axis (`|`).
    pub fn turn_around(&mut self) {
        self.rotate_around(PI, self.left());
    }

    /// Multiplies (`grow`) or divides the current thickness by `factor`.
    pub fn scale_thickness(&mut self, factor: f32, grow: bool) {
        if grow {
            self.thickness *= factor;
        } else {
            self.thickness /= factor;
        }
    }
}

/// Commands understood by the interpreter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Draw one unit forward (`F`).
    Draw,
    /// Rotate around up (`+`/`-`). Sign of the angle.
    Yaw(f32),
    /// Rotate around left (`&`/`^`).
    Pitch(f32),
    /// Rotate around forward (`/`/`\`).
    Roll(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Multiply thickness (`>`).
    Thicken,
    /// Divide thickness (`<`).
    Thin,
    /// Save the turtle state (`[`).
    Push,
    /// Restore the most recently pushed state (`]`).
    Pop,
    /// Anything else: no turtle effect.
    Ignore,
}

impl TurtleOp {
    pub fn from_byte(c: u8) -> Self {
        match c {
            b'F' => Self::Draw,
            b'+' => Self::Yaw(1.0),
            b'-' => Self::Yaw(-1.0),
            b'&' => Self::Pitch(1.0),
            b'^' => Self::Pitch(-1.0),
            b'/' => Self::Roll(1.0),
            b'\\' => Self::Roll(-1.0),
            b'|' => Self::TurnAround,
            b'>' => Self::Thicken,
            b'<' => Self::Thin,
            b'[' => Self::Push,
            b']' => Self::Pop,
            _ => Self::Ignore,
        }
    }

    /// Whether the command may be followed by a `(value)` override.
    pub fn takes_parameter(self) -> bool {
        matches!(
            self,
            Self::Yaw(_) | Self::Pitch(_) | Self::Roll(_) | Self::Thicken | Self::Thin
        )
    }
}
