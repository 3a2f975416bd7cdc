//! Simulation components.

use std::fmt;

use tessera_ecs::Component;

/// Location in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Component for Position {}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Where this position ends up after moving at `velocity` for
    /// `delta_time` seconds.
    #[must_use]
    pub fn advanced(self, velocity: Velocity, delta_time: f64) -> Self {
        Self {
            x: velocity.dx.mul_add(delta_time, self.x),
            y: velocity.dy.mul_add(delta_time, self.y),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rate of change of [`Position`], in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Component for Velocity {}

impl Velocity {
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}
