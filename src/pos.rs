use std::ops::{Add, Mul, Sub};

/// A point in surface-local coordinates: origin top left, y grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub const fn new(x: f32, y: f32) -> Self {
        Pos { x, y }
    }

    /// Linear interpolation towards `other`, `t` in `[0, 1]`.
    pub fn lerp(self, other: Pos, t: f32) -> Pos {
        self + (other - self) * t
    }
}

impl Add for Pos {
    type Output = Pos;
    fn add(self, other: Self) -> Self::Output {
        Pos::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Pos {
    type Output = Pos;
    fn sub(self, other: Self) -> Self::Output {
        Pos::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Pos {
    type Output = Pos;
    fn mul(self, other: f32) -> Self::Output {
        Pos::new(self.x * other, self.y * other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Pos::new(0.0, 10.0);
        let b = Pos::new(20.0, 30.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Pos::new(10.0, 20.0));
    }
}
