use std::ops::{Add, Div, Mul, Sub};

/// 2D point / direction in scene space (one unit = one grid cell).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians: (cos, sin)
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Zero stays zero instead of turning into NaN
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Quarter turn: (x, y) -> (-y, x)
    #[inline]
    pub fn rotate90(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        (other - self).scale(t) + self
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// Element-wise, used for unit conversions between pixel and scene space
impl Mul for Vector2D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Vector2D {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normalize_zero_is_zero() {
        let n = Vector2D::ZERO.normalize();
        assert_eq!(n, Vector2D::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn normalize_has_unit_length() {
        let n = Vector2D::new(3.0, -4.0).normalize();
        assert_relative_eq!(n.length(), 1.0);
        assert_relative_eq!(n.x, 0.6);
        assert_relative_eq!(n.y, -0.8);
    }

    #[test]
    fn element_wise_ops() {
        let a = Vector2D::new(2.0, 9.0);
        let b = Vector2D::new(4.0, 3.0);
        assert_eq!(a + b, Vector2D::new(6.0, 12.0));
        assert_eq!(a - b, Vector2D::new(-2.0, 6.0));
        assert_eq!(a * b, Vector2D::new(8.0, 27.0));
        assert_eq!(a / b, Vector2D::new(0.5, 3.0));
    }

    #[test]
    fn rotate_is_perpendicular() {
        let v = Vector2D::new(1.5, 2.0);
        let r = v.rotate90();
        assert_eq!(r, Vector2D::new(-2.0, 1.5));
        assert_eq!(v.dot(r), 0.0);
    }

    #[test]
    fn lerp_endpoints_and_middle() {
        let a = Vector2D::new(0.0, 2.0);
        let b = Vector2D::new(4.0, -2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn angle_and_distance() {
        let up = Vector2D::from_angle(FRAC_PI_2);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(up.y, 1.0);
        assert_relative_eq!(Vector2D::new(1.0, 1.0).distance_to(Vector2D::new(4.0, 5.0)), 5.0);
    }
}
