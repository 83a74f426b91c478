use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign};

use cgmath::prelude::*;
use cgmath::Vector3;

use crate::float::*;

/// Linear RGB color with unbounded float channels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(BaseColor);

impl Color {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self(BaseColor::new(r, g, b))
    }

    pub fn black() -> Self {
        Self(BaseColor::black())
    }

    pub fn white() -> Self {
        Self(BaseColor::white())
    }

    /// Map a unit normal to a displayable color
    pub fn from_normal(n: Vector3<Float>) -> Self {
        let c_vec = (0.5 * n).add_element_wise(0.5);
        Self(BaseColor::from(c_vec))
    }

    pub fn is_black(&self) -> bool {
        self.0.is_black()
    }

    pub fn r(&self) -> Float {
        self.0.r()
    }

    pub fn g(&self) -> Float {
        self.0.g()
    }

    pub fn b(&self) -> Float {
        self.0.b()
    }

    /// Largest absolute channel difference to other
    pub fn max_diff(&self, other: Color) -> Float {
        let d = self.0.color - other.0.color;
        d.x.abs().max(d.y.abs()).max(d.z.abs())
    }

    /// Clamp to [0, 1] and quantize to 8-bit channels
    pub fn to_rgb8(self) -> [u8; 3] {
        [to_byte(self.r()), to_byte(self.g()), to_byte(self.b())]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BaseColor {
    color: Vector3<Float>,
}

impl BaseColor {
    fn new(r: Float, g: Float, b: Float) -> Self {
        Self {
            color: Vector3::new(r, g, b),
        }
    }

    fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    fn is_black(&self) -> bool {
        self.color.x == 0.0 && self.color.y == 0.0 && self.color.z == 0.0
    }

    fn r(&self) -> Float {
        self.color.x
    }

    fn g(&self) -> Float {
        self.color.y
    }

    fn b(&self) -> Float {
        self.color.z
    }
}

impl Index<usize> for Color {
    type Output = Float;

    fn index(&self, i: usize) -> &Float {
        &self.0.color[i]
    }
}

impl From<Vector3<Float>> for BaseColor {
    fn from(vec: Vector3<Float>) -> Self {
        Self { color: vec }
    }
}

impl From<[Float; 3]> for Color {
    fn from(arr: [Float; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

// Arithmetic operations

impl AddAssign for BaseColor {
    fn add_assign(&mut self, rhs: Self) {
        self.color += rhs.color;
    }
}

impl MulAssign for BaseColor {
    fn mul_assign(&mut self, rhs: Self) {
        self.color.mul_assign_element_wise(rhs.color);
    }
}

impl MulAssign<Float> for BaseColor {
    fn mul_assign(&mut self, rhs: Float) {
        self.color *= rhs;
    }
}

// Color operations delegated to BaseColor

impl Add for Color {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.0 += rhs.0;
        self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Div<Float> for Color {
    type Output = Self;

    fn div(mut self, rhs: Float) -> Self {
        self /= rhs;
        self
    }
}

impl DivAssign<Float> for Color {
    fn div_assign(&mut self, rhs: Float) {
        let recip = rhs.recip();
        self.0 *= recip;
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self.0 *= rhs.0;
        self
    }
}

impl Mul<Float> for Color {
    type Output = Self;

    fn mul(mut self, rhs: Float) -> Self {
        self.0 *= rhs;
        self
    }
}

impl Mul<Color> for Float {
    type Output = Color;

    // Delegate to Color Mul
    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}
