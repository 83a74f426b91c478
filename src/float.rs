//! Precision used throughout the tracer.
//! Everything is f64 unless the `single_precision` feature is enabled.

#[cfg(not(feature = "single_precision"))]
pub type Float = f64;
#[cfg(feature = "single_precision")]
pub type Float = f32;

/// Possibly lossy conversion into the active float type
pub trait ToFloat {
    fn to_float(self) -> Float;
}

macro_rules! impl_to_float {
    ($($t:ty),*) => {
        $(
            impl ToFloat for $t {
                #[allow(clippy::cast_lossless, clippy::unnecessary_cast)]
                fn to_float(self) -> Float {
                    self as Float
                }
            }
        )*
    };
}

impl_to_float!(f32, f64, i32, u32, u64, usize);

/// Convert a float color channel in [0, 1] to a byte
pub fn to_byte(c: Float) -> u8 {
    (c.max(0.0).min(1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_byte_clamps() {
        assert_eq!(to_byte(-0.5), 0);
        assert_eq!(to_byte(0.5), 128);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(7.0), 255);
    }
}
