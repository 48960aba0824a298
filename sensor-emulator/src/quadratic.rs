//! Real roots of `a·x² + b·x + c = 0`.
//!
//! The sensor calibration formulas are quadratic in the raw ADC value, so encoding a
//! physical value means picking one root of a quadratic built from the calibration
//! constants.

/// Which of two distinct real roots to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Root {
    /// The smaller root.
    Min,
    /// The larger root.
    Max,
}

/// Solve `a·x² + b·x + c = 0` and return the root selected by `root`.
///
/// If the discriminant is not positive the vertex `-b / 2a` is returned whatever the
/// root choice. For a double root that is exact; for a negative discriminant it is the
/// closest the parabola gets to zero, so out-of-range input still gives a usable
/// register value instead of an error.
///
/// `a == 0` degrades to the linear root `-c / b`, and to `0.0` if `b` is zero too.
pub fn solve(a: f64, b: f64, c: f64, root: Root) -> f64 {
    if a == 0.0 {
        return if b == 0.0 { 0.0 } else { -c / b };
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let square_root = libm::sqrt(discriminant);
        let first = (-b + square_root) / (2.0 * a);
        let second = (-b - square_root) / (2.0 * a);
        match root {
            Root::Min => first.min(second),
            Root::Max => first.max(second),
        }
    } else {
        -b / (2.0 * a)
    }
}
