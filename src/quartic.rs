//! Real roots of polynomials up to degree four.
//!
//! Coefficients are given highest degree first. Roots are returned in no
//! particular order and repeated roots are not merged.

use crate::consts;
use crate::float::*;

/// Coefficients this far below the largest one are treated as zero
const COEFF_EPSILON: Float = 1e-12;
const NEWTON_STEPS: usize = 2;

/// Roots of a x^2 + b x + c = 0
pub fn solve_quadratic(a: Float, b: Float, c: Float) -> (usize, [Float; 2]) {
    let mut roots = [0.0; 2];
    let scale = largest_magnitude(&[a, b, c]);
    if a.abs() <= COEFF_EPSILON * scale {
        if b.abs() <= COEFF_EPSILON * scale {
            return (0, roots);
        }
        roots[0] = -c / b;
        return (1, roots);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        (0, roots)
    } else if disc == 0.0 {
        roots[0] = -0.5 * b / a;
        (1, roots)
    } else {
        // Avoid cancellation between b and the root of the discriminant
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        roots[0] = q / a;
        roots[1] = c / q;
        (2, roots)
    }
}

/// Roots of a x^3 + b x^2 + c x + d = 0
pub fn solve_cubic(a: Float, b: Float, c: Float, d: Float) -> (usize, [Float; 3]) {
    let mut roots = [0.0; 3];
    if a.abs() <= COEFF_EPSILON * largest_magnitude(&[a, b, c, d]) {
        let (n, quad) = solve_quadratic(b, c, d);
        roots[..n].copy_from_slice(&quad[..n]);
        return (n, roots);
    }
    let (b, c, d) = (b / a, c / a, d / a);
    // Depressed cubic t^3 + p t + q with x = t - b / 3
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let disc = 0.25 * q * q + p * p * p / 27.0;
    let tolerance = consts::ROOT_EPSILON * (0.25 * q * q).max((p * p * p / 27.0).abs());

    let n = if disc > tolerance {
        // Cardano, single real root
        let sqrt_disc = disc.sqrt();
        roots[0] = (-0.5 * q + sqrt_disc).cbrt() + (-0.5 * q - sqrt_disc).cbrt();
        1
    } else if disc >= -tolerance {
        if p.abs() < COEFF_EPSILON {
            roots[0] = 0.0;
            1
        } else {
            roots[0] = 3.0 * q / p;
            roots[1] = -1.5 * q / p;
            2
        }
    } else {
        // Three real roots, trigonometric form
        let r = 2.0 * (-p / 3.0).sqrt();
        let cos_arg = (1.5 * q / p * (-3.0 / p).sqrt()).max(-1.0).min(1.0);
        let phi = cos_arg.acos() / 3.0;
        for (k, root) in roots.iter_mut().enumerate() {
            *root = r * (phi - 2.0 * consts::PI * k.to_float() / 3.0).cos();
        }
        3
    };
    for root in roots[..n].iter_mut() {
        *root -= shift;
    }
    (n, roots)
}

/// Roots of c[0] x^4 + c[1] x^3 + c[2] x^2 + c[3] x + c[4] = 0 with Ferrari's method.
pub fn solve_quartic(coeffs: [Float; 5]) -> (usize, [Float; 4]) {
    let mut roots = [0.0; 4];
    let a = coeffs[0];
    if a.abs() <= COEFF_EPSILON * largest_magnitude(&coeffs) {
        let (n, cubic) = solve_cubic(coeffs[1], coeffs[2], coeffs[3], coeffs[4]);
        roots[..n].copy_from_slice(&cubic[..n]);
        return (n, roots);
    }
    let (b, c, d, e) = (coeffs[1] / a, coeffs[2] / a, coeffs[3] / a, coeffs[4] / a);
    // Depressed quartic y^4 + p y^2 + q y + r with x = y - b / 4
    let shift = 0.25 * b;
    let b2 = b * b;
    let p = c - 0.375 * b2;
    let q = d - 0.5 * b * c + 0.125 * b2 * b;
    let r = e - 0.25 * b * d + b2 * c / 16.0 - 3.0 * b2 * b2 / 256.0;

    let mut n = 0;
    let mut push_quadratic = |qa: Float, qb: Float, qc: Float, roots: &mut [Float; 4]| {
        let (m, quad) = solve_quadratic(qa, qb, qc);
        for &y in &quad[..m] {
            roots[n] = y;
            n += 1;
        }
    };

    // Resolvent cubic 8m^3 + 8p m^2 + (2p^2 - 8r) m - q^2 = 0 has a positive root unless q vanishes
    let q_scale = (p.abs() * p.abs().sqrt()).max(r.abs().sqrt().sqrt() * r.abs().sqrt());
    let m = if q.abs() <= COEFF_EPSILON * q_scale {
        0.0
    } else {
        let (m_count, ms) = solve_cubic(8.0, 8.0 * p, 2.0 * p * p - 8.0 * r, -q * q);
        ms[..m_count]
            .iter()
            .cloned()
            .fold(-consts::INFINITY, Float::max)
    };
    if m > 0.0 {
        let s = (2.0 * m).sqrt();
        let k = q / (2.0 * s);
        push_quadratic(1.0, -s, 0.5 * p + m + k, &mut roots);
        push_quadratic(1.0, s, 0.5 * p + m - k, &mut roots);
    } else {
        // Biquadratic in z = y^2
        let (m, zs) = solve_quadratic(1.0, p, r);
        for &z in &zs[..m] {
            if z >= 0.0 {
                push_quadratic(1.0, 0.0, -z, &mut roots);
            }
        }
    }

    for root in roots[..n].iter_mut() {
        *root = polish(*root - shift, b, c, d, e);
    }
    (n, roots)
}

fn largest_magnitude(coeffs: &[Float]) -> Float {
    coeffs.iter().fold(0.0, |acc: Float, c| acc.max(c.abs()))
}

/// Newton iterations on the monic quartic, kept only while they improve the residual
fn polish(mut x: Float, b: Float, c: Float, d: Float, e: Float) -> Float {
    let eval = |x: Float| (((x + b) * x + c) * x + d) * x + e;
    let mut fx = eval(x);
    for _ in 0..NEWTON_STEPS {
        let dfx = ((4.0 * x + 3.0 * b) * x + 2.0 * c) * x + d;
        if dfx == 0.0 {
            break;
        }
        let next = x - fx / dfx;
        let f_next = eval(next);
        if f_next.abs() >= fx.abs() {
            break;
        }
        x = next;
        fx = f_next;
    }
    x
}
