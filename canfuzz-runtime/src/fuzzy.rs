use crate::{Error, Result};

/// Triangular membership function over the triple `(a, b, c)`.
///
/// `a` and `c` are the zero crossings, `b` the peak. Degenerate triangles
/// with `a == b` or `b == c` collapse one slope into the peak; the peak
/// itself always evaluates to 1 and neither slope divides by zero.
pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x < b {
        if x <= a {
            0.0
        } else {
            (x - a) / (b - a)
        }
    } else if x > b {
        if x >= c {
            0.0
        } else {
            (c - x) / (c - b)
        }
    } else {
        1.0
    }
}

/// Probability of emitting a valid command at the given stability.
///
/// Fixed-weight defuzzification over three membership sets. The output spans
/// [0.1, 0.7]; the extremes never reach 0 or 1, which leaves both branches
/// reachable at every stability level.
pub fn command_probability(stability: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&stability) {
        return Err(Error::InvalidStability(stability));
    }

    let low = triangular(stability, 0.0, 0.0, 0.5);
    let medium = triangular(stability, 0.3, 0.5, 0.7);
    let high = triangular(stability, 0.5, 1.0, 1.0);

    Ok(low * 0.1 + medium * 0.3 + high * 0.7)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn triangular_shoulders_and_peak() {
        assert_eq!(triangular(0.3, 0.3, 0.5, 0.7), 0.0);
        assert_eq!(triangular(0.1, 0.3, 0.5, 0.7), 0.0);
        assert_eq!(triangular(0.7, 0.3, 0.5, 0.7), 0.0);
        assert_eq!(triangular(0.9, 0.3, 0.5, 0.7), 0.0);
        assert_eq!(triangular(0.5, 0.3, 0.5, 0.7), 1.0);
        assert!((triangular(0.4, 0.3, 0.5, 0.7) - 0.5).abs() < TOLERANCE);
        assert!((triangular(0.6, 0.3, 0.5, 0.7) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn triangular_degenerate_left() {
        // (0, 0, 0.5) peaks on the left edge.
        assert_eq!(triangular(0.0, 0.0, 0.0, 0.5), 1.0);
        assert!((triangular(0.25, 0.0, 0.0, 0.5) - 0.5).abs() < TOLERANCE);
        assert_eq!(triangular(0.5, 0.0, 0.0, 0.5), 0.0);
        assert_eq!(triangular(-0.1, 0.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn triangular_degenerate_right() {
        // (0.5, 1, 1) peaks on the right edge.
        assert_eq!(triangular(1.0, 0.5, 1.0, 1.0), 1.0);
        assert!((triangular(0.75, 0.5, 1.0, 1.0) - 0.5).abs() < TOLERANCE);
        assert_eq!(triangular(0.5, 0.5, 1.0, 1.0), 0.0);
        assert_eq!(triangular(1.2, 0.5, 1.0, 1.0), 0.0);
    }

    #[test]
    fn probability_boundaries() {
        assert!((command_probability(0.0).unwrap() - 0.1).abs() < TOLERANCE);
        assert!((command_probability(0.5).unwrap() - 0.3).abs() < TOLERANCE);
        assert!((command_probability(1.0).unwrap() - 0.7).abs() < TOLERANCE);
    }

    #[test]
    fn probability_bounded() {
        for i in 0..=1000 {
            let stability = i as f64 / 1000.0;
            let probability = command_probability(stability).unwrap();

            assert!(probability >= 0.0, "below zero at {}", stability);
            assert!(probability <= 0.7 + TOLERANCE, "above 0.7 at {}", stability);
        }
    }

    #[test]
    fn probability_rejects_out_of_range() {
        assert!(matches!(
            command_probability(-0.1),
            Err(Error::InvalidStability(_))
        ));
        assert!(matches!(
            command_probability(1.1),
            Err(Error::InvalidStability(_))
        ));
        assert!(matches!(
            command_probability(f64::NAN),
            Err(Error::InvalidStability(_))
        ));
    }
}
