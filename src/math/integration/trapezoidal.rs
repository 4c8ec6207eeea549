use crate::math::integration::integrand::Integrand;
use crate::math::integration::quadraturerule::{
    step_width,
    QuadratureRule
};

/// 梯形公式：
///
///   I ≈ h · [ (f(a) + f(b)) / 2 + Σ_{i=1}^{n-1} f(a + i·h) ]
///
/// 精度階數 2。
pub struct TrapezoidalRule;

impl QuadratureRule for TrapezoidalRule {
    fn integrate(&self, integrand: &dyn Integrand, lower: f64, upper: f64, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let h = step_width(lower, upper, n);
        let endpoints = (integrand.value(lower) + integrand.value(upper)) / 2.0;
        let interior: f64 = (1..n)
            .map(|i| integrand.value(lower + i as f64 * h))
            .sum();
        h * (endpoints + interior)
    }

    fn order(&self) -> u32 {
        2
    }

    fn name(&self) -> &'static str {
        "trapezoidal"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_count_is_zero() {
        let f = |x: f64| x.exp();
        assert_eq!(TrapezoidalRule.integrate(&f, 0.0, 1.0, 0), 0.0);
    }

    #[test]
    fn test_single_trapezoid() {
        let f = |x: f64| x * x;
        assert_eq!(TrapezoidalRule.integrate(&f, 0.0, 2.0, 1), 4.0);
    }

    #[test]
    fn test_quadratic_error_term() {
        // ∫_0^1 x² = 1/3；梯形誤差恰為 +1/(6n²)
        let f = |x: f64| x * x;
        let n = 8;
        let expected = 1.0 / 3.0 + 1.0 / (6.0 * (n * n) as f64);
        assert!((TrapezoidalRule.integrate(&f, 0.0, 1.0, n) - expected).abs() < 1e-14);
    }
}
