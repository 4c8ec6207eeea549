use crate::math::integration::integrand::Integrand;
use crate::math::integration::quadraturerule::{
    step_width,
    QuadratureRule
};

/// 中點（中央矩形）公式：
///
///   I ≈ h · Σ_{i=0}^{n-1} f(a + (i + 1/2)·h)
///
/// 精度階數 2。
pub struct CentralRectangleRule;

impl QuadratureRule for CentralRectangleRule {
    fn integrate(&self, integrand: &dyn Integrand, lower: f64, upper: f64, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let h = step_width(lower, upper, n);
        let sum: f64 = (0..n)
            .map(|i| integrand.value(lower + (i as f64 + 0.5) * h))
            .sum();
        h * sum
    }

    fn order(&self) -> u32 {
        2
    }

    fn name(&self) -> &'static str {
        "central rectangle"
    }
}
