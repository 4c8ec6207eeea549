use crate::math::integration::integrand::Integrand;
use crate::math::integration::quadraturerule::{
    step_width,
    QuadratureRule
};

// ─────────────────────────────────────────────────────────────────────────────
// SimpsonRule
// ─────────────────────────────────────────────────────────────────────────────
//
//   I ≈ (h/3) · [ f(x_0) + 4·Σ f(x_奇) + 2·Σ f(x_偶,內部) + f(x_n) ]
//
// 公式將子區間兩兩配對，故 n 必須為偶數；奇數 n 在此處直接進位為 n + 1，
// 呼叫方（包含 Runge 迭代）不需特別處理。精度階數 4。

pub struct SimpsonRule;

impl SimpsonRule {
    /// 奇數進位為下一個偶數；usize::MAX 無法再進位，原值回傳（仍為奇數）
    pub fn normalized_subdivisions(n: usize) -> usize {
        n.saturating_add(n & 1)
    }
}

impl QuadratureRule for SimpsonRule {
    fn integrate(&self, integrand: &dyn Integrand, lower: f64, upper: f64, n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n = Self::normalized_subdivisions(n);
        let h = step_width(lower, upper, n);
        let mut sum = integrand.value(lower) + integrand.value(upper);
        for i in 1..n {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += weight * integrand.value(lower + i as f64 * h);
        }
        (h / 3.0) * sum
    }

    fn order(&self) -> u32 {
        4
    }

    fn name(&self) -> &'static str {
        "Simpson"
    }
}
