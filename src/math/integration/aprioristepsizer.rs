use tracing::debug;

use crate::math::integration::integrand::Integrand;
use crate::math::integration::integrationerror::IntegrationError;
use crate::math::integration::quadraturerule::{
    QuadratureRule,
    QuadratureRuleKind
};
use crate::math::integration::simpson::SimpsonRule;

pub const DEFAULT_MAX_SUBDIVISIONS: usize = 4_000_000;

// ─────────────────────────────────────────────────────────────────────────────
// APrioriStepSizer
// ─────────────────────────────────────────────────────────────────────────────
//
// 由古典誤差上界直接反推子區間數：
//
//   |R_n| ≤ (b-a)^(k+1)·M_k / (C·n^k) ≤ ε
//   ⇒ n = ceil( ((b-a)^(k+1)·M_k / (C·ε))^(1/k) )
//
//   中點：k = 2, C = 24      梯形：k = 2, C = 12      Simpson：k = 4, C = 180
//
// M_k 由呼叫方提供（|f^(k)| 在區間上的上界），這裡不驗證它是否真的是上界；
// 若 M_k 偏小，得到的 n 可能不足。

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizedEstimate {
    value: f64,
    subdivisions: usize,
    step: f64
}

impl SizedEstimate {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct APrioriStepSizer {
    max_subdivisions: usize
}

impl Default for APrioriStepSizer {
    fn default() -> Self {
        APrioriStepSizer { max_subdivisions: DEFAULT_MAX_SUBDIVISIONS }
    }
}

impl APrioriStepSizer {
    pub fn new(max_subdivisions: usize) -> APrioriStepSizer {
        APrioriStepSizer { max_subdivisions }
    }

    pub fn max_subdivisions(&self) -> usize {
        self.max_subdivisions
    }

    /// 計算滿足目標精度的最小子區間數。
    ///
    /// `bound` 對中點與梯形公式為 M2，對 Simpson 為 M4。
    /// 結果至少為 1；Simpson 會再進位成偶數。
    pub fn subdivisions(&self,
                        kind: QuadratureRuleKind,
                        lower: f64,
                        upper: f64,
                        bound: f64,
                        epsilon: f64) -> Result<usize, IntegrationError> {
        if !(epsilon > 0.0) || !epsilon.is_finite() {
            return Err(IntegrationError::InvalidTolerance(epsilon));
        }
        if !(bound >= 0.0) || !bound.is_finite() {
            return Err(IntegrationError::InvalidDerivativeBound(bound));
        }

        let constant = kind.error_bound_constant();
        let k = constant.derivative_order();
        let width = (upper - lower).abs();
        let ratio = width.powi(k as i32 + 1) * bound / (constant.divisor() * epsilon);
        let root = if k == 2 {
            ratio.sqrt()
        } else {
            ratio.powf(1.0 / k as f64)
        };
        let required = root.ceil();
        if !required.is_finite() || required > self.max_subdivisions as f64 {
            return Err(IntegrationError::SubdivisionLimitExceeded {
                kind,
                required,
                limit: self.max_subdivisions
            });
        }

        // ceil 可能為 0（ε 很寬或 M_k 很小），至少要一段
        let mut n = (required as usize).max(1);
        if kind.requires_even_subdivisions() {
            n = SimpsonRule::normalized_subdivisions(n);
        }
        debug!(rule = ?kind, bound, epsilon, subdivisions = n, "a-priori step size chosen");
        Ok(n)
    }

    pub fn size_and_integrate(&self,
                              kind: QuadratureRuleKind,
                              integrand: &dyn Integrand,
                              lower: f64,
                              upper: f64,
                              bound: f64,
                              epsilon: f64) -> Result<SizedEstimate, IntegrationError> {
        let n = self.subdivisions(kind, lower, upper, bound, epsilon)?;
        Ok(SizedEstimate {
            value: kind.integrate(integrand, lower, upper, n),
            subdivisions: n,
            step: (upper - lower) / n as f64
        })
    }
}

/// 在 `samples` 個等距格點上取 |derivative(x)| 的最大值，作為 M_k 的經驗估計。
///
/// 只是取樣，不保證是真正的上界；極值落在格點之間時會略微低估。
pub fn sampled_bound(derivative: &dyn Integrand,
                     lower: f64,
                     upper: f64,
                     samples: usize) -> Result<f64, IntegrationError> {
    if samples < 2 {
        return Err(IntegrationError::InsufficientSamples(samples));
    }
    let last = (samples - 1) as f64;
    let bound = (0..samples)
        .map(|i| derivative.value(lower + (upper - lower) * i as f64 / last).abs())
        .fold(0.0, f64::max);
    Ok(bound)
}


#[cfg(test)]
mod tests {
    use super::*;

    const M2: f64 = 0.43156;
    const EPSILON: f64 = 0.0001;

    fn lab_integrand(x: f64) -> f64 {
        (x + 3.0) / (x * x + 4.0)
    }

    fn lab_second_derivative(x: f64) -> f64 {
        let den = x * x + 4.0;
        2.0 * (x * x * x + 9.0 * x * x - 12.0 * x - 12.0) / (den * den * den)
    }

    fn lab_exact() -> f64 {
        0.5 * 2.0_f64.ln() + 3.0 * std::f64::consts::PI / 8.0
    }

    #[test]
    fn test_central_rectangle_count() {
        let sizer = APrioriStepSizer::default();
        let n = sizer.subdivisions(QuadratureRuleKind::CentralRectangle, 0.0, 2.0, M2, EPSILON).unwrap();
        let expected = (8.0 * M2 / (24.0 * EPSILON)).sqrt().ceil() as usize;
        assert_eq!(n, expected);
        assert_eq!(n, 38);
    }

    #[test]
    fn test_trapezoidal_count() {
        let sizer = APrioriStepSizer::default();
        let n = sizer.subdivisions(QuadratureRuleKind::Trapezoidal, 0.0, 2.0, M2, EPSILON).unwrap();
        assert_eq!(n, 54);
    }

    #[test]
    fn test_sized_estimates_meet_target_magnitude() {
        let sizer = APrioriStepSizer::default();
        for kind in [QuadratureRuleKind::CentralRectangle, QuadratureRuleKind::Trapezoidal] {
            let sized = sizer.size_and_integrate(kind, &lab_integrand, 0.0, 2.0, M2, EPSILON).unwrap();
            let error = (sized.value() - lab_exact()).abs();
            assert!(error < EPSILON, "{:?}: {}", kind, error);
            assert!(error > EPSILON / 10.0, "{:?}: {}", kind, error);
            assert!((sized.step() * sized.subdivisions() as f64 - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_simpson_count_is_even() {
        let sizer = APrioriStepSizer::default();
        // (1^5 · 1 / (180 · 1e-6))^(1/4) ≈ 8.63 → 9 → 10
        let n = sizer.subdivisions(QuadratureRuleKind::Simpson, 0.0, 1.0, 1.0, 1e-6).unwrap();
        assert_eq!(n, 10);
    }

    #[test]
    fn test_loose_target_clamps_to_one() {
        let sizer = APrioriStepSizer::default();
        let n = sizer.subdivisions(QuadratureRuleKind::Trapezoidal, 0.0, 2.0, 0.0, EPSILON).unwrap();
        assert_eq!(n, 1);
        let n = sizer.subdivisions(QuadratureRuleKind::Simpson, 0.0, 2.0, 0.0, EPSILON).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_rejected_inputs() {
        let sizer = APrioriStepSizer::default();
        let kind = QuadratureRuleKind::CentralRectangle;
        assert_eq!(sizer.subdivisions(kind, 0.0, 2.0, M2, 0.0), Err(IntegrationError::InvalidTolerance(0.0)));
        assert!(matches!(sizer.subdivisions(kind, 0.0, 2.0, M2, f64::NAN), Err(IntegrationError::InvalidTolerance(_))));
        assert_eq!(sizer.subdivisions(kind, 0.0, 2.0, -1.0, EPSILON), Err(IntegrationError::InvalidDerivativeBound(-1.0)));

        let small = APrioriStepSizer::new(10);
        assert!(matches!(
            small.subdivisions(kind, 0.0, 2.0, M2, EPSILON),
            Err(IntegrationError::SubdivisionLimitExceeded { limit: 10, .. })
        ));
    }

    #[test]
    fn test_sampled_bound_recovers_lab_m2() {
        let bound = sampled_bound(&lab_second_derivative, 0.0, 2.0, 2001).unwrap();
        assert!((bound - M2).abs() < 1e-3, "{}", bound);
        assert_eq!(sampled_bound(&lab_second_derivative, 0.0, 2.0, 1), Err(IntegrationError::InsufficientSamples(1)));
    }
}
