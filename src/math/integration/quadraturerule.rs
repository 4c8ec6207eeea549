use serde::Deserialize;

use crate::math::integration::centralrectangle::CentralRectangleRule;
use crate::math::integration::integrand::Integrand;
use crate::math::integration::simpson::SimpsonRule;
use crate::math::integration::trapezoidal::TrapezoidalRule;

// ─────────────────────────────────────────────────────────────────────────────
// QuadratureRule
// ─────────────────────────────────────────────────────────────────────────────

/// 複合求積公式：將 [lower, upper] 等分成 n 段後近似定積分。
///
/// 所有實作皆為純函數（相同輸入必得相同輸出），可自多個執行緒同時呼叫。
/// `n == 0` 為退化情形，回傳 0.0 而不報錯。
pub trait QuadratureRule: Send + Sync {
    fn integrate(&self, integrand: &dyn Integrand, lower: f64, upper: f64, n: usize) -> f64;

    /// 精度階數 p：誤差 ~ h^p
    fn order(&self) -> u32;

    fn name(&self) -> &'static str;
}

/// 步長 h = (upper - lower) / n，不另外儲存
pub(crate) fn step_width(lower: f64, upper: f64, n: usize) -> f64 {
    (upper - lower) / n as f64
}

// ─────────────────────────────────────────────────────────────────────────────
// QuadratureRuleKind
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum QuadratureRuleKind {
    CentralRectangle,
    Trapezoidal,
    Simpson
}

/// 古典先驗誤差估計 |R_n| ≤ (b-a)^(k+1)·M_k / (C·n^k) 的 (k, C)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBoundConstant {
    derivative_order: u32,
    divisor: f64
}

impl ErrorBoundConstant {
    pub fn derivative_order(&self) -> u32 {
        self.derivative_order
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }
}

impl QuadratureRuleKind {
    pub fn rule(&self) -> &'static dyn QuadratureRule {
        match self {
            QuadratureRuleKind::CentralRectangle => &CentralRectangleRule,
            QuadratureRuleKind::Trapezoidal => &TrapezoidalRule,
            QuadratureRuleKind::Simpson => &SimpsonRule
        }
    }

    pub fn error_bound_constant(&self) -> ErrorBoundConstant {
        match self {
            QuadratureRuleKind::CentralRectangle => ErrorBoundConstant { derivative_order: 2, divisor: 24.0 },
            QuadratureRuleKind::Trapezoidal => ErrorBoundConstant { derivative_order: 2, divisor: 12.0 },
            QuadratureRuleKind::Simpson => ErrorBoundConstant { derivative_order: 4, divisor: 180.0 }
        }
    }

    /// Simpson 需要偶數個子區間
    pub fn requires_even_subdivisions(&self) -> bool {
        matches!(self, QuadratureRuleKind::Simpson)
    }
}

impl QuadratureRule for QuadratureRuleKind {
    fn integrate(&self, integrand: &dyn Integrand, lower: f64, upper: f64, n: usize) -> f64 {
        self.rule().integrate(integrand, lower, upper, n)
    }

    fn order(&self) -> u32 {
        self.rule().order()
    }

    fn name(&self) -> &'static str {
        self.rule().name()
    }
}
