use thiserror::Error;

use crate::math::integration::quadraturerule::QuadratureRuleKind;

/// 數值積分核心的錯誤。
///
/// 求積公式本身與 Runge 迭代的退化結束都不屬於錯誤；
/// 這裡只收錄呼叫方傳入、無法產生任何有意義結果的參數。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("target accuracy must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("derivative bound must be non-negative and finite, got {0}")]
    InvalidDerivativeBound(f64),

    #[error("order of accuracy must be at least 1, got {0}")]
    InvalidOrder(u32),

    #[error("{kind:?} rule needs {required} subdivisions, limit is {limit}")]
    SubdivisionLimitExceeded {
        kind: QuadratureRuleKind,
        required: f64,
        limit: usize
    },

    #[error("bound sampling needs at least 2 grid points, got {0}")]
    InsufficientSamples(usize),

    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str
    }
}

impl IntegrationError {
    pub fn invalid_setting(name: &'static str, reason: &'static str) -> IntegrationError {
        IntegrationError::InvalidSetting { name, reason }
    }
}
