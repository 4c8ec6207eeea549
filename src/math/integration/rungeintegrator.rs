use rayon::prelude::*;
use tracing::{
    debug,
    warn
};

use crate::math::integration::convergencestate::ConvergenceState;
use crate::math::integration::integrand::Integrand;
use crate::math::integration::integrationerror::IntegrationError;
use crate::math::integration::quadraturerule::{
    QuadratureRule,
    QuadratureRuleKind
};
use crate::math::integration::simpson::SimpsonRule;

pub const DEFAULT_INITIAL_SUBDIVISIONS: usize = 2;
pub const DEFAULT_MAX_ITERATIONS: usize = 2000;
pub const DEFAULT_MAX_SUBDIVISIONS: usize = 4_000_000;
pub const DEFAULT_RELIABLE_ORDER: u32 = 4;
pub const DEFAULT_MIN_RELIABLE_SUBDIVISIONS: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// RungeSettings
// ─────────────────────────────────────────────────────────────────────────────

/// Runge 迭代的安全上限與可靠性門檻。
///
/// `min_reliable_subdivisions` 為經驗常數：階數 ≥ `reliable_order` 的公式在 n 很小時
/// 漸近誤差模型尚未成立，Runge 估計可能過早宣告收斂，因此至少要加倍到此 n 才接受。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RungeSettings {
    initial_subdivisions: usize,
    max_iterations: usize,
    max_subdivisions: usize,
    reliable_order: u32,
    min_reliable_subdivisions: usize
}

impl Default for RungeSettings {
    fn default() -> Self {
        RungeSettings {
            initial_subdivisions: DEFAULT_INITIAL_SUBDIVISIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
            reliable_order: DEFAULT_RELIABLE_ORDER,
            min_reliable_subdivisions: DEFAULT_MIN_RELIABLE_SUBDIVISIONS
        }
    }
}

impl RungeSettings {
    pub fn new(initial_subdivisions: usize,
               max_iterations: usize,
               max_subdivisions: usize,
               reliable_order: u32,
               min_reliable_subdivisions: usize) -> Result<RungeSettings, IntegrationError> {
        if initial_subdivisions == 0 {
            return Err(IntegrationError::invalid_setting("initial_subdivisions", "must be at least 1"));
        }
        if max_iterations == 0 {
            return Err(IntegrationError::invalid_setting("max_iterations", "must be at least 1"));
        }
        // p ≥ 4 的起點會進位成偶數，以較大的起點檢查
        let start = SimpsonRule::normalized_subdivisions(initial_subdivisions.max(2));
        if start.checked_mul(2).is_none_or(|n| n > max_subdivisions) {
            return Err(IntegrationError::invalid_setting(
                "max_subdivisions",
                "must allow at least one doubling of the starting subdivision count"
            ));
        }
        // p < 4 的公式從原始起點加倍，門檻適用於它們時也須可達
        let mut reachable = largest_reachable(start, max_subdivisions);
        if reliable_order < 4 {
            reachable = reachable.min(largest_reachable(initial_subdivisions, max_subdivisions));
        }
        if min_reliable_subdivisions > reachable {
            return Err(IntegrationError::invalid_setting(
                "min_reliable_subdivisions",
                "must be reachable by doubling within max_subdivisions"
            ));
        }
        Ok(RungeSettings {
            initial_subdivisions,
            max_iterations,
            max_subdivisions,
            reliable_order,
            min_reliable_subdivisions
        })
    }

    pub fn initial_subdivisions(&self) -> usize {
        self.initial_subdivisions
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn max_subdivisions(&self) -> usize {
        self.max_subdivisions
    }

    pub fn reliable_order(&self) -> u32 {
        self.reliable_order
    }

    pub fn min_reliable_subdivisions(&self) -> usize {
        self.min_reliable_subdivisions
    }

    fn is_reliable(&self, order: u32, subdivisions: usize) -> bool {
        order < self.reliable_order || subdivisions >= self.min_reliable_subdivisions
    }
}

/// 從 start 不斷加倍、不超過 max 時能到達的最大 n
fn largest_reachable(start: usize, max: usize) -> usize {
    let mut n = start;
    while let Some(next) = n.checked_mul(2).filter(|&next| next <= max) {
        n = next;
    }
    n
}

// ─────────────────────────────────────────────────────────────────────────────
// RungeEstimate
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationCause {
    IterationLimit,
    SubdivisionLimit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    Converged,
    Degraded(DegradationCause)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RungeEstimate {
    value: f64,
    subdivisions: usize,
    error_estimate: f64,
    iterations: usize,
    evaluations: usize,
    status: ConvergenceStatus
}

impl RungeEstimate {
    /// Richardson 外插後的積分值
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// 最後一次的 Runge 誤差估計（外插前）
    pub fn error_estimate(&self) -> f64 {
        self.error_estimate
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// 求積公式被呼叫的次數
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn status(&self) -> ConvergenceStatus {
        self.status
    }

    pub fn is_converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RungeJob
// ─────────────────────────────────────────────────────────────────────────────

/// `integrate_many` 的一筆工作：公式、區間與目標精度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RungeJob {
    kind: QuadratureRuleKind,
    lower: f64,
    upper: f64,
    epsilon: f64
}

impl RungeJob {
    pub fn new(kind: QuadratureRuleKind, lower: f64, upper: f64, epsilon: f64) -> RungeJob {
        RungeJob { kind, lower, upper, epsilon }
    }

    pub fn kind(&self) -> QuadratureRuleKind {
        self.kind
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RungeIntegrator
// ─────────────────────────────────────────────────────────────────────────────
//
// 自動選步：
//   1. n = initial_subdivisions（p ≥ 4 時取偶數且至少 2），計算 I_n
//   2. 重複：I_prev = I_n，n ← 2n，重新計算 I_n
//   3. err = |I_n - I_prev| / (2^p - 1)
//   4. err < ε 且 n 已達可靠性門檻 → 回傳 I_n + (I_n - I_prev) / (2^p - 1)
//   5. 超過 max_iterations 或下一次加倍會超過 max_subdivisions → 發出警告，
//      回傳目前最佳的外插值（退化結果）

pub struct RungeIntegrator {
    settings: RungeSettings
}

impl Default for RungeIntegrator {
    fn default() -> Self {
        RungeIntegrator::new(RungeSettings::default())
    }
}

impl RungeIntegrator {
    pub fn new(settings: RungeSettings) -> RungeIntegrator {
        RungeIntegrator { settings }
    }

    pub fn settings(&self) -> &RungeSettings {
        &self.settings
    }

    /// 以公式自身的精度階數執行 Runge 迭代
    pub fn integrate(&self,
                     rule: &dyn QuadratureRule,
                     integrand: &dyn Integrand,
                     lower: f64,
                     upper: f64,
                     epsilon: f64) -> RungeEstimate {
        self.run(rule, rule.order().max(1), integrand, lower, upper, epsilon)
    }

    pub fn integrate_with_order(&self,
                                rule: &dyn QuadratureRule,
                                order: u32,
                                integrand: &dyn Integrand,
                                lower: f64,
                                upper: f64,
                                epsilon: f64) -> Result<RungeEstimate, IntegrationError> {
        if order == 0 {
            return Err(IntegrationError::InvalidOrder(order));
        }
        Ok(self.run(rule, order, integrand, lower, upper, epsilon))
    }

    /// 平行執行多筆互不相關的工作，結果順序與 `jobs` 相同
    pub fn integrate_many(&self, integrand: &dyn Integrand, jobs: &[RungeJob]) -> Vec<RungeEstimate> {
        jobs.par_iter()
            .map(|job| self.integrate(&job.kind, integrand, job.lower, job.upper, job.epsilon))
            .collect()
    }

    fn run(&self,
           rule: &dyn QuadratureRule,
           order: u32,
           integrand: &dyn Integrand,
           lower: f64,
           upper: f64,
           epsilon: f64) -> RungeEstimate {
        let mut n = self.settings.initial_subdivisions;
        if order >= 4 {
            n = SimpsonRule::normalized_subdivisions(n.max(2));
        }
        let mut state = ConvergenceState::new(rule.integrate(integrand, lower, upper, n), n);
        let mut evaluations = 1;

        loop {
            if state.iteration() >= self.settings.max_iterations {
                return self.degraded(rule, state, order, epsilon, evaluations, DegradationCause::IterationLimit);
            }
            let next_n = match state.subdivisions().checked_mul(2) {
                Some(next_n) if next_n <= self.settings.max_subdivisions => next_n,
                _ => {
                    return self.degraded(rule, state, order, epsilon, evaluations, DegradationCause::SubdivisionLimit);
                }
            };

            state = state.refined(rule.integrate(integrand, lower, upper, next_n), next_n);
            evaluations += 1;

            let error_estimate = state.runge_error(order);
            debug!(
                rule = rule.name(),
                iteration = state.iteration(),
                subdivisions = next_n,
                error_estimate,
                "runge iteration"
            );

            if error_estimate < epsilon {
                if self.settings.is_reliable(order, next_n) {
                    return RungeEstimate {
                        value: state.richardson(order),
                        subdivisions: next_n,
                        error_estimate,
                        iterations: state.iteration(),
                        evaluations,
                        status: ConvergenceStatus::Converged
                    };
                }
                debug!(
                    rule = rule.name(),
                    subdivisions = next_n,
                    floor = self.settings.min_reliable_subdivisions,
                    "error below target before reliability floor, doubling again"
                );
            }
        }
    }

    fn degraded(&self,
                rule: &dyn QuadratureRule,
                state: ConvergenceState,
                order: u32,
                epsilon: f64,
                evaluations: usize,
                cause: DegradationCause) -> RungeEstimate {
        let error_estimate = state.runge_error(order);
        match cause {
            DegradationCause::SubdivisionLimit => warn!(
                rule = rule.name(),
                subdivisions = state.subdivisions(),
                limit = self.settings.max_subdivisions,
                error_estimate,
                epsilon,
                "maximum subdivision count reached, target accuracy may not be met"
            ),
            DegradationCause::IterationLimit => warn!(
                rule = rule.name(),
                iterations = state.iteration(),
                subdivisions = state.subdivisions(),
                error_estimate,
                epsilon,
                "runge rule did not converge within the iteration limit"
            )
        }
        RungeEstimate {
            value: state.richardson(order),
            subdivisions: state.subdivisions(),
            error_estimate,
            iterations: state.iteration(),
            evaluations,
            status: ConvergenceStatus::Degraded(cause)
        }
    }
}
