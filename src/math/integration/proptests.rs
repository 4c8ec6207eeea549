//! 求積公式與 Runge 誤差估計的性質測試（proptest）。

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::math::integration::centralrectangle::CentralRectangleRule;
    use crate::math::integration::convergencestate::ConvergenceState;
    use crate::math::integration::quadraturerule::{
        QuadratureRule,
        QuadratureRuleKind
    };
    use crate::math::integration::simpson::SimpsonRule;
    use crate::math::integration::trapezoidal::TrapezoidalRule;

    fn rule_kind() -> impl Strategy<Value = QuadratureRuleKind> {
        prop_oneof![
            Just(QuadratureRuleKind::CentralRectangle),
            Just(QuadratureRuleKind::Trapezoidal),
            Just(QuadratureRuleKind::Simpson),
        ]
    }

    fn coefficient() -> impl Strategy<Value = f64> {
        -10.0..10.0
    }

    fn assert_close(actual: f64, expected: f64, scale: f64) -> Result<(), TestCaseError> {
        prop_assert!(
            (actual - expected).abs() <= 1e-9 * scale.max(1.0),
            "actual {} expected {}", actual, expected
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn zero_width_interval_is_zero(kind in rule_kind(), lower in -100.0..100.0f64, n in 0usize..200) {
            let f = |x: f64| x.sin() + 2.0;
            prop_assert_eq!(kind.integrate(&f, lower, lower, n), 0.0);
        }

        #[test]
        fn linear_integrand_is_exact(
            c0 in coefficient(),
            c1 in coefficient(),
            lower in -5.0..5.0f64,
            width in 0.0..5.0f64,
            n in 1usize..100
        ) {
            let upper = lower + width;
            let f = move |x: f64| c0 + c1 * x;
            let exact = c0 * width + c1 * (upper * upper - lower * lower) / 2.0;
            let scale = (c0.abs() + c1.abs()) * (1.0 + lower.abs() + width) * width;
            assert_close(CentralRectangleRule.integrate(&f, lower, upper, n), exact, scale)?;
            assert_close(TrapezoidalRule.integrate(&f, lower, upper, n), exact, scale)?;
        }

        #[test]
        fn simpson_is_exact_for_cubics(
            c in proptest::array::uniform4(coefficient()),
            lower in -3.0..3.0f64,
            width in 0.0..3.0f64,
            half_n in 1usize..50
        ) {
            let upper = lower + width;
            let f = move |x: f64| c[0] + x * (c[1] + x * (c[2] + x * c[3]));
            let antiderivative = |x: f64| x * (c[0] + x * (c[1] / 2.0 + x * (c[2] / 3.0 + x * c[3] / 4.0)));
            let exact = antiderivative(upper) - antiderivative(lower);
            let reach = 1.0 + lower.abs() + width;
            let scale = c.iter().map(|v| v.abs()).sum::<f64>() * reach.powi(4);
            assert_close(SimpsonRule.integrate(&f, lower, upper, 2 * half_n), exact, scale)?;
        }

        #[test]
        fn simpson_odd_count_matches_next_even(
            lower in -5.0..5.0f64,
            width in 0.0..5.0f64,
            half_n in 0usize..100
        ) {
            let f = |x: f64| (x + 3.0) / (x * x + 4.0);
            let odd = 2 * half_n + 1;
            prop_assert_eq!(
                SimpsonRule.integrate(&f, lower, lower + width, odd),
                SimpsonRule.integrate(&f, lower, lower + width, odd + 1)
            );
        }

        #[test]
        fn runge_error_does_not_grow_with_n(
            kind in rule_kind(),
            rate in 0.1..2.0f64,
            lower in -1.0..1.0f64,
            width in 0.5..2.0f64
        ) {
            let f = move |x: f64| (rate * x).exp();
            let upper = lower + width;
            let order = kind.order();
            let mut n = 8;
            let mut state = ConvergenceState::new(kind.integrate(&f, lower, upper, n), n);
            n *= 2;
            state = state.refined(kind.integrate(&f, lower, upper, n), n);
            let mut last_error = state.runge_error(order);
            while n < 256 {
                n *= 2;
                state = state.refined(kind.integrate(&f, lower, upper, n), n);
                let error = state.runge_error(order);
                prop_assert!(error <= last_error, "n = {}: {} > {}", n, error, last_error);
                last_error = error;
            }
        }
    }

    // 經驗階數：n 加倍時誤差約縮小 2^p 倍
    fn error_ratio(rule: &dyn QuadratureRule, n: usize) -> f64 {
        let f = |x: f64| x.exp();
        let exact = 1.0_f64.exp() - 1.0;
        let coarse = (rule.integrate(&f, 0.0, 1.0, n) - exact).abs();
        let fine = (rule.integrate(&f, 0.0, 1.0, 2 * n) - exact).abs();
        coarse / fine
    }

    #[test]
    fn empirical_order_two() {
        for rule in [&CentralRectangleRule as &dyn QuadratureRule, &TrapezoidalRule] {
            let ratio = error_ratio(rule, 16);
            assert!((ratio - 4.0).abs() < 0.1, "{}: {}", rule.name(), ratio);
        }
    }

    #[test]
    fn empirical_order_four() {
        let ratio = error_ratio(&SimpsonRule, 8);
        assert!((ratio - 16.0).abs() < 1.0, "{}", ratio);
    }
}
