use std::env;
use std::f64::consts::PI;

use tracing_subscriber::EnvFilter;

use compquad::configuration::Configuration;
use compquad::math::integration::quadraturerule::QuadratureRuleKind;
use compquad::math::integration::rungeintegrator::RungeJob;

const LOWER: f64 = 0.0;
const UPPER: f64 = 2.0;
const EPSILON: f64 = 0.0001;
// max|f''| on [0, 2]
const M2: f64 = 0.43156;

fn integrand(x: f64) -> f64 {
    (x + 3.0) / (x * x + 4.0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match env::args().nth(1) {
        Some(config_path) => Configuration::from_reader(&config_path)?,
        None => Configuration::default()
    };

    let exact = 0.5 * 2.0_f64.ln() + 3.0 * PI / 8.0;
    println!("f(x) = (x+3) / (x^2+4) on [{}, {}], epsilon = {}", LOWER, UPPER, EPSILON);
    println!("exact value: {:.8}", exact);

    let sizer = config.step_sizer();
    let rectangle = sizer.size_and_integrate(QuadratureRuleKind::CentralRectangle, &integrand, LOWER, UPPER, M2, EPSILON)?;
    let trapezoid = sizer.size_and_integrate(QuadratureRuleKind::Trapezoidal, &integrand, LOWER, UPPER, M2, EPSILON)?;

    let jobs = [
        RungeJob::new(QuadratureRuleKind::Trapezoidal, LOWER, UPPER, EPSILON),
        RungeJob::new(QuadratureRuleKind::Simpson, LOWER, UPPER, EPSILON)
    ];
    let estimates = config.runge_integrator().integrate_many(&integrand, &jobs);

    let rows = [
        ("central rectangle (M2)", rectangle.subdivisions(), rectangle.value()),
        ("trapezoidal (M2)", trapezoid.subdivisions(), trapezoid.value()),
        ("trapezoidal (Runge)", estimates[0].subdivisions(), estimates[0].value()),
        ("Simpson (Runge)", estimates[1].subdivisions(), estimates[1].value())
    ];

    println!("{:<24} {:>8} {:>16} {:>16}", "method", "n", "result", "abs. error");
    for (method, n, value) in rows {
        println!("{:<24} {:>8} {:>16.8} {:>16.3e}", method, n, value, (value - exact).abs());
    }
    for (method, _, value) in rows {
        let error = (value - exact).abs();
        if error > EPSILON {
            println!("warning: {} error {:.3e} exceeds epsilon {}", method, error, EPSILON);
        }
    }
    Ok(())
}
