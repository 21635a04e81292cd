//! Internal rate of return

use crate::options::IrrOptions;

/// Net present value of annual cash flows, the first at t = 0
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// NPV and its derivative with respect to the rate
fn npv_with_derivative(rate: f64, cash_flows: &[f64]) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        let t = t as i32;
        value += cf / (1.0 + rate).powi(t);
        if t > 0 {
            derivative -= t as f64 * cf / (1.0 + rate).powi(t + 1);
        }
    }
    (value, derivative)
}

/// Solve NPV = 0 for the rate with Newton-Raphson.
///
/// Returns the rate as a fraction, or `None` when the derivative goes flat,
/// the iterate leaves `(lower_bound, upper_bound)`, or it does not converge
/// within `max_iterations`.
pub fn irr(cash_flows: &[f64], options: &IrrOptions) -> Option<f64> {
    if cash_flows.len() < 2 {
        return None;
    }

    let mut rate = options.initial_guess;
    for iteration in 0..options.max_iterations {
        let (value, derivative) = npv_with_derivative(rate, cash_flows);
        if derivative.abs() < options.min_derivative {
            tracing::debug!(iteration, rate, "IRR: flat NPV curve");
            return None;
        }

        let next = rate - value / derivative;
        if !next.is_finite() || next <= options.lower_bound || next >= options.upper_bound {
            tracing::debug!(iteration, rate = next, "IRR: diverged");
            return None;
        }
        if (next - rate).abs() < options.tolerance {
            return Some(next);
        }
        rate = next;
    }

    tracing::debug!(
        iterations = options.max_iterations,
        "IRR: no convergence"
    );
    None
}

/// IRR, in percent, of buying at `enterprise_value` and receiving the free
/// cash flows (plus `terminal_value` with the last one).
///
/// Absent years are dropped rather than counted as zero. Needs at least two
/// present cash flows.
pub fn estimate_irr(
    fcf: &[Option<f64>],
    enterprise_value: f64,
    terminal_value: Option<f64>,
    options: &IrrOptions,
) -> Option<f64> {
    let mut flows: Vec<f64> = Vec::with_capacity(fcf.len() + 1);
    flows.push(-enterprise_value);
    flows.extend(fcf.iter().flatten());

    if flows.len() < 3 {
        return None;
    }
    if let (Some(tv), Some(last)) = (terminal_value, flows.last_mut()) {
        *last += tv;
    }

    irr(&flows, options).map(|rate| rate * 100.0)
}
