//! Bivariate statistics over paired matrix entries: covariance, correlation
//!
//! Both matrices are flattened row-major and their entries paired by
//! position. Population formulas (divide by n) throughout.

use matrixcalc_plugin::prelude::*;
use crate::helpers::*;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Σ (xᵢ − x̄)(yᵢ − ȳ), with the means
fn sum_of_products(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let (mx, my) = (mean(x), mean(y));
    let sum = x.iter().zip(y).map(|(xi, yi)| (xi - mx) * (yi - my)).sum();
    (mx, my, sum)
}

/// Population covariance of the paired entries of `a` and `b`
pub fn covariance(a: &Matrix, b: &Matrix, rec: &mut StepRecorder) -> CalcResult<f64> {
    check_same_dims(a, b, "covariance")?;
    let (x, y) = (a.flatten(), b.flatten());
    let n = x.len();

    rec.note("Flatten", || format!("x = {}, y = {} ({} pairs)", fmt_row(&x), fmt_row(&y), n));

    let (mx, my, sum) = sum_of_products(&x, &y);
    rec.note("Means", || format!("x̄ = {}, ȳ = {}", fmt_num(mx), fmt_num(my)));
    rec.note("Sum of Products", || {
        let terms: Vec<String> = x
            .iter()
            .zip(&y)
            .map(|(xi, yi)| format!("{}·{}", fmt_term(xi - mx), fmt_term(yi - my)))
            .collect();
        format!("Σ(x − x̄)(y − ȳ) = {} = {}", terms.join(" + "), fmt_num(sum))
    });

    let cov = sum / n as f64;
    rec.note("Result", || format!("cov(x, y) = {} / {} = {}", fmt_num(sum), n, fmt_num(cov)));
    Ok(cov)
}

/// Pearson correlation of the paired entries, clamped to [-1, 1]
pub fn correlation(a: &Matrix, b: &Matrix, eps: f64, rec: &mut StepRecorder) -> CalcResult<f64> {
    check_same_dims(a, b, "correlation")?;
    let (x, y) = (a.flatten(), b.flatten());
    let n = x.len() as f64;

    let (mx, my, sum_xy) = sum_of_products(&x, &y);
    let var_x = x.iter().map(|v| (v - mx).powi(2)).sum::<f64>() / n;
    let var_y = y.iter().map(|v| (v - my).powi(2)).sum::<f64>() / n;
    let (sx, sy) = (var_x.sqrt(), var_y.sqrt());

    rec.note("Means", || format!("x̄ = {}, ȳ = {}", fmt_num(mx), fmt_num(my)));
    rec.note("Standard Deviations", || format!("σx = {}, σy = {}", fmt_num(sx), fmt_num(sy)));

    if sx < eps || sy < eps {
        let which = if sx < eps { "matrixA" } else { "matrixB" };
        return Err(CalcError::validation(format!(
            "correlation: standard deviation of {} is zero, correlation is undefined",
            which
        )));
    }

    let cov = sum_xy / n;
    let r = (cov / (sx * sy)).clamp(-1.0, 1.0);
    rec.note("Covariance", || format!("cov(x, y) = {} / {} = {}", fmt_num(sum_xy), n, fmt_num(cov)));
    rec.note("Result", || {
        format!("r = {} / ({} · {}) = {}", fmt_num(cov), fmt_num(sx), fmt_num(sy), fmt_num(r))
    });
    Ok(r)
}

static PAIRED_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("matrixA", "Matrix", "First variable (entries read row by row)"),
    ArgMeta::required("matrixB", "Matrix", "Second variable, same dimensions as matrixA"),
];

// ============ covariance ============

pub struct CovarianceFn;

static COVARIANCE_RELATED: [&str; 1] = ["correlation"];

impl OperationPlugin for CovarianceFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "covariance", title: "Covariance",
            description: "Population covariance (divides by n) of paired entries",
            args: &PAIRED_ARGS, returns: "Scalar", category: "statistics", related: &COVARIANCE_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "covariance", ctx)?;
        let b = matrix_b(req, "covariance", ctx)?;
        covariance(&a, &b, &mut ctx.steps).map(OpResult::Scalar)
    }
}

// ============ correlation ============

pub struct CorrelationFn;

static CORRELATION_RELATED: [&str; 1] = ["covariance"];

impl OperationPlugin for CorrelationFn {
    fn meta(&self) -> OperationMeta {
        OperationMeta {
            name: "correlation", title: "Correlation",
            description: "Pearson correlation coefficient of paired entries",
            args: &PAIRED_ARGS, returns: "Scalar", category: "statistics", related: &CORRELATION_RELATED,
        }
    }

    fn call(&self, req: &OperationRequest, ctx: &mut EvalContext) -> CalcResult<OpResult> {
        let a = matrix_a(req, "correlation", ctx)?;
        let b = matrix_b(req, "correlation", ctx)?;
        let eps = ctx.epsilon();
        correlation(&a, &b, eps, &mut ctx.steps).map(OpResult::Scalar)
    }
}
