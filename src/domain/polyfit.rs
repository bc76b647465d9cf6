//! Least-squares polynomial fitting over (year, value) pairs.
//!
//! Years are shifted to the earliest year in the slice before the basis
//! is built; calendar years cubed are ~8e9 and make the solve needlessly
//! ill-conditioned. The shift changes neither the fitted function nor
//! its extrapolation, and the model remembers it for prediction.

use nalgebra::{DMatrix, DVector};

/// Singular values below this are treated as zero by the solver. With a
/// shifted x axis the basis columns stay O(1)..O(1e4), so this cleanly
/// separates rank deficiency from real signal.
const SVD_EPS: f64 = 1e-10;

/// Mean squared residuals at or below this fraction of the mean squared
/// response are rounding jitter from an exact fit and are snapped to
/// zero, so degree ties are decided by scan order rather than noise.
const NOISE_FLOOR: f64 = 1e-18;

/// A fitted polynomial. Coefficients are in ascending powers of
/// (x - offset).
#[derive(Debug, Clone, PartialEq)]
pub struct PolyModel {
    pub degree: usize,
    offset: f64,
    coefficients: Vec<f64>,
}

impl PolyModel {
    /// Evaluate the polynomial at `x` (Horner form).
    pub fn predict(&self, x: f64) -> f64 {
        let t = x - self.offset;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Fit a polynomial of the given degree to the pairs by ordinary least
/// squares. Returns the model and its in-sample mean-squared-error.
///
/// With fewer points than degree + 1 coefficients the system is
/// underdetermined; the minimum-norm solution interpolates and the MSE
/// collapses to zero. That is accepted as-is.
pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<(PolyModel, f64), &'static str> {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return Err("empty input");
    }

    let offset = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let basis = DMatrix::from_fn(n, degree + 1, |row, col| (xs[row] - offset).powi(col as i32));
    let y = DVector::from_column_slice(ys);

    let svd = basis.svd(true, true);
    let solution = svd.solve(&y, SVD_EPS)?;

    let model = PolyModel {
        degree,
        offset,
        coefficients: solution.iter().copied().collect(),
    };

    let sse: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &yv)| {
            let r = model.predict(x) - yv;
            r * r
        })
        .sum();
    let mse = sse / n as f64;

    let scale = ys.iter().map(|v| v * v).sum::<f64>() / n as f64;
    let mse = if mse <= NOISE_FLOOR * scale.max(1.0) {
        0.0
    } else {
        mse
    };

    Ok((model, mse))
}
