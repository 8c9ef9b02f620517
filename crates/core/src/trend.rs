use crate::error::NoTrendAvailable;
use crate::view::DerivedView;

/// Least-squares line of value against sample index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub slope:     f64,
    pub intercept: f64,
}

impl Trend {
    /// Value of the line at sample index `x`.
    #[inline]
    #[must_use]
    pub fn at(&self, x: usize) -> f64 {
        self.slope * x as f64 + self.intercept
    }

    /// Line values for indices `0..n` (the `best_fit_line` column).
    pub fn fitted(&self, n: usize) -> Vec<f64> {
        (0..n).map(|x| self.at(x)).collect()
    }
}

/// Fit the trend of the readings in `view`.
pub fn fit_trend(view: &DerivedView) -> Result<Trend, NoTrendAvailable> {
    let values: Vec<f64> = view.snapshot.iter().map(|r| r.value()).collect();
    fit_values(&values)
}

/// Ordinary least squares of `values[i]` against `i`.
///
/// Needs at least two samples; the indices are distinct so the fit is
/// always defined from there on.
pub fn fit_values(values: &[f64]) -> Result<Trend, NoTrendAvailable> {
    let n = values.len();
    if n < 2 {
        return Err(NoTrendAvailable { samples: n });
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / nf;

    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }

    let slope = num / den;
    Ok(Trend {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
