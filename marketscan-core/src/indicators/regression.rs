//! Rolling ordinary-least-squares regression over a short trailing window.
//!
//! For each index `t` with at least `window` inputs available, regress
//! the values in `values[t+1-window ..= t]` against the session index
//! {0, 1, .., window-1}:
//! - slope: OLS slope of value against index
//! - r_squared: square of the Pearson correlation between index and value
//! - p_value: two-sided significance of the slope under the standard
//!   t-test for simple linear regression (df = window - 2)
//!
//! The first `window - 1` outputs are NaN.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Per-index regression outputs, NaN-prefixed like the other kernels.
#[derive(Debug, Clone)]
pub struct RegressionSeries {
    pub slope: Vec<f64>,
    pub r_squared: Vec<f64>,
    pub p_value: Vec<f64>,
}

/// Rolling OLS of `values` against the session index over a trailing window.
pub fn rolling_regression(values: &[f64], window: usize) -> RegressionSeries {
    assert!(window >= 3, "regression window must be >= 3 for a t-test");
    let n = values.len();
    let mut out = RegressionSeries {
        slope: vec![f64::NAN; n],
        r_squared: vec![f64::NAN; n],
        p_value: vec![f64::NAN; n],
    };
    if n < window {
        return out;
    }

    let df = (window - 2) as f64;
    let t_dist = StudentsT::new(0.0, 1.0, df).expect("valid degrees of freedom");

    // x is always {0..window-1}: its moments are fixed across windows.
    let mean_x = (window - 1) as f64 / 2.0;
    let sxx: f64 = (0..window)
        .map(|i| {
            let d = i as f64 - mean_x;
            d * d
        })
        .sum();

    for t in (window - 1)..n {
        let y = &values[t + 1 - window..=t];
        let mean_y = y.iter().sum::<f64>() / window as f64;

        let mut sxy = 0.0;
        let mut syy = 0.0;
        for (i, &yi) in y.iter().enumerate() {
            let dx = i as f64 - mean_x;
            let dy = yi - mean_y;
            sxy += dx * dy;
            syy += dy * dy;
        }

        let slope = sxy / sxx;
        out.slope[t] = slope;

        // Flat window: correlation is undefined; follow linregress and
        // report r = 0 with an insignificant slope.
        if syy <= 0.0 {
            out.r_squared[t] = 0.0;
            out.p_value[t] = 1.0;
            continue;
        }

        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        let r2 = r * r;
        out.r_squared[t] = r2;

        if 1.0 - r2 <= f64::EPSILON {
            // Perfectly collinear window: infinite t statistic.
            out.p_value[t] = 0.0;
        } else {
            let t_stat = r * (df / (1.0 - r2)).sqrt();
            out.p_value[t] = 2.0 * (1.0 - t_dist.cdf(t_stat.abs()));
        }
    }

    out
}
