//! Ordinary least squares fit and its statistics.

use crate::design::DesignMatrix;
use crate::linalg::{least_squares, normal_inverse};
use mmm_core::{MmmError, MmmResult};
use ndarray::Array1;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};
use std::f64::consts::PI;

/// One estimated coefficient with its inference statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub conf_low: f64,
    pub conf_high: f64,
}

/// An immutable OLS result.
///
/// R² is centered when the design has an intercept and uncentered otherwise.
/// AIC/BIC count every parameter, the intercept included.
#[derive(Debug, Clone, Serialize)]
pub struct OlsFit {
    coefficients: Vec<Coefficient>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    n_obs: usize,
    n_params: usize,
    has_intercept: bool,
    ssr: f64,
    r_squared: f64,
    adj_r_squared: f64,
    f_statistic: f64,
    f_p_value: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    durbin_watson: f64,
    skew: f64,
    kurtosis: f64,
    jarque_bera: f64,
    jb_p_value: f64,
}

impl OlsFit {
    /// Regress `y` on `design`.
    pub fn fit(design: &DesignMatrix, y: &Array1<f64>) -> MmmResult<Self> {
        let n = design.n_obs();
        let k = design.n_params();
        if n <= k {
            return Err(MmmError::InsufficientData {
                required: k,
                actual: n,
            });
        }

        let solution = least_squares(design.matrix(), y)?;
        let beta = &solution.coefficients;
        let fitted = design.matrix().dot(beta);
        let residuals = y - &fitted;

        let nf = n as f64;
        let df_resid = (n - k) as f64;
        let k_const = usize::from(design.has_intercept());
        let df_model = (k - k_const) as f64;

        let ssr = residuals.dot(&residuals);
        let tss = if design.has_intercept() {
            let mean = y.mean().unwrap_or(0.0);
            y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        } else {
            y.dot(y)
        };
        let r_squared = 1.0 - ssr / tss;
        let adj_r_squared = 1.0 - (nf - k_const as f64) / df_resid * (1.0 - r_squared);

        let scale = ssr / df_resid;
        let cov = normal_inverse(&solution.r);
        let t_dist = StudentsT::new(0.0, 1.0, df_resid).map_err(distribution_error)?;
        let t_crit = t_dist.inverse_cdf(0.975);
        let coefficients = design
            .names()
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let estimate = beta[j];
                let std_error = (cov[[j, j]] * scale).sqrt();
                let t_value = estimate / std_error;
                Coefficient {
                    name: name.clone(),
                    estimate,
                    std_error,
                    t_value,
                    p_value: 2.0 * (1.0 - t_dist.cdf(t_value.abs())),
                    conf_low: estimate - t_crit * std_error,
                    conf_high: estimate + t_crit * std_error,
                }
            })
            .collect();

        let (f_statistic, f_p_value) = if df_model > 0.0 {
            let f = ((tss - ssr) / df_model) / scale;
            let f_dist = FisherSnedecor::new(df_model, df_resid).map_err(distribution_error)?;
            (f, 1.0 - f_dist.cdf(f))
        } else {
            (f64::NAN, f64::NAN)
        };

        let log_likelihood = -nf / 2.0 * ((2.0 * PI).ln() + (ssr / nf).ln() + 1.0);
        let aic = -2.0 * log_likelihood + 2.0 * k as f64;
        let bic = -2.0 * log_likelihood + k as f64 * nf.ln();

        let residuals = residuals.to_vec();
        let durbin_watson = residuals
            .windows(2)
            .map(|w| (w[1] - w[0]).powi(2))
            .sum::<f64>()
            / ssr;
        let (skew, kurtosis) = moments(&residuals);
        let jarque_bera = nf / 6.0 * (skew.powi(2) + (kurtosis - 3.0).powi(2) / 4.0);
        let chi2 = ChiSquared::new(2.0).map_err(distribution_error)?;
        let jb_p_value = 1.0 - chi2.cdf(jarque_bera);

        Ok(Self {
            coefficients,
            fitted: fitted.to_vec(),
            residuals,
            n_obs: n,
            n_params: k,
            has_intercept: design.has_intercept(),
            ssr,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_p_value,
            log_likelihood,
            aic,
            bic,
            durbin_watson,
            skew,
            kurtosis,
            jarque_bera,
            jb_p_value,
        })
    }

    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// Estimates in design column order.
    pub fn params(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }

    /// Look up a coefficient by regressor label.
    pub fn coefficient(&self, name: &str) -> MmmResult<&Coefficient> {
        self.coefficients
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| MmmError::UnknownCoefficient(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn n_params(&self) -> usize {
        self.n_params
    }

    pub fn df_resid(&self) -> usize {
        self.n_obs - self.n_params
    }

    pub fn df_model(&self) -> usize {
        self.n_params - usize::from(self.has_intercept)
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn adj_r_squared(&self) -> f64 {
        self.adj_r_squared
    }

    pub fn f_statistic(&self) -> f64 {
        self.f_statistic
    }

    pub fn f_p_value(&self) -> f64 {
        self.f_p_value
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    pub fn durbin_watson(&self) -> f64 {
        self.durbin_watson
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// Pearson (non-excess) kurtosis of the residuals.
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    pub fn jarque_bera(&self) -> f64 {
        self.jarque_bera
    }

    pub fn jb_p_value(&self) -> f64 {
        self.jb_p_value
    }
}

fn distribution_error(e: statrs::StatsError) -> MmmError {
    MmmError::Distribution(e.to_string())
}

/// Biased sample skewness and Pearson kurtosis.
fn moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let (m2, m3, m4) = values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), v| {
        let d = v - mean;
        (m2 + d * d, m3 + d * d * d, m4 + d * d * d * d)
    });
    let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);
    (m3 / m2.powf(1.5), m4 / (m2 * m2))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// y = 2 + 0.5 x1 - 1.5 x2 + small deterministic noise.
    fn toy() -> (DesignMatrix, Array1<f64>) {
        let n = 40;
        let x1: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() * 3.0).collect();
        let x2: Vec<f64> = (0..n).map(|i| ((i * 7 % 11) as f64) / 4.0).collect();
        let noise: Vec<f64> = (0..n).map(|i| ((i * 13 % 7) as f64 - 3.0) * 0.05).collect();
        let y: Vec<f64> = (0..n)
            .map(|i| 2.0 + 0.5 * x1[i] - 1.5 * x2[i] + noise[i])
            .collect();
        let design =
            DesignMatrix::from_columns(vec!["x1".into(), "x2".into()], &[x1, x2], true).unwrap();
        (design, Array1::from(y))
    }

    #[test]
    fn test_recovers_coefficients() {
        let (design, y) = toy();
        let fit = OlsFit::fit(&design, &y).unwrap();
        assert_eq!(fit.names(), vec!["const", "x1", "x2"]);
        assert!((fit.coefficient("const").unwrap().estimate - 2.0).abs() < 0.1);
        assert!((fit.coefficient("x1").unwrap().estimate - 0.5).abs() < 0.05);
        assert!((fit.coefficient("x2").unwrap().estimate + 1.5).abs() < 0.05);
        assert!(fit.r_squared() > 0.95 && fit.r_squared() <= 1.0);
        assert!(fit.adj_r_squared() < fit.r_squared());
        assert!(fit.coefficient("x2").unwrap().p_value < 1e-6);
    }

    #[test]
    fn test_refit_is_identical() {
        let (design, y) = toy();
        let a = OlsFit::fit(&design, &y).unwrap();
        let b = OlsFit::fit(&design, &y).unwrap();
        assert_eq!(a.params(), b.params());
        assert_eq!(a.residuals(), b.residuals());
    }

    #[test]
    fn test_fit_identities() {
        let (design, y) = toy();
        let fit = OlsFit::fit(&design, &y).unwrap();
        let n = fit.n_obs() as f64;
        let k = fit.n_params() as f64;

        // Residuals of a fit with intercept sum to zero.
        assert!(fit.residuals().iter().sum::<f64>().abs() < 1e-9);
        for ((f, r), obs) in fit.fitted().iter().zip(fit.residuals()).zip(y.iter()) {
            assert!((f + r - obs).abs() < 1e-12);
        }

        let ssr: f64 = fit.residuals().iter().map(|r| r * r).sum();
        let llf = -n / 2.0 * ((2.0 * PI).ln() + (ssr / n).ln() + 1.0);
        assert!((fit.log_likelihood() - llf).abs() < 1e-9);
        assert!((fit.aic() - (-2.0 * llf + 2.0 * k)).abs() < 1e-9);
        assert!((fit.bic() - (-2.0 * llf + k * n.ln())).abs() < 1e-9);
        let adj = 1.0 - (n - 1.0) / (n - k) * (1.0 - fit.r_squared());
        assert!((fit.adj_r_squared() - adj).abs() < 1e-12);

        let c = fit.coefficient("x1").unwrap();
        assert!((c.t_value - c.estimate / c.std_error).abs() < 1e-12);
        assert!(c.conf_low < c.estimate && c.estimate < c.conf_high);
        assert!(fit.f_statistic() > 0.0 && fit.f_p_value() < 1e-6);
        assert!(fit.durbin_watson() > 0.0 && fit.durbin_watson() < 4.0);
        assert!(fit.jb_p_value() >= 0.0 && fit.jb_p_value() <= 1.0);
    }

    #[test]
    fn test_simple_regression_standard_error() {
        // x = 1..5, y = 2, 4, 5, 4, 5: slope 0.6, intercept 2.2, SSR 2.4,
        // se(slope) = sqrt((2.4/3) / 10).
        let design =
            DesignMatrix::from_columns(vec!["x".into()], &[vec![1.0, 2.0, 3.0, 4.0, 5.0]], true)
                .unwrap();
        let y = Array1::from(vec![2.0, 4.0, 5.0, 4.0, 5.0]);
        let fit = OlsFit::fit(&design, &y).unwrap();
        let slope = fit.coefficient("x").unwrap();
        assert!((slope.estimate - 0.6).abs() < 1e-12);
        assert!((fit.coefficient("const").unwrap().estimate - 2.2).abs() < 1e-12);
        assert!((fit.ssr() - 2.4).abs() < 1e-12);
        assert!((slope.std_error - (0.8f64 / 10.0).sqrt()).abs() < 1e-12);
        assert!((fit.r_squared() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_uncentered_r_squared_without_intercept() {
        let design = DesignMatrix::from_columns(
            vec!["x".into()],
            &[vec![1.0, 2.0, 3.0, 4.0]],
            false,
        )
        .unwrap();
        let y = Array1::from(vec![1.0, 2.0, 2.0, 5.0]);
        let fit = OlsFit::fit(&design, &y).unwrap();
        let r2 = 1.0 - fit.ssr() / y.dot(&y);
        assert!((fit.r_squared() - r2).abs() < 1e-12);
        assert_eq!(fit.df_model(), 1);
    }

    #[test]
    fn test_unknown_coefficient() {
        let (design, y) = toy();
        let fit = OlsFit::fit(&design, &y).unwrap();
        assert!(matches!(
            fit.coefficient("log(radio)"),
            Err(MmmError::UnknownCoefficient(_))
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let design =
            DesignMatrix::from_columns(vec!["x".into()], &[vec![1.0, 2.0]], true).unwrap();
        let y = Array1::from(vec![1.0, 2.0]);
        assert!(matches!(
            OlsFit::fit(&design, &y),
            Err(MmmError::InsufficientData { .. })
        ));
    }
}
