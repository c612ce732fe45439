//! Plain-text regression table: fit statistics, coefficients, residual tests.

use crate::ols::OlsFit;
use std::fmt::Write;

const WIDTH: usize = 78;

/// Render `fit` as a three-part text table: fit statistics, coefficients, and
/// residual diagnostics.
pub fn render_summary(fit: &OlsFit, dependent: &str) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{:^width$}", "OLS Regression Results", width = WIDTH);
    let _ = writeln!(out, "{heavy}");
    let header = [
        (("Dep. Variable:", dependent.to_string()), ("R-squared:", format!("{:.3}", fit.r_squared()))),
        (("Model:", "OLS".to_string()), ("Adj. R-squared:", format!("{:.3}", fit.adj_r_squared()))),
        (("Method:", "Least Squares".to_string()), ("F-statistic:", format!("{:.2}", fit.f_statistic()))),
        (("No. Observations:", fit.n_obs().to_string()), ("Prob (F-statistic):", format!("{:.2e}", fit.f_p_value()))),
        (("Df Residuals:", fit.df_resid().to_string()), ("Log-Likelihood:", format!("{:.2}", fit.log_likelihood()))),
        (("Df Model:", fit.df_model().to_string()), ("AIC:", format!("{:.1}", fit.aic()))),
        (("Covariance Type:", "nonrobust".to_string()), ("BIC:", format!("{:.1}", fit.bic()))),
    ];
    for ((left_label, left_value), (right_label, right_value)) in header {
        let _ = writeln!(
            out,
            "{:<20}{:>18}   {:<22}{:>15}",
            left_label, left_value, right_label, right_value
        );
    }

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(
        out,
        "{:<18}{:>10}{:>10}{:>10}{:>10}{:>10}{:>10}",
        "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
    );
    let _ = writeln!(out, "{light}");
    for c in fit.coefficients() {
        let _ = writeln!(
            out,
            "{:<18}{:>10.4}{:>10.3}{:>10.3}{:>10.3}{:>10.3}{:>10.3}",
            c.name, c.estimate, c.std_error, c.t_value, c.p_value, c.conf_low, c.conf_high
        );
    }

    let _ = writeln!(out, "{heavy}");
    let footer = [
        (("Durbin-Watson:", format!("{:.3}", fit.durbin_watson())), ("Jarque-Bera (JB):", format!("{:.3}", fit.jarque_bera()))),
        (("Skew:", format!("{:.3}", fit.skew())), ("Prob(JB):", format!("{:.3}", fit.jb_p_value()))),
        (("Kurtosis:", format!("{:.3}", fit.kurtosis())), ("", String::new())),
    ];
    for ((left_label, left_value), (right_label, right_value)) in footer {
        let line = format!(
            "{:<20}{:>18}   {:<22}{:>15}",
            left_label, left_value, right_label, right_value
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let _ = writeln!(out, "{heavy}");
    out
}
