//! Least-squares estimation for the log-log marketing-mix models: design
//! matrices, OLS fit statistics, VIF, residual diagnostics and text summaries.

pub mod design;
pub mod diagnostics;
pub mod linalg;
pub mod ols;
pub mod summary;
pub mod vif;

pub use design::{AnalysisFrame, DesignMatrix, ModelSpec, Regressor, CONST_LABEL};
pub use diagnostics::{HistogramBin, QqPoint, ResidualDiagnostics, ResidualPoint};
pub use ols::{Coefficient, OlsFit};
pub use summary::render_summary;
pub use vif::{variance_inflation, CollinearityLevel, VifEntry, VifReport};
