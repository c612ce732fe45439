//! Dense least squares via Householder QR.

use mmm_core::{MmmError, MmmResult};
use ndarray::{s, Array1, Array2};

/// Relative threshold on |R_jj| below which a column counts as dependent.
const RANK_TOLERANCE: f64 = 1e-10;

/// Solution of `min ||X b - y||²` together with the triangular factor `R`
/// (`X = Q R`), which gives `(X'X)^-1 = R^-1 R^-T`.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub coefficients: Array1<f64>,
    pub r: Array2<f64>,
}

/// Solve an overdetermined system with Householder reflections.
///
/// Fails with [`MmmError::SingularMatrix`] when `X` is rank deficient instead
/// of returning degenerate coefficients.
pub fn least_squares(x: &Array2<f64>, y: &Array1<f64>) -> MmmResult<LeastSquares> {
    let (n, k) = x.dim();
    if y.len() != n {
        return Err(MmmError::InvalidData(format!(
            "response has {} rows, design matrix has {}",
            y.len(),
            n
        )));
    }
    if n < k {
        return Err(MmmError::InsufficientData {
            required: k,
            actual: n,
        });
    }

    let mut a = x.to_owned();
    let mut b = y.to_owned();

    for j in 0..k {
        let norm = a.slice(s![j.., j]).iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        let alpha = if a[[j, j]] > 0.0 { -norm } else { norm };
        let mut v = a.slice(s![j.., j]).to_owned();
        v[0] -= alpha;
        let v_norm_sq = v.dot(&v);
        if v_norm_sq == 0.0 {
            continue;
        }
        for c in j..k {
            let mut col = a.slice_mut(s![j.., c]);
            let proj = 2.0 * v.dot(&col) / v_norm_sq;
            col.scaled_add(-proj, &v);
        }
        let mut tail = b.slice_mut(s![j..]);
        let proj = 2.0 * v.dot(&tail) / v_norm_sq;
        tail.scaled_add(-proj, &v);
    }

    let r = upper_triangle(&a, k);
    let max_diag = (0..k).map(|i| r[[i, i]].abs()).fold(0.0, f64::max);
    let rank = (0..k)
        .filter(|&i| max_diag > 0.0 && r[[i, i]].abs() > RANK_TOLERANCE * max_diag)
        .count();
    if rank < k {
        return Err(MmmError::SingularMatrix { rank, columns: k });
    }

    let coefficients = back_substitute(&r, &b.slice(s![..k]).to_owned());
    Ok(LeastSquares { coefficients, r })
}

/// Inverse of a non-singular upper-triangular matrix.
pub fn upper_triangular_inverse(r: &Array2<f64>) -> Array2<f64> {
    let k = r.nrows();
    let mut inv = Array2::<f64>::zeros((k, k));
    for c in 0..k {
        let mut e = Array1::<f64>::zeros(k);
        e[c] = 1.0;
        let col = back_substitute(r, &e);
        inv.column_mut(c).assign(&col);
    }
    inv
}

/// `(X'X)^-1` from the QR factor.
pub fn normal_inverse(r: &Array2<f64>) -> Array2<f64> {
    let r_inv = upper_triangular_inverse(r);
    r_inv.dot(&r_inv.t())
}

fn upper_triangle(a: &Array2<f64>, k: usize) -> Array2<f64> {
    let mut r = Array2::<f64>::zeros((k, k));
    for i in 0..k {
        for j in i..k {
            r[[i, j]] = a[[i, j]];
        }
    }
    r
}

fn back_substitute(r: &Array2<f64>, rhs: &Array1<f64>) -> Array1<f64> {
    let k = r.nrows();
    let mut out = Array1::<f64>::zeros(k);
    for i in (0..k).rev() {
        let mut acc = rhs[i];
        for j in (i + 1)..k {
            acc -= r[[i, j]] * out[j];
        }
        out[i] = acc / r[[i, i]];
    }
    out
}
