use mmm_core::{MmmError, MmmResult};
use rand::Rng;
use rand_distr::{Distribution, Normal};

pub(crate) fn normal(mean: f64, sd: f64) -> MmmResult<Normal<f64>> {
    Normal::new(mean, sd).map_err(|e| MmmError::Distribution(format!("N({}, {}): {}", mean, sd, e)))
}

/// `n` independent draws from `N(mean, sd)`.
pub(crate) fn draw_normal<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    sd: f64,
    n: usize,
) -> MmmResult<Vec<f64>> {
    let dist = normal(mean, sd)?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}
