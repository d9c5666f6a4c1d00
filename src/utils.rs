use rand_distr::LogNormal;

use crate::error::ContagionError;

/// Log-normal distribution parameterized by its mean instead of the
/// underlying normal's mu, for seeding per-person `susceptibility` and
/// `viral_load` attributes at population build time.
///
/// # Errors
///
/// Returns a `ContagionError::ConfigError` for a non-positive mean or a
/// negative sigma.
pub fn log_normal_with_mean(mean: f64, sigma: f64) -> Result<LogNormal<f64>, ContagionError> {
    if mean <= 0.0 {
        return Err(ContagionError::ConfigError(format!(
            "log-normal mean must be positive, was {mean}"
        )));
    }
    if sigma < 0.0 {
        return Err(ContagionError::ConfigError(format!(
            "log-normal sigma must not be negative, was {sigma}"
        )));
    }
    let mu = mean.ln() - sigma * sigma / 2.0;
    LogNormal::new(mu, sigma)
        .map_err(|e| ContagionError::ConfigError(format!("invalid log-normal sigma {sigma}: {e}")))
}
