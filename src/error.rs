use thiserror::Error;

/// Errors surfaced by the optimizer.
///
/// Only configuration problems are fatal. Missing optional data (nutrition,
/// pantry, seasonal catalog, preferences) degrades to documented neutral
/// defaults, and collaborator failures degrade the affected sub-score, so
/// neither ever appears here.
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("weight vector for mode '{mode}' sums to {sum}, expected 1.0")]
    InvalidWeights { mode: String, sum: f32 },
}
