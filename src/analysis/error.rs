use thiserror::Error;

/// Failures produced by the analysis pipeline and its upstream calls.
///
/// The validation variants are synchronous and local; `Upstream` is the
/// only one that originates outside the process.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("column '{0}' is not a numeric track attribute")]
    InvalidColumn(String),

    #[error("top-N selection needs n >= 1")]
    InvalidN,

    #[error("at most 3 seed genres are accepted, got {0}")]
    TooManySeeds(usize),

    #[error("at most 3 features can be bounded per query, got {0}")]
    TooManyFeatures(usize),

    #[error("at least one seed genre is required")]
    EmptySeeds,

    #[error("no base value supplied for feature '{0}'")]
    MissingBaseValue(&'static str),

    #[error("upstream request failed: {0}")]
    Upstream(String),
}
