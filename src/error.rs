#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a point, reference, or direction slice has the wrong
    /// number of objectives.
    #[error("dimension mismatch: expected {expected} objectives, got {got}")]
    DimensionMismatch {
        /// The expected number of objectives.
        expected: usize,
        /// The actual number of objectives.
        got: usize,
    },

    /// Returned when a point set is constructed with fewer than two
    /// objectives.
    #[error("at least two objectives are required, got {0}")]
    TooFewObjectives(usize),

    /// Returned when the flat data length is not a multiple of the number of
    /// objectives.
    #[error("flat data length {len} is not a multiple of {nobj} objectives")]
    RaggedData {
        /// Total number of values provided.
        len: usize,
        /// The number of objectives per point.
        nobj: usize,
    },

    /// Returned when an input coordinate is NaN or infinite.
    #[error("non-finite coordinate at point {point}, objective {objective}")]
    NonFinite {
        /// Index of the offending point.
        point: usize,
        /// Index of the offending objective.
        objective: usize,
    },

    /// Returned when cumulative set sizes are not strictly increasing or do
    /// not end at the total point count.
    #[error("cumulative sizes must be strictly increasing and end at {expected}")]
    InvalidCumulativeSizes {
        /// The total number of points the last entry must equal.
        expected: usize,
    },

    /// Returned when a point does not weakly dominate the reference point.
    #[error("reference point is not weakly dominated by point {point}")]
    InfeasibleReference {
        /// Index of the first violating point.
        point: usize,
    },

    /// Returned when the lower corner of a sampling box exceeds the upper
    /// corner.
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a weighted rectangle has inverted corners or a
    /// non-finite weight.
    #[error("invalid rectangle at index {0}")]
    InvalidRectangle(usize),

    /// Returned when an operation only supports specific objective counts.
    #[error("{operation} supports {supported} objectives, got {got}")]
    UnsupportedDimension {
        /// The operation that rejected the input.
        operation: &'static str,
        /// Human-readable description of the supported counts.
        supported: &'static str,
        /// The number of objectives that was provided.
        got: usize,
    },

    /// Returned when at least one point is required but none were given.
    #[error("at least one point is required")]
    EmptyInput,

    /// Returned when an attainment percentile is outside (0, 100].
    #[error("invalid percentile: {0} must be in (0.0, 100.0]")]
    InvalidPercentile(f64),

    /// Returned when the number of difference intervals is zero.
    #[error("at least one interval is required")]
    ZeroIntervals,

    /// Returned when a Monte-Carlo estimate is requested with zero samples.
    #[error("at least one sample is required")]
    ZeroSamples,

    /// Returned when the exponential weight distribution has a non-positive
    /// rate parameter.
    #[error("invalid exponential rate: {0} must be positive")]
    NonPositiveRate(f64),

    /// Returned when the multiplicative epsilon indicator sees a value <= 0.
    #[error("multiplicative epsilon requires strictly positive values, got {value} at point {point}, objective {objective}")]
    NonPositiveValue {
        /// The offending value.
        value: f64,
        /// Index of the offending point.
        point: usize,
        /// Index of the offending objective.
        objective: usize,
    },

    /// Returned when normalization bounds collapse to a single value.
    #[error("degenerate bounds for objective {objective}: lower equals upper ({value})")]
    DegenerateBounds {
        /// Index of the degenerate objective.
        objective: usize,
        /// The collapsed bound value.
        value: f64,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
