use thiserror::Error;

/// Errors reported by the solvers, the Markov toolkit and report storage.
#[derive(Debug, Error)]
pub enum PrimerError {
    #[error("egg drop needs at least one egg")]
    NoEggs,

    #[error("highest safe floor {safe} exceeds building height {floors}")]
    SafeFloorOutOfRange { safe: usize, floors: usize },

    #[error("item {index} has zero weight")]
    ZeroWeightItem { index: usize },

    #[error("state has {requested} items remaining but only {available} items exist")]
    ItemsOutOfRange { requested: usize, available: usize },

    #[error("item values sum past u64::MAX")]
    ValueOverflow,

    #[error("{left} weights but {right} values")]
    LengthMismatch { left: usize, right: usize },

    #[error("square {square} is outside a board of {states} states")]
    SquareOutOfRange { square: usize, states: usize },

    #[error("redirect {from} -> {to} is not allowed")]
    InvalidRedirect { from: usize, to: usize },

    #[error("board lists {chutes} chutes but only {redirects} redirects")]
    ChuteCountOutOfRange { chutes: usize, redirects: usize },

    #[error("square {0} has more than one redirect")]
    DuplicateRedirect(usize),

    #[error("matrix is {rows}x{cols}, expected square")]
    NotSquare { rows: usize, cols: usize },

    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("row {row} sums to {sum}, expected 1")]
    NotStochastic { row: usize, sum: f64 },

    #[error("I - Q is singular: some transient state never reaches an absorbing state")]
    Singular,

    #[error("chain has no absorbing states")]
    NoAbsorbingStates,

    #[error("power iteration did not converge in {iterations} iterations (last change {delta:e})")]
    NotConverged { iterations: usize, delta: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PrimerError>;
