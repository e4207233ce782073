use thiserror::Error;

pub type SkResult<T> = Result<T, SkError>;

#[derive(Error, Debug)]
pub enum SkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Dimension mismatch: {what} (expected {expected}, got {got})")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
