use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpecError>;

/// Errors produced while parsing and resolving data specs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// Range string did not have exactly one ':' separator
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Range fragment contained a disallowed character or no usable row/col
    #[error("invalid range fragment: {0}")]
    InvalidRangeFragment(String),

    /// Alias name absent from the store
    #[error("alias not found: {0}")]
    AliasNotFound(String),

    /// Alias names must be non-empty
    #[error("alias name cannot be empty")]
    EmptyAliasName,

    /// A !range suffix needs an alias that designates a worksheet
    #[error("invalid alias for ! notation: {0}")]
    InvalidAliasRange(String),

    /// The same field was set by more than one partial spec
    #[error("multiple {0}s in specs")]
    FieldConflict(&'static str),

    /// A range is only addressable within a worksheet
    #[error("range specified without a worksheet: {0}")]
    RangeWithoutWorksheet(String),

    /// A data spec is at most two arguments
    #[error("too many arguments when expanding data spec: {0:?}")]
    TooManyArgs(Vec<String>),
}
