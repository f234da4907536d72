use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read `{path}`, reason: `{reason}`")]
    Io { path: String, reason: String },
    #[error("file does not appear to be a CSV file, reason: `{0}`")]
    MalformedInput(String),
    #[error("line {row} has no `{column}` field")]
    MissingColumn { row: usize, column: String },
    #[error("cannot process the date `{value}` on line {row}")]
    InvalidRowDate { row: usize, value: String },
    #[error("cannot process the amount `{value}` on line {row}")]
    InvalidRowAmount { row: usize, value: String },
    #[error("total overflows when adding the amount on line {row}")]
    TotalOverflow { row: usize },

    #[error("date `{0}` is invalid")]
    InvalidDateEntry(String),
    #[error("ending date `{0}` is invalid, expected a date, `q` or `m`")]
    InvalidEndEntry(String),
    #[error("input was closed while waiting for an answer")]
    EndOfInput,

    #[error("invalid configuration, reason: `{0}`")]
    Config(String),
}

impl Error {
    /// Errors a user can fix by typing another answer.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidDateEntry(_) | Error::InvalidEndEntry(_))
    }
}
