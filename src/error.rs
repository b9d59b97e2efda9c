//! Crate-wide error type. Ties the diagnostic taxonomy of `spec.md` §7
//! onto a single `Result<T, Error>` surface: `critical` diagnostics and
//! `error` diagnostics under `-strict` become `Error::Fatal`; everything
//! else stays inside `Diagnostics` and never produces an `Err`.

use crate::diagnostics::Diagnostic;
use crate::loader::LoaderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("host evaluator failure: {0}")]
    Loader(#[from] LoaderError),

    #[error("{0}")]
    Fatal(Diagnostic),
}

pub type Result<T> = std::result::Result<T, Error>;
