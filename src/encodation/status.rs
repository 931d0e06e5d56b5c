use thiserror::Error;

use super::Scheme;
use crate::symbol_size::SymbolSize;

/// Why a request could not be encoded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("byte {byte:#04x} at input position {position} can not be encoded in {scheme:?}")]
    InputOutOfAlphabet {
        scheme: Scheme,
        byte: u8,
        position: usize,
    },
    #[error("the requested symbol size is too small for the data")]
    RequestedSizeTooSmall,
    #[error("no symbol size is big enough for the data")]
    NoSizeFits,
    #[error("the list of allowed symbol sizes is empty")]
    EmptySymbolList,
    #[error("ECI designator {0} is out of range (maximum is 999999)")]
    EciOutOfRange(u32),
}

/// An internal invariant of the encoder was broken.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FatalReason {
    #[error("encoder called in a state it can not start from")]
    PreconditionViolation,
    #[error("encoder reached a state which should be unreachable")]
    UnreachableState,
    #[error("operation called while a different encodation scheme was active")]
    UnexpectedScheme,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DataEncodingError {
    /// The caller's request can not be satisfied, e.g., a character which
    /// is not part of the chosen scheme or a symbol size which is too small.
    #[error("invalid encoding request: {0}")]
    Invalid(InvalidReason),
    /// Bug in the encoder.
    #[error("internal encoder error: {0}")]
    Fatal(FatalReason),
}

/// State of an [EncodeStream](super::EncodeStream).
///
/// Once the status leaves `Encoding` it never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Encoding,
    Complete(SymbolSize),
    Invalid(InvalidReason),
    Fatal(FatalReason),
}

/// Returned when an operation moved the stream out of `Encoding`.
///
/// The stream status holds the details. With `?` this stops all
/// further work on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatusChanged;

pub(crate) type Step = Result<(), StatusChanged>;
