//! Data part encoding
//!
//! The bytes encoded into a Data Matrix symbol consist of two parts,
//! the data codewords and the error correction codewords. The functions
//! in this module produce the first part, encoded in one chosen
//! encodation scheme and padded to fill a symbol size.
use alloc::vec::Vec;

use crate::encodation::{ascii, encode_single as encode_stream, EncodeStream};
pub use crate::encodation::{DataEncodingError, FatalReason, InvalidReason, Scheme};
use crate::symbol_size::{SymbolList, SymbolSize};

/// Options for [encode_data].
///
/// ```rust
/// # use dmtx_encode::{data::{encode_data, EncodeOptions}, Scheme, SymbolSize};
/// let options = EncodeOptions::new(Scheme::C40).symbols(SymbolSize::Square12);
/// let (words, _) = encode_data(b"ABCDEF", &options).unwrap();
/// assert_eq!(words, [230, 89, 233, 109, 36]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    scheme: Scheme,
    symbols: SymbolList,
    fnc1: bool,
    fnc1_substitute: Option<u8>,
    eci: Option<u32>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new(Scheme::Ascii)
    }
}

impl EncodeOptions {
    /// Encode all input in `scheme`, picking the smallest fitting default size.
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            symbols: SymbolList::default(),
            fnc1: false,
            fnc1_substitute: None,
            eci: None,
        }
    }

    /// Restrict the symbol sizes to pick from.
    pub fn symbols(mut self, symbols: impl Into<SymbolList>) -> Self {
        self.symbols = symbols.into();
        self
    }

    /// Start with FNC1, marking the data as GS1.
    pub fn fnc1(mut self) -> Self {
        self.fnc1 = true;
        self
    }

    /// Encode occurrences of `byte` in the input as FNC1.
    ///
    /// GS1 data usually uses the group separator (29) for this.
    pub fn fnc1_substitute(mut self, byte: u8) -> Self {
        self.fnc1_substitute = Some(byte);
        self
    }

    /// Announce the character set with an ECI designator (0 to 999999).
    pub fn eci(mut self, eci: u32) -> Self {
        self.eci = Some(eci);
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }
}

/// Encode input to data codewords for Data Matrix.
///
/// Returns the codewords and the chosen symbol size, the codewords fill
/// exactly the data capacity of that size.
pub fn encode_data(
    data: &[u8],
    options: &EncodeOptions,
) -> Result<(Vec<u8>, SymbolSize), DataEncodingError> {
    let mut stream = EncodeStream::new(data).with_fnc1_substitute(options.fnc1_substitute);
    if options.fnc1 && ascii::write_fnc1(&mut stream).is_err() {
        return Err(outcome_error(&stream));
    }
    if let Some(eci) = options.eci {
        if ascii::write_eci(&mut stream, eci).is_err() {
            return Err(outcome_error(&stream));
        }
    }
    let size = encode_stream(&mut stream, options.scheme, &options.symbols)?;
    Ok((stream.into_output(), size))
}

/// Encode input in a single scheme without FNC1 or ECI prefix.
pub fn encode_single(
    data: &[u8],
    scheme: Scheme,
    symbols: impl Into<SymbolList>,
) -> Result<(Vec<u8>, SymbolSize), DataEncodingError> {
    encode_data(data, &EncodeOptions::new(scheme).symbols(symbols))
}

fn outcome_error(stream: &EncodeStream) -> DataEncodingError {
    match stream.outcome() {
        Err(err) => err,
        Ok(_) => DataEncodingError::Fatal(FatalReason::UnreachableState),
    }
}
