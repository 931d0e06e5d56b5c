//! Data Matrix (ECC 200) data codeword encoder.
//!
//! This crate turns input bytes into the data codewords of a Data Matrix
//! symbol, encoded entirely in one encodation scheme chosen by the caller.
//! The output is padded so it fills the data capacity of the smallest
//! allowed symbol size.
//!
//! ```rust
//! use dmtx_encode::{data::encode_single, Scheme, SymbolList, SymbolSize};
//!
//! let (codewords, size) = encode_single(b"123456", Scheme::Ascii, SymbolList::default()).unwrap();
//! assert_eq!(codewords, [142, 164, 186]);
//! assert_eq!(size, SymbolSize::Square10);
//! ```
//!
//! Error correction, module placement and rendering are not part of this
//! crate, neither is choosing the scheme per input byte.
#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod decodation;
mod encodation;
mod symbol_size;

pub mod data;

pub use data::EncodeOptions;
pub use encodation::{DataEncodingError, FatalReason, InvalidReason, Scheme};
pub use symbol_size::{SymbolList, SymbolSize};
