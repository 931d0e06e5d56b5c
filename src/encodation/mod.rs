//! Encoding of data in a single encodation scheme.
//!
//! The dispatcher repeatedly asks the sub-encoder of the active scheme for
//! the next chunk of codewords and then whether the symbol can be completed.
//! All scheme changes go through ASCII.
use crate::symbol_size::{SymbolList, SymbolSize};

pub(crate) mod ascii;
mod base256;
mod c40;
mod edifact;
mod scheme;
mod status;
mod stream;
mod text;
mod x12;


pub use scheme::Scheme;
pub use status::{DataEncodingError, FatalReason, InvalidReason};
pub(crate) use stream::EncodeStream;

use status::Step;

pub(crate) const UNLATCH: u8 = 254;

/// How to leave the current scheme on a scheme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unlatch {
    /// Write the scheme's unlatch value.
    Explicit,
    /// The end of the scheme is implied, e.g., by the end of the symbol.
    Implicit,
}

/// Encode the rest of the stream's input in `target`.
///
/// The stream must be in ASCII and still encoding. On success the output
/// fills the returned symbol size.
pub(crate) fn encode_single(
    stream: &mut EncodeStream,
    target: Scheme,
    symbols: &SymbolList,
) -> Result<SymbolSize, DataEncodingError> {
    if stream.scheme() != Scheme::Ascii || !stream.is_encoding() {
        let _ = stream.mark_fatal(FatalReason::PreconditionViolation);
        return stream.outcome();
    }
    log::debug!(
        "encoding {} bytes in {}",
        stream.input.rest().len(),
        target
    );
    while stream.is_encoding() {
        let position = stream.input.position();
        let len = stream.output.len();
        if encode_next_chunk(stream, target, symbols).is_ok()
            && position == stream.input.position()
            && len == stream.output.len()
        {
            let _ = stream.mark_fatal(FatalReason::UnreachableState);
        }
    }
    stream.outcome()
}

/// Emit one chunk in `target`, latching to it first if needed.
fn encode_next_chunk(stream: &mut EncodeStream, target: Scheme, symbols: &SymbolList) -> Step {
    let target = effective_target(stream, target);

    if stream.scheme() != target {
        change_scheme(stream, target, Unlatch::Explicit)?;
        stream.check_scheme(target)?;
        if target == Scheme::Edifact {
            edifact::complete_if_done(stream, symbols)?;
        }
    }

    match stream.scheme() {
        Scheme::Ascii => {
            ascii::encode_next_chunk(stream)?;
            ascii::complete_if_done(stream, symbols)?;
        }
        Scheme::C40 => {
            c40::encode_next_chunk(stream, symbols)?;
            c40::complete_if_done(stream, symbols)?;
        }
        Scheme::Text => {
            text::encode_next_chunk(stream, symbols)?;
            c40::complete_if_done(stream, symbols)?;
        }
        Scheme::X12 => {
            x12::encode_next_chunk(stream, symbols)?;
            c40::complete_if_done(stream, symbols)?;
        }
        Scheme::Edifact => {
            edifact::encode_next_chunk(stream)?;
            edifact::complete_if_done(stream, symbols)?;
        }
        Scheme::Base256 => {
            base256::encode_next_chunk(stream)?;
            base256::complete_if_done(stream, symbols)?;
        }
    }

    if stream.output.len() > symbols.max_data_codewords() {
        return Err(stream.mark_invalid(symbols.no_fit_reason()));
    }
    Ok(())
}

/// Scheme the next chunk is written in.
///
/// Stays in ASCII when latching could not produce anything: at the end of
/// input, and before an X12 tail too short for a triple.
fn effective_target(stream: &EncodeStream, target: Scheme) -> Scheme {
    let current = stream.scheme();
    if current == Scheme::Ascii && !stream.input.has_next() {
        return Scheme::Ascii;
    }
    if target == Scheme::X12 && current != Scheme::X12 {
        let rest = stream.input.rest();
        if rest.len() < 3 && rest.iter().all(|ch| x12::is_native_x12(*ch)) {
            return Scheme::Ascii;
        }
    }
    target
}

/// Leave the current scheme and latch to `target`.
pub(crate) fn change_scheme(stream: &mut EncodeStream, target: Scheme, unlatch: Unlatch) -> Step {
    if stream.scheme() == target {
        return Ok(());
    }

    match stream.scheme() {
        Scheme::C40 | Scheme::Text | Scheme::X12 if unlatch == Unlatch::Explicit => {
            c40::append_unlatch(stream)?;
        }
        Scheme::Edifact if unlatch == Unlatch::Explicit => {
            edifact::append_value(stream, edifact::UNLATCH)?;
        }
        _ => (),
    }
    stream.set_scheme(Scheme::Ascii);
    stream.reset_chain();

    if let Some(latch) = target.latch_from_ascii() {
        log::debug!("latch to {} at codeword {}", target, stream.output.len());
        ascii::append_value(stream, latch)?;
        stream.set_scheme(target);
        stream.reset_chain();
        if target == Scheme::Base256 {
            base256::update_chain_header(stream, false)?;
        }
    }
    Ok(())
}

#[test]
fn test_precondition() {
    let mut stream = EncodeStream::new(b"A");
    stream.set_scheme(Scheme::C40);
    assert_eq!(
        encode_single(&mut stream, Scheme::C40, &SymbolList::default()),
        Err(DataEncodingError::Fatal(FatalReason::PreconditionViolation))
    );
}

#[test]
fn test_change_scheme_latches() {
    for scheme in Scheme::all() {
        let mut stream = EncodeStream::new(b"");
        change_scheme(&mut stream, scheme, Unlatch::Explicit).unwrap();
        assert_eq!(stream.scheme(), scheme);
        let expected: alloc::vec::Vec<u8> = match scheme {
            Scheme::Ascii => alloc::vec![],
            Scheme::Base256 => alloc::vec![231, 44],
            _ => scheme.latch_from_ascii().into_iter().collect(),
        };
        assert_eq!(stream.output(), &expected[..]);
    }
}

#[test]
fn test_explicit_unlatch_from_ctx() {
    let mut stream = EncodeStream::new(b"");
    change_scheme(&mut stream, Scheme::X12, Unlatch::Explicit).unwrap();
    change_scheme(&mut stream, Scheme::Text, Unlatch::Explicit).unwrap();
    assert_eq!(stream.output(), [238, 254, 239]);
}
