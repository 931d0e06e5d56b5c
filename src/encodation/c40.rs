//! C40 encodation and the parts shared with Text and X12.
//!
//! All three schemes pack three values from 0 to 39 into two codewords.
use alloc::vec::Vec;

use super::status::{FatalReason, InvalidReason, Step};
use super::{ascii, change_scheme, EncodeStream, Scheme, Unlatch, UNLATCH};
use crate::symbol_size::SymbolList;

pub(super) const SHIFT1: u8 = 0;
pub(super) const SHIFT2: u8 = 1;
pub(super) const SHIFT3: u8 = 2;
const UPPER_SHIFT: u8 = 30;
const FNC1: u8 = 27;

/// Translates one input byte to its scheme values.
///
/// Returns `false` if the byte is not part of the scheme's alphabet.
pub(super) type PushValues = fn(&mut Vec<u8>, u8) -> bool;

pub(super) fn push_c40_values(values: &mut Vec<u8>, ch: u8) -> bool {
    match ch {
        // Basic set
        b' ' => values.push(3),
        b'0'..=b'9' => values.push(ch - b'0' + 4),
        b'A'..=b'Z' => values.push(ch - b'A' + 14),
        // Shift 1 set
        0..=31 => values.extend([SHIFT1, ch]),
        // Shift 2 set
        33..=47 => values.extend([SHIFT2, ch - 33]),
        58..=64 => values.extend([SHIFT2, ch - 58 + 15]),
        91..=95 => values.extend([SHIFT2, ch - 91 + 22]),
        // Shift 3 set
        96..=127 => values.extend([SHIFT3, ch - 96]),
        128..=255 => {
            values.extend([SHIFT2, UPPER_SHIFT]);
            return push_c40_values(values, ch - 128);
        }
    }
    true
}

/// Pack three values into two codewords.
fn append_triple(stream: &mut EncodeStream, c1: u8, c2: u8, c3: u8) -> Step {
    if !stream.scheme().is_ctx() {
        return Err(stream.mark_fatal(FatalReason::UnexpectedScheme));
    }
    let enc = 1600 * c1 as u16 + 40 * c2 as u16 + c3 as u16 + 1;
    stream.chain_append((enc >> 8) as u8);
    stream.chain_append((enc & 0xFF) as u8);
    stream.chain_value_count += 3;
    Ok(())
}

fn append_triples(stream: &mut EncodeStream, values: &[u8]) -> Step {
    for triple in values.chunks_exact(3) {
        append_triple(stream, triple[0], triple[1], triple[2])?;
    }
    Ok(())
}

/// Write the CTX unlatch codeword, only allowed between triples.
pub(super) fn append_unlatch(stream: &mut EncodeStream) -> Step {
    if !stream.scheme().is_ctx() {
        return Err(stream.mark_fatal(FatalReason::UnexpectedScheme));
    }
    if stream.chain_value_count % 3 != 0 {
        return Err(stream.mark_fatal(FatalReason::UnreachableState));
    }
    stream.chain_append(UNLATCH);
    stream.chain_value_count += 1;
    Ok(())
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    encode_next_chunk_generic(stream, symbols, push_c40_values)
}

/// Read input until the values line up with a triple boundary and write them.
///
/// If the input ends before that, the end of data rules apply.
pub(super) fn encode_next_chunk_generic(
    stream: &mut EncodeStream,
    symbols: &SymbolList,
    push_values: PushValues,
) -> Step {
    let scheme = stream.scheme();
    let rest = stream.input.rest();
    let mut values = Vec::with_capacity(6);
    let mut used = 0;
    for &ch in rest {
        let ok = if Some(ch) == stream.fnc1() {
            if scheme == Scheme::X12 {
                false
            } else {
                values.extend([SHIFT2, FNC1]);
                true
            }
        } else {
            push_values(&mut values, ch)
        };
        if !ok {
            return Err(stream.mark_invalid(InvalidReason::InputOutOfAlphabet {
                scheme,
                byte: ch,
                position: stream.input.position() + used,
            }));
        }
        used += 1;
        if values.len() % 3 == 0 {
            break;
        }
    }
    if used == 0 {
        return Ok(());
    }
    if values.len() % 3 == 0 {
        stream.input.advance_by(used);
        return append_triples(stream, &values);
    }
    complete_partial(stream, symbols, values, used)
}

/// The input ended with one or two values short of a triple.
fn complete_partial(
    stream: &mut EncodeStream,
    symbols: &SymbolList,
    mut values: Vec<u8>,
    used: usize,
) -> Step {
    let leftover = values.len() % 3;
    if leftover == 2 && stream.scheme() != Scheme::X12 {
        // fill the triple with a shift, the decoder drops it
        values.push(SHIFT1);
        let words = stream.output.len() + values.len() / 3 * 2;
        stream.input.advance_by(used);
        append_triples(stream, &values)?;
        if let Some(size) = symbols.find_symbol_size(words) {
            if size.num_data_codewords() == words {
                return Err(stream.mark_complete(size));
            }
        }
        return Ok(());
    }

    log::trace!(
        "{} values left at end of {} data, finishing in ASCII",
        leftover,
        stream.scheme()
    );
    let words = match ascii::encode_remaining(stream.input.rest(), stream.fnc1(), usize::MAX) {
        Some(words) => words,
        None => return Err(stream.mark_fatal(FatalReason::UnreachableState)),
    };
    let len = stream.output.len();
    if words.len() == 1 {
        // a single ASCII codeword filling the symbol needs no unlatch
        if let Some(size) = symbols.find_symbol_size(len + 1) {
            if size.num_data_codewords() == len + 1 {
                change_scheme(stream, Scheme::Ascii, Unlatch::Implicit)?;
                ascii::append_value(stream, words[0])?;
                stream.input.advance_by(used);
                return Err(stream.mark_complete(size));
            }
        }
    }
    change_scheme(stream, Scheme::Ascii, Unlatch::Explicit)?;
    for word in words {
        ascii::append_value(stream, word)?;
    }
    stream.input.advance_by(used);
    let size = stream.symbol_for(stream.output.len(), symbols)?;
    ascii::pad_remaining(stream, size)?;
    Err(stream.mark_complete(size))
}

/// Finish the symbol once all input is written in C40, Text, or X12.
pub(super) fn complete_if_done(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    if stream.input.has_next() {
        return Ok(());
    }
    let mut size = stream.symbol_for(stream.output.len(), symbols)?;
    if stream.remaining_capacity(size) > 0 {
        change_scheme(stream, Scheme::Ascii, Unlatch::Explicit)?;
        size = stream.symbol_for(stream.output.len(), symbols)?;
        ascii::pad_remaining(stream, size)?;
    }
    Err(stream.mark_complete(size))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_c40_values() {
    let values = |ch| {
        let mut v = Vec::new();
        assert!(push_c40_values(&mut v, ch));
        v
    };
    assert_eq!(values(b' '), [3]);
    assert_eq!(values(b'9'), [13]);
    assert_eq!(values(b'Z'), [39]);
    assert_eq!(values(b'\n'), [SHIFT1, 10]);
    assert_eq!(values(b'!'), [SHIFT2, 0]);
    assert_eq!(values(b':'), [SHIFT2, 15]);
    assert_eq!(values(b'_'), [SHIFT2, 26]);
    assert_eq!(values(b'a'), [SHIFT3, 1]);
    assert_eq!(values(0xC1), [SHIFT2, UPPER_SHIFT, 14]);
    assert_eq!(values(0x80), [SHIFT2, UPPER_SHIFT, SHIFT1, 0]);
}

#[test]
fn test_triple_packing() {
    let mut stream = EncodeStream::new(b"");
    stream.set_scheme(Scheme::C40);
    append_triple(&mut stream, 14, 15, 16).unwrap();
    append_triple(&mut stream, 39, 39, 39).unwrap();
    assert_eq!(stream.output(), [89, 233, 250, 0]);
    assert_eq!(stream.chain_value_count, 6);
    assert_eq!(stream.chain_word_count, 4);
}

#[test]
fn test_unlatch_mid_triple_is_fatal() {
    let mut stream = EncodeStream::new(b"");
    stream.set_scheme(Scheme::C40);
    stream.chain_value_count = 2;
    assert!(append_unlatch(&mut stream).is_err());
    assert!(!stream.is_encoding());
}
