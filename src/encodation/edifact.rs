use super::status::{InvalidReason, Step};
use super::{ascii, change_scheme, EncodeStream, Scheme, Unlatch};
use crate::symbol_size::SymbolList;

pub(crate) const UNLATCH: u8 = 0b011111;

#[inline]
pub(crate) fn is_encodable(ch: u8) -> bool {
    matches!(ch, 32..=94)
}

/// Append a six bit value to the chain.
///
/// The bits are written immediately, a partially filled codeword is taken
/// back from the output and completed by the next value.
pub(super) fn append_value(stream: &mut EncodeStream, value: u8) -> Step {
    stream.check_scheme(Scheme::Edifact)?;
    let value = (value & 0b11_1111) << 2;
    match stream.chain_value_count % 4 {
        0 => stream.chain_append(value),
        1 => {
            let prev = stream.chain_remove_last()?;
            stream.chain_append(prev | (value >> 6));
            stream.chain_append(value << 2);
        }
        2 => {
            let prev = stream.chain_remove_last()?;
            stream.chain_append(prev | (value >> 4));
            stream.chain_append(value << 4);
        }
        _ => {
            let prev = stream.chain_remove_last()?;
            stream.chain_append(prev | (value >> 2));
        }
    }
    stream.chain_value_count += 1;
    Ok(())
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream) -> Step {
    let ch = match stream.input.peek() {
        Some(ch) => ch,
        None => return Ok(()),
    };
    if Some(ch) == stream.fnc1() {
        // FNC1 only exists in ASCII, go there and come back
        change_scheme(stream, Scheme::Ascii, Unlatch::Explicit)?;
        ascii::append_value(stream, ascii::FNC1)?;
        stream.input.advance();
        return Ok(());
    }
    if !is_encodable(ch) {
        return Err(stream.mark_invalid(InvalidReason::InputOutOfAlphabet {
            scheme: Scheme::Edifact,
            byte: ch,
            position: stream.input.position(),
        }));
    }
    stream.input.advance();
    append_value(stream, ch)
}

/// Check the EDIFACT end of data conditions.
///
/// On a codeword boundary with up to two ASCII codewords of input left and
/// at most two codewords left in the symbol, the rest is written in ASCII
/// without unlatch. Otherwise at the end of input an unlatch is written
/// unless the symbol is exactly full.
pub(super) fn complete_if_done(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    if stream.scheme() != Scheme::Edifact {
        // after an FNC1 the dispatcher latches back
        return Ok(());
    }
    let clean_boundary = stream.chain_value_count % 4 == 0;

    if clean_boundary {
        if let Some(words) = ascii::encode_remaining(stream.input.rest(), stream.fnc1(), 2) {
            let len = stream.output.len();
            let size = stream.symbol_for(len + words.len(), symbols)?;
            let remaining = stream.remaining_capacity(size);
            if remaining < 3 && words.len() <= remaining {
                change_scheme(stream, Scheme::Ascii, Unlatch::Implicit)?;
                for word in words {
                    ascii::append_value(stream, word)?;
                }
                let rest = stream.input.rest().len();
                stream.input.advance_by(rest);
                ascii::pad_remaining(stream, size)?;
                return Err(stream.mark_complete(size));
            }
        }
    }

    if !stream.input.has_next() {
        let mut size = stream.symbol_for(stream.output.len(), symbols)?;
        if !clean_boundary || stream.remaining_capacity(size) > 0 {
            change_scheme(stream, Scheme::Ascii, Unlatch::Explicit)?;
            size = stream.symbol_for(stream.output.len(), symbols)?;
            ascii::pad_remaining(stream, size)?;
        }
        return Err(stream.mark_complete(size));
    }
    Ok(())
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_value_packing() {
    let mut stream = EncodeStream::new(b"");
    stream.set_scheme(Scheme::Edifact);
    for ch in b"ABC" {
        append_value(&mut stream, *ch).unwrap();
    }
    // partial codeword is already written
    assert_eq!(stream.output(), [4, 32, 192]);
    append_value(&mut stream, b'D').unwrap();
    assert_eq!(stream.output(), [4, 32, 196]);
    assert_eq!(stream.chain_word_count, 3);
    assert_eq!(stream.chain_value_count, 4);
}

#[test]
fn test_unlatch_value_packing() {
    let mut stream = EncodeStream::new(b"");
    stream.set_scheme(Scheme::Edifact);
    append_value(&mut stream, b'A').unwrap();
    append_value(&mut stream, UNLATCH).unwrap();
    // 000001 011111, zero filled
    assert_eq!(stream.output(), [0b0000_0101, 0b1111_0000]);
}

#[test]
fn test_encodable() {
    assert!(is_encodable(b' '));
    assert!(is_encodable(b'^'));
    assert!(!is_encodable(b'_'));
    assert!(!is_encodable(b'a'));
}
