//! Base 256 encodation.
//!
//! The chain starts with a length header of one or two codewords. The header
//! is rewritten after every byte, growing to two codewords once the chain
//! holds more than 249 bytes. All codewords of the chain, header included,
//! are randomized by their position in the output, so inserting or removing
//! a header byte re-randomizes the bytes after it.
use super::status::{FatalReason, StatusChanged, Step};
use super::{ascii, change_scheme, EncodeStream, Scheme, Unlatch};
use crate::symbol_size::SymbolList;

/// Longest chain a two byte header can describe.
const MAX_CHAIN_LENGTH: usize = 1555;

/// Perform the 255 state randomization as defined in the standard.
///
/// `pos` must be the number of the byte to be written w.r.t. to the full
/// codeword vector, the number is 1-based.
pub(crate) fn randomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as u16 + pseudo_random as u16;
    if tmp <= 255 {
        tmp as u8
    } else {
        (tmp - 256) as u8
    }
}

/// Inverse of [randomize_255_state].
pub(crate) fn derandomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as i16 - pseudo_random as i16;
    if tmp >= 0 {
        tmp as u8
    } else {
        (tmp + 256) as u8
    }
}

pub(super) fn append_value(stream: &mut EncodeStream, value: u8) -> Step {
    stream.check_scheme(Scheme::Base256)?;
    let pos = stream.output.len() + 1;
    stream.chain_append(randomize_255_state(value, pos));
    stream.chain_value_count += 1;
    update_chain_header(stream, false)
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream) -> Step {
    match stream.input.advance() {
        Some(ch) => append_value(stream, ch),
        None => Ok(()),
    }
}

fn header_byte_count(stream: &mut EncodeStream) -> Result<usize, StatusChanged> {
    match stream.chain_word_count.checked_sub(stream.chain_value_count) {
        Some(count @ 0..=2) => Ok(count),
        _ => Err(stream.mark_fatal(FatalReason::UnreachableState)),
    }
}

/// Rewrite the length header for the current chain length.
///
/// With `perfect_fit` the chain runs to the end of the symbol and the
/// header is the single value 0.
pub(super) fn update_chain_header(stream: &mut EncodeStream, perfect_fit: bool) -> Step {
    stream.check_scheme(Scheme::Base256)?;
    let header_index = stream.output.len() - stream.chain_word_count;
    let header_bytes = header_byte_count(stream)?;
    let length = stream.chain_value_count;

    if length <= 249 || perfect_fit {
        match header_bytes {
            0 => insert_first(stream, header_index),
            2 => remove_first(stream, header_index),
            _ => (),
        }
        let value = if perfect_fit { 0 } else { length as u8 };
        stream.output[header_index] = randomize_255_state(value, header_index + 1);
    } else if length <= MAX_CHAIN_LENGTH {
        for _ in header_bytes..2 {
            insert_first(stream, header_index);
        }
        let high = (length / 250 + 249) as u8;
        let low = (length % 250) as u8;
        stream.output[header_index] = randomize_255_state(high, header_index + 1);
        stream.output[header_index + 1] = randomize_255_state(low, header_index + 2);
    } else {
        // caught by the size checks, the header is left as is
        log::trace!("base 256 chain of {} bytes has no length header", length);
    }
    Ok(())
}

/// Insert a header byte at `index`, moving the rest of the chain back by one.
fn insert_first(stream: &mut EncodeStream, index: usize) {
    stream.output.insert(index, 0);
    stream.chain_word_count += 1;
    for i in index + 1..stream.output.len() {
        let value = derandomize_255_state(stream.output[i], i);
        stream.output[i] = randomize_255_state(value, i + 1);
    }
}

/// Remove the header byte at `index`, moving the rest of the chain forward.
fn remove_first(stream: &mut EncodeStream, index: usize) {
    stream.output.remove(index);
    stream.chain_word_count -= 1;
    for i in index..stream.output.len() {
        let value = derandomize_255_state(stream.output[i], i + 2);
        stream.output[i] = randomize_255_state(value, i + 1);
    }
}

pub(super) fn complete_if_done(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    if stream.input.has_next() {
        return Ok(());
    }
    let header_bytes = header_byte_count(stream)?;
    // length with a single header byte
    let short_len = stream.output.len() + 1 - header_bytes;
    if let Some(size) = symbols.find_symbol_size(short_len) {
        if size.num_data_codewords() == short_len {
            update_chain_header(stream, true)?;
            return Err(stream.mark_complete(size));
        }
    }
    if stream.chain_value_count > MAX_CHAIN_LENGTH {
        return Err(stream.mark_invalid(symbols.no_fit_reason()));
    }
    let size = stream.symbol_for(stream.output.len(), symbols)?;
    change_scheme(stream, Scheme::Ascii, Unlatch::Implicit)?;
    ascii::pad_remaining(stream, size)?;
    Err(stream.mark_complete(size))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_randomize_inverse() {
    for pos in 1..600 {
        for ch in [0, 1, 127, 128, 254, 255] {
            let r = randomize_255_state(ch, pos);
            assert_eq!(derandomize_255_state(r, pos), ch);
        }
    }
    assert_eq!(randomize_255_state(0, 2), 44);
}

#[test]
fn test_header_grows_and_shrinks() {
    let mut stream = EncodeStream::new(b"");
    stream.output.push(super::ascii::LATCH_BASE256);
    stream.set_scheme(Scheme::Base256);
    update_chain_header(&mut stream, false).unwrap();
    assert_eq!(stream.output, [231, 44]);

    for i in 0..250 {
        append_value(&mut stream, i as u8).unwrap();
    }
    // two header bytes, 250 data bytes
    assert_eq!(stream.output.len(), 253);
    assert_eq!(derandomize_255_state(stream.output[1], 2), 250);
    assert_eq!(derandomize_255_state(stream.output[2], 3), 0);
    for i in 0..250 {
        assert_eq!(derandomize_255_state(stream.output[3 + i], 4 + i), i as u8);
    }

    update_chain_header(&mut stream, true).unwrap();
    assert_eq!(stream.output.len(), 252);
    assert_eq!(derandomize_255_state(stream.output[1], 2), 0);
    for i in 0..250 {
        assert_eq!(derandomize_255_state(stream.output[2 + i], 3 + i), i as u8);
    }
}
