use alloc::vec::Vec;
use arrayvec::ArrayVec;

use super::status::{InvalidReason, Step};
use super::{EncodeStream, Scheme};
use crate::symbol_size::{SymbolList, SymbolSize};

pub(crate) const PAD: u8 = 129;
pub(crate) const LATCH_C40: u8 = 230;
pub(crate) const LATCH_BASE256: u8 = 231;
pub(crate) const FNC1: u8 = 232;
pub(crate) const UPPER_SHIFT: u8 = 235;
pub(crate) const LATCH_X12: u8 = 238;
pub(crate) const LATCH_TEXT: u8 = 239;
pub(crate) const LATCH_EDIFACT: u8 = 240;
pub(crate) const ECI: u8 = 241;

// Reserved, not written by this encoder
// const STRUCT_APPEND: u8 = 233;
// const READER_PROGRAMMING: u8 = 234;
// const MACRO05: u8 = 236;
// const MACRO06: u8 = 237;

fn two_digits_coming(rest: &[u8], fnc1: Option<u8>) -> bool {
    match rest {
        [a, b, ..] => {
            a.is_ascii_digit() && b.is_ascii_digit() && fnc1 != Some(*a) && fnc1 != Some(*b)
        }
        _ => false,
    }
}

/// Encode the start of `rest` as one ASCII chunk.
///
/// Returns the number of input bytes used and the codewords.
fn next_chunk(rest: &[u8], fnc1: Option<u8>) -> (usize, ArrayVec<u8, 2>) {
    let mut words = ArrayVec::new();
    if two_digits_coming(rest, fnc1) {
        words.push((rest[0] - b'0') * 10 + (rest[1] - b'0') + 130);
        return (2, words);
    }
    match rest.first().cloned() {
        None => return (0, words),
        Some(ch) if Some(ch) == fnc1 => words.push(FNC1),
        Some(ch @ 0..=127) => words.push(ch + 1),
        Some(ch) => {
            words.push(UPPER_SHIFT);
            words.push(ch - 127);
        }
    }
    (1, words)
}

/// ASCII codewords for `rest`, without touching the stream.
///
/// Returns `None` if more than `limit` codewords would be needed.
pub(super) fn encode_remaining(rest: &[u8], fnc1: Option<u8>, limit: usize) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut rest = rest;
    while !rest.is_empty() {
        let (used, words) = next_chunk(rest, fnc1);
        out.extend_from_slice(&words);
        if out.len() > limit {
            return None;
        }
        rest = &rest[used..];
    }
    Some(out)
}

pub(super) fn append_value(stream: &mut EncodeStream, value: u8) -> Step {
    stream.check_scheme(Scheme::Ascii)?;
    stream.chain_append(value);
    stream.chain_value_count += 1;
    Ok(())
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream) -> Step {
    let (used, words) = next_chunk(stream.input.rest(), stream.fnc1());
    if used == 0 {
        return Ok(());
    }
    stream.input.advance_by(used);
    for word in &words {
        append_value(stream, *word)?;
    }
    // a digit pair is two values in one codeword
    stream.chain_value_count += used.saturating_sub(words.len());
    Ok(())
}

pub(super) fn complete_if_done(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    if stream.input.has_next() {
        return Ok(());
    }
    let size = stream.symbol_for(stream.output.len(), symbols)?;
    pad_remaining(stream, size)?;
    Err(stream.mark_complete(size))
}

/// Perform the 253 state randomization of the padding codewords.
///
/// `pos` is the 1-based position of the codeword in the output.
pub(crate) fn randomize_253_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 253) + 1;
    let tmp = ch as usize + pseudo_random;
    if tmp <= 254 {
        tmp as u8
    } else {
        (tmp - 254) as u8
    }
}

/// Fill the symbol with padding codewords.
///
/// The first one is a plain PAD, all following ones are randomized.
pub(super) fn pad_remaining(stream: &mut EncodeStream, size: SymbolSize) -> Step {
    stream.check_scheme(Scheme::Ascii)?;
    let remaining = stream.remaining_capacity(size);
    if remaining == 0 {
        return Ok(());
    }
    log::trace!("padding {} codewords", remaining);
    stream.chain_append(PAD);
    for _ in 1..remaining {
        let pos = stream.output.len() + 1;
        stream.chain_append(randomize_253_state(PAD, pos));
    }
    Ok(())
}

/// Write FNC1 in first position, marking GS1 data.
pub(crate) fn write_fnc1(stream: &mut EncodeStream) -> Step {
    append_value(stream, FNC1)
}

/// Write an Extended Channel Interpretation designator.
pub(crate) fn write_eci(stream: &mut EncodeStream, eci: u32) -> Step {
    let mut words = ArrayVec::<u8, 4>::new();
    words.push(ECI);
    match eci {
        0..=126 => words.push(eci as u8 + 1),
        127..=16382 => {
            let v = eci - 127;
            words.push((v / 254 + 128) as u8);
            words.push((v % 254 + 1) as u8);
        }
        16383..=999_999 => {
            let v = eci - 16383;
            words.push((v / 64516 + 192) as u8);
            words.push(((v / 254) % 254 + 1) as u8);
            words.push((v % 254 + 1) as u8);
        }
        _ => return Err(stream.mark_invalid(InvalidReason::EciOutOfRange(eci))),
    }
    for word in words {
        append_value(stream, word)?;
    }
    Ok(())
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_next_chunk() {
    let chunk = |rest: &[u8]| {
        let (used, words) = next_chunk(rest, None);
        (used, words.to_vec())
    };
    assert_eq!(chunk(b"12A"), (2, alloc::vec![142]));
    assert_eq!(chunk(b"1A"), (1, alloc::vec![50]));
    assert_eq!(chunk(b"\xa0"), (1, alloc::vec![235, 33]));
    assert_eq!(chunk(b""), (0, alloc::vec![]));
}

#[test]
fn test_fnc1_substitute_breaks_digit_pair() {
    assert_eq!(
        encode_remaining(b"1\x1d23", Some(0x1d), usize::MAX),
        Some(alloc::vec![50, 232, 153])
    );
}

#[test]
fn test_encode_remaining_limit() {
    assert_eq!(encode_remaining(b"ABC", None, 2), None);
    assert_eq!(
        encode_remaining(b"1234", None, 2),
        Some(alloc::vec![142, 164])
    );
}

#[test]
fn test_randomize_253_stays_legal() {
    for pos in 1..2000 {
        let r = randomize_253_state(PAD, pos);
        assert!((1..=254).contains(&r), "pos {} gave {}", pos, r);
    }
    // "A" in a 10x10 symbol is 66, 129, 70
    assert_eq!(randomize_253_state(PAD, 3), 70);
}

#[test]
fn test_eci_designators() {
    let enc = |eci| {
        let mut stream = EncodeStream::new(b"");
        write_eci(&mut stream, eci).map(|_| stream.into_output())
    };
    assert_eq!(enc(3), Ok(alloc::vec![241, 4]));
    assert_eq!(enc(126), Ok(alloc::vec![241, 127]));
    assert_eq!(enc(127), Ok(alloc::vec![241, 128, 1]));
    assert_eq!(enc(16382), Ok(alloc::vec![241, 191, 254]));
    assert_eq!(enc(16383), Ok(alloc::vec![241, 192, 1, 1]));
    assert_eq!(enc(999_999), Ok(alloc::vec![241, 207, 63, 129]));
    assert!(enc(1_000_000).is_err());
}
