//! Data decodation, the inverse of the `encodation` module.
//!
//! Only used to check the encoder output in tests.
use alloc::{vec, vec::Vec};

use super::encodation::{ascii, Scheme, UNLATCH};

const EDIFACT_UNLATCH: u8 = 0b011111;
const GROUP_SEPARATOR: u8 = 29;

#[derive(Debug, PartialEq)]
pub enum DataDecodingError {
    UnexpectedCharacter(&'static str, u8),
    NotImplemented(&'static str),
    UnexpectedEnd,
}

/// Result of decoding the data codewords.
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub data: Vec<u8>,
    /// ECI designators with the data position they apply from.
    pub ecis: Vec<(usize, u32)>,
    /// FNC1 in first position.
    pub gs1: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Reader<'a>(&'a [u8], usize);

impl<'a> Reader<'a> {
    fn pos(&self) -> usize {
        self.1 + 1
    }

    fn eat(&mut self) -> Result<u8, DataDecodingError> {
        if let Some((ch, rest)) = self.0.split_first() {
            self.1 += 1;
            self.0 = rest;
            Ok(*ch)
        } else {
            Err(DataDecodingError::UnexpectedEnd)
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.0.get(i).cloned()
    }
}

/// Decode data codewords, FNC1 after the first position becomes GS.
pub fn decode(data: &[u8]) -> Result<Decoded, DataDecodingError> {
    let mut data = Reader(data, 0);
    let mut scheme = Scheme::Ascii;
    let mut out = Decoded::default();

    while !data.is_empty() {
        let (rest, new_scheme) = match scheme {
            Scheme::Ascii => decode_ascii(data, &mut out)?,
            Scheme::Base256 => decode_base256(data, &mut out.data)?,
            Scheme::X12 => decode_x12(data, &mut out.data)?,
            Scheme::Edifact => decode_edifact(data, &mut out.data)?,
            Scheme::C40 => decode_c40_like(data, &mut out.data, BASE_C40, SHIFT3_C40)?,
            Scheme::Text => decode_c40_like(data, &mut out.data, BASE_TEXT, SHIFT3_TEXT)?,
        };
        data = rest;
        scheme = new_scheme;
    }
    Ok(out)
}

/// Decode data without FNC1 or ECI.
pub fn decode_data(data: &[u8]) -> Result<Vec<u8>, DataDecodingError> {
    let decoded = decode(data)?;
    if decoded.gs1 || !decoded.ecis.is_empty() {
        return Err(DataDecodingError::NotImplemented("FNC1 or ECI"));
    }
    Ok(decoded.data)
}

fn derandomize_253_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 253) + 1;
    let tmp = ch as i16 - pseudo_random as i16;
    if tmp >= 1 {
        tmp as u8
    } else {
        (tmp + 254) as u8
    }
}

fn read_eci(mut data: Reader) -> Result<(Reader, u32), DataDecodingError> {
    let ch1 = data.eat()?;
    let mut next = |what| match data.eat()? {
        ch @ 1..=254 => Ok(ch as u32 - 1),
        ch => Err(DataDecodingError::UnexpectedCharacter(what, ch)),
    };
    let eci = match ch1 {
        1..=127 => ch1 as u32 - 1,
        128..=191 => (ch1 as u32 - 128) * 254 + next("2nd after ECI")? + 127,
        192..=207 => {
            let ch2 = next("2nd after ECI")?;
            let ch3 = next("3rd after ECI")?;
            (ch1 as u32 - 192) * 64516 + ch2 * 254 + ch3 + 16383
        }
        _ => return Err(DataDecodingError::UnexpectedCharacter("1st after ECI", ch1)),
    };
    Ok((data, eci))
}

fn decode_ascii<'a>(
    mut data: Reader<'a>,
    out: &mut Decoded,
) -> Result<(Reader<'a>, Scheme), DataDecodingError> {
    let mut upper_shift = false;
    while let Ok(ch) = data.eat() {
        match ch {
            ch @ 1..=128 => {
                if upper_shift {
                    out.data.push(ch + 127);
                    upper_shift = false;
                } else {
                    out.data.push(ch - 1);
                }
            }
            ascii::PAD => {
                // eat rest, check padding format
                while let Ok(ch) = data.eat() {
                    let ch = derandomize_253_state(ch, data.pos() - 1);
                    if ch != ascii::PAD {
                        return Err(DataDecodingError::UnexpectedCharacter(
                            "non-padding char in padding area",
                            ch,
                        ));
                    }
                }
                return Ok((data, Scheme::Ascii));
            }
            ch @ 130..=229 => {
                let digit = ch - 130;
                out.data.push(b'0' + (digit / 10));
                out.data.push(b'0' + (digit % 10));
            }
            ascii::LATCH_C40 => return Ok((data, Scheme::C40)),
            ascii::LATCH_BASE256 => return Ok((data, Scheme::Base256)),
            ascii::FNC1 => {
                if data.pos() == 2 {
                    out.gs1 = true;
                } else {
                    out.data.push(GROUP_SEPARATOR);
                }
            }
            233 => return Err(DataDecodingError::NotImplemented("Structured Append")),
            234 => return Err(DataDecodingError::NotImplemented("Reader Programming")),
            ascii::UPPER_SHIFT => {
                upper_shift = true;
            }
            236 => return Err(DataDecodingError::NotImplemented("05 Macro")),
            237 => return Err(DataDecodingError::NotImplemented("06 Macro")),
            ascii::LATCH_X12 => return Ok((data, Scheme::X12)),
            ascii::LATCH_TEXT => return Ok((data, Scheme::Text)),
            ascii::LATCH_EDIFACT => return Ok((data, Scheme::Edifact)),
            ascii::ECI => {
                let (rest, eci) = read_eci(data)?;
                data = rest;
                out.ecis.push((out.data.len(), eci));
            }
            ch => {
                return Err(DataDecodingError::UnexpectedCharacter(
                    "illegal in ascii",
                    ch,
                ))
            }
        }
    }
    Ok((data, Scheme::Ascii))
}

fn derandomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as i16 - pseudo_random as i16;
    if tmp >= 0 {
        tmp as u8
    } else {
        (tmp + 256) as u8
    }
}

fn decode_base256<'a>(
    mut data: Reader<'a>,
    out: &mut Vec<u8>,
) -> Result<(Reader<'a>, Scheme), DataDecodingError> {
    let ch1 = data.eat()?;
    let ch1 = derandomize_255_state(ch1, data.pos() - 1) as usize;
    let length = if ch1 == 0 {
        data.len()
    } else if ch1 < 250 {
        ch1
    } else {
        let ch2 = data.eat()?;
        let ch2 = derandomize_255_state(ch2, data.pos() - 1) as usize;
        250 * (ch1 - 249) + ch2
    };
    for _ in 0..length {
        let ch = data.eat()?;
        out.push(derandomize_255_state(ch, data.pos() - 1));
    }
    Ok((data, Scheme::Ascii))
}

fn dec_edifact_char(ch: u8) -> u8 {
    if (ch & 0b10_0000) != 0 {
        ch
    } else {
        ch | 0b0100_0000
    }
}

fn decode_edifact<'a>(
    mut data: Reader<'a>,
    out: &mut Vec<u8>,
) -> Result<(Reader<'a>, Scheme), DataDecodingError> {
    'groups: while data.len() > 2 {
        // three codewords hold four values
        let mut chunk: u32 = 0;
        let mut words = 0;
        for i in 0..4 {
            // only read the codewords holding bits of this value
            while 8 * words < 6 * (i + 1) {
                match data.eat() {
                    Ok(ch) => chunk |= (ch as u32) << (16 - 8 * words),
                    Err(_) => break 'groups,
                }
                words += 1;
            }
            let val = ((chunk >> (18 - 6 * i)) & 0b11_1111) as u8;
            if val == EDIFACT_UNLATCH {
                break 'groups;
            }
            out.push(dec_edifact_char(val));
        }
    }
    // at most two codewords left at a group boundary are ASCII
    Ok((data, Scheme::Ascii))
}

fn decode_c40_tuple(a: u8, b: u8) -> (u8, u8, u8) {
    let mut full = ((a as u16) << 8) + b as u16 - 1;
    let tmp = full / 1600;
    let c1 = tmp as u8;
    full -= tmp * 1600;
    let tmp = full / 40;
    (c1, tmp as u8, (full - tmp * 40) as u8)
}

fn dec_x12_val(ch: u8) -> Result<u8, DataDecodingError> {
    match ch {
        0 => Ok(13),
        1 => Ok(42),
        2 => Ok(62),
        3 => Ok(b' '),
        ch @ 4..=13 => Ok(b'0' + (ch - 4)),
        ch @ 14..=39 => Ok(b'A' + (ch - 14)),
        ch => Err(DataDecodingError::UnexpectedCharacter("not x12", ch)),
    }
}

fn decode_x12<'a>(
    mut data: Reader<'a>,
    out: &mut Vec<u8>,
) -> Result<(Reader<'a>, Scheme), DataDecodingError> {
    while data.len() > 1 {
        let first = data.eat()?;
        if first == UNLATCH {
            return Ok((data, Scheme::Ascii));
        }
        let second = data.eat()?;
        let (c1, c2, c3) = decode_c40_tuple(first, second);

        out.push(dec_x12_val(c1)?);
        out.push(dec_x12_val(c2)?);
        out.push(dec_x12_val(c3)?);
    }
    if data.peek(0) == Some(UNLATCH) {
        // single UNLATCH at end of data
        data.eat()?;
    }
    Ok((data, Scheme::Ascii))
}

const BASE_C40: &[u8; 37] = b" 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SHIFT3_C40: &[u8; 32] = b"`abcdefghijklmnopqrstuvwxyz{|}~\x7f";

const BASE_TEXT: &[u8; 37] = b" 0123456789abcdefghijklmnopqrstuvwxyz";
const SHIFT3_TEXT: &[u8; 32] = b"`ABCDEFGHIJKLMNOPQRSTUVWXYZ{|}~\x7f";

const SHIFT2: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_";

fn push_char(out: &mut Vec<u8>, ch: u8, upper_shift: &mut bool) {
    if core::mem::take(upper_shift) {
        out.push(ch + 128);
    } else {
        out.push(ch);
    }
}

fn decode_c40_like<'a>(
    mut data: Reader<'a>,
    out: &mut Vec<u8>,
    map_base: &[u8; 37],
    map_shift3: &[u8; 32],
) -> Result<(Reader<'a>, Scheme), DataDecodingError> {
    let mut shift = 0;
    let mut upper_shift = false;
    while data.len() > 1 {
        let first = data.eat()?;
        if first == UNLATCH {
            return Ok((data, Scheme::Ascii));
        }
        let (c1, c2, c3) = decode_c40_tuple(first, data.eat()?);
        for ch in [c1, c2, c3] {
            match (shift, ch) {
                (0, 0..=2) => {
                    shift = ch + 1;
                    continue;
                }
                (0, 3..=39) => push_char(out, map_base[ch as usize - 3], &mut upper_shift),
                (1, 0..=31) => push_char(out, ch, &mut upper_shift),
                (2, 0..=26) => push_char(out, SHIFT2[ch as usize], &mut upper_shift),
                (2, 27) => out.push(GROUP_SEPARATOR),
                (2, 30) => upper_shift = true,
                (3, 0..=31) => push_char(out, map_shift3[ch as usize], &mut upper_shift),
                _ => {
                    return Err(DataDecodingError::UnexpectedCharacter(
                        "not in c40/text set",
                        ch,
                    ))
                }
            }
            shift = 0;
        }
    }
    if data.peek(0) == Some(UNLATCH) {
        // single UNLATCH at end of data
        data.eat()?;
    }
    Ok((data, Scheme::Ascii))
}

#[test]
fn test_ascii() {
    let mut out = Decoded::default();
    assert_eq!(
        decode_ascii(Reader(b"BCD\x82\xeb\x26", 0), &mut out),
        Ok((Reader(&[], 6), Scheme::Ascii))
    );
    assert_eq!(&out.data, b"ABC00\xa5");
}

#[test]
fn test_c40() {
    assert_eq!(decode_data(&[230, 91, 11]), Ok(vec![b'A', b'I', b'M']));
}

#[test]
fn test_edifact() {
    assert_eq!(
        decode_data(&[240, 16, 21, 1]),
        Ok(vec![b'D', b'A', b'T', b'A'])
    );
}

#[test]
fn test_base256() {
    assert_eq!(
        decode_data(&[231, 44, 108, 59, 226, 126, 1, 104]),
        Ok(vec![0xab, 0xe4, 0xf6, 0xfc, 0xe9, 0xbb])
    );
}

#[test]
fn test_fnc1() {
    let decoded = decode(&[232, 66, 232, 67]).unwrap();
    assert!(decoded.gs1);
    assert_eq!(decoded.data, b"A\x1dB");
}
