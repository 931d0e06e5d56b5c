use alloc::vec::Vec;

use super::c40;
use super::status::Step;
use super::EncodeStream;
use crate::symbol_size::SymbolList;

/// Text is C40 with the letter cases swapped.
fn push_text_values(values: &mut Vec<u8>, ch: u8) -> bool {
    let ch = match ch {
        b'A'..=b'Z' => ch - b'A' + b'a',
        b'a'..=b'z' => ch - b'a' + b'A',
        0xC1..=0xDA => ch - 0xC1 + 0xE1,
        0xE1..=0xFA => ch - 0xE1 + 0xC1,
        ch => ch,
    };
    c40::push_c40_values(values, ch)
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    c40::encode_next_chunk_generic(stream, symbols, push_text_values)
}

#[test]
fn test_text_values() {
    let values = |ch| {
        let mut v = Vec::new();
        assert!(push_text_values(&mut v, ch));
        v
    };
    assert_eq!(values(b'a'), [14]);
    assert_eq!(values(b'A'), [c40::SHIFT3, 1]);
    assert_eq!(values(b'{'), [c40::SHIFT3, 27]);
    assert_eq!(values(0xE1), [c40::SHIFT2, 30, 14]);
}
