use alloc::vec::Vec;

use super::c40;
use super::status::Step;
use super::EncodeStream;
use crate::symbol_size::SymbolList;

pub(crate) fn is_native_x12(ch: u8) -> bool {
    matches!(ch, 13 | b'*' | b'>' | b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

fn push_x12_values(values: &mut Vec<u8>, ch: u8) -> bool {
    let value = match ch {
        13 => 0,
        b'*' => 1,
        b'>' => 2,
        b' ' => 3,
        b'0'..=b'9' => ch - b'0' + 4,
        b'A'..=b'Z' => ch - b'A' + 14,
        _ => return false,
    };
    values.push(value);
    true
}

pub(super) fn encode_next_chunk(stream: &mut EncodeStream, symbols: &SymbolList) -> Step {
    c40::encode_next_chunk_generic(stream, symbols, push_x12_values)
}

#[test]
fn test_x12_values() {
    let mut v = Vec::new();
    for ch in b"\r*> 09AZ" {
        assert!(push_x12_values(&mut v, *ch));
    }
    assert_eq!(v, [0, 1, 2, 3, 4, 13, 14, 39]);
    assert!(!push_x12_values(&mut v, b'a'));
    assert!(!is_native_x12(b'#'));
}
