//! Symbol sizes and the capacity lookups the encoder needs.
//!
//! The encoder never paints a symbol, it only has to know how many data
//! codewords each size holds. [SymbolList] is the size request: it names the
//! sizes the encoder may pick from, and [SymbolList::find_symbol_size] picks
//! the smallest one that fits.
use core::cmp::{Ordering, PartialOrd};
use core::iter::{Extend, FromIterator, IntoIterator};

use alloc::collections::BTreeSet;

#[cfg(test)]
use alloc::vec::Vec;

#[cfg(test)]
use pretty_assertions::assert_eq;

use crate::encodation::InvalidReason;

type SymbolCollection = BTreeSet<SymbolSize>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Set of [symbol sizes](SymbolSize) the encoder is allowed to use.
///
/// The smallest symbol which can hold the encoded data is chosen. The
/// usual requests map to:
///
/// - a specific size: `SymbolSize::Square22.into()`,
/// - smallest that fits: [SymbolList::default],
/// - smallest square: `SymbolList::default().enforce_square()`,
/// - smallest rectangle: `SymbolList::default().enforce_rectangular()`.
///
/// The rectangular extensions (DMRE) are only used when requested with
/// [SymbolList::with_extended_rectangles].
///
/// ```rust
/// # use dmtx_encode::{data::encode_single, Scheme, SymbolList, SymbolSize};
/// let (words, size) = encode_single(b"A1B2", Scheme::Ascii, SymbolSize::Square12).unwrap();
/// assert_eq!(size, SymbolSize::Square12);
/// assert_eq!(words.len(), 5);
///
/// let list = SymbolList::default().enforce_rectangular();
/// let (_, size) = encode_single(b"A1B2", Scheme::Ascii, list).unwrap();
/// assert_eq!(size, SymbolSize::Rect8x18);
/// ```
pub struct SymbolList {
    symbols: SymbolCollection,
}

impl SymbolList {
    /// Get standard symbol sizes extended by all DMRE rectangles (ISO 21471).
    pub fn with_extended_rectangles() -> Self {
        Self::with_whitelist(SYMBOL_SIZES.iter().cloned())
    }

    /// Remove all non-square symbols from the current selection.
    pub fn enforce_square(mut self) -> Self {
        self.symbols.retain(|s| s.is_square());
        self
    }

    /// Remove all square symbols from the current selection.
    pub fn enforce_rectangular(mut self) -> Self {
        self.symbols.retain(|s| !s.is_square());
        self
    }

    /// Create a symbol list containing only the given symbols.
    ///
    /// The list does not need to be sorted.
    pub fn with_whitelist<I>(whitelist: I) -> Self
    where
        I: IntoIterator<Item = SymbolSize>,
    {
        Self::from_iter(whitelist)
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolSize> + '_ {
        self.symbols.iter().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check if a symbol size is in this symbol list.
    pub fn contains(&self, symbol_size: &SymbolSize) -> bool {
        self.symbols.contains(symbol_size)
    }

    /// Find the smallest symbol holding `words_required` data codewords.
    ///
    /// Even zero codewords need a symbol, it is then filled with padding.
    /// Returns `None` if no symbol in the list is big enough.
    pub fn find_symbol_size(&self, words_required: usize) -> Option<SymbolSize> {
        let words_required = words_required.max(1);
        self.symbols
            .iter()
            .find(|s| s.num_data_codewords() >= words_required)
            .cloned()
    }

    /// Data capacity of the biggest symbol in the list.
    pub fn max_data_codewords(&self) -> usize {
        self.symbols
            .iter()
            .map(|s| s.num_data_codewords())
            .max()
            .unwrap_or(0)
    }

    /// The reason to report if [SymbolList::find_symbol_size] failed.
    pub(crate) fn no_fit_reason(&self) -> InvalidReason {
        match self.symbols.len() {
            0 => InvalidReason::EmptySymbolList,
            1 => InvalidReason::RequestedSizeTooSmall,
            _ => InvalidReason::NoSizeFits,
        }
    }
}

impl IntoIterator for SymbolList {
    type Item = SymbolSize;
    type IntoIter = <SymbolCollection as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

impl FromIterator<SymbolSize> for SymbolList {
    fn from_iter<T: IntoIterator<Item = SymbolSize>>(iter: T) -> Self {
        Self {
            symbols: SymbolCollection::from_iter(iter),
        }
    }
}

impl Extend<SymbolSize> for SymbolList {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = SymbolSize>,
    {
        self.symbols.extend(iter);
    }
}

impl Default for SymbolList {
    /// All ECC 200 sizes of ISO 16022, squares and rectangles.
    fn default() -> Self {
        let symbols = SYMBOL_SIZES.iter().cloned().filter(|s| !s.is_dmre());
        Self::with_whitelist(symbols)
    }
}

impl From<SymbolSize> for SymbolList {
    fn from(size: SymbolSize) -> SymbolList {
        SymbolList::with_whitelist([size])
    }
}

impl<const N: usize> From<[SymbolSize; N]> for SymbolList {
    fn from(other: [SymbolSize; N]) -> SymbolList {
        SymbolList::with_whitelist(other)
    }
}

impl From<&SymbolList> for SymbolList {
    fn from(other: &SymbolList) -> SymbolList {
        other.clone()
    }
}

/// Row of the symbol attribute table.
struct Attributes {
    height: usize,
    width: usize,
    data_codewords: usize,
    /// Number of interleaved Reed-Solomon blocks
    ecc_blocks: usize,
    /// Error codewords per block
    ecc_per_block: usize,
}

const fn attr(
    height: usize,
    width: usize,
    data_codewords: usize,
    ecc_blocks: usize,
    ecc_per_block: usize,
) -> Attributes {
    Attributes {
        height,
        width,
        data_codewords,
        ecc_blocks,
        ecc_per_block,
    }
}

/// The symbol sizes supported by Data Matrix.
///
/// The number behind a variant, e.g., [Square10](SymbolSize::Square10),
/// describes the number of modules the symbol is tall/wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(enum_iterator::Sequence))]
pub enum SymbolSize {
    Square10,
    Square12,
    Square14,
    Square16,
    Square18,
    Square20,
    Square22,
    Square24,
    Square26,
    Square32,
    Square36,
    Square40,
    Square44,
    Square48,
    Square52,
    Square64,
    Square72,
    Square80,
    Square88,
    Square96,
    Square104,
    Square120,
    Square132,
    Square144,
    Rect8x18,
    Rect8x32,
    Rect12x26,
    Rect12x36,
    Rect16x36,
    Rect16x48,

    /// DMRE 8x48 variant
    Rect8x48,
    /// DMRE 8x64 variant
    Rect8x64,
    /// DMRE 8x80 variant
    Rect8x80,
    /// DMRE 8x96 variant
    Rect8x96,
    /// DMRE 8x120 variant
    Rect8x120,
    /// DMRE 8x144 variant
    Rect8x144,
    /// DMRE 12x64 variant
    Rect12x64,
    /// DMRE 12x88 variant
    Rect12x88,
    /// DMRE 16x64 variant
    Rect16x64,
    /// DMRE 20x36 variant
    Rect20x36,
    /// DMRE 20x44 variant
    Rect20x44,
    /// DMRE 20x64 variant
    Rect20x64,
    /// DMRE 22x48 variant
    Rect22x48,
    /// DMRE 24x48 variant
    Rect24x48,
    /// DMRE 24x64 variant
    Rect24x64,
    /// DMRE 26x40 variant
    Rect26x40,
    /// DMRE 26x48 variant
    Rect26x48,
    /// DMRE 26x64 variant
    Rect26x64,
}

#[rustfmt::skip]
const SYMBOL_SIZES: &[SymbolSize] = &[
    SymbolSize::Square10, SymbolSize::Square12, SymbolSize::Rect8x18, SymbolSize::Square14,
    SymbolSize::Rect8x32, SymbolSize::Square16, SymbolSize::Rect12x26, SymbolSize::Square18,
    SymbolSize::Rect8x48, SymbolSize::Square20, SymbolSize::Rect12x36, SymbolSize::Rect8x64,
    SymbolSize::Square22, SymbolSize::Rect16x36, SymbolSize::Rect8x80, SymbolSize::Square24,
    SymbolSize::Rect8x96, SymbolSize::Rect12x64, SymbolSize::Square26, SymbolSize::Rect20x36,
    SymbolSize::Rect16x48, SymbolSize::Rect8x120, SymbolSize::Rect20x44, SymbolSize::Square32,
    SymbolSize::Rect16x64, SymbolSize::Rect8x144, SymbolSize::Rect12x88, SymbolSize::Rect26x40,
    SymbolSize::Rect22x48, SymbolSize::Rect24x48, SymbolSize::Rect20x64, SymbolSize::Square36,
    SymbolSize::Rect26x48, SymbolSize::Rect24x64, SymbolSize::Square40, SymbolSize::Rect26x64,
    SymbolSize::Square44, SymbolSize::Square48, SymbolSize::Square52, SymbolSize::Square64,
    SymbolSize::Square72, SymbolSize::Square80, SymbolSize::Square88, SymbolSize::Square96,
    SymbolSize::Square104, SymbolSize::Square120, SymbolSize::Square132, SymbolSize::Square144,
];

impl SymbolSize {
    #[rustfmt::skip]
    fn attributes(&self) -> Attributes {
        match self {
            Self::Square10 =>  attr(10, 10, 3, 1, 5),
            Self::Square12 =>  attr(12, 12, 5, 1, 7),
            Self::Square14 =>  attr(14, 14, 8, 1, 10),
            Self::Square16 =>  attr(16, 16, 12, 1, 12),
            Self::Square18 =>  attr(18, 18, 18, 1, 14),
            Self::Square20 =>  attr(20, 20, 22, 1, 18),
            Self::Square22 =>  attr(22, 22, 30, 1, 20),
            Self::Square24 =>  attr(24, 24, 36, 1, 24),
            Self::Square26 =>  attr(26, 26, 44, 1, 28),
            Self::Square32 =>  attr(32, 32, 62, 1, 36),
            Self::Square36 =>  attr(36, 36, 86, 1, 42),
            Self::Square40 =>  attr(40, 40, 114, 1, 48),
            Self::Square44 =>  attr(44, 44, 144, 1, 56),
            Self::Square48 =>  attr(48, 48, 174, 1, 68),
            Self::Square52 =>  attr(52, 52, 204, 2, 42),
            Self::Square64 =>  attr(64, 64, 280, 2, 56),
            Self::Square72 =>  attr(72, 72, 368, 4, 36),
            Self::Square80 =>  attr(80, 80, 456, 4, 48),
            Self::Square88 =>  attr(88, 88, 576, 4, 56),
            Self::Square96 =>  attr(96, 96, 696, 4, 68),
            Self::Square104 => attr(104, 104, 816, 6, 56),
            Self::Square120 => attr(120, 120, 1050, 6, 68),
            Self::Square132 => attr(132, 132, 1304, 8, 62),
            Self::Square144 => attr(144, 144, 1558, 10, 62),
            Self::Rect8x18 =>  attr(8, 18, 5, 1, 7),
            Self::Rect8x32 =>  attr(8, 32, 10, 1, 11),
            Self::Rect12x26 => attr(12, 26, 16, 1, 14),
            Self::Rect12x36 => attr(12, 36, 22, 1, 18),
            Self::Rect16x36 => attr(16, 36, 32, 1, 24),
            Self::Rect16x48 => attr(16, 48, 49, 1, 28),
            // DMRE
            Self::Rect8x48 =>  attr(8, 48, 18, 1, 15),
            Self::Rect8x64 =>  attr(8, 64, 24, 1, 18),
            Self::Rect8x80 =>  attr(8, 80, 32, 1, 22),
            Self::Rect8x96 =>  attr(8, 96, 38, 1, 28),
            Self::Rect8x120 => attr(8, 120, 49, 1, 32),
            Self::Rect8x144 => attr(8, 144, 63, 1, 36),
            Self::Rect12x64 => attr(12, 64, 43, 1, 27),
            Self::Rect12x88 => attr(12, 88, 64, 1, 36),
            Self::Rect16x64 => attr(16, 64, 62, 1, 36),
            Self::Rect20x36 => attr(20, 36, 44, 1, 28),
            Self::Rect20x44 => attr(20, 44, 56, 1, 34),
            Self::Rect20x64 => attr(20, 64, 84, 1, 42),
            Self::Rect22x48 => attr(22, 48, 72, 1, 38),
            Self::Rect24x48 => attr(24, 48, 80, 1, 41),
            Self::Rect24x64 => attr(24, 64, 108, 1, 46),
            Self::Rect26x40 => attr(26, 40, 70, 1, 38),
            Self::Rect26x48 => attr(26, 48, 90, 1, 42),
            Self::Rect26x64 => attr(26, 64, 118, 1, 50),
        }
    }

    /// Number of data codewords the symbol holds.
    pub fn num_data_codewords(&self) -> usize {
        self.attributes().data_codewords
    }

    /// Number of Reed-Solomon codewords appended after the data codewords.
    pub fn num_error_codewords(&self) -> usize {
        let attr = self.attributes();
        attr.ecc_blocks * attr.ecc_per_block
    }

    /// Width in modules, without quiet zone.
    pub fn width(&self) -> usize {
        self.attributes().width
    }

    /// Height in modules, without quiet zone.
    pub fn height(&self) -> usize {
        self.attributes().height
    }

    pub fn is_square(&self) -> bool {
        let attr = self.attributes();
        attr.width == attr.height
    }

    /// Symbol is part of the rectangular extension (ISO 21471 DMRE).
    pub fn is_dmre(&self) -> bool {
        matches!(
            self,
            Self::Rect8x48
                | Self::Rect8x64
                | Self::Rect8x80
                | Self::Rect8x96
                | Self::Rect8x120
                | Self::Rect8x144
                | Self::Rect12x64
                | Self::Rect12x88
                | Self::Rect16x64
                | Self::Rect20x36
                | Self::Rect20x44
                | Self::Rect20x64
                | Self::Rect22x48
                | Self::Rect24x48
                | Self::Rect24x64
                | Self::Rect26x40
                | Self::Rect26x48
                | Self::Rect26x64
        )
    }
}

impl PartialOrd for SymbolSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolSize {
    fn cmp(&self, other: &Self) -> Ordering {
        fn key(obj: &SymbolSize) -> (usize, usize) {
            (
                obj.num_data_codewords(),
                obj.width().pow(2) + obj.height().pow(2),
            )
        }
        key(self).cmp(&key(other))
    }
}

#[test]
fn test_partial_ord_symbol_size() {
    for a in SYMBOL_SIZES {
        for b in SYMBOL_SIZES {
            assert_eq!(
                a.partial_cmp(b) == Some(core::cmp::Ordering::Equal),
                a == b,
                "a = {:?}, b = {:?}",
                a,
                b,
            );
        }
    }
}

#[test]
fn test_iter_all_symbols() {
    let mut all: Vec<SymbolSize> = enum_iterator::all::<SymbolSize>().collect();
    all.sort_unstable();
    assert_eq!(&all, SYMBOL_SIZES);
}

#[test]
fn test_default_excludes_dmre() {
    let all: Vec<SymbolSize> = SymbolList::default().iter().collect();
    assert_eq!(all.len(), 30);
    assert!(all.iter().all(|s| !s.is_dmre()));
}

#[test]
fn test_size_candidates_auto_rect() {
    let all: Vec<SymbolSize> = SymbolList::default().enforce_rectangular().iter().collect();
    let expected = alloc::vec![
        SymbolSize::Rect8x18,
        SymbolSize::Rect8x32,
        SymbolSize::Rect12x26,
        SymbolSize::Rect12x36,
        SymbolSize::Rect16x36,
        SymbolSize::Rect16x48,
    ];
    assert_eq!(all, expected);
}

#[test]
fn test_find_symbol_size() {
    let list = SymbolList::default();
    assert_eq!(list.find_symbol_size(0), Some(SymbolSize::Square10));
    assert_eq!(list.find_symbol_size(3), Some(SymbolSize::Square10));
    // equal capacity, the square is preferred
    assert_eq!(list.find_symbol_size(5), Some(SymbolSize::Square12));
    assert_eq!(list.find_symbol_size(9), Some(SymbolSize::Rect8x32));
    assert_eq!(list.find_symbol_size(1558), Some(SymbolSize::Square144));
    assert_eq!(list.find_symbol_size(1559), None);
    assert_eq!(list.no_fit_reason(), InvalidReason::NoSizeFits);

    let square = SymbolList::default().enforce_square();
    assert_eq!(square.find_symbol_size(9), Some(SymbolSize::Square16));

    let rect = SymbolList::default().enforce_rectangular();
    assert_eq!(rect.find_symbol_size(50), None);
    assert_eq!(rect.max_data_codewords(), 49);
}

#[test]
fn test_find_symbol_size_specific() {
    let list: SymbolList = SymbolSize::Square14.into();
    assert_eq!(list.find_symbol_size(1), Some(SymbolSize::Square14));
    assert_eq!(list.find_symbol_size(8), Some(SymbolSize::Square14));
    assert_eq!(list.find_symbol_size(9), None);
    assert_eq!(list.no_fit_reason(), InvalidReason::RequestedSizeTooSmall);

    let empty = SymbolList::with_whitelist(core::iter::empty());
    assert_eq!(empty.find_symbol_size(1), None);
    assert_eq!(empty.no_fit_reason(), InvalidReason::EmptySymbolList);
}

#[test]
fn test_error_codewords() {
    assert_eq!(SymbolSize::Square10.num_error_codewords(), 5);
    assert_eq!(SymbolSize::Square144.num_error_codewords(), 620);
    assert_eq!(SymbolSize::Rect16x48.num_error_codewords(), 28);
}

#[test]
fn test_distinguishable_by_size() {
    let sizes: Vec<_> = SYMBOL_SIZES
        .iter()
        .map(|s| (s.width(), s.height()))
        .collect();
    let n = sizes.len();
    assert_eq!(n, BTreeSet::from_iter(sizes).len());
}
