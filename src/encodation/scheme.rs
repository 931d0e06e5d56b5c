use core::fmt;

use flagset::{flags, FlagSet};

use super::ascii;

flags! {
    /// List of data encodation schemes
    ///
    /// Data Matrix can switch between different "codecs" in a symbol. Each one
    /// has its own alphabet and packs a different number of values into
    /// its codewords.
    pub enum Scheme: u8 {
        Ascii   = 0b000001,
        C40     = 0b000010,
        Text    = 0b000100,
        X12     = 0b001000,
        Edifact = 0b010000,
        Base256 = 0b100000,
    }
}

impl Scheme {
    /// Get flag set with all encodation schemes activated.
    pub fn all() -> FlagSet<Self> {
        FlagSet::full()
    }

    /// Schemes packing three values into two codewords.
    pub fn ctx() -> FlagSet<Self> {
        Self::C40 | Self::Text | Self::X12
    }

    pub(crate) fn is_ctx(&self) -> bool {
        Self::ctx().contains(*self)
    }

    /// Get the latch codeword to switch to this scheme from ASCII.
    ///
    /// ASCII itself has no latch.
    pub fn latch_from_ascii(&self) -> Option<u8> {
        match self {
            Self::Ascii => None,
            Self::C40 => Some(ascii::LATCH_C40),
            Self::Text => Some(ascii::LATCH_TEXT),
            Self::X12 => Some(ascii::LATCH_X12),
            Self::Edifact => Some(ascii::LATCH_EDIFACT),
            Self::Base256 => Some(ascii::LATCH_BASE256),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ascii => "ASCII",
            Self::C40 => "C40",
            Self::Text => "Text",
            Self::X12 => "X12",
            Self::Edifact => "EDIFACT",
            Self::Base256 => "Base 256",
        };
        f.write_str(name)
    }
}

#[test]
fn test_latches_are_distinct() {
    let latches: alloc::vec::Vec<u8> = Scheme::all()
        .into_iter()
        .filter_map(|s| s.latch_from_ascii())
        .collect();
    assert_eq!(latches, [230, 239, 238, 240, 231]);
}

#[test]
fn test_ctx() {
    let ctx: alloc::vec::Vec<Scheme> = Scheme::all().into_iter().filter(Scheme::is_ctx).collect();
    assert_eq!(ctx, [Scheme::C40, Scheme::Text, Scheme::X12]);
}
