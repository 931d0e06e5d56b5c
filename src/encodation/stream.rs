use alloc::vec::Vec;

use super::status::{DataEncodingError, FatalReason, InvalidReason, Status, StatusChanged, Step};
use super::Scheme;
use crate::symbol_size::{SymbolList, SymbolSize};

/// Read position in the input bytes.
///
/// The position only ever moves forward.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Input<'a> {
    data: &'a [u8],
    next: usize,
}

impl<'a> Input<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, next: 0 }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.next < self.data.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.get(self.next).cloned()
    }

    pub(crate) fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.next += 1;
        Some(ch)
    }

    pub(crate) fn advance_by(&mut self, steps: usize) {
        self.next = (self.next + steps).min(self.data.len());
    }

    /// Input not yet consumed.
    ///
    /// The slice borrows the input, not the cursor, so it can be
    /// held while the stream is modified.
    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.data[self.next..]
    }

    /// Number of bytes consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.next
    }
}

/// The codeword stream all encodation schemes write to.
///
/// A "chain" is the run of codewords written since the last scheme change.
/// `chain_word_count` counts its codewords (including Base 256 length
/// bytes), `chain_value_count` the scheme values in it (shifts, latches and
/// unlatches count as values of the scheme being left).
#[derive(Debug)]
pub(crate) struct EncodeStream<'a> {
    pub(super) input: Input<'a>,
    pub(super) output: Vec<u8>,
    pub(super) chain_word_count: usize,
    pub(super) chain_value_count: usize,
    scheme: Scheme,
    status: Status,
    fnc1: Option<u8>,
}

impl<'a> EncodeStream<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            input: Input::new(data),
            output: Vec::with_capacity(data.len() + data.len() / 2 + 4),
            chain_word_count: 0,
            chain_value_count: 0,
            scheme: Scheme::Ascii,
            status: Status::Encoding,
            fnc1: None,
        }
    }

    /// Treat `byte` in the input as FNC1 instead of a data character.
    pub(crate) fn with_fnc1_substitute(mut self, byte: Option<u8>) -> Self {
        self.fnc1 = byte;
        self
    }

    pub(crate) fn fnc1(&self) -> Option<u8> {
        self.fnc1
    }

    pub(crate) fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub(super) fn set_scheme(&mut self, scheme: Scheme) {
        self.scheme = scheme;
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> Status {
        self.status
    }

    pub(crate) fn is_encoding(&self) -> bool {
        self.status == Status::Encoding
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &[u8] {
        &self.output
    }

    pub(crate) fn into_output(self) -> Vec<u8> {
        self.output
    }

    /// Append a codeword to the current chain.
    pub(super) fn chain_append(&mut self, word: u8) {
        self.output.push(word);
        self.chain_word_count += 1;
    }

    /// Remove the last codeword of the current chain.
    pub(super) fn chain_remove_last(&mut self) -> Result<u8, StatusChanged> {
        if self.chain_word_count == 0 {
            return Err(self.mark_fatal(FatalReason::UnreachableState));
        }
        match self.output.pop() {
            Some(word) => {
                self.chain_word_count -= 1;
                Ok(word)
            }
            None => Err(self.mark_fatal(FatalReason::UnreachableState)),
        }
    }

    pub(super) fn reset_chain(&mut self) {
        self.chain_word_count = 0;
        self.chain_value_count = 0;
    }

    pub(super) fn mark_complete(&mut self, size: SymbolSize) -> StatusChanged {
        log::debug!(
            "encoding complete: {} codewords in {:?}",
            self.output.len(),
            size
        );
        self.status = Status::Complete(size);
        StatusChanged
    }

    pub(super) fn mark_invalid(&mut self, reason: InvalidReason) -> StatusChanged {
        log::debug!("encoding request invalid: {}", reason);
        self.status = Status::Invalid(reason);
        StatusChanged
    }

    pub(super) fn mark_fatal(&mut self, reason: FatalReason) -> StatusChanged {
        log::debug!("encoder failure: {}", reason);
        self.status = Status::Fatal(reason);
        StatusChanged
    }

    /// Fail unless `scheme` is the active scheme.
    pub(super) fn check_scheme(&mut self, scheme: Scheme) -> Step {
        if self.scheme != scheme {
            return Err(self.mark_fatal(FatalReason::UnexpectedScheme));
        }
        Ok(())
    }

    /// Smallest allowed symbol holding `words` data codewords.
    ///
    /// Marks the stream invalid if there is none.
    pub(super) fn symbol_for(
        &mut self,
        words: usize,
        symbols: &SymbolList,
    ) -> Result<SymbolSize, StatusChanged> {
        match symbols.find_symbol_size(words) {
            Some(size) => Ok(size),
            None => Err(self.mark_invalid(symbols.no_fit_reason())),
        }
    }

    /// Data codewords left in `size` after the current output.
    pub(super) fn remaining_capacity(&self, size: SymbolSize) -> usize {
        size.num_data_codewords().saturating_sub(self.output.len())
    }

    /// Convert the final status into the result reported to callers.
    pub(crate) fn outcome(&self) -> Result<SymbolSize, DataEncodingError> {
        match self.status {
            Status::Complete(size) if !self.input.has_next() => Ok(size),
            Status::Complete(_) | Status::Encoding => {
                Err(DataEncodingError::Fatal(FatalReason::UnreachableState))
            }
            Status::Invalid(reason) => Err(DataEncodingError::Invalid(reason)),
            Status::Fatal(reason) => Err(DataEncodingError::Fatal(reason)),
        }
    }
}

#[test]
fn test_input_cursor() {
    let mut input = Input::new(b"AB");
    assert!(input.has_next());
    assert_eq!(input.peek(), Some(b'A'));
    assert_eq!(input.advance(), Some(b'A'));
    assert_eq!(input.rest(), b"B");
    input.advance_by(5);
    assert!(!input.has_next());
    assert_eq!(input.position(), 2);
    assert_eq!(input.advance(), None);
}

#[test]
fn test_status_is_one_way() {
    let mut stream = EncodeStream::new(b"");
    assert!(stream.is_encoding());
    let _ = stream.mark_invalid(InvalidReason::NoSizeFits);
    assert!(!stream.is_encoding());
    assert_eq!(
        stream.outcome(),
        Err(DataEncodingError::Invalid(InvalidReason::NoSizeFits))
    );
}

#[test]
fn test_remove_last_outside_chain() {
    let mut stream = EncodeStream::new(b"");
    stream.output.push(1);
    assert_eq!(stream.chain_remove_last(), Err(StatusChanged));
    assert_eq!(
        stream.status(),
        Status::Fatal(FatalReason::UnreachableState)
    );
}
