use std::io::Read;

use crate::read::{read_compound_entry, read_size_prefixed_string, read_tag};
use crate::skip::{skip_compound_entry, skip_payload};
use crate::{Compound, Tag};

use super::{input, Error, ErrorKind, Lazy, Layer, Parser, Position, Result};

/// Reads the entries of a compound one at a time.
///
/// Entries are `(name, value)` pairs in the order they appear in the input.
/// The reader can be abandoned at any point with [`skip`][Self::skip] or turned
/// into a materialized [`Compound`] with [`read_fully`][Self::read_fully].
pub struct CompoundReader<'a, R: Read> {
    parser: &'a mut Parser<R>,
    depth: usize,
}

impl<'a, R: Read> CompoundReader<'a, R> {
    pub(super) fn new(parser: &'a mut Parser<R>, depth: usize) -> Self {
        Self { parser, depth }
    }

    /// Nesting depth of this compound, the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Where this reader is, without touching the input.
    pub fn position(&self) -> Position {
        self.parser.position(self.depth)
    }

    /// Whether another entry follows. Reads the tag of the next entry the first
    /// time it is called at each position, and the END tag of the compound once
    /// every entry has been read.
    ///
    /// Fails with [`ErrorKind::ChildPending`] if a compound or list handed out
    /// by [`next`][Self::next] was not read or skipped to its end.
    pub fn has_next(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_some())
    }

    /// Read the next entry. Compound and list values are returned as readers
    /// borrowing this one, other values are decoded.
    ///
    /// If the name of the entry is not valid unicode, the value is skipped and
    /// a [`ErrorKind::Nonunicode`] error returned; the reader can carry on.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(String, Lazy<'_, R>)> {
        let tag = self.take_next()?;
        let depth = self.depth + 1;
        let reader = input(&mut self.parser.reader)?;

        let name = match read_size_prefixed_string(reader) {
            Ok(name) => name,
            Err(e) => {
                if let ErrorKind::Nonunicode(_) = e.kind() {
                    skip_payload(reader, tag, depth)?;
                }
                return Err(e);
            }
        };

        Ok((name, self.parser.open(tag)?))
    }

    /// Skip the next entry, name and value, without decoding it.
    pub fn skip_one(&mut self) -> Result<()> {
        let tag = self.take_next()?;
        let reader = input(&mut self.parser.reader)?;
        skip_compound_entry(reader, tag, self.depth + 1)
    }

    /// Skip the rest of this compound, including anything a pending child left
    /// unread. Does nothing if the compound is already finished.
    pub fn skip(&mut self) -> Result<()> {
        self.parser.drain(self.depth)
    }

    /// Decode the rest of this compound. Anything a pending child left unread
    /// is skipped, entries already handed out are not included.
    ///
    /// If an entry holds a non-unicode name or string, that entry is skipped
    /// and [`ErrorKind::Nonunicode`] returned. Entries decoded before it are
    /// lost, the reader carries on with the entry after it.
    pub fn read_fully(&mut self) -> Result<Compound> {
        self.parser.drain(self.depth + 1)?;

        let mut next = match self.parser.layers.get_mut(self.depth) {
            Some(Layer::Compound { next }) => next.take(),
            _ => return Ok(Compound::new()),
        };

        let depth = self.depth + 1;
        let reader = input(&mut self.parser.reader)?;

        let mut compound = Compound::new();
        loop {
            let tag = match next.take() {
                Some(tag) => tag,
                None => read_tag(reader)?,
            };
            if tag == Tag::End {
                break;
            }
            let (name, value) = read_compound_entry(reader, tag, depth)?;
            compound.insert(name, value);
        }

        self.parser.layers.pop();
        Ok(compound)
    }

    /// Close the underlying parser, see [`Parser::close`].
    pub fn close(&mut self) {
        self.parser.close();
    }

    /// Tag of the next entry, peeked if it has not been yet. `None` once the
    /// compound is finished.
    fn peek(&mut self) -> Result<Option<Tag>> {
        if self.parser.resume(self.depth, "compound")? == Position::Exhausted {
            return Ok(None);
        }

        match self.parser.layers.get(self.depth).copied() {
            Some(Layer::Compound { next: Some(tag) }) => Ok(Some(tag)),
            Some(Layer::Compound { next: None }) => {
                let reader = input(&mut self.parser.reader)?;
                let tag = read_tag(reader)?;
                if tag == Tag::End {
                    self.parser.layers.pop();
                    Ok(None)
                } else {
                    self.parser.layers[self.depth] = Layer::Compound { next: Some(tag) };
                    Ok(Some(tag))
                }
            }
            _ => Ok(None),
        }
    }

    /// Consume the peeked tag of the next entry, leaving its name and value to
    /// be read.
    fn take_next(&mut self) -> Result<Tag> {
        let tag = self
            .peek()?
            .ok_or_else(|| Error::no_more_elements(Tag::Compound))?;
        self.parser.layers[self.depth] = Layer::Compound { next: None };
        Ok(tag)
    }
}
