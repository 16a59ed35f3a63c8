use std::io::Read;

use crate::read::read_elements;
use crate::skip::skip_payload;
use crate::{List, Tag};

use super::{input, Error, Lazy, Layer, Parser, Position, Result};

/// Reads the elements of a list one at a time.
///
/// Every element has the same tag, read once from the list header. The number
/// of elements left is known up front, so unlike a compound, checking for more
/// never touches the input.
pub struct ListReader<'a, R: Read> {
    parser: &'a mut Parser<R>,
    depth: usize,
    element_tag: Tag,
}

impl<'a, R: Read> ListReader<'a, R> {
    pub(super) fn new(parser: &'a mut Parser<R>, depth: usize, element_tag: Tag) -> Self {
        Self {
            parser,
            depth,
            element_tag,
        }
    }

    /// Nesting depth of this list, the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Tag of every element in this list.
    pub fn element_tag(&self) -> Tag {
        self.element_tag
    }

    /// Number of elements not yet handed out or skipped.
    pub fn remaining(&self) -> usize {
        match self.parser.layers.get(self.depth) {
            Some(Layer::List { remaining, .. }) => *remaining,
            _ => 0,
        }
    }

    /// Where this reader is, without touching the input.
    pub fn position(&self) -> Position {
        self.parser.position(self.depth)
    }

    /// Whether another element follows.
    ///
    /// Fails with [`ErrorKind::ChildPending`][super::ErrorKind::ChildPending]
    /// if a compound or list handed out by [`next`][Self::next] was not read
    /// or skipped to its end.
    pub fn has_next(&mut self) -> Result<bool> {
        let position = self.parser.resume(self.depth, "list")?;
        Ok(position == Position::Ready)
    }

    /// Read the next element. Compound and list elements are returned as
    /// readers borrowing this one, other elements are decoded.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Lazy<'_, R>> {
        self.take_next()?;
        self.parser.open(self.element_tag)
    }

    /// Skip the next element without decoding it.
    pub fn skip_one(&mut self) -> Result<()> {
        self.take_next()?;
        let reader = input(&mut self.parser.reader)?;
        skip_payload(reader, self.element_tag, self.depth + 1)
    }

    /// Skip the rest of this list, including anything a pending child left
    /// unread. Does nothing if the list is already finished.
    pub fn skip(&mut self) -> Result<()> {
        self.parser.drain(self.depth)
    }

    /// Decode the rest of this list. Anything a pending child left unread is
    /// skipped, elements already handed out are not included.
    ///
    /// If an element holds a non-unicode string, that element is skipped and
    /// [`ErrorKind::Nonunicode`][super::ErrorKind::Nonunicode] returned.
    /// Elements decoded before it are lost, the reader carries on with the
    /// element after it.
    pub fn read_fully(&mut self) -> Result<List> {
        self.parser.drain(self.depth + 1)?;

        let reader = input(&mut self.parser.reader)?;
        let remaining = match self.parser.layers.get_mut(self.depth) {
            Some(Layer::List { remaining, .. }) => remaining,
            _ => return Ok(List::new(self.element_tag)),
        };

        let elements = read_elements(reader, self.element_tag, remaining, self.depth + 1)?;
        self.parser.layers.pop();
        Ok(List::from_parts(self.element_tag, elements))
    }

    /// Close the underlying parser, see [`Parser::close`].
    pub fn close(&mut self) {
        self.parser.close();
    }

    /// Count off the next element. A list is finished once its last element is
    /// taken, unless that element is a compound or list still to be read, in
    /// which case the parent notices when it resumes.
    fn take_next(&mut self) -> Result<()> {
        if !self.has_next()? {
            return Err(Error::no_more_elements(Tag::List));
        }

        let finished = match self.parser.layers.get_mut(self.depth) {
            Some(Layer::List { remaining, .. }) => {
                *remaining -= 1;
                *remaining == 0
            }
            _ => false,
        };

        if finished && !self.element_tag.is_container() {
            self.parser.layers.pop();
        }
        Ok(())
    }
}
