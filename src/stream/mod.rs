//! Lazy, sequential reading of NBT from any [`Read`].
//!
//! A [`Parser`] owns the input. [`Parser::root`] reads the first tag and hands
//! back a [`Lazy`] value: scalars and arrays are decoded immediately, compounds
//! and lists become a [`CompoundReader`] or [`ListReader`] that read their
//! entries on demand. Entries that are themselves compounds or lists come back
//! as child readers borrowing the same parser, so the tree is walked strictly
//! depth-first and the input is never read twice.
//!
//! A child has to be read or skipped to its end before its parent can move on.
//! The borrow checker stops a parent being used while the child is alive; if a
//! child is dropped part way through, the next call on the parent fails with
//! [`ErrorKind::ChildPending`]. The draining operations, `skip` and
//! `read_fully`, are the exception: they skip whatever the pending child left
//! unread first.
//!
//! # Example
//!
//! Find the `DataVersion` of a chunk without decoding the rest of it.
//!
//! ```no_run
//! use seqnbt::stream::{Lazy, Parser};
//! use seqnbt::Value;
//! use flate2::read::ZlibDecoder;
//!
//! # fn main() -> seqnbt::stream::Result<()> {
//! # let chunk: &[u8] = &[];
//! let mut parser = Parser::new(ZlibDecoder::new(chunk));
//!
//! let mut version = None;
//! if let Some(Lazy::Compound(mut root)) = parser.root()? {
//!     while root.has_next()? {
//!         match root.next()? {
//!             (name, Lazy::Value(Value::Int(v))) if name == "DataVersion" => version = Some(v),
//!             (_, other) => other.skip()?,
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::io::{self, Read};

use byteorder::ReadBytesExt;
use log::trace;

use crate::read::{check_depth, read_list_len, read_payload, read_tag, u8_to_tag};
use crate::skip::{
    skip_compound_entries, skip_compound_entry, skip_list_elements, skip_size_prefixed_string,
};
use crate::{Tag, Value};

mod compound;
mod error;
mod list;

pub use compound::CompoundReader;
pub use error::{Error, ErrorKind, Result};
pub use list::ListReader;

/// A value handed out by the parser or one of its readers. Compounds and lists
/// are not decoded yet, they are readers positioned at their first entry.
pub enum Lazy<'a, R: Read> {
    Value(Value),
    Compound(CompoundReader<'a, R>),
    List(ListReader<'a, R>),
}

impl<'a, R: Read> Lazy<'a, R> {
    /// The tag of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Lazy::Value(v) => v.tag(),
            Lazy::Compound(_) => Tag::Compound,
            Lazy::List(_) => Tag::List,
        }
    }

    /// Decode whatever of this value has not been read yet.
    pub fn read_fully(self) -> Result<Value> {
        match self {
            Lazy::Value(v) => Ok(v),
            Lazy::Compound(mut c) => Ok(Value::Compound(c.read_fully()?)),
            Lazy::List(mut l) => Ok(Value::List(l.read_fully()?)),
        }
    }

    /// Skip whatever of this value has not been read yet.
    pub fn skip(self) -> Result<()> {
        match self {
            Lazy::Value(_) => Ok(()),
            Lazy::Compound(mut c) => c.skip(),
            Lazy::List(mut l) => l.skip(),
        }
    }
}

impl<'a, R: Read> std::fmt::Debug for Lazy<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lazy::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Lazy::Compound(c) => f.debug_tuple("Compound").field(&c.depth()).finish(),
            Lazy::List(l) => f
                .debug_tuple("List")
                .field(&l.element_tag())
                .field(&l.remaining())
                .finish(),
        }
    }
}

/// Where a reader is in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The reader can be advanced.
    Ready,
    /// A compound or list this reader handed out has not been drained yet. It
    /// may turn out to be finished the next time the reader is advanced.
    ChildPending,
    /// Every entry has been consumed.
    Exhausted,
}

/// Read state of one open compound or list. The parser keeps one per reader
/// between the root and the innermost open child.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Layer {
    /// Tag of the next entry once it has been peeked.
    Compound { next: Option<Tag> },
    List { tag: Tag, remaining: usize },
}

/// Parser owns the input and the stack of open compounds and lists. Does not do
/// decompression.
///
/// Layers are pushed when a compound or list is handed out, and popped as soon
/// as it is known to be finished: once a compound's END tag has been read, or
/// a list has no elements left and no child open. A reader at depth `d` is
/// exhausted when fewer than `d + 1` layers remain, and has a pending child
/// while more than `d + 1` do.
pub struct Parser<R: Read> {
    reader: Option<R>,
    layers: Vec<Layer>,
}

impl<R: Read> Parser<R> {
    /// Create new parser for the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            layers: Vec::new(),
        }
    }

    /// Read the next root tag from the input. The name of the root tag is
    /// skipped. A root END tag gives `None`.
    ///
    /// Returns an error where [`Error::is_eof`] is true if the input ended
    /// cleanly before the tag, so a stream of several NBT values can be read
    /// by calling this until then. The previous root, if it was a compound or
    /// list, must have been read or skipped completely.
    pub fn root(&mut self) -> Result<Option<Lazy<'_, R>>> {
        self.settle(0, "parser")?;

        let reader = input(&mut self.reader)?;

        // EOF before the tag means the previous value was the last one.
        let tag = match reader.read_u8() {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(Error::eof()),
            Err(e) => return Err(e.into()),
        };
        let tag = u8_to_tag(tag)?;

        if tag == Tag::End {
            trace!("root is an end tag");
            return Ok(None);
        }

        skip_size_prefixed_string(reader)?;
        trace!("opening root {:?}", tag);

        self.open(tag).map(Some)
    }

    /// Drop the underlying reader. Every reader borrowing this parser is
    /// finished with, and further reads fail with [`ErrorKind::Closed`].
    /// Closing more than once does nothing.
    pub fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            trace!("closing parser with {} open layers", self.layers.len());
            drop(reader);
        }
        self.layers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Gets a reference to the underlying value in this parser, unless it has
    /// been closed.
    pub fn get_ref(&self) -> Option<&R> {
        self.reader.as_ref()
    }

    /// Gets a mutable reference to the underlying value in this parser, unless
    /// it has been closed.
    ///
    /// Reading from it while a compound or list is open will desynchronise the
    /// parser.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.reader.as_mut()
    }

    /// Consumes this parser, returning the underlying value.
    pub fn into_inner(self) -> Option<R> {
        self.reader
    }

    /// Hand out the value of the given tag, the header has already been read.
    /// Containers get a new layer at the top of the stack.
    fn open(&mut self, tag: Tag) -> Result<Lazy<'_, R>> {
        let depth = self.layers.len();
        let reader = input(&mut self.reader)?;

        match tag {
            Tag::Compound => {
                check_depth(depth + 1)?;
                self.layers.push(Layer::Compound { next: None });
                Ok(Lazy::Compound(CompoundReader::new(self, depth)))
            }
            Tag::List => {
                check_depth(depth + 1)?;
                let element_tag = read_tag(reader)?;
                let remaining = read_list_len(reader)?;
                // An empty list is finished before it starts.
                if remaining > 0 {
                    self.layers.push(Layer::List {
                        tag: element_tag,
                        remaining,
                    });
                }
                Ok(Lazy::List(ListReader::new(self, depth, element_tag)))
            }
            _ => Ok(Lazy::Value(read_payload(reader, tag, depth)?)),
        }
    }

    fn position(&self, depth: usize) -> Position {
        match self.layers.len() {
            n if n <= depth => Position::Exhausted,
            n if n > depth + 1 => Position::ChildPending,
            _ => match self.layers[depth] {
                Layer::List { remaining: 0, .. } => Position::Exhausted,
                _ => Position::Ready,
            },
        }
    }

    /// Prepare the reader at `depth` to be advanced. Children above it that
    /// have been read to their end are popped. A compound child whose next tag
    /// has not been looked at yet has it peeked, which consumes its END tag if
    /// it was fully read. Anything left unread fails with `ChildPending`.
    fn resume(&mut self, depth: usize, owner: &'static str) -> Result<Position> {
        self.settle(depth + 1, owner)?;
        Ok(self.position(depth))
    }

    fn settle(&mut self, keep: usize, owner: &'static str) -> Result<()> {
        let reader = input(&mut self.reader)?;

        while self.layers.len() > keep {
            let top = self.layers.len() - 1;
            match self.layers[top] {
                Layer::List { remaining: 0, .. } => {}
                Layer::Compound { next: None } => {
                    let tag = read_tag(reader)?;
                    if tag != Tag::End {
                        self.layers[top] = Layer::Compound { next: Some(tag) };
                        return Err(Error::child_pending(owner));
                    }
                }
                _ => return Err(Error::child_pending(owner)),
            }
            self.layers.pop();
        }
        Ok(())
    }

    /// Skip everything left in the layers above `keep`, innermost first, and
    /// pop them.
    fn drain(&mut self, keep: usize) -> Result<()> {
        let reader = input(&mut self.reader)?;

        while self.layers.len() > keep {
            let depth = self.layers.len();
            match self.layers[depth - 1] {
                Layer::Compound { next } => {
                    trace!("skipping rest of compound at depth {}", depth);
                    if let Some(tag) = next {
                        skip_compound_entry(reader, tag, depth)?;
                    }
                    skip_compound_entries(reader, depth)?;
                }
                Layer::List { tag, remaining } => {
                    trace!("skipping {} {:?} at depth {}", remaining, tag, depth);
                    skip_list_elements(reader, tag, remaining, depth)?;
                }
            }
            self.layers.pop();
        }
        Ok(())
    }
}

fn input<R>(reader: &mut Option<R>) -> Result<&mut R> {
    reader.as_mut().ok_or_else(Error::closed)
}
