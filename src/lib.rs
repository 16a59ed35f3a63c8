//! seqnbt is a lazy, sequential decoder for NBT data from *Minecraft: Java
//! Edition*. It reads from anything implementing [`Read`][`std::io::Read`] and
//! never seeks backwards, so it works directly on network streams and
//! decompressors.
//!
//! * For the cursor and the lazy compound/list handles see [`stream`].
//! * For fully materialized values see [`Value`], [`List`] and [`Compound`].
//!
//! # Lazy and eager reading
//!
//! [`Parser::root`][`stream::Parser::root`] reads the first tag of the input.
//! Scalars and arrays come back fully decoded. Compounds and lists come back as
//! handles that read their entries one at a time. Any entry that is itself a
//! compound or list is handed out as a child handle sharing the same input.
//! A child can be walked, skipped without allocating, or turned into a
//! [`Value`] with `read_fully`.
//!
//! ```
//! use seqnbt::stream::{Lazy, Parser};
//!
//! # fn main() -> seqnbt::stream::Result<()> {
//! // {"a": 5, "b": {"c": "x"}, "d": 1b}
//! let data: &[u8] = &[
//!     10, 0, 0,
//!     3, 0, 1, b'a', 0, 0, 0, 5,
//!     10, 0, 1, b'b',
//!         8, 0, 1, b'c', 0, 1, b'x',
//!         0,
//!     1, 0, 1, b'd', 1,
//!     0,
//! ];
//!
//! let mut parser = Parser::new(data);
//! if let Some(Lazy::Compound(mut root)) = parser.root()? {
//!     while root.has_next()? {
//!         let (name, value) = root.next()?;
//!         match value {
//!             Lazy::Value(v) => println!("{} = {:?}", name, v),
//!             // Not interested in nested compounds here.
//!             Lazy::Compound(mut inner) => inner.skip()?,
//!             Lazy::List(mut inner) => inner.skip()?,
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

pub mod stream;

mod read;
mod skip;
mod value;

pub use value::*;

#[cfg(test)]
mod test;

/// Maximum nesting of lists and compounds accepted by the decoder. Matches the
/// limit the game itself applies.
pub const MAX_DEPTH: usize = 512;

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl Tag {
    /// Whether values of this tag are read lazily by the stream handles.
    pub fn is_container(self) -> bool {
        matches!(self, Tag::List | Tag::Compound)
    }
}

// Written out by hand rather than derived, the tags will very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}
