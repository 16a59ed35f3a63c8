//! Advancing past NBT payloads without decoding them.
//!
//! Every routine here consumes exactly the bytes the matching routine in
//! `read` would, but does not allocate for names, strings or arrays.

use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::read::{check_depth, read_array_len, read_list_len, read_tag};
use crate::stream::{Error, Result};
use crate::Tag;

/// Discard exactly `n` bytes.
pub(crate) fn skip_bytes<R: Read>(reader: &mut R, n: u64) -> Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(n), &mut io::sink())?;
    if skipped != n {
        return Err(Error::unexpected_eof());
    }
    Ok(())
}

fn skip_fixed<R: Read, const N: usize>(reader: &mut R) -> Result<()> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(())
}

/// Skip a u16 length prefixed string, used for both names and string payloads.
pub(crate) fn skip_size_prefixed_string<R: Read>(reader: &mut R) -> Result<()> {
    let len = reader.read_u16::<BigEndian>()?;
    skip_bytes(reader, len.into())
}

/// Skip one payload of the given tag. `depth` is the number of lists and
/// compounds enclosing the value.
pub(crate) fn skip_payload<R: Read>(reader: &mut R, tag: Tag, depth: usize) -> Result<()> {
    match tag {
        Tag::End => Err(Error::unexpected_end_tag()),
        Tag::Byte => skip_fixed::<R, 1>(reader),
        Tag::Short => skip_fixed::<R, 2>(reader),
        Tag::Int | Tag::Float => skip_fixed::<R, 4>(reader),
        Tag::Long | Tag::Double => skip_fixed::<R, 8>(reader),
        Tag::String => skip_size_prefixed_string(reader),
        Tag::ByteArray => {
            let len = read_array_len(reader)?;
            skip_bytes(reader, len as u64)
        }
        Tag::IntArray => {
            let len = read_array_len(reader)?;
            skip_bytes(reader, len as u64 * 4)
        }
        Tag::LongArray => {
            let len = read_array_len(reader)?;
            skip_bytes(reader, len as u64 * 8)
        }
        Tag::List => {
            check_depth(depth + 1)?;
            let element_tag = read_tag(reader)?;
            let len = read_list_len(reader)?;
            skip_list_elements(reader, element_tag, len, depth + 1)
        }
        Tag::Compound => {
            check_depth(depth + 1)?;
            skip_compound_entries(reader, depth + 1)
        }
    }
}

/// Skip `len` list elements. `depth` is the depth of the list itself.
pub(crate) fn skip_list_elements<R: Read>(
    reader: &mut R,
    element_tag: Tag,
    len: usize,
    depth: usize,
) -> Result<()> {
    match element_tag {
        // Fixed size elements can go in one step.
        Tag::Byte => skip_bytes(reader, len as u64),
        Tag::Short => skip_bytes(reader, len as u64 * 2),
        Tag::Int | Tag::Float => skip_bytes(reader, len as u64 * 4),
        Tag::Long | Tag::Double => skip_bytes(reader, len as u64 * 8),
        _ => {
            for _ in 0..len {
                skip_payload(reader, element_tag, depth)?;
            }
            Ok(())
        }
    }
}

/// Skip compound entries up to and including the END tag. `depth` is the
/// depth of the compound itself.
pub(crate) fn skip_compound_entries<R: Read>(reader: &mut R, depth: usize) -> Result<()> {
    loop {
        let tag = read_tag(reader)?;
        if tag == Tag::End {
            return Ok(());
        }
        skip_compound_entry(reader, tag, depth)?;
    }
}

/// Skip the name and payload of one compound entry whose tag has already been
/// read.
pub(crate) fn skip_compound_entry<R: Read>(reader: &mut R, tag: Tag, depth: usize) -> Result<()> {
    skip_size_prefixed_string(reader)?;
    skip_payload(reader, tag, depth)
}
