//! Eager decoding of single NBT payloads.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::skip::{skip_compound_entries, skip_list_elements, skip_payload};
use crate::stream::{Error, Result};
use crate::{Compound, List, Tag, Value, MAX_DEPTH};

// Upper bound on how much we reserve up front from a length read off the wire.
// Lengths in corrupt input can be huge, the vectors grow normally past this.
const MAX_PREALLOC: usize = 4096;

pub(crate) fn u8_to_tag(tag: u8) -> Result<Tag> {
    Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
}

pub(crate) fn read_tag<R: Read>(reader: &mut R) -> Result<Tag> {
    u8_to_tag(reader.read_u8()?)
}

pub(crate) fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        Err(Error::depth_limit())
    } else {
        Ok(())
    }
}

/// Read an i32 length or count for an array. Negative lengths are corrupt.
pub(crate) fn read_array_len<R: Read>(reader: &mut R) -> Result<usize> {
    let len = reader.read_i32::<BigEndian>()?;
    usize::try_from(len).map_err(|_| Error::negative_length(len))
}

/// Read the i32 element count of a list. The game treats a negative count as
/// an empty list, so do we.
pub(crate) fn read_list_len<R: Read>(reader: &mut R) -> Result<usize> {
    let len = reader.read_i32::<BigEndian>()?;
    Ok(usize::try_from(len).unwrap_or(0))
}

/// Read a u16 length prefixed modified UTF-8 string. The bytes are always
/// consumed, even if they turn out not to be unicode.
pub(crate) fn read_size_prefixed_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = reader.read_u16::<BigEndian>()? as usize;

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf[..])?;

    Ok(cesu8::from_java_cesu8(&buf[..])
        .map_err(|_| Error::nonunicode(Vec::from(&buf[..])))?
        .into_owned())
}

/// Decode one payload of the given tag. `depth` is the number of lists and
/// compounds enclosing the value.
pub(crate) fn read_payload<R: Read>(reader: &mut R, tag: Tag, depth: usize) -> Result<Value> {
    Ok(match tag {
        Tag::End => return Err(Error::unexpected_end_tag()),
        Tag::Byte => Value::Byte(reader.read_i8()?),
        Tag::Short => Value::Short(reader.read_i16::<BigEndian>()?),
        Tag::Int => Value::Int(reader.read_i32::<BigEndian>()?),
        Tag::Long => Value::Long(reader.read_i64::<BigEndian>()?),
        Tag::Float => Value::Float(reader.read_f32::<BigEndian>()?),
        Tag::Double => Value::Double(reader.read_f64::<BigEndian>()?),
        Tag::String => Value::String(read_size_prefixed_string(reader)?),
        Tag::ByteArray => {
            let len = read_array_len(reader)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            let read = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
            if read != len {
                return Err(Error::unexpected_eof());
            }
            Value::ByteArray(vec_u8_into_i8(buf))
        }
        Tag::IntArray => {
            let len = read_array_len(reader)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buf.push(reader.read_i32::<BigEndian>()?);
            }
            Value::IntArray(buf)
        }
        Tag::LongArray => {
            let len = read_array_len(reader)?;
            let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buf.push(reader.read_i64::<BigEndian>()?);
            }
            Value::LongArray(buf)
        }
        Tag::List => {
            check_depth(depth + 1)?;
            let element_tag = read_tag(reader)?;
            let len = read_list_len(reader)?;
            Value::List(read_list_elements(reader, element_tag, len, depth + 1)?)
        }
        Tag::Compound => {
            check_depth(depth + 1)?;
            Value::Compound(read_compound_entries(reader, depth + 1)?)
        }
    })
}

/// Decode `len` list elements. `depth` is the depth of the list itself.
///
/// If an element holds a non-unicode string the rest of the list is skipped,
/// so the error leaves the input just past the list.
pub(crate) fn read_list_elements<R: Read>(
    reader: &mut R,
    element_tag: Tag,
    len: usize,
    depth: usize,
) -> Result<List> {
    let mut remaining = len;
    match read_elements(reader, element_tag, &mut remaining, depth) {
        Ok(elements) => Ok(List::from_parts(element_tag, elements)),
        Err(e) if e.is_nonunicode() => {
            skip_list_elements(reader, element_tag, remaining, depth)?;
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Decode elements until `remaining` reaches zero. `remaining` is counted down
/// before each element is read, so on error it is the number of elements after
/// the failed one.
pub(crate) fn read_elements<R: Read>(
    reader: &mut R,
    element_tag: Tag,
    remaining: &mut usize,
    depth: usize,
) -> Result<Vec<Value>> {
    let mut elements = Vec::with_capacity((*remaining).min(MAX_PREALLOC));
    while *remaining > 0 {
        *remaining -= 1;
        elements.push(read_payload(reader, element_tag, depth)?);
    }
    Ok(elements)
}

/// Decode compound entries up to and including the END tag. `depth` is the
/// depth of the compound itself.
///
/// If an entry has a non-unicode name or value the rest of the compound is
/// skipped, so the error leaves the input just past the END tag.
pub(crate) fn read_compound_entries<R: Read>(reader: &mut R, depth: usize) -> Result<Compound> {
    let mut compound = Compound::new();
    loop {
        let tag = read_tag(reader)?;
        if tag == Tag::End {
            return Ok(compound);
        }
        match read_compound_entry(reader, tag, depth) {
            Ok((name, value)) => {
                compound.insert(name, value);
            }
            Err(e) if e.is_nonunicode() => {
                skip_compound_entries(reader, depth)?;
                return Err(e);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decode the name and payload of one compound entry whose tag has already
/// been read. A non-unicode name still has its payload skipped, so a
/// `Nonunicode` error always leaves the input just past the entry.
pub(crate) fn read_compound_entry<R: Read>(
    reader: &mut R,
    tag: Tag,
    depth: usize,
) -> Result<(String, Value)> {
    let name = match read_size_prefixed_string(reader) {
        Ok(name) => name,
        Err(e) => {
            if e.is_nonunicode() {
                skip_payload(reader, tag, depth)?;
            }
            return Err(e);
        }
    };
    Ok((name, read_payload(reader, tag, depth)?))
}

// Thanks to https://stackoverflow.com/a/59707887
fn vec_u8_into_i8(v: Vec<u8>) -> Vec<i8> {
    // ideally we'd use Vec::into_raw_parts, but it's unstable,
    // so we have to do it manually:

    // first, make sure v's destructor doesn't free the data
    // it thinks it owns when it goes out of scope
    let mut v = std::mem::ManuallyDrop::new(v);

    // then, pick apart the existing Vec
    let p = v.as_mut_ptr();
    let len = v.len();
    let cap = v.capacity();

    // finally, adopt the data into a new Vec
    unsafe { Vec::from_raw_parts(p as *mut i8, len, cap) }
}
