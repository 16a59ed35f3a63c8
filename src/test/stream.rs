use std::io::{Cursor, Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use super::builder::Builder;
use crate::stream::{ErrorKind, Lazy, Parser, Result};
use crate::{Tag, Value};

fn root_value<R: Read>(parser: &mut Parser<R>) -> Result<Value> {
    match parser.root()? {
        Some(Lazy::Value(v)) => Ok(v),
        other => panic!("expected plain value, got {:?}", other),
    }
}

#[test]
fn empty_payload() {
    let payload = Builder::new().build();
    let mut parser = Parser::new(payload.as_slice());

    let value = parser.root();
    assert!(matches!(value, Err(e) if e.is_eof()));
}

#[test]
fn simple_byte() -> Result<()> {
    let payload = Builder::new().byte("abc", 123).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Byte(123));
    Ok(())
}

#[test]
fn simple_short() -> Result<()> {
    let payload = Builder::new().short("abc", 1234).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Short(1234));
    Ok(())
}

#[test]
fn simple_int() -> Result<()> {
    let payload = Builder::new().int("abc", 50345).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Int(50345));
    Ok(())
}

#[test]
fn simple_long() -> Result<()> {
    let payload = Builder::new().long("abc", i32::MAX as i64 + 1).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Long(i32::MAX as i64 + 1));
    Ok(())
}

#[test]
fn simple_float() -> Result<()> {
    let payload = Builder::new().float("float", 1.23).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Float(1.23));
    Ok(())
}

#[test]
fn simple_double() -> Result<()> {
    let payload = Builder::new().double("double", 1.23456).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Double(1.23456));
    Ok(())
}

#[test]
fn simple_string() -> Result<()> {
    let payload = Builder::new().string("str", "something").build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(
        root_value(&mut parser)?,
        Value::String("something".to_owned())
    );
    Ok(())
}

#[test]
fn simple_arrays() -> Result<()> {
    let payload = Builder::new()
        .byte_array("bytes", &[1, 2, 3])
        .int_array("ints", &[1, 2, 3])
        .long_array("longs", &[1, 2, 3, i64::MIN, i64::MAX])
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::ByteArray(vec![1, 2, 3]));
    assert_eq!(root_value(&mut parser)?, Value::IntArray(vec![1, 2, 3]));
    assert_eq!(
        root_value(&mut parser)?,
        Value::LongArray(vec![1, 2, 3, i64::MIN, i64::MAX])
    );
    Ok(())
}

#[test]
fn cesu8_string_in_nbt() -> Result<()> {
    // This unicode has a different representation in cesu8 and utf-8.
    let modified_unicode_str = cesu8::to_java_cesu8("😈");

    let payload = Builder::new()
        .tag(Tag::String)
        .name("cesu8")
        .raw_str_len(modified_unicode_str.len())
        .raw_bytes(&modified_unicode_str)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::String("😈".to_owned()));
    Ok(())
}

#[test]
fn invalid_unicode_can_carry_on() -> Result<()> {
    let bs = [255, 255, 255];

    let payload = Builder::new()
        .tag(Tag::String)
        .name("invalid")
        .raw_str_len(bs.len())
        .raw_bytes(&bs)
        .string("available", "yes")
        .build();
    let mut parser = Parser::new(payload.as_slice());

    assert!(matches!(
        parser.root().unwrap_err().kind(),
        ErrorKind::Nonunicode(_)
    ));
    assert_eq!(root_value(&mut parser)?, Value::String("yes".to_owned()));
    Ok(())
}

#[test]
fn root_end_tag_is_absent_value() -> Result<()> {
    let payload = Builder::new().tag(Tag::End).byte("after", 1).build();
    let mut parser = Parser::new(payload.as_slice());

    assert!(parser.root()?.is_none());
    assert_eq!(root_value(&mut parser)?, Value::Byte(1));
    Ok(())
}

#[test]
fn end_of_reader_is_signalled() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .byte("a", 1)
        .end_compound()
        .int("second", 2)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    match parser.root()? {
        Some(Lazy::Compound(mut c)) => {
            let (name, _) = c.next()?;
            assert_eq!(name, "a");
            // END of the compound left unread on purpose.
        }
        other => panic!("{:?}", other),
    }

    assert_eq!(root_value(&mut parser)?, Value::Int(2));
    assert!(matches!(parser.root(), Err(e) if e.is_eof()));
    Ok(())
}

#[test]
fn root_name_is_skipped() -> Result<()> {
    let payload = Builder::new().int("a rather long root name", 7).build();
    let mut parser = Parser::new(Cursor::new(payload.as_slice()));

    assert_eq!(root_value(&mut parser)?, Value::Int(7));
    assert_eq!(
        parser.get_ref().unwrap().position(),
        payload.len() as u64
    );
    Ok(())
}

#[test]
fn truncated_scalar_is_an_error() {
    let payload = Builder::new()
        .tag(Tag::Int)
        .name("abc")
        .raw_bytes(&[0, 0])
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test]
fn truncated_name_is_an_error() {
    let payload = Builder::new()
        .tag(Tag::Int)
        .raw_str_len(10)
        .raw_bytes(b"abc")
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test]
fn truncated_arrays_are_errors() {
    let payloads = [
        Builder::new()
            .tag(Tag::ByteArray)
            .name("")
            .int_payload(10)
            .byte_array_payload(&[1, 2, 3])
            .build(),
        Builder::new()
            .tag(Tag::IntArray)
            .name("")
            .int_payload(3)
            .int_array_payload(&[1, 2])
            .build(),
        Builder::new()
            .tag(Tag::LongArray)
            .name("")
            .int_payload(2)
            .raw_bytes(&[0, 0, 0])
            .build(),
    ];

    for payload in payloads.iter() {
        let mut parser = Parser::new(payload.as_slice());
        let err = parser.root().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
    }
}

#[test]
fn huge_array_length_does_not_preallocate() {
    let payload = Builder::new()
        .tag(Tag::LongArray)
        .name("")
        .int_payload(i32::MAX)
        .long_payload(1)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
}

#[test]
fn negative_array_length() {
    let payload = Builder::new()
        .tag(Tag::IntArray)
        .name("")
        .int_payload(-1)
        .build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NegativeLength);
}

#[test]
fn invalid_root_tag() {
    let payload = Builder::new().raw_bytes(&[13]).name("").build();
    let mut parser = Parser::new(payload.as_slice());

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidTag);
}

#[test]
fn invalid_tag_inside_compound() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .raw_bytes(&[200])
        .name("bad")
        .end_compound()
        .build();
    let mut parser = Parser::new(payload.as_slice());

    match parser.root()? {
        Some(Lazy::Compound(mut c)) => {
            let err = c.has_next().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidTag);
        }
        other => panic!("{:?}", other),
    }
    Ok(())
}

#[test]
fn next_root_while_compound_pending() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .byte("a", 1)
        .byte("b", 2)
        .end_compound()
        .build();
    let mut parser = Parser::new(payload.as_slice());

    if let Some(Lazy::Compound(mut c)) = parser.root()? {
        c.next()?;
    }

    let err = parser.root().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ChildPending);
    Ok(())
}

#[test]
fn close_is_idempotent_and_final() -> Result<()> {
    let payload = Builder::new().byte("a", 1).byte("b", 2).build();
    let mut parser = Parser::new(payload.as_slice());

    assert_eq!(root_value(&mut parser)?, Value::Byte(1));
    assert!(!parser.is_closed());

    parser.close();
    parser.close();

    assert!(parser.is_closed());
    assert!(parser.get_ref().is_none());
    assert_eq!(parser.root().unwrap_err().kind(), &ErrorKind::Closed);
    Ok(())
}

#[test]
fn close_from_nested_reader() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .start_compound("inner")
        .byte("a", 1)
        .end_compound()
        .end_compound()
        .build();
    let mut parser = Parser::new(payload.as_slice());

    if let Some(Lazy::Compound(mut root)) = parser.root()? {
        if let (_, Lazy::Compound(mut inner)) = root.next()? {
            inner.close();
            assert_eq!(inner.has_next().unwrap_err().kind(), &ErrorKind::Closed);
        }
        assert_eq!(root.has_next().unwrap_err().kind(), &ErrorKind::Closed);
        assert_eq!(root.skip().unwrap_err().kind(), &ErrorKind::Closed);
    }

    assert!(parser.is_closed());
    assert!(parser.into_inner().is_none());
    Ok(())
}

#[test]
fn gzip_wrapped_stream() -> Result<()> {
    let payload = Builder::new()
        .start_compound("")
        .string("name", "Steve")
        .long_array("heights", &[1, 2, 3])
        .end_compound()
        .build();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&payload).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut parser = Parser::new(GzDecoder::new(compressed.as_slice()));
    let compound = match parser.root()? {
        Some(Lazy::Compound(mut c)) => c.read_fully()?,
        other => panic!("{:?}", other),
    };

    assert_eq!(compound["name"], Value::String("Steve".to_owned()));
    assert_eq!(compound["heights"], Value::LongArray(vec![1, 2, 3]));
    assert!(matches!(parser.root(), Err(e) if e.is_eof()));
    Ok(())
}

#[test]
fn nesting_limit() {
    let depth = crate::MAX_DEPTH + 1;
    let mut builder = Builder::new().start_list("", Tag::List, 1);
    for _ in 1..depth {
        builder = builder.start_anon_list(Tag::List, 1);
    }
    let payload = builder.start_anon_list(Tag::End, 0).build();

    let mut parser = Parser::new(payload.as_slice());
    let err = match parser.root() {
        Ok(Some(Lazy::List(mut l))) => l.read_fully().unwrap_err(),
        other => panic!("{:?}", other),
    };
    assert_eq!(err.kind(), &ErrorKind::DepthLimit);

    let mut parser = Parser::new(payload.as_slice());
    let err = match parser.root() {
        Ok(Some(Lazy::List(mut l))) => l.skip().unwrap_err(),
        other => panic!("{:?}", other),
    };
    assert_eq!(err.kind(), &ErrorKind::DepthLimit);
}

#[test]
fn nesting_at_the_limit_is_fine() -> Result<()> {
    let mut builder = Builder::new().start_list("", Tag::List, 1);
    for _ in 1..crate::MAX_DEPTH - 1 {
        builder = builder.start_anon_list(Tag::List, 1);
    }
    let payload = builder.start_anon_list(Tag::End, 0).build();

    let mut parser = Parser::new(payload.as_slice());
    match parser.root()? {
        Some(Lazy::List(mut l)) => l.skip()?,
        other => panic!("{:?}", other),
    }
    assert!(matches!(parser.root(), Err(e) if e.is_eof()));
    Ok(())
}
