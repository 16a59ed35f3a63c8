use crate::Tag;

/// Error produced while walking NBT. After any error other than
/// [`ErrorKind::Nonunicode`] and [`ErrorKind::ChildPending`] the position of
/// the input is undefined and the rest of the stream should be abandoned.
///
/// A `Nonunicode` error consumes the whole entry it was found in. For `next`
/// that is the entry being read. For `read_fully` it is the top level entry
/// holding the bad string, and the reader carries on after it.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to new variants.
    Other,

    /// End of input before the tag of a root value. This is the natural end of
    /// a stream of NBT values rather than a corruption.
    Eof,

    /// EOF that occurred part way through some NBT value.
    UnexpectedEof,

    /// Any other IO error from the underlying reader.
    Io(std::io::ErrorKind),

    /// Tag byte outside of the known set, or an END tag where a value was
    /// required.
    InvalidTag,

    /// A handle was advanced while a compound or list it handed out earlier
    /// had not been read or skipped to its end.
    ChildPending,

    /// A value was requested from a handle that has no more entries.
    NoMoreElements,

    /// Array with a negative length.
    NegativeLength,

    /// Lists and compounds nested deeper than [`MAX_DEPTH`][crate::MAX_DEPTH].
    DepthLimit,

    /// The parser has been closed.
    Closed,

    /// Expected unicode data but was not valid. Parser remains valid if just
    /// this value was not unicode. Contained bytes are the invalid unicode data.
    Nonunicode(Vec<u8>),
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::Eof)
    }

    pub(crate) fn is_nonunicode(&self) -> bool {
        matches!(self.kind, ErrorKind::Nonunicode(_))
    }

    pub(crate) fn invalid_tag(t: u8) -> Self {
        Self {
            msg: format!("invalid tag: {}", t),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn unexpected_end_tag() -> Self {
        Self {
            msg: "unexpected end tag where a value was expected".into(),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn child_pending(owner: &str) -> Self {
        Self {
            msg: format!(
                "{} advanced before its previous child was read completely",
                owner
            ),
            kind: ErrorKind::ChildPending,
        }
    }

    pub(crate) fn no_more_elements(container: Tag) -> Self {
        Self {
            msg: format!("no more elements in {:?}", container),
            kind: ErrorKind::NoMoreElements,
        }
    }

    pub(crate) fn negative_length(len: i32) -> Self {
        Self {
            msg: format!("negative array length: {}", len),
            kind: ErrorKind::NegativeLength,
        }
    }

    pub(crate) fn depth_limit() -> Self {
        Self {
            msg: format!("nbt nested deeper than {}", crate::MAX_DEPTH),
            kind: ErrorKind::DepthLimit,
        }
    }

    pub(crate) fn closed() -> Self {
        Self {
            msg: "parser is closed".into(),
            kind: ErrorKind::Closed,
        }
    }

    pub(crate) fn nonunicode(d: Vec<u8>) -> Self {
        Self {
            msg: format!(
                "invalid string, non-unicode: {}",
                String::from_utf8_lossy(&d),
            ),
            kind: ErrorKind::Nonunicode(d),
        }
    }

    pub(crate) fn eof() -> Self {
        Self {
            msg: "EOF".into(),
            kind: ErrorKind::Eof,
        }
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self {
            msg: "eof: unexpectedly ran out of input".into(),
            kind: ErrorKind::UnexpectedEof,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self {
                msg: e.to_string(),
                kind: ErrorKind::UnexpectedEof,
            },
            kind => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io(kind),
            },
        }
    }
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;
