use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::str::Utf8Error;

/// A borrowed window into the document buffer.
///
/// Every tag name, element content and error excerpt handed out by the parser is a
/// `View`. It never allocates and never outlives the buffer it was cut from. Besides
/// the bytes it remembers where they start in the buffer, so a handler can report
/// positions without doing pointer arithmetic.
///
/// Equality and hashing only look at the bytes, the offset is ignored.
#[derive(Clone, Copy)]
pub struct View<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> View<'a> {
    /// A view over the whole buffer.
    pub fn new(buffer: &'a [u8]) -> View<'a> {
        View {
            bytes: buffer,
            offset: 0,
        }
    }

    /// Caller guarantees `range` lies inside `buffer`.
    pub(crate) fn span(buffer: &'a [u8], range: Range<usize>) -> View<'a> {
        View {
            offset: range.start,
            bytes: &buffer[range],
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Byte offset of the first byte of this view in the source buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset one past the last byte of this view.
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sub-view relative to the start of this view. Returns `None` if `range` would
    /// reach outside of it.
    pub fn slice(&self, range: Range<usize>) -> Option<View<'a>> {
        let start = range.start;
        self.bytes.get(range).map(|bytes| View {
            bytes,
            offset: self.offset + start,
        })
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes.starts_with(prefix)
    }

    pub fn strip_prefix(&self, prefix: &[u8]) -> Option<View<'a>> {
        self.bytes.strip_prefix(prefix).map(|bytes| View {
            bytes,
            offset: self.offset + prefix.len(),
        })
    }

    /// Drops leading and trailing ASCII whitespace.
    pub fn trim(&self) -> View<'a> {
        let start = self
            .bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(self.bytes.len());
        let end = self
            .bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |last| last + 1);
        View {
            bytes: &self.bytes[start..end],
            offset: self.offset + start,
        }
    }

    pub fn to_str(&self) -> Result<&'a str, Utf8Error> {
        std::str::from_utf8(self.bytes)
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "View({}, {:?})",
            self.offset,
            String::from_utf8_lossy(self.bytes)
        )
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.bytes))
    }
}

impl PartialEq for View<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for View<'_> {}

impl Hash for View<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl PartialEq<[u8]> for View<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for View<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl PartialEq<str> for View<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for View<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

/// The raw label between `<` and `>`.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    pub label: View<'a>,
    /// Offset of the `<`.
    pub start: usize,
}

impl<'a> Tag<'a> {
    pub fn kind(&self) -> TagKind {
        if self.label.starts_with(b"/") {
            TagKind::Close
        } else {
            TagKind::Open
        }
    }

    pub fn name(&self) -> View<'a> {
        self.label.strip_prefix(b"/").unwrap_or(self.label)
    }

    /// Offset just past the closing `>`.
    pub fn end(&self) -> usize {
        self.label.end() + 1
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct FilePosition {
    pub line: usize,
    pub column: usize,
}

impl FilePosition {
    pub fn new() -> FilePosition {
        FilePosition { line: 1, column: 1 }
    }
}

impl Default for FilePosition {
    fn default() -> Self {
        FilePosition::new()
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
