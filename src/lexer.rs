use memchr::memchr;

use super::*;

const COMMENT_OPEN: &[u8] = b"<!--";

/// Forward only cursor over the document that hands out one tag at a time.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    buffer: &'a [u8],
    index: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(buffer: &'a [u8]) -> Lexer<'a> {
        Lexer { buffer, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the next tag that is not inside a comment, or `None` once the buffer has
    /// no `<` left. On success the cursor sits just past the tag's `>`.
    pub fn next_tag(&mut self) -> Result<Option<Tag<'a>>, ParseError> {
        loop {
            let Some(found) = memchr(b'<', &self.buffer[self.index..]) else {
                self.index = self.buffer.len();
                return Ok(None);
            };
            let start = self.index + found;
            match self.buffer.get(start + 1) {
                None => return Err(ParseError::new(ErrorKind::UnterminatedTag, start)),
                Some(b'!') => {
                    self.index = skip_comment(self.buffer, start)?;
                }
                Some(_) => {
                    let body = start + 1;
                    let Some(len) = memchr(b'>', &self.buffer[body..]) else {
                        return Err(ParseError::new(ErrorKind::UnterminatedTag, start));
                    };
                    self.index = body + len + 1;
                    return Ok(Some(Tag {
                        label: View::span(self.buffer, body..body + len),
                        start,
                    }));
                }
            }
        }
    }
}

/// `start` is the offset of the `<` of a `<!` construct. Returns the offset just past
/// the comment's `-->`.
///
/// The first `-->` ends the comment, nested openers are not tracked.
pub fn skip_comment(buffer: &[u8], start: usize) -> Result<usize, ParseError> {
    let rest = &buffer[start..];
    if !rest.starts_with(COMMENT_OPEN) {
        let kind = if COMMENT_OPEN.starts_with(rest) {
            ErrorKind::UnterminatedComment
        } else {
            ErrorKind::MalformedComment
        };
        return Err(ParseError::new(kind, start));
    }

    let mut index = start + COMMENT_OPEN.len();
    while let Some(found) = memchr(b'-', &buffer[index..]) {
        let dash = index + found;
        if buffer.get(dash + 1..dash + 3) == Some(&b"->"[..]) {
            return Ok(dash + 3);
        }
        index = dash + 1;
    }
    Err(ParseError::new(ErrorKind::UnterminatedComment, start))
}

/// Line and column of `offset`, counted in bytes. `\r\n` is a single line break.
pub fn position_at(buffer: &[u8], offset: usize, tab_width: usize) -> FilePosition {
    let mut position = FilePosition::new();
    let end = offset.min(buffer.len());
    let mut index = 0;
    while index < end {
        match buffer[index] {
            b'\r' => {
                if buffer.get(index + 1) == Some(&b'\n') {
                    index += 1;
                    position.line += 1;
                    position.column = 1;
                }
            }
            b'\t' => {
                position.column += tab_width;
            }
            b'\n' => {
                position.line += 1;
                position.column = 1;
            }
            _ => {
                position.column += 1;
            }
        }
        index += 1;
    }
    position
}
