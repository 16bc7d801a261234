use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::fields::FieldError;
use crate::lexer::position_at;
use crate::tokens::FilePosition;
use crate::Options;

/// Why a parse halted. Every kind is fatal for the parse it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `<!` not followed by `--`.
    MalformedComment,
    UnterminatedComment,
    UnterminatedTag,
    /// A closing tag with nothing open.
    StackUnderflow,
    /// A closing tag whose name differs from the innermost open tag, or a tag still
    /// open when the input ran out.
    UnbalancedTags,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::MalformedComment => "Comment opening malformed, should be: <!--",
            ErrorKind::UnterminatedComment => "Comment not properly closed",
            ErrorKind::UnterminatedTag => "Tag has no closing '>'",
            ErrorKind::StackUnderflow => "Closing tag has no matching opening tag",
            ErrorKind::UnbalancedTags => "Mismatched opening/closing tags",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The single error slot of a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{message} at byte {offset}")]
pub struct ParseError {
    pub kind: ErrorKind,
    /// Byte offset into the buffer where the failure was detected.
    pub offset: usize,
    pub message: &'static str,
}

impl ParseError {
    pub fn new(kind: ErrorKind, offset: usize) -> ParseError {
        ParseError {
            kind,
            offset,
            message: kind.message(),
        }
    }

    pub(crate) fn unclosed(offset: usize) -> ParseError {
        ParseError {
            kind: ErrorKind::UnbalancedTags,
            offset,
            message: "Tag never closed",
        }
    }

    /// Bytes starting at the failure offset, at most `len` of them.
    pub fn excerpt<'a>(&self, buffer: &'a [u8], len: usize) -> &'a [u8] {
        let start = self.offset.min(buffer.len());
        let end = start.saturating_add(len).min(buffer.len());
        &buffer[start..end]
    }

    pub fn diagnostic<'a>(&self, buffer: &'a [u8], options: &Options) -> Diagnostic<'a> {
        Diagnostic {
            error: *self,
            position: position_at(buffer, self.offset, options.tab_width),
            excerpt: self.excerpt(buffer, options.excerpt_len),
        }
    }
}

/// A printable report of a [`ParseError`] together with where it happened.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic<'a> {
    pub error: ParseError,
    pub position: FilePosition,
    pub excerpt: &'a [u8],
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error {}\n\tAt:{} [{}] ({}...)",
            self.error.message,
            self.error.offset,
            self.position,
            String::from_utf8_lossy(self.excerpt)
        )
    }
}

/// Failure of one of the bundled loaders.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("<{tag}> at byte {offset}: {source}")]
    Field {
        tag: &'static str,
        offset: usize,
        source: FieldError,
    },
}
