use crate::error::{ErrorKind, ParseError};
use crate::tokens::View;

/// An element whose closing tag has not been seen yet.
#[derive(Debug, Clone, Copy)]
pub struct OpenTag<'a> {
    pub name: View<'a>,
    /// Offset of the opening tag's `<`.
    pub tag_start: usize,
    /// Offset just past the opening tag's `>`.
    pub content_start: usize,
}

/// LIFO record of the currently open elements. Depth is unbounded.
#[derive(Debug, Default)]
pub struct NestingStack<'a> {
    entries: Vec<OpenTag<'a>>,
}

impl<'a> NestingStack<'a> {
    pub fn new() -> Self {
        NestingStack {
            entries: Vec::with_capacity(10),
        }
    }

    pub fn push(&mut self, name: View<'a>, tag_start: usize, content_start: usize) {
        self.entries.push(OpenTag {
            name,
            tag_start,
            content_start,
        });
    }

    /// `closing_at` is the offset of the closing tag asking for the pop, reported if
    /// nothing is open.
    pub fn pop(&mut self, closing_at: usize) -> Result<OpenTag<'a>, ParseError> {
        self.entries
            .pop()
            .ok_or_else(|| ParseError::new(ErrorKind::StackUnderflow, closing_at))
    }

    pub fn peek(&self) -> Option<&OpenTag<'a>> {
        self.entries.last()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
