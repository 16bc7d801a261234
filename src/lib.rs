//! A small, callback driven parser for a restricted XML subset.
//!
//! The accepted grammar is elements and comments only:
//!
//! ```text
//! document := element*
//! element  := "<" Name ">" content "</" Name ">"
//! content  := (text | element | comment)*
//! comment  := "<!--" ... "-->"
//! ```
//!
//! There are no attributes, self closing tags, CDATA sections or entities. Callers
//! register a handler per tag name and the parser calls it with the raw content of
//! every element of that name as it closes. The content is the exact byte range
//! between the tags, nested markup included.
//!
//! ```
//! use std::cell::Cell;
//! use tagback::{parse, CallbackRegistry};
//!
//! let fps = Cell::new(0);
//! let mut registry = CallbackRegistry::new();
//! registry.register("targetFPS", |content| {
//!     fps.set(content.to_str().unwrap().parse().unwrap());
//! });
//! parse(b"<settings><targetFPS>144</targetFPS></settings>", &mut registry).unwrap();
//! drop(registry);
//! assert_eq!(fps.get(), 144);
//! ```

pub mod error;
pub mod fields;
pub mod lexer;
mod loader;
pub mod registry;
pub mod scenario;
pub mod settings;
pub mod stack;
pub mod tokens;

pub use error::{Diagnostic, ErrorKind, LoadError, ParseError};
pub use lexer::Lexer;
pub use registry::{CallbackRegistry, Handler};
pub use scenario::ScenarioSet;
pub use settings::Settings;
pub use stack::{NestingStack, OpenTag};
pub use tokens::{FilePosition, Tag, TagKind, View};

use tracing::{debug, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Columns a tab advances when positions are reported.
    pub tab_width: usize,
    /// Number of bytes shown after the failure offset in a [`Diagnostic`].
    pub excerpt_len: usize,
    /// Accept input that ends while elements are still open.
    pub allow_unclosed: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            tab_width: 4,
            excerpt_len: 10,
            allow_unclosed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Scanning,
    Halted,
    Finished,
}

/// All state of one parse: cursor, open elements, options and the error slot.
pub struct XmlParser<'a> {
    buffer: &'a [u8],
    lexer: Lexer<'a>,
    stack: NestingStack<'a>,
    options: Options,
    state: ParserState,
    error: Option<ParseError>,
    elements: usize,
}

impl<'a> XmlParser<'a> {
    pub fn new(buffer: &'a [u8]) -> XmlParser<'a> {
        XmlParser {
            buffer,
            lexer: Lexer::new(buffer),
            stack: NestingStack::new(),
            options: Options::default(),
            state: ParserState::Scanning,
            error: None,
            elements: 0,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// The error that halted the last parse, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Number of elements closed by the last parse.
    pub fn elements(&self) -> usize {
        self.elements
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Runs over the whole buffer, calling handlers from `registry` as elements close.
    /// Stops at the first structural error. Can be called again, every call starts
    /// from the beginning of the buffer.
    pub fn parse(&mut self, registry: &mut CallbackRegistry<'_>) -> Result<(), ParseError> {
        self.lexer = Lexer::new(self.buffer);
        self.stack.clear();
        self.error = None;
        self.elements = 0;
        self.state = ParserState::Scanning;

        while self.state == ParserState::Scanning {
            match self.step(registry) {
                Ok(true) => {}
                Ok(false) => self.state = ParserState::Finished,
                Err(error) => {
                    debug!(%error, "parse halted");
                    self.error = Some(error);
                    self.state = ParserState::Halted;
                }
            }
        }
        self.stack.clear();

        match self.error {
            Some(error) => Err(error),
            None => {
                debug!(elements = self.elements, "parse finished");
                Ok(())
            }
        }
    }

    /// Handles one tag. `Ok(false)` means the input is exhausted.
    fn step(&mut self, registry: &mut CallbackRegistry<'_>) -> Result<bool, ParseError> {
        let Some(tag) = self.lexer.next_tag()? else {
            if let Some(open) = self.stack.peek() {
                if !self.options.allow_unclosed {
                    return Err(ParseError::unclosed(open.tag_start));
                }
                warn!(
                    depth = self.stack.depth(),
                    name = %open.name,
                    "input ended with open tags"
                );
            }
            return Ok(false);
        };

        match tag.kind() {
            TagKind::Open => {
                trace!(name = %tag.name(), offset = tag.start, "open");
                self.stack.push(tag.name(), tag.start, tag.end());
            }
            TagKind::Close => {
                let open = self.stack.pop(tag.start)?;
                let name = tag.name();
                if open.name != name {
                    return Err(ParseError::new(ErrorKind::UnbalancedTags, tag.start));
                }
                self.elements += 1;
                if let Some(handler) = registry.lookup(name.as_bytes()) {
                    let content = View::span(self.buffer, open.content_start..tag.start);
                    trace!(name = %name, offset = content.offset(), len = content.len(), "handler");
                    handler.handle(content);
                }
            }
        }
        Ok(true)
    }
}

impl<'a> From<&'a str> for XmlParser<'a> {
    fn from(document: &'a str) -> Self {
        XmlParser::new(document.as_bytes())
    }
}

/// Parses `buffer` with default [`Options`].
pub fn parse(buffer: &[u8], registry: &mut CallbackRegistry<'_>) -> Result<(), ParseError> {
    XmlParser::new(buffer).parse(registry)
}
