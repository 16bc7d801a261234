use std::cell::RefCell;
use std::path::Path;

use crate::error::LoadError;
use crate::fields::FieldError;
use crate::registry::CallbackRegistry;
use crate::tokens::View;
use crate::{Options, XmlParser};

pub(crate) type Setter<S> = fn(&mut S, View<'_>) -> Result<(), FieldError>;

struct Loader<S> {
    state: S,
    failure: Option<LoadError>,
}

/// Wraps a setter so its first failure is remembered and later fields are ignored.
fn field<'s, S>(
    cell: &'s RefCell<Loader<S>>,
    tag: &'static str,
    apply: Setter<S>,
) -> impl FnMut(View<'_>) + 's
where
    S: 's,
{
    move |content: View<'_>| {
        let mut loader = cell.borrow_mut();
        if loader.failure.is_some() {
            return;
        }
        if let Err(source) = apply(&mut loader.state, content) {
            tracing::debug!(tag, offset = content.offset(), %source, "field rejected");
            loader.failure = Some(LoadError::Field {
                tag,
                offset: content.offset(),
                source,
            });
        }
    }
}

/// Parses `buffer` with one handler per entry of `tags`, all writing into `state`.
pub(crate) fn run<S>(
    buffer: &[u8],
    options: &Options,
    state: S,
    tags: &[(&'static str, Setter<S>)],
) -> Result<S, LoadError> {
    let cell = RefCell::new(Loader {
        state,
        failure: None,
    });
    let mut registry = CallbackRegistry::new();
    for &(tag, apply) in tags {
        registry.register(tag, field(&cell, tag, apply));
    }
    let outcome = XmlParser::new(buffer)
        .with_options(options.clone())
        .parse(&mut registry);
    drop(registry);
    outcome?;

    let loader = cell.into_inner();
    match loader.failure {
        Some(failure) => Err(failure),
        None => Ok(loader.state),
    }
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
