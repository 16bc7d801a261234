use std::fmt;

use rustc_hash::FxHashMap;

use crate::tokens::View;

/// Something that consumes the content of a closed element.
pub trait Handler {
    fn handle(&mut self, content: View<'_>);
}

impl<F> Handler for F
where
    F: FnMut(View<'_>),
{
    fn handle(&mut self, content: View<'_>) {
        self(content)
    }
}

struct Entry<'h> {
    name: &'h [u8],
    handler: Box<dyn Handler + 'h>,
}

/// Tag name to handler table, consulted every time an element closes.
///
/// Registrations are kept in insertion order and never deduplicated. When a name is
/// registered more than once the earliest registration answers every lookup and the
/// later ones are never called.
#[derive(Default)]
pub struct CallbackRegistry<'h> {
    entries: Vec<Entry<'h>>,
    // name -> index of its first registration
    first: FxHashMap<&'h [u8], usize>,
}

impl<'h> CallbackRegistry<'h> {
    pub fn new() -> Self {
        CallbackRegistry {
            entries: Vec::new(),
            first: FxHashMap::default(),
        }
    }

    pub fn register<N, F>(&mut self, name: &'h N, handler: F) -> &mut Self
    where
        N: AsRef<[u8]> + ?Sized,
        F: FnMut(View<'_>) + 'h,
    {
        self.register_handler(name, handler)
    }

    pub fn register_handler<N, H>(&mut self, name: &'h N, handler: H) -> &mut Self
    where
        N: AsRef<[u8]> + ?Sized,
        H: Handler + 'h,
    {
        let name = name.as_ref();
        let index = self.entries.len();
        self.first.entry(name).or_insert(index);
        self.entries.push(Entry {
            name,
            handler: Box::new(handler),
        });
        self
    }

    pub fn lookup(&mut self, name: &[u8]) -> Option<&mut (dyn Handler + 'h)> {
        let index = *self.first.get(name)?;
        Some(self.entries[index].handler.as_mut())
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.first.contains_key(name)
    }

    /// Number of registrations, shadowed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'h [u8]> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
}

impl fmt::Debug for CallbackRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.names().map(String::from_utf8_lossy))
            .finish()
    }
}
