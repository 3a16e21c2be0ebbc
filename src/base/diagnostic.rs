use std::{cell::Cell, fmt::Display};

/// Represents a trait responsible for handling diagnostics emitted by the
/// front end.
pub trait Handler<T> {
    /// Receive an error and handles it.
    fn receive(&self, error: T);
}

/// A [`Handler`] that prints every diagnostic to stderr and remembers that it
/// did so.
#[derive(Debug, Default)]
pub struct PrintHandler {
    printed: Cell<bool>,
}

impl PrintHandler {
    /// Creates a new [`PrintHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any diagnostic has been received so far.
    #[must_use]
    pub fn has_printed(&self) -> bool {
        self.printed.get()
    }
}

impl<E: Display> Handler<E> for PrintHandler {
    fn receive(&self, error: E) {
        eprintln!("{error}");
        self.printed.set(true);
    }
}

/// A [`Handler`] that swallows every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidHandler;

impl<E> Handler<E> for VoidHandler {
    fn receive(&self, _error: E) {}
}
