//! Rendered-range observers.

/// Observer told which lines were rendered by each recalculation.
pub trait LineDisplayListener {
    /// Lines `first..=last` are now rendered.
    fn rendered_lines(&mut self, first: usize, last: usize);
}

impl<F: FnMut(usize, usize)> LineDisplayListener for F {
    fn rendered_lines(&mut self, first: usize, last: usize) {
        self(first, last)
    }
}

/// Registered observers, notified in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn LineDisplayListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn add(&mut self, listener: impl LineDisplayListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every observer of the inclusive range `first..=last`.
    pub fn notify(&mut self, first: usize, last: usize) {
        for listener in &mut self.listeners {
            listener.rendered_lines(first, last);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
