use std::fmt;

type Listener = Box<dyn FnMut() + Send>;

/// "State changed, needs redraw" signal owned by each instrument model.
///
/// Hosts either poll [`RedrawSignal::take`] once per tick or register a
/// callback with [`RedrawSignal::subscribe`].
#[derive(Default)]
pub struct RedrawSignal {
    pending: bool,
    listeners: Vec<Listener>,
}

impl RedrawSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.pending = true;
        for listener in &mut self.listeners {
            listener();
        }
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl fmt::Debug for RedrawSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedrawSignal")
            .field("pending", &self.pending)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
