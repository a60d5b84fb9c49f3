use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

/// A "value changed" event with any number of listeners.
///
/// Listeners run synchronously on the emitting thread, in the order they were
/// connected. A listener may connect further listeners or trigger another
/// emission; those take effect from the next `emit` on.
#[derive(Default)]
pub struct ChangeSignal {
    listeners: RefCell<Vec<Listener>>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener that runs on every future emission
    pub fn connect<F>(&self, listener: F)
    where
        F: Fn() + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn emit(&self) {
        // Snapshot first so listeners can connect without a double borrow
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_every_listener() {
        let signal = ChangeSignal::new();
        let hits = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let hits = Rc::clone(&hits);
            signal.connect(move || hits.set(hits.get() + 1));
        }

        signal.emit();
        assert_eq!(hits.get(), 3);
        assert_eq!(signal.listener_count(), 3);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let signal = ChangeSignal::new();
        signal.emit();
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_listener_connected_during_emit_waits_for_next_emit() {
        let signal = Rc::new(ChangeSignal::new());
        let late_hits = Rc::new(Cell::new(0));

        {
            let signal_ref = Rc::clone(&signal);
            let late_hits = Rc::clone(&late_hits);
            signal.connect(move || {
                let late_hits = Rc::clone(&late_hits);
                signal_ref.connect(move || late_hits.set(late_hits.get() + 1));
            });
        }

        signal.emit();
        assert_eq!(late_hits.get(), 0);

        signal.emit();
        assert_eq!(late_hits.get(), 1);
    }
}
