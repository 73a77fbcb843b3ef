//! Synchronous publish/subscribe.
//!
//! A [`Subject`] keeps a list of callbacks keyed by [`EventKind`] and invokes
//! them on the caller's thread. Dispatch works on a snapshot of the
//! subscriber list, so a callback may subscribe, unsubscribe or emit on the
//! same subject without tripping a borrow.
//!
//! Between [`Subject::start_modify`] and [`Subject::end_modify`] emitted
//! events are coalesced: nothing is dispatched inside the batch and a single
//! [`EventKind::Modified`] fires when the outermost batch ends.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Kinds of change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Generic "something changed" notification.
    Modified,
    /// A control point moved.
    PointModified,
    /// A control point was added.
    PointAdded,
    /// A control point was removed.
    PointRemoved,
    /// The scene is about to be closed.
    StartClose,
    /// The scene has been closed.
    EndClose,
}

impl EventKind {
    /// The events a markups observer cares about.
    pub const MARKUPS: [EventKind; 4] = [
        EventKind::PointModified,
        EventKind::PointAdded,
        EventKind::PointRemoved,
        EventKind::Modified,
    ];
}

/// Identifies one registered callback on one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(EventKind)>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback,
    // Cleared on unsubscribe so an in-flight dispatch skips it.
    active: Rc<Cell<bool>>,
}

/// A synchronous event source.
#[derive(Default)]
pub struct Subject {
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
    batching: Cell<bool>,
    pending: Cell<bool>,
}

impl Subject {
    /// Creates a subject with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for events of `kind`.
    pub fn subscribe(&self, kind: EventKind, callback: impl Fn(EventKind) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            kind,
            callback: Rc::new(callback),
            active: Rc::new(Cell::new(true)),
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was not registered here.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.iter().position(|s| s.id == id) {
            Some(index) => {
                let removed = subscribers.remove(index);
                removed.active.set(false);
                true
            }
            None => false,
        }
    }

    /// Returns the total number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Returns the number of live subscriptions for one event kind.
    pub fn subscriber_count_for(&self, kind: EventKind) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Begins a batch. Returns whether a batch was already open; pass that
    /// value back to [`Subject::end_modify`].
    pub fn start_modify(&self) -> bool {
        self.batching.replace(true)
    }

    /// Ends a batch opened by [`Subject::start_modify`].
    ///
    /// Only the outermost call flushes; if anything was emitted inside the
    /// batch exactly one [`EventKind::Modified`] is dispatched.
    pub fn end_modify(&self, was_batching: bool) {
        if was_batching {
            return;
        }
        self.batching.set(false);
        if self.pending.replace(false) {
            self.dispatch(EventKind::Modified);
        }
    }

    /// Returns whether a batch is open.
    pub fn is_batching(&self) -> bool {
        self.batching.get()
    }

    /// Emits an event, or records it when a batch is open.
    pub fn emit(&self, kind: EventKind) {
        if self.batching.get() {
            self.pending.set(true);
        } else {
            self.dispatch(kind);
        }
    }

    fn dispatch(&self, kind: EventKind) {
        let targets: Vec<(Rc<Cell<bool>>, Callback)> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (Rc::clone(&s.active), Rc::clone(&s.callback)))
            .collect();
        log::trace!("dispatching {kind:?} to {} subscriber(s)", targets.len());

        for (active, callback) in targets {
            if active.get() {
                callback(kind);
            }
        }
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscriber_count())
            .field("batching", &self.batching.get())
            .finish_non_exhaustive()
    }
}
