// File: crates/chart-core/src/event.rs
// Summary: Change events, listeners and per-object notifiers with parent relays.
// Notes:
// - Dispatch is synchronous and single-threaded. The listener list is
//   snapshotted when a dispatch starts, so listeners added or removed while it
//   runs only affect later dispatches.
// - The first failing listener aborts the dispatch; its error is returned to
//   the mutating call.
// - `Shared::update` queues a dataset's events until its borrow is released.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{trace, warn};

use crate::error::{ChartError, Result};

/// Shared, single-threaded handle used for datasets bound into plots.
///
/// Mutation goes through [`Shared::update`], which holds back the events the
/// edit fires until the mutable borrow is released. Listeners may therefore
/// read the dataset (through any plot bound to it) while they are notified.
pub struct Shared<T>(Rc<RefCell<T>>);

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Shared(Rc::new(RefCell::new(value)))
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        shared(value)
    }

    /// Read access. Panics only when called from inside an `update` edit of
    /// the same handle.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Whether both handles point at the same value.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Observable> Shared<T> {
    /// Apply `edit` to the value, then dispatch the events it fired, in
    /// order, once the borrow has been released.
    ///
    /// An error from `edit` is returned after the held events are dispatched;
    /// a listener error is returned otherwise.
    pub fn update<R>(&self, edit: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let notifier = self.0.try_borrow().map_err(|_| ChartError::Busy)?.notifier().handle();
        notifier.core.hold();
        let out = match self.0.try_borrow_mut() {
            Ok(mut value) => edit(&mut value),
            Err(_) => Err(ChartError::Busy),
        };
        let flushed = notifier.core.release();
        let out = out?;
        flushed?;
        Ok(out)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an observable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of object changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Dataset,
    /// A single series of a multi-series dataset changed.
    Series { index: usize },
    Renderer,
    Axis,
    Annotation,
    Crosshair,
    Plot,
    Title,
    Legend,
    Chart,
}

/// Immutable change notification.
///
/// `cause` is set when a parent relays the event of one of its children, so a
/// chart listener can walk back to the dataset that triggered a repaint.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    source: ObjectId,
    kind: ChangeKind,
    cause: Option<Box<ChangeEvent>>,
}

impl ChangeEvent {
    pub fn new(source: ObjectId, kind: ChangeKind) -> Self {
        Self { source, kind, cause: None }
    }

    pub fn relayed(source: ObjectId, kind: ChangeKind, cause: ChangeEvent) -> Self {
        Self { source, kind, cause: Some(Box::new(cause)) }
    }

    pub fn source(&self) -> ObjectId {
        self.source
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&ChangeEvent> {
        self.cause.as_deref()
    }

    /// The innermost event of the relay chain.
    pub fn origin(&self) -> &ChangeEvent {
        let mut e = self;
        while let Some(c) = e.cause() {
            e = c;
        }
        e
    }
}

/// Receives change events.
pub trait ChangeListener {
    fn changed(&self, event: &ChangeEvent) -> Result<()>;

    /// A listener that reports `false` is skipped and pruned.
    fn is_live(&self) -> bool {
        true
    }

    /// Whether this listener forwards events to the object `target`.
    fn relays_to(&self, _target: ObjectId) -> bool {
        false
    }
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent) -> Result<()>,
{
    fn changed(&self, event: &ChangeEvent) -> Result<()> {
        self(event)
    }
}

/// Handle returned on registration, used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registry {
    id: ObjectId,
    enabled: Cell<bool>,
    next_listener: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Rc<dyn ChangeListener>)>>,
    /// Nesting depth of `hold`; events are queued while it is non-zero.
    held: Cell<u32>,
    pending: RefCell<Vec<ChangeEvent>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            id: ObjectId::next(),
            enabled: Cell::new(true),
            next_listener: Cell::new(1),
            entries: RefCell::new(Vec::new()),
            held: Cell::new(0),
            pending: RefCell::new(Vec::new()),
        }
    }

    fn hold(&self) {
        self.held.set(self.held.get() + 1);
    }

    /// Leave one level of `hold`; the outermost release dispatches the queue.
    fn release(&self) -> Result<()> {
        let depth = self.held.get().saturating_sub(1);
        self.held.set(depth);
        if depth > 0 {
            return Ok(());
        }
        let queued = std::mem::take(&mut *self.pending.borrow_mut());
        for event in &queued {
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&self, event: &ChangeEvent) -> Result<()> {
        if !self.enabled.get() {
            return Ok(());
        }
        if self.held.get() > 0 {
            self.pending.borrow_mut().push(event.clone());
            return Ok(());
        }
        let snapshot: Vec<Rc<dyn ChangeListener>> =
            self.entries.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        let mut stale = false;
        for listener in snapshot {
            if !listener.is_live() {
                stale = true;
                continue;
            }
            trace!("dispatch {:?} from {} to listener of {}", event.kind, event.source, self.id);
            if let Err(e) = listener.changed(event) {
                warn!("listener of {} failed on {:?}: {}", self.id, event.kind, e);
                return Err(e);
            }
        }
        if stale {
            self.entries.borrow_mut().retain(|(_, l)| l.is_live());
        }
        Ok(())
    }
}

/// Per-object listener registry.
///
/// Cloning yields a fresh identity with no listeners, equality always holds
/// and serialization skips it: observers are never part of an object's value.
pub struct Notifier {
    core: Rc<Registry>,
}

impl Notifier {
    pub fn new() -> Self {
        Self { core: Rc::new(Registry::new()) }
    }

    pub fn id(&self) -> ObjectId {
        self.core.id
    }

    pub fn add_listener(&self, listener: Rc<dyn ChangeListener>) -> ListenerId {
        let id = ListenerId(self.core.next_listener.get());
        self.core.next_listener.set(id.0 + 1);
        self.core.entries.borrow_mut().push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut entries = self.core.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(lid, _)| *lid != id);
        entries.len() != before
    }

    /// Number of registered listeners that are still live.
    pub fn listener_count(&self) -> usize {
        self.core.entries.borrow().iter().filter(|(_, l)| l.is_live()).count()
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.core.enabled.set(enabled);
    }

    /// Notify every listener that this object changed.
    pub fn fire(&self, kind: ChangeKind) -> Result<()> {
        self.core.dispatch(&ChangeEvent::new(self.core.id, kind))
    }

    /// A second handle on the same registry.
    fn handle(&self) -> Notifier {
        Notifier { core: Rc::clone(&self.core) }
    }

    fn downgrade(&self) -> Weak<Registry> {
        Rc::downgrade(&self.core)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Notifier {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl PartialEq for Notifier {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("id", &self.core.id)
            .field("listeners", &self.core.entries.borrow().len())
            .field("enabled", &self.core.enabled.get())
            .finish()
    }
}

struct Relay {
    target: Weak<Registry>,
    kind: ChangeKind,
}

impl ChangeListener for Relay {
    fn changed(&self, event: &ChangeEvent) -> Result<()> {
        match self.target.upgrade() {
            Some(parent) => parent.dispatch(&ChangeEvent::relayed(parent.id, self.kind, event.clone())),
            None => Ok(()),
        }
    }

    fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn relays_to(&self, target: ObjectId) -> bool {
        self.target.upgrade().is_some_and(|t| t.id == target)
    }
}

/// Forward every event of `child` to the listeners of `parent` as a `kind`
/// event. The relay holds the parent weakly and goes inert once it is dropped.
pub fn relay(child: &Notifier, parent: &Notifier, kind: ChangeKind) -> ListenerId {
    trace!("relay {} -> {} as {:?}", child.id(), parent.id(), kind);
    child.add_listener(Rc::new(Relay { target: parent.downgrade(), kind }))
}

/// Remove every relay from `child` to `parent`. Returns how many were removed.
pub fn unrelay(child: &Notifier, parent: &Notifier) -> usize {
    let target = parent.id();
    let mut entries = child.core.entries.borrow_mut();
    let before = entries.len();
    entries.retain(|(_, l)| !l.relays_to(target));
    let removed = before - entries.len();
    if removed > 0 {
        trace!("unrelay {} -> {}", child.id(), target);
    }
    removed
}

/// Implemented by every object that notifies listeners of its changes.
pub trait Observable {
    fn notifier(&self) -> &Notifier;

    /// The kind reported by this object's own events.
    fn change_kind(&self) -> ChangeKind;

    fn id(&self) -> ObjectId {
        self.notifier().id()
    }

    fn add_change_listener(&self, listener: Rc<dyn ChangeListener>) -> ListenerId {
        self.notifier().add_listener(listener)
    }

    fn on_change<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&ChangeEvent) -> Result<()> + 'static,
        Self: Sized,
    {
        self.notifier().add_listener(Rc::new(f))
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.notifier().remove_listener(id)
    }

    /// Suspend or resume notification. Resuming fires one event so that
    /// listeners catch up with changes made while suspended.
    fn set_notify(&self, notify: bool) -> Result<()> {
        let n = self.notifier();
        let was = n.is_enabled();
        n.set_enabled(notify);
        if notify && !was {
            n.fire(self.change_kind())?;
        }
        Ok(())
    }

    fn is_notify(&self) -> bool {
        self.notifier().is_enabled()
    }
}
