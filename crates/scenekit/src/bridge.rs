//! Two-way synchronization between a module view and its parameter store.
//!
//! The bridge subscribes to the attached [`ParameterStore`] and to the node
//! the store references in the view's observed role. Store changes re-render
//! the whole view, node changes re-render the node-derived fields, and user
//! edits are written back to the store in one batch.
//!
//! A re-entrancy latch is held while the view is rendered from the store.
//! Control changes caused by that rendering must not be written back, so
//! [`ObserverBridge::on_view_changed`] is ignored while the latch is set.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{
    EventKind, ModuleInfo, NodeHandle, Options, ParameterStore, Result, Scene, SceneError,
    SubscriptionId, WeakNodeHandle,
};

/// The controls and labels of one module.
///
/// Implementations are plain data; the bridge decides when each method
/// runs. None of the methods may call back into the bridge.
pub trait ModuleView: 'static {
    /// Module description.
    const INFO: ModuleInfo;

    /// Store role naming the node whose events refresh the view.
    const OBSERVED_ROLE: Option<&'static str> = None;

    /// Node events that refresh the view.
    const OBSERVED_EVENTS: &'static [EventKind] = &[];

    /// Creates the view in its placeholder state.
    fn new(options: &Options) -> Self;

    /// Fills in missing parameters. Runs inside a store batch.
    fn apply_defaults(&self, _store: &ParameterStore) {}

    /// Fills in parameters that depend on the scene content, when the
    /// module is entered. Runs inside a store batch.
    fn initialize(&self, _scene: &Scene, _store: &ParameterStore) {}

    /// Renders every field from the store. `node` is the resolved
    /// observed node, if any.
    fn update_from_store(&mut self, store: &ParameterStore, node: Option<&NodeHandle>);

    /// Renders the fields derived from the observed node.
    fn update_from_node(&mut self, _node: Option<&NodeHandle>) {}

    /// Writes control values into the store. Runs inside a store batch.
    fn write_to_store(&self, _store: &ParameterStore) {}

    /// Returns the view to its placeholder state.
    fn clear(&mut self);
}

struct AttachedStore {
    store: Rc<ParameterStore>,
    subscription: SubscriptionId,
}

struct ObservedNode {
    node: WeakNodeHandle,
    subscriptions: Vec<SubscriptionId>,
}

impl ObservedNode {
    fn release(self) {
        if let Some(node) = self.node.upgrade() {
            log::debug!("stopped observing node '{}'", node.name());
            for id in self.subscriptions {
                node.events().unsubscribe(id);
            }
        }
    }
}

struct BridgeInner<V: ModuleView> {
    scene: Scene,
    view: RefCell<V>,
    refreshing: Cell<bool>,
    store: RefCell<Option<AttachedStore>>,
    observed: RefCell<Option<ObservedNode>>,
}

impl<V: ModuleView> Drop for BridgeInner<V> {
    fn drop(&mut self) {
        if let Some(attached) = self.store.get_mut().take() {
            attached.store.events().unsubscribe(attached.subscription);
        }
        if let Some(observed) = self.observed.get_mut().take() {
            observed.release();
        }
    }
}

/// Resets the re-entrancy latch when dropped.
struct Latch<'a>(&'a Cell<bool>);

impl Drop for Latch<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps a [`ModuleView`] and a [`ParameterStore`] consistent.
///
/// Cloning is cheap; clones share the same view and subscriptions. Event
/// callbacks only hold weak references, so dropping the last clone removes
/// every subscription the bridge made.
pub struct ObserverBridge<V: ModuleView> {
    inner: Rc<BridgeInner<V>>,
}

impl<V: ModuleView> Clone for ObserverBridge<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: ModuleView> ObserverBridge<V> {
    /// Creates a bridge with no store attached.
    pub fn new(scene: Scene, view: V) -> Self {
        Self {
            inner: Rc::new(BridgeInner {
                scene,
                view: RefCell::new(view),
                refreshing: Cell::new(false),
                store: RefCell::new(None),
                observed: RefCell::new(None),
            }),
        }
    }

    /// Returns a non-owning reference for use in event callbacks.
    pub fn downgrade(&self) -> WeakBridge<V> {
        WeakBridge {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns the scene the bridge resolves node references in.
    pub fn scene(&self) -> &Scene {
        &self.inner.scene
    }

    /// Borrows the view.
    pub fn view(&self) -> Ref<'_, V> {
        self.inner.view.borrow()
    }

    /// Returns the attached store.
    pub fn store(&self) -> Option<Rc<ParameterStore>> {
        self.inner
            .store
            .borrow()
            .as_ref()
            .map(|attached| Rc::clone(&attached.store))
    }

    /// Returns the node currently observed, if it is still alive.
    pub fn observed_node(&self) -> Option<NodeHandle> {
        self.inner
            .observed
            .borrow()
            .as_ref()
            .and_then(|observed| observed.node.upgrade())
    }

    /// Returns whether the view is being rendered from the store.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refreshing.get()
    }

    /// Attaches a store, or detaches with `None`.
    ///
    /// The store must be its module's singleton. Missing defaults are
    /// filled in before the view is rendered. Detaching clears the view
    /// and stops observing the node.
    pub fn attach(&self, store: Option<Rc<ParameterStore>>) -> Result<()> {
        if let Some(store) = &store {
            if !store.is_singleton() {
                return Err(SceneError::NotSingleton(store.name().to_string()));
            }
            self.batch_on(store, |view, store| view.apply_defaults(store));
        }

        self.release_store();

        match store {
            Some(store) => {
                log::debug!("{}: attached parameter store", V::INFO.name);
                let weak = self.downgrade();
                let subscription = store.events().subscribe(EventKind::Modified, move |_| {
                    if let Some(bridge) = weak.upgrade() {
                        bridge.on_store_changed();
                    }
                });
                *self.inner.store.borrow_mut() = Some(AttachedStore {
                    store,
                    subscription,
                });
                self.on_store_changed();
            }
            None => {
                self.observe(None);
                self.inner.view.borrow_mut().clear();
            }
        }
        Ok(())
    }

    /// Stops observing the store and the node but leaves the view as it is.
    pub fn suspend(&self) {
        self.release_store();
        self.observe(None);
    }

    fn release_store(&self) {
        let previous = self.inner.store.borrow_mut().take();
        if let Some(attached) = previous {
            attached.store.events().unsubscribe(attached.subscription);
        }
    }

    /// Runs the view's scene-dependent initialization against the store.
    pub fn initialize(&self) {
        if let Some(store) = self.store() {
            let scene = self.inner.scene.clone();
            self.batch_on(&store, |view, store| view.initialize(&scene, store));
        }
    }

    /// Runs `f` with the view and the store inside one store batch.
    ///
    /// The view borrow is released before the batch closes, so observers
    /// notified by the flush may borrow the view again.
    fn batch_on(&self, store: &ParameterStore, f: impl FnOnce(&V, &ParameterStore)) {
        let was = store.start_modify();
        {
            let view = self.inner.view.borrow();
            f(&view, store);
        }
        store.end_modify(was);
    }

    /// Renders the view from the attached store.
    ///
    /// Also switches node observation to whatever the store now references
    /// in the observed role.
    pub fn on_store_changed(&self) {
        let Some(store) = self.store() else {
            return;
        };
        if self.inner.refreshing.replace(true) {
            return;
        }
        let _latch = Latch(&self.inner.refreshing);

        let node = V::OBSERVED_ROLE
            .and_then(|role| store.node_reference_id(role))
            .and_then(|id| self.inner.scene.node(id));
        self.observe(node.as_ref());
        self.inner
            .view
            .borrow_mut()
            .update_from_store(&store, node.as_ref());
    }

    /// Writes the view's control values to the store in one batch.
    ///
    /// Ignored while the view is being rendered from the store, and when no
    /// store is attached.
    pub fn on_view_changed(&self) {
        if self.inner.refreshing.get() {
            return;
        }
        let Some(store) = self.store() else {
            return;
        };
        self.batch_on(&store, |view, store| view.write_to_store(store));
    }

    /// Renders the node-derived fields from the observed node.
    pub fn on_observed_node_changed(&self) {
        let node = self.observed_node();
        self.inner.view.borrow_mut().update_from_node(node.as_ref());
    }

    /// Applies a user edit to the view and writes it to the store.
    pub fn edit_view(&self, f: impl FnOnce(&mut V)) {
        f(&mut self.inner.view.borrow_mut());
        self.on_view_changed();
    }

    /// Updates display-only fields of the view. Nothing is written back.
    pub fn update_view(&self, f: impl FnOnce(&mut V)) {
        f(&mut self.inner.view.borrow_mut());
    }

    fn is_observing(&self, node: Option<&NodeHandle>) -> bool {
        let observed = self.inner.observed.borrow();
        match (observed.as_ref(), node) {
            (None, None) => true,
            (Some(current), Some(node)) => current
                .node
                .upgrade()
                .is_some_and(|current| current.ptr_eq(node)),
            _ => false,
        }
    }

    /// Moves the node subscriptions to `node`.
    ///
    /// Subscriptions on the previous node are removed first, so at most one
    /// node is observed at any time.
    fn observe(&self, node: Option<&NodeHandle>) {
        if self.is_observing(node) {
            return;
        }
        let previous = self.inner.observed.borrow_mut().take();
        if let Some(previous) = previous {
            previous.release();
        }

        let Some(node) = node else {
            return;
        };
        log::debug!("{}: observing node '{}'", V::INFO.name, node.name());
        let subscriptions = V::OBSERVED_EVENTS
            .iter()
            .map(|&kind| {
                let weak = self.downgrade();
                node.events().subscribe(kind, move |_| {
                    if let Some(bridge) = weak.upgrade() {
                        bridge.on_observed_node_changed();
                    }
                })
            })
            .collect();
        *self.inner.observed.borrow_mut() = Some(ObservedNode {
            node: node.downgrade(),
            subscriptions,
        });
    }
}

/// Non-owning reference to an [`ObserverBridge`].
pub struct WeakBridge<V: ModuleView> {
    inner: Weak<BridgeInner<V>>,
}

impl<V: ModuleView> WeakBridge<V> {
    /// Returns the bridge if it is still alive.
    pub fn upgrade(&self) -> Option<ObserverBridge<V>> {
        self.inner.upgrade().map(|inner| ObserverBridge { inner })
    }
}

impl<V: ModuleView> fmt::Debug for ObserverBridge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverBridge")
            .field("module", &V::INFO.name)
            .field("attached", &self.inner.store.borrow().is_some())
            .field(
                "observed",
                &self.inner.observed.borrow().as_ref().map(|o| o.node.id()),
            )
            .field("refreshing", &self.inner.refreshing.get())
            .finish()
    }
}
