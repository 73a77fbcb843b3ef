//! Module lifecycle.
//!
//! A [`ModuleWidget`] owns an [`ObserverBridge`] and ties it to the module's
//! singleton parameter store as the module is entered and left, and as the
//! scene is closed underneath it.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{Context, EventKind, ModuleView, ObserverBridge, Result, SubscriptionId};

/// Static description of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module name; also the name of its parameter store.
    pub name: &'static str,
    /// Human readable title.
    pub title: &'static str,
    /// Menu category.
    pub category: &'static str,
    /// Authors.
    pub contributors: &'static [&'static str],
    /// Short description shown in the module panel.
    pub help_text: &'static str,
    /// Acknowledgement text.
    pub acknowledgement: &'static str,
}

/// Returns the description of every module in this crate.
pub fn module_catalog() -> [ModuleInfo; 5] {
    [
        crate::FiducialGeneratorView::INFO,
        crate::NodeInspectorView::INFO,
        crate::LandmarkMonitorView::INFO,
        crate::PersistentGuiStateView::INFO,
        crate::SurfaceMeasurementView::INFO,
    ]
}

/// One module's user interface and its store wiring.
///
/// Created with [`ModuleWidget::new`], which also subscribes to the scene's
/// close events. [`ModuleWidget::enter`] attaches the module's singleton
/// store, [`ModuleWidget::exit`] stops observing, and
/// [`ModuleWidget::cleanup`] (or dropping the widget) removes every
/// subscription.
///
/// While the scene closes the store is detached. Once closing ends a fresh
/// store is attached if the module is entered.
pub struct ModuleWidget<V: ModuleView> {
    context: Context,
    bridge: ObserverBridge<V>,
    entered: Rc<Cell<bool>>,
    scene_subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl<V: ModuleView> ModuleWidget<V> {
    /// Creates the widget and subscribes to the scene's close events.
    pub fn new(context: &Context) -> Self {
        let view = V::new(context.options());
        let widget = Self {
            context: context.clone(),
            bridge: ObserverBridge::new(context.scene().clone(), view),
            entered: Rc::new(Cell::new(false)),
            scene_subscriptions: RefCell::new(Vec::new()),
        };
        widget.setup();
        widget
    }

    fn setup(&self) {
        let events = self.context.scene().events();

        let bridge = self.bridge.downgrade();
        let start = events.subscribe(EventKind::StartClose, move |_| {
            if let Some(bridge) = bridge.upgrade() {
                log::debug!("{}: scene closing, detaching store", V::INFO.name);
                if let Err(err) = bridge.attach(None) {
                    log::warn!("{}: {err}", V::INFO.name);
                }
            }
        });

        let bridge = self.bridge.downgrade();
        let entered = Rc::clone(&self.entered);
        let end = events.subscribe(EventKind::EndClose, move |_| {
            let Some(bridge) = bridge.upgrade() else {
                return;
            };
            if entered.get() {
                let store = bridge.scene().parameter_store(V::INFO.name);
                match bridge.attach(Some(store)) {
                    Ok(()) => bridge.initialize(),
                    Err(err) => log::warn!("{}: {err}", V::INFO.name),
                }
            }
        });

        self.scene_subscriptions.borrow_mut().extend([start, end]);
    }

    /// Returns the module description.
    pub fn info(&self) -> ModuleInfo {
        V::INFO
    }

    /// Returns the context the widget was created in.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the bridge between the view and the store.
    pub fn bridge(&self) -> &ObserverBridge<V> {
        &self.bridge
    }

    /// Borrows the view.
    pub fn view(&self) -> Ref<'_, V> {
        self.bridge.view()
    }

    /// Returns whether the module is entered.
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }

    /// Called each time the user opens the module.
    ///
    /// Attaches the module's singleton store, filling in defaults and scene
    /// dependent parameters, and renders the view.
    pub fn enter(&self) -> Result<()> {
        log::info!("entering module {}", V::INFO.name);
        self.entered.set(true);
        let store = self.context.scene().parameter_store(V::INFO.name);
        self.bridge.attach(Some(store))?;
        self.bridge.initialize();
        Ok(())
    }

    /// Called each time the user leaves the module.
    ///
    /// Stops reacting to the store and the observed node. The view keeps
    /// showing the last state.
    pub fn exit(&self) {
        log::info!("leaving module {}", V::INFO.name);
        self.entered.set(false);
        self.bridge.suspend();
    }

    /// Removes every subscription the widget made.
    pub fn cleanup(&self) {
        let events = self.context.scene().events();
        for id in self.scene_subscriptions.borrow_mut().drain(..) {
            events.unsubscribe(id);
        }
        self.entered.set(false);
        if let Err(err) = self.bridge.attach(None) {
            log::warn!("{}: {err}", V::INFO.name);
        }
    }
}

impl<V: ModuleView> Drop for ModuleWidget<V> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl<V: ModuleView> fmt::Debug for ModuleWidget<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleWidget")
            .field("module", &V::INFO.name)
            .field("entered", &self.entered.get())
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
