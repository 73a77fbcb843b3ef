//! Per-document context shared by all module widgets.

use std::rc::Rc;

use crate::{Notices, Options, Scene};

/// Everything a module widget needs from its host: the open scene, the
/// notice log and the configuration.
///
/// Cloning is cheap and every clone refers to the same scene and log.
#[derive(Clone, Debug, Default)]
pub struct Context {
    scene: Scene,
    notices: Notices,
    options: Rc<Options>,
}

impl Context {
    /// Creates a context with an empty scene and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with an empty scene and the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options: Rc::new(options),
            ..Self::default()
        }
    }

    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the notice log.
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Returns the options.
    pub fn options(&self) -> &Options {
        &self.options
    }
}
