//! Persistent GUI state module.
//!
//! A threshold slider and an invert checkbox whose values live in the
//! module's parameter store, so they survive leaving the module and are
//! saved with the scene.

use crate::{ModuleInfo, ModuleView, ModuleWidget, NodeHandle, Options, ParameterStore};

/// Store key of the slider value.
pub const THRESHOLD_KEY: &str = "ThresholdValue";

/// Store key of the checkbox value, `"True"` or `"False"`.
pub const INVERT_KEY: &str = "InvertValue";

const INITIALIZING_TEXT: &str = "Current State: Initializing...";

/// Formats a float the way it is stored: always with a fractional part.
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

/// Formats a flag the way it is stored.
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Fills in the stored defaults.
#[derive(Debug, Clone, Copy)]
pub struct PersistentGuiStateLogic {
    default_threshold: f64,
    default_invert: bool,
}

impl PersistentGuiStateLogic {
    /// Creates the logic with the configured defaults.
    pub fn new(options: &Options) -> Self {
        Self {
            default_threshold: options.default_threshold,
            default_invert: options.default_invert,
        }
    }

    /// Writes the default threshold and invert flag where they are missing.
    pub fn set_default_parameters(&self, store: &ParameterStore) {
        if !store.has_parameter(THRESHOLD_KEY) {
            store.set_parameter(THRESHOLD_KEY, format_float(self.default_threshold));
        }
        if !store.has_parameter(INVERT_KEY) {
            store.set_parameter(INVERT_KEY, format_bool(self.default_invert));
        }
    }
}

/// Controls of the persistent GUI state module.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistentGuiStateView {
    options: Options,
    /// Slider value, always inside the configured range.
    pub threshold: f64,
    /// Checkbox state.
    pub invert: bool,
    pub status_label: String,
}

impl PersistentGuiStateView {
    fn refresh_status(&mut self) {
        self.status_label = format!(
            "Current Values: Slider={}, Invert={}",
            format_float(self.threshold),
            format_bool(self.invert)
        );
    }
}

impl ModuleView for PersistentGuiStateView {
    const INFO: ModuleInfo = ModuleInfo {
        name: "PersistentGuiState",
        title: "Persistent GUI State",
        category: "Examples",
        contributors: &["scenekit-rs contributors"],
        help_text: "Keeps a slider and a checkbox in sync with a persisted parameter store.",
        acknowledgement: "Teaching example for parameter persistence.",
    };

    fn new(options: &Options) -> Self {
        Self {
            threshold: options.clamp_threshold(options.default_threshold),
            invert: options.default_invert,
            status_label: INITIALIZING_TEXT.to_string(),
            options: options.clone(),
        }
    }

    fn apply_defaults(&self, store: &ParameterStore) {
        PersistentGuiStateLogic::new(&self.options).set_default_parameters(store);
    }

    fn update_from_store(&mut self, store: &ParameterStore, _node: Option<&NodeHandle>) {
        match store.parameter_as::<f64>(THRESHOLD_KEY) {
            Ok(Some(value)) => self.threshold = self.options.clamp_threshold(value),
            Ok(None) => {}
            Err(err) => log::warn!("ignoring stored threshold: {err}"),
        }
        if let Some(invert) = store.parameter(INVERT_KEY).filter(|v| !v.is_empty()) {
            self.invert = invert == "True";
        }
        self.refresh_status();
    }

    fn write_to_store(&self, store: &ParameterStore) {
        store.set_parameter(THRESHOLD_KEY, format_float(self.threshold));
        store.set_parameter(INVERT_KEY, format_bool(self.invert));
    }

    fn clear(&mut self) {
        let options = self.options.clone();
        *self = Self::new(&options);
    }
}

/// Widget of the persistent GUI state module.
pub type PersistentGuiStateWidget = ModuleWidget<PersistentGuiStateView>;

impl ModuleWidget<PersistentGuiStateView> {
    /// Handles the slider. The value is clamped to the slider range.
    pub fn set_threshold(&self, value: f64) {
        self.bridge().edit_view(|view| {
            view.threshold = view.options.clamp_threshold(value);
        });
    }

    /// Handles the checkbox.
    pub fn set_invert(&self, invert: bool) {
        self.bridge().edit_view(|view| view.invert = invert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Scene};

    #[test]
    fn test_format() {
        assert_eq!(format_float(50.0), "50.0");
        assert_eq!(format_float(12.5), "12.5");
        assert_eq!(format_bool(true), "True");
        assert_eq!(format_bool(false), "False");
    }

    #[test]
    fn test_set_default_parameters() {
        let scene = Scene::new();
        let store = scene.parameter_store("PersistentGuiState");
        let logic = PersistentGuiStateLogic::new(&Options::default());

        logic.set_default_parameters(&store);
        assert_eq!(store.parameter(THRESHOLD_KEY).as_deref(), Some("50.0"));
        assert_eq!(store.parameter(INVERT_KEY).as_deref(), Some("False"));

        store.set_parameter(THRESHOLD_KEY, "12.0");
        logic.set_default_parameters(&store);
        assert_eq!(store.parameter(THRESHOLD_KEY).as_deref(), Some("12.0"));
    }

    #[test]
    fn test_widget_round_trip() {
        let context = Context::new();
        let widget = PersistentGuiStateWidget::new(&context);
        assert_eq!(widget.view().status_label, "Current State: Initializing...");

        widget.enter().unwrap();
        assert_eq!(
            widget.view().status_label,
            "Current Values: Slider=50.0, Invert=False"
        );

        widget.set_threshold(72.5);
        widget.set_invert(true);

        let store = context.scene().parameter_store("PersistentGuiState");
        assert_eq!(store.parameter(THRESHOLD_KEY).as_deref(), Some("72.5"));
        assert_eq!(store.parameter(INVERT_KEY).as_deref(), Some("True"));
        assert_eq!(
            widget.view().status_label,
            "Current Values: Slider=72.5, Invert=True"
        );
    }

    #[test]
    fn test_values_survive_exit_and_enter() {
        let context = Context::new();
        let widget = PersistentGuiStateWidget::new(&context);
        widget.enter().unwrap();
        widget.set_threshold(20.0);
        widget.exit();

        let store = context.scene().parameter_store("PersistentGuiState");
        store.set_parameter(THRESHOLD_KEY, "30.0");
        assert_eq!(widget.view().threshold, 20.0);

        widget.enter().unwrap();
        assert_eq!(widget.view().threshold, 30.0);
    }

    #[test]
    fn test_out_of_range_and_garbage_values() {
        let context = Context::new();
        let widget = PersistentGuiStateWidget::new(&context);
        widget.enter().unwrap();

        widget.set_threshold(250.0);
        assert_eq!(widget.view().threshold, 100.0);

        let store = context.scene().parameter_store("PersistentGuiState");
        store.set_parameter(THRESHOLD_KEY, "-4");
        assert_eq!(widget.view().threshold, 0.0);

        store.set_parameter(THRESHOLD_KEY, "abc");
        assert_eq!(widget.view().threshold, 0.0);
        assert!(widget.view().status_label.contains("Slider=0.0"));
    }
}
