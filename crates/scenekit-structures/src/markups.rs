//! Markups fiducial node: an ordered list of control points.

use std::any::Any;

use glam::DVec3;
use scenekit_core::{Node, NodeKind};

/// An ordered list of control points with a lock flag.
#[derive(Debug, Clone)]
pub struct MarkupsFiducial {
    name: String,
    points: Vec<DVec3>,
    locked: bool,
    selected_color: DVec3,
}

impl MarkupsFiducial {
    /// Creates an empty, unlocked fiducial list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            locked: false,
            selected_color: DVec3::new(1.0, 0.5, 0.5),
        }
    }

    /// Creates a fiducial list with the given points.
    pub fn with_points(name: impl Into<String>, points: Vec<DVec3>) -> Self {
        Self {
            points,
            ..Self::new(name)
        }
    }

    /// Returns the number of control points.
    #[must_use]
    pub fn num_control_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the control points.
    #[must_use]
    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the position of the `index`-th control point.
    #[must_use]
    pub fn control_point(&self, index: usize) -> Option<DVec3> {
        self.points.get(index).copied()
    }

    /// Moves the `index`-th control point. Returns `false` if out of range.
    pub fn set_control_point(&mut self, index: usize, position: DVec3) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }

    /// Appends a control point and returns its index.
    pub fn add_control_point(&mut self, position: DVec3) -> usize {
        self.points.push(position);
        self.points.len() - 1
    }

    /// Removes every control point. Returns how many were removed.
    pub fn remove_all_control_points(&mut self) -> usize {
        let removed = self.points.len();
        self.points.clear();
        removed
    }

    /// Returns whether points are locked against interactive editing.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Sets the lock flag.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Returns the color used for selected points.
    #[must_use]
    pub fn selected_color(&self) -> DVec3 {
        self.selected_color
    }

    /// Sets the color used for selected points.
    pub fn set_selected_color(&mut self, color: DVec3) {
        self.selected_color = color;
    }
}

impl Node for MarkupsFiducial {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Markups
    }

    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        crate::bounds_of(&self.points)
    }
}
