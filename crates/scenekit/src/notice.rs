//! User-facing notices.
//!
//! Operations triggered from a widget never panic or leave the view half
//! updated. Failures are turned into [`Notice`]s the user can dismiss.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Result;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational message, e.g. "nothing to reset".
    Info,
    /// An operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short message shown to the user.
    pub message: String,
    /// Error text of the underlying failure, if any.
    pub detail: Option<String>,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}\n\n{}", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

/// Shared log of notices waiting to be dismissed.
#[derive(Clone, Default)]
pub struct Notices {
    inner: Rc<RefCell<Vec<Notice>>>,
}

impl Notices {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an informational notice.
    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{message}");
        self.push(Notice {
            level: NoticeLevel::Info,
            message,
            detail: None,
        });
    }

    /// Records an error notice.
    pub fn error(&self, message: impl Into<String>, detail: Option<String>) {
        let message = message.into();
        match &detail {
            Some(detail) => log::error!("{message}: {detail}"),
            None => log::error!("{message}"),
        }
        self.push(Notice {
            level: NoticeLevel::Error,
            message,
            detail,
        });
    }

    fn push(&self, notice: Notice) {
        self.inner.borrow_mut().push(notice);
    }

    /// Runs `f`; on failure records an error notice with `message` and
    /// returns `None`.
    pub fn try_with_error_display<T>(
        &self,
        message: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Option<T> {
        match f() {
            Ok(value) => Some(value),
            Err(err) => {
                self.error(message, Some(err.to_string()));
                None
            }
        }
    }

    /// Returns a copy of the pending notices.
    pub fn pending(&self) -> Vec<Notice> {
        self.inner.borrow().clone()
    }

    /// Returns the most recent notice.
    pub fn last(&self) -> Option<Notice> {
        self.inner.borrow().last().cloned()
    }

    /// Dismisses every pending notice and returns them.
    pub fn dismiss_all(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    /// Returns the number of pending notices.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl fmt::Debug for Notices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().iter()).finish()
    }
}
