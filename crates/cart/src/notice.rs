//! User-facing notifications for failed cart operations.
//!
//! Only failures are announced; successful changes are visible through the
//! cart itself. The mapping from error to notice is coarse: a
//! stock rejection gets its own message, every other failure gets the
//! generic message of the operation that failed.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::store::CartError;

/// The cart operation that produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

/// A transient message shown to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    /// Notice for a failed operation.
    #[must_use]
    pub const fn for_failure(operation: Operation, error: &CartError) -> Self {
        if error.is_out_of_stock() {
            return Self::OutOfStock;
        }
        match operation {
            Operation::AddProduct => Self::AddFailed,
            Operation::RemoveProduct => Self::RemoveFailed,
            Operation::UpdateProductAmount => Self::UpdateFailed,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices in order for later display.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices recorded so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded notices.
    #[must_use]
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut notices| std::mem::take(&mut *notices))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
