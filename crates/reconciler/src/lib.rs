mod effective_ranges;
mod error;
mod reconcile;

pub use effective_ranges::{CarriedForward, PinnedDependency, PinnedWildcards};
pub use error::ReconcileError;
pub use reconcile::{Reconcile, ReconcileReport};
