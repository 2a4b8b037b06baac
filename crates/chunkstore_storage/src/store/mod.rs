//! Capability traits.
//!
//! A backend implements any combination of [`ReadableStore`],
//! [`ListableStore`] and [`WriteableStore`]. Each trait asks for one or two
//! primitives and derives the rest of its operations from them.

pub mod compose;
mod listable;
mod readable;
mod writeable;

pub use listable::{partition_children, ListableStore};
pub use readable::ReadableStore;
pub use writeable::WriteableStore;

use crate::types::Capabilities;

/// Runtime query for the capabilities a store implements.
pub trait StoreCapabilities {
    /// Returns the capabilities this store implements.
    fn capabilities(&self) -> Capabilities;
}

/// A store with all three capabilities.
///
/// Implemented automatically for every type that has them.
pub trait Store: ReadableStore + ListableStore + WriteableStore {}

impl<T> Store for T where T: ReadableStore + ListableStore + WriteableStore + ?Sized {}
