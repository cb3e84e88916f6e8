//! Preview media lookup.

/// Prebuilt media index and its lazily loaded store.
pub mod index;
/// Index → detail → poster resolution chain.
pub mod resolver;

pub use index::{MediaIndex, MediaIndexStore};
pub use resolver::{DetailSource, IndexSource, MediaRequest, MediaResolver, MediaSource};
