//! The canonical tree of cached entries.
//!
//! - [`cache::FileSystem`] — the context object: root, identity map,
//!   thumbnails and the global refresh version.
//! - [`node::Node`] — one cached entry.
//! - [`identity::IdentityMap`] — canonical key → node index.
//! - [`arena::NodeId`] — generational handle to a node.

pub mod arena;
pub mod cache;
pub mod identity;
pub mod node;

pub use arena::NodeId;
pub use cache::{FileSystem, TeardownStats};
pub use identity::IdentityMap;
pub use node::Node;
