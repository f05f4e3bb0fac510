//! fsnav core library — a navigation cache for file pickers.
//!
//! `fsnav-core` keeps one canonical, lazily refreshed tree of file-system
//! entries so that a picker can browse folders without re-reading unchanged
//! directories on every repaint. It is UI-agnostic and single-threaded.
//!
//! # Modules
//!
//! - [`tree`] — the cache context ([`FileSystem`]), nodes and the identity map.
//! - [`backend`] — the [`Backend`] trait and its path and namespace providers.
//! - [`nav`] — natural, folder-first ordering of entries.
//! - [`thumbnail`] — decoded preview images keyed by file name.
//! - [`config`] — TOML-based settings.
//! - [`error`] — unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod backend;
pub mod config;
pub mod error;
pub mod nav;
pub mod thumbnail;
pub mod tree;

pub use backend::memory::MemoryNamespace;
pub use backend::namespace::{IdChain, ItemId, NameStyle, Namespace, NamespaceBackend};
pub use backend::path::PathBackend;
pub use backend::{Attributes, Backend, ChildEntry, RootEntry};
pub use config::settings::Config;
pub use error::{CoreError, CoreResult};
pub use nav::natural::{compare, compare_names, sort_names};
pub use thumbnail::{decode_thumbnail, ThumbnailCache};
pub use tree::{FileSystem, IdentityMap, Node, NodeId, TeardownStats};
