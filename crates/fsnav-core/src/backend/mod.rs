//! Backend providers that feed the tree cache.
//!
//! The [`Backend`] trait is the single call surface the orchestration in
//! [`crate::tree`] depends on. Two implementations exist:
//!
//! - [`path::PathBackend`] — enumeration-based, over `std::fs`.
//! - [`namespace::NamespaceBackend`] — identifier-based, over any
//!   [`namespace::Namespace`] provider (opaque item-id chains).
//!
//! A cache context is built over exactly one backend; the orchestration never
//! knows which one it is talking to.

use std::fmt::Debug;

use crate::error::CoreResult;

pub mod memory;
pub mod namespace;
pub mod path;

/// What a backend reports about a single location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Backend parsing name: the full path, or the namespace parsing name.
    pub file_name: String,
    /// Human-readable label.
    pub display_name: String,
    /// Whether the entry can have children.
    pub is_container: bool,
}

/// One raw entry produced by [`Backend::enumerate_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry<L> {
    pub location: L,
    pub attributes: Attributes,
}

/// The fixed root of a backend's hierarchy.
#[derive(Debug, Clone)]
pub struct RootEntry<L> {
    pub location: L,
    pub attributes: Attributes,
}

/// A source of locations, names and children for the tree cache.
///
/// Implementations must be deterministic between calls to
/// [`crate::FileSystem::refresh`] for the cache's version gating to be
/// meaningful, but nothing breaks if they are not.
pub trait Backend {
    /// Backend-specific address of an entry. Owned and released by drop.
    type Location: Clone + Debug;

    /// Returns the fixed root. The cache never queries the backend for it.
    fn root(&self) -> RootEntry<Self::Location>;

    /// Turns user input (a path, or a parsing name) into a location.
    ///
    /// Returns `None` when the input cannot name anything in this backend.
    fn parse(&self, input: &str) -> Option<Self::Location>;

    /// Returns `true` if `location` is the fixed root.
    fn is_root(&self, location: &Self::Location) -> bool;

    /// Resolves a location's attributes.
    ///
    /// # Errors
    ///
    /// [`crate::CoreError::NotFound`] if the location no longer exists.
    fn attributes_of(&self, location: &Self::Location) -> CoreResult<Attributes>;

    /// Lists the immediate children of a container, in no particular order.
    ///
    /// The outer error fails the whole listing; an inner error affects only
    /// that child, which the cache skips.
    fn enumerate_children(
        &self,
        location: &Self::Location,
    ) -> CoreResult<Vec<CoreResult<ChildEntry<Self::Location>>>>;

    /// Returns the parent location, or `None` for the root.
    fn parent_of(&self, location: &Self::Location) -> Option<Self::Location>;

    /// Returns the canonical key of a location.
    ///
    /// Two locations naming the same entry must produce equal keys.
    fn key_of(&self, location: &Self::Location) -> String;

    /// Whether a picker should let the user descend into this entry.
    fn is_browsable(&self, attributes: &Attributes) -> bool {
        attributes.is_container
    }
}
