//! A single cached entry.

use std::cmp::Ordering;

use super::arena::NodeId;
use crate::backend::Attributes;
use crate::nav::natural;

/// One location in the cached tree.
///
/// Nodes are created and destroyed only by [`super::FileSystem`]; callers
/// read them through [`super::FileSystem::node`]. The key never changes
/// after creation.
#[derive(Debug)]
pub struct Node<L> {
    key: String,
    location: L,
    pub(crate) attributes: Attributes,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) version: u64,
    pub(crate) pending_removal: bool,
}

impl<L> Node<L> {
    /// New nodes start at version `0`, older than any refresh generation.
    pub(crate) fn new(
        key: String,
        location: L,
        attributes: Attributes,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            key,
            location,
            attributes,
            parent,
            children: Vec::new(),
            version: 0,
            pending_removal: false,
        }
    }

    /// Canonical identity of this entry.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backend-specific address.
    pub fn location(&self) -> &L {
        &self.location
    }

    /// Backend parsing name (full path for file-system entries).
    pub fn file_name(&self) -> &str {
        &self.attributes.file_name
    }

    pub fn display_name(&self) -> &str {
        &self.attributes.display_name
    }

    pub fn is_container(&self) -> bool {
        self.attributes.is_container
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Parent node, `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children as of the last reconciliation, without refreshing.
    ///
    /// Use [`super::FileSystem::children`] to get an up-to-date list.
    pub fn cached_children(&self) -> &[NodeId] {
        &self.children
    }

    /// Refresh generation at which the children were last synchronized.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` if the file name's extension is one of the
    /// comma-separated `extensions` (case-insensitive, without dots).
    pub fn has_extension(&self, extensions: &str) -> bool {
        let name = self.file_name();
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let Some((_, ext)) = base.rsplit_once('.') else {
            return false;
        };
        !ext.is_empty()
            && extensions
                .split(',')
                .map(str::trim)
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }

    /// Natural ordering used for sibling lists.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        natural::compare(
            self.is_container(),
            self.display_name(),
            other.is_container(),
            other.display_name(),
        )
    }
}
