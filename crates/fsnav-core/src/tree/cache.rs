//! The tree-cache context: resolution, reconciliation and refresh.
//!
//! A [`FileSystem`] owns every cached node, the identity map that keeps one
//! node per location, the thumbnail cache and the global refresh version.
//! It is built with [`FileSystem::init`] and released with
//! [`FileSystem::teardown`] (or by dropping it).
//!
//! The context is single-threaded: every operation takes `&mut self` and
//! runs to completion, so exclusive ownership of the context is the only
//! synchronization required.

use std::cmp::Ordering;

use image::DynamicImage;

use super::arena::{Arena, NodeId};
use super::identity::IdentityMap;
use super::node::Node;
use crate::backend::{Attributes, Backend};
use crate::error::CoreResult;
use crate::thumbnail::{decode_thumbnail, ThumbnailCache};

/// What [`FileSystem::teardown`] released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownStats {
    pub nodes: usize,
    pub thumbnails: usize,
}

/// A lazily refreshed, uniquely keyed tree of backend entries.
///
/// # Examples
///
/// ```no_run
/// use fsnav_core::backend::path::PathBackend;
/// use fsnav_core::FileSystem;
///
/// let mut fs: FileSystem<PathBackend> = FileSystem::init(PathBackend::new("/"));
/// let home = fs.resolve_path("/home").unwrap();
/// for &child in fs.children(home).to_vec().iter() {
///     println!("{}", fs.node(child).unwrap().display_name());
/// }
/// fs.refresh();
/// fs.teardown();
/// ```
pub struct FileSystem<B: Backend, I = DynamicImage> {
    backend: B,
    nodes: Arena<Node<B::Location>>,
    identity: IdentityMap,
    thumbnails: ThumbnailCache<I>,
    version: u64,
    root: NodeId,
}

impl<B: Backend, I> FileSystem<B, I> {
    /// Builds the root node and starts at refresh version `1`.
    pub fn init(backend: B) -> Self {
        let root_entry = backend.root();
        let key = backend.key_of(&root_entry.location);

        let mut nodes = Arena::new();
        let mut identity = IdentityMap::new();
        let root = nodes.insert(Node::new(
            key.clone(),
            root_entry.location,
            root_entry.attributes,
            None,
        ));
        identity.register(&key, root);

        tracing::info!("navigation cache initialised at root {key:?}");

        Self {
            backend,
            nodes,
            identity,
            thumbnails: ThumbnailCache::new(),
            version: 1,
            root,
        }
    }

    /// Releases every node and every cached thumbnail.
    pub fn teardown(mut self) -> TeardownStats {
        self.identity.clear();
        let stats = TeardownStats {
            nodes: self.nodes.clear(),
            thumbnails: self.thumbnails.clear(),
        };
        tracing::info!(
            "navigation cache released {} nodes and {} thumbnails",
            stats.nodes,
            stats.thumbnails
        );
        stats
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current global refresh version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Marks every cached child list as outdated.
    ///
    /// Nothing is re-read here; each container is reconciled the next time
    /// its children are requested.
    pub fn refresh(&mut self) {
        self.version += 1;
        tracing::debug!("refresh version is now {}", self.version);
    }

    /// Returns the node behind `id`, or `None` if it has been destroyed.
    pub fn node(&self, id: NodeId) -> Option<&Node<B::Location>> {
        self.nodes.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Looks up a node by canonical key without touching the backend.
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.identity.resolve(key)
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root lives as long as the context. Present to pair
    /// with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend. Changes become visible after
    /// [`FileSystem::refresh`].
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether a picker may descend into the node.
    pub fn is_browsable(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| self.backend.is_browsable(node.attributes()))
    }

    /// Resolves user input (a path or parsing name) to its node.
    ///
    /// The empty string is the root. Returns `None` when the input names
    /// nothing the backend can find.
    pub fn resolve_path(&mut self, path: &str) -> Option<NodeId> {
        match self.backend.parse(path) {
            Some(location) => self.resolve_location(&location),
            None => {
                tracing::debug!("cannot resolve {path:?}: not a backend location");
                None
            }
        }
    }

    /// Resolves a backend location to its node, creating it (and any missing
    /// ancestors) on first sight.
    pub fn resolve_location(&mut self, location: &B::Location) -> Option<NodeId> {
        if self.backend.is_root(location) {
            return Some(self.root);
        }

        let key = self.backend.key_of(location);
        if let Some(id) = self.identity.resolve(&key) {
            return Some(id);
        }

        let Some(parent_location) = self.backend.parent_of(location) else {
            tracing::debug!("cannot resolve {key:?}: no parent location");
            return None;
        };
        let parent = self.resolve_location(&parent_location)?;
        if !self.nodes.get(parent).is_some_and(Node::is_container) {
            tracing::debug!("cannot resolve {key:?}: parent is not a container");
            return None;
        }

        let attributes = match self.backend.attributes_of(location) {
            Ok(attributes) => attributes,
            Err(e) => {
                tracing::debug!("cannot resolve {key:?}: {e}");
                return None;
            }
        };

        let id = self.create_node(key, location.clone(), attributes, parent);
        self.insert_child_sorted(parent, id);
        Some(id)
    }

    /// Returns the node's children, reconciling them with the backend first
    /// if they are outdated.
    ///
    /// Leaf entries and destroyed nodes have no children. A container whose
    /// list is empty is re-read on every call, since an empty list cannot be
    /// told apart from one that was never read.
    pub fn children(&mut self, id: NodeId) -> &[NodeId] {
        let stale = match self.nodes.get(id) {
            Some(node) if node.is_container() => {
                node.children.is_empty() || self.version > node.version
            }
            _ => return &[],
        };
        if stale {
            self.reconcile(id);
        }
        match self.nodes.get(id) {
            Some(node) => node.cached_children(),
            None => &[],
        }
    }

    /// Returns the cached thumbnail for the node's file name.
    pub fn thumbnail(&self, id: NodeId) -> Option<&I> {
        let node = self.nodes.get(id)?;
        self.thumbnails.get(node.file_name())
    }

    /// Stores a thumbnail for the node, replacing any previous one.
    /// Returns `false` if the node no longer exists.
    pub fn set_thumbnail(&mut self, id: NodeId, image: I) -> bool {
        match self.nodes.get(id) {
            Some(node) => {
                self.thumbnails.put(node.file_name(), image);
                true
            }
            None => false,
        }
    }

    pub fn thumbnails(&self) -> &ThumbnailCache<I> {
        &self.thumbnails
    }

    /// Mark, enumerate, re-insert, sweep.
    fn reconcile(&mut self, id: NodeId) {
        let (location, key, previous) = {
            let node = self.node_mut(id);
            (node.location().clone(), node.key().to_string(), node.children.clone())
        };
        for &child in &previous {
            self.node_mut(child).pending_removal = true;
        }

        let listing = match self.backend.enumerate_children(&location) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("cannot list {key:?}: {e}");
                Vec::new()
            }
        };

        let mut created = 0usize;
        for item in listing {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping child of {key:?}: {e}");
                    continue;
                }
            };

            let child_key = self.backend.key_of(&entry.location);
            let child = match self.identity.resolve(&child_key) {
                Some(existing) => {
                    self.revive_child(id, existing, entry.attributes);
                    existing
                }
                None => {
                    created += 1;
                    self.create_node(child_key, entry.location, entry.attributes, id)
                }
            };
            self.insert_child_sorted(id, child);
        }

        let swept = self.sweep(id);

        let version = self.version;
        let node = self.node_mut(id);
        node.version = version;
        tracing::debug!(
            "reconciled {key:?}: {} children, {created} new, {swept} removed",
            node.children.len()
        );
    }

    /// Clears the removal mark of a child seen again in its parent's listing
    /// and takes over its freshly enumerated attributes.
    fn revive_child(&mut self, parent: NodeId, child: NodeId, attributes: Attributes) {
        let node = self.node_mut(child);
        assert_eq!(
            node.parent,
            Some(parent),
            "{:?} was enumerated under a second parent",
            node.key()
        );
        node.pending_removal = false;

        let reorder = node.attributes.display_name != attributes.display_name
            || node.attributes.is_container != attributes.is_container;
        let lost_children = node.attributes.is_container && !attributes.is_container;
        node.attributes = attributes;

        if lost_children {
            let orphans = std::mem::take(&mut node.children);
            for orphan in orphans {
                self.destroy_subtree(orphan);
            }
        }
        if reorder {
            self.node_mut(parent).children.retain(|&c| c != child);
        }
    }

    /// Drops every child still marked for removal. Returns how many nodes
    /// (descendants included) were destroyed.
    fn sweep(&mut self, id: NodeId) -> usize {
        let children = std::mem::take(&mut self.node_mut(id).children);
        let (kept, removed): (Vec<NodeId>, Vec<NodeId>) = children
            .into_iter()
            .partition(|&child| !self.node_ref(child).pending_removal);
        self.node_mut(id).children = kept;

        removed
            .into_iter()
            .map(|child| self.destroy_subtree(child))
            .sum()
    }

    fn create_node(
        &mut self,
        key: String,
        location: B::Location,
        attributes: Attributes,
        parent: NodeId,
    ) -> NodeId {
        tracing::trace!("new node {key:?}");
        let id = self
            .nodes
            .insert(Node::new(key.clone(), location, attributes, Some(parent)));
        self.identity.register(&key, id);
        id
    }

    /// Inserts `child` into `parent`'s children at its natural-order
    /// position, after any equal siblings. A child already present stays put.
    fn insert_child_sorted(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).pending_removal = false;

        let siblings = &self.node_ref(parent).children;
        if siblings.contains(&child) {
            return;
        }
        let new = self.node_ref(child);
        let position =
            siblings.partition_point(|&s| self.node_ref(s).natural_cmp(new) != Ordering::Greater);

        self.node_mut(parent).children.insert(position, child);
    }

    /// Destroys a node and all of its descendants, releasing their locations
    /// and unregistering their keys. Returns the number of nodes destroyed.
    fn destroy_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut destroyed = 0;
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.remove(next) else {
                continue;
            };
            let unregistered = self.identity.unregister(node.key());
            assert_eq!(
                unregistered,
                Some(next),
                "identity map out of sync for {:?}",
                node.key()
            );
            tracing::trace!("dropped node {:?}", node.key());
            stack.extend_from_slice(&node.children);
            destroyed += 1;
        }
        destroyed
    }

    fn node_ref(&self, id: NodeId) -> &Node<B::Location> {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("dangling node id {id:?} in cached tree"))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<B::Location> {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("dangling node id {id:?} in cached tree"))
    }
}

impl<B: Backend> FileSystem<B, DynamicImage> {
    /// Returns the node's thumbnail, decoding it from the file name on a
    /// cache miss.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::NotFound`] for a destroyed node and
    /// [`crate::CoreError::Image`] if decoding fails.
    pub fn load_thumbnail(&mut self, id: NodeId, max_size: u32) -> CoreResult<&DynamicImage> {
        let file_name = self
            .nodes
            .get(id)
            .map(|node| node.file_name().to_string())
            .ok_or_else(|| crate::error::CoreError::NotFound(format!("{id:?}")))?;

        if self.thumbnails.get(&file_name).is_none() {
            let image = decode_thumbnail(std::path::Path::new(&file_name), max_size)?;
            self.thumbnails.put(file_name.clone(), image);
        }
        self.thumbnails
            .get(&file_name)
            .ok_or(crate::error::CoreError::NotFound(file_name))
    }
}
