//! Identifier-based backend over an extended shell namespace.
//!
//! A namespace addresses entries with chains of opaque item ids, each segment
//! relative to the folder before it; the empty chain is the namespace root
//! (the desktop). Virtual containers such as "My Computer" are ordinary
//! folders here. Chains are owned values: concatenation and truncation
//! produce new chains and every segment is released when its chain drops.

use std::fmt;

use super::{Attributes, Backend, ChildEntry, RootEntry};
use crate::error::{CoreError, CoreResult};

/// Parsing name of the "My Computer" virtual folder.
pub const MY_COMPUTER_CLSID: &str = "::{20D04FE0-3AEA-1069-A2D8-08002B30309D}";

/// Separator used when joining parsing names into keys.
const KEY_SEPARATOR: char = '\\';

/// One opaque segment of an [`IdChain`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ItemId(Box<[u8]>);

impl ItemId {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A full address in the namespace: item ids from the root down.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IdChain(Vec<ItemId>);

impl IdChain {
    /// The empty chain, naming the namespace root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` for the empty chain.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new chain with `item` appended.
    pub fn join(&self, item: ItemId) -> Self {
        let mut segments = self.0.clone();
        segments.push(item);
        Self(segments)
    }

    /// Returns the chain without its last segment, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    /// Returns the last segment (the id relative to the parent folder).
    pub fn last(&self) -> Option<&ItemId> {
        self.0.last()
    }

    pub fn segments(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the chain's proper and full prefixes, longest first,
    /// stopping before the root.
    fn prefixes(&self) -> impl Iterator<Item = IdChain> + '_ {
        (1..=self.0.len()).rev().map(|n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Debug for IdChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl FromIterator<ItemId> for IdChain {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which name of an item to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Label shown to the user inside its folder.
    Display,
    /// Full parsing name, resolvable from the root (a path for file items).
    Parsing,
    /// Parsing name relative to the containing folder.
    RelativeParsing,
}

/// An identifier-based provider, such as the desktop shell.
pub trait Namespace {
    /// Lists the ids of `folder`'s immediate children, relative to `folder`.
    fn enumerate(&self, folder: &IdChain) -> CoreResult<Vec<ItemId>>;

    /// Returns `true` if `item` is a folder.
    fn is_folder(&self, item: &IdChain) -> CoreResult<bool>;

    /// Returns the requested name of `item`.
    fn display_name(&self, item: &IdChain, style: NameStyle) -> CoreResult<String>;

    /// Resolves a full parsing name back to a chain.
    fn parse_display_name(&self, name: &str) -> CoreResult<IdChain>;
}

/// Adapts a [`Namespace`] to the [`Backend`] contract.
///
/// Keys are the per-segment relative parsing names joined with `\`, so the
/// same item reached through different id chains shares one node as long as
/// the namespace names it the same way.
#[derive(Debug, Clone)]
pub struct NamespaceBackend<N> {
    namespace: N,
}

impl<N: Namespace> NamespaceBackend<N> {
    pub fn new(namespace: N) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &N {
        &self.namespace
    }

    /// Mutable access to the provider, e.g. for in-memory namespaces that
    /// change between refreshes.
    pub fn namespace_mut(&mut self) -> &mut N {
        &mut self.namespace
    }
}

impl<N: Namespace> Backend for NamespaceBackend<N> {
    type Location = IdChain;

    fn root(&self) -> RootEntry<IdChain> {
        let location = IdChain::root();
        let file_name = self
            .namespace
            .display_name(&location, NameStyle::Parsing)
            .unwrap_or_default();
        let display_name = self
            .namespace
            .display_name(&location, NameStyle::Display)
            .unwrap_or_else(|_| file_name.clone());
        RootEntry {
            location,
            attributes: Attributes {
                file_name,
                display_name,
                is_container: true,
            },
        }
    }

    fn parse(&self, input: &str) -> Option<IdChain> {
        if input.is_empty() {
            return Some(IdChain::root());
        }
        match self.namespace.parse_display_name(input) {
            Ok(chain) => Some(chain),
            Err(e) => {
                tracing::debug!("cannot parse namespace name {input:?}: {e}");
                None
            }
        }
    }

    fn is_root(&self, location: &IdChain) -> bool {
        location.is_root()
    }

    fn attributes_of(&self, location: &IdChain) -> CoreResult<Attributes> {
        Ok(Attributes {
            file_name: self.namespace.display_name(location, NameStyle::Parsing)?,
            display_name: self.namespace.display_name(location, NameStyle::Display)?,
            is_container: self.namespace.is_folder(location)?,
        })
    }

    fn enumerate_children(
        &self,
        location: &IdChain,
    ) -> CoreResult<Vec<CoreResult<ChildEntry<IdChain>>>> {
        if !self.namespace.is_folder(location)? {
            return Err(CoreError::NotADirectory(format!("{location:?}")));
        }
        let items = self.namespace.enumerate(location)?;
        Ok(items
            .into_iter()
            .map(|item| {
                let child = location.join(item);
                let attributes = self.attributes_of(&child)?;
                Ok(ChildEntry {
                    location: child,
                    attributes,
                })
            })
            .collect())
    }

    fn parent_of(&self, location: &IdChain) -> Option<IdChain> {
        location.parent()
    }

    fn key_of(&self, location: &IdChain) -> String {
        let mut key = String::new();
        for prefix in location.prefixes() {
            let name = match self.namespace.display_name(&prefix, NameStyle::RelativeParsing) {
                Ok(name) if !name.is_empty() => name,
                _ => continue,
            };
            // A segment whose parsing name already heads the key (drive
            // roots report full paths) contributes nothing new.
            if heads_key(&key, &name) {
                continue;
            }
            if !key.is_empty() && !name.ends_with(KEY_SEPARATOR) {
                key.insert(0, KEY_SEPARATOR);
            }
            key.insert_str(0, &name);
        }
        key
    }

    fn is_browsable(&self, attributes: &Attributes) -> bool {
        if !attributes.is_container {
            return false;
        }
        let is_zip = attributes
            .file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            return false;
        }
        let name = attributes.file_name.as_str();
        (!name.is_empty() && !name.starts_with(':')) || name == MY_COMPUTER_CLSID
    }
}

/// True when `name` is a whole leading segment run of `key`, not merely a
/// string prefix of its first segment.
fn heads_key(key: &str, name: &str) -> bool {
    match key.strip_prefix(name) {
        Some(rest) => {
            rest.is_empty() || name.ends_with(KEY_SEPARATOR) || rest.starts_with(KEY_SEPARATOR)
        }
        None => false,
    }
}
