//! In-memory [`Namespace`] provider.
//!
//! Builds a virtual hierarchy of folders and items addressed by opaque id
//! chains. Useful for virtual locations that have no file-system backing,
//! and as a deterministic provider in tests.

use std::collections::HashMap;

use super::namespace::{IdChain, ItemId, NameStyle, Namespace};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone)]
struct MemoryItem {
    relative_name: String,
    display_name: String,
    is_folder: bool,
    children: Vec<ItemId>,
}

/// A mutable, in-memory namespace.
///
/// Item ids are allocated from a counter and never reused, so a removed and
/// re-added item gets a new id chain.
#[derive(Debug, Clone)]
pub struct MemoryNamespace {
    items: HashMap<IdChain, MemoryItem>,
    next_id: u64,
}

impl MemoryNamespace {
    /// Creates a namespace containing only its root folder.
    pub fn new(root_name: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(
            IdChain::root(),
            MemoryItem {
                relative_name: root_name.to_string(),
                display_name: root_name.to_string(),
                is_folder: true,
                children: Vec::new(),
            },
        );
        Self { items, next_id: 1 }
    }

    /// Adds a folder under `parent` and returns its chain.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an existing folder.
    pub fn add_folder(
        &mut self,
        parent: &IdChain,
        relative_name: &str,
        display_name: &str,
    ) -> IdChain {
        self.insert(parent, relative_name, display_name, true)
    }

    /// Adds a non-folder item under `parent` and returns its chain.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an existing folder.
    pub fn add_item(
        &mut self,
        parent: &IdChain,
        relative_name: &str,
        display_name: &str,
    ) -> IdChain {
        self.insert(parent, relative_name, display_name, false)
    }

    /// Removes `item` and everything below it. Returns `false` if it did not exist.
    pub fn remove(&mut self, item: &IdChain) -> bool {
        let Some(removed) = self.items.remove(item) else {
            return false;
        };
        for child in removed.children {
            self.remove(&item.join(child));
        }
        if let (Some(parent), Some(last)) = (item.parent(), item.last()) {
            if let Some(folder) = self.items.get_mut(&parent) {
                folder.children.retain(|id| id != last);
            }
        }
        true
    }

    /// Changes the display name of `item`. Returns `false` if it does not exist.
    pub fn rename(&mut self, item: &IdChain, display_name: &str) -> bool {
        match self.items.get_mut(item) {
            Some(entry) => {
                entry.display_name = display_name.to_string();
                true
            }
            None => false,
        }
    }

    /// Number of items, the root included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn insert(
        &mut self,
        parent: &IdChain,
        relative_name: &str,
        display_name: &str,
        is_folder: bool,
    ) -> IdChain {
        let id = ItemId::new(self.next_id.to_le_bytes().to_vec());
        self.next_id += 1;

        let folder = self
            .items
            .get_mut(parent)
            .filter(|item| item.is_folder)
            .unwrap_or_else(|| panic!("{parent:?} is not a folder"));
        folder.children.push(id.clone());

        let chain = parent.join(id);
        self.items.insert(
            chain.clone(),
            MemoryItem {
                relative_name: relative_name.to_string(),
                display_name: display_name.to_string(),
                is_folder,
                children: Vec::new(),
            },
        );
        chain
    }

    fn get(&self, item: &IdChain) -> CoreResult<&MemoryItem> {
        self.items
            .get(item)
            .ok_or_else(|| CoreError::NotFound(format!("{item:?}")))
    }

    /// Joins relative names from the first segment down. The root's own name
    /// is not part of its descendants' parsing names.
    fn parsing_name(&self, item: &IdChain) -> CoreResult<String> {
        if item.is_root() {
            return Ok(self.get(item)?.relative_name.clone());
        }
        let mut name = String::new();
        let mut prefix = IdChain::root();
        for segment in item.segments() {
            prefix = prefix.join(segment.clone());
            let relative = &self.get(&prefix)?.relative_name;
            if !name.is_empty() && !name.ends_with('\\') {
                name.push('\\');
            }
            name.push_str(relative);
        }
        Ok(name)
    }
}

impl Namespace for MemoryNamespace {
    fn enumerate(&self, folder: &IdChain) -> CoreResult<Vec<ItemId>> {
        let item = self.get(folder)?;
        if !item.is_folder {
            return Err(CoreError::NotADirectory(format!("{folder:?}")));
        }
        Ok(item.children.clone())
    }

    fn is_folder(&self, item: &IdChain) -> CoreResult<bool> {
        Ok(self.get(item)?.is_folder)
    }

    fn display_name(&self, item: &IdChain, style: NameStyle) -> CoreResult<String> {
        match style {
            NameStyle::Display => Ok(self.get(item)?.display_name.clone()),
            NameStyle::RelativeParsing => Ok(self.get(item)?.relative_name.clone()),
            NameStyle::Parsing => self.parsing_name(item),
        }
    }

    fn parse_display_name(&self, name: &str) -> CoreResult<IdChain> {
        self.items
            .keys()
            .filter(|chain| !chain.is_root())
            .find(|chain| {
                self.parsing_name(chain)
                    .is_ok_and(|candidate| candidate.eq_ignore_ascii_case(name))
            })
            .cloned()
            .ok_or_else(|| CoreError::InvalidLocation(name.to_string()))
    }
}
