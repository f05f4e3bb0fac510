//! Enumeration-based backend over the local file system.

use std::path::{Component, Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

use super::{Attributes, Backend, ChildEntry, RootEntry};
use crate::config::settings::Config;
use crate::error::{CoreError, CoreResult};

/// Reads directories with `std::fs`.
///
/// Locations are absolute, lexically normalized paths under the configured
/// root. Keys use `/` as separator, carry no trailing separator, and are
/// lower-cased when the backend is case-insensitive.
///
/// # Examples
///
/// ```no_run
/// use fsnav_core::backend::path::PathBackend;
/// use fsnav_core::backend::Backend;
///
/// let backend = PathBackend::new("/").with_case_sensitive(false);
/// let a = backend.parse("/Home/User/").unwrap();
/// let b = backend.parse("/home/user").unwrap();
/// assert_eq!(backend.key_of(&a), backend.key_of(&b));
/// ```
#[derive(Debug, Clone)]
pub struct PathBackend {
    root: PathBuf,
    case_sensitive: bool,
    show_hidden: bool,
}

impl PathBackend {
    /// Creates a backend rooted at `root` with platform-default case folding.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = Config::default();
        Self {
            root: normalize(&root.into()),
            case_sensitive: defaults.backend.case_sensitive,
            show_hidden: defaults.general.show_hidden,
        }
    }

    /// Creates a backend from the `[backend]` and `[general]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: normalize(Path::new(&config.backend.root)),
            case_sensitive: config.backend.case_sensitive,
            show_hidden: config.general.show_hidden,
        }
    }

    /// Returns a backend that keeps (`true`) or folds (`false`) key case.
    pub fn with_case_sensitive(self, case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..self
        }
    }

    /// Returns a backend that lists (`true`) or skips (`false`) dot-files.
    pub fn with_show_hidden(self, show_hidden: bool) -> Self {
        Self {
            show_hidden,
            ..self
        }
    }

    /// Returns the root directory.
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn display_name_of(path: &Path) -> String {
        match path.file_name() {
            Some(name) => name.to_string_lossy().nfc().collect(),
            None => path.to_string_lossy().into_owned(),
        }
    }

    /// Hidden entries are invisible to resolution as well as to listings,
    /// except the root itself.
    fn is_hidden(&self, path: &Path) -> bool {
        !self.show_hidden
            && !self.is_root(&path.to_path_buf())
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'))
    }

    fn child_entry(&self, dir_entry: std::fs::DirEntry) -> CoreResult<ChildEntry<PathBuf>> {
        let path = dir_entry.path();
        let metadata = std::fs::metadata(&path).map_err(|e| CoreError::from_io(&path, e))?;
        Ok(ChildEntry {
            attributes: Attributes {
                file_name: path.to_string_lossy().into_owned(),
                display_name: Self::display_name_of(&path),
                is_container: metadata.is_dir(),
            },
            location: path,
        })
    }
}

impl Backend for PathBackend {
    type Location = PathBuf;

    fn root(&self) -> RootEntry<PathBuf> {
        let name = self.root.to_string_lossy().into_owned();
        RootEntry {
            location: self.root.clone(),
            attributes: Attributes {
                file_name: name.clone(),
                display_name: name,
                is_container: true,
            },
        }
    }

    fn parse(&self, input: &str) -> Option<PathBuf> {
        if input.is_empty() {
            return Some(self.root.clone());
        }
        let path = Path::new(input);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(path)
        };
        let normalized = normalize(&absolute);
        normalized.starts_with(&self.root).then_some(normalized)
    }

    fn is_root(&self, location: &PathBuf) -> bool {
        self.key_of(location) == self.key_of(&self.root)
    }

    fn attributes_of(&self, location: &PathBuf) -> CoreResult<Attributes> {
        if self.is_hidden(location) {
            return Err(CoreError::NotFound(location.display().to_string()));
        }
        let metadata =
            std::fs::metadata(location).map_err(|e| CoreError::from_io(location, e))?;
        Ok(Attributes {
            file_name: location.to_string_lossy().into_owned(),
            display_name: Self::display_name_of(location),
            is_container: metadata.is_dir(),
        })
    }

    fn enumerate_children(
        &self,
        location: &PathBuf,
    ) -> CoreResult<Vec<CoreResult<ChildEntry<PathBuf>>>> {
        if !location.is_dir() {
            if location.exists() {
                return Err(CoreError::NotADirectory(location.display().to_string()));
            }
            return Err(CoreError::NotFound(location.display().to_string()));
        }

        let read_dir = std::fs::read_dir(location).map_err(|e| CoreError::from_io(location, e))?;

        let mut children = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    children.push(Err(CoreError::Io(e)));
                    continue;
                }
            };
            let name = dir_entry.file_name();
            let name = name.to_string_lossy();
            if name == "." || name == ".." {
                continue;
            }
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            children.push(self.child_entry(dir_entry));
        }

        Ok(children)
    }

    fn parent_of(&self, location: &PathBuf) -> Option<PathBuf> {
        if self.is_root(location) {
            return None;
        }
        location
            .parent()
            .filter(|parent| parent.starts_with(&self.root))
            .map(Path::to_path_buf)
    }

    fn key_of(&self, location: &PathBuf) -> String {
        let mut key = location.to_string_lossy().replace('\\', "/");
        while key.len() > 1 && key.ends_with('/') && !is_drive_root(&key) {
            key.pop();
        }
        if self.case_sensitive {
            key
        } else {
            key.to_lowercase()
        }
    }
}

/// `C:/` keeps its separator; it is a root, not a directory with a trailing slash.
fn is_drive_root(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Resolves `.` and `..` lexically without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBackend) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("readme.md"), "hi").unwrap();
        fs::write(tmp.path().join(".hidden"), "x").unwrap();
        let backend = PathBackend::new(tmp.path()).with_case_sensitive(true);
        (tmp, backend)
    }

    fn names(children: &[CoreResult<ChildEntry<PathBuf>>]) -> Vec<String> {
        let mut names: Vec<String> = children
            .iter()
            .filter_map(|c| c.as_ref().ok())
            .map(|c| c.attributes.display_name.clone())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn root_is_a_container_named_after_its_path() {
        let (tmp, backend) = setup();
        let root = backend.root();
        assert!(root.attributes.is_container);
        assert_eq!(root.location, tmp.path());
        assert!(backend.is_root(&root.location));
        assert!(backend.parent_of(&root.location).is_none());
    }

    #[test]
    fn enumerate_skips_hidden_by_default() {
        let (tmp, backend) = setup();
        let children = backend.enumerate_children(&tmp.path().to_path_buf()).unwrap();
        assert_eq!(names(&children), vec!["docs", "readme.md"]);
    }

    #[test]
    fn enumerate_lists_hidden_when_enabled() {
        let (tmp, backend) = setup();
        let backend = backend.with_show_hidden(true);
        let children = backend.enumerate_children(&tmp.path().to_path_buf()).unwrap();
        assert_eq!(names(&children), vec![".hidden", "docs", "readme.md"]);
    }

    #[test]
    fn enumerate_reports_container_flag() {
        let (tmp, backend) = setup();
        let children = backend.enumerate_children(&tmp.path().to_path_buf()).unwrap();
        let docs = children
            .iter()
            .filter_map(|c| c.as_ref().ok())
            .find(|c| c.attributes.display_name == "docs")
            .unwrap();
        assert!(docs.attributes.is_container);
        assert_eq!(docs.location, tmp.path().join("docs"));
    }

    #[test]
    fn enumerate_missing_directory_is_not_found() {
        let (tmp, backend) = setup();
        let err = backend
            .enumerate_children(&tmp.path().join("gone"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn enumerate_file_is_not_a_directory() {
        let (tmp, backend) = setup();
        let err = backend
            .enumerate_children(&tmp.path().join("readme.md"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn attributes_of_missing_path_is_not_found() {
        let (tmp, backend) = setup();
        let err = backend.attributes_of(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn attributes_of_hidden_entry_follows_show_hidden() {
        let (tmp, backend) = setup();
        let hidden = tmp.path().join(".hidden");
        assert!(backend.attributes_of(&hidden).unwrap_err().is_not_found());

        let backend = backend.with_show_hidden(true);
        assert_eq!(backend.attributes_of(&hidden).unwrap().display_name, ".hidden");
    }

    #[test]
    fn hidden_root_is_still_visible() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".store");
        fs::create_dir(&root).unwrap();
        let backend = PathBackend::new(&root).with_case_sensitive(true);
        assert!(backend.attributes_of(&root).unwrap().is_container);
    }

    #[test]
    fn attributes_of_file() {
        let (tmp, backend) = setup();
        let attrs = backend.attributes_of(&tmp.path().join("readme.md")).unwrap();
        assert_eq!(attrs.display_name, "readme.md");
        assert!(!attrs.is_container);
        assert!(attrs.file_name.ends_with("readme.md"));
    }

    #[test]
    fn parse_normalizes_dots_and_trailing_separator() {
        let (tmp, backend) = setup();
        let input = format!("{}/docs/../docs/./", tmp.path().display());
        let parsed = backend.parse(&input).unwrap();
        assert_eq!(parsed, tmp.path().join("docs"));
    }

    #[test]
    fn parse_empty_is_root() {
        let (tmp, backend) = setup();
        assert_eq!(backend.parse("").unwrap(), tmp.path());
    }

    #[test]
    fn parse_outside_root_is_rejected() {
        let (_tmp, backend) = setup();
        let other = TempDir::new().unwrap();
        assert!(backend.parse(&other.path().display().to_string()).is_none());
    }

    #[test]
    fn parent_of_child_is_root() {
        let (tmp, backend) = setup();
        let parent = backend.parent_of(&tmp.path().join("docs")).unwrap();
        assert!(backend.is_root(&parent));
    }

    #[test]
    fn key_strips_trailing_separator_and_normalizes() {
        let backend = PathBackend::new("/").with_case_sensitive(true);
        assert_eq!(backend.key_of(&PathBuf::from("/a/b/")), "/a/b");
        assert_eq!(backend.key_of(&PathBuf::from("/")), "/");
        assert_eq!(backend.key_of(&PathBuf::from("C:\\Dir\\")), "C:/Dir");
        assert_eq!(backend.key_of(&PathBuf::from("C:\\")), "C:/");
    }

    #[test]
    fn key_folds_case_when_insensitive() {
        let backend = PathBackend::new("/").with_case_sensitive(false);
        assert_eq!(
            backend.key_of(&PathBuf::from("/Home/User")),
            backend.key_of(&PathBuf::from("/home/user"))
        );
        let sensitive = backend.with_case_sensitive(true);
        assert_ne!(
            sensitive.key_of(&PathBuf::from("/Home")),
            sensitive.key_of(&PathBuf::from("/home"))
        );
    }

    #[test]
    fn from_config_reads_backend_section() {
        let mut config = Config::default();
        config.backend.root = "/srv".to_string();
        config.backend.case_sensitive = false;
        config.general.show_hidden = true;

        let backend = PathBackend::from_config(&config);
        assert_eq!(backend.root_path(), Path::new("/srv"));
        assert!(!backend.case_sensitive);
        assert!(backend.show_hidden);
    }
}
