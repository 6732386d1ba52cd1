use std::fmt;
use std::path::PathBuf;

use crate::name::TypedName;

/// a path through a document tree: a sequence of typed names, root first
///
/// paths are values; backends interpret them relative to the document root.
/// the empty path denotes the root itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreePath {
    components: Vec<TypedName>,
}

impl TreePath {
    /// the document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[TypedName] {
        &self.components
    }

    /// the final component, if any
    pub fn last(&self) -> Option<&TypedName> {
        self.components.last()
    }

    /// a new path with `name` appended
    pub fn child(&self, name: TypedName) -> Self {
        let mut components = self.components.clone();
        components.push(name);
        Self { components }
    }

    /// slash-joined storage form, e.g. `users#dict/alice#str`
    ///
    /// the root renders as the empty string.
    pub fn join(&self) -> String {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        parts.join("/")
    }

    /// display form of a would-be child, for error messages
    pub(crate) fn child_display(&self, base: &str) -> String {
        if self.is_root() {
            base.to_string()
        } else {
            format!("{}/{}", self.join(), base)
        }
    }

    /// filesystem form relative to a backend root
    pub fn to_fs_path(&self, root: &std::path::Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for component in &self.components {
            path.push(component.to_string());
        }
        path
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join())
    }
}
