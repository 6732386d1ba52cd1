//! filesystem backend: a plain directory tree
//!
//! containers are directories, leaves are files, and every entry name is a
//! typed name. writes are immediately durable, so commit is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};
use crate::name::TypedName;
use crate::path::TreePath;
use crate::store::{TreeReader, TreeWriter};

/// reads a document tree from a directory
pub struct FsReader {
    root: PathBuf,
}

impl FsReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TreeReader for FsReader {
    fn list_children(&self, path: &TreePath) -> Result<Vec<TypedName>> {
        let dir = path.to_fs_path(&self.root);
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_path(&dir)? {
            let entry = entry.with_path(&dir)?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            names.push(TypedName::parse(&file_name)?);
        }
        Ok(names)
    }

    fn read_leaf(&self, path: &TreePath) -> Result<String> {
        let file = path.to_fs_path(&self.root);
        fs::read_to_string(&file).with_path(&file)
    }
}

/// writes a document tree into a directory
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    /// create a writer, making the root directory if absent
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).with_path(&root)?;
        Ok(Self { root })
    }
}

impl TreeWriter for FsWriter {
    fn make_tree(&mut self, path: &TreePath, _child_count: usize) -> Result<()> {
        let dir = path.to_fs_path(&self.root);
        fs::create_dir_all(&dir).with_path(&dir)
    }

    fn make_leaf(&mut self, path: &TreePath, content: &str) -> Result<()> {
        let file = path.to_fs_path(&self.root);
        fs::write(&file, content).with_path(&file)
    }

    fn commit(self) -> Result<()> {
        // filesystem writes are already durable
        Ok(())
    }
}
