//! storage backends: capability traits plus the two concrete pairs
//!
//! the decoder only needs to list children and read leaves; the encoder only
//! needs to materialize containers and leaves, then finalize once. each side
//! is a small trait with a filesystem implementation and a git plumbing
//! implementation.

pub mod fs;
pub mod git;

pub use fs::{FsReader, FsWriter};
pub use git::{GitReader, GitWriter};

use crate::error::Result;
use crate::name::TypedName;
use crate::path::TreePath;

/// read capability consumed by the decoder
pub trait TreeReader {
    /// typed names of the children under a container path
    ///
    /// the root (empty path) lists the top-level entries.
    fn list_children(&self, path: &TreePath) -> Result<Vec<TypedName>>;

    /// full text content of the leaf at a path
    fn read_leaf(&self, path: &TreePath) -> Result<String>;
}

/// write capability consumed by the encoder
///
/// writes may be immediate (filesystem) or staged (git); `commit` takes the
/// writer by value so a convert call can finalize at most once.
pub trait TreeWriter {
    /// materialize a container at a path
    ///
    /// `child_count` lets backends that cannot represent empty containers
    /// implicitly (git) stage an explicit object for them.
    fn make_tree(&mut self, path: &TreePath, child_count: usize) -> Result<()>;

    /// materialize a leaf with the given content
    fn make_leaf(&mut self, path: &TreePath, content: &str) -> Result<()>;

    /// finalize the batch of writes
    fn commit(self) -> Result<()>;
}
