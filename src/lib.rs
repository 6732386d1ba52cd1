//! jot - JSON documents as typed trees
//!
//! a bidirectional codec between JSON-like documents and a typed
//! hierarchical tree, persisted either as a plain directory tree or as
//! commits in a git repository driven through its plumbing commands.
//!
//! # Core concepts
//!
//! - **Typed name**: every stored node is named `<base>#<kind>` with
//!   `kind ∈ {dict, set, str, int, ref}`, so a tree is self-describing
//!   without an external schema
//! - **Dict**: a mapping; children keyed by base name
//! - **Set**: a collection; each child is named by the SHA-256 of its
//!   serialized scalar value, so duplicates collapse and order is lost
//! - **Ref**: a `ref:`-prefixed string, stored with the prefix stripped and
//!   never resolved
//!
//! On the git backend every encode becomes one commit whose parent is the
//! previous branch head, so the branch holds a full history of writes.
//!
//! # Example usage
//!
//! ```no_run
//! use jot::store::{FsReader, FsWriter};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let doc = json!({"user": {"name": "alice", "age": 30}});
//!
//! // encode to a directory tree
//! let writer = FsWriter::new(Path::new("/path/to/store")).unwrap();
//! jot::encode::convert(writer, &doc).unwrap();
//!
//! // decode a subtree back out
//! let reader = FsReader::new(Path::new("/path/to/store"));
//! let user = jot::decode::convert(&reader, "user").unwrap();
//! ```

mod error;
mod hash;
mod name;
mod path;

pub mod decode;
pub mod encode;
pub mod store;

pub use encode::REF_PREFIX;
pub use error::{Error, IoResultExt, Result};
pub use hash::content_key;
pub use name::{Kind, TypedName};
pub use path::TreePath;
pub use store::{FsReader, FsWriter, GitReader, GitWriter, TreeReader, TreeWriter};
