use sha2::{Digest, Sha256};

/// content key for a set element: lowercase hex SHA-256 of its serialized
/// scalar form
///
/// the key is derived from the document-level textual form, so a `ref:`
/// prefix is part of the hashed input. identical elements collapse into a
/// single stored child.
pub fn content_key(serialized: &str) -> String {
    let digest = Sha256::digest(serialized.as_bytes());
    hex::encode(digest)
}
