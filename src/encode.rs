//! document -> tree encoder
//!
//! walks a JSON value depth-first, classifying each node into the closed set
//! {dict, set, str, int, ref} and driving a [`TreeWriter`]. the writer is
//! consumed and committed exactly once at the end; backend write failures
//! propagate unmodified with no retry or rollback.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::hash::content_key;
use crate::name::{Kind, TypedName};
use crate::path::TreePath;
use crate::store::TreeWriter;

/// document-level prefix marking a string as a symbolic reference
pub const REF_PREFIX: &str = "ref:";

/// encode a document into a writer and commit the batch
///
/// the root must be a JSON object; it is treated as an unwrapped dict (no
/// typed name is written for the root itself).
pub fn convert<W: TreeWriter>(mut writer: W, document: &Value) -> Result<()> {
    let root = document.as_object().ok_or_else(|| Error::UnsupportedValue {
        path: String::new(),
        reason: "document root must be an object".to_string(),
    })?;

    let path = TreePath::root();
    for (key, value) in root {
        encode_node(&mut writer, value, &path, key)?;
    }
    writer.commit()
}

fn encode_node<W: TreeWriter>(
    writer: &mut W,
    value: &Value,
    parent: &TreePath,
    base: &str,
) -> Result<()> {
    match value {
        Value::Object(map) => {
            let path = parent.child(TypedName::new(base, Kind::Dict)?);
            writer.make_tree(&path, map.len())?;
            for (key, child) in map {
                encode_node(writer, child, &path, key)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            let path = parent.child(TypedName::new(base, Kind::Set)?);
            writer.make_tree(&path, items.len())?;
            for item in items {
                // the stored name is the content hash of the element's
                // serialized form, so duplicates collapse and order is lost
                let serialized =
                    scalar_text(item).ok_or_else(|| Error::UnsupportedElement {
                        path: path.join(),
                    })?;
                encode_node(writer, item, &path, &content_key(&serialized))?;
            }
            Ok(())
        }
        scalar => {
            let (kind, content) = classify_scalar(scalar).ok_or_else(|| {
                Error::UnsupportedValue {
                    path: parent.child_display(base),
                    reason: unsupported_reason(scalar),
                }
            })?;
            let path = parent.child(TypedName::new(base, kind)?);
            writer.make_leaf(&path, &content)
        }
    }
}

/// split a scalar into its stored kind and content
///
/// a string with the `ref:` prefix becomes a ref leaf with the prefix
/// stripped; other strings are str leaves; i64 numbers are int leaves.
fn classify_scalar(value: &Value) -> Option<(Kind, String)> {
    match value {
        Value::String(s) => match s.strip_prefix(REF_PREFIX) {
            Some(target) => Some((Kind::Ref, target.to_string())),
            None => Some((Kind::Str, s.clone())),
        },
        Value::Number(n) => n.as_i64().map(|i| (Kind::Int, i.to_string())),
        _ => None,
    }
}

/// serialized textual form of a scalar, used as the set-key hash input
///
/// this is the document-level form, so a ref keeps its prefix here.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_i64().map(|i| i.to_string()),
        _ => None,
    }
}

fn unsupported_reason(value: &Value) -> String {
    match value {
        Value::Null => "null is not supported".to_string(),
        Value::Bool(_) => "booleans are not supported".to_string(),
        Value::Number(_) => "only i64 integers are supported".to_string(),
        _ => "unsupported value".to_string(),
    }
}
