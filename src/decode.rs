//! tree -> document decoder
//!
//! walks a [`TreeReader`] depth-first and rebuilds a JSON value from the
//! kinds encoded in node names. read-only; no backend state is touched.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::name::Kind;
use crate::path::TreePath;
use crate::store::TreeReader;

/// decode a whole document, or the subtree named by `query`
///
/// `query` is a typeless slash-separated path; empty means the whole
/// document. the root is implicitly a dict, so an empty query decodes the
/// root's children directly into a map. a non-empty query is resolved
/// against stored typed names level by level, then decoded with its own
/// base name discarded.
pub fn convert<R: TreeReader>(reader: &R, query: &str) -> Result<Value> {
    let components: Vec<&str> = query.split('/').filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return decode_dict(reader, &TreePath::root());
    }

    let path = resolve_query(reader, &components)?;
    let (_, value) = decode(reader, &path)?;
    Ok(value)
}

/// decode the node at a fully typed path into its base name and value
pub fn decode<R: TreeReader>(reader: &R, path: &TreePath) -> Result<(String, Value)> {
    let name = path
        .last()
        .ok_or_else(|| Error::PathNotFound("<root>".to_string()))?;
    let base = name.base().to_string();

    let value = match name.kind() {
        Kind::Dict => decode_dict(reader, path)?,
        Kind::Set => decode_set(reader, path)?,
        Kind::Str => Value::String(reader.read_leaf(path)?),
        Kind::Int => {
            let content = reader.read_leaf(path)?;
            let n: i64 = content.trim().parse().map_err(|_| Error::InvalidInteger {
                path: path.join(),
                content: content.clone(),
            })?;
            Value::from(n)
        }
        Kind::Ref => {
            let content = reader.read_leaf(path)?;
            Value::String(format!("ref:{}", content))
        }
    };

    Ok((base, value))
}

fn decode_dict<R: TreeReader>(reader: &R, path: &TreePath) -> Result<Value> {
    let mut map = Map::new();
    for child in reader.list_children(path)? {
        let (base, value) = decode(reader, &path.child(child))?;
        // duplicate bases would be backend corruption; last one wins
        map.insert(base, value);
    }
    Ok(Value::Object(map))
}

fn decode_set<R: TreeReader>(reader: &R, path: &TreePath) -> Result<Value> {
    let mut items = Vec::new();
    for child in reader.list_children(path)? {
        let (_, value) = decode(reader, &path.child(child))?;
        items.push(value);
    }
    Ok(Value::Array(items))
}

/// resolve a typeless query path to a typed one by scanning each level's
/// children for a matching base name
fn resolve_query<R: TreeReader>(reader: &R, components: &[&str]) -> Result<TreePath> {
    let mut path = TreePath::root();
    for component in components {
        let children = reader.list_children(&path)?;
        let matched = children
            .into_iter()
            .find(|child| child.base() == *component)
            .ok_or_else(|| Error::PathNotFound(components.join("/")))?;
        path = path.child(matched);
    }
    Ok(path)
}
