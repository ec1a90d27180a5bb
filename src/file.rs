use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::debug;
use crate::error::{ExtractError, Result};
use crate::node::Node;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the root node lives inside a loaded export.
#[derive(Debug, Clone, Default)]
pub struct RootSelector {
    /// JSON Pointer to the root node, wins over `node_id`
    pub pointer: Option<String>,
    /// Key under the `nodes` map of a node export
    pub node_id: Option<String>,
}

// JSON Pointer token escape (~0, ~1)
pub fn escape_pointer_token(raw: &str) -> String {
    raw.replace('~', "~0").replace('/', "~1")
}

/// Read and parse a JSON export. A leading UTF-8 byte-order mark is skipped.
///
/// Nesting depth is unbounded: the parser grows its stack on the heap instead
/// of stopping at serde_json's default recursion limit.
pub fn read_document(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|e| ExtractError::Io(path.to_path_buf(), e))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    Value::deserialize(serde_stacker::Deserializer::new(&mut de))
        .and_then(|value| de.end().map(|()| value))
        .map_err(|e| ExtractError::Parse(path.to_path_buf(), e))
}

// Value's Drop recurses once per nesting level; take containers apart on a heap stack instead.
fn release(value: Value) {
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items),
            Value::Object(map) => stack.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

/// Find the document root node.
///
/// Resolution order: explicit pointer, explicit node id, the single entry of a
/// `nodes` map, a top-level `document`, and finally the value itself when it
/// already looks like a node.
pub fn locate_root<'v>(doc: &'v Value, selector: &RootSelector) -> Result<&'v Value> {
    if let Some(pointer) = &selector.pointer {
        return resolve_pointer(doc, pointer);
    }
    if let Some(id) = &selector.node_id {
        return resolve_pointer(doc, &format!("/nodes/{}/document", escape_pointer_token(id)));
    }
    if let Some(nodes) = doc.get("nodes").and_then(Value::as_object) {
        let mut entries = nodes.iter();
        return match (entries.next(), entries.next()) {
            (Some((id, entry)), None) => entry.get("document").ok_or_else(|| {
                ExtractError::RootNotFound(format!("`nodes[\"{id}\"]` has no `document`"))
            }),
            (None, _) => Err(ExtractError::RootNotFound("`nodes` is empty".into())),
            (Some(_), Some(_)) => Err(ExtractError::RootNotFound(format!(
                "`nodes` has {} entries, select one by node id",
                nodes.len()
            ))),
        };
    }
    if let Some(document) = doc.get("document") {
        return Ok(document);
    }
    if doc.as_object().is_some_and(|m| m.contains_key("type")) {
        return Ok(doc);
    }
    Err(ExtractError::RootNotFound(
        "expected a `nodes` map, a `document` or a node object".into(),
    ))
}

fn resolve_pointer<'v>(doc: &'v Value, pointer: &str) -> Result<&'v Value> {
    if pointer.is_empty() {
        return Ok(doc);
    }
    doc.pointer(pointer)
        .ok_or_else(|| ExtractError::RootNotFound(format!("nothing at pointer `{pointer}`")))
}

/// Load `path` and deserialize the selected root into a typed tree.
pub fn load_root(path: &Path, selector: &RootSelector) -> Result<Node> {
    let doc = read_document(path)?;
    let node = locate_root(&doc, selector).and_then(|root| {
        Node::deserialize(serde_stacker::Deserializer::new(root))
            .map_err(ExtractError::InvalidDocument)
    });
    release(doc);
    let node = node?;
    debug!("load"; "{}: {} nodes under root", path.display(), node.subtree_len());
    Ok(node)
}
