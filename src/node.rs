use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

pub const TEXT_TYPE: &str = "TEXT";

/// One element of the design document tree.
///
/// Every attribute is optional; absence is kept as `None` all the way into
/// the report instead of being replaced by a zero value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub children: Option<Vec<Node>>,
    pub absolute_bounding_box: Option<BoundingBox>,
    pub fills: Option<Vec<Paint>>,
    pub strokes: Option<Vec<Paint>>,

    // auto-layout
    pub layout_mode: Option<String>,
    pub primary_axis_sizing_mode: Option<String>,
    pub counter_axis_sizing_mode: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub item_spacing: Option<Number>,
    pub layout_wrap: Option<String>,
    pub layout_grow: Option<Number>,
    pub layout_align: Option<String>,

    pub padding_left: Option<Number>,
    pub padding_right: Option<Number>,
    pub padding_top: Option<Number>,
    pub padding_bottom: Option<Number>,

    pub corner_radius: Option<Number>,
    pub rectangle_corner_radii: Option<Vec<Number>>,
    pub effects: Option<Value>,

    // TEXT only
    pub characters: Option<String>,
    pub style: Option<Value>,
}

impl Node {
    /// `name` when present and non-empty, otherwise `id`.
    pub fn display_name(&self) -> Option<&str> {
        self.matchable_name().or(self.id.as_deref())
    }

    /// The name used for target membership. Empty names never match.
    pub fn matchable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn fills(&self) -> &[Paint] {
        self.fills.as_deref().unwrap_or_default()
    }

    pub fn strokes(&self) -> &[Paint] {
        self.strokes.as_deref().unwrap_or_default()
    }

    pub fn is_text(&self) -> bool {
        self.node_type.as_deref() == Some(TEXT_TYPE)
    }

    /// Trimmed text content of a TEXT node, `None` for other nodes or blank text.
    pub fn trimmed_text(&self) -> Option<&str> {
        if !self.is_text() {
            return None;
        }
        self.characters
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Total number of nodes in this subtree, counted without recursion.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

// The derived Drop would recurse once per level of nesting.
impl Drop for Node {
    fn drop(&mut self) {
        let Some(mut stack) = self.children.take() else { return };
        while let Some(mut node) = stack.pop() {
            if let Some(children) = node.children.take() {
                stack.extend(children);
            }
        }
    }
}

/// `absoluteBoundingBox` in document coordinates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundingBox {
    pub x: Option<Number>,
    pub y: Option<Number>,
    pub width: Option<Number>,
    pub height: Option<Number>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    Solid,
    Image,
    Other,
}

/// A fill or stroke entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    /// `None` when the key is absent, `Some(None)` for an explicit null
    #[serde(default, deserialize_with = "present")]
    pub opacity: Option<Option<Number>>,
    pub color: Option<Color>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
}

impl Paint {
    /// The source value when the key is present (null included), otherwise 1.0.
    pub fn opacity(&self) -> Option<Number> {
        match &self.opacity {
            Some(value) => value.clone(),
            None => Number::from_f64(1.0),
        }
    }

    pub fn kind(&self) -> PaintKind {
        match self.paint_type.as_deref() {
            Some("SOLID") => PaintKind::Solid,
            Some("IMAGE") => PaintKind::Image,
            _ => PaintKind::Other,
        }
    }
}

// Only runs when the key exists, so absent and null stay distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// RGBA channels as floats in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Color {
    pub r: Option<f64>,
    pub g: Option<f64>,
    pub b: Option<f64>,
    pub a: Option<f64>,
}

impl Color {
    /// Channels with missing values filled in: r/g/b default to 0, alpha to 1.
    pub fn rgba(&self) -> [f64; 4] {
        [
            self.r.unwrap_or(0.0),
            self.g.unwrap_or(0.0),
            self.b.unwrap_or(0.0),
            self.a.unwrap_or(1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(node(json!({"id": "1:2", "name": "Card"})).display_name(), Some("Card"));
        assert_eq!(node(json!({"id": "1:2"})).display_name(), Some("1:2"));
        assert_eq!(node(json!({"id": "1:2", "name": ""})).display_name(), Some("1:2"));
        assert_eq!(node(json!({})).display_name(), None);
    }

    #[test]
    fn empty_name_is_not_matchable() {
        assert_eq!(node(json!({"id": "1:2", "name": ""})).matchable_name(), None);
    }

    #[test]
    fn trimmed_text_only_for_text_nodes() {
        let text = node(json!({"type": "TEXT", "characters": "  Hello \n"}));
        assert_eq!(text.trimmed_text(), Some("Hello"));

        let blank = node(json!({"type": "TEXT", "characters": "   "}));
        assert_eq!(blank.trimmed_text(), None);

        let frame = node(json!({"type": "FRAME", "characters": "Hello"}));
        assert_eq!(frame.trimmed_text(), None);
    }

    #[test]
    fn missing_and_null_collections_are_empty() {
        let n = node(json!({"children": null, "fills": null}));
        assert!(n.children().is_empty());
        assert!(n.fills().is_empty());
        assert!(n.strokes().is_empty());
    }

    #[test]
    fn paint_defaults() {
        let paint: Paint = serde_json::from_value(json!({"type": "GRADIENT_LINEAR"})).unwrap();
        assert_eq!(paint.opacity(), Number::from_f64(1.0));
        assert_eq!(paint.kind(), PaintKind::Other);

        let color: Color = serde_json::from_value(json!({"r": 0.5})).unwrap();
        assert_eq!(color.rgba(), [0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn non_node_children_are_rejected() {
        let result = serde_json::from_value::<Node>(json!({"children": [1, 2]}));
        assert!(result.is_err());
    }

    #[test]
    fn opacity_keeps_null_and_integers() {
        let null: Paint = serde_json::from_value(json!({"type": "SOLID", "opacity": null})).unwrap();
        assert_eq!(null.opacity, Some(None));
        assert_eq!(null.opacity(), None);

        let int: Paint = serde_json::from_value(json!({"type": "SOLID", "opacity": 1})).unwrap();
        assert_eq!(int.opacity(), Some(Number::from(1)));

        let absent: Paint = serde_json::from_value(json!({"type": "SOLID"})).unwrap();
        assert_eq!(absent.opacity, None);
    }

    #[test]
    fn deep_tree_drops_without_recursion() {
        let mut current = Node::default();
        for _ in 0..100_000 {
            let mut parent = Node::default();
            parent.children = Some(vec![current]);
            current = parent;
        }
        assert_eq!(current.subtree_len(), 100_001);
        drop(current);
    }

    #[test]
    fn subtree_len_counts_every_node() {
        let n = node(json!({"children": [{"children": [{}, {}]}, {}]}));
        assert_eq!(n.subtree_len(), 5);
    }
}
