use std::path::PathBuf;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

use crate::node::BoundingBox;

/// Summary of one matched node.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub name: Option<String>,
    pub path: String,            // ancestor names joined with " > "
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub bbox: BoundingBoxSummary,
    pub fills: Vec<SimplifiedPaint>,
    pub strokes: Vec<SimplifiedPaint>,
    pub corner_radius: Option<Number>,
    pub individual_corner_radius: Option<Vec<Number>>,
    pub padding: Padding,
    pub layout: LayoutInfo,
    pub effects: Option<Value>,
    pub children_count: usize,
    pub ancestors: Vec<AncestorSummary>,
    #[serde(flatten)]
    pub text: Option<TextContent>, // only for TEXT nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MatchResult>>, // only when children were requested
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BoundingBoxSummary {
    pub x: Option<Number>,
    pub y: Option<Number>,
    pub width: Option<Number>,
    pub height: Option<Number>,
}

impl From<Option<&BoundingBox>> for BoundingBoxSummary {
    fn from(bbox: Option<&BoundingBox>) -> Self {
        let Some(b) = bbox else { return Self::default(); };
        Self {
            x: b.x.clone(),
            y: b.y.clone(),
            width: b.width.clone(),
            height: b.height.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Padding {
    pub left: Option<Number>,
    pub right: Option<Number>,
    pub top: Option<Number>,
    pub bottom: Option<Number>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub layout_mode: Option<String>,
    pub primary_axis_sizing_mode: Option<String>,
    pub counter_axis_sizing_mode: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub item_spacing: Option<Number>,
    pub layout_wrap: Option<String>,
    pub layout_grow: Option<Number>,
    pub layout_align: Option<String>,
}

/// Minimal projection of an ancestor node.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorSummary {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub depth: usize,
    pub bbox: BoundingBoxSummary,
    pub layout_mode: Option<String>,
    pub item_spacing: Option<Number>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub text_style: Option<Value>,
    pub characters: Option<String>,
}

/// Normalized fill or stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedPaint {
    pub paint_type: Option<String>,
    /// Source value as written, `null` included; 1.0 only when the key is absent
    pub opacity: Option<Number>,
    pub detail: PaintDetail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintDetail {
    /// SOLID paint with a color, hex encoded.
    Solid { color: String },
    Image { image_ref: Option<String>, scale_mode: Option<String> },
    None,
}

impl Serialize for SimplifiedPaint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = match &self.detail {
            PaintDetail::Solid { .. } => 1,
            PaintDetail::Image { .. } => 2,
            PaintDetail::None => 0,
        };
        let mut map = serializer.serialize_map(Some(2 + extra))?;
        map.serialize_entry("type", &self.paint_type)?;
        map.serialize_entry("opacity", &self.opacity)?;
        match &self.detail {
            PaintDetail::Solid { color } => map.serialize_entry("color", color)?,
            PaintDetail::Image { image_ref, scale_mode } => {
                map.serialize_entry("imageRef", image_ref)?;
                map.serialize_entry("scaleMode", scale_mode)?;
            }
            PaintDetail::None => {}
        }
        map.end()
    }
}

/// Outcome of one document in a batch run.
#[derive(Debug, serde::Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub matches: Vec<MatchResult>,
    pub error: Option<String>,
}
