use std::slice;

use crate::node::Node;
use crate::paint::simplify_paints;
use crate::types::{AncestorSummary, BoundingBoxSummary, LayoutInfo, MatchResult, Padding, TextContent};

pub const PATH_SEPARATOR: &str = " > ";

/// Summarize `node` given its ancestor chain (root first) and the matching
/// ancestor names. With `include_children` every descendant is summarized as
/// well, in document order.
pub fn summarize_node(
    node: &Node,
    ancestors: &[&Node],
    path_parts: &[&str],
    include_children: bool,
) -> MatchResult {
    let mut summary = summarize_shallow(node, ancestors, path_parts);
    if include_children {
        summary.children = Some(summarize_descendants(node, ancestors, path_parts));
    }
    summary
}

// Children whose own summaries are still being built.
struct Frame<'a> {
    owner: Option<MatchResult>,
    pending: slice::Iter<'a, Node>,
    done: Vec<MatchResult>,
}

impl<'a> Frame<'a> {
    fn new(owner: Option<MatchResult>, node: &'a Node) -> Self {
        Self {
            owner,
            pending: node.children().iter(),
            done: Vec::with_capacity(node.children().len()),
        }
    }
}

// Work-stack instead of recursion so deep trees cannot overflow the call stack.
fn summarize_descendants<'a>(
    node: &'a Node,
    ancestors: &[&'a Node],
    path_parts: &[&'a str],
) -> Vec<MatchResult> {
    let mut chain: Vec<&Node> = ancestors.to_vec();
    let mut names: Vec<&str> = path_parts.to_vec();
    chain.push(node);
    names.push(node.display_name().unwrap_or_default());

    let mut finished = Vec::new();
    let mut frames = vec![Frame::new(None, node)];
    while let Some(frame) = frames.last_mut() {
        match frame.pending.next() {
            Some(child) => {
                let summary = summarize_shallow(child, &chain, &names);
                chain.push(child);
                names.push(child.display_name().unwrap_or_default());
                frames.push(Frame::new(Some(summary), child));
            }
            None => {
                let Some(Frame { owner, done, .. }) = frames.pop() else { break };
                match (owner, frames.last_mut()) {
                    (Some(mut summary), Some(parent)) => {
                        summary.children = Some(done);
                        parent.done.push(summary);
                        chain.pop();
                        names.pop();
                    }
                    _ => finished = done,
                }
            }
        }
    }
    finished
}

fn summarize_shallow(node: &Node, ancestors: &[&Node], path_parts: &[&str]) -> MatchResult {
    let name = node.display_name();
    let path = path_parts
        .iter()
        .copied()
        .chain(std::iter::once(name.unwrap_or_default()))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR);

    let text = node.is_text().then(|| TextContent {
        text_style: node.style.clone(),
        characters: node.characters.clone(),
    });

    MatchResult {
        name: name.map(str::to_string),
        path,
        node_type: node.node_type.clone(),
        bbox: node.absolute_bounding_box.as_ref().into(),
        fills: simplify_paints(node.fills()),
        strokes: simplify_paints(node.strokes()),
        corner_radius: node.corner_radius.clone(),
        individual_corner_radius: node.rectangle_corner_radii.clone(),
        padding: padding(node),
        layout: layout_info(node),
        effects: node.effects.clone(),
        children_count: node.children().len(),
        ancestors: summarize_ancestors(ancestors),
        text,
        children: None,
    }
}

fn padding(node: &Node) -> Padding {
    Padding {
        left: node.padding_left.clone(),
        right: node.padding_right.clone(),
        top: node.padding_top.clone(),
        bottom: node.padding_bottom.clone(),
    }
}

fn layout_info(node: &Node) -> LayoutInfo {
    LayoutInfo {
        layout_mode: node.layout_mode.clone(),
        primary_axis_sizing_mode: node.primary_axis_sizing_mode.clone(),
        counter_axis_sizing_mode: node.counter_axis_sizing_mode.clone(),
        primary_axis_align_items: node.primary_axis_align_items.clone(),
        counter_axis_align_items: node.counter_axis_align_items.clone(),
        item_spacing: node.item_spacing.clone(),
        layout_wrap: node.layout_wrap.clone(),
        layout_grow: node.layout_grow.clone(),
        layout_align: node.layout_align.clone(),
    }
}

fn summarize_ancestors(ancestors: &[&Node]) -> Vec<AncestorSummary> {
    ancestors
        .iter()
        .enumerate()
        .map(|(depth, ancestor)| AncestorSummary {
            name: ancestor.display_name().map(str::to_string),
            node_type: ancestor.node_type.clone(),
            depth,
            bbox: BoundingBoxSummary::from(ancestor.absolute_bounding_box.as_ref()),
            layout_mode: ancestor.layout_mode.clone(),
            item_spacing: ancestor.item_spacing.clone(),
        })
        .collect()
}
