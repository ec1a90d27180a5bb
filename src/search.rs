use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ExtractError, Result};
use crate::node::Node;
use crate::tree::summarize_node;
use crate::types::MatchResult;

/// Targets used when neither the command line nor the config names any.
pub const DEFAULT_TARGETS: &[&str] = &[
    "Tokens Usage",
    "Active Consumers",
    "Command Action",
    "Command Center",
    "Persona Table",
    "Bulk Actions",
    "Persona updated",
    "Your Personas",
];

/// How TEXT content is compared against the targets. Names always use exact membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Trimmed text equals a target
    #[default]
    Exact,
    /// Trimmed text contains a target
    Contains,
    /// Trimmed text matches a target regular expression
    Regex,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    targets: BTreeSet<String>,
    match_mode: MatchMode,
    include_children: bool,
    patterns: Vec<Regex>,
}

impl SearchOptions {
    pub fn new<I, S>(targets: I, match_mode: MatchMode, include_children: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets: BTreeSet<String> = targets.into_iter().map(Into::into).collect();
        let patterns = if match_mode == MatchMode::Regex {
            targets
                .iter()
                .map(|t| {
                    Regex::new(t).map_err(|source| ExtractError::InvalidPattern {
                        pattern: t.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };
        Ok(Self { targets, match_mode, include_children, patterns })
    }

    pub fn with_default_targets(match_mode: MatchMode, include_children: bool) -> Result<Self> {
        Self::new(DEFAULT_TARGETS.iter().copied(), match_mode, include_children)
    }

    pub fn targets(&self) -> &BTreeSet<String> {
        &self.targets
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn include_children(&self) -> bool {
        self.include_children
    }

    /// Name membership first, then TEXT content under the configured mode.
    pub fn is_match(&self, node: &Node) -> bool {
        if node.matchable_name().is_some_and(|name| self.targets.contains(name)) {
            return true;
        }
        node.trimmed_text()
            .is_some_and(|text| text_matches(text, &self.targets, self.match_mode, &self.patterns))
    }
}

pub fn text_matches(text: &str, targets: &BTreeSet<String>, mode: MatchMode, patterns: &[Regex]) -> bool {
    match mode {
        MatchMode::Exact => targets.contains(text),
        MatchMode::Contains => targets.iter().any(|t| text.contains(t.as_str())),
        MatchMode::Regex => patterns.iter().any(|re| re.is_match(text)),
    }
}

/// Depth-first search over the whole tree, visiting nodes in document order
/// (pre-order). Matching a node never prunes its subtree.
pub fn search(root: &Node, options: &SearchOptions) -> Vec<MatchResult> {
    let mut results = Vec::new();
    let mut chain: Vec<&Node> = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut stack: Vec<(&Node, usize)> = vec![(root, 0)];

    while let Some((node, depth)) = stack.pop() {
        // chain holds exactly the ancestors of `node` once cut back to its depth
        chain.truncate(depth);
        names.truncate(depth);

        if options.is_match(node) {
            results.push(summarize_node(node, &chain, &names, options.include_children));
        }

        chain.push(node);
        names.push(node.display_name().unwrap_or_default());
        // reversed so the first child is popped first
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn node(value: Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    fn options(targets: &[&str], mode: MatchMode) -> SearchOptions {
        SearchOptions::new(targets.iter().copied(), mode, false).unwrap()
    }

    fn names(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_deref().unwrap_or_default()).collect()
    }

    fn sample_tree() -> Node {
        node(json!({
            "id": "0:1",
            "name": "Root",
            "type": "DOCUMENT",
            "children": [
                {"id": "1:1", "name": "A", "type": "FRAME", "children": [
                    {"id": "1:2", "name": "B", "type": "FRAME", "children": [
                        {"id": "1:3", "name": "C", "type": "RECTANGLE"}
                    ]}
                ]},
                {"id": "2:1", "name": "Greeting", "type": "TEXT", "characters": " Hello "},
                {"id": "3:1", "name": "C", "type": "ELLIPSE"}
            ]
        }))
    }

    #[test]
    fn nested_matches_are_reported_independently() {
        let results = search(&sample_tree(), &options(&["A", "B"], MatchMode::Exact));
        assert_eq!(names(&results), ["A", "B"]);
        assert!(results.iter().all(|r| r.children.is_none()));
    }

    #[test]
    fn results_follow_document_order() {
        let results = search(&sample_tree(), &options(&["C", "Greeting", "A"], MatchMode::Exact));
        assert_eq!(
            results.iter().map(|r| r.path.as_str()).collect::<Vec<_>>(),
            ["Root > A", "Root > A > B > C", "Root > Greeting", "Root > C"]
        );
    }

    #[test]
    fn path_and_ancestors_reflect_position() {
        let results = search(&sample_tree(), &options(&["C"], MatchMode::Exact));
        let nested = &results[0];
        assert_eq!(nested.path, "Root > A > B > C");
        assert_eq!(
            nested.ancestors.iter().map(|a| (a.name.as_deref().unwrap(), a.depth)).collect::<Vec<_>>(),
            [("Root", 0), ("A", 1), ("B", 2)]
        );
        assert_eq!(results[1].path, "Root > C");
        assert_eq!(results[1].ancestors.len(), 1);
    }

    #[test]
    fn root_can_match() {
        let results = search(&sample_tree(), &options(&["Root"], MatchMode::Exact));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "Root");
        assert!(results[0].ancestors.is_empty());
    }

    #[test]
    fn exact_text_match_uses_trimmed_content() {
        let tree = sample_tree();
        assert_eq!(names(&search(&tree, &options(&["Hello"], MatchMode::Exact))), ["Greeting"]);
        assert!(search(&tree, &options(&["Hell"], MatchMode::Exact)).is_empty());
    }

    #[test]
    fn contains_text_match() {
        let results = search(&sample_tree(), &options(&["Hell"], MatchMode::Contains));
        assert_eq!(names(&results), ["Greeting"]);
    }

    #[test]
    fn contains_mode_does_not_apply_to_names() {
        assert!(search(&sample_tree(), &options(&["Gree"], MatchMode::Contains)).is_empty());
    }

    #[test]
    fn regex_text_match() {
        let results = search(&sample_tree(), &options(&["^H.l+o$"], MatchMode::Regex));
        assert_eq!(names(&results), ["Greeting"]);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = SearchOptions::new(["(unclosed"], MatchMode::Regex, false).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPattern { .. }));
    }

    #[test]
    fn name_and_text_match_reports_once() {
        let tree = node(json!({
            "id": "0:1",
            "children": [{"id": "1:1", "name": "Hello", "type": "TEXT", "characters": "Hello"}]
        }));
        let results = search(&tree, &options(&["Hello"], MatchMode::Contains));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn text_on_non_text_nodes_is_ignored() {
        let tree = node(json!({"id": "0:1", "type": "FRAME", "characters": "Hello"}));
        assert!(search(&tree, &options(&["Hello"], MatchMode::Exact)).is_empty());
    }

    #[test]
    fn empty_targets_match_nothing() {
        let tree = sample_tree();
        for mode in [MatchMode::Exact, MatchMode::Contains, MatchMode::Regex] {
            assert!(search(&tree, &options(&[], mode)).is_empty());
        }
    }

    #[test]
    fn targets_are_case_sensitive() {
        assert!(search(&sample_tree(), &options(&["a", "hello"], MatchMode::Contains)).is_empty());
    }

    #[test]
    fn id_fallback_is_not_used_for_matching() {
        let tree = node(json!({"id": "0:1", "children": [{"id": "5:5"}]}));
        assert!(search(&tree, &options(&["5:5"], MatchMode::Exact)).is_empty());
    }

    #[test]
    fn include_children_nests_summaries() {
        let opts = SearchOptions::new(["A"], MatchMode::Exact, true).unwrap();
        let results = search(&sample_tree(), &opts);
        assert_eq!(results.len(), 1);
        let children = results[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path, "Root > A > B");
        assert_eq!(children[0].ancestors.len(), 2);
        let grandchildren = children[0].children.as_ref().unwrap();
        assert_eq!(grandchildren[0].path, "Root > A > B > C");
    }

    #[test]
    fn default_targets_match_curated_names() {
        let tree = node(json!({
            "id": "0:1",
            "children": [
                {"id": "1:1", "name": "Persona Table"},
                {"id": "1:2", "type": "TEXT", "characters": "Your Personas"},
                {"id": "1:3", "name": "Other"}
            ]
        }));
        let opts = SearchOptions::with_default_targets(MatchMode::Exact, false).unwrap();
        assert_eq!(search(&tree, &opts).len(), 2);
    }

    #[test]
    fn deep_tree_is_searched_without_recursion() {
        let mut current = Node::default();
        current.name = Some("target".into());
        for _ in 0..50_000 {
            let mut parent = Node::default();
            parent.children = Some(vec![current]);
            current = parent;
        }
        let opts = SearchOptions::new(["target"], MatchMode::Exact, false).unwrap();
        let results = search(&current, &opts);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ancestors.len(), 50_000);
        assert_eq!(current.subtree_len(), 50_001);
    }
}
