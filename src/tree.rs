//! Document-tree lowering.
//!
//! The third accepted input shape is a hierarchical document: a root object
//! tagged `"type": "document"` whose `children` are section nodes, each with
//! a `title`, optional HTML `content`, and optional nested `children`.
//! Browsing and search operate on flat topics, so the tree is lowered by
//! picking a target nesting depth:
//!
//! - depth 1 = the root's direct children;
//! - the target defaults to the maximum section depth present in the tree
//!   ([`max_depth`]), overridable by the caller;
//! - every node at exactly the target depth becomes one topic candidate;
//! - a candidate's body is its own content followed by its descendants'
//!   content, each descendant title rendered as an `<h3>` sub-heading;
//!   descendant sections never become topics of their own;
//! - a candidate's category is the title of its parent section (none for
//!   depth-1 topics, whose parent is the document root);
//! - a candidate's path is the chain of ancestor section titles, so search
//!   can match any segment.
//!
//! Sections above the target depth contribute only their titles (as path
//! segments and categories); their own content is not emitted.
//!
//! The walk is an explicit recursive descent with a path accumulator,
//! returning a flat list in document order.

use serde_json::Value;

/// A topic candidate produced by flattening. Validation (non-empty title,
/// skip counting) happens in [`crate::store`], same as for list input.
#[derive(Debug)]
pub struct FlatSection {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub path: Vec<String>,
}

fn node_title(node: &Value) -> &str {
    node.get("title").and_then(Value::as_str).unwrap_or("")
}

fn node_content(node: &Value) -> &str {
    node.get("content").and_then(Value::as_str).unwrap_or("")
}

fn node_children(node: &Value) -> &[Value] {
    node.get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Maximum section depth present under the document root.
///
/// The root's direct children sit at depth 1. An empty tree has depth 0.
pub fn max_depth(root: &Value) -> usize {
    fn deepest(nodes: &[Value], depth: usize) -> usize {
        nodes
            .iter()
            .map(|n| deepest(node_children(n), depth + 1).max(depth))
            .max()
            .unwrap_or(depth.saturating_sub(1))
    }
    deepest(node_children(root), 1)
}

/// Lower a document tree into flat topic candidates at the target depth.
///
/// `depth` overrides the auto-detected maximum; values of 0 are treated
/// as 1 (there is nothing above the root to emit).
pub fn flatten(root: &Value, depth: Option<usize>) -> Vec<FlatSection> {
    let target = depth.unwrap_or_else(|| max_depth(root)).max(1);
    let mut sections = Vec::new();
    let mut path = Vec::new();
    walk(node_children(root), 1, target, &mut path, &mut sections);
    sections
}

fn walk(
    nodes: &[Value],
    depth: usize,
    target: usize,
    path: &mut Vec<String>,
    out: &mut Vec<FlatSection>,
) {
    for node in nodes {
        if depth == target {
            out.push(FlatSection {
                title: node_title(node).to_string(),
                content: render_body(node),
                category: path.last().cloned(),
                path: path.clone(),
            });
        } else {
            path.push(node_title(node).to_string());
            walk(node_children(node), depth + 1, target, path, out);
            path.pop();
        }
    }
}

/// Concatenate a node's own content with its descendants' content.
///
/// Descendant titles become `<h3>` sub-headings inside the topic body.
/// Content is trusted HTML and inserted verbatim.
fn render_body(node: &Value) -> String {
    let mut body = node_content(node).to_string();
    for child in node_children(node) {
        let title = node_title(child);
        if !title.is_empty() {
            body.push_str("<h3>");
            body.push_str(title);
            body.push_str("</h3>");
        }
        body.push_str(&render_body(child));
    }
    body
}
