//! Host document snapshot
//!
//! A node tree in the ProseMirror JSON shape. Positions count one per text
//! character, one per leaf node, and an opening plus closing token for every
//! other node. Positions inside the root start at 0, so the valid range for an
//! issue is `[0, content_size]`.

pub mod extract;

pub use extract::{PositionMap, TextRange, TextSegment};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

const LEAF_TYPES: &[&str] = &["hard_break", "image", "mention", "horizontal_rule"];
const INLINE_TYPES: &[&str] = &["text", "hard_break", "image", "mention"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Value>,
}

impl Node {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: Map::new(),
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new("text");
        node.text = Some(text.into());
        node
    }

    pub fn block(node_type: impl Into<String>, content: Vec<Node>) -> Self {
        let mut node = Self::new(node_type);
        node.content = content;
        node
    }

    pub fn paragraph(text: &str) -> Self {
        if text.is_empty() {
            Self::block("paragraph", Vec::new())
        } else {
            Self::block("paragraph", vec![Self::text(text)])
        }
    }

    pub fn heading(level: u64, text: &str) -> Self {
        Self::block("heading", vec![Self::text(text)]).with_attr("level", Value::from(level))
    }

    pub fn hard_break() -> Self {
        Self::new("hard_break")
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == "text"
    }

    pub fn is_leaf(&self) -> bool {
        LEAF_TYPES.contains(&self.node_type.as_str())
    }

    pub fn is_inline(&self) -> bool {
        INLINE_TYPES.contains(&self.node_type.as_str())
    }

    pub fn is_block(&self) -> bool {
        !self.is_inline()
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn heading_level(&self) -> Option<u64> {
        if self.node_type != "heading" {
            return None;
        }
        self.attrs.get("level").and_then(Value::as_u64)
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    pub fn node_size(&self) -> usize {
        if self.is_text() {
            self.text_str().chars().count()
        } else if self.is_leaf() {
            1
        } else {
            self.content_size() + 2
        }
    }
}

/// Immutable document snapshot handed to scanners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            root: Node::block("doc", content),
        }
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn from_paragraphs(paragraphs: &[&str]) -> Self {
        Self::new(paragraphs.iter().map(|p| Node::paragraph(p)).collect())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let root: Node = serde_json::from_str(json).context("Invalid document JSON")?;
        Ok(Self { root })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Valid document length for issue ranges.
    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    /// Depth-first walk yielding every node below the root with its start
    /// position. Returning `false` from `f` skips that node's children.
    pub fn descendants<F>(&self, mut f: F)
    where
        F: FnMut(&Node, usize) -> bool,
    {
        walk(&self.root.content, 0, &mut f);
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.descendants(|node, _| {
            if node.is_text() {
                text.push_str(node.text_str());
            }
            true
        });
        text
    }

    pub fn position_map(&self) -> PositionMap {
        PositionMap::build(self)
    }
}

fn walk<F>(nodes: &[Node], start: usize, f: &mut F)
where
    F: FnMut(&Node, usize) -> bool,
{
    let mut pos = start;
    for node in nodes {
        let descend = f(node, pos);
        if descend && !node.is_text() && !node.is_leaf() {
            walk(&node.content, pos + 1, f);
        }
        pos += node.node_size();
    }
}
