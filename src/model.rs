//! Data exchanged with the analysis service
//!
//! The client trusts the shape of every response: a [`Token`] is two strings,
//! a [`TreeNode`] is a name plus an ordered list of children. Nothing here
//! validates what the backend sends beyond what serde needs to decode it.

use serde::{Deserialize, Deserializer, Serialize};

/// Text shown in the editor before the user types anything
pub const PLACEHOLDER_SOURCE: &str = "// Type your C++ code here...";

/// A classified lexical unit as reported by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn class(&self) -> TokenClass {
        TokenClass::of(&self.kind)
    }
}

/// Coarse grouping of token types, used only for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Punctuation,
    Other,
}

impl TokenClass {
    /// Classify a backend type name. Matching ignores case since the
    /// service reports `KEYWORD` where other tokenizers say `keyword`.
    pub fn of(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "keyword" => TokenClass::Keyword,
            "identifier" => TokenClass::Identifier,
            "number" | "integer" | "float" | "literal" => TokenClass::Number,
            "string" | "char" => TokenClass::String,
            "operator" => TokenClass::Operator,
            "punctuation" | "delimiter" | "separator" => TokenClass::Punctuation,
            _ => TokenClass::Other,
        }
    }
}

/// A node of the parse tree returned by the parser endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        TreeNode {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: name.into(),
            children,
        }
    }

    /// Total number of nodes in this subtree, the root included
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Number of parent-child links in this subtree
    pub fn edge_count(&self) -> usize {
        self.node_count() - 1
    }
}

// Dropping a deep tree recursively would overflow the stack, so descendants
// are detached onto a heap list first.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// The displayed parse tree. `None` is the empty state: nothing has been
/// parsed yet, or the backend answered with `{}` or `null`.
pub type ParseTree = Option<TreeNode>;

/// Body of both outbound requests
#[derive(Debug, Serialize)]
pub struct CodeRequest<'a> {
    pub code: &'a str,
}

/// Success body of `POST /tokenize`
#[derive(Debug, Deserialize)]
pub struct TokenizeResponse {
    pub tokens: Vec<Token>,
}

/// Success body of `POST /parse`
#[derive(Debug, Deserialize)]
pub struct ParseResponse {
    #[serde(default, deserialize_with = "deserialize_parse_tree")]
    pub parse_tree: ParseTree,
}

/// Root as it appears on the wire, where `{}` means "no tree"
#[derive(Deserialize)]
struct WireRoot {
    name: Option<String>,
    children: Option<Vec<TreeNode>>,
}

fn deserialize_parse_tree<'de, D>(deserializer: D) -> Result<ParseTree, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WireRoot>::deserialize(deserializer)? {
        None
        | Some(WireRoot {
            name: None,
            children: None,
        }) => None,
        Some(root) => Some(TreeNode::with_children(
            root.name.unwrap_or_default(),
            root.children.unwrap_or_default(),
        )),
    })
}

/// Pull a human readable message out of an error body.
///
/// FastAPI answers `{"detail": "..."}` for raised HTTP errors and
/// `{"detail": [...]}` for validation failures; anything else yields `None`.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
