//! Unified Result Model
//!
//! Listing-style commands (fences, lint, download) map their output to this
//! model before rendering.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Fence,
    Download,
    Issue,
}

/// Severity of a lint issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Line range, 0-indexed, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: usize,
    pub end: usize,
}

impl RangeLine {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Content size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Number of newline characters in the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,

    /// Content hash (XXH3 or SHA1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the excerpt was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Source the item belongs to, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Fence id (index in closing order)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,

    /// Fence identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Line range within the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    /// Excerpt of the content (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload, embedded without JSON-in-string escaping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Severity for issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            id: None,
            identifier: None,
            range: None,
            excerpt: None,
            data: None,
            severity: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new fence result
    pub fn fence(
        path: impl Into<String>,
        id: usize,
        identifier: impl Into<String>,
        range: RangeLine,
    ) -> Self {
        Self {
            path: Some(path.into()),
            id: Some(id),
            identifier: Some(identifier.into()),
            range: Some(range),
            ..Self::empty(Kind::Fence)
        }
    }

    /// Create a new download result; `path` is the written file
    pub fn download(path: impl Into<String>, id: usize, identifier: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            id: Some(id),
            identifier: Some(identifier.into()),
            ..Self::empty(Kind::Download)
        }
    }

    /// Create a new lint issue
    pub fn issue(path: impl Into<String>, severity: Severity, error: ItemError) -> Self {
        Self {
            path: Some(path.into()),
            severity: Some(severity),
            excerpt: Some(error.message.clone()),
            errors: vec![error],
            ..Self::empty(Kind::Issue)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set line range
    pub fn with_range(mut self, range: RangeLine) -> Self {
        self.range = Some(range);
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.path
                .is_none()
                .cmp(&b.path.is_none())
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.range.is_none().cmp(&b.range.is_none()))
                .then_with(|| {
                    let sa = a.range.map(|r| r.start);
                    let sb = b.range.map(|r| r.start);
                    sa.cmp(&sb)
                })
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(path: &str, line: usize) -> ResultItem {
        ResultItem::issue(path, Severity::Warning, ItemError::new("W", "warn"))
            .with_range(RangeLine::new(line, line))
    }

    #[test]
    fn test_result_item_fence() {
        let item = ResultItem::fence("doc.mb", 0, "src/a.c", RangeLine::new(1, 3));
        assert_eq!(item.kind, Kind::Fence);
        assert_eq!(item.id, Some(0));
        assert_eq!(item.identifier.as_deref(), Some("src/a.c"));
        assert_eq!(item.range, Some(RangeLine::new(1, 3)));
        assert!(item.severity.is_none());
    }

    #[test]
    fn test_result_item_issue_copies_message_to_excerpt() {
        let item = ResultItem::issue(
            "doc.mb",
            Severity::Error,
            ItemError::new("FENCE_MISMATCH", "Fence 'B' ends"),
        );
        assert_eq!(item.kind, Kind::Issue);
        assert_eq!(item.severity, Some(Severity::Error));
        assert_eq!(item.excerpt.as_deref(), Some("Fence 'B' ends"));
        assert_eq!(item.errors[0].code, "FENCE_MISMATCH");
    }

    #[test]
    fn test_result_set_sort() {
        let mut set = ResultSet::new();
        set.push(warning("b.mb", 1));
        set.push(warning("a.mb", 9));
        set.push(warning("a.mb", 2));
        set.sort();

        let keys: Vec<_> = set
            .items
            .iter()
            .map(|i| (i.path.clone(), i.range.map(|r| r.start)))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Some("a.mb".to_string()), Some(2)),
                (Some("a.mb".to_string()), Some(9)),
                (Some("b.mb".to_string()), Some(1)),
            ]
        );
    }

    #[test]
    fn test_result_set_sort_ranged_items_first() {
        let mut set = ResultSet::new();
        set.push(ResultItem::download("x.txt", 0, "x"));
        set.push(ResultItem::download("x.txt", 1, "x").with_range(RangeLine::new(0, 2)));
        set.sort();
        assert!(set.items[0].range.is_some());
        assert!(set.items[1].range.is_none());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let item = ResultItem::fence("doc.mb", 2, "f", RangeLine::new(4, 8));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"fence\""));
        assert!(json.contains("\"range\":{\"start\":4,\"end\":8}"));
        assert!(!json.contains("excerpt"));
        assert!(!json.contains("errors"));
        assert!(!json.contains("severity"));
    }

    #[test]
    fn test_data_is_embedded() {
        let item = ResultItem::download("out/a.txt", 0, "a")
            .with_data(serde_json::json!({ "file_name": "a.txt" }));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"download\""));
        assert!(json.contains("\"data\":{\"file_name\":\"a.txt\"}"));
    }

    #[test]
    fn test_result_item_deserialization() {
        let json = r#"{"kind":"fence","path":"d.mb","id":0,"identifier":"f","meta":{"truncated":false}}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::Fence);
        assert_eq!(item.identifier.as_deref(), Some("f"));
    }

    #[test]
    fn test_result_set_collect_and_iterate() {
        let set: ResultSet = vec![warning("a.mb", 0), warning("b.mb", 0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        let items: Vec<_> = set.into_iter().collect();
        assert_eq!(items.len(), 2);
    }
}
