//! Viewer module - Presentation of parsed documents
//!
//! Turns a parsed document into pages and files:
//! - page: full HTML page with header and fence list
//! - display: single fence in view/raw/download mode, static export

pub mod display;
pub mod page;

/// Selects one fence of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceSelector {
    /// Index in closing order
    Id(usize),
    /// First fence (in closing order) with this identifier
    Name(String),
}

/// How a single fence is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceMode {
    /// HTML page with the content and the fence list
    #[default]
    View,
    /// Content bytes only
    Raw,
    /// Content written to `<identifier>.txt`
    Download,
}

impl std::str::FromStr for FenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(FenceMode::View),
            "raw" => Ok(FenceMode::Raw),
            "download" => Ok(FenceMode::Download),
            _ => Err(format!("Unknown fence mode: {}", s)),
        }
    }
}

/// Everything a presentation request needs, passed explicitly
#[derive(Debug, Clone)]
pub struct ViewRequest {
    /// Source name as given by the user
    pub target: String,
    /// Fence to display; `None` shows the whole document
    pub fence: Option<FenceSelector>,
    pub mode: FenceMode,
}

impl ViewRequest {
    pub fn document(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            fence: None,
            mode: FenceMode::View,
        }
    }

    pub fn fence(target: impl Into<String>, fence: FenceSelector, mode: FenceMode) -> Self {
        Self {
            target: target.into(),
            fence: Some(fence),
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_mode_parse() {
        assert_eq!("view".parse::<FenceMode>().unwrap(), FenceMode::View);
        assert_eq!("RAW".parse::<FenceMode>().unwrap(), FenceMode::Raw);
        assert_eq!("Download".parse::<FenceMode>().unwrap(), FenceMode::Download);
        assert!("print".parse::<FenceMode>().is_err());
        assert_eq!(FenceMode::default(), FenceMode::View);
    }

    #[test]
    fn test_view_request_constructors() {
        let doc = ViewRequest::document("a.mb");
        assert!(doc.fence.is_none());

        let fence = ViewRequest::fence("a.mb", FenceSelector::Id(2), FenceMode::Raw);
        assert_eq!(fence.fence, Some(FenceSelector::Id(2)));
        assert_eq!(fence.mode, FenceMode::Raw);
    }
}
