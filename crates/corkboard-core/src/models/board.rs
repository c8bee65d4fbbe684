use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoardCategory {
    Notice,
    #[default]
    Free,
    Qna,
    Etc,
    /// Category the client does not know about
    Other(String),
}

impl BoardCategory {
    /// Categories offered when writing a post, in menu order
    pub const ALL: [BoardCategory; 4] = [
        BoardCategory::Notice,
        BoardCategory::Free,
        BoardCategory::Qna,
        BoardCategory::Etc,
    ];

    /// Wire code used by the board service
    pub fn code(&self) -> &str {
        match self {
            BoardCategory::Notice => "NOTICE",
            BoardCategory::Free => "FREE",
            BoardCategory::Qna => "QNA",
            BoardCategory::Etc => "ETC",
            BoardCategory::Other(code) => code,
        }
    }

    /// Badge text shown next to a post
    pub fn label(&self) -> &str {
        match self {
            BoardCategory::Notice => "Notice",
            BoardCategory::Free => "Free",
            BoardCategory::Qna => "Q&A",
            BoardCategory::Etc => "Etc",
            BoardCategory::Other(code) => code,
        }
    }
}

impl From<String> for BoardCategory {
    fn from(code: String) -> Self {
        match code.as_str() {
            "NOTICE" => BoardCategory::Notice,
            "FREE" => BoardCategory::Free,
            "QNA" => BoardCategory::Qna,
            "ETC" => BoardCategory::Etc,
            _ => BoardCategory::Other(code),
        }
    }
}

impl From<BoardCategory> for String {
    fn from(category: BoardCategory) -> Self {
        category.code().to_string()
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BoardCategory {
    type Err = String;

    /// Parse user input such as `notice`, `QNA` or `q&a`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTICE" => Ok(BoardCategory::Notice),
            "FREE" => Ok(BoardCategory::Free),
            "QNA" | "Q&A" => Ok(BoardCategory::Qna),
            "ETC" => Ok(BoardCategory::Etc),
            _ => Err(format!(
                "Unknown category '{}' (expected one of NOTICE, FREE, QNA, ETC)",
                s
            )),
        }
    }
}

/// A post as it appears in the board list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub category: BoardCategory,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "imageUrls", default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// A single post with its optional image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDetail {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "boardCategory")]
    pub board_category: BoardCategory,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardListResponse {
    #[serde(default)]
    pub content: Vec<BoardSummary>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,
}

/// Fields of a post being written or edited; sent as the `request` part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardDraft {
    pub title: String,
    pub content: String,
    pub category: BoardCategory,
}

impl BoardDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: BoardCategory) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
        }
    }
}

impl From<&BoardDetail> for BoardDraft {
    /// Pre-fill an edit form from an existing post
    fn from(detail: &BoardDetail) -> Self {
        Self {
            title: detail.title.clone(),
            content: detail.content.clone(),
            category: detail.board_category.clone(),
        }
    }
}
