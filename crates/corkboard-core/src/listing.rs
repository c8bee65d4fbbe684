//! Client-side filtering and pagination of the board list.
//!
//! The whole list is fetched in one request and sliced locally; the
//! service's own paging metadata is ignored.

use crate::models::{BoardCategory, BoardSummary};

/// Posts shown per page.
pub const PAGE_SIZE: usize = 10;

/// Number of posts requested from the service in one go.
pub const FETCH_SIZE: usize = 1000;

/// Notices shown in the side panel.
pub const NOTICE_PANEL_SIZE: usize = 5;

/// Query string used to fetch the full list.
pub fn fetch_all_query() -> String {
    format!("page=0&size={}", FETCH_SIZE)
}

/// One page of the (optionally filtered) board list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPage {
    pub content: Vec<BoardSummary>,
    /// Zero-based page index
    pub page: usize,
    pub total_pages: usize,
    pub total_elements: usize,
    /// Latest notices, taken from the unfiltered list
    pub notices: Vec<BoardSummary>,
}

impl BoardPage {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Slice `all` into the requested page, keeping only `category` when given.
pub fn paginate(all: &[BoardSummary], category: Option<&BoardCategory>, page: usize) -> BoardPage {
    let filtered: Vec<&BoardSummary> = all
        .iter()
        .filter(|b| category.map_or(true, |c| &b.category == c))
        .collect();

    let total_elements = filtered.len();
    let total_pages = total_elements.div_ceil(PAGE_SIZE);
    let content = filtered
        .into_iter()
        .skip(page.saturating_mul(PAGE_SIZE))
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    BoardPage {
        content,
        page,
        total_pages,
        total_elements,
        notices: latest_notices(all),
    }
}

fn latest_notices(all: &[BoardSummary]) -> Vec<BoardSummary> {
    all.iter()
        .filter(|b| b.category == BoardCategory::Notice)
        .take(NOTICE_PANEL_SIZE)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: i64, category: BoardCategory) -> BoardSummary {
        BoardSummary {
            id,
            title: format!("Post {}", id),
            category,
            content: String::new(),
            created_at: "2024-05-01T09:30:00".into(),
            image_urls: Vec::new(),
        }
    }

    /// 25 posts: every fifth is a notice, the rest alternate FREE / QNA
    fn sample() -> Vec<BoardSummary> {
        (0..25)
            .map(|i| {
                let category = if i % 5 == 0 {
                    BoardCategory::Notice
                } else if i % 2 == 0 {
                    BoardCategory::Free
                } else {
                    BoardCategory::Qna
                };
                board(i, category)
            })
            .collect()
    }

    #[test]
    fn test_fetch_all_query() {
        assert_eq!(fetch_all_query(), "page=0&size=1000");
    }

    #[test]
    fn test_first_page_unfiltered() {
        let page = paginate(&sample(), None, 0);
        assert_eq!(page.content.len(), 10);
        assert_eq!(page.content[0].id, 0);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = paginate(&sample(), None, 2);
        let ids: Vec<i64> = page.content.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![20, 21, 22, 23, 24]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(&sample(), None, 7);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_category_filter() {
        let page = paginate(&sample(), Some(&BoardCategory::Notice), 0);
        let ids: Vec<i64> = page.content.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 5, 10, 15, 20]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 1);

        let page = paginate(&sample(), Some(&BoardCategory::Etc), 0);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_notices_ignore_filter_and_cap_at_five() {
        let mut all = sample();
        all.extend((100..104).map(|i| board(i, BoardCategory::Notice)));

        let page = paginate(&all, Some(&BoardCategory::Free), 0);
        let ids: Vec<i64> = page.notices.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 5, 10, 15, 20]);
    }

    #[test]
    fn test_empty_list() {
        let page = paginate(&[], None, 0);
        assert_eq!(page, BoardPage::default());
    }
}
