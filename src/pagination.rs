//! Pagination and search view-state shared by every list page
//!
//! List pages hold a [`ViewState`] (page, page size, search query) and move
//! between states only through [`ViewState::apply`], so changing the search
//! text or the page size always lands back on the first page.

use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::trim;

/// Page size used when the request does not specify one
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Page sizes offered by the "rows per page" selector
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 15, 20];

/// Largest page size the backend accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parameters sent to a backend list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRequest {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Default for ListRequest {
    /// First page of 20 rows, no search
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            query: None,
        }
    }
}

impl ListRequest {
    /// Single large page used to fill select boxes (borrow, return, add copy)
    pub fn picker() -> Self {
        Self {
            page: 1,
            limit: MAX_PAGE_SIZE,
            query: None,
        }
    }
}

/// Visible slice of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// 1-based index of the first visible row, 0 when there are no rows
    pub start: u64,
    /// 1-based index of the last visible row, 0 when there are no rows
    pub end: u64,
    pub total_pages: u64,
}

/// Derive list request parameters. The query is only sent when the trimmed
/// search text is non-empty.
pub fn compute_request(page: u32, page_size: u32, search: Option<&str>) -> ListRequest {
    let query = trim(search);
    ListRequest {
        page: page.max(1),
        limit: page_size.max(1),
        query: (!query.is_empty()).then_some(query),
    }
}

/// Compute the visible range and page count from a response's total count.
pub fn compute_range(page: u32, page_size: u32, total_count: u64) -> PageRange {
    let page = u64::from(page.max(1));
    let page_size = u64::from(page_size.max(1));
    let total_pages = total_count.div_ceil(page_size).max(1);

    if total_count == 0 {
        return PageRange {
            start: 0,
            end: 0,
            total_pages,
        };
    }

    PageRange {
        start: (page - 1) * page_size + 1,
        end: (page * page_size).min(total_count),
        total_pages,
    }
}

/// Query string parameters of a list page (`?page=2&limit=10&q=tolkien`).
/// Unparsable numbers (`?page=abc`, `?page=-1`) are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()))
}

/// User input that moves a list page to its next state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// Submit the search box
    Search(String),
    /// Pick a different "rows per page" value
    ChangePageSize(u32),
    GoToPage(u32),
}

/// Caller-held state of a list page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: u32,
    pub page_size: u32,
    /// Trimmed, non-empty search query
    pub query: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            query: None,
        }
    }
}

impl ViewState {
    /// Build the state from request parameters by replaying them as events
    /// on the default state: page size, then search, then page. A search
    /// submission carries no `page`, so it lands on page 1.
    pub fn from_params(params: &ListParams) -> Self {
        let mut state = Self::default();
        if let Some(limit) = params.limit {
            state = state.apply(ListEvent::ChangePageSize(limit));
        }
        if let Some(query) = &params.q {
            state = state.apply(ListEvent::Search(query.clone()));
        }
        if let Some(page) = params.page {
            state = state.apply(ListEvent::GoToPage(page));
        }
        state
    }

    /// Transition to the next state. Search and page-size changes reset the
    /// page to 1.
    pub fn apply(&self, event: ListEvent) -> Self {
        match event {
            ListEvent::Search(text) => {
                let query = trim(Some(&text));
                Self {
                    page: 1,
                    page_size: self.page_size,
                    query: (!query.is_empty()).then_some(query),
                }
            }
            ListEvent::ChangePageSize(size) => Self {
                page: 1,
                page_size: size.clamp(1, MAX_PAGE_SIZE),
                query: self.query.clone(),
            },
            ListEvent::GoToPage(page) => Self {
                page: page.max(1),
                page_size: self.page_size,
                query: self.query.clone(),
            },
        }
    }

    pub fn request(&self) -> ListRequest {
        compute_request(self.page, self.page_size, self.query.as_deref())
    }

    pub fn range(&self, total_count: u64) -> PageRange {
        compute_range(self.page, self.page_size, total_count)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_count: u64) -> bool {
        u64::from(self.page) < self.range(total_count).total_pages
    }

    pub fn params(&self) -> ListParams {
        ListParams {
            page: Some(self.page),
            limit: Some(self.page_size),
            q: self.query.clone(),
        }
    }

    /// Link to this state on the given path
    pub fn href(&self, path: &str) -> String {
        match serde_html_form::to_string(self.params()) {
            Ok(query) if !query.is_empty() => format!("{}?{}", path, query),
            _ => path.to_string(),
        }
    }

    /// Everything a template needs to draw the pagination controls
    pub fn pager(&self, path: &str, total_count: u64) -> Pager {
        let range = self.range(total_count);
        let mut page_sizes: Vec<PageSizeLink> = PAGE_SIZE_OPTIONS
            .iter()
            .map(|&size| PageSizeLink {
                size,
                href: self.apply(ListEvent::ChangePageSize(size)).href(path),
                selected: size == self.page_size,
            })
            .collect();
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            page_sizes.push(PageSizeLink {
                size: self.page_size,
                href: self.href(path),
                selected: true,
            });
        }

        Pager {
            page: self.page,
            page_size: self.page_size,
            total_count,
            start: range.start,
            end: range.end,
            total_pages: range.total_pages,
            prev_href: self
                .has_prev()
                .then(|| self.apply(ListEvent::GoToPage(self.page - 1)).href(path)),
            next_href: self
                .has_next(total_count)
                .then(|| self.apply(ListEvent::GoToPage(self.page + 1)).href(path)),
            page_sizes,
            query: self.query.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSizeLink {
    pub size: u32,
    pub href: String,
    pub selected: bool,
}

/// Template model of the pagination controls
#[derive(Debug, Clone, Serialize)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub start: u64,
    pub end: u64,
    pub total_pages: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub page_sizes: Vec<PageSizeLink>,
    pub query: Option<String>,
}
