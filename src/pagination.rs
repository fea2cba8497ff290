//! Relay-style cursor pagination over GraphQL connections.

/// Which way a page transition moves through the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Variables for one page fetch. Exactly one direction is ever populated;
/// the other side's size and cursor stay `None` and serialize as null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
}

impl PageParams {
    pub fn first_page(size: u32) -> Self {
        Self {
            first: Some(size),
            ..Self::default()
        }
    }

    pub fn forward(size: u32, after: String) -> Self {
        Self {
            first: Some(size),
            after: Some(after),
            ..Self::default()
        }
    }

    pub fn backward(size: u32, before: String) -> Self {
        Self {
            last: Some(size),
            before: Some(before),
            ..Self::default()
        }
    }
}

/// Server-confirmed cursor window for the page currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of a connection. Each navigation replaces the previous page
/// wholesale; items are never accumulated.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u32,
    pub page_info: PageInfo,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_info: PageInfo::default(),
        }
    }
}

/// Tracks where a view sits inside a paginated connection. The page counter
/// only moves when a server response lands, so it always reflects the last
/// confirmed cursor window.
#[derive(Debug, Clone)]
pub struct Pager {
    page_size: u32,
    current_page: u32,
    total_count: u32,
    info: PageInfo,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            current_page: 1,
            total_count: 0,
            info: PageInfo::default(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.info.has_next_page
    }

    pub fn has_previous(&self) -> bool {
        self.info.has_previous_page
    }

    /// Variables for the page-1 fetch. Refresh uses these too.
    pub fn first_page(&self) -> PageParams {
        PageParams::first_page(self.page_size)
    }

    /// Forward fetch variables, or `None` when the confirmed window has no
    /// next page. Callers treat `None` as a no-op rather than an error.
    pub fn next(&self) -> Option<PageParams> {
        if !self.info.has_next_page {
            return None;
        }
        let after = self.info.end_cursor.clone()?;
        Some(PageParams::forward(self.page_size, after))
    }

    pub fn previous(&self) -> Option<PageParams> {
        if !self.info.has_previous_page {
            return None;
        }
        let before = self.info.start_cursor.clone()?;
        Some(PageParams::backward(self.page_size, before))
    }

    /// Absorb a fetched page. `direction` is the transition the fetch was
    /// issued for; `None` means an initial load or refresh, which resets the
    /// counter to page 1.
    pub fn absorb(&mut self, direction: Option<Direction>, total_count: u32, info: PageInfo) {
        match direction {
            None => self.current_page = 1,
            Some(Direction::Forward) => self.current_page += 1,
            Some(Direction::Backward) => {
                self.current_page = self.current_page.saturating_sub(1).max(1);
            }
        }
        self.total_count = total_count;
        self.info = info;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(has_next: bool, has_prev: bool) -> PageInfo {
        PageInfo {
            has_next_page: has_next,
            has_previous_page: has_prev,
            start_cursor: Some("start".to_string()),
            end_cursor: Some("end".to_string()),
        }
    }

    #[test]
    fn first_page_params_populate_the_forward_side_only() {
        let params = PageParams::first_page(5);
        assert_eq!(params.first, Some(5));
        assert!(params.after.is_none());
        assert!(params.last.is_none());
        assert!(params.before.is_none());
    }

    #[test]
    fn directions_are_mutually_exclusive() {
        let forward = PageParams::forward(5, "c".into());
        assert!(forward.last.is_none() && forward.before.is_none());

        let backward = PageParams::backward(5, "c".into());
        assert!(backward.first.is_none() && backward.after.is_none());
        assert_eq!(backward.last, Some(5));
        assert_eq!(backward.before.as_deref(), Some("c"));
    }

    #[test]
    fn next_requires_both_flag_and_cursor() {
        let mut pager = Pager::new(5);
        assert!(pager.next().is_none());

        pager.absorb(None, 12, window(true, false));
        let params = pager.next().unwrap();
        assert_eq!(params.first, Some(5));
        assert_eq!(params.after.as_deref(), Some("end"));

        // Flag set but no cursor reported: still nothing to fetch.
        pager.absorb(
            None,
            12,
            PageInfo {
                has_next_page: true,
                ..PageInfo::default()
            },
        );
        assert!(pager.next().is_none());
    }

    #[test]
    fn previous_is_gated_on_the_flag() {
        let mut pager = Pager::new(5);
        pager.absorb(None, 12, window(true, false));
        assert!(pager.previous().is_none());

        pager.absorb(None, 12, window(false, true));
        assert_eq!(pager.previous().unwrap().before.as_deref(), Some("start"));
    }

    #[test]
    fn counter_follows_navigation_and_resets_on_refresh() {
        let mut pager = Pager::new(5);
        pager.absorb(None, 12, window(true, false));
        assert_eq!(pager.current_page(), 1);

        pager.absorb(Some(Direction::Forward), 12, window(true, true));
        assert_eq!(pager.current_page(), 2);
        pager.absorb(Some(Direction::Forward), 12, window(false, true));
        assert_eq!(pager.current_page(), 3);

        pager.absorb(Some(Direction::Backward), 12, window(true, true));
        assert_eq!(pager.current_page(), 2);

        pager.absorb(None, 12, window(true, false));
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let mut pager = Pager::new(5);
        pager.absorb(None, 12, window(true, false));
        assert_eq!(pager.total_pages(), 3);

        pager.absorb(None, 10, window(true, false));
        assert_eq!(pager.total_pages(), 2);

        pager.absorb(None, 0, PageInfo::default());
        assert_eq!(pager.total_pages(), 0);
    }
}
