/// Page cursor for the content panel. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current_page: usize,
    pub total_pages: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
        }
    }
}

impl Pager {
    /// Number of pages needed for `line_count` lines at `page_lines` per page.
    /// Always at least one.
    pub fn pages_for(line_count: usize, page_lines: usize) -> usize {
        if page_lines == 0 {
            return 1;
        }
        line_count.div_ceil(page_lines).max(1)
    }

    /// Back to page 1 of `total_pages`.
    pub fn reset(&mut self, total_pages: usize) {
        self.current_page = 1;
        self.total_pages = total_pages.max(1);
    }

    /// Change the page count without moving off the current page unless it
    /// no longer exists.
    pub fn set_total(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
        self.current_page = self.current_page.min(self.total_pages);
    }

    pub fn next(&mut self) {
        if self.current_page < self.total_pages {
            self.current_page += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Index range of the lines shown on the current page.
    pub fn line_range(&self, page_lines: usize, line_count: usize) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(page_lines)
            .min(line_count);
        let end = start.saturating_add(page_lines).min(line_count);
        start..end
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}
