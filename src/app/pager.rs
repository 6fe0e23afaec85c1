// Splits the filtered view into fixed-size pages and tracks the highlighted row.
//
// Selection is clamped at the page edges; crossing into another page only
// happens through `change_page`.

use std::ops::Range;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    len: usize,
    current_page: usize,
    selected_index: usize,
}

impl Pager {
    /// `page_size` of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            len: 0,
            current_page: 0,
            selected_index: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Index relative to the current page.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn total_pages(&self) -> usize {
        self.len.div_ceil(self.page_size).max(1)
    }

    pub fn last_page(&self) -> usize {
        self.total_pages() - 1
    }

    /// Positions of the filtered view shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size).min(self.len);
        let end = (start + self.page_size).min(self.len);
        start..end
    }

    fn rows_on_page(&self) -> usize {
        self.page_range().len()
    }

    /// Position of the highlighted row in the filtered view, if any row is visible.
    pub fn selected_position(&self) -> Option<usize> {
        let range = self.page_range();
        let position = range.start + self.selected_index;
        range.contains(&position).then_some(position)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.rows_on_page();
        if rows == 0 {
            self.selected_index = 0;
            return;
        }
        let target = self.selected_index.saturating_add_signed(delta);
        self.selected_index = target.min(rows - 1);
    }

    pub fn change_page(&mut self, delta: isize) {
        let target = self
            .current_page
            .saturating_add_signed(delta.signum())
            .min(self.last_page());
        if target != self.current_page {
            debug!(from = self.current_page, to = target, "page changed");
            self.current_page = target;
            self.selected_index = 0;
        }
    }

    /// Re-establishes the page/selection bounds after the filtered view changed length.
    pub fn reclamp(&mut self, new_len: usize) {
        self.len = new_len;
        let last_page = self.last_page();
        if self.current_page > last_page {
            debug!(from = self.current_page, to = last_page, "page clamped");
            self.current_page = last_page;
            self.selected_index = 0;
        }
        if self.selected_index >= self.rows_on_page() {
            self.selected_index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(page_size: usize, len: usize) -> Pager {
        let mut pager = Pager::new(page_size);
        pager.reclamp(len);
        pager
    }

    fn assert_in_bounds(p: &Pager, page_size: usize, len: usize) {
        let last_page = len.div_ceil(page_size).max(1) - 1;
        assert!(p.current_page() <= last_page);
        if len == 0 {
            assert_eq!(p.selected_index(), 0);
            assert_eq!(p.selected_position(), None);
        } else {
            let rows = page_size.min(len - p.current_page() * page_size);
            assert!(p.selected_index() < rows);
            assert!(p.selected_position().is_some_and(|pos| pos < len));
        }
    }

    #[test]
    fn test_single_page_cannot_advance() {
        let mut p = pager(10, 1);
        p.change_page(1);
        assert_eq!(p.current_page(), 0);
        assert_eq!(p.selected_position(), Some(0));
    }

    #[test]
    fn test_shrinking_view_pulls_back_to_first_page() {
        let mut p = pager(10, 25);
        p.change_page(1);
        p.change_page(1);
        assert_eq!(p.current_page(), 2);
        assert_eq!(p.page_range(), 20..25);
        p.move_selection(3);

        p.reclamp(5);
        assert_eq!(p.current_page(), 0);
        assert_eq!(p.selected_index(), 0);
    }

    #[test]
    fn test_selection_clamps_at_page_edges() {
        let mut p = pager(10, 25);
        p.move_selection(-1);
        assert_eq!(p.selected_index(), 0);
        p.move_selection(50);
        assert_eq!(p.selected_index(), 9);

        p.change_page(1);
        p.change_page(1);
        p.move_selection(50);
        assert_eq!(p.selected_index(), 4);
        assert_eq!(p.selected_position(), Some(24));
    }

    #[test]
    fn test_page_change_resets_selection_and_clamps() {
        let mut p = pager(10, 25);
        p.move_selection(4);
        p.change_page(1);
        assert_eq!((p.current_page(), p.selected_index()), (1, 0));
        p.move_selection(2);
        p.change_page(-1);
        assert_eq!((p.current_page(), p.selected_index()), (0, 0));
        p.change_page(-1);
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn test_selection_reset_when_page_shrinks_under_it() {
        let mut p = pager(10, 25);
        p.move_selection(8);
        p.reclamp(6);
        assert_eq!(p.current_page(), 0);
        assert_eq!(p.selected_index(), 0);
    }

    #[test]
    fn test_selection_kept_when_still_valid() {
        let mut p = pager(10, 25);
        p.move_selection(3);
        p.reclamp(12);
        assert_eq!(p.selected_index(), 3);
    }

    #[test]
    fn test_empty_view_has_no_selection() {
        let mut p = pager(10, 0);
        p.move_selection(1);
        p.change_page(1);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.page_range(), 0..0);
        assert_in_bounds(&p, 10, 0);
    }

    #[test]
    fn test_zero_page_size_is_raised_to_one() {
        let p = pager(0, 3);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.page_range(), 0..1);
    }

    #[test]
    fn test_reclamp_bounds_hold_for_every_length_change() {
        for page_size in [1, 3, 10] {
            for from in 0..30 {
                for to in 0..30 {
                    let mut p = pager(page_size, from);
                    for _ in 0..from {
                        p.change_page(1);
                    }
                    p.move_selection(page_size as isize);
                    p.reclamp(to);
                    assert_in_bounds(&p, page_size, to);
                }
            }
        }
    }
}
