//! Page flow: the running vertical cursor, the page-break rule, and the lazy
//! per-page header callback.

use pdf_writer::Content;

// A4 geometry in points. The header band occupies the strip between
// HEADER_TOP and CONTENT_TOP; the cursor always resets to CONTENT_TOP.
pub(crate) const PAGE_WIDTH: f32 = 595.276;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;
pub(crate) const MARGIN_LEFT: f32 = 40.0;
pub(crate) const MARGIN_RIGHT: f32 = 40.0;
pub(crate) const MARGIN_BOTTOM: f32 = 48.0;
pub(crate) const HEADER_TOP: f32 = PAGE_HEIGHT - 36.0;
pub(crate) const CONTENT_TOP: f32 = PAGE_HEIGHT - 108.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

pub(crate) struct Page {
    /// 1-based page number.
    pub ordinal: usize,
    pub header_drawn: bool,
    /// Y of the next row's top edge; decreases as rows are placed.
    pub cursor: f32,
    pub content: Content,
}

impl Page {
    fn fresh(ordinal: usize) -> Self {
        Self {
            ordinal,
            header_drawn: false,
            cursor: CONTENT_TOP,
            content: Content::new(),
        }
    }
}

/// Owns the page sequence during layout. The header callback fires exactly once
/// per page, lazily, strictly before any content is placed on that page. The
/// same rule covers planned breaks and the trailer's forced break.
pub(crate) struct PageFlow<'a> {
    pages: Vec<Page>,
    on_page_start: Box<dyn FnMut(&mut Page) + 'a>,
}

impl<'a> PageFlow<'a> {
    pub(crate) fn new(on_page_start: impl FnMut(&mut Page) + 'a) -> Self {
        Self {
            pages: vec![Page::fresh(1)],
            on_page_start: Box::new(on_page_start),
        }
    }

    pub(crate) fn current(&mut self) -> &mut Page {
        self.pages.last_mut().expect("flow always holds a page")
    }

    pub(crate) fn page_ordinal(&self) -> usize {
        self.pages.last().expect("flow always holds a page").ordinal
    }

    fn ensure_page_started(&mut self) {
        let page = self.pages.last_mut().expect("flow always holds a page");
        if !page.header_drawn {
            (self.on_page_start)(page);
            page.header_drawn = true;
        }
    }

    /// Break rule: the block does not fit below the cursor. Not triggered at
    /// the top of a fresh page, where breaking again could never help. The
    /// slack keeps float noise from flipping an exact fit into an overflow.
    fn needs_break(&self, height: f32) -> bool {
        const BREAK_SLACK: f32 = 0.01;
        let page = self.pages.last().expect("flow always holds a page");
        let at_page_top = (page.cursor - CONTENT_TOP).abs() < 0.5;
        !at_page_top && page.cursor - height < MARGIN_BOTTOM - BREAK_SLACK
    }

    /// Finalize the current page and open the next one: cursor back to
    /// CONTENT_TOP, ordinal incremented, header flag unset.
    fn break_page(&mut self) {
        let next = self.page_ordinal() + 1;
        self.pages.push(Page::fresh(next));
    }

    /// Reserve a row of `height` on the current page, breaking first if it
    /// would cross the bottom margin. Returns the row's top edge.
    pub(crate) fn place_row(&mut self, height: f32) -> f32 {
        if self.needs_break(height) {
            self.break_page();
        }
        self.ensure_page_started();
        let page = self.current();
        let top = page.cursor;
        page.cursor -= height;
        top
    }

    /// Guarantee `height` of room below the cursor without consuming it,
    /// forcing at most one break. Used for the trailer block.
    pub(crate) fn ensure_room(&mut self, height: f32) {
        if self.needs_break(height) {
            self.break_page();
        }
        self.ensure_page_started();
    }

    pub(crate) fn into_pages(mut self) -> Vec<Page> {
        // A document with no content still gets its header.
        self.ensure_page_started();
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn break_happens_exactly_at_the_boundary() {
        let mut flow = PageFlow::new(|_| {});
        // Consume all but 100pt of the first page.
        flow.place_row(CONTENT_TOP - MARGIN_BOTTOM - 100.0);
        assert_eq!(flow.page_ordinal(), 1);

        // Exactly filling the remaining space is not an overflow.
        let remaining = flow.current().cursor - MARGIN_BOTTOM;
        flow.place_row(remaining);
        assert_eq!(flow.page_ordinal(), 1);

        // The next row, however small, must go to a new page.
        flow.place_row(0.5);
        assert_eq!(flow.page_ordinal(), 2);
        assert!((flow.current().cursor - (CONTENT_TOP - 0.5)).abs() < 1e-3);
    }

    #[test]
    fn straddling_row_moves_whole_to_next_page() {
        let mut flow = PageFlow::new(|_| {});
        flow.place_row(CONTENT_TOP - MARGIN_BOTTOM - 10.0);
        let top = flow.place_row(20.0);
        assert_eq!(flow.page_ordinal(), 2);
        assert!((top - CONTENT_TOP).abs() < 1e-3);
    }

    #[test]
    fn header_fires_once_per_page_before_first_row() {
        let events: RefCell<Vec<String>> = RefCell::new(Vec::new());
        {
            let mut flow =
                PageFlow::new(|page| events.borrow_mut().push(format!("header:{}", page.ordinal)));
            let page_h = CONTENT_TOP - MARGIN_BOTTOM;
            for _ in 0..5 {
                flow.place_row(page_h * 0.4);
                events
                    .borrow_mut()
                    .push(format!("row:{}", flow.page_ordinal()));
            }
        }
        assert_eq!(
            events.into_inner(),
            [
                "header:1", "row:1", "row:1", "header:2", "row:2", "row:2", "header:3", "row:3",
            ]
        );
    }

    #[test]
    fn ensure_room_forces_a_single_break() {
        let events: RefCell<Vec<usize>> = RefCell::new(Vec::new());
        let mut flow = PageFlow::new(|page| events.borrow_mut().push(page.ordinal));
        flow.place_row(CONTENT_TOP - MARGIN_BOTTOM - 30.0);
        flow.ensure_room(80.0);
        assert_eq!(flow.page_ordinal(), 2);
        assert!((flow.current().cursor - CONTENT_TOP).abs() < 1e-3);
        // Header re-fired for the fresh page, once.
        assert_eq!(*events.borrow(), [1, 2]);

        // Room already available: no further break.
        flow.ensure_room(80.0);
        assert_eq!(flow.page_ordinal(), 2);
    }

    #[test]
    fn empty_document_still_draws_one_header() {
        let count: RefCell<usize> = RefCell::new(0);
        let pages = PageFlow::new(|_| *count.borrow_mut() += 1).into_pages();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].header_drawn);
        assert_eq!(count.into_inner(), 1);
    }

    #[test]
    fn oversized_row_does_not_loop() {
        let mut flow = PageFlow::new(|_| {});
        flow.place_row(10.0);
        let top = flow.place_row(2.0 * PAGE_HEIGHT);
        assert_eq!(flow.page_ordinal(), 2);
        assert!((top - CONTENT_TOP).abs() < 1e-3);
    }
}
