/// ordered line positions with a cyclic cursor
///
/// the cursor is an offset into `positions`, or `None` before the first visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavList {
    positions: Vec<usize>,
    offset: Option<usize>,
}

impl NavList {
    pub fn new(positions: Vec<usize>) -> Self {
        Self {
            positions,
            offset: None,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// line position under the cursor
    pub fn current(&self) -> Option<usize> {
        self.positions.get(self.offset?).copied()
    }

    /// 1-based cursor position for display; an unset cursor shows as 1
    pub fn display_position(&self) -> usize {
        self.offset.unwrap_or(0) + 1
    }

    pub fn select_first(&mut self) {
        self.offset = if self.positions.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// advance and wrap from last to first; an unset cursor lands on the first
    pub fn select_next_circular(&mut self) -> Option<usize> {
        let len = self.positions.len();
        if len == 0 {
            self.offset = None;
            return None;
        }

        let next = match self.offset {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.offset = Some(next);
        self.current()
    }

    /// retreat and wrap from first to last; an unset cursor counts as the
    /// first, so it lands on the last
    pub fn select_previous_circular(&mut self) -> Option<usize> {
        let len = self.positions.len();
        if len == 0 {
            self.offset = None;
            return None;
        }

        let current = self.offset.unwrap_or(0);
        let prev = (current + len - 1) % len;
        self.offset = Some(prev);
        self.current()
    }
}
