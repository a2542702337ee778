//!
//! Scrolls a time column to the selected unit.
//!
//! Each frame moves a third of the remaining distance, rounded up,
//! until the target row is the first visible row. A new target or
//! [TimeScroll::cancel] drops the pending step.
//!

use crate::frames::{FrameGuard, Frames};

#[derive(Debug)]
pub struct TimeScroll<T> {
    offset: usize,
    target: Option<usize>,
    pending: Option<FrameGuard<T>>,
}

impl<T> Default for TimeScroll<T> {
    fn default() -> Self {
        Self {
            offset: 0,
            target: None,
            pending: None,
        }
    }
}

impl<T> TimeScroll<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current target.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Scrolling.
    pub fn is_scrolling(&self) -> bool {
        self.pending.as_ref().map(|v| v.is_pending()).unwrap_or(false)
    }

    /// Set the offset directly, e.g. from a scrollbar.
    pub fn set_offset(&mut self, offset: usize) {
        self.cancel();
        self.offset = offset;
    }

    /// Start scrolling to the row. The owner calls [TimeScroll::step]
    /// whenever `task` is due.
    pub fn scroll_to(&mut self, frames: &Frames<T>, row: usize, task: T) {
        if self.target == Some(row) && self.is_scrolling() {
            return;
        }
        self.pending = None;
        if self.offset == row {
            self.target = None;
            return;
        }
        self.target = Some(row);
        self.pending = Some(frames.guard(1, task));
    }

    /// One step. Schedules the next step as `task` until the target
    /// is reached. Returns true if the offset changed.
    pub fn step(&mut self, frames: &Frames<T>, task: T) -> bool {
        self.pending = None;
        let Some(target) = self.target else {
            return false;
        };

        let diff = target.abs_diff(self.offset);
        let step = diff.div_ceil(3);
        if target > self.offset {
            self.offset += step;
        } else {
            self.offset -= step;
        }

        if self.offset == target {
            self.target = None;
        } else {
            self.pending = Some(frames.guard(1, task));
        }
        step > 0
    }

    /// Stop scrolling.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease() {
        let f = Frames::new();
        let mut s = TimeScroll::new();
        s.scroll_to(&f, 10, ());

        let mut offsets = Vec::new();
        while !f.advance().is_empty() {
            s.step(&f, ());
            offsets.push(s.offset());
        }
        assert_eq!(offsets, vec![4, 6, 8, 9, 10]);
        assert!(!s.is_scrolling());
    }

    #[test]
    fn test_retarget() {
        let f = Frames::new();
        let mut s = TimeScroll::new();
        s.scroll_to(&f, 9, ());
        f.advance();
        s.step(&f, ());
        assert_eq!(s.offset(), 3);
        s.scroll_to(&f, 0, ());
        f.advance();
        s.step(&f, ());
        assert_eq!(s.offset(), 2);
    }

    #[test]
    fn test_cancel() {
        let f = Frames::new();
        let mut s = TimeScroll::new();
        s.scroll_to(&f, 9, ());
        s.cancel();
        assert!(f.advance().is_empty());
        assert_eq!(s.offset(), 0);
    }
}
