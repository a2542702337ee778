//!
//! Open state of the popup.
//!
//! Opening is immediate. Closing waits one frame unless forced, a
//! new request within that frame cancels the close. This collapses
//! close/open sequences during a focus hand-off.
//!

use crate::frames::{FrameGuard, Frames};

#[derive(Debug)]
pub struct DelayedOpen<T> {
    open: bool,
    pending: Option<FrameGuard<T>>,
}

impl<T> Default for DelayedOpen<T> {
    fn default() -> Self {
        Self {
            open: false,
            pending: None,
        }
    }
}

impl<T> DelayedOpen<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// A close is waiting for the next frame.
    pub fn is_closing(&self) -> bool {
        self.pending.as_ref().map(|v| v.is_pending()).unwrap_or(false)
    }

    /// Request a new state. A close is scheduled as `task`, the owner
    /// calls [DelayedOpen::apply_close] when it's due.
    ///
    /// Returns true if the state changed right now.
    pub fn request(&mut self, frames: &Frames<T>, open: bool, force: bool, task: T) -> bool {
        self.pending = None;
        if open || force {
            let changed = self.open != open;
            self.open = open;
            changed
        } else {
            if self.open {
                self.pending = Some(frames.guard(1, task));
            }
            false
        }
    }

    /// Apply a pending close. Returns true if the state changed.
    pub fn apply_close(&mut self) -> bool {
        self.pending = None;
        let changed = self.open;
        self.open = false;
        changed
    }

    /// Drop a pending close.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_delayed() {
        let f = Frames::new();
        let mut o = DelayedOpen::new();
        assert!(o.request(&f, true, false, ()));
        assert!(!o.request(&f, false, false, ()));
        assert!(o.is_open());
        assert!(o.is_closing());
        assert_eq!(f.advance().len(), 1);
        assert!(o.apply_close());
        assert!(!o.is_open());
    }

    #[test]
    fn test_reopen_cancels() {
        let f = Frames::new();
        let mut o = DelayedOpen::new();
        o.request(&f, true, false, ());
        o.request(&f, false, false, ());
        assert!(!o.request(&f, true, false, ()));
        assert!(f.advance().is_empty());
        assert!(o.is_open());
    }

    #[test]
    fn test_force() {
        let f = Frames::new();
        let mut o = DelayedOpen::new();
        o.request(&f, true, false, ());
        assert!(o.request(&f, false, true, ()));
        assert!(!o.is_open());
        assert!(f.is_empty());
    }
}
