//!
//! Frame counted deferred tasks.
//!
//! The application calls [Frames::advance] once per rendered frame
//! (the pickers do this in their `tick()`), and gets back the tasks
//! that became due.
//!
//! Everything that is scheduled can be cancelled. [FrameGuard] cancels
//! its task when it is dropped, so a state that holds the guard
//! can't get a stale task after it replaced or dropped the guard.
//!

#[allow(unused_imports)]
use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// Queue of frame counted tasks.
///
/// Clones share the same queue.
pub struct Frames<T> {
    inner: Rc<FramesImpl<T>>,
}

struct FramesImpl<T> {
    tags: Cell<usize>,
    frame: Cell<u64>,
    tasks: RefCell<Vec<Pending<T>>>,
}

struct Pending<T> {
    tag: usize,
    due: u64,
    task: T,
}

/// Handle for a scheduled task.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FrameHandle(usize);

impl<T> Default for Frames<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(FramesImpl {
                tags: Cell::new(0),
                frame: Cell::new(0),
                tasks: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl<T> Clone for Frames<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Debug> Debug for Frames<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tasks = self.inner.tasks.borrow();
        f.debug_struct("Frames")
            .field("frame", &self.inner.frame.get())
            .field(
                "tasks",
                &tasks
                    .iter()
                    .map(|v| (v.tag, v.due, &v.task))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> Frames<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame count.
    pub fn frame(&self) -> u64 {
        self.inner.frame.get()
    }

    /// Schedule a task that is due after the given number of frames.
    /// 0 frames is due with the next advance too.
    #[must_use]
    pub fn schedule(&self, frames: u32, task: T) -> FrameHandle {
        let tag = self.inner.tags.get() + 1;
        self.inner.tags.set(tag);

        let due = self.inner.frame.get() + frames.max(1) as u64;
        self.inner.tasks.borrow_mut().push(Pending { tag, due, task });

        FrameHandle(tag)
    }

    /// Schedule a task and return a guard that cancels it when dropped.
    #[must_use]
    pub fn guard(&self, frames: u32, task: T) -> FrameGuard<T> {
        let handle = self.schedule(frames, task);
        FrameGuard {
            frames: Rc::downgrade(&self.inner),
            handle,
        }
    }

    /// Cancel a task. Returns the task if it was still pending.
    pub fn cancel(&self, handle: FrameHandle) -> Option<T> {
        Self::cancel_impl(&self.inner, handle)
    }

    fn cancel_impl(inner: &FramesImpl<T>, handle: FrameHandle) -> Option<T> {
        let mut tasks = inner.tasks.borrow_mut();
        let idx = tasks.iter().position(|v| v.tag == handle.0)?;
        Some(tasks.remove(idx).task)
    }

    /// Task still pending.
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner.tasks.borrow().iter().any(|v| v.tag == handle.0)
    }

    /// No pending tasks.
    pub fn is_empty(&self) -> bool {
        self.inner.tasks.borrow().is_empty()
    }

    /// Cancel everything.
    pub fn clear(&self) {
        self.inner.tasks.borrow_mut().clear();
    }

    /// Next frame. Returns all tasks that are due, in the order
    /// they were scheduled.
    pub fn advance(&self) -> Vec<T> {
        let frame = self.inner.frame.get() + 1;
        self.inner.frame.set(frame);

        let mut tasks = self.inner.tasks.borrow_mut();
        let mut due = Vec::new();
        let mut i = 0;
        while i < tasks.len() {
            if tasks[i].due <= frame {
                due.push(tasks.remove(i).task);
            } else {
                i += 1;
            }
        }
        due
    }
}

/// Cancels the task when dropped.
pub struct FrameGuard<T> {
    frames: Weak<FramesImpl<T>>,
    handle: FrameHandle,
}

impl<T> Debug for FrameGuard<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameGuard")
            .field("handle", &self.handle)
            .finish()
    }
}

impl<T> FrameGuard<T> {
    pub fn handle(&self) -> FrameHandle {
        self.handle
    }

    /// Task has not run yet.
    pub fn is_pending(&self) -> bool {
        match self.frames.upgrade() {
            Some(inner) => inner.tasks.borrow().iter().any(|v| v.tag == self.handle.0),
            None => false,
        }
    }
}

impl<T> Drop for FrameGuard<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.frames.upgrade() {
            _ = Frames::cancel_impl(&inner, self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due() {
        let f = Frames::new();
        let _a = f.schedule(2, "a");
        let _b = f.schedule(1, "b");
        let _c = f.schedule(0, "c");
        assert_eq!(f.advance(), vec!["b", "c"]);
        assert_eq!(f.advance(), vec!["a"]);
        assert!(f.advance().is_empty());
        assert!(f.is_empty());
    }

    #[test]
    fn test_cancel() {
        let f = Frames::new();
        let a = f.schedule(2, 1);
        assert!(f.is_pending(a));
        assert_eq!(f.cancel(a), Some(1));
        assert_eq!(f.cancel(a), None);
        f.advance();
        assert!(f.advance().is_empty());
    }

    #[test]
    fn test_guard() {
        let f = Frames::new();
        let g = f.guard(1, 1);
        assert!(g.is_pending());
        drop(g);
        assert!(f.advance().is_empty());

        let g = f.guard(1, 2);
        assert_eq!(f.advance(), vec![2]);
        assert!(!g.is_pending());
    }

    #[test]
    fn test_guard_replaced() {
        let f = Frames::new();
        let mut g = Some(f.guard(2, "first"));
        f.advance();
        g = Some(f.guard(2, "second"));
        assert_eq!(f.advance(), Vec::<&str>::new());
        assert_eq!(f.advance(), vec!["second"]);
        drop(g);
    }
}
