//!
//! Active field of a picker.
//!
//! Besides the active index this keeps the list of fields activated
//! during the current interactive session. The list decides which
//! field a range picker moves to after a part is confirmed, and
//! whether the range is complete.
//!

/// What the user did last.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Typed into a field.
    #[default]
    Input,
    /// Used the panel.
    Panel,
}

#[derive(Debug, Clone)]
pub struct ActiveState<const N: usize> {
    active: usize,
    list: Vec<usize>,
    submit_index: Option<usize>,
    /// Last operation.
    pub last_operation: Operation,
}

impl<const N: usize> Default for ActiveState<N> {
    fn default() -> Self {
        Self {
            active: 0,
            list: Vec::new(),
            submit_index: None,
            last_operation: Default::default(),
        }
    }
}

impl<const N: usize> ActiveState<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active field.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Activate a field and add it to the list.
    pub fn set_active(&mut self, index: usize) {
        if index < N {
            self.active = index;
            self.list.push(index);
        }
    }

    /// Fields activated during this session, in order.
    pub fn list(&self) -> &[usize] {
        &self.list
    }

    /// Field with a confirmed part.
    pub fn update_submit_index(&mut self, index: usize) {
        self.submit_index = Some(index);
    }

    pub fn has_active_submit_value(&self, index: usize) -> bool {
        self.submit_index == Some(index)
    }

    /// Session ended.
    pub fn reset(&mut self) {
        self.list.clear();
        self.submit_index = None;
    }

    /// The field to activate after the active part is confirmed.
    ///
    /// None if both fields of a range have been visited and hold a
    /// value (or may be empty), or if the other field is disabled.
    /// Always None for a single field.
    pub fn next_active_index<D>(
        &self,
        value: &[Option<D>; N],
        allow_empty: &[bool; N],
        disabled: &[bool; N],
    ) -> Option<usize> {
        if N < 2 {
            return None;
        }

        let mut filled = [false; N];
        for i in self.list.iter().copied() {
            if value[i].is_some() || allow_empty[i] {
                filled[i] = true;
            }
        }
        let filled = filled.iter().filter(|v| **v).count();

        let next = if self.list.last() == Some(&0) { 1 } else { 0 };
        if filled >= 2 || disabled[next] {
            None
        } else {
            Some(next)
        }
    }

    /// First activated field holding a value. It's the `from` date for
    /// the field at `index`, unless it is that field.
    pub fn from_index<D>(&self, value: &[Option<D>; N], index: usize) -> Option<usize> {
        let first = self.list.iter().copied().find(|i| value[*i].is_some())?;
        if first != index {
            Some(first)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_active() {
        let mut a = ActiveState::<2>::new();
        a.set_active(0);
        assert_eq!(
            a.next_active_index(&[Some(1), None], &[false; 2], &[false; 2]),
            Some(1)
        );
        a.set_active(1);
        assert_eq!(
            a.next_active_index(&[Some(1), Some(2)], &[false; 2], &[false; 2]),
            None
        );
        assert_eq!(
            a.next_active_index(&[Some(1), None], &[false; 2], &[false; 2]),
            Some(0)
        );
    }

    #[test]
    fn test_next_active_disabled() {
        let mut a = ActiveState::<2>::new();
        a.set_active(0);
        assert_eq!(
            a.next_active_index(&[Some(1), Some(2)], &[false; 2], &[false, true]),
            None
        );
    }

    #[test]
    fn test_single() {
        let mut a = ActiveState::<1>::new();
        a.set_active(0);
        assert_eq!(a.next_active_index(&[None::<u32>], &[true], &[false]), None);
    }

    #[test]
    fn test_from_index() {
        let mut a = ActiveState::<2>::new();
        a.set_active(0);
        a.set_active(1);
        assert_eq!(a.from_index(&[Some(1), None], 1), Some(0));
        assert_eq!(a.from_index(&[Some(1), None], 0), None);
        a.reset();
        assert_eq!(a.from_index(&[Some(1), None], 1), None);
    }
}
