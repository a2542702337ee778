///
/// Value that can be controlled from outside.
///
/// Without a controlled value the inner value is used. Setting the
/// inner value while controlled is remembered, but stays invisible
/// until the control is released.
///
#[derive(Debug, Default, Clone)]
pub struct MergedState<T> {
    inner: T,
    controlled: Option<T>,
}

impl<T> MergedState<T> {
    pub fn new(default_value: T) -> Self {
        Self {
            inner: default_value,
            controlled: None,
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        match &self.controlled {
            Some(v) => v,
            None => &self.inner,
        }
    }

    /// The inner value, whether controlled or not.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Set the inner value.
    pub fn set_inner(&mut self, value: T) {
        self.inner = value;
    }

    /// Take control, or release it with None.
    pub fn set_controlled(&mut self, value: Option<T>) {
        self.controlled = value;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }
}
