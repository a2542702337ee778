//!
//! Value reconciliation.
//!
//! A picker holds three versions of its value:
//!
//! * the value: what the application sees. Can be controlled from
//!   outside, see [MergedState].
//! * the calendar value: live while editing. Changed by every valid
//!   keystroke and every click into a panel.
//! * the submit value: the candidate for the next commit.
//!
//! [RangeValueState::trigger_calendar_change] updates the calendar value.
//! [RangeValueState::trigger_submit] runs the candidate through the
//! commit gate (empty fields, order, disabled dates) and updates the
//! value if everything passes.
//!
//! The same code serves single pickers (N = 1) and range pickers (N = 2).
//!

use crate::context::PickerContext;
use crate::date_util::{is_same, is_same_timestamp, PickerMode};
use crate::generate::GenerateConfig;
use crate::merged::MergedState;
use crate::panel::DateLimit;
#[allow(unused_imports)]
use log::debug;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Extra information for the disabled-date predicate.
#[derive(Debug)]
pub struct DisabledInfo<'a, D> {
    /// Granularity of the check.
    pub mode: PickerMode,
    /// The start date when checking the end date of a range.
    pub from: Option<&'a D>,
    /// Index of the field that is checked.
    pub active_index: usize,
}

impl<D> Clone for DisabledInfo<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for DisabledInfo<'_, D> {}

/// Predicate for disabled dates.
pub type DisabledDateFn<D> = Rc<dyn Fn(&D, DisabledInfo<'_, D>) -> bool>;

/// Which slot of a range changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTag {
    Start,
    End,
}

/// The calendar value changed.
#[derive(Debug, Clone)]
pub struct CalendarChange<D, const N: usize> {
    pub value: [Option<D>; N],
    pub text: [String; N],
    /// Slot that changed. This is found by comparing the start
    /// slot with its previous value, if that is unchanged the
    /// tag is [RangeTag::End].
    pub range: RangeTag,
}

/// The value changed.
#[derive(Debug, Clone)]
pub struct ValueChange<D, const N: usize> {
    pub value: [Option<D>; N],
    pub text: [String; N],
}

/// Result of a submit.
#[derive(Debug, Clone)]
pub struct SubmitResult<D, const N: usize> {
    /// The candidate passed the gate and is now the value.
    pub passed: bool,
    /// The submit synced the calendar value.
    pub calendar_change: Option<CalendarChange<D, N>>,
    /// The value differs from the last value.
    pub change: Option<ValueChange<D, N>>,
}

/// Reason for a rejected commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// An empty slot that doesn't allow empty.
    Empty(usize),
    /// End before start.
    Order,
    /// A disabled date.
    DisabledDate(usize),
}

/// Rules for committing a value.
pub struct ValueRules<D, const N: usize> {
    /// Sort the range ascending and require start <= end.
    pub order: bool,
    /// Slot may be committed empty.
    pub allow_empty: [bool; N],
    /// Slot is disabled. A disabled slot keeps its value on clear,
    /// and is not checked for disabled dates.
    pub disabled: [bool; N],
    pub disabled_date: Option<DisabledDateFn<D>>,
    /// Earliest date.
    pub min_date: Option<DateLimit<D>>,
    /// Latest date.
    pub max_date: Option<DateLimit<D>>,
}

impl<D, const N: usize> Clone for ValueRules<D, N>
where
    D: Clone,
{
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            allow_empty: self.allow_empty,
            disabled: self.disabled,
            disabled_date: self.disabled_date.clone(),
            min_date: self.min_date.clone(),
            max_date: self.max_date.clone(),
        }
    }
}

impl<D: Debug, const N: usize> Debug for ValueRules<D, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueRules")
            .field("order", &self.order)
            .field("allow_empty", &self.allow_empty)
            .field("disabled", &self.disabled)
            .field("disabled_date", &self.disabled_date.is_some())
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .finish()
    }
}

impl<D, const N: usize> Default for ValueRules<D, N> {
    /// A single value may be empty, a range must be complete
    /// and ordered.
    fn default() -> Self {
        Self {
            order: N > 1,
            allow_empty: [N == 1; N],
            disabled: [false; N],
            disabled_date: None,
            min_date: None,
            max_date: None,
        }
    }
}

impl<D: Clone, const N: usize> ValueRules<D, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disabled by the predicate, or outside min/max.
    ///
    /// Relative limits are resolved with the `from` date of the info.
    pub fn is_invalid_date<G>(
        &self,
        ctx: &PickerContext<G>,
        date: &D,
        info: DisabledInfo<'_, D>,
    ) -> bool
    where
        G: GenerateConfig<Date = D>,
    {
        if let Some(disabled_date) = &self.disabled_date {
            if disabled_date(date, info) {
                return true;
            }
        }

        let g = &ctx.generate;
        let mode = info.mode;
        if let Some(min) = self.min_date.as_ref().and_then(|v| v.resolve(info.from)) {
            if g.is_after(&min, date) && !is_same(g, &ctx.locale, Some(&min), Some(date), mode) {
                return true;
            }
        }
        if let Some(max) = self.max_date.as_ref().and_then(|v| v.resolve(info.from)) {
            if g.is_after(date, &max) && !is_same(g, &ctx.locale, Some(&max), Some(date), mode) {
                return true;
            }
        }
        false
    }

    /// Check a candidate against the gate.
    pub fn check<G>(&self, ctx: &PickerContext<G>, value: &[Option<D>; N]) -> Result<(), Gate>
    where
        G: GenerateConfig<Date = D>,
    {
        let g = &ctx.generate;
        let mode = ctx.mode.cell_mode();

        for i in 0..N {
            if value[i].is_none() && !self.allow_empty[i] {
                return Err(Gate::Empty(i));
            }
        }

        if self.order {
            if let (Some(Some(start)), Some(Some(end))) = (value.first(), value.get(1)) {
                if !is_same(g, &ctx.locale, Some(start), Some(end), mode) && !g.is_after(end, start)
                {
                    return Err(Gate::Order);
                }
            }
        }

        let start = value.first().and_then(|v| v.as_ref());
        for i in 0..N {
            if self.disabled[i] {
                continue;
            }
            let Some(date) = &value[i] else {
                continue;
            };
            let info = DisabledInfo {
                mode,
                from: if i > 0 { start } else { None },
                active_index: i,
            };
            if self.is_invalid_date(ctx, date, info) {
                return Err(Gate::DisabledDate(i));
            }
        }

        Ok(())
    }
}

/// Compare slot by slot. Returns (all the same, start the same).
pub fn same_dates<G: GenerateConfig, const N: usize>(
    g: &G,
    a: &[Option<G::Date>; N],
    b: &[Option<G::Date>; N],
) -> (bool, bool) {
    let same_start = N == 0 || is_same_timestamp(g, a[0].as_ref(), b[0].as_ref());
    let same_all = (0..N).all(|i| is_same_timestamp(g, a[i].as_ref(), b[i].as_ref()));
    (same_all, same_start)
}

/// Holds value, calendar value and submit value.
#[derive(Debug, Clone)]
pub struct RangeValueState<D, const N: usize> {
    value: MergedState<[Option<D>; N]>,
    calendar: [Option<D>; N],
    submit: [Option<D>; N],
}

impl<D: Clone, const N: usize> Default for RangeValueState<D, N> {
    fn default() -> Self {
        Self::new(std::array::from_fn(|_| None))
    }
}

impl<D: Clone, const N: usize> RangeValueState<D, N> {
    pub fn new(default_value: [Option<D>; N]) -> Self {
        Self {
            calendar: default_value.clone(),
            submit: default_value.clone(),
            value: MergedState::new(default_value),
        }
    }

    /// The value.
    pub fn value(&self) -> &[Option<D>; N] {
        self.value.get()
    }

    /// The live value.
    pub fn calendar(&self) -> &[Option<D>; N] {
        &self.calendar
    }

    /// The next candidate for a commit.
    pub fn submit(&self) -> &[Option<D>; N] {
        &self.submit
    }

    pub fn is_controlled(&self) -> bool {
        self.value.is_controlled()
    }

    /// Set the uncontrolled value. If sync is true calendar and
    /// submit value follow.
    pub fn set_value(&mut self, value: [Option<D>; N], sync: bool) {
        self.value.set_inner(value);
        if sync {
            self.sync_calendar();
        }
    }

    /// Control the value from outside, or release the control.
    /// If sync is true calendar and submit value follow.
    pub fn set_controlled(&mut self, value: Option<[Option<D>; N]>, sync: bool) {
        self.value.set_controlled(value);
        if sync {
            self.sync_calendar();
        }
    }

    /// Reset calendar and submit value to the value.
    pub fn sync_calendar(&mut self) {
        self.calendar = self.value.get().clone();
        self.submit = self.value.get().clone();
    }

    /// Calendar value with one slot replaced.
    pub fn fill_calendar(&self, index: usize, date: Option<D>) -> [Option<D>; N] {
        let mut clone = self.calendar.clone();
        if index < N {
            clone[index] = date;
        }
        clone
    }

    /// Set the calendar value.
    ///
    /// Returns the change if any slot differs from the current
    /// calendar value.
    pub fn trigger_calendar_change<G>(
        &mut self,
        ctx: &PickerContext<G>,
        next: [Option<D>; N],
    ) -> Option<CalendarChange<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        let (same_all, same_start) = same_dates(&ctx.generate, &self.calendar, &next);
        if same_all {
            return None;
        }
        self.calendar = next.clone();
        Some(CalendarChange {
            text: std::array::from_fn(|i| ctx.format_value(next[i].as_ref())),
            value: next,
            range: if same_start {
                RangeTag::End
            } else {
                RangeTag::Start
            },
        })
    }

    /// Commit a candidate. Uses the submit value if next is None.
    pub fn trigger_submit<G>(
        &mut self,
        ctx: &PickerContext<G>,
        rules: &ValueRules<D, N>,
        next: Option<[Option<D>; N]>,
    ) -> SubmitResult<D, N>
    where
        G: GenerateConfig<Date = D>,
    {
        let clone = next.unwrap_or_else(|| self.submit.clone());
        self.submit_impl(ctx, rules, clone, false)
    }

    /// Commit an empty value. Disabled slots keep their value,
    /// and the gate is skipped.
    pub fn trigger_clear<G>(
        &mut self,
        ctx: &PickerContext<G>,
        rules: &ValueRules<D, N>,
    ) -> SubmitResult<D, N>
    where
        G: GenerateConfig<Date = D>,
    {
        let clone = self.submit.clone();
        self.submit_impl(ctx, rules, clone, true)
    }

    fn submit_impl<G>(
        &mut self,
        ctx: &PickerContext<G>,
        rules: &ValueRules<D, N>,
        mut clone: [Option<D>; N],
        is_null: bool,
    ) -> SubmitResult<D, N>
    where
        G: GenerateConfig<Date = D>,
    {
        let g = &ctx.generate;

        if is_null {
            for i in 0..N {
                if !rules.disabled[i] {
                    clone[i] = None;
                }
            }
        }

        if rules.order && N >= 2 {
            if let (Some(start), Some(end)) = (&clone[0], &clone[1]) {
                if g.is_after(start, end) {
                    clone.swap(0, 1);
                }
            }
        }

        let calendar_change = self.trigger_calendar_change(ctx, clone.clone());

        let passed = if is_null {
            true
        } else {
            match rules.check(ctx, &clone) {
                Ok(()) => true,
                Err(gate) => {
                    debug!("submit rejected {:?}", gate);
                    false
                }
            }
        };

        let mut change = None;
        if passed {
            let (same, _) = same_dates(g, &clone, self.value.get());
            self.value.set_inner(clone.clone());
            self.submit = clone.clone();
            if !same {
                change = Some(ValueChange {
                    text: std::array::from_fn(|i| ctx.format_value(clone[i].as_ref())),
                    value: clone,
                });
            }
        }

        SubmitResult {
            passed,
            calendar_change,
            change,
        }
    }

    /// Move one slot of the calendar value to the submit value and
    /// submit if asked for.
    pub fn flush_submit<G>(
        &mut self,
        ctx: &PickerContext<G>,
        rules: &ValueRules<D, N>,
        index: usize,
        need_trigger: bool,
    ) -> Option<SubmitResult<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        if index < N {
            self.submit[index] = self.calendar[index].clone();
        }
        if need_trigger {
            Some(self.trigger_submit(ctx, rules, None))
        } else {
            None
        }
    }

    /// End of an interactive session. Submits once more and
    /// resets the calendar value to the value, whether the submit
    /// passed or not.
    pub fn finish_session<G>(
        &mut self,
        ctx: &PickerContext<G>,
        rules: &ValueRules<D, N>,
    ) -> SubmitResult<D, N>
    where
        G: GenerateConfig<Date = D>,
    {
        let r = self.trigger_submit(ctx, rules, None);
        self.sync_calendar();
        r
    }
}
