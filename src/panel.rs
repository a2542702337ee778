//!
//! Panel value coordinator.
//!
//! The picker value is the date a calendar panel shows, the month
//! for a date panel, the year for a month panel and so on. It's
//! independent of the selected value. Each side of a range has its
//! own picker value.
//!
//! [PanelValueState::sync] resets the picker value of the active side
//! when the popup opens, when the active field changes and when the
//! calendar value of the active field changes. Navigation in the
//! panel goes through [PanelValueState::offset_picker_value].
//!

use crate::context::PickerContext;
use crate::date_util::{
    is_same, is_same_month, is_same_or_after, is_same_timestamp, is_same_year, fill_time,
    panel_end, panel_start, PickerMode,
};
use crate::generate::GenerateConfig;
use crate::merged::MergedState;
use crate::value::RangeTag;
#[allow(unused_imports)]
use log::debug;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Function for a limit that depends on the sibling value.
pub type DateLimitFn<D> = Rc<dyn Fn(Option<&D>) -> Option<D>>;

/// Lower or upper limit.
pub enum DateLimit<D> {
    /// Fixed date.
    Fixed(D),
    /// Computed from the other date of a range. E.g. the end must
    /// be within 30 days of the start.
    Relative(DateLimitFn<D>),
}

impl<D: Clone> Clone for DateLimit<D> {
    fn clone(&self) -> Self {
        match self {
            DateLimit::Fixed(v) => DateLimit::Fixed(v.clone()),
            DateLimit::Relative(f) => DateLimit::Relative(f.clone()),
        }
    }
}

impl<D: Debug> Debug for DateLimit<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DateLimit::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            DateLimit::Relative(_) => f.debug_tuple("Relative").field(&"..").finish(),
        }
    }
}

impl<D: Clone> DateLimit<D> {
    pub fn relative(f: impl Fn(Option<&D>) -> Option<D> + 'static) -> Self {
        DateLimit::Relative(Rc::new(f))
    }

    /// The effective limit.
    pub fn resolve(&self, sibling: Option<&D>) -> Option<D> {
        match self {
            DateLimit::Fixed(v) => Some(v.clone()),
            DateLimit::Relative(f) => f(sibling),
        }
    }
}

/// Why the picker value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSource {
    /// Reset by open, field switch or a new calendar value.
    Reset,
    /// Navigation in the panel.
    Panel,
}

/// The picker value changed.
#[derive(Debug, Clone)]
pub struct PickerValueChange<D, const N: usize> {
    pub value: [D; N],
    pub source: PickerSource,
    /// Side that changed.
    pub range: RangeTag,
    pub mode: PickerMode,
}

/// Visibility of the header arrows of one panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeaderArrows {
    pub hide_prev: bool,
    pub hide_next: bool,
    pub hide_super_prev: bool,
    pub hide_super_next: bool,
}

/// One step of the panel: month for date and week panels,
/// year for month and quarter panels, a decade for a year panel
/// and a century for a decade panel.
pub fn offset_panel_date<G: GenerateConfig>(
    g: &G,
    mode: PickerMode,
    date: &G::Date,
    offset: i32,
) -> G::Date {
    match mode {
        PickerMode::Date | PickerMode::Week | PickerMode::DateTime => g.add_month(date, offset),
        PickerMode::Month | PickerMode::Quarter => g.add_year(date, offset),
        PickerMode::Year => g.add_year(date, offset * 10),
        PickerMode::Decade => g.add_year(date, offset * 100),
        PickerMode::Time => date.clone(),
    }
}

/// The super arrows of the header step one unit coarser.
pub fn super_offset_panel_date<G: GenerateConfig>(
    g: &G,
    mode: PickerMode,
    date: &G::Date,
    offset: i32,
) -> G::Date {
    match mode {
        PickerMode::Date | PickerMode::Week | PickerMode::DateTime => g.add_year(date, offset),
        PickerMode::Month | PickerMode::Quarter => g.add_year(date, offset * 10),
        PickerMode::Year => g.add_year(date, offset * 100),
        PickerMode::Decade => g.add_year(date, offset * 1000),
        PickerMode::Time => date.clone(),
    }
}

/// Picker value for the end side.
///
/// With two panels side by side, an end date in the same unit as
/// the start date moves back one step, so the panels don't show
/// the same header.
pub fn end_date_picker_value<G: GenerateConfig>(
    g: &G,
    mode: PickerMode,
    multiple_panel: bool,
    start: Option<&G::Date>,
    end: &G::Date,
) -> G::Date {
    let Some(start) = start else {
        return end.clone();
    };
    if !multiple_panel {
        return end.clone();
    }

    let same = match mode {
        PickerMode::Date | PickerMode::Week | PickerMode::DateTime => {
            is_same_month(g, Some(start), Some(end))
        }
        PickerMode::Month | PickerMode::Quarter => is_same_year(g, Some(start), Some(end)),
        PickerMode::Year => g.get_year(start).div_euclid(10) == g.get_year(end).div_euclid(10),
        PickerMode::Decade => {
            g.get_year(start).div_euclid(100) == g.get_year(end).div_euclid(100)
        }
        PickerMode::Time => false,
    };

    if same {
        offset_panel_date(g, mode, end, -1)
    } else {
        end.clone()
    }
}

/// Header arrows for a panel that shows `shown`.
///
/// An arrow is hidden if the panel it leads to is completely outside
/// min/max. With multiple panels the first panel has no next arrows
/// and the last panel no prev arrows.
pub fn header_arrows<G: GenerateConfig>(
    ctx: &PickerContext<G>,
    shown: &G::Date,
    panel_index: usize,
    panel_count: usize,
    min: Option<&G::Date>,
    max: Option<&G::Date>,
) -> HeaderArrows {
    let g = &ctx.generate;
    let mode = ctx.mode;
    let cell = mode.cell_mode();

    let blocked_prev = |target: G::Date| match min {
        Some(min) => !is_same_or_after(g, &ctx.locale, &panel_end(g, mode, &target), min, cell),
        None => false,
    };
    let blocked_next = |target: G::Date| match max {
        Some(max) => !is_same_or_after(g, &ctx.locale, max, &panel_start(g, mode, &target), cell),
        None => false,
    };

    let first = panel_index == 0;
    let last = panel_index + 1 >= panel_count;

    HeaderArrows {
        hide_prev: !first || blocked_prev(offset_panel_date(g, mode, shown, -1)),
        hide_next: !last || blocked_next(offset_panel_date(g, mode, shown, 1)),
        hide_super_prev: !first || blocked_prev(super_offset_panel_date(g, mode, shown, -1)),
        hide_super_next: !last || blocked_next(super_offset_panel_date(g, mode, shown, 1)),
    }
}

#[derive(Debug, Clone)]
struct Seen<D> {
    open: bool,
    active: usize,
    calendar: Option<D>,
}

/// Picker values for N sides.
#[derive(Debug, Clone)]
pub struct PanelValueState<D, const N: usize> {
    value: MergedState<[Option<D>; N]>,
    /// Picker value used whenever a side is activated.
    pub default_picker_value: [Option<D>; N],
    /// Time part for dates picked in a datetime panel.
    pub time_default_value: [Option<D>; N],
    /// Two panels side by side.
    pub multiple_panel: bool,

    prev_active: Option<usize>,
    seen: Option<Seen<D>>,
}

impl<D: Clone, const N: usize> Default for PanelValueState<D, N> {
    fn default() -> Self {
        Self {
            value: MergedState::new(std::array::from_fn(|_| None)),
            default_picker_value: std::array::from_fn(|_| None),
            time_default_value: std::array::from_fn(|_| None),
            multiple_panel: false,
            prev_active: None,
            seen: None,
        }
    }
}

impl<D: Clone + Debug, const N: usize> PanelValueState<D, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control the picker values from outside, or release with None.
    pub fn set_controlled(&mut self, value: Option<[Option<D>; N]>) {
        self.value.set_controlled(value);
    }

    /// Picker value of one side.
    ///
    /// Falls back to the default picker value and then to now.
    /// Except for time pickers the time part comes from the
    /// time default value.
    pub fn picker_value<G>(&self, ctx: &PickerContext<G>, index: usize) -> D
    where
        G: GenerateConfig<Date = D>,
    {
        let g = &ctx.generate;
        let v = self
            .value
            .get()
            .get(index)
            .cloned()
            .flatten()
            .or_else(|| self.default_picker_value.get(index).cloned().flatten())
            .unwrap_or_else(|| g.get_now());

        match self.time_default_value.get(index) {
            Some(Some(time)) if ctx.mode != PickerMode::Time => fill_time(g, &v, Some(time)),
            _ => v,
        }
    }

    /// Dates shown by the panels for the active side.
    /// One or two, with two panels the second is one step ahead.
    pub fn panel_dates<G>(&self, ctx: &PickerContext<G>, active: usize) -> Vec<D>
    where
        G: GenerateConfig<Date = D>,
    {
        let current = self.picker_value(ctx, active);
        if self.multiple_panel {
            let next = offset_panel_date(&ctx.generate, ctx.mode, &current, 1);
            vec![current, next]
        } else {
            vec![current]
        }
    }

    /// Set the picker value of the active side.
    ///
    /// Returns a change if any side differs at the granularity of
    /// the picker.
    pub fn set_picker_value<G>(
        &mut self,
        ctx: &PickerContext<G>,
        active: usize,
        date: D,
        source: PickerSource,
    ) -> Option<PickerValueChange<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        if active >= N {
            return None;
        }
        let g = &ctx.generate;

        let before: [D; N] = std::array::from_fn(|i| self.picker_value(ctx, i));
        let mut clone = before.clone();
        clone[active] = date.clone();

        let mut inner = self.value.inner().clone();
        inner[active] = Some(date);
        self.value.set_inner(inner);

        let changed = (0..N)
            .any(|i| !is_same(g, &ctx.locale, Some(&before[i]), Some(&clone[i]), ctx.mode));
        if changed {
            Some(PickerValueChange {
                value: clone,
                source,
                range: if active == 1 {
                    RangeTag::End
                } else {
                    RangeTag::Start
                },
                mode: ctx.mode,
            })
        } else {
            None
        }
    }

    /// Header navigation. Offset in panel steps, or in super steps.
    pub fn offset_picker_value<G>(
        &mut self,
        ctx: &PickerContext<G>,
        active: usize,
        offset: i32,
        super_step: bool,
    ) -> Option<PickerValueChange<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        let current = self.picker_value(ctx, active);
        let next = if super_step {
            super_offset_panel_date(&ctx.generate, ctx.mode, &current, offset)
        } else {
            offset_panel_date(&ctx.generate, ctx.mode, &current, offset)
        };
        self.set_picker_value(ctx, active, next, PickerSource::Panel)
    }

    /// Follow open state, active side and calendar value.
    ///
    /// Call after every change of the picker. `min` and `max` are the
    /// resolved limits for the active side.
    pub fn sync<G>(
        &mut self,
        ctx: &PickerContext<G>,
        open: bool,
        active: usize,
        calendar: &[Option<D>; N],
        min: Option<&D>,
        max: Option<&D>,
    ) -> Option<PickerValueChange<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        if active >= N {
            return None;
        }
        let g = &ctx.generate;

        let (switched, changed) = match &self.seen {
            None => (true, true),
            Some(seen) => {
                let switched = seen.open != open || seen.active != active;
                let changed = switched
                    || !is_same_timestamp(g, seen.calendar.as_ref(), calendar[active].as_ref());
                (switched, changed)
            }
        };

        let mut r = None;
        if open && changed && self.default_picker_value[active].is_none() {
            r = self.reset(ctx, active, calendar, min, max);
        }
        if open && switched {
            if let Some(default) = self.default_picker_value[active].clone() {
                r = self.set_picker_value(ctx, active, default, PickerSource::Reset);
            }
        }
        if switched {
            self.prev_active = if open { Some(active) } else { None };
        }

        self.seen = Some(Seen {
            open,
            active,
            calendar: calendar[active].clone(),
        });

        r
    }

    fn reset<G>(
        &mut self,
        ctx: &PickerContext<G>,
        active: usize,
        calendar: &[Option<D>; N],
        min: Option<&D>,
        max: Option<&D>,
    ) -> Option<PickerValueChange<D, N>>
    where
        G: GenerateConfig<Date = D>,
    {
        let g = &ctx.generate;
        let mode = ctx.mode;
        let other = if N > 1 { Some(1 - active.min(1)) } else { None };

        let mut next = if mode == PickerMode::Time {
            None
        } else {
            Some(g.get_now())
        };

        match (self.prev_active, other) {
            (Some(prev), Some(other)) if prev != active => {
                next = Some(self.picker_value(ctx, other));
            }
            _ => {
                if let Some(date) = &calendar[active] {
                    next = Some(if active == 0 {
                        date.clone()
                    } else {
                        end_date_picker_value(
                            g,
                            mode,
                            self.multiple_panel,
                            calendar[0].as_ref(),
                            date,
                        )
                    });
                } else if let Some(Some(date)) = other.map(|v| &calendar[v]) {
                    next = Some(date.clone());
                }
            }
        }

        let mut next = next?;
        if let Some(min) = min {
            if g.is_after(min, &next) {
                next = min.clone();
            }
        }
        if let Some(max) = max {
            let offset = if self.multiple_panel {
                offset_panel_date(g, mode, &next, 1)
            } else {
                next.clone()
            };
            if g.is_after(&offset, max) {
                next = if self.multiple_panel {
                    offset_panel_date(g, mode, max, -1)
                } else {
                    max.clone()
                };
            }
        }

        debug!("reset picker value {} -> {:?}", active, next);
        self.set_picker_value(ctx, active, next, PickerSource::Reset)
    }
}
