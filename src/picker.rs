//!
//! State for a picker with one or two date fields.
//!
//! [PickerState] ties the parts together:
//!
//! * one [MaskedFieldState] per field.
//! * the value engine [RangeValueState] and the [ValueRules] for commits.
//! * the active field and the popup state.
//! * the picker values for the panels.
//!
//! The application renders the fields and the calendar panels itself.
//! It forwards events with [HandleEvent], reports clicks into a panel
//! with [PickerState::select_date] and calls [PickerState::tick] once
//! per frame. Everything that happened is queued as [PickerEvent] and
//! can be fetched with [PickerState::take_events].
//!
//! An interactive session lasts while any field has the focus or the
//! popup is open. Edits during the session only change the calendar
//! value, unless a part is confirmed. [SESSION_FRAMES] frames after
//! the session ends the last candidate is submitted once more, and the
//! calendar value goes back to the value.
//!
//! Use [DatePickerState](crate::date_picker::DatePickerState) or
//! [RangePickerState](crate::range_picker::RangePickerState).
//!

use crate::_private::NonExhaustive;
use crate::active::{ActiveState, Operation};
use crate::context::PickerContext;
use crate::date_util::{fill_time, is_same, is_same_timestamp, PickerMode};
use crate::frames::{FrameGuard, Frames};
use crate::generate::GenerateConfig;
use crate::masked_field::{FieldOutcome, MaskedFieldState};
use crate::open::DelayedOpen;
use crate::outcome::{PickerEvent, PickerOutcome};
use crate::panel::{header_arrows, DateLimit, HeaderArrows, PanelValueState, PickerSource};
use crate::time_scroll::TimeScroll;
use crate::value::{same_dates, DisabledInfo, RangeValueState, SubmitResult, ValueRules};
use crate::PickerError;
use log::{debug, warn};
use rat_event::{ct_event, ConsumedEvent, HandleEvent, Regular};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use std::rc::Rc;

/// Frames between the end of an interactive session and the final
/// submit. Tabbing from one field to the other must not end the
/// session.
pub const SESSION_FRAMES: u32 = 2;

/// Time columns: hour, minute, second.
pub const TIME_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PickerTask {
    FinishSession,
    ResetActive,
    Close,
    TimeScroll(usize),
}

/// State for a picker with N fields.
#[derive(Debug)]
pub struct PickerState<G: GenerateConfig, const N: usize> {
    /// Fields.
    pub fields: [MaskedFieldState; N],
    /// Container focus.
    pub focus: FocusFlag,

    ctx: PickerContext<G>,
    rules: ValueRules<G::Date, N>,
    need_confirm: Option<bool>,
    change_on_blur: bool,

    value: RangeValueState<G::Date, N>,
    panel: PanelValueState<G::Date, N>,
    active: ActiveState<N>,
    open: DelayedOpen<PickerTask>,
    time_scroll: [TimeScroll<PickerTask>; TIME_COLUMNS],

    hover: Option<G::Date>,
    typed_invalid: [bool; N],
    invalid: [bool; N],

    /// Last seen focus of the fields.
    focused: [bool; N],
    /// No focus and closed.
    finished: bool,
    frames: Frames<PickerTask>,
    session: Option<FrameGuard<PickerTask>>,
    reset_active: Option<FrameGuard<PickerTask>>,

    events: Vec<PickerEvent<G::Date, N>>,

    pub non_exhaustive: NonExhaustive,
}

impl<G, const N: usize> Default for PickerState<G, N>
where
    G: GenerateConfig + Default,
{
    fn default() -> Self {
        Self::new(PickerContext::default())
    }
}

impl<G, const N: usize> HasFocus for PickerState<G, N>
where
    G: GenerateConfig,
{
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for i in 0..N {
            if !self.rules.disabled[i] {
                builder.widget(&self.fields[i]);
            }
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.fields
            .iter()
            .map(|v| v.area)
            .reduce(|a, b| a.union(b))
            .unwrap_or_default()
    }
}

impl<G, const N: usize> PickerState<G, N>
where
    G: GenerateConfig,
{
    pub fn new(ctx: PickerContext<G>) -> Self {
        let current_year = ctx.generate.get_year(&ctx.generate.get_now());
        let mut s = Self {
            fields: std::array::from_fn(|i| {
                let mut f = MaskedFieldState::named(&format!("field-{}", i));
                f.current_year = current_year;
                f
            }),
            focus: FocusFlag::named("picker"),
            ctx,
            rules: ValueRules::default(),
            need_confirm: None,
            change_on_blur: false,
            value: RangeValueState::default(),
            panel: PanelValueState::default(),
            active: ActiveState::default(),
            open: DelayedOpen::default(),
            time_scroll: Default::default(),
            hover: None,
            typed_invalid: [false; N],
            invalid: [false; N],
            focused: [false; N],
            finished: true,
            frames: Frames::new(),
            session: None,
            reset_active: None,
            events: Vec::new(),
            non_exhaustive: NonExhaustive,
        };
        s.sync_fields();
        s
    }

    /// Initial value.
    pub fn with_values(mut self, values: [Option<G::Date>; N]) -> Self {
        self.set_values(values);
        self
    }

    /// Edit cell by cell with a mask for the display format.
    pub fn with_mask(mut self) -> Result<Self, PickerError> {
        self.set_mask(true)?;
        Ok(self)
    }

    pub fn with_rules(mut self, rules: ValueRules<G::Date, N>) -> Self {
        self.set_rules(rules);
        self
    }

    pub fn with_disabled(mut self, disabled: [bool; N]) -> Self {
        self.rules.disabled = disabled;
        self.check_misuse();
        self
    }

    pub fn with_allow_empty(mut self, allow_empty: [bool; N]) -> Self {
        self.rules.allow_empty = allow_empty;
        self.check_misuse();
        self
    }

    pub fn with_order(mut self, order: bool) -> Self {
        self.rules.order = order;
        self
    }

    pub fn with_disabled_date(
        mut self,
        disabled_date: impl Fn(&G::Date, DisabledInfo<'_, G::Date>) -> bool + 'static,
    ) -> Self {
        self.rules.disabled_date = Some(Rc::new(disabled_date));
        self
    }

    pub fn with_min_date(mut self, min_date: DateLimit<G::Date>) -> Self {
        self.rules.min_date = Some(min_date);
        self
    }

    pub fn with_max_date(mut self, max_date: DateLimit<G::Date>) -> Self {
        self.rules.max_date = Some(max_date);
        self
    }

    pub fn with_need_confirm(mut self, need_confirm: bool) -> Self {
        self.set_need_confirm(Some(need_confirm));
        self
    }

    pub fn with_change_on_blur(mut self, change_on_blur: bool) -> Self {
        self.set_change_on_blur(change_on_blur);
        self
    }

    pub fn with_preserve_invalid_on_blur(mut self, preserve: bool) -> Self {
        for f in self.fields.iter_mut() {
            f.preserve_invalid = preserve;
        }
        self
    }

    pub fn with_default_picker_value(mut self, value: [Option<G::Date>; N]) -> Self {
        self.panel.default_picker_value = value;
        self
    }

    pub fn with_time_default_value(mut self, value: [Option<G::Date>; N]) -> Self {
        self.panel.time_default_value = value;
        self
    }

    pub fn ctx(&self) -> &PickerContext<G> {
        &self.ctx
    }

    /// Replace the context. A mask follows the new display format.
    pub fn set_context(&mut self, ctx: PickerContext<G>) -> Result<(), PickerError> {
        let masked = self.fields.iter().any(|v| v.mask().is_some());
        self.ctx = ctx;
        for t in self.time_scroll.iter_mut() {
            t.cancel();
        }
        self.set_mask(masked)?;
        self.sync_fields();
        Ok(())
    }

    /// Switch masked editing on or off.
    ///
    /// The display format must be a pattern.
    pub fn set_mask(&mut self, mask: bool) -> Result<(), PickerError> {
        let mask = if mask {
            Some(self.ctx.mask_format()?)
        } else {
            None
        };
        for f in self.fields.iter_mut() {
            f.set_mask(mask.clone());
        }
        Ok(())
    }

    pub fn rules(&self) -> &ValueRules<G::Date, N> {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: ValueRules<G::Date, N>) {
        self.rules = rules;
        self.check_misuse();
    }

    /// Explicit confirm is needed before a commit.
    /// Defaults to true for time and datetime pickers.
    pub fn need_confirm(&self) -> bool {
        self.need_confirm.unwrap_or(self.ctx.mode.is_complex())
    }

    /// Set need_confirm. None goes back to the default for the mode.
    pub fn set_need_confirm(&mut self, need_confirm: Option<bool>) {
        self.need_confirm = need_confirm;
        self.check_misuse();
    }

    pub fn change_on_blur(&self) -> bool {
        self.change_on_blur
    }

    /// Commit typed text on blur even if confirm is needed.
    pub fn set_change_on_blur(&mut self, change_on_blur: bool) {
        self.change_on_blur = change_on_blur;
        self.check_misuse();
    }

    /// Two panels side by side.
    pub fn set_multiple_panel(&mut self, multiple: bool) {
        self.panel.multiple_panel = multiple;
    }

    pub fn multiple_panel(&self) -> bool {
        self.panel.multiple_panel
    }

    /// Set the default picker values.
    pub fn set_default_picker_value(&mut self, value: [Option<G::Date>; N]) {
        self.panel.default_picker_value = value;
    }

    /// Set the time used for picked dates in datetime mode.
    pub fn set_time_default_value(&mut self, value: [Option<G::Date>; N]) {
        self.panel.time_default_value = value;
    }

    /// Control the picker values, or release the control with None.
    pub fn set_controlled_picker_value(&mut self, value: Option<[Option<G::Date>; N]>) {
        self.panel.set_controlled(value);
    }

    fn check_misuse(&self) {
        for i in 0..N {
            if self.rules.disabled[i]
                && self.value.value()[i].is_none()
                && !self.rules.allow_empty[i]
            {
                warn!(
                    "`disabled` should not be set with an empty `value`. Set `allow_empty` or a `value` instead."
                );
            }
        }
        if self.change_on_blur && !self.need_confirm() {
            warn!("`change_on_blur` has no effect without `need_confirm`.");
        }
    }
}

// values
impl<G, const N: usize> PickerState<G, N>
where
    G: GenerateConfig,
{
    /// Committed value.
    pub fn values(&self) -> &[Option<G::Date>; N] {
        self.value.value()
    }

    /// Live value.
    pub fn calendar_values(&self) -> &[Option<G::Date>; N] {
        self.value.calendar()
    }

    /// Set the value. Resets the calendar value if the
    /// value changes.
    pub fn set_values(&mut self, values: [Option<G::Date>; N]) {
        let (same, _) = same_dates(&self.ctx.generate, self.value.value(), &values);
        self.value.set_value(values, !same);
        self.check_misuse();
        let start = self.events.len();
        self.done(start, PickerOutcome::Changed);
    }

    /// Control the value from outside, or release the control
    /// with None. Resets the calendar value if the value changes.
    pub fn set_controlled(&mut self, values: Option<[Option<G::Date>; N]>) {
        let before = self.value.value().clone();
        self.value.set_controlled(values, false);
        let (same, _) = same_dates(&self.ctx.generate, &before, self.value.value());
        if !same {
            self.value.sync_calendar();
        }
        let start = self.events.len();
        self.done(start, PickerOutcome::Changed);
    }

    /// Text of a field.
    pub fn text(&self, index: usize) -> &str {
        self.fields.get(index).map(|v| v.text()).unwrap_or_default()
    }

    /// Popup is open.
    pub fn is_open(&self) -> bool {
        self.open.is_open()
    }

    /// Active field.
    pub fn active_index(&self) -> usize {
        self.active.active()
    }

    /// Field text is invalid or holds a disabled date.
    pub fn is_invalid(&self, index: usize) -> bool {
        self.invalid.get(index).copied().unwrap_or_default()
    }

    /// Date shown as preview.
    pub fn hover(&self) -> Option<&G::Date> {
        self.hover.as_ref()
    }

    /// Interactive session active.
    pub fn is_interacting(&self) -> bool {
        !self.finished
    }

    /// Events since the last call.
    pub fn take_events(&mut self) -> Vec<PickerEvent<G::Date, N>> {
        std::mem::take(&mut self.events)
    }

    /// Cursor of the focused field.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        self.fields.iter().find_map(|v| v.screen_cursor())
    }

    /// Date can't be picked for the active field.
    pub fn is_date_disabled(&self, date: &G::Date) -> bool {
        self.is_disabled_at(date, self.active.active())
    }

    fn is_disabled_at(&self, date: &G::Date, index: usize) -> bool {
        let g = &self.ctx.generate;
        let locale = &self.ctx.locale;
        let mode = self.ctx.mode.cell_mode();
        let calendar = self.value.calendar();

        if N >= 2 {
            let start = calendar.first().and_then(|v| v.as_ref());
            let end = calendar.get(1).and_then(|v| v.as_ref());
            if index == 1 && self.rules.disabled[0] {
                if let Some(start) = start {
                    if !is_same(g, locale, Some(start), Some(date), mode) && g.is_after(start, date) {
                        return true;
                    }
                }
            }
            if index == 0 && self.rules.disabled[1] {
                if let Some(end) = end {
                    if !is_same(g, locale, Some(end), Some(date), mode) && g.is_after(date, end) {
                        return true;
                    }
                }
            }
        }

        let from = self
            .active
            .from_index(calendar, index)
            .and_then(|i| calendar[i].as_ref());
        self.rules.is_invalid_date(
            &self.ctx,
            date,
            DisabledInfo {
                mode,
                from,
                active_index: index,
            },
        )
    }
}

// panel
impl<G, const N: usize> PickerState<G, N>
where
    G: GenerateConfig,
{
    /// Picker value of the active field.
    pub fn picker_value(&self) -> G::Date {
        self.panel.picker_value(&self.ctx, self.active.active())
    }

    /// Dates the panels show. Two with multiple panels.
    pub fn panel_dates(&self) -> Vec<G::Date> {
        self.panel.panel_dates(&self.ctx, self.active.active())
    }

    /// Arrows for the header of a panel.
    pub fn header_arrows(&self, panel_index: usize) -> HeaderArrows {
        let dates = self.panel_dates();
        let Some(shown) = dates.get(panel_index) else {
            return HeaderArrows::default();
        };
        let (min, max) = self.limits();
        header_arrows(
            &self.ctx,
            shown,
            panel_index,
            dates.len(),
            min.as_ref(),
            max.as_ref(),
        )
    }

    /// Header navigation.
    pub fn panel_offset(&mut self, offset: i32, super_step: bool) -> PickerOutcome {
        let start = self.events.len();
        if let Some(c) =
            self.panel
                .offset_picker_value(&self.ctx, self.active.active(), offset, super_step)
        {
            self.events.push(PickerEvent::PickerValueChange(c));
        }
        self.done(start, PickerOutcome::Unchanged)
    }

    /// Show a different date in the panel.
    pub fn set_picker_value(&mut self, date: G::Date) -> PickerOutcome {
        let start = self.events.len();
        if let Some(c) =
            self.panel
                .set_picker_value(&self.ctx, self.active.active(), date, PickerSource::Panel)
        {
            self.events.push(PickerEvent::PickerValueChange(c));
        }
        self.done(start, PickerOutcome::Unchanged)
    }

    /// First visible row of a time column.
    pub fn time_scroll_offset(&self, column: usize) -> usize {
        self.time_scroll
            .get(column)
            .map(|v| v.offset())
            .unwrap_or_default()
    }

    /// Min/max for the active field.
    fn limits(&self) -> (Option<G::Date>, Option<G::Date>) {
        let active = self.active.active();
        let calendar = self.value.calendar();
        let sibling = if N > 1 {
            calendar.get(1 - active.min(1)).and_then(|v| v.as_ref())
        } else {
            None
        };
        (
            self.rules.min_date.as_ref().and_then(|v| v.resolve(sibling)),
            self.rules.max_date.as_ref().and_then(|v| v.resolve(sibling)),
        )
    }
}

// operations
impl<G, const N: usize> PickerState<G, N>
where
    G: GenerateConfig,
{
    /// Advance one frame. Runs everything that was deferred.
    pub fn tick(&mut self) -> PickerOutcome {
        let start = self.events.len();
        self.sync_focus();

        let mut changed = false;
        for task in self.frames.advance() {
            match task {
                PickerTask::FinishSession => {
                    self.session = None;
                    self.finish_session();
                }
                PickerTask::ResetActive => {
                    self.reset_active = None;
                    if self.finished {
                        self.active.reset();
                    }
                }
                PickerTask::Close => {
                    if self.open.apply_close() {
                        self.events.push(PickerEvent::OpenChange(false));
                    }
                }
                PickerTask::TimeScroll(i) => {
                    if let Some(scroll) = self.time_scroll.get_mut(i) {
                        changed |= scroll.step(&self.frames, PickerTask::TimeScroll(i));
                    }
                }
            }
        }

        self.done(start, if changed { PickerOutcome::Changed } else { PickerOutcome::Continue })
    }

    /// Focus a field.
    pub fn focus_field(&mut self, index: usize) -> PickerOutcome {
        let start = self.events.len();
        self.focus_index(index);
        self.done(start, PickerOutcome::Changed)
    }

    /// Remove the focus from all fields.
    pub fn blur(&mut self) -> PickerOutcome {
        let start = self.events.len();
        for f in self.fields.iter() {
            f.focus.set(false);
        }
        self.sync_focus();
        self.done(start, PickerOutcome::Changed)
    }

    /// Open or close the popup.
    pub fn set_open(&mut self, open: bool) -> PickerOutcome {
        let start = self.events.len();
        self.trigger_open(open, false, false);
        self.done(start, PickerOutcome::Changed)
    }

    /// Preview a date in the active field, or end the preview.
    pub fn set_hover(&mut self, date: Option<G::Date>) -> PickerOutcome {
        let start = self.events.len();
        self.hover = date;
        self.done(start, PickerOutcome::Changed)
    }

    /// A date was picked in the panel.
    ///
    /// Without need_confirm this confirms the active field too.
    pub fn select_date(&mut self, date: G::Date) -> PickerOutcome {
        let start = self.events.len();
        let active = self.active.active();

        let date = if self.ctx.mode == PickerMode::DateTime {
            let time = self.value.calendar()[active]
                .as_ref()
                .or(self.panel.time_default_value[active].as_ref());
            fill_time(&self.ctx.generate, &date, time)
        } else {
            date
        };

        self.active.last_operation = Operation::Panel;
        self.hover = None;

        let clone = self.value.fill_calendar(active, Some(date.clone()));
        if let Some(c) = self.value.trigger_calendar_change(&self.ctx, clone) {
            self.events.push(PickerEvent::CalendarChange(c));
        }
        if !self.need_confirm() && !self.ctx.mode.is_complex() {
            self.trigger_part_confirm(Some(date), false);
        }

        self.done(start, PickerOutcome::Changed)
    }

    /// OK button.
    pub fn confirm(&mut self) -> PickerOutcome {
        let start = self.events.len();
        self.trigger_part_confirm(None, false);
        self.done(start, PickerOutcome::Changed)
    }

    /// Clear button. Disabled fields keep their value.
    pub fn clear(&mut self) -> PickerOutcome {
        let start = self.events.len();
        let r = self.value.trigger_clear(&self.ctx, &self.rules);
        self.push_submit(Some(r));
        self.typed_invalid = [false; N];
        self.trigger_open(false, false, true);
        self.done(start, PickerOutcome::Changed)
    }
}

// internals
impl<G, const N: usize> PickerState<G, N>
where
    G: GenerateConfig,
{
    fn any_focused(&self) -> bool {
        self.focused.iter().any(|v| *v)
    }

    fn focus_index(&mut self, index: usize) {
        if index >= N || self.rules.disabled[index] {
            return;
        }
        for (i, f) in self.fields.iter().enumerate() {
            f.focus.set(i == index);
        }
        self.sync_focus();
    }

    /// Compare the focus flags with the last seen state.
    /// Blur before focus.
    fn sync_focus(&mut self) {
        for i in 0..N {
            if self.focused[i] && !self.fields[i].focus.get() {
                self.focused[i] = false;
                self.on_field_blur(i);
            }
        }
        for i in 0..N {
            if !self.focused[i] && self.fields[i].focus.get() {
                self.focused[i] = true;
                self.on_field_focus(i);
            }
        }
    }

    fn on_field_focus(&mut self, index: usize) {
        let last = self.active.active();

        // an unconfirmed part of this session keeps the focus
        let unconfirmed = self.active.list().last().copied().filter(|&last| {
            self.need_confirm()
                && last != index
                && !self.rules.allow_empty[last]
                && !self.active.has_active_submit_value(last)
                && self.value.calendar()[last].is_some()
        });
        if let Some(keep) = unconfirmed {
            debug!("keep focus on unconfirmed field {}", keep);
            self.fields[index].focus.set(false);
            self.focused[index] = false;
            self.fields[keep].focus.set(true);
            if !self.focused[keep] {
                self.focused[keep] = true;
                self.fields[keep].start_edit();
            }
            self.trigger_open(true, true, false);
            return;
        }

        self.active.last_operation = Operation::Input;
        self.trigger_open(true, true, false);
        if last != index
            && self.open.is_open()
            && !self.need_confirm()
            && self.ctx.mode.is_complex()
        {
            self.trigger_part_confirm(None, true);
        }
        self.active.set_active(index);
        self.hover = None;
        self.fields[index].start_edit();
    }

    fn on_field_blur(&mut self, index: usize) {
        self.fields[index].end_edit();
        if !self.fields[index].preserve_invalid {
            self.typed_invalid[index] = false;
        }

        self.trigger_open(false, false, false);
        if (!self.need_confirm() || self.change_on_blur)
            && self.active.last_operation == Operation::Input
        {
            let next = self.active.next_active_index(
                self.value.calendar(),
                &self.rules.allow_empty,
                &self.rules.disabled,
            );
            let r = self.value.flush_submit(
                &self.ctx,
                &self.rules,
                self.active.active(),
                next.is_none(),
            );
            self.push_submit(r);
        }
    }

    fn trigger_open(&mut self, open: bool, inherit: bool, force: bool) {
        if open && self.rules.disabled.iter().all(|v| *v) {
            return;
        }
        if inherit && !self.open.is_open() {
            return;
        }
        if self.open.request(&self.frames, open, force, PickerTask::Close) {
            self.events.push(PickerEvent::OpenChange(open));
        }
    }

    /// Confirm the active field. Moves to the other field of a range,
    /// or submits and closes if the range is complete.
    fn trigger_part_confirm(&mut self, date: Option<G::Date>, skip_focus: bool) {
        let active = self.active.active();

        let next_value = match date {
            Some(date) => self.value.fill_calendar(active, Some(date)),
            None => self.value.calendar().clone(),
        };

        self.active.update_submit_index(active);
        let next = self.active.next_active_index(
            &next_value,
            &self.rules.allow_empty,
            &self.rules.disabled,
        );

        if let Some(c) = self.value.trigger_calendar_change(&self.ctx, next_value) {
            self.events.push(PickerEvent::CalendarChange(c));
        }
        let r = self
            .value
            .flush_submit(&self.ctx, &self.rules, active, next.is_none());
        self.push_submit(r);

        match next {
            None => self.trigger_open(false, false, true),
            Some(next) => {
                if !skip_focus {
                    self.focus_index(next);
                }
            }
        }
    }

    fn push_submit(&mut self, r: Option<SubmitResult<G::Date, N>>) {
        let Some(r) = r else {
            return;
        };
        if let Some(c) = r.calendar_change {
            self.events.push(PickerEvent::CalendarChange(c));
        }
        if let Some(c) = r.change {
            self.events.push(PickerEvent::Change(c));
        }
    }

    fn finish_session(&mut self) {
        if !self.finished {
            return;
        }
        debug!("finish session");
        let r = self.value.finish_session(&self.ctx, &self.rules);
        self.push_submit(Some(r));
        self.typed_invalid = [false; N];
        self.hover = None;
    }

    fn update_session(&mut self) {
        let finished = !self.any_focused() && !self.open.is_open();
        if finished == self.finished {
            return;
        }
        self.finished = finished;
        if finished {
            self.session = Some(
                self.frames
                    .guard(SESSION_FRAMES, PickerTask::FinishSession),
            );
            self.reset_active = Some(self.frames.guard(1, PickerTask::ResetActive));
        } else {
            self.session = None;
            self.reset_active = None;
        }
    }

    /// Field text follows hover or calendar value.
    fn sync_fields(&mut self) {
        let active = self.active.active();
        for i in 0..N {
            let date = match &self.hover {
                Some(hover) if i == active => Some(hover),
                _ => self.value.calendar()[i].as_ref(),
            };
            let text = self.ctx.format_value(date);
            if self.fields[i].value() == text {
                continue;
            }

            // typed text in another format stays.
            let keep = self.fields[i].is_editing()
                && self.hover.is_none()
                && date.is_some()
                && is_same_timestamp(
                    &self.ctx.generate,
                    self.ctx.parse(self.fields[i].text()).as_ref(),
                    date,
                );
            if keep {
                self.fields[i].set_value_keep_text(&text);
            } else {
                self.fields[i].set_value(&text);
            }
        }
    }

    fn update_invalid(&mut self) {
        for i in 0..N {
            let invalid = self.typed_invalid[i]
                || match &self.value.calendar()[i] {
                    Some(date) => self.is_disabled_at(date, i),
                    None => false,
                };
            if invalid != self.invalid[i] {
                self.invalid[i] = invalid;
                self.events.push(PickerEvent::Invalid { index: i, invalid });
            }
            self.fields[i].invalid = invalid;
        }
    }

    fn sync_panel(&mut self) {
        let active = self.active.active();
        let calendar = self.value.calendar().clone();
        let (min, max) = self.limits();
        if let Some(c) = self.panel.sync(
            &self.ctx,
            self.open.is_open(),
            active,
            &calendar,
            min.as_ref(),
            max.as_ref(),
        ) {
            self.events.push(PickerEvent::PickerValueChange(c));
        }
    }

    fn sync_time_scroll(&mut self) {
        if !self.ctx.mode.is_complex() {
            return;
        }
        let g = &self.ctx.generate;
        let active = self.active.active();
        let date = match &self.hover {
            Some(hover) => Some(hover),
            None => self.value.calendar()[active].as_ref(),
        };
        let Some(date) = date else {
            return;
        };
        let rows = [g.get_hour(date), g.get_minute(date), g.get_second(date)];
        for (i, row) in rows.into_iter().enumerate() {
            self.time_scroll[i].scroll_to(&self.frames, row as usize, PickerTask::TimeScroll(i));
        }
    }

    /// Bring everything in line after an operation and summarize
    /// the events since `start`.
    fn done(&mut self, start: usize, base: PickerOutcome) -> PickerOutcome {
        self.update_session();
        self.sync_fields();
        self.update_invalid();
        self.sync_panel();
        self.sync_time_scroll();

        self.events
            .iter()
            .skip(start)
            .map(|v| v.outcome())
            .fold(base, |a, b| a.max(b))
    }

    fn field_outcome(
        &mut self,
        index: usize,
        event: &crossterm::event::Event,
        r: FieldOutcome,
    ) -> PickerOutcome {
        match r {
            FieldOutcome::Value => {
                self.active.last_operation = Operation::Input;
                self.typed_invalid[index] = false;
                if let Some(date) = self.ctx.parse(self.fields[index].text()) {
                    let clone = self.value.fill_calendar(index, Some(date));
                    if let Some(c) = self.value.trigger_calendar_change(&self.ctx, clone) {
                        self.events.push(PickerEvent::CalendarChange(c));
                    }
                }
            }
            FieldOutcome::Invalid => {
                self.active.last_operation = Operation::Input;
                if self.fields[index].text().is_empty() {
                    self.typed_invalid[index] = false;
                    let clone = self.value.fill_calendar(index, None);
                    if let Some(c) = self.value.trigger_calendar_change(&self.ctx, clone) {
                        self.events.push(PickerEvent::CalendarChange(c));
                    }
                } else {
                    self.typed_invalid[index] = !self.fields[index].is_format_text();
                }
            }
            FieldOutcome::Submit => {
                self.trigger_part_confirm(None, false);
            }
            FieldOutcome::Changed if matches!(event, crossterm::event::Event::Mouse(_)) => {
                if !self.focused[index] {
                    // focus starts at the first cell, the click decides.
                    let cell = self.fields[index].cell_index();
                    self.focus_index(index);
                    if self.focused[index] {
                        self.fields[index].set_cell_index(cell);
                    }
                }
                self.trigger_open(true, false, false);
            }
            _ => {}
        }

        if self.fields[index].is_modified() {
            self.trigger_open(true, false, false);
        }

        r.into()
    }
}

impl<G, const N: usize> HandleEvent<crossterm::event::Event, Regular, PickerOutcome>
    for PickerState<G, N>
where
    G: GenerateConfig,
{
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> PickerOutcome {
        let start = self.events.len();
        self.sync_focus();

        let mut r = PickerOutcome::Continue;
        if self.any_focused() {
            r = match event {
                ct_event!(keycode press Esc) if self.open.is_open() => {
                    self.trigger_open(false, false, true);
                    PickerOutcome::Changed
                }
                ct_event!(keycode press ALT-Down) => {
                    self.trigger_open(true, false, false);
                    PickerOutcome::Changed
                }
                _ => PickerOutcome::Continue,
            };
        }

        if !r.is_consumed() {
            for i in 0..N {
                if self.rules.disabled[i] {
                    continue;
                }
                let fr = HandleEvent::handle(&mut self.fields[i], event, &self.ctx);
                if fr.is_consumed() {
                    r = self.field_outcome(i, event, fr);
                    break;
                }
            }
        }

        self.done(start, r)
    }
}

/// Handle all events.
/// Key events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_events<G: GenerateConfig, const N: usize>(
    state: &mut PickerState<G, N>,
    focus: bool,
    event: &crossterm::event::Event,
) -> PickerOutcome {
    state.focus.set(focus);
    if !focus {
        for f in state.fields.iter() {
            f.focus.set(false);
        }
    } else if !state.fields.iter().any(|v| v.focus.get()) {
        if let Some(f) = state.fields.get(state.active_index()) {
            f.focus.set(true);
        }
    }
    HandleEvent::handle(state, event, Regular)
}
