//!
//! Text field for one date value.
//!
//! With a [MaskFormat] the field edits cell by cell:
//!
//! * digits fill the focused cell and jump to the next cell once
//!   the cell is full.
//! * Left/Right move between cells, Home/End to the first/last cell.
//! * Up/Down step the number in the cell, wrapping around inside
//!   the range of the cell.
//! * Backspace/Delete clear the cell back to the format text.
//! * Paste replaces everything, but only if the pasted text is valid.
//! * Enter reports [FieldOutcome::Submit] if the text is valid.
//!
//! Without a mask it's a small line editor.
//!
//! The field doesn't know dates. It asks a [TextValidator] whether
//! the text is acceptable, and leaves it to the owner to parse it.
//!
//! ```rust ignore
//! let r = state.handle(event, &ctx);
//! if r == FieldOutcome::Value {
//!     let date = ctx.parse(state.text());
//! }
//! ```
//!

use crate::_private::NonExhaustive;
use crate::context::PickerContext;
use crate::generate::GenerateConfig;
use crate::mask_format::MaskFormat;
use chrono::Datelike;
#[allow(unused_imports)]
use log::debug;
use rat_event::{ct_event, ConsumedEvent, HandleEvent, MouseOnly};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::block::BlockExt;
use ratatui::widgets::{Block, StatefulWidget, Widget};
use unicode_segmentation::UnicodeSegmentation;

/// Decides if a text is acceptable.
pub trait TextValidator {
    fn is_valid(&self, text: &str) -> bool;
}

impl<F> TextValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, text: &str) -> bool {
        self(text)
    }
}

impl<G: GenerateConfig> TextValidator for PickerContext<G> {
    fn is_valid(&self, text: &str) -> bool {
        self.parse(text).is_some()
    }
}

/// Value range of a mask cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRange {
    pub start: u32,
    pub end: u32,
    /// Used by Up/Down if the cell holds no number.
    pub default: Option<u32>,
}

/// Range for a mask cell by its token.
pub fn mask_range(cell_format: &str, current_year: i32) -> Option<MaskRange> {
    let (start, end, default) = match cell_format {
        "YYYY" => (0, 9999, Some(current_year.clamp(0, 9999) as u32)),
        "MM" => (1, 12, None),
        "DD" => (1, 31, None),
        "HH" => (0, 23, None),
        "mm" => (0, 59, None),
        "ss" => (0, 59, None),
        "SSS" => (0, 999, None),
        _ => return None,
    };
    Some(MaskRange {
        start,
        end,
        default,
    })
}

fn left_pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().skip(len - width).collect()
    } else {
        let mut s = "0".repeat(width - len);
        s.push_str(text);
        s
    }
}

/// Renders a [MaskedFieldState].
#[derive(Debug, Default, Clone)]
pub struct MaskedField<'a> {
    style: Style,
    focus_style: Option<Style>,
    select_style: Option<Style>,
    invalid_style: Option<Style>,
    block: Option<Block<'a>>,
}

/// State of the field.
#[derive(Debug)]
pub struct MaskedFieldState {
    /// Area of the widget.
    /// __read only__ renewed with each render.
    pub area: Rect,
    /// Area inside the block.
    /// __read only__ renewed with each render.
    pub inner: Rect,

    mask: Option<MaskFormat>,
    /// Committed text.
    value: String,
    /// Edit buffer.
    text: String,

    /// Focused mask cell.
    cell_index: usize,
    /// Digits typed since entering the cell.
    cell_text: String,
    /// Cursor for unmasked editing, in graphemes.
    cursor: usize,

    editing: bool,
    modified: bool,

    /// Marks the text as invalid. Only used for rendering.
    pub invalid: bool,
    /// Keep invalid text when editing ends.
    pub preserve_invalid: bool,
    /// Default for Up/Down in an unfilled year cell.
    pub current_year: i32,

    /// Focus.
    pub focus: FocusFlag,

    pub non_exhaustive: NonExhaustive,
}

pub(crate) mod event {
    use rat_event::{ConsumedEvent, Outcome};

    /// Result of event handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum FieldOutcome {
        /// The given event has not been used at all.
        Continue,
        /// The event has been recognized, but the result was nil.
        /// Further processing for this event may stop.
        Unchanged,
        /// The event has been recognized and there is some change
        /// due to it.
        /// Further processing for this event may stop.
        /// Rendering the ui is advised.
        Changed,
        /// The text changed, and is not valid.
        Invalid,
        /// The text changed, and is valid.
        Value,
        /// Enter with a valid text.
        Submit,
    }

    impl ConsumedEvent for FieldOutcome {
        fn is_consumed(&self) -> bool {
            *self != FieldOutcome::Continue
        }
    }

    impl From<bool> for FieldOutcome {
        fn from(value: bool) -> Self {
            if value {
                FieldOutcome::Changed
            } else {
                FieldOutcome::Unchanged
            }
        }
    }

    impl From<Outcome> for FieldOutcome {
        fn from(value: Outcome) -> Self {
            match value {
                Outcome::Continue => FieldOutcome::Continue,
                Outcome::Unchanged => FieldOutcome::Unchanged,
                Outcome::Changed => FieldOutcome::Changed,
            }
        }
    }

    impl From<FieldOutcome> for Outcome {
        fn from(value: FieldOutcome) -> Self {
            match value {
                FieldOutcome::Continue => Outcome::Continue,
                FieldOutcome::Unchanged => Outcome::Unchanged,
                FieldOutcome::Changed => Outcome::Changed,
                FieldOutcome::Invalid => Outcome::Changed,
                FieldOutcome::Value => Outcome::Changed,
                FieldOutcome::Submit => Outcome::Changed,
            }
        }
    }
}

pub use event::FieldOutcome;

impl<'a> MaskedField<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style when focused.
    pub fn focus_style(mut self, style: Style) -> Self {
        self.focus_style = Some(style);
        self
    }

    /// Style for the focused cell.
    pub fn select_style(mut self, style: Style) -> Self {
        self.select_style = Some(style);
        self
    }

    /// Style for invalid text.
    pub fn invalid_style(mut self, style: Style) -> Self {
        self.invalid_style = Some(style);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for &MaskedField<'_> {
    type State = MaskedFieldState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for MaskedField<'_> {
    type State = MaskedFieldState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &MaskedField<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut MaskedFieldState,
) {
    state.area = area;
    state.inner = widget.block.inner_if_some(area);

    let focused = state.focus.get();
    let mut style = if focused {
        widget.focus_style.unwrap_or(widget.style)
    } else {
        widget.style
    };
    if state.invalid {
        style = style.patch(widget.invalid_style.unwrap_or(Style::default().red()));
    }
    let select_style = widget
        .select_style
        .unwrap_or(Style::default().black().on_yellow());

    if let Some(block) = &widget.block {
        block.clone().render(area, buf);
    }
    buf.set_style(state.inner, style);
    Line::from(state.text.as_str()).render(state.inner, buf);

    if focused && state.mask.is_some() {
        let (start, end) = state.selection();
        let col = |b: usize| {
            state
                .text
                .get(..b)
                .map(|v| v.graphemes(true).count())
                .unwrap_or(0) as u16
        };
        let col_start = col(start);
        let col_end = col(end);
        let sel = Rect::new(
            state.inner.x.saturating_add(col_start),
            state.inner.y,
            col_end.saturating_sub(col_start),
            1,
        )
        .intersection(state.inner);
        buf.set_style(sel, select_style);
    }
}

impl Default for MaskedFieldState {
    fn default() -> Self {
        Self {
            area: Default::default(),
            inner: Default::default(),
            mask: None,
            value: Default::default(),
            text: Default::default(),
            cell_index: 0,
            cell_text: Default::default(),
            cursor: 0,
            editing: false,
            modified: false,
            invalid: false,
            preserve_invalid: false,
            current_year: chrono::Local::now().year(),
            focus: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl HasFocus for MaskedFieldState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    #[inline]
    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    #[inline]
    fn area(&self) -> Rect {
        self.area
    }
}

impl MaskedFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            focus: FocusFlag::named(name),
            ..Default::default()
        }
    }

    /// Set the mask. None switches to unmasked editing.
    pub fn set_mask(&mut self, mask: Option<MaskFormat>) {
        self.mask = mask;
        self.cell_index = 0;
        self.cell_text.clear();
        self.sync_mask();
    }

    pub fn mask(&self) -> Option<&MaskFormat> {
        self.mask.as_ref()
    }

    /// Committed text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the committed text. The edit buffer follows if the
    /// text differs from the last one.
    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.text = value.to_string();
            self.cursor = self.text.graphemes(true).count();
            self.sync_mask();
        }
    }

    /// Set the committed text and leave the edit buffer alone.
    pub fn set_value_keep_text(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Current text of the edit buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The edit buffer is the pristine format text.
    pub fn is_format_text(&self) -> bool {
        match &self.mask {
            Some(mask) => self.text == mask.format(),
            None => false,
        }
    }

    /// Index of the focused mask cell.
    pub fn cell_index(&self) -> usize {
        self.cell_index
    }

    /// Digits typed into the focused cell.
    pub fn cell_text(&self) -> &str {
        &self.cell_text
    }

    /// Byte range of the focused cell.
    pub fn selection(&self) -> (usize, usize) {
        match &self.mask {
            Some(mask) => mask.get_selection(self.cell_index),
            None => (0, 0),
        }
    }

    /// Select a mask cell.
    pub fn set_cell_index(&mut self, idx: usize) -> bool {
        let Some(mask) = &self.mask else {
            return false;
        };
        let idx = idx.min(mask.size().saturating_sub(1));
        let old = self.cell_index;
        self.cell_index = idx;
        self.cell_text.clear();
        old != idx
    }

    /// Cursor position for unmasked editing.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal cursor position.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        if !self.focus.get() || self.mask.is_some() {
            return None;
        }
        let x = self.inner.x.saturating_add(self.cursor as u16);
        if x < self.inner.right() {
            Some((x, self.inner.y))
        } else {
            None
        }
    }

    /// Editing started, and has not ended yet.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The last event changed the text to something new.
    /// Neither the committed text nor the format text.
    /// Owners use this to show their help, e.g. open the popup.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Start editing. Called when the field gains the focus.
    pub fn start_edit(&mut self) -> bool {
        if self.editing {
            return false;
        }
        self.editing = true;
        self.cell_index = 0;
        self.cell_text.clear();
        self.cursor = self.text.graphemes(true).count();
        self.sync_mask();
        true
    }

    /// End editing. Called when the field loses the focus.
    ///
    /// Goes back to the committed text unless invalid text is to
    /// be preserved.
    pub fn end_edit(&mut self) -> bool {
        if !self.editing {
            return false;
        }
        self.editing = false;
        self.cell_text.clear();
        if !self.preserve_invalid {
            self.text = self.value.clone();
            self.cursor = self.text.graphemes(true).count();
        }
        true
    }

    /// While editing the buffer must follow the mask, otherwise
    /// it's replaced by the format text.
    fn sync_mask(&mut self) {
        if !self.editing {
            return;
        }
        let Some(mask) = &self.mask else {
            return;
        };
        if !mask.is_match(&self.text) {
            debug!("reset to format {:?} -> {:?}", self.text, mask.format());
            self.text = mask.format().to_string();
            self.cell_index = 0;
            self.cell_text.clear();
        }
    }

    /// Apply a new text to the buffer.
    fn input_change(&mut self, text: String, validator: &dyn TextValidator) -> FieldOutcome {
        self.text = text;
        self.modified = !self.text.is_empty()
            && self.text != self.value
            && self.mask.as_ref().map(|v| v.format()) != Some(self.text.as_str());
        self.sync_mask();

        if validator.is_valid(&self.text) {
            FieldOutcome::Value
        } else {
            FieldOutcome::Invalid
        }
    }

    fn offset_cell_index(&mut self, offset: isize) -> bool {
        let Some(mask) = &self.mask else {
            return false;
        };
        let max = mask.size().saturating_sub(1) as isize;
        let idx = (self.cell_index as isize + offset).clamp(0, max.max(0)) as usize;
        let old = self.cell_index;
        self.cell_index = idx;
        old != idx
    }

    fn offset_cell_value(&self, offset: i64) -> Option<String> {
        let (start, end) = self.selection();
        let mask = self.mask.as_ref()?;
        let range = mask_range(&mask.format()[start..end], self.current_year)?;

        let current = &self.text[start..end];
        let num = if current.bytes().all(|c| c.is_ascii_digit()) {
            current.parse::<i64>().ok()
        } else {
            None
        };
        let next = match num {
            None => match range.default {
                Some(d) => d as i64,
                None if offset > 0 => range.start as i64,
                None => range.end as i64,
            },
            Some(num) => {
                let span = range.end as i64 - range.start as i64 + 1;
                let num = num + offset;
                range.start as i64 + (span + num - range.start as i64).rem_euclid(span)
            }
        };
        Some(next.to_string())
    }

    fn masked_key(&mut self, event: &crossterm::event::Event, validator: &dyn TextValidator) -> FieldOutcome {
        let Some(mask) = &self.mask else {
            return FieldOutcome::Continue;
        };
        if mask.size() == 0 {
            return FieldOutcome::Continue;
        }
        let (start, end) = self.selection();
        let width = end - start;
        let cell_format = mask.format()[start..end].to_string();

        let mut next_cell_text = None;
        let mut next_fill = None;
        let mut moved = false;

        match event {
            ct_event!(keycode press Enter) => {
                return if validator.is_valid(&self.text) {
                    FieldOutcome::Submit
                } else {
                    FieldOutcome::Unchanged
                };
            }
            ct_event!(keycode press Backspace) | ct_event!(keycode press Delete) => {
                next_cell_text = Some(String::new());
                next_fill = Some(cell_format);
            }
            ct_event!(keycode press Left) => {
                next_cell_text = Some(String::new());
                moved = self.offset_cell_index(-1);
            }
            ct_event!(keycode press Right) => {
                next_cell_text = Some(String::new());
                moved = self.offset_cell_index(1);
            }
            ct_event!(keycode press Home) => {
                moved = self.set_cell_index(0);
            }
            ct_event!(keycode press End) => {
                moved = self.set_cell_index(usize::MAX);
            }
            ct_event!(keycode press Up) => {
                next_cell_text = Some(String::new());
                next_fill = self.offset_cell_value(1);
            }
            ct_event!(keycode press Down) => {
                next_cell_text = Some(String::new());
                next_fill = self.offset_cell_value(-1);
            }
            ct_event!(key press c) | ct_event!(key press SHIFT-c) => {
                if c.is_ascii_digit() {
                    let mut t = self.cell_text.clone();
                    t.push(*c);
                    next_cell_text = Some(t.clone());
                    next_fill = Some(t);
                } else {
                    return FieldOutcome::Unchanged;
                }
            }
            ct_event!(paste v) => {
                return if validator.is_valid(v) {
                    self.input_change(v.clone(), validator)
                } else {
                    FieldOutcome::Unchanged
                };
            }
            _ => return FieldOutcome::Continue,
        }

        if let Some(cell_text) = next_cell_text {
            let full = cell_text.chars().count() >= width;
            self.cell_text = cell_text;
            if full {
                moved |= self.offset_cell_index(1);
                self.cell_text.clear();
            }
        }

        if let Some(fill) = next_fill {
            let mut text = String::with_capacity(self.text.len());
            text.push_str(&self.text[..start]);
            text.push_str(&left_pad(&fill, width));
            text.push_str(&self.text[end..]);
            self.input_change(text, validator)
        } else {
            moved.into()
        }
    }

    fn plain_key(&mut self, event: &crossterm::event::Event, validator: &dyn TextValidator) -> FieldOutcome {
        let len = self.text.graphemes(true).count();
        self.cursor = self.cursor.min(len);

        let byte_pos = |text: &str, g: usize| -> usize {
            text.grapheme_indices(true)
                .nth(g)
                .map(|(p, _)| p)
                .unwrap_or(text.len())
        };

        match event {
            ct_event!(keycode press Enter) => {
                if validator.is_valid(&self.text) {
                    FieldOutcome::Submit
                } else {
                    FieldOutcome::Unchanged
                }
            }
            ct_event!(keycode press Backspace) => {
                if self.cursor == 0 {
                    return FieldOutcome::Unchanged;
                }
                let mut text = self.text.clone();
                let b0 = byte_pos(&text, self.cursor - 1);
                let b1 = byte_pos(&text, self.cursor);
                text.replace_range(b0..b1, "");
                self.cursor -= 1;
                self.input_change(text, validator)
            }
            ct_event!(keycode press Delete) => {
                if self.cursor >= len {
                    return FieldOutcome::Unchanged;
                }
                let mut text = self.text.clone();
                let b0 = byte_pos(&text, self.cursor);
                let b1 = byte_pos(&text, self.cursor + 1);
                text.replace_range(b0..b1, "");
                self.input_change(text, validator)
            }
            ct_event!(keycode press Left) => {
                let old = self.cursor;
                self.cursor = self.cursor.saturating_sub(1);
                (old != self.cursor).into()
            }
            ct_event!(keycode press Right) => {
                let old = self.cursor;
                self.cursor = (self.cursor + 1).min(len);
                (old != self.cursor).into()
            }
            ct_event!(keycode press Home) => {
                let old = self.cursor;
                self.cursor = 0;
                (old != self.cursor).into()
            }
            ct_event!(keycode press End) => {
                let old = self.cursor;
                self.cursor = len;
                (old != self.cursor).into()
            }
            ct_event!(key press c) | ct_event!(key press SHIFT-c) => {
                let mut text = self.text.clone();
                let b = byte_pos(&text, self.cursor);
                text.insert(b, *c);
                self.cursor += 1;
                self.input_change(text, validator)
            }
            ct_event!(paste v) => {
                let mut text = self.text.clone();
                let b = byte_pos(&text, self.cursor);
                text.insert_str(b, v);
                self.cursor += v.graphemes(true).count();
                self.input_change(text, validator)
            }
            _ => FieldOutcome::Continue,
        }
    }
}

impl<V> HandleEvent<crossterm::event::Event, &V, FieldOutcome> for MaskedFieldState
where
    V: TextValidator,
{
    fn handle(&mut self, event: &crossterm::event::Event, validator: &V) -> FieldOutcome {
        self.modified = false;

        let r = if self.is_focused() {
            self.start_edit();
            if self.mask.is_some() {
                self.masked_key(event, validator)
            } else {
                self.plain_key(event, validator)
            }
        } else {
            FieldOutcome::Continue
        };

        if !r.is_consumed() {
            HandleEvent::handle(self, event, MouseOnly)
        } else {
            r
        }
    }
}

impl HandleEvent<crossterm::event::Event, MouseOnly, FieldOutcome> for MaskedFieldState {
    fn handle(&mut self, event: &crossterm::event::Event, _keymap: MouseOnly) -> FieldOutcome {
        match event {
            ct_event!(mouse down Left for column, row) => {
                if !self.inner.contains((*column, *row).into()) {
                    return FieldOutcome::Continue;
                }
                let col = (column - self.inner.x) as usize;
                let (byte, graphemes) = self
                    .text
                    .grapheme_indices(true)
                    .nth(col)
                    .map(|(p, _)| (p, col))
                    .unwrap_or((self.text.len(), self.text.graphemes(true).count()));

                if let Some(mask) = &self.mask {
                    let idx = mask.get_mask_cell_index(byte);
                    self.cell_index = idx;
                    self.cell_text.clear();
                    FieldOutcome::Changed
                } else {
                    self.cursor = graphemes;
                    FieldOutcome::Changed
                }
            }
            _ => FieldOutcome::Continue,
        }
    }
}

/// Handle all events.
/// Text events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_events(
    state: &mut MaskedFieldState,
    focus: bool,
    event: &crossterm::event::Event,
    validator: &impl TextValidator,
) -> FieldOutcome {
    state.focus.set(focus);
    HandleEvent::handle(state, event, validator)
}

/// Handle only mouse-events.
pub fn handle_mouse_events(
    state: &mut MaskedFieldState,
    event: &crossterm::event::Event,
) -> FieldOutcome {
    HandleEvent::handle(state, event, MouseOnly)
}
