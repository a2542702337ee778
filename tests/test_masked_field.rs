use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rat_picker::context::PickerContext;
use rat_picker::date_util::PickerMode;
use rat_picker::event::{FieldOutcome, HandleEvent};
use rat_picker::generate::ChronoConfig;
use rat_picker::mask_format::MaskFormat;
use rat_picker::masked_field::{mask_range, MaskedFieldState};
use ratatui::layout::Rect;

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn code(c: KeyCode) -> Event {
    Event::Key(KeyEvent::new(c, KeyModifiers::NONE))
}

fn ctx() -> PickerContext<ChronoConfig> {
    PickerContext::new(ChronoConfig::new(), PickerMode::Date)
}

fn masked() -> MaskedFieldState {
    let mut f = MaskedFieldState::new();
    f.set_mask(Some(MaskFormat::new("YYYY-MM-DD")));
    f.current_year = 2024;
    f.focus.set(true);
    f
}

#[test]
fn test_type_date() {
    let ctx = ctx();
    let mut f = masked();

    assert_eq!(f.handle(&key('2'), &ctx), FieldOutcome::Invalid);
    assert_eq!(f.text(), "0002-MM-DD");
    assert_eq!(f.cell_index(), 0);
    assert!(f.is_modified());

    for c in "000".chars() {
        f.handle(&key(c), &ctx);
    }
    assert_eq!(f.text(), "2000-MM-DD");
    assert_eq!(f.cell_index(), 1);
    assert_eq!(f.cell_text(), "");

    let mut r = FieldOutcome::Continue;
    for c in "0102".chars() {
        r = f.handle(&key(c), &ctx);
    }
    assert_eq!(r, FieldOutcome::Value);
    assert_eq!(f.text(), "2000-01-02");
    assert_eq!(f.cell_index(), 2);

    assert_eq!(f.handle(&code(KeyCode::Enter), &ctx), FieldOutcome::Submit);
}

#[test]
fn test_enter_invalid() {
    let ctx = ctx();
    let mut f = masked();
    f.handle(&key('2'), &ctx);
    assert_eq!(f.handle(&code(KeyCode::Enter), &ctx), FieldOutcome::Unchanged);
}

#[test]
fn test_up_down() {
    let ctx = ctx();
    let mut f = masked();

    f.handle(&code(KeyCode::Up), &ctx);
    assert_eq!(f.text(), "2024-MM-DD");

    f.handle(&code(KeyCode::Right), &ctx);
    assert_eq!(f.cell_index(), 1);
    f.handle(&code(KeyCode::Up), &ctx);
    assert_eq!(f.text(), "2024-01-DD");
    f.handle(&code(KeyCode::Down), &ctx);
    assert_eq!(f.text(), "2024-12-DD");
    f.handle(&code(KeyCode::Up), &ctx);
    assert_eq!(f.text(), "2024-01-DD");
    assert_eq!(f.cell_index(), 1);

    f.handle(&code(KeyCode::Right), &ctx);
    f.handle(&code(KeyCode::Down), &ctx);
    assert_eq!(f.text(), "2024-01-31");
}

#[test]
fn test_backspace_and_move() {
    let ctx = ctx();
    let mut f = masked();
    for c in "20000102".chars() {
        f.handle(&key(c), &ctx);
    }
    f.handle(&code(KeyCode::Left), &ctx);
    assert_eq!(f.cell_index(), 1);
    assert_eq!(f.handle(&code(KeyCode::Backspace), &ctx), FieldOutcome::Invalid);
    assert_eq!(f.text(), "2000-MM-02");

    f.handle(&code(KeyCode::Left), &ctx);
    f.handle(&code(KeyCode::Left), &ctx);
    assert_eq!(f.cell_index(), 0);
    f.handle(&code(KeyCode::End), &ctx);
    assert_eq!(f.cell_index(), 2);
}

#[test]
fn test_cell_text_resets_on_move() {
    let ctx = ctx();
    let mut f = masked();
    f.handle(&key('1'), &ctx);
    assert_eq!(f.cell_text(), "1");
    f.handle(&code(KeyCode::Right), &ctx);
    assert_eq!(f.cell_text(), "");
    f.handle(&key('1'), &ctx);
    f.handle(&key('2'), &ctx);
    assert_eq!(f.text(), "0001-12-DD");
    assert_eq!(f.cell_index(), 2);
}

#[test]
fn test_paste() {
    let ctx = ctx();
    let mut f = masked();
    assert_eq!(
        f.handle(&Event::Paste("nope".into()), &ctx),
        FieldOutcome::Unchanged
    );
    assert_eq!(f.text(), "YYYY-MM-DD");
    assert_eq!(
        f.handle(&Event::Paste("2001-02-03".into()), &ctx),
        FieldOutcome::Value
    );
    assert_eq!(f.text(), "2001-02-03");
}

#[test]
fn test_end_edit() {
    let ctx = ctx();
    let mut f = masked();
    f.set_value("2000-01-01");
    f.handle(&code(KeyCode::Backspace), &ctx);
    assert_eq!(f.text(), "YYYY-01-01");
    assert!(f.end_edit());
    assert_eq!(f.text(), "2000-01-01");

    f.preserve_invalid = true;
    f.handle(&code(KeyCode::Backspace), &ctx);
    f.end_edit();
    assert_eq!(f.text(), "YYYY-01-01");
}

#[test]
fn test_not_focused() {
    let ctx = ctx();
    let mut f = masked();
    f.focus.set(false);
    assert_eq!(f.handle(&key('1'), &ctx), FieldOutcome::Continue);
    assert!(!f.is_editing());
}

#[test]
fn test_mouse_selects_cell() {
    let ctx = ctx();
    let mut f = masked();
    f.inner = Rect::new(0, 0, 20, 1);
    let click = Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 6,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(f.handle(&click, &ctx), FieldOutcome::Changed);
    assert_eq!(f.cell_index(), 1);
    assert_eq!(f.selection(), (5, 7));
}

#[test]
fn test_plain() {
    let ctx = ctx();
    let mut f = MaskedFieldState::new();
    f.focus.set(true);

    for c in "2000-01-022".chars() {
        f.handle(&key(c), &ctx);
    }
    assert_eq!(f.text(), "2000-01-022");
    assert_eq!(
        f.handle(&code(KeyCode::Backspace), &ctx),
        FieldOutcome::Value
    );
    assert_eq!(f.text(), "2000-01-02");
    f.handle(&code(KeyCode::Home), &ctx);
    assert_eq!(f.cursor(), 0);
    f.handle(&code(KeyCode::Delete), &ctx);
    assert_eq!(f.text(), "000-01-02");
}

#[test]
fn test_validator_closure() {
    let mut f = MaskedFieldState::new();
    f.focus.set(true);
    let only_x = |t: &str| t == "x";
    assert_eq!(f.handle(&key('x'), &only_x), FieldOutcome::Value);
    assert_eq!(f.handle(&key('x'), &only_x), FieldOutcome::Invalid);
}

#[test]
fn test_mask_range() {
    let r = mask_range("MM", 2000).expect("range");
    assert_eq!((r.start, r.end, r.default), (1, 12, None));
    let r = mask_range("YYYY", 2000).expect("range");
    assert_eq!(r.default, Some(2000));
    assert!(mask_range("Q", 2000).is_none());
}

#[test]
fn test_foreign_text_resets_to_format() {
    let ctx = ctx();
    for text in ["2000-01-0ä", "2000-01-022"] {
        let mut f = masked();
        f.set_value(text);
        assert_eq!(f.text(), text);

        f.start_edit();
        assert_eq!(f.text(), "YYYY-MM-DD");
        assert_eq!(f.cell_index(), 0);

        assert_eq!(f.handle(&key('2'), &ctx), FieldOutcome::Invalid);
        assert_eq!(f.text(), "0002-MM-DD");
    }
}
