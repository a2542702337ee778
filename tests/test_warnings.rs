use chrono::{NaiveDate, NaiveDateTime};
use rat_picker::context::PickerContext;
use rat_picker::date_picker::DatePickerState;
use rat_picker::date_util::PickerMode;
use rat_picker::generate::ChronoConfig;
use rat_picker::range_picker::RangePickerState;
use std::sync::Mutex;

static LOG: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn setup_logging() -> Result<(), anyhow::Error> {
    fern::Dispatch::new()
        .level(log::LevelFilter::Warn)
        .chain(fern::Output::call(|record| {
            if let Ok(mut log) = LOG.lock() {
                log.push(record.args().to_string());
            }
        }))
        .apply()?;
    Ok(())
}

fn take_log() -> Vec<String> {
    std::mem::take(&mut *LOG.lock().expect("log"))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, day)
        .expect("date")
        .and_hms_opt(0, 0, 0)
        .expect("time")
}

fn ctx(mode: PickerMode) -> PickerContext<ChronoConfig> {
    PickerContext::new(ChronoConfig::new(), mode)
}

// one test, the logger is global.
#[test]
fn test_misuse_warnings() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let _state = RangePickerState::new(ctx(PickerMode::Date)).with_disabled([true, false]);
    let log = take_log();
    assert!(log
        .iter()
        .any(|v| v.contains("`disabled` should not be set with an empty `value`")));

    let _state = RangePickerState::new(ctx(PickerMode::Date))
        .with_allow_empty([true, false])
        .with_disabled([true, false]);
    assert!(take_log().is_empty());

    let _state = RangePickerState::new(ctx(PickerMode::Date))
        .with_value(Some(d(2000, 1, 1)), None)
        .with_disabled([true, false]);
    assert!(take_log().is_empty());

    let _state = DatePickerState::new(ctx(PickerMode::Date)).with_change_on_blur(true);
    let log = take_log();
    assert!(log
        .iter()
        .any(|v| v.contains("`change_on_blur` has no effect without `need_confirm`")));

    let _state = DatePickerState::new(ctx(PickerMode::DateTime)).with_change_on_blur(true);
    assert!(take_log().is_empty());

    let _state = DatePickerState::new(ctx(PickerMode::Date))
        .with_need_confirm(true)
        .with_change_on_blur(true);
    assert!(take_log().is_empty());

    Ok(())
}
