use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rat_picker::context::PickerContext;
use rat_picker::date_util::PickerMode;
use rat_picker::generate::ChronoConfig;
use rat_picker::panel::{
    end_date_picker_value, header_arrows, offset_panel_date, super_offset_panel_date,
    HeaderArrows, PanelValueState, PickerSource,
};
use rat_picker::value::RangeTag;

fn d(y: i32, m: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, day)
        .expect("date")
        .and_hms_opt(0, 0, 0)
        .expect("time")
}

fn ctx(mode: PickerMode) -> PickerContext<ChronoConfig> {
    PickerContext::new(ChronoConfig::new(), mode)
}

#[test]
fn test_offset() {
    let g = ChronoConfig::new();
    let date = d(2000, 1, 15);

    assert_eq!(offset_panel_date(&g, PickerMode::Date, &date, 1), d(2000, 2, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Week, &date, -1), d(1999, 12, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Month, &date, 1), d(2001, 1, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Quarter, &date, 1), d(2001, 1, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Year, &date, 1), d(2010, 1, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Decade, &date, 1), d(2100, 1, 15));
    assert_eq!(offset_panel_date(&g, PickerMode::Time, &date, 1), date);

    assert_eq!(super_offset_panel_date(&g, PickerMode::Date, &date, 1), d(2001, 1, 15));
    assert_eq!(super_offset_panel_date(&g, PickerMode::Month, &date, 1), d(2010, 1, 15));
    assert_eq!(super_offset_panel_date(&g, PickerMode::Year, &date, -1), d(1900, 1, 15));
    assert_eq!(super_offset_panel_date(&g, PickerMode::Decade, &date, 1), d(3000, 1, 15));
}

#[test]
fn test_offset_back_and_forth() {
    let g = ChronoConfig::new();
    let modes = [
        PickerMode::Date,
        PickerMode::Week,
        PickerMode::Month,
        PickerMode::Quarter,
        PickerMode::Year,
        PickerMode::Decade,
        PickerMode::DateTime,
    ];
    for date in [d(2000, 1, 15), d(1999, 7, 1), d(2024, 12, 28)] {
        for mode in modes {
            let next = offset_panel_date(&g, mode, &date, 1);
            assert_ne!(next, date);
            assert_eq!(offset_panel_date(&g, mode, &next, -1), date, "{:?}", mode);

            let next = super_offset_panel_date(&g, mode, &date, -1);
            assert_eq!(super_offset_panel_date(&g, mode, &next, 1), date, "{:?}", mode);
        }
    }
}

#[test]
fn test_end_picker_value() {
    let g = ChronoConfig::new();

    let start = d(2000, 1, 5);
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Date, true, Some(&start), &d(2000, 1, 20)),
        d(1999, 12, 20)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Date, false, Some(&start), &d(2000, 1, 20)),
        d(2000, 1, 20)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Date, true, Some(&start), &d(2000, 2, 20)),
        d(2000, 2, 20)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Date, true, None, &d(2000, 1, 20)),
        d(2000, 1, 20)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Month, true, Some(&start), &d(2000, 8, 1)),
        d(1999, 8, 1)
    );

    let start = d(2001, 1, 1);
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Year, true, Some(&start), &d(2005, 1, 1)),
        d(1995, 1, 1)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Year, true, Some(&start), &d(2015, 1, 1)),
        d(2015, 1, 1)
    );
    assert_eq!(
        end_date_picker_value(&g, PickerMode::Decade, true, Some(&start), &d(2050, 1, 1)),
        d(1950, 1, 1)
    );
}

#[test]
fn test_header_arrows() {
    let ctx = ctx(PickerMode::Date);
    let shown = d(2000, 6, 15);

    assert_eq!(
        header_arrows(&ctx, &shown, 0, 1, None, None),
        HeaderArrows::default()
    );

    let min = d(2000, 6, 1);
    let max = d(2000, 7, 31);
    let a = header_arrows(&ctx, &shown, 0, 1, Some(&min), Some(&max));
    assert!(a.hide_prev);
    assert!(a.hide_super_prev);
    assert!(!a.hide_next);
    assert!(a.hide_super_next);

    let min = d(2000, 5, 31);
    let a = header_arrows(&ctx, &shown, 0, 1, Some(&min), None);
    assert!(!a.hide_prev);
    assert!(a.hide_super_prev);

    let a = header_arrows(&ctx, &shown, 0, 2, None, None);
    assert!(!a.hide_prev);
    assert!(!a.hide_super_prev);
    assert!(a.hide_next);
    assert!(a.hide_super_next);

    let a = header_arrows(&ctx, &shown, 1, 2, None, None);
    assert!(a.hide_prev);
    assert!(a.hide_super_prev);
    assert!(!a.hide_next);
    assert!(!a.hide_super_next);
}

#[test]
fn test_sync_reset() {
    let ctx = ctx(PickerMode::Date);
    let calendar = [Some(d(2000, 1, 15)), Some(d(2000, 3, 10))];
    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();

    assert!(pv.sync(&ctx, false, 0, &calendar, None, None).is_none());

    let c = pv.sync(&ctx, true, 0, &calendar, None, None).expect("reset");
    assert_eq!(c.source, PickerSource::Reset);
    assert_eq!(c.range, RangeTag::Start);
    assert_eq!(c.value[0], d(2000, 1, 15));
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 1, 15));

    // unchanged
    assert!(pv.sync(&ctx, true, 0, &calendar, None, None).is_none());

    let c = pv.offset_picker_value(&ctx, 0, 1, false).expect("offset");
    assert_eq!(c.source, PickerSource::Panel);
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 2, 15));

    // switch sides, the end starts where the start is
    pv.sync(&ctx, true, 1, &calendar, None, None);
    assert_eq!(pv.picker_value(&ctx, 1), d(2000, 2, 15));

    // reopen on the end side
    pv.sync(&ctx, false, 1, &calendar, None, None);
    pv.sync(&ctx, true, 1, &calendar, None, None);
    assert_eq!(pv.picker_value(&ctx, 1), d(2000, 3, 10));

    // calendar change while open
    let calendar = [Some(d(2000, 1, 15)), Some(d(2000, 5, 1))];
    pv.sync(&ctx, true, 1, &calendar, None, None);
    assert_eq!(pv.picker_value(&ctx, 1), d(2000, 5, 1));
}

#[test]
fn test_sync_multiple_panel() {
    let ctx = ctx(PickerMode::Date);
    let calendar = [Some(d(2000, 1, 5)), Some(d(2000, 1, 20))];
    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.multiple_panel = true;

    pv.sync(&ctx, true, 1, &calendar, None, None);
    assert_eq!(pv.picker_value(&ctx, 1), d(1999, 12, 20));
    assert_eq!(
        pv.panel_dates(&ctx, 1),
        vec![d(1999, 12, 20), d(2000, 1, 20)]
    );
}

#[test]
fn test_sync_clamp() {
    let ctx = ctx(PickerMode::Date);
    let calendar = [Some(d(2000, 6, 15)), None];

    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.sync(&ctx, true, 0, &calendar, None, Some(&d(2000, 6, 10)));
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 6, 10));

    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.multiple_panel = true;
    pv.sync(&ctx, true, 0, &calendar, None, Some(&d(2000, 6, 20)));
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 5, 20));

    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.sync(&ctx, true, 0, &calendar, Some(&d(2000, 7, 1)), None);
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 7, 1));
}

#[test]
fn test_sync_empty_side() {
    let ctx = ctx(PickerMode::Date);
    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.sync(&ctx, true, 1, &[Some(d(2000, 6, 15)), None], None, None);
    assert_eq!(pv.picker_value(&ctx, 1), d(2000, 6, 15));

    let time = PickerContext::new(ChronoConfig::new(), PickerMode::Time);
    let mut pv = PanelValueState::<NaiveDateTime, 1>::new();
    assert!(pv.sync(&time, true, 0, &[None], None, None).is_none());
}

#[test]
fn test_default_picker_value() {
    let ctx = ctx(PickerMode::Date);
    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.default_picker_value = [Some(d(1990, 1, 1)), None];

    pv.sync(&ctx, true, 0, &[Some(d(2000, 6, 15)), None], None, None);
    assert_eq!(pv.picker_value(&ctx, 0), d(1990, 1, 1));

    let mut pv = PanelValueState::<NaiveDateTime, 2>::new();
    pv.default_picker_value = [None, Some(d(1980, 2, 2))];
    assert_eq!(pv.picker_value(&ctx, 1), d(1980, 2, 2));
}

#[test]
fn test_time_default_value() {
    let ctx = ctx(PickerMode::DateTime);
    let mut pv = PanelValueState::<NaiveDateTime, 1>::new();
    pv.time_default_value = [Some(d(2000, 1, 1) + TimeDelta::minutes(630))];

    pv.set_picker_value(&ctx, 0, d(2021, 6, 21), PickerSource::Panel);
    assert_eq!(
        pv.picker_value(&ctx, 0),
        d(2021, 6, 21) + TimeDelta::minutes(630)
    );
}

#[test]
fn test_set_picker_value_granularity() {
    let ctx = ctx(PickerMode::Month);
    let mut pv = PanelValueState::<NaiveDateTime, 1>::new();
    assert!(pv
        .set_picker_value(&ctx, 0, d(2000, 6, 15), PickerSource::Panel)
        .is_some());
    assert!(pv
        .set_picker_value(&ctx, 0, d(2000, 6, 20), PickerSource::Panel)
        .is_none());
    assert_eq!(pv.picker_value(&ctx, 0), d(2000, 6, 20));

    pv.set_controlled(Some([Some(d(1999, 1, 1))]));
    assert_eq!(pv.picker_value(&ctx, 0), d(1999, 1, 1));
}
