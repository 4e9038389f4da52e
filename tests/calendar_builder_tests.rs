use chrono::NaiveDate;
use holiday_ics::{
    CalendarBuilder, CalendarSpec, FixedDateSpec, HolidayConfig, HolidayError, IdentifierRegistry,
    MovableFeastSpec, YearRange, easter_sunday,
};
use indexmap::IndexMap;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn movable(offset: &str) -> MovableFeastSpec {
    MovableFeastSpec::new(offset.parse().unwrap())
}

fn fixed(month_day: &str) -> FixedDateSpec {
    FixedDateSpec::new(month_day.parse().unwrap())
}

fn sample_calendar() -> CalendarSpec {
    let mut spec = CalendarSpec::default();
    spec.easter.insert("Karfreitag".into(), movable("-2"));
    spec.easter.insert("Ostermontag".into(), movable("+1"));
    spec.repeat.insert("Neujahr".into(), fixed("0101"));
    spec.repeat.insert("Tag der Arbeit".into(), fixed("0501"));
    spec
}

#[test]
fn movable_events_use_easter_offset_and_year_minus_three() {
    let mut registry = IdentifierRegistry::new();
    let mut builder = CalendarBuilder::new(&mut registry);
    let mut spec = sample_calendar();

    let events = builder
        .build_movable_feast_events("Bayern", &mut spec.easter, 2025)
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "Karfreitag");
    assert_eq!(events[0].start, d(2025, 4, 18));
    assert_eq!(events[1].start, d(2025, 4, 21));
    for event in &events {
        assert_eq!(event.created, d(2022, 1, 1));
        assert!(!event.recurring_yearly);
    }
    assert!(spec.easter["Karfreitag"]
        .stored_identifiers_by_year
        .contains_key(&2025));
}

#[test]
fn fixed_events_recur_and_use_reference_year() {
    let mut registry = IdentifierRegistry::new();
    let mut builder = CalendarBuilder::new(&mut registry);
    let mut spec = sample_calendar();

    let events = builder
        .build_fixed_date_events("Bayern", &mut spec.repeat, d(2025, 1, 1))
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].start, d(2025, 1, 1));
    assert_eq!(events[1].start, d(2025, 5, 1));
    assert!(events.iter().all(|e| e.recurring_yearly));
    assert!(events.iter().all(|e| e.created == d(2025, 1, 1)));
    assert!(spec.repeat["Neujahr"].stored_identifier.is_some());
}

#[test]
fn calendar_orders_years_ascending_then_fixed_dates() {
    let mut registry = IdentifierRegistry::new();
    let mut builder = CalendarBuilder::new(&mut registry);
    let mut spec = sample_calendar();

    let calendar = builder
        .build_calendar("Bayern", &mut spec, YearRange::new(2024, 2026).unwrap())
        .unwrap();

    let starts: Vec<NaiveDate> = calendar.events.iter().map(|e| e.start).collect();
    assert_eq!(
        starts,
        vec![
            d(2024, 3, 29),
            d(2024, 4, 1),
            d(2025, 4, 18),
            d(2025, 4, 21),
            d(2026, 4, 3),
            d(2026, 4, 6),
            d(2024, 1, 1),
            d(2024, 5, 1),
        ]
    );
    assert_eq!(calendar.title, "Bayern");
    assert_eq!(calendar.name_prefix, "Feiertage");
}

#[test]
fn identifiers_are_stable_across_builds() {
    let mut spec = sample_calendar();
    let range = YearRange::new(2025, 2026).unwrap();

    let mut first_registry = IdentifierRegistry::new();
    let first = CalendarBuilder::new(&mut first_registry)
        .build_calendar("Bayern", &mut spec, range)
        .unwrap();
    assert_eq!(first_registry.minted(), 6);

    let mut second_registry = IdentifierRegistry::new();
    let second = CalendarBuilder::new(&mut second_registry)
        .build_calendar("Bayern", &mut spec, range)
        .unwrap();
    assert_eq!(second_registry.minted(), 0);
    assert_eq!(first, second);
}

#[test]
fn year_scoped_identifiers_differ_per_year() {
    let mut registry = IdentifierRegistry::new();
    let mut spec = CalendarSpec::default();
    spec.easter.insert("Ostersonntag".into(), movable("+0"));

    let calendar = CalendarBuilder::new(&mut registry)
        .build_calendar("Test", &mut spec, YearRange::new(2025, 2026).unwrap())
        .unwrap();
    assert_ne!(calendar.events[0].identifier, calendar.events[1].identifier);
}

#[test]
fn missing_offset_fails_with_field_error() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Fronleichnam".to_string(), MovableFeastSpec::default());

    let err = CalendarBuilder::new(&mut registry)
        .build_movable_feast_events("Bayern", &mut specs, 2025)
        .unwrap_err();
    assert!(matches!(
        err,
        HolidayError::MissingField { field: "offset", ref title, .. } if title == "Fronleichnam"
    ));
}

#[test]
fn missing_month_day_fails_with_field_error() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Reformationstag".to_string(), FixedDateSpec::default());

    let err = CalendarBuilder::new(&mut registry)
        .build_fixed_date_events("Sachsen", &mut specs, d(2025, 1, 1))
        .unwrap_err();
    assert!(matches!(err, HolidayError::MissingField { field: "monthDay", .. }));
}

#[test]
fn leap_day_starts_in_next_leap_year() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Schalttag".to_string(), fixed("0229"));

    let events = CalendarBuilder::new(&mut registry)
        .build_fixed_date_events("Test", &mut specs, d(2025, 1, 1))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start, d(2028, 2, 29));
    assert_eq!(events[0].created, d(2025, 1, 1));
    assert!(events[0].recurring_yearly);
}

#[test]
fn leap_day_in_leap_reference_year_is_kept() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Schalttag".to_string(), fixed("0229"));

    let events = CalendarBuilder::new(&mut registry)
        .build_fixed_date_events("Test", &mut specs, d(2024, 1, 1))
        .unwrap();
    assert_eq!(events[0].start, d(2024, 2, 29));
}

#[test]
fn leap_day_skips_non_leap_century() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Schalttag".to_string(), fixed("0229"));

    let events = CalendarBuilder::new(&mut registry)
        .build_fixed_date_events("Test", &mut specs, d(2097, 1, 1))
        .unwrap();
    assert_eq!(events[0].start, d(2104, 2, 29));
}

#[test]
fn leap_day_past_last_supported_year_fails() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Schalttag".to_string(), fixed("0229"));

    let err = CalendarBuilder::new(&mut registry)
        .build_fixed_date_events("Test", &mut specs, d(9997, 1, 1))
        .unwrap_err();
    assert!(matches!(err, HolidayError::InvalidField { field: "monthDay", .. }));
}

#[test]
fn build_all_stops_at_first_broken_calendar() {
    let mut config = HolidayConfig::default();
    config.calendars.insert("Bayern".into(), sample_calendar());
    let mut broken = CalendarSpec::default();
    broken.repeat.insert("Kaputt".into(), FixedDateSpec::default());
    config.calendars.insert("Broken".into(), broken);

    let mut registry = IdentifierRegistry::new();
    let result =
        CalendarBuilder::new(&mut registry).build_all(&mut config, YearRange::single(2025).unwrap());
    assert!(matches!(result, Err(HolidayError::MissingField { .. })));
}

#[test]
fn custom_prefix_is_used_for_calendar_name() {
    let mut registry = IdentifierRegistry::new();
    let mut spec = CalendarSpec::default();
    let calendar = CalendarBuilder::new(&mut registry)
        .with_name_prefix("Holidays")
        .build_calendar("Hessen", &mut spec, YearRange::single(2025).unwrap())
        .unwrap();
    assert_eq!(calendar.display_name(), "Holidays Hessen");
    assert!(calendar.events.is_empty());
}

#[test]
fn path_like_calendar_names_are_rejected() {
    let mut registry = IdentifierRegistry::new();
    let mut spec = CalendarSpec::default();
    for name in ["", "..", "a/b", "a\\b"] {
        let err = CalendarBuilder::new(&mut registry)
            .build_calendar(name, &mut spec, YearRange::single(2025).unwrap())
            .unwrap_err();
        assert!(matches!(err, HolidayError::InvalidField { .. }), "name {name:?}");
    }
}

#[test]
fn year_range_validation() {
    assert!(matches!(
        YearRange::new(2026, 2024),
        Err(HolidayError::InvalidYearRange { start: 2026, end: 2024 })
    ));
    assert!(matches!(
        YearRange::new(1000, 2024),
        Err(HolidayError::YearOutOfRange { year: 1000, .. })
    ));
    let range = YearRange::new(2024, 2026).unwrap();
    assert_eq!(range.year_count(), 3);
    assert_eq!(range.years().collect::<Vec<_>>(), vec![2024, 2025, 2026]);
}

#[test]
fn default_range_covers_current_and_two_following_years() {
    let range = YearRange::default_for(d(2026, 10, 19)).unwrap();
    assert_eq!((range.start(), range.end()), (2026, 2028));
    assert_eq!(range.reference_date().unwrap(), d(2026, 1, 1));
}

#[test]
fn partial_bounds_span_default_width() {
    let today = d(2026, 10, 19);
    let from = YearRange::from_bounds(Some(2030), None, today).unwrap();
    let to = YearRange::from_bounds(None, Some(2020), today).unwrap();
    let both = YearRange::from_bounds(Some(2014), Some(2016), today).unwrap();
    assert_eq!((from.start(), from.end()), (2030, 2032));
    assert_eq!((to.start(), to.end()), (2018, 2020));
    assert_eq!((both.start(), both.end()), (2014, 2016));
}

#[test]
fn easter_sunday_offset_zero_lands_on_easter() {
    let mut registry = IdentifierRegistry::new();
    let mut specs = IndexMap::new();
    specs.insert("Ostersonntag".to_string(), movable("+0"));
    for year in [2014, 2019, 2024, 2030] {
        let events = CalendarBuilder::new(&mut registry)
            .build_movable_feast_events("Test", &mut specs, year)
            .unwrap();
        assert_eq!(events[0].start, easter_sunday(year).unwrap());
        assert_eq!(events[0].end(), events[0].start.succ_opt().unwrap());
    }
}
