//! End-to-end recurrence scenarios across rule, iterator and expansion.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::recur::{RecurrenceExpansion, RecurrenceIterator, RecurrenceRule};
use crate::time::{CalendarTime, UtcOffset};
use crate::zone::{Observance, ObservanceKind, Timezone, Zone};

fn take(iter: &mut RecurrenceIterator, n: usize) -> Vec<String> {
    let mut out = Vec::new();
    while out.len() < n {
        match iter.next().expect("no guard trips") {
            Some(occurrence) => out.push(occurrence.to_string()),
            None => break,
        }
    }
    out
}

fn iterate(rule: &str, dtstart: CalendarTime, n: usize) -> Vec<String> {
    let rule: RecurrenceRule = rule.parse().expect("valid rule");
    let mut iter = RecurrenceIterator::new(rule, dtstart).expect("valid iterator");
    take(&mut iter, n)
}

#[test]
fn rfc_daily_for_ten_occurrences() {
    let occurrences = iterate(
        "FREQ=DAILY;COUNT=10",
        CalendarTime::date_time(1997, 9, 2, 9, 0, 0),
        20,
    );
    assert_eq!(occurrences.len(), 10);
    assert_eq!(occurrences[0], "1997-09-02T09:00:00");
    assert_eq!(occurrences[9], "1997-09-11T09:00:00");
}

#[test]
fn rfc_every_other_day() {
    let occurrences = iterate(
        "FREQ=DAILY;INTERVAL=2;COUNT=4",
        CalendarTime::date_time(1997, 9, 2, 9, 0, 0),
        10,
    );
    assert_eq!(
        occurrences,
        [
            "1997-09-02T09:00:00",
            "1997-09-04T09:00:00",
            "1997-09-06T09:00:00",
            "1997-09-08T09:00:00"
        ]
    );
}

#[test]
fn rfc_yearly_in_june_and_july() {
    let occurrences = iterate(
        "FREQ=YEARLY;COUNT=4;BYMONTH=6,7",
        CalendarTime::date_time(1997, 6, 10, 9, 0, 0),
        10,
    );
    assert_eq!(
        occurrences,
        [
            "1997-06-10T09:00:00",
            "1997-07-10T09:00:00",
            "1998-06-10T09:00:00",
            "1998-07-10T09:00:00"
        ]
    );
}

#[test]
fn rfc_last_day_of_month() {
    let occurrences = iterate(
        "FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=6",
        CalendarTime::date(1997, 9, 28),
        10,
    );
    assert_eq!(
        occurrences,
        [
            "1997-09-30",
            "1997-10-31",
            "1997-11-30",
            "1997-12-31",
            "1998-01-31",
            "1998-02-28"
        ]
    );
}

#[test]
fn rfc_yearly_first_monday_of_october() {
    let occurrences = iterate(
        "FREQ=YEARLY;BYMONTH=10;BYDAY=1MO",
        CalendarTime::date(1996, 10, 7),
        3,
    );
    assert_eq!(occurrences, ["1996-10-07", "1997-10-06", "1998-10-05"]);
}

#[test]
fn yearly_weekday_across_whole_year() {
    // Every Thursday of 2021, expanded from the yearly frequency.
    let occurrences = iterate(
        "FREQ=YEARLY;BYDAY=TH;COUNT=5",
        CalendarTime::date(2021, 1, 7),
        10,
    );
    assert_eq!(
        occurrences,
        ["2021-01-07", "2021-01-14", "2021-01-21", "2021-01-28", "2021-02-04"]
    );
}

#[test]
fn leap_day_rule_from_non_leap_start() {
    let occurrences = iterate(
        "FREQ=YEARLY;BYMONTH=2;BYMONTHDAY=29",
        CalendarTime::date(1900, 2, 1),
        3,
    );
    // 1900 is not a leap year under the Gregorian rule; the rule first
    // fires in 1904.
    assert_eq!(occurrences, ["1904-02-29", "1908-02-29", "1912-02-29"]);
}

#[test]
fn exdate_cancels_single_occurrence() {
    let rule: RecurrenceRule = "FREQ=WEEKLY;COUNT=4".parse().expect("valid rule");
    let dtstart = CalendarTime::date_time(2021, 5, 3, 10, 0, 0);
    let cancelled = CalendarTime::date_time(2021, 5, 17, 10, 0, 0);

    let mut expansion =
        RecurrenceExpansion::new(dtstart, &[rule], &[], &[cancelled]).expect("valid expansion");

    let mut out = Vec::new();
    while let Some(next) = expansion.next().expect("no guard trips") {
        out.push(next.to_string());
    }
    assert_eq!(
        out,
        ["2021-05-03T10:00:00", "2021-05-10T10:00:00", "2021-05-24T10:00:00"]
    );
}

#[test]
fn exdate_with_differing_zone_matches_by_instant() {
    let plus2 = UtcOffset::from_seconds(2 * 3600);
    let tz = Rc::new(Timezone::new(
        "Test/Plus2",
        vec![Observance {
            kind: ObservanceKind::Standard,
            dtstart: CalendarTime::date_time(1970, 1, 1, 0, 0, 0),
            offset_from: plus2,
            offset_to: plus2,
            rrule: None,
            rdates: Vec::new(),
        }],
    ));

    let rule: RecurrenceRule = "FREQ=DAILY;COUNT=3".parse().expect("valid rule");
    let dtstart = CalendarTime::date_time(2021, 5, 3, 12, 0, 0).with_zone(Zone::Tz(Rc::clone(&tz)));
    // The same instant as the second occurrence, expressed in UTC.
    let cancelled = CalendarTime::date_time(2021, 5, 4, 10, 0, 0).with_zone(Zone::Utc);

    let mut expansion =
        RecurrenceExpansion::new(dtstart, &[rule], &[], &[cancelled]).expect("valid expansion");

    let mut out = Vec::new();
    while let Some(next) = expansion.next().expect("no guard trips") {
        out.push(next.to_string());
    }
    assert_eq!(out, ["2021-05-03T12:00:00", "2021-05-05T12:00:00"]);
}

#[test]
fn monotonicity_across_varied_rules() {
    let cases = [
        ("FREQ=DAILY;BYDAY=MO,WE;COUNT=10", CalendarTime::date(2021, 1, 1)),
        ("FREQ=MONTHLY;BYMONTHDAY=10,20;COUNT=10", CalendarTime::date(2021, 1, 5)),
        ("FREQ=YEARLY;BYMONTH=3,9;COUNT=8", CalendarTime::date(2020, 3, 15)),
        ("FREQ=WEEKLY;INTERVAL=3;COUNT=10", CalendarTime::date(2021, 6, 1)),
    ];

    for (text, dtstart) in cases {
        let rule: RecurrenceRule = text.parse().expect("valid rule");
        let mut iter = RecurrenceIterator::new(rule, dtstart.clone()).expect("valid iterator");
        let mut previous: Option<CalendarTime> = None;
        while let Some(occurrence) = iter.next().expect("no guard trips") {
            assert!(
                occurrence.compare(&dtstart) != Ordering::Less,
                "{text}: occurrence before dtstart"
            );
            if let Some(previous) = &previous {
                assert!(
                    occurrence.compare(previous) == Ordering::Greater,
                    "{text}: sequence not increasing"
                );
            }
            previous = Some(occurrence);
        }
    }
}

#[test]
fn text_round_trip_preserves_occurrences() {
    let texts = [
        "FREQ=DAILY;COUNT=5;INTERVAL=2",
        "FREQ=WEEKLY;COUNT=6;BYDAY=TU,TH;WKST=SU",
        "FREQ=MONTHLY;COUNT=6;BYDAY=2MO",
        "FREQ=YEARLY;COUNT=4;BYMONTH=2;BYMONTHDAY=10,20",
    ];
    let dtstart = CalendarTime::date_time(2021, 1, 5, 8, 30, 0);

    for text in texts {
        let rule: RecurrenceRule = text.parse().expect("valid rule");
        let reparsed: RecurrenceRule = rule.to_string().parse().expect("round trip");
        assert_eq!(rule, reparsed, "{text}: rules differ after round trip");

        let mut a = RecurrenceIterator::new(rule, dtstart.clone()).expect("valid iterator");
        let mut b = RecurrenceIterator::new(reparsed, dtstart.clone()).expect("valid iterator");
        assert_eq!(take(&mut a, 100), take(&mut b, 100), "{text}: sequences differ");
    }
}

#[test]
fn shuffled_rule_text_produces_identical_sequence() {
    let dtstart = CalendarTime::date(2021, 1, 1);
    let mut a = RecurrenceIterator::new(
        "FREQ=MONTHLY;BYDAY=1MO,3FR;COUNT=8".parse().expect("valid"),
        dtstart.clone(),
    )
    .expect("valid iterator");
    let mut b = RecurrenceIterator::new(
        "COUNT=8;BYDAY=1MO,3FR;FREQ=MONTHLY".parse().expect("valid"),
        dtstart,
    )
    .expect("valid iterator");
    assert_eq!(take(&mut a, 100), take(&mut b, 100));
}

#[test]
fn zoned_dtstart_carries_zone_through_occurrences() {
    let minus5 = UtcOffset::from_seconds(-5 * 3600);
    let tz = Rc::new(Timezone::new(
        "Test/Minus5",
        vec![Observance {
            kind: ObservanceKind::Standard,
            dtstart: CalendarTime::date_time(1970, 1, 1, 0, 0, 0),
            offset_from: minus5,
            offset_to: minus5,
            rrule: None,
            rdates: Vec::new(),
        }],
    ));

    let rule: RecurrenceRule = "FREQ=DAILY;COUNT=2".parse().expect("valid rule");
    let dtstart = CalendarTime::date_time(2021, 1, 1, 23, 0, 0).with_zone(Zone::Tz(tz));
    let mut iter = RecurrenceIterator::new(rule, dtstart).expect("valid iterator");

    let first = iter.next().expect("ok").expect("occurrence");
    assert_eq!(first.zone.tzid(), "Test/Minus5");
    // 23:00 at UTC-5 is 04:00 UTC the next day.
    assert_eq!(
        CalendarTime::from_unix_time(first.to_unix_time()).to_string(),
        "2021-01-02T04:00:00Z"
    );
}
