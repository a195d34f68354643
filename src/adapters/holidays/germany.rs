//! German public holidays, nationwide and per state.
//!
//! Movable feasts are offsets from Easter Sunday. Rosenmontag is added for
//! North Rhine-Westphalia, where it is observed as a regional day off.

use crate::domain::Holiday;
use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// State codes (ISO 3166-2:DE suffix, lower case).
pub const STATES: [&str; 16] = [
    "bb", "be", "bw", "by", "hb", "he", "hh", "mv", "ni", "nw", "rp", "sh", "sl", "sn", "st", "th",
];

/// First year with the full set of current rules (German Unity Day).
pub const FIRST_YEAR: i32 = 1991;
pub const LAST_YEAR: i32 = 2199;

/// Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Wednesday before November 23rd.
fn repentance_day(year: i32) -> Option<NaiveDate> {
    let nov_22 = NaiveDate::from_ymd_opt(year, 11, 22)?;
    let back = (nov_22.weekday().num_days_from_monday() + 7 - Weekday::Wed.num_days_from_monday()) % 7;
    nov_22.checked_sub_signed(TimeDelta::days(back as i64))
}

fn in_states(state: Option<&str>, states: &[&str]) -> bool {
    state.is_some_and(|s| states.contains(&s))
}

/// Holidays for `state` (or nationwide only when `None`) in `year`, sorted by date.
///
/// Caller validates `state` and `year`.
pub fn holidays(state: Option<&str>, year: i32) -> Vec<Holiday> {
    let mut out = Vec::new();
    let mut push = |date: Option<NaiveDate>, name: &str| {
        if let Some(date) = date {
            out.push(Holiday {
                date,
                name: name.to_string(),
            });
        }
    };
    let fixed = |month: u32, day: u32| NaiveDate::from_ymd_opt(year, month, day);
    let easter = easter_sunday(year);
    let from_easter = |days: i64| easter.and_then(|e| e.checked_add_signed(TimeDelta::days(days)));

    push(fixed(1, 1), "New Year's Day");
    push(from_easter(-2), "Good Friday");
    push(from_easter(1), "Easter Monday");
    push(fixed(5, 1), "Labour Day");
    push(from_easter(39), "Ascension Day");
    push(from_easter(50), "Whit Monday");
    push(fixed(10, 3), "Day of German Unity");
    push(fixed(12, 25), "Christmas Day");
    push(fixed(12, 26), "St. Stephen's Day");

    if in_states(state, &["bw", "by", "st"]) {
        push(fixed(1, 6), "Epiphany");
    }
    if (in_states(state, &["be"]) && year >= 2019) || (in_states(state, &["mv"]) && year >= 2023) {
        push(fixed(3, 8), "International Women's Day");
    }
    if in_states(state, &["nw"]) {
        push(from_easter(-48), "Rosenmontag");
    }
    if in_states(state, &["bw", "by", "he", "nw", "rp", "sl"]) {
        push(from_easter(60), "Corpus Christi");
    }
    if in_states(state, &["sl"]) {
        push(fixed(8, 15), "Assumption Day");
    }
    if in_states(state, &["th"]) && year >= 2019 {
        push(fixed(9, 20), "World Children's Day");
    }
    if in_states(state, &["bb", "mv", "sn", "st", "th"])
        || (in_states(state, &["hb", "hh", "ni", "sh"]) && year >= 2018)
        || year == 2017
    {
        push(fixed(10, 31), "Reformation Day");
    }
    if in_states(state, &["bw", "by", "nw", "rp", "sl"]) {
        push(fixed(11, 1), "All Saints' Day");
    }
    if in_states(state, &["sn"]) {
        push(repentance_day(year), "Day of Repentance and Prayer");
    }

    out.sort_by_key(|h| h.date);
    out
}
