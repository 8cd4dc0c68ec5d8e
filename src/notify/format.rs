use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset, Weekday};

pub const UNKNOWN_TIME: &str = "unknown time";

/// Parses an RFC 3339 timestamp, or a SQLite `YYYY-MM-DD HH:MM:SS[.fff]`
/// one which carries no offset and is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }

    let whole_seconds = raw.split('.').next()?.replace('T', " ");
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(&whole_seconds, format)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

/// Relative label for a notification timestamp, as seen in `offset`.
pub fn time_label(raw: Option<&str>, now: OffsetDateTime, offset: UtcOffset) -> String {
    let Some(at) = raw.and_then(parse_timestamp) else {
        return UNKNOWN_TIME.to_string();
    };
    let at = at.to_offset(offset);
    let now = now.to_offset(offset);

    let diff = now - at;
    if diff < Duration::HOUR {
        let minutes = diff.whole_minutes();
        return if minutes <= 5 {
            "just now".to_string()
        } else {
            format!("{minutes} minutes ago")
        };
    }

    let clock = format!("{:02}:{:02}", at.hour(), at.minute());
    let days = (now.date() - at.date()).whole_days();
    match days {
        d if d < 1 => format!("Today {clock}"),
        1 => format!("Yesterday {clock}"),
        d if d < 7 => format!("{} {clock}", weekday_short(at.weekday())),
        _ => format!(
            "{}-{:02}-{:02} {clock}",
            at.year(),
            u8::from(at.month()),
            at.day()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    const CST: UtcOffset = offset!(+8);

    #[test]
    fn missing_or_malformed_is_unknown() {
        let now = datetime!(2024-03-10 12:00 UTC);
        assert_eq!(time_label(None, now, CST), "unknown time");
        assert_eq!(time_label(Some("yesterday-ish"), now, CST), "unknown time");
        assert_eq!(time_label(Some(""), now, CST), "unknown time");
    }

    #[test]
    fn within_the_hour() {
        let now = datetime!(2024-03-10 12:00 UTC);
        assert_eq!(time_label(Some("2024-03-10 11:57:00"), now, CST), "just now");
        assert_eq!(time_label(Some("2024-03-10 11:55:00"), now, CST), "just now");
        assert_eq!(
            time_label(Some("2024-03-10 11:40:00"), now, CST),
            "20 minutes ago"
        );
    }

    #[test]
    fn same_and_previous_day_use_display_offset() {
        // 20:00 at +08:00.
        let now = datetime!(2024-03-10 12:00 UTC);
        assert_eq!(time_label(Some("2024-03-10 02:15:00"), now, CST), "Today 10:15");
        // 2024-03-09 23:30 at +08:00.
        assert_eq!(
            time_label(Some("2024-03-09 15:30:00"), now, CST),
            "Yesterday 23:30"
        );
    }

    #[test]
    fn within_a_week_shows_weekday() {
        let now = datetime!(2024-03-10 12:00 UTC);
        // 2024-03-06 is a Wednesday.
        assert_eq!(time_label(Some("2024-03-06 01:00:00"), now, CST), "Wed 09:00");
    }

    #[test]
    fn older_shows_full_date() {
        let now = datetime!(2024-03-10 12:00 UTC);
        assert_eq!(
            time_label(Some("2024-01-02 03:04:05"), now, CST),
            "2024-01-02 11:04"
        );
    }

    #[test]
    fn accepts_rfc3339_and_fractional_seconds() {
        let now = datetime!(2024-03-10 12:00 UTC);
        assert_eq!(
            time_label(Some("2024-03-10T10:00:00+08:00"), now, CST),
            "Today 10:00"
        );
        assert_eq!(
            time_label(Some("2024-03-10 02:00:00.123456"), now, CST),
            "Today 10:00"
        );
    }
}
