use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layouts accepted from external producers, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    Rfc3339,
    Rfc2822,
    /// `2024-05-01T10:00:00+0200`, optional fractional seconds
    IsoCompactOffset,
    /// `2024-05-01 10:00:00+02:00`, optional fractional seconds
    SpacedOffset,
    /// `2024-05-01 10:00:00`, read as UTC
    BareSpaced,
    /// `2024-05-01T10:00:00`, read as UTC
    BareIso,
}

pub const TIME_LAYOUTS: &[TimeLayout] = &[
    TimeLayout::Rfc3339,
    TimeLayout::Rfc2822,
    TimeLayout::IsoCompactOffset,
    TimeLayout::SpacedOffset,
    TimeLayout::BareSpaced,
    TimeLayout::BareIso,
];

impl TimeLayout {
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        let parsed = match self {
            TimeLayout::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
            TimeLayout::Rfc2822 => DateTime::parse_from_rfc2822(input).ok(),
            TimeLayout::IsoCompactOffset => {
                DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z").ok()
            }
            TimeLayout::SpacedOffset => {
                DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f%:z").ok()
            }
            TimeLayout::BareSpaced => {
                return NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc());
            }
            TimeLayout::BareIso => {
                return NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc());
            }
        };
        parsed.map(|dt| dt.with_timezone(&Utc))
    }
}

/// Parse a timestamp under the first layout that accepts it.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    TIME_LAYOUTS.iter().find_map(|layout| layout.parse(input))
}

/// First candidate string that parses under any layout.
pub fn first_timestamp<'a, I>(candidates: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().find_map(parse_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_with_offset_normalizes_to_utc() {
        let ts = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_rfc2822() {
        let ts = parse_timestamp("Wed, 01 May 2024 10:00:00 +0000").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_bare_layouts_read_as_utc() {
        let spaced = parse_timestamp("2024-05-01 10:00:00").unwrap();
        let iso = parse_timestamp("2024-05-01T10:00:00").unwrap();
        assert_eq!(spaced, iso);
        assert_eq!(spaced.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_unparsable_and_empty() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("2024-05-01").is_none());
    }

    #[test]
    fn test_first_timestamp_skips_bad_candidates() {
        let ts = first_timestamp(["soon", "", "2024-01-02 03:04:05"]).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-02T03:04:05+00:00");
        assert!(first_timestamp(["nope"]).is_none());
    }
}
