use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime, Offset, Utc};

pub const DATE_NOT_AVAILABLE: &str = "Tanggal tidak tersedia";
pub const DATE_INVALID: &str = "Tanggal tidak valid";

/// Long-form date and time, e.g. `1 Mei 2024 pukul 17.30`.
const LONG_FORMAT: &str = "%-d %B %Y pukul %H.%M";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayDate {
    Formatted(String),
    Invalid,
    NotAvailable,
}

impl DisplayDate {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayDate::Formatted(text) => text,
            DisplayDate::Invalid => DATE_INVALID,
            DisplayDate::NotAvailable => DATE_NOT_AVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    offset: FixedOffset,
    locale: Locale,
}

impl Default for DateFormatter {
    /// Indonesian locale in Western Indonesia Time (UTC+7).
    fn default() -> Self {
        Self::with_offset_hours(7).unwrap_or_else(Self::utc)
    }
}

impl DateFormatter {
    pub fn utc() -> Self {
        Self { offset: Utc.fix(), locale: Locale::id_ID }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset, locale: Locale::id_ID }
    }

    /// `None` when the offset is outside ±23 hours.
    pub fn with_offset_hours(hours: i32) -> Option<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self::with_offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn format(&self, raw: Option<&str>) -> DisplayDate {
        let raw = match raw.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => raw,
            None => return DisplayDate::NotAvailable,
        };
        match parse_timestamp(raw) {
            Some(ts) => DisplayDate::Formatted(
                ts.with_timezone(&self.offset)
                    .format_localized(LONG_FORMAT, self.locale)
                    .to_string(),
            ),
            None => {
                tracing::debug!("Unparseable publish date: {:?}", raw);
                DisplayDate::Invalid
            }
        }
    }
}

/// Accepts RFC 3339, RFC 2822, zone-less timestamps (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholders_differ() {
        let formatter = DateFormatter::default();
        let invalid = formatter.format(Some("not-a-date"));
        let missing = formatter.format(None);
        assert_eq!(invalid, DisplayDate::Invalid);
        assert_eq!(missing, DisplayDate::NotAvailable);
        assert_ne!(invalid.as_str(), missing.as_str());
    }

    #[test]
    fn test_empty_is_not_available() {
        let formatter = DateFormatter::default();
        assert_eq!(formatter.format(Some("")), DisplayDate::NotAvailable);
        assert_eq!(formatter.format(Some("   ")), DisplayDate::NotAvailable);
    }

    #[test]
    fn test_formats_in_indonesian_long_form() {
        let formatter = DateFormatter::utc();
        let shown = formatter.format(Some("2024-05-01T10:30:00Z"));
        let text = shown.as_str();
        assert!(text.starts_with("1 "), "{}", text);
        assert!(text.contains("Mei"), "{}", text);
        assert!(text.contains("2024"), "{}", text);
        assert!(text.ends_with("10.30"), "{}", text);
    }

    #[test]
    fn test_applies_display_offset() {
        let formatter = DateFormatter::with_offset_hours(7).unwrap();
        let shown = formatter.format(Some("2024-05-01T20:15:00Z"));
        let text = shown.as_str();
        assert!(text.starts_with("2 "), "{}", text);
        assert!(text.ends_with("03.15"), "{}", text);
    }

    #[test]
    fn test_parse_variants() {
        let expected = parse_timestamp("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T17:30:00+07:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("Wed, 01 May 2024 10:30:00 +0000"), Some(expected));
        assert!(parse_timestamp("2024-05-01").is_some());
        assert_eq!(parse_timestamp("2024-13-45"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(DateFormatter::with_offset_hours(30).is_none());
        assert!(DateFormatter::with_offset_hours(-5).is_some());
    }
}
