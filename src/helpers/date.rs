//! Date helper functions

use chrono::{DateTime, Locale, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;

/// Formats publication dates with the site's format, locale and timezone
#[derive(Debug, Clone)]
pub struct DateFormatter {
    /// chrono strftime format
    format: String,
    locale: Option<Locale>,
    timezone: Option<Tz>,
}

impl DateFormatter {
    /// Build from a Moment.js-style format, a locale name such as `pt_BR`
    /// and an IANA timezone name. Unknown locales and timezones fall back
    /// to English and UTC.
    pub fn new(format: &str, locale: &str, timezone: &str) -> Self {
        let locale = if locale.is_empty() {
            None
        } else {
            match Locale::try_from(locale.replace('-', "_").as_str()) {
                Ok(locale) => Some(locale),
                Err(_) => {
                    tracing::warn!("Unknown date locale {:?}, using English", locale);
                    None
                }
            }
        };

        let timezone = if timezone.is_empty() {
            None
        } else {
            match timezone.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(e) => {
                    tracing::warn!("Unknown timezone {:?}, using UTC: {}", timezone, e);
                    None
                }
            }
        };

        Self {
            format: moment_to_chrono_format(format),
            locale,
            timezone,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.date_format, &config.date_locale, &config.timezone)
    }

    /// Format a UTC timestamp in the configured timezone
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        match self.timezone {
            Some(tz) => self.format_in(&date.with_timezone(&tz)),
            None => self.format_in(date),
        }
    }

    fn format_in<T: TimeZone>(&self, date: &DateTime<T>) -> String
    where
        T::Offset: std::fmt::Display,
    {
        match self.locale {
            Some(locale) => date.format_localized(&self.format, locale).to_string(),
            None => date.format(&self.format).to_string(),
        }
    }
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<T: TimeZone>(date: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each letter
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 26, 1, 30, 0).unwrap()
    }

    #[test]
    fn test_format_in_utc() {
        let formatter = DateFormatter::new("DD MMM YYYY", "en_US", "");
        assert_eq!(formatter.format(&date()), "26 Mar 2021");
    }

    #[test]
    fn test_format_in_timezone() {
        let formatter = DateFormatter::new("YYYY-MM-DD HH:mm", "", "America/Sao_Paulo");
        assert_eq!(formatter.format(&date()), "2021-03-25 22:30");
    }

    #[test]
    fn test_unknown_locale_and_timezone_fall_back() {
        let formatter = DateFormatter::new("DD MMM YYYY", "xx_YY", "Mars/Olympus");
        assert_eq!(formatter.format(&date()), "26 Mar 2021");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date()), "2021-03-26T01:30:00.000+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("DD MMM YYYY"), "%d %b %Y");
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
