//! Calendar date and time as set from the console

use core::fmt;

/// Wall clock value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Why a date could not be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// Fewer than six fields
    Missing,
    /// Field is not a number or is out of range
    Invalid,
}

/// Years in `setrtc` are given as an offset from 2000
pub const YEAR_BASE: u16 = 2000;

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in a month, 0 for an invalid month
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl DateTime {
    /// Build from `DD MM YY hh mm ss` tokens
    pub fn from_fields<'a, I>(mut fields: I) -> Result<Self, DateTimeError>
    where
        I: Iterator<Item = &'a str>,
    {
        let mut values = [0u8; 6];
        for value in values.iter_mut() {
            let token = fields.next().ok_or(DateTimeError::Missing)?;
            *value = token.parse().map_err(|_| DateTimeError::Invalid)?;
        }
        let [day, month, year, hour, minute, second] = values;
        if year > 99 {
            return Err(DateTimeError::Invalid);
        }

        let datetime = DateTime {
            year: YEAR_BASE + year as u16,
            month,
            day,
            hour,
            minute,
            second,
        };
        if datetime.is_valid() {
            Ok(datetime)
        } else {
            Err(DateTimeError::Invalid)
        }
    }

    /// Check every field against the calendar
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// Day of the week, 0 = Sunday
    pub fn day_of_week(&self) -> u8 {
        // Sakamoto's method
        const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let month = self.month.clamp(1, 12);
        let year = if month < 3 { self.year - 1 } else { self.year };
        let day = year + year / 4 - year / 100 + year / 400
            + OFFSETS[(month - 1) as usize]
            + self.day as u16;
        (day % 7) as u8
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let dt = DateTime::from_fields("19 10 26 14 30 05".split(' ')).unwrap();
        assert_eq!(
            dt,
            DateTime {
                year: 2026,
                month: 10,
                day: 19,
                hour: 14,
                minute: 30,
                second: 5,
            }
        );
    }

    #[test]
    fn test_display() {
        let dt = DateTime::from_fields("01 02 03 04 05 06".split(' ')).unwrap();
        assert_eq!(dt.to_string(), "2003-02-01 04:05:06");
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(
            DateTime::from_fields("19 10 26 14 30".split(' ')),
            Err(DateTimeError::Missing)
        );
        assert_eq!(
            DateTime::from_fields(core::iter::empty()),
            Err(DateTimeError::Missing)
        );
    }

    #[test]
    fn test_invalid_fields() {
        assert_eq!(
            DateTime::from_fields("xx 10 26 14 30 05".split(' ')),
            Err(DateTimeError::Invalid)
        );
        assert_eq!(
            DateTime::from_fields("31 04 26 14 30 05".split(' ')),
            Err(DateTimeError::Invalid)
        );
        assert_eq!(
            DateTime::from_fields("01 01 26 24 00 00".split(' ')),
            Err(DateTimeError::Invalid)
        );
    }

    #[test]
    fn test_leap_day() {
        assert!(DateTime::from_fields("29 02 24 00 00 00".split(' ')).is_ok());
        assert!(DateTime::from_fields("29 02 25 00 00 00".split(' ')).is_err());
    }

    #[test]
    fn test_day_of_week() {
        // 2026-10-19 is a Monday
        let dt = DateTime::from_fields("19 10 26 00 00 00".split(' ')).unwrap();
        assert_eq!(dt.day_of_week(), 1);
        // 2000-01-01 was a Saturday
        let dt = DateTime::from_fields("01 01 00 00 00 00".split(' ')).unwrap();
        assert_eq!(dt.day_of_week(), 6);
    }
}
