//! # Dates
//!
//! BibLaTeX date fields hold either a single date or a date range:
//! ```bib
//! date = {1850}
//! date = {1967-02}
//! date = {1988-01-12/2016-12-31}
//! date = {1997/}
//! ```
//! A [`PartialDate`] is a date where the month and day may be missing, and a [`DateRange`]
//! combines a start date with an optional end date.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, Result};

/// A date with optional components.
///
/// Components are validated at construction: the year is non-negative, the month lies in
/// `1..=12` and the day in `1..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PartialDate {
    year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
}

impl PartialDate {
    pub fn new(year: Option<i32>, month: Option<u8>, day: Option<u8>) -> Result<Self> {
        if let Some(y) = year.filter(|y| *y < 0) {
            return Err(Error::syntax(ErrorCode::InvalidYear(y)));
        }
        if let Some(m) = month.filter(|m| !(1..=12).contains(m)) {
            return Err(Error::syntax(ErrorCode::InvalidMonth(m)));
        }
        if let Some(d) = day.filter(|d| !(1..=31).contains(d)) {
            return Err(Error::syntax(ErrorCode::InvalidDay(d)));
        }
        Ok(Self { year, month, day })
    }

    /// A date with no components.
    pub const fn empty() -> Self {
        Self {
            year: None,
            month: None,
            day: None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(year) = self.year {
            write!(f, "{year:04}")?;
            sep = "-";
        }
        if let Some(month) = self.month {
            write!(f, "{sep}{month:02}")?;
            sep = "-";
        }
        if let Some(day) = self.day {
            write!(f, "{sep}{day:02}")?;
        }
        Ok(())
    }
}

/// A single date, a closed range `start/end` or an open range `start/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    start: PartialDate,
    end: PartialDate,
    open: bool,
}

impl DateRange {
    pub fn new(start: PartialDate, end: PartialDate, open: bool) -> Self {
        Self { start, end, open }
    }

    /// A range consisting of a single date.
    pub fn single(date: PartialDate) -> Self {
        Self::new(date, PartialDate::empty(), false)
    }

    pub const fn empty() -> Self {
        Self {
            start: PartialDate::empty(),
            end: PartialDate::empty(),
            open: false,
        }
    }

    pub fn start(&self) -> &PartialDate {
        &self.start
    }

    pub fn end(&self) -> &PartialDate {
        &self.end
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty() && !self.open
    }

    /// Parse a BibLaTeX date string. An empty string gives an empty range.
    ///
    /// ```
    /// use bibkit::date::{DateRange, PartialDate};
    ///
    /// let range = DateRange::parse("1997/").unwrap();
    /// assert_eq!(range.start(), &PartialDate::new(Some(1997), None, None).unwrap());
    /// assert!(range.is_open());
    ///
    /// assert!(DateRange::parse("20-20").unwrap_err().is_parse());
    /// assert!(DateRange::parse("2016-31-12").unwrap_err().is_value());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Ok(Self::empty());
        }

        let invalid = || Error::syntax(ErrorCode::InvalidDate(input.to_owned()));
        let mut cursor = DateCursor {
            bytes: s.as_bytes(),
            pos: 0,
        };

        let start = cursor.date().ok_or_else(invalid)?;
        let (end, open) = if cursor.eat(b'/') {
            if cursor.at_end() {
                (None, true)
            } else {
                (Some(cursor.date().ok_or_else(invalid)?), false)
            }
        } else {
            (None, false)
        };

        if !cursor.at_end() {
            return Err(invalid());
        }

        let start = start.build()?;
        let end = match end {
            Some(components) => components.build()?,
            None => PartialDate::empty(),
        };
        Ok(Self::new(start, end, open))
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Writes the canonical form, which parses back to the same range.
impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        write!(f, "{}", self.start)?;
        if self.open {
            f.write_str("/")
        } else if !self.end.is_empty() {
            write!(f, "/{}", self.end)
        } else {
            Ok(())
        }
    }
}

struct Components {
    year: i32,
    month: Option<u8>,
    day: Option<u8>,
}

impl Components {
    fn build(self) -> Result<PartialDate> {
        PartialDate::new(Some(self.year), self.month, self.day)
    }
}

/// Scanner for `YYYY[-MM[-DD]]`.
struct DateCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl DateCursor<'_> {
    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Exactly `n` ascii digits.
    fn digits(&mut self, n: usize) -> Option<u32> {
        let digits = self.bytes.get(self.pos..self.pos + n)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos += n;
        Some(
            digits
                .iter()
                .fold(0, |acc, d| acc * 10 + u32::from(d - b'0')),
        )
    }

    fn date(&mut self) -> Option<Components> {
        let year = self.digits(4)? as i32;
        let mut month = None;
        let mut day = None;

        if self.eat(b'-') {
            month = Some(self.digits(2)? as u8);
            if self.eat(b'-') {
                day = Some(self.digits(2)? as u8);
            }
        }

        Some(Components { year, month, day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: Option<u8>, day: Option<u8>) -> PartialDate {
        PartialDate::new(Some(year), month, day).unwrap()
    }

    #[test]
    fn test_partial_date_validation() {
        assert_eq!(
            PartialDate::new(Some(-1), None, None).unwrap_err().code(),
            &ErrorCode::InvalidYear(-1)
        );
        assert_eq!(
            PartialDate::new(Some(2000), Some(13), None).unwrap_err().code(),
            &ErrorCode::InvalidMonth(13)
        );
        assert_eq!(
            PartialDate::new(Some(2000), Some(0), None).unwrap_err().code(),
            &ErrorCode::InvalidMonth(0)
        );
        assert_eq!(
            PartialDate::new(Some(2000), Some(1), Some(32)).unwrap_err().code(),
            &ErrorCode::InvalidDay(32)
        );
        assert!(PartialDate::new(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            DateRange::parse("1850").unwrap(),
            DateRange::new(date(1850, None, None), PartialDate::empty(), false)
        );
        assert_eq!(
            DateRange::parse("1967-02").unwrap(),
            DateRange::single(date(1967, Some(2), None))
        );
        assert_eq!(
            DateRange::parse("2009-01-31").unwrap(),
            DateRange::single(date(2009, Some(1), Some(31)))
        );
        assert_eq!(
            DateRange::parse("1988-01-12/2016-12-31").unwrap(),
            DateRange::new(
                date(1988, Some(1), Some(12)),
                date(2016, Some(12), Some(31)),
                false
            )
        );
        assert_eq!(
            DateRange::parse("1997/").unwrap(),
            DateRange::new(date(1997, None, None), PartialDate::empty(), true)
        );
        assert_eq!(DateRange::parse("").unwrap(), DateRange::empty());
    }

    #[test]
    fn test_parse_failures() {
        for bad in ["20-20", "202034-02", "/2016-12-31", "2016-1-1", "2016/x", "1997//"] {
            let err = DateRange::parse(bad).unwrap_err();
            assert_eq!(err.code(), &ErrorCode::InvalidDate(bad.into()), "{bad}");
            assert!(err.is_parse());
        }

        let err = DateRange::parse("2016-31-12").unwrap_err();
        assert_eq!(err.code(), &ErrorCode::InvalidMonth(31));
        assert!(err.is_value());
    }

    #[test]
    fn test_display() {
        for s in ["1850", "1967-02", "2009-01-31", "1988-01-12/2016-12-31", "1997/", "0033"] {
            assert_eq!(DateRange::parse(s).unwrap().to_string(), s);
        }
        assert_eq!(DateRange::empty().to_string(), "");
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            let _ = DateRange::parse(&s);
        }

        #[test]
        fn canonical_form_parses_back(s in "[0-9]{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12][0-9]|3[01]))?)?(/|/[0-9]{4})?") {
            let range = DateRange::parse(&s).unwrap();
            prop_assert_eq!(DateRange::parse(&range.to_string()).unwrap(), range);
        }
    }
}
