use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::Order;

/// Possible errors to occur while building a date range
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("The start date {start} lies after the end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
    #[error("`{0}` is not a date range, expected `YYYY-MM-DD..YYYY-MM-DD`")]
    Malformed(String),
}

/// Possible errors to occur while filtering the dataset
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("The selected range {selected} lies outside of the available dates {available}")]
    OutOfBounds { selected: DateRange, available: DateRange },
}

/// An inclusive range of calendar days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start` up to and including `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        match start <= end {
            true => Ok(Self { start, end }),
            false => Err(RangeError::StartAfterEnd { start, end }),
        }
    }

    /// A range covering exactly one day
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// The first day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the range, itself included
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `other` lies completely within this range
    pub fn encloses(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Every day of the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    /// Accepts `start..end`, `start end` or a single day
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RangeError::Malformed(s.to_owned());
        let parse = |date: &str| date.trim().parse::<NaiveDate>().map_err(|_| malformed());

        let s = s.trim();
        let bounds = s
            .split_once("..")
            .or_else(|| s.split_once(char::is_whitespace));

        match bounds {
            Some((start, end)) => Self::new(parse(start)?, parse(end)?),
            None => Ok(Self::day(parse(s)?)),
        }
    }
}

/// The orders of a dataset whose purchase day lies within a date range
///
/// Since datasets keep their orders sorted by purchase time, a view is
/// always a contiguous slice of them.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    range: DateRange,
    orders: &'a [Order],
}

impl<'a> View<'a> {
    pub(crate) fn new(range: DateRange, orders: &'a [Order]) -> Self {
        Self { range, orders }
    }

    /// The range this view was filtered by
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The selected orders, sorted by purchase time
    pub fn orders(&self) -> &'a [Order] {
        self.orders
    }

    /// The number of selected order rows
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order was purchased within the range
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_reversed_range() {
        assert_eq!(
            DateRange::new(date("2018-01-02"), date("2018-01-01")),
            Err(RangeError::StartAfterEnd { start: date("2018-01-02"), end: date("2018-01-01") }),
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(date("2018-01-01"), date("2018-01-03")).unwrap();

        assert!(range.contains(date("2018-01-01")));
        assert!(range.contains(date("2018-01-03")));
        assert!(!range.contains(date("2017-12-31")));
        assert!(!range.contains(date("2018-01-04")));
    }

    #[test]
    fn lists_every_day() {
        let range = DateRange::new(date("2018-02-27"), date("2018-03-01")).unwrap();

        assert_eq!(
            range.days().collect::<Vec<_>>(),
            vec![date("2018-02-27"), date("2018-02-28"), date("2018-03-01")],
        );
        assert_eq!(DateRange::day(date("2018-01-01")).days().count(), 1);
    }

    #[test]
    fn parses_ranges() {
        let expected = DateRange::new(date("2018-01-01"), date("2018-01-31")).unwrap();

        assert_eq!("2018-01-01..2018-01-31".parse::<DateRange>(), Ok(expected));
        assert_eq!(" 2018-01-01   2018-01-31 ".parse::<DateRange>(), Ok(expected));
        assert_eq!("2018-01-01 .. 2018-01-31".parse::<DateRange>(), Ok(expected));
        assert_eq!("2018-01-05".parse::<DateRange>(), Ok(DateRange::day(date("2018-01-05"))));
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(matches!("".parse::<DateRange>(), Err(RangeError::Malformed(_))));
        assert!(matches!("2018-01-01..soon".parse::<DateRange>(), Err(RangeError::Malformed(_))));
        assert!(matches!("2018-13-01".parse::<DateRange>(), Err(RangeError::Malformed(_))));
        assert!(matches!(
            "2018-01-31..2018-01-01".parse::<DateRange>(),
            Err(RangeError::StartAfterEnd { .. }),
        ));
    }

    #[test]
    fn encloses_subranges() {
        let outer = DateRange::new(date("2018-01-01"), date("2018-01-31")).unwrap();

        assert!(outer.encloses(&outer));
        assert!(outer.encloses(&DateRange::day(date("2018-01-15"))));
        assert!(!outer.encloses(&DateRange::new(date("2017-12-31"), date("2018-01-02")).unwrap()));
    }
}
