use crate::ConvertError;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SECS_PER_DAY: i64 = 86_400;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic gregorian calendar
const EPOCH_SHIFT: i64 = 719_468;

/// Days in a 400 year gregorian cycle
const DAYS_PER_ERA: i64 = 146_097;

const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i64, month: u8) -> u8 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_PER_MONTH[usize::from(month)]
    }
}

/// Convert days since the unix epoch into a (year, month, day) civil date
///
/// Returns `None` when the day count is too close to `i64::MAX` to be
/// shifted onto the calendar era.
///
/// ```
/// use archivist::convert::civil_from_days;
/// assert_eq!(civil_from_days(0), Some((1970, 1, 1)));
/// assert_eq!(civil_from_days(-1), Some((1969, 12, 31)));
/// assert_eq!(civil_from_days(11_016), Some((2000, 2, 29)));
/// assert_eq!(civil_from_days(i64::MAX), None);
/// ```
pub fn civil_from_days(days: i64) -> Option<(i64, u8, u8)> {
    days.checked_add(EPOCH_SHIFT).map(civil_from_shifted)
}

/// Days are counted from 0000-03-01
fn civil_from_shifted(z: i64) -> (i64, u8, u8) {
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Convert a civil date into days since the unix epoch
///
/// Returns `None` when the year is too large to be represented.
///
/// ```
/// use archivist::convert::days_from_civil;
/// assert_eq!(days_from_civil(1970, 1, 1), Some(0));
/// assert_eq!(days_from_civil(1969, 12, 31), Some(-1));
/// ```
pub fn days_from_civil(year: i64, month: u8, day: u8) -> Option<i64> {
    let year = year - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let month = i64::from(month);
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era.checked_mul(DAYS_PER_ERA)?
        .checked_add(doe)?
        .checked_sub(EPOCH_SHIFT)
}

/// A point in time with millisecond precision relative to the unix epoch
///
/// `seconds` is floored so that `millis` is always within [0, 999] even for
/// instants before the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    seconds: i64,
    millis: u16,
}

impl Timestamp {
    /// Create a timestamp from whole seconds and a millisecond part
    ///
    /// Returns `None` if `millis` is greater than 999.
    pub fn new(seconds: i64, millis: u16) -> Option<Self> {
        if millis < 1000 {
            Some(Timestamp { seconds, millis })
        } else {
            None
        }
    }

    /// Create a timestamp from whole seconds since the epoch
    pub fn from_seconds(seconds: i64) -> Self {
        Timestamp { seconds, millis: 0 }
    }

    /// Create a timestamp from milliseconds since the epoch
    ///
    /// ```
    /// use archivist::Timestamp;
    /// let ts = Timestamp::from_millis(-1);
    /// assert_eq!(ts.seconds(), -1);
    /// assert_eq!(ts.millis(), 999);
    /// ```
    pub fn from_millis(millis: i64) -> Self {
        Timestamp {
            seconds: millis.div_euclid(1000),
            millis: millis.rem_euclid(1000) as u16,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn millis(&self) -> u16 {
        self.millis
    }

    /// Total milliseconds since the epoch
    pub fn as_millis(&self) -> i128 {
        i128::from(self.seconds) * 1000 + i128::from(self.millis)
    }

    /// Whole seconds narrowed into the requested integer type
    ///
    /// ```
    /// use archivist::{ConvertError, Timestamp};
    /// let far = Timestamp::from_seconds(4_102_444_800);
    /// assert_eq!(far.seconds_as::<i64>(), Ok(4_102_444_800));
    /// assert!(matches!(far.seconds_as::<i32>(), Err(ConvertError::Range(_))));
    /// ```
    pub fn seconds_as<T: TryFrom<i64>>(&self) -> Result<T, ConvertError> {
        T::try_from(self.seconds).map_err(|_| {
            ConvertError::Range(format!(
                "{} seconds does not fit in {}",
                self.seconds,
                std::any::type_name::<T>()
            ))
        })
    }

    /// Break the timestamp into calendar components
    pub fn to_datetime(&self) -> DateTime {
        let days = self.seconds.div_euclid(SECS_PER_DAY);
        let secs = self.seconds.rem_euclid(SECS_PER_DAY);
        // days is at most i64::MAX / 86400, far from the shift overflowing
        let (year, month, day) = civil_from_shifted(days + EPOCH_SHIFT);
        DateTime {
            year,
            month,
            day,
            hour: (secs / 3600) as u8,
            minute: (secs % 3600 / 60) as u8,
            second: (secs % 60) as u8,
            millisecond: self.millis,
        }
    }

    /// Convert to a system clock reading
    pub fn to_system_time(&self) -> Result<SystemTime, ConvertError> {
        let total = self.as_millis();
        let duration = u64::try_from(total.unsigned_abs())
            .map(Duration::from_millis)
            .ok();
        let time = match duration {
            Some(d) if total >= 0 => UNIX_EPOCH.checked_add(d),
            Some(d) => UNIX_EPOCH.checked_sub(d),
            None => None,
        };

        time.ok_or_else(|| {
            ConvertError::Range(format!("{} is not representable by the system clock", self))
        })
    }

    /// Convert from a system clock reading, truncating to milliseconds
    pub fn from_system_time(time: SystemTime) -> Result<Self, ConvertError> {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => i128::try_from(d.as_millis()).ok(),
            Err(e) => {
                // round away from the epoch so that sub-millisecond parts floor
                let d = e.duration();
                let mut ms = d.as_millis();
                if d.subsec_nanos() % 1_000_000 != 0 {
                    ms += 1;
                }
                i128::try_from(ms).ok().map(|x| -x)
            }
        };

        millis
            .and_then(|x| i64::try_from(x).ok())
            .map(Timestamp::from_millis)
            .ok_or_else(|| ConvertError::Range(String::from("system time exceeds 64bit millis")))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_datetime(), f)
    }
}

impl FromStr for Timestamp {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse(s)?.to_timestamp()
    }
}

/// Seconds since the unix epoch as a plain number, exchanged as ISO 8601 text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnixTime(pub i64);

/// A calendar date and time in UTC
///
/// ```
/// use archivist::DateTime;
/// let dt = DateTime::parse("2023-07-14T22:44:51.925Z").unwrap();
/// assert_eq!(dt.year(), 2023);
/// assert_eq!(dt.millisecond(), 925);
/// assert_eq!(dt.to_string(), "2023-07-14T22:44:51.925Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    millisecond: u16,
}

impl Default for DateTime {
    fn default() -> Self {
        Timestamp::default().to_datetime()
    }
}

impl DateTime {
    /// Create a datetime from its components if they form a valid instant
    ///
    /// ```
    /// use archivist::DateTime;
    /// assert!(DateTime::from_parts_opt(2020, 2, 29, 0, 0, 0, 0).is_some());
    /// assert!(DateTime::from_parts_opt(2021, 2, 29, 0, 0, 0, 0).is_none());
    /// assert!(DateTime::from_parts_opt(2021, 1, 1, 24, 0, 0, 0).is_none());
    /// ```
    pub fn from_parts_opt(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
    ) -> Option<Self> {
        let valid = (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(year, month)
            && hour < 24
            && minute < 60
            && second < 60
            && millisecond < 1000;

        if valid {
            Some(DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                millisecond,
            })
        } else {
            None
        }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }

    /// Parse the `YYYY-MM-DDThh:mm:ss[.SSS]Z` format
    ///
    /// The year may carry a leading minus sign and has at least four digits.
    /// Every other component is zero padded to a fixed width, and each is
    /// checked against its calendar bounds.
    ///
    /// ```
    /// use archivist::DateTime;
    /// assert!(DateTime::parse("1872-01-01T04:55:32Z").is_ok());
    /// assert!(DateTime::parse("2023-02-29T00:00:00Z").is_err());
    /// assert!(DateTime::parse("2023-01-01 00:00:00Z").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ConvertError> {
        let mut parser = IsoParser {
            input: s,
            rest: s.as_bytes(),
        };

        let negative = parser.eat(b'-');
        let year = parser.digits("year", 4, 18)?;
        let year = if negative { -year } else { year };
        parser.expect(b'-', "year")?;
        let month = parser.fixed("month", 2, 1, 12)?;
        parser.expect(b'-', "month")?;
        let day_max = i64::from(days_in_month(year, month as u8));
        let day = parser.fixed("day", 2, 1, day_max)?;
        parser.expect(b'T', "day")?;
        let hour = parser.fixed("hour", 2, 0, 23)?;
        parser.expect(b':', "hour")?;
        let minute = parser.fixed("minute", 2, 0, 59)?;
        parser.expect(b':', "minute")?;
        let second = parser.fixed("second", 2, 0, 59)?;
        let millisecond = if parser.eat(b'.') {
            parser.fixed("millisecond", 3, 0, 999)?
        } else {
            0
        };
        parser.expect(b'Z', "second")?;
        if !parser.rest.is_empty() {
            return Err(parser.error("timezone designator"));
        }

        Ok(DateTime {
            year,
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            millisecond: millisecond as u16,
        })
    }

    /// Convert to a timestamp, failing if the year overflows 64bit seconds
    pub fn to_timestamp(&self) -> Result<Timestamp, ConvertError> {
        let seconds = days_from_civil(self.year, self.month, self.day)
            .and_then(|days| days.checked_mul(SECS_PER_DAY))
            .and_then(|secs| {
                secs.checked_add(
                    i64::from(self.hour) * 3600
                        + i64::from(self.minute) * 60
                        + i64::from(self.second),
                )
            })
            .ok_or_else(|| {
                ConvertError::Range(format!("year {} is out of the timestamp range", self.year))
            })?;

        Ok(Timestamp {
            seconds,
            millis: self.millisecond,
        })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", self.year.unsigned_abs())?;
        } else {
            write!(f, "{:04}", self.year)?;
        }

        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.month, self.day, self.hour, self.minute, self.second
        )?;

        if self.millisecond != 0 {
            write!(f, ".{:03}", self.millisecond)?;
        }

        f.write_str("Z")
    }
}

impl FromStr for DateTime {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse(s)
    }
}

struct IsoParser<'a> {
    input: &'a str,
    rest: &'a [u8],
}

impl<'a> IsoParser<'a> {
    fn error(&self, field: &'static str) -> ConvertError {
        ConvertError::Parsing {
            field,
            input: String::from(self.input),
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        match self.rest.split_first() {
            Some((&x, rest)) if x == b => {
                self.rest = rest;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, b: u8, field: &'static str) -> Result<(), ConvertError> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.error(field))
        }
    }

    fn digits(&mut self, field: &'static str, min: usize, max: usize) -> Result<i64, ConvertError> {
        let len = self.rest.iter().take_while(|x| x.is_ascii_digit()).count();
        if len < min || len > max {
            return Err(self.error(field));
        }

        let (digits, rest) = self.rest.split_at(len);
        self.rest = rest;
        Ok(digits
            .iter()
            .fold(0i64, |acc, &x| acc * 10 + i64::from(x - b'0')))
    }

    fn fixed(
        &mut self,
        field: &'static str,
        width: usize,
        lo: i64,
        hi: i64,
    ) -> Result<i64, ConvertError> {
        let value = self.digits(field, width, width)?;
        if value < lo || value > hi {
            Err(self.error(field))
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[rstest]
    #[case("1872-01-01T04:55:32Z", -3_092_583_868, 0)]
    #[case("1970-01-01T00:00:00Z", 0, 0)]
    #[case("2023-07-14T22:44:51.925Z", 1_689_374_691, 925)]
    #[case("2000-02-29T12:00:00Z", 951_825_600, 0)]
    #[case("1969-12-31T23:59:59.999Z", -1, 999)]
    fn iso_roundtrip(#[case] text: &str, #[case] seconds: i64, #[case] millis: u16) {
        let ts: Timestamp = text.parse().unwrap();
        assert_eq!(ts.seconds(), seconds);
        assert_eq!(ts.millis(), millis);
        assert_eq!(ts.to_string(), text);
    }

    #[rstest]
    #[case("2023-13-01T00:00:00Z", "month")]
    #[case("2023-00-01T00:00:00Z", "month")]
    #[case("2023-04-31T00:00:00Z", "day")]
    #[case("2023-02-29T00:00:00Z", "day")]
    #[case("2023-01-01T24:00:00Z", "hour")]
    #[case("2023-01-01T00:60:00Z", "minute")]
    #[case("2023-01-01T00:00:60Z", "second")]
    #[case("2023-01-01T00:00:00.1Z", "millisecond")]
    #[case("2023-01-01T00:00:00", "second")]
    #[case("2023-01-01T00:00:00Zjunk", "timezone designator")]
    #[case("23-01-01T00:00:00Z", "year")]
    fn iso_rejects(#[case] text: &str, #[case] field: &str) {
        match DateTime::parse(text) {
            Err(ConvertError::Parsing { field: actual, .. }) => assert_eq!(actual, field),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_year() {
        let dt = DateTime::parse("-0001-03-01T00:00:00Z").unwrap();
        assert_eq!(dt.year(), -1);
        assert_eq!(dt.to_string(), "-0001-03-01T00:00:00Z");
        let ts = dt.to_timestamp().unwrap();
        assert_eq!(ts.to_datetime(), dt);
    }

    #[test]
    fn huge_year_is_out_of_range() {
        let dt = DateTime::parse("999999999999999999-01-01T00:00:00Z").unwrap();
        assert!(matches!(dt.to_timestamp(), Err(ConvertError::Range(_))));
    }

    #[test]
    fn system_time_roundtrip() {
        let ts = Timestamp::new(-3_092_583_868, 250).unwrap();
        let time = ts.to_system_time().unwrap();
        assert_eq!(Timestamp::from_system_time(time).unwrap(), ts);

        let ts = Timestamp::new(1_689_374_691, 925).unwrap();
        let time = ts.to_system_time().unwrap();
        assert_eq!(Timestamp::from_system_time(time).unwrap(), ts);
    }

    #[test]
    fn millis_are_bounded() {
        assert!(Timestamp::new(0, 1000).is_none());
        assert!(Timestamp::new(0, 999).is_some());
    }

    #[quickcheck]
    fn civil_days_roundtrip(days: i32) -> bool {
        let days = i64::from(days);
        match civil_from_days(days) {
            Some((y, m, d)) => days_from_civil(y, m, d) == Some(days),
            None => false,
        }
    }

    #[test]
    fn civil_from_days_rejects_unshiftable_counts() {
        assert_eq!(civil_from_days(i64::MAX), None);
        assert_eq!(civil_from_days(i64::MAX - EPOCH_SHIFT + 1), None);
        assert!(civil_from_days(i64::MAX - EPOCH_SHIFT).is_some());
        assert!(civil_from_days(i64::MIN).is_some());
    }

    #[quickcheck]
    fn timestamp_text_roundtrip(millis: i64) -> bool {
        // keep years within four digits of the epoch
        let ts = Timestamp::from_millis(millis % 253_402_300_799_000);
        ts.to_string().parse::<Timestamp>() == Ok(ts)
    }
}
