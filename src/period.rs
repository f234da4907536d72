use std::io::{BufRead, Write};

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::{config::Config, console::Console, error::Error};

/// Inclusive range of calendar days.
/// An `end` before `start` is accepted and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Answer to the "ending date" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndEntry {
    Date(NaiveDate),
    /// `q`: end of the current half-month
    Quinzaine,
    /// `m`: end of the month
    MonthEnd,
}

impl EndEntry {
    pub fn parse(text: &str, format: &str) -> Result<Self, Error> {
        match text {
            "q" => Ok(EndEntry::Quinzaine),
            "m" => Ok(EndEntry::MonthEnd),
            _ => parse_entry(text, format)
                .map(EndEntry::Date)
                .map_err(|_| Error::InvalidEndEntry(text.to_string())),
        }
    }

    pub fn resolve(self, start: NaiveDate) -> NaiveDate {
        match self {
            EndEntry::Date(date) => date,
            EndEntry::Quinzaine => quinzaine_end(start),
            EndEntry::MonthEnd => month_end(start),
        }
    }
}

pub fn parse_entry(text: &str, format: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(text, format).map_err(|_| Error::InvalidDateEntry(text.to_string()))
}

/// Last day of `date`'s month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        // only December of the last representable year has no successor
        .unwrap_or(NaiveDate::MAX)
}

/// Last day of the half-month containing `date`: the 15th for days 1 to 15,
/// the end of the month otherwise.
pub fn quinzaine_end(date: NaiveDate) -> NaiveDate {
    match date.with_day(15) {
        Some(fifteenth) if date.day() <= 15 => fifteenth,
        _ => month_end(date),
    }
}

/// Ask until `parse` accepts an answer. Only recoverable errors are retried.
fn ask_until<R, W, T>(
    console: &mut Console<R, W>,
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, Error>,
) -> Result<T, Error>
where
    R: BufRead,
    W: Write,
{
    loop {
        let answer = console.ask(prompt)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_recoverable() => {
                debug!("{}", e);
                console.say("Date is invalid.")?;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Interactively obtain the range to process.
pub fn resolve<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    config: &Config,
) -> Result<DateRange, Error> {
    let format = config.entry_date_format.as_str();

    console.say("Enter the beginning and ending dates to process using the format yyyy-mm-dd.")?;
    let start = ask_until(console, "Beginning date: ", |s| parse_entry(s, format))?;

    console.say(
        "Enter the ending date. You can also enter 'q' to calculate to the end of the \
         quinzaine or 'm' to calculate to the end of the month.",
    )?;
    let end = ask_until(console, "Ending date: ", |s| EndEntry::parse(s, format))?;

    Ok(DateRange::new(start, end.resolve(start)))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{month_end, quinzaine_end, resolve, DateRange, EndEntry};
    use crate::{config::Config, console::Console, error::Error};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    macro_rules! month_end_cases {
        ($($y:literal - $m:literal - $d:literal => $last:literal,)*) => {
        $(
            paste::paste! {
            #[test]
            fn [<month_end_ $y _ $m _ $d>]() {
                assert_eq!(month_end(ymd($y, $m, $d)), ymd($y, $m, $last));
            }
        }
        )*
        }
    }

    month_end_cases! {
        2023-1-10 => 31,
        2023-2-1 => 28,
        2024-2-14 => 29,
        2000-2-29 => 29,
        1900-2-3 => 28,
        2023-3-5 => 31,
        2023-4-30 => 30,
        2023-12-16 => 31,
    }

    #[test]
    fn quinzaine_first_half() {
        assert_eq!(quinzaine_end(ymd(2023, 7, 1)), ymd(2023, 7, 15));
        assert_eq!(quinzaine_end(ymd(2023, 7, 15)), ymd(2023, 7, 15));
        assert_eq!(quinzaine_end(ymd(2024, 2, 5)), ymd(2024, 2, 15));
    }

    #[test]
    fn quinzaine_second_half_is_month_end() {
        assert_eq!(quinzaine_end(ymd(2023, 7, 16)), ymd(2023, 7, 31));
        assert_eq!(quinzaine_end(ymd(2024, 2, 20)), ymd(2024, 2, 29));
        assert_eq!(quinzaine_end(ymd(2023, 12, 31)), ymd(2023, 12, 31));
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new(ymd(2023, 7, 1), ymd(2023, 7, 31));
        assert!(range.contains(ymd(2023, 7, 1)));
        assert!(range.contains(ymd(2023, 7, 31)));
        assert!(!range.contains(ymd(2023, 6, 30)));
        assert!(!range.contains(ymd(2023, 8, 1)));
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(ymd(2023, 7, 31), ymd(2023, 7, 1));
        assert!(!range.contains(ymd(2023, 7, 15)));
        assert!(!range.contains(ymd(2023, 7, 1)));
        assert!(!range.contains(ymd(2023, 7, 31)));
    }

    #[test]
    fn end_entries() {
        let format = "%Y-%m-%d";
        assert_eq!(EndEntry::parse("q", format), Ok(EndEntry::Quinzaine));
        assert_eq!(EndEntry::parse("m", format), Ok(EndEntry::MonthEnd));
        assert_eq!(
            EndEntry::parse("2023-07-20", format),
            Ok(EndEntry::Date(ymd(2023, 7, 20)))
        );
        assert_eq!(
            EndEntry::parse("Q", format),
            Err(Error::InvalidEndEntry("Q".to_string()))
        );
        assert_eq!(
            EndEntry::parse("2023-02-30", format),
            Err(Error::InvalidEndEntry("2023-02-30".to_string()))
        );
    }

    fn scripted(input: &str) -> (Result<DateRange, Error>, String) {
        let mut console = Console::new(input.as_bytes(), Vec::new());
        let range = resolve(&mut console, &Config::default());
        (range, String::from_utf8(console.into_output()).unwrap())
    }

    #[test]
    fn resolve_with_shortcuts() {
        assert_eq!(
            scripted("2023-03-05\nm\n").0,
            Ok(DateRange::new(ymd(2023, 3, 5), ymd(2023, 3, 31)))
        );
        assert_eq!(
            scripted("2023-03-05\nq\n").0,
            Ok(DateRange::new(ymd(2023, 3, 5), ymd(2023, 3, 15)))
        );
        assert_eq!(
            scripted("2024-02-01\nm\n").0,
            Ok(DateRange::new(ymd(2024, 2, 1), ymd(2024, 2, 29)))
        );
    }

    #[test]
    fn resolve_reprompts_on_invalid_dates() {
        let (range, output) = scripted("yesterday\n05-07-2023\n2023-07-05\n\n2023-13-01\n2023-07-10\n");
        assert_eq!(range, Ok(DateRange::new(ymd(2023, 7, 5), ymd(2023, 7, 10))));
        assert_eq!(output.matches("Date is invalid.").count(), 4);
        assert_eq!(output.matches("Beginning date: ").count(), 3);
        assert_eq!(output.matches("Ending date: ").count(), 3);
    }

    #[test]
    fn resolve_stops_when_input_is_closed() {
        assert_eq!(scripted("nope\n").0, Err(Error::EndOfInput));
        assert_eq!(scripted("2023-07-01\n").0, Err(Error::EndOfInput));
    }
}
