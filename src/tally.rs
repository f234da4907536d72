use std::{fmt, io::Write, str::FromStr};

use chrono::NaiveDate;
use log::trace;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    config::Config, console::console_error, error::Error, ledger::Ledger, period::DateRange,
};

/// A row counted as a fee.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeLine {
    pub row: usize,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Default, PartialEq)]
pub struct FeeReport {
    pub total: Decimal,
    /// Data rows processed, in or out of range
    pub rows: usize,
    pub fees: Vec<FeeLine>,
}

impl fmt::Display for FeeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed {} lines", self.rows)?;
        writeln!(f, "=============================")?;
        write!(f, "TOTAL: {}", cents(self.total))
    }
}

/// Two decimals, half-way cases rounded away from zero.
/// `{:.2}` alone truncates a `Decimal`.
pub fn cents(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Sum the amounts of fee rows dated within `range`.
///
/// Every row date must parse, even out of range: a bad row usually means the
/// export format changed, so the whole run is rejected rather than giving a
/// wrong total.
///
/// Progress goes to `progress`: a counter rewritten in place, or one line per
/// row with the fee amount when `config.verbose` is set.
pub fn tally(
    ledger: &Ledger,
    range: &DateRange,
    config: &Config,
    progress: &mut impl Write,
) -> Result<FeeReport, Error> {
    let columns = &ledger.columns;
    let mut report = FeeReport::default();

    for (row, record) in ledger.rows() {
        report.rows = row;
        trace!("processing line {}", row);
        let written = if config.verbose {
            write!(progress, "\nProcessing line {}… ", row)
        } else {
            write!(progress, "\rProcessing line {}…", row)
        };
        written.map_err(console_error)?;

        let raw_date = columns.date(record, row)?;
        let date = NaiveDate::parse_from_str(raw_date, &config.row_date_format).map_err(|_| {
            Error::InvalidRowDate {
                row,
                value: raw_date.to_string(),
            }
        })?;
        if !range.contains(date) {
            continue;
        }

        let description = columns.description(record, row)?;
        if !config.is_fee(description) {
            continue;
        }

        let raw_amount = columns.amount(record, row)?;
        let amount = parse_amount(raw_amount).ok_or_else(|| Error::InvalidRowAmount {
            row,
            value: raw_amount.to_string(),
        })?;
        if config.verbose {
            write!(progress, "{}", cents(amount)).map_err(console_error)?;
        }

        report.total = report
            .total
            .checked_add(amount)
            .ok_or(Error::TotalOverflow { row })?;
        report.fees.push(FeeLine {
            row,
            date,
            description: description.to_string(),
            amount,
        });
    }

    let done = if config.verbose { "\n" } else { "\r" };
    write!(progress, "{}", done).map_err(console_error)?;
    progress.flush().map_err(console_error)?;

    Ok(report)
}

/// Plain decimals, or scientific notation within `Decimal`'s range
/// (about ±7.9e28). Anything larger is not a valid amount.
fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
