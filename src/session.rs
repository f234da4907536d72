use std::io::{BufRead, Write};

use itertools::Itertools;
use log::info;

use crate::{
    config::Config,
    console::Console,
    error::Error,
    ledger::Ledger,
    period,
    tally::{tally, FeeReport},
};

/// Process date ranges over an already loaded ledger until the user is done.
/// Returns one report per range processed.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    ledger: &Ledger,
    config: &Config,
) -> Result<Vec<FeeReport>, Error> {
    info!("fee keywords: {}", config.keywords.iter().join(", "));
    let mut reports = Vec::new();

    loop {
        let range = period::resolve(console, config)?;
        console.say(format_args!(
            "Processing transactions from {} to {}",
            range.start.format("%d %b %Y"),
            range.end.format("%d %b %Y")
        ))?;

        let report = tally(ledger, &range, config, console.output())?;
        console.say(&report)?;
        reports.push(report);

        match console.ask("\nProcess another date range over the same file? (y/n) ") {
            Ok(answer) if answer.eq_ignore_ascii_case("y") => continue,
            Ok(_) | Err(Error::EndOfInput) => return Ok(reports),
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::run;
    use crate::{
        config::{ColumnNames, Config},
        console::Console,
        error::Error,
        ledger::Ledger,
    };

    const STATEMENT: &str = "Date Trx,Description,Debit
01-Jul-23,ACH Payment,100.00
05-Jul-23,commis. virement,-5.50
16-Jul-23,frais timbre,-2.00
";

    fn ledger() -> Ledger {
        Ledger::from_reader(STATEMENT.as_bytes(), &ColumnNames::default()).unwrap()
    }

    #[test]
    fn two_ranges_over_the_same_file() {
        let mut console = Console::new("2023-07-01\nq\ny\n2023-07-16\nm\nn\n".as_bytes(), Vec::new());
        let reports = run(&mut console, &ledger(), &Config::default()).unwrap();
        assert_eq!(
            reports.iter().map(|r| r.total).collect::<Vec<_>>(),
            vec![dec!(-5.50), dec!(-2.00)]
        );

        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Processing transactions from 01 Jul 2023 to 15 Jul 2023"));
        assert!(output.contains("Processing transactions from 16 Jul 2023 to 31 Jul 2023"));
        assert!(output.contains("TOTAL: -5.50"));
        assert!(output.contains("TOTAL: -2.00"));
        assert!(output.contains("\rProcessing line 3…\rProcessed 3 lines\n"));
    }

    #[test]
    fn verbose_progress_lists_amounts() {
        let config = Config {
            verbose: true,
            ..Config::default()
        };
        let mut console = Console::new("2023-07-01\nm\n".as_bytes(), Vec::new());
        run(&mut console, &ledger(), &config).unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("\nProcessing line 1… \nProcessing line 2… -5.50"));
        assert!(output.contains("\nProcessing line 3… -2.00\n"));
        assert!(output.contains("TOTAL: -7.50"));
    }

    #[test]
    fn malformed_row_ends_the_session() {
        let ledger = Ledger::from_reader(
            "Date Trx,Description,Debit\n01/07/2023,frais,-1.00\n".as_bytes(),
            &ColumnNames::default(),
        )
        .unwrap();
        let mut console = Console::new("2023-07-01\nm\ny\n".as_bytes(), Vec::new());
        assert_eq!(
            run(&mut console, &ledger, &Config::default()),
            Err(Error::InvalidRowDate {
                row: 1,
                value: "01/07/2023".to_string()
            })
        );
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(!output.contains("TOTAL"));
    }
}
