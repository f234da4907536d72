use std::path::PathBuf;

use clap::Parser;
use feetally::{config::Config, console::Console, error::Error, ledger::Ledger, session};
use log::error;

const BANNER: &str = r#"
  __             _        _ _
 / _| ___  ___  | |_ __ _| | |_   _
| |_ / _ \/ _ \ | __/ _` | | | | | |
|  _|  __/  __/ | || (_| | | | |_| |
|_|  \___|\___|  \__\__,_|_|_|\__, |
                              |___/
"#;

/// Sum the bank fees of a CSV statement over a date range.
/// Meant for drag-and-drop: drop the exported .csv file onto the executable.
#[derive(Parser)]
struct Cli {
    /// Statement exported from the bank
    files: Vec<PathBuf>,
    /// JSON file overriding column names, date formats or keywords
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Fee keyword, may be repeated; replaces the configured list
    #[clap(long = "keyword", value_name = "WORD")]
    keywords: Vec<String>,
    #[clap(long, value_name = "HEADER")]
    date_column: Option<String>,
    #[clap(long, value_name = "HEADER")]
    description_column: Option<String>,
    #[clap(long, value_name = "HEADER")]
    amount_column: Option<String>,
    /// Print every fee line found
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if !self.keywords.is_empty() {
            config.keywords = self.keywords.clone();
        }
        if let Some(name) = &self.date_column {
            config.columns.date = name.clone();
        }
        if let Some(name) = &self.description_column {
            config.columns.description = name.clone();
        }
        if let Some(name) = &self.amount_column {
            config.columns.amount = name.clone();
        }
        config.verbose |= self.verbose;
        Ok(config)
    }

    fn file(&self) -> Result<&PathBuf, Error> {
        match &self.files[..] {
            [file] => Ok(file),
            [] => Err(Error::Usage(
                "This program is designed for drag-and-drop. \
                 Please drag the .csv file onto the program."
                    .to_string(),
            )),
            _ => Err(Error::Usage(
                "This program can only handle one file at a time.".to_string(),
            )),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut console = Console::stdio();
    console.say(BANNER)?;

    let outcome = cli.file().and_then(|path| {
        let config = cli.config()?;
        let ledger = Ledger::from_path(path, &config.columns)?;
        session::run(&mut console, &ledger, &config)
    });

    match outcome {
        Ok(_) => Ok(()),
        Err(error) => {
            match &error {
                Error::Usage(guidance) => console.say(guidance)?,
                _ => error!("{}", error),
            }
            console.pause("Press ENTER to exit")?;
            std::process::exit(1)
        }
    }
}
