use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::error::Error;

/// Header names used to locate the three columns of interest.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub description: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            date: "Date Trx".to_string(),
            description: "Description".to_string(),
            amount: "Debit".to_string(),
        }
    }
}

/// Everything that may change between bank exports.
///
/// Date formats follow `chrono::format::strftime`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnNames,
    /// Format of the dates found in the file, e.g. `05-Jul-23`
    pub row_date_format: String,
    /// Format of the dates typed at the prompt, ISO by default
    pub entry_date_format: String,
    /// Case-sensitive substrings marking a transaction as a fee.
    /// Longer words reduce ambiguity.
    pub keywords: Vec<String>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            columns: ColumnNames::default(),
            row_date_format: "%d-%b-%y".to_string(),
            entry_date_format: "%Y-%m-%d".to_string(),
            keywords: ["commis.", "frais", "taxes", "timbre", "commissions"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_json_reader(rdr: impl std::io::Read) -> Result<Self, Error> {
        serde_json::from_reader(rdr).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// A description is a fee if it contains any keyword, case included.
    pub fn is_fee(&self, description: &str) -> bool {
        self.keywords.iter().any(|k| description.contains(k.as_str()))
    }
}
