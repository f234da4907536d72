use std::path::Path;

use csv::StringRecord;
use log::{debug, warn};

use crate::{config::ColumnNames, error::Error};

/// Positions of the columns of interest, resolved by header text.
/// `None` means the header was not found.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<usize>,
    names: ColumnNames,
}

impl Columns {
    pub fn resolve(header: &StringRecord, names: &ColumnNames) -> Self {
        let position = |seek: &str| header.iter().position(|field| field == seek);
        Columns {
            date: position(names.date.as_str()),
            description: position(names.description.as_str()),
            amount: position(names.amount.as_str()),
            names: names.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.description.is_some() && self.amount.is_some()
    }

    pub fn date<'r>(&self, record: &'r StringRecord, row: usize) -> Result<&'r str, Error> {
        field(record, self.date, &self.names.date, row)
    }

    pub fn description<'r>(&self, record: &'r StringRecord, row: usize) -> Result<&'r str, Error> {
        field(record, self.description, &self.names.description, row)
    }

    pub fn amount<'r>(&self, record: &'r StringRecord, row: usize) -> Result<&'r str, Error> {
        field(record, self.amount, &self.names.amount, row)
    }
}

fn field<'r>(
    record: &'r StringRecord,
    index: Option<usize>,
    column: &str,
    row: usize,
) -> Result<&'r str, Error> {
    index
        .and_then(|i| record.get(i))
        .ok_or_else(|| Error::MissingColumn {
            row,
            column: column.to_string(),
        })
}

/// A bank export held in memory: the header is only used to resolve
/// [`Columns`], the rows are kept in file order.
#[derive(Debug)]
pub struct Ledger {
    pub columns: Columns,
    rows: Vec<StringRecord>,
}

impl Ledger {
    pub fn from_path(path: impl AsRef<Path>, names: &ColumnNames) -> Result<Self, Error> {
        let path = path.as_ref();
        let rdr = reader_builder().from_path(path).map_err(|e| Error::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let ledger = Self::from_csv(rdr, names)?;
        debug!("loaded {} rows from {}", ledger.len(), path.display());
        Ok(ledger)
    }

    pub fn from_reader(rdr: impl std::io::Read, names: &ColumnNames) -> Result<Self, Error> {
        Self::from_csv(reader_builder().from_reader(rdr), names)
    }

    fn from_csv<R: std::io::Read>(
        mut rdr: csv::Reader<R>,
        names: &ColumnNames,
    ) -> Result<Self, Error> {
        let header = rdr
            .headers()
            .map_err(|e| Error::MalformedInput(e.to_string()))?
            .clone();
        if header.is_empty() {
            warn!("file appears to be empty");
        }

        let columns = Columns::resolve(&header, names);
        if !columns.is_complete() {
            warn!(
                "header is missing some of the expected columns: {:?}",
                columns
            );
        }

        let rows = rdr
            .into_records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::MalformedInput(e.to_string()))?;

        Ok(Ledger { columns, rows })
    }

    /// Data rows numbered from 1, header excluded.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.rows.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Field count is not checked against the header.
    builder.flexible(true).has_headers(true);
    builder
}
