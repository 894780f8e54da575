use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use fs4::tokio::AsyncFileExt;
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use super::{
    csv::{escape_field, split_line},
    entities::{ActivityRecord, Category},
};

/// Header row of the persisted table. The column names are the wire
/// format inherited from the data files users already have on disk.
pub const TABLE_HEADER: &str = "Fecha,Inicio,Fin,Duración,Categoría,Descripción";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
}

/// Interface for abstracting storage of per-user activity records.
pub trait RecordStore {
    /// Reads every record of the user's table, most recent date first.
    /// A missing table yields an empty collection.
    fn load(&self, user: &str) -> impl Future<Output = Result<Vec<ActivityRecord>>>;

    /// Adds one validated record and rewrites the user's table. A failed
    /// write propagates to the caller; there is no partial-write recovery.
    fn append(&self, user: &str, record: ActivityRecord) -> impl Future<Output = Result<()>>;

    /// Removes the first record equal to `record` and rewrites the table,
    /// keeping the relative order of the rest. Fails with
    /// [StoreError::NotFound] when no stored record matches.
    fn delete(&self, user: &str, record: &ActivityRecord) -> impl Future<Output = Result<()>>;
}

/// The main realization of [RecordStore]. One flat comma-separated table
/// per user, rewritten in full on every mutation.
///
/// Reads and writes each take an advisory lock for their own duration,
/// but the lock is not held across a load-then-rewrite pair: two
/// processes mutating the same table race, and the last writer wins.
pub struct CsvRecordStore {
    data_dir: PathBuf,
}

impl CsvRecordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }

    /// Tables are keyed by lowercased username.
    fn table_path(&self, user: &str) -> PathBuf {
        self.data_dir
            .join(format!("actividades_{}.csv", user.to_lowercase()))
    }

    /// Reads the table in file order. Rows that fail to parse are dropped
    /// rather than failing the whole load.
    async fn read_table(path: &Path) -> Result<Vec<ActivityRecord>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<ActivityRecord>, std::io::Error> {
            debug!("Extracting {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut records = vec![];
            while let Ok(Some(line)) = lines.next_line().await {
                if line == TABLE_HEADER || line.is_empty() {
                    continue;
                }
                match parse_row(&line) {
                    Some(v) => records.push(v),
                    None => {
                        // Bad dates and hand-edited rows land here.
                        warn!("Dropping unparseable row in {path:?}: {line}")
                    }
                }
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(records)
        }

        match extract(path).await {
            Ok(s) => Ok(s),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }

    async fn write_table(path: &Path, records: &[ActivityRecord]) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;

        file.lock_exclusive()?;
        let result = Self::write_rows(&mut file, records).await;
        file.unlock_async().await?;
        result
    }

    async fn write_rows(file: &mut File, records: &[ActivityRecord]) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        buffer.extend_from_slice(TABLE_HEADER.as_bytes());
        buffer.push(b'\n');
        for record in records {
            buffer.extend_from_slice(encode_row(record).as_bytes());
            buffer.push(b'\n');
        }

        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

impl RecordStore for CsvRecordStore {
    async fn load(&self, user: &str) -> Result<Vec<ActivityRecord>> {
        let mut records = Self::read_table(&self.table_path(user)).await?;
        // Stable sort: same-day records keep their file order.
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn append(&self, user: &str, record: ActivityRecord) -> Result<()> {
        let path = self.table_path(user);
        let mut records = Self::read_table(&path).await?;
        records.push(record);
        Self::write_table(&path, &records).await
    }

    async fn delete(&self, user: &str, record: &ActivityRecord) -> Result<()> {
        let path = self.table_path(user);
        let mut records = Self::read_table(&path).await?;
        let position = records
            .iter()
            .position(|v| v == record)
            .ok_or(StoreError::NotFound)?;
        records.remove(position);
        Self::write_table(&path, &records).await
    }
}

fn encode_row(record: &ActivityRecord) -> String {
    [
        record.date.format("%Y-%m-%d").to_string(),
        record.start.format("%H:%M").to_string(),
        record.end.format("%H:%M").to_string(),
        record.duration.to_string(),
        record.category.wire_name().to_string(),
        escape_field(&record.description),
    ]
    .join(",")
}

/// Stored rows are trusted: the duration column is carried as written
/// instead of being rederived from the interval.
fn parse_row(line: &str) -> Option<ActivityRecord> {
    let fields = split_line(line);
    let [date, start, end, duration, category, description] = fields.as_slice() else {
        return None;
    };
    Some(ActivityRecord {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
        start: NaiveTime::parse_from_str(start, "%H:%M").ok()?,
        end: NaiveTime::parse_from_str(end, "%H:%M").ok()?,
        duration: duration.parse().ok()?,
        category: Category::from_wire_name(category)?,
        description: description.clone(),
    })
}
