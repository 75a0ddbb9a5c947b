//! Identifier generation by named segment.
//!
//! Each record type draws ids from its own segment (e.g. `ProductOptionImpl`). A
//! generator reserves a block of `batch_size` ids at a time and hands them out from
//! memory, so ids are unique per segment but not necessarily contiguous across
//! processes or restarts.

use crate::config::CatalogSettings;
use crate::executor::{Executor, StoreError};
use crate::mapper::ColumnReader;
use sea_query::{Value, Values};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Mutex;

/// Id generation error type
#[derive(Debug)]
pub enum IdGenerationError {
    /// Reserving a block from the store failed
    Store(StoreError),
    /// The segment cannot issue more ids
    Exhausted(String),
    /// Internal lock was poisoned by a panicking thread
    Poisoned,
}

impl fmt::Display for IdGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdGenerationError::Store(e) => write!(f, "Id reservation failed: {e}"),
            IdGenerationError::Exhausted(segment) => {
                write!(f, "Id segment {segment} is exhausted")
            }
            IdGenerationError::Poisoned => write!(f, "Id generator lock poisoned"),
        }
    }
}

impl std::error::Error for IdGenerationError {}

impl From<StoreError> for IdGenerationError {
    fn from(err: StoreError) -> Self {
        IdGenerationError::Store(err)
    }
}

/// Source of new, previously unused identifiers.
pub trait IdGenerator {
    /// Next id for `segment`. Never returns an id already issued for that segment.
    fn next_id(&self, segment: &str) -> Result<i64, IdGenerationError>;

    /// Keep `current` when the record already carries an id, else draw a new one.
    fn assign(&self, segment: &str, current: Option<i64>) -> Result<i64, IdGenerationError> {
        match current {
            Some(id) => Ok(id),
            None => self.next_id(segment),
        }
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self, segment: &str) -> Result<i64, IdGenerationError> {
        (**self).next_id(segment)
    }
}

/// Hands out ids from reserved blocks, asking `reserve` for a new block when the
/// current one runs dry.
#[derive(Debug, Default)]
struct BlockCache {
    blocks: HashMap<String, Range<i64>>,
}

impl BlockCache {
    fn next<F>(&mut self, segment: &str, reserve: F) -> Result<i64, IdGenerationError>
    where
        F: FnOnce() -> Result<Range<i64>, IdGenerationError>,
    {
        if let Some(block) = self.blocks.get_mut(segment) {
            if let Some(id) = block.next() {
                return Ok(id);
            }
        }

        let mut block = reserve()?;
        let id = block
            .next()
            .ok_or_else(|| IdGenerationError::Exhausted(segment.to_string()))?;
        log::debug!("reserved id block {}..{} for {segment}", id, block.end);
        #[cfg(feature = "metrics")]
        crate::metrics::METRICS
            .record_ids_allocated(segment, u64::try_from(block.end - id).unwrap_or(0));
        self.blocks.insert(segment.to_string(), block);
        Ok(id)
    }
}

/// In-process generator. Segments start at `start` and never repeat while the
/// generator lives.
#[derive(Debug)]
pub struct SegmentIdGenerator {
    start: i64,
    batch_size: i64,
    high_water: Mutex<(HashMap<String, i64>, BlockCache)>,
}

impl SegmentIdGenerator {
    pub fn new(batch_size: i64) -> Self {
        Self::starting_at(1, batch_size)
    }

    pub fn starting_at(start: i64, batch_size: i64) -> Self {
        Self {
            start,
            batch_size: batch_size.max(1),
            high_water: Mutex::new((HashMap::new(), BlockCache::default())),
        }
    }
}

impl Default for SegmentIdGenerator {
    fn default() -> Self {
        Self::new(50)
    }
}

impl IdGenerator for SegmentIdGenerator {
    fn next_id(&self, segment: &str) -> Result<i64, IdGenerationError> {
        let mut guard = self
            .high_water
            .lock()
            .map_err(|_| IdGenerationError::Poisoned)?;
        let (marks, cache) = &mut *guard;
        cache.next(segment, || {
            let next = marks.entry(segment.to_string()).or_insert(self.start);
            let begin = *next;
            let end = begin
                .checked_add(self.batch_size)
                .ok_or_else(|| IdGenerationError::Exhausted(segment.to_string()))?;
            *next = end;
            Ok(begin..end)
        })
    }
}

/// Table backing [`TableIdGenerator`].
pub const SEQUENCE_TABLE: &str = "SEQUENCE_GENERATOR";

/// `CREATE TABLE` for the sequence table.
pub const CREATE_SEQUENCE_TABLE_SQL: &str = r#"CREATE TABLE IF NOT EXISTS "SEQUENCE_GENERATOR" ("ID_NAME" varchar(255) NOT NULL PRIMARY KEY, "ID_VAL" bigint NOT NULL)"#;

// `ID_VAL` holds the first id not yet reserved. The upsert reserves
// [ID_VAL - batch, ID_VAL) atomically and returns the new high-water mark.
const RESERVE_SQL: &str = r#"INSERT INTO "SEQUENCE_GENERATOR" ("ID_NAME", "ID_VAL") VALUES ($1, $2) ON CONFLICT ("ID_NAME") DO UPDATE SET "ID_VAL" = "SEQUENCE_GENERATOR"."ID_VAL" + $3 RETURNING "ID_VAL""#;

/// Generator backed by a row per segment in `SEQUENCE_GENERATOR`.
///
/// Blocks are reserved with a single upsert, so several processes can share the table.
pub struct TableIdGenerator<E> {
    executor: E,
    batch_size: i64,
    cache: Mutex<BlockCache>,
}

impl<E: Executor> TableIdGenerator<E> {
    pub fn new(executor: E, batch_size: i64) -> Self {
        Self {
            executor,
            batch_size: batch_size.max(1),
            cache: Mutex::new(BlockCache::default()),
        }
    }

    /// Generator reserving `catalog.id_batch_size` ids per round trip.
    pub fn from_settings(executor: E, settings: &CatalogSettings) -> Self {
        Self::new(executor, settings.id_batch_size)
    }

    fn reserve(&self, segment: &str) -> Result<Range<i64>, IdGenerationError> {
        let first_end = 1 + self.batch_size;
        let values = Values(vec![
            Value::from(segment.to_string()),
            Value::from(first_end),
            Value::from(self.batch_size),
        ]);
        let rows = self.executor.query_all(RESERVE_SQL, &values)?;
        let end = rows
            .first()
            .map(|row| row.get_i64("ID_VAL"))
            .transpose()
            .map_err(|e| StoreError::ParseError(e.to_string()))?
            .flatten()
            .ok_or_else(|| StoreError::QueryError(format!("no ID_VAL returned for {segment}")))?;
        Ok(end - self.batch_size..end)
    }
}

impl<E: Executor> IdGenerator for TableIdGenerator<E> {
    fn next_id(&self, segment: &str) -> Result<i64, IdGenerationError> {
        let mut cache = self.cache.lock().map_err(|_| IdGenerationError::Poisoned)?;
        cache.next(segment, || self.reserve(segment))
    }
}
