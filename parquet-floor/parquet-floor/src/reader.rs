//! Parquet reader yielding record trees.

use std::{collections::VecDeque, mem};

use parquet::{
    arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder},
    file::reader::ChunkReader,
};
use parquet_floor_arrow::record_batch_to_records;
use parquet_floor_core::{Group, SchemaNode};

use crate::FloorError;

/// Reads a Parquet file back into records shaped by a [`SchemaNode`].
///
/// Columns are decoded one `RecordBatch` at a time; the iterator stops after
/// the first error.
pub struct FloorReader<R: ChunkReader + 'static> {
    schema: SchemaNode,
    state: ReaderState<R>,
    pending: VecDeque<Group>,
    batch_size: usize,
    num_records: i64,
}

enum ReaderState<R: ChunkReader + 'static> {
    Configuring(Box<ParquetRecordBatchReaderBuilder<R>>),
    Reading(ParquetRecordBatchReader),
    Done,
}

impl<R: ChunkReader + 'static> FloorReader<R> {
    /// Open `reader` (a `File`, `bytes::Bytes`, ...) and read the footer.
    pub fn try_new(reader: R, schema: SchemaNode) -> Result<Self, FloorError> {
        schema.validate()?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let num_records = builder.metadata().file_metadata().num_rows();
        Ok(Self {
            schema,
            state: ReaderState::Configuring(Box::new(builder)),
            pending: VecDeque::new(),
            batch_size: 1024,
            num_records,
        })
    }

    /// Set the number of rows decoded per RecordBatch (default: 1024).
    ///
    /// Has no effect once iteration has started.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Total number of records in the file, from the footer.
    pub fn num_records(&self) -> i64 {
        self.num_records
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }
}

impl<R: ChunkReader + 'static> Iterator for FloorReader<R> {
    type Item = Result<Group, FloorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }

            match mem::replace(&mut self.state, ReaderState::Done) {
                ReaderState::Configuring(builder) => {
                    match builder.with_batch_size(self.batch_size).build() {
                        Ok(batches) => self.state = ReaderState::Reading(batches),
                        Err(e) => return Some(Err(e.into())),
                    }
                }
                ReaderState::Reading(mut batches) => {
                    let batch = match batches.next()? {
                        Ok(batch) => batch,
                        Err(e) => return Some(Err(e.into())),
                    };
                    tracing::debug!(rows = batch.num_rows(), "read record batch");
                    match record_batch_to_records(&self.schema, &batch) {
                        Ok(records) => self.pending.extend(records),
                        Err(e) => return Some(Err(e.into())),
                    }
                    self.state = ReaderState::Reading(batches);
                }
                ReaderState::Done => return None,
            }
        }
    }
}
