//! Buffered Parquet writer fed with marshalled records.

use std::{io::Write, marker::PhantomData, slice, sync::Arc};

use arrow::{compute::concat_batches, datatypes::SchemaRef, record_batch::RecordBatch};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};
use parquet_floor_arrow::{records_to_record_batch, schema_to_arrow};
use parquet_floor_core::{Group, MarshalRecord, SchemaNode, marshal_to_group};
use parquet_floor_native::{NativeRecord, Reflect};

use crate::{FloorError, marshal_par};

/// Writes records to a Parquet file shaped by a [`SchemaNode`].
///
/// Each record is marshalled into its own [`Group`] and converted to a
/// one-row `RecordBatch` before it is buffered, so a record the columns
/// cannot hold is rejected by the call that wrote it. Buffered rows are
/// handed to `parquet`'s `ArrowWriter` one `RecordBatch` at a time.
pub struct FloorWriter<W: Write + Send> {
    schema: SchemaNode,
    arrow_schema: SchemaRef,
    inner: ArrowWriter<W>,
    buffer: Vec<RecordBatch>,
    batch_size: usize,
}

/// Builder for configuring [`FloorWriter`].
pub struct FloorWriterBuilder<W> {
    schema: SchemaNode,
    batch_size: usize,
    properties: Option<WriterProperties>,
    _writer: PhantomData<fn() -> W>,
}

impl<W: Write + Send> FloorWriter<W> {
    /// Create a builder for a writer using `schema`.
    pub fn builder(schema: SchemaNode) -> FloorWriterBuilder<W> {
        FloorWriterBuilder {
            schema,
            batch_size: 1024,
            properties: None,
            _writer: PhantomData,
        }
    }

    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    /// Marshal a native value and buffer it.
    pub fn write<T: Reflect + ?Sized>(&mut self, value: &T) -> Result<(), FloorError> {
        self.write_record(&NativeRecord(value))
    }

    /// Marshal any [`MarshalRecord`] source and buffer it.
    ///
    /// A record that fails to marshal or convert is not buffered.
    pub fn write_record(&mut self, record: &dyn MarshalRecord) -> Result<(), FloorError> {
        let group = marshal_to_group(record, &self.schema)?;
        self.push(group)
    }

    /// Marshal `values` in parallel and buffer them in order.
    ///
    /// Every value that marshals and converts is buffered; the first
    /// failure, if any, is returned afterwards.
    pub fn write_all<T: Reflect + Sync>(&mut self, values: &[T]) -> Result<(), FloorError> {
        let mut first_error = None;
        for result in marshal_par(values, &self.schema) {
            let pushed = match result {
                Ok(group) => self.push(group),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = pushed {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write buffered records and close the current row group.
    pub fn flush(&mut self) -> Result<(), FloorError> {
        self.write_buffered()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Write buffered records and the file footer.
    pub fn close(mut self) -> Result<(), FloorError> {
        self.write_buffered()?;
        self.inner.close()?;
        Ok(())
    }

    /// Write buffered records and the file footer, then return the
    /// underlying writer.
    pub fn into_inner(mut self) -> Result<W, FloorError> {
        self.write_buffered()?;
        Ok(self.inner.into_inner()?)
    }

    fn push(&mut self, group: Group) -> Result<(), FloorError> {
        let row = records_to_record_batch(&self.schema, slice::from_ref(&group))?;
        self.buffer.push(row);
        if self.buffer.len() >= self.batch_size {
            self.write_buffered()?;
        }
        Ok(())
    }

    fn write_buffered(&mut self) -> Result<(), FloorError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        // The buffer is drained even when the write fails.
        let rows = std::mem::take(&mut self.buffer);
        let batch = concat_batches(&self.arrow_schema, &rows)?;
        self.inner.write(&batch)?;
        tracing::debug!(rows = batch.num_rows(), "wrote record batch");
        Ok(())
    }
}

impl<W: Write + Send> FloorWriterBuilder<W> {
    /// Set the number of records per RecordBatch (default: 1024).
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the Parquet writer properties (compression, row group size, ...).
    pub fn with_writer_properties(mut self, properties: WriterProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Validate the schema and build a writer over `writer`.
    pub fn build(self, writer: W) -> Result<FloorWriter<W>, FloorError> {
        self.schema.validate()?;
        let arrow_schema = Arc::new(schema_to_arrow(&self.schema)?);
        let inner = ArrowWriter::try_new(writer, arrow_schema.clone(), self.properties)?;
        Ok(FloorWriter {
            schema: self.schema,
            arrow_schema,
            inner,
            buffer: Vec::with_capacity(self.batch_size),
            batch_size: self.batch_size,
        })
    }
}
