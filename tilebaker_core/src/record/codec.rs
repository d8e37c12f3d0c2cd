//! Record-separator framed JSON text sequences.
//!
//! Every record on the wire is `0x1E` + compact UTF-8 JSON + `\n`. This is the
//! framing `ogr2ogr -f GeoJSONSeq -lco RS=YES` emits and `tippecanoe` reads.
//!
//! [`RecordReader`] decodes an [`AsyncBufRead`] incrementally, one line at a time,
//! and [`RecordWriter`] encodes into an [`AsyncWrite`]. Neither ever holds more
//! than one record plus its I/O buffer.

use crate::{TileError, TileResult};
use futures::{Stream, stream};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

/// The ASCII record separator that prefixes every record.
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Default upper bound for one framed record, separator and newline included.
pub const DEFAULT_MAX_RECORD_LEN: usize = 64 * 1024 * 1024;

/// Append the framed encoding of `record` to `buf`.
///
/// `serde_json` escapes all control characters inside strings, so the payload can
/// never contain a raw newline or record separator.
pub fn encode_record(record: &Value, buf: &mut Vec<u8>) -> TileResult<()> {
	buf.push(RECORD_SEPARATOR);
	serde_json::to_writer(&mut *buf, record).map_err(|e| TileError::MalformedRecord(e.to_string()))?;
	buf.push(b'\n');
	Ok(())
}

/// Decode a single framed record. `line` must not include the trailing newline.
///
/// `index` is the 1-based position of the record in its stream and is only used
/// for error messages.
pub fn decode_record(line: &[u8], index: u64) -> TileResult<Value> {
	let parse_error = |reason: String| TileError::Parse { record: index, reason };

	let payload = match line.split_first() {
		Some((&RECORD_SEPARATOR, payload)) => payload,
		Some(_) => return Err(parse_error("missing record separator".to_string())),
		None => return Err(parse_error("empty line".to_string())),
	};

	if payload.contains(&RECORD_SEPARATOR) {
		return Err(parse_error("embedded record separator".to_string()));
	}

	serde_json::from_slice(payload).map_err(|e| parse_error(e.to_string()))
}

/// Incremental decoder over a buffered byte stream.
pub struct RecordReader<R> {
	reader: R,
	line: Vec<u8>,
	count: u64,
	max_len: usize,
}

impl<R: AsyncBufRead + Unpin> RecordReader<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			line: Vec::new(),
			count: 0,
			max_len: DEFAULT_MAX_RECORD_LEN,
		}
	}

	/// Limit the size of a single framed record, separator and newline included.
	#[must_use]
	pub fn with_max_record_len(mut self, max_len: usize) -> Self {
		self.max_len = max_len.max(2);
		self
	}

	/// Read the next record, or `None` at a clean end of stream.
	///
	/// A final line without its terminating newline is reported as truncated, a
	/// line longer than the record limit as oversized.
	pub async fn next_record(&mut self) -> TileResult<Option<Value>> {
		self.line.clear();
		let limit = self.max_len as u64;
		let read = (&mut self.reader).take(limit).read_until(b'\n', &mut self.line).await?;
		if read == 0 {
			return Ok(None);
		}
		self.count += 1;

		if self.line.last() != Some(&b'\n') {
			let reason = if read as u64 >= limit {
				format!("record exceeds {} bytes", self.max_len)
			} else {
				"truncated record at end of stream".to_string()
			};
			return Err(TileError::Parse {
				record: self.count,
				reason,
			});
		}
		self.line.pop();

		decode_record(&self.line, self.count).map(Some)
	}

	/// Number of records read so far, including a failed one.
	pub fn records_read(&self) -> u64 {
		self.count
	}

	/// Turn the reader into a stream of records that ends at end of input.
	pub fn into_stream(self) -> impl Stream<Item = TileResult<Value>> {
		stream::try_unfold(self, |mut reader| async move {
			let record = reader.next_record().await?;
			Ok::<_, TileError>(record.map(|record| (record, reader)))
		})
	}
}

/// Buffered encoder over a byte sink.
///
/// Writes suspend while the sink is not ready, so a slow consumer throttles the
/// producer instead of growing memory.
pub struct RecordWriter<W: AsyncWrite> {
	writer: BufWriter<W>,
	scratch: Vec<u8>,
	count: u64,
}

impl<W: AsyncWrite + Unpin> RecordWriter<W> {
	pub fn new(writer: W) -> Self {
		Self::with_capacity(64 * 1024, writer)
	}

	pub fn with_capacity(capacity: usize, writer: W) -> Self {
		Self {
			writer: BufWriter::with_capacity(capacity, writer),
			scratch: Vec::new(),
			count: 0,
		}
	}

	pub async fn write_record(&mut self, record: &Value) -> TileResult<()> {
		self.scratch.clear();
		encode_record(record, &mut self.scratch)?;
		self.writer.write_all(&self.scratch).await?;
		self.count += 1;
		Ok(())
	}

	/// Number of records written so far.
	pub fn records_written(&self) -> u64 {
		self.count
	}

	/// Flush and shut down the sink, signalling end of data.
	pub async fn finish(mut self) -> TileResult<u64> {
		self.writer.flush().await?;
		self.writer.shutdown().await?;
		Ok(self.count)
	}

	/// Give back the underlying sink without shutting it down. Unflushed data is lost.
	pub fn into_inner(self) -> W {
		self.writer.into_inner()
	}
}
