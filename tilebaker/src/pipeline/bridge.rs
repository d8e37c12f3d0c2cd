//! Pipelined forwarding from the extractor's stdout to the packager's stdin.
//!
//! One record is decoded, transformed and written before the next one is read.
//! Memory therefore stays at one record plus the reader and writer buffers, and
//! a packager that stops reading suspends the loop, which in turn stops reading
//! from the extractor.

use std::sync::Arc;
use tilebaker_core::{RecordReader, RecordTransformer, RecordWriter, TileResult};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

const READ_BUFFER: usize = 64 * 1024;
const WRITE_BUFFER: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct StreamingBridge {
	transformer: Arc<RecordTransformer>,
}

impl StreamingBridge {
	pub fn new(transformer: Arc<RecordTransformer>) -> Self {
		Self { transformer }
	}

	/// Forward every record from `input` to `output`, returning the record count.
	///
	/// On success the output is flushed and shut down. On the first parse,
	/// transform or write error the loop stops and returns without flushing or
	/// shutting down the output. Dropping a pipe still reads as end of input on
	/// the other side, so callers holding a consumer process stop it before they
	/// release the output.
	pub async fn run<R, W>(&self, input: R, output: W) -> TileResult<u64>
	where
		R: AsyncRead + Unpin,
		W: AsyncWrite + Unpin,
	{
		let mut reader = RecordReader::new(BufReader::with_capacity(READ_BUFFER, input));
		let mut writer = RecordWriter::with_capacity(WRITE_BUFFER, output);

		while let Some(record) = reader.next_record().await? {
			let record = self.transformer.transform(record)?;
			writer.write_record(&record).await?;
		}

		writer.finish().await
	}
}
