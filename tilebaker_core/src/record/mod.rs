mod codec;
mod transform;

pub use codec::{DEFAULT_MAX_RECORD_LEN, RECORD_SEPARATOR, RecordReader, RecordWriter, decode_record, encode_record};
pub use transform::{DEFAULT_STRIP_PROPERTIES, DEFAULT_TILING_KEY, DEFAULT_ZOOM_ATTRIBUTE, RecordTransformer};
