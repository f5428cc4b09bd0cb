//! Protobuf wire primitives.
//!
//! Writers ([`ValueWriter`], [`ValueWriterBlob`]) produce varints, zigzag integers, field keys and
//! length-delimited fields; readers ([`ValueReader`], [`ValueReaderSlice`]) decode them again.

mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;
mod zigzag;

pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
pub use zigzag::*;
