//! Tagged-tree parser and serializer

mod reader;
mod writer;

pub use reader::parse;
pub use writer::{serialize, WriteOptions};
