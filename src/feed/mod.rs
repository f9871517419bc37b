//! Feed pagination
//!
//! Wire types shared by both producer variants, the batch page writer, and
//! the consumer that walks either chain.

mod reader;
mod types;
mod writer;

pub use reader::*;
pub use types::*;
pub use writer::*;
