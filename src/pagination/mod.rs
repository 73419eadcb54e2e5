//! Pagination Module
//!
//! Offset/limit, page/size, and cursor pagination over an ordered
//! collection, plus the opaque cursor codec.

mod cursor;
mod engine;


// Re-export public types
pub use cursor::{decode_cursor, encode_cursor, Cursor};
pub use engine::{
    paginate, Link, ListParams, Page, PageInfo, PageLinks, PageRequest, Sequenced, DEFAULT_LIMIT,
    MAX_LIMIT,
};
