//! Submissions: encoding answer state and decoding stored answers into
//! response rows.

pub mod codec;
pub mod model;
pub mod table;
