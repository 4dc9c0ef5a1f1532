//! JSONL trail writer.
//!
//! Every mutation is appended to a per-actor JSONL file under the trail
//! directory (`.ocd/trail/{actor}.jsonl` by default).

pub mod writer;
