//! # packetlens-parser
//!
//! Parsing of the helper capture process's layered textual dump format.
//!
//! The format is line-oriented: blocks delimited by `###[ LayerName ]###`
//! header lines, followed by `key = value` field lines belonging to that
//! layer. Parsing is total — every line maps to a header, a field, or is
//! ignored; nothing in this crate returns an error.

pub mod dump;
pub mod line;
pub mod record;

pub use dump::DumpParser;
pub use line::{LineEvent, parse_line};
pub use record::PacketRecord;
