//! Stateful accumulation of dump chunks into packet records.

use packetlens_common::constants::DEFAULT_LAYER;

use crate::line::{LineEvent, parse_line};
use crate::record::PacketRecord;

/// Accumulates raw stdout chunks from the helper process into
/// [`PacketRecord`]s.
///
/// Chunks may split in the middle of a line; the trailing partial line is
/// buffered and re-assembled when the next chunk arrives. Each parser
/// instance is owned by exactly one capture session, so concurrent sessions
/// cannot interfere with each other's layer state.
///
/// The dump protocol has no explicit end-of-packet delimiter; the caller
/// decides when a packet is complete (one stdout delivery per packet) and
/// calls [`DumpParser::take_record`].
#[derive(Debug)]
pub struct DumpParser {
    tail: String,
    current_layer: String,
    record: PacketRecord,
}

impl DumpParser {
    /// Creates a fresh parser with the default layer and an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tail: String::new(),
            current_layer: DEFAULT_LAYER.to_string(),
            record: PacketRecord::new(),
        }
    }

    /// Feeds one raw chunk of helper stdout into the accumulator.
    ///
    /// Complete lines are applied immediately; an unterminated final line is
    /// kept until the next chunk (or [`DumpParser::finish`]) completes it.
    /// Invalid UTF-8 is replaced rather than rejected — the protocol is
    /// best-effort by design.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.tail.push_str(&String::from_utf8_lossy(chunk));

        while let Some(pos) = self.tail.find('\n') {
            let line: String = self.tail.drain(..=pos).collect();
            self.apply(&line);
        }
    }

    /// Emits the accumulated record and resets the accumulator.
    ///
    /// Returns `None` when no layer has been opened yet (a record with zero
    /// layers is invalid and must not be emitted); the buffered partial line
    /// is retained across the reset.
    pub fn take_record(&mut self) -> Option<PacketRecord> {
        if self.record.is_empty() {
            return None;
        }
        self.current_layer = DEFAULT_LAYER.to_string();
        Some(std::mem::take(&mut self.record))
    }

    /// Flushes a buffered unterminated line and emits any final record.
    ///
    /// Called once at stream end; the helper normally terminates its output
    /// with a newline, in which case this only drains the accumulator.
    pub fn finish(&mut self) -> Option<PacketRecord> {
        if !self.tail.is_empty() {
            let line = std::mem::take(&mut self.tail);
            self.apply(&line);
        }
        self.take_record()
    }

    fn apply(&mut self, line: &str) {
        match parse_line(line) {
            LineEvent::LayerHeader(name) => {
                let _ = self.record.open_layer(&name);
                self.current_layer = name;
            }
            LineEvent::Field { key, value } => {
                // Fields before any header have no layer to attach to.
                if !self.record.set_field(&self.current_layer, &key, &value) {
                    tracing::trace!(key, "dropped orphan field");
                }
            }
            LineEvent::Ignore => {}
        }
    }
}

impl Default for DumpParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "###[ Ethernet ]###\n  src= aa:bb:cc:dd:ee:ff\n  dst = 11:22:33:44:55:66\n###[ IP ]###\n  src=10.0.0.5\n  dst=10.0.0.9\n  ttl=64\n";

    fn parse_whole(input: &str) -> PacketRecord {
        let mut parser = DumpParser::new();
        parser.feed(input.as_bytes());
        parser.take_record().expect("record")
    }

    #[test]
    fn worked_example_produces_expected_record() {
        let record = parse_whole(DUMP);

        let eth = record.layer("Ethernet").expect("Ethernet layer");
        assert_eq!(eth.field("src"), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(eth.field("dst"), Some("11:22:33:44:55:66"));

        let ip = record.layer("IP").expect("IP layer");
        assert_eq!(ip.field("src"), Some("10.0.0.5"));
        assert_eq!(ip.field("dst"), Some("10.0.0.9"));
        assert_eq!(ip.field("ttl"), Some("64"));

        let json = serde_json::to_value(&record).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "Ethernet": {"src": "aa:bb:cc:dd:ee:ff", "dst": "11:22:33:44:55:66"},
                "IP": {"src": "10.0.0.5", "dst": "10.0.0.9", "ttl": "64"},
            })
        );
    }

    #[test]
    fn same_chunk_twice_yields_identical_records() {
        let mut parser = DumpParser::new();
        parser.feed(DUMP.as_bytes());
        let first = parser.take_record().expect("first");
        parser.feed(DUMP.as_bytes());
        let second = parser.take_record().expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn splitting_at_any_byte_offset_matches_whole_delivery() {
        let whole = parse_whole(DUMP);
        let bytes = DUMP.as_bytes();

        for offset in 0..bytes.len() {
            let mut parser = DumpParser::new();
            parser.feed(&bytes[..offset]);
            parser.feed(&bytes[offset..]);
            let split = parser.take_record().expect("record");
            assert_eq!(split, whole, "split at byte {offset}");
        }
    }

    #[test]
    fn take_record_resets_layer_to_default() {
        let mut parser = DumpParser::new();
        parser.feed(b"###[ IP ]###\nttl=64\n");
        let _ = parser.take_record().expect("record");

        // Fields after the reset have no opened layer again.
        parser.feed(b"ttl=63\n");
        assert!(parser.take_record().is_none());
    }

    #[test]
    fn empty_chunk_emits_nothing() {
        let mut parser = DumpParser::new();
        parser.feed(b"");
        assert!(parser.take_record().is_none());
    }

    #[test]
    fn fields_before_any_header_are_dropped() {
        let mut parser = DumpParser::new();
        parser.feed(b"src=aa:bb\n###[ IP ]###\nttl=64\n");
        let record = parser.take_record().expect("record");
        assert_eq!(record.len(), 1);
        assert!(record.layer("Eth").is_none());
        assert_eq!(record.layer("IP").expect("IP").field("ttl"), Some("64"));
    }

    #[test]
    fn malformed_lines_do_not_stall_parsing() {
        let mut parser = DumpParser::new();
        parser.feed(b"###[ IP ]###\ngarbage line\nttl=64\n");
        let record = parser.take_record().expect("record");
        assert_eq!(record.layer("IP").expect("IP").field("ttl"), Some("64"));
    }

    #[test]
    fn finish_flushes_unterminated_final_line() {
        let mut parser = DumpParser::new();
        parser.feed(b"###[ IP ]###\nttl=64");
        // The last line has no newline yet; take_record would miss it.
        let record = parser.finish().expect("record");
        assert_eq!(record.layer("IP").expect("IP").field("ttl"), Some("64"));
    }

    #[test]
    fn finish_on_empty_parser_emits_nothing() {
        let mut parser = DumpParser::new();
        assert!(parser.finish().is_none());
    }
}
