//! Formatted output helpers for CLI commands.

use std::fmt::Write;

use packetlens_parser::PacketRecord;

/// Formats a packet record as aligned text, one line per layer.
///
/// Layer names are padded to a common column so fields line up:
///
/// ```text
/// Ethernet  src=aa:bb dst=cc:dd
/// IP        src=10.0.0.5 ttl=64
/// ```
#[must_use]
pub fn format_record(record: &PacketRecord) -> String {
    let width = record
        .layers()
        .map(|l| l.name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for layer in record.layers() {
        let _ = write!(out, "{:width$}", layer.name());
        for (key, value) in layer.fields() {
            let _ = write!(out, "  {key}={value}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PacketRecord {
        let mut record = PacketRecord::new();
        let _ = record.open_layer("Ethernet");
        let _ = record.set_field("Ethernet", "src", "aa:bb");
        let _ = record.open_layer("IP");
        let _ = record.set_field("IP", "src", "10.0.0.5");
        let _ = record.set_field("IP", "ttl", "64");
        record
    }

    #[test]
    fn format_record_lists_layers_in_order() {
        let text = format_record(&sample());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Ethernet"));
        assert!(lines[1].starts_with("IP"));
    }

    #[test]
    fn format_record_aligns_layer_names() {
        let text = format_record(&sample());
        let lines: Vec<_> = text.lines().collect();
        // "IP" is padded to the width of "Ethernet".
        assert!(lines[1].starts_with("IP        "));
        assert!(lines[1].contains("src=10.0.0.5"));
        assert!(lines[1].contains("ttl=64"));
    }

    #[test]
    fn format_record_of_empty_record_is_empty() {
        assert_eq!(format_record(&PacketRecord::new()), "");
    }
}
