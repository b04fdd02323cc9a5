//! Classification of single dump lines.
//!
//! Pure functions only: no state, no I/O. The accumulator in
//! [`crate::dump`] decides what each event means for the in-progress
//! record.

use packetlens_common::constants::{LAYER_DECORATION, LAYER_MARKER};

/// Outcome of classifying one line of helper dump output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A layer header; carries the decoded layer name.
    LayerHeader(String),
    /// A field assignment belonging to the current layer.
    Field {
        /// Field name, whitespace-trimmed.
        key: String,
        /// Field value, whitespace-trimmed. May itself contain `=`.
        value: String,
    },
    /// Empty line or a line matching neither pattern.
    Ignore,
}

/// Classifies one line of dump output.
///
/// A line containing the `###` marker is a layer header; the name is the
/// line with all `#`, `[`, `]` characters removed and trimmed. Otherwise a
/// line containing `=` is a field assignment, split on the first `=` only.
/// Everything else is ignored, keeping the parser total over its input.
#[must_use]
pub fn parse_line(line: &str) -> LineEvent {
    let line = line.trim();
    if line.is_empty() {
        return LineEvent::Ignore;
    }

    if line.contains(LAYER_MARKER) {
        let name: String = line.chars().filter(|c| !LAYER_DECORATION.contains(c)).collect();
        return LineEvent::LayerHeader(name.trim().to_string());
    }

    if let Some((key, value)) = line.split_once('=') {
        return LineEvent::Field {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        };
    }

    LineEvent::Ignore
}
