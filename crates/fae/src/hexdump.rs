//! Hexdump formatting.
//!
//! Classic 16-bytes-per-line layout: offset column, two groups of eight
//! byte pairs, and an ASCII gutter with `.` for non-printables.

use std::fmt::Write;

/// Bytes per output line.
const LINE_BYTES: usize = 16;

/// Render `bytes` as a hexdump.
#[must_use]
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in bytes.chunks(LINE_BYTES).enumerate() {
        let offset = line * LINE_BYTES;

        let mut groups = [String::new(), String::new()];
        for (i, half) in chunk.chunks(LINE_BYTES / 2).enumerate() {
            let mut group = String::with_capacity(23);
            for (j, byte) in half.iter().enumerate() {
                if j > 0 {
                    group.push(' ');
                }
                let _ = write!(group, "{byte:02x}");
            }
            groups[i] = group;
        }

        let ascii: String = chunk
            .iter()
            .map(|&b| {
                if (0x20..0x7F).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();

        let _ = writeln!(
            out,
            "{offset:08x}  {:<23}  {:<23}  |{ascii}|",
            groups[0], groups[1]
        );
    }
    out
}
