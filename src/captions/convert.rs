//! Line-oriented WebVTT <-> SRT conversion.
//!
//! These are textual rewrites only: cue timings are not validated and malformed
//! input yields malformed output rather than an error.

use regex::Regex;
use std::sync::LazyLock;

static WEBVTT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\x{FEFF}?WEBVTT[^\n]*\r?\n(?:[ \t]*\r?\n)?").expect("Invalid regex")
});

static VTT_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}:\d{2}:\d{2})\.(\d{3})").expect("Invalid regex"));

static SRT_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}:\d{2}:\d{2}),(\d{3})").expect("Invalid regex"));

/// Separator between start and end time on a cue timing line.
pub const CUE_TIME_SEPARATOR: &str = "-->";

/// Marker every WebVTT document starts with.
pub const WEBVTT_MARKER: &str = "WEBVTT";

/// Convert WebVTT to SRT.
///
/// Drops the header, switches the millisecond separator to a comma, numbers
/// every cue from 1 and collapses blank runs to a single blank line. A cue
/// identifier sitting at the start of a block is replaced by the number.
pub fn webvtt_to_srt(webvtt: &str) -> String {
    let without_header = WEBVTT_HEADER.replace(webvtt, "");
    let converted = VTT_TIMESTAMP.replace_all(&without_header, "${1},${2}");

    let mut result: Vec<String> = Vec::new();
    let mut sequence = 1usize;

    for line in converted.trim().lines().map(str::trim) {
        if line.contains(CUE_TIME_SEPARATOR) {
            if starts_block_with_identifier(&result) {
                result.pop();
            }
            result.push(sequence.to_string());
            sequence += 1;
            result.push(line.to_string());
        } else if !line.is_empty() {
            result.push(line.to_string());
        } else if result.last().is_some_and(|l| !l.is_empty()) {
            result.push(String::new());
        }
    }

    result.join("\n")
}

/// The last line is alone at the start of a block (a WebVTT cue identifier).
fn starts_block_with_identifier(result: &[String]) -> bool {
    match result {
        [.., before, last] => before.is_empty() && is_identifier(last),
        [last] => is_identifier(last),
        [] => false,
    }
}

fn is_identifier(line: &str) -> bool {
    !line.is_empty() && !line.contains(CUE_TIME_SEPARATOR)
}

/// Convert SRT to WebVTT.
///
/// Switches the millisecond separator to a period, drops the numeric sequence
/// lines and prepends the `WEBVTT` header.
pub fn srt_to_webvtt(srt: &str) -> String {
    let converted = SRT_TIMESTAMP.replace_all(srt, "${1}.${2}");
    let body: Vec<&str> = converted
        .split('\n')
        .filter(|line| !is_sequence_number(line))
        .collect();

    format!("{}\n\n{}", WEBVTT_MARKER, body.join("\n"))
}

/// A line holding nothing but digits.
pub fn is_sequence_number(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VTT: &str = "WEBVTT\n\n00:00:00.000 --> 00:00:02.500\nHello world.\n\n\n\n00:00:02.500 --> 00:00:05.000\nThis is a test.\nSecond line.\n";

    const SRT: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n\n2\n00:00:02,500 --> 00:00:05,000\nThis is a test.\n";

    /// Every cue-time line is directly preceded by its 1-based index.
    fn assert_numbered(srt: &str) {
        let lines: Vec<&str> = srt.lines().collect();
        let mut expected = 1;
        for (i, line) in lines.iter().enumerate() {
            if line.contains("-->") {
                assert!(i > 0, "cue line without sequence number");
                assert_eq!(lines[i - 1], expected.to_string());
                expected += 1;
            }
        }
    }

    #[test]
    fn test_webvtt_to_srt() {
        let srt = webvtt_to_srt(VTT);
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n\n2\n00:00:02,500 --> 00:00:05,000\nThis is a test.\nSecond line."
        );
        assert_numbered(&srt);
    }

    #[test]
    fn test_webvtt_with_cue_identifiers_and_crlf() {
        let vtt = "WEBVTT - autogenerated\r\n\r\nintro\r\n00:00:01.000 --> 00:00:02.000\r\nHi\r\n\r\n7\r\n00:00:03.000 --> 00:00:04.000\r\nThere\r\n";
        let srt = webvtt_to_srt(vtt);
        assert_eq!(
            srt,
            "1\n00:00:01,000 --> 00:00:02,000\nHi\n\n2\n00:00:03,000 --> 00:00:04,000\nThere"
        );
        assert_numbered(&srt);
    }

    #[test]
    fn test_malformed_input_passes_through() {
        let srt = webvtt_to_srt("just some text\nwithout cues");
        assert_eq!(srt, "just some text\nwithout cues");
    }

    #[test]
    fn test_srt_to_webvtt() {
        let vtt = srt_to_webvtt(SRT);
        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:00.000 --> 00:00:02.500"));
        assert!(!vtt.contains(",500"));
        assert!(vtt.lines().all(|l| !is_sequence_number(l)));
    }

    #[test]
    fn test_srt_trailing_number_without_newline() {
        let vtt = srt_to_webvtt("1\r\n00:00:00,000 --> 00:00:01,000\r\nHi\r\n\r\n2");
        assert!(vtt.lines().all(|l| !is_sequence_number(l)));
        assert!(vtt.contains("00:00:00.000 --> 00:00:01.000"));
    }

    #[test]
    fn test_round_trip_keeps_cues() {
        // Not byte-identical: numbering and header are added and removed.
        let back = srt_to_webvtt(&webvtt_to_srt(VTT));
        assert!(back.starts_with("WEBVTT\n\n00:00:00.000 --> 00:00:02.500\nHello world."));
        assert_numbered(&webvtt_to_srt(&back));
    }
}
