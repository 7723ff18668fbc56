//! Bio tokenizer: lowercase word tokens joined by single spaces, keeping a
//! `#` or `@` that directly precedes a word.

use super::segment::{Segment, UnicodeWordSegmenter, WordSegmenter};

/// Separator bytes that are never emitted. The most recent one before a word
/// is the pending marker; only `#` and `@` survive onto the word.
const MARKER_BYTES: [u8; 6] = [b'#', b'@', b' ', b'\n', b'\t', b'\r'];

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer<S = UnicodeWordSegmenter> {
    segmenter: S,
}

impl Tokenizer<UnicodeWordSegmenter> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: WordSegmenter> Tokenizer<S> {
    #[must_use]
    pub fn with_segmenter(segmenter: S) -> Self {
        Self { segmenter }
    }

    /// Total over its input: empty or markup-only bios give an empty string.
    #[must_use]
    pub fn tokenize(&self, bio: &str) -> String {
        let mut out = String::with_capacity(bio.len());
        let mut pending: Option<u8> = None;

        for segment in self.segmenter.segment(bio) {
            if segment.text.is_empty() {
                continue;
            }
            if let Some(marker) = marker_byte(&segment) {
                pending = Some(marker);
                continue;
            }

            if !out.is_empty() {
                out.push(' ');
            }
            if let Some(marker @ (b'#' | b'@')) = pending {
                out.push(char::from(marker));
            }
            out.push_str(&segment.text.to_lowercase());
            pending = None;
        }
        out
    }

    /// Like [`Tokenizer::tokenize`], replacing invalid UTF-8 with U+FFFD first.
    #[must_use]
    pub fn tokenize_bytes(&self, bio: &[u8]) -> String {
        self.tokenize(&String::from_utf8_lossy(bio))
    }
}

/// Decided by the first character alone, whatever the span's tag: combining
/// marks that UAX #29 attaches to a space or marker go down with it.
fn marker_byte(segment: &Segment<'_>) -> Option<u8> {
    let first = segment.text.chars().next()?;
    if let Some(byte) = u8::try_from(first)
        .ok()
        .filter(|byte| MARKER_BYTES.contains(byte))
    {
        return Some(byte);
    }
    // Other whitespace (NBSP, NEL, U+2028, ideographic space) acts like a space.
    first.is_whitespace().then_some(b' ')
}

/// Tokenize with the default Unicode segmenter.
#[must_use]
pub fn tokenize(bio: &str) -> String {
    Tokenizer::new().tokenize(bio)
}

#[must_use]
pub fn tokenize_bytes(bio: &[u8]) -> String {
    Tokenizer::new().tokenize_bytes(bio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_keeps_hashtags() {
        assert_eq!(tokenize("Hello #World foo"), "hello #world foo");
    }

    #[test]
    fn later_marker_wins() {
        assert_eq!(tokenize("# @alice"), "@alice");
        assert_eq!(tokenize("#@alice"), "@alice");
        assert_eq!(tokenize("@ bob"), "bob");
    }

    #[test]
    fn dangling_marker_is_dropped() {
        assert_eq!(tokenize("love rust #"), "love rust");
        assert_eq!(tokenize("#"), "");
        assert_eq!(tokenize("@ # \n"), "");
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize(""), "");
        assert_eq!(tokenize_bytes(b""), "");
    }

    #[test]
    fn whitespace_collapses_to_single_spaces() {
        assert_eq!(tokenize("  Mom\tof\r\n two  "), "mom of two");
        assert_eq!(tokenize("a\u{a0}b\u{3000} c"), "a b c");
    }

    #[test]
    fn marks_attached_to_whitespace_are_dropped_with_it() {
        assert_eq!(tokenize("a \u{345}"), "a");
        assert_eq!(tokenize("a \u{345}b"), "a b");
        assert_eq!(tokenize("x #\u{20e3}"), "x");
        assert_eq!(tokenize("a\u{85}b\u{2028}c"), "a b c");
    }

    #[test]
    fn orphan_marks_after_line_breaks_are_dropped() {
        assert_eq!(tokenize("a\n\u{301}"), "a");
        assert_eq!(tokenize("3\r\u{301}\n"), "3");
        assert_eq!(tokenize("\u{301}\u{200d}Hi"), "hi");
        for bio in ["a \u{345}", "a\n\u{301}", "3\r\u{301}\n", "e\u{301}\n\u{20e3}!"] {
            let once = tokenize(bio);
            assert_eq!(tokenize(&once), once, "{bio:?}");
        }
    }

    #[test]
    fn marks_on_a_token_stay_on_it() {
        assert_eq!(tokenize("Cafe\u{301} !\u{301}"), "cafe\u{301} !\u{301}");
    }

    #[test]
    fn punctuation_is_emitted_as_tokens() {
        assert_eq!(tokenize("Hi, there!"), "hi , there !");
        assert_eq!(tokenize("#!"), "#!");
    }

    #[test]
    fn mentions_with_underscores_and_numbers() {
        assert_eq!(
            tokenize("Dev @Acme_Corp #100DaysOfCode"),
            "dev @acme_corp #100daysofcode"
        );
    }

    #[test]
    fn non_ascii_is_lowercased() {
        assert_eq!(tokenize("ÜBER #Straße ΑΘΗΝΑ"), "über #straße αθηνα");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(tokenize_bytes(b"ok \xff #fine"), "ok \u{fffd} #fine");
    }

    /// Fixed spans, so marker handling is tested apart from UAX #29.
    struct Scripted(Vec<(&'static str, bool)>);

    impl WordSegmenter for Scripted {
        fn segment<'a>(&self, _text: &'a str) -> Vec<Segment<'a>> {
            self.0
                .iter()
                .map(|&(text, word)| {
                    if word {
                        Segment::word(text)
                    } else {
                        Segment::separator(text)
                    }
                })
                .collect()
        }
    }

    #[test]
    fn marker_state_machine_with_scripted_spans() {
        let tokenizer = Tokenizer::with_segmenter(Scripted(vec![
            ("@", false),
            ("Bob", true),
            ("#", false),
            ("\n", false),
            ("X", true),
            ("", false),
            ("#", false),
            ("-", false),
            ("y", true),
        ]));
        assert_eq!(tokenizer.tokenize("ignored"), "@bob x #- y");
    }
}
