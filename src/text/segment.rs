//! Word-boundary segmentation behind a small trait so the tokenizer's marker
//! handling can be exercised without the Unicode rules.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Word,
    Separator,
}

/// A contiguous span of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub kind: SegmentKind,
}

impl<'a> Segment<'a> {
    #[must_use]
    pub fn word(text: &'a str) -> Self {
        Self {
            text,
            kind: SegmentKind::Word,
        }
    }

    #[must_use]
    pub fn separator(text: &'a str) -> Self {
        Self {
            text,
            kind: SegmentKind::Separator,
        }
    }

    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind == SegmentKind::Word
    }
}

/// Splits text into ordered spans, in input order.
pub trait WordSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<Segment<'a>>;
}

/// UAX #29 word boundaries. A span is a word when it holds any alphanumeric
/// character; punctuation, symbols and whitespace runs are separators.
///
/// Extend, Format and ZWJ characters at the start of the text or after a line
/// break have nothing to attach to and are dropped, so the spans cover the
/// input except for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordSegmenter;

impl WordSegmenter for UnicodeWordSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        text.split_word_bounds()
            .filter_map(|span| {
                let span = span.trim_start_matches(attaches_to_previous);
                if span.is_empty() {
                    None
                } else if span.chars().any(char::is_alphanumeric) {
                    Some(Segment::word(span))
                } else {
                    Some(Segment::separator(span))
                }
            })
            .collect()
    }
}

/// True for characters UAX #29 glues onto whatever precedes them (WB4).
fn attaches_to_previous(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    // After a lone `!` such a character cannot start a new span.
    let mut buf = [0u8; 8];
    buf[0] = b'!';
    let len = 1 + c.encode_utf8(&mut buf[1..]).len();
    std::str::from_utf8(&buf[..len])
        .is_ok_and(|pair| pair.split_word_bounds().nth(1).is_none())
}
