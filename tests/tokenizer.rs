//! Randomized checks of the bio tokenizer over marker-heavy input.

use tweep_followers::{Tokenizer, tokenize, tokenize_bytes};

const ALPHABET: &[char] = &[
    'a', 'B', 'c', 'D', 'e', 'x', 'Y', 'z', '0', '7', '9', ' ', ' ', ' ', '#', '#', '@', '@',
    ',', '.', '\n', '\t', '\r', '!', '\'', 'é', 'Ü', '\u{a0}', '\u{85}', '\u{2028}',
    // Combining, enclosing and joiner marks.
    '\u{301}', '\u{345}', '\u{200d}', '\u{20e3}',
];

fn random_bio(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(0..48);
    (0..len)
        .map(|_| ALPHABET[rng.usize(0..ALPHABET.len())])
        .collect()
}

fn assert_well_formed(bio: &str, tokens: &str) {
    assert!(!tokens.starts_with(' '), "{bio:?} -> {tokens:?}");
    assert!(!tokens.ends_with(' '), "{bio:?} -> {tokens:?}");
    assert!(!tokens.contains("  "), "{bio:?} -> {tokens:?}");
    assert!(
        tokens.chars().all(|c| c == ' ' || !c.is_whitespace()),
        "{bio:?} -> {tokens:?}"
    );
    assert!(
        !tokens.chars().any(char::is_uppercase),
        "{bio:?} -> {tokens:?}"
    );

    let chars: Vec<char> = tokens.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '#' || c == '@' {
            let next = chars.get(i + 1);
            assert!(
                matches!(next, Some(n) if !matches!(n, ' ' | '#' | '@')),
                "dangling marker in {bio:?} -> {tokens:?}"
            );
        }
    }
}

#[test]
fn random_bios_are_well_formed_and_stable() {
    let mut rng = fastrand::Rng::with_seed(0x7eed_b105);
    let tokenizer = Tokenizer::new();
    for _ in 0..2_000 {
        let bio = random_bio(&mut rng);
        let tokens = tokenizer.tokenize(&bio);
        assert_well_formed(&bio, &tokens);
        assert_eq!(tokenize(&tokens), tokens, "not a fixed point for {bio:?}");
    }
}

#[test]
fn byte_form_matches_string_form_on_utf8() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..500 {
        let bio = random_bio(&mut rng);
        assert_eq!(tokenize_bytes(bio.as_bytes()), tokenize(&bio));
    }
}

#[test]
fn arbitrary_bytes_never_panic() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..500 {
        let len = rng.usize(0..64);
        let bytes: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
        let tokens = tokenize_bytes(&bytes);
        assert!(!tokens.contains("  "));
    }
}

#[test]
fn typical_bios() {
    let cases = [
        ("Dad. #Rustacean @ work", "dad . #rustacean work"),
        ("  ", ""),
        ("Views are my own!", "views are my own !"),
        ("@NASA\n#space", "@nasa #space"),
        ("a \u{345}", "a"),
        ("3\r\u{301}\n", "3"),
    ];
    for (bio, expected) in cases {
        assert_eq!(tokenize(bio), expected, "{bio:?}");
    }
}
