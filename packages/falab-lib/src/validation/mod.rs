use itertools::{repeat_n, Itertools};

use crate::automaton::{Fa, EPSILON, TRAP, VOID};

/// Checks that two automata accept the same words up to `max_word_length`,
/// enumerating every word over the combined (sentinel-free) alphabets.
pub fn same_language(a: &Fa, b: &Fa, max_word_length: usize) -> bool {
    for_each_word(&word_symbols(a, b), max_word_length, |word| {
        if a.run(word).accepted != b.run(word).accepted {
            println!("{:?}", word);
            return false;
        }
        true
    })
}

/// Checks that `b` accepts exactly the words `a` rejects, up to
/// `max_word_length`.
pub fn inverse_language(a: &Fa, b: &Fa, max_word_length: usize) -> bool {
    for_each_word(&word_symbols(a, b), max_word_length, |word| {
        if a.run(word).accepted == b.run(word).accepted {
            println!("{:?}", word);
            return false;
        }
        true
    })
}

pub fn assert_same_language(a: &Fa, b: &Fa, max_word_length: usize) {
    assert!(
        same_language(a, b, max_word_length),
        "automata disagree on some word of length <= {}",
        max_word_length
    );
}

pub fn assert_inverse_language(a: &Fa, b: &Fa, max_word_length: usize) {
    assert!(
        inverse_language(a, b, max_word_length),
        "automata agree on some word of length <= {}",
        max_word_length
    );
}

fn for_each_word(symbols: &[String], max_len: usize, mut check: impl FnMut(&str) -> bool) -> bool {
    if !check("") {
        return false;
    }

    for len in 1..=max_len {
        for word in repeat_n(symbols.iter(), len).multi_cartesian_product() {
            let word: String = word.into_iter().map(String::as_str).collect();
            if !check(&word) {
                return false;
            }
        }
    }

    true
}

/// The union of both alphabets minus the sentinels, sorted for stable
/// enumeration.
fn word_symbols(a: &Fa, b: &Fa) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in a.alphabet.iter().chain(b.alphabet.iter()) {
        if matches!(symbol.as_str(), EPSILON | VOID | TRAP) {
            continue;
        }
        if !symbols.contains(symbol) {
            symbols.push(symbol.clone());
        }
    }
    symbols.sort();
    symbols
}
