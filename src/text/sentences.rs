//! Rule-based sentence splitting.

/// Tokens that end with a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "cf", "co", "corp", "dept", "dr", "e.g", "eq", "est", "etc", "fig", "figs",
    "i.e", "inc", "jr", "ltd", "mr", "mrs", "ms", "no", "nos", "p", "pp", "prof", "ref", "sec",
    "sr", "st", "vol", "vs",
];

/// Closing characters that may follow terminal punctuation.
fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus any closing quotes/brackets)
/// followed by whitespace or end of text. A period does not end a sentence
/// after a known abbreviation or a single-letter initial. Returned sentences
/// are whitespace-normalized and never empty.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut end = i + 1;
            while end < chars.len() && (matches!(chars[end], '.' | '!' | '?') || is_closer(chars[end]))
            {
                end += 1;
            }
            let at_boundary = end >= chars.len() || chars[end].is_whitespace();
            if at_boundary && !(c == '.' && ends_with_abbreviation(&chars[start..i])) {
                push_sentence(&mut sentences, &chars[start..end]);
                start = end;
            }
            i = end;
        } else {
            i += 1;
        }
    }

    if start < chars.len() {
        push_sentence(&mut sentences, &chars[start..]);
    }

    sentences
}

fn push_sentence(out: &mut Vec<String>, chars: &[char]) {
    let s: String = chars.iter().collect();
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if !s.is_empty() {
        out.push(s);
    }
}

/// Check whether the word right before a period is an abbreviation or initial.
fn ends_with_abbreviation(before: &[char]) -> bool {
    let word: String = before
        .iter()
        .rev()
        .take_while(|c| !c.is_whitespace())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let word = word.trim_start_matches(['(', '"', '\'', '[']);
    if word.is_empty() {
        return false;
    }
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_alphabetic() {
            return true;
        }
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}
