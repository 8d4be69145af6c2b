//! Per-line heading classification.
//!
//! The classifier is an ordered list of independent rejection rules followed
//! by an acceptance step. The first rule that fires decides the outcome.

use regex::Regex;

use super::font_profile::BodyFont;
use crate::model::{LayoutLine, TextRun};

/// Minimum size gap over the body font for a line to count as larger.
const SIZE_DELTA: f32 = 0.5;

/// Lines longer than this are treated as paragraphs.
const MAX_HEADING_WORDS: usize = 20;

/// Larger lines up to this length are accepted without emphasis.
const SHORT_HEADING_WORDS: usize = 8;

const BULLET_GLYPHS: &[char] = &['•', '●', '-', '*', '▪', '‣', '➤', '◦', '–'];

const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ';'];

const FOOTER_TOKENS: &[&str] = &[
    "page",
    "chapter",
    "section",
    "www.",
    "http",
    "@",
    "copyright",
    "©",
];

/// Why a line was not accepted as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRejection {
    /// Bullet or enumerated list item
    ListItem,
    /// Fewer than 3 characters or more than 20 words
    Length,
    /// Ends in `.`, `!`, `?` or `;`
    TerminalPunctuation,
    /// Matches a known non-heading pattern
    NegativePattern,
    /// Contains header/footer noise
    FooterNoise,
    /// No run carries style information
    MissingRun,
    /// Neither larger than nor emphasized relative to body text
    NotProminent,
    /// Starts with something other than an uppercase letter or digit
    Capitalization,
    /// Prominent but failed the final size/length check
    Weak,
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingDecision {
    /// The line opens a new section
    Heading,
    /// The line is body text
    Rejected(HeadingRejection),
}

impl HeadingDecision {
    /// Check if the line was accepted.
    pub fn is_heading(&self) -> bool {
        matches!(self, HeadingDecision::Heading)
    }
}

/// Facts about a line that the rules read.
struct LineFeatures<'a> {
    text: &'a str,
    lower: String,
    word_count: usize,
    run: Option<&'a TextRun>,
    is_larger: bool,
    is_emphasized: bool,
}

type Rule = fn(&HeadingClassifier, &LineFeatures<'_>) -> bool;

/// Rejection rules, evaluated in order.
const RULES: &[(HeadingRejection, Rule)] = &[
    (HeadingRejection::ListItem, HeadingClassifier::is_list_item),
    (HeadingRejection::Length, HeadingClassifier::bad_length),
    (
        HeadingRejection::TerminalPunctuation,
        HeadingClassifier::ends_sentence,
    ),
    (
        HeadingRejection::NegativePattern,
        HeadingClassifier::matches_negative,
    ),
    (HeadingRejection::FooterNoise, HeadingClassifier::has_footer_noise),
    (HeadingRejection::MissingRun, HeadingClassifier::missing_run),
    (HeadingRejection::NotProminent, HeadingClassifier::not_prominent),
    (
        HeadingRejection::Capitalization,
        HeadingClassifier::bad_capitalization,
    ),
];

/// Heading classifier bound to one document's body font.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    body: BodyFont,
    enumerated: Regex,
    lettered: Regex,
    negative: Vec<Regex>,
    positive: Vec<Regex>,
}

impl HeadingClassifier {
    /// Create a classifier for a document whose body font is `body`.
    pub fn new(body: BodyFont) -> Self {
        let compile = |p: &str| Regex::new(p).expect("valid heading pattern");
        Self {
            body,
            enumerated: compile(r"^\(?\d+[.)]"),
            lettered: compile(r"^[a-zA-Z]\)"),
            negative: [
                r"^\d+$",
                r"^[ivxlcdm]+$",
                r"^[a-z][.)]",
                r"^\([^)]+\)$",
                r"^[•\-–●◦▪‣➤*]",
                r"^\(?\d+[.)]",
                r"^[a-zA-Z]\)",
                r"^\s*$",
                r"^(figure|table|fig|tab)[\s\d]",
                r"^(see|refer|source|note)[\s:]",
            ]
            .iter()
            .map(|p| compile(p))
            .collect(),
            positive: [
                r"^\d+[.\s]",
                r"^[A-Z][a-z]+(\s+[A-Z][a-z]+)*$",
                r"^[A-Z\s]+$",
                r"^\d+\.\d+",
            ]
            .iter()
            .map(|p| compile(p))
            .collect(),
        }
    }

    /// The baseline this classifier compares against.
    pub fn body_font(&self) -> BodyFont {
        self.body
    }

    /// Classify a layout line using its primary run.
    pub fn classify_line(&self, line: &LayoutLine) -> HeadingDecision {
        let text = line.text();
        self.classify(&text, line.primary_run())
    }

    /// Classify a line of text with the run that carries its style.
    pub fn classify(&self, text: &str, run: Option<&TextRun>) -> HeadingDecision {
        let text = text.trim();
        let (is_larger, is_emphasized) = match run {
            Some(r) => (
                r.font_size >= self.body.size + SIZE_DELTA,
                r.is_bold && !self.body.is_bold,
            ),
            None => (false, false),
        };
        let features = LineFeatures {
            text,
            lower: text.to_lowercase(),
            word_count: text.split_whitespace().count(),
            run,
            is_larger,
            is_emphasized,
        };

        for (reason, rule) in RULES {
            if rule(self, &features) {
                return HeadingDecision::Rejected(*reason);
            }
        }

        if self.positive.iter().any(|re| re.is_match(text)) {
            return HeadingDecision::Heading;
        }

        if features.is_larger
            && (features.is_emphasized || features.word_count <= SHORT_HEADING_WORDS)
        {
            HeadingDecision::Heading
        } else {
            HeadingDecision::Rejected(HeadingRejection::Weak)
        }
    }

    /// Convenience wrapper returning a boolean.
    pub fn is_heading(&self, text: &str, run: Option<&TextRun>) -> bool {
        self.classify(text, run).is_heading()
    }

    fn is_list_item(&self, f: &LineFeatures<'_>) -> bool {
        f.text.starts_with(BULLET_GLYPHS)
            || self.enumerated.is_match(f.text)
            || self.lettered.is_match(f.text)
    }

    fn bad_length(&self, f: &LineFeatures<'_>) -> bool {
        f.text.chars().count() < 3 || f.word_count > MAX_HEADING_WORDS
    }

    fn ends_sentence(&self, f: &LineFeatures<'_>) -> bool {
        f.text.ends_with(TERMINAL_PUNCTUATION)
    }

    fn matches_negative(&self, f: &LineFeatures<'_>) -> bool {
        self.negative.iter().any(|re| re.is_match(&f.lower))
    }

    fn has_footer_noise(&self, f: &LineFeatures<'_>) -> bool {
        FOOTER_TOKENS.iter().any(|t| f.lower.contains(t))
    }

    fn missing_run(&self, f: &LineFeatures<'_>) -> bool {
        f.run.is_none()
    }

    fn not_prominent(&self, f: &LineFeatures<'_>) -> bool {
        !(f.is_larger || f.is_emphasized)
    }

    fn bad_capitalization(&self, f: &LineFeatures<'_>) -> bool {
        !f.text
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || c.is_numeric())
    }
}
