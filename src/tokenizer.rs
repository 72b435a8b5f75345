// Word tokenization of raw comments. Text is cut into sentences first, then each sentence
// goes through Penn Treebank style rewrite rules (quotes, punctuation, brackets, clitics
// like n't / 're / 's) and is split on whitespace. Tokens that are bare punctuation are
// dropped before the words are joined back with single spaces.

use crate::chunked;
use crate::error::Result;

use lazy_static::lazy_static;
use log::info;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::time::Instant;


/// ASCII punctuation, each character a token of its own, plus the treebank quote markers.
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const QUOTE_MARKERS: [&str; 2] = ["``", "''"];

/// Clitics that keep their leading apostrophe ('re, 's, 'tis ...).
const CLITICS: [&str; 10] = ["re", "ve", "ll", "m", "t", "s", "d", "n", "tis", "twas"];

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: [&str; 12] = ["mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "e.g", "i.e"];

lazy_static! {

    static ref SENTENCE_BREAK: Regex = Regex::new(r#"[.!?]+["')\]}]*\s+"#).unwrap();

    static ref LEADING_QUOTE: Regex = Regex::new(r"(^|[\s(\[{<])'(\w+)").unwrap();

    static ref STARTING_QUOTES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"([«“‘„]|`+)").unwrap(), " $1 "),
        (Regex::new(r#"^""#).unwrap(), "``"),
        (Regex::new(r"(``)").unwrap(), " $1 "),
        (Regex::new(r#"([ (\[{<])("|'')"#).unwrap(), "$1 `` "),
    ];

    static ref PUNCTUATION_RULES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r#"([^.])(\.)([\])}>"']*)\s*$"#).unwrap(), "$1 $2 $3 "),
        (Regex::new(r"([:,])([^\d])").unwrap(), " $1 $2"),
        (Regex::new(r"([:,])$").unwrap(), " $1 "),
        (Regex::new(r"\.{2,}").unwrap(), " $0 "),
        (Regex::new(r"[;@#$%&]").unwrap(), " $0 "),
        (Regex::new(r"[?!]").unwrap(), " $0 "),
        (Regex::new(r"([^'])' ").unwrap(), "$1 ' "),
        (Regex::new(r"[*]").unwrap(), " $0 "),
        (Regex::new(r"[\]\[(){}<>]").unwrap(), " $0 "),
        (Regex::new(r"--").unwrap(), " -- "),
    ];

    static ref ENDING_QUOTES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"([»”’])").unwrap(), " $1 "),
        (Regex::new(r"''").unwrap(), " '' "),
        (Regex::new(r#"""#).unwrap(), " '' "),
        (Regex::new(r"([^' ])('[sS]|'[mM]|'[dD]|') ").unwrap(), "$1 $2 "),
        (Regex::new(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ").unwrap(), "$1 $2 "),
    ];

    static ref CONTRACTIONS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\b(can)(not)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(d)('ye)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(gim)(me)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(gon)(na)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(got)(ta)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(lem)(me)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(more)('n)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i)\b(wan)(na)\s").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i) ('t)(is)\b").unwrap(), " $1 $2 "),
        (Regex::new(r"(?i) ('t)(was)\b").unwrap(), " $1 $2 "),
    ];
}

fn apply(rules: &[(Regex, &'static str)], text: String) -> String {
    rules.iter().fold(text, |text, (pattern, replacement)| {
        pattern.replace_all(&text, *replacement).into_owned()
    })
}

/// Detaches an opening single quote from the word it starts, clitics excepted.
fn split_leading_quotes(text: String) -> String {
    LEADING_QUOTE.replace_all(&text, |caps: &Captures| {
        let word = &caps[2];
        if CLITICS.contains(&word.to_lowercase().as_str()) {
            caps[0].to_string()
        } else {
            format!("{}' {}", &caps[1], word)
        }
    }).into_owned()
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    match sentence.split_whitespace().last() {
        Some(word) => {
            let word = word.trim_end_matches('.').to_lowercase();
            ABBREVIATIONS.contains(&word.as_str())
        },
        None => false
    }
}

/// Cuts text after sentence final punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {

    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        let head = &text[start..m.start()];
        if m.as_str().starts_with('.') && !m.as_str().starts_with("..") && ends_with_abbreviation(head) {
            continue;
        }
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Treebank tokens of one sentence, punctuation included.
pub fn tokenize_sentence(sentence: &str) -> Vec<String> {

    let text = split_leading_quotes(apply(&STARTING_QUOTES, sentence.to_string()));
    let text = apply(&PUNCTUATION_RULES, text);
    let text = apply(&ENDING_QUOTES, format!(" {} ", text));
    let text = apply(&CONTRACTIONS, text);

    text.split_whitespace().map(|x| x.to_string()).collect()
}

/// Treebank tokens of a whole comment, punctuation included.
pub fn word_tokenize(text: &str) -> Vec<String> {
    split_sentences(text).into_iter().flat_map(tokenize_sentence).collect()
}

pub fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PUNCTUATION.contains(c),
        _ => QUOTE_MARKERS.contains(&token),
    }
}


#[derive(Clone, Debug)]
pub struct Tokenizer {
    lower_case: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer { lower_case: true }
    }
}

impl Tokenizer {

    pub fn new(lower_case: bool) -> Tokenizer {
        Tokenizer { lower_case }
    }

    /// The retained tokens of a comment, punctuation removed and optionally lower cased.
    pub fn tokenize(&self, comment: &str) -> Vec<String> {
        word_tokenize(comment)
            .into_iter()
            .filter(|token| !is_punctuation(token))
            .map(|token| if self.lower_case { token.to_lowercase() } else { token })
            .collect()
    }

    /// Tokens joined with single spaces, the form stored back into `comment_text`.
    pub fn normalize(&self, comment: &str) -> String {
        self.tokenize(comment).join(" ")
    }

    /// Tokenizes `<file_dir>/<file_name>` chunk by chunk into `<file_dir>/<new_dir>/<file_name>`.
    pub fn tokenize_file(&self, file_dir: &Path, file_name: &str, new_dir: &str, chunk_size: usize) -> Result<PathBuf> {

        let timer = Instant::now();
        let input = file_dir.join(file_name);
        let output = file_dir.join(new_dir).join(file_name);

        let n_rows = chunked::process(&input, &output, chunk_size, "tokenizing", |rows| {
            Ok(rows.iter().map(|row| row.with_text(self.normalize(&row.comment_text))).collect())
        })?;

        info!("tokenization complete, {} rows, took {} seconds", n_rows, timer.elapsed().as_secs());
        Ok(output)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::chunked::read_all;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn splits_clitics_and_drops_punctuation() {

        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.normalize("You're great!"), "you 're great");
        assert_eq!(tokenizer.normalize("idiot"), "idiot");
        assert_eq!(tokenizer.normalize("I don't think he'll come, can't you see?"),
            "i do n't think he 'll come ca n't you see");
        assert_eq!(tokenizer.normalize("It's John's car."), "it 's john 's car");
    }

    #[test]
    fn quotes_become_markers_then_vanish() {

        assert_eq!(word_tokenize("\"Hello,\" she said."),
            vec!["``", "Hello", ",", "''", "she", "said", "."]);
        assert_eq!(Tokenizer::new(false).normalize("\"Hello,\" she said."), "Hello she said");
    }

    #[test]
    fn curly_quotes_stand_alone() {

        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.normalize("“Hello”"), "“ hello ”");
        assert_eq!(tokenizer.normalize("“Hello” she said"), "“ hello ” she said");
        assert_eq!(word_tokenize("«Non» ‘ok’"), vec!["«", "Non", "»", "‘", "ok", "’"]);
    }

    #[test]
    fn single_quotes_and_backticks_come_off() {

        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.normalize("'hello' world"), "hello world");
        assert_eq!(tokenizer.normalize("he said 'stop it' (twice)"), "he said stop it twice");
        assert_eq!(tokenizer.normalize("`word` here"), "word here");
        assert_eq!(tokenizer.normalize("``word'' here"), "word here");
        // leading clitics are left alone
        assert_eq!(word_tokenize("'re 'll"), vec!["'re", "'ll"]);
    }

    #[test]
    fn numbers_and_sentences() {

        let tokenizer = Tokenizer::new(false);
        assert_eq!(tokenizer.normalize("It costs $3.50, or 1,000 yen. Cheap!"),
            "It costs 3.50 or 1,000 yen Cheap");
        assert_eq!(tokenizer.normalize("Mr. Smith left... Then (again) he cannot"),
            "Mr. Smith left ... Then again he can not");
    }

    #[test]
    fn lower_casing_is_optional() {

        assert_eq!(Tokenizer::new(false).normalize("Stop SHOUTING"), "Stop SHOUTING");
        let lowered = Tokenizer::new(true).tokenize("Stop SHOUTING, Ok?! WHY");
        assert!(lowered.iter().all(|t| *t == t.to_lowercase()));
        assert!(lowered.iter().all(|t| !is_punctuation(t)));
    }

    #[test]
    fn empty_comment_tokenizes_to_empty() {

        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert_eq!(tokenizer.normalize(""), "");
        assert_eq!(tokenizer.normalize("?! ,"), "");
    }

    #[test]
    fn punctuation_predicate() {

        for token in ["!", ".", ",", "``", "''", "-", "'"] {
            assert!(is_punctuation(token), "{}", token);
        }
        for token in ["...", "--", "'re", "n't", "a", "3.50"] {
            assert!(!is_punctuation(token), "{}", token);
        }
    }

    #[test]
    fn tokenize_file_rewrites_only_text() {

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("train.csv"),
            "id,comment_text,toxic\n1,You're great!,0\n2,idiot,1\n").unwrap();

        let output = Tokenizer::default().tokenize_file(dir.path(), "train.csv", "tokenized", 1).unwrap();
        assert_eq!(output, dir.path().join("tokenized").join("train.csv"));
        assert_eq!(fs::read_to_string(&output).unwrap(),
            "id,comment_text,toxic\n1,you 're great,0\n2,idiot,1\n");

        let (_, rows) = read_all(&output).unwrap();
        assert_eq!(rows[1].passthrough(), &["2".to_string(), "1".to_string()]);
    }
}
