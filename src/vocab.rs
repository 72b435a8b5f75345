// Vocabulary construction. Words seen more than `threshold` times get dense indices from 0
// in first-occurrence order; the reserved unknown / pad tokens sit at -2 / -1. Rarer words
// fill a bounded "uncommon" list (up to `uncommon_limit`) whose members are replaced by the
// unknown token when the corpus is rewritten. Rare words met after the list is full are in
// neither and pass through rewriting untouched.

use crate::chunked;
use crate::counts::WordCounts;
use crate::error::{PreprocessError, Result};
use crate::record::CommentRecord;

use log::{info, warn};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

pub const UNKNOWN_INDEX: i64 = -2;
pub const PAD_INDEX: i64 = -1;


#[derive(Clone, Debug)]
pub struct VocabParams {
    pub threshold: usize,
    pub uncommon_limit: usize,
    pub pad_word: String,
    pub unknown: String,
}

impl Default for VocabParams {
    fn default() -> Self {
        VocabParams {
            threshold: 3,
            uncommon_limit: 500,
            pad_word: "<pad>".to_string(),
            unknown: "<unk>".to_string(),
        }
    }
}

impl VocabParams {

    pub fn validate(&self) -> Result<()> {
        for (name, token) in [("pad_word", &self.pad_word), ("unknown", &self.unknown)] {
            if token.is_empty() || token.contains(' ') {
                return Err(PreprocessError::config(format!("{} must be a non-empty word without spaces, got {:?}", name, token)));
            }
        }
        if self.pad_word == self.unknown {
            return Err(PreprocessError::config("pad_word and unknown must differ"));
        }
        Ok(())
    }
}

impl Display for VocabParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vocabulary parameters:
        threshold: {},
        uncommon_limit: {},
        pad_word: {},
        unknown: {}",
        self.threshold, self.uncommon_limit, self.pad_word, self.unknown)
    }
}


/// Where and how a corpus is rewritten with uncommon words replaced.
/// `file_dir` and `file_name` are both required; without `new_dir` the file is rewritten in place.
#[derive(Clone, Debug)]
pub struct RewriteParams {
    pub file_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub new_dir: Option<String>,
    pub chunk_size: usize,
    pub num_workers: usize,
}

impl RewriteParams {

    /// Resolves (input, output) paths, failing before anything touches the disk.
    pub fn paths(&self) -> Result<(PathBuf, PathBuf)> {

        let (file_dir, file_name) = match (&self.file_dir, &self.file_name) {
            (Some(dir), Some(name)) => (dir, name),
            _ => return Err(PreprocessError::config("rewriting requires both file_dir and file_name")),
        };
        if self.chunk_size == 0 {
            return Err(PreprocessError::config("chunk_size must be positive"));
        }
        if self.num_workers == 0 {
            return Err(PreprocessError::config("num_workers must be positive"));
        }

        let out_dir = match &self.new_dir {
            Some(new_dir) => file_dir.join(new_dir),
            None => file_dir.to_path_buf(),
        };
        Ok((file_dir.join(file_name), out_dir.join(file_name)))
    }
}


#[derive(Clone, Debug)]
pub struct Vocabulary {
    t2i: HashMap<String, i64>,
    i2t: HashMap<i64, String>,
    uncommon: Vec<String>,
    uncommon_lookup: HashSet<String>,
    n_words: usize,
    dropped: usize,
    pad_word: String,
    unknown: String,
}

impl Vocabulary {

    pub fn build(word_count: &WordCounts, params: &VocabParams) -> Vocabulary {

        let mut t2i: HashMap<String, i64> = HashMap::new();
        t2i.insert(params.unknown.clone(), UNKNOWN_INDEX);
        t2i.insert(params.pad_word.clone(), PAD_INDEX);

        let mut uncommon: Vec<String> = Vec::new();
        let mut dropped = 0;
        let mut next_index: i64 = 0;

        for (word, occurrences) in word_count.iter() {

            // reserved tokens keep their indices whatever the corpus holds
            if word == params.unknown || word == params.pad_word {
                continue;
            }

            if occurrences > params.threshold {
                t2i.insert(word.to_owned(), next_index);
                next_index += 1;
            } else if uncommon.len() < params.uncommon_limit {
                uncommon.push(word.to_owned());
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!("uncommon list full at {} words, {} more rare words kept verbatim", params.uncommon_limit, dropped);
        }
        info!("vocabulary of {} words, {} uncommon", next_index, uncommon.len());

        let i2t: HashMap<i64, String> = t2i.iter().map(|(t, i)| (*i, t.to_owned())).collect();
        let uncommon_lookup: HashSet<String> = uncommon.iter().cloned().collect();

        Vocabulary {
            t2i,
            i2t,
            uncommon,
            uncommon_lookup,
            n_words: next_index as usize,
            dropped,
            pad_word: params.pad_word.clone(),
            unknown: params.unknown.clone(),
        }
    }

    /// Rebuilds a vocabulary from a saved word -> index map. The uncommon list is not
    /// part of the saved artifacts, so the result can encode but not rewrite.
    pub fn from_t2i(t2i: HashMap<String, i64>) -> Result<Vocabulary> {

        let i2t: HashMap<i64, String> = t2i.iter().map(|(t, i)| (*i, t.to_owned())).collect();
        if i2t.len() != t2i.len() {
            return Err(PreprocessError::config("saved vocabulary maps two words to one index"));
        }

        let reserved = |index: i64, name: &str| {
            i2t.get(&index).cloned()
                .ok_or_else(|| PreprocessError::config(format!("saved vocabulary has no {} token", name)))
        };
        let unknown = reserved(UNKNOWN_INDEX, "unknown")?;
        let pad_word = reserved(PAD_INDEX, "pad")?;
        let n_words = t2i.values().filter(|i| !is_reserved(**i)).count();

        Ok(Vocabulary {
            t2i,
            i2t,
            uncommon: Vec::new(),
            uncommon_lookup: HashSet::new(),
            n_words,
            dropped: 0,
            pad_word,
            unknown,
        })
    }

    pub fn t2i(&self) -> &HashMap<String, i64> {
        &self.t2i
    }

    pub fn i2t(&self) -> &HashMap<i64, String> {
        &self.i2t
    }

    pub fn index_of(&self, word: &str) -> Option<i64> {
        self.t2i.get(word).copied()
    }

    pub fn word_of(&self, index: i64) -> Option<&str> {
        self.i2t.get(&index).map(|w| w.as_str())
    }

    pub fn uncommon(&self) -> &[String] {
        &self.uncommon
    }

    pub fn is_uncommon(&self, word: &str) -> bool {
        self.uncommon_lookup.contains(word)
    }

    /// Rare words that did not fit in the uncommon list.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn pad_word(&self) -> &str {
        &self.pad_word
    }

    pub fn unknown(&self) -> &str {
        &self.unknown
    }

    /// Number of real words, reserved tokens excluded.
    pub fn len(&self) -> usize {
        self.n_words
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Real words ordered by index.
    pub fn words(&self) -> Vec<&str> {
        (0..self.len() as i64).filter_map(|i| self.word_of(i)).collect()
    }

    /// `comment` with every uncommon word swapped for the unknown token.
    pub fn replace_uncommon(&self, comment: &str) -> String {
        find_replace_text(comment, &self.uncommon_lookup, &self.unknown)
    }

    /// Vocabulary indices of a space separated comment; anything outside the
    /// vocabulary maps to the unknown index.
    pub fn encode(&self, comment: &str) -> Vec<i64> {
        if comment.is_empty() {
            return Vec::new();
        }
        comment.split(' ').map(|word| self.index_of(word).unwrap_or(UNKNOWN_INDEX)).collect()
    }

    pub fn decode(&self, indices: &[i64]) -> String {
        indices.iter()
            .map(|i| self.word_of(*i).unwrap_or(self.unknown.as_str()))
            .collect::<Vec<&str>>()
            .join(" ")
    }

    /// Streams the corpus named by `params` chunk by chunk, replaces uncommon words in
    /// parallel over `num_workers` row ranges and writes the chunks back in order.
    pub fn rewrite_corpus(&self, params: &RewriteParams) -> Result<PathBuf> {

        let (input, output) = params.paths()?;
        let timer = Instant::now();

        let pool = ThreadPoolBuilder::new().num_threads(params.num_workers).build()?;
        let workers = params.num_workers;

        chunked::process(&input, &output, params.chunk_size, "processing", |chunk| {
            Ok(rewrite_chunk(&pool, workers, chunk, &self.uncommon_lookup, &self.unknown))
        })?;

        info!("rewrite complete, took {} seconds", timer.elapsed().as_secs());
        Ok(output)
    }
}


fn find_replace_text(comment: &str, uncommon: &HashSet<String>, unknown: &str) -> String {
    comment
        .split(' ')
        .map(|word| if uncommon.contains(word) { unknown } else { word })
        .collect::<Vec<&str>>()
        .join(" ")
}

fn find_replace(rows: &[CommentRecord], uncommon: &HashSet<String>, unknown: &str) -> Vec<CommentRecord> {
    rows.iter()
        .map(|row| row.with_text(find_replace_text(&row.comment_text, uncommon, unknown)))
        .collect()
}

/// Splits a chunk into `workers` contiguous row ranges, rewrites them on the pool and
/// concatenates the results in range order.
fn rewrite_chunk(pool: &ThreadPool, workers: usize, chunk: Vec<CommentRecord>, uncommon: &HashSet<String>, unknown: &str) -> Vec<CommentRecord> {

    let step = ((chunk.len() + workers - 1) / workers).max(1);
    let splits: Vec<&[CommentRecord]> = chunk.chunks(step).collect();

    let results: Vec<Vec<CommentRecord>> = pool.install(|| {
        splits.par_iter().map(|split| find_replace(split, uncommon, unknown)).collect()
    });

    results.into_iter().flatten().collect()
}

/// Builds the vocabulary and, when `modify` is given, rewrites that corpus.
/// Rewrite parameters are checked before any file is touched.
pub fn build_vocab(word_count: &WordCounts, params: &VocabParams, modify: Option<&RewriteParams>) -> Result<(Vocabulary, Option<PathBuf>)> {

    params.validate()?;
    if let Some(rewrite) = modify {
        rewrite.paths()?;
    }

    let vocab = Vocabulary::build(word_count, params);
    let rewritten = match modify {
        Some(rewrite) => Some(vocab.rewrite_corpus(rewrite)?),
        None => None,
    };
    Ok((vocab, rewritten))
}

pub fn is_reserved(index: i64) -> bool {
    index == UNKNOWN_INDEX || index == PAD_INDEX
}
