use crate::chunked::ChunkReader;
use crate::error::Result;
use crate::record::CommentRecord;

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;


/// Corpus wide word -> occurrences table. Iteration follows the order in which words
/// were first seen, which is what makes vocabulary indices reproducible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCounts {
    token2count: IndexMap<String, usize>,
}

impl WordCounts {

    pub fn new() -> WordCounts {
        WordCounts::default()
    }

    /// Counts the space separated words of one comment, skipping the pad token.
    pub fn accumulate(&mut self, comment: &str, pad_word: &str) {
        for word in comment.split(' ') {
            if word.is_empty() || word == pad_word {
                continue;
            }
            let val = self.token2count.entry(word.to_owned()).or_insert(0);
            *val += 1;
        }
    }

    pub fn accumulate_chunk(mut self, rows: &[CommentRecord], pad_word: &str) -> WordCounts {
        for row in rows {
            self.accumulate(&row.comment_text, pad_word);
        }
        self
    }

    pub fn get(&self, word: &str) -> usize {
        self.token2count.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.token2count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token2count.is_empty()
    }

    pub fn total(&self) -> usize {
        self.token2count.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.token2count.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Streams a tokenized table in chunks and counts every word of `comment_text`.
    pub fn run(file_path: &Path, chunk_size: usize, pad_word: &str) -> Result<WordCounts> {

        let timer = Instant::now();
        let reader = ChunkReader::open(file_path, chunk_size)?;

        let counts = reader.enumerate().try_fold(WordCounts::new(), |counts, (index, chunk)| {
            info!("counting chunk {}...", index);
            chunk.map(|rows| counts.accumulate_chunk(&rows, pad_word))
        })?;

        info!("counted {} distinct words ({} total), took {} seconds",
            counts.len(), counts.total(), timer.elapsed().as_secs());
        Ok(counts)
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for WordCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        WordCounts { token2count: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}
