// Turns a padded corpus into the numeric input of the training side: one row of vocabulary
// indices per comment, all rows `max_length` wide.

use crate::chunked::ChunkReader;
use crate::error::{PreprocessError, Result};
use crate::vocab::Vocabulary;

use log::info;
use ndarray::Array2;
use std::path::Path;


pub fn encode_file(file_path: &Path, vocab: &Vocabulary, max_length: usize, chunk_size: usize) -> Result<Array2<i64>> {

    let reader = ChunkReader::open(file_path, chunk_size)?;
    let mut data: Vec<i64> = Vec::new();
    let mut n_rows = 0;

    for (index, chunk) in reader.enumerate() {
        info!("encoding chunk {}...", index);
        for row in chunk? {
            let ids = vocab.encode(&row.comment_text);
            if ids.len() != max_length {
                return Err(PreprocessError::config(format!(
                    "row {} has {} tokens, the corpus is not padded to {}", n_rows, ids.len(), max_length)));
            }
            data.extend(ids);
            n_rows += 1;
        }
    }

    Array2::from_shape_vec((n_rows, max_length), data)
        .map_err(|e| PreprocessError::config(format!("cannot shape encoded corpus: {}", e)))
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::counts::WordCounts;
    use crate::vocab::{VocabParams, PAD_INDEX, UNKNOWN_INDEX};
    use ndarray::array;
    use std::fs;
    use tempfile::TempDir;

    fn vocab() -> Vocabulary {
        let counts: WordCounts = vec![("you", 1), ("'re", 1), ("great", 1), ("idiot", 1)].into_iter().collect();
        Vocabulary::build(&counts, &VocabParams { threshold: 0, uncommon_limit: 0, ..VocabParams::default() })
    }

    #[test]
    fn padded_rows_become_index_matrix() {

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.csv");
        fs::write(&path, "comment_text\nyou 're great\nidiot <pad> <pad>\nyou <unk> stranger\n").unwrap();

        let encoded = encode_file(&path, &vocab(), 3, 2).unwrap();
        assert_eq!(encoded, array![
            [0, 1, 2],
            [3, PAD_INDEX, PAD_INDEX],
            [0, UNKNOWN_INDEX, UNKNOWN_INDEX],
        ]);
    }

    #[test]
    fn unpadded_rows_are_rejected() {

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("padded.csv");
        fs::write(&path, "comment_text\nyou 're great\nidiot\n").unwrap();

        assert!(matches!(encode_file(&path, &vocab(), 3, 10), Err(PreprocessError::Config(_))));
    }
}
