use crate::chunked;
use crate::error::{PreprocessError, Result};

use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};


/// Pads `comment` with `pad_word` up to `pad_to` tokens, or keeps only its first `pad_to`
/// tokens. Tokens are separated by single spaces; an empty comment has no tokens.
pub fn pad(comment: &str, pad_to: usize, pad_word: &str) -> String {

    let mut tokens: Vec<&str> = if comment.is_empty() { Vec::new() } else { comment.split(' ').collect() };

    if tokens.len() < pad_to {
        tokens.resize(pad_to, pad_word);
    } else {
        tokens.truncate(pad_to);
    }
    tokens.join(" ")
}

/// Pads every comment of `<file_dir>/<file_name>`. The table is loaded whole.
/// With `new_file` the result goes to `<file_dir>/<new_dir>/<file_name>` and `new_dir`
/// must not exist yet, otherwise the file is replaced in place.
pub fn pad_file(file_dir: &Path, file_name: &str, new_file: bool, new_dir: &str, max_length: usize, pad_word: &str) -> Result<PathBuf> {

    let input = file_dir.join(file_name);
    let (header, rows) = chunked::read_all(&input)?;

    let padded: Vec<_> = rows.iter()
        .map(|row| row.with_text(pad(&row.comment_text, max_length, pad_word)))
        .collect();

    let save_to = if new_file {
        let dir = file_dir.join(new_dir);
        if let Err(e) = fs::create_dir(&dir) {
            return Err(match e.kind() {
                ErrorKind::AlreadyExists => PreprocessError::OutputExists(dir),
                _ => e.into(),
            });
        }
        dir.join(file_name)
    } else {
        input.clone()
    };

    let output = chunked::write_all(&save_to, &header, &padded, !new_file)?;
    info!("padded {} comments to {} tokens into {}", padded.len(), max_length, output.display());
    Ok(output)
}
