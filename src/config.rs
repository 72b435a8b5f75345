use crate::error::{PreprocessError, Result};
use crate::vocab::{RewriteParams, VocabParams};

use serde_json::Value;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;


#[derive(Clone, Debug)]
pub struct Params {
    pub file_dir: PathBuf,
    pub file_name: String,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub lower_case: bool,
    pub tokenized_dir: String,
    pub padded_dir: String,
    pub new_file: bool,
    pub max_length: usize,
    pub modify: bool,
    pub modified_dir: Option<String>,
    pub num_workers: usize,
    pub saved_counts: Option<bool>,
    pub encode: bool,
    pub vocab: VocabParams,
}

impl Params {

    /// Rewrite target for the vocabulary stage: the tokenized corpus.
    pub fn rewrite_params(&self) -> RewriteParams {
        RewriteParams {
            file_dir: Some(self.file_dir.join(&self.tokenized_dir)),
            file_name: Some(self.file_name.clone()),
            new_dir: self.modified_dir.clone(),
            chunk_size: self.chunk_size,
            num_workers: self.num_workers,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() {
            return Err(PreprocessError::config("file_name must not be empty"));
        }
        for (name, value) in [("chunk_size", self.chunk_size), ("max_length", self.max_length), ("num_workers", self.num_workers)] {
            if value == 0 {
                return Err(PreprocessError::config(format!("{} must be positive", name)));
            }
        }
        self.vocab.validate()
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using parameters:
        file_dir: {}
        file_name: {}
        output_dir: {}
        chunk_size: {}
        lower_case: {}
        tokenized_dir: {}
        padded_dir: {}
        new_file: {}
        max_length: {}
        modify: {}
        modified_dir: {:?}
        num_workers: {}
        saved_counts: {:?}
        encode: {},
        Using {}",
        self.file_dir.display(), self.file_name, self.output_dir.display(), self.chunk_size, self.lower_case,
        self.tokenized_dir, self.padded_dir, self.new_file, self.max_length, self.modify, self.modified_dir,
        self.num_workers, self.saved_counts, self.encode, self.vocab)
    }
}


fn get_usize(json: &Value, key: &str, default: usize) -> Result<usize> {
    match json.get(key) {
        Some(value) => value.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| PreprocessError::config(format!("given {} is not a non-negative integer", key))),
        None => Ok(default)
    }
}

fn get_bool(json: &Value, key: &str) -> Result<Option<bool>> {
    match json.get(key) {
        Some(value) => value.as_bool()
            .map(Some)
            .ok_or_else(|| PreprocessError::config(format!("given {} is not boolean", key))),
        None => Ok(None)
    }
}

fn get_string(json: &Value, key: &str) -> Result<Option<String>> {
    match json.get(key) {
        Some(value) => value.as_str()
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| PreprocessError::config(format!("given {} is not a string", key))),
        None => Ok(None)
    }
}

fn require_string(json: &Value, key: &str) -> Result<String> {
    get_string(json, key)?.ok_or_else(|| PreprocessError::config(format!("{} was not supplied through json", key)))
}


pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    /// Expects the program name followed by a single path to a json file.
    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(PreprocessError::config("input should be a path to json file only"));
        }

        let f = BufReader::new(File::open(&args[1])?);
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        // required input location
        let file_dir = PathBuf::from(require_string(json, "file_dir")?);
        let file_name = require_string(json, "file_name")?;

        // handle default vs input parameters
        let output_dir = match get_string(json, "output_dir")? {
            Some(output_dir) => PathBuf::from(output_dir),
            None => file_dir.join("vocab")
        };
        let defaults = VocabParams::default();
        let vocab = VocabParams {
            threshold: get_usize(json, "threshold", defaults.threshold)?,
            uncommon_limit: get_usize(json, "uncommon_limit", defaults.uncommon_limit)?,
            pad_word: get_string(json, "pad_word")?.unwrap_or(defaults.pad_word),
            unknown: get_string(json, "unknown")?.unwrap_or(defaults.unknown),
        };

        let params = Params {
            file_dir,
            file_name,
            output_dir,
            chunk_size: get_usize(json, "chunk_size", 20000)?,
            lower_case: get_bool(json, "lower_case")?.unwrap_or(true),
            tokenized_dir: get_string(json, "tokenized_dir")?.unwrap_or_else(|| "tokenized".to_string()),
            padded_dir: get_string(json, "padded_dir")?.unwrap_or_else(|| "padded".to_string()),
            new_file: get_bool(json, "new_file")?.unwrap_or(true),
            max_length: get_usize(json, "max_length", 60)?,
            modify: get_bool(json, "modify")?.unwrap_or(true),
            modified_dir: get_string(json, "modified_dir")?,
            num_workers: get_usize(json, "num_workers", num_cpus::get())?,
            saved_counts: get_bool(json, "saved_counts")?,
            encode: get_bool(json, "encode")?.unwrap_or(false),
            vocab,
        };
        params.validate()?;

        Ok(Config { params })
    }

}


pub mod files_handling {

    use crate::counts::WordCounts;
    use crate::error::Result;

    use flate2::{Compression, read::GzDecoder, write::GzEncoder};
    use ndarray::Array2;
    use ndarray_npy::write_npy;
    use std::collections::HashMap;
    use std::fs::{self, File};
    use std::io::{BufRead, BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    fn with_suffix(file_path: &Path, suffix: &str) -> PathBuf {
        let mut path = file_path.as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    }

    /// Reads an artifact saved by `save_output`; `file_path` has no extension.
    pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<R> {
        R::read_file(file_path)
    }

    pub fn save_output<S: SaveFile>(output_dir: &Path, file_name: &str, item: &S) -> Result<PathBuf> {

        // create output folder
        fs::create_dir_all(output_dir)?;
        item.save_file(output_dir, file_name)
    }

    pub trait ReadFile: Sized {
        fn read_file(file_path: &Path) -> Result<Self>;
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf>;
    }

    impl ReadFile for HashMap<String, i64> {
        fn read_file(file_path: &Path) -> Result<Self> {
            let f = BufReader::new(File::open(with_suffix(file_path, ".json"))?);
            Ok(serde_json::from_reader(f)?)
        }
    }

    impl ReadFile for HashMap<i64, String> {
        fn read_file(file_path: &Path) -> Result<Self> {
            let f = BufReader::new(File::open(with_suffix(file_path, ".json"))?);
            Ok(serde_json::from_reader(f)?)
        }
    }

    impl ReadFile for WordCounts {
        fn read_file(file_path: &Path) -> Result<Self> {
            let f = BufReader::new(File::open(with_suffix(file_path, ".bin.gz"))?);
            let reader = GzDecoder::new(f);
            Ok(bincode::deserialize_from(reader)?)
        }
    }

    impl ReadFile for Vec<String> {
        fn read_file(file_path: &Path) -> Result<Self> {
            let f = BufReader::new(File::open(with_suffix(file_path, ".tsv"))?);
            let mut words = Vec::new();
            for line in f.lines() {
                words.push(line?);
            }
            Ok(words)
        }
    }

    impl SaveFile for HashMap<String, i64> {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            let out = with_suffix(&output_dir.join(file_name), ".json");
            let f = BufWriter::new(File::create(&out)?);
            serde_json::to_writer(f, self)?;
            Ok(out)
        }
    }

    impl SaveFile for HashMap<i64, String> {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            let out = with_suffix(&output_dir.join(file_name), ".json");
            let f = BufWriter::new(File::create(&out)?);
            serde_json::to_writer(f, self)?;
            Ok(out)
        }
    }

    impl SaveFile for WordCounts {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            let out = with_suffix(&output_dir.join(file_name), ".bin.gz");
            let f = BufWriter::new(File::create(&out)?);
            let mut writer = GzEncoder::new(f, Compression::default());
            bincode::serialize_into(&mut writer, self)?;
            writer.finish()?.flush()?;
            Ok(out)
        }
    }

    // projector metadata, one word per line in index order
    impl SaveFile for Vec<String> {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            let out = with_suffix(&output_dir.join(file_name), ".tsv");
            let mut f = BufWriter::new(File::create(&out)?);
            for word in self {
                writeln!(f, "{}", word)?;
            }
            f.flush()?;
            Ok(out)
        }
    }

    impl SaveFile for Array2<i64> {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
            let out = with_suffix(&output_dir.join(file_name), ".npy");
            write_npy(&out, self)?;
            Ok(out)
        }
    }
}
