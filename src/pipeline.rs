// imports
use crate::config::{files_handling::{read_input, save_output}, Params};
use crate::counts::WordCounts;
use crate::encoder::encode_file;
use crate::error::Result;
use crate::padder::pad_file;
use crate::tokenizer::Tokenizer;
use crate::vocab::{build_vocab, Vocabulary};

use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;


pub struct PipelineOutput {
    pub vocab: Vocabulary,
    pub tokenized: PathBuf,
    pub padded: PathBuf,
    pub encoded: Option<PathBuf>,
}

pub struct Pipeline {}

impl Pipeline {

    // runs the whole preprocessing in stages -
    // -> tokenization of the raw comments
    // -> word counting (or loading saved counts)
    // -> vocabulary building, optionally rewriting uncommon words
    // -> padding
    // -> optional encoding to vocabulary indices

    pub fn run(params: &Params) -> Result<PipelineOutput> {

        params.validate()?;
        info!("{}", params);

        let timer = Instant::now();
        let tokenizer = Tokenizer::new(params.lower_case);
        let tokenized = tokenizer.tokenize_file(&params.file_dir, &params.file_name, &params.tokenized_dir, params.chunk_size)?;
        info!("finished tokenization, took {} seconds ...", timer.elapsed().as_secs());

        // run the counting stage if not saved already
        let counts_path = params.output_dir.join("counts");
        let counts: WordCounts = if params.saved_counts == Some(true) {
            info!("loading saved counts from {}", counts_path.display());
            read_input(&counts_path)?
        } else {
            let counts = WordCounts::run(&tokenized, params.chunk_size, &params.vocab.pad_word)?;
            save_output(&params.output_dir, "counts", &counts)?;
            counts
        };

        let timer = Instant::now();
        let rewrite = params.rewrite_params();
        let modify = if params.modify { Some(&rewrite) } else { None };
        let (vocab, rewritten) = build_vocab(&counts, &params.vocab, modify)?;
        Pipeline::save_vocab(&vocab, &params.output_dir)?;
        info!("finished creation and saved vocab, took {} seconds ...", timer.elapsed().as_secs());

        // pad next to the corpus the vocabulary stage left behind
        let corpus = rewritten.unwrap_or_else(|| tokenized.clone());
        let corpus_dir = corpus.parent().unwrap_or_else(|| Path::new("."));
        let padded = pad_file(corpus_dir, &params.file_name, params.new_file, &params.padded_dir,
            params.max_length, &params.vocab.pad_word)?;

        let encoded = if params.encode {
            let matrix = encode_file(&padded, &vocab, params.max_length, params.chunk_size)?;
            Some(save_output(&params.output_dir, "encoded", &matrix)?)
        } else {
            None
        };

        Ok(PipelineOutput { vocab, tokenized, padded, encoded })
    }

    /// Saves the vocabulary, its reverse and the projector metadata under `output_dir`.
    pub fn save_vocab(vocab: &Vocabulary, output_dir: &Path) -> Result<()> {

        save_output(output_dir, "vocab", vocab.t2i())?;
        save_output(output_dir, "reverse_vocab", vocab.i2t())?;
        let metadata: Vec<String> = vocab.words().into_iter().map(|w| w.to_string()).collect();
        save_output(output_dir, "metadata", &metadata)?;

        info!("saved {} words to {}", vocab.len(), output_dir.display());
        Ok(())
    }

}
