pub mod chunked;
pub mod config;
pub mod counts;
pub mod encoder;
pub mod error;
pub mod padder;
pub mod pipeline;
pub mod record;
pub mod tokenizer;
pub mod vocab;

pub use config::{files_handling, Config, Params};
pub use counts::WordCounts;
pub use error::{PreprocessError, Result};
pub use pipeline::{Pipeline, PipelineOutput};
pub use record::CommentRecord;
pub use tokenizer::Tokenizer;
pub use vocab::{build_vocab, RewriteParams, VocabParams, Vocabulary, PAD_INDEX, UNKNOWN_INDEX};
