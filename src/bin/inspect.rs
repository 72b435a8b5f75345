use comment_preprocessor::files_handling::read_input;
use comment_preprocessor::padder::pad;
use comment_preprocessor::{Result, Tokenizer, Vocabulary};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::{env, process};


// checks on saved vocabularies: every line of an input file goes through the same
// tokenization, padding and encoding the training corpus went through, and is printed
// next to the indices and the words those indices decode back to.
// treated as binary executable so it can be ran independently from main
// example: ... data/vocab comments.txt 60

fn main() {

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: {} <vocab dir> <comments file> <max length>", args[0]);
        process::exit(2);
    }

    let max_length: usize = match args[3].parse() {
        Ok(max_length) => max_length,
        Err(e) => {
            eprintln!("max length {:?} is not a number: {}", args[3], e);
            process::exit(2);
        }
    };

    if let Err(e) = run(Path::new(&args[1]), Path::new(&args[2]), max_length) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(vocab_dir: &Path, comments: &Path, max_length: usize) -> Result<()> {

    let t2i: HashMap<String, i64> = read_input(&vocab_dir.join("vocab"))?;
    let vocab = Vocabulary::from_t2i(t2i)?;
    println!("loaded {} words", vocab.len());

    let tokenizer = Tokenizer::default();
    let lines = io::BufReader::new(File::open(comments)?).lines();

    for line in lines {
        let line = line?;
        let padded = pad(&tokenizer.normalize(&line), max_length, vocab.pad_word());
        let indices = vocab.encode(&padded);
        println!("{}", line);
        println!("  {:?}", indices);
        println!("  {}\n", vocab.decode(&indices));
    }
    Ok(())
}
