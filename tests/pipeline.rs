use comment_preprocessor::files_handling::read_input;
use comment_preprocessor::{Config, Pipeline, PreprocessError, WordCounts, PAD_INDEX, UNKNOWN_INDEX};
use ndarray::array;
use ndarray_npy::read_npy;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;


fn write_raw(dir: &Path, rows: &str) {
    fs::write(dir.join("train.csv"), format!("id,comment_text,toxic\n{}", rows)).unwrap();
}

#[test]
fn toxic_comment_example_end_to_end() {

    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), "a1,You're great!,0\nb2,idiot,1\n");

    let json = json!({
        "file_dir": dir.path().to_str().unwrap(),
        "file_name": "train.csv",
        "threshold": 0,
        "uncommon_limit": 0,
        "max_length": 3,
        "chunk_size": 1,
        "num_workers": 2,
        "encode": true,
    });
    let params = Config::from_json(&json).unwrap().get_params();
    let output = Pipeline::run(&params).unwrap();

    assert_eq!(fs::read_to_string(&output.tokenized).unwrap(),
        "id,comment_text,toxic\na1,you 're great,0\nb2,idiot,1\n");

    let vocab = &output.vocab;
    assert_eq!(vocab.words(), vec!["you", "'re", "great", "idiot"]);
    assert_eq!(vocab.index_of("<unk>"), Some(-2));
    assert_eq!(vocab.index_of("<pad>"), Some(-1));

    assert_eq!(output.padded, dir.path().join("tokenized").join("padded").join("train.csv"));
    assert_eq!(fs::read_to_string(&output.padded).unwrap(),
        "id,comment_text,toxic\na1,you 're great,0\nb2,idiot <pad> <pad>,1\n");

    // saved artifacts
    let vocab_dir = dir.path().join("vocab");
    let t2i: HashMap<String, i64> = read_input(&vocab_dir.join("vocab")).unwrap();
    assert_eq!(&t2i, vocab.t2i());
    let i2t: HashMap<i64, String> = read_input(&vocab_dir.join("reverse_vocab")).unwrap();
    assert_eq!(&i2t, vocab.i2t());
    assert_eq!(fs::read_to_string(vocab_dir.join("metadata.tsv")).unwrap(), "you\n're\ngreat\nidiot\n");

    let encoded: ndarray::Array2<i64> = read_npy(output.encoded.unwrap()).unwrap();
    assert_eq!(encoded, array![[0, 1, 2], [3, PAD_INDEX, PAD_INDEX]]);
}

#[test]
fn uncommon_words_become_unknown_and_counts_can_be_reused() {

    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), "1,The cat sat. The cat ran!,0\n2,\"A dog, the cat.\",1\n3,zebra,0\n");

    let mut json = json!({
        "file_dir": dir.path().to_str().unwrap(),
        "file_name": "train.csv",
        "threshold": 1,
        "uncommon_limit": 10,
        "max_length": 4,
        "chunk_size": 2,
        "modified_dir": "modified",
        "new_file": false,
    });
    let params = Config::from_json(&json).unwrap().get_params();
    let output = Pipeline::run(&params).unwrap();

    assert_eq!(output.vocab.words(), vec!["the", "cat"]);
    assert_eq!(output.vocab.uncommon(), &["sat", "ran", "a", "dog", "zebra"].map(String::from));

    // padding in place over the rewritten corpus
    let modified = dir.path().join("tokenized").join("modified").join("train.csv");
    assert_eq!(output.padded, modified);
    assert_eq!(fs::read_to_string(&modified).unwrap(),
        "id,comment_text,toxic\n1,the cat <unk> the,0\n2,<unk> <unk> the cat,1\n3,<unk> <pad> <pad> <pad>,0\n");

    let counts: WordCounts = read_input(&dir.path().join("vocab").join("counts")).unwrap();
    assert_eq!(counts.get("the"), 3);
    assert_eq!(counts.get("cat"), 3);

    // second run from the saved counts gives the same vocabulary
    json["saved_counts"] = json!(true);
    let params = Config::from_json(&json).unwrap().get_params();
    let again = Pipeline::run(&params).unwrap();
    assert_eq!(again.vocab.t2i(), output.vocab.t2i());
    assert_eq!(again.vocab.encode("zebra the"), vec![UNKNOWN_INDEX, 0]);
}

#[test]
fn padding_into_existing_dir_fails() {

    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), "1,hello world,0\n");
    fs::create_dir_all(dir.path().join("tokenized").join("padded")).unwrap();

    let json = json!({
        "file_dir": dir.path().to_str().unwrap(),
        "file_name": "train.csv",
        "modify": false,
    });
    let params = Config::from_json(&json).unwrap().get_params();
    assert!(matches!(Pipeline::run(&params), Err(PreprocessError::OutputExists(_))));
}

#[test]
fn missing_input_is_fatal() {

    let dir = TempDir::new().unwrap();
    let json = json!({"file_dir": dir.path().to_str().unwrap(), "file_name": "missing.csv"});
    let params = Config::from_json(&json).unwrap().get_params();
    assert!(matches!(Pipeline::run(&params), Err(PreprocessError::Csv(_))));
}
