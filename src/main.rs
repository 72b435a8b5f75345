use comment_preprocessor::{Config, Pipeline};
use log::{error, info};
use std::env;
use std::process;
use std::time::Instant;

fn main() {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    info!("entering program...");
    let args: Vec<String> = env::args().collect();

    info!("building parameters...");
    let params = match Config::new(&args) {
        Ok(config) => config.get_params(),
        Err(e) => {
            error!("{}", e);
            process::exit(1)
        }
    };

    let timer = Instant::now();
    match Pipeline::run(&params) {
        Ok(output) => {
            info!("vocabulary size: {}", output.vocab.len());
            info!("padded corpus: {}", output.padded.display());
            if let Some(encoded) = output.encoded {
                info!("encoded corpus: {}", encoded.display());
            }
            info!("finished preprocessing, took {} seconds ...", timer.elapsed().as_secs());
        },
        Err(e) => {
            error!("{}", e);
            process::exit(1)
        }
    }
}
