// src/main.rs

use ciwrap::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("ciwrap error: {err:?}");
            std::process::exit(ciwrap::errors::SETUP_FAILURE_EXIT_CODE);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
