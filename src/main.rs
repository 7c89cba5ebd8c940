#[tokio::main]
async fn main() {
    use clap::Parser;
    use std::error::Error;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let args = oriencoop_scrape::cli::Args::parse();
    if let Err(e) = oriencoop_scrape::cli::run(&args).await {
        eprintln!("{}", e);
        if log::log_enabled!(log::Level::Debug) {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
