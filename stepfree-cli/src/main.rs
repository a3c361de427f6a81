//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = stepfree_cli::run() {
        eprintln!("stepfree: {err}");
        std::process::exit(1);
    }
}
