use arbor_app::args::{Args, Parser};
use arbor_app::op::{fatal_store_error, Op, OpContext};
use arbor_app::state::AppState;

fn main() {
    let args = Args::parse();

    // Explicit flag > config file > info
    let level = args.log_level.unwrap_or_else(|| {
        AppState::load(args.config_path.clone())
            .ok()
            .and_then(|state| state.config.log_level.parse().ok())
            .unwrap_or(tracing::Level::INFO)
    });
    let guards = arbor_app::init_logging(level, args.log_dir.as_deref());

    let ctx = OpContext::new(args.config_path);

    let code = match args.command.execute(&ctx) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            if let Some(fatal) = fatal_store_error(&e) {
                tracing::error!(error = %fatal, "unrecoverable store error, aborting");
                drop(guards);
                std::process::abort();
            }
            eprintln!("Error: {}", e);
            1
        }
    };

    // Flush buffered log writers before exiting
    drop(guards);
    std::process::exit(code);
}
