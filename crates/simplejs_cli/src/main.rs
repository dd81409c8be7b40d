mod args;
mod commands;

use simplejs_driver::Driver;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    init_tracing();

    let args = match args::parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            if e != args::USAGE {
                eprintln!("{}", args::USAGE);
            }
            std::process::exit(2);
        }
    };

    let driver = Driver::new();
    match args.cmd.as_str() {
        "tokens" => commands::tokens::run(&args, &driver),
        "ast" => commands::ast::run(&args, &driver),
        "check" => commands::check::run(&args, &driver),
        "run" => commands::run::run_file(&args, &driver),
        "eval" => commands::run::run_source(&args, &driver),
        _ => {
            eprintln!("Unknown command: {}", args.cmd);
            eprintln!("{}", args::USAGE);
            std::process::exit(2);
        }
    }
}

/// Log filter comes from `SIMPLEJS_LOG` (e.g. `simplejs_runtime=debug`); default `warn`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SIMPLEJS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
