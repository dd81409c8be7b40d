use std::io::Write;

use simplejs_driver::{Driver, ParsedFile};
use simplejs_runtime::{FatalError, Interpreter, InterpreterConfig, Value};

use crate::args::CliArgs;
use crate::commands::common::{single_path, write_line};
use crate::commands::emit_diagnostics;

/// `sjs run <file>`: execute a script; only `print` produces output.
pub(crate) fn run_file(args: &CliArgs, driver: &Driver) {
    let path = single_path(args);
    let parsed = match driver.parse_file(path) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    execute(args, &parsed, false);
}

/// `sjs eval <source>`: execute inline source and print its completion value.
pub(crate) fn run_source(args: &CliArgs, driver: &Driver) {
    if args.positional.is_empty() {
        eprintln!("Missing <source>");
        std::process::exit(2);
    }
    let source = args.positional.join(" ");
    let parsed = match driver.parse_text("<eval>", &source) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    execute(args, &parsed, true);
}

fn execute(args: &CliArgs, parsed: &ParsedFile, print_completion: bool) {
    emit_diagnostics(&parsed.source, &parsed.diagnostics);
    if parsed.has_errors() {
        std::process::exit(1);
    }

    let mut interp = Interpreter::with_config(config_from(args));
    if let Err(e) = install_print(&mut interp) {
        eprintln!("FatalError: {e}");
        std::process::exit(1);
    }

    let result = interp.eval_program(&parsed.program);
    let code = match result {
        Ok(v) if v.is_error() => {
            let msg = interp.to_string(v).unwrap_or_else(|e| e.to_string());
            eprintln!("Uncaught {msg}");
            1
        }
        Ok(v) => {
            if print_completion && !v.is_undefined() {
                match interp.to_string(v) {
                    Ok(s) => write_line(&mut std::io::stdout().lock(), format_args!("{s}")),
                    Err(e) => eprintln!("FatalError: {e}"),
                }
            }
            0
        }
        Err(e) => {
            eprintln!("FatalError: {e}");
            1
        }
    };

    if args.stats {
        eprintln!("{}", interp.dump_stats());
    }
    if code != 0 {
        std::process::exit(code);
    }
}

fn config_from(args: &CliArgs) -> InterpreterConfig {
    let mut config = InterpreterConfig::default();
    if let Some(n) = args.heap_size {
        config.heap_size = n;
    }
    if let Some(n) = args.max_stack_size {
        config.max_stack_size = n;
    }
    if let Some(p) = args.gc_trigger {
        config.gc_trigger_percent = p;
    }
    config
}

/// `print(...args)`: space-separated string forms on one stdout line.
fn install_print(interp: &mut Interpreter) -> Result<Value, FatalError> {
    interp.register_function("print", |interp, args| {
        let mut line = String::new();
        for (i, v) in args.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&interp.to_string(*v)?);
        }
        let _ = writeln!(std::io::stdout().lock(), "{line}");
        Ok(Value::UNDEFINED)
    })
}
