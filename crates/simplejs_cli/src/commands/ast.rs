use simplejs_driver::Driver;

use crate::args::CliArgs;
use crate::commands::common::{single_path, write_line};
use crate::commands::emit_diagnostics;

pub(crate) fn run(args: &CliArgs, driver: &Driver) {
    let path = single_path(args);
    let parsed = match driver.parse_file(path) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    emit_diagnostics(&parsed.source, &parsed.diagnostics);
    if parsed.has_errors() {
        std::process::exit(1);
    }
    let mut out = std::io::stdout().lock();
    write_line(&mut out, format_args!("{:#?}", parsed.program));
}
