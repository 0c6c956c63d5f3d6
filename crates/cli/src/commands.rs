use std::path::PathBuf;
use std::process;

use pddlasp_core::{
    beautify_sources, check_syntax, load_sources, normalize_sources, translate_sources, Error,
    FileSystemProvider, Mode, Options, Source,
};

use crate::OutputFormat;

pub(crate) fn cmd_translate(files: &[PathBuf], options: &Options, output: OutputFormat) {
    let sources = read_input(files, output);
    match translate_sources(&sources, options) {
        Ok(program) => print!("{}", program),
        Err(e) => fail(&e, options, output),
    }
}

pub(crate) fn cmd_normalize(files: &[PathBuf], options: &Options, output: OutputFormat) {
    let sources = read_input(files, output);
    match normalize_sources(&sources, options) {
        Ok(description) => println!("{}", description),
        Err(e) => fail(&e, options, output),
    }
}

pub(crate) fn cmd_check_syntax(files: &[PathBuf], options: &Options, output: OutputFormat) {
    let sources = read_input(files, output);
    if let Err(e) = check_syntax(&sources, options) {
        fail(&e, options, output);
    }
}

pub(crate) fn cmd_beautify(files: &[PathBuf], options: &Options, output: OutputFormat) {
    let sources = read_input(files, output);
    match beautify_sources(&sources, options) {
        Ok(description) => println!("{}", description),
        Err(e) => fail(&e, options, output),
    }
}

/// The named files, or standard input when there are none.
fn read_input(files: &[PathBuf], output: OutputFormat) -> Vec<Source> {
    let result = if files.is_empty() {
        log::info!("reading from stdin");
        Source::from_reader("stdin", std::io::stdin().lock()).map(|source| vec![source])
    } else {
        load_sources(&FileSystemProvider, files)
    };

    match result {
        Ok(sources) => sources,
        Err(e) => {
            report(&e, output);
            process::exit(1);
        }
    }
}

fn fail(error: &Error, options: &Options, output: OutputFormat) -> ! {
    report(error, output);
    if error.is_syntax_error() && options.parsing_mode != Mode::Compatibility {
        log::info!("try using --parsing-mode=compatibility for extended legacy feature support");
    }
    if error.is_unknown_language() {
        crate::print_usage();
    }
    process::exit(1);
}

fn report(error: &Error, output: OutputFormat) {
    match output {
        OutputFormat::Text => log::error!("{}", error),
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&error.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", error));
            eprintln!("{}", err_json);
        }
    }
}
