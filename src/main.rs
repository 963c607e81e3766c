use std::io;
use std::process;

use clap::Parser;
use scrawl::diagnostics;

/// scrawl runs scripts written in a small dynamically-typed language with
/// first-class functions, automatic currying and a simple module system.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the script to run.
    script: String,
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(if e.use_stderr() { 1 } else { 0 });
    });

    let source = std::fs::read_to_string(&args.script).unwrap_or_else(|_| {
        eprintln!("Cannot find file {}", args.script);
        process::exit(1);
    });

    if let Err(error) = scrawl::run_source(&source) {
        let _ = diagnostics::render(&source, &error, &mut io::stderr());
        process::exit(1);
    }
}
