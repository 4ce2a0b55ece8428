use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::exit;

use treelox as lox;

use clap::Parser as ClapParser;

use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lox script to run; starts an interactive session when omitted
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,

        Err(e) if e.use_stderr() => {
            // sysexits-style usage error
            let _ = e.print();
            exit(64);
        }

        // --help / --version
        Err(e) => {
            let _ = e.print();
            return Ok(());
        }
    };

    match args.script {
        Some(path) => run_file(&path),

        None => run_prompt(),
    }
}

/// Run a script once.  Exit codes: 65 for lex/parse/resolve errors, 70 for a
/// runtime error, 0 on success.
fn run_file(path: &PathBuf) -> anyhow::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    let mut reader: BufReader<File> = BufReader::new(File::open(path)?);
    reader.read_to_end(&mut buf)?;

    let (tokens, scan_errors) = Scanner::new(buf).scan_tokens();

    for e in &scan_errors {
        eprintln!("{}", e);
    }

    let (statements, parse_errors) = Parser::new(tokens).parse();

    for e in &parse_errors {
        eprintln!("{}", e);
    }

    if !scan_errors.is_empty() || !parse_errors.is_empty() {
        exit(65);
    }

    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);

    if let Err(e) = Resolver::new(&mut interpreter).resolve(&statements) {
        eprintln!("{}", e);
        exit(65);
    }

    if let Err(e) = interpreter.interpret(&statements) {
        eprintln!("{}", e);
        exit(70);
    }

    Ok(())
}

/// Interactive session.  Each line runs through the full pipeline against a
/// persistent interpreter; errors are reported and the prompt continues.
fn run_prompt() -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();

        if stdin.read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        run_line(line.into_bytes(), &mut interpreter);
    }

    Ok(())
}

fn run_line(source: Vec<u8>, interpreter: &mut Interpreter<'_>) {
    let (tokens, scan_errors) = Scanner::new(source).scan_tokens();

    for e in &scan_errors {
        eprintln!("{}", e);
    }

    let (statements, parse_errors) = Parser::new(tokens).parse();

    for e in &parse_errors {
        eprintln!("{}", e);
    }

    if !scan_errors.is_empty() || !parse_errors.is_empty() {
        return;
    }

    if let Err(e) = Resolver::new(interpreter).resolve(&statements) {
        eprintln!("{}", e);
        return;
    }

    if let Err(e) = interpreter.interpret(&statements) {
        eprintln!("{}", e);
    }
}
