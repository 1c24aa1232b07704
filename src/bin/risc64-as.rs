use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use risc64_as::emitter::Emitter;
use risc64_as::lexer::Lexer;
use risc64_as::parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "risc64 single-pass assembler")]
struct Opts {
    /// Input assembly file (defaults to standard input)
    #[arg(value_name = "ASMFILE")]
    input: Option<PathBuf>,
    /// Output binary file (defaults to standard output)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print the parsed instruction list as JSON to stderr before emitting
    #[arg(long)]
    dump_ir: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();

    let source = match &opts.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("couldn't open input file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("couldn't read standard input")?;
            buf
        }
    };

    let tokens = Lexer::new(&source).lex().context("assembly terminated")?;
    let instructions = parser::parse(tokens);

    if opts.dump_ir {
        let listing: Vec<_> = instructions.iter().collect();
        eprintln!("{}", serde_json::to_string_pretty(&listing)?);
    }

    // Machine code goes to the sink chosen here; logs stay on stderr.
    let sink: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("couldn't open output file {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };
    Emitter::new(sink)
        .assemble(instructions)
        .context("assembly terminated")?;
    Ok(())
}
