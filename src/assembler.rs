use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::emitter::Emitter;
use crate::lexer::{LexError, Lexer};
use crate::parser;

/// Failure of a whole assembly run. Lexical errors abort before anything
/// is parsed or emitted; write errors abort emission mid-stream.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Runs the full pipeline: lex the source, parse the token stream, emit
/// machine code to `out`.
pub fn assemble<W: Write>(source: &str, out: W) -> Result<(), AssembleError> {
    let tokens = Lexer::new(source).lex()?;
    let instructions = parser::parse(tokens);
    debug!(instructions = instructions.len(), "emitting");
    Emitter::new(out).assemble(instructions)?;
    Ok(())
}

/// [`assemble`] into a fresh byte buffer.
pub fn assemble_to_vec(source: &str) -> Result<Vec<u8>, AssembleError> {
    let mut out = Vec::new();
    assemble(source, &mut out)?;
    Ok(out)
}
