pub mod assembler;
pub mod emitter;
pub mod instruction;
pub mod isa;
pub mod lexer;
pub mod parser;
pub mod stream;

pub use assembler::{assemble, assemble_to_vec, AssembleError};
pub use emitter::Emitter;
pub use instruction::{Instruction, Mnemonic, Operand};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use stream::Stream;
