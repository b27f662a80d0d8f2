//! The Assembler module is in charge of taking an
//! AEGIS source text and producing a listing of
//! decimal machine words.
//!
//! It does this by implementing a regex driven tokenizer,
//! a non-lookahead recursive descent parser and a
//! two-pass driver that resolves labels before encoding.

pub mod ast;
pub mod diagnostic;
pub mod driver;
pub mod encoder;
pub mod lexer;
pub mod parser;
pub mod symbols;

pub use self::diagnostic::{Diagnostic, SyntaxError};
pub use self::driver::{Assembler, Assembly};

/// The program shown when no source is given.
pub const SAMPLE_PROGRAM: &str = "
loop:    LD r3, #10          ; divisor
         DIV r1, r2, r3      ; r1 = r2 / 10
         MOD r2, r2, r3      ; r2 = r2 % 10
         FLOOR r1, r1        ; r1 = \u{230a}r2 / 10\u{230b}
         JP loop
";

/// Parses and assembles a source text with a fresh assembler.
pub fn assemble(source: &str) -> Result<Assembly, SyntaxError> {
    let program = parser::parse(source)?;
    Ok(Assembler::new().assemble(&program))
}
