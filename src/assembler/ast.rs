//! This AST describes a parsed AEGIS assembly file.
//!
//! A program is a list of lines. Every line may carry a label,
//! a single instruction and a comment, in that order.
//! Comments are prefixed with semicolons (;) and are single-line only.
//!
//! Supported Instructions:
//!
//! ```nasm
//! ADD   RD, RA, RB  ; RD <= RA + RB
//! LD    RD, RA      ; RD <= RA
//! LD    RD, #IMM    ; RD <= IMM (0-99, or the address of a label)
//! NEG   RD, RA      ; RD <= -RA
//! SUB   RD, RA, RB  ; RD <= RA - RB
//! MUL   RD, RA, RB  ; RD <= RA * RB
//! DIV   RD, RA, RB  ; RD <= RA / RB
//! MOD   RD, RA, RB  ; RD <= RA % RB (REM is accepted as well)
//! ROUND RD, RA      ; RD <= round(RA)
//! FLOOR RD, RA      ; RD <= floor(RA)
//! JP    TARGET      ; Jump to an address or label
//! ```
//!
//! Registers are R0 through R9. PC is an alias for the register in slot 9.
//!
//! Example source file:
//!
//! ```nasm
//! loop:    LD r3, #10          ; divisor
//!          DIV r1, r2, r3      ; r1 = r2 / 10
//!          JP loop
//! ```

use std::fmt;
use std::str::FromStr;

/// The address of an assembled word.
pub type Address = u32;

/// An assembled machine word.
pub type Word = u32;

/// A 1-based line and column in the source text.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parsed program. Lines appear in source order, including blank ones.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Program {
    pub lines: Vec<Line>,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub label: Option<Label>,
    pub statement: Option<Statement>,
    /// The raw comment text, including the leading semicolon.
    pub comment: Option<String>,
    pub position: Position,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.label.is_none() && self.statement.is_none() && self.comment.is_none()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Label {
    pub name: String,
    pub position: Position,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Statement {
    pub instruction: Instruction,
    /// Operands exactly as they were written, used for the listing.
    pub operands: Vec<String>,
    pub position: Position,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    ADD  (Register, Register, Register),
    LD   (Register, Register),
    LDI  (Register, Immediate),
    NEG  (Register, Register),
    SUB  (Register, Register, Register),
    MUL  (Register, Register, Register),
    DIV  (Register, Register, Register),
    MOD  (Register, Register, Register),
    ROUND(Register, Register),
    FLOOR(Register, Register),
    JP   (Target),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Instruction {
    /// Returns the fixed value the operand encoding is added to.
    pub fn opcode_base(&self) -> Word {
        use Instruction::*;
        match self {
            ADD(..)   => 0,
            LD(..)    => 0,
            NEG(..)   => 1000,
            SUB(..)   => 2000,
            MUL(..)   => 3000,
            DIV(..)   => 4000,
            MOD(..)   => 5000,
            ROUND(..) => 6000,
            LDI(..)   => 7000,
            JP(..)    => 7900,
            FLOOR(..) => 8000,
        }
    }

    /// The name shown in the listing. Aliases are reported by their
    /// canonical form, so REM lists as `mod`.
    pub fn name(&self) -> &'static str {
        use Instruction::*;
        match self {
            ADD(..)   => "add",
            LD(..)    => "ld",
            LDI(..)   => "ldi",
            NEG(..)   => "neg",
            SUB(..)   => "sub",
            MUL(..)   => "mul",
            DIV(..)   => "div",
            MOD(..)   => "mod",
            ROUND(..) => "round",
            FLOOR(..) => "floor",
            JP(..)    => "jp",
        }
    }
}

/// Instruction keywords as they appear in the source.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    ADD,
    LD,
    NEG,
    SUB,
    MUL,
    DIV,
    MOD,
    ROUND,
    FLOOR,
    JP,
}

impl FromStr for Mnemonic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Mnemonic::*;
        match s {
            "ADD"         => Ok(ADD),
            "LD"          => Ok(LD),
            "NEG"         => Ok(NEG),
            "SUB"         => Ok(SUB),
            "MUL"         => Ok(MUL),
            "DIV"         => Ok(DIV),
            "MOD" | "REM" => Ok(MOD),
            "ROUND"       => Ok(ROUND),
            "FLOOR"       => Ok(FLOOR),
            "JP"          => Ok(JP),
            _ => Err(format!("unknown mnemonic '{}'", s)),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    PC,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

impl FromStr for Register {
    type Err = String;

    /// Register names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Register::*;
        match s.to_ascii_uppercase().as_str() {
            "R0" => Ok(R0),
            "R1" => Ok(R1),
            "R2" => Ok(R2),
            "R3" => Ok(R3),
            "R4" => Ok(R4),
            "R5" => Ok(R5),
            "R6" => Ok(R6),
            "R7" => Ok(R7),
            "R8" => Ok(R8),
            "R9" => Ok(R9),
            "PC" => Ok(PC),
            _ => Err(format!("expected a register (R0-R9 or PC), found '{}'", s)),
        }
    }
}

impl Register {
    /// The decimal digit this register occupies in an instruction word.
    /// PC shares slot 9 with R9.
    pub fn digit(&self) -> Word {
        use Register::*;
        match self {
            R0 => 0,
            R1 => 1,
            R2 => 2,
            R3 => 3,
            R4 => 4,
            R5 => 5,
            R6 => 6,
            R7 => 7,
            R8 => 8,
            R9 | PC => 9,
        }
    }
}

/// The second operand of `LD RD, #IMM`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Immediate {
    Literal(Literal),
    Label(String, Position),
}

/// The operand of `JP`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Target {
    Literal(Literal),
    Label(String, Position),
}

/// An integer literal as written. The text is kept so that diagnostics
/// can quote values that do not fit the range of `value`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Literal {
    pub value: i64,
    pub text: String,
    pub position: Position,
}

impl Literal {
    /// Parses a decimal literal with an optional leading minus sign.
    /// Values beyond the range of an i64 saturate.
    pub fn new(text: &str, position: Position) -> Self {
        let value = match text.parse::<i64>() {
            Ok(v) => v,
            Err(_) if text.starts_with('-') => i64::MIN,
            Err(_) => i64::MAX,
        };
        Literal { value, text: text.to_owned(), position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_from_str() {
        assert_eq!("R0".parse::<Register>(), Ok(Register::R0));
        assert_eq!("r7".parse::<Register>(), Ok(Register::R7));
        assert_eq!("pc".parse::<Register>(), Ok(Register::PC));
        assert_eq!("Pc".parse::<Register>(), Ok(Register::PC));
        assert!("R10".parse::<Register>().is_err());
        assert!("R".parse::<Register>().is_err());
        assert!("loop".parse::<Register>().is_err());
    }

    #[test]
    fn test_register_digit() {
        let regs = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"];
        for (i, name) in regs.iter().enumerate() {
            assert_eq!(name.parse::<Register>().unwrap().digit(), i as Word);
        }
        assert_eq!(Register::PC.digit(), Register::R9.digit());
    }

    #[test]
    fn test_mnemonic_from_str() {
        assert_eq!("MOD".parse::<Mnemonic>(), Ok(Mnemonic::MOD));
        assert_eq!("REM".parse::<Mnemonic>(), Ok(Mnemonic::MOD));
        assert_eq!("JP".parse::<Mnemonic>(), Ok(Mnemonic::JP));
        assert!("jp".parse::<Mnemonic>().is_err());
        assert!("NOP".parse::<Mnemonic>().is_err());
    }

    #[test]
    fn test_literal_new() {
        let pos = Position::new(1, 1);
        assert_eq!(Literal::new("42", pos).value, 42);
        assert_eq!(Literal::new("-3", pos).value, -3);
        assert_eq!(Literal::new("99999999999999999999", pos).value, i64::MAX);
        assert_eq!(Literal::new("-99999999999999999999", pos).value, i64::MIN);
        assert_eq!(Literal::new("007", pos).text, "007");
    }

    #[test]
    fn test_opcode_base() {
        use super::Register::*;
        assert_eq!(Instruction::ADD(R0, R0, R0).opcode_base(), 0);
        assert_eq!(Instruction::LD(R0, R0).opcode_base(), 0);
        assert_eq!(Instruction::FLOOR(R0, R0).opcode_base(), 8000);
        let target = Target::Label("loop".to_owned(), Position::new(1, 4));
        assert_eq!(Instruction::JP(target).opcode_base(), 7900);
    }
}
