//! Turns instructions into machine words.
//!
//! A word is the instruction's opcode base plus three decimal digits of
//! operand encoding: `D A B` for register forms, `D` followed by a two
//! digit immediate for LDI, and a two digit address for JP.
use super::ast::*;
use super::diagnostic::Diagnostics;
use super::symbols::SymbolTable;

/// Largest literal that fits the two digit immediate and address fields.
pub const MAX_LITERAL: i64 = 99;

pub struct Encoder<'a> {
    symbols: &'a SymbolTable,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Encoder<'a> {
    pub fn new(symbols: &'a SymbolTable, diagnostics: &'a mut Diagnostics) -> Self {
        Encoder { symbols, diagnostics }
    }

    /// Assembles the given instruction into its word. Out of range
    /// literals and unknown labels are reported and replaced, so this
    /// always produces a value.
    pub fn encode(&mut self, instruction: &Instruction) -> Word {
        use Instruction::*;
        let operands = match instruction {
            ADD(dst, a, b) |
            SUB(dst, a, b) |
            MUL(dst, a, b) |
            DIV(dst, a, b) |
            MOD(dst, a, b)   => word_3addr(*dst, *a, *b),

            LD   (dst, a) |
            NEG  (dst, a) |
            ROUND(dst, a) |
            FLOOR(dst, a)    => word_2addr(*dst, *a),

            LDI(dst, imm)    => {
                let imm = self.immediate(imm);
                word_dstimm(*dst, imm)
            },
            JP(target)       => self.target(target),
        };
        instruction.opcode_base() + operands
    }

    fn immediate(&mut self, imm: &Immediate) -> Word {
        match imm {
            Immediate::Literal(lit)       => self.literal(lit),
            Immediate::Label(name, pos)   => self.label(name, *pos),
        }
    }

    fn target(&mut self, target: &Target) -> Word {
        match target {
            Target::Literal(lit)          => self.literal(lit),
            Target::Label(name, pos)      => self.label(name, *pos),
        }
    }

    /// Clamps a literal into 0..=99.
    fn literal(&mut self, lit: &Literal) -> Word {
        if lit.value < 0 {
            self.diagnostics.report(lit.position,
                format!("literal {} must be non-negative", lit.text));
            0
        } else if lit.value > MAX_LITERAL {
            self.diagnostics.report(lit.position,
                format!("literal {} must be less than {}", lit.text, MAX_LITERAL + 1));
            MAX_LITERAL as Word
        } else {
            lit.value as Word
        }
    }

    /// Resolves a label to its address, or 0 if it was never defined.
    fn label(&mut self, name: &str, position: Position) -> Word {
        match self.symbols.lookup(name) {
            Some(addr) => addr,
            None => {
                self.diagnostics.report(position, format!("unknown label '{}'", name));
                0
            }
        }
    }
}

fn word_3addr(dst: Register, src1: Register, src2: Register) -> Word {
    dst.digit() * 100 + src1.digit() * 10 + src2.digit()
}

fn word_2addr(dst: Register, src1: Register) -> Word {
    dst.digit() * 100 + src1.digit() * 10
}

fn word_dstimm(dst: Register, imm: Word) -> Word {
    dst.digit() * 100 + imm
}
