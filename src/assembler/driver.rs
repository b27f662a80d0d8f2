//! The two-pass assembler.
//!
//! Pass one walks the program and records the address of every label.
//! Pass two walks it again, encodes each statement and writes one
//! listing row per non-blank line. Both passes count addresses the same
//! way: a line advances the counter by one if, and only if, it holds a
//! statement.
use super::ast::*;
use super::diagnostic::{Diagnostic, Diagnostics};
use super::encoder::Encoder;
use super::symbols::SymbolTable;

pub const NAME: &str = "AEGIS BrickRigs CPU 0.6 Assembler";

/// The result of assembling one program.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Assembly {
    pub listing: String,
    /// Every assembled word with its address, in address order.
    pub words: Vec<(Address, Word)>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns all state of an assembly run. Each call to `assemble` starts
/// from scratch, so one value can be reused for any number of programs.
#[derive(Debug)]
pub struct Assembler {
    symbols: SymbolTable,
    listing: String,
    words: Vec<(Address, Word)>,
    diagnostics: Diagnostics,
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        let mut asm = Assembler {
            symbols: SymbolTable::new(),
            listing: String::new(),
            words: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
        asm.clear();
        asm
    }

    /// Drops everything left over from the previous run.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.words.clear();
        self.diagnostics.clear();
        self.listing.clear();
        self.listing.push_str(&header());
    }

    /// The labels of the most recently assembled program.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn assemble(&mut self, program: &Program) -> Assembly {
        self.clear();

        let bound = self.collect_labels(program);
        self.emit(program, &bound);
        debug!("pass 2: {} diagnostic(s)", self.diagnostics.len());

        Assembly {
            listing: std::mem::take(&mut self.listing),
            words: std::mem::take(&mut self.words),
            diagnostics: self.diagnostics.take(),
        }
    }

    /// Pass one. Fills the symbol table and returns, for every line, the
    /// address its label was bound to.
    fn collect_labels(&mut self, program: &Program) -> Vec<Option<Address>> {
        let mut address: Address = 0;
        let mut bound_at = Vec::with_capacity(program.lines.len());

        for line in program.iter() {
            let bound = match &line.label {
                Some(label) => {
                    self.symbols.record(&label.name, address);
                    Some(address)
                },
                None => None,
            };
            if line.statement.is_some() {
                address += 1;
            }
            bound_at.push(bound);
        }

        debug!("pass 1: {} label(s), {} word(s)", self.symbols.len(), address);
        bound_at
    }

    /// Pass two. Encodes statements and builds the listing.
    fn emit(&mut self, program: &Program, bound_at: &[Option<Address>]) {
        let mut address: Address = 0;

        for (line, bound) in program.iter().zip(bound_at) {
            let word = match &line.statement {
                Some(stmt) => {
                    let word = Encoder::new(&self.symbols, &mut self.diagnostics)
                        .encode(&stmt.instruction);
                    self.words.push((address, word));
                    Some(word)
                },
                None => None,
            };

            if !line.is_blank() {
                self.listing.push_str(&listing_row(address, word, line));
            }

            if let Some(label) = &line.label {
                assert_eq!(*bound, Some(address),
                    "label '{}' at {} resolved differently in the two passes",
                    label.name, label.position);
            }

            if line.statement.is_some() {
                address += 1;
            }
        }
    }
}

fn header() -> String {
    format!("; {}\n;\n", NAME)
}

/// Formats a single listing row:
/// address, word, label, mnemonic and operands, then the comment.
fn listing_row(address: Address, word: Option<Word>, line: &Line) -> String {
    let word = word.map(|w| w.to_string()).unwrap_or_default();
    let label = line.label.as_ref().map(|l| l.name.as_str()).unwrap_or("");
    let (name, operands) = match &line.statement {
        Some(stmt) => (stmt.instruction.name(), stmt.operands.join(", ")),
        None => ("", String::new()),
    };
    let inops = format!("{:<5} {}", name, operands);
    let comment = line.comment.as_deref().unwrap_or("");

    format!("{:0>2} {:>4} {:<8}  {:<20} {}\n", address, word, label, inops, comment)
}
