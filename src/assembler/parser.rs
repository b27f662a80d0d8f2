//! The Parser module takes a token stream from the lexer
//! and converts it into a Program.
use std::collections::VecDeque;

use super::ast::*;
use super::diagnostic::SyntaxError;
use super::lexer::{self, Token};

/// Tokenizes and parses a complete source text.
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    Parser::new(lexer::tokenize(source)?).run()
}

pub struct Parser {
    tokens:   VecDeque<Token>,
    lines:    Vec<Line>,
    operands: Vec<String>,
    last:     Position,
}

impl Parser {
    pub fn new(tokens: VecDeque<Token>) -> Self {
        let capacity = tokens.len() / 4;
        Parser {
            tokens,
            lines: Vec::with_capacity(capacity),
            operands: Vec::with_capacity(3),
            last: Position::new(1, 1),
        }
    }

    /// Run the parser, consuming itself and returning the program.
    /// The first syntax error aborts the whole parse.
    pub fn run(mut self) -> Result<Program, SyntaxError> {
        while let Some(line) = self.line()? {
            self.lines.push(line);
        }

        debug!("parsed {} line(s)", self.lines.len());
        Ok(Program { lines: self.lines })
    }

    /// Consumes the tokens of one physical line.
    /// Returns None once the token stream is exhausted.
    fn line(&mut self) -> Result<Option<Line>, SyntaxError> {
        let tok = match self.consume() {
            Some(tok) => tok,
            None => return Ok(None),
        };
        let position = Position::new(tok.position().line, 1);

        let (label, tok) = match tok {
            Token::Label(name, pos) => (Some(Label { name, position: pos }), self.expect()?),
            tok => (None, tok),
        };

        let (statement, tok) = match tok {
            Token::Ident(word, pos) => (Some(self.statement(word, pos)?), self.expect()?),
            tok @ Token::Comment(..) | tok @ Token::Newline(..) => (None, tok),
            tok => return Err(unexpected(&tok, "an instruction")),
        };

        let (comment, tok) = match tok {
            Token::Comment(text, _) => (Some(text), self.expect()?),
            tok => (None, tok),
        };

        match tok {
            Token::Newline(_) => Ok(Some(Line { label, statement, comment, position })),
            tok => Err(unexpected(&tok, "end of line")),
        }
    }

    /// Parses the operands that belong to the given mnemonic.
    fn statement(&mut self, word: String, position: Position) -> Result<Statement, SyntaxError> {
        let mnemonic = match word.parse::<Mnemonic>() {
            Ok(m) => m,
            Err(e) => return Err(SyntaxError::new(position, e)),
        };
        self.operands.clear();

        let instruction = match mnemonic {
            Mnemonic::JP    => Instruction::JP(self.target()?),
            Mnemonic::LD    => self.op_load()?,

            Mnemonic::NEG   |
            Mnemonic::ROUND |
            Mnemonic::FLOOR => self.op_dual_reg(mnemonic)?,

            Mnemonic::ADD   |
            Mnemonic::SUB   |
            Mnemonic::MUL   |
            Mnemonic::DIV   |
            Mnemonic::MOD   => self.op_triple_reg(mnemonic)?,
        };

        trace!("{} {}: {}", position, word, instruction);
        Ok(Statement {
            instruction,
            operands: std::mem::take(&mut self.operands),
            position,
        })
    }

    /// `LD RD, RA` copies a register, `LD RD, #IMM` loads an immediate.
    fn op_load(&mut self) -> Result<Instruction, SyntaxError> {
        let dst = self.register()?;
        self.comma()?;

        match self.expect()? {
            Token::ImmInt(text, pos) => {
                self.operands.push(format!("#{}", text));
                Ok(Instruction::LDI(dst, Immediate::Literal(Literal::new(&text, pos))))
            },
            Token::ImmLabel(name, pos) => {
                self.operands.push(format!("#{}", name));
                Ok(Instruction::LDI(dst, Immediate::Label(name, pos)))
            },
            Token::Ident(name, pos) => {
                let src = as_register(&name, pos)?;
                self.operands.push(name);
                Ok(Instruction::LD(dst, src))
            },
            tok => Err(unexpected(&tok, "a register or an immediate")),
        }
    }

    /// Parses ops with two register operands.
    fn op_dual_reg(&mut self, mnemonic: Mnemonic) -> Result<Instruction, SyntaxError> {
        let a = self.register()?;
        self.comma()?;
        let b = self.register()?;

        match mnemonic {
            Mnemonic::NEG   => Ok(Instruction::NEG(a, b)),
            Mnemonic::ROUND => Ok(Instruction::ROUND(a, b)),
            Mnemonic::FLOOR => Ok(Instruction::FLOOR(a, b)),
            _ => unreachable!("op_dual_reg got {:?} - check all callers", mnemonic),
        }
    }

    /// Parses ops with three register operands.
    fn op_triple_reg(&mut self, mnemonic: Mnemonic) -> Result<Instruction, SyntaxError> {
        let a = self.register()?;
        self.comma()?;
        let b = self.register()?;
        self.comma()?;
        let c = self.register()?;

        match mnemonic {
            Mnemonic::ADD => Ok(Instruction::ADD(a, b, c)),
            Mnemonic::SUB => Ok(Instruction::SUB(a, b, c)),
            Mnemonic::MUL => Ok(Instruction::MUL(a, b, c)),
            Mnemonic::DIV => Ok(Instruction::DIV(a, b, c)),
            Mnemonic::MOD => Ok(Instruction::MOD(a, b, c)),
            _ => unreachable!("op_triple_reg got {:?} - check all callers", mnemonic),
        }
    }

    fn register(&mut self) -> Result<Register, SyntaxError> {
        match self.expect()? {
            Token::Ident(name, pos) => {
                let reg = as_register(&name, pos)?;
                self.operands.push(name);
                Ok(reg)
            },
            tok => Err(unexpected(&tok, "a register")),
        }
    }

    /// A jump target is a bare number or a bare name. Names are never
    /// read as registers here, so `JP r1` jumps to a label called r1.
    fn target(&mut self) -> Result<Target, SyntaxError> {
        match self.expect()? {
            Token::Int(text, pos) => {
                let lit = Literal::new(&text, pos);
                self.operands.push(text);
                Ok(Target::Literal(lit))
            },
            Token::Ident(name, pos) => {
                self.operands.push(name.clone());
                Ok(Target::Label(name, pos))
            },
            tok => Err(unexpected(&tok, "a jump target")),
        }
    }

    fn comma(&mut self) -> Result<(), SyntaxError> {
        match self.expect()? {
            Token::Comma(_) => Ok(()),
            tok => Err(unexpected(&tok, "','")),
        }
    }

    /// Pops a token off the input stream, failing at the end of input.
    fn expect(&mut self) -> Result<Token, SyntaxError> {
        match self.consume() {
            Some(tok) => Ok(tok),
            None => Err(SyntaxError::new(self.last, "unexpected end of input")),
        }
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<Token> {
        let tok = self.tokens.pop_front();
        if let Some(t) = &tok {
            self.last = t.position();
        }
        tok
    }
}

fn as_register(name: &str, position: Position) -> Result<Register, SyntaxError> {
    name.parse::<Register>().map_err(|e| SyntaxError::new(position, e))
}

fn unexpected(tok: &Token, expected: &str) -> SyntaxError {
    SyntaxError::new(tok.position(), format!("expected {}, found {}", expected, tok.describe()))
}
