//! This lexer tokenizes AEGIS assembly.
use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::Position;
use super::diagnostic::SyntaxError;

// Tokens are tuples of the token text and the position it starts at.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    /// An identifier immediately followed by a colon. The colon is not kept.
    Label(String, Position),
    /// A bare identifier: a mnemonic, a register or a jump target.
    Ident(String, Position),
    /// A bare integer literal.
    Int(String, Position),
    /// `#` followed by an integer literal. The `#` is not kept.
    ImmInt(String, Position),
    /// `#` followed by an identifier. The `#` is not kept.
    ImmLabel(String, Position),
    Comma(Position),
    /// Everything from the semicolon to the end of the line.
    Comment(String, Position),
    Newline(Position),
}

impl Token {
    pub fn position(&self) -> Position {
        use Token::*;
        match self {
            Label(_, pos) | Ident(_, pos) | Int(_, pos) |
            ImmInt(_, pos) | ImmLabel(_, pos) | Comment(_, pos) => *pos,
            Comma(pos) | Newline(pos) => *pos,
        }
    }

    /// A short description of the token for error messages.
    pub fn describe(&self) -> String {
        use Token::*;
        match self {
            Label(s, _)    => format!("label '{}:'", s),
            Ident(s, _)    => format!("'{}'", s),
            Int(s, _)      => format!("integer {}", s),
            ImmInt(s, _)   => format!("immediate #{}", s),
            ImmLabel(s, _) => format!("immediate #{}", s),
            Comma(_)       => "','".to_owned(),
            Comment(_, _)  => "comment".to_owned(),
            Newline(_)     => "end of line".to_owned(),
        }
    }
}

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?P<space>[ \t]+)",
        r"|(?P<comment>;.*)",
        r"|(?P<comma>,)",
        r"|(?P<label>[A-Za-z_][A-Za-z0-9_]*):",
        r"|#(?P<immint>-?[0-9]+)\b",
        r"|#(?P<immlabel>[A-Za-z_][A-Za-z0-9_]*)",
        r"|(?P<int>-?[0-9]+)\b",
        r"|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)",
        r")"
    ))
    .unwrap()
});

/// Splits the source into tokens. Every physical line, including the
/// last one, ends with a `Newline` token, so an empty source produces
/// no tokens at all.
pub fn tokenize(source: &str) -> Result<VecDeque<Token>, SyntaxError> {
    let mut tokens: VecDeque<Token> = VecDeque::with_capacity(256);

    for (index, line) in source.lines().enumerate() {
        let mut toks = tokenize_line(line, index + 1)?;
        tokens.append(&mut toks);
    }

    trace!("tokenized {} token(s)", tokens.len());
    Ok(tokens)
}

fn tokenize_line(line: &str, line_num: usize) -> Result<VecDeque<Token>, SyntaxError> {
    let mut out: VecDeque<Token> = VecDeque::with_capacity(8);
    let mut offset = 0;

    while offset < line.len() {
        let rest = &line[offset..];
        let pos = Position::new(line_num, column(line, offset));

        let caps = match TOKEN.captures(rest) {
            Some(caps) => caps,
            None => {
                let c = rest.chars().next().unwrap_or(' ');
                return Err(SyntaxError::new(pos, format!("unexpected character '{}'", c)));
            }
        };

        let text = |name: &str| caps.name(name).map(|m| m.as_str().to_owned());

        if let Some(s) = text("comment") {
            out.push_back(Token::Comment(s, pos));
        } else if caps.name("comma").is_some() {
            out.push_back(Token::Comma(pos));
        } else if let Some(s) = text("label") {
            out.push_back(Token::Label(s, pos));
        } else if let Some(s) = text("immint") {
            out.push_back(Token::ImmInt(s, pos));
        } else if let Some(s) = text("immlabel") {
            out.push_back(Token::ImmLabel(s, pos));
        } else if let Some(s) = text("int") {
            out.push_back(Token::Int(s, pos));
        } else if let Some(s) = text("ident") {
            out.push_back(Token::Ident(s, pos));
        }
        // Whitespace only bounds tokens.

        offset += caps[0].len();
    }

    out.push_back(Token::Newline(Position::new(line_num, column(line, line.len()))));
    Ok(out)
}

/// Converts a byte offset into a 1-based character column.
fn column(line: &str, offset: usize) -> usize {
    line[..offset].chars().count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_tokenize_line() {
        let v: VecDeque<Token> = VecDeque::from(vec![
            Token::Label("loop".to_owned(), p(1, 1)),
            Token::Ident("LD".to_owned(), p(1, 10)),
            Token::Ident("r3".to_owned(), p(1, 13)),
            Token::Comma(p(1, 15)),
            Token::ImmInt("10".to_owned(), p(1, 17)),
            Token::Comment("; divisor".to_owned(), p(1, 30)),
            Token::Newline(p(1, 39)),
        ]);
        assert_eq!(tokenize_line("loop:    LD r3, #10          ; divisor", 1), Ok(v));

        let v: VecDeque<Token> = VecDeque::from(vec![
            Token::Ident("JP".to_owned(), p(4, 2)),
            Token::Int("12".to_owned(), p(4, 5)),
            Token::Newline(p(4, 7)),
        ]);
        assert_eq!(tokenize_line(" JP 12", 4), Ok(v));

        let v: VecDeque<Token> = VecDeque::from(vec![
            Token::Ident("LD".to_owned(), p(1, 1)),
            Token::Ident("r1".to_owned(), p(1, 4)),
            Token::Comma(p(1, 6)),
            Token::ImmLabel("end".to_owned(), p(1, 7)),
            Token::Newline(p(1, 11)),
        ]);
        assert_eq!(tokenize_line("LD r1,#end", 1), Ok(v));
    }

    #[test]
    fn test_tokenize_line_negative_literals() {
        let v: VecDeque<Token> = VecDeque::from(vec![
            Token::Ident("LD".to_owned(), p(1, 1)),
            Token::Ident("r1".to_owned(), p(1, 4)),
            Token::Comma(p(1, 6)),
            Token::ImmInt("-5".to_owned(), p(1, 7)),
            Token::Newline(p(1, 10)),
        ]);
        assert_eq!(tokenize_line("LD r1,#-5", 1), Ok(v));
    }

    #[test]
    fn test_label_needs_adjacent_colon() {
        let err = tokenize_line("loop : JP loop", 1).unwrap_err();
        assert_eq!(err.position, p(1, 6));

        let toks = tokenize_line("  loop:JP loop", 1).unwrap();
        assert_eq!(toks[0], Token::Label("loop".to_owned(), p(1, 3)));
        assert_eq!(toks[1], Token::Ident("JP".to_owned(), p(1, 8)));
    }

    #[test]
    fn test_comment_columns_count_characters() {
        let toks = tokenize_line("; r1 = \u{230a}r2 / 10\u{230b} ; x", 2).unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[1], Token::Newline(p(2, 21)));
    }

    #[test]
    fn test_invalid_characters() {
        let err = tokenize_line("LD r1, @4", 3).unwrap_err();
        assert_eq!(err.position, p(3, 8));

        // Digits running into letters are neither a number nor a name.
        assert!(tokenize_line("JP 12abc", 1).is_err());
        assert!(tokenize_line("LD r1, #1x", 1).is_err());
        assert!(tokenize_line("LD r1, #", 1).is_err());
    }

    #[test]
    fn test_tokenize() {
        let asm_input = "
loop: LD r3, #10
      JP loop
";
        let v: VecDeque<Token> = VecDeque::from(vec![
            Token::Newline(p(1, 1)),
            Token::Label("loop".to_owned(), p(2, 1)),
            Token::Ident("LD".to_owned(), p(2, 7)),
            Token::Ident("r3".to_owned(), p(2, 10)),
            Token::Comma(p(2, 12)),
            Token::ImmInt("10".to_owned(), p(2, 14)),
            Token::Newline(p(2, 17)),
            Token::Ident("JP".to_owned(), p(3, 7)),
            Token::Ident("loop".to_owned(), p(3, 10)),
            Token::Newline(p(3, 14)),
        ]);

        assert_eq!(tokenize(asm_input), Ok(v));
    }

    #[test]
    fn test_tokenize_crlf_and_missing_final_newline() {
        let toks = tokenize("JP 1\r\nJP 2").unwrap();
        let newlines = toks.iter().filter(|t| matches!(t, Token::Newline(_))).count();
        assert_eq!(newlines, 2);
        assert_eq!(toks[2], Token::Newline(p(1, 5)));
        assert!(tokenize("").unwrap().is_empty());
    }
}
