//! Scanner for Zoe source text.
//!
//! Produces the full token sequence eagerly plus a list of positioned
//! diagnostics. Scanning never aborts: an unrecognised byte is reported,
//! skipped, and scanning resumes on the next byte.

use num_bigint::BigInt;

mod error;
mod token;

pub use error::LexError;
pub use token::{Span, Token, TokenKind};

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    diagnostics: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
            diagnostics: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            self.skip_whitespace_and_comments();
            let start = self.pos;
            let (line, column) = self.position_at(start);
            let ch = self.peek_char()?;

            if let Some(kind) = self.try_consume_operator(ch) {
                return Some(self.token(kind, start, line, column));
            }

            match ch {
                '"' => {
                    if let Some(kind) = self.read_string(line, column) {
                        return Some(self.token(kind, start, line, column));
                    }
                    // Unterminated string: diagnostic recorded, resume scanning.
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let kind = self.read_identifier(start);
                    return Some(self.token(kind, start, line, column));
                }
                c if c.is_ascii_digit() => {
                    let kind = self.read_number(start, line, column);
                    return Some(self.token(kind, start, line, column));
                }
                other => {
                    self.diagnostics.push(LexError::UnexpectedCharacter {
                        character: other,
                        line,
                        column,
                    });
                    self.consume_char();
                }
            }
        }
    }

    fn token(&self, kind: TokenKind<'a>, start: usize, line: usize, column: usize) -> Token<'a> {
        Token::new(
            kind,
            Span {
                start,
                end: self.pos,
                line,
                column,
            },
        )
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.consume_while(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
            if self.peek_char() == Some('/') && self.char_at(self.pos + 1) == Some('/') {
                self.consume_while(|c| c != '\n');
                continue;
            }
            break;
        }
    }

    fn try_consume_operator(&mut self, ch: char) -> Option<TokenKind<'a>> {
        let kind = match ch {
            '=' => {
                self.consume_char();
                if self.peek_char() == Some('=') {
                    self.consume_char();
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                self.consume_char();
                if self.peek_char() == Some('=') {
                    self.consume_char();
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            _ => return None,
        };
        if !matches!(
            kind,
            TokenKind::Equal | TokenKind::EqualEqual | TokenKind::Bang | TokenKind::BangEqual
        ) {
            self.consume_char();
        }
        Some(kind)
    }

    fn read_identifier(&mut self, start: usize) -> TokenKind<'a> {
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let ident = &self.input[start..self.pos];
        match ident {
            "var" => TokenKind::Var,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            "fn" => TokenKind::Fn,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            _ => TokenKind::Identifier(ident),
        }
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> TokenKind<'a> {
        self.consume_while(|c| c.is_ascii_digit());

        if self.peek_char() == Some('.') {
            if self.char_at(self.pos + 1).is_some_and(|c| c.is_ascii_digit()) {
                self.consume_char();
                self.consume_while(|c| c.is_ascii_digit());
                let literal = &self.input[start..self.pos];
                match literal.parse::<f64>() {
                    Ok(value) => return TokenKind::Float(value),
                    Err(_) => {
                        self.diagnostics
                            .push(LexError::MalformedNumber { line, column });
                        return TokenKind::Float(0.0);
                    }
                }
            }
            // A bare trailing dot is not a float and integers have no fields.
            self.consume_char();
            self.diagnostics
                .push(LexError::MalformedNumber { line, column });
        }

        let digits = self.input[start..self.pos].trim_end_matches('.');
        match BigInt::parse_bytes(digits.as_bytes(), 10) {
            Some(value) => TokenKind::Integer(value),
            None => {
                self.diagnostics
                    .push(LexError::MalformedNumber { line, column });
                TokenKind::Integer(BigInt::from(0))
            }
        }
    }

    /// Reads a string literal body after the opening quote, processing the
    /// escapes `\\`, `\"`, `\n`, `\t`. Returns `None` when the literal never
    /// closes; the diagnostic has already been recorded.
    fn read_string(&mut self, line: usize, column: usize) -> Option<TokenKind<'a>> {
        self.consume_char(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    self.diagnostics
                        .push(LexError::UnterminatedString { line, column });
                    return None;
                }
                Some('"') => {
                    self.consume_char();
                    return Some(TokenKind::String(value));
                }
                Some('\\') => {
                    let (escape_line, escape_column) = self.position_at(self.pos);
                    self.consume_char();
                    match self.peek_char() {
                        None | Some('\n') => {
                            self.diagnostics
                                .push(LexError::UnterminatedString { line, column });
                            return None;
                        }
                        Some(escape) => {
                            self.consume_char();
                            match escape {
                                '\\' => value.push('\\'),
                                '"' => value.push('"'),
                                'n' => value.push('\n'),
                                't' => value.push('\t'),
                                other => {
                                    self.diagnostics.push(LexError::InvalidEscape {
                                        escape: other,
                                        line: escape_line,
                                        column: escape_column,
                                    });
                                    value.push(other);
                                }
                            }
                        }
                    }
                }
                Some(other) => {
                    self.consume_char();
                    value.push(other);
                }
            }
        }
    }

    fn consume_while<P>(&mut self, keep_predicate: P)
    where
        P: Fn(char) -> bool,
    {
        while let Some(c) = self.peek_char() {
            if !keep_predicate(c) {
                break;
            }
            self.consume_char();
        }
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.input.len() {
            None
        } else {
            self.input[index..].chars().next()
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn position_at(&self, index: usize) -> (usize, usize) {
        (self.line, index - self.line_start + 1)
    }
}

/// Scans the whole input. Always returns the token sequence (terminated by
/// an EOF sentinel) together with every diagnostic encountered.
pub fn tokenize(input: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    let eof_start = lexer.pos;
    let (line, column) = lexer.position_at(eof_start);
    tokens.push(Token::new(
        TokenKind::Eof,
        Span {
            start: eof_start,
            end: eof_start,
            line,
            column,
        },
    ));
    (tokens, lexer.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        let (tokens, diagnostics) = tokenize(input);
        assert_eq!(diagnostics, Vec::new(), "unexpected diagnostics");
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn scans_simple_program() {
        let input = indoc! {r#"
            var x = 1 + 2 * 3;
            print(x);
        "#};
        let expected = vec![
            TokenKind::Var,
            TokenKind::Identifier("x"),
            TokenKind::Equal,
            TokenKind::Integer(BigInt::from(1)),
            TokenKind::Plus,
            TokenKind::Integer(BigInt::from(2)),
            TokenKind::Star,
            TokenKind::Integer(BigInt::from(3)),
            TokenKind::Semicolon,
            TokenKind::Identifier("print"),
            TokenKind::LParen,
            TokenKind::Identifier("x"),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn scans_two_character_operators() {
        let expected = vec![
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Equal,
            TokenKind::Bang,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Eof,
        ];
        assert_eq!(kinds("== != = ! < >"), expected);
    }

    #[test]
    fn distinguishes_floats_integers_and_member_dots() {
        assert_eq!(
            kinds("1.5 12 strings.len"),
            vec![
                TokenKind::Float(1.5),
                TokenKind::Integer(BigInt::from(12)),
                TokenKind::Identifier("strings"),
                TokenKind::Dot,
                TokenKind::Identifier("len"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        let input = indoc! {r#"
            // leading comment
            var x = 1; // trailing comment
        "#};
        let expected = vec![
            TokenKind::Var,
            TokenKind::Identifier("x"),
            TokenKind::Equal,
            TokenKind::Integer(BigInt::from(1)),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn processes_string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\t\"c\"\\""#),
            vec![
                TokenKind::String("a\nb\t\"c\"\\".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keeps_non_ascii_inside_string_literals() {
        assert_eq!(
            kinds("\"héllo\""),
            vec![TokenKind::String("héllo".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn records_unexpected_character_and_continues() {
        let (tokens, diagnostics) = tokenize("var x @ = 1;");
        assert_eq!(
            diagnostics,
            vec![LexError::UnexpectedCharacter {
                character: '@',
                line: 1,
                column: 7,
            }]
        );
        let scanned = tokens.into_iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(
            scanned,
            vec![
                TokenKind::Var,
                TokenKind::Identifier("x"),
                TokenKind::Equal,
                TokenKind::Integer(BigInt::from(1)),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn records_unterminated_string() {
        let (tokens, diagnostics) = tokenize("var s = \"abc\nvar y = 2;");
        assert_eq!(
            diagnostics,
            vec![LexError::UnterminatedString { line: 1, column: 9 }]
        );
        // Scanning resumes on the next line.
        assert!(tokens.iter().any(|token| token.kind == TokenKind::Identifier("y")));
    }

    #[test]
    fn records_malformed_number() {
        let (tokens, diagnostics) = tokenize("var x = 1.;");
        assert_eq!(
            diagnostics,
            vec![LexError::MalformedNumber { line: 1, column: 9 }]
        );
        assert!(
            tokens
                .iter()
                .any(|token| token.kind == TokenKind::Integer(BigInt::from(1)))
        );
    }

    #[test]
    fn records_invalid_escape_and_keeps_character() {
        let (tokens, diagnostics) = tokenize(r#""a\qb""#);
        assert_eq!(
            diagnostics,
            vec![LexError::InvalidEscape {
                escape: 'q',
                line: 1,
                column: 3,
            }]
        );
        assert_eq!(tokens[0].kind, TokenKind::String("aqb".to_string()));
    }

    #[test]
    fn scans_arbitrary_precision_integer_literals() {
        let literal = "123456789012345678901234567890";
        let (tokens, diagnostics) = tokenize(literal);
        assert_eq!(diagnostics, Vec::new());
        assert_eq!(
            tokens[0].kind,
            TokenKind::Integer(literal.parse::<BigInt>().expect("literal parses"))
        );
    }

    #[test]
    fn tracks_line_and_column_positions() {
        let (tokens, _) = tokenize("var x = 1;\n  x = 2;");
        let x_assign = &tokens[5];
        assert_eq!(x_assign.kind, TokenKind::Identifier("x"));
        assert_eq!(x_assign.span.line, 2);
        assert_eq!(x_assign.span.column, 3);
    }
}
