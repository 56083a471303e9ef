//! Lexer for the adapter text format.
//!
//! Follows the WebAssembly text format's lexical rules for everything adapters
//! use: parentheses, keywords (including `@`-annotations and dashed conversion
//! mnemonics), `$` identifiers, strings, integers and comments. Floating-point
//! literals are rejected; no adapter instruction takes one.
//!
//! ```
//! use iface_adapter::wat::{Lexer, TokenKind};
//!
//! let tokens = Lexer::tokenise("(i32-to-u16 (arg.get 0))").unwrap();
//! assert!(matches!(tokens[1].kind, TokenKind::Keyword(ref k) if k == "i32-to-u16"));
//! ```

use super::cursor::{Cursor, Position};
use super::error::LexError;
use super::token::{IntLit, Token, TokenKind};

/// Produces tokens via `Iterator`; iteration ends at the first error.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            failed: false,
        }
    }

    /// Tokenise the entire source, returning all tokens or the first error.
    pub fn tokenise(source: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(source).collect()
    }

    fn error(&self, message: impl Into<String>, start: Position) -> LexError {
        LexError::new(message, start.span_to(self.cursor.position()))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.skip_trivia().and_then(|()| {
            if self.cursor.is_eof() {
                return Ok(None);
            }
            let start = self.cursor.position();
            let kind = self.lex_token(start)?;
            Ok(Some(Token::new(kind, start.span_to(self.cursor.position()))))
        });
        match result {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> Lexer<'a> {
    fn lex_token(&mut self, start: Position) -> Result<TokenKind, LexError> {
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Err(self.error("unexpected end of input", start)),
        };
        let kind = match c {
            '(' => {
                self.cursor.advance();
                return Ok(TokenKind::LeftParen);
            }
            ')' => {
                self.cursor.advance();
                return Ok(TokenKind::RightParen);
            }
            '"' => self.lex_string(start)?,
            '$' => {
                self.cursor.advance();
                let name = self.cursor.take_while(is_idchar);
                if name.is_empty() {
                    return Err(self.error("expected identifier after '$'", start));
                }
                TokenKind::Id(name.to_string())
            }
            '+' | '-' if self.cursor.peek_second().map_or(false, |c| c.is_ascii_digit()) => {
                let negative = self.cursor.advance() == Some('-');
                self.lex_integer(start, negative)?
            }
            c if c.is_ascii_digit() => self.lex_integer(start, false)?,
            c if is_idchar(c) => TokenKind::Keyword(self.cursor.take_while(is_idchar).to_string()),
            c => {
                self.cursor.advance();
                return Err(self.error(format!("unexpected character: {c:?}"), start));
            }
        };
        self.check_token_boundary(start)?;
        Ok(kind)
    }

    /// Tokens other than parens must be separated by whitespace, a paren or a
    /// comment: `1x`, `$a"b"` and `"a""b"` are all malformed.
    fn check_token_boundary(&self, start: Position) -> Result<(), LexError> {
        match self.cursor.peek() {
            None | Some('(' | ')' | ';') => Ok(()),
            Some(c) if c.is_ascii_whitespace() => Ok(()),
            Some(_) => Err(self.error("unknown operator", start)),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            self.cursor.take_while(|c| c.is_ascii_whitespace());
            match (self.cursor.peek(), self.cursor.peek_second()) {
                (Some(';'), Some(';')) => {
                    self.cursor.take_while(|c| c != '\n');
                }
                (Some('('), Some(';')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Block comments nest: `(; a (; b ;) c ;)` is one comment.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1;
        while depth > 0 {
            match (self.cursor.peek(), self.cursor.peek_second()) {
                (None, _) => return Err(self.error("unterminated block comment", start)),
                (Some('('), Some(';')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth += 1;
                }
                (Some(';'), Some(')')) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth -= 1;
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        Ok(())
    }

    fn lex_string(&mut self, start: Position) -> Result<TokenKind, LexError> {
        self.cursor.advance();
        let mut bytes = Vec::new();
        loop {
            match self.cursor.advance() {
                None => return Err(self.error("unterminated string literal", start)),
                Some('"') => return Ok(TokenKind::String(bytes)),
                Some('\\') => self.lex_escape(&mut bytes)?,
                Some(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    fn lex_escape(&mut self, bytes: &mut Vec<u8>) -> Result<(), LexError> {
        let pos = self.cursor.position();
        let c = self
            .cursor
            .advance()
            .ok_or_else(|| self.error("unterminated escape sequence", pos))?;
        match c {
            't' => bytes.push(b'\t'),
            'n' => bytes.push(b'\n'),
            'r' => bytes.push(b'\r'),
            '"' => bytes.push(b'"'),
            '\'' => bytes.push(b'\''),
            '\\' => bytes.push(b'\\'),
            'u' => {
                if self.cursor.advance() != Some('{') {
                    return Err(self.error("expected '{' after \\u", pos));
                }
                let digits = self.cursor.take_while(|c| c.is_ascii_hexdigit());
                if self.cursor.advance() != Some('}') {
                    return Err(self.error("unterminated unicode escape", pos));
                }
                let ch = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error("invalid unicode escape", pos))?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            high if high.is_ascii_hexdigit() => {
                let low = self
                    .cursor
                    .advance()
                    .filter(char::is_ascii_hexdigit)
                    .ok_or_else(|| self.error("invalid hex escape", pos))?;
                let hex = [high as u8, low as u8];
                let byte = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
                    .ok_or_else(|| self.error("invalid hex escape", pos))?;
                bytes.push(byte);
            }
            other => return Err(self.error(format!("invalid escape sequence: \\{other}"), pos)),
        }
        Ok(())
    }

    /// Lex an integer; any sign has already been consumed.
    fn lex_integer(&mut self, start: Position, negative: bool) -> Result<TokenKind, LexError> {
        let hex = self.cursor.peek() == Some('0') && matches!(self.cursor.peek_second(), Some('x' | 'X'));
        if hex {
            self.cursor.advance();
            self.cursor.advance();
        }
        let digits = if hex {
            self.cursor.take_while(|c| c.is_ascii_hexdigit() || c == '_')
        } else {
            self.cursor.take_while(|c| c.is_ascii_digit() || c == '_')
        };

        let float_marker = if hex {
            matches!(self.cursor.peek(), Some('.' | 'p' | 'P'))
        } else {
            matches!(self.cursor.peek(), Some('.' | 'e' | 'E'))
        };
        if float_marker {
            self.cursor.take_while(is_idchar);
            return Err(self.error("floating-point literals are not supported", start));
        }

        if digits.is_empty() || !valid_underscores(digits) {
            return Err(self.error("unknown operator", start));
        }
        let clean: String = digits.chars().filter(|&c| c != '_').collect();
        let radix = if hex { 16 } else { 10 };
        let magnitude =
            u64::from_str_radix(&clean, radix).map_err(|_| self.error("integer literal out of range", start))?;
        Ok(TokenKind::Integer(IntLit::new(magnitude, negative)))
    }
}

/// Underscores may only separate two digits.
fn valid_underscores(digits: &str) -> bool {
    !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__")
}

/// Characters allowed in keywords and identifiers (WebAssembly `idchar`).
fn is_idchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '.'
                | '/'
                | ':'
                | '<'
                | '='
                | '>'
                | '?'
                | '@'
                | '\\'
                | '^'
                | '_'
                | '`'
                | '|'
                | '~'
        )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Spans stay within the source and never invert.
        #[test]
        fn spans_are_valid(source in "\\PC{0,200}") {
            for token in Lexer::new(&source).flatten() {
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= source.len());
            }
        }

        /// Any 64-bit magnitude survives lexing in decimal and hex.
        #[test]
        fn integers_round_trip(value in any::<u64>(), negative in any::<bool>()) {
            let sign = if negative { "-" } else { "" };
            for text in [format!("{sign}{value}"), format!("{sign}0x{value:x}")] {
                let tokens = Lexer::tokenise(&text).unwrap();
                prop_assert_eq!(tokens.len(), 1);
                prop_assert_eq!(&tokens[0].kind, &TokenKind::Integer(IntLit::new(value, negative)));
            }
        }
    }
}
