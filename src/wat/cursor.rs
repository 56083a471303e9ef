//! Character cursor over source text with line/column tracking.

use super::token::Span;

/// A saved point in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Span from this position up to `end`.
    #[must_use]
    pub fn span_to(self, end: Position) -> Span {
        Span::new(self.offset, end.offset, self.line, self.column)
    }
}

pub struct Cursor<'a> {
    source: &'a str,
    pos: Position,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos.offset >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.offset += c.len_utf8();
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    /// Consume characters while `pred` holds and return them as a slice.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().map_or(false, &pred) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Source text between `start` and the current position.
    pub fn slice_from(&self, start: Position) -> &'a str {
        &self.source[start.offset..self.pos.offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), Position { offset: 2, line: 1, column: 3 });
        cursor.advance();
        assert_eq!(cursor.position(), Position { offset: 3, line: 2, column: 1 });
    }

    #[test]
    fn columns_count_characters() {
        let mut cursor = Cursor::new("\u{e9}x");
        cursor.advance();
        assert_eq!(cursor.position().offset, 2);
        assert_eq!(cursor.position().column, 2);
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn take_while_and_peek() {
        let mut cursor = Cursor::new("i32-to-u8 rest");
        assert_eq!(cursor.peek_second(), Some('3'));
        assert_eq!(cursor.take_while(|c| !c.is_whitespace()), "i32-to-u8");
        assert_eq!(cursor.peek(), Some(' '));
        assert!(!cursor.is_eof());
        cursor.take_while(|_| true);
        assert!(cursor.is_eof());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn spans_from_positions() {
        let mut cursor = Cursor::new("hello");
        let start = cursor.position();
        cursor.take_while(|c| c != 'o');
        assert_eq!(start.span_to(cursor.position()), Span::new(0, 4, 1, 1));
        assert_eq!(cursor.slice_from(start), "hell");
    }
}
