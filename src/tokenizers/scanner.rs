/// Character stream with lookahead, pushback and line/column tracking.
///
/// Positions are 1-based. [`Scanner::line`] and [`Scanner::column`] describe
/// the last character read, while [`Scanner::peek_line`] and
/// [`Scanner::peek_column`] describe the next one.
#[derive(Debug, Clone)]
pub struct Scanner {
    input: Vec<char>,
    // (line, column) of every character plus one entry for end of input
    positions: Vec<(usize, usize)>,
    position: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let mut positions = Vec::with_capacity(input.len() + 1);
        let (mut line, mut column) = (1, 1);

        for ch in &input {
            positions.push((line, column));
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        positions.push((line, column));

        Scanner {
            input,
            positions,
            position: 0,
        }
    }

    /// Reads the next character, or `None` at the end of input.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Returns the character `offset` positions after the next one.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Puts the last read character back.
    pub fn unread(&mut self) {
        self.unread_many(1);
    }

    pub fn unread_many(&mut self, count: usize) {
        self.position = self.position.saturating_sub(count);
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Number of characters consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> usize {
        self.last_position().0
    }

    pub fn column(&self) -> usize {
        self.last_position().1
    }

    pub fn peek_line(&self) -> usize {
        self.positions[self.position].0
    }

    pub fn peek_column(&self) -> usize {
        self.positions[self.position].1
    }

    /// Rewinds to the start of the input.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    fn last_position(&self) -> (usize, usize) {
        match self.position {
            0 => (0, 0),
            n => self.positions[n - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_unread() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.read(), Some('a'));
        assert_eq!(scanner.peek(), Some('b'));
        scanner.unread();
        assert_eq!(scanner.read(), Some('a'));
        assert_eq!(scanner.read(), Some('b'));
        assert_eq!(scanner.read(), None);
        assert!(scanner.is_eof());

        scanner.unread_many(2);
        assert_eq!(scanner.peek_at(1), Some('b'));
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut scanner = Scanner::new("a\nbc");
        assert_eq!((scanner.peek_line(), scanner.peek_column()), (1, 1));

        scanner.read();
        scanner.read();
        assert_eq!((scanner.line(), scanner.column()), (1, 2));
        assert_eq!((scanner.peek_line(), scanner.peek_column()), (2, 1));

        scanner.read();
        scanner.read();
        assert_eq!((scanner.line(), scanner.column()), (2, 2));
        assert_eq!((scanner.peek_line(), scanner.peek_column()), (2, 3));

        scanner.reset();
        assert_eq!(scanner.peek(), Some('a'));
    }
}
