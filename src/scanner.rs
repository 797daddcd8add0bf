//! Byte classification and a forward-only cursor over value text.
//!
//! The classes here are the same ones the grammar in `varsfile.pest` is written
//! against; the codec uses [`Scanner`] to pull numeric literals out of stored
//! value text and [`classify`] to vet encoded text, and the document uses
//! [`is_valid_key`] to vet keys before a write.

/// Marker that opens a section header line
pub const SECTION_MARKER: &str = ":/";

/// Lexical class of a single byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Space, tab, vertical tab or form feed
    Blank,
    /// `\r` or `\n`
    EndOfLine,
    /// `#`
    Comment,
    /// `"`
    Quote,
    /// Letter, digit, `_`, `-` or `.`
    Ident,
    /// Anything else
    Other,
}

/// Classify a byte
pub fn classify(b: u8) -> CharClass {
    match b {
        b' ' | b'\t' | 0x0B | 0x0C => CharClass::Blank,
        b'\r' | b'\n' => CharClass::EndOfLine,
        b'#' => CharClass::Comment,
        b'"' => CharClass::Quote,
        b if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.') => CharClass::Ident,
        _ => CharClass::Other,
    }
}

pub fn is_blank(b: u8) -> bool {
    classify(b) == CharClass::Blank
}

pub fn is_end_of_line(b: u8) -> bool {
    classify(b) == CharClass::EndOfLine
}

/// Bytes allowed in keys and section names
pub fn is_key_char(b: u8) -> bool {
    classify(b) == CharClass::Ident
}

/// True for a bare key or a `section/key` pair made of key characters only
pub fn is_valid_key(key: &str) -> bool {
    let is_word = |s: &str| !s.is_empty() && s.bytes().all(is_key_char);
    match key.split_once('/') {
        Some((section, bare)) => is_word(section) && is_word(bare),
        None => is_word(key),
    }
}

/// Forward-only cursor over a string slice.
///
/// Every position the cursor stops at sits on an ASCII byte or the end of input,
/// so the slices it hands out are always valid `&str`.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Consume `expected` if it is the next byte
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip blanks, returning how many were skipped
    pub fn skip_blanks(&mut self) -> usize {
        self.take_while(is_blank).len()
    }

    /// Consume the longest run of bytes matching `pred`
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && pred(bytes[self.pos]) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    /// Consume an optionally signed run of decimal digits.
    ///
    /// Nothing is consumed when no digit follows the sign.
    pub fn take_int_literal(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat(b'-') {
            self.eat(b'+');
        }
        if self.take_while(|b| b.is_ascii_digit()).is_empty() {
            self.pos = start;
            return None;
        }
        Some(&self.src[start..self.pos])
    }

    /// Consume a decimal floating point literal: sign, digits, optional fraction,
    /// optional exponent. An exponent marker with no digits is left unconsumed.
    pub fn take_float_literal(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat(b'-') {
            self.eat(b'+');
        }

        let int_digits = self.take_while(|b| b.is_ascii_digit()).len();
        let mut frac_digits = 0;
        if self.eat(b'.') {
            frac_digits = self.take_while(|b| b.is_ascii_digit()).len();
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return None;
        }

        let before_exp = self.pos;
        if self.eat(b'e') || self.eat(b'E') {
            if !self.eat(b'-') {
                self.eat(b'+');
            }
            if self.take_while(|b| b.is_ascii_digit()).is_empty() {
                self.pos = before_exp;
            }
        }

        Some(&self.src[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(b' '), CharClass::Blank);
        assert_eq!(classify(b'\t'), CharClass::Blank);
        assert_eq!(classify(b'\n'), CharClass::EndOfLine);
        assert_eq!(classify(b'\r'), CharClass::EndOfLine);
        assert_eq!(classify(b'#'), CharClass::Comment);
        assert_eq!(classify(b'"'), CharClass::Quote);
        assert_eq!(classify(b'a'), CharClass::Ident);
        assert_eq!(classify(b'Z'), CharClass::Ident);
        assert_eq!(classify(b'7'), CharClass::Ident);
        assert_eq!(classify(b'_'), CharClass::Ident);
        assert_eq!(classify(b'-'), CharClass::Ident);
        assert_eq!(classify(b'.'), CharClass::Ident);
        assert_eq!(classify(b'('), CharClass::Other);
        assert_eq!(classify(b':'), CharClass::Other);
        assert_eq!(classify(b'='), CharClass::Other);
        assert_eq!(classify(0xC3), CharClass::Other);
    }

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_key("width"));
        assert!(is_valid_key("video/width"));
        assert!(is_valid_key("player.max-speed_2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("video/"));
        assert!(!is_valid_key("/width"));
        assert!(!is_valid_key("a/b/c"));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key("quote\""));
    }

    #[test]
    fn test_int_literal() {
        let mut s = Scanner::new("-42abc");
        assert_eq!(s.take_int_literal(), Some("-42"));
        assert_eq!(s.rest(), "abc");

        let mut s = Scanner::new("-abc");
        assert_eq!(s.take_int_literal(), None);
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn test_float_literal() {
        let mut s = Scanner::new("1.5e3 rest");
        assert_eq!(s.take_float_literal(), Some("1.5e3"));
        assert_eq!(s.skip_blanks(), 1);
        assert_eq!(s.rest(), "rest");

        let mut s = Scanner::new(".25)");
        assert_eq!(s.take_float_literal(), Some(".25"));
        assert!(s.eat(b')'));
        assert!(s.is_at_end());

        let mut s = Scanner::new("2e");
        assert_eq!(s.take_float_literal(), Some("2"));
        assert_eq!(s.rest(), "e");

        let mut s = Scanner::new("+.");
        assert_eq!(s.take_float_literal(), None);
        assert_eq!(s.pos(), 0);
    }
}
