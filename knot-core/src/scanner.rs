use phf::{phf_map, Map};

use crate::error::Error;
use crate::token::{Literal, Token, Type};

pub struct Scanner;

impl Scanner {
    const KEYWORDS: Map<&'static str, Type> = phf_map! {
        "nil" => Type::Nil,
        "print" => Type::Print,
    };

    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Scanner
    }

    pub fn scan_tokens<'a>(&mut self, src: &'a str) -> TokenStream<'a> {
        TokenStream::new(src)
    }
}

/// Lazily scans one line of source. Only the token being scanned is held, lookahead is done by
/// re-scanning from a saved position.
pub struct TokenStream<'a> {
    src: &'a str,

    // `start` and `current` are byte offsets to the start and end of the token being scanned
    start: usize,
    current: usize,

    // Set once the iterator has emitted the eof token. `next_token` keeps returning eof after
    // that, but the iterator needs to know when to stop.
    eof: bool,
    error: Option<Error>,
}

impl<'a> TokenStream<'a> {
    pub fn new(src: &'a str) -> Self {
        TokenStream {
            src,
            start: 0,
            current: 0,
            eof: false,
            error: None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Consumes and returns the next token. Once the input is exhausted every call returns an
    /// `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace()?;
        self.start = self.current;

        if self.is_at_end() {
            return Ok(Token::eof(self.current));
        }

        let c = self.advance()?;
        match c {
            '$' => Ok(self.make_token(Type::Dollar)),
            '=' => Ok(self.make_token(Type::Equal)),
            '{' => Ok(self.make_token(Type::LeftBrace)),
            '}' => Ok(self.make_token(Type::RightBrace)),
            '[' => Ok(self.make_token(Type::LeftBracket)),
            ']' => Ok(self.make_token(Type::RightBracket)),
            '@' => Ok(self.make_token(Type::At)),
            '.' => Ok(self.make_token(Type::Dot)),
            ',' => Ok(self.make_token(Type::Comma)),
            _ => {
                if c.is_ascii_digit() {
                    self.number()
                } else if c.is_alphabetic() {
                    self.identifier()
                } else {
                    Err(Error::UnexpectedCharacter {
                        ch: c,
                        col: self.start,
                    })
                }
            }
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token, Error> {
        let start = self.start;
        let current = self.current;
        let token = self.next_token();
        self.start = start;
        self.current = current;
        token
    }

    fn number(&mut self) -> Result<Token, Error> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance()?;
        }

        let text = &self.src[self.start..self.current];
        let num = text.parse::<i64>().map_err(|_| Error::NumberOutOfRange {
            literal: String::from(text),
            col: self.start,
        })?;

        Ok(self.make_token_with_val(Type::Number, Literal::Num(num)))
    }

    fn identifier(&mut self) -> Result<Token, Error> {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric()) {
            self.advance()?;
        }

        let text = &self.src[self.start..self.current];
        match Scanner::KEYWORDS.get(text) {
            None => Ok(self.make_token(Type::Identifier)),
            Some(keyword) => Ok(self.make_token(*keyword)),
        }
    }

    fn skip_whitespace(&mut self) -> Result<(), Error> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance()?;
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.src[self.current..].chars().next()
    }

    fn advance(&mut self) -> Result<char, Error> {
        let c = self
            .peek()
            .ok_or(Error::ReadPastEnd { col: self.current })?;
        self.current += c.len_utf8();
        Ok(c)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.src.len()
    }

    fn make_token(&self, ty: Type) -> Token {
        self.make_token_with_val(ty, Literal::Nil)
    }

    fn make_token_with_val(&self, ty: Type, val: Literal) -> Token {
        Token::new(
            ty,
            String::from(&self.src[self.start..self.current]),
            self.start,
            val,
        )
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof || self.error.is_some() {
            return None;
        }

        match self.next_token() {
            Ok(token) => {
                if token.ty == Type::Eof {
                    self.eof = true;
                }
                Some(token)
            }
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::scanner::Scanner;
    use crate::token::{Literal, Token, Type};

    macro_rules! token {
        ($ty:ident, $lex:literal, $col:literal) => {
            Token::new(Type::$ty, String::from($lex), $col, Literal::Nil)
        };
    }

    #[test]
    fn test_basic_scanning() {
        let source = "$foo = @{ bar = 12, baz = nil, }";
        let mut scanner = Scanner::new();
        let stream = scanner.scan_tokens(source);

        assert_eq!(
            stream.collect::<Vec<Token>>(),
            vec![
                token!(Dollar, "$", 0),
                token!(Identifier, "foo", 1),
                token!(Equal, "=", 5),
                token!(At, "@", 7),
                token!(LeftBrace, "{", 8),
                token!(Identifier, "bar", 10),
                token!(Equal, "=", 14),
                Token::new(Type::Number, String::from("12"), 16, Literal::Num(12)),
                token!(Comma, ",", 18),
                token!(Identifier, "baz", 20),
                token!(Equal, "=", 24),
                token!(Nil, "nil", 26),
                token!(Comma, ",", 29),
                token!(RightBrace, "}", 31),
                Token::eof(32),
            ]
        );
    }

    #[test]
    fn test_single_character_tokens() {
        let mut scanner = Scanner::new();
        let types: Vec<Type> = scanner
            .scan_tokens("$={}[]@.,")
            .map(|token| token.ty)
            .collect();

        assert_eq!(
            types,
            vec![
                Type::Dollar,
                Type::Equal,
                Type::LeftBrace,
                Type::RightBrace,
                Type::LeftBracket,
                Type::RightBracket,
                Type::At,
                Type::Dot,
                Type::Comma,
                Type::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut scanner = Scanner::new();
        let tokens: Vec<Token> = scanner.scan_tokens("nil print nils printer a1").collect();

        assert_eq!(
            tokens.iter().map(|token| token.ty).collect::<Vec<Type>>(),
            vec![
                Type::Nil,
                Type::Print,
                Type::Identifier,
                Type::Identifier,
                Type::Identifier,
                Type::Eof,
            ]
        );
        assert_eq!(tokens[2].lexeme, "nils");
        assert_eq!(tokens[3].lexeme, "printer");
        assert_eq!(tokens[4].lexeme, "a1");
    }

    #[test]
    fn test_number_followed_by_identifier() {
        let mut scanner = Scanner::new();
        let tokens: Vec<Token> = scanner.scan_tokens("98765abc").collect();

        assert_eq!(tokens[0].value, Literal::Num(98765));
        assert_eq!(tokens[1].ty, Type::Identifier);
        assert_eq!(tokens[1].lexeme, "abc");
    }

    #[test]
    fn test_skips_whitespace() {
        let mut scanner = Scanner::new();
        let mut stream = scanner.scan_tokens("   $ \t token\r\n  123   ");

        assert_eq!(stream.next_token().unwrap().ty, Type::Dollar);
        assert_eq!(stream.next_token().unwrap().lexeme, "token");
        assert_eq!(stream.next_token().unwrap().value, Literal::Num(123));
        assert_eq!(stream.next_token().unwrap().ty, Type::Eof);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut scanner = Scanner::new();
        let mut stream = scanner.scan_tokens("$token");

        let peeked = stream.peek_token().unwrap();
        let first = stream.next_token().unwrap();
        assert_eq!(peeked, first);

        assert_eq!(stream.peek_token().unwrap().lexeme, "token");
        assert_eq!(stream.next_token().unwrap().lexeme, "token");
        assert_eq!(stream.next_token().unwrap().ty, Type::Eof);
    }

    #[test]
    fn test_eof_is_idempotent() {
        for source in ["", "    "] {
            let mut scanner = Scanner::new();
            let mut stream = scanner.scan_tokens(source);

            for _ in 0..3 {
                assert_eq!(stream.next_token().unwrap().ty, Type::Eof);
                assert_eq!(stream.peek_token().unwrap().ty, Type::Eof);
            }
        }
    }

    #[test]
    fn test_unexpected_character() {
        let mut scanner = Scanner::new();
        let mut stream = scanner.scan_tokens("x = #");
        stream.by_ref().last();

        assert_eq!(
            stream.error().unwrap(),
            &Error::UnexpectedCharacter { ch: '#', col: 4 }
        );
    }

    #[test]
    fn test_number_out_of_range() {
        let mut scanner = Scanner::new();
        let mut stream = scanner.scan_tokens("99999999999999999999");

        assert_eq!(
            stream.next_token(),
            Err(Error::NumberOutOfRange {
                literal: String::from("99999999999999999999"),
                col: 0
            })
        );
    }
}
