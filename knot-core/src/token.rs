use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Dollar,
    Equal,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    At,
    Dot,
    Comma,

    Identifier,
    Number,

    Nil,
    Print,

    Eof,
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Type::Dollar => "'$'",
            Type::Equal => "'='",
            Type::LeftBrace => "'{'",
            Type::RightBrace => "'}'",
            Type::LeftBracket => "'['",
            Type::RightBracket => "']'",
            Type::At => "'@'",
            Type::Dot => "'.'",
            Type::Comma => "','",
            Type::Identifier => "identifier",
            Type::Number => "number",
            Type::Nil => "'nil'",
            Type::Print => "'print'",
            Type::Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Num(i64),
    Nil,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ty: Type,
    pub lexeme: String,
    pub col: usize,
    pub value: Literal,
}

impl Token {
    pub fn new(ty: Type, lexeme: String, col: usize, value: Literal) -> Self {
        Token {
            ty,
            lexeme,
            col,
            value,
        }
    }

    pub fn eof(col: usize) -> Self {
        Token::new(Type::Eof, String::new(), col, Literal::Nil)
    }
}
