use std::mem;

use knot_core::{Literal, Token, TokenStream, Type};

use crate::ast::{EntryDefinition, Expr, Symbol, Variable};
use crate::error::{ParseError, Result};

/// Recursive descent parser for a single line. The line must hold exactly one expression, any
/// token left over after it is an error.
pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    current: Token,
    depth: usize,
}

// Bound on nested containers, chained assignments and accessors. Each level is a level of
// recursion in the parser and the evaluator.
const MAX_DEPTH: usize = 128;

// Helper alias for shorter return types
type ExprResult = Result<Expr>;

// A variable followed by its `.name` / `[index]` suffixes. It is collected before deciding what
// the chain means, because only the token after it tells a read from a write.
struct AccessorChain {
    base: Variable,
    accessors: Vec<Expr>,
}

impl AccessorChain {
    fn fold(base: Variable, accessors: Vec<Expr>) -> Expr {
        accessors
            .into_iter()
            .fold(Expr::Variable(base), Expr::getter)
    }
}

impl<'a> Parser<'a> {
    pub fn new(tokens: TokenStream<'a>) -> Self {
        Parser {
            tokens,
            current: Token::eof(0),
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> ExprResult {
        self.current = self.tokens.next_token()?;
        let expr = self.expression()?;

        if self.current.ty != Type::Eof {
            return Err(ParseError::unexpected(Type::Eof, &self.current).into());
        }

        Ok(expr)
    }

    fn expression(&mut self) -> ExprResult {
        match self.current.ty {
            Type::Dollar => self.declaration(),
            Type::Print => self.print_statement(),
            Type::Number | Type::Nil => self.literal(),
            Type::At | Type::Identifier => self.rhs(),
            _ => self.empty_statement(),
        }
    }

    fn declaration(&mut self) -> ExprResult {
        self.consume(Type::Dollar)?;
        let lhs = self.variable()?;
        self.consume(Type::Equal)?;
        let rhs = self.rhs()?;
        Ok(Expr::declaration(lhs, rhs))
    }

    fn print_statement(&mut self) -> ExprResult {
        self.consume(Type::Print)?;
        Ok(Expr::print(self.rhs()?))
    }

    fn empty_statement(&mut self) -> ExprResult {
        self.consume(Type::Eof)?;
        Ok(Expr::Empty)
    }

    fn rhs(&mut self) -> ExprResult {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                col: self.current.col,
            }
            .into());
        }

        self.depth += 1;
        let expr = self.value();
        self.depth -= 1;
        expr
    }

    fn value(&mut self) -> ExprResult {
        match self.current.ty {
            Type::At => self.definition(),
            Type::Number | Type::Nil => self.literal(),
            Type::Identifier => self.accessor_or_assign(),
            found => Err(ParseError::UnknownRhs {
                found,
                col: self.current.col,
            }
            .into()),
        }
    }

    fn definition(&mut self) -> ExprResult {
        // `current` is the '@', the token after it picks the kind of container
        let next = self.tokens.peek_token()?;
        match next.ty {
            Type::LeftBrace => self.map_definition(),
            Type::LeftBracket => self.array_definition(),
            found => Err(ParseError::UnknownDefinition {
                found,
                col: next.col,
            }
            .into()),
        }
    }

    fn map_definition(&mut self) -> ExprResult {
        self.consume(Type::At)?;
        self.consume(Type::LeftBrace)?;

        let mut entries = Vec::new();
        while self.current.ty != Type::RightBrace {
            entries.push(self.entry_definition()?);
            self.consume(Type::Comma)?;
        }

        self.consume(Type::RightBrace)?;
        Ok(Expr::map(entries))
    }

    fn entry_definition(&mut self) -> Result<EntryDefinition> {
        let key = self.symbol()?;
        self.consume(Type::Equal)?;
        let value = self.rhs()?;
        Ok(EntryDefinition { key, value })
    }

    fn array_definition(&mut self) -> ExprResult {
        self.consume(Type::At)?;
        self.consume(Type::LeftBracket)?;

        let mut elements = Vec::new();
        while self.current.ty != Type::RightBracket {
            elements.push(self.rhs()?);
            self.consume(Type::Comma)?;
        }

        self.consume(Type::RightBracket)?;
        Ok(Expr::array(elements))
    }

    // Reads, assignments and item writes all start with a variable. The chain is parsed first,
    // then the presence of '=' and the number of accessors decide which of the three it is.
    fn accessor_or_assign(&mut self) -> ExprResult {
        let AccessorChain {
            base,
            mut accessors,
        } = self.accessor_chain()?;

        if self.current.ty != Type::Equal {
            return Ok(AccessorChain::fold(base, accessors));
        }

        self.consume(Type::Equal)?;
        let value = self.rhs()?;

        match accessors.pop() {
            None => Ok(Expr::assignment(base, value)),
            Some(last) => Ok(Expr::setter(
                AccessorChain::fold(base, accessors),
                last,
                value,
            )),
        }
    }

    fn accessor_chain(&mut self) -> Result<AccessorChain> {
        let base = self.variable()?;
        let mut accessors = Vec::new();

        loop {
            if accessors.len() >= MAX_DEPTH
                && matches!(self.current.ty, Type::Dot | Type::LeftBracket)
            {
                return Err(ParseError::TooDeep {
                    col: self.current.col,
                }
                .into());
            }

            match self.current.ty {
                Type::Dot => {
                    self.consume(Type::Dot)?;
                    accessors.push(Expr::Symbol(self.symbol()?));
                }
                Type::LeftBracket => {
                    self.consume(Type::LeftBracket)?;
                    accessors.push(self.number()?);
                    self.consume(Type::RightBracket)?;
                }
                _ => break,
            }
        }

        Ok(AccessorChain { base, accessors })
    }

    fn literal(&mut self) -> ExprResult {
        match self.current.ty {
            Type::Number => self.number(),
            Type::Nil => {
                self.consume(Type::Nil)?;
                Ok(Expr::Nil)
            }
            found => Err(ParseError::UnknownLiteral {
                found,
                col: self.current.col,
            }
            .into()),
        }
    }

    fn number(&mut self) -> ExprResult {
        let token = self.consume(Type::Number)?;
        match token.value {
            Literal::Num(value) => Ok(Expr::number(value)),
            Literal::Nil => Err(ParseError::UnknownLiteral {
                found: token.ty,
                col: token.col,
            }
            .into()),
        }
    }

    fn variable(&mut self) -> Result<Variable> {
        let token = self.consume(Type::Identifier)?;
        Ok(Variable { name: token.lexeme })
    }

    fn symbol(&mut self) -> Result<Symbol> {
        let token = self.consume(Type::Identifier)?;
        Ok(Symbol { name: token.lexeme })
    }

    // Checks the current token and moves past it, returning the token that was consumed.
    fn consume(&mut self, ty: Type) -> Result<Token> {
        if self.current.ty != ty {
            return Err(ParseError::unexpected(ty, &self.current).into());
        }

        let next = self.tokens.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }
}
