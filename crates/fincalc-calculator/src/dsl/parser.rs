//! Parser for arithmetic expressions
//!
//! Recursive descent, one function per precedence level. Exponentiation is
//! right-associative and binds tighter than a leading sign, so `-2^2` is `-4`
//! while `2^-1` is `0.5`. A number directly followed by `(` or a name is an
//! implicit product: `2(1 + i)` and `2 i` parse as `2 * (1 + i)` and `2 * i`.
//!
//! Every operator in a `+ -` or `* /` chain counts one level against the depth
//! limit, since the chain becomes a left-nested tree of that height.

use crate::dsl::ExpressionLimits;
use crate::dsl::ast::{BinaryOperator, Expression, UnaryOperator};
use anyhow::{Result, anyhow, bail};
use std::fmt;

/// Token types recognized by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Power,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Power => write!(f, "^"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer for tokenizing expressions
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self { input: chars, position: 0, current_char }
    }

    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let mut number = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // exponent suffix, only when digits follow so `2e` stays `2 e`
        if matches!(self.current_char, Some('e' | 'E')) {
            let digit_at = match self.peek_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(ch) = self.current_char {
                        number.push(ch);
                    }
                    self.advance();
                }
                while let Some(ch) = self.current_char.filter(char::is_ascii_digit) {
                    number.push(ch);
                    self.advance();
                }
            }
        }

        number
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|e| anyhow!("Invalid number '{}': {}", number, e))
    }

    fn read_identifier(&mut self) -> Token {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Identifier(identifier)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(ch) = self.current_char else {
            return Ok(Token::Eof);
        };

        let token = match ch {
            '0'..='9' | '.' => return self.read_number(),
            c if c.is_alphabetic() || c == '_' => return Ok(self.read_identifier()),
            '*' if self.peek_at(1) == Some('*') => {
                self.advance();
                Token::Power
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Power,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            _ => bail!("Unexpected character '{}' at position {}", ch, self.position),
        };
        self.advance();
        Ok(token)
    }
}

/// Parser for arithmetic expressions
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer, max_depth: usize) -> Result<Self> {
        let current_token = lexer.next_token()?;
        Ok(Self { lexer, current_token, depth: 0, max_depth })
    }

    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current_token == expected {
            self.advance()
        } else {
            Err(anyhow!("Expected {}, found {}", expected, self.current_token))
        }
    }

    fn enter_level(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            bail!("Expression nesting exceeds the maximum depth of {}", self.max_depth);
        }
        Ok(())
    }

    /// Runs `parse` one nesting level deeper, enforcing the depth limit.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter_level()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub fn parse_expression(&mut self) -> Result<Expression> {
        self.nested(Self::parse_additive_expression)
    }

    fn parse_additive_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative_expression()?;
        let mut chained = 0;

        loop {
            let op = match self.current_token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance()?;
            self.enter_level()?;
            chained += 1;
            let right = self.parse_multiplicative_expression()?;
            left = Expression::binary(left, op, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary_expression()?;
        let mut after_number = is_numeric_literal(&left);
        let mut chained = 0;

        loop {
            let (op, explicit) = match self.current_token {
                Token::Star => (BinaryOperator::Multiply, true),
                Token::Slash => (BinaryOperator::Divide, true),
                Token::LeftParen | Token::Identifier(_) if after_number => (BinaryOperator::Multiply, false),
                _ => break,
            };
            if explicit {
                self.advance()?;
            }
            self.enter_level()?;
            chained += 1;
            let right = self.parse_unary_expression()?;
            after_number = is_numeric_literal(&right);
            left = Expression::binary(left, op, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression> {
        let operator = match self.current_token {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_power_expression(),
        };
        self.advance()?;
        let operand = self.nested(Self::parse_unary_expression)?;
        Ok(Expression::unary(operator, operand))
    }

    fn parse_power_expression(&mut self) -> Result<Expression> {
        let base = self.parse_primary_expression()?;

        if matches!(self.current_token, Token::Power) {
            self.advance()?;
            // right-associative; the exponent may carry its own sign
            let exponent = self.nested(Self::parse_unary_expression)?;
            return Ok(Expression::binary(base, BinaryOperator::Power, exponent));
        }

        Ok(base)
    }

    fn parse_primary_expression(&mut self) -> Result<Expression> {
        match &self.current_token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expression::number(value))
            }
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                if matches!(self.current_token, Token::LeftParen) {
                    self.parse_call(&name)
                } else {
                    Ok(Expression::var(&name))
                }
            }
            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }
            other => Err(anyhow!("Unexpected token: {}", other)),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expression> {
        self.advance()?; // consume '('
        let mut args = Vec::new();

        if !matches!(self.current_token, Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token, Token::Comma) {
                self.advance()?;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(Token::RightParen)?;
        Ok(Expression::call(name, args))
    }
}

/// A literal, possibly signed: the left side of an implicit product.
fn is_numeric_literal(expr: &Expression) -> bool {
    match expr {
        Expression::Literal(_) => true,
        Expression::UnaryOp { operand, .. } => matches!(**operand, Expression::Literal(_)),
        _ => false,
    }
}

/// Parse an expression string into an AST, enforcing `limits`
pub fn parse_expression(input: &str, limits: &ExpressionLimits) -> Result<Expression> {
    if input.trim().is_empty() {
        bail!("Expression is empty");
    }
    let length = input.chars().count();
    if length > limits.max_expression_length {
        bail!(
            "Expression is {} characters long, the maximum is {}",
            length,
            limits.max_expression_length
        );
    }

    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer, limits.max_expression_depth)?;
    let expr = parser.parse_expression()?;

    // Ensure we've consumed all tokens
    if !matches!(parser.current_token, Token::Eof) {
        bail!("Unexpected token after expression: {}", parser.current_token);
    }

    Ok(expr)
}
