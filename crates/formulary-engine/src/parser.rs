//! Formula parser
//!
//! A recursive descent parser for arithmetic formulas with standard operator
//! precedence. Formulas arrive as untrusted user text, so everything here is
//! a hard error rather than a best-effort recovery.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{EvalError, EvalResult};

/// Parse a formula string into an AST
///
/// # Example
/// ```rust
/// use formulary_engine::parse;
///
/// let ast = parse("1 + 2").unwrap();
/// let ast = parse("pi_half * r^2").unwrap();
/// let ast = parse("sqrt(a^2 + b^2)").unwrap();
/// ```
pub fn parse(formula: &str) -> EvalResult<Expr> {
    let mut parser = FormulaParser::new(formula)?;
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if !matches!(parser.current_token(), Token::Eof) {
        return Err(EvalError::syntax(
            parser.token_pos,
            format!(
                "Unexpected input after expression: {:?}",
                parser.current_token()
            ),
        ));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals and identifiers
    Number(f64),
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Option<Token>,
    /// Byte position where the current token starts
    token_pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> EvalResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: None,
            token_pos: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> EvalResult<()> {
        self.skip_whitespace();
        self.token_pos = self.pos;
        self.current_token = Some(self.scan_token()?);
        Ok(())
    }

    fn scan_token(&mut self) -> EvalResult<Token> {
        if self.is_at_end() {
            return Ok(Token::Eof);
        }

        let c = self.peek_char().unwrap();

        // Single-character tokens
        match c {
            '+' => {
                self.advance();
                return Ok(Token::Plus);
            }
            '-' => {
                self.advance();
                return Ok(Token::Minus);
            }
            '*' => {
                self.advance();
                return Ok(Token::Star);
            }
            '/' => {
                self.advance();
                return Ok(Token::Slash);
            }
            '%' => {
                self.advance();
                return Ok(Token::Percent);
            }
            '^' => {
                self.advance();
                return Ok(Token::Caret);
            }
            '(' => {
                self.advance();
                return Ok(Token::LeftParen);
            }
            ')' => {
                self.advance();
                return Ok(Token::RightParen);
            }
            ',' => {
                self.advance();
                return Ok(Token::Comma);
            }
            _ => {}
        }

        // Number
        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        // Identifier
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.scan_identifier());
        }

        Err(EvalError::syntax(
            self.pos,
            format!("Unexpected character '{}'", c),
        ))
    }

    fn scan_number(&mut self) -> EvalResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        let num: f64 = num_str
            .parse()
            .map_err(|_| EvalError::syntax(start, format!("Invalid number '{}'", num_str)))?;
        Ok(Token::Number(num))
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;

        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        Token::Identifier(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> EvalResult<Token> {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> EvalResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(EvalError::syntax(
                self.token_pos,
                format!("Expected {:?}, got {:?}", expected, self.current_token()),
            ))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division/Modulo: *, /, %
    // 3. Exponentiation: ^ (right-associative)
    // 4. Unary: -, +
    // 5. Primary: numbers, identifiers, function calls, parentheses

    fn parse_expression(&mut self) -> EvalResult<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                Token::Percent => BinaryOperator::Modulo,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> EvalResult<Expr> {
        let left = self.parse_unary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            let right = self.parse_exponent()?; // Right associative
            return Ok(Expr::BinaryOp {
                op: BinaryOperator::Power,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        // Prefix unary minus
        if matches!(self.current_token(), Token::Minus) {
            self.consume()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // Prefix plus (no-op)
        if matches!(self.current_token(), Token::Plus) {
            self.consume()?;
            return self.parse_unary();
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> EvalResult<Expr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.parse_expression()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Identifier(name) => {
                self.consume()?;
                // Check if it's a function call
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }

            token => Err(EvalError::syntax(
                self.token_pos,
                format!("Unexpected token: {:?}", token),
            )),
        }
    }

    fn parse_function_call(&mut self, name: String) -> EvalResult<Expr> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        // Parse arguments
        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume()?;
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(Expr::Function { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse("3.14").unwrap(), Expr::Number(3.14));
        assert_eq!(parse("1e10").unwrap(), Expr::Number(1e10));
        assert_eq!(parse(".5").unwrap(), Expr::Number(0.5));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse("radius").unwrap(), Expr::Variable("radius".into()));
        assert_eq!(parse("_x2").unwrap(), Expr::Variable("_x2".into()));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        // Should parse as 1+(2*3) due to precedence
        let ast = parse("1 + 2 * 3").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, Expr::Number(1.0));
            assert!(matches!(
                *right,
                Expr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let ast = parse("(1 + 2) * 3").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
            assert_eq!(*right, Expr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_exponent_right_associative() {
        // 2^3^2 must parse as 2^(3^2)
        let ast = parse("2^3^2").unwrap();
        if let Expr::BinaryOp { op, left, right } = ast {
            assert_eq!(op, BinaryOperator::Power);
            assert_eq!(*left, Expr::Number(2.0));
            assert!(matches!(
                *right,
                Expr::BinaryOp {
                    op: BinaryOperator::Power,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_modulo() {
        let ast = parse("10 % 3").unwrap();
        assert!(matches!(
            ast,
            Expr::BinaryOp {
                op: BinaryOperator::Modulo,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_unary() {
        let ast = parse("-5").unwrap();
        assert!(matches!(
            ast,
            Expr::UnaryOp {
                op: UnaryOperator::Negate,
                ..
            }
        ));

        // Unary plus is a no-op
        assert_eq!(parse("+5").unwrap(), Expr::Number(5.0));
    }

    #[test]
    fn test_parse_function_call() {
        let ast = parse("pow(2, 10)").unwrap();
        if let Expr::Function { name, args } = ast {
            assert_eq!(name, "pow");
            assert_eq!(args.len(), 2);
        } else {
            panic!("Expected Function");
        }
    }

    #[test]
    fn test_parse_nested_function_call() {
        let ast = parse("sqrt(a^2 + b^2)").unwrap();
        if let Expr::Function { name, args } = ast {
            assert_eq!(name, "sqrt");
            assert_eq!(args.len(), 1);
        } else {
            panic!("Expected Function");
        }
    }

    #[test]
    fn test_parse_empty_argument_list() {
        // The parser accepts zero-argument calls; arity is enforced at
        // evaluation time.
        let ast = parse("sin()").unwrap();
        if let Expr::Function { name, args } = ast {
            assert_eq!(name, "sin");
            assert!(args.is_empty());
        } else {
            panic!("Expected Function");
        }
    }

    #[test]
    fn test_parse_error_unknown_character() {
        let err = parse("1 + $x").unwrap_err();
        assert!(matches!(err, EvalError::Syntax { position: 4, .. }));
    }

    #[test]
    fn test_parse_error_unbalanced_parentheses() {
        assert!(matches!(
            parse("(1 + 2").unwrap_err(),
            EvalError::Syntax { .. }
        ));
        assert!(matches!(
            parse("1 + 2)").unwrap_err(),
            EvalError::Syntax { .. }
        ));
    }

    #[test]
    fn test_parse_error_trailing_input() {
        assert!(matches!(
            parse("1 + 2 3").unwrap_err(),
            EvalError::Syntax { .. }
        ));
    }

    #[test]
    fn test_parse_error_empty_input() {
        assert!(matches!(parse("").unwrap_err(), EvalError::Syntax { .. }));
        assert!(matches!(parse("   ").unwrap_err(), EvalError::Syntax { .. }));
    }

    #[test]
    fn test_parse_error_dangling_operator() {
        assert!(matches!(parse("1 +").unwrap_err(), EvalError::Syntax { .. }));
        assert!(matches!(parse("* 2").unwrap_err(), EvalError::Syntax { .. }));
    }

    #[test]
    fn test_parse_error_trailing_comma_in_call() {
        assert!(matches!(
            parse("max(1, 2,)").unwrap_err(),
            EvalError::Syntax { .. }
        ));
    }
}
