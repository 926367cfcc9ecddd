use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

/// Evaluates a constrained infix arithmetic expression.
///
/// The character whitelist (digits, `+ - * /`, parentheses, `.` and
/// whitespace) is the security boundary: input is rejected in full
/// before any of it is interpreted. `*` and `/` bind tighter than
/// `+` and `-`; parentheses group; a leading `+`/`-` is a unary sign.
pub fn evaluate(text: &str) -> Result<Decimal> {
    if let Some(c) = text.chars().find(|c| !is_allowed(*c)) {
        return Err(LedgerError::InvalidExpression(format!(
            "disallowed character `{c}`"
        )));
    }
    let mut parser = Parser::new(text);
    let value = parser.expression()?;
    parser.expect_end()?;
    Ok(value)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    /// Next non-whitespace character, without consuming it.
    fn peek(&mut self) -> Option<char> {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
        self.chars.peek().copied()
    }

    fn expression(&mut self) -> Result<Decimal> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.chars.next();
            let rhs = self.term()?;
            value = if op == '+' {
                value.checked_add(rhs)
            } else {
                value.checked_sub(rhs)
            }
            .ok_or_else(|| LedgerError::InvalidExpression("arithmetic overflow".into()))?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Decimal> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.chars.next();
            let rhs = self.factor()?;
            value = match op {
                '*' => value.checked_mul(rhs).ok_or_else(|| {
                    LedgerError::InvalidExpression("arithmetic overflow".into())
                })?,
                _ => value.checked_div(rhs).ok_or_else(|| {
                    LedgerError::InvalidExpression("division by zero".into())
                })?,
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<Decimal> {
        match self.peek() {
            Some('+') => {
                self.chars.next();
                self.factor()
            }
            Some('-') => {
                self.chars.next();
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.chars.next();
                let value = self.expression()?;
                if self.peek() == Some(')') {
                    self.chars.next();
                    Ok(value)
                } else {
                    Err(LedgerError::InvalidExpression(
                        "unbalanced parenthesis".into(),
                    ))
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(LedgerError::InvalidExpression(format!("unexpected `{c}`"))),
            None => Err(LedgerError::InvalidExpression(
                "unexpected end of expression".into(),
            )),
        }
    }

    fn number(&mut self) -> Result<Decimal> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                digits.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if !digits.bytes().any(|b| b.is_ascii_digit()) {
            return Err(LedgerError::InvalidExpression(format!(
                "malformed number `{digits}`"
            )));
        }
        // Decimal's parser wants a digit on both sides of the point.
        if digits.starts_with('.') {
            digits.insert(0, '0');
        }
        if digits.ends_with('.') {
            digits.push('0');
        }
        Decimal::from_str(&digits)
            .map_err(|_| LedgerError::InvalidExpression(format!("malformed number `{digits}`")))
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(LedgerError::InvalidExpression(format!(
                "unexpected trailing `{c}`"
            ))),
        }
    }
}
