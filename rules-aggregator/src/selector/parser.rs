/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Metric-selector compiler: `metric{name op "value", ...}` into a [`MatcherSet`].

use crate::selector::matcher::{MatchOp, Matcher, MatcherSet};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

pub const METRIC_NAME_LABEL: &str = "__name__";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectorParseError {
    pub message: String,
    pub position: usize,
}

impl SelectorParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl Display for SelectorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at char {}: {}", self.position + 1, self.message)
    }
}

impl Error for SelectorParseError {}

/// Compiles one selector string into its ordered matchers.
///
/// A leading metric name becomes a `__name__` equality matcher placed first. The
/// selector must contain at least one matcher that rejects the empty string.
pub fn parse_metric_selector(input: &str) -> Result<MatcherSet, SelectorParseError> {
    let mut parser = SelectorParser::new(input);
    let matchers = parser.parse()?;

    if matchers.iter().all(|matcher| matcher.matches("")) {
        return Err(SelectorParseError::new(
            "vector selector must contain at least one non-empty matcher",
            0,
        ));
    }

    Ok(matchers)
}

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<MatcherSet, SelectorParseError> {
        let mut matchers = MatcherSet::new();

        self.skip_whitespace();
        let metric_name = self.identifier(true);
        if let Some(name) = metric_name {
            matchers.push(self.matcher(MatchOp::Equal, METRIC_NAME_LABEL, name, 0)?);
        }

        self.skip_whitespace();
        match self.peek() {
            Some('{') => {
                self.bump();
                self.label_matchers(&mut matchers, metric_name.is_some())?;
            }
            Some(c) => return Err(self.error(format!("unexpected character {c:?}"))),
            None if metric_name.is_none() => {
                return Err(self.error("unexpected end of input"));
            }
            None => {}
        }

        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(self.error(format!(
                "unexpected character {c:?} after selector"
            )));
        }

        Ok(matchers)
    }

    fn label_matchers(
        &mut self,
        matchers: &mut MatcherSet,
        has_metric_name: bool,
    ) -> Result<(), SelectorParseError> {
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(());
            }

            let name_start = self.pos;
            let name = self
                .identifier(false)
                .ok_or_else(|| self.error("expected label name"))?;
            if has_metric_name && name == METRIC_NAME_LABEL {
                return Err(SelectorParseError::new(
                    "metric name must not be set twice",
                    name_start,
                ));
            }

            self.skip_whitespace();
            let op = self.match_op()?;
            self.skip_whitespace();
            let value_start = self.pos;
            let value = self.string_literal()?;
            matchers.push(self.matcher(op, name, &value, value_start)?);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(());
            }
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected character {c:?} in label matching")),
                None => self.error("unexpected end of input inside braces"),
            });
        }
    }

    fn matcher(
        &self,
        op: MatchOp,
        name: &str,
        value: &str,
        position: usize,
    ) -> Result<Matcher, SelectorParseError> {
        Matcher::new(op, name, value).map_err(|err| {
            SelectorParseError::new(format!("invalid regular expression {value:?}: {err}"), position)
        })
    }

    fn match_op(&mut self) -> Result<MatchOp, SelectorParseError> {
        let rest = &self.input[self.pos..];
        let (op, len) = if rest.starts_with("=~") {
            (MatchOp::Regex, 2)
        } else if rest.starts_with("!~") {
            (MatchOp::NotRegex, 2)
        } else if rest.starts_with("!=") {
            (MatchOp::NotEqual, 2)
        } else if rest.starts_with('=') {
            (MatchOp::Equal, 1)
        } else {
            return Err(self.error("expected label matching operator"));
        };
        self.pos += len;
        Ok(op)
    }

    fn identifier(&mut self, allow_colon: bool) -> Option<&'a str> {
        let start = self.pos;
        let valid_first = |c: char| c.is_ascii_alphabetic() || c == '_' || (allow_colon && c == ':');
        let valid_rest = |c: char| valid_first(c) || c.is_ascii_digit();

        match self.peek() {
            Some(c) if valid_first(c) => self.bump(),
            _ => return None,
        }
        while matches!(self.peek(), Some(c) if valid_rest(c)) {
            self.bump();
        }
        Some(&self.input[start..self.pos])
    }

    fn string_literal(&mut self) -> Result<String, SelectorParseError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ ('"' | '\'' | '`')) => q,
            _ => return Err(self.error("expected quoted label value")),
        };
        self.bump();

        let mut value = String::new();
        loop {
            let c = self
                .peek()
                .ok_or_else(|| SelectorParseError::new("unterminated quoted string", start))?;
            self.bump();

            if c == quote {
                return Ok(value);
            }
            if c == '\\' && quote != '`' {
                value.push(self.escape(quote, start)?);
            } else if c == '\n' && quote != '`' {
                return Err(SelectorParseError::new("unterminated quoted string", start));
            } else {
                value.push(c);
            }
        }
    }

    /// Escapes follow the PromQL lexer: only the enclosing quote may be escaped, and
    /// octal (`\101`) and `\x` escapes are capped at 255.
    fn escape(&mut self, quote: char, string_start: usize) -> Result<char, SelectorParseError> {
        let c = self
            .peek()
            .ok_or_else(|| SelectorParseError::new("unterminated quoted string", string_start))?;

        let simple = match c {
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            '\\' => Some(c),
            _ if c == quote => Some(c),
            _ => None,
        };
        if let Some(escaped) = simple {
            self.bump();
            return Ok(escaped);
        }

        let (digits, radix, max) = match c {
            '0'..='7' => (3, 8, 255),
            'x' => (2, 16, 255),
            'u' => (4, 16, 0x10FFFF),
            'U' => (8, 16, 0x10FFFF),
            _ => return Err(self.error(format!("unknown escape sequence \\{c}"))),
        };
        if radix == 16 {
            self.bump();
        }

        let start = self.pos;
        for _ in 0..digits {
            match self.peek() {
                Some(d) if d.is_digit(radix) => self.bump(),
                _ => return Err(self.error("invalid digit in escape sequence")),
            }
        }
        u32::from_str_radix(&self.input[start..self.pos], radix)
            .ok()
            .filter(|code| *code <= max)
            .and_then(char::from_u32)
            .ok_or_else(|| {
                SelectorParseError::new("escape sequence is an invalid Unicode code point", start)
            })
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> SelectorParseError {
        SelectorParseError::new(message, self.pos)
    }
}
