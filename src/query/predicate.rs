// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Single comparison filters: `column op literal`.
//!
//! The column is either quoted (`'First Name'`, `"a>b"`) or everything up to
//! the first operator character, trimmed. The literal is either quoted, and
//! then always a string, or the trimmed rest of the expression, which is an
//! integer when it looks like one.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::schema::{DataType, Schema};
use crate::stat::ColumnStatistics;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Operator::Eq),
            '>' => Some(Operator::Gt),
            '<' => Some(Operator::Lt),
            _ => None,
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lt => ordering == Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
        };
        f.write_str(c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Str(v) => write!(f, "'{v}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub column: String,
    pub op: Operator,
    pub literal: Literal,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: Operator, literal: Literal) -> Self {
        Self {
            column: column.into(),
            op,
            literal,
        }
    }

    /// Parse `column op literal`, failing with [`Error::InvalidPredicate`].
    pub fn parse(expr: &str) -> Result<Self> {
        let mut tokens = Tokenizer::new(expr);

        tokens.skip_whitespace();
        let column = match tokens.peek() {
            Some(q @ ('\'' | '"')) => tokens.quoted(q)?.to_owned(),
            _ => tokens
                .take_until(|c| Operator::from_char(c).is_some())
                .trim()
                .to_owned(),
        };
        if column.is_empty() {
            return Err(invalid(expr, "missing column name"));
        }

        tokens.skip_whitespace();
        let op = match tokens.next().and_then(Operator::from_char) {
            Some(op) => op,
            None => return Err(invalid(expr, "expected one of `=`, `>`, `<`")),
        };
        if tokens.peek().and_then(Operator::from_char).is_some() {
            return Err(invalid(expr, "unsupported operator"));
        }

        tokens.skip_whitespace();
        let literal = match tokens.peek() {
            Some(q @ ('\'' | '"')) => {
                let s = tokens.quoted(q)?.to_owned();
                tokens.skip_whitespace();
                if !tokens.rest().is_empty() {
                    return Err(invalid(expr, "unexpected input after the literal"));
                }
                Literal::Str(s)
            }
            _ => {
                let rest = tokens.rest().trim();
                if rest.is_empty() {
                    return Err(invalid(expr, "missing literal"));
                }
                parse_bare_literal(rest)
            }
        };

        Ok(Self { column, op, literal })
    }

    /// Resolve the column against `schema` and type the literal after it.
    pub fn bind(&self, schema: &Schema) -> Result<BoundPredicate> {
        let index = schema.index_of(&self.column)?;
        let target = match (schema.fields[index].data_type, &self.literal) {
            (DataType::Int32, Literal::Int(v)) => Target::Int(*v),
            (DataType::Int32, Literal::Str(s)) => match s.trim().parse::<i64>() {
                Ok(v) => Target::Int(v),
                Err(_) => Target::Never,
            },
            (DataType::Utf8, Literal::Int(v)) => Target::Str(v.to_string()),
            (DataType::Utf8, Literal::Str(s)) => Target::Str(s.clone()),
        };
        Ok(BoundPredicate {
            column: index,
            op: self.op,
            target,
        })
    }
}

impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Predicate::parse(s)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.literal)
    }
}

fn invalid(expr: &str, reason: &str) -> Error {
    Error::InvalidPredicate(format!("{reason} in `{expr}`"))
}

fn parse_bare_literal(s: &str) -> Literal {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(v) = s.parse::<i64>() {
            return Literal::Int(v);
        }
    }
    Literal::Str(s.to_owned())
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.take_until(|c| !c.is_whitespace());
    }

    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(stop).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Read a `quote` delimited token, without escapes.
    fn quoted(&mut self, quote: char) -> Result<&'a str> {
        self.next();
        let s = self.take_until(|c| c == quote);
        if self.next().is_none() {
            return Err(invalid(self.input, "unterminated quote"));
        }
        Ok(s)
    }
}

/// A predicate resolved against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPredicate {
    /// schema index of the filtered column
    pub column: usize,
    op: Operator,
    target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Int(i64),
    Str(String),
    // a non-integer literal against an Int32 column
    Never,
}

impl BoundPredicate {
    fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, &self.target) {
            (Value::Int32(v), Target::Int(l)) => Some(i64::from(*v).cmp(l)),
            (Value::Utf8(v), Target::Str(l)) => Some(v.as_str().cmp(l.as_str())),
            _ => None,
        }
    }

    /// Whether a row group with these statistics may hold a matching row.
    /// Missing bounds count as "may match".
    pub fn might_match(&self, stats: &ColumnStatistics) -> bool {
        if self.target == Target::Never {
            return false;
        }
        let (min, max) = (stats.min.as_ref(), stats.max.as_ref());
        let min = min.and_then(|v| self.compare(v));
        let max = max.and_then(|v| self.compare(v));
        match self.op {
            Operator::Gt => max.map_or(true, |o| o == Ordering::Greater),
            Operator::Lt => min.map_or(true, |o| o == Ordering::Less),
            Operator::Eq => match (min, max) {
                (Some(min), Some(max)) => min != Ordering::Greater && max != Ordering::Less,
                _ => true,
            },
        }
    }

    /// Whether a decoded cell satisfies the predicate. Nulls never match.
    pub fn row_matches(&self, value: Option<&Value>) -> bool {
        value
            .and_then(|v| self.compare(v))
            .map_or(false, |o| self.op.accepts(o))
    }
}
