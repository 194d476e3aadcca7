use super::captures::Captures;
use super::error::TemplateError;
use super::{Pattern, Token};

use std::mem;

use percent_encoding::percent_decode_str;
use regex::RegexBuilder;
use smallvec::SmallVec;

pub(super) const WILDCARD_NAME: &str = "rest";

const STAR: char = '*';
const COLON: char = ':';
const OPEN: char = '(';
const CLOSE: char = ')';

const PARAM_REGEX: &str = "[^./]+";
const WILDCARD_REGEX: &str = ".*?";

const MAX_REGEX_SIZE: usize = 1 << 20;

impl Pattern {
    pub(super) fn compile_template(template: &str) -> Result<Self, TemplateError> {
        let tokens = parse(template)?;

        let mut expr = String::with_capacity(template.len() * 2 + 2);
        let mut names: Vec<Box<str>> = Vec::new();
        let mut wildcard: Option<usize> = None;

        expr.push('^');
        write_regex(&tokens, &mut expr, &mut names, &mut wildcard)?;
        expr.push('$');

        tracing::trace!(template, regex = %expr, "compiled route template");

        let regex = RegexBuilder::new(&expr)
            .size_limit(MAX_REGEX_SIZE)
            .build()?;

        Ok(Self {
            source: template.into(),
            tokens,
            regex,
            names,
            wildcard,
        })
    }

    pub(super) fn find_captures<'p, 's: 'p>(&'s self, path: &'p str) -> Option<Captures<'p>> {
        let caps = self.regex.captures(path)?;
        let mut captures = Captures::new();
        for name in self.names.iter() {
            if let Some(m) = caps.name(name) {
                let value = percent_decode_str(m.as_str()).decode_utf8_lossy();
                captures.buf.push((&**name, value));
            }
        }
        Some(captures)
    }
}

fn parse(template: &str) -> Result<Vec<Token>, TemplateError> {
    // (position of '(', tokens of the enclosing level)
    let mut stack: SmallVec<[(usize, Vec<Token>); 4]> = SmallVec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut literal = String::new();

    let mut chars = template.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        match c {
            OPEN => {
                flush_literal(&mut literal, &mut current);
                stack.push((pos, mem::take(&mut current)));
            }
            CLOSE => {
                flush_literal(&mut literal, &mut current);
                let (_, parent) = stack
                    .pop()
                    .ok_or(TemplateError::UnbalancedGroup { pos })?;
                let group = mem::replace(&mut current, parent);
                current.push(Token::Group(group));
            }
            STAR => {
                flush_literal(&mut literal, &mut current);
                current.push(Token::Wildcard);
            }
            COLON => match chars.peek() {
                Some(&(start, c)) if is_name_start(c) => {
                    let mut end = start;
                    while let Some(&(i, c)) = chars.peek() {
                        if !is_name_char(c) {
                            break;
                        }
                        end = i + c.len_utf8();
                        chars.next();
                    }
                    flush_literal(&mut literal, &mut current);
                    current.push(Token::Param(template[start..end].into()));
                }
                _ => literal.push(COLON),
            },
            _ => literal.push(c),
        }
    }

    if let Some(&(pos, _)) = stack.last() {
        return Err(TemplateError::UnbalancedGroup { pos });
    }

    flush_literal(&mut literal, &mut current);
    Ok(current)
}

fn write_regex(
    tokens: &[Token],
    expr: &mut String,
    names: &mut Vec<Box<str>>,
    wildcard: &mut Option<usize>,
) -> Result<(), TemplateError> {
    for token in tokens {
        match token {
            Token::Literal(s) => expr.push_str(&regex::escape(s)),
            Token::Param(name) => {
                push_name(names, name)?;
                push_capture(expr, name, PARAM_REGEX);
            }
            Token::Wildcard => {
                *wildcard = Some(names.len());
                push_name(names, WILDCARD_NAME)?;
                push_capture(expr, WILDCARD_NAME, WILDCARD_REGEX);
            }
            Token::Group(inner) => {
                expr.push_str("(?:");
                write_regex(inner, expr, names, wildcard)?;
                expr.push_str(")?");
            }
        }
    }
    Ok(())
}

fn push_name(names: &mut Vec<Box<str>>, name: &str) -> Result<(), TemplateError> {
    if names.iter().any(|n| **n == *name) {
        return Err(TemplateError::DuplicatePlaceholder { name: name.into() });
    }
    names.push(name.into());
    Ok(())
}

fn push_capture(expr: &mut String, name: &str, inner: &str) {
    expr.push_str("(?P<");
    expr.push_str(name);
    expr.push('>');
    expr.push_str(inner);
    expr.push(')');
}

#[inline]
fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(mem::take(literal).into()));
    }
}

#[inline]
fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

#[inline]
fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
