//! S-expression reader: turns source text into `Value` trees, one form at
//! a time, tracking the unconsumed remainder so the REPL can accumulate
//! multi-line input.
//!
//! Tokens are recognized with `nom`'s character-class combinators; the
//! incomplete-vs-error control flow (needed for the REPL's "keep reading
//! more lines" behavior) is driven by hand, since it doesn't fit `nom`'s
//! streaming model cleanly.

use nom::character::complete::digit1;
use nom::combinator::recognize;
use nom::sequence::preceded;
use nom::Parser;

use crate::error::RagnarokError;
use crate::value::Value;

/// Outcome of reading a single form from the front of the input.
pub enum ReadResult<'a> {
    /// A complete form, plus the unconsumed remainder.
    Form(Value, &'a str),
    /// Nothing left to read (only whitespace/comments remained).
    Done,
    /// A form was started but not finished (unmatched `(`, unterminated
    /// string, or a dangling quote) — the caller should supply more input.
    Incomplete,
}

const SYMBOL_EXCLUDED: &[char] = &['"', '\'', '(', ')', '#'];

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !SYMBOL_EXCLUDED.contains(&c)
}

fn skip_whitespace_and_comments(mut input: &str) -> &str {
    loop {
        let trimmed = input.trim_start();
        if trimmed.starts_with(";;") {
            match trimmed.find('\n') {
                Some(pos) => input = &trimmed[pos + 1..],
                None => input = "",
            }
        } else {
            return trimmed;
        }
    }
}

fn looks_like_integer(token: &str) -> bool {
    let digits: nom::IResult<&str, &str> = recognize(preceded(nom::combinator::opt(nom::character::complete::char('-')), digit1)).parse(token);
    matches!(digits, Ok((rest, _)) if rest.is_empty())
}

fn take_token(input: &str) -> &str {
    let end = input.find(|c: char| !is_symbol_char(c)).unwrap_or(input.len());
    &input[..end]
}

/// Reads the first complete S-expression from `input`.
pub fn read(input: &str) -> Result<ReadResult<'_>, RagnarokError> {
    let input = skip_whitespace_and_comments(input);
    if input.is_empty() {
        return Ok(ReadResult::Done);
    }

    let mut chars = input.chars();
    match chars.next().unwrap() {
        '(' => read_list(&input[1..]),
        ')' => Err(RagnarokError::ReadError("Cannot read input".to_string())),
        '\'' => read_quote(&input[1..]),
        '"' => read_string(&input[1..]),
        '#' => read_boolean(input),
        _ => read_atom(input),
    }
}

fn read_list(rest: &str) -> Result<ReadResult<'_>, RagnarokError> {
    let mut items = Vec::new();
    let mut current = rest;
    loop {
        current = skip_whitespace_and_comments(current);
        if current.is_empty() {
            return Ok(ReadResult::Incomplete);
        }
        if let Some(after) = current.strip_prefix(')') {
            return Ok(ReadResult::Form(Value::list(items), after));
        }
        match read(current)? {
            ReadResult::Form(v, rest) => {
                items.push(v);
                current = rest;
            }
            ReadResult::Incomplete => return Ok(ReadResult::Incomplete),
            ReadResult::Done => return Ok(ReadResult::Incomplete),
        }
    }
}

fn read_quote(rest: &str) -> Result<ReadResult<'_>, RagnarokError> {
    match read(rest)? {
        ReadResult::Form(v, after) => {
            let quoted = Value::list(vec![Value::symbol("quote"), v]);
            Ok(ReadResult::Form(quoted, after))
        }
        ReadResult::Incomplete | ReadResult::Done => Ok(ReadResult::Incomplete),
    }
}

fn read_string(rest: &str) -> Result<ReadResult<'_>, RagnarokError> {
    match rest.find(|c: char| c == '"' || c == '\n') {
        Some(pos) if rest.as_bytes()[pos] == b'"' => {
            Ok(ReadResult::Form(Value::string(&rest[..pos]), &rest[pos + 1..]))
        }
        _ => Ok(ReadResult::Incomplete),
    }
}

fn read_boolean(input: &str) -> Result<ReadResult<'_>, RagnarokError> {
    let mut chars = input.char_indices();
    chars.next(); // '#'
    match chars.next() {
        Some((_, c)) if c == 't' || c == 'T' => Ok(ReadResult::Form(Value::Boolean(true), &input[2..])),
        Some((_, c)) if c == 'f' || c == 'F' => Ok(ReadResult::Form(Value::Boolean(false), &input[2..])),
        _ => Err(RagnarokError::ReadError("Cannot read input".to_string())),
    }
}

fn read_atom(input: &str) -> Result<ReadResult<'_>, RagnarokError> {
    let token = take_token(input);
    if token.is_empty() {
        return Err(RagnarokError::ReadError("Cannot read input".to_string()));
    }
    let rest = &input[token.len()..];
    if looks_like_integer(token) {
        let n: i64 = token.parse().map_err(|_| RagnarokError::ReadError("Cannot read input".to_string()))?;
        Ok(ReadResult::Form(Value::Integer(n), rest))
    } else {
        Ok(ReadResult::Form(Value::symbol(token), rest))
    }
}
