//! URI template expansion (RFC 6570) for string values.
//!
//! Covers levels 1–3 (every operator, comma-separated variable lists) plus
//! the level-4 prefix modifier `:n`. The explode modifier `*` is accepted
//! but only changes anything for list and map values, which HAL link
//! variables never are.
//!
//! ```rust,ignore
//! let vars = HashMap::from([("id".to_string(), "42".to_string())]);
//! assert_eq!(expand("/orders/{id}{?page}", &vars)?, "/orders/42");
//! ```

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Expand every `{...}` expression in `template` using `vars`.
///
/// Variables missing from `vars` are omitted, as RFC 6570 requires for
/// undefined values. Fails with [`Error::MalformedUri`] on an unterminated
/// expression, a stray `}`, a reserved operator, or a bad variable name.
pub fn expand(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(['{', '}']) {
        if rest.as_bytes()[start] == b'}' {
            return Err(Error::malformed_uri(template, "unmatched '}'"));
        }
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| Error::malformed_uri(template, "unterminated expression"))?;
        let expression = &after[..end];
        if expression.contains('{') {
            return Err(Error::malformed_uri(template, "nested '{' in expression"));
        }
        expand_expression(template, expression, vars, &mut out)?;
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// True when `href` contains at least one template expression.
pub fn is_template(href: &str) -> bool {
    href.contains('{') && href.contains('}')
}

// --- expression handling -----------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Operator {
    first: &'static str,
    sep: &'static str,
    named: bool,
    if_empty: &'static str,
    allow_reserved: bool,
}

impl Operator {
    fn parse(template: &str, expression: &str) -> Result<(Self, usize)> {
        let op = |first, sep, named, if_empty, allow_reserved| Operator {
            first,
            sep,
            named,
            if_empty,
            allow_reserved,
        };
        let parsed = match expression.chars().next() {
            Some('+') => (op("", ",", false, "", true), 1),
            Some('#') => (op("#", ",", false, "", true), 1),
            Some('.') => (op(".", ".", false, "", false), 1),
            Some('/') => (op("/", "/", false, "", false), 1),
            Some(';') => (op(";", ";", true, "", false), 1),
            Some('?') => (op("?", "&", true, "=", false), 1),
            Some('&') => (op("&", "&", true, "=", false), 1),
            Some(c @ ('=' | ',' | '!' | '@' | '|')) => {
                return Err(Error::malformed_uri(
                    template,
                    format!("reserved operator {c:?}"),
                ))
            }
            _ => (op("", ",", false, "", false), 0),
        };
        Ok(parsed)
    }
}

fn expand_expression(
    template: &str,
    expression: &str,
    vars: &HashMap<String, String>,
    out: &mut String,
) -> Result<()> {
    let (op, skip) = Operator::parse(template, expression)?;
    let mut first = true;

    for spec in expression[skip..].split(',') {
        let (name, prefix) = parse_varspec(template, spec)?;
        let Some(value) = vars.get(name) else {
            continue;
        };

        out.push_str(if first { op.first } else { op.sep });
        first = false;

        let value = match prefix {
            Some(n) => value.chars().take(n).collect::<String>(),
            None => value.clone(),
        };

        if op.named {
            out.push_str(name);
            if value.is_empty() {
                out.push_str(op.if_empty);
                continue;
            }
            out.push('=');
        }
        out.push_str(&encode(&value, op.allow_reserved));
    }

    Ok(())
}

/// Split `name[:n]` / `name*` into the variable name and optional prefix length.
fn parse_varspec<'a>(template: &str, spec: &'a str) -> Result<(&'a str, Option<usize>)> {
    let (name, prefix) = match spec.split_once(':') {
        Some((name, len)) => {
            let n = len
                .parse::<usize>()
                .ok()
                .filter(|n| (1..10_000).contains(n))
                .ok_or_else(|| {
                    Error::malformed_uri(template, format!("invalid prefix length in {spec:?}"))
                })?;
            (name, Some(n))
        }
        None => (spec.strip_suffix('*').unwrap_or(spec), None),
    };

    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%'));
    if !valid {
        return Err(Error::malformed_uri(
            template,
            format!("invalid variable name {name:?}"),
        ));
    }

    Ok((name, prefix))
}

const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

fn encode(value: &str, allow_reserved: bool) -> String {
    if !allow_reserved {
        return urlencoding::encode(value).into_owned();
    }

    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        let keep = RESERVED.contains(c)
            || (c == '%'
                && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit));
        if keep {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut [0; 4])));
        }
    }
    out
}
