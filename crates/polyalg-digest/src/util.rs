//! Identifier, alias and list helpers shared by expression and argument rendering.

use std::collections::HashSet;

fn is_plain_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '#' | '$' | '@' | '.' | '_')
        || (('\u{00C0}'..='\u{024F}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Quotes an identifier unless it is already single- or double-quoted or
/// consists only of letters, digits and `# $ @ . _`. Embedded quotes are
/// doubled.
pub fn sanitize_identifier(s: &str) -> String {
    if is_quoted(s) || s.chars().all(is_plain_identifier_char) {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('"', "\"\""))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// Matches `CAST(<operand> AS <type>)` where the operand contains no space or `)`.
/// Returns the operand.
fn cast_operand(exp: &str) -> Option<&str> {
    let rest = strip_prefix_ignore_case(exp, "CAST(")?;
    let end = rest.find([' ', ')']).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let (operand, tail) = rest.split_at(end);
    let tail = strip_prefix_ignore_case(tail, " AS")?;
    let body = tail.strip_suffix(')')?;
    if body.is_empty() || body.contains('\n') {
        return None;
    }
    Some(operand)
}

/// `exp AS alias`, unless the alias is absent or adds no information.
pub fn append_alias(exp: &str, alias: Option<&str>) -> String {
    let Some(alias) = alias else {
        return exp.to_string();
    };
    if alias == exp || cast_operand(exp) == Some(alias) {
        return exp.to_string();
    }
    let alias = sanitize_identifier(alias);
    if alias == exp {
        exp.to_string()
    } else {
        format!("{} AS {}", exp, alias)
    }
}

/// Pairwise `append_alias`. Both slices must have the same length.
pub fn append_aliases(exps: &[String], aliases: &[String]) -> Vec<String> {
    assert_eq!(
        exps.len(),
        aliases.len(),
        "every expression needs exactly one alias"
    );
    exps.iter()
        .zip(aliases)
        .map(|(e, a)| append_alias(e, Some(a)))
        .collect()
}

/// Comma-joins values; brackets only for more than one value unless omitted.
pub fn join_multi_valued(values: &[String], omit_brackets: bool) -> String {
    let joined = values.join(", ");
    if omit_brackets || values.len() <= 1 {
        joined
    } else {
        format!("[{}]", joined)
    }
}

pub fn join_multi_valued_with_brackets(values: &[String]) -> String {
    format!("[{}]", values.join(", "))
}

/// Makes names unique by appending an attempt counter: `id, id` becomes
/// `id, id0`. Returns the input unchanged if nothing collides.
pub fn uniquify(names: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if used.insert(name.clone()) {
            out.push(name.clone());
            continue;
        }
        let mut attempt = 0usize;
        loop {
            let candidate = format!("{}{}", name, attempt);
            if used.insert(candidate.clone()) {
                out.push(candidate);
                break;
            }
            attempt += 1;
        }
    }
    out
}
