//! Normalization of conventional math notation into Rhai syntax

/// Rewrites an expression so that Rhai reads it as math
///
/// - `^` becomes `**` (exponentiation rather than bitwise XOR)
/// - integer literals become float literals (`2` → `2.0`, `1e3` → `1.0e3`), so
///   that `1/2` is `0.5` and every number mixes freely with math trees
///
/// Identifiers are copied through untouched, so `x2` stays `x2`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphabetic() || c == '_' {
            out.push(c);
            while let Some(&c) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    out.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        } else if c.is_ascii_digit() {
            let mut mantissa = String::from(c);
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() || c == '_' {
                    mantissa.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            // A fractional part needs at least one digit after the dot;
            // otherwise the dot belongs to a method call like `2.sin()`
            let mut lookahead = chars.clone();
            if lookahead.next() == Some('.')
                && lookahead.peek().is_some_and(|c| c.is_ascii_digit())
            {
                chars.next();
                mantissa.push('.');
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '_' {
                        mantissa.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
            } else {
                mantissa.push_str(".0");
            }
            out.push_str(&mantissa);

            if let Some(&(e @ ('e' | 'E'))) = chars.peek() {
                let mut lookahead = chars.clone();
                lookahead.next();
                let mut exponent = String::from(e);
                if let Some(&(sign @ ('+' | '-'))) = lookahead.peek() {
                    exponent.push(sign);
                    lookahead.next();
                }
                if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                    while let Some(&c) = lookahead.peek() {
                        if c.is_ascii_digit() {
                            exponent.push(c);
                            lookahead.next();
                        } else {
                            break;
                        }
                    }
                    out.push_str(&exponent);
                    chars = lookahead;
                }
            }
        } else if c == '.'
            && chars.peek().is_some_and(|c| c.is_ascii_digit())
            && !out
                .chars()
                .next_back()
                .is_some_and(|p| p.is_alphanumeric() || p == '_' || p == ')')
        {
            // Bare fraction such as `.5`
            out.push_str("0.");
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() || c == '_' {
                    out.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        } else if c == '^' {
            out.push_str("**");
        } else {
            out.push(c);
        }
    }
    out
}
