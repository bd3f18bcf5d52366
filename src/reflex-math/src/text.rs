//! Textual encoding of vectors and matrices.
//!
//! Vectors are written as `vec4(x, y, z, w)` and matrices
//! as `mat4x4((..), (..), (..), (..))` where every inner
//! group is one column. All components use six decimals.

use glam::{Mat4, Vec4};

const VEC4_PREFIX: &str = "vec4";
const MAT4_PREFIX: &str = "mat4x4";

/// Errors that occur when parsing textual math values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input does not start with the expected prefix.
    #[error("expected '{0}(' prefix")]
    Prefix(&'static str),
    /// Parentheses are missing or unbalanced.
    #[error("unbalanced parentheses")]
    Parens,
    /// A wrong number of components was supplied.
    #[error("expected {expected} components, found {found}")]
    Arity { expected: usize, found: usize },
    /// A component is not a valid float.
    #[error("invalid component '{0}'")]
    Component(String),
}

/// Formats a single float the way all components are written.
#[inline]
pub fn format_f32(value: f32) -> String {
    format!("{value:.6}")
}

/// Formats `v` as `vec4(x, y, z, w)`.
pub fn format_vec4(v: Vec4) -> String {
    let mut out = String::with_capacity(48);
    out.push_str(VEC4_PREFIX);
    write_group(&mut out, &v.to_array());
    out
}

/// Formats `m` as `mat4x4((c0), (c1), (c2), (c3))`.
pub fn format_mat4(m: Mat4) -> String {
    let mut out = String::with_capacity(200);
    out.push_str(MAT4_PREFIX);
    out.push('(');
    for (i, column) in m.to_cols_array_2d().iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        write_group(&mut out, column);
    }
    out.push(')');
    out
}

fn write_group(out: &mut String, values: &[f32]) {
    out.push('(');
    for (i, value) in values.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        out.push_str(&format_f32(*value));
    }
    out.push(')');
}

/// Parses the output of [`format_vec4`].
pub fn parse_vec4(input: &str) -> Result<Vec4, ParseError> {
    let inner = strip_call(input.trim(), VEC4_PREFIX)?;
    let components = parse_components::<4>(inner)?;
    Ok(Vec4::from_array(components))
}

/// Parses the output of [`format_mat4`].
pub fn parse_mat4(input: &str) -> Result<Mat4, ParseError> {
    let mut rest = strip_call(input.trim(), MAT4_PREFIX)?.trim();

    let mut columns = [[0.0; 4]; 4];
    let mut found = 0;
    while !rest.is_empty() {
        if found == columns.len() {
            return Err(ParseError::Arity {
                expected: 4,
                found: found + 1,
            });
        }

        rest = rest.strip_prefix('(').ok_or(ParseError::Parens)?;
        let end = rest.find(')').ok_or(ParseError::Parens)?;
        columns[found] = parse_components::<4>(&rest[..end])?;
        found += 1;

        rest = rest[end + 1..].trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
        }
    }

    if found != columns.len() {
        return Err(ParseError::Arity { expected: 4, found });
    }

    Ok(Mat4::from_cols_array_2d(&columns))
}

fn strip_call<'a>(input: &'a str, prefix: &'static str) -> Result<&'a str, ParseError> {
    let args = input
        .strip_prefix(prefix)
        .ok_or(ParseError::Prefix(prefix))?
        .trim_start();

    args.strip_prefix('(')
        .and_then(|args| args.strip_suffix(')'))
        .ok_or(ParseError::Parens)
}

fn parse_components<const N: usize>(input: &str) -> Result<[f32; N], ParseError> {
    let mut out = [0.0; N];
    let mut found = 0;

    for part in input.split(',') {
        let part = part.trim();
        if found < N {
            out[found] = part
                .parse()
                .map_err(|_| ParseError::Component(part.to_owned()))?;
        }
        found += 1;
    }

    if found != N {
        return Err(ParseError::Arity { expected: N, found });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components() {
        assert_eq!(parse_components::<2>(" 1.5 ,-2").unwrap(), [1.5, -2.0]);
        assert!(matches!(
            parse_components::<2>("1"),
            Err(ParseError::Arity { expected: 2, found: 1 })
        ));
        assert!(matches!(
            parse_components::<1>("x"),
            Err(ParseError::Component(_))
        ));
    }
}
