//! Algebraic string parsing: `"3x^2y - 2z + 1.5e-3"`.

use crate::PolyError;

/// Split an algebraic string into `(powers, coefficient)` monomials over
/// `vars` variables (`x`, `y`, `z`, `w`).
///
/// Terms are separated by `+`/`-`; factors may be juxtaposed (`2xy^2`) or
/// joined with `*`. Whitespace is ignored.
pub(crate) fn parse_monomials(
    input: &str,
    vars: usize,
) -> Result<Vec<(Vec<usize>, f64)>, PolyError> {
    let s: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
    let fail = |reason: String| PolyError::Parse {
        input: input.to_string(),
        reason,
    };
    if s.is_empty() {
        return Err(fail("empty string".into()));
    }

    let mut out = Vec::new();
    let mut pos = 0;
    while pos < s.len() {
        let mut sign = 1.0;
        while pos < s.len() && (s[pos] == '+' || s[pos] == '-') {
            if s[pos] == '-' {
                sign = -sign;
            }
            pos += 1;
        }

        let start = pos;
        while pos < s.len() && (s[pos].is_ascii_digit() || s[pos] == '.') {
            pos += 1;
        }
        if pos > start && pos < s.len() && (s[pos] == 'e' || s[pos] == 'E') {
            let mut look = pos + 1;
            if look < s.len() && (s[look] == '+' || s[look] == '-') {
                look += 1;
            }
            if look < s.len() && s[look].is_ascii_digit() {
                pos = look;
                while pos < s.len() && s[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
        }
        let mut seen = pos > start;
        let coef = if seen {
            let text: String = s[start..pos].iter().collect();
            text.parse::<f64>()
                .map_err(|_| fail(format!("bad number `{text}`")))?
        } else {
            1.0
        };

        let mut powers = vec![0usize; vars];
        while pos < s.len() {
            let c = if s[pos] == '*' {
                pos += 1;
                match s.get(pos) {
                    Some(c) => *c,
                    None => return Err(fail("dangling `*`".into())),
                }
            } else {
                s[pos]
            };
            let index = match c {
                'x' => 0,
                'y' => 1,
                'z' => 2,
                'w' => 3,
                '+' | '-' => break,
                other => return Err(fail(format!("unexpected `{other}`"))),
            };
            if index >= vars {
                return Err(PolyError::Mismatch {
                    expected: vars,
                    found: index + 1,
                });
            }
            pos += 1;
            let mut power = 1;
            if pos < s.len() && s[pos] == '^' {
                pos += 1;
                let digits = pos;
                while pos < s.len() && s[pos].is_ascii_digit() {
                    pos += 1;
                }
                if pos == digits {
                    return Err(fail("missing exponent".into()));
                }
                let text: String = s[digits..pos].iter().collect();
                power = text
                    .parse()
                    .map_err(|_| fail(format!("bad exponent `{text}`")))?;
            }
            powers[index] += power;
            seen = true;
        }

        if !seen {
            return Err(fail("empty term".into()));
        }
        out.push((powers, sign * coef));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_terms() {
        let m = parse_monomials("3x^2 - 2x + 1", 1).unwrap();
        assert_eq!(m, vec![(vec![2], 3.0), (vec![1], -2.0), (vec![0], 1.0)]);
    }

    #[test]
    fn test_products_and_exponents() {
        let m = parse_monomials("-2.5e-1xy^2*z+z", 3).unwrap();
        assert_eq!(m[0], (vec![1, 2, 1], -0.25));
        assert_eq!(m[1], (vec![0, 0, 1], 1.0));
    }

    #[test]
    fn test_errors() {
        assert!(parse_monomials("", 1).is_err());
        assert!(parse_monomials("x^", 1).is_err());
        assert!(parse_monomials("3q", 1).is_err());
        assert!(parse_monomials("x+", 1).is_err());
        assert!(matches!(
            parse_monomials("z", 2),
            Err(PolyError::Mismatch { expected: 2, found: 3 })
        ));
    }
}
