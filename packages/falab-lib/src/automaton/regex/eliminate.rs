use crate::{
    automaton::{Fa, EPSILON},
    error::FaError,
};

const EMPTY_RE: &str = "∅";
const EPSILON_RE: &str = "ε";

impl Fa {
    /// State elimination: a regular expression denoting the automaton's
    /// language, or `∅` for the empty language.
    ///
    /// A fresh START row and END column border the matrix; every original
    /// state is eliminated in order, folding its loops and through-paths
    /// into the surviving entries. The output is not canonical: it may be
    /// over-parenthesized, so compare languages rather than strings.
    pub fn to_regex(&self) -> Result<String, FaError> {
        let n = self.states.len();
        let size = n + 2;
        let end = size - 1;

        let mut matrix = vec![vec![EMPTY_RE.to_string(); size]; size];

        let initial = self.require_state(&self.initial)?;
        matrix[0][initial + 1] = EPSILON_RE.to_string();

        for accept in &self.acceptance {
            let index = self.require_state(accept)?;
            matrix[index + 1][end] = EPSILON_RE.to_string();
        }

        for i in 0..n {
            for (j, symbol) in self.alphabet.iter().enumerate() {
                // an @e transition contributes the empty word, not a symbol
                let label = if symbol == EPSILON {
                    EPSILON_RE
                } else {
                    symbol.as_str()
                };

                for target in self.cell(i, j).targets() {
                    let t = self.require_state(target)? + 1;
                    let merged = union_re(&matrix[i + 1][t], label);
                    matrix[i + 1][t] = merged;
                }
            }
        }

        for k in 1..=n {
            for i in 0..size {
                for j in 0..size {
                    if i == k || j == k {
                        continue;
                    }

                    let through = concat_re(
                        &matrix[i][k],
                        &concat_re(&kleene_re(&matrix[k][k]), &matrix[k][j]),
                    );
                    let merged = union_re(&matrix[i][j], &through);
                    matrix[i][j] = merged;
                }
            }
        }

        Ok(matrix[0][end].clone())
    }
}

/// `r1 ∪ r2` with `∅` as identity and `r ∪ r = r`.
fn union_re(r1: &str, r2: &str) -> String {
    if r1 == EMPTY_RE {
        return r2.to_string();
    }
    if r2 == EMPTY_RE {
        return r1.to_string();
    }
    if r1 == r2 {
        return r1.to_string();
    }
    format!("({}∪{})", r1, r2)
}

/// `r1 r2` with `∅` absorbing and `ε` as identity. Arguments carrying a
/// top-level `∪` are parenthesized.
fn concat_re(r1: &str, r2: &str) -> String {
    if r1 == EMPTY_RE || r2 == EMPTY_RE {
        return EMPTY_RE.to_string();
    }
    if r1 == EPSILON_RE {
        return r2.to_string();
    }
    if r2 == EPSILON_RE {
        return r1.to_string();
    }

    let mut out = String::new();
    for r in [r1, r2] {
        if has_top_level_union(r) {
            out.push('(');
            out.push_str(r);
            out.push(')');
        } else {
            out.push_str(r);
        }
    }
    out
}

/// `r*` with `∅* = ε* = ε`. Multi-character arguments are parenthesized
/// unless they already form one balanced group.
fn kleene_re(r: &str) -> String {
    if r == EMPTY_RE || r == EPSILON_RE {
        return EPSILON_RE.to_string();
    }

    if r.chars().count() == 1 || is_wrapped(r) {
        format!("{}*", r)
    } else {
        format!("({})*", r)
    }
}

/// True when the string contains a `∪` outside all parentheses.
fn has_top_level_union(r: &str) -> bool {
    let mut depth = 0usize;
    for c in r.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '∪' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// True when the string is one balanced group: it starts with `(` whose
/// matching `)` is the final character.
fn is_wrapped(r: &str) -> bool {
    let count = r.chars().count();
    let mut depth = 0usize;

    for (i, c) in r.chars().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == count - 1;
                }
            }
            _ if depth == 0 => return false,
            _ => {}
        }
    }
    false
}
