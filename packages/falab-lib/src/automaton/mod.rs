use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::FaError;

pub mod cell;
pub mod compose;
pub mod determinize;
pub mod dot;
pub mod minimize;
pub mod product;
pub mod regex;
pub mod run;

pub use cell::Cell;

/// The epsilon (empty word) symbol.
pub const EPSILON: &str = "@e";
/// Sentinel for "no transition".
pub const VOID: &str = "@v";
/// Name of the totalizing trap state.
pub const TRAP: &str = "@t";

/// Separator joining component names in product states.
pub const JOIN: &str = "|";

/// A finite automaton over a user-supplied alphabet.
///
/// `transitions` is a matrix with one row per state and one column per
/// alphabet symbol, in the order given by `states` and `alphabet`. Values
/// are immutable once built: every algorithm observes its inputs and
/// allocates a fresh result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fa {
    pub alphabet: Vec<String>,
    pub states: Vec<String>,
    pub initial: String,
    pub acceptance: Vec<String>,
    pub transitions: Vec<Vec<Cell>>,
}

impl Fa {
    const VOID_CELL: Cell = Cell::Void;

    /// Decodes an automaton from its JSON record. Duplicate acceptance
    /// entries are dropped; downstream algorithms enforce their own
    /// preconditions beyond the non-emptiness checked here.
    pub fn from_json(data: &str) -> Result<Fa, FaError> {
        let mut fa: Fa =
            serde_json::from_str(data).map_err(|e| FaError::InvalidAutomaton(e.to_string()))?;
        fa.validate()?;

        let mut seen = HashSet::new();
        fa.acceptance.retain(|state| seen.insert(state.clone()));

        Ok(fa)
    }

    /// The parse-time requirement: `states` and `alphabet` are non-empty.
    pub fn validate(&self) -> Result<(), FaError> {
        if self.states.is_empty() || self.alphabet.is_empty() {
            return Err(FaError::InvalidAutomaton(
                "empty states or alphabet".to_string(),
            ));
        }
        Ok(())
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s == name)
    }

    /// Like [`Fa::state_index`], but a missing state is an error.
    pub fn require_state(&self, name: &str) -> Result<usize, FaError> {
        self.state_index(name)
            .ok_or_else(|| FaError::NotFound(format!("state {:?} is not in states", name)))
    }

    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.alphabet.iter().position(|s| s == symbol)
    }

    /// Column of the `@e` symbol, if the alphabet has one.
    pub fn epsilon_index(&self) -> Option<usize> {
        self.symbol_index(EPSILON)
    }

    pub fn is_accepting(&self, name: &str) -> bool {
        self.acceptance.iter().any(|s| s == name)
    }

    /// Cell at `(state, symbol)`. Out-of-range positions read as `@v`, so
    /// ragged wire data degrades to missing transitions instead of panics.
    pub fn cell(&self, state: usize, symbol: usize) -> &Cell {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .unwrap_or(&Self::VOID_CELL)
    }

    /// Epsilon closure of a set of state indices: the least superset closed
    /// under `@e` transitions. Sorted and duplicate free. Targets that do
    /// not resolve to a state contribute nothing.
    pub fn epsilon_closure(&self, seed: &[usize]) -> Vec<usize> {
        let mut closure: Vec<usize> = seed.to_vec();
        closure.sort_unstable();
        closure.dedup();

        let Some(eps) = self.epsilon_index() else {
            return closure;
        };

        let mut stack = closure.clone();
        while let Some(state) = stack.pop() {
            for target in self.cell(state, eps).targets() {
                if let Some(index) = self.state_index(target) {
                    if !closure.contains(&index) {
                        closure.push(index);
                        stack.push(index);
                    }
                }
            }
        }

        closure.sort_unstable();
        closure
    }

    /// True iff the automaton is a DFA: no epsilon column, every cell a
    /// single state, and the transition function total.
    pub fn is_deterministic(&self) -> bool {
        if self.epsilon_index().is_some() {
            return false;
        }

        let has_trap_state = self.states.iter().any(|s| s == TRAP);

        (0..self.states.len()).all(|i| {
            (0..self.alphabet.len()).all(|j| match self.cell(i, j) {
                Cell::To(_) => true,
                Cell::Trap => has_trap_state,
                Cell::Void | Cell::ToMany(_) => false,
            })
        })
    }

    /// Structurally identical copy with the acceptance set flipped.
    /// Complements the language only when `self` is a total DFA; callers
    /// totalize first (subset construction materializes the trap).
    pub fn complement(&self) -> Fa {
        let acceptance = self
            .states
            .iter()
            .filter(|state| !self.is_accepting(state))
            .cloned()
            .collect();

        Fa {
            acceptance,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> Fa {
        Fa {
            alphabet: vec!["a".into()],
            states: vec!["q0".into(), "q1".into()],
            initial: "q0".into(),
            acceptance: vec!["q1".into()],
            transitions: vec![vec![Cell::To("q1".into())], vec![Cell::To("q1".into())]],
        }
    }

    #[test]
    fn from_json_rejects_empty_states() {
        let raw = r#"{"alphabet":["a"],"states":[],"initial":"q0","acceptance":[],"transitions":[]}"#;
        assert!(matches!(
            Fa::from_json(raw),
            Err(FaError::InvalidAutomaton(_))
        ));
    }

    #[test]
    fn from_json_ignores_duplicate_acceptance() {
        let raw = r#"{"alphabet":["a"],"states":["q0"],"initial":"q0","acceptance":["q0","q0"],"transitions":[["@v"]]}"#;
        let fa = Fa::from_json(raw).unwrap();
        assert_eq!(fa.acceptance, vec!["q0".to_string()]);
    }

    #[test]
    fn complement_flips_acceptance() {
        let fa = two_state();
        let complemented = fa.complement();
        assert_eq!(complemented.acceptance, vec!["q0".to_string()]);
        assert_eq!(complemented.states, fa.states);
        assert_eq!(complemented.transitions, fa.transitions);
    }

    #[test]
    fn deterministic_requires_totality() {
        let mut fa = two_state();
        assert!(fa.is_deterministic());

        fa.transitions[1][0] = Cell::Void;
        assert!(!fa.is_deterministic());
    }
}
