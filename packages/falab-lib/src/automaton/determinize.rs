use hashbrown::HashMap;
use itertools::Itertools;

use crate::{
    automaton::{Cell, Fa, EPSILON, TRAP},
    error::FaError,
};

impl Fa {
    /// Subset construction: an equivalent DFA over the epsilon-free
    /// alphabet.
    ///
    /// Subsets are keyed by the comma-joined sorted member names and
    /// interned as `q0, q1, …` in discovery order (left-to-right over the
    /// alphabet). An undefined move materializes the `@t` trap state, whose
    /// row loops on itself for every symbol.
    pub fn determinize(&self) -> Result<Fa, FaError> {
        let initial = self.require_state(&self.initial)?;

        let alphabet: Vec<String> = self
            .alphabet
            .iter()
            .filter(|s| s.as_str() != EPSILON)
            .cloned()
            .collect();
        let symbol_columns: Vec<usize> =
            self.alphabet.iter().positions(|s| s != EPSILON).collect();

        let start = self.epsilon_closure(&[initial]);
        let start_key = self.subset_key(&start);

        // subset key -> interned index, plus the discovery-ordered subsets
        let mut interned: HashMap<String, usize> = HashMap::new();
        let mut subsets: Vec<Vec<usize>> = Vec::new();
        interned.insert(start_key, 0);
        subsets.push(start);

        // rows reference subset keys until every subset is interned
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut needs_trap = false;

        let mut cursor = 0;
        while cursor < subsets.len() {
            let subset = subsets[cursor].clone();
            let mut row = Vec::with_capacity(symbol_columns.len());

            for &column in &symbol_columns {
                let mut moved: Vec<usize> = Vec::new();
                for &state in &subset {
                    for target in self.cell(state, column).targets() {
                        let index = self.require_state(target)?;
                        if !moved.contains(&index) {
                            moved.push(index);
                        }
                    }
                }

                let next = self.epsilon_closure(&moved);
                if next.is_empty() {
                    needs_trap = true;
                    row.push(Cell::Trap);
                    continue;
                }

                let key = self.subset_key(&next);
                if !interned.contains_key(&key) {
                    interned.insert(key.clone(), subsets.len());
                    subsets.push(next);
                }
                row.push(Cell::To(key));
            }

            rows.push(row);
            cursor += 1;
        }

        let mut states: Vec<String> = (0..subsets.len()).map(|i| format!("q{}", i)).collect();
        let mut transitions: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        Cell::To(key) => Cell::To(format!("q{}", interned[&key])),
                        other => other,
                    })
                    .collect()
            })
            .collect();

        if needs_trap {
            states.push(TRAP.to_string());
            transitions.push(vec![Cell::Trap; alphabet.len()]);
        }

        let acceptance = subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| {
                subset
                    .iter()
                    .any(|&state| self.is_accepting(&self.states[state]))
            })
            .map(|(i, _)| format!("q{}", i))
            .collect();

        Ok(Fa {
            alphabet,
            states,
            initial: "q0".to_string(),
            acceptance,
            transitions,
        })
    }

    /// Canonical key of a subset: member names, sorted, comma-joined.
    fn subset_key(&self, subset: &[usize]) -> String {
        subset
            .iter()
            .map(|&state| self.states[state].as_str())
            .sorted()
            .join(",")
    }
}
