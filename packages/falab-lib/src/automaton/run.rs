use itertools::Itertools;
use serde::Serialize;

use crate::automaton::Fa;

/// Outcome of running an input string: acceptance plus the frontier after
/// the initial closure and after every consumed character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub accepted: bool,
    pub path: Vec<String>,
}

impl Fa {
    /// Runs `input` against the automaton, following epsilon transitions.
    ///
    /// Each path entry is the comma-joined, sorted frontier after a step.
    /// A character outside the alphabet rejects; an empty frontier records
    /// `∅` and rejects.
    pub fn run(&self, input: &str) -> Run {
        let mut frontier = match self.state_index(&self.initial) {
            Some(initial) => self.epsilon_closure(&[initial]),
            None => Vec::new(),
        };

        let mut path = vec![self.frontier_label(&frontier)];

        for ch in input.chars() {
            let Some(symbol) = self.symbol_index(&ch.to_string()) else {
                return Run {
                    accepted: false,
                    path,
                };
            };

            let mut moved: Vec<usize> = Vec::new();
            for &state in &frontier {
                for target in self.cell(state, symbol).targets() {
                    if let Some(index) = self.state_index(target) {
                        if !moved.contains(&index) {
                            moved.push(index);
                        }
                    }
                }
            }

            frontier = self.epsilon_closure(&moved);

            if frontier.is_empty() {
                path.push("∅".to_string());
                return Run {
                    accepted: false,
                    path,
                };
            }
            path.push(self.frontier_label(&frontier));
        }

        let accepted = frontier
            .iter()
            .any(|&state| self.is_accepting(&self.states[state]));

        Run { accepted, path }
    }

    fn frontier_label(&self, frontier: &[usize]) -> String {
        frontier
            .iter()
            .map(|&state| self.states[state].as_str())
            .sorted()
            .join(",")
    }
}
