use itertools::Itertools;

use crate::automaton::Fa;

/// Render as a Graphviz DOT description.
pub trait ToDot {
    fn to_dot(&self) -> String;
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl ToDot for Fa {
    /// Left-to-right digraph with an invisible source node pointing at the
    /// initial state and double circles on acceptance. The `@e`/`@v`/`@t`
    /// sentinels pass through literally; the TikZ post-processor substitutes
    /// their mathematical glyphs.
    fn to_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph FA {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  start [style=invis];\n");

        if !self.acceptance.is_empty() {
            dot.push_str(&format!(
                "  node [shape=doublecircle]; {};\n",
                self.acceptance
                    .iter()
                    .map(|state| format!("\"{}\"", escape(state)))
                    .join(" ")
            ));
        }
        dot.push_str("  node [shape=circle];\n");

        dot.push_str(&format!("  start -> \"{}\";\n", escape(&self.initial)));

        for (i, from) in self.states.iter().enumerate() {
            for (j, symbol) in self.alphabet.iter().enumerate() {
                for target in self.cell(i, j).targets() {
                    dot.push_str(&format!(
                        "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                        escape(from),
                        escape(target),
                        escape(symbol)
                    ));
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Cell;

    #[test]
    fn emits_edges_and_acceptance() {
        let fa = Fa {
            alphabet: vec!["a".into()],
            states: vec!["q0".into(), "q1".into()],
            initial: "q0".into(),
            acceptance: vec!["q1".into()],
            transitions: vec![
                vec![Cell::ToMany(vec!["q0".into(), "q1".into()])],
                vec![Cell::Void],
            ],
        };

        let dot = fa.to_dot();
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("node [shape=doublecircle]; \"q1\";"));
        assert!(dot.contains("start -> \"q0\";"));
        assert!(dot.contains("\"q0\" -> \"q0\" [label=\"a\"];"));
        assert!(dot.contains("\"q0\" -> \"q1\" [label=\"a\"];"));
        // void cells emit nothing
        assert!(!dot.contains("\"q1\" ->"));
    }

    #[test]
    fn escapes_quotes_in_names() {
        let fa = Fa {
            alphabet: vec!["\"".into()],
            states: vec!["q\"0".into()],
            initial: "q\"0".into(),
            acceptance: vec![],
            transitions: vec![vec![Cell::To("q\"0".into())]],
        };

        let dot = fa.to_dot();
        assert!(dot.contains("\"q\\\"0\""));
        assert!(dot.contains("[label=\"\\\"\"]"));
    }
}
