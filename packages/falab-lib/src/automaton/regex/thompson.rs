use crate::{
    automaton::{regex::ast::Ast, regex::parser, Cell, Fa, EPSILON},
    error::FaError,
};

/// Thompson construction: compiles a regular expression into an NFA.
///
/// The resulting alphabet lists the literal symbols in order of first
/// appearance, followed by `@e` iff the construction produced epsilon
/// edges. States are `q0, q1, …` in allocation order; acceptance is the
/// final fragment's exit state (empty for the empty language).
pub fn regex_to_nfa(regex: &str) -> Result<Fa, FaError> {
    // the trivial languages get their compact single-state forms
    if regex.is_empty() || regex == "∅" {
        return Ok(empty_language());
    }
    if regex == "ε" {
        return Ok(epsilon_language());
    }

    let ast = parser::parse(regex)?;

    let mut builder = Builder::default();
    let fragment = builder.compile(&ast);
    Ok(builder.into_fa(fragment))
}

fn empty_language() -> Fa {
    Fa {
        alphabet: vec![],
        states: vec!["q0".to_string()],
        initial: "q0".to_string(),
        acceptance: vec![],
        transitions: vec![vec![]],
    }
}

fn epsilon_language() -> Fa {
    Fa {
        acceptance: vec!["q0".to_string()],
        ..empty_language()
    }
}

/// A partially built NFA piece with one entry and, except for `∅`, one
/// exit state.
struct Fragment {
    entry: usize,
    exit: Option<usize>,
}

/// Accumulates states and labelled edges while compiling an AST. A `None`
/// label is an epsilon edge.
#[derive(Default)]
struct Builder {
    state_count: usize,
    literals: Vec<char>,
    edges: Vec<(usize, Option<char>, usize)>,
}

impl Builder {
    fn fresh(&mut self) -> usize {
        let state = self.state_count;
        self.state_count += 1;
        state
    }

    fn edge(&mut self, from: usize, label: char, to: usize) {
        if !self.literals.contains(&label) {
            self.literals.push(label);
        }
        self.edges.push((from, Some(label), to));
    }

    fn epsilon(&mut self, from: usize, to: usize) {
        self.edges.push((from, None, to));
    }

    fn compile(&mut self, ast: &Ast) -> Fragment {
        match ast {
            Ast::Epsilon => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.epsilon(entry, exit);
                Fragment {
                    entry,
                    exit: Some(exit),
                }
            }
            Ast::Empty => Fragment {
                entry: self.fresh(),
                exit: None,
            },
            Ast::Literal(symbol) => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.edge(entry, *symbol, exit);
                Fragment {
                    entry,
                    exit: Some(exit),
                }
            }
            Ast::Union(terms) => {
                let entry = self.fresh();
                let fragments: Vec<Fragment> =
                    terms.iter().map(|term| self.compile(term)).collect();
                let exit = self.fresh();

                for fragment in &fragments {
                    self.epsilon(entry, fragment.entry);
                    if let Some(fragment_exit) = fragment.exit {
                        self.epsilon(fragment_exit, exit);
                    }
                }

                Fragment {
                    entry,
                    exit: Some(exit),
                }
            }
            Ast::Concat(parts) => {
                if parts.is_empty() {
                    return self.compile(&Ast::Epsilon);
                }

                let fragments: Vec<Fragment> =
                    parts.iter().map(|part| self.compile(part)).collect();

                for i in 0..fragments.len() - 1 {
                    if let Some(exit) = fragments[i].exit {
                        self.epsilon(exit, fragments[i + 1].entry);
                    }
                }

                Fragment {
                    entry: fragments[0].entry,
                    exit: fragments[fragments.len() - 1].exit,
                }
            }
            Ast::Star(inner) => {
                let entry = self.fresh();
                let fragment = self.compile(inner);
                let exit = self.fresh();

                self.epsilon(entry, fragment.entry);
                self.epsilon(entry, exit);
                if let Some(fragment_exit) = fragment.exit {
                    self.epsilon(fragment_exit, fragment.entry);
                    self.epsilon(fragment_exit, exit);
                }

                Fragment {
                    entry,
                    exit: Some(exit),
                }
            }
            Ast::Plus(inner) => {
                // F+ = F F*
                self.compile(&Ast::Concat(vec![(**inner).clone(), Ast::Star(inner.clone())]))
            }
        }
    }

    fn into_fa(self, fragment: Fragment) -> Fa {
        let mut alphabet: Vec<String> = self.literals.iter().map(|c| c.to_string()).collect();
        let has_epsilon = self.edges.iter().any(|(_, label, _)| label.is_none());
        if has_epsilon {
            alphabet.push(EPSILON.to_string());
        }

        let mut targets: Vec<Vec<Vec<String>>> =
            vec![vec![Vec::new(); alphabet.len()]; self.state_count];
        for (from, label, to) in &self.edges {
            let column = match label {
                Some(symbol) => self
                    .literals
                    .iter()
                    .position(|l| l == symbol)
                    .unwrap_or(0),
                None => alphabet.len() - 1,
            };
            targets[*from][column].push(format!("q{}", to));
        }

        Fa {
            alphabet,
            states: (0..self.state_count).map(|i| format!("q{}", i)).collect(),
            initial: format!("q{}", fragment.entry),
            acceptance: fragment
                .exit
                .map(|exit| vec![format!("q{}", exit)])
                .unwrap_or_default(),
            transitions: targets
                .into_iter()
                .map(|row| row.into_iter().map(Cell::normalize).collect())
                .collect(),
        }
    }
}
