use hashbrown::HashSet;

use crate::{
    automaton::{Cell, Fa, EPSILON},
    error::FaError,
};

/// Checks that all inputs agree on the epsilon-free alphabet; whether an
/// input already carries an `@e` column is its own business.
fn require_compatible_alphabet(fas: &[Fa]) -> Result<(), FaError> {
    fn strip(fa: &Fa) -> Vec<&str> {
        fa.alphabet
            .iter()
            .map(String::as_str)
            .filter(|s| *s != EPSILON)
            .collect()
    }

    let first = strip(&fas[0]);
    for fa in &fas[1..] {
        if strip(fa) != first {
            return Err(FaError::AlphabetMismatch(format!(
                "expected alphabet {:?}, got {:?}",
                fas[0].alphabet, fa.alphabet
            )));
        }
    }
    Ok(())
}

/// Epsilon-glued union of two or more automata with one shared alphabet.
///
/// A fresh start state branches on `@e` into every input's initial state;
/// acceptance is the union of the input acceptance sets. The result is an
/// NFA even when the inputs are DFAs.
pub fn epsilon_union(fas: &[Fa]) -> Result<Fa, FaError> {
    if fas.len() < 2 {
        return Err(FaError::Arity(format!(
            "non-deterministic union needs at least two automata, got {}",
            fas.len()
        )));
    }
    require_compatible_alphabet(fas)?;

    let inputs = adopt_states(fas);
    let (alphabet, eps) = with_epsilon(&inputs[0].alphabet);

    let used: HashSet<&str> = inputs
        .iter()
        .flat_map(|fa| fa.states.iter().map(String::as_str))
        .collect();
    let start = fresh_name("S", &used);

    let mut start_row = vec![Cell::Void; alphabet.len()];
    start_row[eps] = Cell::normalize(inputs.iter().map(|fa| fa.initial.clone()));

    let mut states = vec![start.clone()];
    let mut transitions = vec![start_row];
    let mut acceptance = Vec::new();

    for fa in &inputs {
        for (i, name) in fa.states.iter().enumerate() {
            states.push(name.clone());
            transitions.push(aligned_row(fa, i, &alphabet));
        }
        acceptance.extend(fa.acceptance.iter().cloned());
    }

    Ok(Fa {
        alphabet,
        states,
        initial: start,
        acceptance,
        transitions,
    })
}

/// Concatenation of a non-empty sequence of automata with one shared
/// alphabet: the accepting states of each input gain an `@e` edge into the
/// next input's initial state, merged with any pre-existing `@e` cell.
pub fn concatenate(fas: &[Fa]) -> Result<Fa, FaError> {
    if fas.is_empty() {
        return Err(FaError::Arity(
            "concatenation needs at least one automaton".to_string(),
        ));
    }
    require_compatible_alphabet(fas)?;

    let inputs = adopt_states(fas);
    let (alphabet, eps) = with_epsilon(&inputs[0].alphabet);

    let mut states = Vec::new();
    let mut transitions = Vec::new();

    for (which, fa) in inputs.iter().enumerate() {
        let glue_target = inputs.get(which + 1).map(|next| next.initial.clone());

        for (i, name) in fa.states.iter().enumerate() {
            let mut row = aligned_row(fa, i, &alphabet);

            if let Some(target) = &glue_target {
                if fa.is_accepting(name) {
                    let mut merged: Vec<String> =
                        row[eps].targets().map(str::to_string).collect();
                    merged.push(target.clone());
                    row[eps] = Cell::normalize(merged);
                }
            }

            states.push(name.clone());
            transitions.push(row);
        }
    }

    let initial = inputs[0].initial.clone();
    let acceptance = inputs[inputs.len() - 1].acceptance.clone();

    Ok(Fa {
        alphabet,
        states,
        initial,
        acceptance,
        transitions,
    })
}

/// The shared alphabet with an `@e` column, appending one when absent.
/// Returns the alphabet and the epsilon column index.
fn with_epsilon(alphabet: &[String]) -> (Vec<String>, usize) {
    let mut alphabet = alphabet.to_vec();
    let eps = match alphabet.iter().position(|s| s == EPSILON) {
        Some(index) => index,
        None => {
            alphabet.push(EPSILON.to_string());
            alphabet.len() - 1
        }
    };
    (alphabet, eps)
}

/// Row `i` of `fa`, re-indexed to the combined alphabet with `@v` for any
/// symbol the input did not know.
fn aligned_row(fa: &Fa, i: usize, alphabet: &[String]) -> Vec<Cell> {
    alphabet
        .iter()
        .map(|symbol| match fa.symbol_index(symbol) {
            Some(j) => fa.cell(i, j).clone(),
            None => Cell::Void,
        })
        .collect()
}

/// Renames the states of each input so names are unique across the whole
/// collection. First come keeps its name; a later clash gets `_{k}`
/// suffixes until free. Renaming applies consistently to states, initial,
/// acceptance and cell targets of the affected input.
fn adopt_states(fas: &[Fa]) -> Vec<Fa> {
    let mut used: HashSet<String> = HashSet::new();
    let mut adopted = Vec::with_capacity(fas.len());

    for fa in fas {
        let mut mapping: Vec<(String, String)> = Vec::with_capacity(fa.states.len());
        for name in &fa.states {
            let mut candidate = name.clone();
            let mut k = 1;
            while used.contains(&candidate) {
                candidate = format!("{}_{}", name, k);
                k += 1;
            }
            used.insert(candidate.clone());
            mapping.push((name.clone(), candidate));
        }
        adopted.push(rename(fa, &mapping));
    }

    adopted
}

fn rename(fa: &Fa, mapping: &[(String, String)]) -> Fa {
    let lookup = |name: &str| -> String {
        mapping
            .iter()
            .find(|(old, _)| old == name)
            .map(|(_, new)| new.clone())
            .unwrap_or_else(|| name.to_string())
    };

    let rename_cell = |cell: &Cell| -> Cell {
        match cell {
            Cell::Void | Cell::Trap => cell.clone(),
            Cell::To(name) => Cell::To(lookup(name)),
            Cell::ToMany(names) => {
                Cell::ToMany(names.iter().map(|name| lookup(name)).collect())
            }
        }
    };

    Fa {
        alphabet: fa.alphabet.clone(),
        states: mapping.iter().map(|(_, new)| new.clone()).collect(),
        initial: lookup(&fa.initial),
        acceptance: fa.acceptance.iter().map(|name| lookup(name)).collect(),
        transitions: fa
            .transitions
            .iter()
            .map(|row| row.iter().map(rename_cell).collect())
            .collect(),
    }
}

fn fresh_name(base: &str, used: &HashSet<&str>) -> String {
    let mut candidate = base.to_string();
    let mut k = 1;
    while used.contains(candidate.as_str()) {
        candidate = format!("{}_{}", base, k);
        k += 1;
    }
    candidate
}
