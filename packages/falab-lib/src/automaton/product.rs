use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Cell, Fa, JOIN},
    error::FaError,
};

/// Boolean combination mode for the synchronous product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Union,
    Intersection,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "union" => Ok(Mode::Union),
            "intersection" => Ok(Mode::Intersection),
            _ => Err(format!("Invalid mode: {}", s)),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Union => write!(f, "union"),
            Mode::Intersection => write!(f, "intersection"),
        }
    }
}

/// Checks element-wise alphabet equality across all inputs.
fn require_same_alphabet(fas: &[Fa]) -> Result<(), FaError> {
    let first = &fas[0];
    for fa in &fas[1..] {
        if fa.alphabet != first.alphabet {
            return Err(FaError::AlphabetMismatch(format!(
                "expected alphabet {:?}, got {:?}",
                first.alphabet, fa.alphabet
            )));
        }
    }
    Ok(())
}

/// Synchronous product of two or more automata over one shared alphabet.
///
/// States are k-tuples of component states named `s1|…|sk`. A tuple accepts
/// under `Intersection` when every component accepts and under `Union` when
/// at least one does. The product is guarded: a transition undefined in any
/// component is undefined in the product, so boolean semantics are promised
/// for total DFAs and partial inputs should be totalized (e.g. via subset
/// construction) first.
pub fn boolean(fas: &[Fa], mode: Mode) -> Result<Fa, FaError> {
    if fas.len() < 2 {
        return Err(FaError::Arity(format!(
            "boolean needs at least two automata, got {}",
            fas.len()
        )));
    }
    require_same_alphabet(fas)?;

    let alphabet = fas[0].alphabet.clone();

    let tuples: Vec<Vec<usize>> = fas
        .iter()
        .map(|fa| (0..fa.states.len()).collect::<Vec<_>>())
        .multi_cartesian_product()
        .collect();

    let mut states = Vec::with_capacity(tuples.len());
    let mut acceptance = Vec::new();
    let mut transitions = Vec::with_capacity(tuples.len());

    for tuple in &tuples {
        let name = tuple
            .iter()
            .zip(fas)
            .map(|(&state, fa)| fa.states[state].as_str())
            .join(JOIN);

        let accepts = match mode {
            Mode::Intersection => tuple
                .iter()
                .zip(fas)
                .all(|(&state, fa)| fa.is_accepting(&fa.states[state])),
            Mode::Union => tuple
                .iter()
                .zip(fas)
                .any(|(&state, fa)| fa.is_accepting(&fa.states[state])),
        };
        if accepts {
            acceptance.push(name.clone());
        }

        let mut row = Vec::with_capacity(alphabet.len());
        for symbol in 0..alphabet.len() {
            row.push(product_cell(fas, tuple, symbol)?);
        }

        states.push(name);
        transitions.push(row);
    }

    let initial = fas.iter().map(|fa| fa.initial.as_str()).join(JOIN);

    Ok(Fa {
        alphabet,
        states,
        initial,
        acceptance,
        transitions,
    })
}

/// Cartesian product of the component next-sets on one symbol; `@v` on any
/// component voids the whole cell.
fn product_cell(fas: &[Fa], tuple: &[usize], symbol: usize) -> Result<Cell, FaError> {
    let mut components: Vec<Vec<&str>> = Vec::with_capacity(fas.len());

    for (&state, fa) in tuple.iter().zip(fas) {
        let targets: Vec<&str> = fa.cell(state, symbol).targets().collect();
        if targets.is_empty() {
            return Ok(Cell::Void);
        }
        for target in &targets {
            fa.require_state(target)?;
        }
        components.push(targets);
    }

    let combined = components
        .into_iter()
        .multi_cartesian_product()
        .map(|combo| combo.join(JOIN));

    Ok(Cell::normalize(combined))
}
