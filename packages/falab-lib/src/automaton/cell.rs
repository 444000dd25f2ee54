use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::automaton::{TRAP, VOID};

/// A single entry of the transition matrix.
///
/// The wire format stores a cell as either one JSON string (a state name or
/// the sentinels `@v`/`@t`) or an array of at least two state names.
/// Sentinels round-trip verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// No transition.
    Void,
    /// The totalizing trap state, before or after it is materialized as a
    /// state named `@t`.
    Trap,
    /// A single target state.
    To(String),
    /// A set of at least two target states.
    ToMany(Vec<String>),
}

impl Cell {
    /// Collapses a list of candidate targets into canonical form: `@v`
    /// entries are dropped, duplicates removed (first occurrence wins), an
    /// empty result is `Void` and a singleton is `To`.
    pub fn normalize<I, S>(targets: I) -> Cell
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();

        for target in targets {
            let target = target.into();
            if target == VOID {
                continue;
            }
            if !kept.contains(&target) {
                kept.push(target);
            }
        }

        match kept.len() {
            0 => Cell::Void,
            1 => Cell::To(kept.swap_remove(0)),
            _ => Cell::ToMany(kept),
        }
    }

    /// Iterates the concrete state names this cell references. `Trap`
    /// references the `@t` state; `Void` references nothing.
    pub fn targets(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Cell::Void => Box::new(std::iter::empty()),
            Cell::Trap => Box::new(std::iter::once(TRAP)),
            Cell::To(name) => Box::new(std::iter::once(name.as_str())),
            Cell::ToMany(names) => Box::new(names.iter().map(String::as_str)),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Cell::Void)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Void => serializer.serialize_str(VOID),
            Cell::Trap => serializer.serialize_str(TRAP),
            Cell::To(name) => serializer.serialize_str(name),
            Cell::ToMany(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellVisitor;

        impl<'de> de::Visitor<'de> for CellVisitor {
            type Value = Cell;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a state name, a sentinel, or an array of state names")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Cell, E> {
                Ok(match value {
                    VOID => Cell::Void,
                    TRAP => Cell::Trap,
                    name => Cell::To(name.to_string()),
                })
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Cell, A::Error> {
                let mut names: Vec<String> = Vec::new();
                while let Some(name) = seq.next_element::<String>()? {
                    names.push(name);
                }
                Ok(Cell::normalize(names))
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}
