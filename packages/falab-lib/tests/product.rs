use falab_lib::automaton::{
    product::{boolean, Mode},
    Cell, Fa,
};
use falab_lib::error::FaError;

fn cell(target: &str) -> Cell {
    match target {
        "@v" => Cell::Void,
        name => Cell::To(name.to_string()),
    }
}

/// Total DFA over {a, b} accepting strings ending in `a`.
fn ends_in_a() -> Fa {
    Fa {
        alphabet: vec!["a".into(), "b".into()],
        states: vec!["A0".into(), "A1".into()],
        initial: "A0".into(),
        acceptance: vec!["A1".into()],
        transitions: vec![
            vec![cell("A1"), cell("A0")],
            vec![cell("A1"), cell("A0")],
        ],
    }
}

/// Total DFA over {a, b} accepting strings of even length.
fn even_length() -> Fa {
    Fa {
        alphabet: vec!["a".into(), "b".into()],
        states: vec!["B0".into(), "B1".into()],
        initial: "B0".into(),
        acceptance: vec!["B0".into()],
        transitions: vec![
            vec![cell("B1"), cell("B1")],
            vec![cell("B0"), cell("B0")],
        ],
    }
}

#[test]
fn intersection_of_ends_in_a_and_even_length() {
    let product = boolean(&[ends_in_a(), even_length()], Mode::Intersection).unwrap();

    assert_eq!(product.states.len(), 4);
    assert_eq!(product.initial, "A0|B0");
    assert_eq!(product.acceptance, vec!["A1|B0".to_string()]);

    assert!(product.run("aa").accepted);
    assert!(!product.run("a").accepted);
    assert!(!product.run("ab").accepted);
    assert!(product.run("bbba").accepted);
}

#[test]
fn union_matches_disjunction_of_the_components() {
    let a = ends_in_a();
    let b = even_length();
    let product = boolean(&[a.clone(), b.clone()], Mode::Union).unwrap();

    for word in [
        "", "a", "b", "aa", "ab", "ba", "bb", "aab", "abb", "abab", "baba", "bbbab",
    ] {
        assert_eq!(
            product.run(word).accepted,
            a.run(word).accepted || b.run(word).accepted,
            "disagreement on {:?}",
            word
        );
    }
}

#[test]
fn intersection_matches_conjunction_of_the_components() {
    let a = ends_in_a();
    let b = even_length();
    let product = boolean(&[a.clone(), b.clone()], Mode::Intersection).unwrap();

    for word in ["", "a", "aa", "ab", "ba", "aaba", "abab", "bba"] {
        assert_eq!(
            product.run(word).accepted,
            a.run(word).accepted && b.run(word).accepted,
            "disagreement on {:?}",
            word
        );
    }
}

#[test]
fn three_way_product_enumerates_the_full_cross_space() {
    let product = boolean(
        &[ends_in_a(), even_length(), ends_in_a()],
        Mode::Intersection,
    )
    .unwrap();

    assert_eq!(product.states.len(), 8);
    assert_eq!(product.initial, "A0|B0|A0");
    assert!(product.run("aa").accepted);
    assert!(!product.run("ab").accepted);
}

#[test]
fn alphabet_order_matters() {
    let mut swapped = even_length();
    swapped.alphabet = vec!["b".into(), "a".into()];

    assert!(matches!(
        boolean(&[ends_in_a(), swapped], Mode::Union),
        Err(FaError::AlphabetMismatch(_))
    ));
}

#[test]
fn fewer_than_two_inputs_is_an_arity_error() {
    assert!(matches!(
        boolean(&[ends_in_a()], Mode::Union),
        Err(FaError::Arity(_))
    ));
    assert!(matches!(boolean(&[], Mode::Union), Err(FaError::Arity(_))));
}

#[test]
fn undefined_component_edge_voids_the_product_cell() {
    let mut partial = ends_in_a();
    partial.transitions[0][1] = Cell::Void;

    let product = boolean(&[partial, even_length()], Mode::Union).unwrap();
    let row = product
        .states
        .iter()
        .position(|s| s == "A0|B0")
        .unwrap();
    assert_eq!(product.transitions[row][1], Cell::Void);
}
