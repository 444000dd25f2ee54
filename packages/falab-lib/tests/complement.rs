use falab_lib::automaton::{regex::regex_to_nfa, Fa};
use falab_lib::validation::{assert_inverse_language, assert_same_language};

/// Total DFA via the subset construction, trap included.
fn total_dfa_of(regex: &str) -> Fa {
    regex_to_nfa(regex).unwrap().determinize().unwrap()
}

#[test]
fn complement_inverts_the_language_of_a_total_dfa() {
    let dfa = total_dfa_of("(a∪b)*ab");
    let complemented = dfa.complement();

    assert_inverse_language(&dfa, &complemented, 6);
    assert!(!complemented.run("ab").accepted);
    assert!(complemented.run("").accepted);
    assert!(complemented.run("ba").accepted);
}

#[test]
fn double_complement_is_the_identity_language() {
    let dfa = total_dfa_of("a*b");
    let twice = dfa.complement().complement();

    assert_same_language(&dfa, &twice, 6);
    assert_eq!(twice.acceptance.len(), dfa.acceptance.len());
}

#[test]
fn complement_leaves_the_structure_untouched() {
    let dfa = total_dfa_of("ab");
    let complemented = dfa.complement();

    assert_eq!(complemented.states, dfa.states);
    assert_eq!(complemented.alphabet, dfa.alphabet);
    assert_eq!(complemented.initial, dfa.initial);
    assert_eq!(complemented.transitions, dfa.transitions);

    for state in &dfa.states {
        assert_ne!(
            dfa.is_accepting(state),
            complemented.is_accepting(state),
            "acceptance must flip for {:?}",
            state
        );
    }
}
