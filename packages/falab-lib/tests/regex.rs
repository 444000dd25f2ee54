use falab_lib::automaton::{regex::regex_to_nfa, Cell, Fa};
use falab_lib::error::FaError;
use falab_lib::validation::assert_same_language;

#[test]
fn thompson_of_ab() {
    let nfa = regex_to_nfa("ab").unwrap();

    assert_eq!(nfa.states, vec!["q0", "q1", "q2", "q3"]);
    assert_eq!(nfa.alphabet, vec!["a", "b", "@e"]);
    assert_eq!(nfa.initial, "q0");
    assert_eq!(nfa.acceptance, vec!["q3".to_string()]);

    // q0 -a-> q1 -ε-> q2 -b-> q3
    assert_eq!(nfa.transitions[0][0], Cell::To("q1".into()));
    assert_eq!(nfa.transitions[1][2], Cell::To("q2".into()));
    assert_eq!(nfa.transitions[2][1], Cell::To("q3".into()));

    assert!(nfa.run("ab").accepted);
    assert!(!nfa.run("a").accepted);
    assert!(!nfa.run("ba").accepted);
}

#[test]
fn empty_language_and_empty_word() {
    let empty = regex_to_nfa("∅").unwrap();
    assert_eq!(empty.states.len(), 1);
    assert!(empty.acceptance.is_empty());
    assert!(!empty.run("").accepted);

    let epsilon = regex_to_nfa("ε").unwrap();
    assert_eq!(epsilon.states.len(), 1);
    assert_eq!(epsilon.acceptance, vec!["q0".to_string()]);
    assert!(epsilon.run("").accepted);

    // the empty input denotes the empty language
    let blank = regex_to_nfa("").unwrap();
    assert!(blank.acceptance.is_empty());
}

#[test]
fn union_star_and_plus() {
    let nfa = regex_to_nfa("(a∪b)*abb").unwrap();
    for accepted in ["abb", "aabb", "babb", "abababb"] {
        assert!(nfa.run(accepted).accepted, "expected {:?}", accepted);
    }
    for rejected in ["", "ab", "abba", "bba"] {
        assert!(!nfa.run(rejected).accepted, "did not expect {:?}", rejected);
    }

    // the canonical minimal acceptor of (a|b)*abb has four states
    let minimal = nfa.determinize().unwrap().minimize().unwrap();
    assert_eq!(minimal.states.len(), 4);

    let plus = regex_to_nfa("a+").unwrap();
    assert!(!plus.run("").accepted);
    assert!(plus.run("a").accepted);
    assert!(plus.run("aaa").accepted);

    let star = regex_to_nfa("a∗").unwrap();
    assert!(star.run("").accepted);
    assert!(star.run("aa").accepted);
}

#[test]
fn parse_failures_surface_as_parse_errors() {
    assert!(matches!(regex_to_nfa("(ab"), Err(FaError::Parse(_))));
    assert!(matches!(regex_to_nfa("a)b"), Err(FaError::Parse(_))));
}

/// Two-state DFA accepting `a*b`.
fn a_star_b() -> Fa {
    Fa {
        alphabet: vec!["a".into(), "b".into()],
        states: vec!["p".into(), "r".into()],
        initial: "p".into(),
        acceptance: vec!["r".into()],
        transitions: vec![
            vec![Cell::To("p".into()), Cell::To("r".into())],
            vec![Cell::Void, Cell::Void],
        ],
    }
}

#[test]
fn state_elimination_of_a_star_b() {
    let dfa = a_star_b();
    let regex = dfa.to_regex().unwrap();

    // parenthesization is not canonical; compare languages instead
    let round_tripped = regex_to_nfa(&regex).unwrap();
    assert_same_language(&dfa, &round_tripped, 6);
    assert!(round_tripped.run("b").accepted);
    assert!(round_tripped.run("aaab").accepted);
    assert!(!round_tripped.run("ba").accepted);
}

#[test]
fn state_elimination_of_the_empty_language() {
    let no_acceptance = Fa {
        acceptance: vec![],
        ..a_star_b()
    };
    assert_eq!(no_acceptance.to_regex().unwrap(), "∅");
}

#[test]
fn regex_round_trip_preserves_the_language() {
    for regex in ["ab", "a*", "ab∪ba"] {
        let nfa = regex_to_nfa(regex).unwrap();
        let eliminated = nfa.to_regex().unwrap();
        let again = regex_to_nfa(&eliminated).unwrap();
        assert_same_language(&nfa, &again, 5);
    }

    // the larger expressions go through the DFA pipeline first, which keeps
    // the eliminated strings small
    for regex in ["(a∪b)*abb", "a+b", "(ab)*"] {
        let nfa = regex_to_nfa(regex).unwrap();
        let dfa = nfa.determinize().unwrap().minimize().unwrap();
        let again = regex_to_nfa(&dfa.to_regex().unwrap()).unwrap();
        assert_same_language(&nfa, &again, 6);
    }
}

#[test]
fn thompson_output_satisfies_the_shape_invariants() {
    for regex in ["(a∪b)*abb", "a+b∪ε", "((a))", "abc"] {
        let nfa = regex_to_nfa(regex).unwrap();

        assert_eq!(nfa.transitions.len(), nfa.states.len());
        for row in &nfa.transitions {
            assert_eq!(row.len(), nfa.alphabet.len());
        }
        assert!(nfa.states.contains(&nfa.initial));
        for accept in &nfa.acceptance {
            assert!(nfa.states.contains(accept));
        }
        for row in &nfa.transitions {
            for cell in row {
                for target in cell.targets() {
                    assert!(nfa.states.iter().any(|s| s == target));
                }
            }
        }
    }
}
