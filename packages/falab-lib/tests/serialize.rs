use falab_lib::automaton::{Cell, Fa};
use falab_lib::error::FaError;

#[test]
fn round_trips_a_record_with_sets_and_sentinels() {
    let raw = r#"{
        "alphabet": ["a", "b", "@e"],
        "states": ["q0", "q1", "@t"],
        "initial": "q0",
        "acceptance": ["q1"],
        "transitions": [
            [["q0", "q1"], "@t", "q1"],
            ["@v", "q1", "@v"],
            ["@t", "@t", "@t"]
        ]
    }"#;

    let fa = Fa::from_json(raw).unwrap();

    assert_eq!(fa.alphabet, vec!["a", "b", "@e"]);
    assert_eq!(fa.states, vec!["q0", "q1", "@t"]);
    assert_eq!(
        fa.transitions[0][0],
        Cell::ToMany(vec!["q0".into(), "q1".into()])
    );
    assert_eq!(fa.transitions[0][1], Cell::Trap);
    assert_eq!(fa.transitions[1][0], Cell::Void);

    let value = serde_json::to_value(&fa).unwrap();
    assert_eq!(value["transitions"][0][0], serde_json::json!(["q0", "q1"]));
    assert_eq!(value["transitions"][0][1], serde_json::json!("@t"));
    assert_eq!(value["transitions"][1][0], serde_json::json!("@v"));
    assert_eq!(value["transitions"][1][1], serde_json::json!("q1"));

    // a full decode of the emitted record is identical
    let again = Fa::from_json(&value.to_string()).unwrap();
    assert_eq!(again, fa);
}

#[test]
fn rejects_empty_states_and_empty_alphabet() {
    let no_states =
        r#"{"alphabet":["a"],"states":[],"initial":"q0","acceptance":[],"transitions":[]}"#;
    assert!(matches!(
        Fa::from_json(no_states),
        Err(FaError::InvalidAutomaton(_))
    ));

    let no_alphabet =
        r#"{"alphabet":[],"states":["q0"],"initial":"q0","acceptance":[],"transitions":[[]]}"#;
    assert!(matches!(
        Fa::from_json(no_alphabet),
        Err(FaError::InvalidAutomaton(_))
    ));
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        Fa::from_json("{not json"),
        Err(FaError::InvalidAutomaton(_))
    ));
}

#[test]
fn field_order_of_the_record_is_preserved() {
    let fa = Fa {
        alphabet: vec!["b".into(), "a".into()],
        states: vec!["s1".into(), "s0".into()],
        initial: "s1".into(),
        acceptance: vec!["s0".into()],
        transitions: vec![
            vec![Cell::To("s0".into()), Cell::Void],
            vec![Cell::Void, Cell::To("s1".into())],
        ],
    };

    let value = serde_json::to_value(&fa).unwrap();
    assert_eq!(value["alphabet"], serde_json::json!(["b", "a"]));
    assert_eq!(value["states"], serde_json::json!(["s1", "s0"]));
}
