use pijersi_engine::search::{EvalWeights, Evaluator};
use pijersi_engine::EngineError;
use pretty_assertions::assert_eq;

#[test]
fn default_weights_round_trip() {
    let w = EvalWeights::default();
    assert!(w.validate().is_ok());
    assert_eq!(w.win_score(), 1920);
    let text = serde_json::to_string(&w).unwrap();
    assert_eq!(EvalWeights::from_json(&text).unwrap(), w);
}

#[test]
fn goal_row_must_dominate() {
    let mut w = EvalWeights::default();
    w.win_multiplier = 2;
    assert!(matches!(w.validate(), Err(EngineError::InvalidWeights(_))));
    assert!(Evaluator::new(w).is_err());
}

#[test]
fn negative_scores_are_rejected() {
    let mut w = EvalWeights::default();
    w.wise = -1;
    assert!(matches!(w.validate(), Err(EngineError::InvalidWeights(_))));
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(EvalWeights::from_json("{\"row_scores\": 3}"), Err(EngineError::Json(_))));
}

#[test]
fn custom_weights_change_scores() {
    use pijersi_engine::board::Position;
    let mut w = EvalWeights::default();
    w.wise = 20;
    let eval = Evaluator::new(w).unwrap();
    // Symmetric start stays balanced under any weights.
    assert_eq!(eval.evaluate(Position::start().cells()), 0);
    let mut cells = [0u8; 45];
    cells[22] = 13;
    assert_eq!(eval.evaluate(&cells), 20);
}

#[test]
fn load_weights_from_file() {
    use std::fs;
    let dir = std::path::Path::new("target/weights_test");
    fs::create_dir_all(dir).unwrap();
    let path = dir.join("weights.json");
    let mut w = EvalWeights::default();
    w.stack_bonus = 5;
    fs::write(&path, serde_json::to_string_pretty(&w).unwrap()).unwrap();
    assert_eq!(EvalWeights::load(&path).unwrap(), w);
}

#[test]
fn overflowing_weights_are_rejected() {
    let mut w = EvalWeights::default();
    w.row_scores[0] = 100_000;
    w.win_multiplier = 100_000;
    let text = serde_json::to_string(&w).unwrap();
    assert!(matches!(EvalWeights::from_json(&text), Err(EngineError::InvalidWeights(_))));

    let mut w = EvalWeights::default();
    w.wise = i32::MAX;
    assert!(matches!(w.validate(), Err(EngineError::InvalidWeights(_))));

    let mut w = EvalWeights::default();
    w.row_scores[0] = i32::MAX;
    w.stack_bonus = i32::MAX;
    assert!(matches!(w.validate(), Err(EngineError::InvalidWeights(_))));
    assert_eq!(w.win_score(), i32::MAX);
}
