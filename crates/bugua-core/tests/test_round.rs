use bugua_core::board::FLIP_ORDER;
use bugua_core::piece::piece_type_for_label;
use bugua_core::round::Rejection;
use bugua_core::{
    Category, GamePhase, Gender, InputMode, Round, SelectionOutcome, Slot, build_key, encode,
};

fn completed_flip_round(seed: u64, picks: &[usize]) -> Round {
    let mut round = Round::new(InputMode::Flip);
    round.shuffle_from_seed(seed);
    for &index in picks {
        round.select_at(index);
    }
    round
}

#[test]
fn test_full_flip_round_reaches_analyzing() {
    let mut round = completed_flip_round(42, &[5, 9, 1, 30, 12]);
    assert_eq!(round.phase(), GamePhase::CategorySelect);

    assert!(round.choose_category(Category::Love));
    assert!(round.choose_gender(Gender::Female));
    let request = round.begin_analysis().expect("complete round");

    assert_eq!(request.code, encode(round.board()).unwrap());
    assert_eq!(
        request.key,
        build_key(request.code.as_str(), Category::Love, Some(Gender::Female))
    );
    assert_eq!(round.phase(), GamePhase::Analyzing);
}

#[test]
fn test_manual_board_encodes_like_flip_board() {
    // A manual board built from the same piece types must address the same
    // record as the flipped one.
    let flipped = completed_flip_round(3, &[0, 1, 2, 3, 4]);

    let mut manual = Round::new(InputMode::Manual);
    for slot in FLIP_ORDER.iter().rev() {
        let label = &flipped.board().get(*slot).unwrap().label;
        let piece_type = piece_type_for_label(label).unwrap();
        assert!(manual.place(*slot, piece_type).is_placed());
    }
    manual.confirm_board().unwrap();

    assert_eq!(encode(flipped.board()).unwrap(), encode(manual.board()).unwrap());
}

#[test]
fn test_picks_after_completion_are_ignored() {
    let mut round = completed_flip_round(11, &[0, 1, 2, 3, 4]);
    let board = round.board().clone();

    let outcome = round.select_at(20);
    assert_eq!(
        outcome,
        SelectionOutcome::Ignored(Rejection::WrongPhase(GamePhase::CategorySelect))
    );
    assert_eq!(round.board(), &board);
}

#[test]
fn test_same_seed_same_deck() {
    let a = completed_flip_round(99, &[]);
    let b = completed_flip_round(99, &[]);
    let ids = |r: &Round| r.deck().iter().map(|p| p.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn test_flip_actions_ignored_in_manual_mode() {
    let mut round = Round::new(InputMode::Manual);
    assert_eq!(
        round.select_piece("RED_General_1"),
        SelectionOutcome::Ignored(Rejection::WrongMode(InputMode::Manual))
    );
    assert_eq!(round.next_slot(), Some(Slot::Center));
}
