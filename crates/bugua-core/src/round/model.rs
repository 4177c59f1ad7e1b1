//! The round aggregate and its selection state machine.

use super::phase::{GamePhase, InputMode};
use crate::board::{Board, FLIP_ORDER, Slot};
use crate::cache_key::{CacheKey, build_key};
use crate::category::{Category, Gender};
use crate::deck;
use crate::divination::DivinationResult;
use crate::encoding::{GuaCode, encode};
use crate::error::{BuguaError, Result};
use crate::piece::{Piece, PieceType};
use std::collections::HashSet;
use uuid::Uuid;

/// Why a player action was ignored.
///
/// Rejections never change the round; they exist so callers can log or
/// explain what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongPhase(GamePhase),
    WrongMode(InputMode),
    UnknownPiece,
    AlreadyConsumed,
    BoardFull,
    NoTargetSlot,
    /// Every copy of this piece type is already on the board.
    TypeExhausted,
}

/// Result of a selection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Placed {
        slot: Slot,
        piece: Piece,
        /// True when this placement completed the board.
        completed: bool,
    },
    Ignored(Rejection),
}

impl SelectionOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, SelectionOutcome::Placed { .. })
    }
}

/// Everything the orchestrator needs once the round enters `ANALYZING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRequest {
    pub board: Board,
    pub code: GuaCode,
    pub category: Category,
    pub gender: Option<Gender>,
    pub key: CacheKey,
}

/// Session-scoped aggregate for one reading.
///
/// All transitions are synchronous. Events that are not valid for the current
/// phase or mode are ignored.
#[derive(Debug, Clone)]
pub struct Round {
    id: String,
    mode: InputMode,
    phase: GamePhase,
    board: Board,
    deck: Vec<Piece>,
    consumed: HashSet<String>,
    selection_count: usize,
    target_slot: Option<Slot>,
    category: Option<Category>,
    gender: Option<Gender>,
    result: Option<DivinationResult>,
}

impl Round {
    /// Starts a round. Flip mode begins in `SHUFFLING`; manual mode needs no
    /// deck and begins directly in `PICKING`.
    pub fn new(mode: InputMode) -> Self {
        let phase = match mode {
            InputMode::Flip => GamePhase::Shuffling,
            InputMode::Manual => GamePhase::Picking,
        };
        Self {
            id: Uuid::new_v4().to_string(),
            mode,
            phase,
            board: Board::new(),
            deck: Vec::new(),
            consumed: HashSet::new(),
            selection_count: 0,
            target_slot: None,
            category: None,
            gender: None,
            result: None,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &[Piece] {
        &self.deck
    }

    pub fn selection_count(&self) -> usize {
        self.selection_count
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn result(&self) -> Option<&DivinationResult> {
        self.result.as_ref()
    }

    pub fn target_slot(&self) -> Option<Slot> {
        self.target_slot
    }

    pub fn is_consumed(&self, piece_id: &str) -> bool {
        self.consumed.contains(piece_id)
    }

    /// The slot the next placement will land in, if the round is picking.
    pub fn next_slot(&self) -> Option<Slot> {
        if self.phase != GamePhase::Picking {
            return None;
        }
        match self.mode {
            InputMode::Flip => FLIP_ORDER.get(self.selection_count).copied(),
            InputMode::Manual => self
                .target_slot
                .or_else(|| self.board.empty_slots().first().copied()),
        }
    }

    // ============================================================================
    // SHUFFLING
    // ============================================================================

    /// Installs a randomized deck and advances to `PICKING`.
    ///
    /// Returns false (and does nothing) outside `SHUFFLING`.
    pub fn finish_shuffle(&mut self, deck: Vec<Piece>) -> bool {
        if self.phase != GamePhase::Shuffling {
            return false;
        }
        self.deck = deck;
        self.phase = GamePhase::Picking;
        tracing::debug!(round = %self.id, "[Round] Deck shuffled ({} pieces)", self.deck.len());
        true
    }

    pub fn shuffle(&mut self) -> bool {
        self.finish_shuffle(deck::shuffled_deck())
    }

    pub fn shuffle_from_seed(&mut self, seed: u64) -> bool {
        self.finish_shuffle(deck::shuffled_deck_from_seed(seed))
    }

    // ============================================================================
    // PICKING (flip mode)
    // ============================================================================

    /// Flips the piece at a visual deck position.
    pub fn select_at(&mut self, index: usize) -> SelectionOutcome {
        match self.deck.get(index) {
            Some(piece) => {
                let id = piece.id.clone();
                self.select_piece(&id)
            }
            None => SelectionOutcome::Ignored(Rejection::UnknownPiece),
        }
    }

    /// Flips the piece with `piece_id`; it lands in the next slot of the
    /// fixed fill order regardless of where it sits in the deck.
    pub fn select_piece(&mut self, piece_id: &str) -> SelectionOutcome {
        if self.phase != GamePhase::Picking {
            return SelectionOutcome::Ignored(Rejection::WrongPhase(self.phase));
        }
        if self.mode != InputMode::Flip {
            return SelectionOutcome::Ignored(Rejection::WrongMode(self.mode));
        }
        if self.consumed.contains(piece_id) {
            return SelectionOutcome::Ignored(Rejection::AlreadyConsumed);
        }
        let Some(slot) = FLIP_ORDER.get(self.selection_count).copied() else {
            return SelectionOutcome::Ignored(Rejection::BoardFull);
        };
        let Some(piece) = self.deck.iter().find(|p| p.id == piece_id).cloned() else {
            return SelectionOutcome::Ignored(Rejection::UnknownPiece);
        };

        self.consumed.insert(piece.id.clone());
        self.board.place(slot, piece.clone());
        self.selection_count += 1;

        let completed = self.selection_count == FLIP_ORDER.len();
        if completed {
            self.phase = GamePhase::CategorySelect;
        }
        tracing::debug!(
            round = %self.id,
            "[Round] {} -> {} ({}/5)",
            piece.label,
            slot,
            self.selection_count
        );
        SelectionOutcome::Placed {
            slot,
            piece,
            completed,
        }
    }

    // ============================================================================
    // PICKING (manual mode)
    // ============================================================================

    /// Marks the slot the next chosen piece type will go to.
    pub fn target(&mut self, slot: Slot) -> bool {
        if self.phase != GamePhase::Picking || self.mode != InputMode::Manual {
            return false;
        }
        self.target_slot = Some(slot);
        true
    }

    /// Places a freshly minted piece of `piece_type` into the targeted slot,
    /// replacing whatever was there.
    pub fn choose_piece(&mut self, piece_type: PieceType) -> SelectionOutcome {
        if self.phase != GamePhase::Picking {
            return SelectionOutcome::Ignored(Rejection::WrongPhase(self.phase));
        }
        if self.mode != InputMode::Manual {
            return SelectionOutcome::Ignored(Rejection::WrongMode(self.mode));
        }
        let Some(slot) = self.target_slot else {
            return SelectionOutcome::Ignored(Rejection::NoTargetSlot);
        };

        let label = piece_type.label();
        let elsewhere = self
            .board
            .iter()
            .filter(|(s, piece)| *s != slot && piece.is_some_and(|p| p.label == label))
            .count();
        if elsewhere >= piece_type.kind.count_per_side() {
            return SelectionOutcome::Ignored(Rejection::TypeExhausted);
        }

        let piece = Piece::mint(piece_type);
        self.board.place(slot, piece.clone());
        self.selection_count = self.board.filled_count();
        self.target_slot = None;

        SelectionOutcome::Placed {
            slot,
            piece,
            completed: self.board.is_complete(),
        }
    }

    /// Shorthand for [`Round::target`] followed by [`Round::choose_piece`].
    pub fn place(&mut self, slot: Slot, piece_type: PieceType) -> SelectionOutcome {
        if !self.target(slot) {
            let rejection = if self.phase != GamePhase::Picking {
                Rejection::WrongPhase(self.phase)
            } else {
                Rejection::WrongMode(self.mode)
            };
            return SelectionOutcome::Ignored(rejection);
        }
        self.choose_piece(piece_type)
    }

    pub fn can_confirm(&self) -> bool {
        self.phase == GamePhase::Picking
            && self.mode == InputMode::Manual
            && self.board.is_complete()
    }

    /// Leaves `PICKING` in manual mode.
    ///
    /// Returns `Ok(false)` when the event does not apply to this phase/mode and
    /// an `Incomplete` error when slots are still empty.
    pub fn confirm_board(&mut self) -> Result<bool> {
        if self.phase != GamePhase::Picking || self.mode != InputMode::Manual {
            return Ok(false);
        }
        if !self.board.is_complete() {
            return Err(BuguaError::incomplete(format!(
                "{} slot(s) still empty",
                5 - self.board.filled_count()
            )));
        }
        self.phase = GamePhase::CategorySelect;
        Ok(true)
    }

    // ============================================================================
    // CATEGORY_SELECT
    // ============================================================================

    pub fn choose_category(&mut self, category: Category) -> bool {
        if self.phase != GamePhase::CategorySelect {
            return false;
        }
        self.category = Some(category);
        true
    }

    pub fn choose_gender(&mut self, gender: Gender) -> bool {
        if self.phase != GamePhase::CategorySelect {
            return false;
        }
        self.gender = Some(gender);
        true
    }

    /// Validates the round and enters `ANALYZING`.
    ///
    /// The board is re-checked here: if it is no longer complete the round
    /// falls back to `PICKING` instead of proceeding with fewer than five
    /// pieces.
    pub fn begin_analysis(&mut self) -> Result<ReadingRequest> {
        if self.phase != GamePhase::CategorySelect {
            return Err(BuguaError::incomplete(format!(
                "a reading cannot be requested during {}",
                self.phase
            )));
        }
        if !self.board.is_complete() {
            self.phase = GamePhase::Picking;
            self.selection_count = self.board.filled_count();
            return Err(BuguaError::incomplete("the board must hold five pieces"));
        }
        let category = self
            .category
            .ok_or_else(|| BuguaError::incomplete("choose a question category"))?;
        let gender = self
            .gender
            .ok_or_else(|| BuguaError::incomplete("choose a gender"))?;

        let code = encode(&self.board)?;
        let key = build_key(code.as_str(), category, Some(gender));
        self.phase = GamePhase::Analyzing;

        Ok(ReadingRequest {
            board: self.board.clone(),
            code,
            category,
            gender: Some(gender),
            key,
        })
    }

    // ============================================================================
    // ANALYZING → RESULT
    // ============================================================================

    pub fn complete_analysis(&mut self, result: DivinationResult) -> bool {
        if self.phase != GamePhase::Analyzing {
            return false;
        }
        self.result = Some(result);
        self.phase = GamePhase::Result;
        true
    }

    // ============================================================================
    // Reset
    // ============================================================================

    /// Replaces this round with a fresh one in the same input mode.
    pub fn reset(&mut self) {
        self.reset_with_mode(self.mode);
    }

    pub fn reset_with_mode(&mut self, mode: InputMode) {
        tracing::debug!(round = %self.id, "[Round] Reset from {}", self.phase);
        *self = Round::new(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceColor, PieceKind};

    fn flip_round() -> Round {
        let mut round = Round::new(InputMode::Flip);
        assert!(round.shuffle_from_seed(7));
        round
    }

    fn dummy_result() -> DivinationResult {
        DivinationResult {
            luck_level: "小吉".to_string(),
            hexagram_name: "好朋友格".to_string(),
            analysis: "analysis".to_string(),
            advice: "advice".to_string(),
        }
    }

    #[test]
    fn test_flip_round_starts_shuffling() {
        let round = Round::new(InputMode::Flip);
        assert_eq!(round.phase(), GamePhase::Shuffling);
        assert!(round.deck().is_empty());
        assert_eq!(round.next_slot(), None);
    }

    #[test]
    fn test_manual_round_skips_shuffle() {
        let mut round = Round::new(InputMode::Manual);
        assert_eq!(round.phase(), GamePhase::Picking);
        assert!(!round.finish_shuffle(deck::shuffled_deck()));
    }

    #[test]
    fn test_selection_ignored_while_shuffling() {
        let mut round = Round::new(InputMode::Flip);
        let outcome = round.select_piece("RED_General_1");
        assert_eq!(
            outcome,
            SelectionOutcome::Ignored(Rejection::WrongPhase(GamePhase::Shuffling))
        );
        assert_eq!(round.selection_count(), 0);
    }

    #[test]
    fn test_flip_fill_order_ignores_visual_position() {
        let mut round = flip_round();
        let picks = [31, 0, 17, 4, 22];
        let expected_ids: Vec<String> = picks.iter().map(|&i| round.deck()[i].id.clone()).collect();

        for index in picks {
            assert!(round.select_at(index).is_placed());
        }

        for (slot, id) in FLIP_ORDER.iter().zip(expected_ids.iter()) {
            assert_eq!(&round.board().get(*slot).unwrap().id, id);
        }
        assert_eq!(round.phase(), GamePhase::CategorySelect);
    }

    #[test]
    fn test_consumed_piece_is_a_noop() {
        let mut round = flip_round();
        round.select_at(3);
        let before = round.board().clone();

        let outcome = round.select_at(3);
        assert_eq!(outcome, SelectionOutcome::Ignored(Rejection::AlreadyConsumed));
        assert_eq!(round.board(), &before);
        assert_eq!(round.selection_count(), 1);
        assert_eq!(round.next_slot(), Some(Slot::Left));
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut round = flip_round();
        let mut completions = 0;
        for index in 0..8 {
            if let SelectionOutcome::Placed { completed: true, .. } = round.select_at(index) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(round.selection_count(), 5);
        assert_eq!(round.phase(), GamePhase::CategorySelect);
    }

    #[test]
    fn test_manual_mode_overwrites_and_confirms() {
        let mut round = Round::new(InputMode::Manual);
        let red_horse = PieceType::new(PieceKind::Horse, PieceColor::Red);
        let black_cannon = PieceType::new(PieceKind::Cannon, PieceColor::Black);

        assert!(round.place(Slot::Bottom, red_horse).is_placed());
        assert!(round.place(Slot::Bottom, black_cannon).is_placed());
        assert_eq!(round.board().get(Slot::Bottom).unwrap().label, "包");
        assert!(round.confirm_board().unwrap_err().is_incomplete());

        assert!(round.place(Slot::Center, red_horse).is_placed());
        assert!(round.place(Slot::Left, red_horse).is_placed());
        assert!(round.place(Slot::Right, black_cannon).is_placed());
        assert!(!round.can_confirm());
        assert!(round.place(Slot::Top, PieceType::new(PieceKind::Soldier, PieceColor::Red)).is_placed());

        assert!(round.can_confirm());
        assert!(round.confirm_board().unwrap());
        assert_eq!(round.phase(), GamePhase::CategorySelect);
    }

    #[test]
    fn test_manual_mode_respects_multiplicity() {
        let mut round = Round::new(InputMode::Manual);
        let general = PieceType::new(PieceKind::General, PieceColor::Red);
        assert!(round.place(Slot::Center, general).is_placed());
        assert_eq!(
            round.place(Slot::Left, general),
            SelectionOutcome::Ignored(Rejection::TypeExhausted)
        );
        // Replacing the general's own slot is allowed.
        assert!(round.place(Slot::Center, general).is_placed());
    }

    #[test]
    fn test_manual_duplicate_types_get_distinct_ids() {
        let mut round = Round::new(InputMode::Manual);
        let soldier = PieceType::new(PieceKind::Soldier, PieceColor::Black);
        round.place(Slot::Left, soldier);
        round.place(Slot::Right, soldier);
        let left = round.board().get(Slot::Left).unwrap();
        let right = round.board().get(Slot::Right).unwrap();
        assert_ne!(left.id, right.id);
    }

    #[test]
    fn test_begin_analysis_requires_category_and_gender() {
        let mut round = flip_round();
        for index in 0..5 {
            round.select_at(index);
        }
        assert!(round.begin_analysis().unwrap_err().is_incomplete());

        round.choose_category(Category::Career);
        assert!(round.begin_analysis().unwrap_err().is_incomplete());
        assert_eq!(round.phase(), GamePhase::CategorySelect);

        round.choose_gender(Gender::Male);
        let request = round.begin_analysis().unwrap();
        assert_eq!(round.phase(), GamePhase::Analyzing);
        assert!(request.key.as_str().ends_with("_CAREER_MALE"));
        assert_eq!(request.code.tokens().count(), 5);
    }

    #[test]
    fn test_choices_ignored_outside_category_select() {
        let mut round = flip_round();
        assert!(!round.choose_category(Category::Love));
        assert!(!round.choose_gender(Gender::Female));
        assert!(round.category().is_none());
    }

    #[test]
    fn test_complete_analysis_only_from_analyzing() {
        let mut round = flip_round();
        assert!(!round.complete_analysis(dummy_result()));
        assert!(round.result().is_none());
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut round = flip_round();
        for index in 0..5 {
            round.select_at(index);
        }
        round.choose_category(Category::Health);
        round.choose_gender(Gender::Female);
        round.begin_analysis().unwrap();
        round.complete_analysis(dummy_result());
        assert_eq!(round.phase(), GamePhase::Result);

        let mut snapshots = vec![round.clone(), flip_round(), Round::new(InputMode::Flip)];
        for snapshot in snapshots.iter_mut() {
            snapshot.reset();
            assert_eq!(snapshot.phase(), GamePhase::Shuffling);
            assert_eq!(snapshot.board(), &Board::new());
            assert_eq!(snapshot.selection_count(), 0);
            assert!(snapshot.category().is_none());
            assert!(snapshot.gender().is_none());
            assert!(snapshot.result().is_none());
        }

        let mut manual = Round::new(InputMode::Manual);
        manual.place(Slot::Top, PieceType::new(PieceKind::Chariot, PieceColor::Red));
        manual.reset();
        assert_eq!(manual.phase(), GamePhase::Picking);
        assert_eq!(manual.board().filled_count(), 0);
    }
}
