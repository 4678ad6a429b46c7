//! Game orchestration on top of [`Position`]: validates move requests coming
//! from the outside (a human player or an external engine speaking UCI),
//! applies the accepted ones and classifies the result.
//!
//! [`Position`] trusts the move generator; [`Game`] trusts nobody. Every
//! request is rejected with a specific [`MoveRejected`] reason or matched
//! against the generated moves before it touches the board.

use std::collections::HashSet;
use std::fmt;

use crate::chess::core::{Move, MoveKind, PieceKind, Player, Promotion, Rank, Square};
use crate::chess::movegen;
use crate::chess::position::Position;

/// The verdict on a position, recomputed after every applied move.
///
/// `Check` is a transient status: the side to move must resolve it and always
/// can (otherwise the status would be `Checkmate`). `Checkmate` carries the
/// winner, i.e. the player who delivered the mate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The game goes on and the side to move is not in check.
    Ongoing,
    /// The given player is in check and must resolve it.
    Check(Player),
    /// The given player won by checkmate.
    Checkmate(Player),
    /// The side to move has no legal moves but is not in check: a draw.
    Stalemate,
}

impl GameStatus {
    /// Whether the game is over and no further moves are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate(_) | Self::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Check(player) => write!(f, "{player} is in check"),
            Self::Checkmate(player) => write!(f, "{player} won by checkmate"),
            Self::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// Why a move request was turned down. The variants are ordered by the stage
/// that rejects them: terminal state, source square, turn order, promotion
/// input, movement rules and finally king safety.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MoveRejected {
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("no piece on the source square {0}")]
    NoPieceAtSource(Square),
    #[error("the piece on the source square belongs to the opponent")]
    NotMoversTurn,
    #[error("a pawn reaching {0} needs an explicit promotion choice")]
    AmbiguousPromotion(Square),
    #[error("the move does not follow the movement rules")]
    NotPseudoLegal,
    #[error("the move would leave the king in check")]
    LeavesKingInCheck,
}

/// A full game: the current position plus the derived status and a bit of
/// history for presentation layers (what just moved, was it a capture).
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    status: GameStatus,
    last_move: Option<Move>,
    last_move_was_capture: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Starts a game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Starts a game from an arbitrary (parsed and validated) position.
    #[must_use]
    pub fn from_position(position: Position) -> Self {
        let status = classify(&position);
        Self {
            position,
            status,
            last_move: None,
            last_move_was_capture: false,
        }
    }

    /// Resets the game back to the starting position, dropping all history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// The last move that was applied, if any.
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Whether the last applied move captured a piece (including en passant).
    #[must_use]
    pub const fn last_move_was_capture(&self) -> bool {
        self.last_move_was_capture
    }

    /// The squares the piece on `from` can legally move to. Empty when the
    /// game is over, the square is empty or the piece belongs to the waiting
    /// player. Useful for highlighting destinations in a UI.
    #[must_use]
    pub fn legal_destinations(&self, from: Square) -> HashSet<Square> {
        if self.status.is_terminal() {
            return HashSet::new();
        }
        movegen::legal_moves(&self.position)
            .iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect()
    }

    /// Validates and applies a move request. On success the move is committed
    /// and the new status is returned; on failure the game state is
    /// untouched.
    ///
    /// A `promotion` choice is required exactly when a pawn moves to the
    /// opponent's backrank. Supplying one for any other move matches no
    /// generated move and is rejected as [`MoveRejected::NotPseudoLegal`].
    ///
    /// # Errors
    ///
    /// Returns the first [`MoveRejected`] reason that applies.
    pub fn request_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Promotion>,
    ) -> Result<GameStatus, MoveRejected> {
        if self.status.is_terminal() {
            return Err(MoveRejected::GameAlreadyOver);
        }
        let piece = self
            .position
            .at(from)
            .ok_or(MoveRejected::NoPieceAtSource(from))?;
        let us = self.position.us();
        if piece.owner != us {
            return Err(MoveRejected::NotMoversTurn);
        }
        if promotion.is_none()
            && piece.kind == PieceKind::Pawn
            && to.rank() == Rank::backrank(us.opponent())
        {
            return Err(MoveRejected::AmbiguousPromotion(to));
        }
        let candidate = movegen::pseudo_legal_moves(&self.position, us)
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion() == promotion)
            .ok_or(MoveRejected::NotPseudoLegal)?;
        let next = self.position.make(candidate);
        if next.in_check(us) {
            return Err(MoveRejected::LeavesKingInCheck);
        }
        self.last_move_was_capture =
            self.position.at(to).is_some() || candidate.kind == MoveKind::EnPassant;
        self.last_move = Some(candidate);
        self.position = next;
        self.status = classify(&self.position);
        Ok(self.status)
    }

    /// Accepts a move in UCI format ("e2e4", "a7a8q"), the way external
    /// engines and protocol frontends deliver them.
    ///
    /// # Errors
    ///
    /// Malformed input is indistinguishable from an impossible move and maps
    /// to [`MoveRejected::NotPseudoLegal`]; well-formed moves go through the
    /// same validation as [`Game::request_move`].
    pub fn request_uci_move(&mut self, uci: &str) -> Result<GameStatus, MoveRejected> {
        let (from, to, promotion) = parse_uci(uci).ok_or(MoveRejected::NotPseudoLegal)?;
        self.request_move(from, to, promotion)
    }
}

fn parse_uci(uci: &str) -> Option<(Square, Square, Option<Promotion>)> {
    if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
        return None;
    }
    let from = Square::try_from(&uci[0..2]).ok()?;
    let to = Square::try_from(&uci[2..4]).ok()?;
    let promotion = match uci.chars().nth(4) {
        Some(symbol) => Some(Promotion::try_from(symbol).ok()?),
        None => None,
    };
    Some((from, to, promotion))
}

/// Derives the status of a position. Pure: classifying the same position
/// twice yields the same answer.
#[must_use]
pub fn classify(position: &Position) -> GameStatus {
    let us = position.us();
    let in_check = position.in_check(us);
    let has_moves = !movegen::legal_moves(position).is_empty();
    match (in_check, has_moves) {
        (false, true) => GameStatus::Ongoing,
        (true, true) => GameStatus::Check(us),
        (true, false) => GameStatus::Checkmate(us.opponent()),
        (false, false) => GameStatus::Stalemate,
    }
}

// TODO: Detect draws by the fifty-move rule and by threefold repetition. The
// halfmove clock is already maintained; repetition needs a position history.
