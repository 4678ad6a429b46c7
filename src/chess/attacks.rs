//! Attack detection on the square-centric board. A square is attacked if a
//! piece of the given color could capture on it right now; whether that piece
//! is itself pinned does not matter. Sliding attacks stop at the first
//! occupied square in each direction.

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Player, Square};

pub(super) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(super) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(super) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
pub(super) const KING_NEIGHBORS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Checks whether any piece of `by` attacks `target`.
#[must_use]
pub fn attacked(board: &Board, target: Square, by: Player) -> bool {
    for (file_delta, rank_delta) in ROOK_DIRECTIONS {
        if ray_hits(board, target, file_delta, rank_delta, by, PieceKind::Rook) {
            return true;
        }
    }
    for (file_delta, rank_delta) in BISHOP_DIRECTIONS {
        if ray_hits(board, target, file_delta, rank_delta, by, PieceKind::Bishop) {
            return true;
        }
    }
    for (file_delta, rank_delta) in KNIGHT_JUMPS {
        if probe(board, target, file_delta, rank_delta, by, PieceKind::Knight) {
            return true;
        }
    }
    for (file_delta, rank_delta) in KING_NEIGHBORS {
        if probe(board, target, file_delta, rank_delta, by, PieceKind::King) {
            return true;
        }
    }
    // A pawn of `by` attacks `target` if it stands one rank behind it (from
    // the attacker's perspective) on an adjacent file.
    let pawn_rank_delta = -by.push_direction();
    probe(board, target, -1, pawn_rank_delta, by, PieceKind::Pawn)
        || probe(board, target, 1, pawn_rank_delta, by, PieceKind::Pawn)
}

/// Walks from `target` in the given direction until the first occupied square
/// and checks whether it holds an attacking slider. Queens attack along both
/// rook and bishop directions.
fn ray_hits(
    board: &Board,
    target: Square,
    file_delta: i8,
    rank_delta: i8,
    by: Player,
    slider: PieceKind,
) -> bool {
    let mut square = target;
    while let Some(next) = square.shift(file_delta, rank_delta) {
        square = next;
        if let Some(piece) = board.at(square) {
            return piece.owner == by && (piece.kind == slider || piece.kind == PieceKind::Queen);
        }
    }
    false
}

fn probe(
    board: &Board,
    target: Square,
    file_delta: i8,
    rank_delta: i8,
    by: Player,
    kind: PieceKind,
) -> bool {
    matches!(
        target.shift(file_delta, rank_delta).and_then(|square| board.at(square)),
        Some(piece) if piece.owner == by && piece.kind == kind
    )
}
