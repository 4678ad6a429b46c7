//! Move generation: produces pseudo-legal moves for every piece kind and
//! filters them down to legal ones by applying each candidate to a copy of
//! the position and checking whether our king ends up attacked.
//!
//! Pseudo-legal means "obeys the movement pattern and occupancy rules":
//! castling gating (rights, empty lane, unattacked walk) is already resolved
//! at this stage, king safety after the move is not.

use strum::IntoEnumIterator;

use crate::chess::attacks;
use crate::chess::attacks::{BISHOP_DIRECTIONS, KING_NEIGHBORS, KNIGHT_JUMPS, ROOK_DIRECTIONS};
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    MoveKind,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::position::Position;

/// Produces all moves of `player` that follow piece movement patterns and
/// occupancy rules, ignoring whether the mover's king is left in check.
#[must_use]
pub fn pseudo_legal_moves(position: &Position, player: Player) -> MoveList {
    let mut moves = MoveList::new();
    for square in Square::iter() {
        let piece = match position.at(square) {
            Some(piece) if piece.owner == player => piece,
            _ => continue,
        };
        match piece.kind {
            PieceKind::Pawn => pawn_moves(position, player, square, &mut moves),
            PieceKind::Knight => offset_moves(position, player, square, &KNIGHT_JUMPS, &mut moves),
            PieceKind::Bishop => {
                sliding_moves(position, player, square, &BISHOP_DIRECTIONS, &mut moves);
            },
            PieceKind::Rook => {
                sliding_moves(position, player, square, &ROOK_DIRECTIONS, &mut moves);
            },
            PieceKind::Queen => {
                sliding_moves(position, player, square, &BISHOP_DIRECTIONS, &mut moves);
                sliding_moves(position, player, square, &ROOK_DIRECTIONS, &mut moves);
            },
            PieceKind::King => {
                offset_moves(position, player, square, &KING_NEIGHBORS, &mut moves);
                castle_moves(position, player, &mut moves);
            },
        }
    }
    moves
}

/// Calculates the list of legal moves for the side to move.
///
/// A candidate survives if the position after it does not leave the mover's
/// king attacked. Applying to a copy naturally covers the tricky cases: pins,
/// moving the king into a defended square and the en passant discovered
/// check.
#[must_use]
pub fn legal_moves(position: &Position) -> MoveList {
    let us = position.us();
    pseudo_legal_moves(position, us)
        .into_iter()
        .filter(|&candidate| !position.make(candidate).in_check(us))
        .collect()
}

fn pawn_moves(position: &Position, player: Player, from: Square, moves: &mut MoveList) {
    let push = player.push_direction();
    // Single push, and the double push when the single one is available from
    // the starting rank.
    if let Some(to) = from.shift(0, push) {
        if position.at(to).is_none() {
            push_pawn_move(player, from, to, MoveKind::Regular, moves);
            if from.rank() == Rank::pawns_starting(player) {
                if let Some(to) = from.shift(0, 2 * push) {
                    if position.at(to).is_none() {
                        moves.push(Move::new(from, to, MoveKind::DoublePush));
                    }
                }
            }
        }
    }
    // Diagonal captures, including en passant.
    for file_delta in [-1, 1] {
        let to = match from.shift(file_delta, push) {
            Some(to) => to,
            None => continue,
        };
        match position.at(to) {
            Some(piece) if piece.owner != player => {
                push_pawn_move(player, from, to, MoveKind::Capture, moves);
            },
            Some(_) => (),
            None => {
                if position.en_passant_square() == Some(to) {
                    moves.push(Move::new(from, to, MoveKind::EnPassant));
                }
            },
        }
    }
}

// A pawn reaching the opponent's backrank fans out into all four promotion
// choices; everywhere else it keeps the kind it was generated with.
fn push_pawn_move(player: Player, from: Square, to: Square, kind: MoveKind, moves: &mut MoveList) {
    if to.rank() == Rank::backrank(player.opponent()) {
        for promotion in [
            Promotion::Queen,
            Promotion::Rook,
            Promotion::Bishop,
            Promotion::Knight,
        ] {
            moves.push(Move::new(from, to, MoveKind::Promotion(promotion)));
        }
    } else {
        moves.push(Move::new(from, to, kind));
    }
}

fn offset_moves(
    position: &Position,
    player: Player,
    from: Square,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(file_delta, rank_delta) in offsets {
        let to = match from.shift(file_delta, rank_delta) {
            Some(to) => to,
            None => continue,
        };
        match position.at(to) {
            None => moves.push(Move::new(from, to, MoveKind::Regular)),
            Some(piece) if piece.owner != player => {
                moves.push(Move::new(from, to, MoveKind::Capture));
            },
            Some(_) => (),
        }
    }
}

fn sliding_moves(
    position: &Position,
    player: Player,
    from: Square,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(file_delta, rank_delta) in directions {
        let mut to = from;
        while let Some(next) = to.shift(file_delta, rank_delta) {
            to = next;
            match position.at(to) {
                None => moves.push(Move::new(from, to, MoveKind::Regular)),
                Some(piece) => {
                    if piece.owner != player {
                        moves.push(Move::new(from, to, MoveKind::Capture));
                    }
                    break;
                },
            }
        }
    }
}

// A castle move is only emitted when every precondition holds: the right is
// intact, the king and the rook stand on their home squares, the squares
// between them are empty and the king's walk (start, crossed and destination
// squares) is not attacked. Otherwise the move does not exist at all.
fn castle_moves(position: &Position, player: Player, moves: &mut MoveList) {
    let backrank = Rank::backrank(player);
    let king_home = Square::new(File::E, backrank);
    let king = Piece {
        owner: player,
        kind: PieceKind::King,
    };
    if position.at(king_home) != Some(king)
        || attacks::attacked(position.board(), king_home, player.opponent())
    {
        return;
    }
    let rook = Piece {
        owner: player,
        kind: PieceKind::Rook,
    };
    if position.castling().contains(CastleRights::short(player))
        && position.at(Square::new(File::H, backrank)) == Some(rook)
        && [File::F, File::G]
            .iter()
            .all(|&file| position.at(Square::new(file, backrank)).is_none())
        && [File::F, File::G].iter().all(|&file| {
            !attacks::attacked(
                position.board(),
                Square::new(file, backrank),
                player.opponent(),
            )
        })
    {
        moves.push(Move::new(
            king_home,
            Square::new(File::G, backrank),
            MoveKind::CastleShort,
        ));
    }
    if position.castling().contains(CastleRights::long(player))
        && position.at(Square::new(File::A, backrank)) == Some(rook)
        && [File::B, File::C, File::D]
            .iter()
            .all(|&file| position.at(Square::new(file, backrank)).is_none())
        && [File::C, File::D].iter().all(|&file| {
            !attacks::attacked(
                position.board(),
                Square::new(file, backrank),
                player.opponent(),
            )
        })
    {
        moves.push(Move::new(
            king_home,
            Square::new(File::C, backrank),
            MoveKind::CastleLong,
        ));
    }
}
