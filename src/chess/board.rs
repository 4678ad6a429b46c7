//! Square-centric board state: a plain mapping from each of the 64 squares to
//! the piece standing on it, if any. The mapping is small and cheap to clone,
//! which is what makes speculative move application (copy, apply, inspect)
//! practical.

use std::fmt;

use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE};

/// Occupancy of the 64 squares. [`Board`] stores no game state beyond piece
/// placement: whose turn it is, castling rights and the en passant target all
/// live in [`crate::chess::position::Position`].
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// An empty board with no pieces.
    #[must_use]
    pub(super) const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// The starting position of a regular game.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for (file, kind) in File::iter().zip(BACKRANK) {
            for player in [Player::White, Player::Black] {
                board.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece {
                        owner: player,
                        kind,
                    },
                );
                board.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece {
                        owner: player,
                        kind: PieceKind::Pawn,
                    },
                );
            }
        }
        board
    }

    /// Returns the piece standing on `square`, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    pub(super) fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Clears `square` and returns whatever stood on it.
    pub(super) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// Locates the king of `player`. A board parsed through the FEN layer
    /// always has exactly one king per side, but raw boards may not.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.owner == player && piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Counts the pieces of `player` matching `kind`.
    #[must_use]
    pub fn count(&self, player: Player, kind: PieceKind) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.owner == player && piece.kind == kind)
            .count()
    }
}

impl fmt::Display for Board {
    /// Prints the board as the piece placement chunk of the FEN format: ranks
    /// from 8th to 1st separated by '/', empty squares run-length encoded.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_run = 0;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board as a human-readable grid, ranks from top to bottom.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank} ")?;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_board() {
        let board = Board::empty();
        assert_eq!(board.pieces().count(), 0);
        assert_eq!(board.king(Player::White), None);
        assert_eq!(board.to_string(), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn starting_board() {
        let board = Board::starting();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.king(Player::White), Some(Square::E1));
        assert_eq!(board.king(Player::Black), Some(Square::E8));
        assert_eq!(board.count(Player::White, PieceKind::Pawn), 8);
        assert_eq!(board.count(Player::Black, PieceKind::Rook), 2);
        assert_eq!(
            board.at(Square::D1),
            Some(Piece {
                owner: Player::White,
                kind: PieceKind::Queen,
            })
        );
        assert_eq!(board.at(Square::E4), None);
        assert_eq!(
            board.to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn put_and_take() {
        let mut board = Board::empty();
        let knight = Piece {
            owner: Player::White,
            kind: PieceKind::Knight,
        };
        board.put(Square::G5, knight);
        assert_eq!(board.at(Square::G5), Some(knight));
        assert_eq!(board.take(Square::G5), Some(knight));
        assert_eq!(board.at(Square::G5), None);
        assert_eq!(board.take(Square::G5), None);
    }

    #[test]
    fn grid_dump() {
        let board = Board::starting();
        assert_eq!(
            format!("{board:?}"),
            "8  r n b q k b n r\n\
             7  p p p p p p p p\n\
             6  . . . . . . . .\n\
             5  . . . . . . . .\n\
             4  . . . . . . . .\n\
             3  . . . . . . . .\n\
             2  P P P P P P P P\n\
             1  R N B Q K B N R\n\
             \x20  a b c d e f g h"
        );
    }
}
