//! Provides fully-specified [Chess Position] implementation: stores
//! information about the board and tracks the state of castling, 50-move rule
//! draw, etc.
//!
//! Positions are values: applying a move produces a new position and leaves
//! the old one untouched, which is what the legality filter in
//! [`crate::chess::movegen`] relies on.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks;
use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    MoveKind,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::chess::movegen;

/// State of the chess game: board, half-move counters, castling rights and
/// the en passant target. It has 1:1 relationship with [Forsyth-Edwards
/// Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD format accepted here does not support
/// [Operations]: even though it is an important part of EPD, in practice it is
/// rarely needed. The EPD support exists for compatibility with some databases
/// which provide trimmed FEN lines (all FEN parts except Halfmove Clock and
/// Fullmove Counter).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use arbiter::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty()
        }
    }

    // Creates an empty board to be filled by the parser.
    fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// The player whose turn it is to move.
    #[must_use]
    pub const fn us(&self) -> Player {
        self.side_to_move
    }

    /// The player waiting for their turn.
    #[must_use]
    pub const fn they(&self) -> Player {
        self.us().opponent()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece standing on `square`, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn just skipped with a double push, valid for exactly
    /// one ply.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// Checks whether the king of `player` is currently attacked.
    ///
    /// # Panics
    ///
    /// Panics if `player` has no king on the board. Positions constructed
    /// through the FEN layer always have one.
    #[must_use]
    pub fn in_check(&self, player: Player) -> bool {
        let king = match self.board.king(player) {
            Some(square) => square,
            None => unreachable!("a parsed position always has both kings"),
        };
        attacks::attacked(&self.board, king, player.opponent())
    }

    /// Calculates the list of legal moves (i.e. the moves that do not leave
    /// our king in check).
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    /// Produces the position after `next_move`. The move must come from the
    /// generator: applying an arbitrary move is not checked here and can
    /// produce a nonsensical position.
    #[must_use]
    pub fn make(&self, next_move: Move) -> Self {
        let mut next = self.clone();
        next.apply(next_move);
        next
    }

    fn apply(&mut self, next_move: Move) {
        let us = self.us();
        let piece = match self.board.take(next_move.from) {
            Some(piece) => piece,
            None => unreachable!("generated moves always start on an occupied square"),
        };
        let captured = self.board.take(next_move.to);
        match next_move.kind {
            MoveKind::Promotion(promotion) => {
                self.board.put(
                    next_move.to,
                    Piece {
                        owner: us,
                        kind: promotion.into(),
                    },
                );
            },
            MoveKind::EnPassant => {
                self.board.put(next_move.to, piece);
                // The captured pawn is behind the destination square, on the
                // rank the capturing pawn came from.
                let _ = self
                    .board
                    .take(Square::new(next_move.to.file(), next_move.from.rank()));
            },
            MoveKind::CastleShort => {
                self.board.put(next_move.to, piece);
                let backrank = Rank::backrank(us);
                if let Some(rook) = self.board.take(Square::new(File::H, backrank)) {
                    self.board.put(Square::new(File::F, backrank), rook);
                }
            },
            MoveKind::CastleLong => {
                self.board.put(next_move.to, piece);
                let backrank = Rank::backrank(us);
                if let Some(rook) = self.board.take(Square::new(File::A, backrank)) {
                    self.board.put(Square::new(File::D, backrank), rook);
                }
            },
            MoveKind::Regular | MoveKind::Capture | MoveKind::DoublePush => {
                self.board.put(next_move.to, piece);
            },
        }
        // A move touching a king or rook home square strips the corresponding
        // rights, whether the piece moved away or was captured there.
        self.castling
            .remove(castle_rights_mask(next_move.from) | castle_rights_mask(next_move.to));
        self.en_passant_square = match next_move.kind {
            MoveKind::DoublePush => next_move.from.shift(0, us.push_direction()),
            _ => None,
        };
        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = us.opponent();
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    /// Technically, that is not a full FEN position, but it is supported
    /// because EPD-style position strings are common in public position books
    /// and datasets where halfmove clock and fullmove counters do not matter.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is malformed or describes an
    /// impossible position (missing kings, too many pawns, pawns on the
    /// backranks, inconsistent en passant target).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        // Parse Piece Placement.
        let mut result = Self::empty();
        let pieces_placement = match parts.next() {
            Some(placement) => placement,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let ranks = pieces_placement.split('/');
        let mut rank_id = 8;
        for rank_fen in ranks {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file > BOARD_WIDTH {
                    bail!("file exceeded {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='9' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                result.board.put(Square::new(file.try_into()?, rank), piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        result.halfmove_clock = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                match value.parse::<u8>() {
                    Ok(num) => num,
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("incorrect FEN: halfmove clock can not be parsed {value}")
                        });
                    },
                }
            },
            // This is a correct EPD: exit early.
            None => {
                result.validate()?;
                return Ok(result);
            },
        };
        result.fullmove_counter = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("fullmove counter can not contain anything other than digits");
                }
                match value.parse::<NonZeroU16>() {
                    Ok(num) => num,
                    Err(e) => {
                        return Err(e).with_context(|| {
                            format!("incorrect FEN: fullmove counter can not be parsed {value}")
                        });
                    },
                }
            },
            None => bail!("incorrect FEN: missing fullmove counter"),
        };
        match parts.next() {
            None => {
                result.validate()?;
                Ok(result)
            },
            Some(_) => bail!("trailing symbols are not allowed in FEN"),
        }
    }

    // Rejects positions that parse but can not occur in a game.
    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let kings = self.board.count(player, PieceKind::King);
            if kings != 1 {
                bail!(
                    "expected 1 {} king, got {kings}",
                    player_name(player)
                );
            }
            let pawns = self.board.count(player, PieceKind::Pawn);
            if pawns > 8 {
                bail!(
                    "expected <= 8 {} pawns, got {pawns}",
                    player_name(player)
                );
            }
        }
        for (square, piece) in self.board.pieces() {
            if piece.kind == PieceKind::Pawn
                && (square.rank() == Rank::One || square.rank() == Rank::Eight)
            {
                bail!("pawns can not stand on the backranks, got one on {square}");
            }
        }
        // The player who just moved can not have left their own king in
        // check.
        if self.in_check(self.they()) {
            bail!(
                "player {} is in check but it is not their turn to move",
                self.they()
            );
        }
        if let Some(en_passant_square) = self.en_passant_square {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if en_passant_square.rank() != expected_rank {
                bail!(
                    "en passant square should be on rank {expected_rank}, got {en_passant_square}",
                    expected_rank = expected_rank as u8 + 1
                );
            }
            // A pawn that was just pushed by our opponent should be in front
            // of en_passant_square.
            let pushed_pawn = en_passant_square.shift(0, self.they().push_direction());
            let pawn = Piece {
                owner: self.they(),
                kind: PieceKind::Pawn,
            };
            if pushed_pawn.and_then(|square| self.at(square)) != Some(pawn) {
                bail!("en passant square {en_passant_square} has no pushed pawn in front");
            }
        }
        Ok(())
    }
}

const fn player_name(player: Player) -> &'static str {
    match player {
        Player::White => "white",
        Player::Black => "black",
    }
}

// Full castle rights are lost when the king home square is touched, one side
// when a rook home square is.
const fn castle_rights_mask(square: Square) -> CastleRights {
    match square {
        Square::E1 => CastleRights::WHITE_BOTH,
        Square::H1 => CastleRights::WHITE_SHORT,
        Square::A1 => CastleRights::WHITE_LONG,
        Square::E8 => CastleRights::BLACK_BOTH,
        Square::H8 => CastleRights::BLACK_SHORT,
        Square::A8 => CastleRights::BLACK_LONG,
        _ => CastleRights::empty(),
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Cleans up the input and tries to parse it as either FEN or EPD,
    /// stripping the "fen " and "epd " prefixes common in UCI tooling.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {}", &self)?;
        Ok(())
    }
}
