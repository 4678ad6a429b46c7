use arbiter::chess::position::Position;
use pretty_assertions::assert_eq;

fn expect_legal(serialized_position: &str) -> Position {
    Position::try_from(serialized_position)
        .unwrap_or_else(|_| panic!("we are checking valid positions: {serialized_position}"))
}

#[test]
fn full_fen_round_trips() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 3 21",
        "4k3/8/8/8/8/8/8/4K3 w - - 99 200",
    ] {
        assert_eq!(expect_legal(fen).to_string(), fen);
    }
}

#[test]
fn epd_defaults_the_counters() {
    let position = expect_legal("rnbqkb1r/ppp1pp1p/5n2/3p2p1/P2P4/5P2/1PP1P1PP/RNBQKBNR w KQkq -");
    assert_eq!(position.halfmove_clock(), 0);
    assert_eq!(position.fullmove_counter().get(), 1);
    assert_eq!(
        position.to_string(),
        "rnbqkb1r/ppp1pp1p/5n2/3p2p1/P2P4/5P2/1PP1P1PP/RNBQKBNR w KQkq - 0 1"
    );
}

#[test]
fn accepts_prefixed_and_padded_input() {
    assert!(Position::try_from(
        "fen rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7"
    )
    .is_ok());
    assert!(Position::try_from(
        "epd rnbqkb1r/ppp1pp1p/5n2/3p2p1/P2P4/5P2/1PP1P1PP/RNBQKBNR w KQkq -\n"
    )
    .is_ok());
    assert!(Position::try_from(
        "  rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 \n"
    )
    .is_ok());
}

#[test]
fn rejects_malformed_input() {
    // Missing parts.
    assert!(Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").is_err());
    assert!(Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w").is_err());
    // Not enough ranks.
    assert!(Position::try_from("pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
    // Rank too long.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err()
    );
    // Unknown piece.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBXR w KQkq - 0 1").is_err()
    );
    // Bad side to move.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err()
    );
    // Bad castling rights.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1").is_err()
    );
    // Non-numeric counters.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1").is_err()
    );
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err()
    );
    // Trailing garbage.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra")
            .is_err()
    );
}

#[test]
#[should_panic(expected = "expected 1 white king, got 0")]
fn no_white_king() {
    Position::try_from("8/8/8/8/8/8/8/k7 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 black king, got 0")]
fn no_black_king() {
    Position::try_from("8/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected 1 white king, got 3")]
fn too_many_kings() {
    Position::try_from("2k5/8/8/8/8/8/8/KKK5 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 white pawns, got 9")]
fn too_many_white_pawns() {
    Position::try_from("2k5/8/PPPPPPPP/8/P7/8/8/K7 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "expected <= 8 black pawns, got 9")]
fn too_many_black_pawns() {
    Position::try_from("2k5/pppppppp/8/p7/8/8/8/K7 w - - 0 1").unwrap();
}

#[test]
#[should_panic(expected = "pawns can not stand on the backranks")]
fn pawn_on_backrank() {
    Position::try_from("k6P/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
}

#[test]
fn rejects_check_against_the_waiting_player() {
    // The e7 rook attacks the black king, but it is White's turn: Black could
    // never have ended their move in this state. Accepting it would let the
    // king be captured on the next ply.
    assert!(Position::try_from("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").is_err());
    // The mirrored situation, with the checked side to move, is a regular
    // check.
    assert!(Position::try_from("4k3/4R3/8/8/8/8/8/4K3 b - - 0 1").is_ok());
    assert!(Position::try_from("4k3/8/8/8/8/8/4r3/4K3 b - - 0 1").is_err());
}

#[test]
fn rejects_impossible_en_passant() {
    // Wrong rank for the side to move.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1").is_err()
    );
    // No pushed pawn behind the target.
    assert!(
        Position::try_from("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 1").is_err()
    );
}
