use std::collections::HashSet;

use arbiter::chess::core::{Player, Promotion, Square};
use arbiter::{Game, GameStatus, MoveRejected, Position};
use pretty_assertions::assert_eq;

#[test]
fn full_game_to_checkmate() {
    let mut game = Game::new();
    assert_eq!(game.status(), GameStatus::Ongoing);
    // 1. f3 e5 2. g4 Qh4#
    assert_eq!(
        game.request_move(Square::F2, Square::F3, None),
        Ok(GameStatus::Ongoing)
    );
    assert_eq!(
        game.request_move(Square::E7, Square::E5, None),
        Ok(GameStatus::Ongoing)
    );
    assert_eq!(
        game.request_move(Square::G2, Square::G4, None),
        Ok(GameStatus::Ongoing)
    );
    assert_eq!(
        game.request_move(Square::D8, Square::H4, None),
        Ok(GameStatus::Checkmate(Player::Black))
    );
    // Terminal: everything is rejected from now on, even legal-looking moves.
    assert_eq!(
        game.request_move(Square::E2, Square::E3, None),
        Err(MoveRejected::GameAlreadyOver)
    );
    assert_eq!(game.legal_destinations(Square::E2), HashSet::new());
}

#[test]
fn status_reflects_check() {
    let mut game = Game::new();
    for uci in ["e2e4", "f7f6", "d2d4"] {
        assert!(game.request_uci_move(uci).is_ok());
    }
    // 3... g5?? does not give check; 4. Qh5+ does (and here it is mate).
    assert!(game.request_uci_move("g8h6").is_ok());
    let status = game.request_uci_move("d1h5").unwrap();
    assert_eq!(status, GameStatus::Check(Player::Black));
    assert!(!status.is_terminal());
    // The check must be resolved: unrelated moves are not legal.
    assert_eq!(
        game.request_uci_move("a7a6"),
        Err(MoveRejected::LeavesKingInCheck)
    );
    assert!(game.request_uci_move("h6f7").is_ok());
}

#[test]
fn legal_destinations_for_highlighting() {
    let game = Game::new();
    assert_eq!(
        game.legal_destinations(Square::E2),
        HashSet::from([Square::E3, Square::E4])
    );
    assert_eq!(
        game.legal_destinations(Square::G1),
        HashSet::from([Square::F3, Square::H3])
    );
    // Empty square and opponent's piece yield nothing.
    assert_eq!(game.legal_destinations(Square::E4), HashSet::new());
    assert_eq!(game.legal_destinations(Square::E7), HashSet::new());
}

#[test]
fn promotion_through_the_public_api() {
    let position = Position::try_from("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let mut game = Game::from_position(position);
    assert_eq!(
        game.request_move(Square::A7, Square::A8, None),
        Err(MoveRejected::AmbiguousPromotion(Square::A8))
    );
    // UCI carries the choice inline.
    assert!(game.request_uci_move("a7a8r").is_ok());
    assert_eq!(
        game.position().to_string(),
        "R7/7k/8/8/8/8/8/K7 b - - 0 1"
    );
}

#[test]
fn underpromotion_choices_are_independent() {
    let position = Position::try_from("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    for promotion in [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ] {
        let mut game = Game::from_position(position.clone());
        assert!(game
            .request_move(Square::A7, Square::A8, Some(promotion))
            .is_ok());
    }
}

#[test]
fn stalemate_ends_the_game() {
    let position = Position::try_from("7k/8/8/8/8/6q1/8/7K w - - 0 1").unwrap();
    let mut game = Game::from_position(position);
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert!(game.status().is_terminal());
    assert_eq!(
        game.request_uci_move("h1g1"),
        Err(MoveRejected::GameAlreadyOver)
    );
}

#[test]
fn en_passant_window_closes_after_one_ply() {
    let mut game = Game::new();
    for uci in ["e2e4", "a7a6", "e4e5", "d7d5", "b1c3", "a6a5"] {
        assert!(game.request_uci_move(uci).is_ok(), "move: {uci}");
    }
    // The d5 pawn could have been captured en passant right after 3... d5,
    // but the window is gone now.
    assert_eq!(
        game.request_uci_move("e5d6"),
        Err(MoveRejected::NotPseudoLegal)
    );
}

#[test]
fn game_from_fen_boundary_and_back() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut game = Game::from_position(Position::try_from(fen).unwrap());
    assert_eq!(game.position().to_string(), fen);
    assert!(game.request_uci_move("e1g1").is_ok());
    assert_eq!(
        game.position().to_string(),
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R4RK1 b kq - 1 1"
    );
}
