//! Tests for the tic-tac-toe state machine.

use gridlock_tictactoe::{
    Board, Cell, Game, GameRules, GameStatus, Move, MoveError, MoveResult, Outcome, Player,
    RulesError, TurnPolicy,
};

fn play(game: &mut Game, moves: &[(usize, usize, Player)]) {
    for &(x, y, player) in moves {
        game.submit_move(Move::new(x, y, player)).expect("Valid move");
    }
}

#[test]
fn test_new_game_initial_state() {
    let game = Game::default();
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.board().occupied(), 0);
    assert!(game.history().is_empty());
    assert_eq!(game.valid_moves().len(), 9);
}

#[test]
fn test_accepted_moves_alternate_from_player_one() {
    let mut game = Game::default();
    let moves = [(1, 1), (0, 0), (2, 2), (0, 2), (0, 1)];

    for (n, &(x, y)) in moves.iter().enumerate() {
        let player = game.current_player();
        let expected = if n % 2 == 0 { Player::One } else { Player::Two };
        assert_eq!(player, expected);

        game.submit_move(Move::new(x, y, player)).expect("Valid move");
        assert_eq!(game.board().occupied(), n + 1);
        assert_eq!(game.board().get(x, y), Some(Cell::Occupied(player)));
    }
}

#[test]
fn test_duplicate_move_is_a_no_op() {
    let mut game = Game::default();
    let mv = Move::new(1, 1, Player::One);

    let first = game.submit_move(mv);
    assert_eq!(first, Ok(MoveResult::Continue { next: Player::Two }));
    let once = game.clone();

    let second = game.submit_move(mv);
    assert_eq!(second, Err(MoveError::Duplicate(mv)));
    assert!(second.unwrap_err().is_duplicate());
    assert_eq!(game, once);
}

#[test]
fn test_occupied_cell_keeps_state_and_turn() {
    let mut game = Game::default();
    play(&mut game, &[(1, 1, Player::One)]);
    let before = game.clone();

    let result = game.submit_move(Move::new(1, 1, Player::Two));
    assert_eq!(result, Err(MoveError::Occupied(1, 1)));
    assert_eq!(game, before);
    assert_eq!(game.current_player(), Player::Two);
}

#[test]
fn test_out_of_bounds_rejected() {
    let mut game = Game::default();
    let result = game.submit_move(Move::new(3, 0, Player::One));
    assert_eq!(result, Err(MoveError::OutOfBounds(3, 0)));
    assert_eq!(game, Game::default());
}

#[test]
fn test_wrong_turn_rejected_under_strict_policy() {
    let mut game = Game::new(GameRules::default(), TurnPolicy::Strict);
    let result = game.submit_move(Move::new(0, 0, Player::Two));
    assert_eq!(result, Err(MoveError::WrongTurn(Player::Two)));
    assert_eq!(game.board().occupied(), 0);
}

#[test]
fn test_free_policy_places_submitted_player() {
    let mut game = Game::new(GameRules::default(), TurnPolicy::Free);
    let result = game.submit_move(Move::new(0, 0, Player::Two));
    assert_eq!(result, Ok(MoveResult::Continue { next: Player::Two }));
    assert_eq!(game.board().get(0, 0), Some(Cell::Occupied(Player::Two)));
}

#[test]
fn test_column_win_ends_game() {
    let mut game = Game::default();
    play(
        &mut game,
        &[
            (0, 0, Player::One),
            (1, 1, Player::Two),
            (0, 1, Player::One),
            (1, 0, Player::Two),
        ],
    );

    let result = game.submit_move(Move::new(0, 2, Player::One));
    assert_eq!(result, Ok(MoveResult::Finished(Outcome::Win(Player::One))));
    assert_eq!(game.status(), GameStatus::Over(Outcome::Win(Player::One)));
    assert_eq!(game.outcome(), Some(Outcome::Win(Player::One)));
    assert!(game.valid_moves().is_empty());

    let after = game.clone();
    assert_eq!(
        game.submit_move(Move::new(2, 2, Player::Two)),
        Err(MoveError::GameOver)
    );
    assert_eq!(game, after);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut game = Game::default();
    // X O X
    // X O O
    // O X X
    play(
        &mut game,
        &[
            (0, 0, Player::One),
            (1, 0, Player::Two),
            (2, 0, Player::One),
            (1, 1, Player::Two),
            (0, 1, Player::One),
            (2, 1, Player::Two),
            (1, 2, Player::One),
            (0, 2, Player::Two),
        ],
    );
    assert_eq!(game.status(), GameStatus::InProgress);

    let result = game.submit_move(Move::new(2, 2, Player::One));
    assert_eq!(result, Ok(MoveResult::Finished(Outcome::Draw)));
    assert!(game.is_board_full());
}

#[test]
fn test_win_on_last_cell_beats_draw() {
    let mut game = Game::default();
    // X O X
    // O X O
    // O X X  <- last move (2,2) fills the board and completes the diagonal
    play(
        &mut game,
        &[
            (0, 0, Player::One),
            (1, 0, Player::Two),
            (2, 0, Player::One),
            (0, 1, Player::Two),
            (1, 1, Player::One),
            (2, 1, Player::Two),
            (1, 2, Player::One),
            (0, 2, Player::Two),
        ],
    );
    assert_eq!(game.status(), GameStatus::InProgress);

    let result = game.submit_move(Move::new(2, 2, Player::One));
    assert_eq!(result, Ok(MoveResult::Finished(Outcome::Win(Player::One))));
}

#[test]
fn test_reset_restores_initial_state() {
    let mut game = Game::default();
    play(
        &mut game,
        &[
            (0, 0, Player::One),
            (1, 1, Player::Two),
            (0, 1, Player::One),
            (1, 0, Player::Two),
            (0, 2, Player::One),
        ],
    );
    assert!(game.status().is_over());

    game.reset();
    assert_eq!(game, Game::default());
}

#[test]
fn test_replay_rebuilds_state() {
    let moves = [
        Move::new(1, 1, Player::One),
        Move::new(0, 0, Player::Two),
        Move::new(2, 2, Player::One),
    ];

    let game = Game::replay(GameRules::default(), TurnPolicy::Strict, &moves).expect("Valid replay");
    assert_eq!(game.history(), &moves);
    assert_eq!(game.current_player(), Player::Two);
}

#[test]
fn test_replay_stops_at_first_rejection() {
    let moves = [Move::new(1, 1, Player::One), Move::new(1, 1, Player::Two)];
    let result = Game::replay(GameRules::default(), TurnPolicy::Strict, &moves);
    assert_eq!(result, Err(MoveError::Occupied(1, 1)));
}

#[test]
fn test_larger_board_uses_win_length() {
    let rules = GameRules::new(5, 5, 4).expect("Valid rules");
    let mut game = Game::new(rules, TurnPolicy::Strict);
    play(
        &mut game,
        &[
            (0, 4, Player::One),
            (0, 0, Player::Two),
            (1, 3, Player::One),
            (1, 0, Player::Two),
            (2, 2, Player::One),
            (2, 0, Player::Two),
        ],
    );

    let result = game.submit_move(Move::new(3, 1, Player::One));
    assert_eq!(result, Ok(MoveResult::Finished(Outcome::Win(Player::One))));
}

#[test]
fn test_invalid_rules_rejected() {
    assert!(GameRules::new(0, 3, 3).is_err());
    assert!(GameRules::new(3, 3, 4).is_err());
    assert!(GameRules::new(3, 3, 0).is_err());
    assert!(GameRules::new(4, 2, 4).is_ok());
}

#[test]
fn test_game_serializes_for_inspection() {
    let mut game = Game::default();
    play(&mut game, &[(2, 0, Player::One)]);

    let json = serde_json::to_string(&game).expect("Serializable");
    let back: Game = serde_json::from_str(&json).expect("Deserializable");
    assert_eq!(back, game);
}

#[test]
fn test_redelivered_winning_move_is_duplicate() {
    let mut game = Game::default();
    play(
        &mut game,
        &[
            (0, 0, Player::One),
            (1, 1, Player::Two),
            (0, 1, Player::One),
            (1, 0, Player::Two),
            (0, 2, Player::One),
        ],
    );
    let over = game.clone();

    let winning = Move::new(0, 2, Player::One);
    assert_eq!(game.submit_move(winning), Err(MoveError::Duplicate(winning)));
    // A fresh cell after the end is still refused as game over.
    assert_eq!(
        game.submit_move(Move::new(2, 2, Player::Two)),
        Err(MoveError::GameOver)
    );
    assert_eq!(game, over);
}

#[test]
fn test_oversized_rules_rejected() {
    assert_eq!(
        GameRules::new(usize::MAX, 2, 3),
        Err(RulesError::TooLarge {
            width: usize::MAX,
            height: 2
        })
    );
    assert!(GameRules::new(1 << 20, 1 << 20, 3).is_err());
    assert!(GameRules::new(GameRules::MAX_CELLS + 1, 1, 3).is_err());
    assert!(GameRules::new(GameRules::MAX_CELLS, 1, 3).is_ok());
}

#[test]
fn test_deserialized_rules_are_revalidated() {
    let rules: GameRules =
        serde_json::from_str(r#"{"width":3,"height":3,"win_length":0}"#).expect("Deserializable");
    assert!(rules.validated().is_err());
    assert_eq!(GameRules::default().validated(), Ok(GameRules::default()));
}

#[test]
fn test_short_deserialized_board_does_not_panic() {
    let mut board: Board =
        serde_json::from_str(r#"{"width":3,"height":3,"cells":["Empty"]}"#).expect("Deserializable");

    assert_eq!(board.get(2, 2), None);
    assert!(!board.set(2, 2, Cell::Occupied(Player::One)));
    assert!(board.set(0, 0, Cell::Occupied(Player::One)));
    assert!(board.display().contains("X . ."));
}
