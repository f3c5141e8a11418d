//! End-to-end round scenarios driven through the public engine API.

use liar_shared::{Phase, PlayerConfig, PlayerId};
use native_liar::game::{Game, RoundState};
use native_liar::inference::InferencePredictor;
use native_liar::topics::TopicBook;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn roster() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig {
            id: PlayerId(0),
            name: "Alice".into(),
            is_bot: false,
        },
        PlayerConfig {
            id: PlayerId(1),
            name: "AI_2".into(),
            is_bot: true,
        },
        PlayerConfig {
            id: PlayerId(2),
            name: "AI_3".into(),
            is_bot: true,
        },
    ]
}

fn animal_book() -> TopicBook {
    TopicBook::from_entries(vec![(
        "animal".to_string(),
        vec!["cat".to_string(), "dog".to_string(), "lion".to_string()],
    )])
    .expect("valid book")
}

/// Start a game, then pin the round's random draws to a known setup:
/// AI_2 is the liar, the word is `secret`, turn order is seat order.
fn rigged_game(secret: &str) -> (Game, InferencePredictor) {
    let mut game = Game::with_players(roster(), animal_book(), 3).expect("valid roster");
    let mut predictor = InferencePredictor::default();
    let mut rng = StdRng::seed_from_u64(1);
    game.start_game_with_rng(&mut rng, &mut predictor)
        .expect("game starts");

    for (i, p) in game.players.iter_mut().enumerate() {
        p.is_liar = i == 1;
    }
    game.round_state = RoundState {
        topic: "animal".into(),
        secret_word: secret.into(),
        liar_idx: 1,
        turn_order: vec![0, 1, 2],
        ..RoundState::default()
    };
    game.phase = Phase::RoleReveal;
    (game, predictor)
}

fn describe_all(game: &mut Game) {
    game.proceed_to_explanation().expect("role reveal exits");
    let order = game.round_state.turn_order.clone();
    for (i, idx) in order.iter().enumerate() {
        let id = game.players[*idx].id;
        game.submit_description(id, &format!("description number {}", i))
            .expect("in-order description");
    }
    assert_eq!(game.phase, Phase::Voting);
}

#[test]
fn liar_caught_scenario_awards_and_guess() {
    let (mut game, _) = rigged_game("dog");
    describe_all(&mut game);

    // Alice votes AI_2; AI_3's vote also lands on AI_2; AI_2 deflects.
    game.submit_vote(PlayerId(0), PlayerId(1)).unwrap();
    game.submit_vote(PlayerId(1), PlayerId(0)).unwrap();
    game.submit_vote(PlayerId(2), PlayerId(1)).unwrap();

    assert_eq!(game.phase, Phase::Result);
    assert_eq!(game.players[0].score, 1, "Alice earns a point");
    assert_eq!(game.players[2].score, 1, "AI_3 earns a point");
    assert_eq!(game.players[1].score, 0, "caught liar earns nothing yet");

    // the caught liar gets exactly one guess; matching is case-insensitive
    let correct = game.submit_liar_guess(PlayerId(1), "DOG").unwrap();
    assert!(correct);
    assert_eq!(game.players[1].score, 3);
}

#[test]
fn liar_escape_scenario_awards_liar_only() {
    let (mut game, _) = rigged_game("cat");
    describe_all(&mut game);

    // votes split away from the liar: Alice and the liar pile onto AI_3
    game.submit_vote(PlayerId(0), PlayerId(2)).unwrap();
    game.submit_vote(PlayerId(1), PlayerId(2)).unwrap();
    game.submit_vote(PlayerId(2), PlayerId(0)).unwrap();

    assert_eq!(game.phase, Phase::Result);
    assert!(!game.round_state.liar_caught);
    assert_eq!(game.players[1].score, 1, "escaped liar earns a point");
    assert_eq!(game.players[0].score, 0);
    assert_eq!(game.players[2].score, 0);
    // no guess phase for an escaped liar
    assert!(game.submit_liar_guess(PlayerId(1), "cat").is_err());
    assert!(game.to_act().is_none());
}

#[test]
fn every_round_has_one_liar_and_liar_is_never_first() {
    for seed in 0..60u64 {
        let mut game =
            Game::with_players(roster(), TopicBook::builtin(), 3).expect("valid roster");
        let mut predictor = InferencePredictor::default();
        let mut rng = StdRng::seed_from_u64(seed);
        game.start_game_with_rng(&mut rng, &mut predictor).unwrap();

        assert_eq!(game.players.iter().filter(|p| p.is_liar).count(), 1);

        let order = &game.round_state.turn_order;
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2], "turn order is a permutation");
        assert_ne!(order[0], game.round_state.liar_idx, "liar never speaks first");
    }
}

#[test]
fn session_runs_all_rounds_then_reports_winners() {
    let mut game = Game::with_players(roster(), TopicBook::builtin(), 3).expect("valid roster");
    let mut predictor = InferencePredictor::default();
    let mut rng = StdRng::seed_from_u64(77);
    game.start_game_with_rng(&mut rng, &mut predictor).unwrap();

    for round in 1..=3u32 {
        assert_eq!(game.round, round);
        assert_eq!(game.phase, Phase::RoleReveal);
        game.proceed_to_explanation().unwrap();
        let order = game.round_state.turn_order.clone();
        for idx in &order {
            let id = game.players[*idx].id;
            game.submit_description(id, "an unremarkable sentence").unwrap();
        }

        // everyone piles onto a non-liar so no guess step blocks the loop
        let liar = game.liar_id();
        let scapegoat = game
            .players
            .iter()
            .map(|p| p.id)
            .find(|id| *id != liar)
            .unwrap();
        for voter in game.players.iter().map(|p| p.id).collect::<Vec<_>>() {
            let target = if voter == scapegoat { liar } else { scapegoat };
            game.submit_vote(voter, target).unwrap();
        }
        assert_eq!(game.phase, Phase::Result);
        game.next_round_with_rng(&mut rng, &mut predictor).unwrap();
    }

    assert_eq!(game.phase, Phase::GameOver);
    assert!(!game.winner_ids.is_empty());
    let max = game.players.iter().map(|p| p.score).max().unwrap();
    for id in &game.winner_ids {
        let p = game.players.iter().find(|p| p.id == *id).unwrap();
        assert_eq!(p.score, max);
    }
}

#[test]
fn descriptions_are_one_per_player_in_speaking_order() {
    let (mut game, _) = rigged_game("lion");
    describe_all(&mut game);
    assert_eq!(game.round_state.descriptions.len(), 3);
    let speakers: Vec<PlayerId> = game
        .round_state
        .descriptions
        .iter()
        .map(|d| d.player)
        .collect();
    assert_eq!(speakers, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
}
