//! Human-readable formatting of events and state for terminal output.

use liar_shared::{
    ActionEvent, ActionKind, GameAction, GameStatePublic, Phase, PlayerId, PlayerPublic,
};
use owo_colors::OwoColorize;

fn player_name(players: &[PlayerPublic], id: PlayerId, color: bool) -> String {
    let base = players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("P{}", id));
    if color {
        base.bold().to_string()
    } else {
        base
    }
}

fn format_log_entry(entry: &ActionEvent, players: &[PlayerPublic], color: bool) -> String {
    match entry {
        ActionEvent::PlayerAction { player_id, action } => {
            let who = player_name(players, *player_id, color);
            match action {
                ActionKind::Described(text) => format!(
                    "{} {}: \"{}\"",
                    if color {
                        "●".cyan().to_string()
                    } else {
                        "SAY".into()
                    },
                    who,
                    text
                ),
                ActionKind::Voted(target) => format!(
                    "{} {} accuses {}",
                    if color {
                        "▲".yellow().to_string()
                    } else {
                        "VOTE".into()
                    },
                    who,
                    player_name(players, *target, color)
                ),
                ActionKind::Guessed { word, correct } => {
                    let verdict = if *correct {
                        if color {
                            "correct!".green().to_string()
                        } else {
                            "correct!".into()
                        }
                    } else if color {
                        "wrong".red().to_string()
                    } else {
                        "wrong".into()
                    };
                    format!("GUESS {} tries \"{}\" ({})", who, word, verdict)
                }
                ActionKind::TimedOut => format!(
                    "{} {} ran out of time",
                    if color {
                        "✗".red().to_string()
                    } else {
                        "TIMEOUT".into()
                    },
                    who
                ),
            }
        }
        ActionEvent::GameAction(GameAction::RoundStarted { round, topic }) => {
            let line = format!("=== Round {} | topic: {} ===", round, topic);
            if color {
                line.bold().blue().to_string()
            } else {
                line
            }
        }
        ActionEvent::GameAction(GameAction::VotesRevealed { votes }) => {
            let list = votes
                .iter()
                .map(|(voter, target)| {
                    format!(
                        "{} -> {}",
                        player_name(players, *voter, false),
                        player_name(players, *target, false)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("Votes: [{}]", list)
        }
        ActionEvent::GameAction(GameAction::LiarRevealed { liar, secret_word }) => {
            let who = player_name(players, *liar, color);
            if color {
                format!(
                    "The liar was {}. The word was \"{}\"",
                    who,
                    secret_word.italic()
                )
            } else {
                format!("The liar was {}. The word was \"{}\"", who, secret_word)
            }
        }
        ActionEvent::GameAction(GameAction::PointsAwarded { players: ids, points }) => {
            let names = ids
                .iter()
                .map(|id| player_name(players, *id, color))
                .collect::<Vec<_>>()
                .join(", ");
            format!("+{} point(s) to [{}]", points, names)
        }
        ActionEvent::GameAction(GameAction::GameOver { winners }) => {
            let names = winners
                .iter()
                .map(|id| player_name(players, *id, color))
                .collect::<Vec<_>>()
                .join(", ");
            let line = format!("=== Game over | winner(s): [{}] ===", names);
            if color {
                line.bold().green().to_string()
            } else {
                line
            }
        }
        ActionEvent::GameAction(GameAction::PhaseChanged(_)) => unreachable!(),
    }
}

pub fn format_event_human(entry: &ActionEvent, players: &[PlayerPublic], color: bool) -> String {
    match entry {
        ActionEvent::GameAction(GameAction::PhaseChanged(p)) => {
            let line = format!("== {:?} ==", p);
            if color {
                line.bold().purple().to_string()
            } else {
                line
            }
        }
        _ => format_log_entry(entry, players, color),
    }
}

pub fn format_round_header(gs: &GameStatePublic, color: bool) -> String {
    let title = format!(
        "=== Round {}/{} | topic: {} ===",
        gs.round,
        gs.total_rounds,
        gs.topic.as_deref().unwrap_or("?")
    );
    if color {
        title.bold().blue().to_string()
    } else {
        title
    }
}

/// Full-state rendering for the CLI's `state` command.
pub fn format_state_human(gs: &GameStatePublic, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format_round_header(gs, color));
    out.push('\n');
    out.push_str(&format!("Phase: {:?}\n", gs.phase));

    for p in &gs.players {
        let marker = if p.id == gs.you { "*" } else { " " };
        out.push_str(&format!(
            "{} {:<12} {:>3} pt{}\n",
            marker,
            p.name,
            p.score,
            if p.has_described { "  (spoke)" } else { "" }
        ));
    }

    if gs.you_are_liar {
        let line = "You are the liar!";
        out.push_str(&format!(
            "{}\n",
            if color {
                line.bold().red().to_string()
            } else {
                line.to_string()
            }
        ));
    } else if let Some(word) = &gs.secret_word {
        out.push_str(&format!("Secret word: {}\n", word));
    }

    if !gs.descriptions.is_empty() {
        out.push_str("Descriptions so far:\n");
        for d in &gs.descriptions {
            out.push_str(&format!(
                "  {}: {}\n",
                player_name(&gs.players, d.player_id, color),
                d.text
            ));
        }
    }

    if let Some(hint) = &gs.hint {
        out.push_str("Predicted words:\n");
        for h in hint.iter().take(5) {
            out.push_str(&format!("  {:<14} {:.4}\n", h.word, h.score));
        }
    }

    match (gs.phase, gs.to_act) {
        (Phase::Explanation, Some(id)) => {
            out.push_str(&format!(
                "Waiting for {} to describe.\n",
                player_name(&gs.players, id, color)
            ));
        }
        (Phase::Voting, Some(id)) => {
            out.push_str(&format!(
                "Waiting for {} to vote.\n",
                player_name(&gs.players, id, color)
            ));
        }
        (Phase::Result, _) => {
            if let Some(id) = gs.awaiting_guess {
                out.push_str(&format!(
                    "Waiting for {} to guess the word.\n",
                    player_name(&gs.players, id, color)
                ));
            }
        }
        _ => {}
    }

    if gs.phase == Phase::GameOver {
        let names = gs
            .winner_ids
            .iter()
            .map(|id| player_name(&gs.players, *id, color))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("Winner(s): [{}]\n", names));
    }
    out
}
