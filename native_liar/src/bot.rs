//! AI player logic.
//!
//! The engine is agnostic about who is a bot; the backend tracks bot-driven
//! ids and asks this module for descriptions, votes and the liar's guess.
//! Every decision is a pure function of the visible round material (plus the
//! embedder), so repeated renders produce the same output.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use liar_shared::{DescriptionPublic, PlayerId};

use crate::inference::{cosine_similarity, InferencePredictor};

/// What a bot knows when it is asked to describe the word.
#[derive(Debug, Clone)]
pub struct DescribeContext<'a> {
    pub topic: &'a str,
    /// `None` for the liar: the bot liar never receives the secret word.
    pub secret_word: Option<&'a str>,
    /// All prior descriptions, concatenated in speaking order.
    pub prior_text: &'a str,
    pub position: usize,
}

/// What a bot knows when it votes: the description set and nothing else.
/// No access to ground-truth roles.
#[derive(Debug, Clone)]
pub struct VoteContext<'a> {
    pub voter: PlayerId,
    pub descriptions: &'a [DescriptionPublic],
}

/// Template-driven AI players. Phrasing is selected deterministically from a
/// word hash so a bot repeats itself rather than flip-flop between renders.
#[derive(Debug, Clone, Default)]
pub struct BotManager;

fn stable_hash(s: &str) -> u64 {
    let mut h = DefaultHasher::new();
    s.hash(&mut h);
    h.finish()
}

/// Truth-teller phrasings. Each mentions a property of the secret word
/// without naming it.
fn truth_templates(topic: &str) -> &'static [&'static str] {
    match topic {
        "animal" => &[
            "I would recognize one of these the moment it moved",
            "You could see one at a zoo, though some people keep them closer to home",
            "It eats, it sleeps, and it definitely notices you",
            "Mine is the kind of creature children point at first",
        ],
        "food" => &[
            "I had something like this recently and finished all of it",
            "You would order this without reading the rest of the menu",
            "It smells better than it looks, honestly",
            "There is a right way and a wrong way to eat it",
        ],
        "job" => &[
            "People doing this get asked about it at parties",
            "You would call one of these when something important happens",
            "It takes training most of us never finished",
            "There is a uniform involved, more often than not",
        ],
        "place" => &[
            "I have spent more time here than I planned to",
            "You lower your voice a little when you walk in",
            "People arrive here with a purpose and leave with another",
            "You could find one in most cities without asking",
        ],
        "object" => &[
            "There is probably one within arm's reach of somebody here",
            "You miss it most on the day you forgot it",
            "It fits in a bag, though not always comfortably",
            "Mine is older than I care to admit",
        ],
        "character" => &[
            "Everyone knows the story even if they never read it",
            "You could describe the outfit and people would get it",
            "There is a famous scene everyone brings up",
            "Children meet this one before they meet most real people",
        ],
        _ => &[
            "It is exactly what you think it is, once you think of it",
            "I knew what it was before I finished reading the word",
            "There is a common saying about this one",
            "You run into it more often than you notice",
        ],
    }
}

/// Liar phrasings: confident but non-committal, safe for any word.
const LIAR_TEMPLATES: &[&str] = &[
    "It is one of those things everyone has an opinion about",
    "I would say it is more common than people think",
    "Honestly, the first thing that comes to mind is how familiar it is",
    "It reminds me of something from my childhood",
    "People tend to either love it or not think about it at all",
];

impl BotManager {
    pub fn new() -> Self {
        Self
    }

    /// Compose a one-sentence description for a bot turn.
    ///
    /// Truth-tellers pick from the topic's template bank, keyed by the
    /// secret word. The liar runs the predictor over the aggregated prior
    /// text to get a best-guess word and phrases a hedge around it; with no
    /// ranking available it falls back to pure hedging.
    pub fn compose_description(
        &self,
        ctx: &DescribeContext<'_>,
        predictor: &InferencePredictor,
    ) -> String {
        match ctx.secret_word {
            Some(word) => {
                let bank = truth_templates(ctx.topic);
                let idx = (stable_hash(word) as usize + ctx.position) % bank.len();
                bank[idx].to_string()
            }
            None => {
                let guess = predictor.guess_from(ctx.prior_text, ctx.topic);
                let key = guess.as_deref().unwrap_or(ctx.topic);
                let idx = (stable_hash(key) as usize + ctx.position) % LIAR_TEMPLATES.len();
                tracing::debug!(guess = ?guess, "liar bot composed description");
                LIAR_TEMPLATES[idx].to_string()
            }
        }
    }

    /// Accuse the player whose description fits the others' worst.
    ///
    /// Embeds every description and, for each candidate other than the
    /// voter, measures how far their description sits from the centroid of
    /// everyone else's. The biggest outlier gets the vote. Falls back to the
    /// shortest description when embeddings are unavailable. Deterministic
    /// either way, and never self-votes.
    pub fn cast_vote(&self, ctx: &VoteContext<'_>, predictor: &InferencePredictor) -> PlayerId {
        let candidates: Vec<&DescriptionPublic> = ctx
            .descriptions
            .iter()
            .filter(|d| d.player_id != ctx.voter)
            .collect();
        debug_assert!(!candidates.is_empty(), "voting requires other players");

        let texts: Vec<String> = ctx.descriptions.iter().map(|d| d.text.clone()).collect();
        if let Ok(vectors) = predictor.embedder().embed(&texts) {
            let mut best: Option<(PlayerId, f32)> = None;
            for cand in &candidates {
                let ci = ctx
                    .descriptions
                    .iter()
                    .position(|d| d.player_id == cand.player_id)
                    .unwrap_or(0);
                // centroid of everyone else's description vectors
                let dims = vectors[ci].len();
                let mut centroid = vec![0.0f32; dims];
                let mut others = 0usize;
                for (i, v) in vectors.iter().enumerate() {
                    if i != ci {
                        for (c, x) in centroid.iter_mut().zip(v.iter()) {
                            *c += x;
                        }
                        others += 1;
                    }
                }
                if others > 0 {
                    for c in &mut centroid {
                        *c /= others as f32;
                    }
                }
                let fit = cosine_similarity(&vectors[ci], &centroid);
                let better = match best {
                    None => true,
                    Some((_, lowest)) => fit < lowest,
                };
                if better {
                    best = Some((cand.player_id, fit));
                }
            }
            if let Some((target, fit)) = best {
                tracing::debug!(voter = %ctx.voter, %target, fit, "bot vote (consistency)");
                return target;
            }
        }

        // embeddings unavailable: the thinnest description draws suspicion
        let target = candidates
            .iter()
            .min_by_key(|d| d.text.len())
            .map(|d| d.player_id)
            .unwrap_or(ctx.voter);
        tracing::debug!(voter = %ctx.voter, %target, "bot vote (fallback)");
        target
    }

    /// The bot liar's single guess: the predictor's top candidate for the
    /// full description set.
    pub fn guess_secret(
        &self,
        topic: &str,
        aggregated: &str,
        predictor: &InferencePredictor,
    ) -> Option<String> {
        let guess = predictor.guess_from(aggregated, topic);
        tracing::debug!(?guess, "bot liar guessing secret word");
        guess
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::TopicBook;

    fn predictor() -> InferencePredictor {
        let mut p = InferencePredictor::default();
        p.precompute_topics(&TopicBook::builtin()).unwrap();
        p
    }

    fn desc(id: usize, text: &str) -> DescriptionPublic {
        DescriptionPublic {
            player_id: PlayerId(id),
            text: text.to_string(),
        }
    }

    #[test]
    fn truth_teller_description_is_stable_and_non_empty() {
        let bot = BotManager::new();
        let p = predictor();
        let ctx = DescribeContext {
            topic: "animal",
            secret_word: Some("dog"),
            prior_text: "",
            position: 1,
        };
        let a = bot.compose_description(&ctx, &p);
        let b = bot.compose_description(&ctx, &p);
        assert!(!a.trim().is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn liar_description_needs_no_secret_word() {
        let bot = BotManager::new();
        let p = predictor();
        let ctx = DescribeContext {
            topic: "food",
            secret_word: None,
            prior_text: "you would order this without reading the menu",
            position: 2,
        };
        let text = bot.compose_description(&ctx, &p);
        assert!(!text.trim().is_empty());
    }

    #[test]
    fn vote_is_deterministic_and_never_self() {
        let bot = BotManager::new();
        let p = predictor();
        let descriptions = vec![
            desc(0, "quiet rows of books and long shelves"),
            desc(1, "you can borrow things here and read at a desk"),
            desc(2, "it reminds me of something from my childhood"),
        ];
        let ctx = VoteContext {
            voter: PlayerId(0),
            descriptions: &descriptions,
        };
        let first = bot.cast_vote(&ctx, &p);
        let second = bot.cast_vote(&ctx, &p);
        assert_eq!(first, second);
        assert_ne!(first, PlayerId(0));
    }

    #[test]
    fn outlier_description_draws_the_vote() {
        let bot = BotManager::new();
        let p = predictor();
        // two on-topic descriptions and one drifter
        let descriptions = vec![
            desc(0, "quiet rows of books and long wooden shelves"),
            desc(1, "books everywhere and a desk to read books at"),
            desc(2, "people tend to either love it or not think about it"),
        ];
        let ctx = VoteContext {
            voter: PlayerId(0),
            descriptions: &descriptions,
        };
        assert_eq!(bot.cast_vote(&ctx, &p), PlayerId(2));
    }

    #[test]
    fn guess_comes_from_the_topic_vocabulary() {
        let bot = BotManager::new();
        let p = predictor();
        let guess = bot
            .guess_secret("animal", "it barks and wags its tail like a dog", &p)
            .expect("ranking available");
        let book = TopicBook::builtin();
        assert!(book.vocabulary("animal").unwrap().contains(&guess));
    }
}
