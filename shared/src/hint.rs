//! Predictor hint entries shown to a human liar.

use serde::{Deserialize, Serialize};

/// One ranked candidate from the secret-word inference engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HintEntry {
    pub word: String,
    pub score: f32,
}
