use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Lowest accepted sub-score
pub const MIN_SCORE: f64 = 1.0;
/// Highest accepted sub-score
pub const MAX_SCORE: f64 = 100.0;
/// Author stored when none is given
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// A user rating, owned by exactly one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub movie_id: Uuid,
    /// Jumpscares
    pub scream: i32,
    /// Mind-bending factor
    pub psychological: i32,
    /// Tension
    pub suspense: i32,
    pub review: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(data: NewRating) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id: data.movie_id,
            scream: data.scream,
            psychological: data.psychological,
            suspense: data.suspense,
            review: data.review,
            author: data.author,
            created_at: Utc::now(),
        }
    }
}

/// Validated insert payload for a rating
#[derive(Debug, Clone, PartialEq)]
pub struct NewRating {
    pub movie_id: Uuid,
    pub scream: i32,
    pub psychological: i32,
    pub suspense: i32,
    pub review: Option<String>,
    pub author: String,
}

/// Request body for POST /api/ratings, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingRequest {
    pub movie_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub scream: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub psychological: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub suspense: Option<f64>,
    pub review: Option<String>,
    pub author: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreInput {
    Number(f64),
    Text(String),
}

/// Accepts a sub-score as a number or a numeric string
///
/// A blank string counts as missing. Any other non-numeric string becomes
/// NaN so that it fails the range check.
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Option::<ScoreInput>::deserialize(deserializer)? {
        None => None,
        Some(ScoreInput::Number(value)) => Some(value),
        Some(ScoreInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.parse().unwrap_or(f64::NAN))
            }
        }
    };
    Ok(score)
}

/// Per-axis averages and the derived Spook Score, never stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAverages {
    pub scream: i32,
    pub psychological: i32,
    pub suspense: i32,
    pub spook_score: i32,
}
