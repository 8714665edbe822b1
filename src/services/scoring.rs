use crate::models::{Rating, ScoreAverages};

/// Averages each rating axis and derives the Spook Score
///
/// The Spook Score is the mean of the three unrounded axis means, rounded
/// to the nearest integer. An empty rating set yields all zeros.
pub fn calculate_averages(ratings: &[Rating]) -> ScoreAverages {
    if ratings.is_empty() {
        return ScoreAverages::default();
    }

    let (scream, psychological, suspense) =
        ratings.iter().fold((0i64, 0i64, 0i64), |(sc, ps, su), r| {
            (
                sc + r.scream as i64,
                ps + r.psychological as i64,
                su + r.suspense as i64,
            )
        });

    let count = ratings.len() as f64;
    let scream = scream as f64 / count;
    let psychological = psychological as f64 / count;
    let suspense = suspense as f64 / count;

    ScoreAverages {
        scream: round(scream),
        psychological: round(psychological),
        suspense: round(suspense),
        spook_score: round((scream + psychological + suspense) / 3.0),
    }
}

// Half-up rounding, matching how scores are displayed to users
fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
