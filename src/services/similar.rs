use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{parse_genres, Movie};

/// Default sidebar size on the movie detail page
pub const DEFAULT_SIMILAR_LIMIT: usize = 10;
/// Upper bound accepted from clients
pub const MAX_SIMILAR_LIMIT: usize = 50;

/// Selects up to `limit` movies similar to the subject
///
/// Movies sharing at least one genre with the subject come first, ranked by
/// external rating. Any shortfall is topped up with the best externally
/// rated movies not already chosen. A subject without genres, or with a
/// blank genre list, falls straight through to the rating ranking. The subject itself is never selected and
/// ties keep catalog order.
pub fn select_similar<'a>(
    subject_genres: Option<&str>,
    subject_id: Uuid,
    catalog: &'a [Movie],
    limit: usize,
) -> Vec<&'a Movie> {
    if limit == 0 {
        return Vec::new();
    }

    let candidates: Vec<&Movie> = catalog.iter().filter(|m| m.id != subject_id).collect();

    let wanted: HashSet<String> = subject_genres
        .map(parse_genres)
        .unwrap_or_default()
        .into_iter()
        .collect();
    if wanted.is_empty() {
        return top_rated(candidates, limit);
    }

    let mut selected: Vec<&Movie> = candidates
        .iter()
        .copied()
        .filter(|m| m.genre_list().iter().any(|g| wanted.contains(g)))
        .collect();
    sort_by_external_rating(&mut selected);
    selected.truncate(limit);

    if selected.len() < limit {
        let chosen: HashSet<Uuid> = selected.iter().map(|m| m.id).collect();
        let remaining = limit - selected.len();

        let mut top_up: Vec<&Movie> = candidates
            .into_iter()
            .filter(|m| !chosen.contains(&m.id) && m.imdb_rating.is_some())
            .collect();
        sort_by_external_rating(&mut top_up);
        top_up.truncate(remaining);

        tracing::debug!(
            matched = selected.len(),
            topped_up = top_up.len(),
            "Similar movies topped up by rating"
        );
        selected.extend(top_up);
    }

    selected
}

fn top_rated(mut movies: Vec<&Movie>, limit: usize) -> Vec<&Movie> {
    sort_by_external_rating(&mut movies);
    movies.truncate(limit);
    movies
}

// `sort_by` is stable, so equal ratings keep catalog order
fn sort_by_external_rating(movies: &mut [&Movie]) {
    movies.sort_by(|a, b| b.external_rating().total_cmp(&a.external_rating()));
}
