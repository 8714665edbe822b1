use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate};
use uuid::Uuid;

use crate::models::{HomeSections, Movie, MovieFilter, MovieView};

/// Maximum movies per homepage carousel
pub const SECTION_LIMIT: usize = 20;
/// Movies released before this year count as classics
pub const CLASSIC_CUTOFF_YEAR: i32 = 1990;
/// Window, in months, for the "recent" carousel
pub const RECENT_WINDOW_MONTHS: u32 = 6;

/// Whether a movie has not been released yet as of `today`
///
/// Falls back to the release year when the exact date is unknown.
pub fn is_upcoming(movie: &Movie, today: NaiveDate) -> bool {
    match (movie.release_date, movie.year) {
        (Some(release), _) => release > today,
        (None, Some(year)) => year > today.year(),
        (None, None) => false,
    }
}

/// Homepage eligibility: a trailer is required, and released movies also
/// need an IMDb rating
pub fn is_home_eligible(movie: &Movie, today: NaiveDate) -> bool {
    if movie.trailer_key.is_none() {
        return false;
    }
    is_upcoming(movie, today) || movie.imdb_rating.is_some()
}

/// Builds the homepage carousels
///
/// Each movie lands in at most one carousel, the first in priority order:
/// upcoming, recent, highest rated, classics.
pub fn build_home_sections(
    movies: Vec<MovieView>,
    filter: &MovieFilter,
    today: NaiveDate,
) -> HomeSections {
    let eligible: Vec<MovieView> = movies
        .into_iter()
        .filter(|v| is_home_eligible(&v.movie, today) && filter.matches(&v.movie))
        .collect();

    tracing::debug!(
        eligible = eligible.len(),
        filters_active = filter.is_active(),
        "Building home sections"
    );

    let window_start = today
        .checked_sub_months(Months::new(RECENT_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    let mut upcoming: Vec<&MovieView> = eligible
        .iter()
        .filter(|v| v.movie.release_date.is_some_and(|d| d > today))
        .collect();
    upcoming.sort_by_key(|v| v.movie.release_date);

    let mut recent: Vec<&MovieView> = eligible
        .iter()
        .filter(|v| {
            v.movie
                .release_date
                .is_some_and(|d| d <= today && d >= window_start)
        })
        .collect();
    recent.sort_by(|a, b| b.movie.release_date.cmp(&a.movie.release_date));

    let mut highest_rated: Vec<&MovieView> = eligible
        .iter()
        .filter(|v| v.movie.imdb_rating.is_some())
        .collect();
    sort_by_imdb(&mut highest_rated);

    let mut classics: Vec<&MovieView> = eligible
        .iter()
        .filter(|v| v.movie.year.is_some_and(|y| y < CLASSIC_CUTOFF_YEAR))
        .collect();
    sort_by_imdb(&mut classics);

    let mut shown = HashSet::new();
    HomeSections {
        upcoming: take_unique(upcoming, &mut shown),
        recent: take_unique(recent, &mut shown),
        highest_rated: take_unique(highest_rated, &mut shown),
        classics: take_unique(classics, &mut shown),
        total_movies: eligible.len(),
        filters_active: filter.is_active(),
    }
}

fn sort_by_imdb(movies: &mut [&MovieView]) {
    movies.sort_by(|a, b| b.movie.external_rating().total_cmp(&a.movie.external_rating()));
}

fn take_unique(movies: Vec<&MovieView>, shown: &mut HashSet<Uuid>) -> Vec<MovieView> {
    let mut section = Vec::new();
    for view in movies {
        if section.len() == SECTION_LIMIT {
            break;
        }
        if shown.insert(view.movie.id) {
            section.push(view.clone());
        }
    }
    section
}
