use serde::{Deserialize, Serialize};

use super::{Movie, MovieView};

/// Optional bounds applied to catalog listings
///
/// A bound excludes every movie whose corresponding field is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilter {
    pub min_imdb: Option<f64>,
    pub max_imdb: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl MovieFilter {
    pub fn is_active(&self) -> bool {
        self.min_imdb.is_some()
            || self.max_imdb.is_some()
            || self.min_year.is_some()
            || self.max_year.is_some()
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        fn within<T: PartialOrd + Copy>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
            match value {
                Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
                None => min.is_none() && max.is_none(),
            }
        }

        within(movie.imdb_rating, self.min_imdb, self.max_imdb)
            && within(movie.year, self.min_year, self.max_year)
    }
}

/// Query string for GET /api/home
pub type HomeQuery = MovieFilter;

/// Query string for GET /api/movies
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub min_imdb: Option<f64>,
    pub max_imdb: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl SearchQuery {
    pub fn filter(&self) -> MovieFilter {
        MovieFilter {
            min_imdb: self.min_imdb,
            max_imdb: self.max_imdb,
            min_year: self.min_year,
            max_year: self.max_year,
        }
    }

    /// Trimmed title query, `None` when blank
    pub fn title_query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Homepage carousels, de-duplicated across sections
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSections {
    pub upcoming: Vec<MovieView>,
    pub recent: Vec<MovieView>,
    pub highest_rated: Vec<MovieView>,
    pub classics: Vec<MovieView>,
    /// Eligible movies after filters, before sectioning
    pub total_movies: usize,
    pub filters_active: bool,
}
