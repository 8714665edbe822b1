pub mod catalog;
pub mod movie;
pub mod rating;
pub mod tmdb;

pub use catalog::{HomeQuery, HomeSections, MovieFilter, SearchQuery};
pub use movie::{
    parse_cast, parse_genres, CastEntry, CastMember, CreateMovieRequest, Movie, MovieSummary,
    MovieView, NewMovie,
};
pub use rating::{CreateRatingRequest, NewRating, Rating, ScoreAverages, DEFAULT_AUTHOR};
pub use tmdb::{
    TmdbCastMember, TmdbCredits, TmdbCrewMember, TmdbGenre, TmdbMovie, TmdbMovieDetails,
    TmdbSearchResponse, TmdbVideo, TmdbVideos,
};
