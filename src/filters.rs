//! Narrowing, ordering and summarising the collection listing.

use std::{cmp::Reverse, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Genre, Movie},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
    RatingHigh,
    RatingLow,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title-asc" => Ok(SortOrder::TitleAsc),
            "title-desc" => Ok(SortOrder::TitleDesc),
            "rating-high" => Ok(SortOrder::RatingHigh),
            "rating-low" => Ok(SortOrder::RatingLow),
            other => Err(AppError::Validation(format!("Unknown sort order {other:?}"))),
        }
    }
}

/// Raw listing parameters. Blank values mean "no filter", the way an
/// untouched form control submits them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub min_rating: Option<String>,
    pub sort: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionFilter {
    text: Option<String>,
    genre: Option<Genre>,
    min_rating: Option<i32>,
    sort: SortOrder,
}

impl TryFrom<CollectionQuery> for CollectionFilter {
    type Error = AppError;

    fn try_from(q: CollectionQuery) -> AppResult<Self> {
        let blank = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let min_rating = blank(&q.min_rating)
            .map(|r| r.parse::<i32>().map_err(|_| AppError::validation("minRating must be a number")))
            .transpose()?;

        Ok(Self {
            text: blank(&q.q).map(|t| t.to_lowercase()),
            genre: blank(&q.genre).map(|g| g.parse()).transpose()?,
            min_rating,
            sort: blank(&q.sort).map(|s| s.parse()).transpose()?.unwrap_or_default(),
        })
    }
}

impl CollectionFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        let text = self.text.as_deref().is_none_or(|needle| {
            [Some(&movie.title), movie.actor.as_ref(), movie.director.as_ref(), movie.cast.as_ref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle))
        });
        let genre = self.genre.is_none_or(|g| movie.genre == g);
        let rating = self.min_rating.is_none_or(|min| movie.rating.is_some_and(|r| r >= min));

        text && genre && rating
    }

    pub fn apply(&self, movies: Vec<Movie>) -> Vec<Movie> {
        let mut out: Vec<Movie> = movies.into_iter().filter(|m| self.matches(m)).collect();
        match self.sort {
            SortOrder::Newest => out.sort_by_key(|m| Reverse((m.created_at, m.id))),
            SortOrder::Oldest => out.sort_by_key(|m| (m.created_at, m.id)),
            SortOrder::TitleAsc => out.sort_by_cached_key(|m| m.title.to_lowercase()),
            SortOrder::TitleDesc => out.sort_by_cached_key(|m| Reverse(m.title.to_lowercase())),
            SortOrder::RatingHigh => out.sort_by_key(|m| Reverse(m.rating.unwrap_or(0))),
            SortOrder::RatingLow => out.sort_by_key(|m| m.rating.unwrap_or(0)),
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub filtered: usize,
    /// Unrated records count as zero; one decimal place.
    pub average_rating: f64,
    pub top_genre: Option<Genre>,
}

impl CollectionStats {
    pub fn compute(total: usize, filtered: &[Movie]) -> Self {
        let sum: i32 = filtered.iter().map(|m| m.rating.unwrap_or(0)).sum();
        let average = sum as f64 / filtered.len().max(1) as f64;

        let mut counts: Vec<(Genre, usize)> = Vec::new();
        for movie in filtered {
            match counts.iter_mut().find(|(g, _)| *g == movie.genre) {
                Some((_, n)) => *n += 1,
                None => counts.push((movie.genre, 1)),
            }
        }
        // Ties go to the genre seen last.
        let top_genre = counts
            .iter()
            .fold(None::<(Genre, usize)>, |best, &(g, n)| match best {
                Some((_, best_n)) if best_n > n => best,
                _ => Some((g, n)),
            })
            .map(|(g, _)| g);

        Self {
            total,
            filtered: filtered.len(),
            average_rating: (average * 10.0).round() / 10.0,
            top_genre,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn movie(id: i32, title: &str, genre: Genre, rating: Option<i32>, created: i64) -> Movie {
        let at = Timestamp::from_second(created).unwrap();
        Movie {
            id,
            title: title.to_string(),
            genre,
            actor: None,
            rating,
            poster: None,
            director: None,
            cast: None,
            imdb_id: None,
            imdb_rating: None,
            year: None,
            runtime: None,
            plot: None,
            country: None,
            language: None,
            awards: None,
            trailer: None,
            box_office: None,
            production: None,
            created_by: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn collection() -> Vec<Movie> {
        let mut lagaan = movie(1, "Lagaan", Genre::Drama, Some(5), 100);
        lagaan.cast = Some("Aamir Khan, Gracy Singh".into());
        let mut pk = movie(2, "pk", Genre::Comedy, Some(3), 200);
        pk.director = Some("Rajkumar Hirani".into());
        let rrr = movie(3, "RRR", Genre::Action, None, 300);
        let dangal = movie(4, "Dangal", Genre::Drama, Some(4), 400);
        vec![lagaan, pk, rrr, dangal]
    }

    fn filter(q: CollectionQuery) -> CollectionFilter {
        CollectionFilter::try_from(q).unwrap()
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn default_is_newest_first_without_filtering() {
        let out = filter(CollectionQuery::default()).apply(collection());
        assert_eq!(titles(&out), ["Dangal", "RRR", "pk", "Lagaan"]);
    }

    #[test]
    fn text_search_covers_cast_and_director() {
        let q = |text: &str| CollectionQuery { q: Some(text.into()), ..Default::default() };
        assert_eq!(titles(&filter(q("aamir")).apply(collection())), ["Lagaan"]);
        assert_eq!(titles(&filter(q("HIRANI")).apply(collection())), ["pk"]);
        assert!(filter(q("nobody")).apply(collection()).is_empty());
    }

    #[test]
    fn min_rating_excludes_unrated() {
        let q = CollectionQuery { min_rating: Some("4".into()), ..Default::default() };
        assert_eq!(titles(&filter(q).apply(collection())), ["Dangal", "Lagaan"]);
    }

    #[test]
    fn genre_and_blank_values() {
        let q = CollectionQuery {
            genre: Some("Drama".into()),
            q: Some("  ".into()),
            min_rating: Some("".into()),
            sort: Some("oldest".into()),
        };
        assert_eq!(titles(&filter(q).apply(collection())), ["Lagaan", "Dangal"]);
    }

    #[test]
    fn sort_orders() {
        let sorted = |sort: &str| {
            let q = CollectionQuery { sort: Some(sort.into()), ..Default::default() };
            filter(q).apply(collection())
        };
        assert_eq!(titles(&sorted("title-asc")), ["Dangal", "Lagaan", "pk", "RRR"]);
        assert_eq!(titles(&sorted("title-desc")), ["RRR", "pk", "Lagaan", "Dangal"]);
        assert_eq!(titles(&sorted("rating-high")), ["Lagaan", "Dangal", "pk", "RRR"]);
        assert_eq!(titles(&sorted("rating-low")), ["RRR", "pk", "Dangal", "Lagaan"]);
    }

    #[test]
    fn bad_parameters_are_validation_errors() {
        let bad = [
            CollectionQuery { sort: Some("random".into()), ..Default::default() },
            CollectionQuery { genre: Some("Western".into()), ..Default::default() },
            CollectionQuery { min_rating: Some("high".into()), ..Default::default() },
        ];
        for q in bad {
            assert!(matches!(CollectionFilter::try_from(q), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn stats_over_filtered_set() {
        let movies = collection();
        let stats = CollectionStats::compute(movies.len(), &movies);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.filtered, 4);
        assert_eq!(stats.average_rating, 3.0);
        assert_eq!(stats.top_genre, Some(Genre::Drama));

        let empty = CollectionStats::compute(4, &[]);
        assert_eq!(empty.average_rating, 0.0);
        assert_eq!(empty.top_genre, None);
    }

    #[test]
    fn stats_tie_goes_to_last_genre_seen() {
        let movies = vec![
            movie(1, "A", Genre::Horror, Some(2), 1),
            movie(2, "B", Genre::Comedy, Some(3), 2),
        ];
        let stats = CollectionStats::compute(2, &movies);
        assert_eq!(stats.top_genre, Some(Genre::Comedy));
        assert_eq!(stats.average_rating, 2.5);

        let movies = vec![
            movie(1, "A", Genre::Horror, Some(2), 1),
            movie(2, "B", Genre::Comedy, Some(3), 2),
            movie(3, "C", Genre::Horror, Some(4), 3),
        ];
        assert_eq!(CollectionStats::compute(3, &movies).top_genre, Some(Genre::Horror));
    }
}
