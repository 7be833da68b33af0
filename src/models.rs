use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    #[serde(rename = "Rom-Com")]
    RomCom,
    Drama,
    Horror,
    Thriller,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Fantasy,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Action,
        Genre::Comedy,
        Genre::RomCom,
        Genre::Drama,
        Genre::Horror,
        Genre::Thriller,
        Genre::SciFi,
        Genre::Fantasy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::RomCom => "Rom-Com",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
            Genre::SciFi => "Sci-Fi",
            Genre::Fantasy => "Fantasy",
        }
    }

    /// Maps a comma-separated catalog genre list ("Action, Crime, Drama") onto
    /// the collection's genres. First match in this order wins; anything
    /// unrecognised lands in Drama.
    pub fn from_catalog(raw: Option<&str>) -> Self {
        let Some(raw) = raw.and_then(present) else {
            return Genre::Drama;
        };
        let genres = raw.to_lowercase();
        if genres.contains("action") {
            Genre::Action
        } else if genres.contains("comedy") {
            Genre::Comedy
        } else if genres.contains("romance") {
            Genre::RomCom
        } else if genres.contains("horror") {
            Genre::Horror
        } else if genres.contains("thriller") {
            Genre::Thriller
        } else if genres.contains("sci-fi") || genres.contains("science fiction") {
            Genre::SciFi
        } else if genres.contains("fantasy") {
            Genre::Fantasy
        } else {
            Genre::Drama
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Genre::ALL.into_iter().find(|g| g.as_str().eq_ignore_ascii_case(s)).ok_or_else(|| {
            let allowed = Genre::ALL.map(Genre::as_str).join(", ");
            AppError::Validation(format!("Genre must be one of: {allowed}"))
        })
    }
}

/// A record in the user's collection, as returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genre: Genre,
    pub actor: Option<String>,
    pub rating: Option<i32>,
    pub poster: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub awards: Option<String>,
    pub trailer: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<movie::Model> for Movie {
    type Error = AppError;

    fn try_from(m: movie::Model) -> AppResult<Self> {
        let genre = m.genre.parse().map_err(|_| {
            AppError::Internal(anyhow::anyhow!("stored movie {} has unknown genre {:?}", m.id, m.genre))
        })?;
        Ok(Self {
            id: m.id,
            title: m.title,
            genre,
            actor: m.actor,
            rating: m.rating,
            poster: m.poster,
            director: m.director,
            cast: m.cast,
            imdb_id: m.imdb_id,
            imdb_rating: m.imdb_rating,
            year: m.year,
            runtime: m.runtime,
            plot: m.plot,
            country: m.country,
            language: m.language,
            awards: m.awards,
            trailer: m.trailer,
            box_office: m.box_office,
            production: m.production,
            created_by: m.created_by,
            created_at: Timestamp::from_millisecond(m.created_at)?,
            updated_at: Timestamp::from_millisecond(m.updated_at)?,
        })
    }
}

/// Request body for create and partial update. Every field is optional here;
/// [`MovieInput::into_fields`] and [`MovieInput::apply_to`] decide what is
/// required. A text field that is blank after trimming clears the value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub actor: Option<String>,
    /// Forms submit ratings as strings, so both numbers and numeric strings
    /// are accepted.
    pub rating: Option<serde_json::Value>,
    pub poster: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub awards: Option<String>,
    pub trailer: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub created_by: Option<String>,
}

/// Validated, normalized movie fields ready to be written to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieFields {
    pub title: String,
    pub genre: Genre,
    pub actor: Option<String>,
    pub rating: Option<i32>,
    pub poster: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub imdb_id: Option<String>,
    pub imdb_rating: Option<String>,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub plot: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub awards: Option<String>,
    pub trailer: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub created_by: Option<String>,
}

impl MovieInput {
    pub fn into_fields(self) -> AppResult<MovieFields> {
        let title = self.title.as_deref().and_then(present);
        let genre = self.genre.as_deref().and_then(present);
        let (Some(title), Some(genre)) = (title, genre) else {
            return Err(AppError::validation("Title and genre are required"));
        };

        let fields = MovieFields {
            title: title.to_string(),
            genre: genre.parse()?,
            actor: None,
            rating: None,
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
        };
        MovieInput { title: None, genre: None, ..self }.apply_to(fields)
    }

    /// Overlays the provided fields onto `current` and re-validates the result.
    pub fn apply_to(self, mut current: MovieFields) -> AppResult<MovieFields> {
        if let Some(title) = self.title {
            current.title = present(&title)
                .ok_or_else(|| AppError::validation("Title cannot be empty"))?
                .to_string();
        }
        if let Some(genre) = self.genre {
            current.genre = genre.parse()?;
        }
        if let Some(rating) = self.rating {
            current.rating = parse_rating(&rating)?;
        }

        overlay(&mut current.actor, self.actor);
        overlay(&mut current.poster, self.poster);
        overlay(&mut current.director, self.director);
        overlay(&mut current.cast, self.cast);
        overlay(&mut current.imdb_id, self.imdb_id);
        overlay(&mut current.imdb_rating, self.imdb_rating);
        overlay(&mut current.year, self.year);
        overlay(&mut current.runtime, self.runtime);
        overlay(&mut current.plot, self.plot);
        overlay(&mut current.country, self.country);
        overlay(&mut current.language, self.language);
        overlay(&mut current.awards, self.awards);
        overlay(&mut current.trailer, self.trailer);
        overlay(&mut current.box_office, self.box_office);
        overlay(&mut current.production, self.production);
        overlay(&mut current.created_by, self.created_by);

        Ok(current)
    }

    /// Pre-fills a collection record from a catalog detail record. `N/A`
    /// placeholders are dropped and the catalog's 10-point rating is halved
    /// onto the 1..=5 scale, defaulting to 3.
    pub fn from_catalog(movie: &CatalogMovie) -> Self {
        let actors = movie.actors.as_deref().and_then(known);
        let rating = movie
            .imdb_rating
            .as_deref()
            .and_then(known)
            .and_then(|r| r.parse::<f64>().ok())
            .map(|r| ((r / 2.0).round() as i64).clamp(1, 5))
            .unwrap_or(3);

        Self {
            title: movie.title.clone(),
            genre: Some(Genre::from_catalog(movie.genre.as_deref()).as_str().to_string()),
            actor: actors.and_then(|a| a.split(',').next()).map(|a| a.trim().to_string()),
            rating: Some(serde_json::Value::from(rating)),
            poster: movie.poster.as_deref().and_then(known).map(str::to_string),
            director: movie.director.as_deref().and_then(known).map(str::to_string),
            cast: actors.map(str::to_string),
            imdb_id: movie.imdb_id.clone(),
            imdb_rating: movie.imdb_rating.as_deref().and_then(known).map(str::to_string),
            year: movie.year.clone(),
            runtime: movie.runtime.as_deref().and_then(known).map(str::to_string),
            plot: movie.plot.as_deref().and_then(known).map(str::to_string),
            country: movie.country.as_deref().and_then(known).map(str::to_string),
            language: movie.language.as_deref().and_then(known).map(str::to_string),
            awards: movie.awards.as_deref().and_then(known).map(str::to_string),
            trailer: None,
            box_office: movie.box_office.as_deref().and_then(known).map(str::to_string),
            production: movie.production.as_deref().and_then(known).map(str::to_string),
            created_by: None,
        }
    }

    /// Fields given here win over the ones in `base`.
    pub fn merged_over(self, base: MovieInput) -> MovieInput {
        MovieInput {
            title: self.title.or(base.title),
            genre: self.genre.or(base.genre),
            actor: self.actor.or(base.actor),
            rating: self.rating.or(base.rating),
            poster: self.poster.or(base.poster),
            director: self.director.or(base.director),
            cast: self.cast.or(base.cast),
            imdb_id: self.imdb_id.or(base.imdb_id),
            imdb_rating: self.imdb_rating.or(base.imdb_rating),
            year: self.year.or(base.year),
            runtime: self.runtime.or(base.runtime),
            plot: self.plot.or(base.plot),
            country: self.country.or(base.country),
            language: self.language.or(base.language),
            awards: self.awards.or(base.awards),
            trailer: self.trailer.or(base.trailer),
            box_office: self.box_office.or(base.box_office),
            production: self.production.or(base.production),
            created_by: self.created_by.or(base.created_by),
        }
    }
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = present(&value).map(str::to_string);
    }
}

fn present(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn known(s: &str) -> Option<&str> {
    present(s).filter(|s| *s != "N/A")
}

fn parse_rating(value: &serde_json::Value) -> AppResult<Option<i32>> {
    let invalid = || AppError::validation("Rating must be a whole number between 1 and 5");
    let rating = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(n) => n,
            None => n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64).ok_or_else(invalid)?,
        },
        serde_json::Value::String(s) => match present(s) {
            None => return Ok(None),
            Some(s) => s.parse::<i64>().map_err(|_| invalid())?,
        },
        _ => return Err(invalid()),
    };
    if !(1..=5).contains(&rating) {
        return Err(invalid());
    }
    Ok(Some(rating as i32))
}

/// Summary entry from a catalog keyword search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogHit {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full catalog record, passed through with the catalog's field names.
/// Absent fields stay absent on the way out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CatalogMovie {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<CatalogRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,
    #[serde(rename = "imdbRating", skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes", skip_serializing_if = "Option::is_none")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "imdbID", skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "DVD", skip_serializing_if = "Option::is_none")]
    pub dvd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Fields without a typed counterpart, such as `totalSeasons` on series.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub movies: Vec<CatalogHit>,
    pub total_results: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movie,
    Series,
    Episode,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Movie => "movie",
            CatalogKind::Series => "series",
            CatalogKind::Episode => "episode",
        }
    }
}

impl FromStr for CatalogKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(CatalogKind::Movie),
            "series" => Ok(CatalogKind::Series),
            "episode" => Ok(CatalogKind::Episode),
            _ => Err(AppError::validation("Type must be one of: movie, series, episode")),
        }
    }
}

/// Keyword search parameters for the catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub year: Option<String>,
    pub kind: Option<CatalogKind>,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn keyword(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn input(value: serde_json::Value) -> MovieInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_requires_title_and_genre() {
        let err = input(json!({ "title": "  ", "genre": "Drama" })).into_fields().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Title and genre are required"));

        let err = input(json!({ "title": "Lagaan" })).into_fields().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let err = input(json!({ "title": "Lagaan", "genre": "Western" })).into_fields().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.starts_with("Genre must be one of")));
    }

    #[test]
    fn fields_are_trimmed_and_blank_text_dropped() {
        let fields = input(json!({
            "title": "  Dangal ",
            "genre": "drama",
            "director": " Nitesh Tiwari ",
            "cast": "   ",
            "rating": "5",
            "imdbID": "tt5074352",
        }))
        .into_fields()
        .unwrap();

        assert_eq!(fields.title, "Dangal");
        assert_eq!(fields.genre, Genre::Drama);
        assert_eq!(fields.director.as_deref(), Some("Nitesh Tiwari"));
        assert_eq!(fields.cast, None);
        assert_eq!(fields.rating, Some(5));
        assert_eq!(fields.imdb_id.as_deref(), Some("tt5074352"));
    }

    #[test]
    fn rating_must_be_whole_and_in_range() {
        for bad in [json!(0), json!(6), json!(4.5), json!("great"), json!(true)] {
            let err = input(json!({ "title": "PK", "genre": "Comedy", "rating": bad }))
                .into_fields()
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        let fields =
            input(json!({ "title": "PK", "genre": "Comedy", "rating": "" })).into_fields().unwrap();
        assert_eq!(fields.rating, None);
        let fields =
            input(json!({ "title": "PK", "genre": "Comedy", "rating": 4.0 })).into_fields().unwrap();
        assert_eq!(fields.rating, Some(4));
    }

    #[test]
    fn partial_update_only_touches_given_fields() {
        let current = input(json!({
            "title": "RRR",
            "genre": "Action",
            "director": "S. S. Rajamouli",
            "rating": 4,
        }))
        .into_fields()
        .unwrap();

        let updated =
            input(json!({ "rating": 5, "director": "" })).apply_to(current.clone()).unwrap();
        assert_eq!(updated.title, "RRR");
        assert_eq!(updated.genre, Genre::Action);
        assert_eq!(updated.rating, Some(5));
        assert_eq!(updated.director, None);

        let err = input(json!({ "title": "" })).apply_to(current).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn genre_serializes_with_display_names() {
        assert_eq!(serde_json::to_value(Genre::RomCom).unwrap(), json!("Rom-Com"));
        assert_eq!(serde_json::to_value(Genre::SciFi).unwrap(), json!("Sci-Fi"));
        assert_eq!("sci-fi".parse::<Genre>().unwrap(), Genre::SciFi);
    }

    #[test]
    fn catalog_genres_map_in_priority_order() {
        assert_eq!(Genre::from_catalog(Some("Drama, Romance, Comedy")), Genre::Comedy);
        assert_eq!(Genre::from_catalog(Some("Adventure, Sci-Fi")), Genre::SciFi);
        assert_eq!(Genre::from_catalog(Some("Biography, Sport")), Genre::Drama);
        assert_eq!(Genre::from_catalog(Some("N/A")), Genre::Drama);
        assert_eq!(Genre::from_catalog(None), Genre::Drama);
    }

    #[test]
    fn catalog_record_prefills_collection_input() {
        let detail: CatalogMovie = serde_json::from_value(json!({
            "Title": "3 Idiots",
            "Year": "2009",
            "Genre": "Comedy, Drama",
            "Director": "Rajkumar Hirani",
            "Actors": "Aamir Khan, Madhavan, Mona Singh",
            "Poster": "N/A",
            "imdbRating": "8.4",
            "imdbID": "tt1187043",
            "Country": "India",
            "Response": "True",
        }))
        .unwrap();

        let fields = MovieInput::from_catalog(&detail).into_fields().unwrap();
        assert_eq!(fields.title, "3 Idiots");
        assert_eq!(fields.genre, Genre::Comedy);
        assert_eq!(fields.actor.as_deref(), Some("Aamir Khan"));
        assert_eq!(fields.cast.as_deref(), Some("Aamir Khan, Madhavan, Mona Singh"));
        assert_eq!(fields.poster, None);
        assert_eq!(fields.rating, Some(4));
        assert_eq!(fields.imdb_id.as_deref(), Some("tt1187043"));
        assert_eq!(fields.country.as_deref(), Some("India"));
    }

    #[test]
    fn catalog_record_passes_through_unchanged() {
        let raw = json!({
            "Title": "Sacred Games",
            "Year": "2018–2023",
            "Genre": "Action, Crime, Drama",
            "Ratings": [{ "Source": "Internet Movie Database", "Value": "8.5/10" }],
            "imdbID": "tt6077448",
            "Type": "series",
            "totalSeasons": "2",
            "Response": "True",
        });
        let detail: CatalogMovie = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(detail.kind.as_deref(), Some("series"));
        assert_eq!(detail.extra["totalSeasons"], "2");

        assert_eq!(serde_json::to_value(&detail).unwrap(), raw);
        assert_eq!(serde_json::to_value(CatalogMovie::default()).unwrap(), json!({}));
    }

    #[test]
    fn catalog_rating_defaults_to_three() {
        let detail = CatalogMovie {
            title: Some("Unrated".into()),
            imdb_rating: Some("N/A".into()),
            ..Default::default()
        };
        assert_eq!(MovieInput::from_catalog(&detail).into_fields().unwrap().rating, Some(3));
    }
}
