//! Fixed lists behind the preferred-region and featured-actor aggregations.

use crate::models::CatalogMovie;

/// Keyword searches used to seed the region listing. Only the first
/// [`SEED_SEARCHES`] are issued per request.
pub const SEED_KEYWORDS: [&str; 10] = [
    "Bollywood",
    "RRR",
    "Baahubali",
    "3 Idiots",
    "Dangal",
    "PK",
    "Kabhi Khushi Kabhie Gham",
    "Dilwale Dulhania Le Jayenge",
    "Lagaan",
    "Taare Zameen Par",
];

pub const SEED_SEARCHES: usize = 5;

/// Matched case-insensitively against a record's language list.
pub const LANGUAGE_KEYWORDS: [&str; 10] = [
    "Bollywood",
    "Hindi",
    "Tamil",
    "Telugu",
    "Malayalam",
    "Kannada",
    "Bengali",
    "Marathi",
    "Punjabi",
    "Indian",
];

const COUNTRY_TERMS: [&str; 2] = ["India", "Indian"];

pub const FEATURED_ACTORS: [&str; 25] = [
    "Shah Rukh Khan",
    "Amitabh Bachchan",
    "Aamir Khan",
    "Salman Khan",
    "Akshay Kumar",
    "Rajinikanth",
    "Kamal Haasan",
    "Allu Arjun",
    "Mahesh Babu",
    "Prabhas",
    "Vijay",
    "Ajith Kumar",
    "Mammootty",
    "Mohanlal",
    "Chiranjeevi",
    "Ranveer Singh",
    "Ranbir Kapoor",
    "Hrithik Roshan",
    "Deepika Padukone",
    "Priyanka Chopra",
    "Katrina Kaif",
    "Alia Bhatt",
    "Kangana Ranaut",
    "Kareena Kapoor",
    "Aishwarya Rai",
];

/// Number of featured actors queried by the featured listing.
pub const FEATURED_SEARCHES: usize = 5;

pub fn seed_keywords() -> &'static [&'static str] {
    &SEED_KEYWORDS[..SEED_SEARCHES]
}

pub fn featured_actors() -> &'static [&'static str] {
    &FEATURED_ACTORS[..FEATURED_SEARCHES]
}

/// True when the record's country, language or cast ties it to the region.
pub fn matches(movie: &CatalogMovie) -> bool {
    let by_country = movie
        .country
        .as_deref()
        .is_some_and(|country| COUNTRY_TERMS.iter().any(|term| country.contains(term)));

    let by_language = movie.language.as_deref().is_some_and(|language| {
        let language = language.to_lowercase();
        LANGUAGE_KEYWORDS.iter().any(|kw| language.contains(&kw.to_lowercase()))
    });

    // Cast names are compared as written.
    let by_cast = movie
        .actors
        .as_deref()
        .is_some_and(|actors| FEATURED_ACTORS.iter().any(|name| actors.contains(name)));

    by_country || by_language || by_cast
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(country: &str, language: &str, actors: &str) -> CatalogMovie {
        CatalogMovie {
            country: Some(country.to_string()),
            language: Some(language.to_string()),
            actors: Some(actors.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn matches_on_any_of_country_language_or_cast() {
        assert!(matches(&movie("India, UK", "English", "Dev Patel")));
        assert!(matches(&movie("USA", "English, hindi", "Dev Patel")));
        assert!(matches(&movie("USA", "English", "Priyanka Chopra, Keanu Reeves")));
        assert!(!matches(&movie("USA", "English", "Keanu Reeves")));
        assert!(!matches(&CatalogMovie::default()));
    }

    #[test]
    fn cast_match_is_case_sensitive() {
        assert!(!matches(&movie("USA", "English", "priyanka chopra")));
    }

    #[test]
    fn only_a_prefix_of_each_list_is_queried() {
        assert_eq!(seed_keywords(), ["Bollywood", "RRR", "Baahubali", "3 Idiots", "Dangal"]);
        assert_eq!(featured_actors().len(), 5);
        assert_eq!(featured_actors()[0], "Shah Rukh Khan");
    }
}
