use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieStatus {
    NowShowing,
    ComingSoon,
}

/// Фильм из статического каталога.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: u16,
    pub genre: Vec<String>,
    pub rating: f32,
    pub synopsis: String,
    /// Длительность в минутах.
    pub duration: u32,
    pub status: MovieStatus,
    pub image: String,
    pub poster: String,
    pub trailer: String,
    pub languages: Vec<String>,
}

/// Кинотеатр из статического каталога.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theatre {
    pub id: String,
    pub name: String,
    pub location: String,
}

/// Сеанс: связка фильм - кинотеатр - время.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: String,
    pub movie_id: String,
    pub theatre_id: String,
    pub time: String,
}
