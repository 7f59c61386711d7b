//! catalog.rs
//!
//! Статический справочник: фильмы, кинотеатры и сеансы. Это референсные
//! данные, а не инженерия - приложение их только читает.

use chrono::{Days, NaiveDate};

use crate::models::{Movie, MovieStatus, Showtime, Theatre};

/// Пул времён, которым добиваем расписание, если у пары фильм+кинотеатр
/// меньше четырёх сеансов.
const FALLBACK_TIMES: [&str; 6] = ["10:30", "14:00", "16:45", "19:30", "21:00", "22:30"];

/// Сколько ближайших дат доступно для выбора.
const BOOKING_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    theatres: Vec<Theatre>,
    showtimes: Vec<Showtime>,
}

impl Catalog {
    pub fn load() -> Self {
        Catalog {
            movies: movies(),
            theatres: theatres(),
            showtimes: showtimes(),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn theatres(&self) -> &[Theatre] {
        &self.theatres
    }

    pub fn movie(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn theatre(&self, id: &str) -> Option<&Theatre> {
        self.theatres.iter().find(|t| t.id == id)
    }

    pub fn now_showing(&self) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|m| m.status == MovieStatus::NowShowing)
            .collect()
    }

    pub fn showtimes_for_movie(&self, movie_id: &str) -> Vec<&Showtime> {
        self.showtimes
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .collect()
    }

    /// Времена сеансов для фильма в конкретном кинотеатре. Если известных
    /// сеансов меньше четырёх, добавляем времена из общего пула.
    pub fn show_times(&self, movie_id: &str, theatre_id: &str) -> Vec<String> {
        let mut times: Vec<String> = self
            .showtimes
            .iter()
            .filter(|s| s.movie_id == movie_id && s.theatre_id == theatre_id)
            .map(|s| s.time.clone())
            .collect();

        if times.len() < 4 {
            let missing = 4 - times.len();
            let extra: Vec<String> = FALLBACK_TIMES
                .iter()
                .filter(|t| !times.iter().any(|have| have == *t))
                .take(missing)
                .map(|t| t.to_string())
                .collect();
            times.extend(extra);
        }

        times
    }

    /// Ближайшие даты начиная с `from` включительно.
    pub fn upcoming_dates(from: NaiveDate) -> Vec<NaiveDate> {
        (0..BOOKING_WINDOW_DAYS)
            .filter_map(|i| from.checked_add_days(Days::new(i)))
            .collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    title: &str,
    year: u16,
    genre: &[&str],
    rating: f32,
    synopsis: &str,
    duration: u32,
    status: MovieStatus,
    photo: &str,
    trailer: &str,
    languages: &[&str],
) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        year,
        genre: strings(genre),
        rating,
        synopsis: synopsis.to_string(),
        duration,
        status,
        image: format!("https://images.unsplash.com/{photo}?w=400&h=600&fit=crop"),
        poster: format!("https://images.unsplash.com/{photo}?w=800&h=1200&fit=crop"),
        trailer: format!("https://www.youtube.com/embed/{trailer}"),
        languages: strings(languages),
    }
}

fn theatres() -> Vec<Theatre> {
    [
        ("theatre_1", "Grand Cinema", "Downtown"),
        ("theatre_2", "City Plex", "Mall Road"),
        ("theatre_3", "IMAX Arena", "Tech Park"),
    ]
    .into_iter()
    .map(|(id, name, location)| Theatre {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
    })
    .collect()
}

fn showtimes() -> Vec<Showtime> {
    [
        ("show_1", "movie_1", "theatre_1", "10:30"),
        ("show_2", "movie_1", "theatre_1", "18:45"),
        ("show_3", "movie_1", "theatre_2", "20:30"),
        ("show_4", "movie_2", "theatre_1", "21:00"),
        ("show_5", "movie_3", "theatre_3", "16:30"),
        ("show_6", "movie_4", "theatre_2", "14:00"),
        ("show_7", "movie_5", "theatre_1", "19:15"),
        ("show_8", "movie_6", "theatre_2", "22:00"),
        ("show_9", "movie_8", "theatre_3", "20:45"),
        ("show_10", "movie_9", "theatre_1", "17:00"),
    ]
    .into_iter()
    .map(|(id, movie_id, theatre_id, time)| Showtime {
        id: id.to_string(),
        movie_id: movie_id.to_string(),
        theatre_id: theatre_id.to_string(),
        time: time.to_string(),
    })
    .collect()
}

fn movies() -> Vec<Movie> {
    vec![
        movie(
            "movie_1",
            "Inception",
            2010,
            &["Sci-Fi", "Thriller"],
            8.8,
            "A thief who enters dream worlds to steal secrets from the subconscious is given a chance to erase his criminal past by planting an idea in a corporate heir's mind.",
            148,
            MovieStatus::NowShowing,
            "photo-1536440136628-849c177e76a1",
            "YoHD9XEInc0",
            &["English", "Hindi", "Tamil"],
        ),
        movie(
            "movie_2",
            "The Dark Knight",
            2008,
            &["Action", "Drama"],
            9.0,
            "Batman raises the stakes in his war on crime against the Joker, a criminal mastermind who seeks to test Batman in a game of cat and mouse.",
            152,
            MovieStatus::NowShowing,
            "photo-1509347528160-9a9e33742cdb",
            "EXeTwQWrcwY",
            &["English", "Hindi"],
        ),
        movie(
            "movie_3",
            "Interstellar",
            2014,
            &["Sci-Fi", "Adventure"],
            8.6,
            "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival as Earth becomes increasingly uninhabitable.",
            169,
            MovieStatus::ComingSoon,
            "photo-1446776811953-b23d57bd21aa",
            "zSWdZVtXT7E",
            &["English"],
        ),
        movie(
            "movie_4",
            "Avengers: Endgame",
            2019,
            &["Action", "Sci-Fi"],
            8.4,
            "The Avengers assemble one last time to reverse Thanos' actions and restore balance to the universe after the devastating events of Infinity War.",
            181,
            MovieStatus::NowShowing,
            "photo-1531303435785-3c53454911b8",
            "TcMBFSGVi1c",
            &["English", "Hindi", "Tamil", "Telugu"],
        ),
        movie(
            "movie_5",
            "Parasite",
            2019,
            &["Thriller", "Drama"],
            8.5,
            "A poor family schemes to become employed by a wealthy family by infiltrating their household, but things take an unexpected turn.",
            132,
            MovieStatus::NowShowing,
            "photo-1485846234645-a62644f84728",
            "5xH0HfJHsaY",
            &["Korean", "English"],
        ),
        movie(
            "movie_6",
            "Joker",
            2019,
            &["Crime", "Drama"],
            8.4,
            "A troubled mental health support worker descends into madness, becoming the archcriminal known only as The Joker.",
            122,
            MovieStatus::NowShowing,
            "photo-1594908900066-3f47337549d8",
            "zAGVQLHvwOY",
            &["English", "Hindi"],
        ),
        movie(
            "movie_7",
            "Dune",
            2021,
            &["Sci-Fi", "Adventure"],
            8.1,
            "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset while its heir becomes swept up in a rebellion.",
            155,
            MovieStatus::ComingSoon,
            "photo-1535016120720-40c6874c3b1c",
            "8g18jFvTt3s",
            &["English", "Hindi"],
        ),
        movie(
            "movie_8",
            "The Matrix",
            1999,
            &["Sci-Fi", "Action"],
            8.7,
            "A computer hacker learns from mysterious rebels about the true nature of his reality and his role in the war against its controllers.",
            136,
            MovieStatus::NowShowing,
            "photo-1526374965328-7f61d57dc18c5",
            "vKQi3bBA1y8",
            &["English", "Hindi", "Tamil"],
        ),
        movie(
            "movie_9",
            "Titanic",
            1997,
            &["Romance", "Drama"],
            7.9,
            "A love story aboard the RMS Titanic during its ill-fated maiden voyage, spanning different social classes during a time of great upheaval.",
            195,
            MovieStatus::NowShowing,
            "photo-1478720568477-152d9b164e26",
            "2e-eXJ6HgU0",
            &["English", "Hindi", "Tamil"],
        ),
        movie(
            "movie_10",
            "Oppenheimer",
            2023,
            &["Drama", "History"],
            8.9,
            "The story of American scientist J. Robert Oppenheimer and his role in the development of the atomic bomb during World War II.",
            180,
            MovieStatus::ComingSoon,
            "photo-1451187580459-43490279c0fa",
            "uYPbbksJxIg",
            &["English"],
        ),
    ]
}
