use std::collections::HashSet;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{
    config::Config,
    models::ShowContext,
    seating::{pricing, SeatMap, SelectionTracker},
    services::BookingStore,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CineBook client ({})", config.app.environment);

    let state = AppState::new(config);
    info!(
        "Catalog loaded: {} movies, {} theatres",
        state.catalog.movies().len(),
        state.catalog.theatres().len()
    );

    // Smoke-прогон движка на первом сеансе каталога
    let movie = &state.catalog.movies()[0];
    let theatre = &state.catalog.theatres()[0];
    let times = state.catalog.show_times(&movie.id, &theatre.id);
    info!("{} at {}: showtimes {:?}", movie.title, theatre.name, times);

    let show = ShowContext {
        movie_id: movie.id.clone(),
        theatre_id: theatre.id.clone(),
        date: "2026-08-10".to_string(),
        time: times[0].clone(),
    };

    // Занятые места берём с бэкенда; без него прогоняем пустой зал
    let booked: HashSet<String> = match state.store.fetch_booked_seats(&show).await {
        Ok(seats) => seats,
        Err(e) => {
            warn!("Document store unreachable ({}), assuming an empty hall", e);
            HashSet::new()
        }
    };

    let map = SeatMap::standard(&booked);
    let mut selection = SelectionTracker::new();
    for (row, number) in [('A', 1), ('D', 3)] {
        if let Some(seat) = map.seat(row, number) {
            selection.toggle(seat);
        }
    }

    info!(
        "Demo selection {:?} -> total {}",
        selection.labels(),
        pricing::total_of(selection.seats())
    );
    info!("Ready");

    Ok(())
}
