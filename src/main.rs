//! School Timetable - Axum Server
//!
//! Run with: cargo run
//! Then open: http://localhost:7860

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use school_timetable::api;
use school_timetable::demo_data::{self, DemoData};
use school_timetable::store::InMemoryStore;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let demo = std::env::var("DEMO_DATA")
        .ok()
        .and_then(|value| value.parse::<DemoData>().ok())
        .unwrap_or(DemoData::Small);
    log::info!("seeding reference data set {}", demo.as_str());

    let store = InMemoryStore::new();
    let catalog = demo_data::seed(&store, demo);
    let state = Arc::new(api::AppState::new(store, catalog));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 7860));

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
