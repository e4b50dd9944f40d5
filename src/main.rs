//! recalc: terminal audio recorder and arbitrary-precision calculator.

mod app;
mod calculator;
mod commands;
mod config;
mod history;
mod logging;
mod paths;
mod recorder;
mod setup;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("Fatal: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
