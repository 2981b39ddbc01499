#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod db;
mod fmt;
mod prelude;
mod quantity;
mod tables;

use chrono::Local;
use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Args,
    db::{Store, sample::bootstrap_if_empty},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let now = Local::now().naive_local();

    let store = Store::new(args.data_dir);
    let mut state = store.load();
    bootstrap_if_empty(&mut state.register, now)?;
    args.command.run(&mut state, now)?;
    store.save(&state)?;

    info!("done!");
    Ok(())
}
