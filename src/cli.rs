mod bill;
mod consumer;
mod reading;
mod report;
mod tariff;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use crate::{
    cli::{
        bill::BillArgs,
        consumer::ConsumerArgs,
        reading::ReadingArgs,
        report::ReportArgs,
        tariff::TariffArgs,
    },
    core::error::ParseError,
    db::State,
    fmt::TIMESTAMP_FORMAT,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Directory with the consumers, readings, bills, and the tariff.
    #[clap(long = "data-dir", env = "BILLING_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage consumers.
    Consumer(ConsumerArgs),

    /// Record and inspect meter readings.
    Reading(ReadingArgs),

    /// Generate, inspect, and pay bills.
    Bill(BillArgs),

    /// Billing reports.
    Report(ReportArgs),

    /// Inspect and edit the tariff.
    Tariff(TariffArgs),
}

impl Command {
    pub fn run(self, state: &mut State, now: NaiveDateTime) -> Result {
        match self {
            Self::Consumer(args) => args.run(state, now),
            Self::Reading(args) => args.run(state, now),
            Self::Bill(args) => args.run(state, now),
            Self::Report(args) => args.run(state),
            Self::Tariff(args) => args.run(state),
        }
    }
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::Timestamp(text.to_owned()))
}
