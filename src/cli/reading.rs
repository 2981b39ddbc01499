use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use crate::{
    cli::parse_timestamp,
    core::{id::ConsumerId, reading::MeterReading},
    db::{State, sample::import_sample_readings},
    prelude::*,
    quantity::units::Units,
    tables::build_readings_table,
};

#[derive(Parser)]
pub struct ReadingArgs {
    #[command(subcommand)]
    command: ReadingCommand,
}

impl ReadingArgs {
    pub fn run(self, state: &mut State, now: NaiveDateTime) -> Result {
        match self.command {
            ReadingCommand::Add(args) => {
                let reading = MeterReading {
                    consumer_id: args.consumer_id,
                    at: args.at.unwrap_or(now),
                    units: args.units,
                };
                state.register.record_reading(reading)?;
                info!(consumer_id = %reading.consumer_id, units = %reading.units, "recorded");
            }
            ReadingCommand::List(args) => {
                let consumer = state
                    .register
                    .get(args.consumer_id)
                    .with_context(|| format!("consumer {} not found", args.consumer_id))?;
                info!(name = %consumer.name, "readings");
                println!("{}", build_readings_table(state.register.readings(consumer.id)));
            }
            ReadingCommand::ImportSample => {
                import_sample_readings(&mut state.register, now)?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum ReadingCommand {
    /// Record a cumulative meter reading.
    Add(AddArgs),

    /// List the consumer readings in time order.
    List(ListArgs),

    /// Append half a year of generated monthly readings to every consumer.
    ImportSample,
}

#[derive(Parser)]
struct AddArgs {
    #[clap(long = "consumer-id")]
    consumer_id: ConsumerId,

    /// Reading timestamp as `YYYY-MM-DD HH:MM`, defaults to now.
    #[clap(long, value_parser = parse_timestamp)]
    at: Option<NaiveDateTime>,

    /// Cumulative meter value.
    #[clap(long)]
    units: Units,
}

#[derive(Parser)]
struct ListArgs {
    #[clap(long = "consumer-id")]
    consumer_id: ConsumerId,
}
