use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use crate::{
    core::{consumer::ConsumerUpdate, id::ConsumerId, register::NewConsumer},
    db::State,
    prelude::*,
    tables::build_consumers_table,
};

#[derive(Parser)]
pub struct ConsumerArgs {
    #[command(subcommand)]
    command: ConsumerCommand,
}

impl ConsumerArgs {
    pub fn run(self, state: &mut State, now: NaiveDateTime) -> Result {
        match self.command {
            ConsumerCommand::Add(args) => {
                let details = NewConsumer::builder()
                    .name(args.name)
                    .maybe_address(args.details.address)
                    .maybe_phone(args.details.phone)
                    .maybe_meter_number(args.details.meter_number)
                    .build();
                let id = state.register.add(details, now.date());
                info!(%id, "added");
            }
            ConsumerCommand::List => {
                println!("{}", build_consumers_table(state.register.iter()));
            }
            ConsumerCommand::Update(args) => {
                let update = ConsumerUpdate::builder()
                    .maybe_name(args.name)
                    .maybe_address(args.details.address)
                    .maybe_phone(args.details.phone)
                    .maybe_meter_number(args.details.meter_number)
                    .build();
                let consumer = state.register.update(args.id, update)?;
                println!("{}", build_consumers_table([consumer]));
            }
            ConsumerCommand::Delete(args) => {
                let consumer = state.register.delete(args.id, &state.ledger)?;
                info!(id = %consumer.id, name = %consumer.name, "deleted");
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum ConsumerCommand {
    /// Register a new consumer.
    Add(AddArgs),

    /// List all consumers.
    List,

    /// Change the consumer details. Omitted options are left as they are.
    Update(UpdateArgs),

    /// Delete a consumer that has no bills, together with the readings.
    Delete(IdArgs),
}

#[derive(Parser)]
struct DetailsArgs {
    #[clap(long)]
    address: Option<String>,

    #[clap(long)]
    phone: Option<String>,

    #[clap(long = "meter")]
    meter_number: Option<String>,
}

#[derive(Parser)]
struct AddArgs {
    #[clap(long)]
    name: String,

    #[clap(flatten)]
    details: DetailsArgs,
}

#[derive(Parser)]
struct UpdateArgs {
    #[clap(long)]
    id: ConsumerId,

    #[clap(long)]
    name: Option<String>,

    #[clap(flatten)]
    details: DetailsArgs,
}

#[derive(Parser)]
struct IdArgs {
    #[clap(long)]
    id: ConsumerId,
}
