use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    core::{id::ConsumerId, ledger::BillFilter},
    db::State,
    prelude::*,
    quantity::cost::Cost,
    tables::{build_bills_table, build_consumption_table, build_readings_table},
};

#[derive(Parser)]
pub struct ReportArgs {
    #[command(subcommand)]
    command: ReportCommand,
}

impl ReportArgs {
    pub fn run(self, state: &State) -> Result {
        match self.command {
            ReportCommand::Outstanding => {
                let filter = BillFilter::builder().paid(false).build();
                let bills = state
                    .ledger
                    .filter(&filter)
                    .sorted_by_key(|bill| (bill.period, bill.consumer_id))
                    .collect_vec();
                let total: Cost = bills.iter().map(|bill| bill.charges.total).sum();
                println!("{}", build_bills_table(bills, &state.register));
                info!(%total, "outstanding");
            }
            ReportCommand::Range(args) => {
                ensure!(args.from <= args.to, "`--from` must not be later than `--to`");
                let filter =
                    BillFilter::builder().generated_from(args.from).generated_to(args.to).build();
                let bills = state.ledger.filter(&filter).sorted_by_key(|bill| bill.generated_at);
                println!("{}", build_bills_table(bills, &state.register));
            }
            ReportCommand::Consumption(args) => {
                if let Some(consumer_id) = args.consumer_id {
                    let readings = state
                        .register
                        .meter_readings(consumer_id)
                        .with_context(|| format!("no readings for consumer {consumer_id}"))?;
                    println!("{}", build_readings_table(readings));
                    info!(%consumer_id, total = %readings.total_consumption(), "consumption");
                } else {
                    println!("{}", build_consumption_table(&state.register));
                }
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Unpaid bills by period.
    Outstanding,

    /// Bills generated within the date range.
    Range(RangeArgs),

    /// Lifetime consumption per consumer, or the readings of a single consumer.
    Consumption(ConsumptionArgs),
}

#[derive(Parser)]
struct RangeArgs {
    /// First generation date, inclusive.
    #[clap(long)]
    from: NaiveDate,

    /// Last generation date, inclusive.
    #[clap(long)]
    to: NaiveDate,
}

#[derive(Parser)]
struct ConsumptionArgs {
    #[clap(long = "consumer-id")]
    consumer_id: Option<ConsumerId>,
}
