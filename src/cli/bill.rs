use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use crate::{
    core::{
        generator::BillGenerator,
        id::{BillId, ConsumerId},
        ledger::BillFilter,
        period::Period,
    },
    db::State,
    prelude::*,
    tables::{build_bill_table, build_bills_table, build_outcomes_table},
};

#[derive(Parser)]
pub struct BillArgs {
    #[command(subcommand)]
    command: BillCommand,
}

impl BillArgs {
    pub fn run(self, state: &mut State, now: NaiveDateTime) -> Result {
        match self.command {
            BillCommand::Generate(args) => {
                let period = match args.period {
                    Some(period) => period,
                    None => Period::containing(now).context("the current month is out of range")?,
                };
                let outcomes = BillGenerator::new(&state.tariff, &state.bill_ids).generate_for_period(
                    &mut state.ledger,
                    state.register.readings_by_consumer(),
                    period,
                    now,
                );
                println!("{}", build_outcomes_table(&outcomes, &state.register));
            }
            BillCommand::List(args) => {
                let filter = BillFilter::builder()
                    .maybe_paid(args.paid_state())
                    .maybe_consumer_id(args.consumer_id)
                    .maybe_from_period(args.from)
                    .maybe_to_period(args.to)
                    .build();
                println!("{}", build_bills_table(state.ledger.filter(&filter), &state.register));
            }
            BillCommand::Show(args) => {
                let bill =
                    state.ledger.get(args.id).with_context(|| format!("bill {} not found", args.id))?;
                println!("{}", build_bill_table(bill, &state.register));
            }
            BillCommand::Pay(args) => {
                let bill = state.ledger.mark_paid(args.id, now)?;
                info!(id = %bill.id, total = %bill.charges.total, "paid");
                println!("{}", build_bill_table(bill, &state.register));
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum BillCommand {
    /// Generate or refresh the bills of every consumer for the period.
    Generate(GenerateArgs),

    /// List bills.
    List(ListArgs),

    /// Show the bill breakdown.
    Show(IdArgs),

    /// Mark the bill as paid.
    Pay(IdArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Billing period as `YYYY-MM`, defaults to the current month.
    #[clap(long)]
    period: Option<Period>,
}

#[derive(Parser)]
struct ListArgs {
    /// Only unpaid bills.
    #[clap(long, conflicts_with = "paid")]
    unpaid: bool,

    /// Only paid bills.
    #[clap(long)]
    paid: bool,

    #[clap(long = "consumer-id")]
    consumer_id: Option<ConsumerId>,

    /// First period, inclusive.
    #[clap(long)]
    from: Option<Period>,

    /// Last period, inclusive.
    #[clap(long)]
    to: Option<Period>,
}

impl ListArgs {
    const fn paid_state(&self) -> Option<bool> {
        match (self.paid, self.unpaid) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Parser)]
struct IdArgs {
    #[clap(long)]
    id: BillId,
}
