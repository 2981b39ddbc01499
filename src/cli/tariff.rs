use clap::{Parser, Subcommand};

use crate::{
    core::bill::BillCharges,
    db::State,
    prelude::*,
    quantity::{cost::Cost, proportion::TaxRate, units::Units},
    tables::{build_charges_table, build_tariff_table},
};

#[derive(Parser)]
pub struct TariffArgs {
    #[command(subcommand)]
    command: TariffCommand,
}

impl TariffArgs {
    /// Edits replace the tariff only when the new value is valid as a whole.
    pub fn run(self, state: &mut State) -> Result {
        match self.command {
            TariffCommand::Show => {}
            TariffCommand::SetSlabs { specification } => {
                state.tariff = state.tariff.clone().with_slab_specification(&specification)?;
            }
            TariffCommand::SetFixedCharge { amount } => {
                state.tariff = state.tariff.clone().with_fixed_charge(Cost::from(amount))?;
            }
            TariffCommand::SetTaxRate { fraction } => {
                state.tariff = state.tariff.clone().with_tax_rate(TaxRate::try_from(fraction)?);
            }
            TariffCommand::Preview { units } => {
                let charges = BillCharges::compute(&state.tariff, units);
                info!(%units, total = %charges.total, "preview");
                println!("{}", build_charges_table(&charges));
                return Ok(());
            }
        }
        info!(tariff = %state.tariff, "tariff");
        println!("{}", build_tariff_table(&state.tariff));
        Ok(())
    }
}

#[derive(Subcommand)]
enum TariffCommand {
    /// Show the slabs, the fixed charge, and the tax rate.
    Show,

    /// Replace the slabs, for example `100:3.5,200:4.5,inf:6.0`.
    ///
    /// Thresholds are slab widths. The last slab may be unbounded: `inf`, `infty`, or `above`.
    SetSlabs { specification: String },

    /// Set the fixed charge added to every bill.
    SetFixedCharge { amount: f64 },

    /// Set the tax rate as a fraction, for example `0.05`.
    SetTaxRate { fraction: f64 },

    /// Price the consumption with the current tariff without billing anyone.
    Preview { units: Units },
}
