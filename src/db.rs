pub mod repository;
pub mod sample;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    core::{
        bill::Bill,
        consumer::Consumer,
        id::{BillId, IdAllocator},
        ledger::BillLedger,
        reading::MeterReading,
        register::ConsumerRegister,
        tariff::Tariff,
    },
    prelude::*,
};

/// Everything the billing engine works on, loaded from and saved to the data directory.
pub struct State {
    pub register: ConsumerRegister,
    pub ledger: BillLedger,
    pub tariff: Tariff,
    pub bill_ids: IdAllocator<BillId>,
}

/// File-backed storage: three JSON collections and the tariff in TOML.
#[must_use]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    const CONSUMERS: &str = "consumers.json";
    const READINGS: &str = "readings.json";
    const BILLS: &str = "bills.json";
    const TARIFF: &str = "tariff.toml";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the state, falling back to empty collections and the default tariff.
    ///
    /// Each file is loaded independently: a corrupt file is logged and treated as missing.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn load(&self) -> State {
        let consumers: Vec<Consumer> = self.load_collection(Self::CONSUMERS);
        let readings: Vec<MeterReading> = self.load_collection(Self::READINGS);
        let bills: Vec<Bill> = self.load_collection(Self::BILLS);
        info!(
            n_consumers = consumers.len(),
            n_readings = readings.len(),
            n_bills = bills.len(),
            "loaded",
        );

        let bill_ids = IdAllocator::resuming_after(bills.iter().map(|bill| bill.id));
        let mut ledger: BillLedger = BillLedger::default();
        for bill in bills {
            let id = bill.id;
            if let Err(error) = ledger.insert(bill) {
                error!(%id, "dropping the bill: {error:#}");
            }
        }
        State {
            register: ConsumerRegister::from_parts(consumers, readings),
            ledger,
            tariff: self.load_tariff(),
            bill_ids,
        }
    }

    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn save(&self, state: &State) -> Result {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create `{}`", self.dir.display()))?;
        self.save_collection(Self::CONSUMERS, &state.register.iter().collect::<Vec<_>>())?;
        self.save_collection(Self::READINGS, &state.register.all_readings().collect::<Vec<_>>())?;
        self.save_collection(Self::BILLS, &state.ledger.iter().collect::<Vec<_>>())?;
        self.save_tariff(&state.tariff)?;
        info!("saved");
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn load_collection<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.path(name);
        read_fallibly(&path, |text| Ok(serde_json::from_str(text)?))
            .unwrap_or_else(|error| {
                error!(path = %path.display(), "failed to load, starting empty: {error:#}");
                None
            })
            .unwrap_or_default()
    }

    fn load_tariff(&self) -> Tariff {
        let path = self.path(Self::TARIFF);
        read_fallibly(&path, |text| Ok(toml::from_str(text)?))
            .unwrap_or_else(|error| {
                error!(path = %path.display(), "failed to load, using the default tariff: {error:#}");
                None
            })
            .unwrap_or_default()
    }

    fn save_collection<T: Serialize>(&self, name: &str, items: &[T]) -> Result {
        let path = self.path(name);
        let text = serde_json::to_string_pretty(items)?;
        fs::write(&path, text).with_context(|| format!("failed to write `{}`", path.display()))
    }

    fn save_tariff(&self, tariff: &Tariff) -> Result {
        let path = self.path(Self::TARIFF);
        let text = toml::to_string_pretty(tariff)?;
        fs::write(&path, text).with_context(|| format!("failed to write `{}`", path.display()))
    }
}

/// Read and parse the file. `None` when the file does not exist.
fn read_fallibly<T>(path: &Path, parse: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    parse(&text).map(Some)
}
