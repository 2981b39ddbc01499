use chrono::NaiveDate;

use crate::{
    core::{
        bill::Bill,
        consumer::{Consumer, ConsumerUpdate},
        error::ConsumerError,
        id::{BillId, ConsumerId, IdAllocator},
        ledger::BillLedger,
        reading::{MeterReading, MeterReadings},
    },
    db::repository::{InMemory, Repository},
};

/// Consumer details supplied on registration.
#[derive(Clone, Debug, bon::Builder)]
pub struct NewConsumer {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub address: Option<String>,

    #[builder(into)]
    pub phone: Option<String>,

    #[builder(into)]
    pub meter_number: Option<String>,
}

/// Known consumers and their meter readings.
#[derive(Default)]
pub struct ConsumerRegister {
    consumers: InMemory<ConsumerId, Consumer>,
    readings: InMemory<ConsumerId, MeterReadings>,
    ids: IdAllocator<ConsumerId>,
}

impl ConsumerRegister {
    /// Rebuild the register from persisted collections.
    ///
    /// Readings of unknown consumers are kept as they are.
    pub fn from_parts(
        consumers: impl IntoIterator<Item = Consumer>,
        readings: impl IntoIterator<Item = MeterReading>,
    ) -> Self {
        let consumers: InMemory<_, _> =
            consumers.into_iter().map(|consumer| (consumer.id, consumer)).collect();
        let ids = IdAllocator::resuming_after(consumers.values().map(|consumer| consumer.id));
        let mut this = Self { consumers, readings: InMemory::default(), ids };
        for reading in readings {
            this.readings.get_or_insert_default(reading.consumer_id).insert(reading);
        }
        this
    }

    pub fn add(&mut self, details: NewConsumer, joined_on: NaiveDate) -> ConsumerId {
        let id = self.ids.allocate();
        let consumer = Consumer::builder()
            .id(id)
            .name(details.name)
            .maybe_address(details.address)
            .maybe_phone(details.phone)
            .maybe_meter_number(details.meter_number)
            .joined_on(joined_on)
            .build();
        self.consumers.insert(id, consumer);
        id
    }

    #[must_use]
    pub fn get(&self, id: ConsumerId) -> Option<&Consumer> {
        self.consumers.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Consumer> {
        self.consumers.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub fn update(
        &mut self,
        id: ConsumerId,
        update: ConsumerUpdate,
    ) -> Result<&Consumer, ConsumerError> {
        let consumer = self.consumers.get_mut(&id).ok_or(ConsumerError::NotFound(id))?;
        consumer.apply(update);
        Ok(consumer)
    }

    /// Remove the consumer together with the readings, unless any bill refers to the consumer.
    pub fn delete<R: Repository<BillId, Bill>>(
        &mut self,
        id: ConsumerId,
        ledger: &BillLedger<R>,
    ) -> Result<Consumer, ConsumerError> {
        if ledger.has_bills_for(id) {
            return Err(ConsumerError::HasBills(id));
        }
        let consumer = self.consumers.remove(&id).ok_or(ConsumerError::NotFound(id))?;
        self.readings.remove(&id);
        Ok(consumer)
    }

    pub fn record_reading(&mut self, reading: MeterReading) -> Result<(), ConsumerError> {
        if self.consumers.get(&reading.consumer_id).is_none() {
            return Err(ConsumerError::NotFound(reading.consumer_id));
        }
        self.readings.get_or_insert_default(reading.consumer_id).insert(reading);
        Ok(())
    }

    /// Readings of the consumer in timestamp order, empty when there are none.
    #[must_use]
    pub fn readings(&self, id: ConsumerId) -> &[MeterReading] {
        self.readings.get(&id).map(|readings| readings.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn meter_readings(&self, id: ConsumerId) -> Option<&MeterReadings> {
        self.readings.get(&id)
    }

    /// Every consumer paired with its readings, in consumer order.
    pub fn readings_by_consumer(&self) -> impl Iterator<Item = (ConsumerId, &[MeterReading])> {
        self.consumers.values().map(move |consumer| (consumer.id, self.readings(consumer.id)))
    }

    /// All recorded readings, for persisting.
    pub fn all_readings(&self) -> impl Iterator<Item = &MeterReading> {
        self.readings.values().flat_map(|readings| readings.iter())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::{
        core::{bill::BillCharges, period::Period, tariff::Tariff},
        quantity::units::Units,
    };

    fn joined_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap().and_hms_opt(8, 30, 0).unwrap()
    }

    fn reading(consumer_id: ConsumerId, day: u32, units: u64) -> MeterReading {
        MeterReading { consumer_id, at: at(day), units: Units(units) }
    }

    #[test]
    fn test_add_allocates_ids() {
        let mut register = ConsumerRegister::default();
        let first = register.add(NewConsumer::builder().name("Meera Iyer").build(), joined_on());
        let second = register.add(NewConsumer::builder().name("Rahul Das").build(), joined_on());
        assert_eq!((first, second), (ConsumerId(1), ConsumerId(2)));
        assert_eq!(register.get(second).map(|consumer| consumer.name.as_str()), Some("Rahul Das"));
    }

    #[test]
    fn test_from_parts_resumes_ids_and_sorts_readings() {
        let consumer = Consumer::builder().id(ConsumerId(4)).name("Meera Iyer").joined_on(joined_on()).build();
        let mut register = ConsumerRegister::from_parts(
            [consumer],
            [reading(ConsumerId(4), 20, 1200), reading(ConsumerId(4), 2, 1000)],
        );
        assert_eq!(register.add(NewConsumer::builder().name("Rahul Das").build(), joined_on()), ConsumerId(5));
        assert_eq!(
            register.readings(ConsumerId(4)).iter().map(|reading| reading.units).collect::<Vec<_>>(),
            [Units(1000), Units(1200)],
        );
        assert!(register.readings(ConsumerId(5)).is_empty());
    }

    #[test]
    fn test_record_reading_requires_consumer() {
        let mut register = ConsumerRegister::default();
        assert_eq!(
            register.record_reading(reading(ConsumerId(1), 1, 1000)),
            Err(ConsumerError::NotFound(ConsumerId(1))),
        );
        let id = register.add(NewConsumer::builder().name("Meera Iyer").build(), joined_on());
        register.record_reading(reading(id, 1, 1000)).unwrap();
        assert_eq!(register.readings(id).len(), 1);
        assert_eq!(register.all_readings().count(), 1);
    }

    #[test]
    fn test_update() {
        let mut register = ConsumerRegister::default();
        let id = register.add(NewConsumer::builder().name("Meera Iyer").build(), joined_on());
        let updated = register.update(id, ConsumerUpdate::builder().address("Pune").build()).unwrap();
        assert_eq!(updated.address.as_deref(), Some("Pune"));
        assert!(register.update(ConsumerId(9), ConsumerUpdate::default()).is_err());
    }

    #[test]
    fn test_delete_is_guarded_by_bills() {
        let mut register = ConsumerRegister::default();
        let billed = register.add(NewConsumer::builder().name("Meera Iyer").build(), joined_on());
        let unbilled = register.add(NewConsumer::builder().name("Rahul Das").build(), joined_on());
        register.record_reading(reading(unbilled, 1, 1000)).unwrap();

        let mut ledger: BillLedger = BillLedger::default();
        ledger
            .insert(
                Bill::builder()
                    .id(BillId(1))
                    .consumer_id(billed)
                    .period(Period::new(2025, 8).unwrap())
                    .charges(BillCharges::compute(&Tariff::default(), Units(10)))
                    .generated_at(at(31))
                    .build(),
            )
            .unwrap();

        assert_eq!(register.delete(billed, &ledger), Err(ConsumerError::HasBills(billed)));
        assert_eq!(register.delete(unbilled, &ledger).map(|consumer| consumer.id), Ok(unbilled));
        assert!(register.readings(unbilled).is_empty());
        assert_eq!(register.delete(unbilled, &ledger), Err(ConsumerError::NotFound(unbilled)));
        assert_eq!(register.iter().count(), 1);
    }
}
