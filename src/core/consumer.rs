use bon::Builder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::id::ConsumerId;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Builder)]
pub struct Consumer {
    pub id: ConsumerId,

    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub address: Option<String>,

    #[builder(into)]
    pub phone: Option<String>,

    #[builder(into)]
    pub meter_number: Option<String>,

    pub joined_on: NaiveDate,
}

/// Partial consumer edit: only the set fields are changed.
#[derive(Clone, Debug, Default, Builder)]
pub struct ConsumerUpdate {
    #[builder(into)]
    pub name: Option<String>,

    #[builder(into)]
    pub address: Option<String>,

    #[builder(into)]
    pub phone: Option<String>,

    #[builder(into)]
    pub meter_number: Option<String>,
}

impl Consumer {
    pub fn apply(&mut self, update: ConsumerUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.meter_number.is_some() {
            self.meter_number = update.meter_number;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut consumer = Consumer::builder()
            .id(ConsumerId(1))
            .name("Meera Iyer")
            .address("Mumbai")
            .phone("9876500001")
            .joined_on(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
            .build();
        consumer.apply(ConsumerUpdate::builder().phone("9876500009").meter_number("MTR-7").build());
        assert_eq!(consumer.name, "Meera Iyer");
        assert_eq!(consumer.address.as_deref(), Some("Mumbai"));
        assert_eq!(consumer.phone.as_deref(), Some("9876500009"));
        assert_eq!(consumer.meter_number.as_deref(), Some("MTR-7"));
    }
}
