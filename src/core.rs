pub mod bill;
pub mod consumer;
pub mod error;
pub mod generator;
pub mod id;
pub mod ledger;
pub mod period;
pub mod reading;
pub mod reconciler;
pub mod register;
pub mod tariff;
