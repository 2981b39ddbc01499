use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    core::{
        id::{BillId, ConsumerId},
        period::Period,
    },
    fmt::TIMESTAMP_FORMAT,
};

/// Malformed user input. The operation that hit it is aborted without any state change.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("malformed period `{0}`, expected `YYYY-MM`")]
    Period(String),

    #[error("malformed timestamp `{0}`, expected `YYYY-MM-DD HH:MM`")]
    Timestamp(String),

    #[error("bad slab part `{0}`, expected `units:rate` or `inf:rate`")]
    SlabSegment(String),

    #[error("tax rate must be within [0, 1), got {0}")]
    TaxRate(f64),

    #[error("amount must be a finite non-negative number, got {0}")]
    Amount(f64),

    #[error(transparent)]
    Tariff(#[from] TariffError),
}

/// Structurally invalid slab list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TariffError {
    #[error("a tariff needs at least one slab")]
    NoSlabs,

    #[error("only the last slab may be unbounded, but slab #{position} is")]
    UnboundedNotLast { position: usize },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("bill {0} not found")]
    NotFound(BillId),

    #[error("bill {id} is already paid on {}", .paid_at.format(TIMESTAMP_FORMAT))]
    AlreadyPaid { id: BillId, paid_at: NaiveDateTime },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConsumerError {
    #[error("consumer {0} not found")]
    NotFound(ConsumerId),

    #[error("consumer {0} has bills, remove them first")]
    HasBills(ConsumerId),
}

/// Second bill for the same consumer and period.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("consumer {consumer_id} already has bill {existing} for {period}")]
pub struct DuplicateBill {
    pub existing: BillId,
    pub consumer_id: ConsumerId,
    pub period: Period,
}
