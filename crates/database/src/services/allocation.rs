//! Table assignment for one-hour slots.
//!
//! Each slot has a fixed pool of tables. The capacity check, free-table
//! computation and insert run in one transaction while holding an in-process
//! lock for the slot. The unique index on `(time_slot, table_number)` backs
//! this up across processes: a losing insert is retried from a fresh read.

use crate::{
    entities::{customers, reservations, waitlist_entries},
    error::{BookingError, is_unique_violation},
    notify::{Email, Mailer},
};
use chrono::Utc;
use log::{info, warn};
use models::{
    party_size::PartySize,
    slot::{TABLES_PER_SLOT, TimeSlot},
    table_policy::{TablePolicy, free_tables},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
#[cfg(test)]
use std::collections::VecDeque;
use uuid::Uuid;

/// Reason given when a slot under capacity has no free table
pub const NO_TABLES_AVAILABLE: &str = "no tables available";

/// Result of an allocation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Allocation {
    /// A table was assigned and the reservation stored
    Confirmed(reservations::Model),
    /// The slot was full; the customer was put on its waitlist
    Waitlisted(waitlist_entries::Model),
    /// Nothing was stored
    Rejected(String),
}

pub struct SlotAllocator {
    db: DatabaseConnection,
    mailer: Mailer,
    policy: TablePolicy,
    pool_size: i32,
    locks: SlotLocks,
    /// Tables each upcoming read fails to see, as if booked by another process
    #[cfg(test)]
    missed_reads: Mutex<VecDeque<Vec<i32>>>,
}

impl SlotAllocator {
    /// Attempts made before a storage race is reported as a failure
    pub const MAX_ATTEMPTS: u32 = 3;

    pub fn new(db: DatabaseConnection, mailer: Mailer, policy: TablePolicy) -> Self {
        Self::with_pool_size(db, mailer, policy, TABLES_PER_SLOT)
    }

    pub fn with_pool_size(
        db: DatabaseConnection,
        mailer: Mailer,
        policy: TablePolicy,
        pool_size: i32,
    ) -> Self {
        Self {
            db,
            mailer,
            policy,
            pool_size,
            locks: SlotLocks::default(),
            #[cfg(test)]
            missed_reads: Mutex::default(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Validates the requested time and party size, then allocates
    ///
    /// # Arguments
    /// * `customer` - The customer the table is for
    /// * `raw_time_slot` - ISO-8601 date-time; must be in the future
    /// * `party_size` - Number of guests, between 1 and 12
    pub async fn allocate(
        &self,
        customer: &customers::Model,
        raw_time_slot: &str,
        party_size: i64,
    ) -> Result<Allocation, BookingError> {
        let party_size = PartySize::try_from(party_size)?;
        let slot = TimeSlot::parse_now(raw_time_slot)?;

        self.allocate_slot(customer, slot, party_size).await
    }

    /// Assigns a table in `slot`, or waitlists the customer when it is full
    pub async fn allocate_slot(
        &self,
        customer: &customers::Model,
        slot: TimeSlot,
        party_size: PartySize,
    ) -> Result<Allocation, BookingError> {
        let guard = self.locks.acquire(slot).await;

        let mut attempt = 1;
        let allocation = loop {
            match self.try_allocate(customer, slot, party_size).await {
                Ok(allocation) => break allocation,
                Err(err) if is_unique_violation(&err) && attempt < Self::MAX_ATTEMPTS => {
                    warn!("Table conflict booking {slot} (attempt {attempt}), retrying");
                    attempt += 1;
                }
                Err(err) if is_unique_violation(&err) => {
                    return Err(BookingError::RaceExhausted {
                        slot,
                        attempts: attempt,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        };

        drop(guard);

        match &allocation {
            Allocation::Confirmed(reservation) => {
                info!(
                    "Confirmed table {} at {slot} for customer {}",
                    reservation.table_number, customer.id
                );
                self.mailer.enqueue(confirmation_email(customer, slot, reservation));
            }
            Allocation::Waitlisted(entry) => {
                info!(
                    "Slot {slot} is full, waitlisted customer {} as {}",
                    customer.id, entry.id
                );
            }
            Allocation::Rejected(reason) => {
                warn!("Rejected booking at {slot} for customer {}: {reason}", customer.id);
            }
        }

        Ok(allocation)
    }

    /// One transactional pass over the slot
    async fn try_allocate(
        &self,
        customer: &customers::Model,
        slot: TimeSlot,
        party_size: PartySize,
    ) -> Result<Allocation, DbErr> {
        let txn = self.db.begin().await?;
        let occupied = Self::occupied_tables(&txn, slot).await?;
        #[cfg(test)]
        let occupied = self.apply_missed_read(occupied);

        if occupied.len() >= self.pool_size.max(0) as usize {
            let entry = waitlist_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer.id),
                time_slot: Set(slot.start()),
                created_at: Set(Utc::now().naive_utc()),
            }
            .insert(&txn)
            .await?;

            txn.commit().await?;
            return Ok(Allocation::Waitlisted(entry));
        }

        let free = free_tables(&occupied, self.pool_size);
        let Some(table_number) = self.policy.pick(&free) else {
            txn.rollback().await?;
            return Ok(Allocation::Rejected(NO_TABLES_AVAILABLE.to_string()));
        };

        let reservation = reservations::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer.id),
            time_slot: Set(slot.start()),
            table_number: Set(table_number),
            party_size: Set(party_size.get()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(Allocation::Confirmed(reservation))
    }

    /// Makes the next read of the slot miss `tables`
    #[cfg(test)]
    pub(crate) fn miss_on_next_read(&self, tables: Vec<i32>) {
        self.missed_reads.lock().unwrap().push_back(tables);
    }

    #[cfg(test)]
    fn apply_missed_read(&self, mut occupied: Vec<i32>) -> Vec<i32> {
        if let Some(missed) = self.missed_reads.lock().unwrap().pop_front() {
            occupied.retain(|table| !missed.contains(table));
        }
        occupied
    }

    /// Table numbers already booked in `slot`
    async fn occupied_tables(
        txn: &DatabaseTransaction,
        slot: TimeSlot,
    ) -> Result<Vec<i32>, DbErr> {
        reservations::Entity::find()
            .select_only()
            .column(reservations::Column::TableNumber)
            .filter(reservations::Column::TimeSlot.eq(slot.start()))
            .into_tuple::<i32>()
            .all(txn)
            .await
    }
}

/// Builds the confirmation message for a stored reservation
pub fn confirmation_email(
    customer: &customers::Model,
    slot: TimeSlot,
    reservation: &reservations::Model,
) -> Email {
    Email {
        to: customer.email.clone(),
        subject: "Your Reservation Confirmation".to_string(),
        body: format!(
            "Hello {}, your reservation at Cafe Fausse is confirmed for {} at table {}.",
            customer.name,
            slot.label(),
            reservation.table_number
        ),
    }
}

/// Per-slot async locks, created on demand and dropped once unused
#[derive(Default)]
struct SlotLocks {
    slots: Mutex<HashMap<TimeSlot, Arc<AsyncMutex<()>>>>,
}

impl SlotLocks {
    async fn acquire(&self, slot: TimeSlot) -> SlotGuard<'_> {
        let lock = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(slot).or_default())
        };

        SlotGuard {
            guard: Some(lock.lock_owned().await),
            locks: self,
            slot,
        }
    }

    /// Forgets the lock for `slot` if nobody holds or awaits it
    fn prune(&self, slot: TimeSlot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots
            .get(&slot)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            slots.remove(&slot);
        }
    }
}

struct SlotGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a SlotLocks,
    slot: TimeSlot,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        // Release the slot before checking whether its lock is still shared
        self.guard.take();
        self.locks.prune(self.slot);
    }
}
