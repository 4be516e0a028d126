use rand::seq::IndexedRandom;
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

/// How a table is chosen among the free tables of a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TablePolicy {
    /// Always the lowest-numbered free table
    #[default]
    Lowest,
    /// Any free table, chosen uniformly at random
    Random,
}

impl TablePolicy {
    /// Picks a table from `free`, or `None` when nothing is free
    pub fn pick(self, free: &[i32]) -> Option<i32> {
        match self {
            Self::Lowest => free.iter().min().copied(),
            Self::Random => free.choose(&mut rand::rng()).copied(),
        }
    }
}

/// Table numbers in `1..=pool_size` not present in `occupied`, ascending
pub fn free_tables(occupied: &[i32], pool_size: i32) -> Vec<i32> {
    let occupied: BTreeSet<i32> = occupied.iter().copied().collect();

    (1..=pool_size)
        .filter(|table| !occupied.contains(table))
        .collect()
}
