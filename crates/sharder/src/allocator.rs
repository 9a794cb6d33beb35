use crate::index::{CuId, UnitIndex};
use std::mem;

/// One balanced output partition: an ordered set of compilation units plus
/// the accumulated weight that closed it.
#[derive(Debug, Default, Clone)]
pub struct Shard {
    cus: Vec<CuId>,
    weight: usize,
}

impl Shard {
    /// Unit handles in first-occurrence order.
    pub fn cus(&self) -> &[CuId] {
        &self.cus
    }

    /// Sum of the project counts of the contained units.
    pub fn weight(&self) -> usize {
        self.weight
    }
}

/// Greedily pack compilation units into `shards` partitions of roughly equal
/// weight.
///
/// A single linear pass over the occurrence list: a unit is placed into the
/// currently open shard the first time it is encountered (later occurrences
/// of the same unit are skipped), contributing its full weight: the number
/// of projects it belongs to. The shard closes once its weight reaches
/// `T / shards`, checked only after adding, so every shard except possibly
/// the last closes at or above the target, and a unit heavier than the
/// target still occupies exactly one shard. Units are never split.
///
/// `shards == 0` is clamped to 1; asking for more shards than there are
/// distinct units simply produces fewer shards than requested.
pub fn allocate(index: &UnitIndex, shards: usize) -> Vec<Shard> {
    let shards = shards.max(1);
    let target = index.occurrence_count() as f64 / shards as f64;
    log::info!("Allocating compilation units");

    let mut assigned = vec![false; index.distinct_count()];
    let mut closed = Vec::new();
    let mut current = Shard::default();

    for &id in index.occurrences() {
        if assigned[id.index()] {
            continue;
        }
        assigned[id.index()] = true;
        current.cus.push(id);
        current.weight += index.cu(id).weight();
        if current.weight as f64 >= target {
            closed.push(mem::take(&mut current));
        }
    }

    // The last shard is open-ended: it absorbs whatever remains, however
    // light. A trailing shard that received nothing is only kept when there
    // was no work at all, so unit-less input still yields one wrapper-only
    // output.
    if !current.cus.is_empty() || closed.is_empty() {
        closed.push(current);
    }
    closed
}
