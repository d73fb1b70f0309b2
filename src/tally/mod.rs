// src/tally/mod.rs

use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

pub mod field;

pub use field::{accessor, Accessor, Field, Named, Record};

/// Distinct value → number of records carrying it.
pub type Tally = IndexMap<String, usize>;

/// Primary value → (secondary value → co-occurrence count).
pub type CrossTally = IndexMap<String, Tally>;

/// Primary value → sorted, de-duplicated secondary values.
pub type Listing = IndexMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TallyError {
    #[error("field `{field}` is missing from record #{index}")]
    MissingField { field: String, index: usize },
}

/// How the entries of a [`Tally`] are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Ascending by value.
    #[default]
    ByValue,
    /// Descending by count, equal counts ascending by value.
    ByCountDesc,
}

/// Resolve `key` on every record up front so a missing field fails before any counting.
fn resolve<'r, R, K>(records: &'r [R], key: &K) -> Result<Vec<&'r str>, TallyError>
where
    K: Field<R> + ?Sized,
{
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            key.get(record).ok_or_else(|| TallyError::MissingField {
                field: key.name().to_string(),
                index,
            })
        })
        .collect()
}

fn into_tally(counts: BTreeMap<&str, usize>, order: Order) -> Tally {
    let mut tally: Tally = counts
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect();
    if order == Order::ByCountDesc {
        // stable: equal counts keep the ascending value order
        tally.sort_by(|_, a, _, b| b.cmp(a));
    }
    tally
}

/// Count records per distinct value of `key`.
pub fn count_by<R, K>(records: &[R], key: &K, order: Order) -> Result<Tally, TallyError>
where
    K: Field<R> + ?Sized,
{
    let mut counts = BTreeMap::new();
    for value in resolve(records, key)? {
        *counts.entry(value).or_insert(0usize) += 1;
    }
    Ok(into_tally(counts, order))
}

/// Count co-occurrences of `secondary` values within each `primary` value.
///
/// Outer keys are always ascending; `order` applies to each nested tally.
/// Secondary values that never co-occur with a primary value are absent
/// from its nested tally.
pub fn cross_count_by<R, P, S>(
    records: &[R],
    primary: &P,
    secondary: &S,
    order: Order,
) -> Result<CrossTally, TallyError>
where
    P: Field<R> + ?Sized,
    S: Field<R> + ?Sized,
{
    let firsts = resolve(records, primary)?;
    let seconds = resolve(records, secondary)?;

    let mut grid: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for (p, s) in firsts.into_iter().zip(seconds) {
        *grid.entry(p).or_default().entry(s).or_insert(0) += 1;
    }

    Ok(grid
        .into_iter()
        .map(|(p, counts)| (p.to_string(), into_tally(counts, order)))
        .collect())
}

/// List the distinct `secondary` values seen with each `primary` value.
pub fn distinct_by<R, P, S>(records: &[R], primary: &P, secondary: &S) -> Result<Listing, TallyError>
where
    P: Field<R> + ?Sized,
    S: Field<R> + ?Sized,
{
    let firsts = resolve(records, primary)?;
    let seconds = resolve(records, secondary)?;

    let mut seen: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (p, s) in firsts.into_iter().zip(seconds) {
        seen.entry(p).or_default().insert(s);
    }

    Ok(seen
        .into_iter()
        .map(|(p, values)| {
            (
                p.to_string(),
                values.into_iter().map(str::to_string).collect(),
            )
        })
        .collect())
}
