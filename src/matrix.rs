//! Filepath: src/matrix.rs
//!
//! The benchmark case matrix.
//!
//! A case is one (operation, container, value shape) triple, run at every
//! size of [`SIZE_LADDER`]. The set of cases is data: [`REGISTRATIONS`]
//! lists which containers each operation is measured on, and [`cases`]
//! crosses that with every [`ValueKind`]. [`Case::run`] resolves a case to
//! its monomorphized body.
//!
//! # Fixture / timed-region split
//!
//! Every body builds its whole fixture first (values, access order,
//! populated container) and only then calls [`Measure::measure`] with the
//! operation under test. Setup cost never reaches the timed routine.
//!
//! | Operation | Fixture | Timed |
//! |-----------|---------|-------|
//! | `vector_push` | values | build sequence by push |
//! | `vector_sequential_read` | values, sequence | read every element in order |
//! | `vector_random_read` | values, sequence, permutation | read every element in permutation order |
//! | `map_insert` | values | build map by insert |
//! | `map_lookup` | map, permutation keys | fetch every key |
//! | `set_insert` | values | build set by insert |
//! | `set_lookup` | set, permutation values | count every value |
//! | `interval_map_insert` | intervals | build adapter by insert |
//! | `interval_map_lookup` | adapter transplanted from an interval tree, covered keys | look up every key |

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt as StdFmt;
use std::hint::black_box;

use indexmap::IndexMap;

use crate::containers::{
    GrowableSequence, KeyedMap, MapKey, Sequence, SmallVec8, SmallVec16, SmallVec1024, ValueSet,
};
use crate::interval::{
    CoalescingIntervalMap, INTERVAL_WIDTH, IntervalMap, TreeIntervalMap, covered_key,
    interval_start, transplant,
};
use crate::measure::{Measure, clobber_memory};
use crate::permutation::PermutationSource;
use crate::tracing_helpers::trace_log;
use crate::value::{Size16, Size64, Synthetic, ValueKind, index_of, synthesize_n};

/// Element counts every case is measured at.
pub const SIZE_LADDER: [usize; 13] = [
    4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384,
];

// ============================================================================
//  Operation / Container
// ============================================================================

/// How an operation touches its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Building the container.
    Insert,
    /// Reading every element in storage order.
    SequentialRead,
    /// Reading every element in permutation order.
    RandomRead,
    /// Keyed lookup of every element in permutation order.
    Lookup,
}

impl Access {
    /// Human-readable label used in report titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Insert => "Insertion",
            Self::SequentialRead => "Sequential reads",
            Self::RandomRead => "Random reads",
            Self::Lookup => "Random lookup",
        }
    }
}

/// A container family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    /// Contiguous sequences.
    Vector,
    /// Integer-keyed maps.
    Map,
    /// Value sets.
    Set,
    /// Interval maps, reached through [`IntervalMap`].
    IntervalMap,
}

impl Family {
    /// Plural noun used in report titles.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Vector => "vectors",
            Self::Map => "maps",
            Self::Set => "sets",
            Self::IntervalMap => "interval maps",
        }
    }
}

/// A measured operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Push `n` values into an empty sequence.
    VectorPush,
    /// Read every element of a sequence front to back.
    VectorSequentialRead,
    /// Read every element of a sequence in permutation order.
    VectorRandomRead,
    /// Insert `n` keys into an empty map.
    MapInsert,
    /// Fetch every key of a map in permutation order.
    MapLookup,
    /// Insert `n` values into an empty set.
    SetInsert,
    /// Count every value of a set in permutation order.
    SetLookup,
    /// Insert `n` disjoint intervals into an empty interval map.
    IntervalMapInsert,
    /// Look up one covered key per interval in permutation order.
    IntervalMapLookup,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 9] = [
        Self::VectorPush,
        Self::VectorSequentialRead,
        Self::VectorRandomRead,
        Self::MapInsert,
        Self::MapLookup,
        Self::SetInsert,
        Self::SetLookup,
        Self::IntervalMapInsert,
        Self::IntervalMapLookup,
    ];

    /// Name used in benchmark ids and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VectorPush => "vector_push",
            Self::VectorSequentialRead => "vector_sequential_read",
            Self::VectorRandomRead => "vector_random_read",
            Self::MapInsert => "map_insert",
            Self::MapLookup => "map_lookup",
            Self::SetInsert => "set_insert",
            Self::SetLookup => "set_lookup",
            Self::IntervalMapInsert => "interval_map_insert",
            Self::IntervalMapLookup => "interval_map_lookup",
        }
    }

    /// Inverse of [`Operation::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Family of containers this operation runs on.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::VectorPush | Self::VectorSequentialRead | Self::VectorRandomRead => {
                Family::Vector
            }
            Self::MapInsert | Self::MapLookup => Family::Map,
            Self::SetInsert | Self::SetLookup => Family::Set,
            Self::IntervalMapInsert | Self::IntervalMapLookup => Family::IntervalMap,
        }
    }

    /// Access pattern of this operation.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::VectorPush | Self::MapInsert | Self::SetInsert | Self::IntervalMapInsert => {
                Access::Insert
            }
            Self::VectorSequentialRead => Access::SequentialRead,
            Self::VectorRandomRead => Access::RandomRead,
            Self::MapLookup | Self::SetLookup | Self::IntervalMapLookup => Access::Lookup,
        }
    }

    /// Whether the fixture draws an access order from the permutation cache.
    #[must_use]
    pub const fn uses_permutation(self) -> bool {
        matches!(self.access(), Access::RandomRead | Access::Lookup)
    }
}

impl StdFmt::Display for Operation {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete container implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Container {
    /// `Vec<T>`.
    Vec,
    /// `SmallVec<[T; 8]>`.
    SmallVec8,
    /// `SmallVec<[T; 16]>`.
    SmallVec16,
    /// `SmallVec<[T; 1024]>`.
    SmallVec1024,
    /// `Box<[T]>`, fixed length.
    BoxedSlice,
    /// `BTreeMap<i64, T>`.
    BTreeMap,
    /// `std::collections::HashMap<i64, T>`.
    StdHashMap,
    /// `hashbrown::HashMap<i64, T>`.
    HashbrownMap,
    /// `indexmap::IndexMap<i64, T>`.
    IndexMap,
    /// `BTreeSet<T>`.
    BTreeSet,
    /// `std::collections::HashSet<T>`.
    StdHashSet,
    /// `hashbrown::HashSet<T>`.
    HashbrownSet,
    /// [`CoalescingIntervalMap`] (`rangemap`).
    RangeMap,
    /// [`TreeIntervalMap`] (`bio` interval tree).
    IntervalTree,
}

impl Container {
    /// Name used in benchmark ids and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vec => "vec",
            Self::SmallVec8 => "small_vec_8",
            Self::SmallVec16 => "small_vec_16",
            Self::SmallVec1024 => "small_vec_1024",
            Self::BoxedSlice => "boxed_slice",
            Self::BTreeMap => "btree_map",
            Self::StdHashMap => "std_hash_map",
            Self::HashbrownMap => "hashbrown_map",
            Self::IndexMap => "index_map",
            Self::BTreeSet => "btree_set",
            Self::StdHashSet => "std_hash_set",
            Self::HashbrownSet => "hashbrown_set",
            Self::RangeMap => "range_map",
            Self::IntervalTree => "interval_tree",
        }
    }

    /// Family this container belongs to.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Vec | Self::SmallVec8 | Self::SmallVec16 | Self::SmallVec1024 | Self::BoxedSlice => {
                Family::Vector
            }
            Self::BTreeMap | Self::StdHashMap | Self::HashbrownMap | Self::IndexMap => Family::Map,
            Self::BTreeSet | Self::StdHashSet | Self::HashbrownSet => Family::Set,
            Self::RangeMap | Self::IntervalTree => Family::IntervalMap,
        }
    }
}

impl StdFmt::Display for Container {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
//  Registration table
// ============================================================================

const VECTORS: &[Container] = &[
    Container::Vec,
    Container::SmallVec8,
    Container::SmallVec16,
    Container::SmallVec1024,
];

const FIXED_AND_VECTORS: &[Container] = &[
    Container::Vec,
    Container::SmallVec8,
    Container::SmallVec16,
    Container::SmallVec1024,
    Container::BoxedSlice,
];

const INSERT_MAPS: &[Container] = &[
    Container::BTreeMap,
    Container::StdHashMap,
    Container::HashbrownMap,
];

const LOOKUP_MAPS: &[Container] = &[
    Container::BTreeMap,
    Container::StdHashMap,
    Container::HashbrownMap,
    Container::IndexMap,
];

const SETS: &[Container] = &[
    Container::BTreeSet,
    Container::StdHashSet,
    Container::HashbrownSet,
];

const INTERVAL_MAPS: &[Container] = &[Container::IntervalTree, Container::RangeMap];

/// Which containers each operation is measured on.
pub const REGISTRATIONS: &[(Operation, &[Container])] = &[
    (Operation::VectorPush, VECTORS),
    (Operation::VectorSequentialRead, FIXED_AND_VECTORS),
    (Operation::VectorRandomRead, FIXED_AND_VECTORS),
    (Operation::MapInsert, INSERT_MAPS),
    (Operation::MapLookup, LOOKUP_MAPS),
    (Operation::SetInsert, SETS),
    (Operation::SetLookup, SETS),
    (Operation::IntervalMapInsert, INTERVAL_MAPS),
    (Operation::IntervalMapLookup, INTERVAL_MAPS),
];

/// Whether `container` is registered for `operation`.
#[must_use]
pub fn is_registered(operation: Operation, container: Container) -> bool {
    REGISTRATIONS
        .iter()
        .any(|(op, containers)| *op == operation && containers.contains(&container))
}

// ============================================================================
//  Case
// ============================================================================

/// One measurable unit, run at each size of the ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Case {
    /// What is timed.
    pub operation: Operation,
    /// Value shape stored.
    pub value: ValueKind,
    /// Implementation measured.
    pub container: Container,
}

impl StdFmt::Display for Case {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        write!(f, "{}/{}/{}", self.operation, self.value, self.container)
    }
}

/// Every registered case: operations in table order, then value shapes,
/// then containers.
pub fn cases() -> impl Iterator<Item = Case> {
    REGISTRATIONS.iter().flat_map(|&(operation, containers)| {
        ValueKind::ALL.into_iter().flat_map(move |value| {
            containers.iter().map(move |&container| Case {
                operation,
                value,
                container,
            })
        })
    })
}

/// Cases sharing an operation and value shape; one benchmark group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseGroup {
    /// Shared operation.
    pub operation: Operation,
    /// Shared value shape.
    pub value: ValueKind,
    /// One case per registered container.
    pub cases: Vec<Case>,
}

impl CaseGroup {
    /// Group id, `<operation>/<value shape>`.
    #[must_use]
    pub fn name(&self) -> String {
        group_name(self.operation, self.value)
    }
}

/// Group id for an operation and value shape.
#[must_use]
pub fn group_name(operation: Operation, value: ValueKind) -> String {
    format!("{operation}/{value}")
}

/// [`cases`] partitioned into groups.
#[must_use]
pub fn case_groups() -> Vec<CaseGroup> {
    let mut groups: Vec<CaseGroup> = Vec::new();
    for case in cases() {
        match groups.last_mut() {
            Some(group) if group.operation == case.operation && group.value == case.value => {
                group.cases.push(case);
            }
            _ => groups.push(CaseGroup {
                operation: case.operation,
                value: case.value,
                cases: vec![case],
            }),
        }
    }
    groups
}

impl Case {
    /// Build the fixture for `size` elements and hand the timed operation to `runner`.
    ///
    /// # Panics
    ///
    /// Panics if the (operation, container) pair is not registered.
    pub fn run<M, P>(&self, size: usize, source: &P, runner: &mut M)
    where
        M: Measure,
        P: PermutationSource + ?Sized,
    {
        trace_log!(case = %self, size, "building fixture");
        match self.value {
            ValueKind::I32 => self.run_typed::<i32, M, P>(size, source, runner),
            ValueKind::I64 => self.run_typed::<i64, M, P>(size, source, runner),
            ValueKind::Size16 => self.run_typed::<Size16, M, P>(size, source, runner),
            ValueKind::Size64 => self.run_typed::<Size64, M, P>(size, source, runner),
        }
    }

    fn run_typed<T, M, P>(&self, n: usize, source: &P, runner: &mut M)
    where
        T: Synthetic,
        M: Measure,
        P: PermutationSource + ?Sized,
    {
        use Container as C;
        use Operation as Op;

        match (self.operation, self.container) {
            (Op::VectorPush, C::Vec) => vector_push::<Vec<T>, T, M>(n, runner),
            (Op::VectorPush, C::SmallVec8) => vector_push::<SmallVec8<T>, T, M>(n, runner),
            (Op::VectorPush, C::SmallVec16) => vector_push::<SmallVec16<T>, T, M>(n, runner),
            (Op::VectorPush, C::SmallVec1024) => vector_push::<SmallVec1024<T>, T, M>(n, runner),

            (Op::VectorSequentialRead, C::Vec) => vector_sequential_read::<Vec<T>, T, M>(n, runner),
            (Op::VectorSequentialRead, C::SmallVec8) => {
                vector_sequential_read::<SmallVec8<T>, T, M>(n, runner);
            }
            (Op::VectorSequentialRead, C::SmallVec16) => {
                vector_sequential_read::<SmallVec16<T>, T, M>(n, runner);
            }
            (Op::VectorSequentialRead, C::SmallVec1024) => {
                vector_sequential_read::<SmallVec1024<T>, T, M>(n, runner);
            }
            (Op::VectorSequentialRead, C::BoxedSlice) => {
                vector_sequential_read::<Box<[T]>, T, M>(n, runner);
            }

            (Op::VectorRandomRead, C::Vec) => vector_random_read::<Vec<T>, T, M, P>(n, source, runner),
            (Op::VectorRandomRead, C::SmallVec8) => {
                vector_random_read::<SmallVec8<T>, T, M, P>(n, source, runner);
            }
            (Op::VectorRandomRead, C::SmallVec16) => {
                vector_random_read::<SmallVec16<T>, T, M, P>(n, source, runner);
            }
            (Op::VectorRandomRead, C::SmallVec1024) => {
                vector_random_read::<SmallVec1024<T>, T, M, P>(n, source, runner);
            }
            (Op::VectorRandomRead, C::BoxedSlice) => {
                vector_random_read::<Box<[T]>, T, M, P>(n, source, runner);
            }

            (Op::MapInsert, C::BTreeMap) => map_insert::<BTreeMap<MapKey, T>, T, M>(n, runner),
            (Op::MapInsert, C::StdHashMap) => map_insert::<HashMap<MapKey, T>, T, M>(n, runner),
            (Op::MapInsert, C::HashbrownMap) => {
                map_insert::<hashbrown::HashMap<MapKey, T>, T, M>(n, runner);
            }

            (Op::MapLookup, C::BTreeMap) => {
                map_lookup::<BTreeMap<MapKey, T>, T, M, P>(n, source, runner);
            }
            (Op::MapLookup, C::StdHashMap) => {
                map_lookup::<HashMap<MapKey, T>, T, M, P>(n, source, runner);
            }
            (Op::MapLookup, C::HashbrownMap) => {
                map_lookup::<hashbrown::HashMap<MapKey, T>, T, M, P>(n, source, runner);
            }
            (Op::MapLookup, C::IndexMap) => {
                map_lookup::<IndexMap<MapKey, T>, T, M, P>(n, source, runner);
            }

            (Op::SetInsert, C::BTreeSet) => set_insert::<BTreeSet<T>, T, M>(n, runner),
            (Op::SetInsert, C::StdHashSet) => set_insert::<HashSet<T>, T, M>(n, runner),
            (Op::SetInsert, C::HashbrownSet) => set_insert::<hashbrown::HashSet<T>, T, M>(n, runner),

            (Op::SetLookup, C::BTreeSet) => set_lookup::<BTreeSet<T>, T, M, P>(n, source, runner),
            (Op::SetLookup, C::StdHashSet) => set_lookup::<HashSet<T>, T, M, P>(n, source, runner),
            (Op::SetLookup, C::HashbrownSet) => {
                set_lookup::<hashbrown::HashSet<T>, T, M, P>(n, source, runner);
            }

            (Op::IntervalMapInsert, C::IntervalTree) => {
                interval_map_insert::<TreeIntervalMap<T>, T, M>(n, runner);
            }
            (Op::IntervalMapInsert, C::RangeMap) => {
                interval_map_insert::<CoalescingIntervalMap<T>, T, M>(n, runner);
            }

            (Op::IntervalMapLookup, C::IntervalTree) => {
                interval_map_lookup::<TreeIntervalMap<T>, T, M, P>(n, source, runner);
            }
            (Op::IntervalMapLookup, C::RangeMap) => {
                interval_map_lookup::<CoalescingIntervalMap<T>, T, M, P>(n, source, runner);
            }

            (operation, container) => {
                panic!("{container} is not registered for {operation}")
            }
        }
    }
}

// ============================================================================
//  Case bodies
// ============================================================================

/// Map key for element `i`.
#[inline(always)]
fn key_of(i: usize) -> MapKey {
    MapKey::try_from(i).unwrap_or_else(|_| panic!("element index {i} exceeds the key range"))
}

fn vector_push<S, T, M>(n: usize, runner: &mut M)
where
    S: GrowableSequence<T>,
    T: Synthetic,
    M: Measure,
{
    let values = synthesize_n::<T>(n);

    runner.measure(|| {
        let mut seq = S::with_capacity(n);
        for &value in &values {
            seq.push(value);
            black_box(seq.as_ptr());
        }
        clobber_memory();
        seq
    });
}

fn vector_sequential_read<S, T, M>(n: usize, runner: &mut M)
where
    S: Sequence<T>,
    T: Synthetic,
    M: Measure,
{
    let seq: S = synthesize_n::<T>(n).into_iter().collect();

    runner.measure(|| {
        for item in seq.as_slice() {
            black_box(*item);
        }
        clobber_memory();
    });
}

fn vector_random_read<S, T, M, P>(n: usize, source: &P, runner: &mut M)
where
    S: Sequence<T>,
    T: Synthetic,
    M: Measure,
    P: PermutationSource + ?Sized,
{
    let seq: S = synthesize_n::<T>(n).into_iter().collect();
    let order = source.permutation_for(n);

    runner.measure(|| {
        let slice = seq.as_slice();
        for &idx in order.iter() {
            black_box(slice[idx]);
        }
        clobber_memory();
    });
}

fn map_insert<C, T, M>(n: usize, runner: &mut M)
where
    C: KeyedMap<T>,
    T: Synthetic,
    M: Measure,
{
    let values = synthesize_n::<T>(n);

    runner.measure(|| {
        let mut map = C::default();
        for (i, &value) in values.iter().enumerate() {
            map.put(key_of(i), value);
        }
        clobber_memory();
        map
    });
}

fn map_lookup<C, T, M, P>(n: usize, source: &P, runner: &mut M)
where
    C: KeyedMap<T>,
    T: Synthetic,
    M: Measure,
    P: PermutationSource + ?Sized,
{
    let map: C = (0..n)
        .map(|i| (key_of(i), T::synthesize(index_of(i))))
        .collect();
    let keys: Vec<MapKey> = source
        .permutation_for(n)
        .iter()
        .map(|&i| key_of(i))
        .collect();
    clobber_memory();

    runner.measure(|| {
        for &key in &keys {
            black_box(*map.fetch(key));
        }
        clobber_memory();
    });
}

fn set_insert<C, T, M>(n: usize, runner: &mut M)
where
    C: ValueSet<T>,
    T: Synthetic,
    M: Measure,
{
    let values = synthesize_n::<T>(n);

    runner.measure(|| {
        let mut set = C::default();
        for &value in &values {
            set.put(value);
        }
        clobber_memory();
        set
    });
}

fn set_lookup<C, T, M, P>(n: usize, source: &P, runner: &mut M)
where
    C: ValueSet<T>,
    T: Synthetic,
    M: Measure,
    P: PermutationSource + ?Sized,
{
    let mut set = C::default();
    for value in synthesize_n::<T>(n) {
        set.put(value);
    }
    let probes: Vec<T> = source
        .permutation_for(n)
        .iter()
        .map(|&i| T::synthesize(index_of(i)))
        .collect();
    clobber_memory();

    runner.measure(|| {
        let mut found = 0usize;
        for probe in &probes {
            found += black_box(set.count(probe));
        }
        clobber_memory();
        found
    });
}

/// `(start, stop, value)` for the first `n` benchmark intervals.
fn disjoint_intervals<T: Synthetic>(n: usize) -> Vec<(i64, i64, T)> {
    (0..n)
        .map(|i| {
            let low = interval_start(i);
            (low, low + INTERVAL_WIDTH, T::synthesize(index_of(i)))
        })
        .collect()
}

fn interval_map_insert<A, T, M>(n: usize, runner: &mut M)
where
    A: IntervalMap<T>,
    T: Synthetic,
    M: Measure,
{
    let intervals = disjoint_intervals::<T>(n);

    runner.measure(|| {
        let mut map = A::default();
        for &(low, high, value) in &intervals {
            map.insert(low, high, value);
        }
        clobber_memory();
        map
    });
}

fn interval_map_lookup<A, T, M, P>(n: usize, source: &P, runner: &mut M)
where
    A: IntervalMap<T>,
    T: Synthetic,
    M: Measure,
    P: PermutationSource + ?Sized,
{
    let mut client = TreeIntervalMap::<T>::new();
    for (low, high, value) in disjoint_intervals::<T>(n) {
        client.insert(low, high, value);
    }
    let map: A = transplant(&client);
    drop(client);

    let keys: Vec<i64> = source
        .permutation_for(n)
        .iter()
        .map(|&i| covered_key(i))
        .collect();
    clobber_memory();

    runner.measure(|| {
        for &key in &keys {
            black_box(map.lookup(key));
        }
        clobber_memory();
    });
}
