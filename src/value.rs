//! Filepath: src/value.rs
//!
//! Synthetic benchmark payloads.
//!
//! Every container is measured with the same four value shapes so that
//! results can be compared across element sizes:
//!
//! | Shape | `size_of` | Name in reports |
//! |-------|-----------|-----------------|
//! | [`i32`] | 4 | `i32` |
//! | [`i64`] | 8 | `i64` |
//! | [`Size16`] | 16 | `size_16` |
//! | [`Size64`] | 64 | `size_64` |
//!
//! Values are produced by [`Synthetic::synthesize`], a pure function of the
//! sequence index. Distinct indices always give distinct values.
//!
//! # Ordering of the composite shapes
//!
//! [`Size16`] and [`Size64`] order by "every field strictly less", not
//! lexicographically. Two composites where neither is less than the other
//! compare [`Ordering::Equal`] even when they are not `==`. Ordered
//! containers therefore treat them as the same key. Synthesized values are
//! always mutually comparable, so the matrix never hits this, but hand-built
//! values can.
//!
//! The fields are public, so a hand-built value can also hold NaN. `Eq` is
//! implemented on the assumption that it never does: a NaN field makes the
//! value unequal to itself, and hashed sets can then store copies of it that
//! never match on lookup.

use std::cmp::Ordering;
use std::fmt as StdFmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};

// ============================================================================
//  ValueKind
// ============================================================================

/// Runtime tag for a value shape, used by the case table and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    /// 4-byte signed integer.
    I32,
    /// 8-byte signed integer.
    I64,
    /// Two `f64` fields.
    Size16,
    /// Four [`Size16`] fields.
    Size64,
}

impl ValueKind {
    /// Every shape, smallest first.
    pub const ALL: [Self; 4] = [Self::I32, Self::I64, Self::Size16, Self::Size64];

    /// Name used in benchmark ids and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Size16 => "size_16",
            Self::Size64 => "size_64",
        }
    }

    /// In-memory size of one value in bytes.
    #[must_use]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::I32 => size_of::<i32>(),
            Self::I64 => size_of::<i64>(),
            Self::Size16 => size_of::<Size16>(),
            Self::Size64 => size_of::<Size64>(),
        }
    }

    /// Inverse of [`ValueKind::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl StdFmt::Display for ValueKind {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
//  Synthetic
// ============================================================================

/// A value shape that can be generated from a sequence index.
///
/// The bounds are what the container families need: ordered and hashed
/// sets, maps, and interval maps (which compare values with `==`).
pub trait Synthetic:
    Copy + PartialEq + Eq + Ord + Hash + StdFmt::Debug + Add<Output = Self> + 'static
{
    /// Runtime tag of this shape.
    const KIND: ValueKind;

    /// Deterministic value for `index`. Pure and total.
    fn synthesize(index: u32) -> Self;
}

impl Synthetic for i32 {
    const KIND: ValueKind = ValueKind::I32;

    /// The index itself, reinterpreted as signed.
    #[inline(always)]
    #[expect(clippy::cast_possible_wrap)]
    fn synthesize(index: u32) -> Self {
        index as Self
    }
}

impl Synthetic for i64 {
    const KIND: ValueKind = ValueKind::I64;

    /// Index in the low 32 bits and again in the high 32 bits, so a
    /// truncation to either half is visible.
    #[inline(always)]
    fn synthesize(index: u32) -> Self {
        let index = Self::from(index);
        index | (index << 32)
    }
}

impl Synthetic for Size16 {
    const KIND: ValueKind = ValueKind::Size16;

    #[inline(always)]
    fn synthesize(index: u32) -> Self {
        Self::new(f64::from(index), f64::from(index) + 1.0)
    }
}

impl Synthetic for Size64 {
    const KIND: ValueKind = ValueKind::Size64;

    /// Four chained pairs seeded at `index`, `index + 2`, `index + 4`,
    /// `index + 6`: all eight fields differ.
    #[inline(always)]
    fn synthesize(index: u32) -> Self {
        let base = f64::from(index);
        Self::new(
            Size16::new(base, base + 1.0),
            Size16::new(base + 2.0, base + 3.0),
            Size16::new(base + 4.0, base + 5.0),
            Size16::new(base + 6.0, base + 7.0),
        )
    }
}

/// Generate the first `n` values of shape `T`.
#[must_use]
pub fn synthesize_n<T: Synthetic>(n: usize) -> Vec<T> {
    (0..n).map(|i| T::synthesize(index_of(i))).collect()
}

/// Convert a loop counter to a generator index.
///
/// # Panics
///
/// Panics if `i` does not fit in `u32`. Benchmark sizes are far below that.
#[inline(always)]
#[must_use]
pub fn index_of(i: usize) -> u32 {
    u32::try_from(i).unwrap_or_else(|_| panic!("sequence index {i} exceeds u32"))
}

// ============================================================================
//  Size16
// ============================================================================

/// A 16-byte composite: two `f64` fields.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size16 {
    /// First field.
    pub a: f64,
    /// Second field.
    pub b: f64,
}

impl Size16 {
    /// Build from both fields.
    #[must_use]
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// `true` when every field of `self` is strictly less than `other`'s.
    #[inline(always)]
    #[must_use]
    pub fn all_less(&self, other: &Self) -> bool {
        self.a < other.a && self.b < other.b
    }
}

// Reflexive only for NaN-free fields, which synthesis guarantees.
impl Eq for Size16 {}

impl Ord for Size16 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.all_less(other) {
            Ordering::Less
        } else if other.all_less(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl PartialOrd for Size16 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Size16 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.to_bits().hash(state);
        self.b.to_bits().hash(state);
    }
}

impl AddAssign for Size16 {
    fn add_assign(&mut self, rhs: Self) {
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

impl Add for Size16 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

// ============================================================================
//  Size64
// ============================================================================

/// A 64-byte composite: four [`Size16`] fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size64 {
    /// First pair.
    pub a: Size16,
    /// Second pair.
    pub b: Size16,
    /// Third pair.
    pub c: Size16,
    /// Fourth pair.
    pub d: Size16,
}

impl Size64 {
    /// Build from four pairs.
    #[must_use]
    pub const fn new(a: Size16, b: Size16, c: Size16, d: Size16) -> Self {
        Self { a, b, c, d }
    }

    /// `true` when every pair of `self` is [`Size16::all_less`] than `other`'s.
    #[inline(always)]
    #[must_use]
    pub fn all_less(&self, other: &Self) -> bool {
        self.a.all_less(&other.a)
            && self.b.all_less(&other.b)
            && self.c.all_less(&other.c)
            && self.d.all_less(&other.d)
    }
}

impl Ord for Size64 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.all_less(other) {
            Ordering::Less
        } else if other.all_less(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl PartialOrd for Size64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AddAssign for Size64 {
    fn add_assign(&mut self, rhs: Self) {
        self.a += rhs.a;
        self.b += rhs.b;
        self.c += rhs.c;
        self.d += rhs.d;
    }
}

impl Add for Size64 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_names() {
        assert_eq!(size_of::<Size16>(), 16);
        assert_eq!(size_of::<Size64>(), 64);
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ValueKind::from_name("size_32"), None);
    }

    #[test]
    fn i32_is_identity() {
        assert_eq!(i32::synthesize(0), 0);
        assert_eq!(i32::synthesize(16_383), 16_383);
    }

    #[test]
    fn i64_encodes_both_halves() {
        let v = i64::synthesize(3);
        assert_eq!(v & 0xFFFF_FFFF, 3);
        assert_eq!(v >> 32, 3);
        assert_eq!(v, 3 + (3 << 32));
    }

    #[test]
    fn size16_is_index_and_successor() {
        assert_eq!(Size16::synthesize(5), Size16::new(5.0, 6.0));
    }

    #[test]
    fn size64_fields_all_distinct() {
        let v = Size64::synthesize(10);
        let fields = [v.a.a, v.a.b, v.b.a, v.b.b, v.c.a, v.c.b, v.d.a, v.d.b];
        assert_eq!(fields, [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
    }

    #[test]
    fn synthesized_composites_are_totally_ordered() {
        for i in 0..64 {
            assert!(Size16::synthesize(i) < Size16::synthesize(i + 1));
            assert!(Size64::synthesize(i) < Size64::synthesize(i + 1));
        }
    }

    #[test]
    fn mutually_not_less_composites_compare_equal() {
        let x = Size16::new(1.0, 5.0);
        let y = Size16::new(2.0, 3.0);

        assert!(!(x < y));
        assert!(!(y < x));
        assert_eq!(x.cmp(&y), Ordering::Equal);
        assert_ne!(x, y);
    }

    #[test]
    fn nan_field_breaks_reflexivity() {
        let nan = Size16::new(f64::NAN, 1.0);
        let copy = nan;
        assert_ne!(nan, copy);
        assert_eq!(synthesize_n::<Size64>(64), synthesize_n::<Size64>(64));
    }

    #[test]
    fn addition_is_fieldwise() {
        let sum = Size16::synthesize(1) + Size16::synthesize(2);
        assert_eq!(sum, Size16::new(3.0, 5.0));

        let mut acc = Size64::default();
        acc += Size64::synthesize(0);
        acc += Size64::synthesize(0);
        assert_eq!(acc.d, Size16::new(12.0, 14.0));
    }

    #[test]
    fn synthesize_n_counts_from_zero() {
        assert_eq!(synthesize_n::<i32>(4), vec![0, 1, 2, 3]);
        assert!(synthesize_n::<Size64>(0).is_empty());
    }
}
