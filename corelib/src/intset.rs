/*
 * Created on Thu Feb 15 2024
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2024, Sayan Nandan <nandansayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use {
    crate::error::{CoreError, CoreResult},
    core::fmt,
    log::trace,
    rand::Rng,
};

/// blob header: `u32le width | u32le count`
const HDR_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// Element storage width. Monotonic over a set's lifetime: it only ever grows
pub enum Width {
    W16 = 2,
    W32 = 4,
    W64 = 8,
}

impl Width {
    /// The smallest width that holds `v`
    const fn of(v: i64) -> Self {
        if v >= i16::MIN as i64 && v <= i16::MAX as i64 {
            Self::W16
        } else if v >= i32::MIN as i64 && v <= i32::MAX as i64 {
            Self::W32
        } else {
            Self::W64
        }
    }
    #[inline(always)]
    const fn bytes(self) -> usize {
        self as usize
    }
}

#[derive(Clone, PartialEq, Eq)]
/// A sorted, duplicate-free set of `i64`s packed into a single little-endian
/// blob with an adaptive element width. Lookups are `O(log n)`, mutation is
/// `O(n)` (tail memmove), width upgrades are `O(n)` and one-way
pub struct IntSet {
    d: Vec<u8>,
}

impl IntSet {
    pub fn new() -> Self {
        let mut s = Self {
            d: vec![0u8; HDR_SIZE],
        };
        s.set_width(Width::W16);
        s
    }
    /// Adopt a foreign blob, validating the header, the length and the strict
    /// ascending element order. Width minimality is *not* required: a set that
    /// upgraded and then shrank legitimately carries a wider encoding
    pub fn from_blob(d: Vec<u8>) -> CoreResult<Self> {
        if d.len() < HDR_SIZE {
            return Err(CoreError::IllegalArgument);
        }
        let w = match u32::from_le_bytes([d[0], d[1], d[2], d[3]]) {
            2 => Width::W16,
            4 => Width::W32,
            8 => Width::W64,
            _ => return Err(CoreError::IllegalArgument),
        };
        let n = u32::from_le_bytes([d[4], d[5], d[6], d[7]]) as usize;
        if d.len() != HDR_SIZE + n * w.bytes() {
            return Err(CoreError::IllegalArgument);
        }
        let s = Self { d };
        for i in 1..n {
            if s.elem(i - 1, w) >= s.elem(i, w) {
                return Err(CoreError::IllegalArgument);
            }
        }
        Ok(s)
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        u32::from_le_bytes([self.d[4], self.d[5], self.d[6], self.d[7]]) as usize
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[inline(always)]
    pub fn blob_len(&self) -> usize {
        self.d.len()
    }
    pub fn as_blob(&self) -> &[u8] {
        &self.d
    }
    pub fn into_blob(self) -> Vec<u8> {
        self.d
    }
    pub fn width(&self) -> Width {
        match u32::from_le_bytes([self.d[0], self.d[1], self.d[2], self.d[3]]) {
            2 => Width::W16,
            4 => Width::W32,
            8 => Width::W64,
            _ => panic!("intset: corrupt width header"),
        }
    }
}

impl IntSet {
    fn set_width(&mut self, w: Width) {
        self.d[0..4].copy_from_slice(&(w.bytes() as u32).to_le_bytes())
    }
    fn set_len(&mut self, n: usize) {
        self.d[4..8].copy_from_slice(&(n as u32).to_le_bytes())
    }
    /// Load element `i` under width `w`, sign-extending to `i64`
    fn elem(&self, i: usize, w: Width) -> i64 {
        let off = HDR_SIZE + i * w.bytes();
        let b = &self.d[off..off + w.bytes()];
        match w {
            Width::W16 => i16::from_le_bytes([b[0], b[1]]) as i64,
            Width::W32 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64,
            Width::W64 => {
                i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
            }
        }
    }
    /// Store `v` (which must fit `w`) at index `i` under width `w`
    fn put_elem(&mut self, i: usize, v: i64, w: Width) {
        let off = HDR_SIZE + i * w.bytes();
        match w {
            Width::W16 => self.d[off..off + 2].copy_from_slice(&(v as i16).to_le_bytes()),
            Width::W32 => self.d[off..off + 4].copy_from_slice(&(v as i32).to_le_bytes()),
            Width::W64 => self.d[off..off + 8].copy_from_slice(&v.to_le_bytes()),
        }
    }
    /// Binary search under the current width. Returns `(found, pos)` where
    /// `pos` is the match or the insertion point
    fn search(&self, v: i64) -> (bool, usize) {
        let n = self.len();
        let w = self.width();
        if n == 0 {
            return (false, 0);
        }
        if v > self.elem(n - 1, w) {
            return (false, n);
        }
        if v < self.elem(0, w) {
            return (false, 0);
        }
        let (mut min, mut max) = (0isize, n as isize - 1);
        while min <= max {
            let mid = (min + max) >> 1;
            let cur = self.elem(mid as usize, w);
            if v > cur {
                min = mid + 1;
            } else if v < cur {
                max = mid - 1;
            } else {
                return (true, mid as usize);
            }
        }
        (false, min as usize)
    }
}

impl IntSet {
    /// Insert `v`, keeping the ascending order. Returns false (and leaves the
    /// set untouched) if it was already present
    pub fn add(&mut self, v: i64) -> bool {
        let w = Width::of(v);
        if w > self.width() {
            // out of the current range, so certainly absent
            self.upgrade_add(v);
            return true;
        }
        let (found, pos) = self.search(v);
        if found {
            return false;
        }
        let n = self.len();
        let wb = self.width().bytes();
        self.d.resize(HDR_SIZE + (n + 1) * wb, 0);
        let start = HDR_SIZE + pos * wb;
        let end = HDR_SIZE + n * wb;
        self.d.copy_within(start..end, start + wb);
        self.put_elem(pos, v, self.width());
        self.set_len(n + 1);
        true
    }
    /// Remove `v`. Returns false if absent. The width never shrinks back
    pub fn remove(&mut self, v: i64) -> bool {
        if Width::of(v) > self.width() {
            return false;
        }
        let (found, pos) = self.search(v);
        if !found {
            return false;
        }
        let n = self.len();
        let wb = self.width().bytes();
        let start = HDR_SIZE + (pos + 1) * wb;
        let end = HDR_SIZE + n * wb;
        self.d.copy_within(start..end, start - wb);
        self.d.truncate(HDR_SIZE + (n - 1) * wb);
        self.set_len(n - 1);
        true
    }
    pub fn contains(&self, v: i64) -> bool {
        Width::of(v) <= self.width() && self.search(v).0
    }
    pub fn get(&self, i: usize) -> CoreResult<i64> {
        if i >= self.len() {
            return Err(CoreError::OutOfRange);
        }
        Ok(self.elem(i, self.width()))
    }
    /// Uniform random member
    pub fn random(&self, rng: &mut impl Rng) -> Option<i64> {
        if self.is_empty() {
            None
        } else {
            Some(self.elem(rng.gen_range(0..self.len()), self.width()))
        }
    }
    /// Widen the storage and insert `v`, which is out of the old width's range
    /// and hence the new minimum or maximum. Elements migrate from the highest
    /// index down so the widened writes never overwrite unread narrow slots
    fn upgrade_add(&mut self, v: i64) {
        let oldw = self.width();
        let neww = Width::of(v);
        let n = self.len();
        let prepend = (v < 0) as usize;
        trace!(
            "intset: upgrading {:?} -> {:?} over {} elements",
            oldw,
            neww,
            n
        );
        self.d.resize(HDR_SIZE + (n + 1) * neww.bytes(), 0);
        let mut i = n;
        while i > 0 {
            i -= 1;
            let x = self.elem(i, oldw);
            self.put_elem(i + prepend, x, neww);
        }
        if prepend == 1 {
            self.put_elem(0, v, neww);
        } else {
            self.put_elem(n, v, neww);
        }
        self.set_width(neww);
        self.set_len(n + 1);
    }
}

impl Default for IntSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.width();
        f.debug_list()
            .entries((0..self.len()).map(|i| self.elem(i, w)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{IntSet, Width, HDR_SIZE};

    /// Assert every structural invariant after a mutation
    fn check(s: &IntSet) {
        let w = s.width();
        assert_eq!(s.blob_len(), HDR_SIZE + s.len() * w.bytes());
        for i in 0..s.len() {
            assert!(Width::of(s.elem(i, w)) <= w);
            if i > 0 {
                assert!(s.elem(i - 1, w) < s.elem(i, w));
            }
        }
    }

    #[test]
    fn empty() {
        let s = IntSet::new();
        assert_eq!(s.len(), 0);
        assert_eq!(s.width(), Width::W16);
        assert_eq!(s.blob_len(), HDR_SIZE);
        check(&s);
    }
    #[test]
    fn add_sorted_unique() {
        let mut s = IntSet::new();
        for v in [5, -3, 9, 0, -3, 5] {
            s.add(v);
            check(&s);
        }
        assert_eq!(s.len(), 4);
        multi_assert_eq!(
            s.get(0).unwrap() => -3
        );
        assert_eq!(s.get(1).unwrap(), 0);
        assert_eq!(s.get(2).unwrap(), 5);
        assert_eq!(s.get(3).unwrap(), 9);
        assert!(s.get(4).is_err());
    }
    #[test]
    fn double_add_is_noop() {
        let mut s = IntSet::new();
        assert!(s.add(42));
        let blob = s.as_blob().to_vec();
        assert!(!s.add(42));
        assert_eq!(s.as_blob(), &blob[..]);
    }
    #[test]
    fn mixed_width_upgrade() {
        let mut s = IntSet::new();
        s.add(1);
        s.add(-100);
        check(&s);
        assert_eq!(s.width(), Width::W16);
        s.add(200_000);
        check(&s);
        assert_eq!(s.width(), Width::W32);
        s.add(4_294_967_296);
        check(&s);
        assert_eq!(s.width(), Width::W64);
        // read back every element by value after the upgrades
        assert_eq!(s.get(0).unwrap(), -100);
        assert_eq!(s.get(1).unwrap(), 1);
        assert_eq!(s.get(2).unwrap(), 200_000);
        assert_eq!(s.get(3).unwrap(), 4_294_967_296);
        assert!(s.contains(200_000));
        assert!(!s.contains(200_001));
    }
    #[test]
    fn upgrade_prepends_negative() {
        let mut s = IntSet::new();
        s.add(10);
        s.add(20);
        s.add(-200_000);
        check(&s);
        assert_eq!(s.width(), Width::W32);
        assert_eq!(s.get(0).unwrap(), -200_000);
        assert_eq!(s.get(1).unwrap(), 10);
        assert_eq!(s.get(2).unwrap(), 20);
    }
    #[test]
    fn boundary_upgrade() {
        let mut s = IntSet::new();
        s.add(i16::MAX as i64);
        s.add(i16::MIN as i64);
        assert_eq!(s.width(), Width::W16);
        s.add(i16::MAX as i64 + 1);
        check(&s);
        assert_eq!(s.width(), Width::W32);
        assert!(s.contains(i16::MAX as i64));
        assert!(s.contains(i16::MIN as i64));
        assert!(s.contains(i16::MAX as i64 + 1));
    }
    #[test]
    fn remove_keeps_width() {
        let mut s = IntSet::new();
        s.add(1);
        s.add(1_000_000);
        assert_eq!(s.width(), Width::W32);
        assert!(s.remove(1_000_000));
        check(&s);
        // no downgrade
        assert_eq!(s.width(), Width::W32);
        assert_eq!(s.len(), 1);
        assert!(!s.remove(1_000_000));
        assert!(!s.remove(7));
        // out-of-width removal is an immediate miss
        assert!(!s.remove(i64::MAX));
    }
    #[test]
    fn find_out_of_width_fast_path() {
        let mut s = IntSet::new();
        s.add(1);
        assert!(!s.contains(1 << 40));
    }
    #[test]
    fn spam_add_find() {
        let mut s = IntSet::new();
        for v in (-500..500).map(|v| v * 3) {
            assert!(s.add(v));
        }
        check(&s);
        for v in -500..500 {
            assert_eq!(s.contains(v * 3), true);
            assert_eq!(s.contains(v * 3 + 1), false);
        }
        for v in (-500..500).map(|v| v * 3) {
            assert!(s.remove(v));
        }
        assert!(s.is_empty());
    }
    #[test]
    fn random_is_member() {
        let mut s = IntSet::new();
        for v in 0..64 {
            s.add(v * v);
        }
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(s.contains(s.random(&mut rng).unwrap()));
        }
        assert!(IntSet::new().random(&mut rng).is_none());
    }
    #[test]
    fn blob_roundtrip() {
        let mut s = IntSet::new();
        for v in [3, 1, 4, 1, 5, 9, 2, 6, 1 << 33] {
            s.add(v);
        }
        let restored = IntSet::from_blob(s.as_blob().to_vec()).unwrap();
        assert_eq!(restored, s);
    }
    #[test]
    fn blob_rejects_garbage() {
        // short
        assert!(IntSet::from_blob(vec![1, 2, 3]).is_err());
        // bad width
        let mut blob = IntSet::new().into_blob();
        blob[0] = 3;
        assert!(IntSet::from_blob(blob).is_err());
        // length mismatch
        let mut s = IntSet::new();
        s.add(1);
        let mut blob = s.as_blob().to_vec();
        blob.pop();
        assert!(IntSet::from_blob(blob).is_err());
        // unsorted
        let mut s = IntSet::new();
        s.add(2);
        s.add(5);
        let mut bad = s.into_blob();
        bad[8..10].copy_from_slice(&9i16.to_le_bytes());
        assert!(IntSet::from_blob(bad).is_err());
    }
}
