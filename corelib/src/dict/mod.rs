/*
 * Created on Fri Mar 15 2024
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

/*!
    # Incrementally rehashed dictionary

    A chained hash table that never rehashes in one stop-the-world pass.
    Growth allocates a second bucket array and every subsequent mutation moves
    one bucket's chain across; readers probe both arrays until the migration
    drains. The interesting consequences:

    - a key lives in exactly one of the two tables, never both
    - buckets `[0, rehash_idx)` of the old table are empty while rehashing
    - a live safe iterator pauses migration entirely (coherence beats
      amortization; keep them short-lived)

    For long traversals under mutation use [`Dict::scan`]: the cursor walks
    bucket indices in reverse-bit-increment order, which survives table
    doublings and halvings without missing keys that stay put (revisits are
    possible, misses are not).
*/

pub mod hash;

use {
    crate::{
        error::{CoreError, CoreResult},
        mem::unsafe_apis,
    },
    core::{
        cell::Cell,
        fmt, mem, ptr,
        sync::atomic::{AtomicBool, Ordering},
    },
    log::debug,
    rand::Rng,
    std::time::{Duration, Instant},
};

// the resize switch is process-global (think: suspending growth around a
// fork so CoW pages stay cold). A severely overloaded table grows anyway
static RESIZE_ENABLED: AtomicBool = AtomicBool::new(true);

pub fn enable_resize() {
    RESIZE_ENABLED.store(true, Ordering::Relaxed)
}

pub fn disable_resize() {
    RESIZE_ENABLED.store(false, Ordering::Relaxed)
}

fn resize_enabled() -> bool {
    RESIZE_ENABLED.load(Ordering::Relaxed)
}

/// The capability object a dictionary carries: how to hash a key and how to
/// compare two. Implementations may hold per-dictionary state
pub trait DictSpec<K> {
    fn hash(&self, key: &K) -> u32;
    fn eq(&self, a: &K, b: &K) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
/// Byte-string keys under the seeded default hash
pub struct BytesSpec;

impl<K: AsRef<[u8]>> DictSpec<K> for BytesSpec {
    fn hash(&self, key: &K) -> u32 {
        hash::hash_bytes(key.as_ref())
    }
    fn eq(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}

#[derive(Debug, Default, Clone, Copy)]
/// Case-insensitive byte-string keys
pub struct BytesCiSpec;

impl<K: AsRef<[u8]>> DictSpec<K> for BytesCiSpec {
    fn hash(&self, key: &K) -> u32 {
        hash::hash_bytes_ci(key.as_ref())
    }
    fn eq(&self, a: &K, b: &K) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The aggregate value the database layer stores per entry: owned raw data or
/// an inline numeric
pub enum DictValue {
    Ptr(Box<[u8]>),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

enum_impls!(DictValue => {
    Box<[u8]> as Ptr,
    Vec<u8> as Ptr,
    &[u8] as Ptr,
    i64 as Signed,
    u64 as Unsigned,
    f64 as Float,
});

struct DictEntry<K, V> {
    k: K,
    v: V,
    n: *mut DictEntry<K, V>,
}

struct Table<K, V> {
    b: *mut *mut DictEntry<K, V>,
    size: usize,
    mask: usize,
    used: usize,
}

impl<K, V> Table<K, V> {
    const fn null() -> Self {
        Self {
            b: ptr::null_mut(),
            size: 0,
            mask: 0,
            used: 0,
        }
    }
    fn with_size(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        Self {
            b: unsafe {
                // UNSAFE(@ohsayan): a zeroed block of pointers is a block of
                // null bucket heads
                unsafe_apis::alloc_zeroed_array(size)
            },
            size,
            mask: size - 1,
            used: 0,
        }
    }
    #[inline(always)]
    unsafe fn head(&self, i: usize) -> *mut DictEntry<K, V> {
        debug_assert!(i < self.size);
        *self.b.add(i)
    }
    #[inline(always)]
    unsafe fn set_head(&mut self, i: usize, e: *mut DictEntry<K, V>) {
        debug_assert!(i < self.size);
        *self.b.add(i) = e
    }
    /// Run `f` over every entry of the chain at bucket `i`
    ///
    /// ## Safety
    /// `i < self.size`
    unsafe fn emit_chain(&self, i: usize, f: &mut impl FnMut(&K, &V)) {
        let mut e = self.head(i);
        while !e.is_null() {
            f(&(*e).k, &(*e).v);
            e = (*e).n;
        }
    }
    fn reset(&mut self) {
        if !self.b.is_null() {
            unsafe {
                // UNSAFE(@ohsayan): we allocated exactly `size` heads
                unsafe_apis::dealloc_array(self.b, self.size);
            }
        }
        *self = Self::null();
    }
}

/// The dictionary. `S` supplies hashing and equality; key and value ownership
/// is by-move (`Drop` is the destructor, `Clone` the dup)
pub struct Dict<K, V, S: DictSpec<K>> {
    t: [Table<K, V>; 2],
    rehash_idx: isize,
    /// live safe iterators; while nonzero, rehash steps are no-ops
    pause: Cell<usize>,
    s: S,
}

impl<K, V, S: DictSpec<K>> Dict<K, V, S> {
    const INITIAL_SIZE: usize = 4;
    /// overload factor past which growth ignores the global resize switch
    const FORCE_RATIO: usize = 5;
    /// a single rehash step gives up after `10 * n` empty buckets
    const STEP_EMPTY_FACTOR: usize = 10;
    const SIZE_CAP: usize = 1 << (usize::BITS - 2);

    pub fn new(s: S) -> Self {
        Self {
            t: [Table::null(), Table::null()],
            rehash_idx: -1,
            pause: Cell::new(0),
            s,
        }
    }
    pub fn with_capacity(s: S, cap: usize) -> Self {
        let mut d = Self::new(s);
        if cap != 0 {
            let _ = d.expand(cap);
        }
        d
    }
    #[inline(always)]
    pub const fn is_rehashing(&self) -> bool {
        self.rehash_idx != -1
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.t[0].used + self.t[1].used
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Total bucket count across both tables
    pub fn capacity(&self) -> usize {
        self.t[0].size + self.t[1].size
    }
    pub fn spec(&self) -> &S {
        &self.s
    }
    fn next_size(req: usize) -> usize {
        req.clamp(Self::INITIAL_SIZE, Self::SIZE_CAP).next_power_of_two()
    }
}

// sizing & rehash scheduling
impl<K, V, S: DictSpec<K>> Dict<K, V, S> {
    /// Install a bucket array of the next power of two >= `req` and begin
    /// migrating, or install directly if the dict never allocated
    fn expand(&mut self, req: usize) -> CoreResult<()> {
        if self.is_rehashing() || self.t[0].used > req {
            return Err(CoreError::IllegalArgument);
        }
        let size = Self::next_size(req);
        if size == self.t[0].size {
            return Err(CoreError::IllegalArgument);
        }
        let fresh = Table::with_size(size);
        if self.t[0].b.is_null() {
            self.t[0] = fresh;
            return Ok(());
        }
        debug!(
            "dict: begin incremental rehash {} -> {} buckets ({} keys)",
            self.t[0].size,
            size,
            self.t[0].used
        );
        self.t[1] = fresh;
        self.rehash_idx = 0;
        Ok(())
    }
    /// Explicitly resize to hold at least `req`. Rejected while rehashing,
    /// while the global switch is off, or below the current population
    pub fn resize(&mut self, req: usize) -> CoreResult<()> {
        if !resize_enabled() {
            return Err(CoreError::IllegalArgument);
        }
        self.expand(req)
    }
    /// Shrink to the smallest table that fits, if the dict is sitting below
    /// 10% occupancy
    pub fn shrink_to_fit(&mut self) -> CoreResult<()> {
        if !resize_enabled() || self.is_rehashing() {
            return Err(CoreError::IllegalArgument);
        }
        if self.t[0].size > Self::INITIAL_SIZE && self.t[0].used * 10 < self.t[0].size {
            debug!(
                "dict: shrinking {} buckets down to fit {} keys",
                self.t[0].size,
                self.t[0].used
            );
            return self.expand(self.t[0].used.max(Self::INITIAL_SIZE));
        }
        Ok(())
    }
    fn expand_if_needed(&mut self) {
        if self.is_rehashing() {
            return;
        }
        if self.t[0].size == 0 {
            let _ = self.expand(Self::INITIAL_SIZE);
            return;
        }
        if self.t[0].used >= self.t[0].size {
            let enabled = resize_enabled();
            if enabled || self.t[0].used / self.t[0].size >= Self::FORCE_RATIO {
                if !enabled {
                    debug!(
                        "dict: forced growth with resize disabled (load factor {})",
                        self.t[0].used / self.t[0].size
                    );
                }
                let _ = self.expand(self.t[0].used + 1);
            }
        }
    }
    /// Move up to `n` buckets from the old table, giving up early after
    /// `10 * n` empty visits. Returns whether migration is still pending
    fn rehash(&mut self, mut n: usize) -> bool {
        let mut empty_visits = n * Self::STEP_EMPTY_FACTOR;
        if !self.is_rehashing() {
            return false;
        }
        while n > 0 && self.t[0].used != 0 {
            n -= 1;
            unsafe {
                // UNSAFE(@ohsayan): while t0 holds keys, rehash_idx stays in
                // bounds (every bucket before it is already drained)
                debug_assert!((self.rehash_idx as usize) < self.t[0].size);
                while self.t[0].head(self.rehash_idx as usize).is_null() {
                    self.rehash_idx += 1;
                    empty_visits -= 1;
                    if empty_visits == 0 {
                        return true;
                    }
                }
                let mut e = self.t[0].head(self.rehash_idx as usize);
                while !e.is_null() {
                    let nx = (*e).n;
                    let i = (self.s.hash(&(*e).k) as usize) & self.t[1].mask;
                    (*e).n = self.t[1].head(i);
                    self.t[1].set_head(i, e);
                    self.t[0].used -= 1;
                    self.t[1].used += 1;
                    e = nx;
                }
                self.t[0].set_head(self.rehash_idx as usize, ptr::null_mut());
            }
            self.rehash_idx += 1;
        }
        if self.t[0].used == 0 {
            self.t[0].reset();
            self.t[0] = mem::replace(&mut self.t[1], Table::null());
            self.rehash_idx = -1;
            debug!("dict: rehash complete ({} buckets)", self.t[0].size);
            return false;
        }
        true
    }
    /// One bucket of migration, unless a safe iterator has us paused
    pub fn rehash_step(&mut self) {
        if self.pause.get() == 0 {
            self.rehash(1);
        }
    }
    /// Migrate in 100-bucket slices until `budget` elapses or the rehash
    /// completes. Returns the number of slices run
    pub fn rehash_for(&mut self, budget: Duration) -> usize {
        let start = Instant::now();
        let mut slices = 0;
        while self.rehash(100) {
            slices += 1;
            if start.elapsed() >= budget {
                break;
            }
        }
        slices
    }
}

// reads & writes
impl<K, V, S: DictSpec<K>> Dict<K, V, S> {
    fn probe(&self, key: &K) -> *mut DictEntry<K, V> {
        if self.is_empty() {
            return ptr::null_mut();
        }
        let h = self.s.hash(key) as usize;
        for table in 0..2 {
            let t = &self.t[table];
            if t.size == 0 {
                break;
            }
            let mut e = unsafe {
                // UNSAFE(@ohsayan): masked index is always in bounds
                t.head(h & t.mask)
            };
            while !e.is_null() {
                unsafe {
                    // UNSAFE(@ohsayan): chain nodes stay live until unlinked
                    if self.s.eq(&(*e).k, key) {
                        return e;
                    }
                    e = (*e).n;
                }
            }
            if !self.is_rehashing() {
                break;
            }
        }
        ptr::null_mut()
    }
    fn insert_fresh(&mut self, key: K, val: V) {
        // while rehashing, fresh keys go straight to the new table so the old
        // one only ever drains
        let target = self.is_rehashing() as usize;
        let i = (self.s.hash(&key) as usize) & self.t[target].mask;
        unsafe {
            // UNSAFE(@ohsayan): head insert into a bucket we own
            let e = Box::into_raw(Box::new(DictEntry {
                k: key,
                v: val,
                n: self.t[target].head(i),
            }));
            self.t[target].set_head(i, e);
        }
        self.t[target].used += 1;
    }
    /// Insert a fresh key. Fails with [`CoreError::AlreadyExists`] without
    /// touching the existing entry
    pub fn add(&mut self, key: K, val: V) -> CoreResult<()> {
        self.rehash_step();
        self.expand_if_needed();
        if !self.probe(&key).is_null() {
            return Err(CoreError::AlreadyExists);
        }
        self.insert_fresh(key, val);
        Ok(())
    }
    /// Insert or clobber. Returns true when the key is fresh
    pub fn replace(&mut self, key: K, val: V) -> bool {
        self.rehash_step();
        self.expand_if_needed();
        let e = self.probe(&key);
        if e.is_null() {
            self.insert_fresh(key, val);
            true
        } else {
            unsafe {
                // UNSAFE(@ohsayan): live entry; the old value drops in place
                (*e).v = val;
            }
            false
        }
    }
    pub fn fetch(&self, key: &K) -> Option<&V> {
        unsafe {
            // UNSAFE(@ohsayan): probe hands out live entries only
            self.probe(key).as_ref().map(|e| &e.v)
        }
    }
    pub fn fetch_entry(&self, key: &K) -> Option<(&K, &V)> {
        unsafe {
            // UNSAFE(@ohsayan): probe hands out live entries only
            self.probe(key).as_ref().map(|e| (&e.k, &e.v))
        }
    }
    pub fn fetch_mut(&mut self, key: &K) -> Option<&mut V> {
        unsafe {
            // UNSAFE(@ohsayan): unique borrow of self guards the entry
            self.probe(key).as_mut().map(|e| &mut e.v)
        }
    }
    pub fn contains(&self, key: &K) -> bool {
        !self.probe(key).is_null()
    }
    /// Remove the entry, dropping key and value
    pub fn delete(&mut self, key: &K) -> CoreResult<()> {
        self.unlink(key).map(drop)
    }
    /// Remove the entry and hand both key and value back to the caller
    pub fn take(&mut self, key: &K) -> CoreResult<(K, V)> {
        self.unlink(key)
    }
    fn unlink(&mut self, key: &K) -> CoreResult<(K, V)> {
        if self.is_empty() {
            return Err(CoreError::NotFound);
        }
        self.rehash_step();
        let h = self.s.hash(key) as usize;
        for table in 0..2 {
            if self.t[table].size == 0 {
                break;
            }
            let i = h & self.t[table].mask;
            unsafe {
                // UNSAFE(@ohsayan): single-bucket walk + unlink
                let mut prev: *mut DictEntry<K, V> = ptr::null_mut();
                let mut e = self.t[table].head(i);
                while !e.is_null() {
                    if self.s.eq(&(*e).k, key) {
                        if prev.is_null() {
                            self.t[table].set_head(i, (*e).n);
                        } else {
                            (*prev).n = (*e).n;
                        }
                        self.t[table].used -= 1;
                        let boxed = Box::from_raw(e);
                        let DictEntry { k, v, n: _ } = *boxed;
                        return Ok((k, v));
                    }
                    prev = e;
                    e = (*e).n;
                }
            }
            if !self.is_rehashing() {
                break;
            }
        }
        Err(CoreError::NotFound)
    }
    pub fn clear(&mut self) {
        for table in 0..2 {
            let t = &mut self.t[table];
            for i in 0..t.size {
                unsafe {
                    // UNSAFE(@ohsayan): we own every chain node
                    let mut e = t.head(i);
                    while !e.is_null() {
                        let nx = (*e).n;
                        drop(Box::from_raw(e));
                        e = nx;
                    }
                }
            }
            t.reset();
        }
        self.rehash_idx = -1;
    }
}

// random access
impl<K, V, S: DictSpec<K>> Dict<K, V, S> {
    /// Uniform-ish random entry: a random non-empty bucket (skipping the
    /// drained prefix while rehashing), then a random chain position
    pub fn random_entry(&mut self, rng: &mut impl Rng) -> Option<(&K, &V)> {
        if self.is_empty() {
            return None;
        }
        self.rehash_step();
        let e = unsafe {
            // UNSAFE(@ohsayan): bucket picks are bounds-limited by construction
            let mut e;
            if self.is_rehashing() {
                let ridx = self.rehash_idx as usize;
                loop {
                    let h = ridx + rng.gen_range(0..self.t[0].size + self.t[1].size - ridx);
                    e = if h >= self.t[0].size {
                        self.t[1].head(h - self.t[0].size)
                    } else {
                        self.t[0].head(h)
                    };
                    if !e.is_null() {
                        break;
                    }
                }
            } else {
                loop {
                    e = self.t[0].head(rng.gen_range(0..self.t[0].size));
                    if !e.is_null() {
                        break;
                    }
                }
            }
            let mut chainlen = 0;
            let mut c = e;
            while !c.is_null() {
                chainlen += 1;
                c = (*c).n;
            }
            let mut steps = rng.gen_range(0..chainlen);
            while steps > 0 {
                e = (*e).n;
                steps -= 1;
            }
            &*e
        };
        Some((&e.k, &e.v))
    }
    /// Collect up to `count` entries by walking a few random buckets. Fast and
    /// approximately fair, not uniform, and a key may repeat across calls;
    /// meant for eviction-style sampling
    pub fn sample_entries(&mut self, rng: &mut impl Rng, count: usize) -> Vec<(&K, &V)> {
        let count = count.min(self.len());
        let mut out = Vec::with_capacity(count);
        if count == 0 {
            return out;
        }
        for _ in 0..count {
            self.rehash_step();
        }
        let tables = 1 + self.is_rehashing() as usize;
        let maxsizemask = self.t[0].mask.max(self.t[1].mask);
        let mut i = rng.gen_range(0..=maxsizemask);
        let mut emptylen = 0usize;
        let mut maxsteps = count * 10;
        unsafe {
            // UNSAFE(@ohsayan): all bucket reads stay masked within live tables
            while out.len() < count && maxsteps != 0 {
                maxsteps -= 1;
                for j in 0..tables {
                    // while rehashing there are no entries below rehash_idx in
                    // the old table
                    if tables == 2 && j == 0 && i < self.rehash_idx as usize {
                        if i >= self.t[1].size {
                            i = self.rehash_idx as usize;
                        } else {
                            continue;
                        }
                    }
                    if i >= self.t[j].size {
                        continue;
                    }
                    let mut e = self.t[j].head(i);
                    if e.is_null() {
                        emptylen += 1;
                        if emptylen >= 5 && emptylen > count {
                            i = rng.gen_range(0..=maxsizemask);
                            emptylen = 0;
                        }
                    } else {
                        emptylen = 0;
                        while !e.is_null() {
                            out.push((&(*e).k, &(*e).v));
                            if out.len() == count {
                                return out;
                            }
                            e = (*e).n;
                        }
                    }
                }
                i = (i + 1) & maxsizemask;
            }
        }
        out
    }
}

// traversal
impl<K, V, S: DictSpec<K>> Dict<K, V, S> {
    /// A structural digest: bucket array addresses plus sizes and populations,
    /// mixed. If this changes across an unsafe iterator's lifetime, the caller
    /// mutated while iterating
    fn fingerprint(&self) -> u64 {
        let integers = [
            self.t[0].b as usize as u64,
            self.t[0].size as u64,
            self.t[0].used as u64,
            self.t[1].b as usize as u64,
            self.t[1].size as u64,
            self.t[1].used as u64,
        ];
        let mut h: u64 = 0;
        for i in integers {
            h = h.wrapping_add(i);
            // Tomas Wang's 64-bit mix
            h = (!h).wrapping_add(h << 21);
            h ^= h >> 24;
            h = h.wrapping_add(h << 3).wrapping_add(h << 8);
            h ^= h >> 14;
            h = h.wrapping_add(h << 2).wrapping_add(h << 4);
            h ^= h >> 28;
            h = h.wrapping_add(h << 31);
        }
        h
    }
    /// Borrowing iterator that asserts on drop that the dict's structure never
    /// changed underneath it
    pub fn iter(&self) -> DictIter<'_, K, V, S> {
        DictIter::new(self, false)
    }
    /// Borrowing iterator that pauses rehashing while it lives. Keep it
    /// short-lived: a paused dict stops amortizing
    pub fn iter_safe(&self) -> DictIter<'_, K, V, S> {
        DictIter::new(self, true)
    }
    /// Stateless mutation-tolerant traversal. Feed `0` to start; a returned
    /// `0` means the walk is complete. Every key present for the whole scan is
    /// emitted at least once, whatever resizes happen between calls
    pub fn scan(&self, cursor: u64, f: &mut impl FnMut(&K, &V)) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let mut v = cursor;
        unsafe {
            // UNSAFE(@ohsayan): all bucket indices are masked
            if !self.is_rehashing() {
                let m0 = self.t[0].mask as u64;
                self.t[0].emit_chain((v & m0) as usize, &mut *f);
                v |= !m0;
                v = v.reverse_bits().wrapping_add(1).reverse_bits();
            } else {
                // walk the smaller table's bucket, then every one of its
                // images in the larger table
                let (ts, tl) = if self.t[0].size > self.t[1].size {
                    (&self.t[1], &self.t[0])
                } else {
                    (&self.t[0], &self.t[1])
                };
                let m0 = ts.mask as u64;
                let m1 = tl.mask as u64;
                ts.emit_chain((v & m0) as usize, &mut *f);
                loop {
                    tl.emit_chain((v & m1) as usize, &mut *f);
                    v |= !m1;
                    v = v.reverse_bits().wrapping_add(1).reverse_bits();
                    if v & (m0 ^ m1) == 0 {
                        break;
                    }
                }
            }
        }
        v
    }
}

/// Iterator over a [`Dict`]: the old table first, then (only while rehashing)
/// the new one, each bucket chain head to tail. Order is not specified beyond
/// that
pub struct DictIter<'a, K, V, S: DictSpec<K>> {
    d: &'a Dict<K, V, S>,
    table: usize,
    index: isize,
    entry: *mut DictEntry<K, V>,
    safe: bool,
    started: bool,
    fingerprint: u64,
}

impl<'a, K, V, S: DictSpec<K>> DictIter<'a, K, V, S> {
    fn new(d: &'a Dict<K, V, S>, safe: bool) -> Self {
        Self {
            d,
            table: 0,
            index: -1,
            entry: ptr::null_mut(),
            safe,
            started: false,
            fingerprint: 0,
        }
    }
}

impl<'a, K, V, S: DictSpec<K>> Iterator for DictIter<'a, K, V, S> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.entry.is_null() {
                if !self.started {
                    self.started = true;
                    if self.safe {
                        self.d.pause.set(self.d.pause.get() + 1);
                    } else {
                        self.fingerprint = self.d.fingerprint();
                    }
                }
                self.index += 1;
                if self.index >= self.d.t[self.table].size as isize {
                    if self.d.is_rehashing() && self.table == 0 {
                        self.table = 1;
                        self.index = 0;
                    } else {
                        return None;
                    }
                }
                self.entry = unsafe {
                    // UNSAFE(@ohsayan): index bounds checked right above
                    self.d.t[self.table].head(self.index as usize)
                };
            } else {
                self.entry = unsafe {
                    // UNSAFE(@ohsayan): live chain node
                    (*self.entry).n
                };
            }
            if !self.entry.is_null() {
                let e = unsafe {
                    // UNSAFE(@ohsayan): nullck above
                    &*self.entry
                };
                return Some((&e.k, &e.v));
            }
        }
    }
}

impl<K, V, S: DictSpec<K>> Drop for DictIter<'_, K, V, S> {
    fn drop(&mut self) {
        if self.started {
            if self.safe {
                self.d.pause.set(self.d.pause.get() - 1);
            } else {
                assert_eq!(
                    self.fingerprint,
                    self.d.fingerprint(),
                    "dict mutated under an unsafe iterator"
                );
            }
        }
    }
}

impl<K, V, S: DictSpec<K>> Drop for Dict<K, V, S> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<K, V, S: DictSpec<K> + Default> Default for Dict<K, V, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S: DictSpec<K>> fmt::Debug for Dict<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
