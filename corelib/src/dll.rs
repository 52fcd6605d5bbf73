/*
 * Created on Mon Feb 12 2024
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

/*
    A plain doubly linked list. We only reach for this where O(1) splice in the
    middle of the sequence actually matters; everything else in this crate is a
    packed blob for a reason. Node handles are raw (NonNull) by design: the whole
    point of the structure is stable node addresses across unrelated mutations,
    which a safe handle can't express. Handle misuse segfaults, so the mutating
    node ops are unsafe fns.
*/

use core::{fmt, iter::FusedIterator, marker::PhantomData, ptr, ptr::NonNull};

pub struct DllNode<T> {
    v: T,
    n: *mut DllNode<T>,
    p: *mut DllNode<T>,
}

impl<T> DllNode<T> {
    #[inline(always)]
    fn alloc(v: T) -> *mut Self {
        Box::into_raw(Box::new(Self {
            v,
            n: ptr::null_mut(),
            p: ptr::null_mut(),
        }))
    }
    #[inline(always)]
    pub fn value(&self) -> &T {
        &self.v
    }
    #[inline(always)]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.v
    }
}

/// A doubly linked list with owned values. `head.prev` and `tail.next` are
/// always null; `len` always equals the node count
pub struct Dll<T> {
    h: *mut DllNode<T>,
    t: *mut DllNode<T>,
    l: usize,
}

impl<T> Dll<T> {
    pub const fn new() -> Self {
        Self {
            h: ptr::null_mut(),
            t: ptr::null_mut(),
            l: 0,
        }
    }
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.l
    }
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.l == 0
    }
    pub fn head(&self) -> Option<NonNull<DllNode<T>>> {
        NonNull::new(self.h)
    }
    pub fn tail(&self) -> Option<NonNull<DllNode<T>>> {
        NonNull::new(self.t)
    }
    pub fn first(&self) -> Option<&T> {
        unsafe {
            // UNSAFE(@ohsayan): nullck via as_ref
            self.h.as_ref().map(|n| &n.v)
        }
    }
    pub fn last(&self) -> Option<&T> {
        unsafe {
            // UNSAFE(@ohsayan): nullck via as_ref
            self.t.as_ref().map(|n| &n.v)
        }
    }
    pub fn push_head(&mut self, v: T) -> NonNull<DllNode<T>> {
        let node = DllNode::alloc(v);
        unsafe {
            // UNSAFE(@ohsayan): fresh node; head nullck
            if self.h.is_null() {
                self.h = node;
                self.t = node;
            } else {
                (*node).n = self.h;
                (*self.h).p = node;
                self.h = node;
            }
            self.l += 1;
            NonNull::new_unchecked(node)
        }
    }
    pub fn push_tail(&mut self, v: T) -> NonNull<DllNode<T>> {
        let node = DllNode::alloc(v);
        unsafe {
            // UNSAFE(@ohsayan): fresh node; tail nullck
            if self.t.is_null() {
                self.h = node;
                self.t = node;
            } else {
                (*node).p = self.t;
                (*self.t).n = node;
                self.t = node;
            }
            self.l += 1;
            NonNull::new_unchecked(node)
        }
    }
    /// Link a fresh node holding `v` right before `at`
    ///
    /// ## Safety
    /// `at` must be a live node of *this* list
    pub unsafe fn insert_before(&mut self, at: NonNull<DllNode<T>>, v: T) -> NonNull<DllNode<T>> {
        let at = at.as_ptr();
        let node = DllNode::alloc(v);
        (*node).n = at;
        (*node).p = (*at).p;
        if (*at).p.is_null() {
            self.h = node;
        } else {
            (*(*at).p).n = node;
        }
        (*at).p = node;
        self.l += 1;
        NonNull::new_unchecked(node)
    }
    /// Link a fresh node holding `v` right after `at`
    ///
    /// ## Safety
    /// `at` must be a live node of *this* list
    pub unsafe fn insert_after(&mut self, at: NonNull<DllNode<T>>, v: T) -> NonNull<DllNode<T>> {
        let at = at.as_ptr();
        let node = DllNode::alloc(v);
        (*node).p = at;
        (*node).n = (*at).n;
        if (*at).n.is_null() {
            self.t = node;
        } else {
            (*(*at).n).p = node;
        }
        (*at).n = node;
        self.l += 1;
        NonNull::new_unchecked(node)
    }
    /// Unlink `node` and hand its value back
    ///
    /// ## Safety
    /// `node` must be a live node of *this* list, and any cursor resting on it
    /// must have stepped past it already
    pub unsafe fn remove(&mut self, node: NonNull<DllNode<T>>) -> T {
        let node = node.as_ptr();
        if (*node).p.is_null() {
            self.h = (*node).n;
        } else {
            (*(*node).p).n = (*node).n;
        }
        if (*node).n.is_null() {
            self.t = (*node).p;
        } else {
            (*(*node).n).p = (*node).p;
        }
        self.l -= 1;
        Box::from_raw(node).v
    }
    /// Pop the tail node and relink it as the head
    pub fn rotate(&mut self) {
        if self.l <= 1 {
            return;
        }
        unsafe {
            // UNSAFE(@ohsayan): len > 1, so head/tail are distinct and non-null
            let t = self.t;
            self.t = (*t).p;
            (*self.t).n = ptr::null_mut();
            (*t).p = ptr::null_mut();
            (*t).n = self.h;
            (*self.h).p = t;
            self.h = t;
        }
    }
    /// Linear scan, head to tail
    pub fn search(&self, mut f: impl FnMut(&T) -> bool) -> Option<NonNull<DllNode<T>>> {
        let mut c = self.h;
        unsafe {
            // UNSAFE(@ohsayan): chain walk, nullck terminated
            while !c.is_null() {
                if f(&(*c).v) {
                    return Some(NonNull::new_unchecked(c));
                }
                c = (*c).n;
            }
        }
        None
    }
    /// Value at index `i`; negative indices count from the tail (`-1` is the
    /// tail itself)
    pub fn index_at(&self, i: isize) -> Option<&T> {
        let (mut c, rev, mut k) = if i < 0 {
            (self.t, true, i.unsigned_abs() - 1)
        } else {
            (self.h, false, i as usize)
        };
        unsafe {
            // UNSAFE(@ohsayan): chain walk, nullck terminated
            while k != 0 && !c.is_null() {
                c = if rev { (*c).p } else { (*c).n };
                k -= 1;
            }
            c.as_ref().map(|n| &n.v)
        }
    }
    pub fn iter(&self) -> DllIter<'_, T> {
        DllIter {
            c: self.h,
            rev: false,
            _l: PhantomData,
        }
    }
    pub fn iter_rev(&self) -> DllIter<'_, T> {
        DllIter {
            c: self.t,
            rev: true,
            _l: PhantomData,
        }
    }
    /// A raw stepping cursor starting at the head. See [`DllCursor`]
    pub fn cursor_head(&self) -> DllCursor<T> {
        DllCursor {
            c: self.h,
            rev: false,
        }
    }
    /// A raw stepping cursor starting at the tail
    pub fn cursor_tail(&self) -> DllCursor<T> {
        DllCursor { c: self.t, rev: true }
    }
    pub fn clear(&mut self) {
        let mut c = self.h;
        unsafe {
            // UNSAFE(@ohsayan): we own every node
            while !c.is_null() {
                let nx = (*c).n;
                drop(Box::from_raw(c));
                c = nx;
            }
        }
        self.h = ptr::null_mut();
        self.t = ptr::null_mut();
        self.l = 0;
    }
}

/// A detached cursor over a [`Dll`]. It pre-fetches the follow-up link on every
/// step, so the node it just handed out may be removed before the next step, as
/// may anything else already stepped past. Only the node the cursor currently
/// rests on is off-limits
pub struct DllCursor<T> {
    c: *mut DllNode<T>,
    rev: bool,
}

impl<T> DllCursor<T> {
    /// Point the cursor back at the head, stepping forward
    pub fn rewind_head(&mut self, l: &Dll<T>) {
        self.c = l.h;
        self.rev = false;
    }
    /// Point the cursor back at the tail, stepping backward
    pub fn rewind_tail(&mut self, l: &Dll<T>) {
        self.c = l.t;
        self.rev = true;
    }
    /// Return the node the cursor rests on and advance
    ///
    /// ## Safety
    /// The list must be alive and the node the cursor rests on must not have
    /// been removed since the last step
    pub unsafe fn step(&mut self) -> Option<NonNull<DllNode<T>>> {
        let nn = NonNull::new(self.c)?;
        self.c = if self.rev {
            (*nn.as_ptr()).p
        } else {
            (*nn.as_ptr()).n
        };
        Some(nn)
    }
}

pub struct DllIter<'a, T> {
    c: *mut DllNode<T>,
    rev: bool,
    _l: PhantomData<&'a Dll<T>>,
}

impl<'a, T> Iterator for DllIter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        unsafe {
            // UNSAFE(@ohsayan): the borrow on the list keeps every node alive
            let c = self.c.as_ref()?;
            self.c = if self.rev { c.p } else { c.n };
            Some(&c.v)
        }
    }
}

impl<T> FusedIterator for DllIter<'_, T> {}

impl<T: Clone> Clone for Dll<T> {
    fn clone(&self) -> Self {
        let mut new = Self::new();
        for v in self.iter() {
            new.push_tail(v.clone());
        }
        new
    }
}

impl<T> Drop for Dll<T> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<T> Default for Dll<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Dll<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Dll<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut slf = Self::new();
        slf.extend(iter);
        slf
    }
}

impl<T> Extend<T> for Dll<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| {
            self.push_tail(v);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Dll;

    fn mklist(n: usize) -> Dll<String> {
        let mut l = Dll::new();
        for i in 0..n {
            l.push_tail(format!("elem-{i}"));
        }
        l
    }

    #[test]
    fn empty_drop() {
        let l = Dll::<String>::new();
        assert!(l.is_empty());
        drop(l);
    }
    #[test]
    fn push_order() {
        let mut l = Dll::new();
        l.push_tail("b");
        l.push_tail("c");
        l.push_head("a");
        assert_eq!(l.len(), 3);
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(l.iter_rev().copied().collect::<Vec<_>>(), ["c", "b", "a"]);
    }
    #[test]
    fn insert_around() {
        let mut l = Dll::new();
        let b = l.push_tail("b");
        unsafe {
            l.insert_before(b, "a");
            l.insert_after(b, "c");
        }
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(l.first(), Some(&"a"));
        assert_eq!(l.last(), Some(&"c"));
    }
    #[test]
    fn remove_relinks() {
        let mut l = Dll::new();
        let a = l.push_tail("a");
        let b = l.push_tail("b");
        let c = l.push_tail("c");
        unsafe {
            assert_eq!(l.remove(b), "b");
            assert_eq!(l.iter().copied().collect::<Vec<_>>(), ["a", "c"]);
            assert_eq!(l.remove(a), "a");
            assert_eq!(l.remove(c), "c");
        }
        assert!(l.is_empty());
        assert!(l.head().is_none());
        assert!(l.tail().is_none());
    }
    #[test]
    fn index_at() {
        let l = mklist(5);
        assert_eq!(l.index_at(0).unwrap(), "elem-0");
        assert_eq!(l.index_at(4).unwrap(), "elem-4");
        assert_eq!(l.index_at(-1).unwrap(), "elem-4");
        assert_eq!(l.index_at(-5).unwrap(), "elem-0");
        assert!(l.index_at(5).is_none());
        assert!(l.index_at(-6).is_none());
    }
    #[test]
    fn search() {
        let l = mklist(8);
        let hit = l.search(|v| v.ends_with("-3")).unwrap();
        unsafe {
            assert_eq!(hit.as_ref().value(), "elem-3");
        }
        assert!(l.search(|v| v.ends_with("-9")).is_none());
    }
    #[test]
    fn rotate() {
        let mut l = mklist(3);
        l.rotate();
        assert_eq!(
            l.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            ["elem-2", "elem-0", "elem-1"]
        );
        let mut single = mklist(1);
        single.rotate();
        assert_eq!(single.len(), 1);
        let mut none = mklist(0);
        none.rotate();
        assert!(none.is_empty());
    }
    #[test]
    fn cursor_step_then_remove() {
        // tail -> head teardown: step first, then remove the returned node
        let mut l = mklist(10);
        let mut cursor = l.cursor_tail();
        unsafe {
            while let Some(node) = cursor.step() {
                l.remove(node);
            }
        }
        assert!(l.is_empty());
    }
    #[test]
    fn cursor_rewind() {
        let l = mklist(3);
        let mut cursor = l.cursor_head();
        unsafe {
            cursor.step();
            cursor.step();
            cursor.rewind_head(&l);
            assert_eq!(cursor.step().unwrap().as_ref().value(), "elem-0");
            cursor.rewind_tail(&l);
            assert_eq!(cursor.step().unwrap().as_ref().value(), "elem-2");
        }
    }
    #[test]
    fn cursor_remove_other() {
        let mut l = Dll::new();
        let _a = l.push_tail("a");
        let b = l.push_tail("b");
        let _c = l.push_tail("c");
        let mut cursor = l.cursor_head();
        unsafe {
            let a = cursor.step().unwrap();
            assert_eq!(a.as_ref().value(), &"a");
            // the cursor now rests on b; a is stepped past and safe to remove
            l.remove(a);
            let bn = cursor.step().unwrap();
            assert_eq!(bn.as_ref().value(), &"b");
            l.remove(b);
            assert_eq!(cursor.step().unwrap().as_ref().value(), &"c");
            assert!(cursor.step().is_none());
        }
        assert_eq!(l.len(), 1);
    }
    #[test]
    fn deep_clone() {
        let l = mklist(4);
        let l2 = l.clone();
        drop(l);
        assert_eq!(
            l2.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            ["elem-0", "elem-1", "elem-2", "elem-3"]
        );
    }
}
