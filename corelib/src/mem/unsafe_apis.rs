/*
 * Created on Tue Feb 06 2024
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
    # Unsafe APIs

    Abstractions (unsafe, still) over the allocator for the pointer-chained
    containers. Allocation failure is fatal; none of these return null.
*/

use std::{
    alloc::{self, Layout},
    ptr::NonNull,
};

/// Allocate a zero-initialized array of `l` elements of type `T`. A zeroed
/// block of pointers is a block of null pointers
#[inline(always)]
pub unsafe fn alloc_zeroed_array<T>(l: usize) -> *mut T {
    if l != 0 {
        let ptr = alloc::alloc_zeroed(Layout::array::<T>(l).unwrap_unchecked());
        assert!(!ptr.is_null(), "calloc failed");
        ptr as _
    } else {
        NonNull::dangling().as_ptr()
    }
}

/// Deallocate an array of type `T` with size `l`. This function will ensure that nonzero
/// calls to the allocator are made
#[inline(always)]
pub unsafe fn dealloc_array<T>(ptr: *mut T, l: usize) {
    if l != 0 {
        alloc::dealloc(ptr as *mut u8, Layout::array::<T>(l).unwrap_unchecked())
    }
}
