/*
 * Created on Mon Feb 05 2024
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

//! # `corelib`: the database's in-memory structures
//!
//! The containers the storage layer is actually made of:
//!
//! - [`mem::DStr`]: a growable, NUL-terminated byte string with an
//!   append-friendly growth policy
//! - [`dll::Dll`]: a doubly linked list, for the places where O(1) mid-list
//!   splicing beats cache locality
//! - [`intset::IntSet`]: a sorted integer set packed into one blob with an
//!   adaptive element width
//! - [`zlist::ZipList`]: the packed dual-ended list, one allocation per list,
//!   variable-length entry headers
//! - [`dict::Dict`]: the chained hash table with incremental (step-at-a-time)
//!   rehashing
//!
//! Everything here is single-threaded cooperative: no locks, no yielding, no
//! sharing across threads without outside synchronization. The packed
//! containers ([`intset::IntSet`], [`zlist::ZipList`]) double as wire formats:
//! their blob layouts are stable and validated on adoption.

#![deny(unreachable_patterns)]

#[macro_use]
mod macros;
pub mod dict;
pub mod dll;
pub mod error;
pub mod intset;
pub mod mem;
pub mod zlist;

pub use self::{
    dict::{Dict, DictSpec, DictValue},
    dll::Dll,
    error::{CoreError, CoreResult},
    intset::IntSet,
    mem::DStr,
    zlist::{ZEntry, ZipList},
};
