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

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
/// Recoverable container errors. Corruption (a packed blob that fails to decode,
/// a broken internal invariant) is never an error; it panics
pub enum CoreError {
    /// the item is already present and the operation refused to clobber it
    AlreadyExists,
    /// the item (or index) doesn't exist
    NotFound,
    /// the index is past the end of the container
    OutOfRange,
    /// the caller broke an API contract (bad resize target, malformed foreign blob, ...)
    IllegalArgument,
}
