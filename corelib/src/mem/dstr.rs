/*
 * Created on Thu Feb 08 2024
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
    super::numstr::IntegerRepr,
    core::{
        fmt,
        ops::Deref,
    },
};

/// Past this many bytes we stop doubling and grow linearly
const PREALLOC_CAP: usize = 1024 * 1024;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A growable byte string that always keeps a NUL byte one past the payload (the
/// NUL is not part of [`Self::len`]; interior NULs in the payload are fine). The
/// backing region is `payload .. NUL .. reserve`, so a pointer to the payload can
/// be handed to any C-string consumer
pub struct DStr {
    d: Vec<u8>,
}

impl DStr {
    pub fn empty() -> Self {
        Self { d: vec![0u8] }
    }
    pub fn new(init: &[u8]) -> Self {
        let mut d = Vec::with_capacity(init.len() + 1);
        d.extend_from_slice(init);
        d.push(0);
        Self { d }
    }
    pub fn with_capacity(cap: usize) -> Self {
        let mut d = Vec::with_capacity(cap + 1);
        d.push(0);
        Self { d }
    }
    pub fn from_int(v: i64) -> Self {
        IntegerRepr::scoped(v, Self::new)
    }
    /// Concatenate `items` with `sep` between them
    pub fn join(items: &[&[u8]], sep: &[u8]) -> Self {
        let mut s = Self::empty();
        let mut it = items.iter();
        if let Some(first) = it.next() {
            s.push_bytes(first);
            for item in it {
                s.push_bytes(sep);
                s.push_bytes(item);
            }
        }
        s
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.d.len() - 1
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Bytes reserved past the payload, excluding the terminator slot
    #[inline(always)]
    pub fn avail(&self) -> usize {
        self.d.capacity() - self.d.len()
    }
    #[inline(always)]
    pub fn alloc_size(&self) -> usize {
        self.d.capacity()
    }
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.d[..self.d.len() - 1]
    }
    #[inline(always)]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let l = self.len();
        &mut self.d[..l]
    }
    /// Pointer to the NUL-terminated payload
    #[inline(always)]
    pub fn as_c_ptr(&self) -> *const u8 {
        self.d.as_ptr()
    }
    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.d.as_mut_ptr()
    }
}

impl DStr {
    /// Ensure at least `n` spare bytes past the payload. Doubles the target
    /// length while it stays under [`PREALLOC_CAP`], then grows linearly
    pub fn make_room(&mut self, n: usize) {
        if self.avail() >= n {
            return;
        }
        let newlen = self.len() + n;
        let target = if newlen < PREALLOC_CAP {
            newlen * 2
        } else {
            newlen + PREALLOC_CAP
        };
        self.d.reserve_exact(target + 1 - self.d.len());
    }
    /// Extend the payload over `delta` bytes that the caller already wrote into
    /// the reserved region (starting at the old terminator slot)
    ///
    /// ## Safety
    /// `delta <= self.avail()` and the bytes must actually have been written
    pub unsafe fn incr_len(&mut self, delta: usize) {
        debug_assert!(delta <= self.avail());
        let new = self.d.len() + delta;
        // UNSAFE(@ohsayan): the caller initialized the region per contract
        self.d.set_len(new);
        *self.d.get_unchecked_mut(new - 1) = 0;
    }
    pub fn push_bytes(&mut self, b: &[u8]) {
        self.make_room(b.len());
        self.d.pop();
        self.d.extend_from_slice(b);
        self.d.push(0);
    }
    pub fn push_byte(&mut self, b: u8) {
        self.make_room(1);
        self.d.pop();
        self.d.push(b);
        self.d.push(0);
    }
    /// Replace the payload with `b`, keeping (and growing) the allocation
    pub fn copy_from(&mut self, b: &[u8]) {
        self.clear();
        self.push_bytes(b);
    }
    /// Zero-pad the payload out to `n` bytes. A no-op if already that long
    pub fn grow_zeroed(&mut self, n: usize) {
        if n <= self.len() {
            return;
        }
        self.make_room(n - self.len());
        self.d.pop();
        self.d.resize(n + 1, 0);
    }
    /// Logically empty the string. The allocation is retained for reuse
    pub fn clear(&mut self) {
        self.d.clear();
        self.d.push(0);
    }
    pub fn shrink_to_fit(&mut self) {
        self.d.shrink_to_fit();
    }
    /// Strip every leading and trailing byte that appears in `set`
    pub fn trim(&mut self, set: &[u8]) {
        let b = self.as_bytes();
        let start = match b.iter().position(|c| !set.contains(c)) {
            Some(i) => i,
            None => {
                self.clear();
                return;
            }
        };
        // a non-member exists, so rposition must hit
        let end = match b.iter().rposition(|c| !set.contains(c)) {
            Some(i) => i + 1,
            None => impossible!(),
        };
        let n = end - start;
        self.d.copy_within(start..end, 0);
        self.d.truncate(n);
        self.d.push(0);
    }
    /// Cut the payload down to the inclusive index range `[start, end]`, where
    /// negative indices count back from the last byte (`-1` is the last byte)
    pub fn range(&mut self, start: isize, end: isize) {
        let len = self.len() as isize;
        if len == 0 {
            return;
        }
        let mut start = if start < 0 { (len + start).max(0) } else { start };
        let mut end = if end < 0 { (len + end).max(0) } else { end };
        let mut newlen = if start > end { 0 } else { end - start + 1 };
        if newlen != 0 {
            if start >= len {
                newlen = 0;
            } else if end >= len {
                end = len - 1;
                newlen = if start > end { 0 } else { end - start + 1 };
            }
        } else {
            start = 0;
        }
        let (start, newlen) = (start as usize, newlen as usize);
        if start != 0 && newlen != 0 {
            self.d.copy_within(start..start + newlen, 0);
        }
        self.d.truncate(newlen);
        self.d.push(0);
    }
    pub fn to_lower(&mut self) {
        self.as_bytes_mut().make_ascii_lowercase()
    }
    pub fn to_upper(&mut self) {
        self.as_bytes_mut().make_ascii_uppercase()
    }
    /// Substitute every occurrence of `from[i]` with `to[i]`
    pub fn map_chars(&mut self, from: &[u8], to: &[u8]) {
        assert_eq!(from.len(), to.len());
        for c in self.as_bytes_mut() {
            if let Some(i) = from.iter().position(|f| f == c) {
                *c = to[i];
            }
        }
    }
    pub fn push_fmt(&mut self, args: fmt::Arguments) {
        // writing to a byte buffer can't fail
        let _ = fmt::Write::write_fmt(self, args);
    }
    /// Append a quoted, escaped rendering of `b` (the inverse of one
    /// [`Self::split_args`] token)
    pub fn push_repr(&mut self, b: &[u8]) {
        self.push_byte(b'"');
        for &c in b {
            match c {
                b'\\' => self.push_bytes(b"\\\\"),
                b'"' => self.push_bytes(b"\\\""),
                b'\n' => self.push_bytes(b"\\n"),
                b'\r' => self.push_bytes(b"\\r"),
                b'\t' => self.push_bytes(b"\\t"),
                0x07 => self.push_bytes(b"\\a"),
                0x08 => self.push_bytes(b"\\b"),
                c if c.is_ascii_graphic() || c == b' ' => self.push_byte(c),
                c => self.push_fmt(format_args!("\\x{c:02x}")),
            }
        }
        self.push_byte(b'"');
    }
}

impl DStr {
    /// Split on an exact separator sequence. Adjacent separators produce empty
    /// tokens; the trailing token is always emitted
    pub fn split(&self, sep: &[u8]) -> Vec<DStr> {
        let s = self.as_bytes();
        if sep.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut start = 0;
        let mut j = 0;
        while j + sep.len() <= s.len() {
            if &s[j..j + sep.len()] == sep {
                out.push(DStr::new(&s[start..j]));
                j += sep.len();
                start = j;
            } else {
                j += 1;
            }
        }
        out.push(DStr::new(&s[start..]));
        out
    }
    /// Tokenize the payload the way a shell would: whitespace separates tokens,
    /// `"`/`'` quote them, `\xHH` and `\n \r \t \a \b` escape inside double
    /// quotes, `\'` inside single quotes. Returns `None` on unbalanced quotes or
    /// a closing quote not followed by whitespace
    pub fn split_args(&self) -> Option<Vec<DStr>> {
        let s = self.as_bytes();
        let mut out = Vec::new();
        let mut i = 0;
        loop {
            while i < s.len() && s[i].is_ascii_whitespace() {
                i += 1;
            }
            if i == s.len() {
                return Some(out);
            }
            let mut inq = false;
            let mut insq = false;
            let mut done = false;
            let mut current = DStr::empty();
            while !done {
                if i >= s.len() {
                    if inq || insq {
                        return None;
                    }
                    break;
                }
                let c = s[i];
                if inq {
                    if c == b'\\'
                        && i + 3 < s.len()
                        && s[i + 1] == b'x'
                        && s[i + 2].is_ascii_hexdigit()
                        && s[i + 3].is_ascii_hexdigit()
                    {
                        current.push_byte((hexval(s[i + 2]) << 4) | hexval(s[i + 3]));
                        i += 3;
                    } else if c == b'\\' && i + 1 < s.len() {
                        i += 1;
                        current.push_byte(match s[i] {
                            b'n' => b'\n',
                            b'r' => b'\r',
                            b't' => b'\t',
                            b'b' => 0x08,
                            b'a' => 0x07,
                            x => x,
                        });
                    } else if c == b'"' {
                        // the closing quote must end the token
                        if i + 1 < s.len() && !s[i + 1].is_ascii_whitespace() {
                            return None;
                        }
                        done = true;
                    } else {
                        current.push_byte(c);
                    }
                } else if insq {
                    if c == b'\\' && i + 1 < s.len() && s[i + 1] == b'\'' {
                        i += 1;
                        current.push_byte(b'\'');
                    } else if c == b'\'' {
                        if i + 1 < s.len() && !s[i + 1].is_ascii_whitespace() {
                            return None;
                        }
                        done = true;
                    } else {
                        current.push_byte(c);
                    }
                } else {
                    match c {
                        b' ' | b'\n' | b'\r' | b'\t' => done = true,
                        b'"' => inq = true,
                        b'\'' => insq = true,
                        _ => current.push_byte(c),
                    }
                }
                i += 1;
            }
            out.push(current);
        }
    }
}

#[inline(always)]
fn hexval(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => impossible!(),
    }
}

impl fmt::Write for DStr {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

impl Deref for DStr {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl Default for DStr {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for DStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl From<&[u8]> for DStr {
    fn from(b: &[u8]) -> Self {
        Self::new(b)
    }
}

impl From<&str> for DStr {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}
