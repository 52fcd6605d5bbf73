/*
 * Created on Fri Feb 09 2024
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

use super::*;

mod dstr {
    use super::DStr;

    #[test]
    fn empty() {
        let s = DStr::empty();
        assert_eq!(s.len(), 0);
        assert_eq!(s.as_bytes(), b"");
        unsafe {
            // the terminator always sits one past the payload
            assert_eq!(*s.as_c_ptr(), 0);
        }
    }
    #[test]
    fn push_and_terminator() {
        let mut s = DStr::new(b"hello");
        s.push_bytes(b", world");
        assert_eq!(s.as_bytes(), b"hello, world");
        unsafe {
            assert_eq!(*s.as_c_ptr().add(s.len()), 0);
        }
    }
    #[test]
    fn from_int() {
        multi_assert_eq!(
            DStr::from_int(0).as_bytes().to_vec() => b"0".to_vec()
        );
        assert_eq!(DStr::from_int(-1).as_bytes(), b"-1");
        assert_eq!(DStr::from_int(1024).as_bytes(), b"1024");
        assert_eq!(
            DStr::from_int(i64::MIN).as_bytes(),
            b"-9223372036854775808"
        );
        assert_eq!(DStr::from_int(i64::MAX).as_bytes(), b"9223372036854775807");
    }
    #[test]
    fn growth_policy() {
        let mut s = DStr::empty();
        s.push_bytes(b"x");
        s.make_room(100);
        assert!(s.avail() >= 100);
        // below the prealloc cap the target is doubled
        assert!(s.alloc_size() >= (1 + 100) * 2 + 1);
        let before = s.alloc_size();
        s.make_room(10);
        // already enough room: no-op
        assert_eq!(s.alloc_size(), before);
    }
    #[test]
    fn clear_retains_capacity() {
        let mut s = DStr::new(b"some fairly long payload here");
        let cap = s.alloc_size();
        s.clear();
        assert_eq!(s.len(), 0);
        assert_eq!(s.alloc_size(), cap);
        s.shrink_to_fit();
        assert_eq!(s.avail(), 0);
    }
    #[test]
    fn incr_len() {
        let mut s = DStr::new(b"ab");
        s.make_room(4);
        unsafe {
            let p = s.as_mut_ptr().add(s.len());
            p.copy_from_nonoverlapping(b"cdef".as_ptr(), 4);
            s.incr_len(4);
        }
        assert_eq!(s.as_bytes(), b"abcdef");
    }
    #[test]
    fn grow_zeroed() {
        let mut s = DStr::new(b"ab");
        s.grow_zeroed(6);
        assert_eq!(s.as_bytes(), b"ab\x00\x00\x00\x00");
        s.grow_zeroed(3);
        assert_eq!(s.len(), 6);
    }
    #[test]
    fn trim() {
        let mut s = DStr::new(b"xxhelloyy");
        s.trim(b"xy");
        assert_eq!(s.as_bytes(), b"hello");
        let mut s = DStr::new(b"aaaa");
        s.trim(b"a");
        assert_eq!(s.as_bytes(), b"");
        let mut s = DStr::new(b" \thello world\t ");
        s.trim(b" \t");
        assert_eq!(s.as_bytes(), b"hello world");
    }
    #[test]
    fn range() {
        let mut s = DStr::new(b"hello world");
        s.range(1, -1);
        assert_eq!(s.as_bytes(), b"ello world");
        let mut s = DStr::new(b"hello world");
        s.range(6, 100);
        assert_eq!(s.as_bytes(), b"world");
        let mut s = DStr::new(b"hello");
        s.range(-3, -1);
        assert_eq!(s.as_bytes(), b"llo");
        let mut s = DStr::new(b"hello");
        s.range(3, 1);
        assert_eq!(s.as_bytes(), b"");
    }
    #[test]
    fn cmp_is_bytewise() {
        assert!(DStr::new(b"abc") < DStr::new(b"abd"));
        assert!(DStr::new(b"ab") < DStr::new(b"abc"));
        assert!(DStr::new(b"ab\x00z") > DStr::new(b"ab"));
        assert_eq!(DStr::new(b"same"), DStr::new(b"same"));
    }
    #[test]
    fn case_and_map() {
        let mut s = DStr::new(b"Hello-World");
        s.to_lower();
        assert_eq!(s.as_bytes(), b"hello-world");
        s.to_upper();
        assert_eq!(s.as_bytes(), b"HELLO-WORLD");
        s.map_chars(b"-", b"_");
        assert_eq!(s.as_bytes(), b"HELLO_WORLD");
    }
    #[test]
    fn split() {
        let s = DStr::new(b"a,b,,c");
        let parts = s.split(b",");
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].as_bytes(), b"a");
        assert_eq!(parts[1].as_bytes(), b"b");
        assert_eq!(parts[2].as_bytes(), b"");
        assert_eq!(parts[3].as_bytes(), b"c");
        let s = DStr::new(b"no-sep-here");
        assert_eq!(s.split(b",").len(), 1);
    }
    #[test]
    fn join() {
        let s = DStr::join(&[b"get", b"x", b"y"], b" ");
        assert_eq!(s.as_bytes(), b"get x y");
        assert_eq!(DStr::join(&[], b" ").as_bytes(), b"");
    }
    #[test]
    fn split_args_plain() {
        let s = DStr::new(b"  set  key value ");
        let args = s.split_args().unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].as_bytes(), b"set");
        assert_eq!(args[1].as_bytes(), b"key");
        assert_eq!(args[2].as_bytes(), b"value");
    }
    #[test]
    fn split_args_quoted() {
        let s = DStr::new(b"set \"hello world\" 'it''s'");
        assert!(s.split_args().is_none()); // 's' not followed by space
        let s = DStr::new(b"set \"a\\x41b\" 'c\\'d'");
        let args = s.split_args().unwrap();
        assert_eq!(args[1].as_bytes(), b"aAb");
        assert_eq!(args[2].as_bytes(), b"c'd");
        let s = DStr::new(b"esc \"\\n\\r\\t\\a\\b\\z\"");
        let args = s.split_args().unwrap();
        assert_eq!(args[1].as_bytes(), b"\n\r\t\x07\x08z");
    }
    #[test]
    fn split_args_unbalanced() {
        assert!(DStr::new(b"set \"oops").split_args().is_none());
        assert!(DStr::new(b"set 'oops").split_args().is_none());
        assert!(DStr::new(b"set \"a\"b").split_args().is_none());
    }
    #[test]
    fn repr_roundtrip() {
        let payload = b"a \"b\"\t\\c\x01\x07";
        let mut s = DStr::empty();
        s.push_repr(payload);
        let args = s.split_args().unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].as_bytes(), payload);
    }
    #[test]
    fn push_fmt() {
        let mut s = DStr::new(b"n=");
        s.push_fmt(format_args!("{}/{}", 1, 2));
        assert_eq!(s.as_bytes(), b"n=1/2");
    }
    #[test]
    fn copy_from() {
        let mut s = DStr::new(b"old contents");
        s.copy_from(b"new");
        assert_eq!(s.as_bytes(), b"new");
    }
}

mod numstr {
    use super::{parse_i64, parse_i64_loose, IntegerRepr};

    #[test]
    fn strict_accepts_canonical() {
        multi_assert_eq!(
            parse_i64(b"0"), parse_i64_loose(b"0") => Some(0)
        );
        assert_eq!(parse_i64(b"1024"), Some(1024));
        assert_eq!(parse_i64(b"-1"), Some(-1));
        assert_eq!(parse_i64(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_i64(b"-9223372036854775808"), Some(i64::MIN));
    }
    #[test]
    fn strict_rejects_noncanonical() {
        assert_eq!(parse_i64(b""), None);
        assert_eq!(parse_i64(b"+1"), None);
        assert_eq!(parse_i64(b"01"), None);
        assert_eq!(parse_i64(b"-0"), None);
        assert_eq!(parse_i64(b"-"), None);
        assert_eq!(parse_i64(b"12a"), None);
        assert_eq!(parse_i64(b"9223372036854775808"), None);
        assert_eq!(parse_i64(b"-9223372036854775809"), None);
        // length gate
        assert_eq!(parse_i64(b"11111111111111111111111111111111"), None);
    }
    #[test]
    fn loose_accepts_leading_zeroes() {
        assert_eq!(parse_i64_loose(b"01024"), Some(1024));
        assert_eq!(parse_i64_loose(b"-0"), Some(0));
        assert_eq!(parse_i64_loose(b"0001"), Some(1));
        assert_eq!(parse_i64_loose(b"+1"), None);
        assert_eq!(parse_i64_loose(b"x"), None);
    }
    #[test]
    fn repr_roundtrip() {
        for v in [
            0,
            1,
            -1,
            9,
            10,
            99,
            100,
            1024,
            -1024,
            i64::MAX,
            i64::MIN,
        ] {
            let mut r = IntegerRepr::new();
            assert_eq!(r.as_bytes(v), v.to_string().as_bytes());
            assert_eq!(parse_i64(&r.as_bytes(v).to_vec()), Some(v));
        }
    }
}
