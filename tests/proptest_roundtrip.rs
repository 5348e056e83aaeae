//! Property-based checks for Invariant 1 (§8): for any legal value and
//! any buffer with enough capacity, `write` then `seek(0)` then `read`
//! reproduces the value bit-for-bit, and the position after writing
//! equals the position after reading it back.

use picoframe::serializer::{
    read_bytes, read_primitive, read_string_inline, read_var_array_inline, write_bytes,
    write_primitive, write_string, write_var_array,
};
use picoframe::Buffer;
use proptest::prelude::*;

proptest! {
    #[test]
    fn i32_round_trips(v in any::<i32>()) {
        let mut storage = [0u8; 4];
        {
            let mut buf = Buffer::new(&mut storage);
            write_primitive(&mut buf, v).unwrap();
            prop_assert_eq!(buf.pos(), 4);
        }
        let mut buf = Buffer::new(&mut storage);
        let got: i32 = read_primitive(&mut buf).unwrap();
        prop_assert_eq!(got, v);
        prop_assert_eq!(buf.pos(), 4);
    }

    #[test]
    fn f64_round_trips_bit_for_bit(v in any::<u64>()) {
        // drive from raw bits so NaN payloads are covered too -
        // `f64::from_bits`/`to_bits` compare bit-for-bit, unlike `==`
        // which treats all NaNs as unequal to everything.
        let v = f64::from_bits(v);
        let mut storage = [0u8; 8];
        {
            let mut buf = Buffer::new(&mut storage);
            write_primitive(&mut buf, v).unwrap();
        }
        let mut buf = Buffer::new(&mut storage);
        let got: f64 = read_primitive(&mut buf).unwrap();
        prop_assert_eq!(got.to_bits(), v.to_bits());
    }

    #[test]
    fn variable_byte_blob_round_trips(data in prop::collection::vec(any::<u8>(), 0..32)) {
        let mut storage = [0u8; 40];
        let write_pos = {
            let mut buf = Buffer::new(&mut storage);
            write_bytes(&mut buf, &data).unwrap();
            buf.pos()
        };
        let mut buf = Buffer::new(&mut storage);
        let out: heapless::Vec<u8, 32> = read_bytes(&mut buf).unwrap();
        prop_assert_eq!(out.as_slice(), data.as_slice());
        prop_assert_eq!(buf.pos(), write_pos);
    }

    #[test]
    fn variable_u16_array_round_trips(data in prop::collection::vec(any::<u16>(), 0..16)) {
        let mut storage = [0u8; 64];
        let write_pos = {
            let mut buf = Buffer::new(&mut storage);
            write_var_array::<u8, u16>(&mut buf, &data).unwrap();
            buf.pos()
        };
        let mut buf = Buffer::new(&mut storage);
        let out: heapless::Vec<u16, 16> = read_var_array_inline::<u8, u16, 16>(&mut buf).unwrap();
        prop_assert_eq!(out.as_slice(), data.as_slice());
        prop_assert_eq!(buf.pos(), write_pos);
    }

    #[test]
    fn ascii_string_round_trips(s in "[a-zA-Z0-9 ]{0,20}") {
        let mut storage = [0u8; 32];
        let write_pos = {
            let mut buf = Buffer::new(&mut storage);
            write_string(&mut buf, &s).unwrap();
            buf.pos()
        };
        let mut buf = Buffer::new(&mut storage);
        let out: heapless::String<24> = read_string_inline(&mut buf).unwrap();
        prop_assert_eq!(out.as_str(), s.as_str());
        prop_assert_eq!(buf.pos(), write_pos);
    }
}
