//! Encoder.
//!
//! Output is deterministic: heads use the shortest argument width, integers
//! beyond 64 bits become bignum tags, and floats keep the width they carry.

use crate::item::{Float, Int, Item, TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM};

const MAJOR_UNSIGNED: u8 = 0;
const MAJOR_NEGATIVE: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;

const FALSE: u8 = 0xf4;
const TRUE: u8 = 0xf5;
const NULL: u8 = 0xf6;
const FLOAT16: u8 = 0xf9;
const FLOAT32: u8 = 0xfa;
const FLOAT64: u8 = 0xfb;

/// Encode one item to a fresh buffer.
pub fn encode(item: &Item) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

/// Append the encoding of `item` to `out`.
pub fn encode_into(item: &Item, out: &mut Vec<u8>) {
    match item {
        Item::Null => out.push(NULL),
        Item::Bool(false) => out.push(FALSE),
        Item::Bool(true) => out.push(TRUE),
        Item::Integer(int) => write_int(*int, out),
        Item::Float(float) => write_float(*float, out),
        Item::Text(s) => {
            write_head(MAJOR_TEXT, s.len() as u64, out);
            out.extend_from_slice(s.as_bytes());
        }
        Item::Bytes(bytes) => {
            write_head(MAJOR_BYTES, bytes.len() as u64, out);
            out.extend_from_slice(bytes);
        }
        Item::Array(items) => {
            write_head(MAJOR_ARRAY, items.len() as u64, out);
            for item in items {
                encode_into(item, out);
            }
        }
        Item::Map(entries) => {
            write_head(MAJOR_MAP, entries.len() as u64, out);
            for (key, value) in entries {
                encode_into(key, out);
                encode_into(value, out);
            }
        }
        Item::Tagged { tag, item } => {
            write_head(MAJOR_TAG, *tag, out);
            encode_into(item, out);
        }
    }
}

fn write_head(major: u8, arg: u64, out: &mut Vec<u8>) {
    let major = major << 5;
    if arg < 24 {
        out.push(major | arg as u8);
    } else if arg <= u8::MAX as u64 {
        out.push(major | 24);
        out.push(arg as u8);
    } else if arg <= u16::MAX as u64 {
        out.push(major | 25);
        out.extend_from_slice(&(arg as u16).to_be_bytes());
    } else if arg <= u32::MAX as u64 {
        out.push(major | 26);
        out.extend_from_slice(&(arg as u32).to_be_bytes());
    } else {
        out.push(major | 27);
        out.extend_from_slice(&arg.to_be_bytes());
    }
}

fn write_int(int: Int, out: &mut Vec<u8>) {
    let major = if int.negative {
        MAJOR_NEGATIVE
    } else {
        MAJOR_UNSIGNED
    };
    if !int.is_big() {
        write_head(major, int.magnitude as u64, out);
        return;
    }

    let tag = if int.negative {
        TAG_NEGATIVE_BIGNUM
    } else {
        TAG_POSITIVE_BIGNUM
    };
    let bytes = int.magnitude.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    write_head(MAJOR_TAG, tag, out);
    write_head(MAJOR_BYTES, (bytes.len() - first) as u64, out);
    out.extend_from_slice(&bytes[first..]);
}

fn write_float(float: Float, out: &mut Vec<u8>) {
    match float {
        Float::F16(v) => {
            out.push(FLOAT16);
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
        Float::F32(v) => {
            out.push(FLOAT32);
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
        Float::F64(v) => {
            out.push(FLOAT64);
            out.extend_from_slice(&v.to_bits().to_be_bytes());
        }
    }
}
