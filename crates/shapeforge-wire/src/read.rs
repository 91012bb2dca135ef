//! Decoder.
//!
//! Only definite-length items are accepted. Bignum tags small enough to fit
//! in 128 bits are folded back into [`Item::Integer`]; larger ones stay
//! tagged byte strings.

use half::f16;

use crate::error::WireError;
use crate::item::{Float, Int, Item, TAG_NEGATIVE_BIGNUM, TAG_POSITIVE_BIGNUM};

/// Default nesting limit for [`decode`].
pub const DEFAULT_MAX_DEPTH: u32 = 512;

/// Decode exactly one item from `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Item, WireError> {
    decode_with_limit(bytes, DEFAULT_MAX_DEPTH)
}

/// Decode exactly one item, failing past `max_depth` nested containers.
pub fn decode_with_limit(bytes: &[u8], max_depth: u32) -> Result<Item, WireError> {
    let mut reader = Reader {
        bytes,
        pos: 0,
        max_depth,
    };
    let item = reader.item(0)?;
    let rest = bytes.len() - reader.pos;
    if rest > 0 {
        return Err(WireError::TrailingBytes(rest));
    }
    Ok(item)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    max_depth: u32,
}

impl<'a> Reader<'a> {
    fn byte(&mut self) -> Result<u8, WireError> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(WireError::UnexpectedEof(self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(WireError::UnexpectedEof(self.bytes.len()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    /// Read the argument encoded by `info` (the head's low five bits).
    fn argument(&mut self, info: u8, head: u8, offset: usize) -> Result<u64, WireError> {
        match info {
            0..=23 => Ok(info as u64),
            24 => Ok(self.byte()? as u64),
            25 => Ok(u16::from_be_bytes(self.array()?) as u64),
            26 => Ok(u32::from_be_bytes(self.array()?) as u64),
            27 => Ok(u64::from_be_bytes(self.array()?)),
            _ => Err(WireError::Unsupported { byte: head, offset }),
        }
    }

    fn length(&mut self, info: u8, head: u8, offset: usize) -> Result<usize, WireError> {
        let len = self.argument(info, head, offset)?;
        usize::try_from(len).map_err(|_| WireError::LengthOverflow(len))
    }

    fn item(&mut self, depth: u32) -> Result<Item, WireError> {
        if depth > self.max_depth {
            return Err(WireError::DepthExceeded(self.max_depth));
        }

        let offset = self.pos;
        let head = self.byte()?;
        let major = head >> 5;
        let info = head & 0x1f;

        match major {
            0 => {
                let v = self.argument(info, head, offset)?;
                Ok(Item::Integer(Int::from(v)))
            }
            1 => {
                let v = self.argument(info, head, offset)?;
                Ok(Item::Integer(Int {
                    negative: true,
                    magnitude: v as u128,
                }))
            }
            2 => {
                let len = self.length(info, head, offset)?;
                Ok(Item::Bytes(self.take(len)?.to_vec()))
            }
            3 => {
                let len = self.length(info, head, offset)?;
                let start = self.pos;
                let raw = self.take(len)?;
                let text = std::str::from_utf8(raw).map_err(|_| WireError::InvalidUtf8(start))?;
                Ok(Item::Text(text.to_owned()))
            }
            4 => {
                let len = self.length(info, head, offset)?;
                // Every item takes at least one byte; cap the reservation.
                let mut items = Vec::with_capacity(len.min(self.bytes.len() - self.pos));
                for _ in 0..len {
                    items.push(self.item(depth + 1)?);
                }
                Ok(Item::Array(items))
            }
            5 => {
                let len = self.length(info, head, offset)?;
                let mut entries = Vec::with_capacity(len.min(self.bytes.len() - self.pos));
                for _ in 0..len {
                    let key = self.item(depth + 1)?;
                    let value = self.item(depth + 1)?;
                    entries.push((key, value));
                }
                Ok(Item::Map(entries))
            }
            6 => {
                let tag = self.argument(info, head, offset)?;
                let item = self.item(depth + 1)?;
                Ok(fold_bignum(tag, item))
            }
            _ => self.simple(info, head, offset),
        }
    }

    fn simple(&mut self, info: u8, head: u8, offset: usize) -> Result<Item, WireError> {
        match info {
            20 => Ok(Item::Bool(false)),
            21 => Ok(Item::Bool(true)),
            // undefined reads as null
            22 | 23 => Ok(Item::Null),
            25 => {
                let bits = u16::from_be_bytes(self.array()?);
                Ok(Item::Float(Float::F16(f16::from_bits(bits))))
            }
            26 => {
                let bits = u32::from_be_bytes(self.array()?);
                Ok(Item::Float(Float::F32(f32::from_bits(bits))))
            }
            27 => {
                let bits = u64::from_be_bytes(self.array()?);
                Ok(Item::Float(Float::F64(f64::from_bits(bits))))
            }
            _ => Err(WireError::Unsupported { byte: head, offset }),
        }
    }
}

fn fold_bignum(tag: u64, item: Item) -> Item {
    let negative = match tag {
        TAG_POSITIVE_BIGNUM => false,
        TAG_NEGATIVE_BIGNUM => true,
        _ => return Item::tagged(tag, item),
    };
    let Item::Bytes(bytes) = &item else {
        return Item::tagged(tag, item);
    };

    let significant = bytes.iter().skip_while(|&&b| b == 0).count();
    if significant > 16 {
        return Item::tagged(tag, item);
    }
    let magnitude = bytes
        .iter()
        .fold(0u128, |acc, &b| (acc << 8) | b as u128);
    Item::Integer(Int {
        negative,
        magnitude,
    })
}
