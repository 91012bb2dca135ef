//! Encoder/decoder strategies.
//!
//! [`Codecs`] owns one cache for a provider; each [`Codec`] is a cheap view
//! of one cached strategy. Build errors are returned once by
//! [`Codecs::build`] and again, unchanged, for every later request for the
//! same type.

mod decode;
mod encode;
mod node;


pub use node::{CodecFactory, CodecNode};

use shapeforge_core::{ShapeProvider, TypeId, Value};
use shapeforge_wire::Item;

use crate::cache::{Slot, StrategyCache};
use crate::error::{BuildError, DecodeError, EncodeError};
use crate::limits::Limits;
use crate::trace::{NoopTracer, Tracer};
use crate::visitor::{Visitor, seed_leaves};

use decode::Decoder;
use encode::Encoder;

/// Codec session over one shape provider.
pub struct Codecs<'p, P> {
    provider: &'p P,
    cache: StrategyCache<CodecNode>,
    limits: Limits,
}

impl<'p, P: ShapeProvider> Codecs<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self::with_limits(provider, Limits::default())
    }

    pub fn with_limits(provider: &'p P, limits: Limits) -> Self {
        let mut cache = StrategyCache::new();
        seed_leaves(&mut cache, &CodecFactory);
        Self {
            provider,
            cache,
            limits,
        }
    }

    /// Synthesize (or fetch) the codec for `type_id`.
    pub fn build(&mut self, type_id: TypeId) -> Result<Codec<'_>, BuildError> {
        let slot = self.resolve(type_id)?;
        Ok(self.codec(slot))
    }

    /// Synthesize (or fetch) the codec for `type_id`, returning its slot.
    pub fn resolve(&mut self, type_id: TypeId) -> Result<Slot, BuildError> {
        self.resolve_with(type_id, &mut NoopTracer)
    }

    pub fn resolve_with<T: Tracer>(
        &mut self,
        type_id: TypeId,
        tracer: &mut T,
    ) -> Result<Slot, BuildError> {
        let mut visitor = Visitor::new(
            self.provider,
            &CodecFactory,
            &mut self.cache,
            tracer,
            self.limits,
        );
        visitor.resolve(type_id)
    }

    /// View of the codec stored in `slot`.
    pub fn codec(&self, slot: Slot) -> Codec<'_> {
        Codec {
            cache: &self.cache,
            slot,
            limits: self.limits,
        }
    }

    pub fn cache(&self) -> &StrategyCache<CodecNode> {
        &self.cache
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }
}

/// Encoder/decoder pair for one type.
#[derive(Clone, Copy)]
pub struct Codec<'c> {
    cache: &'c StrategyCache<CodecNode>,
    slot: Slot,
    limits: Limits,
}

impl<'c> Codec<'c> {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn encode(&self, value: &Value) -> Result<Item, EncodeError> {
        Encoder::new(self.cache, self.limits.decode_depth).encode(self.slot, value, 0)
    }

    pub fn decode(&self, item: &Item) -> Result<Value, DecodeError> {
        Decoder::new(self.cache, self.limits.decode_depth).decode(self.slot, item, 0)
    }

    pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        Ok(shapeforge_wire::encode(&self.encode(value)?))
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let item = shapeforge_wire::decode_with_limit(bytes, self.limits.decode_depth)?;
        self.decode(&item)
    }
}
