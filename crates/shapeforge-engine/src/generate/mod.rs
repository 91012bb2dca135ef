//! Random value generators.
//!
//! Generation threads a size budget through the strategy tree; see
//! [`crate::size`] for how it shrinks. A generator holds no random state:
//! callers pass the source on every call, so one generator can serve several
//! threads each with its own source.

mod draw;
mod node;


pub use node::{GenNode, GeneratorFactory};

use rand::Rng;
use shapeforge_core::{ShapeProvider, TypeId, Value};

use crate::cache::{Slot, StrategyCache};
use crate::error::{BuildError, GenerateError};
use crate::limits::Limits;
use crate::trace::{NoopTracer, Tracer};
use crate::visitor::{Visitor, seed_leaves};

use draw::Drawer;

/// Generator session over one shape provider.
pub struct Generators<'p, P> {
    provider: &'p P,
    cache: StrategyCache<GenNode>,
    limits: Limits,
}

impl<'p, P: ShapeProvider> Generators<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self::with_limits(provider, Limits::default())
    }

    pub fn with_limits(provider: &'p P, limits: Limits) -> Self {
        let mut cache = StrategyCache::new();
        seed_leaves(&mut cache, &GeneratorFactory);
        Self {
            provider,
            cache,
            limits,
        }
    }

    pub fn build(&mut self, type_id: TypeId) -> Result<Generator<'_>, BuildError> {
        let slot = self.resolve(type_id)?;
        Ok(self.generator(slot))
    }

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
            &GeneratorFactory,
            &mut self.cache,
            tracer,
            self.limits,
        );
        visitor.resolve(type_id)
    }

    pub fn generator(&self, slot: Slot) -> Generator<'_> {
        Generator {
            cache: &self.cache,
            slot,
            limits: self.limits,
        }
    }

    pub fn cache(&self) -> &StrategyCache<GenNode> {
        &self.cache
    }
}

/// Random value source for one type.
#[derive(Clone, Copy)]
pub struct Generator<'c> {
    cache: &'c StrategyCache<GenNode>,
    slot: Slot,
    limits: Limits,
}

impl<'c> Generator<'c> {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Draw one value with the given size budget.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, size: u32) -> Result<Value, GenerateError> {
        Drawer::new(self.cache).draw(self.slot, rng, size)
    }

    /// Draw one value with [`Limits::default_size`].
    pub fn generate_default<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Value, GenerateError> {
        self.generate(rng, self.limits.default_size)
    }
}
