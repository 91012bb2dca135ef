//! Tracing for strategy synthesis.
//!
//! # Zero-cost by default
//!
//! The visitor is generic over [`Tracer`]. With `NoopTracer` every method is
//! an `#[inline(always)]` empty body, so the calls and their arguments are
//! compiled out. [`PrintTracer`] collects an indented log of the session,
//! one line per decision, for debugging and snapshot tests.
//!
//! Names are passed in by the visitor; the tracer never queries the provider.

use shapeforge_core::{Kind, TypeId};

use crate::cache::Slot;
use crate::error::BuildError;
use crate::resolve::PolicyKind;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Visits, recursive references, construction choices and failures.
    #[default]
    Default,
    /// Also placeholders, cache hits and finalization.
    Verbose,
}

/// Instrumentation hooks called by the visitor.
///
/// - `trace_visit` - a type is being classified (cache miss)
/// - `trace_cache_hit` - a finished or failed entry was reused
/// - `trace_placeholder` - a pending slot was registered
/// - `trace_recursive_ref` - a pending slot was re-entered (cycle)
/// - `trace_constructor` - object construction was decided
/// - `trace_collection` - container policy was decided
/// - `trace_finalize` / `trace_failure` - a visit finished
pub trait Tracer {
    fn trace_visit(&mut self, type_id: TypeId, name: &str, kind: Kind);

    fn trace_cache_hit(&mut self, type_id: TypeId, name: &str);

    fn trace_placeholder(&mut self, type_id: TypeId, slot: Slot);

    fn trace_recursive_ref(&mut self, type_id: TypeId, name: &str);

    /// `arity` is `None` when the object falls back to a default instance.
    fn trace_constructor(&mut self, type_id: TypeId, name: &str, arity: Option<usize>);

    fn trace_collection(&mut self, type_id: TypeId, name: &str, policy: PolicyKind);

    fn trace_finalize(&mut self, type_id: TypeId, name: &str);

    fn trace_failure(&mut self, type_id: TypeId, name: &str, error: &BuildError);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_visit(&mut self, _type_id: TypeId, _name: &str, _kind: Kind) {}

    #[inline(always)]
    fn trace_cache_hit(&mut self, _type_id: TypeId, _name: &str) {}

    #[inline(always)]
    fn trace_placeholder(&mut self, _type_id: TypeId, _slot: Slot) {}

    #[inline(always)]
    fn trace_recursive_ref(&mut self, _type_id: TypeId, _name: &str) {}

    #[inline(always)]
    fn trace_constructor(&mut self, _type_id: TypeId, _name: &str, _arity: Option<usize>) {}

    #[inline(always)]
    fn trace_collection(&mut self, _type_id: TypeId, _name: &str, _policy: PolicyKind) {}

    #[inline(always)]
    fn trace_finalize(&mut self, _type_id: TypeId, _name: &str) {}

    #[inline(always)]
    fn trace_failure(&mut self, _type_id: TypeId, _name: &str, _error: &BuildError) {}
}

/// Tracer that collects an indented synthesis log.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
    /// Nesting of open visits.
    depth: usize,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected log joined by newlines.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn push(&mut self, content: String) {
        let indent = self.depth.saturating_sub(1) * 2;
        self.lines.push(format!("{:indent$}{content}", ""));
    }

    fn verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }
}

impl Tracer for PrintTracer {
    fn trace_visit(&mut self, _type_id: TypeId, name: &str, kind: Kind) {
        self.push(format!("{name} ({})", kind.name()));
    }

    fn trace_cache_hit(&mut self, _type_id: TypeId, name: &str) {
        if self.verbose() {
            self.depth += 1;
            self.push(format!("{name} (cached)"));
            self.depth -= 1;
        }
    }

    fn trace_placeholder(&mut self, type_id: TypeId, slot: Slot) {
        self.depth += 1;
        if self.verbose() {
            self.push(format!("slot {} <- type {}", slot.index(), type_id.0));
        }
    }

    fn trace_recursive_ref(&mut self, _type_id: TypeId, name: &str) {
        self.depth += 1;
        self.push(format!("{name} (recursive)"));
        self.depth -= 1;
    }

    fn trace_constructor(&mut self, _type_id: TypeId, _name: &str, arity: Option<usize>) {
        match arity {
            Some(arity) => self.push(format!("  constructor/{arity}")),
            None => self.push("  default instance".to_owned()),
        }
    }

    fn trace_collection(&mut self, _type_id: TypeId, _name: &str, policy: PolicyKind) {
        self.push(format!("  {}", policy.name()));
    }

    fn trace_finalize(&mut self, _type_id: TypeId, name: &str) {
        if self.verbose() {
            self.push(format!("done {name}"));
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn trace_failure(&mut self, _type_id: TypeId, name: &str, error: &BuildError) {
        self.push(format!("failed {name}: {error}"));
        self.depth = self.depth.saturating_sub(1);
    }
}
