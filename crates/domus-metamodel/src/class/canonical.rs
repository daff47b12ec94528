//! Class canonicalization
//!
//! Maps a runtime class (enum constant body, proxy, persistence-enhanced
//! subtype) back to the domain class it stands for. Results are memoized;
//! the memo never changes an answer, it only skips the descriptor walk.

use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::sync::Arc;

use super::{ClassName, ClassOrigin, ClassSource};
use crate::error::{MetaModelError, MetaModelResult};

/// Resolves runtime classes to canonical domain classes
pub struct ClassCanonicalizer {
    source: Arc<dyn ClassSource>,
    memo: DashMap<ClassName, ClassName>,
}

impl ClassCanonicalizer {
    /// Create a canonicalizer reading descriptors from `source`
    pub fn new(source: Arc<dyn ClassSource>) -> Self {
        Self {
            source,
            memo: DashMap::new(),
        }
    }

    /// Canonicalize a class
    ///
    /// Enum constant bodies resolve to their enum, proxies and enhanced
    /// subtypes to the class they wrap (repeatedly, so a proxy of an enhanced
    /// class lands on the domain class). Unknown and declared classes are
    /// returned unchanged. Fails only when a wrapper chain loops.
    pub fn canonicalize(&self, class: &ClassName) -> MetaModelResult<ClassName> {
        if let Some(hit) = self.memo.get(class) {
            return Ok(hit.clone());
        }

        let mut current = class.clone();
        let mut seen = FxHashSet::default();
        seen.insert(current.clone());

        while let Some(desc) = self.source.describe(&current) {
            let next = match &desc.origin {
                ClassOrigin::Declared => break,
                ClassOrigin::EnumConstantBody { enum_class } => enum_class.clone(),
                ClassOrigin::Proxy { target } | ClassOrigin::Enhanced { target } => target.clone(),
            };
            if !seen.insert(next.clone()) {
                return Err(MetaModelError::CanonicalizationCycle {
                    class: class.clone(),
                    repeated: next,
                });
            }
            current = next;
        }

        self.memo.insert(class.clone(), current.clone());
        Ok(current)
    }

    /// Whether an instance of `runtime` may be treated as a `target`
    ///
    /// True when the canonical form of `runtime` is `target` or has `target`
    /// in its superclass chain.
    pub fn is_assignable(&self, runtime: &ClassName, target: &ClassName) -> MetaModelResult<bool> {
        let canonical = self.canonicalize(runtime)?;
        if &canonical == target {
            return Ok(true);
        }
        Ok(self.source.superclasses(&canonical).iter().any(|c| c == target))
    }

    /// Number of memoized classes
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    /// Forget all memoized results
    pub fn clear(&self) {
        self.memo.clear();
    }
}
