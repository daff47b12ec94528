//! Facet holder: one winning facet per facet type
//!
//! All precedence decisions are made here, not in the factories:
//!
//! - no facet of that type yet → added
//! - higher precedence than the current winner → replaces it
//! - equal precedence → kept out, unless the newcomer is a replacement
//! - lower precedence → kept out
//!
//! Contributions that are kept out are recorded as [`RejectedFacet`]s for
//! diagnostics; they are never errors.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use super::{Facet, FacetKind, FacetType};
use crate::feature::FeatureIdentifier;

/// Why a contribution was kept out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The current winner has higher precedence
    LowerPrecedence,
    /// Same precedence, and the newcomer is not a replacement
    EqualPrecedence,
    /// Same precedence and same meaning as the current winner
    Equivalent,
}

/// A contribution that lost against the current winner
#[derive(Debug, Clone)]
pub struct RejectedFacet {
    /// The facet that was kept out
    pub facet: Arc<Facet>,
    /// The winner at the time
    pub existing: Arc<Facet>,
    /// Why it lost
    pub reason: RejectionReason,
}

/// Result of [`FacetHolder::add`]
#[derive(Debug, Clone)]
pub enum AddOutcome {
    /// First facet of its type
    Added,
    /// Replaced the previous winner, which is returned
    Replaced(Arc<Facet>),
    /// Kept out
    Rejected(RejectionReason),
}

/// A feature's winning facets
#[derive(Debug, Clone)]
pub struct FacetHolder {
    identifier: FeatureIdentifier,
    facets: BTreeMap<FacetType, Arc<Facet>>,
    rejected: Vec<RejectedFacet>,
}

impl FacetHolder {
    /// Create an empty holder for a feature
    pub fn new(identifier: FeatureIdentifier) -> Self {
        Self {
            identifier,
            facets: BTreeMap::new(),
            rejected: Vec::new(),
        }
    }

    /// Feature this holder belongs to
    pub fn identifier(&self) -> &FeatureIdentifier {
        &self.identifier
    }

    /// Offer a facet to the holder
    pub fn add(&mut self, facet: Facet) -> AddOutcome {
        let facet_type = facet.facet_type();
        let facet = facet.attach(self.identifier.clone());

        let rejection = self.facets.get(&facet_type).and_then(|existing| {
            let reason = match facet.precedence().cmp(&existing.precedence()) {
                Ordering::Greater => return None,
                Ordering::Less => RejectionReason::LowerPrecedence,
                Ordering::Equal if facet.is_replacement() => return None,
                Ordering::Equal if facet.semantics_equal(existing) => RejectionReason::Equivalent,
                Ordering::Equal => RejectionReason::EqualPrecedence,
            };
            Some((reason, existing.clone()))
        });

        match rejection {
            None => match self.facets.insert(facet_type, facet) {
                Some(previous) => AddOutcome::Replaced(previous),
                None => AddOutcome::Added,
            },
            Some((reason, existing)) => {
                trace!(
                    feature = %self.identifier,
                    facet_type = %facet_type,
                    existing = existing.origin(),
                    rejected = facet.origin(),
                    ?reason,
                    "Facet contribution rejected"
                );
                self.rejected.push(RejectedFacet {
                    facet,
                    existing,
                    reason,
                });
                AddOutcome::Rejected(reason)
            }
        }
    }

    /// Winning facet of a type
    pub fn get(&self, facet_type: FacetType) -> Option<&Arc<Facet>> {
        self.facets.get(&facet_type)
    }

    /// Payload of the winning facet of a type
    pub fn kind(&self, facet_type: FacetType) -> Option<&FacetKind> {
        self.facets.get(&facet_type).map(|f| f.kind())
    }

    /// Whether a facet of the type is present
    pub fn contains(&self, facet_type: FacetType) -> bool {
        self.facets.contains_key(&facet_type)
    }

    /// Winning facets in facet-type order
    pub fn facets(&self) -> impl Iterator<Item = &Arc<Facet>> {
        self.facets.values()
    }

    /// Number of winning facets
    pub fn len(&self) -> usize {
        self.facets.len()
    }

    /// Whether the holder has no facets
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Contributions that lost, in the order they were offered
    pub fn rejected(&self) -> &[RejectedFacet] {
        &self.rejected
    }

    /// Whether the feature is hidden
    pub fn is_hidden(&self) -> bool {
        matches!(
            self.kind(FacetType::Visibility),
            Some(FacetKind::Visibility { hidden: true, .. })
        )
    }

    /// Whether the feature is editable (no mutability facet means editable)
    pub fn is_editable(&self) -> bool {
        !matches!(
            self.kind(FacetType::Mutability),
            Some(FacetKind::Mutability { editable: false, .. })
        )
    }

    /// Maximum length, if any
    pub fn max_length(&self) -> Option<u32> {
        match self.kind(FacetType::MaxLength) {
            Some(FacetKind::MaxLength(len)) => Some(*len),
            _ => None,
        }
    }

    /// Display name, if any
    pub fn named(&self) -> Option<&str> {
        match self.kind(FacetType::Named) {
            Some(FacetKind::Named { name }) => Some(name),
            _ => None,
        }
    }
}
