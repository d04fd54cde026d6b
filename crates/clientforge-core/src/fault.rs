//! Fault resolution.
//!
//! Operations may declare the same fault type many times. The resolver folds
//! those declarations into one entry per declared fault type, decides whether
//! the fault needs a synthesized carrier bean, and orders the result by
//! resolved identifier so repeated runs produce the same sequence.

use crate::error::ModelIntegrityError;
use crate::model::{Declared, FaultCarrier, FaultMessage};
use crate::naming::NameResolver;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// A distinct fault type with its carrier resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFault {
    /// Resolved identifier of the fault class.
    pub fault_identifier: String,

    /// Resolved identifier of the bean carrying the fault payload.
    pub carrier_bean_identifier: String,

    /// Whether the carrier bean must be generated.
    pub is_implicit: bool,

    /// Wire element of the fault detail.
    pub element_name: String,
    pub element_namespace: String,

    /// The first declaration seen for this fault type.
    pub declaration: FaultMessage,
}

/// Folds fault declarations into an ordered set of distinct faults.
pub struct FaultResolver;

impl FaultResolver {
    /// Resolve every fault declaration observed across all operations.
    ///
    /// Declarations are keyed by declared qualified name. The first
    /// declaration of a key wins; later declarations with different content
    /// are logged and ignored. The result is sorted by fault identifier.
    pub fn resolve<'a>(
        faults: impl IntoIterator<Item = &'a FaultMessage>,
        names: &NameResolver,
    ) -> Result<Vec<ResolvedFault>, ModelIntegrityError> {
        let mut distinct: BTreeMap<&str, &FaultMessage> = BTreeMap::new();
        for fault in faults {
            let key = fault
                .declared_name()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ModelIntegrityError::MissingQualifiedName {
                    entity: fault.describe(),
                })?;
            match distinct.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(fault);
                }
                Entry::Occupied(existing) => {
                    if *existing.get() != fault {
                        tracing::warn!(
                            fault = key,
                            "fault declared more than once with different content; keeping the first declaration"
                        );
                    }
                }
            }
        }

        let mut resolved = distinct
            .into_values()
            .map(|fault| resolve_one(fault, names))
            .collect::<Result<Vec<_>, _>>()?;
        resolved.sort_by(|a, b| a.fault_identifier.cmp(&b.fault_identifier));

        check_collisions(&resolved)?;
        Ok(resolved)
    }
}

fn resolve_one(fault: &FaultMessage, names: &NameResolver) -> Result<ResolvedFault, ModelIntegrityError> {
    let fault_identifier = names.resolve_entity(fault)?;

    let (carrier_bean_identifier, is_implicit, element_name, element_namespace) = match &fault.carrier {
        FaultCarrier::Implicit { bean_name, .. } => {
            let bean = match bean_name.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => names.resolve(name)?,
                None => implicit_bean_name(&fault_identifier),
            };
            (bean, true, fault.element_name.clone(), fault.target_namespace.clone())
        }
        FaultCarrier::Explicit {
            type_name,
            element_name,
            namespace,
        } => (
            names.resolve(type_name)?,
            false,
            element_name.clone(),
            namespace.clone(),
        ),
    };

    Ok(ResolvedFault {
        fault_identifier,
        carrier_bean_identifier,
        is_implicit,
        element_name,
        element_namespace,
        declaration: fault.clone(),
    })
}

/// Default carrier bean name for an implicit fault: `<package>.jaxws.<Name>Bean`.
pub fn implicit_bean_name(fault_identifier: &str) -> String {
    match fault_identifier.rsplit_once('.') {
        Some((package, simple_name)) => format!("{package}.jaxws.{simple_name}Bean"),
        None => format!("jaxws.{fault_identifier}Bean"),
    }
}

fn check_collisions(resolved: &[ResolvedFault]) -> Result<(), ModelIntegrityError> {
    for pair in resolved.windows(2) {
        if pair[0].fault_identifier == pair[1].fault_identifier {
            return Err(ModelIntegrityError::IdentifierCollision {
                identifier: pair[0].fault_identifier.clone(),
                first: pair[0].declaration.describe(),
                second: pair[1].declaration.describe(),
            });
        }
    }

    let mut carriers: BTreeMap<&str, &ResolvedFault> = BTreeMap::new();
    for fault in resolved.iter().filter(|fault| fault.is_implicit) {
        if let Some(first) = carriers.insert(fault.carrier_bean_identifier.as_str(), fault) {
            return Err(ModelIntegrityError::IdentifierCollision {
                identifier: fault.carrier_bean_identifier.clone(),
                first: first.declaration.describe(),
                second: fault.declaration.describe(),
            });
        }
    }
    Ok(())
}
