// Translation between symbolic foreign references and remote identities.
//
// Symbolic form is what callers hold (strings from config or user input);
// typed form is `ForeignRef`. Non-positive and empty input means "no
// reference" and is left out of requests. Anything that is not an integer
// is an `InvalidReference` error, never silently dropped.

use aapctl_api::{ForeignRef, Resource, ResourceId, ResourceKind};
use tracing::trace;

use crate::error::CoreError;

/// Stateless reference translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Symbolic → typed.
    pub fn parse(raw: &str) -> ForeignRef {
        match raw.parse() {
            Ok(r) => r,
            Err(never) => match never {},
        }
    }

    /// Typed → concrete identity. `Ok(None)` means the field is left unset.
    pub fn resolve(
        kind: ResourceKind,
        field: &str,
        reference: &ForeignRef,
    ) -> Result<Option<ResourceId>, CoreError> {
        match reference {
            ForeignRef::Ref(id) => Ok(Some(*id)),
            ForeignRef::Unset => {
                trace!(%kind, field, "reference unset, omitted");
                Ok(None)
            }
            ForeignRef::Invalid(raw) => Err(CoreError::InvalidReference {
                kind,
                field: field.to_owned(),
                raw: raw.clone(),
            }),
        }
    }

    /// Parse and resolve in one step.
    pub fn resolve_str(
        kind: ResourceKind,
        field: &str,
        raw: &str,
    ) -> Result<Option<ResourceId>, CoreError> {
        Self::resolve(kind, field, &Self::parse(raw))
    }

    /// Fail on the first malformed reference of `record`.
    pub fn check<T: Resource>(record: &T) -> Result<(), CoreError> {
        for (field, reference) in record.references() {
            Self::resolve(T::KIND, field, reference)?;
        }
        Ok(())
    }

    /// Typed → symbolic, empty for an unset reference.
    pub fn symbolize(reference: &ForeignRef) -> String {
        reference.to_string()
    }
}
