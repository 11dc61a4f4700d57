//! Symbol re-export between namespaces
//!
//! Re-export copies bindings by handle, never by value: after the copy
//! both names denote the same underlying object, and rebinding one side
//! later does not touch the other. A re-export either applies completely
//! or leaves the target untouched.

use sdk::errors::HostError;
use sdk::symbol::Namespace;

/// Which names to copy from the source namespace
#[derive(Debug, Clone)]
pub enum ReexportNames {
    /// Every name the source declares public
    Wildcard,
    /// An explicit list of names
    Explicit(Vec<String>),
}

impl ReexportNames {
    /// Convenience constructor for an explicit list
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(names.into_iter().map(Into::into).collect())
    }
}

/// Copy bindings named by `names` from `source` into `target`.
///
/// All requested names are validated against the source before anything is
/// copied, so a failure leaves the target exactly as it was. The copied
/// names are declared public in the target. Returns the number of copied
/// bindings.
///
/// # Errors
///
/// [`HostError::MissingSymbol`] naming the first requested name absent
/// from the source, in request order.
pub fn reexport(
    target: &mut Namespace,
    source: &Namespace,
    names: &ReexportNames,
) -> Result<usize, HostError> {
    let requested: Vec<&str> = match names {
        ReexportNames::Wildcard => source.public_names().iter().map(String::as_str).collect(),
        ReexportNames::Explicit(list) => list.iter().map(String::as_str).collect(),
    };

    for name in &requested {
        if !source.contains(name) {
            return Err(HostError::MissingSymbol((*name).to_string()));
        }
    }

    for name in &requested {
        if let Some(symbol) = source.get(name) {
            target.bind_public(*name, symbol.clone());
        }
    }

    tracing::debug!(
        "Re-exported {} symbol(s) from '{}' into '{}'",
        requested.len(),
        source.name(),
        target.name()
    );
    Ok(requested.len())
}
