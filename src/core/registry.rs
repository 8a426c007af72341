//! Registry of the opaque handle types exposed by a C API.
//!
//! The registry is closed: it is built once from configuration before any
//! function is classified and is read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::model::errors::BindError;

/// An opaque handle type such as `Atom` (`CHFL_ATOM*` on the C side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaqueType {
    /// Binding-facing name, e.g. `Atom`
    pub name: String,
    /// Struct name used in C argument types, e.g. `CHFL_ATOM`
    pub c_name: String,
    /// Function name component after the API prefix, e.g. `atom`
    pub prefix: String,
}

impl OpaqueType {
    /// Create a type with the conventional C name and prefix for `api_prefix`.
    pub fn new(name: impl Into<String>, api_prefix: &str) -> Self {
        let name = name.into();
        let prefix = snake_case(&name);
        let c_name = format!("{}{}", api_prefix, prefix).to_uppercase();
        OpaqueType {
            name,
            c_name,
            prefix,
        }
    }

    /// Override the C struct name.
    pub fn with_c_name(mut self, c_name: impl Into<String>) -> Self {
        self.c_name = c_name.into();
        self
    }

    /// Override the function name component.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// The closed set of opaque types, with the API-wide function prefix.
#[derive(Debug, Clone)]
pub struct OpaqueRegistry {
    api_prefix: String,
    types: Vec<OpaqueType>,
    property: Option<usize>,
}

impl OpaqueRegistry {
    /// Build a registry, rejecting types that would claim the same prefix.
    pub fn new(api_prefix: impl Into<String>, types: Vec<OpaqueType>) -> Result<Self, BindError> {
        let api_prefix = api_prefix.into();

        for (i, ty) in types.iter().enumerate() {
            if let Some(other) = types[..i].iter().find(|o| o.prefix == ty.prefix) {
                return Err(BindError::AmbiguousPrefix {
                    prefix: format!("{}{}", api_prefix, ty.prefix),
                    first: other.name.clone(),
                    second: ty.name.clone(),
                });
            }
        }

        Ok(OpaqueRegistry {
            api_prefix,
            types,
            property: None,
        })
    }

    /// Mark one registered type as the target of property accessors.
    ///
    /// Returns `None` when no type of that name is registered.
    pub fn with_property_type(mut self, name: &str) -> Option<Self> {
        let index = self.types.iter().position(|t| t.name == name)?;
        self.property = Some(index);
        Some(self)
    }

    /// The API-wide function prefix, e.g. `chfl_`.
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Registered types, in registration order.
    pub fn types(&self) -> &[OpaqueType] {
        &self.types
    }

    /// The property type, if property accessors are enabled.
    pub fn property_type(&self) -> Option<&OpaqueType> {
        self.property.map(|i| &self.types[i])
    }

    /// Find a type by binding-facing name.
    pub fn get(&self, name: &str) -> Option<&OpaqueType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Find a type by its C struct name.
    pub fn by_c_name(&self, c_name: &str) -> Option<&OpaqueType> {
        self.types.iter().find(|t| t.c_name == c_name)
    }

    /// Full function prefix of a type, e.g. `chfl_atom`.
    pub fn function_prefix(&self, ty: &OpaqueType) -> String {
        format!("{}{}", self.api_prefix, ty.prefix)
    }

    /// Longest registered prefix of `function`, on a `_` boundary or the
    /// end of the name. Returns the type and the remainder after the `_`.
    pub fn match_prefix<'f>(&self, function: &'f str) -> Option<(&OpaqueType, &'f str)> {
        let rest = function.strip_prefix(self.api_prefix.as_str())?;

        self.types
            .iter()
            .filter_map(|ty| {
                let tail = rest.strip_prefix(ty.prefix.as_str())?;
                if tail.is_empty() {
                    Some((ty, tail))
                } else {
                    tail.strip_prefix('_').map(|member| (ty, member))
                }
            })
            .max_by_key(|(ty, _)| ty.prefix.len())
    }
}

/// Convert `UnitCell` to `unit_cell`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
