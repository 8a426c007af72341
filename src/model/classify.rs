//! Classification of C functions into free functions and bound methods.
//!
//! Every function ends up in exactly one [`Classification`]:
//!
//! 1. names in the free-function set are [`Classification::Free`];
//! 2. property accessors are bound to the property type as `from_<kind>`;
//! 3. otherwise the longest registered type prefix binds the function, the
//!    remainder of the name becoming the member name (`init` when empty);
//! 4. functions matching nothing are [`Classification::Dropped`].

use std::collections::BTreeSet;

use serde::Serialize;

use crate::bindings::types::CFunction;
use crate::core::registry::{OpaqueRegistry, OpaqueType};

/// Member name given to a function named exactly after its type.
pub const CONSTRUCTOR: &str = "init";

/// Suffix of functions reading a property out of another handle.
const PROPERTY_GETTER_SUFFIX: &str = "get_property";

/// Outcome of classifying one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Called directly, never bound
    Free,
    /// Bound to the property type as `from_<kind>`
    PropertyBound { ty: String, kind: String },
    /// Bound to `ty` by name prefix
    PrefixBound { ty: String, member: String },
    /// Not part of the object surface
    Dropped,
}

impl Classification {
    /// The owning type and member name, for bound functions.
    pub fn binding(&self) -> Option<(&str, String)> {
        match self {
            Classification::PropertyBound { ty, kind } => Some((ty, format!("from_{}", kind))),
            Classification::PrefixBound { ty, member } => Some((ty, member.clone())),
            Classification::Free | Classification::Dropped => None,
        }
    }
}

/// A function bound to an opaque type under a short member name.
#[derive(Debug, Clone, Serialize)]
pub struct BoundMethod<'a> {
    pub name: String,
    #[serde(serialize_with = "function_name")]
    pub function: &'a CFunction,
}

/// The bound methods of one opaque type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeBinding<'a> {
    #[serde(rename = "type")]
    pub ty: &'a OpaqueType,
    pub methods: Vec<BoundMethod<'a>>,
}

/// Free functions and per-type bound methods for one header.
#[derive(Debug, Clone, Serialize)]
pub struct BindingModel<'a> {
    /// Registry order, including types without methods
    pub types: Vec<TypeBinding<'a>>,
    #[serde(serialize_with = "function_names")]
    pub free: Vec<&'a CFunction>,
    #[serde(serialize_with = "function_names")]
    pub dropped: Vec<&'a CFunction>,
    /// Classification of every input function, in input order
    #[serde(skip)]
    pub classifications: Vec<(&'a CFunction, Classification)>,
}

impl<'a> BindingModel<'a> {
    /// Bound methods of the type named `name`.
    pub fn methods_of(&self, name: &str) -> &[BoundMethod<'a>] {
        self.types
            .iter()
            .find(|t| t.ty.name == name)
            .map(|t| t.methods.as_slice())
            .unwrap_or(&[])
    }

    /// Classification of the function named `name` (first occurrence).
    pub fn classification_of(&self, name: &str) -> Option<&Classification> {
        self.classifications
            .iter()
            .find(|(f, _)| f.name == name)
            .map(|(_, c)| c)
    }

    /// Number of bound methods across all types.
    pub fn bound_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}

/// Sorts functions into free functions and bound methods.
pub struct Classifier<'r> {
    registry: &'r OpaqueRegistry,
    free_functions: BTreeSet<String>,
}

impl<'r> Classifier<'r> {
    pub fn new<I, S>(registry: &'r OpaqueRegistry, free_functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Classifier {
            registry,
            free_functions: free_functions.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a single function.
    pub fn classify(&self, function: &CFunction) -> Classification {
        let name = function.name.as_str();

        if self.free_functions.contains(name) {
            return Classification::Free;
        }

        if let Some(property) = self.registry.property_type() {
            if let Some(kind) = self.property_kind(property, name) {
                return Classification::PropertyBound {
                    ty: property.name.clone(),
                    kind,
                };
            }
        }

        match self.registry.match_prefix(name) {
            Some((ty, member)) => Classification::PrefixBound {
                ty: ty.name.clone(),
                member: if member.is_empty() {
                    CONSTRUCTOR.to_string()
                } else {
                    member.to_string()
                },
            },
            None => Classification::Dropped,
        }
    }

    /// Property accessors are named after the payload, not the owner:
    /// `chfl_atom_get_property` reads a property from an atom, and
    /// `chfl_property_get_double` reads a double out of a property.
    fn property_kind(&self, property: &OpaqueType, name: &str) -> Option<String> {
        if name.ends_with(PROPERTY_GETTER_SUFFIX) {
            return name.split('_').nth(1).map(str::to_string);
        }

        let getter = format!("{}_get_", self.registry.function_prefix(property));
        name.strip_prefix(getter.as_str())
            .filter(|kind| !kind.is_empty())
            .map(str::to_string)
    }

    /// Build the binding model for `functions`, preserving input order
    /// within every bucket.
    pub fn build<'a>(&self, functions: &'a [CFunction]) -> BindingModel<'a>
    where
        'r: 'a,
    {
        let mut model = BindingModel {
            types: self
                .registry
                .types()
                .iter()
                .map(|ty| TypeBinding {
                    ty,
                    methods: Vec::new(),
                })
                .collect(),
            free: Vec::new(),
            dropped: Vec::new(),
            classifications: Vec::with_capacity(functions.len()),
        };

        for function in functions {
            let classification = self.classify(function);
            tracing::debug!("{} -> {:?}", function.name, classification);

            match &classification {
                Classification::Free => model.free.push(function),
                Classification::Dropped => {
                    tracing::debug!(
                        "dropping `{}` ({}): no opaque type prefix",
                        function.name,
                        function.coord
                    );
                    model.dropped.push(function);
                }
                bound => {
                    if let Some((ty, member)) = bound.binding() {
                        if let Some(binding) = model.types.iter_mut().find(|t| t.ty.name == ty) {
                            binding.methods.push(BoundMethod {
                                name: member,
                                function,
                            });
                        }
                    }
                }
            }

            model.classifications.push((function, classification));
        }

        model
    }
}

fn function_name<S: serde::Serializer>(f: &&CFunction, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&f.name)
}

fn function_names<S: serde::Serializer>(fs: &[&CFunction], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(fs.iter().map(|f| f.name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::types::{CType, ReturnType};
    use crate::test_support::chemfiles_registry;

    fn function(name: &str) -> CFunction {
        CFunction::new(name, ReturnType::Type(CType::value("chfl_status")))
    }

    fn functions(names: &[&str]) -> Vec<CFunction> {
        names.iter().map(|n| function(n)).collect()
    }

    #[test]
    fn test_prefix_bound_member() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);

        assert_eq!(
            classifier.classify(&function("chfl_atom_get_mass")),
            Classification::PrefixBound {
                ty: "Atom".to_string(),
                member: "get_mass".to_string()
            }
        );
    }

    #[test]
    fn test_constructor_is_init() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);

        assert_eq!(
            classifier.classify(&function("chfl_atom")),
            Classification::PrefixBound {
                ty: "Atom".to_string(),
                member: CONSTRUCTOR.to_string()
            }
        );
    }

    #[test]
    fn test_free_functions_are_never_bound() {
        let registry = chemfiles_registry();
        // Looks like an Atom method, but the free set wins.
        let classifier = Classifier::new(&registry, ["chfl_version", "chfl_atom_free_all"]);

        assert_eq!(
            classifier.classify(&function("chfl_version")),
            Classification::Free
        );
        assert_eq!(
            classifier.classify(&function("chfl_atom_free_all")),
            Classification::Free
        );
    }

    #[test]
    fn test_property_accessors() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, Vec::<String>::new());

        let c = classifier.classify(&function("chfl_property_get_double"));
        assert_eq!(
            c,
            Classification::PropertyBound {
                ty: "Property".to_string(),
                kind: "double".to_string()
            }
        );
        assert_eq!(
            c.binding(),
            Some(("Property", "from_double".to_string()))
        );

        let c = classifier.classify(&function("chfl_frame_get_property"));
        assert_eq!(c.binding(), Some(("Property", "from_frame".to_string())));
    }

    #[test]
    fn test_property_rules_disabled_without_property_type() {
        let types = vec![crate::core::registry::OpaqueType::new("Atom", "chfl_")];
        let registry = OpaqueRegistry::new("chfl_", types).unwrap();
        let classifier = Classifier::new(&registry, Vec::<String>::new());

        assert_eq!(
            classifier.classify(&function("chfl_atom_get_property")),
            Classification::PrefixBound {
                ty: "Atom".to_string(),
                member: "get_property".to_string()
            }
        );
    }

    #[test]
    fn test_unmatched_functions_are_dropped_everywhere() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);
        let input = functions(&["chfl_version", "chfl_mystery_function", "other_lib_call"]);

        let model = classifier.build(&input);
        let dropped: Vec<_> = model.dropped.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(dropped, ["chfl_mystery_function", "other_lib_call"]);
        assert_eq!(model.free.len(), 1);
        assert_eq!(model.bound_count(), 0);
        assert_eq!(
            model.classification_of("other_lib_call"),
            Some(&Classification::Dropped)
        );
    }

    #[test]
    fn test_overloads_keep_input_order() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);
        let mut input = functions(&["chfl_atom_set_mass", "chfl_frame", "chfl_atom_set_mass"]);
        input[0].coord.line = 10;
        input[2].coord.line = 20;

        let model = classifier.build(&input);
        let methods = model.methods_of("Atom");
        assert_eq!(methods.len(), 2);
        assert!(methods.iter().all(|m| m.name == "set_mass"));
        assert_eq!(methods[0].function.coord.line, 10);
        assert_eq!(methods[1].function.coord.line, 20);
        assert_eq!(model.methods_of("Frame")[0].name, CONSTRUCTOR);
    }

    #[test]
    fn test_model_keeps_registry_order_and_every_function() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);
        let input = functions(&[
            "chfl_version",
            "chfl_property_get_bool",
            "chfl_trajectory_open",
            "chfl_nothing",
        ]);

        let model = classifier.build(&input);
        let names: Vec<_> = model.types.iter().map(|t| t.ty.name.as_str()).collect();
        let expected: Vec<_> = registry.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, expected);
        assert_eq!(model.classifications.len(), input.len());
        assert_eq!(model.methods_of("Property")[0].name, "from_bool");
        assert_eq!(model.methods_of("Trajectory")[0].name, "open");
    }

    #[test]
    fn test_property_classification_in_serialized_model() {
        let registry = chemfiles_registry();
        let classifier = Classifier::new(&registry, ["chfl_version"]);
        let input = functions(&["chfl_version", "chfl_property_get_double"]);
        let model = classifier.build(&input);

        assert!(matches!(
            &model.classifications[1].1,
            Classification::PropertyBound { kind, .. } if kind == "double"
        ));

        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("classifications").is_none());
        assert_eq!(value["free"][0], "chfl_version");
    }
}
