//! Configuration file support.
//!
//! flatbind reads `flatbind.toml` from the current directory (or the file
//! given with `--config`). Every section is optional; the defaults describe
//! the chemfiles C API.
//!
//! ```toml
//! [api]
//! prefix = "chfl_"
//! library = "chemfiles"
//! property-type = "Property"
//! opaque-types = ["Atom", { name = "Cell", c-name = "CHFL_CELL" }]
//! free-functions = ["chfl_version"]
//!
//! [parser]
//! ignore = ["CHFL_EXPORT"]
//!
//! [types.rust]
//! "uint64_t" = "u64"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::language::Language;
use crate::core::registry::{OpaqueRegistry, OpaqueType};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "flatbind.toml";

/// flatbind configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The C API conventions
    pub api: ApiConfig,

    /// Header reader settings
    pub parser: ParserConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Extra base-type entries, keyed by language name
    pub types: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Find the configuration to use.
    ///
    /// An explicit path must exist. Otherwise `flatbind.toml` in `cwd` is
    /// used when present, and the defaults when not.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = cwd.join(CONFIG_FILE);
        if local.exists() {
            tracing::debug!("using {}", local.display());
            Self::load(&local)
        } else {
            tracing::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Check that every `[types.<language>]` table names a known language.
    pub fn validate(&self) -> Result<()> {
        for key in self.types.keys() {
            let language: Language = key.parse()?;
            if language.dir_name() != key {
                return Err(anyhow!(
                    "use `[types.{}]` instead of `[types.{}]`",
                    language.dir_name(),
                    key
                ));
            }
        }
        Ok(())
    }

    /// Base-type overrides configured for `language`.
    pub fn type_overrides(&self, language: Language) -> impl Iterator<Item = (&str, &str)> {
        self.types
            .get(language.dir_name())
            .into_iter()
            .flat_map(|t| t.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// Conventions of the C API being wrapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApiConfig {
    /// Prefix shared by every function, e.g. `chfl_`
    pub prefix: String,

    /// Opaque handle types, in output order
    pub opaque_types: Vec<OpaqueTypeSpec>,

    /// Opaque type receiving property accessors, `""` to disable
    pub property_type: Option<String>,

    /// Functions that are never bound to a type
    pub free_functions: Vec<String>,

    /// Enum returned by functions as a status code
    pub status_type: Option<String>,

    /// Shared library the bindings load, e.g. `chemfiles` for `libchemfiles.so`
    pub library: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let opaque_types = [
            "Trajectory",
            "Frame",
            "Atom",
            "Cell",
            "Topology",
            "Residue",
            "Selection",
            "Property",
        ];
        let free_functions = [
            "chfl_version",
            "chfl_last_error",
            "chfl_clear_errors",
            "chfl_set_warning_callback",
            "chfl_add_configuration",
            "chfl_free",
        ];

        ApiConfig {
            prefix: "chfl_".to_string(),
            opaque_types: opaque_types
                .iter()
                .map(|n| OpaqueTypeSpec::Name(n.to_string()))
                .collect(),
            property_type: Some("Property".to_string()),
            free_functions: free_functions.iter().map(|s| s.to_string()).collect(),
            status_type: Some("chfl_status".to_string()),
            library: "chemfiles".to_string(),
        }
    }
}

impl ApiConfig {
    /// Build the opaque type registry.
    pub fn registry(&self) -> Result<OpaqueRegistry> {
        let types = self
            .opaque_types
            .iter()
            .map(|spec| spec.to_opaque_type(&self.prefix))
            .collect();

        let registry = OpaqueRegistry::new(self.prefix.clone(), types)?;

        match &self.property_type {
            Some(name) if !name.is_empty() => registry.with_property_type(name).ok_or_else(|| {
                anyhow!(
                    "property-type `{}` is not listed in api.opaque-types",
                    name
                )
            }),
            _ => Ok(registry),
        }
    }
}

/// An opaque type entry: a bare name, or a table overriding the derived
/// C name and function prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueTypeSpec {
    Name(String),
    #[serde(rename_all = "kebab-case")]
    Detailed {
        name: String,
        #[serde(default)]
        c_name: Option<String>,
        #[serde(default)]
        prefix: Option<String>,
    },
}

impl OpaqueTypeSpec {
    fn to_opaque_type(&self, api_prefix: &str) -> OpaqueType {
        match self {
            OpaqueTypeSpec::Name(name) => OpaqueType::new(name.as_str(), api_prefix),
            OpaqueTypeSpec::Detailed {
                name,
                c_name,
                prefix,
            } => {
                let mut ty = OpaqueType::new(name.as_str(), api_prefix);
                if let Some(c_name) = c_name {
                    ty = ty.with_c_name(c_name.as_str());
                }
                if let Some(prefix) = prefix {
                    ty = ty.with_prefix(prefix.as_str());
                }
                ty
            }
        }
    }
}

/// Header reader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Tokens removed before reading (export macros)
    pub ignore: Vec<String>,

    /// Functions left out of every output
    pub exclude: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            ignore: vec!["CHFL_EXPORT".to_string()],
            exclude: Vec::new(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Languages generated when none is given on the command line
    pub languages: Vec<Language>,

    /// Output directory used when none is given on the command line
    pub dir: Option<PathBuf>,
}
