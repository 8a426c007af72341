//! Implementation of `flatbind generate`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::backend::{self, Artifact, RenderContext};
use crate::bindings::parser::HeaderParser;
use crate::bindings::types::{CFunction, Declarations};
use crate::core::language::Language;
use crate::core::registry::OpaqueRegistry;
use crate::model::classify::{BindingModel, Classifier};
use crate::model::errors::BindError;
use crate::model::typemap::TypeMapper;
use crate::util::config::Config;
use crate::util::fs;

/// Output directory used when neither the command line nor the
/// configuration names one.
pub const DEFAULT_OUT_DIR: &str = "bindings";

/// Options for generating bindings.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// C header, or a `.json` file holding serialized declarations
    pub input: PathBuf,

    /// Languages to generate (falls back to the configuration, then all)
    pub languages: Vec<Language>,

    /// Root output directory, one subdirectory per language
    pub out_dir: Option<PathBuf>,

    /// Render everything but write nothing
    pub dry_run: bool,
}

/// Outcome of one language.
#[derive(Debug)]
pub struct LanguageReport {
    pub language: Language,

    /// Generated files (in a dry run, the files that would be written)
    pub files: Vec<PathBuf>,

    /// Files whose contents changed on disk
    pub written: usize,

    /// Why nothing was generated for this language
    pub error: Option<BindError>,
}

/// Result of a `generate` run.
#[derive(Debug)]
pub struct GenerateReport {
    pub functions: usize,
    pub enums: usize,
    pub bound: usize,
    pub free: usize,

    /// Functions bound to no type, kept for diagnostics
    pub dropped: Vec<CFunction>,

    /// Per-language outcomes, in request order
    pub languages: Vec<LanguageReport>,

    pub dry_run: bool,
}

impl GenerateReport {
    /// Languages that failed, with their error.
    pub fn failures(&self) -> impl Iterator<Item = (Language, &BindError)> {
        self.languages
            .iter()
            .filter_map(|l| l.error.as_ref().map(|e| (l.language, e)))
    }

    /// Whether every requested language was generated.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Generate bindings for the requested languages.
///
/// Backends are rendered in parallel. A backend that fails writes nothing
/// and is reported in [`GenerateReport::languages`]; the others are
/// written regardless.
pub fn generate(config: &Config, opts: &GenerateOptions) -> Result<GenerateReport> {
    let decls = load_declarations(&opts.input, config)?;
    let registry = config.api.registry()?;
    let model =
        Classifier::new(&registry, config.api.free_functions.iter().cloned()).build(&decls.functions);

    let languages = requested_languages(&opts.languages, &config.output.languages);
    let out_dir = opts
        .out_dir
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    tracing::debug!(
        "{} functions: {} bound, {} free, {} dropped",
        decls.functions.len(),
        model.bound_count(),
        model.free.len(),
        model.dropped.len()
    );

    let rendered: Vec<(Language, Result<Vec<Artifact>, BindError>)> = languages
        .par_iter()
        .map(|&language| {
            (
                language,
                render_language(language, &decls, &model, &registry, config),
            )
        })
        .collect();

    let mut reports = Vec::with_capacity(rendered.len());
    for (language, result) in rendered {
        let mut report = LanguageReport {
            language,
            files: Vec::new(),
            written: 0,
            error: None,
        };

        match result {
            Ok(artifacts) => {
                let dir = out_dir.join(language.dir_name());
                for artifact in artifacts {
                    let path = dir.join(&artifact.path);
                    if !opts.dry_run {
                        match fs::write_string(&path, &artifact.contents) {
                            Ok(true) => {
                                tracing::info!("wrote {}", path.display());
                                report.written += 1;
                            }
                            Ok(false) => tracing::debug!("{} is up to date", path.display()),
                            Err(e) => {
                                // Stop this language; the others still get written
                                report.error = Some(BindError::Write {
                                    path,
                                    message: format!("{:#}", e),
                                });
                                break;
                            }
                        }
                    }
                    report.files.push(path);
                }
            }
            Err(e) => {
                tracing::debug!("{} backend failed: {}", language, e);
                report.error = Some(e);
            }
        }

        reports.push(report);
    }

    Ok(GenerateReport {
        functions: decls.functions.len(),
        enums: decls.enums.len(),
        bound: model.bound_count(),
        free: model.free.len(),
        dropped: model.dropped.iter().map(|f| (*f).clone()).collect(),
        languages: reports,
        dry_run: opts.dry_run,
    })
}

/// Read declarations from a header, or from JSON when the file name ends
/// in `.json`. Functions listed in `parser.exclude` are left out either way.
pub fn load_declarations(input: &Path, config: &Config) -> Result<Declarations> {
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let contents = fs::read_to_string(input)?;
        let mut decls: Declarations = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse declarations: {}", input.display()))?;
        decls
            .functions
            .retain(|f| !config.parser.exclude.contains(&f.name));
        return Ok(decls);
    }

    HeaderParser::new()
        .with_ignore_tokens(config.parser.ignore.clone())
        .with_exclude_functions(config.parser.exclude.clone())
        .parse_file(input)
}

/// Render every artifact of one language, with the configured base-type
/// overrides applied on top of the backend's dialect.
pub fn render_language(
    language: Language,
    decls: &Declarations,
    model: &BindingModel<'_>,
    registry: &OpaqueRegistry,
    config: &Config,
) -> Result<Vec<Artifact>, BindError> {
    let backend = backend::for_language(language);
    let mut dialect = backend.dialect();
    dialect.types.extend(config.type_overrides(language));

    let source = decls
        .source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| decls.source.display().to_string());

    let ctx = RenderContext {
        mapper: TypeMapper::new(
            &dialect,
            registry,
            decls.enums.iter().map(|e| e.name.as_str()),
        ),
        registry,
        library: &config.api.library,
        status_type: config.api.status_type.as_deref(),
        source: &source,
    };

    backend::render(backend.as_ref(), decls, model, &ctx)
}

/// Command-line languages win over configured ones; neither means all.
/// Duplicates are dropped, keeping the first occurrence.
fn requested_languages(cli: &[Language], configured: &[Language]) -> Vec<Language> {
    let source = if !cli.is_empty() {
        cli
    } else if !configured.is_empty() {
        configured
    } else {
        &Language::ALL[..]
    };

    let mut languages = Vec::with_capacity(source.len());
    for &language in source {
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    languages
}
