//! C header reader.
//!
//! Extracts function prototypes and enums from a flat C API header. This is
//! not a C parser: it handles the conventions of generated-binding-friendly
//! headers (one prototype per statement, typedef'd enums with explicit
//! values) and reports anything else it cannot interpret.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use super::types::{
    CArgument, CEnum, CEnumerator, CFunction, CType, Declarations, ReturnType, SourceCoord,
};
use crate::model::errors::BindError;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//[^\n]*").unwrap());
static PREPROCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#(?:[^\n]*\\\n)*[^\n]*").unwrap());
static EXTERN_C: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"extern\s+"C"\s*\{?"#).unwrap());
static ENUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:typedef\s+)?\benum\s+(\w+)?\s*\{([^}]*)\}\s*(\w+)?\s*;").unwrap()
});
static PROTOTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<ret>[\w\s*]*?[\w*])\s*\b(?P<name>\w+)\s*\((?P<args>.*)\)$").unwrap()
});
static FUNCTION_POINTER_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\*\s*(\w+)\s*\(").unwrap());
static ARRAY_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Words that make a statement a non-declaration (inline bodies, macros).
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "if", "else", "while", "for", "do", "switch", "case", "goto", "sizeof",
];

/// Words that are part of a type, never an argument name.
const TYPE_WORDS: &[&str] = &[
    "const", "volatile", "restrict", "unsigned", "signed", "struct", "enum", "void", "char",
    "short", "int", "long", "float", "double", "bool", "_Bool",
];

/// Reader for C header files.
#[derive(Debug, Default)]
pub struct HeaderParser {
    /// Tokens removed before reading (export macros and the like)
    ignore_tokens: Vec<String>,
    /// Functions to leave out entirely
    exclude_functions: Vec<String>,
}

impl HeaderParser {
    /// Create a new header reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tokens to remove before reading, e.g. `CHFL_EXPORT`.
    pub fn with_ignore_tokens(mut self, tokens: Vec<String>) -> Self {
        self.ignore_tokens = tokens;
        self
    }

    /// Set functions to exclude.
    pub fn with_exclude_functions(mut self, funcs: Vec<String>) -> Self {
        self.exclude_functions = funcs;
        self
    }

    /// Read a header file.
    pub fn parse_file(&self, path: &Path) -> Result<Declarations> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read header: {}", path.display()))?;

        Ok(self.parse_content(&content, path)?)
    }

    /// Read header content. `path` is only used for source coordinates.
    pub fn parse_content(&self, content: &str, path: &Path) -> Result<Declarations, BindError> {
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut decls = Declarations::new(path);
        let text = self.preprocess(content);

        decls.enums = self.parse_enums(&text, &file)?;
        let text = blank(&ENUM, &text);
        decls.functions = self.parse_functions(&text, &file)?;

        tracing::debug!(
            "read {}: {} functions, {} enums",
            file,
            decls.functions.len(),
            decls.enums.len()
        );

        Ok(decls)
    }

    /// Blank out comments, preprocessor lines and ignored tokens, keeping
    /// every newline so byte offsets still give the right line numbers.
    fn preprocess(&self, content: &str) -> String {
        let mut text = blank(&BLOCK_COMMENT, content);
        text = blank(&LINE_COMMENT, &text);
        text = blank(&PREPROCESSOR, &text);
        text = blank(&EXTERN_C, &text);

        for token in &self.ignore_tokens {
            if let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(token))) {
                text = blank(&re, &text);
            }
        }

        text
    }

    /// Read enum definitions.
    fn parse_enums(&self, text: &str, file: &str) -> Result<Vec<CEnum>, BindError> {
        let mut enums = Vec::new();

        for cap in ENUM.captures_iter(text) {
            let whole = cap.get(0).map_or(0..0, |m| m.range());
            let coord = SourceCoord::new(file, line_of(text, whole.start));
            let tag = cap.get(1).map_or("", |m| m.as_str());
            let body = cap.get(2).map_or("", |m| m.as_str());
            let typedef_name = cap.get(3).map_or("", |m| m.as_str());

            // Prefer the typedef name, which is what prototypes use
            let name = if !typedef_name.is_empty() {
                typedef_name
            } else if !tag.is_empty() {
                tag
            } else {
                tracing::warn!("skipping anonymous enum at {}", coord);
                continue;
            };

            enums.push(CEnum {
                name: name.to_string(),
                enumerators: parse_enumerators(body, &coord)?,
                coord,
            });
        }

        Ok(enums)
    }

    /// Read the prototypes found at file scope.
    fn parse_functions(&self, text: &str, file: &str) -> Result<Vec<CFunction>, BindError> {
        let mut functions = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;

        for (i, c) in text.char_indices() {
            match c {
                '{' => {
                    depth += 1;
                    start = i + 1;
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    start = i + 1;
                }
                ';' => {
                    if depth == 0 {
                        if let Some(f) = self.parse_statement(text, start..i, file)? {
                            functions.push(f);
                        }
                    }
                    start = i + 1;
                }
                _ => {}
            }
        }

        Ok(functions)
    }

    /// Read one `;`-terminated statement, if it is a prototype.
    fn parse_statement(
        &self,
        text: &str,
        range: std::ops::Range<usize>,
        file: &str,
    ) -> Result<Option<CFunction>, BindError> {
        let raw = &text[range.clone()];
        let statement = raw.trim();
        if statement.is_empty() || !statement.contains('(') || statement.starts_with("typedef") {
            return Ok(None);
        }

        let offset = range.start + (raw.len() - raw.trim_start().len());
        let coord = SourceCoord::new(file, line_of(text, offset));

        if let Some(cap) = FUNCTION_POINTER_RETURN.captures(statement) {
            let name = cap.get(1).map_or("", |m| m.as_str());
            if self.exclude_functions.iter().any(|e| e == name) {
                return Ok(None);
            }
            return Err(BindError::MalformedDeclaration {
                message: format!("`{}` returns or takes a function pointer", name),
                coord,
            });
        }

        let Some(cap) = PROTOTYPE.captures(statement) else {
            tracing::debug!("not a prototype at {}: {}", coord, statement);
            return Ok(None);
        };

        let ret = cap["ret"].trim();
        let name = &cap["name"];
        let args = &cap["args"];

        if ret
            .split(|c: char| c.is_whitespace() || c == '*')
            .any(|w| STATEMENT_KEYWORDS.contains(&w))
        {
            return Ok(None);
        }

        if self.exclude_functions.iter().any(|e| e == name) {
            tracing::debug!("excluding `{}`", name);
            return Ok(None);
        }

        let coord = SourceCoord::new(file, line_of(text, offset + cap.name("name").map_or(0, |m| m.start())));

        if args.contains('(') {
            return Err(BindError::MalformedDeclaration {
                message: format!("`{}` has an argument list this reader cannot split", name),
                coord,
            });
        }

        let return_type = parse_return(ret);
        let mut function = CFunction::new(name, return_type).at(coord);
        for arg in parse_args(args, &function)? {
            function = function.with_arg(arg);
        }

        Ok(Some(function))
    }
}

/// Replace every match by spaces, keeping newlines.
fn blank(re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &regex::Captures<'_>| {
        caps[0]
            .chars()
            .map(|c| if c == '\n' { '\n' } else { ' ' })
            .collect::<String>()
    })
    .into_owned()
}

/// 1-based line of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Strip storage specifiers. `void*` has no plain pointee, so it is
/// recorded as an unresolved pointer.
fn parse_return(ret: &str) -> ReturnType {
    let cleaned: Vec<&str> = ret
        .split_whitespace()
        .filter(|w| !matches!(*w, "extern" | "static" | "inline"))
        .collect();
    let ty = CType::parse(&cleaned.join(" "));

    if ty.name == "void" && ty.is_pointer() {
        ReturnType::UnresolvedPointer
    } else {
        ReturnType::Type(ty)
    }
}

fn parse_args(args: &str, function: &CFunction) -> Result<Vec<CArgument>, BindError> {
    let args = args.trim();
    if args.is_empty() || args == "void" {
        return Ok(Vec::new());
    }

    let mut parsed = Vec::new();
    for arg in args.split(',') {
        let arg = arg.trim();
        if arg == "..." {
            return Err(BindError::MalformedDeclaration {
                message: format!("`{}` is variadic", function.name),
                coord: function.coord.clone(),
            });
        }

        let (ty, name) = split_arg(arg);
        parsed.push(CArgument::new(name, ty));
    }

    Ok(parsed)
}

/// Split `const char* name` into its type and name. Arrays decay to
/// pointers; unnamed arguments give an empty name.
fn split_arg(arg: &str) -> (CType, String) {
    let arrays = ARRAY_SUFFIX.find_iter(arg).count();
    let arg = ARRAY_SUFFIX.replace_all(arg, " ");
    let spaced = arg.replace('*', " * ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();

    let named = match tokens.split_last() {
        Some((last, rest)) => {
            is_identifier(last)
                && !TYPE_WORDS.contains(last)
                && rest
                    .iter()
                    .any(|t| *t != "*" && !matches!(*t, "const" | "volatile" | "restrict"))
        }
        None => false,
    };

    let (type_tokens, name) = if named {
        (&tokens[..tokens.len() - 1], tokens[tokens.len() - 1].to_string())
    } else {
        (&tokens[..], String::new())
    };

    let mut ty = CType::parse(&type_tokens.join(" "));
    ty.pointers += arrays as u8;
    (ty, name)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Read `NAME = VALUE` items. Values must be explicit literals.
fn parse_enumerators(body: &str, coord: &SourceCoord) -> Result<Vec<CEnumerator>, BindError> {
    let mut enumerators = Vec::new();

    for item in body.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let Some((name, value)) = item.split_once('=') else {
            return Err(BindError::MalformedDeclaration {
                message: format!("enumerator `{}` has no explicit value", item),
                coord: coord.clone(),
            });
        };

        let name = name.trim();
        let value = parse_integer(value.trim()).ok_or_else(|| BindError::MalformedDeclaration {
            message: format!("enumerator `{}` has a non-literal value `{}`", name, value.trim()),
            coord: coord.clone(),
        })?;

        enumerators.push(CEnumerator {
            name: name.to_string(),
            value,
        });
    }

    Ok(enumerators)
}

/// Parse a decimal or hex literal, with an optional sign, parentheses and
/// integer suffix.
fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim().trim_start_matches('(').trim_end_matches(')').trim();
    let s = s.trim_end_matches(['u', 'U', 'l', 'L']);
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, s),
    };

    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };

    Some(if negative { -value } else { value })
}
