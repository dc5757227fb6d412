//! The filename contract.
//!
//! Every create/rename/save validates the target name client-side before any
//! network call. Violations map to distinct categories so the caller can
//! render a precise message, and each category carries the machine-readable
//! code the storage service uses for the same condition.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum filename length in characters.
pub const MAX_FILENAME_LEN: usize = 255;

/// Extensions accepted by the contract.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".md", ".markdown"];

/// Characters rejected anywhere in a filename.
static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*+,!%@]"#).unwrap());

/// Reserved device names (Windows heritage), matched against the base name.
static RESERVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(con|prn|aux|nul|com[1-9]|lpt[1-9])$").unwrap());

/// A filename contract violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// Name is empty or whitespace-only.
    #[error("filename must not be empty")]
    Empty,

    /// Name exceeds [`MAX_FILENAME_LEN`] characters.
    #[error("filename is too long (max {MAX_FILENAME_LEN})")]
    TooLong,

    /// Name ends with a dot or a space.
    #[error("filename must not end with a dot or space")]
    Trailing,

    /// Name contains a path separator.
    #[error("filename must not contain path separators")]
    PathSeparator,

    /// Name contains characters outside the allowed set.
    #[error("filename contains invalid characters: {}", chars.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))]
    InvalidChars { chars: Vec<char> },

    /// Base name consists only of dots.
    #[error("filename must not consist only of dots")]
    OnlyDots,

    /// Base name ends in dots before the extension.
    #[error("base name must not end in dots")]
    TrailingDots,

    /// Base name (before the extension) is empty.
    #[error("base name must not be empty")]
    EmptyBase,

    /// Base name is a reserved device name.
    #[error("{name} is a reserved name")]
    Reserved { name: String },

    /// Extension is not `.md` or `.markdown`.
    #[error("only .md and .markdown extensions are allowed")]
    BadExtension,
}

impl FilenameError {
    /// The machine-readable code the storage service reports for the same
    /// condition.
    pub fn code(&self) -> &'static str {
        match self {
            FilenameError::Empty => "FILE_NAME_EMPTY",
            FilenameError::TooLong => "FILE_NAME_TOO_LONG",
            FilenameError::Trailing => "FILE_NAME_TRAILING",
            FilenameError::PathSeparator => "FILE_NAME_PATH",
            FilenameError::InvalidChars { .. } => "FILE_NAME_INVALID_CHARS",
            FilenameError::OnlyDots => "FILE_NAME_ONLY_DOTS",
            FilenameError::TrailingDots => "FILE_NAME_TRAILING_DOTS",
            FilenameError::EmptyBase => "FILE_NAME_EMPTY_BASE",
            FilenameError::Reserved { .. } => "FILE_NAME_RESERVED",
            FilenameError::BadExtension => "FILE_EXTENSION_INVALID",
        }
    }
}

/// Validate a filename against the contract.
///
/// Check order matters: path separators are reported before the general
/// invalid-character set they also belong to.
pub fn validate_filename(name: &str) -> Result<(), FilenameError> {
    if name.trim().is_empty() {
        return Err(FilenameError::Empty);
    }
    if name.chars().count() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }
    if name.ends_with('.') || name.ends_with(' ') {
        return Err(FilenameError::Trailing);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(FilenameError::PathSeparator);
    }
    let mut invalid: Vec<char> = Vec::new();
    for m in INVALID_CHARS.find_iter(name) {
        for c in m.as_str().chars() {
            if !invalid.contains(&c) {
                invalid.push(c);
            }
        }
    }
    if !invalid.is_empty() {
        return Err(FilenameError::InvalidChars { chars: invalid });
    }

    let (base, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], name[dot..].to_lowercase()),
        None => (name, String::new()),
    };
    if !base.is_empty() && base.chars().all(|c| c == '.') {
        return Err(FilenameError::OnlyDots);
    }
    if base.ends_with('.') {
        return Err(FilenameError::TrailingDots);
    }
    if base.trim().is_empty() {
        return Err(FilenameError::EmptyBase);
    }
    if RESERVED.is_match(base) {
        return Err(FilenameError::Reserved {
            name: base.to_string(),
        });
    }
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(FilenameError::BadExtension);
    }
    Ok(())
}

/// Returns true if the name already carries an allowed markdown extension.
pub fn has_markdown_extension(name: &str) -> bool {
    name.ends_with(".md") || name.ends_with(".markdown")
}

/// Append `.md` when the name carries no markdown extension.
///
/// Used by new/save/rename, where the user may type a bare name.
pub fn ensure_markdown_extension(name: &str) -> String {
    if has_markdown_extension(name) {
        name.to_string()
    } else {
        format!("{}.md", name)
    }
}

/// Replace a foreign extension with `.md`.
///
/// Used by upload, where the source file may be `notes.txt`: the final
/// extension is stripped before `.md` is appended. A name without any
/// extension gets `.md` appended.
pub fn rewrite_to_markdown_extension(name: &str) -> String {
    if has_markdown_extension(name) {
        return name.to_string();
    }
    match name.rfind('.') {
        // Leading dot only (".bashrc") is a bare name, not an extension.
        Some(dot) if dot > 0 => format!("{}.md", &name[..dot]),
        _ => format!("{}.md", name),
    }
}
