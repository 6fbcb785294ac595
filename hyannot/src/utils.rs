use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, Error, EnumIs)]
pub enum Error {
    /// No attribute with this name exists on the module.
    #[error("Module `{module}` has no attribute `{name}`.")]
    AttributeNotFound { module: String, name: String },

    /// No child with this name exists on the module.
    #[error("Module `{module}` has no submodule `{name}`.")]
    SubmoduleNotFound { module: String, name: String },

    /// The attribute exists but holds a plain value instead of a method.
    #[error("Attribute `{name}` of module `{module}` is not callable.")]
    NotCallable { module: String, name: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Failed to parse annotations file '{file}': {source}")]
    ParseError {
        source: serde_json::Error,
        file: String,
    },

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

pub type AnnotResult<T> = Result<T, Error>;

/// Join a dotted module path with the name of one of its members.
pub(crate) fn qualified_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Name of a module path as shown in diagnostics.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        crate::magic::ROOT_MODULE_NAME.to_string()
    } else {
        path.to_string()
    }
}
