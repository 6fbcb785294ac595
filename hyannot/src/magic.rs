/// Tag key under which [`crate::method::export`] records the export flag of a method.
///
/// Extraction and application both go through this key; nothing else in the crate
/// spells it out.
pub const EXPORT_ATTR_NAME: &str = "_hy_export";

/// Tag key under which [`crate::method::annotate_args`] records the argument annotations.
pub const ARG_ANNOTATIONS_ATTR_NAME: &str = "_hy_arg_annotations";

/// Shape entry marking a dimension whose size is only known at runtime.
pub const DYNAMIC_DIM: i64 = -1;

/// Display name used in diagnostics for the root of a module tree.
pub const ROOT_MODULE_NAME: &str = "<root>";

/// Name of the environment variable containing the path to the persisted annotations.
/// If not set, defaults to `hyannot.json` in the current working directory.
pub const ENV_ANNOTATIONS_PATH: &str = "HY_ANNOTATIONS_PATH";

/// File name used when [`ENV_ANNOTATIONS_PATH`] is not set.
pub const DEFAULT_ANNOTATIONS_FILE: &str = "hyannot.json";

/// Source name reported by parse errors of in-memory JSON.
pub const JSON_STRING_SOURCE: &str = "<string>";
