//! Compiler-facing annotations for hierarchical model modules.
//!
//! Methods of a [`module::Module`] can be tagged as exported entry points
//! ([`method::export`]) and given per-argument shape and dtype contracts
//! ([`method::annotate_args`]). The tags of a whole module tree can be pulled
//! out into a plain [`annotation::ModuleAnnotations`] mirror with
//! [`serializable::extract_serializable_annotations`] and re-attached to another
//! tree of the same structure with [`serializable::apply_serializable_annotations`].
//!
//! ```
//! use hyannot::prelude::*;
//!
//! let forward = annotate_args(vec![
//!     None,
//!     Some(ArgAnnotation::new(vec![-1, 3], DType::Float32)),
//! ])(export(Method::new(|args| args[1].clone())));
//!
//! let source = Module::new().with_method("forward", forward);
//! let annotations = extract_serializable_annotations(&source);
//!
//! let mut target = Module::new().with_method("forward", Method::new(|args| args[1].clone()));
//! apply_serializable_annotations(&mut target, &annotations).unwrap();
//! assert_eq!(target.method("forward").unwrap().is_exported(), Some(true));
//! ```

pub mod annotation;
pub mod dtype;
pub mod magic;
pub mod method;
pub mod module;
#[cfg(feature = "serde")]
pub mod persist;
pub mod serializable;
pub mod utils;
pub mod value;

/// Re-exports of the types and functions needed to annotate a module tree.
pub mod prelude {
    pub use crate::annotation::{
        ArgAnnotation, ExportedMethod, MethodAnnotation, ModuleAnnotations,
    };
    pub use crate::dtype::DType;
    pub use crate::method::{Method, MethodTag, annotate_args, export};
    pub use crate::module::{Attribute, Module, ModuleTree};
    pub use crate::serializable::{
        apply_serializable_annotations, extract_serializable_annotations,
    };
    pub use crate::utils::{AnnotResult, Error};
    pub use crate::value::{Tensor, Value};
}
