//! Plain-data annotation records.
//!
//! [`ModuleAnnotations`] mirrors a module tree but only carries the annotations
//! of its methods, never the callables themselves. It is what the downstream
//! compiler consumes and what gets persisted between processes.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dtype::DType, magic::DYNAMIC_DIM, utils::qualified_name};

/// Shape and dtype guarantee for a single method argument.
///
/// Each shape entry is either a non-negative size or [`DYNAMIC_DIM`] (`-1`) for a
/// dimension only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArgAnnotation {
    pub shape: Vec<i64>,
    pub dtype: DType,
}

impl ArgAnnotation {
    pub fn new(shape: impl Into<Vec<i64>>, dtype: DType) -> Self {
        Self {
            shape: shape.into(),
            dtype,
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns `true` if at least one dimension is [`DYNAMIC_DIM`].
    pub fn is_dynamic(&self) -> bool {
        self.shape.contains(&DYNAMIC_DIM)
    }

    /// Iterate over the indices of the dynamic dimensions.
    pub fn dynamic_dims(&self) -> impl Iterator<Item = usize> + '_ {
        self.shape
            .iter()
            .enumerate()
            .filter(|(_, size)| **size == DYNAMIC_DIM)
            .map(|(index, _)| index)
    }
}

impl std::fmt::Display for ArgAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (index, size) in self.shape.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            if *size == DYNAMIC_DIM {
                write!(f, "?")?;
            } else {
                write!(f, "{}", size)?;
            }
        }
        write!(f, "]:{}", self.dtype)
    }
}

/// Annotations of one method, identified by its name within the owning module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodAnnotation {
    pub method_name: String,

    /// `None` means "not specified", which is different from `Some(false)`.
    pub export: Option<bool>,

    /// One entry per argument including the receiver at position 0.
    pub arg_annotations: Option<Vec<Option<ArgAnnotation>>>,
}

/// Serializable mirror of a module tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleAnnotations {
    pub method_annotations: Vec<MethodAnnotation>,
    pub submodule_annotations: Vec<(String, ModuleAnnotations)>,
}

/// An exported method found while flattening a [`ModuleAnnotations`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedMethod<'a> {
    /// Dotted path from the root, ending with the method name (`encoder.forward`).
    pub path: String,
    pub annotation: &'a MethodAnnotation,
}

impl ModuleAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the annotations of a direct child by name.
    pub fn submodule(&self, name: &str) -> Option<&ModuleAnnotations> {
        self.submodule_annotations
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, annotations)| annotations)
    }

    /// Find the annotation of one of this module's own methods.
    pub fn method(&self, name: &str) -> Option<&MethodAnnotation> {
        self.method_annotations
            .iter()
            .find(|annotation| annotation.method_name == name)
    }

    /// Number of method annotations in the whole tree.
    pub fn num_method_annotations(&self) -> usize {
        self.method_annotations.len()
            + self
                .submodule_annotations
                .iter()
                .map(|(_, child)| child.num_method_annotations())
                .sum::<usize>()
    }

    /// Flatten the tree into the list of methods marked as exported, in pre-order.
    ///
    /// Methods whose export flag is absent or `false` are not entry points and are skipped.
    pub fn exported_methods(&self) -> Vec<ExportedMethod<'_>> {
        let mut exported = Vec::new();
        self.collect_exported("", &mut exported);
        exported
    }

    fn collect_exported<'a>(&'a self, prefix: &str, exported: &mut Vec<ExportedMethod<'a>>) {
        for annotation in &self.method_annotations {
            if annotation.export == Some(true) {
                exported.push(ExportedMethod {
                    path: qualified_name(prefix, &annotation.method_name),
                    annotation,
                });
            }
        }

        for (name, child) in &self.submodule_annotations {
            child.collect_exported(&qualified_name(prefix, name), exported);
        }
    }
}
