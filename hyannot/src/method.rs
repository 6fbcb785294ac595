//! Callable module members and their out-of-band annotation tags.
use std::{collections::BTreeMap, sync::Arc};

use strum::{EnumIs, EnumTryAs};

use crate::{
    annotation::ArgAnnotation,
    magic::{ARG_ANNOTATIONS_ATTR_NAME, EXPORT_ATTR_NAME},
    value::Value,
};

/// Signature shared by every method body. Position 0 of `args` is the receiver.
pub type MethodFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A tag attached to a [`Method`] without altering its call behavior.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, EnumTryAs)]
pub enum MethodTag {
    /// Whether the method is an entry point visible to the compiler.
    Export(bool),

    /// Shape and dtype guarantees, one entry per argument (receiver included).
    ArgAnnotations(Vec<Option<ArgAnnotation>>),
}

impl MethodTag {
    /// Fixed key the tag is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            MethodTag::Export(_) => EXPORT_ATTR_NAME,
            MethodTag::ArgAnnotations(_) => ARG_ANNOTATIONS_ATTR_NAME,
        }
    }
}

/// A callable member of a module.
///
/// Cloning a method shares the underlying callable; tags are owned by each clone,
/// so re-tagging a clone never affects the original.
#[derive(Clone)]
pub struct Method {
    func: Arc<MethodFn>,
    tags: BTreeMap<&'static str, MethodTag>,
}

impl Method {
    pub fn new(func: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            tags: BTreeMap::new(),
        }
    }

    /// Invoke the method body.
    #[inline]
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    /// Returns `true` if both methods share the same callable.
    pub fn same_callable(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// Look up a tag by its key.
    pub fn tag(&self, key: &str) -> Option<&MethodTag> {
        self.tags.get(key)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Iterate over all tags in key order.
    pub fn tags(&self) -> impl Iterator<Item = &MethodTag> {
        self.tags.values()
    }

    /// Attach a tag, replacing any previous tag stored under the same key.
    pub fn set_tag(&mut self, tag: MethodTag) {
        self.tags.insert(tag.key(), tag);
    }

    /// Return this method with `tag` attached.
    pub fn with_tag(mut self, tag: MethodTag) -> Self {
        self.set_tag(tag);
        self
    }

    /// Export flag, `None` if the method was never marked.
    pub fn is_exported(&self) -> Option<bool> {
        self.tag(EXPORT_ATTR_NAME)
            .and_then(MethodTag::try_as_export_ref)
            .copied()
    }

    /// Argument annotations, `None` if the method was never annotated.
    pub fn arg_annotations(&self) -> Option<&[Option<ArgAnnotation>]> {
        self.tag(ARG_ANNOTATIONS_ATTR_NAME)
            .and_then(MethodTag::try_as_arg_annotations_ref)
            .map(Vec::as_slice)
    }
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("func", &Arc::as_ptr(&self.func))
            .field("tags", &self.tags)
            .finish()
    }
}

/// Mark a method as exported to the compiler.
///
/// By default no method is exported. Exporting only the methods that carry
/// argument annotations keeps the compiler from seeing a sea of small entry
/// points without rank or dtype information.
pub fn export(method: Method) -> Method {
    method.with_tag(MethodTag::Export(true))
}

/// Build a decorator attaching argument annotations to a method.
///
/// `annotations` should hold one entry per argument, the receiver included. Each
/// entry is either `None` (no information) or an [`ArgAnnotation`] guaranteeing the
/// shape and dtype the argument will dynamically have. The length is not checked
/// against the arity of the method.
pub fn annotate_args(annotations: Vec<Option<ArgAnnotation>>) -> impl Fn(Method) -> Method {
    move |method| method.with_tag(MethodTag::ArgAnnotations(annotations.clone()))
}
