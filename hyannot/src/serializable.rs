//! Extraction and re-application of annotation trees.
//!
//! Both walks are depth-first: the methods of a node are handled before its
//! children, and children are visited in declaration order.
use log::{debug, trace};

use crate::{
    annotation::{MethodAnnotation, ModuleAnnotations},
    magic::{ARG_ANNOTATIONS_ATTR_NAME, EXPORT_ATTR_NAME},
    method::{MethodTag, annotate_args, export},
    module::{Attribute, ModuleTree},
    utils::{AnnotResult, Error, display_path, qualified_name},
};

/// Collect the annotations of every method in the tree rooted at `module`.
///
/// A method is only recorded when it carries both an export flag and argument
/// annotations; a method with only one of the two is left out entirely.
/// Non-callable attributes are ignored. The input is not modified.
pub fn extract_serializable_annotations<M: ModuleTree>(module: &M) -> ModuleAnnotations {
    extract_at(module, "")
}

fn extract_at<M: ModuleTree>(module: &M, path: &str) -> ModuleAnnotations {
    trace!("Extracting annotations of module `{}`", display_path(path));
    let mut annotations = ModuleAnnotations::new();

    for (name, attribute) in module.attributes() {
        let Some(method) = attribute.try_as_method_ref() else {
            continue;
        };

        let export = method
            .tag(EXPORT_ATTR_NAME)
            .and_then(MethodTag::try_as_export_ref)
            .copied();
        let arg_annotations = method
            .tag(ARG_ANNOTATIONS_ATTR_NAME)
            .and_then(MethodTag::try_as_arg_annotations_ref)
            .cloned();

        match (export, arg_annotations) {
            (Some(export), Some(arg_annotations)) => {
                annotations.method_annotations.push(MethodAnnotation {
                    method_name: name.to_string(),
                    export: Some(export),
                    arg_annotations: Some(arg_annotations),
                });
            }
            (None, None) => {}
            _ => trace!(
                "Method `{}` carries only one of export/arg annotations, skipping",
                qualified_name(path, name)
            ),
        }
    }

    for (name, child) in module.named_children() {
        let child_annotations = extract_at(child, &qualified_name(path, name));
        annotations
            .submodule_annotations
            .push((name.to_string(), child_annotations));
    }

    annotations
}

/// Re-attach `annotations` onto the tree rooted at `module`.
///
/// Only the components present in each record are attached; absent components
/// leave the target method untouched. The target must contain every method and
/// child named in `annotations`, otherwise the walk stops with
/// [`Error::AttributeNotFound`] or [`Error::SubmoduleNotFound`]. The walk is not
/// atomic: nodes visited before the failure keep their new tags.
pub fn apply_serializable_annotations<M: ModuleTree>(
    module: &mut M,
    annotations: &ModuleAnnotations,
) -> AnnotResult<()> {
    apply_at(module, annotations, "")
}

fn apply_at<M: ModuleTree>(
    module: &mut M,
    annotations: &ModuleAnnotations,
    path: &str,
) -> AnnotResult<()> {
    for method_annotation in &annotations.method_annotations {
        let name = method_annotation.method_name.as_str();
        let mut method = match module.attribute(name) {
            Some(Attribute::Method(method)) => method.clone(),
            Some(Attribute::Value(_)) => {
                return Err(Error::NotCallable {
                    module: display_path(path),
                    name: name.to_string(),
                });
            }
            None => {
                return Err(Error::AttributeNotFound {
                    module: display_path(path),
                    name: name.to_string(),
                });
            }
        };

        // Go through the decorators so they stay the single source of truth.
        match method_annotation.export {
            Some(true) => method = export(method),
            Some(false) => method.set_tag(MethodTag::Export(false)),
            None => {}
        }
        if let Some(arg_annotations) = &method_annotation.arg_annotations {
            method = annotate_args(arg_annotations.clone())(method);
        }

        debug!(
            "Applied annotations to method `{}` (export: {:?}, {} arg annotation(s))",
            qualified_name(path, name),
            method_annotation.export,
            method_annotation
                .arg_annotations
                .as_ref()
                .map_or(0, Vec::len)
        );
        module.set_attribute(name, Attribute::Method(method));
    }

    for (name, child_annotations) in &annotations.submodule_annotations {
        let child_path = qualified_name(path, name);
        let Some(child) = module.child_mut(name) else {
            return Err(Error::SubmoduleNotFound {
                module: display_path(path),
                name: name.clone(),
            });
        };
        trace!("Applying annotations to module `{}`", child_path);
        apply_at(child, child_annotations, &child_path)?;
    }

    Ok(())
}
