use hyannot::prelude::*;

fn passthrough() -> Method {
    Method::new(|args| args.get(1).cloned().unwrap_or_default())
}

fn image_annotations() -> Vec<Option<ArgAnnotation>> {
    vec![
        None,
        Some(ArgAnnotation::new(vec![-1, 3], DType::Float32)),
        Some(ArgAnnotation::new(vec![2, 4], DType::Int64)),
    ]
}

/// Build a small model. When `annotated` is false the same structure is built
/// with plain, untagged methods.
fn build_model(annotated: bool) -> Module {
    let tag = |method: Method, annotations: Vec<Option<ArgAnnotation>>| {
        if annotated {
            annotate_args(annotations)(export(method))
        } else {
            method
        }
    };

    let layer0 = Module::new()
        .with_method("forward", tag(passthrough(), image_annotations()))
        .with_value("weight", Tensor::new([3, 3], DType::Float32));
    let layer1 = Module::new().with_method(
        "forward",
        tag(passthrough(), vec![None, Some(ArgAnnotation::new(vec![-1, -1], DType::BFloat16))]),
    );
    let encoder = Module::new()
        .with_method("encode", tag(passthrough(), vec![None, None]))
        .with_child("layer0", layer0)
        .with_child("layer1", layer1);

    Module::new()
        .with_method("forward", tag(passthrough(), image_annotations()))
        .with_method("helper", passthrough())
        .with_value("num_classes", 10_i64)
        .with_child("encoder", encoder)
        .with_child("head", Module::new())
}

fn assert_same_tags(left: &Module, right: &Module) {
    for (name, attribute) in left.attributes() {
        if let Attribute::Method(method) = attribute {
            let other = right.method(name).expect("method present on both trees");
            assert_eq!(method.is_exported(), other.is_exported(), "export of `{name}`");
            assert_eq!(
                method.arg_annotations(),
                other.arg_annotations(),
                "arg annotations of `{name}`"
            );
        }
    }
    for (name, child) in left.named_children() {
        assert_same_tags(child, right.child(name).expect("child present on both trees"));
    }
}

#[test]
fn round_trip_onto_identical_structure() {
    let source = build_model(true);
    let mut target = build_model(false);

    let annotations = extract_serializable_annotations(&source);
    apply_serializable_annotations(&mut target, &annotations).unwrap();

    assert_same_tags(&source, &target);
    assert_eq!(extract_serializable_annotations(&target), annotations);
}

#[test]
fn round_trip_keeps_shape_wildcard() {
    let source = Module::new().with_method(
        "forward",
        annotate_args(vec![None, Some(ArgAnnotation::new(vec![-1, 3], DType::Float32))])(export(
            passthrough(),
        )),
    );
    let mut target = Module::new().with_method("forward", passthrough());

    apply_serializable_annotations(&mut target, &extract_serializable_annotations(&source)).unwrap();

    let annotations = target.method("forward").unwrap().arg_annotations().unwrap();
    assert_eq!(
        annotations,
        &[None, Some(ArgAnnotation::new(vec![-1, 3], DType::Float32))]
    );
    assert!(annotations[1].as_ref().unwrap().is_dynamic());
}

#[test]
fn half_tagged_methods_are_omitted() {
    let module = Module::new()
        .with_method("only_export", export(passthrough()))
        .with_method("only_args", annotate_args(vec![None])(passthrough()))
        .with_method("both", annotate_args(vec![None])(export(passthrough())))
        .with_method("neither", passthrough());

    let annotations = extract_serializable_annotations(&module);
    let names: Vec<_> = annotations
        .method_annotations
        .iter()
        .map(|annotation| annotation.method_name.as_str())
        .collect();
    assert_eq!(names, vec!["both"]);
}

#[test]
fn extraction_mirrors_children_in_order() {
    let annotations = extract_serializable_annotations(&build_model(true));

    let names: Vec<_> = annotations
        .submodule_annotations
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(names, vec!["encoder", "head"]);

    let encoder = annotations.submodule("encoder").unwrap();
    let layers: Vec<_> = encoder
        .submodule_annotations
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(layers, vec!["layer0", "layer1"]);

    // Present but empty for modules without annotated methods.
    assert_eq!(annotations.submodule("head"), Some(&ModuleAnnotations::new()));
}

#[test]
fn extraction_skips_untagged_and_non_callable_members() {
    let annotations = extract_serializable_annotations(&build_model(true));
    assert!(annotations.method("helper").is_none());
    assert!(annotations.method("num_classes").is_none());
    assert_eq!(annotations.num_method_annotations(), 4);

    let paths: Vec<_> = annotations
        .exported_methods()
        .into_iter()
        .map(|exported| exported.path)
        .collect();
    assert_eq!(
        paths,
        vec![
            "forward",
            "encoder.encode",
            "encoder.layer0.forward",
            "encoder.layer1.forward"
        ]
    );
}

#[test]
fn empty_module_yields_empty_annotations() {
    let annotations = extract_serializable_annotations(&Module::new());
    assert_eq!(
        annotations,
        ModuleAnnotations {
            method_annotations: vec![],
            submodule_annotations: vec![],
        }
    );
}

#[test]
fn extraction_does_not_mutate_input() {
    let module = build_model(true);
    let before = extract_serializable_annotations(&module);
    let after = extract_serializable_annotations(&module);
    assert_eq!(before, after);
}

#[test]
fn missing_method_is_an_error() {
    let mut target = Module::new().with_method("bar", passthrough());
    let annotations = ModuleAnnotations {
        method_annotations: vec![MethodAnnotation {
            method_name: "foo".to_string(),
            export: Some(true),
            arg_annotations: Some(vec![None]),
        }],
        submodule_annotations: vec![],
    };

    let err = apply_serializable_annotations(&mut target, &annotations).unwrap_err();
    assert!(err.is_attribute_not_found());
    assert!(err.to_string().contains("`foo`"));
    assert_eq!(target.method("bar").unwrap().is_exported(), None);
}

#[test]
fn missing_child_is_an_error_after_partial_application() {
    let source = build_model(true);
    let annotations = extract_serializable_annotations(&source);

    let mut target = Module::new()
        .with_method("forward", passthrough())
        .with_child("head", Module::new());

    let err = apply_serializable_annotations(&mut target, &annotations).unwrap_err();
    match err {
        Error::SubmoduleNotFound { module, name } => {
            assert_eq!(module, "<root>");
            assert_eq!(name, "encoder");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Methods handled before the failure keep their tags.
    assert_eq!(target.method("forward").unwrap().is_exported(), Some(true));
}

#[test]
fn nested_lookup_failure_reports_dotted_path() {
    let annotations = extract_serializable_annotations(&build_model(true));
    let mut target = build_model(false);
    target.add_child(
        "encoder",
        Module::new()
            .with_method("encode", passthrough())
            .with_child("layer0", Module::new())
            .with_child("layer1", Module::new()),
    );

    let err = apply_serializable_annotations(&mut target, &annotations).unwrap_err();
    match err {
        Error::AttributeNotFound { module, name } => {
            assert_eq!(module, "encoder.layer0");
            assert_eq!(name, "forward");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_callable_target_is_an_error() {
    let annotations = ModuleAnnotations {
        method_annotations: vec![MethodAnnotation {
            method_name: "num_classes".to_string(),
            export: Some(true),
            arg_annotations: None,
        }],
        submodule_annotations: vec![],
    };
    let mut target = Module::new().with_value("num_classes", 10_i64);

    let err = apply_serializable_annotations(&mut target, &annotations).unwrap_err();
    assert!(err.is_not_callable());
}

#[test]
fn absent_components_leave_existing_tags_untouched() {
    let mut target = Module::new().with_method(
        "forward",
        annotate_args(vec![None, None])(passthrough().with_tag(MethodTag::Export(false))),
    );
    let annotations = ModuleAnnotations {
        method_annotations: vec![MethodAnnotation {
            method_name: "forward".to_string(),
            export: Some(true),
            arg_annotations: None,
        }],
        submodule_annotations: vec![],
    };

    apply_serializable_annotations(&mut target, &annotations).unwrap();

    let method = target.method("forward").unwrap();
    assert_eq!(method.is_exported(), Some(true));
    assert_eq!(method.arg_annotations(), Some(&[None, None][..]));
}

#[test]
fn applied_methods_keep_call_behavior() {
    let source = build_model(true);
    let mut target = build_model(false);
    let original = target.method("forward").unwrap().clone();

    apply_serializable_annotations(&mut target, &extract_serializable_annotations(&source)).unwrap();

    let replaced = target.method("forward").unwrap();
    assert!(replaced.same_callable(&original));
    assert_eq!(original.is_exported(), None);
    let input = Value::Tensor(Tensor::new([5, 3], DType::Float32));
    assert_eq!(
        target.call("forward", &[Value::None, input.clone()]).unwrap(),
        input
    );
}

/// A tree backed by plain vectors instead of index maps.
mod flat_tree {
    use hyannot::prelude::*;

    pub struct Node {
        pub attributes: Vec<(String, Attribute)>,
        pub children: Vec<(String, Node)>,
    }

    impl ModuleTree for Node {
        fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
            self.attributes.iter().map(|(name, attr)| (name.as_str(), attr))
        }

        fn attribute(&self, name: &str) -> Option<&Attribute> {
            self.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, attr)| attr)
        }

        fn set_attribute(&mut self, name: &str, attribute: Attribute) {
            match self.attributes.iter_mut().find(|(n, _)| n == name) {
                Some((_, slot)) => *slot = attribute,
                None => self.attributes.push((name.to_string(), attribute)),
            }
        }

        fn named_children(&self) -> impl Iterator<Item = (&str, &Self)> {
            self.children.iter().map(|(name, child)| (name.as_str(), child))
        }

        fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
            self.children
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, child)| child)
        }
    }
}

#[test]
fn custom_tree_types_participate() {
    use flat_tree::Node;

    let source = build_model(true);
    let annotations = extract_serializable_annotations(&source);

    let mut target = Node {
        attributes: vec![
            ("forward".to_string(), passthrough().into()),
            ("helper".to_string(), passthrough().into()),
        ],
        children: vec![
            (
                "encoder".to_string(),
                Node {
                    attributes: vec![("encode".to_string(), passthrough().into())],
                    children: vec![
                        (
                            "layer0".to_string(),
                            Node {
                                attributes: vec![("forward".to_string(), passthrough().into())],
                                children: vec![],
                            },
                        ),
                        (
                            "layer1".to_string(),
                            Node {
                                attributes: vec![("forward".to_string(), passthrough().into())],
                                children: vec![],
                            },
                        ),
                    ],
                },
            ),
            (
                "head".to_string(),
                Node {
                    attributes: vec![],
                    children: vec![],
                },
            ),
        ],
    };

    apply_serializable_annotations(&mut target, &annotations).unwrap();
    assert_eq!(extract_serializable_annotations(&target), annotations);
}

#[test]
fn round_trip_keeps_explicit_non_export() {
    let source = Module::new().with_method(
        "helper",
        annotate_args(vec![None, Some(ArgAnnotation::new(vec![4], DType::Int32))])(
            passthrough().with_tag(MethodTag::Export(false)),
        ),
    );
    let annotations = extract_serializable_annotations(&source);
    assert_eq!(annotations.method("helper").map(|m| m.export), Some(Some(false)));
    assert!(annotations.exported_methods().is_empty());

    let mut target = Module::new().with_method("helper", passthrough());
    apply_serializable_annotations(&mut target, &annotations).unwrap();

    let method = target.method("helper").unwrap();
    assert_eq!(method.is_exported(), Some(false));
    assert_eq!(
        method.arg_annotations(),
        Some(&[None, Some(ArgAnnotation::new(vec![4], DType::Int32))][..])
    );
}
