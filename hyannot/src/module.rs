//! Hierarchical model modules.
//!
//! A module owns named attributes, some of which are callable [`Method`]s, and an
//! ordered set of named child modules. The annotation walks only rely on the
//! [`ModuleTree`] interface, so any tree-shaped container can participate.
use indexmap::IndexMap;
use strum::{EnumIs, EnumTryAs};

use crate::{
    method::Method,
    utils::{AnnotResult, Error, display_path, qualified_name},
    value::Value,
};

/// A named member of a module.
#[derive(Debug, Clone, EnumIs, EnumTryAs)]
pub enum Attribute {
    Method(Method),
    Value(Value),
}

impl Attribute {
    /// Returns `true` if the attribute can be invoked and therefore annotated.
    #[inline]
    pub fn is_callable(&self) -> bool {
        self.is_method()
    }
}

impl From<Method> for Attribute {
    fn from(method: Method) -> Self {
        Attribute::Method(method)
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Value(value)
    }
}

/// Interface a container must implement to have its annotations extracted or applied.
///
/// Children form a tree: no node may be reachable twice. Both enumerations must be
/// deterministic, since the extracted annotations preserve their order.
pub trait ModuleTree: Sized {
    /// Iterate over the attributes of this node in declaration order.
    fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)>;

    /// Look up an attribute by name.
    fn attribute(&self, name: &str) -> Option<&Attribute>;

    /// Store `attribute` under `name`, replacing any previous value.
    fn set_attribute(&mut self, name: &str, attribute: Attribute);

    /// Iterate over the direct children of this node in declaration order.
    fn named_children(&self) -> impl Iterator<Item = (&str, &Self)>;

    /// Look up a direct child by name.
    fn child_mut(&mut self, name: &str) -> Option<&mut Self>;
}

/// Concrete module tree node.
#[derive(Debug, Clone, Default)]
pub struct Module {
    attributes: IndexMap<String, Attribute>,
    children: IndexMap<String, Module>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method. Re-registering a name keeps its original position.
    pub fn register_method(&mut self, name: impl Into<String>, method: Method) {
        self.attributes.insert(name.into(), Attribute::Method(method));
    }

    /// Register a non-callable attribute.
    pub fn register_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes
            .insert(name.into(), Attribute::Value(value.into()));
    }

    /// Register a child module. Re-registering a name keeps its original position.
    pub fn add_child(&mut self, name: impl Into<String>, child: Module) {
        self.children.insert(name.into(), child);
    }

    pub fn with_method(mut self, name: impl Into<String>, method: Method) -> Self {
        self.register_method(name, method);
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.register_value(name, value);
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, child: Module) -> Self {
        self.add_child(name, child);
        self
    }

    /// Look up a method, ignoring non-callable attributes.
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.attributes.get(name).and_then(Attribute::try_as_method_ref)
    }

    pub fn child(&self, name: &str) -> Option<&Module> {
        self.children.get(name)
    }

    /// Number of direct children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Invoke a method addressed by its dotted path from this module
    /// (`forward`, `encoder.layer0.forward`). `args` must include the receiver at
    /// position 0.
    ///
    /// Errors name the failing node by its path relative to this module, `<root>`
    /// being this module itself.
    pub fn call(&self, path: &str, args: &[Value]) -> AnnotResult<Value> {
        let (module_path, name) = path.rsplit_once('.').unwrap_or(("", path));

        let mut module = self;
        let mut visited = String::new();
        if !module_path.is_empty() {
            for segment in module_path.split('.') {
                module = module
                    .children
                    .get(segment)
                    .ok_or_else(|| Error::SubmoduleNotFound {
                        module: display_path(&visited),
                        name: segment.to_string(),
                    })?;
                visited = qualified_name(&visited, segment);
            }
        }

        match module.attributes.get(name) {
            Some(Attribute::Method(method)) => Ok(method.call(args)),
            Some(Attribute::Value(_)) => Err(Error::NotCallable {
                module: display_path(module_path),
                name: name.to_string(),
            }),
            None => Err(Error::AttributeNotFound {
                module: display_path(module_path),
                name: name.to_string(),
            }),
        }
    }
}

impl ModuleTree for Module {
    fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.as_str(), attribute))
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    fn set_attribute(&mut self, name: &str, attribute: Attribute) {
        self.attributes.insert(name.to_string(), attribute);
    }

    fn named_children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children.iter().map(|(name, child)| (name.as_str(), child))
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children.get_mut(name)
    }
}
