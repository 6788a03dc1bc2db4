//! SDK Catalog
//!
//! An explicit table of SDK modules and their members. Modules are keyed by
//! dotted path; members are classes, functions, or nothing but the child
//! modules registered beneath them.

use crate::error::{ProfileError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Builds a value from JSON parameters
pub type Constructor = Arc<dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync>;

/// A class or function registered in a module
#[derive(Clone)]
pub struct SdkCallable {
    name: String,
    path: String,
    constructor: Constructor,
}

impl SdkCallable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified dotted path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Invoke the constructor
    pub fn call(&self, params: &Value) -> anyhow::Result<Value> {
        tracing::debug!("call: {}", self.path);
        (self.constructor)(params)
    }
}

impl fmt::Debug for SdkCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkCallable")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// A loaded SDK module
#[derive(Debug)]
pub struct SdkModule {
    path: String,
    members: BTreeMap<String, SdkItem>,
}

impl SdkModule {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Names of directly registered members (child modules excluded)
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// Anything an attribute path can resolve to
#[derive(Debug, Clone)]
pub enum SdkItem {
    Module(Arc<SdkModule>),
    Class(SdkCallable),
    Function(SdkCallable),
}

/// Serializable summary of an [`SdkItem`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkItemInfo {
    pub kind: &'static str,
    pub path: String,
}

impl SdkItem {
    /// Fully qualified dotted path
    pub fn path(&self) -> &str {
        match self {
            SdkItem::Module(m) => m.path(),
            SdkItem::Class(c) | SdkItem::Function(c) => c.path(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SdkItem::Module(_) => "module",
            SdkItem::Class(_) => "class",
            SdkItem::Function(_) => "function",
        }
    }

    pub fn as_module(&self) -> Option<&Arc<SdkModule>> {
        match self {
            SdkItem::Module(m) => Some(m),
            _ => None,
        }
    }

    /// The class or function behind this item
    pub fn as_callable(&self) -> Option<&SdkCallable> {
        match self {
            SdkItem::Class(c) | SdkItem::Function(c) => Some(c),
            SdkItem::Module(_) => None,
        }
    }

    pub fn info(&self) -> SdkItemInfo {
        SdkItemInfo {
            kind: self.kind(),
            path: self.path().to_string(),
        }
    }
}

/// All registered SDK modules
#[derive(Debug, Default)]
pub struct SdkCatalog {
    modules: HashMap<String, Arc<SdkModule>>,
}

impl SdkCatalog {
    pub fn builder() -> SdkCatalogBuilder {
        SdkCatalogBuilder::default()
    }

    /// Load a module by dotted path
    pub fn import_module(&self, path: &str) -> Result<Arc<SdkModule>> {
        tracing::debug!("import_module: {}", path);
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| ProfileError::ModuleNotFound(path.to_string()))
    }

    /// Look up a member on an item. Child modules count as members of
    /// their parent module.
    pub fn getattr(&self, item: &SdkItem, name: &str) -> Result<SdkItem> {
        let not_found = || ProfileError::AttributeNotFound {
            path: item.path().to_string(),
            attribute: name.to_string(),
        };

        let SdkItem::Module(module) = item else {
            return Err(not_found());
        };

        if let Some(member) = module.members.get(name) {
            return Ok(member.clone());
        }

        self.modules
            .get(&format!("{}.{}", module.path, name))
            .map(|child| SdkItem::Module(child.clone()))
            .ok_or_else(not_found)
    }

    /// Sorted module paths
    pub fn module_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

enum MemberKind {
    Class,
    Function,
}

/// Populates an [`SdkCatalog`] at init time
#[derive(Default)]
pub struct SdkCatalogBuilder {
    modules: BTreeMap<String, Vec<(String, MemberKind, Constructor)>>,
}

impl SdkCatalogBuilder {
    /// Register an (initially empty) module and all of its ancestors
    pub fn module(mut self, path: &str) -> Self {
        self.ensure_module(path);
        self
    }

    /// Register a class on a module, creating the module if needed
    pub fn class<F>(mut self, module: &str, name: &str, constructor: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.add_member(module, name, MemberKind::Class, Arc::new(constructor));
        self
    }

    /// Register a function on a module, creating the module if needed
    pub fn function<F>(mut self, module: &str, name: &str, func: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.add_member(module, name, MemberKind::Function, Arc::new(func));
        self
    }

    fn ensure_module(&mut self, path: &str) {
        let mut prefix = String::new();
        for part in path.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(part);
            self.modules.entry(prefix.clone()).or_default();
        }
    }

    fn add_member(&mut self, module: &str, name: &str, kind: MemberKind, ctor: Constructor) {
        self.ensure_module(module);
        if let Some(members) = self.modules.get_mut(module) {
            members.retain(|(existing, _, _)| existing != name);
            members.push((name.to_string(), kind, ctor));
        }
    }

    pub fn build(self) -> SdkCatalog {
        let modules = self
            .modules
            .into_iter()
            .map(|(path, members)| {
                let members = members
                    .into_iter()
                    .map(|(name, kind, constructor)| {
                        let callable = SdkCallable {
                            path: format!("{}.{}", path, name),
                            name: name.clone(),
                            constructor,
                        };
                        let item = match kind {
                            MemberKind::Class => SdkItem::Class(callable),
                            MemberKind::Function => SdkItem::Function(callable),
                        };
                        (name, item)
                    })
                    .collect();
                let module = Arc::new(SdkModule {
                    path: path.clone(),
                    members,
                });
                (path, module)
            })
            .collect();

        SdkCatalog { modules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SdkCatalog {
        SdkCatalog::builder()
            .class("pkg.v1.models", "Widget", |p| Ok(json!({ "widget": p })))
            .function("pkg.v1", "helper", |_| Ok(json!("helped")))
            .module("pkg.v1.operations")
            .build()
    }

    #[test]
    fn test_ancestors_are_registered() {
        let catalog = sample();
        assert_eq!(
            catalog.module_paths(),
            vec!["pkg", "pkg.v1", "pkg.v1.models", "pkg.v1.operations"]
        );
    }

    #[test]
    fn test_import_missing_module() {
        let err = sample().import_module("pkg.v2").unwrap_err();
        assert_eq!(err, ProfileError::ModuleNotFound("pkg.v2".to_string()));
    }

    #[test]
    fn test_getattr_finds_members_and_child_modules() {
        let catalog = sample();
        let root = SdkItem::Module(catalog.import_module("pkg.v1").unwrap());

        let helper = catalog.getattr(&root, "helper").unwrap();
        assert_eq!(helper.kind(), "function");
        assert_eq!(helper.path(), "pkg.v1.helper");

        let models = catalog.getattr(&root, "models").unwrap();
        assert_eq!(models.kind(), "module");
        let widget = catalog.getattr(&models, "Widget").unwrap();
        assert_eq!(widget.path(), "pkg.v1.models.Widget");
    }

    #[test]
    fn test_getattr_on_class_fails() {
        let catalog = sample();
        let models = SdkItem::Module(catalog.import_module("pkg.v1.models").unwrap());
        let widget = catalog.getattr(&models, "Widget").unwrap();
        let err = catalog.getattr(&widget, "anything").unwrap_err();
        assert_eq!(
            err,
            ProfileError::AttributeNotFound {
                path: "pkg.v1.models.Widget".to_string(),
                attribute: "anything".to_string(),
            }
        );
    }

    #[test]
    fn test_callable_invokes_constructor() {
        let catalog = sample();
        let models = SdkItem::Module(catalog.import_module("pkg.v1.models").unwrap());
        let widget = catalog.getattr(&models, "Widget").unwrap();
        let out = widget.as_callable().unwrap().call(&json!({"size": 3})).unwrap();
        assert_eq!(out, json!({ "widget": { "size": 3 } }));
    }

    #[test]
    fn test_reregistering_member_replaces_it() {
        let catalog = SdkCatalog::builder()
            .function("m", "f", |_| Ok(json!(1)))
            .function("m", "f", |_| Ok(json!(2)))
            .build();
        let m = SdkItem::Module(catalog.import_module("m").unwrap());
        let f = catalog.getattr(&m, "f").unwrap();
        assert_eq!(f.as_callable().unwrap().call(&Value::Null).unwrap(), json!(2));
        assert_eq!(m.as_module().unwrap().member_names().count(), 1);
    }
}
