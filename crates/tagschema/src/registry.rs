//! # Tag Registry
//!
//! Maps tags to builders. A registry is the standard catalog (a closed
//! [`StandardTag`] enumeration) plus an extension map of user builders,
//! which is consulted first so an extension may shadow a standard tag.
//!
//! ## Isolation
//!
//! There is one process-wide [`Registry::base`], built once and never
//! mutated. Every other registry is an owned value: [`Registry::create_instance`]
//! copies the current contents and shares nothing mutable with its source,
//! so registering on one instance is never visible through another.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value as Json;
use tagschema_core::Tag;

use crate::catalog::StandardTag;
use crate::error::BuildError;
use crate::validator::Function;
use crate::value::Value;

/// Signature shared by every builder.
pub type BuildFn = dyn Fn(Value) -> Result<Value, BuildError> + Send + Sync;

/// A shareable builder function.
#[derive(Clone)]
pub struct Builder(Arc<BuildFn>);

impl Builder {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BuildError> + Send + Sync + 'static,
    {
        Self(Arc::new(build))
    }

    pub fn build(&self, body: Value) -> Result<Value, BuildError> {
        (self.0)(body)
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Builder(..)")
    }
}

/// What a lookup found for a tag.
#[derive(Debug, Clone)]
pub enum Entry {
    Standard(StandardTag),
    Extension(Builder),
}

impl Entry {
    pub fn build(&self, body: Value) -> Result<Value, BuildError> {
        match self {
            Self::Standard(tag) => tag.build(body),
            Self::Extension(builder) => builder.build(body),
        }
    }
}

#[derive(Clone)]
pub struct Registry {
    standard: bool,
    extensions: HashMap<String, Builder>,
}

static BASE: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// The process-wide registry holding only the standard catalog.
    pub fn base() -> &'static Registry {
        BASE.get_or_init(|| Registry {
            standard: true,
            extensions: HashMap::new(),
        })
    }

    /// A fresh instance of the base registry.
    pub fn new() -> Self {
        Self::base().create_instance()
    }

    /// A registry with no tags at all, not even the standard catalog.
    pub fn empty() -> Self {
        Self {
            standard: false,
            extensions: HashMap::new(),
        }
    }

    /// Independent copy of this registry's current contents.
    pub fn create_instance(&self) -> Self {
        self.clone()
    }

    /// Register `build` under `tag`, replacing any previous extension.
    ///
    /// A leading `!` on the tag is ignored. Registering a standard tag
    /// shadows the standard builder for this registry only.
    pub fn register<F>(&mut self, tag: &str, build: F)
    where
        F: Fn(Value) -> Result<Value, BuildError> + Send + Sync + 'static,
    {
        self.register_builder(tag, Builder::new(build));
    }

    pub fn register_builder(&mut self, tag: &str, builder: Builder) {
        let tag = Tag::new(tag);
        tracing::trace!(tag = %tag, "registered builder");
        self.extensions.insert(tag.as_str().to_string(), builder);
    }

    /// Register a named predicate as tag `function.<name>`.
    ///
    /// The tag's body must be empty; it builds the function value that
    /// `validator.function` takes as its `function` argument:
    ///
    /// ```yaml
    /// validator: !validator.function
    ///   function: !function.is_cold {}
    ///   message: Too darn hot!
    /// ```
    pub fn register_function<F>(&mut self, name: &str, predicate: F)
    where
        F: Fn(&Json) -> bool + Send + Sync + 'static,
    {
        let function = Function::new(name, predicate);
        self.register(&format!("function.{name}"), move |body| match body {
            Value::Null => Ok(Value::Function(function.clone())),
            Value::Mapping(args) => match args.keys().next() {
                None => Ok(Value::Function(function.clone())),
                Some(key) => Err(BuildError::UnknownKey { key: key.to_string() }),
            },
            other => Err(BuildError::ExpectedMapping { found: other.kind() }),
        });
    }

    /// Remove an extension builder. A shadowed standard tag becomes visible
    /// again.
    pub fn unregister(&mut self, tag: &str) -> Option<Builder> {
        self.extensions.remove(Tag::new(tag).as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Find the builder for `tag`, extensions first.
    pub fn lookup(&self, tag: &str) -> Option<Entry> {
        let tag = Tag::new(tag);
        if let Some(builder) = self.extensions.get(tag.as_str()) {
            return Some(Entry::Extension(builder.clone()));
        }
        if self.standard {
            return StandardTag::parse(tag.as_str()).map(Entry::Standard);
        }
        None
    }

    /// Every tag this registry resolves, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: BTreeSet<String> = self.extensions.keys().cloned().collect();
        if self.standard {
            tags.extend(StandardTag::all().iter().map(ToString::to_string));
        }
        tags.into_iter().collect()
    }

    /// Sorted extension tags only.
    pub fn extension_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.extensions.keys().cloned().collect();
        tags.sort();
        tags
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("standard", &self.standard)
            .field("extensions", &self.extension_tags())
            .finish()
    }
}
