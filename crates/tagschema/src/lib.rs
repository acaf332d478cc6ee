//! # tagschema — Tag-Driven Schema Construction
//!
//! Builds typed validation-schema trees from YAML documents whose nodes
//! carry local tags:
//!
//! ```yaml
//! !schema
//!   children:
//!     - !field.integer
//!       name: rating
//!       validator: !validator.range {min: 1, max: 5}
//! ```
//!
//! ## Pipeline
//!
//! text → [`tagschema_core::Node`] tree → [`Resolver`] (children first,
//! through a [`Registry`]) → [`SchemaNode`] tree.
//!
//! ## Guarantees
//!
//! 1. **Isolation.** Every parse runs against its own registry instance.
//!    Registrations on one instance are invisible to the base registry and
//!    to every other instance.
//!
//! 2. **Order.** Children, `one_of` choices, and `all` validators keep
//!    their declared order.
//!
//! 3. **Fail closed.** An unknown tag, a rejected argument, or a failing
//!    extension aborts the parse. No partial tree is returned.
//!
//! ## Crate Policy
//!
//! - No global mutable state. The base registry is initialised once and
//!   read-only afterwards.
//! - Builders are pure functions of their resolved body.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod builders;
pub mod catalog;
pub mod check;
pub mod error;
pub mod node;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod types;
pub mod validator;
pub mod value;
pub mod widget;

pub use catalog::{StandardTag, ValidatorTag};
pub use check::{Violation, Violations};
pub use error::{BuildError, SchemaError};
pub use node::{FieldSpec, SchemaNode};
pub use parser::{parse, ParserConfig, SchemaParser};
pub use registry::{Builder, Entry, Registry};
pub use resolve::Resolver;
pub use types::{CustomType, SchemaType, TypeKind};
pub use validator::{Check, CustomValidator, Function, Invalid, Pattern, Validator};
pub use value::{Mapping, Number, Value};
pub use widget::{Widget, WidgetKind};
