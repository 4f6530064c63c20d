//! Trellis object-model runtime
//!
//! Lets code compiled from a class-based, single-inheritance-with-traits
//! source language run on a classless, dynamically typed host. This crate
//! provides:
//! - linearized type hierarchies with metaclass/type-identity tracking
//! - polymorphic method dispatch, overload selection, and super-call
//!   resolution
//! - runtime type predicates (`is_instance`, `as_instance`)
//! - a cycle-safe object-graph serializer for the remote-call boundary
//!
//! The source-to-target compiler that emits type declarations and call sites
//! is an external collaborator and is assumed to produce well-formed
//! metadata; this crate performs no static checking.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bootstrap;
pub mod builtins;
pub mod dispatch;
pub mod error;
pub mod intern;
pub mod object;
pub mod registry;
pub mod remote;
pub mod runtime;
pub mod serialize;
pub mod typecheck;
pub mod value;

pub use dispatch::overloaded_method;
pub use error::RuntimeError;
pub use intern::SignatureTag;
pub use object::{Instance, ObjRef};
pub use registry::{Method, TypeDecl, TypeDescriptor, TypeId, TypeRegistry};
pub use remote::{RemoteProxy, REMOTE_CALL_SIGNATURE};
pub use runtime::{Runtime, Singleton, TypeConstructor, INIT_METHOD};
pub use value::Value;
