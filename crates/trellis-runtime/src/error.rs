//! Runtime error taxonomy
//!
//! Every failure the core can raise is a variant here. Configuration errors
//! (missing methods, bad signature tags, unregistered types) indicate defects
//! in generated code and abort the call in progress; they are never retried.

/// Errors raised by the object-model runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Virtual lookup found no implementation of the method anywhere in the
    /// receiver's resolution order.
    #[error("Cannot invoke method {method} in type {type_identifier}")]
    MissingMethod {
        /// Name of the method that was looked up.
        method: String,
        /// Identifier of the type the lookup started at.
        type_identifier: String,
    },

    /// Super dispatch found no implementation above the declaring type.
    #[error("Cannot invoke super method {method} above type {type_identifier}")]
    MissingSuperMethod {
        /// Name of the method that was looked up.
        method: String,
        /// Identifier of the declaring type the walk skipped past.
        type_identifier: String,
    },

    /// An overloaded method was called without a trailing signature tag, or
    /// with a trailing argument that is not a tag.
    #[error("Method {method} called with an invalid signature tag")]
    InvalidSignatureTag {
        /// Name of the overloaded method.
        method: String,
    },

    /// A type identifier was looked up before being registered.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A type identifier was registered twice.
    #[error("Type {0} is already registered")]
    DuplicateType(String),

    /// An operation that requires a non-null reference was given null.
    #[error("Null reference")]
    NullReference,

    /// A failed `as_instance` cast.
    #[error("The object of type {actual} cannot be cast to {requested}")]
    ClassCast {
        /// Identifier describing the value's actual type.
        actual: String,
        /// Identifier of the requested target type.
        requested: String,
    },

    /// The wire document could not be rendered.
    #[error("Value is not serializable: {0}")]
    NotSerializable(String),
}
