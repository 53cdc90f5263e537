//! Directive errors.

/// A directive that requires a body was used without one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("content block expected for the \"{directive}\" directive; none found")]
pub struct MissingContentError {
    /// Name of the directive.
    pub directive: String,
}

/// Error raised while running a directive.
///
/// The document parser reports these as diagnostics and omits the
/// directive's node; they never abort a build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// Directive body was empty.
    #[error(transparent)]
    MissingContent(#[from] MissingContentError),
    /// Option not declared by the directive.
    #[error("unknown option \"{option}\" for the \"{directive}\" directive")]
    UnknownOption {
        /// Name of the directive.
        directive: String,
        /// The unrecognized option.
        option: String,
    },
    /// A flag option was given a value.
    #[error("option \"{option}\" of the \"{directive}\" directive takes no value")]
    FlagWithValue {
        /// Name of the directive.
        directive: String,
        /// The flag option.
        option: String,
    },
    /// Nested directives went deeper than the parser allows.
    #[error("directive nesting exceeds the maximum depth of {max_depth}")]
    DepthExceeded {
        /// Configured maximum depth.
        max_depth: usize,
    },
}
