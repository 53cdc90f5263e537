//! Declared directive options and their validation.

use std::collections::BTreeMap;

use super::{DirectiveArgs, DirectiveError};

/// How an option's value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    /// Present or absent; must not carry a value.
    Flag,
    /// Free-form string kept as written (empty when given as a bare word).
    Unchanged,
}

/// One option a directive accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as written by authors.
    pub name: &'static str,
    /// Value handling.
    pub kind: OptionKind,
}

impl OptionSpec {
    /// Declare a flag option.
    #[must_use]
    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Flag,
        }
    }

    /// Declare a string option.
    #[must_use]
    pub const fn unchanged(name: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Unchanged,
        }
    }
}

/// Options given to one directive occurrence, validated against its spec.
///
/// `{#x}` is read as option `id`, `.x` as option `class`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveOptions(BTreeMap<String, Option<String>>);

impl DirectiveOptions {
    /// Validate parsed arguments against a directive's option spec.
    pub fn from_args(
        directive: &str,
        args: &DirectiveArgs,
        spec: &[OptionSpec],
    ) -> Result<Self, DirectiveError> {
        let supplied = args
            .id
            .iter()
            .map(|id| ("id", Some(id.as_str())))
            .chain(args.classes.iter().map(|c| ("class", Some(c.as_str()))))
            .chain(args.attrs.iter().map(|(k, v)| (k.as_str(), Some(v.as_str()))))
            .chain(args.flags.iter().map(|f| (f.as_str(), None)));

        let mut options = BTreeMap::new();
        for (name, value) in supplied {
            let Some(option) = spec.iter().find(|o| o.name == name) else {
                return Err(DirectiveError::UnknownOption {
                    directive: directive.to_owned(),
                    option: name.to_owned(),
                });
            };

            let value = match (option.kind, value) {
                (OptionKind::Flag, None) => None,
                (OptionKind::Flag, Some(_)) => {
                    return Err(DirectiveError::FlagWithValue {
                        directive: directive.to_owned(),
                        option: name.to_owned(),
                    });
                }
                (OptionKind::Unchanged, value) => Some(value.unwrap_or_default().to_owned()),
            };
            options.insert(name.to_owned(), value);
        }

        Ok(Self(options))
    }

    /// Whether the option was given at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value of a string option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Option::as_deref)
    }

    /// Whether no options were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
