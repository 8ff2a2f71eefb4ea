//! Resource naming conventions.
//!
//! Pure functions that map a resource to its name and to the path fragments
//! every convention builds on:
//!
//! | Function | `Person` |
//! |---|---|
//! | [`name_for`] | `person` |
//! | [`collection_path_for`] | `/person` |
//! | [`instance_path_for`] | `/person/<uuid:person_id>` |
//! | [`relation_path_for`] (`Address`) | `/person/<uuid:person_id>/address` |

use std::fmt;

/// A type that names a REST resource.
///
/// The default name is the snake-cased type name; override
/// [`Resource::resource_name`] to alias it.
///
/// ```
/// use meridian_core::naming::{name_for, Resource, ResourceName};
///
/// struct FooBar;
/// impl Resource for FooBar {}
///
/// struct Legacy;
/// impl Resource for Legacy {
///     fn resource_name() -> String {
///         "widget".to_string()
///     }
/// }
///
/// assert_eq!(name_for(ResourceName::of::<FooBar>()), "foo_bar");
/// assert_eq!(name_for(ResourceName::of::<Legacy>()), "widget");
/// assert_eq!(name_for("already_named"), "already_named");
/// ```
pub trait Resource {
    /// The resource name.
    fn resource_name() -> String
    where
        Self: Sized,
    {
        snake_case(short_type_name(std::any::type_name::<Self>()))
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// The resolved name of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    /// Names a [`Resource`] type.
    #[must_use]
    pub fn of<R: Resource>() -> Self {
        Self(R::resource_name())
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ResourceName {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&ResourceName> for ResourceName {
    fn from(value: &ResourceName) -> Self {
        value.clone()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the name of a resource.
pub fn name_for(resource: impl Into<ResourceName>) -> String {
    resource.into().0
}

/// `/{name}`
pub fn collection_path_for(resource: impl Into<ResourceName>) -> String {
    format!("/{}", name_for(resource))
}

/// Singleton resources share the collection path.
pub fn singleton_path_for(resource: impl Into<ResourceName>) -> String {
    collection_path_for(resource)
}

/// `/{name}/<uuid:{name}_id>`
pub fn instance_path_for(resource: impl Into<ResourceName>) -> String {
    let name = name_for(resource);
    format!("/{name}/<uuid:{name}_id>")
}

/// The object's collection nested under the subject's instance.
pub fn relation_path_for(
    subject: impl Into<ResourceName>,
    object: impl Into<ResourceName>,
) -> String {
    format!(
        "{}{}",
        instance_path_for(subject),
        collection_path_for(object)
    )
}

/// Converts `FooBar`, `fooBar` or `foo-bar` to `foo_bar`.
pub fn snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev_lower = false;
    for c in value.chars() {
        if c == '-' || c == ' ' {
            out.push('_');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// English pluralisation for resource names.
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let vowel_before = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if !stem.is_empty() && !vowel_before {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("sh")
        || word.ends_with("ch")
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Derives a definition type name from a schema name.
///
/// A trailing `Schema` is dropped and the rest is capitalised:
/// `foo_bar`, `foo_bar_schema` and `FooBarSchema` all become `FooBar`.
pub fn type_name(schema_name: &str) -> String {
    let snake = snake_case(schema_name);
    let stem = snake.strip_suffix("_schema").unwrap_or(&snake);
    stem.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}
