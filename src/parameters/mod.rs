//! Declarative query-parameter serialization.
//!
//! Request objects and the enums they carry describe their wire format with
//! static tables instead of runtime reflection. [`request_parameters!`] and
//! [`parameter_enum!`] generate those tables next to the type declaration:
//!
//! ```
//! use integrations_github_sdk::parameters::RequestParameters;
//! use integrations_github_sdk::{parameter_enum, request_parameters};
//!
//! parameter_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
//!     pub enum IssueFilter {
//!         #[default]
//!         Assigned,
//!         Created,
//!         Mentioned,
//!         SubscribedOnly => "subscribed",
//!     }
//! }
//!
//! request_parameters! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct IssueRequest {
//!         pub filter: IssueFilter,
//!         pub per_page: u32 => "per_page",
//!         pub include_closed: bool => "all",
//!     }
//! }
//!
//! let request = IssueRequest {
//!     filter: IssueFilter::SubscribedOnly,
//!     per_page: 50,
//!     include_closed: true,
//! };
//! let parameters = request.to_parameters().unwrap();
//! assert_eq!(
//!     parameters.to_query_string().unwrap(),
//!     "filter=subscribed&per_page=50&all=true"
//! );
//! ```
//!
//! Names without an override are derived with [`wire_name`]; every field is
//! emitted, including fields left at their default value.

use crate::errors::{GitHubError, GitHubResult};
use std::borrow::Cow;
use std::fmt;

/// Derives a wire name from an identifier.
///
/// Capitalized words become lowercase words joined by underscores
/// (`SortDirection` becomes `sort_direction`, `HTMLUrl` becomes `html_url`).
/// Identifiers that are already snake case pass through unchanged, and a raw
/// identifier prefix (`r#type`) is dropped.
pub fn wire_name(identifier: &str) -> String {
    let identifier = identifier.strip_prefix("r#").unwrap_or(identifier);
    let chars: Vec<char> = identifier.chars().collect();
    let mut name = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            name.push(c);
            continue;
        }
        if i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && prev != '_' {
                name.push('_');
            }
        }
        name.extend(c.to_lowercase());
    }

    name
}

/// One declared member of a [`ParameterEnum`].
#[derive(Debug, Clone)]
pub struct EnumMember<T> {
    value: T,
    name: &'static str,
    parameter: Option<&'static str>,
    wire: Cow<'static, str>,
}

impl<T> EnumMember<T> {
    /// Creates a member entry, deriving its wire value unless `parameter` overrides it.
    pub fn new(value: T, name: &'static str, parameter: Option<&'static str>) -> Self {
        let wire = match parameter {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(wire_name(name)),
        };
        Self {
            value,
            name,
            parameter,
            wire,
        }
    }

    /// Gets the member value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Gets the declared member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the explicit override, if one was declared.
    pub fn parameter(&self) -> Option<&'static str> {
        self.parameter
    }

    /// Gets the string sent on the wire.
    pub fn wire_value(&self) -> &str {
        &self.wire
    }
}

/// An enum whose members map to wire strings through a static table.
///
/// Implemented by [`parameter_enum!`].
pub trait ParameterEnum: Copy + PartialEq + fmt::Debug + Sized + 'static {
    /// Declared members, in declaration order.
    fn members() -> &'static [EnumMember<Self>];

    /// Looks up the table entry for this value.
    fn member(&self) -> GitHubResult<&'static EnumMember<Self>> {
        Self::members()
            .iter()
            .find(|member| member.value == *self)
            .ok_or_else(|| {
                GitHubError::serialization(format!(
                    "{:?} is not a declared member of {}",
                    self,
                    std::any::type_name::<Self>()
                ))
            })
    }

    /// Gets the wire value for this member.
    fn wire_value(&self) -> GitHubResult<&'static str> {
        self.member().map(EnumMember::wire_value)
    }
}

/// A value that can be written as a query-parameter value.
pub trait ParameterValue {
    /// Renders the value in its locale-independent wire form.
    fn to_parameter_value(&self) -> GitHubResult<String>;
}

macro_rules! display_parameter_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParameterValue for $ty {
                fn to_parameter_value(&self) -> GitHubResult<String> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

display_parameter_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool, String);

impl ParameterValue for str {
    fn to_parameter_value(&self) -> GitHubResult<String> {
        Ok(self.to_owned())
    }
}

/// Accessor producing the wire value of one field.
pub type FieldValue<T> = fn(&T) -> GitHubResult<String>;

/// One declared field of a [`RequestParameters`] type.
pub struct ParameterField<T> {
    name: &'static str,
    parameter: Option<&'static str>,
    wire: Cow<'static, str>,
    value: FieldValue<T>,
}

impl<T> ParameterField<T> {
    /// Creates a field entry, deriving its wire name unless `parameter` overrides it.
    pub fn new(name: &'static str, parameter: Option<&'static str>, value: FieldValue<T>) -> Self {
        let wire = match parameter {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(wire_name(name)),
        };
        Self {
            name,
            parameter,
            wire,
            value,
        }
    }

    /// Gets the declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the explicit override, if one was declared.
    pub fn parameter(&self) -> Option<&'static str> {
        self.parameter
    }

    /// Gets the parameter name sent on the wire.
    pub fn wire_name(&self) -> &str {
        &self.wire
    }

    /// Reads this field from `request`.
    pub fn value_of(&self, request: &T) -> GitHubResult<String> {
        (self.value)(request)
    }
}

impl<T> fmt::Debug for ParameterField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterField")
            .field("name", &self.name)
            .field("wire", &self.wire)
            .finish()
    }
}

/// A typed request object that serializes to query parameters.
///
/// Implemented by [`request_parameters!`].
pub trait RequestParameters: Sized + 'static {
    /// Declared fields, in declaration order.
    fn fields() -> &'static [ParameterField<Self>];

    /// Serializes this request.
    fn to_parameters(&self) -> GitHubResult<Parameters> {
        serialize(self)
    }
}

/// Turns a request object into ordered `(name, value)` pairs.
///
/// Pairs follow field declaration order. Nothing is omitted.
pub fn serialize<P: RequestParameters>(request: &P) -> GitHubResult<Parameters> {
    let fields = P::fields();
    let mut parameters = Parameters::with_capacity(fields.len());
    for field in fields {
        parameters.push(field.wire_name(), field.value_of(request)?);
    }
    Ok(parameters)
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty parameter list with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    /// Appends a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Gets the first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Gets the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Gets the pairs as a slice.
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Encodes the pairs as an `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> GitHubResult<String> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| {
            GitHubError::serialization(format!("Failed to encode query string: {}", e)).with_cause(e)
        })
    }
}

impl IntoIterator for Parameters {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __parameter_override {
    () => {
        ::core::option::Option::None
    };
    ($wire:literal) => {
        ::core::option::Option::Some($wire)
    };
}

/// Declares an enum together with its [`ParameterEnum`] table.
///
/// A member written `Name => "literal"` is sent as `literal`; other members
/// are sent as their [`wire_name`].
#[macro_export]
macro_rules! parameter_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident $(=> $wire:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::parameters::ParameterEnum for $name {
            fn members() -> &'static [$crate::parameters::EnumMember<Self>] {
                static MEMBERS: ::std::sync::OnceLock<
                    ::std::vec::Vec<$crate::parameters::EnumMember<$name>>,
                > = ::std::sync::OnceLock::new();
                MEMBERS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::parameters::EnumMember::new(
                                $name::$variant,
                                ::core::stringify!($variant),
                                $crate::__parameter_override!($($wire)?),
                            ),
                        )+
                    ]
                })
            }
        }

        impl $crate::parameters::ParameterValue for $name {
            fn to_parameter_value(
                &self,
            ) -> $crate::errors::GitHubResult<::std::string::String> {
                $crate::parameters::ParameterEnum::wire_value(self)
                    .map(::std::string::ToString::to_string)
            }
        }
    };
}

/// Declares a request struct together with its [`RequestParameters`] table.
///
/// A field written `name: Type => "literal"` is sent under `literal`; other
/// fields are sent under their [`wire_name`]. Field types implement
/// [`ParameterValue`].
#[macro_export]
macro_rules! request_parameters {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $wire:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )+
        }

        impl $crate::parameters::RequestParameters for $name {
            fn fields() -> &'static [$crate::parameters::ParameterField<Self>] {
                static FIELDS: ::std::sync::OnceLock<
                    ::std::vec::Vec<$crate::parameters::ParameterField<$name>>,
                > = ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    ::std::vec![
                        $(
                            $crate::parameters::ParameterField::new(
                                ::core::stringify!($field),
                                $crate::__parameter_override!($($wire)?),
                                |request: &$name| {
                                    $crate::parameters::ParameterValue::to_parameter_value(
                                        &request.$field,
                                    )
                                },
                            ),
                        )+
                    ]
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubErrorKind;
    use test_case::test_case;

    #[test_case("SortDirection", "sort_direction")]
    #[test_case("FullName", "full_name")]
    #[test_case("Owner", "owner")]
    #[test_case("HTMLUrl", "html_url")]
    #[test_case("UserID", "user_id")]
    #[test_case("Sha256Sum", "sha256_sum")]
    #[test_case("sort_direction", "sort_direction")]
    #[test_case("perPage", "per_page")]
    #[test_case("r#type", "type")]
    fn test_wire_name(identifier: &str, expected: &str) {
        assert_eq!(wire_name(identifier), expected);
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Partial {
        Listed,
        Unlisted,
    }

    impl ParameterEnum for Partial {
        fn members() -> &'static [EnumMember<Self>] {
            static MEMBERS: std::sync::OnceLock<Vec<EnumMember<Partial>>> =
                std::sync::OnceLock::new();
            MEMBERS.get_or_init(|| vec![EnumMember::new(Partial::Listed, "Listed", None)])
        }
    }

    #[test]
    fn test_undeclared_member_is_serialization_error() {
        assert_eq!(Partial::Listed.wire_value().unwrap(), "listed");

        let error = Partial::Unlisted.wire_value().unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::SerializationError);
        assert!(error.message().contains("Unlisted"));
    }

    #[test]
    fn test_primitive_values() {
        assert_eq!(42u32.to_parameter_value().unwrap(), "42");
        assert_eq!((-7i64).to_parameter_value().unwrap(), "-7");
        assert_eq!(true.to_parameter_value().unwrap(), "true");
        assert_eq!(false.to_parameter_value().unwrap(), "false");
        assert_eq!("main".to_parameter_value().unwrap(), "main");
        assert_eq!(1_000_000u64.to_parameter_value().unwrap(), "1000000");
    }

    #[test]
    fn test_query_string_encoding() {
        let parameters: Parameters = vec![("q", "language:rust stars:>10"), ("sort", "stars")]
            .into_iter()
            .collect();

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("sort"), Some("stars"));
        assert_eq!(
            parameters.to_query_string().unwrap(),
            "q=language%3Arust+stars%3A%3E10&sort=stars"
        );
    }

    #[test]
    fn test_empty_parameters() {
        let parameters = Parameters::new();
        assert!(parameters.is_empty());
        assert_eq!(parameters.to_query_string().unwrap(), "");
    }
}
