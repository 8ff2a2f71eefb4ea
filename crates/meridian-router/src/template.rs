//! Typed path templates.
//!
//! Templates use angle-bracket placeholders that occupy a whole segment:
//! `<name>`, `<converter:name>`. Supported converters are `string`
//! (default), `int`, `uuid` and `path`; `path` captures the remainder of the
//! request path and must be the final segment.

use uuid::Uuid;

use crate::error::{RouterError, RouterResult};
use crate::params::Params;

/// Converts a raw path segment into a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    /// Any non-empty segment
    String,
    /// Decimal digits
    Int,
    /// A UUID in any case; normalised to lower-case hyphenated form
    Uuid,
    /// The remainder of the path, slashes included
    Path,
}

impl Converter {
    /// Looks up a converter by its template name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    /// The template name of this converter.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uuid => "uuid",
            Self::Path => "path",
        }
    }

    /// Converts a raw segment, returning `None` when it does not match.
    #[must_use]
    pub fn convert(self, raw: &str) -> Option<String> {
        match self {
            Self::String | Self::Path => (!raw.is_empty()).then(|| raw.to_string()),
            Self::Int => (!raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()))
                .then(|| raw.to_string()),
            Self::Uuid => Uuid::try_parse(raw)
                .ok()
                .map(|id| id.hyphenated().to_string()),
        }
    }
}

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// A typed placeholder
    Param {
        /// Parameter name
        name: String,
        /// Converter applied when matching
        converter: Converter,
    },
}

/// A parsed path template such as `/api/person/<uuid:person_id>/address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathTemplate {
    /// Parses a template string.
    pub fn parse(raw: &str) -> RouterResult<Self> {
        if !raw.starts_with('/') {
            return Err(RouterError::invalid_template(raw, "must start with '/'"));
        }

        let parts: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let segment = Self::parse_segment(raw, part)?;
            if let Segment::Param {
                converter: Converter::Path,
                ..
            } = &segment
            {
                if index + 1 != parts.len() {
                    return Err(RouterError::invalid_template(
                        raw,
                        "a path placeholder must be the last segment",
                    ));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            trailing_slash: raw.len() > 1 && raw.ends_with('/'),
            segments,
        })
    }

    fn parse_segment(raw: &str, part: &str) -> RouterResult<Segment> {
        let Some(inner) = part.strip_prefix('<') else {
            if part.contains('<') || part.contains('>') {
                return Err(RouterError::invalid_template(
                    raw,
                    "placeholders must span a whole segment",
                ));
            }
            return Ok(Segment::Static(part.to_string()));
        };

        let inner = inner
            .strip_suffix('>')
            .ok_or_else(|| RouterError::invalid_template(raw, "unterminated placeholder"))?;

        let (converter, name) = match inner.split_once(':') {
            Some((converter, name)) => (converter, name),
            None => ("string", inner),
        };

        let converter = Converter::from_name(converter).ok_or_else(|| {
            RouterError::invalid_template(raw, format!("unknown converter '{converter}'"))
        })?;

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RouterError::invalid_template(
                raw,
                format!("invalid parameter name '{name}'"),
            ));
        }

        Ok(Segment::Param {
            name: name.to_string(),
            converter,
        })
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all placeholders, in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    /// Fills every placeholder from `params`.
    ///
    /// Returns the name of the first placeholder without a value on failure.
    pub fn expand(&self, params: &Params) -> Result<String, String> {
        self.render(params, false)
    }

    /// Fills known placeholders and renders the others as `{name}`.
    #[must_use]
    pub fn expand_templated(&self, params: &Params) -> String {
        // template mode never reports a missing parameter
        self.render(params, true).unwrap_or_default()
    }

    fn render(&self, params: &Params, templated: bool) -> Result<String, String> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(text) => out.push_str(text),
                Segment::Param { name, converter } => match params.get(name) {
                    Some(value) if *converter == Converter::Path => {
                        let encoded: Vec<_> =
                            value.split('/').map(|p| urlencoding::encode(p)).collect();
                        out.push_str(&encoded.join("/"));
                    }
                    Some(value) => out.push_str(&urlencoding::encode(value)),
                    None if templated => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                    None => return Err(name.clone()),
                },
            }
        }
        if self.segments.is_empty() || self.trailing_slash {
            out.push('/');
        }
        Ok(out)
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static() {
        let template = PathTemplate::parse("/api/person").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Static("api".to_string()),
                Segment::Static("person".to_string())
            ]
        );
        assert_eq!(template.placeholders().count(), 0);
    }

    #[test]
    fn test_parse_typed_param() {
        let template = PathTemplate::parse("/person/<uuid:person_id>/address").unwrap();
        assert_eq!(
            template.segments()[1],
            Segment::Param {
                name: "person_id".to_string(),
                converter: Converter::Uuid
            }
        );
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec!["person_id"]);
    }

    #[test]
    fn test_parse_default_converter() {
        let template = PathTemplate::parse("/tag/<name>").unwrap();
        assert_eq!(
            template.segments()[1],
            Segment::Param {
                name: "name".to_string(),
                converter: Converter::String
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_templates() {
        assert!(PathTemplate::parse("person").is_err());
        assert!(PathTemplate::parse("/person/<uuid:person_id").is_err());
        assert!(PathTemplate::parse("/person/<float:x>").is_err());
        assert!(PathTemplate::parse("/person/id-<uuid:x>").is_err());
        assert!(PathTemplate::parse("/files/<path:rest>/more").is_err());
        assert!(PathTemplate::parse("/person/<uuid:>").is_err());
    }

    #[test]
    fn test_uuid_converter_normalises() {
        let value = Converter::Uuid.convert("3D2F0E60-8E52-4C5E-A2FB-8D3C1F5F3F0A");
        assert_eq!(
            value.as_deref(),
            Some("3d2f0e60-8e52-4c5e-a2fb-8d3c1f5f3f0a")
        );
        assert_eq!(Converter::Uuid.convert("not-a-uuid"), None);
    }

    #[test]
    fn test_int_converter() {
        assert_eq!(Converter::Int.convert("42").as_deref(), Some("42"));
        assert_eq!(Converter::Int.convert("4x2"), None);
        assert_eq!(Converter::Int.convert(""), None);
    }

    #[test]
    fn test_expand() {
        let template = PathTemplate::parse("/person/<uuid:person_id>").unwrap();
        let params = Params::new().with("person_id", "abc");
        assert_eq!(template.expand(&params).unwrap(), "/person/abc");
        assert_eq!(
            template.expand(&Params::new()).unwrap_err(),
            "person_id".to_string()
        );
    }

    #[test]
    fn test_expand_templated() {
        let template =
            PathTemplate::parse("/person/<uuid:person_id>/address/<uuid:address_id>").unwrap();
        let params = Params::new().with("person_id", "abc");
        assert_eq!(
            template.expand_templated(&params),
            "/person/abc/address/{address_id}"
        );
    }

    #[test]
    fn test_expand_encodes_values() {
        let template = PathTemplate::parse("/tag/<name>").unwrap();
        let params = Params::new().with("name", "a b");
        assert_eq!(template.expand(&params).unwrap(), "/tag/a%20b");
    }

    #[test]
    fn test_expand_root_and_trailing_slash() {
        assert_eq!(PathTemplate::parse("/").unwrap().expand(&Params::new()).unwrap(), "/");
        assert_eq!(
            PathTemplate::parse("/api/").unwrap().expand(&Params::new()).unwrap(),
            "/api/"
        );
    }
}
