//! Endpoint URL templating.
//!
//! Templates name the spot a value goes with an explicit placeholder
//! (`{id}` or `{address}`). The substituted value is percent-encoded, so an
//! id or address can never alter the rest of the template.

use thiserror::Error;

pub use crate::config::schema::{ADDRESS_PLACEHOLDER, ID_PLACEHOLDER};

/// Template substitution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{template}' does not contain placeholder '{placeholder}'")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
}

/// Substitute `value` for the single `placeholder` in `template`.
pub fn expand(
    template: &str,
    placeholder: &'static str,
    value: &str,
) -> Result<String, TemplateError> {
    let (head, tail) =
        template
            .split_once(placeholder)
            .ok_or_else(|| TemplateError::MissingPlaceholder {
                template: template.to_string(),
                placeholder,
            })?;

    let encoded = urlencoding::encode(value);
    let mut out = String::with_capacity(head.len() + encoded.len() + tail.len());
    out.push_str(head);
    out.push_str(&encoded);
    out.push_str(tail);
    Ok(out)
}

/// Join the upstream base URL and an expanded endpoint path.
pub fn join(base_url: &str, path: &str) -> String {
    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &path[1..]),
        (false, false) => format!("{}/{}", base_url, path),
        _ => format!("{}{}", base_url, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_containing_zero_is_not_mangled() {
        let url = expand("/property/{id}/detail", ID_PLACEHOLDER, "10203").unwrap();
        assert_eq!(url, "/property/10203/detail");
    }

    #[test]
    fn test_template_with_literal_zero_keeps_it() {
        let url = expand("/v0/property/{id}/timeline", ID_PLACEHOLDER, "abc").unwrap();
        assert_eq!(url, "/v0/property/abc/timeline");
    }

    #[test]
    fn test_address_is_percent_encoded() {
        let url = expand(
            "/address/search?Address={address}",
            ADDRESS_PLACEHOLDER,
            "12 Main St&x=1",
        )
        .unwrap();
        assert_eq!(url, "/address/search?Address=12%20Main%20St%26x%3D1");
    }

    #[test]
    fn test_path_separators_in_id_are_encoded() {
        let url = expand("/property/{id}/detail", ID_PLACEHOLDER, "../admin").unwrap();
        assert_eq!(url, "/property/..%2Fadmin/detail");
    }

    #[test]
    fn test_missing_placeholder() {
        let err = expand("/property/0/detail", ID_PLACEHOLDER, "abc").unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholder {
                template: "/property/0/detail".into(),
                placeholder: "{id}",
            }
        );
    }

    #[test]
    fn test_join_handles_slashes() {
        assert_eq!(join("http://h", "/a"), "http://h/a");
        assert_eq!(join("http://h/", "/a"), "http://h/a");
        assert_eq!(join("http://h/", "a"), "http://h/a");
        assert_eq!(join("http://h", "a"), "http://h/a");
    }
}
