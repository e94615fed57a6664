//! Canonical string construction for webhook signatures.
//!
//! The canonical form of a request is the full URL the sender called, followed by
//! every parameter name immediately followed by its value, with the parameters
//! sorted by name in ascending byte order:
//!
//! ```text
//! URL + name_1 + value_1 + name_2 + value_2 + ...
//! ```
//!
//! There are no separators and no escaping. The URL is used exactly as the
//! sender saw it, so any proxy rewriting of scheme, host, port, path, or query
//! breaks verification.

use std::collections::BTreeMap;

/// A URL plus the request parameters that were signed with it.
///
/// # Examples
///
/// ```
/// use hookgate_auth::canonical::CanonicalInput;
///
/// let input = CanonicalInput::new("https://a.test/sms")
///     .with_param("From", "+1")
///     .with_param("Body", "hi");
/// assert_eq!(input.canonical_string(), "https://a.test/smsBodyhiFrom+1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalInput {
    /// Absolute URL exactly as used by the sending party.
    pub url: String,
    /// Parameter name to value. Names are unique within one input.
    pub params: BTreeMap<String, String>,
}

impl CanonicalInput {
    /// Create an input with the given URL and no parameters.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter, replacing any earlier value for the same name.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The parameters as borrowed `(name, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build the canonical string for this input.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        build_canonical_string(&self.url, self.pairs())
    }
}

/// Build the canonical string from a URL and a set of `(name, value)` pairs.
///
/// The pairs are sorted here, so the result does not depend on the iteration
/// order of whatever map the caller collected them into.
///
/// # Examples
///
/// ```
/// use hookgate_auth::canonical::build_canonical_string;
///
/// assert_eq!(build_canonical_string("https://a.test/", []), "https://a.test/");
/// assert_eq!(
///     build_canonical_string("https://a.test/", [("b", "2"), ("a", "1")]),
///     "https://a.test/a1b2"
/// );
/// ```
#[must_use]
pub fn build_canonical_string<'a, I>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params.into_iter().collect();
    // `str` ordering is byte-wise, which is exactly the order the sender uses.
    pairs.sort_unstable();

    let capacity = url.len() + pairs.iter().map(|(k, v)| k.len() + v.len()).sum::<usize>();
    let mut canonical = String::with_capacity(capacity);
    canonical.push_str(url);
    for (name, value) in pairs {
        canonical.push_str(name);
        canonical.push_str(value);
    }
    canonical
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_should_return_url_unchanged_without_params() {
        let url = "https://a.test/sms?x=1&y=2";
        assert_eq!(build_canonical_string(url, []), url);
        assert_eq!(CanonicalInput::new(url).canonical_string(), url);
    }

    #[test]
    fn test_should_sort_params_by_name() {
        let canonical =
            build_canonical_string("https://a.test/sms", [("From", "+1"), ("Body", "hi")]);
        assert_eq!(canonical, "https://a.test/smsBodyhiFrom+1");
    }

    #[test]
    fn test_should_ignore_input_order() {
        let forward = [
            ("To", "+2"),
            ("From", "+1"),
            ("Body", "hi"),
            ("AccountSid", "AC1"),
        ];
        let mut backward = forward;
        backward.reverse();

        let hashed: HashMap<&str, &str> = forward.iter().copied().collect();
        let ordered: BTreeMap<&str, &str> = backward.iter().copied().collect();

        let expected = build_canonical_string("https://a.test/", forward);
        assert_eq!(
            build_canonical_string("https://a.test/", backward),
            expected
        );
        assert_eq!(build_canonical_string("https://a.test/", hashed), expected);
        assert_eq!(build_canonical_string("https://a.test/", ordered), expected);
    }

    #[test]
    fn test_should_sort_by_byte_value_not_case_insensitively() {
        // Uppercase ASCII sorts before lowercase.
        let canonical = build_canonical_string("u", [("a", "1"), ("B", "2"), ("_", "3")]);
        assert_eq!(canonical, "uB2_3a1");
    }

    #[test]
    fn test_should_not_escape_or_delimit_values() {
        let canonical =
            build_canonical_string("https://a.test/", [("Body", "a=b&c d"), ("Empty", "")]);
        assert_eq!(canonical, "https://a.test/Bodya=b&c dEmpty");
    }

    #[test]
    fn test_should_preserve_non_ascii_values() {
        let canonical = build_canonical_string("https://a.test/", [("Body", "héllo ✓")]);
        assert_eq!(
            canonical.as_bytes(),
            "https://a.test/Bodyhéllo ✓".as_bytes()
        );
    }

    #[test]
    fn test_should_replace_value_for_repeated_name_in_input() {
        let input = CanonicalInput::new("https://a.test/")
            .with_param("Body", "first")
            .with_param("Body", "second");
        assert_eq!(input.canonical_string(), "https://a.test/Bodysecond");
    }
}
