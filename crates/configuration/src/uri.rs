//! Resolution of `bigquery://` connection strings into a [`Configuration`].
//!
//! A connection string has the form
//!
//! ```text
//! bigquery://<project>[:<port>]/[<location>/]<dataset>[?scopes=<scope>,<scope>,...]
//! ```
//!
//! The whole string is compared case-insensitively, and every value in the resulting
//! configuration is lowercase.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::configuration::Configuration;
use crate::error::ConfigurationError;

pub const SCHEME: &str = "bigquery";
pub const SCHEME_PREFIX: &str = "bigquery://";
const SCOPES_PARAMETER: &str = "scopes";

/// Resolve a connection string into a configuration.
///
/// This performs no I/O.
pub fn resolve(uri: &str) -> Result<Configuration, ConfigurationError> {
    let normalized = uri.to_lowercase();

    if !normalized.starts_with(SCHEME_PREFIX) {
        return Err(ConfigurationError::Scheme(uri.to_string()));
    }

    let url = Url::parse(&normalized).map_err(|source| ConfigurationError::Parse {
        uri: uri.to_string(),
        source,
    })?;

    let project_id = match url.host_str() {
        Some(host) if !host.is_empty() => decode(host)
            .ok_or_else(|| ConfigurationError::InvalidProject(uri.to_string()))?,
        _ => return Err(ConfigurationError::MissingProject(uri.to_string())),
    };

    // `Url` resolves dot segments in its path, so the path is split as written instead.
    let (location, data_set) = resolve_path(raw_path(&normalized))
        .ok_or_else(|| ConfigurationError::Path(uri.to_string()))?;

    let scopes = parse_scopes(url.query().unwrap_or_default())
        .ok_or_else(|| ConfigurationError::Scopes(uri.to_string()))?;

    Ok(Configuration::new(project_id, location, data_set, scopes))
}

/// The path as written: everything after the authority, up to the query or fragment.
fn raw_path(normalized: &str) -> &str {
    let rest = &normalized[SCHEME_PREFIX.len()..];
    let rest = rest
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    rest.find('/').map_or("", |start| &rest[start..])
}

/// Split a path into its location and dataset, returning `None` if it has the wrong shape.
///
/// Surrounding slashes are ignored. One segment names the dataset; two name the location and
/// then the dataset. `.` and `..` are not valid names, whether written plainly or escaped.
fn resolve_path(path: &str) -> Option<(String, String)> {
    // Escapes are decoded only after splitting, so `%2f` never introduces a new segment.
    let segments = path
        .trim_matches('/')
        .split('/')
        .map(decode)
        .collect::<Option<Vec<_>>>()?;

    if segments
        .iter()
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return None;
    }

    match segments.as_slice() {
        [data_set] => Some((String::new(), data_set.clone())),
        [location, data_set] => Some((location.clone(), data_set.clone())),
        _ => None,
    }
}

/// Percent-decode and lowercase a component. Escapes that are not valid UTF-8 yield `None`.
fn decode(component: &str) -> Option<String> {
    percent_decode_str(component)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.to_lowercase())
}

/// Read the ordered scope list from a raw query string.
///
/// The value is split on `,` before escapes are decoded, so `%2c` stays inside its scope and
/// `+` is kept as it is. Empty elements are kept too.
fn parse_scopes(query: &str) -> Option<Vec<String>> {
    let value = query
        .split('&')
        .find_map(|pair| match pair.split_once('=') {
            Some((key, value)) if key == SCOPES_PARAMETER => Some(value),
            None if pair == SCOPES_PARAMETER => Some(""),
            _ => None,
        })
        .unwrap_or_default();

    if value.is_empty() {
        Some(Vec::new())
    } else {
        value.split(',').map(decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    fn resolved(uri: &str) -> Configuration {
        resolve(uri).unwrap_or_else(|error| panic!("{uri} should resolve: {error}"))
    }

    #[test]
    fn resolves_dataset_only() {
        let configuration = resolved("bigquery://p/d");
        assert_eq!(configuration.project_id(), "p");
        assert_eq!(configuration.location(), "");
        assert_eq!(configuration.data_set(), "d");
        assert!(configuration.scopes().is_empty());
    }

    #[test]
    fn resolves_location_and_dataset() {
        let configuration = resolved("bigquery://p/l/d");
        assert_eq!(configuration.project_id(), "p");
        assert_eq!(configuration.location(), "l");
        assert_eq!(configuration.data_set(), "d");
    }

    #[test]
    fn ignores_port_and_surrounding_slashes() {
        assert_eq!(
            resolved("bigquery://my-project:443/us-east1/sales/"),
            resolved("bigquery://my-project/us-east1/sales")
        );
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(resolved("BIGQUERY://P/L/D"), resolved("bigquery://p/l/d"));
        assert_eq!(resolved("BigQuery://Proj/EU/Data"), resolved("bigquery://proj/eu/data"));
    }

    #[test]
    fn rejects_other_schemes_before_looking_at_the_path() {
        for uri in [
            "postgres://p/d",
            "POSTGRES://p/d",
            "bigqueri://p/d",
            "bigquery:/p/d",
            "p/d",
            "",
            "scanner",
        ] {
            match resolve(uri) {
                Err(ConfigurationError::Scheme(original)) => assert_eq!(original, uri),
                other => panic!("{uri:?} should fail with a scheme error, got {other:?}"),
            }
        }
    }

    #[test]
    fn scheme_error_keeps_original_casing() {
        let error = resolve("MySQL://Host/DB").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid prefix, expected bigquery:// got: MySQL://Host/DB"
        );
    }

    #[test]
    fn rejects_paths_of_the_wrong_shape() {
        for uri in [
            "bigquery://p",
            "bigquery://p/",
            "bigquery://p//",
            "bigquery://p/a/b/c",
            "bigquery://p/l//d",
            "bigquery://p/a/b/..",
            "bigquery://p/l/d/..",
            "bigquery://p/l/%2e%2e/d",
            "bigquery://p/a/./b/c/..",
            "bigquery://p/l/..",
            "bigquery://p/%2E",
            "bigquery://p/d%ff",
        ] {
            match resolve(uri) {
                Err(ConfigurationError::Path(original)) => assert_eq!(original, uri),
                other => panic!("{uri:?} should fail with a path error, got {other:?}"),
            }
        }
    }

    #[test]
    fn encoded_slash_stays_inside_its_segment() {
        let configuration = resolved("bigquery://p/l/a%2Fb");
        assert_eq!(configuration.location(), "l");
        assert_eq!(configuration.data_set(), "a/b");
    }

    #[test]
    fn dot_segments_are_not_collapsed() {
        match resolve("bigquery://p/a/b/..") {
            Err(ConfigurationError::Path(original)) => assert_eq!(original, "bigquery://p/a/b/.."),
            other => panic!("expected a path error, got {other:?}"),
        }
        assert_eq!(resolved("bigquery://p/l/d?x=/a/b/c").data_set(), "d");
    }

    #[test]
    fn decodes_and_lowercases_non_ascii_project() {
        let configuration = resolved("bigquery://PROJÉ/Données");
        assert_eq!(configuration.project_id(), "projé");
        assert_eq!(configuration.data_set(), "données");
    }

    #[test]
    fn rejects_escapes_that_are_not_utf8() {
        assert!(matches!(
            resolve("bigquery://p/d%ff"),
            Err(ConfigurationError::Path(_))
        ));
        assert!(matches!(
            resolve("bigquery://p/d?scopes=a,b%ff"),
            Err(ConfigurationError::Scopes(_))
        ));
        assert!(matches!(
            resolve("bigquery://p%ff/d"),
            Err(ConfigurationError::InvalidProject(_) | ConfigurationError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_missing_project() {
        assert!(matches!(
            resolve("bigquery:///d"),
            Err(ConfigurationError::MissingProject(_))
        ));
    }

    #[test]
    fn rejects_malformed_uri() {
        match resolve("bigquery://p:notaport/d") {
            Err(ConfigurationError::Parse { uri, .. }) => assert_eq!(uri, "bigquery://p:notaport/d"),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn parses_scopes_in_order() {
        let configuration = resolved("bigquery://p/d?scopes=a,b,c");
        assert_eq!(configuration.scopes(), ["a", "b", "c"]);
    }

    #[test]
    fn keeps_duplicate_and_empty_scopes() {
        assert_eq!(resolved("bigquery://p/d?scopes=a,,b").scopes(), ["a", "", "b"]);
        assert_eq!(resolved("bigquery://p/d?scopes=b,a,b,").scopes(), ["b", "a", "b", ""]);
    }

    #[test]
    fn splits_scopes_before_decoding_them() {
        assert_eq!(resolved("bigquery://p/d?scopes=a%2cb").scopes(), ["a,b"]);
        assert_eq!(resolved("bigquery://p/d?scopes=a+b,c%20d").scopes(), ["a+b", "c d"]);
        assert_eq!(
            resolved("bigquery://p/d?other=1&scopes=x,y&scopes=z").scopes(),
            ["x", "y"]
        );
    }

    #[test]
    fn missing_or_empty_scopes_mean_default() {
        assert!(resolved("bigquery://p/d").scopes().is_empty());
        assert!(resolved("bigquery://p/d?scopes=").scopes().is_empty());
        assert!(resolved("bigquery://p/d?other=x").scopes().is_empty());
        assert!(resolved("bigquery://p/d?scopes").scopes().is_empty());
    }

    #[test]
    fn serializes_resolved_configuration() {
        let configuration = resolved(
            "BIGQUERY://Analytics/EU/Events?scopes=https://www.googleapis.com/auth/bigquery,openid",
        );
        insta::assert_json_snapshot!(configuration, @r###"
        {
          "projectId": "analytics",
          "location": "eu",
          "dataSet": "events",
          "scopes": [
            "https://www.googleapis.com/auth/bigquery",
            "openid"
          ]
        }
        "###);
    }
}
