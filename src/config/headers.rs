use crate::error::ConfigError;
use crate::parsing::prometheus::{
    CONTENT_ENCODING, CONTENT_TYPE, REMOTE_WRITE_VERSION, REMOTE_WRITE_VERSION_HEADER,
};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Parses `"X-Scope-OrgID:1234,X-Org-Id:1234"` into header pairs.
///
/// Pairs are separated by `,` and split on their first `:`, so values may
/// contain colons. An empty string gives no headers.
pub fn parse_header_string(headers: &str) -> Result<Vec<(HeaderName, HeaderValue)>, ConfigError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    headers
        .split(',')
        .map(|pair| {
            let (name, value) = pair
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidHeader(pair.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidHeader(pair.to_string()));
            }
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeader(pair.to_string()))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidHeader(pair.to_string()))?;
            Ok((name, value))
        })
        .collect()
}

/// Headers sent with every request. Built once, read by all workers.
#[derive(Debug, Clone)]
pub struct HeaderSet(HeaderMap);

impl HeaderSet {
    /// Operator headers are applied after the remote write ones and win on collision.
    pub fn new(operator_headers: impl IntoIterator<Item = (HeaderName, HeaderValue)>) -> Self {
        let mut map = HeaderMap::new();
        map.insert(
            header::CONTENT_ENCODING,
            HeaderValue::from_static(CONTENT_ENCODING),
        );
        map.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
        map.insert(
            HeaderName::from_static(REMOTE_WRITE_VERSION_HEADER),
            HeaderValue::from_static(REMOTE_WRITE_VERSION),
        );
        for (name, value) in operator_headers {
            map.insert(name, value);
        }
        Self(map)
    }

    pub fn from_header_string(headers: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_header_string(headers)?))
    }

    pub fn as_map(&self) -> &HeaderMap {
        &self.0
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
