use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// An [`HttpClient`] wrapper that injects a fixed set of headers into every request.
///
/// Header names and values are validated once at construction, so a bad
/// configuration fails before any request is sent.
pub struct WithHeaders<C> {
    pub inner: C,
    headers: HeaderMap,
}

impl<C> WithHeaders<C> {
    pub fn new(inner: C, pairs: &[(&str, &str)]) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("invalid header name '{name}'"))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("invalid value for header '{name}'"))?;
            headers.insert(name, value);
        }
        Ok(Self { inner, headers })
    }

    /// Sends a browser-like `User-Agent`; Wikipedia rejects some default client agents.
    pub fn user_agent(inner: C, user_agent: &str) -> Result<Self> {
        Self::new(inner, &[(USER_AGENT.as_str(), user_agent)])
    }

    #[cfg(test)]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for WithHeaders<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        for (name, value) in &self.headers {
            req.headers_mut().insert(name.clone(), value.clone());
        }
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_user_agent_header_is_set() {
        let client = WithHeaders::user_agent(BasicClient::new(), "Mozilla/5.0 test").unwrap();
        assert_eq!(client.headers().get(USER_AGENT).unwrap(), "Mozilla/5.0 test");
        assert_eq!(client.headers().len(), 1);
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let result = WithHeaders::new(BasicClient::new(), &[("bad header", "x")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let result = WithHeaders::new(BasicClient::new(), &[("X-Test", "line\nbreak")]);
        assert!(result.is_err());
    }
}
