// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use http::header::{self, HeaderName};
use http::uri::Scheme;
use http::{HeaderMap, HeaderValue, Method, Uri};
use std::borrow::Cow;

/// OutboundRequest describes a request before it is signed.
///
/// The body is kept as [`Bytes`] so the exact bytes hashed by the signer are the
/// bytes that will be transmitted.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// Hostname (and optional port) the request is addressed to.
    pub hostname: String,
    /// HTTP path, without query.
    pub path: String,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Serialized request body.
    pub body: Bytes,
}

impl OutboundRequest {
    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Result<Cow<'_, str>> {
        percent_encoding::percent_decode_str(&self.path)
            .decode_utf8()
            .map_err(|e| Error::unexpected("request path is not valid utf-8").with_source(e))
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Trim leading and trailing spaces of every header value.
    pub fn normalize_header_values(&mut self) -> Result<()> {
        for (_, value) in self.headers.iter_mut() {
            let bs = value.as_bytes();
            let start = bs.iter().position(|b| *b != b' ').unwrap_or(bs.len());
            let end = bs.len() - bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
            if start == 0 && end == bs.len() {
                continue;
            }

            let sensitive = value.is_sensitive();
            let mut trimmed = HeaderValue::from_bytes(&bs[start..end.max(start)])?;
            trimmed.set_sensitive(sensitive);
            *value = trimmed;
        }
        Ok(())
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Build the full request uri.
    pub fn uri(&self) -> Result<Uri> {
        Ok(format!("{}://{}{}", self.scheme, self.hostname, self.path).parse::<Uri>()?)
    }
}

/// SignedRequest is an [`OutboundRequest`] carrying its authentication headers.
///
/// It is the terminal artifact of the pipeline and can't be mutated anymore:
/// only read accessors and [`SignedRequest::into_http`] are provided.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    inner: OutboundRequest,
}

impl SignedRequest {
    /// Wrap a request whose authentication headers have been attached.
    ///
    /// Intended for [`crate::SignRequest`] implementations.
    pub fn new(req: OutboundRequest) -> Self {
        Self { inner: req }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// HTTP scheme.
    pub fn scheme(&self) -> &Scheme {
        &self.inner.scheme
    }

    /// Hostname the request is addressed to.
    pub fn hostname(&self) -> &str {
        &self.inner.hostname
    }

    /// HTTP path.
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// HTTP headers, including the authentication headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Serialized body, byte-identical to what was signed.
    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }

    /// The `authorization` header value, if present.
    pub fn authorization(&self) -> Option<&str> {
        self.inner
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Convert into an [`http::Request`] for the transport layer.
    pub fn into_http(self) -> Result<http::Request<Bytes>> {
        let uri = self.inner.uri()?;
        let mut req = http::Request::builder()
            .method(self.inner.method)
            .uri(uri)
            .body(self.inner.body)?;
        *req.headers_mut() = self.inner.headers;
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_request() -> OutboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("  application/json "),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        OutboundRequest {
            method: Method::POST,
            scheme: Scheme::HTTPS,
            hostname: "example.com".to_string(),
            path: "/model/anthropic.claude-v2%3A1/invoke".to_string(),
            headers,
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn test_normalize_header_values() -> Result<()> {
        let mut req = test_request();
        req.normalize_header_values()?;

        assert_eq!(
            req.header_get_or_default(&header::CONTENT_TYPE)?,
            "application/json"
        );
        assert_eq!(req.header_get_or_default(&header::ACCEPT)?, "*/*");
        assert_eq!(req.header_get_or_default(&header::AUTHORIZATION)?, "");
        Ok(())
    }

    #[test]
    fn test_header_name_to_vec_sorted() {
        let req = test_request();
        assert_eq!(
            req.header_name_to_vec_sorted(),
            vec!["accept", "content-type", "host"]
        );
    }

    #[test]
    fn test_path_percent_decoded() -> Result<()> {
        let req = test_request();
        assert_eq!(
            req.path_percent_decoded()?,
            "/model/anthropic.claude-v2:1/invoke"
        );
        Ok(())
    }

    #[test]
    fn test_into_http() -> Result<()> {
        let signed = SignedRequest::new(test_request());
        assert_eq!(signed.authorization(), None);

        let req = signed.into_http()?;
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://example.com/model/anthropic.claude-v2%3A1/invoke"
        );
        assert_eq!(req.headers().len(), 3);
        assert_eq!(req.body().as_ref(), b"{}");
        Ok(())
    }
}
