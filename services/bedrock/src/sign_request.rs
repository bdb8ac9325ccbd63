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

use crate::constants::*;
use crate::Credential;
use http::header;
use http::HeaderValue;
use log::debug;
use percent_encoding::utf8_percent_encode;
use proxysign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use proxysign_core::time::{format_date, format_iso8601, now, DateTime};
use proxysign_core::{OutboundRequest, Result, SignRequest, SignedRequest};
use std::fmt::Write;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for `service` in `region`.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(&self, mut req: OutboundRequest, cred: &Credential) -> Result<SignedRequest> {
        let now = self.time.unwrap_or_else(now);

        canonicalize_header(&mut req, now)?;

        // build canonical request and string to sign.
        let creq = canonical_request_string(&req)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{ALGORITHM}")?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service)?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        let mut authorization = HeaderValue::from_str(&format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            req.header_name_to_vec_sorted().join(";"),
            signature
        ))?;
        authorization.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, authorization);

        Ok(SignedRequest::new(req))
    }
}

fn canonical_request_string(req: &OutboundRequest) -> Result<String> {
    // 512 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(512);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    let path = req.path_percent_decoded()?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    // Insert query, bedrock invocations never carry one.
    writeln!(f)?;
    // Insert signed headers
    let signed_headers = req.header_name_to_vec_sorted();
    for header in signed_headers.iter() {
        let value = &req.headers[*header];
        writeln!(f, "{}:{}", header, value.to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{}", hex_sha256(&req.body))?;

    Ok(f)
}

fn canonicalize_header(req: &mut OutboundRequest, now: DateTime) -> Result<()> {
    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    req.normalize_header_values()?;

    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        let host = HeaderValue::from_str(&req.hostname)?;
        req.headers.insert(header::HOST, host);
    }

    // The date header must match the signing time.
    req.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    Ok(())
}

fn generate_signing_key(
    secret: &str,
    time: DateTime,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes())?;
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes())?;
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes())?;
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::uri::Scheme;
    use http::{HeaderMap, Method};
    use pretty_assertions::assert_eq;
    use proxysign_core::time::parse_iso8601;

    const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
    const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn test_credential() -> Credential {
        Credential {
            access_key_id: ACCESS_KEY_ID.to_string(),
            secret_access_key: SECRET_ACCESS_KEY.to_string(),
            region: "us-east-1".to_string(),
        }
    }

    fn test_time() -> DateTime {
        parse_iso8601("20150830T123600Z").expect("time must be valid")
    }

    fn get_vanilla() -> OutboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.amazonaws.com"));

        OutboundRequest {
            method: Method::GET,
            scheme: Scheme::HTTPS,
            hostname: "example.amazonaws.com".to_string(),
            path: "/".to_string(),
            headers,
            body: Bytes::new(),
        }
    }

    fn invoke_request() -> OutboundRequest {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::HOST,
            HeaderValue::from_static("bedrock-runtime.us-east-1.amazonaws.com"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ANTHROPIC_VERSION, HeaderValue::from_static("2023-06-01"));

        OutboundRequest {
            method: Method::POST,
            scheme: Scheme::HTTPS,
            hostname: "bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            path: "/model/anthropic.claude-v2:1/invoke".to_string(),
            headers,
            body: Bytes::from_static(br#"{"prompt":"\n\nHuman:Hi"}"#),
        }
    }

    #[test]
    fn test_aws_test_suite_get_vanilla() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let signer = RequestSigner::new("service", "us-east-1").with_time(test_time());
        let signed = signer.sign_request(get_vanilla(), &test_credential())?;

        assert_eq!(signed.headers()[X_AMZ_DATE], "20150830T123600Z");
        assert_eq!(
            signed.authorization(),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=host;x-amz-date, \
                 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
            )
        );
        Ok(())
    }

    #[test]
    fn test_generate_signing_key() -> Result<()> {
        let time = parse_iso8601("20120215T000000Z")?;
        let key = generate_signing_key(SECRET_ACCESS_KEY, time, "us-east-1", "iam")?;

        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
        Ok(())
    }

    #[test]
    fn test_canonical_request_string() -> Result<()> {
        let mut req = invoke_request();
        canonicalize_header(&mut req, test_time())?;

        let expected = format!(
            "POST\n\
             /model/anthropic.claude-v2%3A1/invoke\n\
             \n\
             accept:*/*\n\
             anthropic-version:2023-06-01\n\
             content-type:application/json\n\
             host:bedrock-runtime.us-east-1.amazonaws.com\n\
             x-amz-date:20150830T123600Z\n\
             \n\
             accept;anthropic-version;content-type;host;x-amz-date\n\
             {}",
            hex_sha256(br#"{"prompt":"\n\nHuman:Hi"}"#)
        );
        assert_eq!(canonical_request_string(&req)?, expected);
        Ok(())
    }

    #[test]
    fn test_canonicalize_header_inserts_host_and_trims() -> Result<()> {
        let mut req = get_vanilla();
        req.headers.clear();
        req.headers
            .insert(header::ACCEPT, HeaderValue::from_static("  */*  "));
        canonicalize_header(&mut req, test_time())?;

        assert_eq!(req.headers[header::HOST], "example.amazonaws.com");
        assert_eq!(req.headers[header::ACCEPT], "*/*");
        Ok(())
    }

    #[test]
    fn test_sign_is_deterministic() -> Result<()> {
        let signer = RequestSigner::new(SERVICE, "us-east-1").with_time(test_time());

        let first = signer.sign_request(invoke_request(), &test_credential())?;
        let second = signer.sign_request(invoke_request(), &test_credential())?;
        assert_eq!(first.authorization(), second.authorization());

        let mut cred = test_credential();
        cred.secret_access_key = "another-secret".to_string();
        let third = signer.sign_request(invoke_request(), &cred)?;
        assert_ne!(first.authorization(), third.authorization());
        Ok(())
    }

    #[test]
    fn test_authorization_is_sensitive() -> Result<()> {
        let signer = RequestSigner::new(SERVICE, "us-east-1").with_time(test_time());
        let signed = signer.sign_request(invoke_request(), &test_credential())?;

        assert!(signed.headers()[header::AUTHORIZATION].is_sensitive());
        assert!(!format!("{signed:?}").contains("Signature="));
        Ok(())
    }
}
