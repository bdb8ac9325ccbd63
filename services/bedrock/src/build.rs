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
use crate::payload::NormalizedRequest;
use crate::Config;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, HOST};
use http::uri::Scheme;
use http::{HeaderMap, HeaderValue, Method};
use proxysign_core::{OutboundRequest, Result};
use std::sync::Arc;

/// RequestBuilder assembles the unsigned bedrock invoke request.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: Arc<Config>,
}

impl RequestBuilder {
    /// Create a new builder with given config.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Build the request invoking `req.model` in `region`.
    pub fn build(&self, req: &NormalizedRequest, region: &str) -> Result<OutboundRequest> {
        let hostname = self.config.host_for(region);
        let path = if req.stream {
            format!("/model/{}/invoke-with-response-stream", req.model)
        } else {
            format!("/model/{}/invoke", req.model)
        };
        let body = Bytes::from(serde_json::to_vec(&req.payload)?);

        let mut headers = HeaderMap::with_capacity(8);
        headers.insert(HOST, HeaderValue::from_str(&hostname)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if req.stream {
            headers.insert(
                X_AMZN_BEDROCK_ACCEPT,
                HeaderValue::from_static("application/json"),
            );
        } else {
            headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        }
        headers.insert(
            ANTHROPIC_VERSION,
            HeaderValue::from_str(&self.config.anthropic_version)?,
        );

        Ok(OutboundRequest {
            method: Method::POST,
            scheme: Scheme::HTTPS,
            hostname,
            path,
            headers,
            body,
        })
    }
}
