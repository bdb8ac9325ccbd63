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

use crate::build::RequestBuilder;
use crate::constants::SERVICE;
use crate::payload::normalize;
use crate::{Config, Credential, RequestSigner};
use log::debug;
use proxysign_core::time::DateTime;
use proxysign_core::{Error, KeyPool, Result, SignRequest, SignedRequest};
use serde_json::Value;
use std::sync::Arc;

/// Signer turns inbound completion requests into signed bedrock requests.
///
/// Each call fetches one key from the pool, then resolves the credential,
/// normalizes the payload, builds and signs the request. Any failure aborts the
/// call and nothing partial is returned.
#[derive(Clone, Debug)]
pub struct Signer {
    pool: Arc<dyn KeyPool>,
    config: Arc<Config>,
    builder: RequestBuilder,

    time: Option<DateTime>,
}

impl Signer {
    /// Create a new signer drawing keys from `pool`.
    pub fn new(pool: impl KeyPool, config: Config) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Self {
            pool: Arc::new(pool),
            builder: RequestBuilder::new(config.clone()),
            config,

            time: None,
        })
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

    /// Sign the inbound request `body`.
    pub async fn sign(&self, body: &Value) -> Result<SignedRequest> {
        let key = self.pool.get(&self.config.key_model).await?.ok_or_else(|| {
            Error::key_unavailable(format!("no key available for {}", self.config.key_model))
        })?;

        let cred = Credential::resolve(&key)?;
        let req = normalize(body)?;
        let outbound = self.builder.build(&req, &cred.region)?;

        let mut signer = RequestSigner::new(SERVICE, &cred.region);
        if let Some(time) = self.time {
            signer = signer.with_time(time);
        }
        let signed = signer.sign_request(outbound, &cred)?;

        debug!(
            "signed request for model {} (stream: {}) with key {}",
            req.model,
            req.stream,
            key.hash()
        );
        Ok(signed)
    }
}
