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

use log::error;
use proxysign_core::utils::Redact;
use proxysign_core::{Error, ProxyKey, Result};
use std::fmt::{Debug, Formatter};

/// Credential resolved from a [`ProxyKey`].
///
/// The key string has the form `access_key_id:secret_access_key:region`.
/// Segments after the region are ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Region the key is provisioned in.
    pub region: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

impl Credential {
    /// Resolve the credential carried by `key`.
    ///
    /// On failure only the key's redacted hash is logged and returned.
    pub fn resolve(key: &ProxyKey) -> Result<Self> {
        Self::parse(key.key()).ok_or_else(|| {
            error!(
                "key {} isn't formatted as access_key_id:secret_access_key:region",
                key.hash()
            );
            Error::credential_format(key.hash())
        })
    }

    fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        let cred = Self {
            access_key_id: parts.next()?.to_string(),
            secret_access_key: parts.next()?.to_string(),
            region: parts.next()?.to_string(),
        };
        cred.is_valid().then_some(cred)
    }

    /// Check that access key, secret and region are all present.
    pub fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
            && !self.region.is_empty()
    }
}
