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

use crate::utils::Redact;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// ProxyKey is a credential-bearing key handed out by a [`KeyPool`].
///
/// `key` holds the secret material, `hash` is a redacted identifier that is
/// safe to log.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyKey {
    key: String,
    hash: String,
}

impl ProxyKey {
    /// Create a new key.
    pub fn new(key: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            hash: hash.into(),
        }
    }

    /// The secret key material.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The redacted identifier of this key.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl Debug for ProxyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyKey")
            .field("key", &Redact::from(&self.key))
            .field("hash", &self.hash)
            .finish()
    }
}

/// KeyPool is the retrieval side of the component that issues and rotates keys.
///
/// Implementations must be safe to call from concurrent requests. Exhaustion
/// is reported as `Ok(None)`; how a pool decides it is exhausted is up to it.
#[async_trait]
pub trait KeyPool: Debug + Send + Sync + 'static {
    /// Get a key able to serve requests for `model`.
    async fn get(&self, model: &str) -> Result<Option<ProxyKey>>;
}

#[async_trait]
impl<T: KeyPool + ?Sized> KeyPool for Arc<T> {
    async fn get(&self, model: &str) -> Result<Option<ProxyKey>> {
        self.as_ref().get(model).await
    }
}

/// StaticKeyPool hands out a fixed set of keys, rotating round-robin.
#[derive(Debug, Default)]
pub struct StaticKeyPool {
    keys: HashMap<String, Vec<ProxyKey>>,
    cursor: AtomicUsize,
}

impl StaticKeyPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key serving `model`.
    pub fn with_key(mut self, model: &str, key: ProxyKey) -> Self {
        self.keys.entry(model.to_string()).or_default().push(key);
        self
    }
}

#[async_trait]
impl KeyPool for StaticKeyPool {
    async fn get(&self, model: &str) -> Result<Option<ProxyKey>> {
        let Some(keys) = self.keys.get(model).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % keys.len();
        Ok(Some(keys[idx].clone()))
    }
}
