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

use crate::env::{Env, OsEnv};
use std::fmt::Debug;
use std::sync::Arc;

/// Context provides the environment the signer runs in.
///
/// Nothing is read from the process environment implicitly: configuration that
/// wants environment overrides has to be loaded through a `Context`.
///
/// ## Example
///
/// ```
/// use std::collections::HashMap;
/// use proxysign_core::{Context, StaticEnv};
///
/// let ctx = Context::new().with_env(StaticEnv {
///     envs: HashMap::from([("AMZ_HOST".to_string(), "localhost:8080".to_string())]),
/// });
/// assert_eq!(ctx.env_var("AMZ_HOST").as_deref(), Some("localhost:8080"));
/// ```
#[derive(Clone)]
pub struct Context {
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("env", &self.env).finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context backed by the OS environment.
    pub fn new() -> Self {
        Self {
            env: Arc::new(OsEnv),
        }
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Get the environment variable.
    ///
    /// - Returns `None` if the variable is not set or empty.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_env_var_ignores_empty_values() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                ("SET".to_string(), "value".to_string()),
                ("EMPTY".to_string(), String::new()),
            ]),
        });

        assert_eq!(ctx.env_var("SET").as_deref(), Some("value"));
        assert_eq!(ctx.env_var("EMPTY"), None);
        assert_eq!(ctx.env_var("MISSING"), None);
    }
}
