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
use proxysign_core::{Context, Error, Result};

/// Config for the bedrock signing pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Host template, `%REGION%` is replaced by the credential's region.
    ///
    /// Defaults to `bedrock-runtime.%REGION%.amazonaws.com`.
    pub host_template: String,
    /// Model identifier used to request keys from the key pool.
    ///
    /// Defaults to `anthropic.claude-v2`.
    pub key_model: String,
    /// Value of the `anthropic-version` header.
    ///
    /// Defaults to `2023-06-01`.
    pub anthropic_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_template: DEFAULT_HOST_TEMPLATE.to_string(),
            key_model: DEFAULT_KEY_MODEL.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl Config {
    /// Set the host template.
    pub fn with_host_template(mut self, template: impl Into<String>) -> Self {
        self.host_template = template.into();
        self
    }

    /// Set the model used to request keys from the key pool.
    pub fn with_key_model(mut self, model: impl Into<String>) -> Self {
        self.key_model = model.into();
        self
    }

    /// Override fields from environment variables.
    ///
    /// - `AMZ_HOST`: host template
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(AMZ_HOST) {
            self.host_template = v;
        }
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<()> {
        if self.host_template.trim().is_empty() {
            return Err(Error::config_invalid("host template must not be empty"));
        }
        if self.key_model.is_empty() {
            return Err(Error::config_invalid("key model must not be empty"));
        }
        if self.anthropic_version.is_empty() {
            return Err(Error::config_invalid(
                "anthropic version must not be empty",
            ));
        }
        Ok(())
    }

    /// Resolve the hostname serving `region`.
    pub fn host_for(&self, region: &str) -> String {
        self.host_template.replace(REGION_PLACEHOLDER, region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxysign_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    #[test]
    fn test_default_host() {
        let cfg = Config::default();
        assert_eq!(
            cfg.host_for("us-east-1"),
            "bedrock-runtime.us-east-1.amazonaws.com"
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([(
                AMZ_HOST.to_string(),
                "bedrock.%REGION%.internal:8443".to_string(),
            )]),
        });

        let cfg = Config::default().from_env(&ctx);
        assert_eq!(cfg.host_for("eu-west-3"), "bedrock.eu-west-3.internal:8443");
        assert_eq!(cfg.key_model, DEFAULT_KEY_MODEL);
    }

    #[test]
    fn test_from_env_without_override() {
        let ctx = Context::new().with_env(StaticEnv::default());
        assert_eq!(Config::default().from_env(&ctx), Config::default());
    }

    #[test]
    fn test_validate() {
        let err = Config::default()
            .with_host_template("  ")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = Config::default().with_key_model("").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
