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

//! Core components for signing proxied inference requests.
//!
//! This crate provides the provider-neutral pieces of the proxysign pipeline.
//! Service crates such as `proxysign-bedrock` build on top of it.
//!
//! ## Overview
//!
//! - **Key pool**: [`KeyPool`] is the retrieval contract of the external component
//!   that hands out credential-bearing [`ProxyKey`]s. [`StaticKeyPool`] is a fixed
//!   in-memory implementation.
//! - **Requests**: [`OutboundRequest`] describes the request before signing and
//!   [`SignedRequest`] is the terminal artifact handed to the transport.
//! - **Signing**: [`SignRequest`] turns an [`OutboundRequest`] into a [`SignedRequest`].
//! - **Context**: [`Context`] gives access to the environment through [`Env`].
//!
//! ## Example
//!
//! ```
//! use proxysign_core::{KeyPool, ProxyKey, StaticKeyPool};
//!
//! # async fn example() -> proxysign_core::Result<()> {
//! let pool = StaticKeyPool::new()
//!     .with_key("anthropic.claude-v2", ProxyKey::new("ak:sk:us-east-1", "aws-abc123"));
//!
//! let key = pool.get("anthropic.claude-v2").await?;
//! assert_eq!(key.map(|k| k.hash().to_string()), Some("aws-abc123".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: SHA-256 and HMAC helpers
//! - [`time`]: timestamp formatting used by signers
//! - [`utils`]: data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod context;
pub use context::Context;

mod key;
pub use key::{KeyPool, ProxyKey, StaticKeyPool};

mod api;
pub use api::SignRequest;
mod request;
pub use request::{OutboundRequest, SignedRequest};
