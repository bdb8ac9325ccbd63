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

use crate::{OutboundRequest, Result, SignedRequest};
use std::fmt::Debug;

/// SignRequest is the trait used by the pipeline to authenticate a request.
///
/// Signing is pure computation: implementations must not perform I/O, and the
/// input request is consumed so no unsigned copy can leak to the transport.
pub trait SignRequest: Debug + Send + Sync + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + 'static;

    /// Sign the request with given credential.
    fn sign_request(
        &self,
        req: OutboundRequest,
        credential: &Self::Credential,
    ) -> Result<SignedRequest>;
}
