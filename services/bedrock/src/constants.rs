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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in bedrock requests.
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZN_BEDROCK_ACCEPT: &str = "x-amzn-bedrock-accept";
pub const ANTHROPIC_VERSION: &str = "anthropic-version";

// Env values used to configure the signer.
pub const AMZ_HOST: &str = "AMZ_HOST";

/// Placeholder replaced by the credential's region in the host template.
pub const REGION_PLACEHOLDER: &str = "%REGION%";
pub const DEFAULT_HOST_TEMPLATE: &str = "bedrock-runtime.%REGION%.amazonaws.com";
/// Model family used to pick keys from the pool.
pub const DEFAULT_KEY_MODEL: &str = "anthropic.claude-v2";
/// Bedrock ignores this value, but the response adapter selects its transformer by it.
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

pub const SERVICE: &str = "bedrock";
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Turn delimiter every prompt has to start with.
pub const HUMAN_PREAMBLE: &str = "\n\nHuman:";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static AWS_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
