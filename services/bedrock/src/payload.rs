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

use crate::constants::HUMAN_PREAMBLE;
use proxysign_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Fields bedrock accepts for anthropic text completions.
pub const ALLOWED_FIELDS: [&str; 6] = [
    "prompt",
    "max_tokens_to_sample",
    "stop_sequences",
    "temperature",
    "top_k",
    "top_p",
];

// Consumed by the pipeline and never forwarded.
const MODEL: &str = "model";
const STREAM: &str = "stream";

/// Completion payload in the shape bedrock accepts.
///
/// Absent optional fields are left out of the serialized body. Floating point
/// fields keep the inbound number as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionPayload {
    /// Prompt, always starting with `"\n\nHuman:"`.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens_to_sample: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Number>,
}

/// Result of normalizing an inbound completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    /// Model identifier, used in the request path.
    pub model: String,
    /// Whether the response should be streamed.
    pub stream: bool,
    /// Payload to send as request body.
    pub payload: CompletionPayload,
}

/// Streaming is enabled only by boolean `true` or the string `"true"`.
pub fn coerce_stream(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(v)) => *v,
        Some(Value::String(v)) => v == "true",
        _ => false,
    }
}

/// Prepend the human turn marker unless the prompt already starts with it.
pub fn ensure_preamble(prompt: &str) -> String {
    if prompt.starts_with(HUMAN_PREAMBLE) {
        prompt.to_string()
    } else {
        format!("{HUMAN_PREAMBLE}{prompt}")
    }
}

/// Normalize an inbound request body.
///
/// Every unsupported, missing or mistyped field is collected and reported in a
/// single validation error.
pub fn normalize(body: &Value) -> Result<NormalizedRequest> {
    let Some(obj) = body.as_object() else {
        return Err(Error::validation(
            "request body must be a JSON object",
            Vec::new(),
        ));
    };

    let mut offending = obj
        .keys()
        .filter(|k| !ALLOWED_FIELDS.contains(&k.as_str()) && *k != MODEL && *k != STREAM)
        .cloned()
        .collect::<Vec<_>>();

    let model = match obj.get(MODEL) {
        Some(Value::String(v)) if is_valid_model(v) => Some(v.clone()),
        _ => {
            offending.push(MODEL.to_string());
            None
        }
    };
    let prompt = match obj.get("prompt") {
        Some(Value::String(v)) => Some(ensure_preamble(v)),
        _ => {
            offending.push("prompt".to_string());
            None
        }
    };
    let max_tokens_to_sample = optional_field(obj, "max_tokens_to_sample", &mut offending);
    let stop_sequences = optional_field(obj, "stop_sequences", &mut offending);
    let temperature = optional_field(obj, "temperature", &mut offending);
    let top_k = optional_field(obj, "top_k", &mut offending);
    let top_p = optional_field(obj, "top_p", &mut offending);

    let (Some(model), Some(prompt), true) = (model, prompt, offending.is_empty()) else {
        offending.sort();
        offending.dedup();
        return Err(Error::validation(
            format!(
                "request payload has invalid or unsupported fields: {}",
                offending.join(", ")
            ),
            offending,
        ));
    };

    Ok(NormalizedRequest {
        model,
        stream: coerce_stream(obj.get(STREAM)),
        payload: CompletionPayload {
            prompt,
            max_tokens_to_sample,
            stop_sequences,
            temperature,
            top_k,
            top_p,
        },
    })
}

fn optional_field<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    name: &str,
    offending: &mut Vec<String>,
) -> Option<T> {
    let value = obj.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(_) => {
            offending.push(name.to_string());
            None
        }
    }
}

/// Model ids end up in the request path, so only path-safe characters are accepted.
fn is_valid_model(model: &str) -> bool {
    !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | ':' | '~'))
}
