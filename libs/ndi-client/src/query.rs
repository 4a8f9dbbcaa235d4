// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Query-string encoding
//!
//! Parameters keep insertion order. A `None` value means "not set" and the
//! key is left out of the encoded string entirely.

use indexmap::IndexMap;

/// Ordered query parameters
pub type QueryParams = IndexMap<String, Option<String>>;

/// Encode every set parameter as `key=value`, percent-encoding both sides.
pub fn encode_query(params: &QueryParams) -> String {
    params
        .iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|value| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the encoded query to `uri`, if there is anything to append.
pub fn append_query(uri: &str, params: &QueryParams) -> String {
    let query = encode_query(params);
    if query.is_empty() {
        uri.to_string()
    } else if uri.contains('?') {
        format!("{}&{}", uri, query)
    } else {
        format!("{}?{}", uri, query)
    }
}
