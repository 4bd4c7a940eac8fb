//! Merged request input (query string + JSON or form-urlencoded body)
//!
//! Handlers read loosely typed parameters (`action`, `ids`, `sSearch`) from
//! either location. `key[]` keys collect into arrays so that id lists posted
//! by HTML forms survive; other repeated keys keep their last value.

use axum::extract::{FromRequest, Query, Request};
use axum::http::{Method, header::CONTENT_TYPE};
use axum::{Form, Json};
use serde_json::{Map, Value};

use crate::core::error::ProposalError;

/// Request parameters merged into a single JSON object
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    values: Map<String, Value>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an already decoded JSON object
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    /// Append `key=value` pairs
    ///
    /// `key[]` pairs collect into an array under `key`; for any other key the
    /// last value wins.
    pub fn extend_pairs(&mut self, pairs: Vec<(String, String)>) {
        for (key, value) in pairs {
            match key.strip_suffix("[]").map(str::to_string) {
                Some(list_key) => match self.values.get_mut(&list_key) {
                    Some(Value::Array(items)) => items.push(Value::String(value)),
                    _ => {
                        self.values
                            .insert(list_key, Value::Array(vec![Value::String(value)]));
                    }
                },
                None => {
                    self.values.insert(key, Value::String(value));
                }
            }
        }
    }

    /// Overlay the fields of a JSON object, body values winning
    pub fn extend_object(&mut self, object: Map<String, Value>) {
        self.values.extend(object);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Non-empty scalar value rendered as a string
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Parse a list of public ids
    ///
    /// Accepts a single number, a numeric string, a comma separated string or
    /// an array of any of those. Entries that are not positive integers are
    /// dropped.
    pub fn ids(&self, key: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        if let Some(value) = self.values.get(key) {
            collect_ids(value, &mut ids);
        }
        ids
    }

    /// Target ids of a bulk action: `public_id` when given, else `ids`
    pub fn bulk_ids(&self) -> Vec<u32> {
        let ids = self.ids("public_id");
        if ids.is_empty() { self.ids("ids") } else { ids }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

fn collect_ids(value: &Value, ids: &mut Vec<u32>) {
    match value {
        Value::Number(n) => {
            if let Some(id) = n.as_u64().and_then(|n| u32::try_from(n).ok()) {
                if id > 0 {
                    ids.push(id);
                }
            }
        }
        Value::String(s) => ids.extend(
            s.split(',')
                .filter_map(|part| part.trim().parse::<u32>().ok())
                .filter(|id| *id > 0),
        ),
        Value::Array(items) => items.iter().for_each(|item| collect_ids(item, ids)),
        _ => {}
    }
}

impl<S> FromRequest<S> for RequestInput
where
    S: Send + Sync,
{
    type Rejection = ProposalError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut input = RequestInput::new();

        let Query(pairs): Query<Vec<(String, String)>> = Query::try_from_uri(req.uri())
            .map_err(|e| ProposalError::BadRequest {
                message: e.body_text(),
            })?;
        input.extend_pairs(pairs);

        if matches!(*req.method(), Method::GET | Method::HEAD) {
            return Ok(input);
        }

        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(body): Json<Value> =
                Json::from_request(req, state)
                    .await
                    .map_err(|e| ProposalError::BadRequest {
                        message: e.body_text(),
                    })?;
            match body {
                Value::Object(object) => input.extend_object(object),
                Value::Null => {}
                _ => {
                    return Err(ProposalError::BadRequest {
                        message: "Expected a JSON object".to_string(),
                    });
                }
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs): Form<Vec<(String, String)>> = Form::from_request(req, state)
                .await
                .map_err(|e| ProposalError::BadRequest {
                    message: e.body_text(),
                })?;
            input.extend_pairs(pairs);
        }

        Ok(input)
    }
}
