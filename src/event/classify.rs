//! Event classification.
//!
//! Picks the integration by probing `requestContext` for each variant's marker
//! key, then decodes the whole event into that variant's typed shape.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AdapterError;
use crate::event::variant::Variant;
use crate::event::wire::WireEvent;

/// Detect the integration of a raw event without decoding its fields.
pub fn detect_variant(event: &Value) -> Result<Variant, AdapterError> {
    let object = event
        .as_object()
        .ok_or_else(|| AdapterError::MalformedEvent("event is not a JSON object".into()))?;

    let context = match object.get("requestContext") {
        Some(Value::Object(context)) => context,
        Some(Value::Null) | None => return Err(AdapterError::UnsupportedIntegration),
        Some(_) => {
            return Err(AdapterError::MalformedEvent(
                "requestContext is not an object".into(),
            ))
        }
    };

    Variant::PROBE_ORDER
        .into_iter()
        .find(|variant| context.contains_key(variant.spec().context_marker))
        .ok_or(AdapterError::UnsupportedIntegration)
}

/// Parse raw event bytes and decode them into the matching wire shape.
pub fn classify(raw: &[u8]) -> Result<WireEvent, AdapterError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| AdapterError::MalformedEvent(format!("invalid JSON: {}", e)))?;

    let variant = detect_variant(&value)?;
    tracing::debug!(variant = %variant, "Event classified");

    let event = match variant {
        Variant::RestProxy => WireEvent::RestProxy(decode(variant, value)?),
        Variant::HttpApiV2 => WireEvent::HttpApiV2(decode(variant, value)?),
        Variant::AlbTargetGroup => WireEvent::AlbTargetGroup(decode(variant, value)?),
    };
    Ok(event)
}

fn decode<T: DeserializeOwned>(variant: Variant, value: Value) -> Result<T, AdapterError> {
    serde_json::from_value(value)
        .map_err(|e| AdapterError::MalformedEvent(format!("{} event: {}", variant, e)))
}
