//! Variant projection and YAML rendering

use crate::error::{Error, Result};
use plexcfg_core::{PurchaseActions, PurchaseConfiguration, Value, ValueMap, Variant};

// Largest integer an f64 holds exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Build the minimal document for one configuration
///
/// Products carry no `subscription*` keys and subscriptions carry none of
/// `productId`, `productName`, `productDescription`, `repeatablePurchase`.
/// Shared fields are always written, defaults included.
pub fn project(config: &PurchaseConfiguration) -> Value {
    let mut doc = ValueMap::new();

    match &config.variant {
        Variant::Product(p) => {
            doc.insert("productId".into(), p.id.as_str().into());
            doc.insert("productName".into(), p.name.as_str().into());
            doc.insert("productDescription".into(), p.description.as_str().into());
        }
        Variant::Subscription(s) => {
            doc.insert("subscriptionId".into(), s.id.as_str().into());
            doc.insert("subscriptionName".into(), s.name.as_str().into());
            doc.insert("subscriptionDescription".into(), s.description.as_str().into());
        }
    }

    doc.insert("price".into(), price(config.price));
    doc.insert("callbackDelivery".into(), config.delivery.as_str().into());

    match &config.variant {
        Variant::Product(p) => {
            doc.insert("repeatablePurchase".into(), p.repeatable_purchase.into());
        }
        Variant::Subscription(s) => {
            doc.insert("subscriptionBasis".into(), s.basis.as_str().into());
        }
    }

    doc.insert("actions".into(), actions(&config.actions));
    doc.insert("dependency".into(), config.dependency.as_str().into());
    doc.insert("dependencyAmount".into(), config.dependency_amount.into());
    doc.insert("permission".into(), config.permission.as_str().into());
    doc.insert("hideIfNoPermission".into(), config.hide_if_no_permission.into());
    doc.insert("displayItem".into(), config.display_item.as_str().into());

    Value::Map(doc)
}

/// Whole prices are written as integers, the way the plugin stores them
fn price(price: f64) -> Value {
    if price.fract() == 0.0 && price.abs() <= MAX_EXACT_INT {
        Value::Int(price as i64)
    } else {
        Value::Float(price)
    }
}

fn actions(actions: &PurchaseActions) -> Value {
    let mut map = ValueMap::new();
    map.insert("success".into(), actions.success.clone().into());
    map.insert("expire".into(), actions.expire.clone().into());
    map.insert("renew".into(), actions.renew.clone().into());
    Value::Map(map)
}

// YAML 1.1 boolean words; SnakeYAML and Jackson read these plain as booleans
const BOOL_WORDS: [&str; 16] = [
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Render a document as block-style YAML
///
/// Output uses 2-space indentation, never wraps long lines and never emits
/// anchors or aliases. Strings spelled like YAML 1.1 booleans are single
/// quoted so 1.1 readers keep them as text.
pub fn render(doc: &Value) -> Result<String> {
    let text = serde_yaml::to_string(doc).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(quote_bool_words(&text))
}

fn quote_bool_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Indentation of the line that opened a literal block, while inside one
    let mut block: Option<usize> = None;

    for line in text.lines() {
        let indent = line.len() - line.trim_start().len();
        if let Some(opener) = block {
            if line.trim().is_empty() || indent > opener {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            block = None;
        }

        let (prefix, scalar) = split_scalar(line);
        if scalar.starts_with('|') || scalar.starts_with('>') {
            block = Some(indent);
        }
        out.push_str(prefix);
        if BOOL_WORDS.contains(&scalar) {
            out.push('\'');
            out.push_str(scalar);
            out.push('\'');
        } else {
            out.push_str(scalar);
        }
        out.push('\n');
    }
    out
}

/// Split a block-style line into its structural prefix and trailing scalar
fn split_scalar(line: &str) -> (&str, &str) {
    let mut start = line.len() - line.trim_start().len();
    while line[start..].starts_with("- ") {
        start += 2;
    }
    let rest = &line[start..];
    if rest.starts_with('\'') || rest.starts_with('"') {
        return (&line[..start], rest);
    }
    match rest.find(": ") {
        Some(pos) => line.split_at(start + pos + 2),
        None if rest.ends_with(':') => (line, ""),
        None => line.split_at(start),
    }
}
