//! Admission and normalization of untyped configuration documents
//!
//! Normalization never fails: a missing or wrong-typed field is replaced by
//! its default. The identifier pattern and the display item catalog are not
//! consulted here; those checks belong to [`ConfigurationBuilder`].
//!
//! [`ConfigurationBuilder`]: crate::ConfigurationBuilder

use crate::model::{
    is_subscription_document, DeliveryType, ProductDetails, PurchaseActions,
    PurchaseConfiguration, SubscriptionBasis, SubscriptionDetails, Variant,
};
use crate::value::Value;

/// Outcome of running one candidate document through the admission gate
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Accepted(PurchaseConfiguration),
    Rejected,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted(_))
    }

    pub fn into_configuration(self) -> Option<PurchaseConfiguration> {
        match self {
            Admission::Accepted(config) => Some(config),
            Admission::Rejected => None,
        }
    }
}

/// Whether a document is a configuration at all
///
/// True iff it has a non-empty `productId` or a non-empty `subscriptionId`.
pub fn accepts(doc: &Value) -> bool {
    !text(doc, "productId").is_empty() || !text(doc, "subscriptionId").is_empty()
}

/// Admit and normalize a document in one step
pub fn admit(doc: &Value) -> Admission {
    if accepts(doc) {
        Admission::Accepted(normalize(doc))
    } else {
        Admission::Rejected
    }
}

/// Build a fully-defaulted configuration from a document
pub fn normalize(doc: &Value) -> PurchaseConfiguration {
    let variant = if is_subscription_document(doc) {
        Variant::Subscription(SubscriptionDetails {
            id: text(doc, "subscriptionId").into(),
            name: text(doc, "subscriptionName"),
            description: text(doc, "subscriptionDescription"),
            basis: SubscriptionBasis::parse(&text(doc, "subscriptionBasis")).unwrap_or_default(),
        })
    } else {
        Variant::Product(ProductDetails {
            id: text(doc, "productId").into(),
            name: text(doc, "productName"),
            description: text(doc, "productDescription"),
            repeatable_purchase: flag(doc, "repeatablePurchase"),
        })
    };

    PurchaseConfiguration {
        variant,
        price: price(doc),
        delivery: DeliveryType::parse(&text(doc, "callbackDelivery")).unwrap_or_default(),
        actions: actions(doc.get("actions")),
        dependency: text(doc, "dependency"),
        dependency_amount: dependency_amount(doc),
        permission: text(doc, "permission"),
        hide_if_no_permission: flag(doc, "hideIfNoPermission"),
        display_item: text(doc, "displayItem"),
    }
}

fn text(doc: &Value, key: &str) -> String {
    doc.get(key).and_then(Value::scalar_text).unwrap_or_default()
}

fn flag(doc: &Value, key: &str) -> bool {
    doc.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn price(doc: &Value) -> f64 {
    doc.get("price")
        .and_then(Value::as_float)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(0.0)
}

fn dependency_amount(doc: &Value) -> u32 {
    let amount = match doc.get("dependencyAmount") {
        Some(Value::Int(i)) => u32::try_from(*i).ok(),
        Some(Value::Float(f)) if f.fract() == 0.0 && *f <= u32::MAX as f64 => {
            Some(*f as u32)
        }
        _ => None,
    };
    amount.filter(|n| *n >= 1).unwrap_or(1)
}

fn actions(actions: Option<&Value>) -> PurchaseActions {
    let list = |key: &str| command_list(actions.and_then(|a| a.get(key)));
    PurchaseActions {
        success: list("success"),
        expire: list("expire"),
        renew: list("renew"),
    }
}

fn command_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::List(items)) => items.iter().filter_map(Value::scalar_text).collect(),
        Some(scalar) => scalar
            .scalar_text()
            .map(|command| vec![command])
            .unwrap_or_else(PurchaseActions::placeholder),
        None => PurchaseActions::placeholder(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use crate::value::ValueMap;

    fn doc(pairs: Vec<(&str, Value)>) -> Value {
        let mut map = ValueMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), v);
        }
        Value::Map(map)
    }

    #[test]
    fn test_default_back_fill() {
        let config = normalize(&doc(vec![("productId", "p1".into())]));

        assert_eq!(config.kind(), Kind::Product);
        assert_eq!(config.id().as_str(), "p1");
        assert_eq!(config.price, 0.0);
        assert_eq!(config.delivery, DeliveryType::OnlyWhenPlayerOnline);
        assert!(!config.is_repeatable());
        assert_eq!(config.actions.success, vec![String::new()]);
        assert_eq!(config.actions.expire, vec![String::new()]);
        assert_eq!(config.actions.renew, vec![String::new()]);
        assert_eq!(config.dependency_amount, 1);
        assert!(!config.hide_if_no_permission);
        assert_eq!(config.dependency, "");
        assert_eq!(config.permission, "");
        assert_eq!(config.display_item, "");
    }

    #[test]
    fn test_admission_gate() {
        assert!(accepts(&doc(vec![("productId", "p1".into())])));
        assert!(accepts(&doc(vec![("subscriptionId", "s1".into())])));
        assert!(accepts(&doc(vec![
            ("productId", "p1".into()),
            ("price", Value::List(vec![])),
            ("actions", "nonsense".into()),
        ])));
        assert!(!accepts(&doc(vec![("productId", "".into())])));
        assert!(!accepts(&doc(vec![
            ("productName", "No Id".into()),
            ("price", Value::Int(5)),
        ])));
        assert!(!accepts(&Value::Null));
        assert!(!accepts(&Value::from(vec!["productId"])));

        assert_eq!(admit(&doc(vec![("productName", "x".into())])), Admission::Rejected);
        assert!(admit(&doc(vec![("productId", "p1".into())])).is_accepted());

        assert_eq!(admit(&doc(vec![("productName", "x".into())])).into_configuration(), None);
        let config = admit(&doc(vec![("productId", "p1".into())])).into_configuration();
        assert_eq!(config.map(|c| c.id().to_string()), Some("p1".to_string()));
    }

    #[test]
    fn test_numeric_identifier_is_text() {
        let config = normalize(&doc(vec![("productId", Value::Int(42))]));
        assert_eq!(config.id().as_str(), "42");
    }

    #[test]
    fn test_subscription_classification() {
        let config = normalize(&doc(vec![
            ("subscriptionId", "gold".into()),
            ("subscriptionName", "Gold Pass".into()),
            ("subscriptionBasis", "YEARLY".into()),
            ("productId", "stray".into()),
        ]));
        assert!(config.is_subscription());
        assert_eq!(config.id().as_str(), "gold");
        match &config.variant {
            Variant::Subscription(s) => assert_eq!(s.basis, SubscriptionBasis::Yearly),
            Variant::Product(_) => panic!("expected subscription"),
        }

        // Only one half of the pair: still a product
        let config = normalize(&doc(vec![("subscriptionId", "gold".into())]));
        assert_eq!(config.kind(), Kind::Product);
        assert!(config.id().is_empty());
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let config = normalize(&doc(vec![
            ("productId", "p1".into()),
            ("price", Value::Int(-5)),
            ("callbackDelivery", "WHENEVER".into()),
            ("repeatablePurchase", "yes".into()),
            ("dependencyAmount", Value::Int(0)),
            ("hideIfNoPermission", Value::Int(1)),
            ("permission", Value::List(vec![])),
        ]));
        assert_eq!(config.price, 0.0);
        assert_eq!(config.delivery, DeliveryType::OnlyWhenPlayerOnline);
        assert!(!config.is_repeatable());
        assert_eq!(config.dependency_amount, 1);
        assert!(!config.hide_if_no_permission);
        assert_eq!(config.permission, "");
    }

    #[test]
    fn test_present_values_are_kept() {
        let mut actions = ValueMap::new();
        actions.insert("success".to_string(), vec!["give {player} diamond 1", "say hi"].into());
        actions.insert("expire".to_string(), "lp user {player} parent remove vip".into());
        actions.insert("renew".to_string(), Value::List(vec![]));

        let config = normalize(&doc(vec![
            ("productId", "vip".into()),
            ("productName", "VIP".into()),
            ("price", Value::Float(12.5)),
            ("callbackDelivery", "ALLOW_OFFLINE_DELIVERY".into()),
            ("repeatablePurchase", true.into()),
            ("actions", Value::Map(actions)),
            ("dependency", "starter".into()),
            ("dependencyAmount", Value::Int(3)),
            ("permission", "plex.vip".into()),
            ("hideIfNoPermission", true.into()),
            ("displayItem", "DIAMOND".into()),
        ]));

        assert_eq!(config.name(), "VIP");
        assert_eq!(config.price, 12.5);
        assert_eq!(config.delivery, DeliveryType::AllowOfflineDelivery);
        assert!(config.is_repeatable());
        assert_eq!(config.actions.success, vec!["give {player} diamond 1", "say hi"]);
        assert_eq!(config.actions.expire, vec!["lp user {player} parent remove vip"]);
        assert!(config.actions.renew.is_empty());
        assert_eq!(config.dependency, "starter");
        assert_eq!(config.dependency_amount, 3);
        assert!(config.hide_if_no_permission);
        assert_eq!(config.display_item, "DIAMOND");
    }

    #[test]
    fn test_action_lists_drop_nested_entries() {
        let mut actions = ValueMap::new();
        actions.insert(
            "success".to_string(),
            Value::List(vec!["say a".into(), Value::Null, Value::List(vec![]), Value::Int(7)]),
        );
        let config = normalize(&doc(vec![
            ("productId", "p1".into()),
            ("actions", Value::Map(actions)),
        ]));
        assert_eq!(config.actions.success, vec!["say a", "7"]);
        assert_eq!(config.actions.expire, vec![String::new()]);
    }
}
