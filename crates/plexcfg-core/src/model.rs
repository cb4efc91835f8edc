//! Purchase configuration model
//!
//! A configuration is either a one-time product or a recurring subscription.
//! The variant is fixed once when the configuration is built or imported;
//! nothing downstream re-derives it from field contents.

use crate::identity::ConfigId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a purchase callback may be delivered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    #[default]
    OnlyWhenPlayerOnline,
    AllowOfflineDelivery,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 2] = [
        DeliveryType::OnlyWhenPlayerOnline,
        DeliveryType::AllowOfflineDelivery,
    ];

    /// External name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::OnlyWhenPlayerOnline => "ONLY_WHEN_PLAYER_ONLINE",
            DeliveryType::AllowOfflineDelivery => "ALLOW_OFFLINE_DELIVERY",
        }
    }

    /// Parse an external name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s.trim())
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryType::OnlyWhenPlayerOnline => "Only when player is online",
            DeliveryType::AllowOfflineDelivery => "Allow offline delivery",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing period of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionBasis {
    #[default]
    Monthly,
    Quarterly,
    SemiYearly,
    Yearly,
}

impl SubscriptionBasis {
    pub const ALL: [SubscriptionBasis; 4] = [
        SubscriptionBasis::Monthly,
        SubscriptionBasis::Quarterly,
        SubscriptionBasis::SemiYearly,
        SubscriptionBasis::Yearly,
    ];

    /// External name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionBasis::Monthly => "MONTHLY",
            SubscriptionBasis::Quarterly => "QUARTERLY",
            SubscriptionBasis::SemiYearly => "SEMI_YEARLY",
            SubscriptionBasis::Yearly => "YEARLY",
        }
    }

    /// Parse an external name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == s.trim())
    }
}

impl fmt::Display for SubscriptionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command templates run by the host plugin
///
/// Commands are opaque text; placeholders such as `{player}` are never
/// interpreted here. `expire` and `renew` only matter for subscriptions but
/// are carried for products too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseActions {
    pub success: Vec<String>,
    pub expire: Vec<String>,
    pub renew: Vec<String>,
}

impl PurchaseActions {
    /// The placeholder list used when a list is absent: one empty command
    pub fn placeholder() -> Vec<String> {
        vec![String::new()]
    }
}

impl Default for PurchaseActions {
    fn default() -> Self {
        Self {
            success: Self::placeholder(),
            expire: Self::placeholder(),
            renew: Self::placeholder(),
        }
    }
}

/// One-time purchase fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ConfigId,
    pub name: String,
    pub description: String,
    pub repeatable_purchase: bool,
}

/// Subscription fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionDetails {
    pub id: ConfigId,
    pub name: String,
    pub description: String,
    pub basis: SubscriptionBasis,
}

/// Which shape a configuration takes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Product(ProductDetails),
    Subscription(SubscriptionDetails),
}

/// Field-free tag of a [`Variant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Product,
    Subscription,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Product => f.write_str("One-time"),
            Kind::Subscription => f.write_str("Subscription"),
        }
    }
}

/// A purchase configuration consumed by the Plex Purchases plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseConfiguration {
    /// Set directly, a subscription may carry an empty name. It still exports
    /// as a subscription but reads back as a product with an empty id, since
    /// the document discriminant needs both `subscriptionId` and
    /// `subscriptionName`. [`ConfigurationBuilder`](crate::ConfigurationBuilder)
    /// refuses such a subscription.
    pub variant: Variant,
    /// Non-negative price
    pub price: f64,
    pub delivery: DeliveryType,
    pub actions: PurchaseActions,
    /// Identifier of another configuration; empty means none
    pub dependency: String,
    /// How many times the dependency must have been bought
    pub dependency_amount: u32,
    /// Permission gate; empty means none
    pub permission: String,
    pub hide_if_no_permission: bool,
    /// Catalog item id shown in menus
    pub display_item: String,
}

impl PurchaseConfiguration {
    /// Create a configuration with default shared fields
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            price: 0.0,
            delivery: DeliveryType::default(),
            actions: PurchaseActions::default(),
            dependency: String::new(),
            dependency_amount: 1,
            permission: String::new(),
            hide_if_no_permission: false,
            display_item: String::new(),
        }
    }

    /// Create a product configuration
    pub fn product(id: impl Into<ConfigId>, name: impl Into<String>) -> Self {
        Self::new(Variant::Product(ProductDetails {
            id: id.into(),
            name: name.into(),
            ..ProductDetails::default()
        }))
    }

    /// Create a subscription configuration
    ///
    /// No validation happens here. An empty `name` gives a configuration that
    /// does not survive export and re-import as a subscription; go through
    /// [`ConfigurationBuilder`](crate::ConfigurationBuilder) to reject it.
    pub fn subscription(id: impl Into<ConfigId>, name: impl Into<String>) -> Self {
        Self::new(Variant::Subscription(SubscriptionDetails {
            id: id.into(),
            name: name.into(),
            ..SubscriptionDetails::default()
        }))
    }

    pub fn kind(&self) -> Kind {
        match self.variant {
            Variant::Product(_) => Kind::Product,
            Variant::Subscription(_) => Kind::Subscription,
        }
    }

    pub fn is_subscription(&self) -> bool {
        self.kind() == Kind::Subscription
    }

    /// Product or subscription identifier, whichever the variant carries
    pub fn id(&self) -> &ConfigId {
        match &self.variant {
            Variant::Product(p) => &p.id,
            Variant::Subscription(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match &self.variant {
            Variant::Product(p) => &p.name,
            Variant::Subscription(s) => &s.name,
        }
    }

    pub fn description(&self) -> &str {
        match &self.variant {
            Variant::Product(p) => &p.description,
            Variant::Subscription(s) => &s.description,
        }
    }

    /// Whether a player can own this more than once (repeatable products and
    /// every subscription)
    pub fn is_repeatable(&self) -> bool {
        match &self.variant {
            Variant::Product(p) => p.repeatable_purchase,
            Variant::Subscription(_) => true,
        }
    }

    pub fn has_dependency(&self) -> bool {
        !self.dependency.is_empty()
    }

    pub fn has_permission(&self) -> bool {
        !self.permission.is_empty()
    }

    /// Whether the permission limits how many times the purchase can be made
    pub fn is_limited_by_times(&self) -> bool {
        self.permission.contains("<purchase_times>")
    }
}

/// Classify an untyped document
///
/// A document is a subscription iff both `subscriptionId` and
/// `subscriptionName` are non-empty; anything else is a product.
pub fn is_subscription_document(doc: &Value) -> bool {
    let non_empty = |key: &str| {
        doc.get(key)
            .and_then(Value::scalar_text)
            .is_some_and(|s| !s.is_empty())
    };
    non_empty("subscriptionId") && non_empty("subscriptionName")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueMap;

    fn doc(pairs: &[(&str, &str)]) -> Value {
        let mut map = ValueMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), Value::from(*v));
        }
        Value::Map(map)
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(
            DeliveryType::parse("ALLOW_OFFLINE_DELIVERY"),
            Some(DeliveryType::AllowOfflineDelivery)
        );
        assert_eq!(DeliveryType::parse("sometimes"), None);
        assert_eq!(SubscriptionBasis::parse(" SEMI_YEARLY "), Some(SubscriptionBasis::SemiYearly));
        assert_eq!(SubscriptionBasis::default().as_str(), "MONTHLY");
        assert_eq!(DeliveryType::default().label(), "Only when player is online");
    }

    #[test]
    fn test_discriminant_requires_both_fields() {
        assert!(is_subscription_document(&doc(&[
            ("subscriptionId", "gold"),
            ("subscriptionName", "Gold Pass"),
        ])));
        assert!(!is_subscription_document(&doc(&[("subscriptionId", "gold")])));
        assert!(!is_subscription_document(&doc(&[("subscriptionName", "Gold Pass")])));
        assert!(!is_subscription_document(&doc(&[
            ("subscriptionId", ""),
            ("subscriptionName", "Gold Pass"),
        ])));
        assert!(!is_subscription_document(&Value::Null));
    }

    #[test]
    fn test_accessors() {
        let product = PurchaseConfiguration::product("crate_key", "Crate Key");
        assert_eq!(product.kind(), Kind::Product);
        assert_eq!(product.id().as_str(), "crate_key");
        assert!(!product.is_repeatable());
        assert_eq!(product.actions.success, vec![String::new()]);

        let mut sub = PurchaseConfiguration::subscription("gold", "Gold Pass");
        assert!(sub.is_subscription());
        assert!(sub.is_repeatable());
        assert_eq!(sub.name(), "Gold Pass");

        sub.permission = "plex.gold.<purchase_times>".to_string();
        assert!(sub.has_permission());
        assert!(sub.is_limited_by_times());
    }
}
