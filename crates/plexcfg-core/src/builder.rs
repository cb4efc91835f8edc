//! Validated construction of configurations authored interactively
//!
//! Imported documents skip these checks; only configurations assembled here
//! are held to the identifier pattern and the display item catalog.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::identity::ConfigId;
use crate::model::{
    DeliveryType, ProductDetails, PurchaseActions, PurchaseConfiguration, SubscriptionBasis,
    SubscriptionDetails, Variant,
};
use crate::store::ConfigStore;
use tracing::debug;

/// Builder for a product or subscription configuration
///
/// # Example
///
/// ```
/// use plexcfg_core::{Catalog, ConfigStore, ConfigurationBuilder};
///
/// let store = ConfigStore::new();
/// let config = ConfigurationBuilder::product("crate_key", "Crate Key")
///     .price(250.0)
///     .success_action("crate give {player} vote 1")
///     .display_item("ENDER_CHEST")
///     .build(Catalog::builtin(), &store)
///     .unwrap();
/// assert_eq!(config.actions.success, vec!["crate give {player} vote 1"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    config: PurchaseConfiguration,
    actions_touched: [bool; 3],
}

impl ConfigurationBuilder {
    /// Start a one-time purchase
    pub fn product(id: impl Into<ConfigId>, name: impl Into<String>) -> Self {
        Self::from_config(PurchaseConfiguration::product(id, name))
    }

    /// Start a subscription
    pub fn subscription(id: impl Into<ConfigId>, name: impl Into<String>) -> Self {
        Self::from_config(PurchaseConfiguration::subscription(id, name))
    }

    fn from_config(config: PurchaseConfiguration) -> Self {
        Self {
            config,
            actions_touched: [false; 3],
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        match &mut self.config.variant {
            Variant::Product(p) => p.description = description.into(),
            Variant::Subscription(s) => s.description = description.into(),
        }
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.config.price = price;
        self
    }

    pub fn delivery(mut self, delivery: DeliveryType) -> Self {
        self.config.delivery = delivery;
        self
    }

    /// Allow buying a product more than once; ignored for subscriptions
    pub fn repeatable(mut self, repeatable: bool) -> Self {
        if let Variant::Product(ProductDetails {
            repeatable_purchase,
            ..
        }) = &mut self.config.variant
        {
            *repeatable_purchase = repeatable;
        }
        self
    }

    /// Billing period; ignored for products
    pub fn basis(mut self, basis: SubscriptionBasis) -> Self {
        if let Variant::Subscription(SubscriptionDetails { basis: b, .. }) =
            &mut self.config.variant
        {
            *b = basis;
        }
        self
    }

    /// Append a command run on purchase
    pub fn success_action(mut self, command: impl Into<String>) -> Self {
        Self::push_action(&mut self.config.actions.success, &mut self.actions_touched[0], command);
        self
    }

    /// Append a command run when a subscription lapses
    pub fn expire_action(mut self, command: impl Into<String>) -> Self {
        Self::push_action(&mut self.config.actions.expire, &mut self.actions_touched[1], command);
        self
    }

    /// Append a command run when a subscription renews
    pub fn renew_action(mut self, command: impl Into<String>) -> Self {
        Self::push_action(&mut self.config.actions.renew, &mut self.actions_touched[2], command);
        self
    }

    // The first command replaces the empty placeholder entry
    fn push_action(list: &mut Vec<String>, touched: &mut bool, command: impl Into<String>) {
        if !*touched {
            list.clear();
            *touched = true;
        }
        list.push(command.into());
    }

    pub fn actions(mut self, actions: PurchaseActions) -> Self {
        self.config.actions = actions;
        self.actions_touched = [true; 3];
        self
    }

    pub fn dependency(mut self, id: impl Into<String>, amount: u32) -> Self {
        self.config.dependency = id.into();
        self.config.dependency_amount = amount;
        self
    }

    pub fn permission(mut self, permission: impl Into<String>, hide_if_missing: bool) -> Self {
        self.config.permission = permission.into();
        self.config.hide_if_no_permission = hide_if_missing;
        self
    }

    pub fn display_item(mut self, item: impl Into<String>) -> Self {
        self.config.display_item = item.into();
        self
    }

    /// Validate and produce the configuration
    ///
    /// `store` resolves `dependency`. A dependency amount only matters when
    /// the target can be bought more than once, so it is reset to 1 for
    /// one-shot targets.
    pub fn build(self, catalog: &Catalog, store: &ConfigStore) -> Result<PurchaseConfiguration> {
        let mut config = self.config;

        let id = config.id();
        if id.is_empty() {
            return Err(Error::MissingField(match config.variant {
                Variant::Product(_) => "productId",
                Variant::Subscription(_) => "subscriptionId",
            }));
        }
        if !id.is_valid_pattern() {
            return Err(Error::InvalidId(id.to_string()));
        }
        if config.name().trim().is_empty() {
            return Err(Error::MissingField(match config.variant {
                Variant::Product(_) => "productName",
                Variant::Subscription(_) => "subscriptionName",
            }));
        }
        if !config.price.is_finite() || config.price < 0.0 {
            return Err(Error::InvalidPrice(config.price));
        }
        if config.dependency_amount == 0 {
            return Err(Error::InvalidDependencyAmount);
        }
        if !config.display_item.is_empty() && !catalog.exists(&config.display_item) {
            return Err(Error::UnknownDisplayItem(config.display_item));
        }

        if config.has_dependency() {
            let target = store
                .find(&config.dependency)
                .ok_or_else(|| Error::UnknownDependency(config.dependency.clone()))?;
            if !target.is_repeatable() {
                config.dependency_amount = 1;
            }
        }
        if !config.has_permission() {
            config.hide_if_no_permission = false;
        }

        debug!(id = %config.id(), kind = %config.kind(), "built configuration");
        Ok(config)
    }
}
