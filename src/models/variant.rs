//! Variant entity - a priced configuration of a sofa product.
//!
//! A variant is priced in one of two modes. In [`PricingMode::Components`] the
//! price is always the sum of its component prices; in [`PricingMode::Custom`]
//! an explicit custom price overrides the sum. Every operation that touches
//! the components or the custom price recomputes `price` before returning, so
//! a variant is always ready to persist.

use super::{Component, ComponentKey, SofaType};
use crate::errors::{Error, Result};
use std::fmt;

/// How a variant's price is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Price is the sum of all component prices
    #[default]
    Components,
    /// Price is the custom price, when one is set
    Custom,
}

impl PricingMode {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Custom => "custom",
        }
    }

    /// Case-insensitive parse of the stored form.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "components" => Some(Self::Components),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An upholstery choice with the fabric meterage it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct UpholsterySelection {
    /// Catalog id of the upholstery, when known
    pub upholstery_id: Option<i64>,
    /// Upholstery name
    pub name: String,
    /// Meters of fabric
    pub meters: f64,
}

/// One line of a variant's bill of materials after grouping duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGroup {
    /// First occurrence of the component
    pub component: Component,
    /// Number of occurrences
    pub quantity: usize,
    /// `quantity * component.price`
    pub subtotal: f64,
}

/// A priced sofa configuration.
///
/// Measurement fields are public; the pricing state (`price`, mode, custom
/// price, components) is only reachable through methods that keep it
/// consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Database id, `None` until first saved
    pub id: Option<i64>,
    /// Owning product
    pub product_id: i64,
    pub(crate) long_name: SofaType,
    pub(crate) custom_name: Option<String>,
    pub(crate) price: f64,
    pub(crate) components: Vec<Component>,
    /// Number of seats
    pub seats: Option<u32>,
    /// Mattress width in cm
    pub mattress_width: Option<f64>,
    /// Depth with the sofa opened, in cm
    pub open_depth: Option<f64>,
    /// Depth with the sofa closed, in cm
    pub closed_depth: Option<f64>,
    /// Height in cm
    pub height: Option<f64>,
    /// Upholstery choices with their meterage
    pub upholsteries: Vec<UpholsterySelection>,
    pub(crate) pricing_mode: PricingMode,
    pub(crate) custom_price: Option<f64>,
}

impl Variant {
    /// Creates an empty variant of a predefined sofa type, priced from
    /// components (so at price 0).
    #[must_use]
    pub const fn new(product_id: i64, long_name: SofaType) -> Self {
        Self {
            id: None,
            product_id,
            long_name,
            custom_name: None,
            price: 0.0,
            components: Vec::new(),
            seats: None,
            mattress_width: None,
            open_depth: None,
            closed_depth: None,
            height: None,
            upholsteries: Vec::new(),
            pricing_mode: PricingMode::Components,
            custom_price: None,
        }
    }

    /// Creates an empty variant with a free-text name.
    pub fn with_custom_name(product_id: i64, name: impl Into<String>) -> Self {
        let mut variant = Self::new(product_id, SofaType::Custom);
        variant.set_custom_name(name);
        variant
    }

    // -- Naming ------------------------------------------------------------

    /// Sofa type the variant is named after.
    #[must_use]
    pub const fn long_name(&self) -> SofaType {
        self.long_name
    }

    /// Free-text name; only ever set when the long name is custom.
    #[must_use]
    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// Switches to a predefined sofa type. Passing [`SofaType::Custom`] keeps
    /// the current custom name; any other type drops it.
    pub fn set_long_name(&mut self, long_name: SofaType) {
        self.long_name = long_name;
        if !long_name.is_custom() {
            self.custom_name = None;
        }
    }

    /// Names the variant freely. The name is trimmed; an empty name leaves the
    /// variant custom but unnamed, which [`Variant::validate`] rejects.
    pub fn set_custom_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        self.long_name = SofaType::Custom;
        self.custom_name = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Name shown to users: the custom name for custom variants, the canonical
    /// sofa type value otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match (&self.long_name, &self.custom_name) {
            (SofaType::Custom, Some(name)) => name,
            (t, _) => t.as_str(),
        }
    }

    // -- Pricing -----------------------------------------------------------

    /// Current price.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Current pricing mode.
    #[must_use]
    pub const fn pricing_mode(&self) -> PricingMode {
        self.pricing_mode
    }

    /// Custom price, if one is set.
    #[must_use]
    pub const fn custom_price(&self) -> Option<f64> {
        self.custom_price
    }

    /// Sum of all component prices, duplicates included.
    #[must_use]
    pub fn components_total(&self) -> f64 {
        self.components.iter().map(|c| c.price).sum()
    }

    /// Recomputes and caches the price. Idempotent.
    pub fn compute_price(&mut self) -> f64 {
        self.price = match (self.pricing_mode, self.custom_price) {
            (PricingMode::Custom, Some(custom)) => custom,
            _ => self.components_total(),
        };
        self.price
    }

    /// Overrides the price. The sign is not checked here; the catalog
    /// services reject negative prices before saving.
    pub fn set_custom_price(&mut self, value: f64) {
        self.pricing_mode = PricingMode::Custom;
        self.custom_price = Some(value);
        self.price = value;
    }

    /// Returns to pricing from components, discarding any custom price.
    pub fn set_components_mode(&mut self) -> f64 {
        self.pricing_mode = PricingMode::Components;
        self.custom_price = None;
        self.compute_price()
    }

    // -- Components --------------------------------------------------------

    /// Components in display order, duplicates included.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Appends one unit of a component and recomputes the price.
    pub fn add_component(&mut self, component: Component) -> f64 {
        self.components.push(component);
        self.compute_price()
    }

    /// Replaces the whole component list and recomputes the price.
    pub fn set_components(&mut self, components: Vec<Component>) -> f64 {
        self.components = components;
        self.compute_price()
    }

    /// Removes every occurrence of the component with this key and recomputes
    /// the price. Returns how many entries were removed.
    pub fn remove_components(&mut self, key: &ComponentKey) -> usize {
        let before = self.components.len();
        self.components.retain(|c| !c.has_key(key));
        self.compute_price();
        before - self.components.len()
    }

    /// Number of occurrences of the component with this key.
    #[must_use]
    pub fn quantity_of(&self, key: &ComponentKey) -> usize {
        self.components.iter().filter(|c| c.has_key(key)).count()
    }

    /// Groups duplicate components by key, in order of first appearance.
    #[must_use]
    pub fn component_groups(&self) -> Vec<ComponentGroup> {
        let mut groups: Vec<ComponentGroup> = Vec::new();
        for component in &self.components {
            let key = component.key();
            if let Some(group) = groups.iter_mut().find(|g| g.component.has_key(&key)) {
                group.quantity += 1;
                group.subtotal += component.price;
            } else {
                groups.push(ComponentGroup {
                    component: component.clone(),
                    quantity: 1,
                    subtotal: component.price,
                });
            }
        }
        groups
    }

    /// Total fabric meterage across all upholstery selections.
    #[must_use]
    pub fn upholstery_meters(&self) -> f64 {
        self.upholsteries.iter().map(|u| u.meters).sum()
    }

    // -- Validation --------------------------------------------------------

    /// Checks the naming invariant and that every number is usable.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when a custom variant has no name, when
    /// the custom name collides with a predefined sofa type, or when a
    /// measurement is negative or not finite; [`Error::InvalidAmount`] when a
    /// price is not finite.
    pub fn validate(&self) -> Result<()> {
        match (&self.long_name, &self.custom_name) {
            (SofaType::Custom, None) => {
                return Err(Error::validation("A custom variant needs a name"));
            }
            (SofaType::Custom, Some(name)) => {
                if let Some(t) = SofaType::from_str_loose(name) {
                    return Err(Error::validation(format!(
                        "Custom name '{name}' matches the predefined type '{t}'; use that type instead"
                    )));
                }
            }
            (_, Some(_)) => {
                return Err(Error::validation(
                    "Only custom variants can carry a custom name",
                ));
            }
            (_, None) => {}
        }

        if let Some(custom) = self.custom_price
            && !custom.is_finite()
        {
            return Err(Error::InvalidAmount { amount: custom });
        }
        if let Some(bad) = self.components.iter().find(|c| !c.price.is_finite()) {
            return Err(Error::InvalidAmount { amount: bad.price });
        }

        let measurements = [
            ("mattress width", self.mattress_width),
            ("open depth", self.open_depth),
            ("closed depth", self.closed_depth),
            ("height", self.height),
        ];
        for (label, value) in measurements {
            if let Some(v) = value
                && (!v.is_finite() || v < 0.0)
            {
                return Err(Error::validation(format!(
                    "The {label} must be a non-negative number, got {v}"
                )));
            }
        }
        if let Some(bad) = self
            .upholsteries
            .iter()
            .find(|u| !u.meters.is_finite() || u.meters < 0.0)
        {
            return Err(Error::validation(format!(
                "Upholstery '{}' needs a non-negative meterage, got {}",
                bad.name, bad.meters
            )));
        }
        Ok(())
    }
}
