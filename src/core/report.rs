//! Price list generation.
//!
//! This module turns a product's variants into list prices: the variant's base
//! price marked up, plus the product's flat delivery price. All functions are
//! framework-agnostic and return structured data; [`format_price_list`]
//! renders it as plain text.

use super::validate::require_markup;
use crate::{
    entities::product,
    errors::{Error, Result},
    models::PricingMode,
};
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// One priced variant of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceListLine {
    /// Variant id
    pub variant_id: i64,
    /// Display name of the variant
    pub name: String,
    /// How the base price was derived
    pub pricing_mode: PricingMode,
    /// Variant price before markup
    pub base_price: f64,
    /// Total fabric meterage of the variant's upholstery selections
    pub upholstery_meters: f64,
    /// Base price with markup applied
    pub list_price: f64,
    /// Flat delivery price
    pub delivery_price: f64,
    /// `list_price + delivery_price`
    pub total: f64,
}

/// Price list of one product.
#[derive(Debug, Clone)]
pub struct PriceList {
    /// The product
    pub product: product::Model,
    /// One line per variant, in the product's display order
    pub lines: Vec<PriceListLine>,
}

/// Applies a markup expressed as a share of the final price:
/// `base / ((100 - markup) / 100)`.
///
/// # Errors
/// Returns [`Error::InvalidMarkup`] unless `markup` is finite and in `[0, 100)`.
pub fn list_price(base_price: f64, markup_percentage: f64) -> Result<f64> {
    let markup = require_markup(markup_percentage)?;
    Ok(base_price / ((100.0 - markup) / 100.0))
}

/// Rounds to cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Builds the price list of a product using its own markup and delivery price.
///
/// # Errors
/// [`Error::ProductNotFound`] if the product does not exist,
/// [`Error::InvalidMarkup`] if its stored markup is unusable.
pub async fn generate_price_list(db: &DatabaseConnection, product_id: i64) -> Result<PriceList> {
    let product = super::product::get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;
    let variants = super::product::get_product_variants(db, product_id).await?;

    let lines = variants
        .iter()
        .map(|v| {
            let list = round_cents(list_price(v.price(), product.markup_percentage)?);
            Ok(PriceListLine {
                variant_id: v.id.unwrap_or_default(),
                name: v.display_name().to_string(),
                pricing_mode: v.pricing_mode(),
                base_price: v.price(),
                upholstery_meters: v.upholstery_meters(),
                list_price: list,
                delivery_price: product.delivery_price,
                total: round_cents(list + product.delivery_price),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PriceList { product, lines })
}

/// Formats an amount in euro with two decimals, e.g. `€ 1234.50`.
#[must_use]
pub fn format_euro(amount: f64) -> String {
    format!("€ {amount:.2}")
}

/// Renders a price list as plain text, one variant per line.
#[must_use]
pub fn format_price_list(list: &PriceList) -> String {
    let mut out = format!(
        "{} (markup {:.1}%, delivery {})\n",
        list.product.name,
        list.product.markup_percentage,
        format_euro(list.product.delivery_price)
    );
    if list.lines.is_empty() {
        out.push_str("  no variants\n");
        return out;
    }
    for line in &list.lines {
        let mode = match line.pricing_mode {
            PricingMode::Components => "",
            PricingMode::Custom => " *",
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "  {}{mode}: base {} | {:.1} m fabric | list {} | total {}",
            line.name,
            format_euro(line.base_price),
            line.upholstery_meters,
            format_euro(line.list_price),
            format_euro(line.total),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::product::{ProductInput, create_product};
    use crate::models::{Component, SofaType, UpholsterySelection, Variant};
    use crate::test_utils::*;

    #[test]
    fn test_list_price() {
        assert_eq!(list_price(70.0, 30.0).unwrap(), 100.0);
        assert_eq!(list_price(100.0, 0.0).unwrap(), 100.0);
        assert_eq!(list_price(0.0, 50.0).unwrap(), 0.0);
    }

    #[test]
    fn test_list_price_rejects_unusable_markup() {
        assert!(matches!(
            list_price(100.0, 100.0),
            Err(Error::InvalidMarkup { markup: _ })
        ));
        assert!(list_price(100.0, 150.0).is_err());
        assert!(list_price(100.0, -1.0).is_err());
    }

    #[test]
    fn test_round_cents_and_format() {
        assert_eq!(round_cents(214.285_714), 214.29);
        assert_eq!(format_euro(1234.5), "€ 1234.50");
    }

    #[tokio::test]
    async fn test_generate_price_list() -> Result<()> {
        let db = setup_test_db().await?;
        let mut two = Variant::new(0, SofaType::TwoSeat);
        two.add_component(Component::new("Fusto", 100.0));
        two.add_component(Component::new("Gomma", 50.0));
        two.upholsteries.push(UpholsterySelection {
            upholstery_id: None,
            name: "Lino".to_string(),
            meters: 6.5,
        });
        let mut relax = Variant::with_custom_name(0, "Milano Relax");
        relax.set_custom_price(350.0);

        let creation = create_product(
            &db,
            ProductInput {
                name: "Milano".to_string(),
                description: String::new(),
                photo_url: None,
                delivery_price: 80.0,
                markup_percentage: 30.0,
            },
            vec![two, relax],
        )
        .await?;

        let list = generate_price_list(&db, creation.product.id).await?;

        assert_eq!(list.lines.len(), 2);
        assert_eq!(list.lines[0].name, "Divano 2 posti");
        assert_eq!(list.lines[0].base_price, 150.0);
        assert_eq!(list.lines[0].upholstery_meters, 6.5);
        assert_eq!(list.lines[0].list_price, 214.29);
        assert_eq!(list.lines[0].total, 294.29);
        assert_eq!(list.lines[1].pricing_mode, PricingMode::Custom);
        assert_eq!(list.lines[1].list_price, 500.0);
        assert_eq!(list.lines[1].total, 580.0);

        let text = format_price_list(&list);
        assert!(text.starts_with("Milano (markup 30.0%, delivery € 80.00)"));
        assert!(text.contains("Milano Relax *: base € 350.00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_price_list_of_missing_product() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_price_list(&db, 3).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: 3 }
        ));
        Ok(())
    }
}
