//! Document trait implementation for the Product record.
//!
//! This module contains the [`Document`] trait implementation that lets [`Product`] be
//! managed by the generic [`CollectionActor`](doc_store::CollectionActor), including the
//! stock actions from [`ProductAction`].

use super::actions::ProductAction;
use super::error::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use doc_store::Document;

fn checked_name(name: String) -> Result<String, ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::BlankName);
    }
    Ok(name)
}

impl Document for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    /// Stock level after the action.
    type ActionResult = u32;
    type SortKey = ProductId;
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        let name = checked_name(params.name)?;
        Ok(Self::new(id, name, params.quantity))
    }

    fn sort_key(&self) -> ProductId {
        self.id
    }

    /// # Fields Updated
    /// - `name`: rejected if blank
    /// - `quantity`: overwritten as given
    fn apply_update(&mut self, update: ProductUpdate) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            self.name = checked_name(name)?;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        self.touch();
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<u32, ProductError> {
        match action {
            ProductAction::CheckStock => {}
            ProductAction::ReserveStock(amount) => {
                self.quantity = self.quantity.checked_sub(amount).ok_or(
                    ProductError::InsufficientStock {
                        requested: amount,
                        available: self.quantity,
                    },
                )?;
                self.touch();
            }
            ProductAction::Restock(amount) => {
                self.quantity =
                    self.quantity
                        .checked_add(amount)
                        .ok_or(ProductError::StockOverflow {
                            current: self.quantity,
                            added: amount,
                        })?;
                self.touch();
            }
        }
        Ok(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(quantity: u32) -> Product {
        Product::from_create_params(ProductId(1), ProductCreate::new("Widget", quantity)).unwrap()
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = Product::from_create_params(ProductId(1), ProductCreate::new("   ", 1));
        assert_eq!(err.unwrap_err(), ProductError::BlankName);

        let mut product = widget(1);
        let err = product.apply_update(ProductUpdate {
            name: Some(String::new()),
            quantity: None,
        });
        assert_eq!(err.unwrap_err(), ProductError::BlankName);
    }

    #[test]
    fn reserve_takes_exactly_what_is_there() {
        let mut product = widget(4);
        assert_eq!(product.handle_action(ProductAction::ReserveStock(4)), Ok(0));
        assert_eq!(
            product.handle_action(ProductAction::ReserveStock(1)),
            Err(ProductError::InsufficientStock {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn restock_refuses_to_overflow() {
        let mut product = widget(u32::MAX - 1);
        assert_eq!(product.handle_action(ProductAction::Restock(1)), Ok(u32::MAX));
        assert!(matches!(
            product.handle_action(ProductAction::Restock(1)),
            Err(ProductError::StockOverflow { .. })
        ));
    }

    #[test]
    fn writes_refresh_updated_at() {
        let mut product = widget(5);
        let added = product.added_at;
        product
            .apply_update(ProductUpdate {
                name: None,
                quantity: Some(9),
            })
            .unwrap();
        assert_eq!(product.quantity, 9);
        assert_eq!(product.added_at, added);
        assert!(product.updated_at >= added);
    }
}
