//! Products

use rusty_money::{Money, iso::Currency};

use crate::tags::{collection::TagCollection, string::StringTagCollection};

/// Catalogue entry for a coffee that can be placed in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a, T: TagCollection = StringTagCollection> {
    /// Product title
    pub title: String,

    /// Short marketing description
    pub description: String,

    /// Category labels
    pub tags: T,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Image reference, usually a path under the storefront's public assets
    pub image: String,
}
