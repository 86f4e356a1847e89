//! Literal template text for every category.

mod institutional;
mod pinescript;
mod price_action;

use crate::categories::Category;

use super::types::TemplateDef;

/// Returns the literal templates for a category, in selection order.
pub fn definitions(category: Category) -> &'static [TemplateDef] {
    match category {
        Category::Pinescript => pinescript::TEMPLATES,
        Category::PriceAction => price_action::TEMPLATES,
        Category::Institutional => institutional::TEMPLATES,
    }
}
