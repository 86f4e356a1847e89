//! Static template definitions.

/// One literal template as written in a bank module.
///
/// Placeholders use `{{ name }}` syntax. Instruction and response may
/// reference different subsets of the category's parameters.
#[derive(Debug, Clone, Copy)]
pub struct TemplateDef {
    /// Name, unique within its category.
    pub name: &'static str,
    /// Instruction text with placeholders.
    pub instruction: &'static str,
    /// Response text (or code body) with placeholders.
    pub response: &'static str,
}
