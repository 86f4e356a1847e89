//! Template bank for trade-forge record generation.
//!
//! Every category owns a fixed list of instruction/response templates with
//! `{{ name }}` placeholders. The bank is parsed once at startup: each
//! template is compiled into a shared Tera instance and its placeholder set
//! is checked against the keys the category's parameter synthesizer
//! supplies, so a mismatch stops the process before any request is served.
//!
//! # Example
//!
//! ```ignore
//! use trade_forge::template::TemplateBank;
//! use trade_forge::categories::Category;
//!
//! let bank = TemplateBank::load()?;
//! for template in bank.templates(Category::Pinescript) {
//!     println!("{}: {:?}", template.name, template.placeholders());
//! }
//! ```

mod bank;
pub mod types;

pub use types::TemplateDef;

use std::collections::{BTreeMap, BTreeSet};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tera::{Context, Tera};

use crate::categories::Category;
use crate::error::{GeneratorError, TemplateError};
use crate::generator::sampler::{synthesizer_for, ParameterSet};

/// A parsed template with its placeholder sets.
#[derive(Debug, Clone)]
pub struct Template {
    /// Category the template belongs to.
    pub category: Category,
    /// Name, unique within the category.
    pub name: String,
    /// Raw instruction text.
    pub instruction: String,
    /// Raw response text.
    pub response: String,
    /// Placeholders referenced by the instruction.
    pub instruction_placeholders: BTreeSet<String>,
    /// Placeholders referenced by the response.
    pub response_placeholders: BTreeSet<String>,
}

impl Template {
    fn from_def(category: Category, def: &TemplateDef) -> Self {
        Self {
            category,
            name: def.name.to_string(),
            instruction: def.instruction.to_string(),
            response: def.response.to_string(),
            instruction_placeholders: extract_placeholders(def.instruction),
            response_placeholders: extract_placeholders(def.response),
        }
    }

    /// Union of instruction and response placeholders.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.instruction_placeholders
            .iter()
            .chain(self.response_placeholders.iter())
            .map(String::as_str)
            .collect()
    }

    fn instruction_key(&self) -> String {
        format!("{}/{}/instruction", self.category, self.name)
    }

    fn response_key(&self) -> String {
        format!("{}/{}/response", self.category, self.name)
    }
}

/// Process-wide, immutable collection of templates for all categories.
#[derive(Debug)]
pub struct TemplateBank {
    tera: Tera,
    templates: BTreeMap<Category, Vec<Template>>,
}

impl TemplateBank {
    /// Loads the built-in templates for every category.
    pub fn load() -> Result<Self, TemplateError> {
        Self::from_definitions(
            Category::all()
                .into_iter()
                .map(|category| (category, bank::definitions(category))),
        )
    }

    /// Builds a bank from explicit definitions.
    ///
    /// Fails on duplicate names, empty categories, unparseable template text,
    /// or a placeholder the category's synthesizer does not supply.
    pub fn from_definitions<'d, I>(entries: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (Category, &'d [TemplateDef])>,
    {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let mut templates: BTreeMap<Category, Vec<Template>> = BTreeMap::new();

        for (category, defs) in entries {
            if defs.is_empty() {
                return Err(TemplateError::EmptyCategory(category.to_string()));
            }

            let supplied: BTreeSet<&str> = synthesizer_for(category)
                .supplied_keys()
                .iter()
                .copied()
                .collect();

            let mut parsed = Vec::with_capacity(defs.len());
            for def in defs {
                if parsed.iter().any(|t: &Template| t.name == def.name) {
                    return Err(TemplateError::DuplicateName {
                        category: category.to_string(),
                        name: def.name.to_string(),
                    });
                }

                let template = Template::from_def(category, def);

                if let Some(missing) = template
                    .placeholders()
                    .into_iter()
                    .find(|p| !supplied.contains(p))
                {
                    return Err(TemplateError::UnsuppliedPlaceholder {
                        category: category.to_string(),
                        template: template.name.clone(),
                        placeholder: missing.to_string(),
                    });
                }

                for (key, body) in [
                    (template.instruction_key(), &template.instruction),
                    (template.response_key(), &template.response),
                ] {
                    tera.add_raw_template(&key, body)
                        .map_err(|source| TemplateError::Parse {
                            name: key.clone(),
                            source,
                        })?;
                }

                parsed.push(template);
            }

            tracing::debug!(
                category = %category,
                templates = parsed.len(),
                "Loaded template bank category"
            );
            templates.insert(category, parsed);
        }

        Ok(Self { tera, templates })
    }

    /// Templates for a category, in selection order.
    pub fn templates(&self, category: Category) -> &[Template] {
        self.templates
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up a template by name.
    pub fn get(&self, category: Category, name: &str) -> Result<&Template, TemplateError> {
        self.templates(category)
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| TemplateError::NotFound(format!("{}/{}", category, name)))
    }

    /// Uniformly selects one template. Consumes exactly one draw.
    pub fn choose(
        &self,
        category: Category,
        rng: &mut ChaCha8Rng,
    ) -> Result<&Template, TemplateError> {
        let templates = self.templates(category);
        if templates.is_empty() {
            return Err(TemplateError::EmptyCategory(category.to_string()));
        }
        Ok(&templates[rng.random_range(0..templates.len())])
    }

    /// Interpolates a template's instruction and response.
    ///
    /// A placeholder without a parameter is a bank/synthesizer mismatch and
    /// surfaces as [`GeneratorError::Interpolation`].
    pub fn render(
        &self,
        template: &Template,
        params: &ParameterSet,
    ) -> Result<(String, String), GeneratorError> {
        let mut context = Context::new();
        for (key, value) in params {
            context.insert(key, &display_value(value));
        }

        let render = |key: String| {
            self.tera
                .render(&key, &context)
                .map_err(|source| GeneratorError::Interpolation {
                    template: template.name.clone(),
                    source,
                })
        };

        Ok((
            render(template.instruction_key())?,
            render(template.response_key())?,
        ))
    }
}

/// Text form of a parameter as it appears inside rendered templates.
///
/// Floats keep their shortest round-trip form (`2.0`, `123.45`).
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extracts `{{ name }}` placeholder names from template text.
pub fn extract_placeholders(template: &str) -> BTreeSet<String> {
    let mut vars = BTreeSet::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
                chars.next();
            }
            if chars.next() == Some('}') && chars.peek() == Some(&'}') {
                chars.next();
            }
            let var_name = var_name.trim();
            if !var_name.is_empty() {
                vars.insert(var_name.to_string());
            }
        }
    }

    vars
}
