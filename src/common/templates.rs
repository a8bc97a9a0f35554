//! Command templates for the external applications the launcher starts.
//!
//! A template is an argument vector such as `["cursor", "{path}"]`. Each
//! `{name}` placeholder is replaced by the matching value; no shell is
//! involved, so values containing spaces stay a single argument.

use thiserror::Error;

/// Template rendering errors
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("Command template is empty")]
    EmptyTemplate,

    #[error("No value for placeholder {{{placeholder}}} in `{template}`")]
    MissingValue {
        placeholder: String,
        template: String,
    },
}

/// Renders argument-vector templates
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Create a new template processor
    pub fn new() -> Self {
        Self
    }

    /// Render every argument of `template`, replacing `{key}` with the paired value
    pub fn render(
        &self,
        template: &[String],
        values: &[(&str, &str)],
    ) -> Result<Vec<String>, TemplateError> {
        if template.is_empty() || template[0].trim().is_empty() {
            return Err(TemplateError::EmptyTemplate);
        }

        template
            .iter()
            .map(|arg| self.render_arg(arg, values, template))
            .collect()
    }

    fn render_arg(
        &self,
        arg: &str,
        values: &[(&str, &str)],
        template: &[String],
    ) -> Result<String, TemplateError> {
        let mut rendered = String::with_capacity(arg.len());
        let mut rest = arg;

        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    let value = values
                        .iter()
                        .find(|(name, _)| *name == key)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::MissingValue {
                            placeholder: key.to_string(),
                            template: template.join(" "),
                        })?;
                    rendered.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    // unmatched brace, keep the rest verbatim
                    rendered.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        rendered.push_str(rest);
        Ok(rendered)
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new()
    }
}
