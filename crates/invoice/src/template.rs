/// Placeholder the server-rendered row template uses for the row position.
pub const ROW_INDEX_PLACEHOLDER: &str = "__idx__";

/// Markup of an empty line-item row, taken from the page's `<template>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTemplate {
    markup: String,
}

impl RowTemplate {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Markup for the row at `index`, usually the current row count.
    pub fn instantiate(&self, index: usize) -> String {
        self.markup
            .replace(ROW_INDEX_PLACEHOLDER, &index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_placeholder_takes_the_row_index() {
        let template = RowTemplate::new(
            r#"<div class="ligne-item"><input name="lignes-__idx__-quantite"><input name="lignes-__idx__-prix_unitaire"></div>"#,
        );

        assert_eq!(
            template.instantiate(3),
            r#"<div class="ligne-item"><input name="lignes-3-quantite"><input name="lignes-3-prix_unitaire"></div>"#
        );
    }

    #[test]
    fn markup_without_placeholder_is_unchanged() {
        let template = RowTemplate::new("<tr></tr>");
        assert_eq!(template.instantiate(0), "<tr></tr>");
    }
}
