//! HTML page and the shader cards inside it
//!
//! Cards are only read and lightly mutated: the logo's `src` (with its
//! pre-hydration value kept in a data attribute) and one class on the card
//! element. Everything else in the document is left as parsed.

use crate::config::MarkupContract;
use dom_query::{Document, Selection};

/// A parsed HTML page
pub struct Page {
    document: Document,
    markup: MarkupContract,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("markup", &self.markup)
            .finish_non_exhaustive()
    }
}

impl Page {
    pub fn parse(html: &str, markup: MarkupContract) -> Self {
        Self {
            document: Document::from(html),
            markup,
        }
    }

    /// Hydration targets, in document order
    ///
    /// An invalid card selector matches nothing.
    pub fn cards(&self) -> Vec<Card<'_>> {
        let Some(matched) = self.document.try_select(&self.markup.card_selector) else {
            log::debug!("Invalid card selector: {}", self.markup.card_selector);
            return Vec::new();
        };

        matched
            .nodes()
            .iter()
            .map(|node| Card {
                element: Selection::from(*node),
                markup: &self.markup,
            })
            .collect()
    }

    /// Serialize the (possibly mutated) document
    pub fn html(&self) -> String {
        self.document.html().to_string()
    }
}

/// One card element on a page
pub struct Card<'a> {
    element: Selection<'a>,
    markup: &'a MarkupContract,
}

impl<'a> Card<'a> {
    /// Project slug, if the attribute is present and non-empty
    pub fn slug(&self) -> Option<String> {
        self.element
            .attr(&self.markup.slug_attribute)
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    }

    /// The logo image element, if the card has one
    pub fn logo(&self) -> Option<Selection<'a>> {
        let matched = self.element.try_select(&self.markup.logo_selector)?;
        matched.nodes().first().map(|node| Selection::from(*node))
    }

    pub fn logo_src(&self) -> Option<String> {
        self.logo()?.attr("src").map(|s| s.to_string())
    }

    /// Point the logo at `url`. The first call records the logo's own `src`
    /// so it can be put back later. Returns false if there is no logo.
    pub fn set_logo_src(&self, url: &str) -> bool {
        let Some(logo) = self.logo() else {
            return false;
        };

        let fallback_attribute = self.markup.fallback_src_attribute.as_str();
        if !logo.has_attr(fallback_attribute) {
            let original = logo.attr("src").map(|s| s.to_string()).unwrap_or_default();
            logo.set_attr(fallback_attribute, &original);
        }
        logo.set_attr("src", url);
        true
    }

    /// Put back the `src` the logo had before it was first hydrated.
    pub fn restore_logo_src(&self) {
        let Some(logo) = self.logo() else {
            return;
        };

        match logo.attr(&self.markup.fallback_src_attribute) {
            Some(src) if !src.is_empty() => logo.set_attr("src", &src),
            Some(_) => logo.remove_attr("src"),
            None => {}
        }
    }

    pub fn has_icon(&self) -> bool {
        self.element
            .attr("class")
            .is_some_and(|classes| {
                classes
                    .split_ascii_whitespace()
                    .any(|c| c == self.markup.has_icon_class)
            })
    }

    /// Add the has-icon class. Returns false if it was already set.
    pub fn mark_has_icon(&self) -> bool {
        if self.has_icon() {
            return false;
        }

        let class = match self.element.attr("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), self.markup.has_icon_class)
            }
            _ => self.markup.has_icon_class.clone(),
        };
        self.element.set_attr("class", &class);
        true
    }
}
