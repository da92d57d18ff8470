use almanac_common::{AlmanacError, Result};
use almanac_config::SelectorConfig;
use scraper::{ElementRef, Selector};

/// Compiled CSS selectors for one calendar site.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub card: Selector,
    pub title: Selector,
    pub date: Selector,
    pub time: Selector,
    pub description: Selector,
}

impl SiteSelectors {
    /// Compile every configured selector, failing on the first invalid one.
    pub fn compile(cfg: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            card: compile_one("card", &cfg.card)?,
            title: compile_one("title", &cfg.title)?,
            date: compile_one("date", &cfg.date)?,
            time: compile_one("time", &cfg.time)?,
            description: compile_one("description", &cfg.description)?,
        })
    }
}

impl Default for SiteSelectors {
    fn default() -> Self {
        // defaults are static and known to parse
        Self::compile(&SelectorConfig::default()).expect("default selectors compile")
    }
}

fn compile_one(name: &'static str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AlmanacError::Selector {
        name,
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated text of every match under `scope`, trimmed.
pub(crate) fn text_of(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}
