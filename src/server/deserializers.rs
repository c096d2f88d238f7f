use serde::{Deserialize, Deserializer};

use crate::selection::Page;

// `?page=` behaves like a lenient form field: anything that is not an
// integer means the first page.
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<Page, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPage {
        Number(i64),
        Text(String),
    }

    let page = match RawPage::deserialize(deserializer)? {
        RawPage::Number(number) => Page::new(number),
        RawPage::Text(text) => text.trim().parse().map(Page::new).unwrap_or_default(),
    };
    Ok(page)
}
