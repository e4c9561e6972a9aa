//! Symbol references
//!
//! A symbol reference addresses one export of a lazily loaded module:
//! `<module-url>#<export-name>`. The fragment may carry trailing markers
//! after the name (`#onClick?`, `#onClick[0]`, `#onClick|capture`); only the
//! part before the first marker names the export. An absent or empty name
//! selects the default export.

use crate::module::DEFAULT_EXPORT;
use std::fmt;
use url::Url;

/// Characters that end the export name inside a fragment
const EXPORT_NAME_TERMINATORS: [char; 3] = ['?', '[', '|'];

/// Absolute symbol reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    url: Url,
}

impl SymbolRef {
    /// Wrap an absolute URL
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Full reference, fragment included
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// URL of the owning module (fragment removed); the import key
    pub fn module_url(&self) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url
    }

    /// Export named by the fragment, `None` for the default export
    pub fn export_name(&self) -> Option<&str> {
        let fragment = self.url.fragment()?;
        let name = match fragment.find(EXPORT_NAME_TERMINATORS) {
            Some(end) => &fragment[..end],
            None => fragment,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Export to look up, with the default spelled out
    pub fn export_or_default(&self) -> &str {
        self.export_name().unwrap_or(DEFAULT_EXPORT)
    }
}

impl From<Url> for SymbolRef {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(s: &str) -> SymbolRef {
        SymbolRef::new(Url::parse(s).unwrap())
    }

    #[test]
    fn test_named_export() {
        let s = symbol("http://qwik.dev/event.js#someExport");
        assert_eq!(s.export_name(), Some("someExport"));
        assert_eq!(s.module_url().as_str(), "http://qwik.dev/event.js");
    }

    #[test]
    fn test_named_export_with_marker() {
        assert_eq!(
            symbol("http://qwik.dev/event.js#someExport?").export_name(),
            Some("someExport")
        );
        assert_eq!(
            symbol("http://qwik.dev/event.js#someExport[0 1]").export_name(),
            Some("someExport")
        );
        assert_eq!(
            symbol("http://qwik.dev/event.js#someExport|x").export_name(),
            Some("someExport")
        );
    }

    #[test]
    fn test_default_export_forms() {
        for s in [
            "http://qwik.dev/event.js",
            "http://qwik.dev/event.js#",
            "http://qwik.dev/event.js#?",
            "http://qwik.dev/event.js?",
        ] {
            let s = symbol(s);
            assert_eq!(s.export_name(), None, "{}", s);
            assert_eq!(s.export_or_default(), "default");
        }
    }

    #[test]
    fn test_module_url_keeps_query() {
        let s = symbol("http://qwik.dev/event.js?v=2#handler");
        assert_eq!(s.module_url().as_str(), "http://qwik.dev/event.js?v=2");
    }

    #[test]
    fn test_display_is_full_reference() {
        let s = symbol("http://qwik.dev/event.js#someExport");
        assert_eq!(s.to_string(), "http://qwik.dev/event.js#someExport");
    }
}
