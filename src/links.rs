//! Canonical resource paths, used for `Location` headers.

use regex::Regex;
use std::sync::LazyLock;

/// Unreserved URL characters only; anything else cannot be a path segment as-is.
static MONIKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("moniker pattern is a valid regex"));

/// Whether `moniker` can be used as a path segment in generated links.
pub fn is_linkable(moniker: &str) -> bool {
    MONIKER_PATTERN.is_match(moniker)
}

/// Named routes the generator knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Camp { moniker: &'a str },
    Talks { moniker: &'a str },
    Talk { moniker: &'a str, talk_id: i32 },
}

#[derive(Clone, Debug, Default)]
pub struct LinkGenerator {
    base_path: String,
}

impl LinkGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every generated path, e.g. when mounted behind a proxy at `/v1`.
    pub fn with_base_path(base_path: &str) -> Self {
        LinkGenerator {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    /// Returns `None` when the route values cannot form a valid path segment.
    pub fn path_for(&self, route: Route<'_>) -> Option<String> {
        match route {
            Route::Camp { moniker } => {
                let m = segment(moniker)?;
                Some(format!("{}/api/camps/{}", self.base_path, m))
            }
            Route::Talks { moniker } => {
                let m = segment(moniker)?;
                Some(format!("{}/api/camps/{}/talks", self.base_path, m))
            }
            Route::Talk { moniker, talk_id } => {
                let talks = self.path_for(Route::Talks { moniker })?;
                Some(format!("{}/{}", talks, talk_id))
            }
        }
    }
}

fn segment(value: &str) -> Option<&str> {
    is_linkable(value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camp_path() {
        let links = LinkGenerator::new();
        assert_eq!(
            links.path_for(Route::Camp { moniker: "NEW1" }).as_deref(),
            Some("/api/camps/NEW1")
        );
    }

    #[test]
    fn talk_path_with_base() {
        let links = LinkGenerator::with_base_path("/v1/");
        assert_eq!(
            links.path_for(Route::Talk { moniker: "ATL2018", talk_id: 4 }).as_deref(),
            Some("/v1/api/camps/ATL2018/talks/4")
        );
        assert_eq!(
            links.path_for(Route::Talks { moniker: "ATL2018" }).as_deref(),
            Some("/v1/api/camps/ATL2018/talks")
        );
    }

    #[test]
    fn linkable_monikers() {
        for m in ["ATL2018", "code-camp.2024", "a_b~c"] {
            assert!(is_linkable(m), "{m}");
        }
    }

    #[test]
    fn unusable_monikers() {
        let links = LinkGenerator::new();
        for m in ["", "  ", "a/b", "what?", "sp ace"] {
            assert!(links.path_for(Route::Camp { moniker: m }).is_none(), "{m}");
        }
    }
}
