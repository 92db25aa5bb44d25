/// Slugs with a static course-description page. Anything else under
/// /course/ is a 404.
pub const COURSE_PAGES: [&str; 11] = [
    "catering-hotel-management",
    "nursing-health-care",
    "dhm",
    "dgda",
    "dxrt",
    "dmlta",
    "dna",
    "dhmct",
    "dpsm",
    "dct",
    "difp",
];

/// Map an allow-listed slug to its view name (hyphens become underscores);
/// unknown slugs get nothing.
pub fn view_for_slug(slug: &str) -> Option<String> {
    COURSE_PAGES
        .contains(&slug)
        .then(|| slug.replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_slugs_map_to_view_names() {
        assert_eq!(
            view_for_slug("catering-hotel-management").as_deref(),
            Some("catering_hotel_management")
        );
        assert_eq!(view_for_slug("dhm").as_deref(), Some("dhm"));
    }

    #[test]
    fn every_listed_slug_resolves() {
        for slug in COURSE_PAGES {
            assert!(view_for_slug(slug).is_some(), "missing page for {slug}");
        }
    }

    #[test]
    fn unknown_slugs_do_not_resolve() {
        assert_eq!(view_for_slug("unknown-slug"), None);
        assert_eq!(view_for_slug(""), None);
        assert_eq!(view_for_slug("dhm2"), None);
    }
}
