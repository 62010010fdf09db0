use product_catalog::{
    config::SiteConfig,
    routes::params::{
        AdminProductQuery, CategorySortBy, Pagination, ProductSortBy, SortOrder,
        contains_pattern, parse_ordering, search_terms,
    },
};

#[test]
fn ordering_keeps_known_fields_in_order() {
    let ordering = parse_ordering::<ProductSortBy>(Some("-price, name"));
    assert_eq!(
        ordering,
        vec![
            (ProductSortBy::Price, SortOrder::Desc),
            (ProductSortBy::Name, SortOrder::Asc),
        ]
    );
}

#[test]
fn ordering_drops_unknown_fields() {
    assert!(parse_ordering::<ProductSortBy>(Some("stock,-bogus")).is_empty());
    assert!(parse_ordering::<ProductSortBy>(None).is_empty());
    assert_eq!(
        parse_ordering::<CategorySortBy>(Some("price,-name")),
        vec![(CategorySortBy::Name, SortOrder::Desc)]
    );
}

#[test]
fn search_splits_on_whitespace_and_commas() {
    assert_eq!(
        search_terms(Some("  phone, case  red ")),
        vec!["phone", "case", "red"]
    );
    assert!(search_terms(Some(" , ")).is_empty());
    assert!(search_terms(None).is_empty());
}

#[test]
fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("phone"), "%phone%");
    assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
}

#[test]
fn pagination_is_opt_in_and_clamped() {
    assert_eq!(Pagination::default().requested(), None);

    let page = Pagination {
        page: Some(3),
        per_page: None,
    };
    assert_eq!(page.requested(), Some((3, 20, 40)));

    let clamped = Pagination {
        page: Some(0),
        per_page: Some(1000),
    };
    assert_eq!(clamped.requested(), Some((1, 100, 0)));
}

#[test]
fn huge_page_saturates_offset() {
    let far = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    };
    assert_eq!(far.requested(), Some((i64::MAX, 100, i64::MAX)));
}

#[test]
fn admin_active_filter_accepts_boolean_spellings() {
    let query = |value: Option<&str>| AdminProductQuery {
        is_active: value.map(str::to_string),
        ..Default::default()
    };
    assert_eq!(query(Some("1")).active_filter(), Some(true));
    assert_eq!(query(Some("False")).active_filter(), Some(false));
    assert_eq!(query(Some("maybe")).active_filter(), None);
    assert_eq!(query(None).active_filter(), None);
}

#[test]
fn site_defaults_match_admin_branding() {
    let site = SiteConfig::default();
    assert_eq!(site.site_header, "Custom Product Management Admin");
    assert_eq!(site.site_title, "Product Admin Portal");
    assert_eq!(site.index_title, "Welcome to Product Management");
}
