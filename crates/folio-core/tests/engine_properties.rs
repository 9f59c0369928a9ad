use folio_core::{
    extract_category, filter, paginate, related, similarity, Catalog, Category, CategoryFilter,
    FilterCriteria, ProjectRecord, QueryOptions,
};

const FIXTURE: &str = include_str!("fixtures/projects.json");

fn catalog() -> Catalog {
    Catalog::from_json(FIXTURE).expect("fixture parses")
}

fn slugs(records: &[&ProjectRecord]) -> Vec<String> {
    records.iter().map(|r| r.slug.clone()).collect()
}

#[test]
fn test_fixture_loads_with_graceful_defaults() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 10);

    // "tags": null in the document
    let quiet = catalog.get("quiet-hours").unwrap();
    assert!(quiet.tags.is_empty());
    assert_eq!(quiet.id, "8");
}

#[test]
fn test_default_criteria_return_collection_unchanged() {
    let catalog = catalog();
    let result = filter(catalog.records(), &FilterCriteria::default());

    assert_eq!(result.len(), catalog.len());
    for (kept, original) in result.iter().zip(catalog.records()) {
        assert_eq!(*kept, original);
    }
}

#[test]
fn test_tags_match_any_not_all() {
    let records = vec![
        ProjectRecord::new("bz", "BZ").with_tags(["b", "z"]),
        ProjectRecord::new("xy", "XY").with_tags(["x", "y"]),
    ];
    let criteria = FilterCriteria::default().with_tags(["a", "b"]);

    assert_eq!(slugs(&filter(&records, &criteria)), vec!["bz"]);
}

#[test]
fn test_category_is_deterministic_and_title_independent() {
    let first = extract_category(&["web", "ux"], "");
    for title in ["", "Poster Series", "Brand Book", "Motion Reel"] {
        assert_eq!(extract_category(&["web", "ux"], title), first);
    }
    assert_eq!(first, Category::WebDesign);
    assert_eq!(first.as_str(), "web-design");
}

#[test]
fn test_pagination_boundaries() {
    let items: Vec<usize> = (0..10).collect();

    let page1 = paginate(&items, 1, 9);
    let page2 = paginate(&items, 2, 9);
    let page3 = paginate(&items, 3, 9);

    assert_eq!(page1.page_count, 2);
    assert_eq!(page1.items.len(), 9);
    assert_eq!(page2.items.len(), 1);
    assert!(page3.items.is_empty());
}

#[test]
fn test_zero_overlap_never_related() {
    let catalog = catalog();

    for record in catalog.records() {
        for other in related(record, catalog.records(), usize::MAX) {
            assert!(similarity(record, other.record) > 0.0);
            assert_ne!(other.record.slug, record.slug);
        }
    }

    // the untagged record relates to nothing, and nothing relates to it
    assert!(catalog.related("quiet-hours", 10).unwrap().is_empty());
    let lumen = catalog.related("lumen-identity", 10).unwrap();
    assert!(lumen.iter().all(|r| r.record.slug != "quiet-hours"));
}

#[test]
fn test_empty_collection_is_one_page() {
    let empty: Vec<ProjectRecord> = Vec::new();
    let page = paginate(&empty, 1, 9);

    assert!(page.items.is_empty());
    assert_eq!(page.page_count, 1);
}

#[test]
fn test_search_is_case_insensitive() {
    let catalog = catalog();
    let criteria = FilterCriteria::default().with_search("WEB");

    // title match plus exact tag matches
    assert_eq!(
        slugs(&catalog.filter(&criteria)),
        vec!["northwind-website", "lumen-website"]
    );
}

#[test]
fn test_url_round_trip_drives_the_same_result() {
    let catalog = catalog();
    let criteria = FilterCriteria::from_query_string("?category=print&client=Atlas,Harbour%20Festival");

    let result = catalog.query(&criteria, &QueryOptions::default());
    assert_eq!(
        slugs(&result.items),
        vec!["harbour-festival-posters", "atlas-annual-report"]
    );

    let again = FilterCriteria::from_query_string(&criteria.to_query_string());
    assert_eq!(again, criteria);
}

#[test]
fn test_category_tabs_for_fixture() {
    let catalog = catalog();
    let counts = catalog.category_counts();

    assert_eq!(
        counts,
        vec![
            ("web-design".to_string(), 4),
            ("branding".to_string(), 1),
            ("motion".to_string(), 1),
            ("illustration".to_string(), 1),
            ("print".to_string(), 2),
            ("general".to_string(), 1),
        ]
    );

    let web = FilterCriteria::default().with_category(CategoryFilter::from(Category::WebDesign));
    assert_eq!(catalog.filter(&web).len(), 4);
}

#[test]
fn test_unknown_values_give_empty_results() {
    let catalog = catalog();

    for query in ["category=sculpture", "tags=nonexistent", "client=Nobody"] {
        let criteria = FilterCriteria::from_query_string(query);
        let result = catalog.query(&criteria, &QueryOptions::default());
        assert!(result.is_empty(), "{}", query);
        assert_eq!(result.page_count, 1);
    }
}
