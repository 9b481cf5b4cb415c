use iconfetch::bundle::*;
use iconfetch::errors::IconError;
use iconfetch::fetcher::LinkFetcher;
use iconfetch::reference::CharmRef;

const BUNDLE: &str = r#"{
    "series": "trusty",
    "services": {
        "wordpress": {
            "charm": "cs:trusty/wordpress-5",
            "num_units": 2,
            "annotations": {"gui-x": "100", "gui-y": "200"}
        },
        "blog": {"charm": "cs:trusty/wordpress-5", "num_units": 1},
        "mysql": {"charm": "cs:trusty/mysql-1", "options": {"flavor": "percona"}}
    },
    "relations": [["wordpress:db", "mysql:server"]]
}"#;

#[test]
fn test_parse_bundle_json() {
    let bundle = BundleData::from_json(BUNDLE).unwrap();
    assert_eq!(bundle.series.as_deref(), Some("trusty"));
    assert_eq!(bundle.services.len(), 3);
    let wordpress = &bundle.services["wordpress"];
    assert_eq!(wordpress.num_units, 2);
    assert_eq!(wordpress.annotations["gui-x"], "100");
    assert_eq!(bundle.services["mysql"].num_units, 0);
}

#[test]
fn test_charm_refs_in_service_order() {
    let bundle = BundleData::from_json(BUNDLE).unwrap();
    assert_eq!(
        bundle.charm_refs(),
        vec!["cs:trusty/wordpress-5", "cs:trusty/mysql-1", "cs:trusty/wordpress-5"]
    );
}

#[test]
fn test_invalid_bundle_json() {
    let err = BundleData::from_json("{\"services\": [").unwrap_err();
    assert!(matches!(err, IconError::Json(_)));
}

#[test]
fn test_fetch_bundle_icons_dedups_services() {
    let bundle = BundleData::from_json(BUNDLE).unwrap();
    let fetcher =
        LinkFetcher::new(|charm: &CharmRef| format!("https://example.com/{}.svg", charm.path()));

    let icons = fetch_bundle_icons(&fetcher, &bundle).unwrap();

    assert_eq!(icons.len(), 2);
    assert!(icons.contains_key("trusty/wordpress-5"));
    assert!(icons.contains_key("trusty/mysql-1"));
}

#[test]
fn test_empty_bundle_has_no_icons() {
    let bundle = BundleData::default();
    let fetcher = LinkFetcher::new(|charm: &CharmRef| charm.path());
    assert!(fetch_bundle_icons(&fetcher, &bundle).unwrap().is_empty());
}
