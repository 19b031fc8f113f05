//! End-to-end scrapes against a mock volby.cz

use crate::common::*;
use std::time::Duration;
use tempfile::TempDir;
use volby_scraper::config::{ColumnOrder, FailurePolicy};
use volby_scraper::crawler::scrape;
use volby_scraper::output::{to_csv_string, write_csv};
use volby_scraper::{Aggregator, ErrorKind, ScrapeError};
use wiremock::{MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scrape_two_municipalities_to_csv() {
    let server = MockServer::start().await;
    mount_alpha_beta(&server).await;

    let aggregator = Aggregator::new(test_config()).unwrap();
    let table = aggregator.run(&listing_url(&server)).await.unwrap();

    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.parties(), ["PartyA", "PartyB", "PartyC"]);
    assert!(table.skipped().is_empty());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prostejov.csv");
    write_csv(&table, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, EXPECTED_CSV);
}

#[tokio::test]
async fn test_rows_follow_listing_order() {
    let server = MockServer::start().await;
    mount_alpha_beta(&server).await;

    let table = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    let codes: Vec<&str> = table.rows().iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["500011", "500020"]);
    assert_eq!(table.rows()[0].name, "Alpha");
    assert_eq!(table.rows()[0].registered, 1000);
    assert_eq!(table.rows()[1].votes.get("PartyC"), Some(145));
}

#[tokio::test]
async fn test_alphabetical_column_order() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    // Beta's parties are seen first when Alpha is listed second
    mount_detail(&server, "500011", html_response(DETAIL_BETA), 1).await;
    mount_detail(&server, "500020", html_response(DETAIL_ALPHA), 1).await;

    let mut config = test_config();
    config.scraper.column_order = ColumnOrder::Alphabetical;

    let table = Aggregator::new(config)
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert_eq!(table.parties(), ["PartyA", "PartyB", "PartyC"]);
}

#[tokio::test]
async fn test_first_seen_column_order() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(&server, "500011", html_response(DETAIL_BETA), 1).await;
    mount_detail(&server, "500020", html_response(DETAIL_ALPHA), 1).await;

    let table = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert_eq!(table.parties(), ["PartyA", "PartyC", "PartyB"]);
}

#[tokio::test]
async fn test_detail_failure_aborts_and_keeps_existing_output() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(&server, "500011", html_response(DETAIL_ALPHA), 1).await;
    mount_detail(&server, "500020", ResponseTemplate::new(500), 1).await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prostejov.csv");
    std::fs::write(&path, "previous run").unwrap();

    let result = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await;

    let err = match result {
        Ok(_) => panic!("scrape should fail when a detail page returns 500"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert_eq!(err.exit_code(), 3);
    assert!(matches!(err, ScrapeError::HttpStatus { status: 500, .. }));

    // Nothing reached the writer
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run");
}

#[tokio::test]
async fn test_skip_policy_leaves_out_failing_municipality() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(&server, "500011", ResponseTemplate::new(503), 1).await;
    mount_detail(&server, "500020", html_response(DETAIL_BETA), 1).await;

    let mut config = test_config();
    config.scraper.failure_policy = FailurePolicy::Skip;

    let table = Aggregator::new(config)
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.rows()[0].code, "500020");
    assert_eq!(table.parties(), ["PartyA", "PartyC"]);

    assert_eq!(table.skipped().len(), 1);
    assert_eq!(table.skipped()[0].code, "500011");
    assert!(table.skipped()[0].reason.contains("503"));

    assert_eq!(
        to_csv_string(&table).unwrap(),
        "\u{feff}code,location,registered,envelopes,valid,PartyA,PartyC\n\
         500020,Beta,500,300,295,150,145\n"
    );
}

#[tokio::test]
async fn test_listing_not_found_is_fetch_error() {
    let server = MockServer::start().await;
    mount_listing(&server, ResponseTemplate::new(404)).await;

    let err = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, ScrapeError::HttpStatus { status: 404, .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_detail_page_as_listing_is_unexpected_shape() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(DETAIL_ALPHA)).await;

    let err = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .err()
        .unwrap();

    assert_eq!(err.kind(), ErrorKind::UnexpectedPageShape);
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("listing page"));
}

#[tokio::test]
async fn test_listing_without_tables_is_unexpected_shape() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        html_response("<html><body><p>Stránka nenalezena</p></body></html>"),
    )
    .await;

    let err = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .err()
        .unwrap();

    assert_eq!(err.kind(), ErrorKind::UnexpectedPageShape);
}

#[tokio::test]
async fn test_malformed_count_names_municipality_and_field() {
    let server = MockServer::start().await;
    let broken_beta = DETAIL_BETA.replace(r#"headers="sa2">500<"#, r#"headers="sa2">n/a<"#);
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(&server, "500011", html_response(DETAIL_ALPHA), 1).await;
    mount_detail(&server, "500020", html_response(&broken_beta), 1).await;

    let err = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .err()
        .unwrap();

    assert_eq!(err.kind(), ErrorKind::MalformedField);
    assert_eq!(err.exit_code(), 4);
    let message = err.to_string();
    assert!(message.contains("500020"));
    assert!(message.contains("Beta"));
    assert!(message.contains("registered"));
    assert!(message.contains("n/a"));
}

#[tokio::test]
async fn test_windows_1250_body_without_charset() {
    let server = MockServer::start().await;

    let listing = LISTING_TWO
        .replace(
            r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#,
            "",
        )
        .replace(">Alpha<", ">Šternberk<")
        .replace(">Beta<", ">Dřevohostice<");

    mount_listing(
        &server,
        ResponseTemplate::new(200).set_body_raw(windows_1250(&listing), "text/html"),
    )
    .await;
    mount_detail(&server, "500011", html_response(DETAIL_ALPHA), 1).await;
    mount_detail(&server, "500020", html_response(DETAIL_BETA), 1).await;

    let table = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert_eq!(table.rows()[0].name, "Šternberk");
    assert_eq!(table.rows()[1].name, "Dřevohostice");

    let csv = to_csv_string(&table).unwrap();
    assert!(csv.contains("500011,Šternberk,1000,800,790,400,390,0"));
}

#[tokio::test]
async fn test_meta_charset_used_when_header_has_none() {
    let server = MockServer::start().await;

    let listing = LISTING_TWO.replace(">Alpha<", ">Šternberk<");
    assert!(listing.contains("charset=utf-8"));

    mount_listing(
        &server,
        ResponseTemplate::new(200).set_body_raw(listing.into_bytes(), "text/html"),
    )
    .await;
    mount_detail(&server, "500011", html_response(DETAIL_ALPHA), 1).await;
    mount_detail(&server, "500020", html_response(DETAIL_BETA), 1).await;

    let table = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert_eq!(table.rows()[0].name, "Šternberk");
    assert_eq!(table.rows()[1].name, "Beta");
}

#[tokio::test]
async fn test_slow_detail_page_times_out() {
    let server = MockServer::start().await;
    mount_listing(&server, html_response(LISTING_TWO)).await;
    mount_detail(
        &server,
        "500011",
        html_response(DETAIL_ALPHA).set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let mut config = test_config();
    config.scraper.timeout_secs = 1;
    config.scraper.connect_timeout_secs = 1;

    let err = Aggregator::new(config)
        .unwrap()
        .run(&listing_url(&server))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, ScrapeError::Timeout { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_empty_listing_table_gives_header_only_csv() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        html_response(
            "<html><body><table><tr><th>číslo</th><th>název</th></tr></table></body></html>",
        ),
    )
    .await;

    let table = Aggregator::new(test_config())
        .unwrap()
        .run(&listing_url(&server))
        .await
        .unwrap();

    assert!(table.rows().is_empty());
    assert_eq!(
        to_csv_string(&table).unwrap(),
        "\u{feff}code,location,registered,envelopes,valid\n"
    );
}

#[tokio::test]
async fn test_scrape_entry_point_matches_aggregator() {
    let server = MockServer::start().await;
    mount_alpha_beta(&server).await;

    let table = scrape(test_config(), &listing_url(&server)).await.unwrap();

    assert_eq!(to_csv_string(&table).unwrap(), EXPECTED_CSV);
}
