//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → history client → paginated
//! requests → merged, ordered records

use clap::Parser;
use hoyo_history::cli::{Cli, Commands, OutputFormat};
use hoyo_history::config::{ClientConfig, HttpConfig};
use hoyo_history::history::{merged_transactions, merged_wish_history, HistoryClient};
use hoyo_history::models::{BannerType, TransactionKind, Wish, TIME_FORMAT};
use hoyo_history::pagination::{Cursor, PAGE_SIZE};
use hoyo_history::Error;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Mock History Service
// ============================================================================

/// Items per banner; the weapon banner has no history
const BANNERS: [(i32, usize); 4] = [(100, 5), (200, 45), (301, 30), (302, 0)];

fn wish_time(index: usize, banner_slot: usize) -> NaiveDateTime {
    let minutes = 10_000 - (index * 4 + banner_slot) as i64;
    NaiveDate::from_ymd_opt(2022, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + TimeDelta::minutes(minutes)
}

fn wish_id(gacha_type: i32, count: usize, index: usize) -> i64 {
    i64::from(gacha_type) * 10_000 + (count - index) as i64
}

fn envelope(list: Vec<Value>) -> Value {
    json!({
        "retcode": 0,
        "message": "OK",
        "data": {"page": "0", "size": "20", "total": "0", "list": list, "region": "os_usa"}
    })
}

async fn mount_banner_names(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/gacha/getConfigList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retcode": 0,
            "message": "OK",
            "data": {"gacha_type_list": [
                {"id": "1", "key": "100", "name": "Novice Wishes"},
                {"id": "2", "key": "200", "name": "Permanent Wish"},
                {"id": "3", "key": "301", "name": "Character Event Wish"},
                {"id": "4", "key": "302", "name": "Weapon Event Wish"}
            ]}
        })))
        .mount(server)
        .await;
}

/// Mount every page of every banner, keyed by `gacha_type` and `end_id`
async fn mount_wish_history(server: &MockServer) {
    mount_banner_names(server).await;

    for (slot, (gacha_type, count)) in BANNERS.into_iter().enumerate() {
        let records: Vec<(i64, Value)> = (0..count)
            .map(|i| {
                let id = wish_id(gacha_type, count, i);
                let record = json!({
                    "uid": "700000000",
                    "gacha_type": gacha_type.to_string(),
                    "item_id": "",
                    "count": "1",
                    "time": wish_time(i, slot).format(TIME_FORMAT).to_string(),
                    "name": format!("Item {id}"),
                    "lang": "en-us",
                    "item_type": "Weapon",
                    "rank_type": "3",
                    "id": id.to_string()
                });
                (id, record)
            })
            .collect();

        let mut end_id = 0;
        let mut pages = records.chunks(PAGE_SIZE).peekable();
        if pages.peek().is_none() {
            mount_page(server, gacha_type, 0, vec![]).await;
        }
        for page in pages {
            let list = page.iter().map(|(_, record)| record.clone()).collect();
            mount_page(server, gacha_type, end_id, list).await;
            end_id = page.last().map_or(0, |(id, _)| *id);
        }
        // A source whose size is a multiple of the page size ends on an empty page
        if count > 0 && count % PAGE_SIZE == 0 {
            mount_page(server, gacha_type, end_id, vec![]).await;
        }
    }
}

async fn mount_page(server: &MockServer, gacha_type: i32, end_id: i64, list: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/gacha/getGachaLog"))
        .and(query_param("gacha_type", gacha_type.to_string()))
        .and(query_param("end_id", end_id.to_string()))
        .and(query_param("authkey", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(list)))
        .mount(server)
        .await;
}

async fn history_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/gacha/getGachaLog")
        .count()
}

fn client_for(server: &MockServer) -> Arc<HistoryClient> {
    let config = ClientConfig {
        authkey: Some("integration-key".to_string()),
        gacha_base_url: format!("{}/gacha/", server.uri()),
        transaction_base_url: format!("{}/ysulog/", server.uri()),
        transaction_reasons_url: Some(format!("{}/reasons.json", server.uri())),
        http: HttpConfig {
            max_retries: 0,
            rate_limit: None,
            ..HttpConfig::default()
        },
        ..ClientConfig::default()
    };
    Arc::new(HistoryClient::new(config).unwrap())
}

fn ids(wishes: &[Wish]) -> Vec<i64> {
    wishes.iter().map(|w| w.id).collect()
}

// ============================================================================
// Merged Wish History Tests
// ============================================================================

#[tokio::test]
async fn test_merged_wish_history_lazy_matches_eager() {
    let server = MockServer::start().await;
    mount_wish_history(&server).await;
    let client = client_for(&server);

    let lazy = merged_wish_history(Arc::clone(&client), None, 0)
        .flatten(true)
        .await
        .unwrap();
    let eager = merged_wish_history(client, None, 0)
        .flatten(false)
        .await
        .unwrap();

    assert_eq!(lazy.len(), 80);
    assert_eq!(ids(&lazy), ids(&eager));
    assert!(lazy.windows(2).all(|w| w[0].time > w[1].time));
    assert_eq!(lazy[0].banner_name, "Novice Wishes");
    assert_eq!(lazy[1].banner_name, "Permanent Wish");
    assert_eq!(lazy[2].banner_name, "Character Event Wish");
}

#[tokio::test]
async fn test_merged_wish_history_lazy_limit_fetches_first_pages_only() {
    let server = MockServer::start().await;
    mount_wish_history(&server).await;
    let client = client_for(&server);

    let mut history = merged_wish_history(client, Some(30), 0);
    let wishes = history.flatten(true).await.unwrap();

    assert_eq!(wishes.len(), 30);
    // One page per banner; the two long banners never reach their second page
    assert_eq!(history_requests(&server).await, 4);
    assert!(matches!(history.paginators()[1].cursor(), Cursor::After(_)));
    assert!(history.paginators()[3].is_exhausted());
}

#[tokio::test]
async fn test_merged_wish_history_eager_limit() {
    let server = MockServer::start().await;
    mount_wish_history(&server).await;
    let client = client_for(&server);

    let full = merged_wish_history(Arc::clone(&client), None, 0)
        .flatten(false)
        .await
        .unwrap();
    let server_calls = history_requests(&server).await;

    let limited = merged_wish_history(client, Some(30), 0)
        .flatten(false)
        .await
        .unwrap();

    assert_eq!(ids(&limited), ids(&full[..30]));
    // Each banner drains up to the limit: 1 + 2 + 2 + 1 pages
    assert_eq!(history_requests(&server).await - server_calls, 6);
}

#[tokio::test]
async fn test_merged_wish_history_zero_limit() {
    let server = MockServer::start().await;
    mount_wish_history(&server).await;

    let wishes = merged_wish_history(client_for(&server), Some(0), 0)
        .flatten(true)
        .await
        .unwrap();

    assert!(wishes.is_empty());
    assert_eq!(history_requests(&server).await, 0);
}

#[tokio::test]
async fn test_expired_authkey_surfaces_api_error() {
    let server = MockServer::start().await;
    mount_banner_names(&server).await;
    Mock::given(method("GET"))
        .and(path("/gacha/getGachaLog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retcode": -101,
            "message": "authkey timeout",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = merged_wish_history(client_for(&server), None, 0)
        .flatten(true)
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
}

// ============================================================================
// Merged Transaction Tests
// ============================================================================

#[tokio::test]
async fn test_merged_transactions_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reasons.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"1011": "Wish", "1012": "Starglitter Exchange"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let logs = [
        ("getPrimogemLog", json!([
            {"id": "11", "uid": "7", "time": "2022-03-01 12:00:00", "add_num": "-160", "reason": "1011"},
            {"id": "10", "uid": "7", "time": "2022-03-01 09:00:00", "add_num": "60", "reason": "1099"}
        ])),
        ("getCrystalLog", json!([
            {"id": "20", "uid": "7", "time": "2022-03-01 11:00:00", "add_num": "300", "reason": "1012"}
        ])),
        ("getResinLog", json!([])),
        ("getArtifactLog", json!([
            {"id": "30", "uid": "7", "time": "2022-03-01 10:00:00", "add_num": "1",
             "reason": "1011", "name": "Wanderer's Troupe", "rank": "4"}
        ])),
        ("getWeaponLog", json!([])),
    ];
    for (endpoint, list) in logs {
        Mock::given(method("GET"))
            .and(path(format!("/ysulog/{endpoint}")))
            .and(query_param("end_id", "0"))
            .and(query_param("size", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "retcode": 0,
                "message": "OK",
                "data": {"list": list}
            })))
            .mount(&server)
            .await;
    }

    let records = merged_transactions(client_for(&server), None, 0)
        .flatten(false)
        .await
        .unwrap();

    let summary: Vec<(i64, TransactionKind, String)> = records
        .iter()
        .map(|r| {
            let t = r.transaction();
            (t.id, t.kind, t.reason.clone())
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (11, TransactionKind::Primogem, "Wish".to_string()),
            (20, TransactionKind::Crystal, "Starglitter Exchange".to_string()),
            (30, TransactionKind::Artifact, "Wish".to_string()),
            (10, TransactionKind::Primogem, String::new()),
        ]
    );
}

// ============================================================================
// Config and CLI Tests
// ============================================================================

#[tokio::test]
async fn test_client_from_yaml_file() {
    let server = MockServer::start().await;
    mount_banner_names(&server).await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "authkey: integration-key\ngacha_base_url: {}/gacha/\nhttp:\n  rate_limit: null\n",
        server.uri()
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    let client = HistoryClient::new(config).unwrap();
    let names = client.banner_types().await.unwrap();
    assert_eq!(names.get(&200).map(String::as_str), Some("Permanent Wish"));
}

#[test]
fn test_client_without_authkey() {
    let err = HistoryClient::new(ClientConfig::default()).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[test]
fn test_cli_parses_wishes() {
    let cli = Cli::try_parse_from([
        "hoyo-history",
        "--format",
        "pretty",
        "wishes",
        "--banner",
        "character",
        "--limit",
        "5",
        "--lazy",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Pretty);
    match cli.command {
        Commands::Wishes {
            banner,
            limit,
            lazy,
            end_id,
        } => {
            assert_eq!(banner, Some(BannerType::Character));
            assert_eq!(limit, Some(5));
            assert!(lazy);
            assert_eq!(end_id, 0);
        }
        Commands::Transactions { .. } => panic!("Expected wishes command"),
    }
}

#[test]
fn test_cli_parses_transactions() {
    let cli = Cli::try_parse_from(["hoyo-history", "transactions", "--kind", "resin"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Json);
    assert!(matches!(
        cli.command,
        Commands::Transactions {
            kind: Some(TransactionKind::Resin),
            limit: None,
            lazy: false,
            ..
        }
    ));

    assert!(Cli::try_parse_from(["hoyo-history", "transactions", "--kind", "gold"]).is_err());
}
