//! CLI integration tests for bookinv
//!
//! These drive the binary against an in-process stub catalog, checking
//! that commands load, derive and mutate the inventory end to end.

mod support;

use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use support::StubCatalog;

/// Get a command instance for the bookinv binary, isolated from user config
fn bookinv(url: &str, config_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("bookinv"));
    cmd.env_remove("BOOKINV_API_URL")
        .env_remove("RUST_LOG")
        .arg("--api-url")
        .arg(url)
        .arg("--config")
        .arg(config_dir.path().join("config.toml"));
    cmd
}

fn json_stdout(output: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_list_sorted_by_copies() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    let output = bookinv(&stub.url(), &dir)
        .args(["list", "--sort", "copies", "--format", "json"])
        .assert()
        .success();

    let json = json_stdout(&output);
    let titles: Vec<_> = json["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Emma", "Dune"]);
    assert_eq!(json["shown"], 2);
    assert_eq!(json["active_filters"], 1);
    assert_eq!(json["stats"]["total_copies"], 6);
}

#[test]
fn test_list_search_matches_author() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["list", "--search", "aus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emma"))
        .stdout(predicate::str::contains("Dune").not())
        .stdout(predicate::str::contains("1 shown, 2 active filter(s)"));
}

#[test]
fn test_list_genre_filter() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["list", "--genre", "SciFi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Emma").not());
}

#[test]
fn test_list_no_matches() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["list", "--search", "tolkien"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches"));
}

#[test]
fn test_list_empty_inventory() {
    let stub = StubCatalog::start(vec![]);
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No books yet"));
}

#[test]
fn test_stats() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    let output = bookinv(&stub.url(), &dir)
        .args(["stats", "--format", "json"])
        .assert()
        .success();

    let json = json_stdout(&output);
    assert_eq!(json["total_titles"], 2);
    assert_eq!(json["total_copies"], 6);
    assert_eq!(json["distinct_genres"], 2);
    assert_eq!(json["low_stock_count"], 1);
}

#[test]
fn test_genres_sorted() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .arg("genres")
        .assert()
        .success()
        .stdout(predicate::str::diff("Classic\nSciFi\n"));
}

#[test]
fn test_show_book() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Dune"))
        .stdout(predicate::str::contains("Year: N/A"))
        .stdout(predicate::str::contains("Low stock"));
}

#[test]
fn test_show_missing_book() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found: 42"));
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_add_book_posts_normalized_payload() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args([
            "add",
            "--title",
            "  Neuromancer ",
            "--author",
            "Gibson",
            "--year",
            "1984",
            "--quantity",
            "lots",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added book: Neuromancer"));

    let requests = stub.requests();
    let post = requests.iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(
        post.body,
        Some(json!({
            "title": "Neuromancer",
            "author": "Gibson",
            "isbn": "",
            "publishedYear": 1984,
            "genre": "",
            "quantity": 0
        }))
    );
    // Full reload after the mutation
    assert_eq!(
        stub.request_lines(),
        vec!["POST /api/books", "GET /api/books"]
    );
    assert_eq!(stub.books().len(), 3);
}

#[test]
fn test_add_without_author_never_reaches_catalog() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["add", "--title", "Orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title and author are required."));

    assert!(stub.requests().is_empty());
}

#[test]
fn test_add_uses_config_draft_defaults() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[draft]\nquantity = 3\ngenre = \"Fiction\"\n",
    )
    .unwrap();

    bookinv(&stub.url(), &dir)
        .args(["add", "--title", "Beloved", "--author", "Morrison"])
        .assert()
        .success();

    let post = stub
        .requests()
        .into_iter()
        .find(|r| r.method == "POST")
        .unwrap();
    let body = post.body.unwrap();
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["genre"], "Fiction");
}

#[test]
fn test_edit_replaces_full_record() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["edit", "1", "--quantity", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated book: 1"));

    let put = stub
        .requests()
        .into_iter()
        .find(|r| r.method == "PUT")
        .unwrap();
    assert_eq!(put.path, "/api/books/1");
    assert_eq!(
        put.body,
        Some(json!({
            "title": "Dune",
            "author": "Herbert",
            "isbn": "",
            "publishedYear": null,
            "genre": "SciFi",
            "quantity": 7
        }))
    );
    assert_eq!(
        stub.request_lines(),
        vec!["GET /api/books", "PUT /api/books/1", "GET /api/books"]
    );
}

#[test]
fn test_edit_missing_book() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["edit", "99", "--title", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found: 99"));

    assert_eq!(stub.request_lines(), vec!["GET /api/books"]);
}

#[test]
fn test_delete_requires_confirmation() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    assert!(stub.requests().is_empty());
    assert_eq!(stub.books().len(), 2);
}

#[test]
fn test_delete_book() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    let output = bookinv(&stub.url(), &dir)
        .args(["delete", "1", "--yes", "--format", "json"])
        .assert()
        .success();

    let json = json_stdout(&output);
    assert_eq!(json["deleted"], 1);
    assert_eq!(json["total_titles"], 1);
    assert_eq!(
        stub.request_lines(),
        vec!["DELETE /api/books/1", "GET /api/books"]
    );
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_server_error_on_list() {
    let stub = StubCatalog::with_sample();
    stub.fail_with(500);
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load books. (HTTP 500)"));
}

#[test]
fn test_server_error_on_delete() {
    let stub = StubCatalog::with_sample();
    stub.fail_with(503);
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["delete", "2", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to delete the book. (HTTP 503)"));
}

#[test]
fn test_delete_rejects_unsafe_id() {
    let stub = StubCatalog::with_sample();
    let dir = TempDir::new().unwrap();

    bookinv(&stub.url(), &dir)
        .args(["delete", "../1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used in a catalog URL"));

    assert!(stub.requests().is_empty());
    assert_eq!(stub.books().len(), 2);
}

#[test]
fn test_unreachable_catalog() {
    let dir = TempDir::new().unwrap();

    bookinv(&support::unreachable_url(), &dir)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not reach the catalog service"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let url = "http://127.0.0.1:1/api/books";

    bookinv(url, &dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));
    assert!(dir.path().join("config.toml").is_file());

    bookinv(url, &dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    bookinv(url, &dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(url))
        .stdout(predicate::str::contains("timeout_secs = 10"));
}

#[test]
fn test_invalid_api_url_rejected() {
    let dir = TempDir::new().unwrap();

    bookinv("ftp://example.com/books", &dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_url must start with http"));
}
