//! Integration tests for the mailstore command handlers against an in-memory store.

use std::io::Write;

use mail_cli::{run, Commands};
use mail_storage::{MessageStore, RowId, SqliteMessageStore, StoreConfig};

async fn memory_store() -> SqliteMessageStore {
    SqliteMessageStore::new(&StoreConfig::in_memory())
        .await
        .expect("Failed to create store")
}

async fn exec(store: &SqliteMessageStore, command: Commands) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(store, command, &mut out).await?;
    Ok(String::from_utf8(out).expect("output is utf-8"))
}

fn raw_message_file(subject: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Subject: {subject}\r\nFrom: sender@example.com\r\n\r\nHello there\r\n").unwrap();
    file
}

fn store_command(to: &str, file: &tempfile::NamedTempFile) -> Commands {
    Commands::Store {
        from: "sender@example.com".to_string(),
        to: vec![to.to_string()],
        helo: "localhost".to_string(),
        hostname: "test.local".to_string(),
        file: file.path().to_path_buf(),
    }
}

#[tokio::test]
async fn test_store_then_show_by_id_and_row() {
    let store = memory_store().await;
    let file = raw_message_file("Greetings");

    let output = exec(&store, store_command("rcpt@example.com", &file)).await.unwrap();
    let mut parts = output.split_whitespace();
    let row: RowId = parts.next().unwrap().parse().unwrap();
    let id = parts.next().unwrap().to_string();
    assert!(id.ends_with("@test.local"));

    let shown = exec(&store, Commands::Show { id: id.clone() }).await.unwrap();
    let by_id: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(by_id["ID"], id.as_str());
    assert_eq!(by_id["Content"]["Headers"]["Subject"][0], "Greetings");

    let shown_row = exec(&store, Commands::ShowRow { row }).await.unwrap();
    assert_eq!(shown_row, shown);
}

#[tokio::test]
async fn test_count_list_and_delete() {
    let store = memory_store().await;
    let file = raw_message_file("Counted");
    for _ in 0..3 {
        exec(&store, store_command("rcpt@example.com", &file)).await.unwrap();
    }

    assert_eq!(exec(&store, Commands::Count).await.unwrap().trim(), "3");

    let table = exec(
        &store,
        Commands::List {
            offset: 0,
            limit: 10,
            json: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(table.lines().filter(|l| l.contains("Counted")).count(), 3);

    let listed = exec(
        &store,
        Commands::List {
            offset: 1,
            limit: 10,
            json: true,
        },
    )
    .await
    .unwrap();
    let listed: Vec<serde_json::Value> = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed.len(), 2);

    let first_id = listed[0]["ID"].as_str().unwrap().to_string();
    exec(&store, Commands::Delete { id: first_id }).await.unwrap();
    assert_eq!(store.count().await, 2);

    assert!(exec(&store, Commands::DeleteAll { yes: false }).await.is_err());
    assert_eq!(store.count().await, 2);

    exec(&store, Commands::DeleteAll { yes: true }).await.unwrap();
    assert_eq!(store.count().await, 0);
    assert_eq!(
        exec(
            &store,
            Commands::List {
                offset: 0,
                limit: 10,
                json: false
            }
        )
        .await
        .unwrap()
        .trim(),
        "No messages."
    );
}

#[tokio::test]
async fn test_summary_truncates_non_ascii_subject() {
    let store = memory_store().await;
    let subject = "é".repeat(100);
    let file = raw_message_file(&subject);
    exec(&store, store_command("rcpt@example.com", &file)).await.unwrap();

    let table = exec(
        &store,
        Commands::List {
            offset: 0,
            limit: 10,
            json: false,
        },
    )
    .await
    .unwrap();
    let row = table.lines().find(|l| l.contains('é')).unwrap();
    assert!(row.ends_with(&"é".repeat(60)));
    assert!(!row.contains(&"é".repeat(61)));
}

#[tokio::test]
async fn test_search_prints_page_and_total() {
    let store = memory_store().await;
    let file = raw_message_file("Searchable");
    exec(&store, store_command("alice@example.com", &file)).await.unwrap();
    exec(&store, store_command("bob@example.com", &file)).await.unwrap();
    exec(&store, store_command("alice@example.org", &file)).await.unwrap();

    let output = exec(
        &store,
        Commands::Search {
            kind: "to".to_string(),
            query: "alice".to_string(),
            offset: 0,
            limit: 1,
        },
    )
    .await
    .unwrap();
    let result: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(result["kind"], "recipient");
    assert_eq!(result["total"], 2);
    assert_eq!(result["count"], 1);
    assert_eq!(result["messages"][0]["Raw"]["To"][0], "alice@example.com");
}

#[tokio::test]
async fn test_show_missing_message_fails() {
    let store = memory_store().await;
    let err = exec(
        &store,
        Commands::Show {
            id: "missing".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_store_rejects_invalid_recipient() {
    let store = memory_store().await;
    let file = raw_message_file("Bad");

    assert!(exec(&store, store_command("not-an-address", &file)).await.is_err());
    assert_eq!(store.count().await, 0);
}
