use std::{sync::Arc, time::Duration};

use recipe_keeper::{
    db::Store,
    error::StoreClientError,
    recipe::{Ingredient, RecipeRecord},
    server::{router, SAVED_RECIPES_PATH, SAVE_RECIPE_PATH},
    store_client::StoreClient,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_store() -> String {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(store)).await.unwrap();
    });
    format!("http://{address}")
}

fn omelette() -> RecipeRecord {
    RecipeRecord {
        name: "Cheese Omelette".to_string(),
        category: Some("Breakfast".to_string()),
        ingredients: vec![
            Ingredient {
                measure: "2".to_string(),
                ingredient: "Eggs".to_string(),
            },
            Ingredient {
                measure: "50g".to_string(),
                ingredient: "Cheddar".to_string(),
            },
        ],
        ..Default::default()
    }
}

async fn spawn_store_with_dropped_table(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("recipeApp.sqlite3");
    let store = Arc::new(Store::open(&path).unwrap());
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute("DROP TABLE saved_recipes", ())
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(store)).await.unwrap();
    });
    format!("http://{address}")
}

#[tokio::test]
async fn test_save_returns_created() {
    let base = spawn_store().await;
    let response = reqwest::Client::new()
        .post(format!("{base}{SAVE_RECIPE_PATH}"))
        .json(&omelette())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Recipe saved successfully");
}

#[tokio::test]
async fn test_empty_collection_lists_as_empty_array() {
    let base = spawn_store().await;
    let response = reqwest::get(format!("{base}{SAVED_RECIPES_PATH}"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_non_object_payload_is_rejected() {
    let base = spawn_store().await;
    let client = reqwest::Client::new();

    for body in ["[1, 2]", "{not json"] {
        let response = client
            .post(format!("{base}{SAVE_RECIPE_PATH}"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Malformed payload");
    }

    let listed: Value = reqwest::get(format!("{base}{SAVED_RECIPES_PATH}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_documents_are_stored_verbatim() {
    let base = spawn_store().await;
    let document = json!({ "strMeal": "Legacy Stew", "strIngredient1": "Beef", "extra": [1, 2] });
    reqwest::Client::new()
        .post(format!("{base}{SAVE_RECIPE_PATH}"))
        .json(&document)
        .send()
        .await
        .unwrap();

    let listed: Value = reqwest::get(format!("{base}{SAVED_RECIPES_PATH}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([document]));
}

#[tokio::test]
async fn test_client_save_then_list_reads_back_the_record() {
    let base = spawn_store().await;
    let client = StoreClient::new(base, Duration::from_secs(5)).unwrap();

    client.save_recipe(&omelette()).await.unwrap();

    assert_eq!(client.list_saved().await.unwrap(), vec![omelette()]);
}

#[tokio::test]
async fn test_saving_twice_keeps_both_entries() {
    let base = spawn_store().await;
    let client = StoreClient::new(base, Duration::from_secs(5)).unwrap();

    client.save_recipe(&omelette()).await.unwrap();
    client.save_recipe(&omelette()).await.unwrap();

    assert_eq!(client.list_saved().await.unwrap(), vec![omelette(), omelette()]);
}

#[tokio::test]
async fn test_client_reads_legacy_documents_and_skips_unreadable_ones() {
    let base = spawn_store().await;
    let http = reqwest::Client::new();
    for document in [
        json!({ "strMeal": "Legacy Stew", "strIngredient1": "Beef", "strMeasure1": "1kg" }),
        json!({ "name": 7 }),
    ] {
        http.post(format!("{base}{SAVE_RECIPE_PATH}"))
            .json(&document)
            .send()
            .await
            .unwrap();
    }

    let client = StoreClient::new(base, Duration::from_secs(5)).unwrap();
    let saved = client.list_saved().await.unwrap();

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Legacy Stew");
    assert_eq!(
        saved[0].ingredients,
        vec![Ingredient {
            measure: "1kg".to_string(),
            ingredient: "Beef".to_string()
        }]
    );
}

#[tokio::test]
async fn test_unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = StoreClient::new(format!("http://{address}"), Duration::from_secs(1)).unwrap();
    assert!(matches!(
        client.list_saved().await,
        Err(StoreClientError::Transport(_))
    ));
}

#[tokio::test]
async fn test_persistence_failure_returns_server_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let base = spawn_store_with_dropped_table(&dir).await;
    let http = reqwest::Client::new();

    let saved = http
        .post(format!("{base}{SAVE_RECIPE_PATH}"))
        .json(&omelette())
        .send()
        .await
        .unwrap();
    assert_eq!(saved.status(), 500);
    let body: Value = saved.json().await.unwrap();
    assert_eq!(body["message"], "Internal server error");

    let listed = http
        .get(format!("{base}{SAVED_RECIPES_PATH}"))
        .send()
        .await
        .unwrap();
    assert_eq!(listed.status(), 500);
}

#[tokio::test]
async fn test_client_reports_server_error_status() {
    let dir = tempfile::TempDir::new().unwrap();
    let base = spawn_store_with_dropped_table(&dir).await;
    let client = StoreClient::new(base, Duration::from_secs(5)).unwrap();

    match client.save_recipe(&omelette()).await {
        Err(StoreClientError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal server error");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}
