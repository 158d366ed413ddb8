#![allow(dead_code)]

use std::net::SocketAddr;

use nc_news::{
    bind_listener, init_db, make_router, run_app,
    seed::{seed, SeedData},
};
use reqwest::{Client, Response};
use serde_json::Value;
use tempfile::TempDir;

/// A running server backed by its own freshly seeded SQLite file.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("nc_news.db").display());
        let pool = init_db(&db_url).await.expect("Failed to initialise database");
        seed(&pool, SeedData::Test)
            .await
            .expect("Failed to seed database");

        let listener =
            bind_listener(SocketAddr::from(([127, 0, 0, 1], 0))).expect("Failed to bind port");
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(run_app(make_router(pool), listener));

        TestApp {
            address,
            client: Client::new(),
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    /// Sends a GET and returns the status code with the decoded JSON body.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.get(path).await;
        let status = response.status().as_u16();
        (status, response.json().await.expect("body was not JSON"))
    }
}

pub async fn json_of(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    (status, response.json().await.expect("body was not JSON"))
}

/// Checks that `values` (all numbers or all strings) are in the given order.
/// Equal neighbours are allowed either way.
pub fn assert_sorted(values: &[Value], ascending: bool) {
    for pair in values.windows(2) {
        let ordering = match (&pair[0], &pair[1]) {
            (Value::Number(a), Value::Number(b)) => a.as_i64().cmp(&b.as_i64()),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            other => panic!("cannot compare {other:?}"),
        };
        if ascending {
            assert!(ordering.is_le(), "{:?} should not precede {:?}", pair[0], pair[1]);
        } else {
            assert!(ordering.is_ge(), "{:?} should not precede {:?}", pair[0], pair[1]);
        }
    }
}

pub fn column(rows: &Value, key: &str) -> Vec<Value> {
    rows.as_array()
        .expect("expected an array")
        .iter()
        .map(|row| row[key].clone())
        .collect()
}
