//! Route handlers organized by resource

pub mod auth;
pub mod health;
pub mod items;
pub mod lists;

use serde::Serialize;

/// `{"id": ..}` body returned by creates
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i32,
}

/// `{"data": [..]}` body returned by collection reads
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

/// `{"status": "success"}` body returned by updates and deletes
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}
