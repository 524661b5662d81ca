use serde::Deserialize;

/// A single hit from the global free-text query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub user: QueryUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryUser {
    #[serde(default)]
    pub cftools_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default)]
    pub status: bool,
}
