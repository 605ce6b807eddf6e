use serde::{Deserialize, Serialize};

use threadnav_core::models::NavSection;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNavigatorRequest {
    pub chat_id: String,
    #[serde(default)]
    pub chat_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub assistant_message_id: String,
    #[serde(default)]
    pub user_message_id: String,
    pub assistant_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutlineRequest {
    pub assistant_message: String,
    pub assistant_message_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutlineResponse {
    pub entry_label: String,
    pub sections: Vec<NavSection>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
