//! SteamGridDB API Data Transfer Objects
//!
//! API Reference: https://www.steamgriddb.com/api/v2

use serde::{Deserialize, Serialize};

/// `grids/steam/{appid}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GridsResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Grid>,
    /// Present when `success` is false
    #[serde(default)]
    pub errors: Vec<String>,
}

/// A single grid image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Grid {
    pub id: i64,
    pub url: String,
    pub thumb: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub style: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_grids() {
        let json = r#"{
            "success": true,
            "data": [{
                "id": 80099,
                "score": 0,
                "style": "alternate",
                "width": 600,
                "height": 900,
                "nsfw": false,
                "humor": false,
                "mime": "image/png",
                "url": "https://cdn2.steamgriddb.com/grid/abc.png",
                "thumb": "https://cdn2.steamgriddb.com/thumb/abc.jpg"
            }]
        }"#;
        let parsed: GridsResponse = serde_json::from_str(json).expect("Should parse grids");
        assert!(parsed.success);
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].height, Some(900));
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"success": false, "errors": ["Game not found"]}"#;
        let parsed: GridsResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_empty());
        assert_eq!(parsed.errors, vec!["Game not found"]);
    }
}
