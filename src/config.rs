//! Runtime configuration for the client.
//!
//! Everything the page used to receive from its host environment comes in
//! through environment variables here: the service origin, the signed-in
//! user's identifier, and the persona records that populate the composer
//! selector.

use crate::types::Persona;
use std::env;
use tracing::warn;

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    pub user_name: String,
    pub personas: Vec<Persona>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let base_url =
            env::var("FINCH_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let user_name = env::var("FINCH_USER").unwrap_or_else(|_| "guest".to_string());
        let personas = env::var("FINCH_PERSONAS")
            .map(|raw| parse_personas(&raw))
            .unwrap_or_default();
        Self {
            base_url,
            user_name,
            personas,
        }
    }
}

fn parse_personas(raw: &str) -> Vec<Persona> {
    match serde_json::from_str(raw) {
        Ok(personas) => personas,
        Err(err) => {
            warn!("ignoring unparseable FINCH_PERSONAS: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_persona_records() {
        let personas = parse_personas(r#"[{"id": 1, "name": "Tutor"}, {"id": 2, "name": "Pirate"}]"#);
        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].name, "Tutor");
        assert_eq!(personas[1].id, 2);
    }

    #[test]
    fn bad_persona_json_yields_empty_list() {
        assert!(parse_personas("not json").is_empty());
        assert!(parse_personas(r#"{"id": 1}"#).is_empty());
    }
}
