// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: Uuid,
    pub captain_id: Uuid,
    pub team_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new team
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamRegistrationRequest {
    pub team_name: String,
    pub description: Option<String>,
}

impl TeamRegistrationRequest {
    /// Validate team registration request
    pub fn validate(&self) -> Result<(), String> {
        let name = self.team_name.trim();
        if name.is_empty() {
            return Err("Team name cannot be empty".to_string());
        }

        if name.len() < 2 {
            return Err("Team name must be at least 2 characters".to_string());
        }

        if name.len() > 50 {
            return Err("Team name cannot exceed 50 characters".to_string());
        }

        if !name.chars().any(|c| c.is_alphanumeric()) {
            return Err("Team name must contain at least one letter or number".to_string());
        }

        let lowercase_name = name.to_lowercase();
        let system_reserved = ["admin", "system", "null", "undefined", "root"];
        for word in system_reserved {
            if lowercase_name.contains(word) {
                return Err("Team name contains reserved word".to_string());
            }
        }

        if let Some(desc) = &self.description {
            if desc.len() > 500 {
                return Err("Team description cannot exceed 500 characters".to_string());
            }
        }

        Ok(())
    }

    /// Get sanitized team name
    pub fn get_sanitized_name(&self) -> String {
        self.team_name
            .trim()
            .chars()
            .filter(|&c| c != '\0' && c != '\t' && c != '\r' && c != '\n')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
