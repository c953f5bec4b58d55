// src/models/stadium.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Stadium {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to list a new stadium
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StadiumRegistrationRequest {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
}

impl StadiumRegistrationRequest {
    /// Validate stadium registration request
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Stadium name cannot be empty".to_string());
        }

        if name.len() < 2 {
            return Err("Stadium name must be at least 2 characters".to_string());
        }

        if name.len() > 80 {
            return Err("Stadium name cannot exceed 80 characters".to_string());
        }

        if !name.chars().any(|c| c.is_alphanumeric()) {
            return Err("Stadium name must contain at least one letter or number".to_string());
        }

        if self.location.trim().is_empty() {
            return Err("Stadium location cannot be empty".to_string());
        }

        if let Some(desc) = &self.description {
            if desc.len() > 500 {
                return Err("Stadium description cannot exceed 500 characters".to_string());
            }
        }

        Ok(())
    }

    /// Get sanitized stadium name
    pub fn get_sanitized_name(&self) -> String {
        self.name
            .trim()
            .chars()
            .filter(|&c| c != '\0' && c != '\t' && c != '\r' && c != '\n')
            .collect::<String>()
            .trim()
            .to_string()
    }
}
