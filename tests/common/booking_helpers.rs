use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::common::utils::TestApp;

pub struct AuthedUser {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

/// Register a user with the given role and log them in.
pub async fn register_and_login(app: &TestApp, role: &str) -> AuthedUser {
    let client = Client::new();
    let username = format!("{}{}", role, Uuid::new_v4().simple());
    let password = "password123";
    let email = format!("{}@example.com", username);

    let register_response = client
        .post(format!("{}/register_user", app.address))
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
            "role": role
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(200, register_response.status().as_u16());

    let token = login(app, &username, password).await;

    // The registration response carries no id, read it off the database
    let user_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to look up registered user");

    AuthedUser {
        user_id,
        username,
        token,
    }
}

pub async fn login(app: &TestApp, username: &str, password: &str) -> String {
    let client = Client::new();
    let login_response = client
        .post(format!("{}/login", app.address))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute login request");
    assert_eq!(200, login_response.status().as_u16());

    let body: serde_json::Value = login_response
        .json()
        .await
        .expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Promote a user to admin directly in the database and log in again so
/// the fresh token carries the admin role.
pub async fn promote_to_admin(app: &TestApp, user: &AuthedUser) -> AuthedUser {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user.user_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to promote user to admin");

    let token = login(app, &user.username, "password123").await;
    AuthedUser {
        user_id: user.user_id,
        username: user.username.clone(),
        token,
    }
}

/// Register a stadium for the given owner, returning its id.
pub async fn create_stadium(app: &TestApp, owner: &AuthedUser) -> Uuid {
    let client = Client::new();
    let response = client
        .post(format!("{}/stadium", app.address))
        .bearer_auth(&owner.token)
        .json(&json!({
            "name": format!("Arena {}", &Uuid::new_v4().to_string()[..8]),
            "location": "14 Riverside Way"
        }))
        .send()
        .await
        .expect("Failed to create stadium");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"]
        .as_str()
        .expect("No stadium id in response")
        .parse()
        .expect("Stadium id is not a UUID")
}

/// Register a team for the given captain, returning its id.
pub async fn create_team(app: &TestApp, captain: &AuthedUser) -> Uuid {
    let client = Client::new();
    let response = client
        .post(format!("{}/team", app.address))
        .bearer_auth(&captain.token)
        .json(&json!({
            "team_name": format!("Team {}", &Uuid::new_v4().to_string()[..8])
        }))
        .send()
        .await
        .expect("Failed to create team");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"]
        .as_str()
        .expect("No team id in response")
        .parse()
        .expect("Team id is not a UUID")
}

/// Create a pending reservation, returning its id.
pub async fn create_reservation(
    app: &TestApp,
    captain: &AuthedUser,
    stadium_id: Uuid,
    team_id: Uuid,
    weekday: i32,
    session: &str,
) -> Uuid {
    let client = Client::new();
    let response = client
        .post(format!("{}/reservation", app.address))
        .bearer_auth(&captain.token)
        .json(&json!({
            "stadiumId": stadium_id,
            "teamId": team_id,
            "weekday": weekday,
            "session": session
        }))
        .send()
        .await
        .expect("Failed to create reservation");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("pending", body["reservation"]["status"].as_str().unwrap());
    body["reservation"]["id"]
        .as_str()
        .expect("No reservation id in response")
        .parse()
        .expect("Reservation id is not a UUID")
}

/// Owner review of a reservation; returns the raw response.
pub async fn update_status(
    app: &TestApp,
    actor: &AuthedUser,
    reservation_id: Uuid,
    status: &str,
) -> reqwest::Response {
    Client::new()
        .put(format!("{}/reservation/{}/status", app.address, reservation_id))
        .bearer_auth(&actor.token)
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Failed to execute status update request")
}

pub async fn add_opponent(
    app: &TestApp,
    actor: &AuthedUser,
    reservation_id: Uuid,
    team_id: Uuid,
) -> reqwest::Response {
    Client::new()
        .put(format!(
            "{}/reservation/{}/add-opponent",
            app.address, reservation_id
        ))
        .bearer_auth(&actor.token)
        .json(&json!({ "teamId": team_id }))
        .send()
        .await
        .expect("Failed to execute add-opponent request")
}

pub async fn select_opponent(
    app: &TestApp,
    actor: &AuthedUser,
    reservation_id: Uuid,
    team_id: Uuid,
) -> reqwest::Response {
    Client::new()
        .put(format!(
            "{}/reservation/{}/select-opponent",
            app.address, reservation_id
        ))
        .bearer_auth(&actor.token)
        .json(&json!({ "teamId": team_id }))
        .send()
        .await
        .expect("Failed to execute select-opponent request")
}
