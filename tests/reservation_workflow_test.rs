use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

mod common;
use common::booking_helpers::{
    add_opponent, create_reservation, create_stadium, create_team, promote_to_admin,
    register_and_login, select_opponent, update_status, AuthedUser,
};
use common::utils::{spawn_app, TestApp};

struct Fixture {
    owner: AuthedUser,
    captain_a: AuthedUser,
    captain_b: AuthedUser,
    stadium_id: Uuid,
    team_a: Uuid,
    team_b: Uuid,
}

/// One stadium, two teams, no reservation yet.
async fn setup(app: &TestApp) -> Fixture {
    let owner = register_and_login(app, "owner").await;
    let captain_a = register_and_login(app, "captain").await;
    let captain_b = register_and_login(app, "captain").await;
    let stadium_id = create_stadium(app, &owner).await;
    let team_a = create_team(app, &captain_a).await;
    let team_b = create_team(app, &captain_b).await;
    Fixture {
        owner,
        captain_a,
        captain_b,
        stadium_id,
        team_a,
        team_b,
    }
}

#[tokio::test]
async fn captain_creates_a_pending_reservation() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;

    let client = Client::new();
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.captain_a.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "teamId": fx.team_a,
            "weekday": 3,
            "session": "evening",
            "notes": "bring spare bibs"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let reservation = &body["reservation"];
    assert_eq!("pending", reservation["status"].as_str().unwrap());
    assert_eq!(3, reservation["weekday"].as_i64().unwrap());
    assert_eq!("evening", reservation["session"].as_str().unwrap());
    assert_eq!(
        fx.owner.user_id.to_string(),
        reservation["ownerId"].as_str().unwrap()
    );
    assert_eq!(
        fx.team_a.to_string(),
        reservation["requestingTeam"].as_str().unwrap()
    );
    assert!(reservation["opponentTeams"].as_array().unwrap().is_empty());
    assert!(reservation["selectedOpponent"].is_null());
    assert!(reservation["match"].is_null());
}

#[tokio::test]
async fn captain_may_omit_the_team_id() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;

    let client = Client::new();
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.captain_a.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "weekday": 2,
            "session": "morning"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        fx.team_a.to_string(),
        body["reservation"]["requestingTeam"].as_str().unwrap()
    );
}

#[tokio::test]
async fn admin_creates_a_reservation_on_a_captains_behalf() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let admin = register_and_login(&test_app, "player").await;
    let admin = promote_to_admin(&test_app, &admin).await;

    let client = Client::new();

    // Without a team there is nothing to reserve for
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&admin.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "weekday": 2,
            "session": "morning"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(400, response.status().as_u16());

    // Naming the requesting team works
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&admin.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "teamId": fx.team_a,
            "weekday": 2,
            "session": "morning"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        fx.team_a.to_string(),
        body["reservation"]["requestingTeam"].as_str().unwrap()
    );
}

#[tokio::test]
async fn reservation_creation_validates_inputs_and_roles() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let client = Client::new();

    // Weekday out of range
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.captain_a.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "teamId": fx.team_a,
            "weekday": 9,
            "session": "evening"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(400, response.status().as_u16());

    // Unknown stadium
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.captain_a.token)
        .json(&json!({
            "stadiumId": Uuid::new_v4(),
            "teamId": fx.team_a,
            "weekday": 3,
            "session": "evening"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(404, response.status().as_u16());

    // A captain cannot open a reservation for somebody else's team
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.captain_a.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "teamId": fx.team_b,
            "weekday": 3,
            "session": "evening"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(403, response.status().as_u16());

    // Owners cannot open reservations at all
    let response = client
        .post(format!("{}/reservation", test_app.address))
        .bearer_auth(&fx.owner.token)
        .json(&json!({
            "stadiumId": fx.stadium_id,
            "teamId": fx.team_a,
            "weekday": 3,
            "session": "evening"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn owner_approves_a_pending_reservation() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    let response = update_status(&test_app, &fx.owner, reservation_id, "approved").await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("approved", body["reservation"]["status"].as_str().unwrap());
}

#[tokio::test]
async fn only_the_owner_of_record_may_review() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    // The requesting captain cannot review
    let response = update_status(&test_app, &fx.captain_a, reservation_id, "approved").await;
    assert_eq!(403, response.status().as_u16());

    // Another stadium owner cannot review either
    let other_owner = register_and_login(&test_app, "owner").await;
    let response = update_status(&test_app, &other_owner, reservation_id, "approved").await;
    assert_eq!(403, response.status().as_u16());

    // Status is untouched
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM reservations WHERE id = $1")
        .bind(reservation_id)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to read reservation status");
    assert_eq!("pending", status);
}

#[tokio::test]
async fn review_decision_must_be_approved_or_rejected() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    let response = update_status(&test_app, &fx.owner, reservation_id, "matched").await;
    assert_eq!(400, response.status().as_u16());

    let response = update_status(&test_app, &fx.owner, reservation_id, "pending").await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn review_is_not_repeatable() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    let response = update_status(&test_app, &fx.owner, reservation_id, "approved").await;
    assert_eq!(200, response.status().as_u16());

    // Approving twice, or rejecting after approval, is an invalid transition
    let response = update_status(&test_app, &fx.owner, reservation_id, "rejected").await;
    assert_eq!(409, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("approved", body["currentStatus"].as_str().unwrap());
}

#[tokio::test]
async fn opponents_can_register_interest_idempotently() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    // Interest can be registered while still pending
    let response = add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let opponents = body["reservation"]["opponentTeams"].as_array().unwrap();
    assert_eq!(1, opponents.len());
    assert_eq!(fx.team_b.to_string(), opponents[0].as_str().unwrap());

    // A repeated add succeeds and still yields one entry
    let response = add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        1,
        body["reservation"]["opponentTeams"].as_array().unwrap().len()
    );
}

#[tokio::test]
async fn a_team_cannot_be_its_own_opponent() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    let response = add_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_a).await;
    assert_eq!(409, response.status().as_u16());

    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reservation_opponents WHERE reservation_id = $1",
    )
    .bind(reservation_id)
    .fetch_one(&test_app.db_pool)
    .await
    .expect("Failed to count opponents");
    assert_eq!(0, count);
}

#[tokio::test]
async fn only_the_opponent_captain_may_register_its_interest() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    // Captain A cannot volunteer team B
    let response = add_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;
    assert_eq!(403, response.status().as_u16());

    // An admin can
    let admin = register_and_login(&test_app, "player").await;
    let admin = promote_to_admin(&test_app, &admin).await;
    let response = add_opponent(&test_app, &admin, reservation_id, fx.team_b).await;
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn selecting_an_opponent_finalizes_the_reservation() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    update_status(&test_app, &fx.owner, reservation_id, "approved").await;
    add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;

    let response = select_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;
    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let reservation = &body["reservation"];
    assert_eq!("matched", reservation["status"].as_str().unwrap());
    assert_eq!(
        fx.team_b.to_string(),
        reservation["selectedOpponent"].as_str().unwrap()
    );

    let game = &body["match"];
    assert_eq!(fx.team_a.to_string(), game["teamA"].as_str().unwrap());
    assert_eq!(fx.team_b.to_string(), game["teamB"].as_str().unwrap());
    assert_eq!("open", game["status"].as_str().unwrap());
    assert_eq!(
        fx.captain_a.user_id.to_string(),
        game["createdBy"].as_str().unwrap()
    );
    assert_eq!(
        game["id"].as_str().unwrap(),
        reservation["match"].as_str().unwrap()
    );
}

#[tokio::test]
async fn selection_requires_prior_approval() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;
    add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;

    // Still pending: selection is an invalid transition
    let response = select_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;
    assert_eq!(409, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!("pending", body["currentStatus"].as_str().unwrap());
}

#[tokio::test]
async fn selection_requires_a_registered_opponent() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;
    update_status(&test_app, &fx.owner, reservation_id, "approved").await;

    // Team B never registered interest
    let response = select_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn terminal_states_admit_no_further_mutation() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;

    // Finalized reservation
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;
    update_status(&test_app, &fx.owner, reservation_id, "approved").await;
    add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;
    select_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;

    let response = update_status(&test_app, &fx.owner, reservation_id, "rejected").await;
    assert_eq!(409, response.status().as_u16());

    let captain_c = register_and_login(&test_app, "captain").await;
    let team_c = create_team(&test_app, &captain_c).await;
    let response = add_opponent(&test_app, &captain_c, reservation_id, team_c).await;
    assert_eq!(409, response.status().as_u16());

    let response = select_opponent(&test_app, &fx.captain_a, reservation_id, fx.team_b).await;
    assert_eq!(409, response.status().as_u16());

    // Rejected reservation
    let rejected_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 5, "morning").await;
    update_status(&test_app, &fx.owner, rejected_id, "rejected").await;

    let response = add_opponent(&test_app, &fx.captain_b, rejected_id, fx.team_b).await;
    assert_eq!(409, response.status().as_u16());
    let response = update_status(&test_app, &fx.owner, rejected_id, "approved").await;
    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn listing_is_scoped_by_role() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;
    add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;

    let client = Client::new();
    let list = |token: String| {
        let client = client.clone();
        let address = test_app.address.clone();
        async move {
            let response = client
                .get(format!("{}/reservation", address))
                .bearer_auth(token)
                .send()
                .await
                .expect("Failed to list reservations");
            assert_eq!(200, response.status().as_u16());
            let body: serde_json::Value =
                response.json().await.expect("Failed to parse response");
            body["reservations"].as_array().unwrap().clone()
        }
    };

    // The stadium owner sees the claim on their stadium
    assert_eq!(1, list(fx.owner.token.clone()).await.len());
    // The requesting captain sees it
    assert_eq!(1, list(fx.captain_a.token.clone()).await.len());
    // The opponent captain sees it too
    assert_eq!(1, list(fx.captain_b.token.clone()).await.len());

    // An unrelated captain sees nothing
    let captain_c = register_and_login(&test_app, "captain").await;
    create_team(&test_app, &captain_c).await;
    assert!(list(captain_c.token.clone()).await.is_empty());

    // An unrelated owner sees nothing
    let other_owner = register_and_login(&test_app, "owner").await;
    assert!(list(other_owner.token.clone()).await.is_empty());

    // Admins see everything
    let admin = register_and_login(&test_app, "player").await;
    let admin = promote_to_admin(&test_app, &admin).await;
    assert_eq!(1, list(admin.token.clone()).await.len());
}

#[tokio::test]
async fn opponent_order_is_insertion_order() {
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;
    let reservation_id =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;

    let captain_c = register_and_login(&test_app, "captain").await;
    let team_c = create_team(&test_app, &captain_c).await;

    add_opponent(&test_app, &fx.captain_b, reservation_id, fx.team_b).await;
    let response = add_opponent(&test_app, &captain_c, reservation_id, team_c).await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");

    let opponents: Vec<String> = body["reservation"]["opponentTeams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(vec![fx.team_b.to_string(), team_c.to_string()], opponents);
}

#[tokio::test]
async fn duplicate_slots_are_not_prevented() {
    // The source system deliberately does not enforce double-booking
    // prevention; two pending claims on the same slot must both succeed.
    let test_app = spawn_app().await;
    let fx = setup(&test_app).await;

    let first =
        create_reservation(&test_app, &fx.captain_a, fx.stadium_id, fx.team_a, 3, "evening").await;
    let second =
        create_reservation(&test_app, &fx.captain_b, fx.stadium_id, fx.team_b, 3, "evening").await;
    assert_ne!(first, second);
}
