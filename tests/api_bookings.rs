//! Integration tests per le prenotazioni
//!
//! Test per:
//! - GET /api/bookings (slot occupati del fornitore)
//! - POST /api/bookings, PATCH /api/bookings
//! - POST /api/reviews legata a una prenotazione
//!
//! Richiedono DATABASE_URL verso un'istanza PostgreSQL.

mod common;

#[cfg(test)]
mod bookings_tests {
    use super::common::*;
    use axum_test::http::HeaderName;
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use uuid::Uuid;

    const ANNA_POST: Uuid = Uuid::from_u128(0x20000000_0000_0000_0000_000000000001);
    const JAN_POST: Uuid = Uuid::from_u128(0x20000000_0000_0000_0000_000000000004);
    const COMPLETED_BOOKING: Uuid = Uuid::from_u128(0x50000000_0000_0000_0000_000000000001);
    const PENDING_BOOKING: Uuid = Uuid::from_u128(0x50000000_0000_0000_0000_000000000002);

    fn auth() -> HeaderName {
        HeaderName::from_static("authorization")
    }

    async fn activity_count(pool: &PgPool, user_id: Uuid, activity_type: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE user_id = $1 AND activity_type = $2")
            .bind(user_id)
            .bind(activity_type)
            .fetch_one(pool)
            .await
    }

    async fn booking_status(pool: &PgPool, id: Uuid) -> sqlx::Result<String> {
        sqlx::query_scalar("SELECT status::text FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    // ============================================================
    // Calendario
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "bookings")
    ))]
    async fn test_busy_slots_skip_closed_bookings(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/api/bookings")
            .add_query_param("providerId", ANNA_ID)
            .add_query_param("date", "2030-05-10")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();

        // completata e annullata non occupano il calendario
        let slots = body["bookings"].as_array().expect("bookings array");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0]["status"], "pending");
        assert_eq!(slots[0]["duration_minutes"], 90);

        let response = server
            .get("/api/bookings")
            .add_query_param("providerId", ANNA_ID)
            .add_query_param("date", "2030-05-11")
            .await;
        response.assert_json(&json!({ "bookings": [] }));

        server
            .get("/api/bookings")
            .add_query_param("providerId", ANNA_ID)
            .await
            .assert_status_bad_request();

        Ok(())
    }

    // ============================================================
    // Richieste
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "categories", "posts")))]
    async fn test_create_booking_notifies_provider(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        let response = server
            .post("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "providerId": ANNA_ID,
                "postId": ANNA_POST,
                "scheduledAt": "2030-06-01T10:00:00Z",
                "clientNotes": "  Cieknie   kran w kuchni "
            }))
            .await;

        response.assert_status(axum_test::http::StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["booking"]["status"], "pending");
        assert_eq!(body["booking"]["duration_minutes"], 60);
        assert_eq!(body["booking"]["client_id"], json!(JAN_ID));
        assert_eq!(body["booking"]["client_notes"], "Cieknie kran w kuchni");

        assert_eq!(activity_count(&pool, ANNA_ID, "booking_request").await?, 1);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "categories", "posts")))]
    async fn test_create_booking_validation(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // prenotazione del proprio servizio
        server
            .post("/api/bookings")
            .add_header(auth(), bearer(ANNA_ID))
            .json(&json!({
                "providerId": ANNA_ID,
                "postId": ANNA_POST,
                "scheduledAt": "2030-06-01T10:00:00Z"
            }))
            .await
            .assert_status_bad_request();

        // l'annuncio non è del fornitore indicato
        let response = server
            .post("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "providerId": ANNA_ID,
                "postId": JAN_POST,
                "scheduledAt": "2030-06-01T10:00:00Z"
            }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Post does not belong to this provider");

        server
            .post("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "providerId": ANNA_ID,
                "postId": Uuid::new_v4(),
                "scheduledAt": "2030-06-01T10:00:00Z"
            }))
            .await
            .assert_status_not_found();

        // data mancante
        server
            .post("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "providerId": ANNA_ID, "postId": ANNA_POST }))
            .await
            .assert_status_bad_request();

        // durata fuori range
        server
            .post("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "providerId": ANNA_ID,
                "postId": ANNA_POST,
                "scheduledAt": "2030-06-01T10:00:00Z",
                "durationMinutes": 5
            }))
            .await
            .assert_status_bad_request();

        // senza token
        server
            .post("/api/bookings")
            .json(&json!({}))
            .await
            .assert_status_unauthorized();

        Ok(())
    }

    // ============================================================
    // Cambi di stato
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "bookings")
    ))]
    async fn test_provider_confirms_booking(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        let response = server
            .patch("/api/bookings")
            .add_header(auth(), bearer(ANNA_ID))
            .json(&json!({ "bookingId": PENDING_BOOKING, "status": "confirmed" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));

        assert_eq!(booking_status(&pool, PENDING_BOOKING).await?, "confirmed");
        assert_eq!(activity_count(&pool, JAN_ID, "booking_status_changed").await?, 1);

        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "bookings")
    ))]
    async fn test_update_booking_status_rules(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        // nemmeno l'admin può toccare prenotazioni altrui
        server
            .patch("/api/bookings")
            .add_header(auth(), bearer(ADMIN_ID))
            .json(&json!({ "bookingId": PENDING_BOOKING, "status": "cancelled" }))
            .await
            .assert_status_forbidden();

        // reviewed si ottiene solo lasciando una recensione
        let response = server
            .patch("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "bookingId": PENDING_BOOKING, "status": "reviewed" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid status");

        server
            .patch("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "bookingId": Uuid::new_v4(), "status": "cancelled" }))
            .await
            .assert_status_not_found();

        server
            .patch("/api/bookings")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "status": "cancelled" }))
            .await
            .assert_status_bad_request();

        assert_eq!(booking_status(&pool, PENDING_BOOKING).await?, "pending");

        Ok(())
    }

    // ============================================================
    // Recensioni legate a una prenotazione
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "bookings")
    ))]
    async fn test_review_completed_booking_once(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        let response = server
            .post("/api/reviews")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "reviewedId": ANNA_ID,
                "postId": ANNA_POST,
                "bookingId": COMPLETED_BOOKING,
                "rating": 5
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(booking_status(&pool, COMPLETED_BOOKING).await?, "reviewed");

        let response = server
            .post("/api/reviews")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({
                "reviewedId": ANNA_ID,
                "bookingId": COMPLETED_BOOKING,
                "rating": 1
            }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "This booking has already been reviewed");

        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "bookings")
    ))]
    async fn test_review_booking_rules(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // prenotazione non ancora conclusa
        server
            .post("/api/reviews")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "reviewedId": ANNA_ID, "bookingId": PENDING_BOOKING, "rating": 5 }))
            .await
            .assert_status_bad_request();

        // solo il cliente recensisce
        server
            .post("/api/reviews")
            .add_header(auth(), bearer(ANNA_ID))
            .json(&json!({ "reviewedId": JAN_ID, "bookingId": COMPLETED_BOOKING, "rating": 5 }))
            .await
            .assert_status_forbidden();

        server
            .post("/api/reviews")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "reviewedId": ANNA_ID, "bookingId": Uuid::new_v4(), "rating": 5 }))
            .await
            .assert_status_not_found();

        Ok(())
    }
}
