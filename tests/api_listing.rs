//! Integration tests per la lista pubblica degli annunci e i suggerimenti di ricerca
//!
//! Test per:
//! - GET /api/posts (paginazione, ricerca con sinonimi, categoria, città, tipo, ordinamento)
//! - GET /api/search
//! - POST /api/search/track
//!
//! Richiedono DATABASE_URL verso un'istanza PostgreSQL.

mod common;

#[cfg(test)]
mod listing_tests {
    use super::common::*;
    use axum_test::TestServer;
    use axum_test::http::HeaderName;
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use uuid::Uuid;

    const KRAN_POST: Uuid = Uuid::from_u128(0x20000000_0000_0000_0000_000000000001);
    const PIEC_POST: Uuid = Uuid::from_u128(0x20000000_0000_0000_0000_000000000004);
    const MATH_POST: Uuid = Uuid::from_u128(0x20000000_0000_0000_0000_000000000005);

    fn auth() -> HeaderName {
        HeaderName::from_static("authorization")
    }

    fn ids(body: &Value) -> Vec<Value> {
        body["posts"]
            .as_array()
            .expect("posts array")
            .iter()
            .map(|p| p["id"].clone())
            .collect()
    }

    async fn listing(server: &TestServer, params: &[(&str, &str)]) -> Value {
        let mut request = server.get("/api/posts");
        for (key, value) in params {
            request = request.add_query_param(key, value);
        }
        let response = request.await;
        response.assert_status_ok();
        response.json()
    }

    // ============================================================
    // Lista pubblica
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "categories", "posts")))]
    async fn test_listing_shows_active_posts_newest_first(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = listing(&server, &[]).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["hasMore"], false);
        assert_eq!(ids(&body), vec![json!(MATH_POST), json!(PIEC_POST), json!(KRAN_POST)]);

        let first = &body["posts"][2];
        assert_eq!(first["title"], "Naprawa kranów");
        assert_eq!(first["category_name"], "Hydraulik");
        assert!(first["author_name"].is_string());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "categories", "posts")))]
    async fn test_listing_pagination(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = listing(&server, &[("limit", "2")]).await;
        assert_eq!(ids(&body), vec![json!(MATH_POST), json!(PIEC_POST)]);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["total"], 3);

        let body = listing(&server, &[("limit", "2"), ("offset", "2")]).await;
        assert_eq!(ids(&body), vec![json!(KRAN_POST)]);
        assert_eq!(body["hasMore"], false);

        // offset oltre la fine: pagina vuota, nessun errore
        let body = listing(&server, &[("offset", "100")]).await;
        assert_eq!(ids(&body), Vec::<Value>::new());
        assert_eq!(body["hasMore"], false);

        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "synonyms")
    ))]
    async fn test_listing_search_expands_synonyms(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // bateria -> kran
        let body = listing(&server, &[("search", "bateria")]).await;
        assert_eq!(ids(&body), vec![json!(KRAN_POST)]);

        // kocioł -> piec
        let body = listing(&server, &[("search", "Kocioł")]).await;
        assert_eq!(ids(&body), vec![json!(PIEC_POST)]);

        // sinonimo di categoria: instalator -> Hydraulik
        let body = listing(&server, &[("search", "instalator")]).await;
        assert_eq!(ids(&body), vec![json!(KRAN_POST)]);

        // ogni termine deve essere soddisfatto
        let body = listing(&server, &[("search", "kran matematyka")]).await;
        assert_eq!(body["total"], 0);

        // ricerca troppo corta ignorata
        let body = listing(&server, &[("search", "a")]).await;
        assert_eq!(body["total"], 3);

        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "synonyms")
    ))]
    async fn test_listing_category_filter(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body = listing(&server, &[("category", "hydraulik")]).await;
        assert_eq!(ids(&body), vec![json!(KRAN_POST)]);

        let body = listing(&server, &[("category", "Korepetycje")]).await;
        assert_eq!(ids(&body), vec![json!(MATH_POST)]);

        // risolta tramite sinonimo di categoria
        let body = listing(&server, &[("category", "Nauczyciel")]).await;
        assert_eq!(ids(&body), vec![json!(MATH_POST)]);

        // categoria sconosciuta: filtro ignorato
        let body = listing(&server, &[("category", "astrologia")]).await;
        assert_eq!(body["total"], 3);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "categories", "posts")))]
    async fn test_listing_city_type_and_sort(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // il filtro città cerca anche nel quartiere
        let body = listing(&server, &[("city", "wrzeszcz")]).await;
        assert_eq!(ids(&body), vec![json!(PIEC_POST)]);

        let body = listing(&server, &[("city", "  Gdańsk ")]).await;
        assert_eq!(body["total"], 2);

        let body = listing(&server, &[("type", "seeking")]).await;
        assert_eq!(ids(&body), vec![json!(PIEC_POST)]);

        let body = listing(&server, &[("sort", "price_asc")]).await;
        assert_eq!(ids(&body), vec![json!(MATH_POST), json!(KRAN_POST), json!(PIEC_POST)]);

        let body = listing(&server, &[("sort", "oldest")]).await;
        assert_eq!(ids(&body), vec![json!(KRAN_POST), json!(PIEC_POST), json!(MATH_POST)]);

        server
            .get("/api/posts")
            .add_query_param("type", "everything")
            .await
            .assert_status_bad_request();

        Ok(())
    }

    // ============================================================
    // Suggerimenti di ricerca
    // ============================================================

    fn texts(list: &Value) -> Vec<String> {
        list.as_array()
            .expect("suggestion array")
            .iter()
            .map(|s| s["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles", "search_queries")))]
    async fn test_search_without_query_returns_discovery_lists(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/search").await;
        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["trending"][0], json!({ "text": "hydraulik", "type": "trending" }));
        // la ricerca di 40 giorni fa non conta
        assert!(!texts(&body["trending"]).contains(&"ogrodnik".to_string()));
        assert_eq!(body["popular"][0]["type"], "popular");
        assert_eq!(texts(&body["popular"])[0], "hydraulik");
        assert_eq!(body["suggestions"], json!([]));

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_popular_falls_back_without_history(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server.get("/api/search").add_query_param("q", "   ").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["trending"], json!([]));
        assert_eq!(body["popular"].as_array().map(Vec::len), Some(8));
        assert_eq!(body["popular"][0]["text"], "hydraulik");

        let response = server.get("/api/search").add_query_param("q", "h").await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "trending": [],
            "popular": [],
            "categories": [],
            "suggestions": []
        }));

        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("profiles", "categories", "posts", "synonyms", "search_queries")
    ))]
    async fn test_search_suggestions_from_all_sources(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // sinonimo di categoria: Hydraulik con combinazioni e intenzioni
        let response = server.get("/api/search").add_query_param("q", "instalator").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["categories"][0]["name"], "Hydraulik");
        assert_eq!(
            texts(&body["suggestions"]),
            vec![
                "Hydraulik",
                "Hydraulik Warszawa",
                "Hydraulik Kraków",
                "szukam hydraulik",
                "potrzebuję hydraulik",
            ]
        );

        // frase dal titolo e sinonimo
        let response = server.get("/api/search").add_query_param("q", "kran").await;
        let body: Value = response.json();
        assert_eq!(
            body["suggestions"],
            json!([
                { "text": "kranów", "type": "post" },
                { "text": "bateria", "type": "synonym" }
            ])
        );

        // le ricerche passate già coperte da altre fonti non si ripetono
        let response = server.get("/api/search").add_query_param("q", "Hydraulik").await;
        let body: Value = response.json();
        let suggestions = texts(&body["suggestions"]);
        let lowered: Vec<String> = suggestions.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(lowered.iter().filter(|s| *s == "hydraulik").count(), 1);
        assert_eq!(lowered.iter().filter(|s| *s == "hydraulik kraków").count(), 1);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("profiles")))]
    async fn test_track_search(pool: PgPool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        let response = server
            .post("/api/search/track")
            .json(&json!({ "query": "  elektryk   Gdańsk " }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));

        server
            .post("/api/search/track")
            .add_header(auth(), bearer(JAN_ID))
            .json(&json!({ "query": "korepetycje", "clickedResult": "Bot: matematyka" }))
            .await
            .assert_status_ok();

        server
            .post("/api/search/track")
            .json(&json!({ "query": "a" }))
            .await
            .assert_status_bad_request();

        let rows: Vec<(String, Option<Uuid>, Option<String>)> = sqlx::query_as(
            "SELECT query, user_id, clicked_result FROM search_queries ORDER BY created_at, query",
        )
        .fetch_all(&pool)
        .await?;
        assert_eq!(rows.len(), 2);
        assert!(rows.contains(&("elektryk Gdańsk".to_string(), None, None)));
        assert!(rows.contains(&(
            "korepetycje".to_string(),
            Some(JAN_ID),
            Some("Bot: matematyka".to_string())
        )));

        Ok(())
    }
}
