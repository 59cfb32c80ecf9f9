mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::TestServer;

fn new_employee(last_name: &str) -> Value {
    json!({
        "lastName": last_name,
        "firstName": "Pat",
        "title": "Sales Representative",
        "hireDate": "2024-01-15",
        "city": "Seattle",
    })
}

fn employee_ids(body: &Value) -> Vec<i64> {
    body["employees"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|e| e["employeeId"].as_i64())
        .collect()
}

#[tokio::test]
async fn lists_first_page_in_id_order() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/employees").await?;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(employee_ids(&body), (1..=9).collect::<Vec<_>>());
    assert_eq!(body["totalPages"], 1);

    let first = &body["employees"][0];
    assert_eq!(first["lastName"], "Davolio");
    assert_eq!(first["hireDate"], "1992-05-01");
    assert!(first.get("reportsTo").is_none(), "list projection leaked reportsTo: {}", first);
    assert!(first.get("photoPath").is_none());
    Ok(())
}

#[tokio::test]
async fn paginates_twenty_three_rows_into_three_pages() -> Result<()> {
    let server = TestServer::spawn().await?;
    for n in 0..14 {
        let res = server.post("/employees", &new_employee(&format!("Temp{:02}", n))).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mut seen = Vec::new();
    for (page, expected_len) in [(1, 10), (2, 10), (3, 3)] {
        let (status, body) = server.get(&format!("/employees?page={}", page)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPages"], 3, "page {}: {}", page, body);
        let ids = employee_ids(&body);
        assert_eq!(ids.len(), expected_len, "page {}", page);
        seen.extend(ids);
    }
    assert_eq!(seen, (1..=23).collect::<Vec<_>>());

    let (status, body) = server.get("/employees?page=4").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(employee_ids(&body).is_empty());
    assert_eq!(body["totalPages"], 3);
    Ok(())
}

#[tokio::test]
async fn rejects_non_positive_and_non_numeric_pages() -> Result<()> {
    let server = TestServer::spawn().await?;
    for page in ["0", "-2", "two"] {
        let (status, body) = server.get(&format!("/employees?page={}", page)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "page={}", page);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["page"].is_string(), "body: {}", body);
    }
    Ok(())
}

#[tokio::test]
async fn search_matches_case_insensitive_substrings() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/employees/search?lastName=dav").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(employee_ids(&body), vec![1]);
    assert_eq!(body["totalPages"], 1);

    let (_, body) = server.get("/employees/search?title=Sales%20Rep&firstName=&page=1").await?;
    assert_eq!(employee_ids(&body), vec![1, 3, 4, 6, 7, 9]);

    let (_, body) = server.get("/employees/search?lastName=zzz").await?;
    assert!(employee_ids(&body).is_empty());
    assert_eq!(body["totalPages"], 0);
    Ok(())
}

#[tokio::test]
async fn creates_and_reads_back_employee() -> Result<()> {
    let server = TestServer::spawn().await?;

    let mut payload = new_employee("Ames");
    payload["reportsTo"] = json!(2);
    let res = server.post("/employees", &payload).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()[header::LOCATION], "/employees/10");
    let created: Value = res.json().await?;
    assert_eq!(created["employeeId"], 10);

    let (status, body) = server.get("/employees/10").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "Ames");
    assert_eq!(body["reportsTo"], 2);
    assert_eq!(body["hireDate"], "2024-01-15");
    Ok(())
}

#[tokio::test]
async fn create_reports_all_field_errors() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post("/employees", &json!({ "lastName": " ", "birthDate": "12/08/1948", "reportsTo": "boss" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    let field_errors = body["field_errors"].as_object().cloned().unwrap_or_default();
    for field in ["lastName", "firstName", "title", "birthDate", "reportsTo"] {
        assert!(field_errors.contains_key(field), "missing {} in {}", field, body);
    }

    let mut unknown_manager = new_employee("Ames");
    unknown_manager["reportsTo"] = json!(404);
    let res = server.post("/employees", &unknown_manager).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["reportsTo"].is_string());
    Ok(())
}

#[tokio::test]
async fn update_overwrites_scalars() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .put(
            "/employees/3",
            &json!({
                "employeeID": 3,
                "lastName": "Leverling",
                "firstName": "Janet",
                "title": "Sales Manager",
                "city": "Kirkland",
                "reportsTo": "",
            }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, body) = server.get("/employees/3").await?;
    assert_eq!(body["title"], "Sales Manager");
    assert!(body["reportsTo"].is_null());
    assert!(body["birthDate"].is_null());
    Ok(())
}

#[tokio::test]
async fn update_rejects_mismatched_id_and_missing_employee() -> Result<()> {
    let server = TestServer::spawn().await?;

    let mut payload = new_employee("Leverling");
    payload["employeeId"] = json!(4);
    let res = server.put("/employees/3", &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");

    let res = server.put("/employees/999", &new_employee("Nobody")).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_and_delete_are_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;

    assert_eq!(server.delete("/employees/5").await?, StatusCode::NO_CONTENT);
    let (status, body) = server.get("/employees/5").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(server.delete("/employees/5").await?, StatusCode::NOT_FOUND);

    // Direct reports of the deleted manager lose their manager reference
    let (_, body) = server.get("/employees/6").await?;
    assert!(body["reportsTo"].is_null());
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, _) = server.get("/employees/999").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.get("/employees/abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn repeated_query_keys_get_error_body() -> Result<()> {
    let server = TestServer::spawn().await?;

    for path in ["/employees/search?lastName=a&lastName=b", "/employees?page=1&page=2"] {
        let (status, body) = server.get(path).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(body["error"], true, "{}: {}", path, body);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["message"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn deleted_highest_id_is_not_reused() -> Result<()> {
    let server = TestServer::spawn().await?;

    assert_eq!(server.delete("/employees/9").await?, StatusCode::NO_CONTENT);
    let res = server.post("/employees", &new_employee("Ames")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["employeeId"], 10);
    assert_eq!(server.delete("/employees/9").await?, StatusCode::NOT_FOUND);
    Ok(())
}
