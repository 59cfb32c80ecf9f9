mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{selected_ids, TestServer};

fn janet(territories: Value) -> Value {
    json!({
        "employeeId": 3,
        "lastName": "Leverling",
        "firstName": "Janet",
        "title": "Sales Representative",
        "territories": territories,
    })
}

fn checklist(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({ "territoryId": id, "isSelected": true }))
            .collect(),
    )
}

#[tokio::test]
async fn unassigned_checklist_has_nothing_selected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/employees/territories").await?;
    assert_eq!(status, StatusCode::OK);
    let all = body.as_array().cloned().unwrap_or_default();
    assert!(!all.is_empty());
    assert!(selected_ids(&body).is_empty());

    let ids: Vec<&str> = all.iter().filter_map(|t| t["territoryId"].as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "checklist must be ordered by territory id");
    assert!(all[0]["territoryDescription"].is_string());
    assert!(all[0]["regionId"].is_number());
    Ok(())
}

#[tokio::test]
async fn employee_checklist_marks_assignments() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/employees/3/territories").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selected_ids(&body), vec!["30346", "31406"]);

    let (status, body) = server.get("/employees/999/territories").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn update_reconciles_to_the_selected_set() -> Result<()> {
    let server = TestServer::spawn().await?;

    // {30346, 31406} -> {31406, 01581}
    let res = server.put("/employees/3", &janet(checklist(&["31406", "01581"]))).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&body), vec!["01581", "31406"]);

    // Same set again leaves it unchanged
    let res = server.put("/employees/3", &janet(checklist(&["31406", "01581"]))).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, again) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&again), vec!["01581", "31406"]);
    Ok(())
}

#[tokio::test]
async fn round_trips_the_checklist_with_unselected_entries() -> Result<()> {
    let server = TestServer::spawn().await?;

    // Post the checklist back as the form does, with one entry toggled on and one off
    let (_, mut body) = server.get("/employees/3/territories").await?;
    for entry in body.as_array_mut().into_iter().flatten() {
        match entry["territoryId"].as_str() {
            Some("30346") => entry["isSelected"] = json!(false),
            Some("98104") => entry["isSelected"] = json!(true),
            _ => {}
        }
    }
    let res = server.put("/employees/3", &janet(body)).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, after) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&after), vec!["31406", "98104"]);
    Ok(())
}

#[tokio::test]
async fn duplicates_collapse_and_empty_selection_clears() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .put("/employees/3", &janet(checklist(&["02116", "02116", "02139"])))
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&body), vec!["02116", "02139"]);

    let res = server.put("/employees/3", &janet(json!([]))).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get("/employees/3/territories").await?;
    assert!(selected_ids(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn omitted_territories_leave_assignments_alone() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .put(
            "/employees/3",
            &json!({ "lastName": "Leverling", "firstName": "Janet", "title": "Sales Representative" }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&body), vec!["30346", "31406"]);
    Ok(())
}

#[tokio::test]
async fn unknown_territory_rejects_the_whole_write() -> Result<()> {
    let server = TestServer::spawn().await?;

    let mut payload = janet(checklist(&["31406", "99999"]));
    payload["title"] = json!("Changed Title");
    let res = server.put("/employees/3", &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["territories"].is_string(), "body: {}", body);

    let (_, territories) = server.get("/employees/3/territories").await?;
    assert_eq!(selected_ids(&territories), vec!["30346", "31406"]);
    let (_, employee) = server.get("/employees/3").await?;
    assert_eq!(employee["title"], "Sales Representative");
    Ok(())
}

#[tokio::test]
async fn create_assigns_selected_territories() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post(
            "/employees",
            &json!({
                "lastName": "Ames",
                "firstName": "Pat",
                "title": "Sales Representative",
                "territories": [
                    { "territoryID": "98004", "isSelected": true },
                    { "territoryID": "98052", "isSelected": false },
                ],
            }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["employeeId"].as_i64().unwrap_or_default();

    let (_, body) = server.get(&format!("/employees/{}/territories", id)).await?;
    assert_eq!(selected_ids(&body), vec!["98004"]);
    Ok(())
}

#[tokio::test]
async fn delete_removes_assignments() -> Result<()> {
    let server = TestServer::spawn().await?;

    assert_eq!(server.delete("/employees/3").await?, StatusCode::NO_CONTENT);
    let (status, _) = server.get("/employees/3/territories").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
