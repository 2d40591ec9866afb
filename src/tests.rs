#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    async fn test_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    /// Creates an account and returns its id.
    async fn create_account(server: &TestServer, name: &str, kind: &str, balance_cents: i64) -> i64 {
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({
                "name": name,
                "kind": kind,
                "balance_cents": balance_cents,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    /// Creates a credit account with a billing cycle and returns its id.
    async fn create_credit_account(server: &TestServer, closing_day: i32, due_day: i32) -> i64 {
        let response = server
            .post("/api/v1/accounts")
            .json(&json!({
                "name": "Family card",
                "kind": "Credit",
                "limit_cents": 500_000,
                "closing_day": closing_day,
                "due_day": due_day,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn account_balance(server: &TestServer, account_id: i64) -> i64 {
        let response = server.get(&format!("/api/v1/accounts/{}", account_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["balance_cents"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({
                "name": "Checking",
                "kind": "Checking",
                "balance_cents": 250_000,
                "color": "#3b82f6",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["name"], "Checking");
        assert_eq!(body.data["kind"], "Checking");
        assert_eq!(body.data["balance_cents"], 250_000);

        let account_id = body.data["id"].as_i64().unwrap();
        let response = server.get(&format!("/api/v1/accounts/{}", account_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["color"], "#3b82f6");
    }

    #[tokio::test]
    async fn test_account_rejects_out_of_range_cycle_days() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/accounts")
            .json(&json!({
                "name": "Bad card",
                "kind": "Credit",
                "closing_day": 40,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let account_id = create_account(&server, "Card", "Credit", 0).await;
        let response = server
            .put(&format!("/api/v1/accounts/{}", account_id))
            .json(&json!({ "due_day": 0 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_category() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Groceries", "color": "#22c55e" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Groceries");

        let parent_id = body.data["id"].as_i64().unwrap();
        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Produce", "parent_id": parent_id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["parent_id"].as_i64().unwrap(), parent_id);
    }

    #[tokio::test]
    async fn test_settle_and_reopen_apply_the_balance() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 100_000).await;

        // A pending expense does not move the balance.
        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Electricity",
                "amount_cents": 5_000,
                "date": "2024-03-10",
                "kind": "Expense",
                "account_id": account_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        // Expenses are normalized to negative cents at rest.
        assert_eq!(body.data["amount_cents"], -5_000);
        assert_eq!(body.data["status"], "Pending");
        let tx_id = body.data["id"].as_i64().unwrap();
        assert_eq!(account_balance(&server, account_id).await, 100_000);

        // Settling applies the amount.
        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", tx_id))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(account_balance(&server, account_id).await, 95_000);

        // Settling twice is rejected.
        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", tx_id))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Reopening takes the amount back.
        let response = server
            .post(&format!("/api/v1/transactions/{}/reopen", tx_id))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(account_balance(&server, account_id).await, 100_000);
    }

    #[tokio::test]
    async fn test_completed_transaction_applies_balance_on_creation() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Salary",
                "amount_cents": 300_000,
                "date": "2024-03-01",
                "kind": "Income",
                "status": "Completed",
                "account_id": account_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(account_balance(&server, account_id).await, 300_000);
    }

    #[tokio::test]
    async fn test_transfer_creates_two_linked_legs() {
        let server = test_server().await;
        let checking = create_account(&server, "Checking", "Checking", 10_000).await;
        let savings = create_account(&server, "Savings", "Savings", 0).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Monthly savings",
                "amount_cents": 2_500,
                "date": "2024-03-05",
                "kind": "Transfer",
                "status": "Completed",
                "account_id": checking,
                "to_account_id": savings,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let out_leg = &body.data;
        assert_eq!(out_leg["amount_cents"], -2_500);
        assert_eq!(out_leg["account_id"].as_i64().unwrap(), checking);
        assert_eq!(out_leg["to_account_id"].as_i64().unwrap(), savings);
        let in_leg_id = out_leg["linked_transaction_id"].as_i64().unwrap();

        // The incoming leg mirrors the outgoing one.
        let response = server
            .get(&format!("/api/v1/transactions/{}", in_leg_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["amount_cents"], 2_500);
        assert_eq!(body.data["account_id"].as_i64().unwrap(), savings);
        assert_eq!(
            body.data["linked_transaction_id"].as_i64().unwrap(),
            out_leg["id"].as_i64().unwrap()
        );

        // Both balances moved.
        assert_eq!(account_balance(&server, checking).await, 7_500);
        assert_eq!(account_balance(&server, savings).await, 2_500);
    }

    #[tokio::test]
    async fn test_transfer_requires_destination_account() {
        let server = test_server().await;
        let checking = create_account(&server, "Checking", "Checking", 0).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Nowhere",
                "amount_cents": 1_000,
                "date": "2024-03-05",
                "kind": "Transfer",
                "account_id": checking,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "MISSING_TO_ACCOUNT");
    }

    /// Creates a fixed definition and returns its id.
    async fn create_fixed(server: &TestServer, account_id: i64, date: &str, amount_cents: i64) -> i64 {
        let response = server
            .post("/api/v1/fixed")
            .json(&json!({
                "description": "Rent",
                "amount_cents": amount_cents,
                "kind": "Expense",
                "date": date,
                "account_id": account_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["is_fixed"], true);
        body.data["id"].as_i64().unwrap()
    }

    /// Generates occurrences and returns the created rows.
    async fn generate(server: &TestServer, definition_id: i64, months: u32) -> Vec<serde_json::Value> {
        let response = server
            .post(&format!("/api/v1/fixed/{}/generate", definition_id))
            .json(&json!({ "months": months }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        body.data
    }

    #[tokio::test]
    async fn test_fixed_generation_clamps_and_resumes() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-31", 150_000).await;

        // Day-31 definition: February clamps, March recovers.
        let rows = generate(&server, definition_id, 2).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-02-29");
        assert_eq!(rows[1]["date"], "2024-03-31");
        for row in &rows {
            assert_eq!(row["status"], "Pending");
            assert_eq!(row["is_fixed"], false);
            assert_eq!(
                row["parent_transaction_id"].as_i64().unwrap(),
                definition_id
            );
            assert_eq!(row["amount_cents"], -150_000);
        }

        // A second call resumes after the latest child instead of
        // duplicating covered months.
        let rows = generate(&server, definition_id, 1).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["date"], "2024-04-30");

        let response = server
            .get(&format!(
                "/api/v1/transactions?parent_transaction_id={}",
                definition_id
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 3);
    }

    #[tokio::test]
    async fn test_generate_rejects_non_fixed_transactions() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "One-off",
                "amount_cents": 1_000,
                "date": "2024-03-01",
                "kind": "Expense",
                "account_id": account_id,
            }))
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let tx_id = body.data["id"].as_i64().unwrap();

        let response = server
            .post(&format!("/api/v1/fixed/{}/generate", tx_id))
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "NOT_A_FIXED_TRANSACTION");
    }

    #[tokio::test]
    async fn test_scoped_delete_preserves_completed_rows() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;
        let rows = generate(&server, definition_id, 3).await;
        let feb_id = rows[0]["id"].as_i64().unwrap();

        // Settle February.
        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", feb_id))
            .await;
        response.assert_status(StatusCode::OK);

        // Delete the (pending) principal and everything remaining.
        let response = server
            .delete(&format!(
                "/api/v1/transactions/{}?scope=current-and-remaining",
                definition_id
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let deleted = body.data["deleted"].as_array().unwrap();
        assert_eq!(deleted.len(), 3); // principal + March + April
        assert!(body.data["detached"].as_array().unwrap().is_empty());

        // The settled February occurrence survives.
        let response = server
            .get(&format!("/api/v1/transactions/{}", feb_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["status"], "Completed");

        // The principal itself is gone.
        let response = server
            .get(&format!("/api/v1/transactions/{}", definition_id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleting_a_settled_principal_detaches_it() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;
        generate(&server, definition_id, 2).await;

        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", definition_id))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .delete(&format!(
                "/api/v1/transactions/{}?scope=current",
                definition_id
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(
            body.data["detached"].as_array().unwrap()[0]
                .as_i64()
                .unwrap(),
            definition_id
        );
        assert!(body.data["deleted"].as_array().unwrap().is_empty());

        // The row remains in history as a plain transaction.
        let response = server
            .get(&format!("/api/v1/transactions/{}", definition_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["is_fixed"], false);
        assert_eq!(body.data["status"], "Completed");
    }

    #[tokio::test]
    async fn test_delete_all_removes_settled_rows_too() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;
        let rows = generate(&server, definition_id, 2).await;
        let feb_id = rows[0]["id"].as_i64().unwrap();

        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", feb_id))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(account_balance(&server, account_id).await, -10_000);

        let response = server
            .delete(&format!("/api/v1/transactions/{}?scope=all", definition_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["deleted"].as_array().unwrap().len(), 3);

        // The settled row's amount was reverted when it was removed.
        assert_eq!(account_balance(&server, account_id).await, 0);

        let response = server
            .get(&format!("/api/v1/transactions/{}", feb_id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_scoped_edit_spares_completed_siblings() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;
        let rows = generate(&server, definition_id, 3).await;
        let feb_id = rows[0]["id"].as_i64().unwrap();
        let mar_id = rows[1]["id"].as_i64().unwrap();
        let apr_id = rows[2]["id"].as_i64().unwrap();

        let response = server
            .post(&format!("/api/v1/transactions/{}/settle", feb_id))
            .await;
        response.assert_status(StatusCode::OK);

        // Raise the rent from March onward.
        let response = server
            .put(&format!(
                "/api/v1/transactions/{}?scope=current-and-remaining",
                mar_id
            ))
            .json(&json!({ "amount_cents": 12_000 }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let mutated: Vec<i64> = body.data["mutated"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        assert!(mutated.contains(&mar_id));
        assert!(mutated.contains(&apr_id));
        assert!(!mutated.contains(&feb_id));

        // The settled February row kept its amount.
        let response = server
            .get(&format!("/api/v1/transactions/{}", feb_id))
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["amount_cents"], -10_000);

        let response = server
            .get(&format!("/api/v1/transactions/{}", apr_id))
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["amount_cents"], -12_000);
    }

    #[tokio::test]
    async fn test_invalid_scope_is_rejected() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;

        let response = server
            .delete(&format!(
                "/api/v1/transactions/{}?scope=everything",
                definition_id
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_SCOPE");
    }

    #[tokio::test]
    async fn test_dangling_parent_resolves_to_the_target_alone() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;
        let definition_id = create_fixed(&server, account_id, "2024-01-05", 10_000).await;
        let rows = generate(&server, definition_id, 2).await;
        let feb_id = rows[0]["id"].as_i64().unwrap();
        let mar_id = rows[1]["id"].as_i64().unwrap();

        // Remove the (pending) principal alone, leaving the children with a
        // dangling parent link.
        let response = server
            .delete(&format!(
                "/api/v1/transactions/{}?scope=current",
                definition_id
            ))
            .await;
        response.assert_status(StatusCode::OK);

        // Scope resolution on an orphan degrades to the orphan itself, even
        // under scope=all.
        let response = server
            .delete(&format!("/api/v1/transactions/{}?scope=all", feb_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let deleted = body.data["deleted"].as_array().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].as_i64().unwrap(), feb_id);

        // The sibling orphan was not swept.
        let response = server
            .get(&format!("/api/v1/transactions/{}", mar_id))
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_installment_purchase_splits_and_links() {
        let server = test_server().await;
        let card = create_credit_account(&server, 20, 10).await;

        let response = server
            .post("/api/v1/installments")
            .json(&json!({
                "description": "Washing machine",
                "total_cents": 10_000,
                "installments": 3,
                "first_date": "2024-01-31",
                "account_id": card,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        let rows = body.data;
        assert_eq!(rows.len(), 3);

        // Remainder cents land on the first installment; the series sums
        // exactly to the total.
        assert_eq!(rows[0]["amount_cents"], -3_334);
        assert_eq!(rows[1]["amount_cents"], -3_333);
        assert_eq!(rows[2]["amount_cents"], -3_333);

        assert_eq!(rows[0]["date"], "2024-01-31");
        assert_eq!(rows[1]["date"], "2024-02-29");
        assert_eq!(rows[2]["date"], "2024-03-31");

        let principal_id = rows[0]["id"].as_i64().unwrap();
        assert!(rows[0]["parent_transaction_id"].is_null());
        assert_eq!(rows[0]["installment_number"], 1);
        assert_eq!(rows[0]["installment_count"], 3);
        for row in &rows[1..] {
            assert_eq!(
                row["parent_transaction_id"].as_i64().unwrap(),
                principal_id
            );
            assert_eq!(row["installment_count"], 3);
        }
        assert_eq!(rows[1]["description"], "Washing machine (2/3)");
    }

    #[tokio::test]
    async fn test_invoice_cycle_classification() {
        let server = test_server().await;
        let checking = create_account(&server, "Checking", "Checking", 100_000).await;
        let card = create_credit_account(&server, 20, 10).await;

        // A purchase inside the March cycle window.
        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Supermarket",
                "amount_cents": 50_000,
                "date": "2024-03-15",
                "kind": "Expense",
                "account_id": card,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("/api/v1/accounts/{}/invoice?year=2024&month=3", card))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let invoice = &body.data;
        // Due day 10 precedes closing day 20, so the due date wraps into
        // April.
        assert_eq!(invoice["closing_date"], "2024-03-20");
        assert_eq!(invoice["due_date"], "2024-04-10");
        assert_eq!(invoice["is_closed"], true);
        assert_eq!(invoice["is_paid"], false);
        assert_eq!(invoice["bill_cents"], 50_000);
        assert_eq!(invoice["amount_due_cents"], 50_000);

        // Pay the invoice: a transfer into the card between closing and due
        // date.
        let response = server
            .post("/api/v1/transactions")
            .json(&json!({
                "description": "Card payment",
                "amount_cents": 50_000,
                "date": "2024-04-05",
                "kind": "Transfer",
                "status": "Completed",
                "account_id": checking,
                "to_account_id": card,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .get(&format!("/api/v1/accounts/{}/invoice?year=2024&month=3", card))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["is_paid"], true);
        assert_eq!(body.data["payments_cents"], 50_000);
    }

    #[tokio::test]
    async fn test_invoice_requires_a_credit_account() {
        let server = test_server().await;
        let checking = create_account(&server, "Checking", "Checking", 0).await;

        let response = server
            .get(&format!("/api/v1/accounts/{}/invoice", checking))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "NOT_A_CREDIT_ACCOUNT");
    }

    #[tokio::test]
    async fn test_monthly_statistics_summary() {
        let server = test_server().await;
        let account_id = create_account(&server, "Checking", "Checking", 0).await;

        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Groceries" }))
            .await;
        let body: ApiResponse<serde_json::Value> = response.json();
        let category_id = body.data["id"].as_i64().unwrap();

        for (description, amount, kind, status, category) in [
            ("Salary", 300_000_i64, "Income", "Completed", None),
            ("Groceries", 120_050, "Expense", "Completed", Some(category_id)),
            ("Internet", 45_000, "Expense", "Pending", None),
        ] {
            let response = server
                .post("/api/v1/transactions")
                .json(&json!({
                    "description": description,
                    "amount_cents": amount,
                    "date": "2024-03-10",
                    "kind": kind,
                    "status": status,
                    "account_id": account_id,
                    "category_id": category,
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(&format!(
                "/api/v1/accounts/{}/statistics?year=2024&month=3",
                account_id
            ))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let summary = &body.data;
        assert_eq!(summary["income_cents"], 300_000);
        assert_eq!(summary["expense_cents"], -120_050);
        assert_eq!(summary["net_cents"], 179_950);
        assert_eq!(summary["pending_cents"], -45_000);

        let groceries = summary["by_category"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["category_id"].as_i64() == Some(category_id))
            .unwrap();
        assert_eq!(groceries["category_name"], "Groceries");
        assert_eq!(groceries["total_cents"], -120_050);
    }
}
