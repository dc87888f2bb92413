//! HTTP API tests
//!
//! Requests go through the full router, middleware included, via
//! `tower::ServiceExt::oneshot`.

use std::str::FromStr;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use interface_api::{config::ApiConfig, create_router, AppState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(ApiConfig::default()).unwrap())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_check() {
        let (status, body) = get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_unsupported_default_year_is_rejected() {
        let config = ApiConfig {
            default_tax_year: "2019-20".to_string(),
            ..ApiConfig::default()
        };
        assert!(AppState::new(config).is_err());
    }
}

mod paye {
    use super::*;

    #[tokio::test]
    async fn test_basic_rate_calculation() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({ "annual_salary": "50000", "tax_code": "1257L" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tax_year"], "2024-25");
        assert_eq!(body["basis"], "cumulative");
        let summary = &body["annual_summary"];
        assert_eq!(decimal(&summary["total_income_tax"]), dec!(7486));
        assert_eq!(decimal(&summary["total_national_insurance"]), dec!(2994.40));
        assert_eq!(decimal(&summary["net_annual"]), dec!(39519.60));
        assert_eq!(body["monthly_breakdown"].as_array().unwrap().len(), 12);
        assert_eq!(decimal(&body["marginal_rate"]), dec!(20));
        assert!(!body["tax_code_description"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_named_year_and_period() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({
                "annual_salary": "40000",
                "tax_code": "S1257L",
                "is_cumulative": false,
                "period": { "type": "month", "number": 3 },
                "tax_year": "2025/26"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tax_year"], "2025-26");
        assert_eq!(body["basis"], "non_cumulative");
        assert_eq!(body["monthly_breakdown"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_salary_is_rejected() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({ "annual_salary": "0", "tax_code": "1257L" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_malformed_code_is_rejected() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({ "annual_salary": "30000", "tax_code": "12570L" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("12570L"));
    }

    #[tokio::test]
    async fn test_out_of_range_period_is_rejected() {
        let (status, _) = post(
            "/api/v1/paye/calculate",
            json!({
                "annual_salary": "30000",
                "tax_code": "1257L",
                "period": { "type": "week", "number": 60 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_overlong_tax_year_is_rejected() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({ "annual_salary": "30000", "tax_code": "1257L", "tax_year": "2147483647" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_year_is_not_found() {
        let (status, body) = post(
            "/api/v1/paye/calculate",
            json!({ "annual_salary": "30000", "tax_code": "1257L", "tax_year": "2030-31" }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}

mod tax_codes {
    use super::*;

    #[tokio::test]
    async fn test_describe_scottish_code() {
        let (status, body) = get("/api/v1/tax-codes/S1257L").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["descriptor"]["region"], "scotland");
        assert!(body.get("validation_error").is_none());
    }

    #[tokio::test]
    async fn test_describe_emergency_code() {
        let (status, body) = get("/api/v1/tax-codes/1257L%20M1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["descriptor"]["is_non_cumulative"], true);
    }

    #[tokio::test]
    async fn test_malformed_code_still_described() {
        let (status, body) = get("/api/v1/tax-codes/12570L").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], false);
        assert!(body["validation_error"].is_string());
    }

    #[tokio::test]
    async fn test_describe_with_named_year() {
        let (status, body) = get("/api/v1/tax-codes/1257L?tax_year=2025-26").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], true);
    }

    #[tokio::test]
    async fn test_overlong_tax_year_query_is_rejected() {
        let (status, body) = get("/api/v1/tax-codes/1257L?tax_year=2147483647").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unparseable_tax_year_query_is_not_found() {
        let (status, body) = get("/api/v1/tax-codes/1257L?tax_year=9999-00").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, _) = get("/api/v1/tax-codes/1257L?tax_year=abcd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_tax_years() {
        let (status, body) = get("/api/v1/tax-years").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["default_tax_year"], "2024-25");
        let years: Vec<&str> = body["tax_years"]
            .as_array()
            .unwrap()
            .iter()
            .map(|year| year["tax_year"].as_str().unwrap())
            .collect();
        assert_eq!(years, vec!["2024-25", "2025-26"]);
        assert_eq!(body["tax_years"][0]["is_default"], true);
    }
}

mod salary {
    use super::*;

    #[tokio::test]
    async fn test_monthly_conversion() {
        let (status, body) = post(
            "/api/v1/salary/convert",
            json!({ "amount": "2500", "period": "monthly" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&body["yearly"]), dec!(30000));
        assert_eq!(decimal(&body["weekly"]), dec!(576.92));
        assert_eq!(decimal(&body["hours_per_week"]), dec!(40));
    }

    #[tokio::test]
    async fn test_zero_hours_rejected() {
        let (status, _) = post(
            "/api/v1/salary/convert",
            json!({ "amount": "15", "period": "hourly", "hours_per_week": "0" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod benefits {
    use super::*;

    #[tokio::test]
    async fn test_company_car_with_explicit_rate() {
        let (status, body) = post(
            "/api/v1/benefits/company-car",
            json!({
                "list_price": "30000",
                "co2_emissions": 54,
                "fuel_type": "petrol",
                "tax_rate": "20"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tax_year"], "2024-25");
        assert_eq!(body["appropriate_percentage"], 25);
        assert_eq!(decimal(&body["cash_equivalent"]), dec!(7500));
        assert_eq!(decimal(&body["tax_payable"]), dec!(1500));
    }

    #[tokio::test]
    async fn test_company_car_rate_from_salary() {
        let (status, body) = post(
            "/api/v1/benefits/company-car",
            json!({
                "list_price": "30000",
                "co2_emissions": 54,
                "fuel_type": "petrol",
                "annual_salary": "60000"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&body["tax_rate"]), dec!(40));
        assert_eq!(decimal(&body["tax_payable"]), dec!(3000));
    }

    #[tokio::test]
    async fn test_company_car_needs_a_rate() {
        let (status, body) = post(
            "/api/v1/benefits/company-car",
            json!({ "list_price": "30000", "co2_emissions": 54, "fuel_type": "petrol" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }
}

mod dates {
    use super::*;

    #[tokio::test]
    async fn test_working_days_in_january() {
        let (status, body) = post(
            "/api/v1/dates/working-days",
            json!({ "start_date": "2024-01-01", "end_date": "2024-01-31" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calendar_days"], 31);
        assert_eq!(body["working_days"], 22);
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected() {
        let (status, body) = post(
            "/api/v1/dates/working-days",
            json!({ "start_date": "2024-02-01", "end_date": "2024-01-01" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_overlong_range_is_rejected() {
        let (status, _) = post(
            "/api/v1/dates/working-days",
            json!({ "start_date": "2000-01-01", "end_date": "2024-01-01" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_add_working_days_over_christmas() {
        let (status, body) = post(
            "/api/v1/dates/add-working-days",
            json!({ "start_date": "2024-12-20", "days": 3 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-12-27");
    }

    #[tokio::test]
    async fn test_add_calendar_days() {
        let (status, body) = post(
            "/api/v1/dates/add-working-days",
            json!({
                "start_date": "2024-12-20",
                "days": 3,
                "exclude_weekends": false,
                "exclude_holidays": false
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-12-23");
    }
}
