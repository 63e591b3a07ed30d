use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use logistic_core::chart::Figure;
use logistic_core::params::{RawParams, RawValue};
use logistic_core::reference::{self, ReferenceSeries};
use logistic_core::{Dashboard, DashboardConfig};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dashboard: Arc::new(Dashboard::new(config)),
        }
    }
}

/// Query string of the figure endpoint. Every value arrives as text; an
/// absent key is an empty input field.
#[derive(Debug, Default, Deserialize)]
pub struct FigureQuery {
    pub r_sac: Option<String>,
    pub k_sac: Option<String>,
    pub r_sch: Option<String>,
    pub k_sch: Option<String>,
}

impl From<FigureQuery> for RawParams {
    fn from(query: FigureQuery) -> Self {
        RawParams {
            r_sac: query.r_sac.map(RawValue::Text),
            k_sac: query.k_sac.map(RawValue::Text),
            r_sch: query.r_sch.map(RawValue::Text),
            k_sch: query.k_sch.map(RawValue::Text),
        }
    }
}

/// Ensures the prefix starts and ends with a single `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

pub fn router(state: AppState, prefix: &str) -> Router {
    let prefix = normalize_prefix(prefix);
    Router::new()
        .route("/health", get(health))
        .route(&prefix, get(index))
        .route(&format!("{prefix}api/figure"), get(figure))
        .route(&format!("{prefix}api/reference"), get(reference_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn figure(State(state): State<AppState>, Query(query): Query<FigureQuery>) -> Json<Figure> {
    debug!(?query, "figure requested");
    let raw = RawParams::from(query);
    Json(state.dashboard.recompute(&raw))
}

async fn reference_data() -> Json<[ReferenceSeries; 2]> {
    Json(reference::ALL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logistic_core::grid::TimeGrid;

    fn small_state() -> AppState {
        AppState::new(DashboardConfig {
            grid: TimeGrid {
                start: 0.0,
                end: 141.0,
                samples: 1_000,
            },
            ..DashboardConfig::default()
        })
    }

    fn query(r_sac: Option<&str>, k_sac: Option<&str>) -> FigureQuery {
        FigureQuery {
            r_sac: r_sac.map(str::to_string),
            k_sac: k_sac.map(str::to_string),
            ..FigureQuery::default()
        }
    }

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/dash_logistica/"), "/dash_logistica/");
        assert_eq!(normalize_prefix("dash_logistica"), "/dash_logistica/");
        assert_eq!(normalize_prefix("//nested/app//"), "/nested/app/");
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("/"), "/");
    }

    #[test]
    fn router_builds_for_root_and_nested_prefixes() {
        let _ = router(small_state(), "/");
        let _ = router(small_state(), "/dash_logistica/");
    }

    #[test]
    fn query_values_become_text() {
        let raw = RawParams::from(query(Some("0.2"), None));
        assert_eq!(raw.r_sac, Some(RawValue::Text("0.2".to_string())));
        assert_eq!(raw.k_sac, None);
    }

    #[tokio::test]
    async fn figure_endpoint_applies_fallbacks() {
        let Json(figure) = figure(State(small_state()), Query(query(Some("abc"), Some("")))).await;
        assert_eq!(figure.data.len(), 4);
        // r_sac falls back to 0.1 and k_sac to 3.14.
        let sac = &figure.data[1].y;
        assert!((sac[sac.len() - 1] - 3.14).abs() < 1e-3);
        // Missing r_sch falls back to 0.
        assert!(figure.data[3].y.iter().all(|v| *v == 0.4636));
    }

    #[tokio::test]
    async fn figure_endpoint_serializes_undefined_curve_as_nulls() {
        let Json(figure) = figure(State(small_state()), Query(query(Some("0.2"), Some("0")))).await;
        let json = serde_json::to_value(&figure).expect("json");
        let fitted = json["data"][1]["y"].as_array().expect("array");
        assert_eq!(fitted.len(), 1_000);
        assert!(fitted.iter().all(|v| v.is_null()));
    }

    #[tokio::test]
    async fn static_endpoints_respond() {
        assert_eq!(health().await, "ok");
        let Html(page) = index().await;
        assert!(page.contains("r_sac"));
        assert!(page.contains("api/figure"));
        let Json(series) = reference_data().await;
        assert_eq!(series[0].times.len(), 14);
    }
}
