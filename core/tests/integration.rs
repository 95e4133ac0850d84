//! End-to-end tests of `ApiClient` over real HTTP.
//!
//! # Design
//! Starts the mock server (or a small ad-hoc axum router for failure modes)
//! on a random port, then exercises every client operation with reqwest.
//! Validates that request building, transport and response parsing agree
//! with the server's actual schema.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use despesas_core::{ApiClient, ApiError, ClientConfig, ListOperadoras};
use tokio::net::TcpListener;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    addr
}

async fn start_mock_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    let config = ClientConfig::default().with_base_url(format!("http://{addr}/api"));
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn all_operations_against_mock_server() {
    let client = client_for(start_mock_server().await);

    // Step 1: list with defaults, no search.
    let page = client.fetch_operadoras(1, 10, "").await.unwrap();
    assert_eq!(page.total, 6);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    assert!(page.is_consistent());

    // Step 2: list with a search term.
    let page = client.fetch_operadoras(1, 10, "paulista").await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.data.iter().all(|op| op.uf == "SP"));

    // Step 3: second page echoes the request.
    let page = client
        .fetch_operadoras_with(&ListOperadoras {
            page: 2,
            limit: 4,
            ..ListOperadoras::default()
        })
        .await
        .unwrap();
    assert_eq!((page.page, page.limit, page.total_pages), (2, 4, 2));
    assert_eq!(page.data.len(), 2);

    // Step 4: single operadora.
    let op = client.fetch_operadora("11111111000111").await.unwrap();
    assert_eq!(op.razao_social, "Saude Paulista SA");
    assert_eq!(op.registro_ans.as_deref(), Some("300001"));

    // Step 5: expense history, newest quarter first.
    let despesas = client
        .fetch_operadora_despesas("11111111000111", 1, 2)
        .await
        .unwrap();
    assert_eq!(despesas.operadora.cnpj, "11111111000111");
    assert_eq!(despesas.pagination.total, 3);
    assert_eq!(despesas.pagination.total_pages, 2);
    assert_eq!(despesas.pagination.data[0].trimestre, 3);
    assert_eq!(despesas.pagination.data[0].valor_despesa, 200.0);
    assert_eq!(despesas.pagination.data[0].valor_ytd, Some(450.0));

    // Step 6: statistics.
    let stats = client.fetch_estatisticas().await.unwrap();
    assert_eq!(stats.resumo.total_despesas, 1490.0);
    assert_eq!(stats.top_5_operadoras.len(), 5);
    assert_eq!(stats.top_5_operadoras[0].cnpj, "22222222000122");

    // Step 7: complementary statistics.
    let extra = client.fetch_estatisticas_complementares().await.unwrap();
    assert_eq!(extra.top_5_crescimento[0].crescimento_percentual, 100.0);
    assert_eq!(extra.top_5_uf[0].uf, "SP");
    assert_eq!(extra.operadoras_acima_media.total, 2);
}

#[tokio::test]
async fn unknown_cnpj_is_not_found() {
    let client = client_for(start_mock_server().await);

    let err = client.fetch_operadora("00000000000000").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    let err = client
        .fetch_operadora_despesas("00000000000000", 1, 10)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn validation_error_is_propagated() {
    let client = client_for(start_mock_server().await);

    let err = client.fetch_operadoras(1, 500, "").await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains("limit"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_requests_share_one_client() {
    let client = client_for(start_mock_server().await);
    let cloned = client.clone();

    let (a, b, c) = tokio::join!(
        client.fetch_estatisticas(),
        client.fetch_operadora("33333333000133"),
        cloned.fetch_operadoras(1, 3, ""),
    );
    assert_eq!(a.unwrap().resumo.total_registros, 5);
    assert_eq!(b.unwrap().uf, "MG");
    assert_eq!(c.unwrap().data.len(), 3);
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let router = Router::new().route(
        "/api/estatisticas",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let client = client_for(serve(router).await);

    let err = client.fetch_estatisticas().await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn payload_is_returned_without_transformation() {
    let body = r#"{
        "data": [
            {"cnpj":"12345678000190","razao_social":"Saude Exemplo SA","registro_ans":"412345","modalidade":"Medicina de Grupo","uf":"SP"},
            {"cnpj":"98765432000110","razao_social":"Odonto Sul Ltda","registro_ans":null,"modalidade":null,"uf":"RS"}
        ],
        "total": 12, "page": 1, "limit": 10, "total_pages": 2
    }"#;
    let router = Router::new().route(
        "/api/operadoras",
        get(move || async move { ([("content-type", "application/json")], body) }),
    );
    let client = client_for(serve(router).await);

    let page = client.fetch_operadoras(1, 10, "").await.unwrap();
    let expected: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(serde_json::to_value(&page).unwrap(), expected);
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.fetch_estatisticas().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.is_timeout());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let router = Router::new().route(
        "/api/estatisticas",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    );
    let addr = serve(router).await;
    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}/api"))
        .with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(&config).unwrap();

    let err = client.fetch_estatisticas().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[test]
fn invalid_base_url_is_config_error() {
    let config = ClientConfig::default().with_base_url("localhost:8000/api");
    assert!(matches!(ApiClient::new(&config), Err(ApiError::Config(_))));
}
