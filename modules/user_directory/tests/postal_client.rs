//! HTTP postal adapter against a mock ViaCEP server.

use std::time::Duration;

use httpmock::prelude::*;
use url::Url;

use user_directory::domain::ports::PostalLookup;
use user_directory::domain::postal::PostalLookupError;
use user_directory::infra::postal::HttpPostalClient;

fn client_for(server: &MockServer, timeout: Duration) -> HttpPostalClient {
    let base = Url::parse(&server.url("/ws")).unwrap();
    HttpPostalClient::new(base, timeout).unwrap()
}

#[tokio::test]
async fn decodes_a_hit() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET).path("/ws/01310100/json/");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "complemento": "de 612 a 1510 - lado par",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP",
                "ibge": "3550308",
                "ddd": "11"
            }));
    });

    let client = client_for(&server, Duration::from_secs(2));
    let address = client.lookup("01310-100").await.unwrap();
    m.assert();

    assert_eq!(address.postal_code, "01310-100");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
    assert_eq!(address.ddd, "11");
    assert_eq!(
        address.address_line(),
        "Avenida Paulista - Bela Vista - São Paulo/SP"
    );
}

#[tokio::test]
async fn erro_flag_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/00000000/json/");
        then.status(200).json_body(serde_json::json!({"erro": true}));
    });

    let client = client_for(&server, Duration::from_secs(2));
    assert_eq!(client.lookup("00000000").await, Err(PostalLookupError::NotFound));
    assert_eq!(client.lookup_optional("00000000").await, None);
}

#[tokio::test]
async fn server_errors_are_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/12345678/json/");
        then.status(503);
    });

    let client = client_for(&server, Duration::from_secs(2));
    assert!(matches!(
        client.lookup("12345678").await,
        Err(PostalLookupError::Unavailable(_))
    ));
    assert_eq!(client.lookup_optional("12345678").await, None);
}

#[tokio::test]
async fn garbage_body_is_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/12345678/json/");
        then.status(200).body("<html>oops</html>");
    });

    let client = client_for(&server, Duration::from_secs(2));
    assert!(matches!(
        client.lookup("12345678").await,
        Err(PostalLookupError::Unavailable(_))
    ));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ws/12345678/json/");
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(serde_json::json!({"cep": "12345-678"}));
    });

    let client = client_for(&server, Duration::from_millis(50));
    assert!(matches!(
        client.lookup("12345678").await,
        Err(PostalLookupError::Unavailable(_))
    ));
}

#[tokio::test]
async fn invalid_code_never_hits_the_server() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let client = client_for(&server, Duration::from_secs(2));
    assert_eq!(
        client.lookup("1234-567").await,
        Err(PostalLookupError::InvalidPostalCode)
    );
    m.assert_hits(0);
}
