// Unit tests for the Weaviate corpus backend against a mock GraphQL endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trendline::corpus::weaviate::WeaviateCorpus;
use trendline::corpus::{Corpus, CorpusSession};

fn corpus(server: &MockServer, api_key: &str) -> WeaviateCorpus {
    WeaviateCorpus::new(&server.uri(), api_key, "Papers", Duration::from_secs(5)).unwrap()
}

fn papers_body() -> serde_json::Value {
    json!({
        "data": {
            "Get": {
                "Papers": [
                    {
                        "title": "Diffusion models for video",
                        "abstract": "We denoise frames.",
                        "summary": null,
                        "year": 2024,
                        "venue": "ICLR",
                        "_additional": {"id": "0b7f6c1e-1"}
                    },
                    {
                        "title": "Graph transformers",
                        "abstract": "Attention over edges.",
                        "summary": "Short summary.",
                        "year": 2024,
                        "venue": "NeurIPS",
                        "_additional": {"id": "0b7f6c1e-2"}
                    }
                ]
            }
        }
    })
}

#[tokio::test]
async fn fetch_by_year_maps_objects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(papers_body()))
        .expect(1)
        .mount(&server)
        .await;

    let papers = corpus(&server, "").fetch_by_year(2024, 100).await.unwrap();
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].id, "0b7f6c1e-1");
    assert_eq!(papers[0].summary, "");
    assert_eq!(papers[1].venue, "NeurIPS");
    assert_eq!(
        papers[1].document_text(),
        "Graph transformers Attention over edges. Short summary."
    );
}

#[tokio::test]
async fn api_key_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .and(header("authorization", "Bearer secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(papers_body()))
        .expect(1)
        .mount(&server)
        .await;

    let papers = corpus(&server, "secret-key").fetch_by_year(2024, 100).await.unwrap();
    assert_eq!(papers.len(), 2);
}

#[tokio::test]
async fn graphql_errors_are_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"Get": {"Papers": null}},
            "errors": [{"message": "Cannot query field \"summary\""}]
        })))
        .mount(&server)
        .await;

    let err = corpus(&server, "").fetch_by_year(2024, 100).await.unwrap_err();
    assert!(err.to_string().contains("Cannot query field"));
}

#[tokio::test]
async fn server_error_becomes_empty_year_in_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(corpus(&server, "").fetch_by_year(2024, 100).await.is_err());

    let session = CorpusSession::new(Box::new(corpus(&server, "")), 100);
    assert!(session.papers_for_year(2024).await.is_empty());
    session.close().await.unwrap();
}
