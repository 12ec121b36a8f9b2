use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use mff_agents::company_research::{
    CompanyResearchAgent, GroqSummarizer, ResearchError, SearchProvider, Summarizer, TavilySearch,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn search(body: web::Json<Value>) -> HttpResponse {
    if body["api_key"] != "tvly-test" {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({
        "answer": "ignored",
        "results": [
            {
                "title": format!("Treffer zu {}", body["query"].as_str().unwrap_or_default()),
                "url": "https://www.sap.com",
                "content": "SAP ist ein Softwarekonzern aus Walldorf.",
                "score": 0.9
            }
        ]
    }))
}

async fn chat(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer gsk-test");
    if !authorized || body["response_format"]["type"] != "json_object" {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "```json\n{\"industry\": \"Software\", \"location\": \"Walldorf\", \"past_events\": null}\n```"
            }
        }]
    }))
}

async fn empty_chat() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "choices": [] }))
}

/// Local stand-in for the Tavily and Groq APIs
async fn start_server() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route("/search", web::post().to(search))
            .route("/chat", web::post().to(chat))
            .route("/empty-chat", web::post().to(empty_chat))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

fn tavily(base: &str, key: &str) -> TavilySearch {
    TavilySearch::new(key, Duration::from_secs(5))
        .unwrap()
        .with_endpoint(format!("{}/search", base))
}

fn groq(base: &str, key: &str, path: &str) -> GroqSummarizer {
    GroqSummarizer::new(key, "llama-3.3-70b-versatile", Duration::from_secs(5))
        .unwrap()
        .with_endpoint(format!("{}{}", base, path))
}

#[actix_web::test]
async fn test_tavily_results_are_parsed() {
    let base = start_server().await;

    let results = tavily(&base, "tvly-test").search("SAP SE Unternehmen").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Treffer zu SAP SE Unternehmen");
    assert_eq!(results[0].url, "https://www.sap.com");
}

#[actix_web::test]
async fn test_tavily_error_status() {
    let base = start_server().await;

    let err = tavily(&base, "wrong").search("SAP SE").await.unwrap_err();
    assert!(matches!(
        err,
        ResearchError::Status { service: "tavily", status: 401 }
    ));
}

#[actix_web::test]
async fn test_groq_completion_content_is_returned() {
    let base = start_server().await;

    let content = groq(&base, "gsk-test", "/chat")
        .summarize("system", "user")
        .await
        .unwrap();
    assert!(content.contains("\"industry\": \"Software\""));

    let err = groq(&base, "wrong", "/chat").summarize("system", "user").await.unwrap_err();
    assert!(matches!(err, ResearchError::Status { service: "groq", status: 401 }));
}

#[actix_web::test]
async fn test_groq_without_choices_is_invalid() {
    let base = start_server().await;

    let err = groq(&base, "gsk-test", "/empty-chat")
        .summarize("system", "user")
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::InvalidResponse(_)));
}

#[actix_web::test]
async fn test_agent_against_local_apis() {
    let base = start_server().await;
    let search: Arc<dyn SearchProvider> = Arc::new(tavily(&base, "tvly-test"));
    let summarizer: Arc<dyn Summarizer> = Arc::new(groq(&base, "gsk-test", "/chat"));
    let agent = CompanyResearchAgent::new(Some(search), Some(summarizer));

    let profile = agent.research("SAP SE").await.unwrap();
    assert_eq!(profile.industry.as_deref(), Some("Software"));
    assert_eq!(profile.location.as_deref(), Some("Walldorf"));
    assert!(profile.past_events.is_empty());
}
