use async_trait::async_trait;
use job_extract::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const POSTING: &str = "We are hiring a Senior Python Developer at Acme Inc in Austin, TX. \
                       Requirements: Python, Django, AWS. \
                       Salary: $100,000-$130,000 per year. Full-time. \
                       5+ years experience. Contact: jobs@acme.com";

struct StubRemote(RemoteJobData);

#[async_trait]
impl RemoteExtractor for StubRemote {
    async fn extract(&self, _text: &str) -> std::result::Result<RemoteJobData, RemoteError> {
        Ok(self.0.clone())
    }
}

struct FailingRemote(u16);

#[async_trait]
impl RemoteExtractor for FailingRemote {
    async fn extract(&self, _text: &str) -> std::result::Result<RemoteJobData, RemoteError> {
        Err(RemoteError::Status(self.0))
    }
}

fn with_remote(remote: impl RemoteExtractor + 'static) -> JobExtractor {
    JobExtractor::with_remote(FieldExtractors::shared().clone(), Arc::new(remote))
}

fn with_url(url: String, timeout: Duration) -> JobExtractor {
    JobExtractor::new(&ExtractorConfig {
        ai_service_url: Some(url),
        ai_service_timeout: timeout,
        ..ExtractorConfig::default()
    })
    .unwrap()
}

/// Serve one canned HTTP response after reading the full request
async fn serve_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request(&mut socket).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/extract")
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let Ok(n) = socket.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}

fn http_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

// --- Local pipeline ---

#[test]
fn test_local_posting_scenario() {
    let result = JobExtractor::local_only().extract_local(POSTING);

    assert!(
        result
            .job_title
            .as_deref()
            .unwrap()
            .contains("Senior Python Developer")
    );
    assert_eq!(result.company_name.as_deref(), Some("Acme Inc"));
    assert_eq!(result.location.as_deref(), Some("Austin, TX"));
    assert!(result.required_skills.contains(&"Python".to_string()));
    assert!(result.required_skills.contains(&"AWS".to_string()));
    assert_eq!(
        result.salary_range.as_deref(),
        Some("$100,000-$130,000 per year")
    );
    assert_eq!(result.job_type.as_deref(), Some("Full-time"));
    assert_eq!(
        result.experience_level.as_deref(),
        Some("5+ years experience")
    );
    assert_eq!(result.email.as_deref(), Some("jobs@acme.com"));
    assert_eq!(result.domain.as_deref(), Some("acme.com"));
    assert_eq!(result.confidence_score, MAX_SCORE);
}

#[test]
fn test_local_empty_text() {
    let result = JobExtractor::local_only().extract_local("");

    assert!(result.is_empty());
    assert!(result.job_title.is_none());
    assert!(result.company_name.is_none());
    assert!(result.location.is_none());
    assert!(result.required_skills.is_empty());
    assert!(result.salary_range.is_none());
    assert!(result.job_type.is_none());
    assert!(result.experience_level.is_none());
    assert!(result.email.is_none());
    assert!(result.domain.is_none());
    assert_eq!(result.confidence_score, 0.5);
}

#[test]
fn test_local_is_idempotent() {
    let extractor = JobExtractor::local_only();
    let first = extractor.extract_local(POSTING);
    let second = extractor.extract_local(POSTING);

    assert!(first.same_fields(&second));
}

#[test]
fn test_local_uses_normalized_text_for_contact() {
    let text = "From: recruiter@agency.com\nSubject: Role\nPosition: QA Analyst\nRegards,\nsig@agency.com";
    let result = JobExtractor::local_only().extract_local(text);

    assert_eq!(result.job_title.as_deref(), Some("QA Analyst"));
    assert!(result.email.is_none());
    assert!(result.domain.is_none());
}

#[test]
fn test_domain_invariant() {
    let extractor = JobExtractor::local_only();
    for text in [POSTING, "", "write to a.b+c@mail.example.org", "no contact"] {
        let result = extractor.extract_local(text);
        match (&result.email, &result.domain) {
            (Some(email), Some(domain)) => {
                assert_eq!(email.split('@').nth(1), Some(domain.as_str()));
            }
            (None, None) => {}
            other => panic!("email/domain mismatch: {other:?}"),
        }
        assert!(result.confidence_score >= BASE_SCORE);
        assert!(result.confidence_score <= MAX_SCORE);
    }
}

#[test]
fn test_custom_gazetteer_through_config() {
    let config = ExtractorConfig {
        gazetteer: Gazetteer::from_codes(["ON"]),
        ..ExtractorConfig::local_only()
    };
    let extractor = JobExtractor::new(&config).unwrap();
    let result = extractor.extract_local("Hiring in Ottawa, ON now");

    assert_eq!(result.location.as_deref(), Some("Ottawa, ON"));
}

// --- Delegation ---

#[test]
fn test_disabled_remote_runs_local() {
    let extractor = JobExtractor::local_only();
    let result = tokio_test::block_on(extractor.extract_job_info(POSTING)).unwrap();

    assert!(result.same_fields(&extractor.extract_local(POSTING)));
}

#[tokio::test]
async fn test_remote_success_maps_payload() {
    let extractor = with_remote(StubRemote(RemoteJobData {
        job_title: Some(" Data Engineer ".into()),
        company_name: Some("Globex".into()),
        location: Some(String::new()),
        required_skills: Some(vec!["Spark".into(), "Spark".into(), "Scala".into()]),
        min_salary: Some(json!(90000)),
        max_salary: Some(json!("120000")),
        job_type: None,
        seniority_level: Some("Mid".into()),
    }));
    let text = "From: hr@globex.com\nWe need help";

    let result = extractor.extract_job_info(text).await.unwrap();

    assert_eq!(result.job_title.as_deref(), Some("Data Engineer"));
    assert_eq!(result.company_name.as_deref(), Some("Globex"));
    assert!(result.location.is_none());
    assert_eq!(result.required_skills, ["Spark", "Scala"]);
    assert_eq!(result.salary_range.as_deref(), Some("90000-120000"));
    assert!(result.job_type.is_none());
    assert_eq!(result.experience_level.as_deref(), Some("Mid"));
    assert_eq!(result.confidence_score, REMOTE_CONFIDENCE);
    // Contact fields come from the raw text, headers included
    assert_eq!(result.email.as_deref(), Some("hr@globex.com"));
    assert_eq!(result.domain.as_deref(), Some("globex.com"));
}

#[tokio::test]
async fn test_remote_salary_needs_both_bounds() {
    let extractor = with_remote(StubRemote(RemoteJobData {
        min_salary: Some(json!(50000)),
        max_salary: Some(json!(0)),
        ..RemoteJobData::default()
    }));

    let result = extractor.extract_job_info("text").await.unwrap();

    assert!(result.salary_range.is_none());
    assert_eq!(result.confidence_score, REMOTE_CONFIDENCE);
}

#[tokio::test]
async fn test_remote_salary_integral_floats() {
    let extractor = with_remote(StubRemote(RemoteJobData {
        min_salary: Some(json!(1e5)),
        max_salary: Some(json!(120_000.0)),
        ..RemoteJobData::default()
    }));

    let result = extractor.extract_job_info("text").await.unwrap();

    assert_eq!(result.salary_range.as_deref(), Some("100000-120000"));
}

#[tokio::test]
async fn test_remote_salary_zero_string_is_present() {
    let extractor = with_remote(StubRemote(RemoteJobData {
        min_salary: Some(json!("0")),
        max_salary: Some(json!(55_000.5)),
        ..RemoteJobData::default()
    }));

    let result = extractor.extract_job_info("text").await.unwrap();

    assert_eq!(result.salary_range.as_deref(), Some("0-55000.5"));
}

#[tokio::test]
async fn test_remote_failure_matches_local() {
    let extractor = with_remote(FailingRemote(503));

    let result = extractor.extract_job_info(POSTING).await.unwrap();

    assert!(result.same_fields(&extractor.extract_local(POSTING)));
    assert_eq!(result.confidence_score, MAX_SCORE);
}

#[tokio::test]
async fn test_delegate_reports_reason() {
    match delegate(&FailingRemote(502), "text").await {
        Delegation::LocalFallback(reason) => {
            assert!(matches!(reason.error(), RemoteError::Status(502)));
        }
        Delegation::Remote(_) => panic!("expected fallback"),
    }

    let delegation = delegate(&Disabled, "text").await;
    assert!(!delegation.is_remote());
}

// --- AI service over HTTP ---

#[tokio::test]
async fn test_http_503_falls_back() {
    let url = serve_once(http_response("503 Service Unavailable", "")).await;
    let extractor = with_url(url, Duration::from_secs(5));

    let result = extractor.extract_job_info(POSTING).await.unwrap();

    assert!(result.same_fields(&extractor.extract_local(POSTING)));
}

#[tokio::test]
async fn test_http_success() {
    let body = json!({
        "data": {
            "job_title": "Site Reliability Engineer",
            "company_name": "Initech",
            "location": "Remote",
            "required_skills": ["Linux", "Terraform"],
            "min_salary": 140000,
            "max_salary": 170000,
            "job_type": "Full-time",
            "seniority_level": "Senior"
        }
    })
    .to_string();
    let url = serve_once(http_response("200 OK", &body)).await;
    let extractor = with_url(url, Duration::from_secs(5));

    let result = extractor
        .extract_job_info("Reach me at ops@initech.io")
        .await
        .unwrap();

    assert_eq!(result.job_title.as_deref(), Some("Site Reliability Engineer"));
    assert_eq!(result.required_skills, ["Linux", "Terraform"]);
    assert_eq!(result.salary_range.as_deref(), Some("140000-170000"));
    assert_eq!(result.confidence_score, REMOTE_CONFIDENCE);
    assert_eq!(result.domain.as_deref(), Some("initech.io"));
}

#[tokio::test]
async fn test_http_success_without_data() {
    let url = serve_once(http_response("200 OK", "{}")).await;
    let extractor = with_url(url, Duration::from_secs(5));

    let result = extractor.extract_job_info(POSTING).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.confidence_score, REMOTE_CONFIDENCE);
    assert_eq!(result.email.as_deref(), Some("jobs@acme.com"));
}

#[tokio::test]
async fn test_http_malformed_body_falls_back() {
    let url = serve_once(http_response("200 OK", "not json")).await;
    let client = AiServiceClient::new(url, Duration::from_secs(5)).unwrap();

    let err = client.extract(POSTING).await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn test_http_connection_refused_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let extractor = with_url(format!("http://{addr}/extract"), Duration::from_secs(5));
    let result = extractor.extract_job_info(POSTING).await.unwrap();

    assert!(result.same_fields(&extractor.extract_local(POSTING)));
}

#[tokio::test]
async fn test_http_timeout_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        }
    });

    let client = AiServiceClient::new(format!("http://{addr}/extract"), Duration::from_millis(200))
        .unwrap();
    let err = client.extract(POSTING).await.unwrap_err();
    assert!(matches!(err, RemoteError::Timeout));
}
