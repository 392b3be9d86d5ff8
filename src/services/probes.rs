//! Smoke-test probes for the backend's HTTP API.
//!
//! Each probe is a short, linear sequence of requests. Failures never abort
//! the process; they are logged and recorded as failed steps in the returned
//! [`ProbeReport`].

use super::api::{
    API_TEST_PATH, ApiClient, Exchange, HEALTH_PATH, LOGIN_PATH, PROFILE_PATH, ProbeError,
    REGISTER_PATH,
};
use crate::models::{ProbeCredentials, RegistrationTemplate};
use rand::Rng;
use serde_json::json;

/// One request made by a probe and the verdict on its response
#[derive(Debug, Clone)]
pub struct ProbeStep {
    pub name: String,
    pub exchange: Option<Exchange>,
    pub error: Option<String>,
    pub passed: bool,
    pub note: String,
}

impl ProbeStep {
    fn from_result<F>(name: &str, result: Result<Exchange, ProbeError>, judge: F) -> Self
    where
        F: FnOnce(&Exchange) -> (bool, String),
    {
        match result {
            Ok(exchange) if exchange.body_error.is_some() => {
                exchange.log_transcript();
                tracing::error!("[{}] response body could not be read", name);
                Self {
                    name: name.to_string(),
                    error: exchange.body_error.clone(),
                    exchange: Some(exchange),
                    passed: false,
                    note: "response body could not be read".to_string(),
                }
            }
            Ok(exchange) => {
                exchange.log_transcript();
                let (passed, note) = judge(&exchange);
                if passed {
                    tracing::info!("[{}] {}", name, note);
                } else {
                    tracing::warn!("[{}] {}", name, note);
                }
                Self {
                    name: name.to_string(),
                    exchange: Some(exchange),
                    error: None,
                    passed,
                    note,
                }
            }
            Err(e) => {
                tracing::error!("[{}] {}", name, e);
                Self {
                    name: name.to_string(),
                    exchange: None,
                    error: Some(e.to_string()),
                    passed: false,
                    note: "request failed".to_string(),
                }
            }
        }
    }

    /// Token carried by this step's response, if any
    pub fn token(&self) -> Option<&str> {
        self.exchange.as_ref().and_then(Exchange::token)
    }
}

/// Structured outcome of a probe run
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub probe: String,
    pub steps: Vec<ProbeStep>,
}

impl ProbeReport {
    fn new(probe: &str) -> Self {
        Self {
            probe: probe.to_string(),
            steps: Vec::new(),
        }
    }

    /// All steps passed (and at least one ran)
    pub fn passed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.passed)
    }

    pub fn step(&self, name: &str) -> Option<&ProbeStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn log_summary(&self) {
        let passed = self.steps.iter().filter(|s| s.passed).count();
        tracing::info!(
            "{} probe finished: {}/{} steps passed",
            self.probe,
            passed,
            self.steps.len()
        );
    }
}

/// Credentials for a freshly generated test user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl GeneratedUser {
    fn registration_body(&self) -> serde_json::Value {
        json!({
            "username": self.username,
            "email": self.email,
            "password": self.password,
        })
    }

    fn login_body(&self) -> serde_json::Value {
        login_body(&self.email, &self.password)
    }
}

/// Generate a pseudo-unique user by appending a random number to the template
pub fn generate_user<R: Rng + ?Sized>(template: &RegistrationTemplate, rng: &mut R) -> GeneratedUser {
    let suffix = rng.gen_range(0..template.suffix_range.max(1));
    GeneratedUser {
        username: format!("{}{}", template.username_prefix, suffix),
        email: format!(
            "{}{}@{}",
            template.email_prefix, suffix, template.email_domain
        ),
        password: template.password.clone(),
    }
}

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

fn judge_token(exchange: &Exchange) -> (bool, String) {
    match exchange.token() {
        Some(_) if exchange.is_success() => (true, "token present in response".to_string()),
        Some(_) => (
            false,
            format!("token present but status was {}", exchange.status),
        ),
        None => (
            false,
            format!("no token in response (status {})", exchange.status),
        ),
    }
}

fn judge_status(exchange: &Exchange) -> (bool, String) {
    (
        exchange.is_success(),
        format!("status {}", exchange.status),
    )
}

/// POST the example credentials to the login endpoint
pub async fn login_probe(client: &ApiClient, credentials: &ProbeCredentials) -> ProbeReport {
    let mut report = ProbeReport::new("login");

    tracing::info!("Testing login at {}", client.url(LOGIN_PATH));
    let result = client
        .post_json(
            LOGIN_PATH,
            &login_body(&credentials.email, &credentials.password),
        )
        .await;
    report
        .steps
        .push(ProbeStep::from_result("login", result, judge_token));

    report.log_summary();
    report
}

/// Register `user`, then log in with the same credentials if a token came back
pub async fn registration_probe(client: &ApiClient, user: &GeneratedUser) -> ProbeReport {
    let mut report = ProbeReport::new("registration");

    tracing::info!(
        "Registering {} <{}> at {}",
        user.username,
        user.email,
        client.url(REGISTER_PATH)
    );
    let result = client
        .post_json(REGISTER_PATH, &user.registration_body())
        .await;
    let register = ProbeStep::from_result("register", result, judge_token);
    let registered = register.token().is_some();
    report.steps.push(register);

    if registered {
        tracing::info!("Registration returned a token, logging in with the same credentials");
        let result = client.post_json(LOGIN_PATH, &user.login_body()).await;
        report
            .steps
            .push(ProbeStep::from_result("login", result, judge_token));
    } else {
        tracing::warn!("No token from registration, skipping login round-trip");
    }

    report.log_summary();
    report
}

/// GET the health and API test endpoints, independently of each other
pub async fn server_probe(client: &ApiClient) -> ProbeReport {
    let mut report = ProbeReport::new("server");

    tracing::info!("Checking {}", client.url(HEALTH_PATH));
    let result = client.get(HEALTH_PATH).await;
    report
        .steps
        .push(ProbeStep::from_result("health", result, judge_status));

    tracing::info!("Checking {}", client.url(API_TEST_PATH));
    let result = client.get(API_TEST_PATH).await;
    report
        .steps
        .push(ProbeStep::from_result("api test", result, judge_status));

    report.log_summary();
    report
}

fn judge_cors(origin: &str) -> impl FnOnce(&Exchange) -> (bool, String) + '_ {
    move |exchange| {
        let allow_origin = exchange.header("access-control-allow-origin");
        let allow_credentials = exchange.header("access-control-allow-credentials");
        let origin_ok = matches!(allow_origin, Some(o) if o == origin || o == "*");
        (
            exchange.is_success() && origin_ok,
            format!(
                "status {}, allow-origin={}, allow-credentials={}",
                exchange.status,
                allow_origin.unwrap_or("<missing>"),
                allow_credentials.unwrap_or("<missing>")
            ),
        )
    }
}

/// Registration against the deployed backend as a browser on `origin` would do it
///
/// `credentialed` must keep cookies and send the Origin header; `plain` is the
/// comparison client without credentials.
pub async fn cors_probe(
    credentialed: &ApiClient,
    plain: &ApiClient,
    origin: &str,
    template: &RegistrationTemplate,
) -> ProbeReport {
    let mut report = ProbeReport::new("cors");
    let (first_user, second_user) = {
        let mut rng = rand::thread_rng();
        (
            generate_user(template, &mut rng),
            generate_user(template, &mut rng),
        )
    };

    tracing::info!(
        "Testing CORS for origin {} against {}",
        origin,
        credentialed.base_url()
    );

    let result = credentialed.preflight(REGISTER_PATH, "POST").await;
    report.steps.push(ProbeStep::from_result(
        "preflight",
        result,
        |exchange| {
            let allow_methods = exchange.header("access-control-allow-methods");
            let allow_origin = exchange.header("access-control-allow-origin");
            (
                exchange.is_success() && allow_origin.is_some(),
                format!(
                    "status {}, allow-origin={}, allow-methods={}",
                    exchange.status,
                    allow_origin.unwrap_or("<missing>"),
                    allow_methods.unwrap_or("<missing>")
                ),
            )
        },
    ));

    let result = credentialed
        .post_json(REGISTER_PATH, &first_user.registration_body())
        .await;
    let register = ProbeStep::from_result("register with credentials", result, judge_cors(origin));
    let token = register.token().map(str::to_string);
    report.steps.push(register);

    match token {
        Some(token) => {
            tracing::info!("Registration returned a token, fetching profile");
            let result = credentialed.get_authorized(PROFILE_PATH, &token).await;
            report
                .steps
                .push(ProbeStep::from_result("profile", result, judge_status));
        }
        None => tracing::warn!("No token from registration, skipping profile request"),
    }

    let result = plain
        .post_json(REGISTER_PATH, &second_user.registration_body())
        .await;
    report.steps.push(ProbeStep::from_result(
        "register without credentials",
        result,
        judge_status,
    ));

    report.log_summary();
    report
}
