// src/auth.rs

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http, web, Error, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use bcrypt::verify;
use chrono::{Duration, Utc};
use futures::future::{ok, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::OptionalJson;
use crate::models::User;
use crate::response::ok as respond;

/// Every issued token starts with this.
pub const TOKEN_PREFIX: &str = "mock-jwt-token-";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    /// Random per token, so two logins in the same second still differ.
    pub jti: String,
}

/// A login the service accepts.
#[derive(Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub password_hash: String,
    pub user_id: String,
}

/// User id taken from a valid bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

pub fn create_jwt(user_id: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::hours(24)).timestamp() as usize,
        iat: now.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };
    let jwt = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(format!("{}{}", TOKEN_PREFIX, jwt))
}

/// Accepts tokens with or without [`TOKEN_PREFIX`].
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let jwt = token.strip_prefix(TOKEN_PREFIX).unwrap_or(token);
    let token_data = decode::<Claims>(
        jwt,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Checks an optional bearer token. A request without one passes through;
/// a request with a bad one is answered with a 401 envelope.
#[derive(Debug, Clone)]
pub struct Authentication {
    secret: Rc<str>,
}

impl Authentication {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Rc::from(secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddleware {
            service,
            secret: self.secret.clone(),
        })
    }
}

pub struct AuthMiddleware<S> {
    service: S,
    secret: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        if let Some(token) = bearer {
            match validate_jwt(&token, &self.secret) {
                Ok(claims) => {
                    req.extensions_mut().insert(CurrentUser(claims.sub));
                }
                Err(e) => {
                    warn!("Rejected bearer token: {}", e);
                    let (req_parts, _payload) = req.into_parts();
                    let resp = ApiError::Unauthorized("Invalid token".to_string())
                        .error_response()
                        .map_into_boxed_body();
                    let srv_resp = ServiceResponse::new(req_parts, resp);
                    return Box::pin(async move { Ok(srv_resp) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

/// User id from the bearer token, if the request carried one.
pub fn current_user_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<CurrentUser>().map(|u| u.0.clone())
}

/// The token's user, or the first user when the request is anonymous.
pub fn resolve_current_user(req: &HttpRequest, data: &AppState) -> ApiResult<User> {
    match current_user_id(req) {
        Some(id) => data.users.get(&id),
        None => data
            .users
            .list()
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("User")),
    }
}

/// POST /auth/login
pub async fn login(
    data: web::Data<AppState>,
    login_info: OptionalJson<LoginRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    debug!("Login attempt for {}", login_info.email);

    let credential = data
        .credentials
        .iter()
        .find(|c| c.email == login_info.email)
        .filter(|c| verify(&login_info.password, &c.password_hash).unwrap_or(false))
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let user = data.users.get(&credential.user_id)?;
    let token = create_jwt(&user.id, &data.config.jwt_secret)?;
    info!("User {} logged in", user.id);
    Ok(respond(LoginResponse { user, token }))
}

/// GET /auth/me
pub async fn me(req: HttpRequest, data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(respond(resolve_current_user(&req, &data)?))
}

/// POST /auth/logout
pub async fn logout(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(respond(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DEMO_EMAIL, DEMO_PASSWORD};
    use crate::test_support::test_app;
    use actix_web::test::{call_and_read_body_json, call_service, read_body_json, TestRequest};
    use serde_json::{json, Value};

    #[test]
    fn jwt_round_trip_with_and_without_prefix() {
        let token = create_jwt("user_3", "s3cret").unwrap();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(validate_jwt(&token, "s3cret").unwrap().sub, "user_3");
        let bare = token.trim_start_matches(TOKEN_PREFIX);
        assert_eq!(validate_jwt(bare, "s3cret").unwrap().sub, "user_3");
        assert!(validate_jwt(&token, "other").is_err());
    }

    #[actix_web::test]
    async fn login_with_demo_credentials() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let body: Value = call_and_read_body_json(
            &app,
            TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }))
                .to_request(),
        )
        .await;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["user"]["id"], json!("user_1"));
        assert!(body["data"]["token"]
            .as_str()
            .unwrap()
            .starts_with(TOKEN_PREFIX));
    }

    #[actix_web::test]
    async fn each_login_gets_a_distinct_token() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let mut tokens = Vec::new();
        for _ in 0..2 {
            let body: Value = call_and_read_body_json(
                &app,
                TestRequest::post()
                    .uri("/api/auth/login")
                    .set_json(json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }))
                    .to_request(),
            )
            .await;
            tokens.push(body["data"]["token"].as_str().unwrap().to_string());
        }
        assert_ne!(tokens[0], tokens[1]);
    }

    #[actix_web::test]
    async fn wrong_credentials_are_401() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        for payload in [
            json!({ "email": DEMO_EMAIL, "password": "wrong" }),
            json!({ "email": "lisi@example.com", "password": DEMO_PASSWORD }),
            json!({}),
        ] {
            let resp = call_service(
                &app,
                TestRequest::post()
                    .uri("/api/auth/login")
                    .set_json(payload)
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
            let body: Value = read_body_json(resp).await;
            assert_eq!(body["success"], json!(false));
            assert_eq!(body["code"], json!(401));
            assert_eq!(body["data"], json!(null));
        }
    }

    #[actix_web::test]
    async fn login_without_body_is_401() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let resp = call_service(
            &app,
            TestRequest::post().uri("/api/auth/login").to_request(),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], json!("Invalid email or password"));
    }

    #[actix_web::test]
    async fn me_follows_the_bearer_token() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let anonymous: Value = call_and_read_body_json(
            &app,
            TestRequest::get().uri("/api/auth/me").to_request(),
        )
        .await;
        assert_eq!(anonymous["data"]["id"], json!("user_1"));

        let token = create_jwt("user_4", &state.config.jwt_secret).unwrap();
        let named: Value = call_and_read_body_json(
            &app,
            TestRequest::get()
                .uri("/api/auth/me")
                .insert_header((http::header::AUTHORIZATION, format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(named["data"]["id"], json!("user_4"));
    }

    #[actix_web::test]
    async fn invalid_bearer_token_is_rejected() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let resp = call_service(
            &app,
            TestRequest::get()
                .uri("/api/projects")
                .insert_header((http::header::AUTHORIZATION, "Bearer not-a-token"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["message"], json!("Invalid token"));
    }

    #[actix_web::test]
    async fn logout_returns_null_data() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let body: Value = call_and_read_body_json(
            &app,
            TestRequest::post().uri("/api/auth/logout").to_request(),
        )
        .await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!(null));
    }
}
