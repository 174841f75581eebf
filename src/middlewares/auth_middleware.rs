//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 사용자 정보를 추출합니다.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::{
    Error, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};

use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어. 유효한 액세스 토큰이 없으면 401로 응답합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMiddleware;

impl AuthMiddleware {
    pub fn required() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
    use crate::domain::models::token::token::TokenSubject;
    use crate::services::auth::TokenService;
    use crate::services::auth::token_service::{
        ACCESS_TOKEN_REQUIRED_MESSAGE, MALFORMED_TOKEN_MESSAGE, MISSING_TOKEN_MESSAGE,
    };
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.email)
    }

    macro_rules! protected_app {
        () => {
            test::init_service(
                App::new().service(
                    web::resource("/me")
                        .wrap(AuthMiddleware::required())
                        .route(web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    async fn rejection_message(header: Option<String>) -> String {
        let app = protected_app!();
        let mut req = test::TestRequest::get().uri("/me");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }

        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["message"].as_str().unwrap_or_default().to_string()
    }

    #[actix_web::test]
    async fn test_rejections() {
        assert_eq!(rejection_message(None).await, MISSING_TOKEN_MESSAGE);
        assert_eq!(
            rejection_message(Some("Token abc".to_string())).await,
            MALFORMED_TOKEN_MESSAGE
        );

        let refresh = TokenService::instance()
            .unwrap()
            .create_refresh_token(&TokenSubject::new("mw@example.com", "미들웨어"))
            .unwrap();
        assert_eq!(
            rejection_message(Some(format!("Bearer {}", refresh))).await,
            ACCESS_TOKEN_REQUIRED_MESSAGE
        );
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = protected_app!();
        let access = TokenService::instance()
            .unwrap()
            .create_access_token(&TokenSubject::new("mw@example.com", "미들웨어"))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "mw@example.com");
    }
}
