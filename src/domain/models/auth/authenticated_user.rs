use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::config::Role;
use crate::core::errors::AppError;

/// 인증 미들웨어가 요청 확장(extensions)에 넣어두는 사용자 정보
///
/// 역할은 토큰이 아니라 저장소의 사용자 문서에서 읽어온 값입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (hex)
    pub user_id: String,

    pub username: String,

    /// 사용자 역할 목록
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    /// 특정 역할을 보유하고 있는지 확인
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// 여러 역할 중 하나라도 보유하고 있는지 확인
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// 관리자 권한을 보유하고 있는지 확인
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.user_id)
            .map_err(|_| AppError::AuthenticationError("Invalid user id in token".to_string()))
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string()
            ).into())),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn user(roles: Vec<Role>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: ObjectId::new().to_hex(),
            username: "reader_1".to_string(),
            roles,
        }
    }

    #[test]
    fn test_role_checks() {
        let author = user(vec![Role::Author, Role::Reader]);
        assert!(author.has_role(Role::Author));
        assert!(author.has_any_role(&[Role::Admin, Role::Author]));
        assert!(!author.is_admin());
        assert!(user(vec![Role::Admin]).is_admin());
    }

    #[test]
    fn test_object_id_parsing() {
        let valid = user(vec![Role::Reader]);
        assert!(valid.object_id().is_ok());

        let invalid = AuthenticatedUser { user_id: "not-an-id".to_string(), ..valid };
        assert!(matches!(invalid.object_id(), Err(AppError::AuthenticationError(_))));
    }

    #[actix_web::test]
    async fn test_extractor_requires_extension() {
        let req = TestRequest::default().to_http_request();
        let result = AuthenticatedUser::extract(&req).await;
        assert!(result.is_err());

        let optional = OptionalUser::extract(&req).await.unwrap();
        assert!(optional.0.is_none());

        req.extensions_mut().insert(user(vec![Role::Reader]));
        let extracted = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(extracted.username, "reader_1");
    }
}
