use serde::{Deserialize, Serialize};
use validator::Validate;

/// 프로필 수정 요청. 전달된 필드만 변경합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "닉네임은 1-255자 사이여야 합니다"))]
    pub nickname: Option<String>,

    #[validate(length(max = 2000, message = "자기소개는 2000자 이하여야 합니다"))]
    pub bio: Option<String>,

    #[validate(length(max = 20, message = "성별은 20자 이하여야 합니다"))]
    pub gender: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_nickname_is_rejected() {
        let req = UpdateProfileRequest {
            nickname: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
