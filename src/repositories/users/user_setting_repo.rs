use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};

use crate::core::errors::AppResult;
use crate::domain::entities::users::user_setting::{ActiveModel, Entity as UserSettings, Model};
use crate::register_service;

/// 사용자 설정 리포지토리
pub struct UserSettingRepository;

impl UserSettingRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    /// 기본값(다크모드 `N`, 언어 `ko`)으로 설정 행을 생성
    pub async fn create_default<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Model> {
        Ok(ActiveModel::defaults().insert(conn).await?)
    }

    pub async fn find_by_id<C: ConnectionTrait>(&self, conn: &C, id: i64) -> AppResult<Option<Model>> {
        Ok(UserSettings::find_by_id(id).one(conn).await?)
    }
}

register_service!(UserSettingRepository, "user_setting_repository", UserSettingRepository::new);
