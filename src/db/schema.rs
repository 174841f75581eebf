//! 테이블 생성
//!
//! 엔티티 정의로부터 `CREATE TABLE IF NOT EXISTS`를 생성합니다.
//! 이미 존재하는 테이블은 변경하지 않습니다.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::domain::entities::certification::user_certification;
use crate::domain::entities::users::{user, user_agent, user_ip, user_login_log, user_setting};

/// 모든 엔티티의 테이블을 생성하고 생성 시도한 테이블 수를 반환합니다.
pub async fn create_tables<C>(conn: &C) -> Result<usize, DbErr>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(conn.get_database_backend());

    create_table(conn, &schema, user_setting::Entity).await?;
    create_table(conn, &schema, user_ip::Entity).await?;
    create_table(conn, &schema, user_agent::Entity).await?;
    create_table(conn, &schema, user::Entity).await?;
    create_table(conn, &schema, user_login_log::Entity).await?;
    create_table(conn, &schema, user_certification::Entity).await?;

    Ok(6)
}

async fn create_table<C, E>(conn: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = conn.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    conn.execute(backend.build(&statement)).await?;
    log::debug!("테이블 확인: {}", entity.table_name());
    Ok(())
}
