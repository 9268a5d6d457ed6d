use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::User;
use crate::schema::{enterprise_roles, users};

use super::models::UserRow;

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .filter(users::api_key.eq(api_key))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let enterprise_ids = enterprise_roles::table
            .filter(enterprise_roles::user_id.eq(row.id))
            .select(enterprise_roles::enterprise_id)
            .load(&mut conn)?;

        Ok(Some(User {
            id: row.id,
            email: row.email,
            admin: row.admin,
            enterprise_ids,
        }))
    }
}
