//! Permission checks for the acting member.

use crate::db::users::Users;
use crate::libs::error::{ChoreError, ChoreResult};
use crate::libs::user::User;
use rusqlite::Connection;

pub const PENDING_APPROVAL: &str = "Account pending approval";
pub const ADMIN_REQUIRED: &str = "Admin access required";

pub struct Access<'a> {
    conn: &'a Connection,
}

impl<'a> Access<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Access { conn }
    }

    /// The member must exist and be approved.
    pub fn approved(&self, user_id: i64) -> ChoreResult<User> {
        match Users::new(self.conn).get(user_id)? {
            Some(user) if user.is_approved => Ok(user),
            _ => Err(ChoreError::unauthorized(PENDING_APPROVAL)),
        }
    }

    /// The member must be an approved administrator.
    pub fn admin(&self, user_id: i64) -> ChoreResult<User> {
        let user = self.approved(user_id)?;
        if !user.is_admin() {
            return Err(ChoreError::unauthorized(ADMIN_REQUIRED));
        }
        Ok(user)
    }
}
