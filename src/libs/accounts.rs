//! Member registration, approval and score administration.
//!
//! The first member to register becomes the approved administrator; everyone
//! after that waits for an administrator's approval before they can use the
//! household. Registration counts and inserts inside one immediate
//! transaction, so two simultaneous first registrations cannot both become
//! admin.

use crate::db::points::PointHistory;
use crate::db::users::Users;
use crate::libs::access::Access;
use crate::libs::error::{ChoreError, ChoreResult};
use crate::libs::user::{NewUser, Registration, Role, User, UserView};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

pub struct Accounts<'a> {
    conn: &'a Connection,
}

impl<'a> Accounts<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Accounts { conn }
    }

    pub fn register(&self, user: &NewUser) -> ChoreResult<Registration> {
        self.register_at(user, Utc::now())
    }

    pub fn register_at(&self, user: &NewUser, now: DateTime<Utc>) -> ChoreResult<Registration> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let users = Users::new(&tx);

        if users.find_by_email(&user.email)?.is_some() {
            return Err(ChoreError::conflict("User already exists"));
        }

        let first_user = users.count()? == 0;
        let role = if first_user { Role::Admin } else { Role::User };
        let id = users.insert(user, role, first_user, now).map_err(|e| {
            if e.is_constraint_violation() {
                ChoreError::conflict("User already exists")
            } else {
                e
            }
        })?;
        let created = users.get(id)?.ok_or_else(|| ChoreError::not_found("User", id))?;
        tx.commit()?;

        info!(user_id = id, role = %role, "member registered");
        Ok(Registration {
            user: created,
            first_user,
        })
    }

    pub fn approve(&self, actor: i64, user_id: i64) -> ChoreResult<User> {
        self.approve_at(actor, user_id, Utc::now())
    }

    pub fn approve_at(&self, actor: i64, user_id: i64, now: DateTime<Utc>) -> ChoreResult<User> {
        Access::new(self.conn).admin(actor)?;
        let users = Users::new(self.conn);
        if !users.approve(user_id, actor, now)? {
            return Err(ChoreError::not_found("User", user_id));
        }
        info!(user_id, approved_by = actor, "member approved");
        users.get(user_id)?.ok_or_else(|| ChoreError::not_found("User", user_id))
    }

    /// Withdraws approval. Administrators cannot revoke themselves.
    pub fn revoke(&self, actor: i64, user_id: i64) -> ChoreResult<User> {
        Access::new(self.conn).admin(actor)?;
        if actor == user_id {
            return Err(ChoreError::validation("Cannot revoke your own approval"));
        }
        let users = Users::new(self.conn);
        if !users.revoke(user_id)? {
            return Err(ChoreError::not_found("User", user_id));
        }
        info!(user_id, revoked_by = actor, "member approval revoked");
        users.get(user_id)?.ok_or_else(|| ChoreError::not_found("User", user_id))
    }

    /// Deletes a member. Their ledger entries go with them; task references
    /// are cleared.
    pub fn delete(&self, actor: i64, user_id: i64) -> ChoreResult<()> {
        Access::new(self.conn).admin(actor)?;
        if actor == user_id {
            return Err(ChoreError::validation("Cannot delete your own account"));
        }
        if !Users::new(self.conn).delete(user_id)? {
            return Err(ChoreError::not_found("User", user_id));
        }
        info!(user_id, deleted_by = actor, "member deleted");
        Ok(())
    }

    /// Zeroes every member's points and clears the ledger in one transaction.
    pub fn reset_scores(&self, actor: i64) -> ChoreResult<usize> {
        Access::new(self.conn).admin(actor)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let reset = Users::new(&tx).reset_points()?;
        let cleared = PointHistory::new(&tx).clear()?;
        tx.commit()?;

        info!(users = reset, entries = cleared, reset_by = actor, "scores reset");
        Ok(reset)
    }

    pub fn leaderboard(&self, actor: i64) -> ChoreResult<Vec<User>> {
        Access::new(self.conn).approved(actor)?;
        Users::new(self.conn).leaderboard()
    }

    pub fn pending(&self, actor: i64) -> ChoreResult<Vec<User>> {
        Access::new(self.conn).admin(actor)?;
        Users::new(self.conn).pending()
    }

    pub fn all(&self, actor: i64) -> ChoreResult<Vec<UserView>> {
        Access::new(self.conn).admin(actor)?;
        Users::new(self.conn).all_with_approver()
    }
}
