//! Household member storage.
//!
//! Membership, approval state and the cumulative point total live in the
//! `users` table. Points are only touched by [`Users::add_points`] (task
//! completion) and [`Users::reset_points`] (admin score reset).

use crate::libs::error::ChoreResult;
use crate::libs::user::{NewUser, Role, User, UserView};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, name, email, points, role, is_approved, approved_by, approved_at, created_at";

const INSERT_USER: &str =
    "INSERT INTO users (name, email, role, is_approved, approved_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";
const APPROVE_USER: &str = "UPDATE users SET is_approved = TRUE, approved_by = ?2, approved_at = ?3 WHERE id = ?1";
const REVOKE_USER: &str = "UPDATE users SET is_approved = FALSE, approved_by = NULL, approved_at = NULL WHERE id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";
const ADD_POINTS: &str = "UPDATE users SET points = points + ?2 WHERE id = ?1";
const RESET_POINTS: &str = "UPDATE users SET points = 0";
const SELECT_ALL_WITH_APPROVER: &str = "SELECT u.id, u.name, u.email, u.points, u.role, u.is_approved, u.approved_by, u.approved_at, u.created_at,
        approver.name
    FROM users u
    LEFT JOIN users approver ON u.approved_by = approver.id
    ORDER BY u.created_at DESC, u.id DESC";

pub struct Users<'a> {
    conn: &'a Connection,
}

impl<'a> Users<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Users { conn }
    }

    pub fn count(&self) -> ChoreResult<i64> {
        Ok(self.conn.query_row(COUNT_USERS, [], |row| row.get(0))?)
    }

    pub fn insert(&self, user: &NewUser, role: Role, approved: bool, now: DateTime<Utc>) -> ChoreResult<i64> {
        let approved_at = approved.then_some(now);
        self.conn
            .execute(INSERT_USER, params![user.name, user.email, role, approved, approved_at, now])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> ChoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_user).optional()?)
    }

    pub fn exists(&self, id: i64) -> ChoreResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT id FROM users WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    pub fn find_by_email(&self, email: &str) -> ChoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        Ok(self.conn.query_row(&sql, [email], map_user).optional()?)
    }

    /// Returns `false` when no such user exists.
    pub fn approve(&self, id: i64, approved_by: i64, at: DateTime<Utc>) -> ChoreResult<bool> {
        Ok(self.conn.execute(APPROVE_USER, params![id, approved_by, at])? > 0)
    }

    pub fn revoke(&self, id: i64) -> ChoreResult<bool> {
        Ok(self.conn.execute(REVOKE_USER, [id])? > 0)
    }

    pub fn delete(&self, id: i64) -> ChoreResult<bool> {
        Ok(self.conn.execute(DELETE_USER, [id])? > 0)
    }

    pub fn add_points(&self, id: i64, points: i64) -> ChoreResult<bool> {
        Ok(self.conn.execute(ADD_POINTS, params![id, points])? > 0)
    }

    pub fn reset_points(&self) -> ChoreResult<usize> {
        Ok(self.conn.execute(RESET_POINTS, [])?)
    }

    /// Approved members, highest score first.
    pub fn leaderboard(&self) -> ChoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE is_approved = TRUE ORDER BY points DESC, name ASC",
            USER_COLUMNS
        );
        self.collect(&sql)
    }

    /// Members waiting for approval, oldest registration first.
    pub fn pending(&self) -> ChoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE is_approved = FALSE ORDER BY created_at ASC, id ASC",
            USER_COLUMNS
        );
        self.collect(&sql)
    }

    pub fn all_with_approver(&self) -> ChoreResult<Vec<UserView>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_WITH_APPROVER)?;
        let views = stmt
            .query_map([], |row| {
                Ok(UserView {
                    user: map_user(row)?,
                    approved_by_name: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    fn collect(&self, sql: &str) -> ChoreResult<Vec<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let users = stmt.query_map([], map_user)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        points: row.get(3)?,
        role: row.get(4)?,
        is_approved: row.get(5)?,
        approved_by: row.get(6)?,
        approved_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}
