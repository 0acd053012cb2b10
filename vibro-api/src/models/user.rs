use crate::schema::users;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String, // Will be unique
    pub password_hash: String,
    pub company_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Insertable, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub company_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// What the API returns for a user. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub company_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            company_id: user.company_id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}
