use diesel::prelude::*;

use crate::models::{NewUser, User};

pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).first(conn).optional()
}

pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    user_email: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(email.eq(user_email)).first(conn).optional()
}

pub fn insert_user(
    conn: &mut SqliteConnection,
    new_user: NewUser,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    diesel::insert_into(users).values(&new_user).execute(conn)?;
    users.order(id.desc()).first(conn)
}
