//! Session revocation for logout.

use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, Status};

use crate::orm::login::DbRunner;
use crate::schema::sessions;

/// Marks the session with the given token as revoked.
///
/// Returns `true` if a session row was updated, `false` if the token was
/// unknown (already revoked sessions still count as updated).
pub async fn revoke_session<D: DbRunner>(db: &D, token: &str) -> Result<bool, Status> {
    let token = token.to_owned();
    let updated = db
        .run(move |conn| {
            diesel::update(sessions::table.filter(sessions::id.eq(token)))
                .set(sessions::revoked.eq(true))
                .execute(conn)
        })
        .await
        .map_err(|_| Status::InternalServerError)?;
    Ok(updated > 0)
}

/// Removes the session cookie from the response.
pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::build(("session", "")).path("/").build());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::login::create_and_store_session;
    use crate::orm::testing::{FakeDbConn, seed_chain, setup_test_db};
    use crate::schema::sessions;

    #[tokio::test]
    async fn revoking_marks_the_row_and_reports_unknown_tokens() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");

        let db = FakeDbConn::new(conn);
        let token = create_and_store_session(&db, a.user.id).await.unwrap();

        assert!(revoke_session(&db, &token).await.unwrap());
        assert!(!revoke_session(&db, "no-such-token").await.unwrap());

        let revoked: bool = db
            .run(move |c| {
                sessions::table
                    .filter(sessions::id.eq(token))
                    .select(sessions::revoked)
                    .first(c)
            })
            .await
            .unwrap();
        assert!(revoked);
    }
}
