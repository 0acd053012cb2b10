use diesel::prelude::*;

use crate::models::{NewProfile, Profile};
use crate::orm::scope::TenantScope;
use crate::schema::users;

#[derive(Debug, Default)]
pub struct ProfileFilter {
    pub id: Option<i32>,
    pub name: Option<String>,
}

/// Lists profiles. Non-privileged callers only see profiles of users in
/// their own company.
pub fn list_profiles(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &ProfileFilter,
) -> Result<Vec<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;

    let mut query = profiles.into_boxed();
    if let TenantScope::Company(c) = scope {
        let member_ids: Vec<i32> = users::table
            .filter(users::company_id.eq(c))
            .select(users::id)
            .load(conn)?;
        query = query.filter(user_id.eq_any(member_ids));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = &filter.name {
        query = query.filter(name.eq(v.clone()));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_profile_by_id(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> Result<Option<Profile>, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    profiles.filter(id.eq(profile_id)).first(conn).optional()
}

pub fn insert_profile(
    conn: &mut SqliteConnection,
    new_profile: NewProfile,
) -> Result<Profile, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    diesel::insert_into(profiles).values(&new_profile).execute(conn)?;
    profiles.order(id.desc()).first(conn)
}

pub fn update_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
    new_name: Option<String>,
    new_phone: Option<String>,
) -> Result<Profile, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;

    let current: Profile = profiles.filter(id.eq(profile_id)).first(conn)?;
    diesel::update(profiles.filter(id.eq(profile_id)))
        .set((
            name.eq(new_name.unwrap_or(current.name)),
            phone.eq(new_phone.unwrap_or(current.phone)),
        ))
        .execute(conn)?;
    profiles.filter(id.eq(profile_id)).first(conn)
}

pub fn delete_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::profiles::dsl::*;
    diesel::delete(profiles.filter(id.eq(profile_id))).execute(conn)
}

/// The company of the user a profile belongs to.
pub fn company_of_profile(
    conn: &mut SqliteConnection,
    profile_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::profiles;
    profiles::table
        .inner_join(users::table)
        .filter(profiles::id.eq(profile_id))
        .select(users::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn company_scope_limits_profiles_to_own_members() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_profiles(
            &mut conn,
            TenantScope::Company(a.company.id),
            &ProfileFilter::default(),
        )
        .unwrap();
        assert!(rows.iter().all(|p| p.user_id == a.user.id));

        let all = list_profiles(&mut conn, TenantScope::All, &ProfileFilter::default()).unwrap();
        assert!(all.iter().any(|p| p.user_id == b.user.id));
    }
}
