use diesel::prelude::*;

use crate::models::{NewTendency, Tendency};
use crate::orm::scope::{TenantScope, company_point_ids};

#[derive(Debug, Default)]
pub struct TendencyFilter {
    pub id: Option<i32>,
    pub point: Option<i32>,
    pub value: Option<f64>,
}

pub fn list_tendencies(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &TendencyFilter,
) -> Result<Vec<Tendency>, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;

    let mut query = tendencies.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_point_ids(conn, c)?;
        query = query.filter(point_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = filter.point {
        query = query.filter(point_id.eq(v));
    }
    if let Some(v) = filter.value {
        query = query.filter(value.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_tendency_by_id(
    conn: &mut SqliteConnection,
    tendency_id: i32,
) -> Result<Option<Tendency>, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;
    tendencies.filter(id.eq(tendency_id)).first(conn).optional()
}

/// All tendency records for one point, in insertion order. The collector
/// writes readings chronologically, so this is also date order.
pub fn tendencies_for_point(
    conn: &mut SqliteConnection,
    point: i32,
) -> Result<Vec<Tendency>, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;
    tendencies.filter(point_id.eq(point)).order(id.asc()).load(conn)
}

pub fn insert_tendency(
    conn: &mut SqliteConnection,
    new_tendency: NewTendency,
) -> Result<Tendency, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;
    diesel::insert_into(tendencies).values(&new_tendency).execute(conn)?;
    tendencies.order(id.desc()).first(conn)
}

pub fn update_tendency(
    conn: &mut SqliteConnection,
    tendency_id: i32,
    new_name: Option<String>,
    new_date: Option<String>,
    new_value: Option<f64>,
) -> Result<Tendency, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;

    let current: Tendency = tendencies.filter(id.eq(tendency_id)).first(conn)?;
    diesel::update(tendencies.filter(id.eq(tendency_id)))
        .set((
            name.eq(new_name.unwrap_or(current.name)),
            date.eq(new_date.unwrap_or(current.date)),
            value.eq(new_value.unwrap_or(current.value)),
        ))
        .execute(conn)?;
    tendencies.filter(id.eq(tendency_id)).first(conn)
}

pub fn delete_tendency(
    conn: &mut SqliteConnection,
    tendency_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::tendencies::dsl::*;
    diesel::delete(tendencies.filter(id.eq(tendency_id))).execute(conn)
}

/// The company reachable from this tendency's point chain.
pub fn company_of_tendency(
    conn: &mut SqliteConnection,
    tendency_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::{machines, measurements, points, tendencies};
    tendencies::table
        .inner_join(points::table.inner_join(measurements::table.inner_join(machines::table)))
        .filter(tendencies::id.eq(tendency_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn leaf_scope_walks_the_full_chain() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_tendencies(
            &mut conn,
            TenantScope::Company(a.company.id),
            &TendencyFilter::default(),
        )
        .unwrap();
        assert!(rows.iter().all(|t| t.point_id == a.point.id));

        assert_eq!(
            company_of_tendency(&mut conn, b.tendency.id).unwrap(),
            Some(b.company.id)
        );
    }
}
