use diesel::prelude::*;

use crate::models::{NewPoint, Point};
use crate::orm::scope::{TenantScope, company_measurement_ids};

#[derive(Debug, Default)]
pub struct PointFilter {
    pub id: Option<i32>,
    pub number: Option<i32>,
    pub position: Option<String>,
    pub point_type: Option<String>,
    pub measurement: Option<i32>,
}

pub fn list_points(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &PointFilter,
) -> Result<Vec<Point>, diesel::result::Error> {
    use crate::schema::points::dsl::*;

    let mut query = points.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_measurement_ids(conn, c)?;
        query = query.filter(measurement_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = filter.number {
        query = query.filter(number.eq(v));
    }
    if let Some(v) = &filter.position {
        query = query.filter(position.eq(v.clone()));
    }
    if let Some(v) = &filter.point_type {
        query = query.filter(point_type.eq(v.clone()));
    }
    if let Some(v) = filter.measurement {
        query = query.filter(measurement_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_point_by_id(
    conn: &mut SqliteConnection,
    point_id: i32,
) -> Result<Option<Point>, diesel::result::Error> {
    use crate::schema::points::dsl::*;
    points.filter(id.eq(point_id)).first(conn).optional()
}

/// All points of one measurement, in collector order.
pub fn points_for_measurement(
    conn: &mut SqliteConnection,
    measurement: i32,
) -> Result<Vec<Point>, diesel::result::Error> {
    use crate::schema::points::dsl::*;
    points
        .filter(measurement_id.eq(measurement))
        .order(number.asc())
        .load(conn)
}

pub fn insert_point(
    conn: &mut SqliteConnection,
    new_point: NewPoint,
) -> Result<Point, diesel::result::Error> {
    use crate::schema::points::dsl::*;
    diesel::insert_into(points).values(&new_point).execute(conn)?;
    points.order(id.desc()).first(conn)
}

pub fn update_point(
    conn: &mut SqliteConnection,
    point_id: i32,
    new_number: Option<i32>,
    new_position: Option<String>,
    new_point_type: Option<String>,
) -> Result<Point, diesel::result::Error> {
    use crate::schema::points::dsl::*;

    let current: Point = points.filter(id.eq(point_id)).first(conn)?;
    diesel::update(points.filter(id.eq(point_id)))
        .set((
            number.eq(new_number.unwrap_or(current.number)),
            position.eq(new_position.unwrap_or(current.position)),
            point_type.eq(new_point_type.unwrap_or(current.point_type)),
        ))
        .execute(conn)?;
    points.filter(id.eq(point_id)).first(conn)
}

pub fn delete_point(
    conn: &mut SqliteConnection,
    point_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::points::dsl::*;
    diesel::delete(points.filter(id.eq(point_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn scope_and_measurement_filter_compose() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let filter = PointFilter { measurement: Some(a.measurement.id), ..Default::default() };
        let rows = list_points(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert_eq!(rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.point.id]);

        // Another tenant's measurement id inside this scope: empty, not
        // an error.
        let filter = PointFilter { measurement: Some(b.measurement.id), ..Default::default() };
        let rows = list_points(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert!(rows.is_empty());
    }
}
