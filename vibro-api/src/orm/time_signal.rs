use diesel::prelude::*;

use crate::models::{NewTimeSignal, TimeSignal};
use crate::orm::scope::{TenantScope, company_point_ids};

#[derive(Debug, Default)]
pub struct TimeSignalFilter {
    pub id: Option<i32>,
    pub identifier: Option<String>,
    pub point: Option<i32>,
    pub value: Option<f64>,
}

pub fn list_time_signals(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &TimeSignalFilter,
) -> Result<Vec<TimeSignal>, diesel::result::Error> {
    use crate::schema::time_signals::dsl::*;

    let mut query = time_signals.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_point_ids(conn, c)?;
        query = query.filter(point_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = &filter.identifier {
        query = query.filter(identifier.eq(v.clone()));
    }
    if let Some(v) = filter.point {
        query = query.filter(point_id.eq(v));
    }
    if let Some(v) = filter.value {
        query = query.filter(value.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_time_signal_by_id(
    conn: &mut SqliteConnection,
    time_signal_id: i32,
) -> Result<Option<TimeSignal>, diesel::result::Error> {
    use crate::schema::time_signals::dsl::*;
    time_signals.filter(id.eq(time_signal_id)).first(conn).optional()
}

pub fn insert_time_signal(
    conn: &mut SqliteConnection,
    new_time_signal: NewTimeSignal,
) -> Result<TimeSignal, diesel::result::Error> {
    use crate::schema::time_signals::dsl::*;
    diesel::insert_into(time_signals).values(&new_time_signal).execute(conn)?;
    time_signals.order(id.desc()).first(conn)
}

pub fn update_time_signal(
    conn: &mut SqliteConnection,
    time_signal_id: i32,
    new_identifier: Option<String>,
    new_value: Option<f64>,
) -> Result<TimeSignal, diesel::result::Error> {
    use crate::schema::time_signals::dsl::*;

    let current: TimeSignal = time_signals.filter(id.eq(time_signal_id)).first(conn)?;
    diesel::update(time_signals.filter(id.eq(time_signal_id)))
        .set((
            identifier.eq(new_identifier.unwrap_or(current.identifier)),
            value.eq(new_value.unwrap_or(current.value)),
        ))
        .execute(conn)?;
    time_signals.filter(id.eq(time_signal_id)).first(conn)
}

pub fn delete_time_signal(
    conn: &mut SqliteConnection,
    time_signal_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::time_signals::dsl::*;
    diesel::delete(time_signals.filter(id.eq(time_signal_id))).execute(conn)
}

/// The company reachable from this signal's point chain.
pub fn company_of_time_signal(
    conn: &mut SqliteConnection,
    time_signal_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::{machines, measurements, points, time_signals};
    time_signals::table
        .inner_join(points::table.inner_join(measurements::table.inner_join(machines::table)))
        .filter(time_signals::id.eq(time_signal_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn point_filter_on_foreign_tenant_is_empty() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let filter = TimeSignalFilter { point: Some(b.point.id), ..Default::default() };
        let rows = list_time_signals(&mut conn, TenantScope::Company(a.company.id), &filter)
            .unwrap();
        assert!(rows.is_empty());

        let filter = TimeSignalFilter { point: Some(a.point.id), ..Default::default() };
        let rows = list_time_signals(&mut conn, TenantScope::Company(a.company.id), &filter)
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
