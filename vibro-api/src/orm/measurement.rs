use chrono::NaiveDate;
use diesel::prelude::*;

use crate::models::{Measurement, MeasurementInput, NewMeasurement};
use crate::orm::scope::{TenantScope, company_machine_ids};

#[derive(Debug, Default)]
pub struct MeasurementFilter {
    pub id: Option<i32>,
    pub severity: Option<String>,
    pub date: Option<String>,
    pub analysis: Option<String>,
    pub recommendation: Option<String>,
    pub revised: Option<bool>,
    pub resolved: Option<bool>,
    pub measurement_type: Option<String>,
    pub machine: Option<i32>,
    pub engineer_one: Option<i32>,
    pub engineer_two: Option<i32>,
}

pub fn list_measurements(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &MeasurementFilter,
) -> Result<Vec<Measurement>, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;

    let mut query = measurements.into_boxed();
    if let TenantScope::Company(c) = scope {
        let owned = company_machine_ids(conn, c)?;
        query = query.filter(machine_id.eq_any(owned));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = &filter.severity {
        query = query.filter(severity.eq(v.clone()));
    }
    if let Some(v) = &filter.date {
        // A date value that does not parse matches nothing.
        match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
            Ok(d) => query = query.filter(date.eq(d)),
            Err(_) => return Ok(Vec::new()),
        }
    }
    if let Some(v) = &filter.analysis {
        query = query.filter(analysis.eq(v.clone()));
    }
    if let Some(v) = &filter.recommendation {
        query = query.filter(recommendation.eq(v.clone()));
    }
    if let Some(v) = filter.revised {
        query = query.filter(revised.eq(v));
    }
    if let Some(v) = filter.resolved {
        query = query.filter(resolved.eq(v));
    }
    if let Some(v) = &filter.measurement_type {
        query = query.filter(measurement_type.eq(v.clone()));
    }
    if let Some(v) = filter.machine {
        query = query.filter(machine_id.eq(v));
    }
    if let Some(v) = filter.engineer_one {
        query = query.filter(engineer_one_id.eq(v));
    }
    if let Some(v) = filter.engineer_two {
        query = query.filter(engineer_two_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_measurement_by_id(
    conn: &mut SqliteConnection,
    measurement_id: i32,
) -> Result<Option<Measurement>, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;
    measurements.filter(id.eq(measurement_id)).first(conn).optional()
}

/// All measurements for one machine, oldest first.
pub fn measurements_for_machine(
    conn: &mut SqliteConnection,
    machine: i32,
) -> Result<Vec<Measurement>, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;
    measurements
        .filter(machine_id.eq(machine))
        .order(date.asc())
        .load(conn)
}

pub fn insert_measurement(
    conn: &mut SqliteConnection,
    new_measurement: NewMeasurement,
) -> Result<Measurement, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;
    diesel::insert_into(measurements).values(&new_measurement).execute(conn)?;
    measurements.order(id.desc()).first(conn)
}

pub fn update_measurement(
    conn: &mut SqliteConnection,
    measurement_id: i32,
    input: &MeasurementInput,
) -> Result<Measurement, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;

    let current: Measurement = measurements.filter(id.eq(measurement_id)).first(conn)?;
    diesel::update(measurements.filter(id.eq(measurement_id)))
        .set((
            machine_id.eq(input.machine_id.unwrap_or(current.machine_id)),
            date.eq(input.date.unwrap_or(current.date)),
            severity.eq(input.severity.clone().unwrap_or(current.severity)),
            analysis.eq(input.analysis.clone().unwrap_or(current.analysis)),
            recommendation.eq(input.recommendation.clone().unwrap_or(current.recommendation)),
            revised.eq(input.revised.unwrap_or(current.revised)),
            resolved.eq(input.resolved.unwrap_or(current.resolved)),
            measurement_type
                .eq(input.measurement_type.clone().unwrap_or(current.measurement_type)),
            engineer_one_id.eq(input.engineer_one_id.or(current.engineer_one_id)),
            engineer_two_id.eq(input.engineer_two_id.or(current.engineer_two_id)),
        ))
        .execute(conn)?;
    measurements.filter(id.eq(measurement_id)).first(conn)
}

pub fn delete_measurement(
    conn: &mut SqliteConnection,
    measurement_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::measurements::dsl::*;
    diesel::delete(measurements.filter(id.eq(measurement_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn malformed_date_filter_matches_nothing() {
        let mut conn = setup_test_db();
        let _a = seed_chain(&mut conn, "Alpha");

        let filter = MeasurementFilter { date: Some("not-a-date".into()), ..Default::default() };
        let rows = list_measurements(&mut conn, TenantScope::All, &filter).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn severity_and_machine_filters_intersect() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let filter = MeasurementFilter {
            severity: Some(a.measurement.severity.clone()),
            machine: Some(a.machine.id),
            ..Default::default()
        };
        let rows = list_measurements(&mut conn, TenantScope::All, &filter).unwrap();
        assert_eq!(rows.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.measurement.id]);

        // Same severity exists on the other tenant's machine too; the
        // machine filter keeps them apart.
        let filter = MeasurementFilter {
            severity: Some(b.measurement.severity.clone()),
            machine: Some(a.machine.id + 9999),
            ..Default::default()
        };
        assert!(list_measurements(&mut conn, TenantScope::All, &filter).unwrap().is_empty());
    }

    #[test]
    fn scope_excludes_other_company_measurements() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_measurements(
            &mut conn,
            TenantScope::Company(b.company.id),
            &MeasurementFilter::default(),
        )
        .unwrap();
        assert!(rows.iter().all(|m| m.machine_id == b.machine.id));
        assert!(!rows.iter().any(|m| m.id == a.measurement.id));
    }
}
