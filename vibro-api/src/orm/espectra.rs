use diesel::prelude::*;

use crate::models::{Espectra, NewEspectra};
use crate::orm::scope::{TenantScope, company_point_ids};

#[derive(Debug, Default)]
pub struct EspectraFilter {
    pub id: Option<i32>,
    pub identifier: Option<String>,
    pub point: Option<i32>,
    pub value: Option<f64>,
}

pub fn list_espectras(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &EspectraFilter,
) -> Result<Vec<Espectra>, diesel::result::Error> {
    use crate::schema::espectras::dsl::*;

    let mut query = espectras.into_boxed();
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

pub fn get_espectra_by_id(
    conn: &mut SqliteConnection,
    espectra_id: i32,
) -> Result<Option<Espectra>, diesel::result::Error> {
    use crate::schema::espectras::dsl::*;
    espectras.filter(id.eq(espectra_id)).first(conn).optional()
}

pub fn insert_espectra(
    conn: &mut SqliteConnection,
    new_espectra: NewEspectra,
) -> Result<Espectra, diesel::result::Error> {
    use crate::schema::espectras::dsl::*;
    diesel::insert_into(espectras).values(&new_espectra).execute(conn)?;
    espectras.order(id.desc()).first(conn)
}

pub fn update_espectra(
    conn: &mut SqliteConnection,
    espectra_id: i32,
    new_identifier: Option<String>,
    new_value: Option<f64>,
) -> Result<Espectra, diesel::result::Error> {
    use crate::schema::espectras::dsl::*;

    let current: Espectra = espectras.filter(id.eq(espectra_id)).first(conn)?;
    diesel::update(espectras.filter(id.eq(espectra_id)))
        .set((
            identifier.eq(new_identifier.unwrap_or(current.identifier)),
            value.eq(new_value.unwrap_or(current.value)),
        ))
        .execute(conn)?;
    espectras.filter(id.eq(espectra_id)).first(conn)
}

pub fn delete_espectra(
    conn: &mut SqliteConnection,
    espectra_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::espectras::dsl::*;
    diesel::delete(espectras.filter(id.eq(espectra_id))).execute(conn)
}

/// The company reachable from this spectrum's point chain.
pub fn company_of_espectra(
    conn: &mut SqliteConnection,
    espectra_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    use crate::schema::{espectras, machines, measurements, points};
    espectras::table
        .inner_join(points::table.inner_join(measurements::table.inner_join(machines::table)))
        .filter(espectras::id.eq(espectra_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn identifier_filter_intersects_with_scope() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let filter = EspectraFilter {
            identifier: Some(a.espectra.identifier.clone()),
            ..Default::default()
        };
        let rows = list_espectras(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert_eq!(rows.iter().map(|e| e.id).collect::<Vec<_>>(), vec![a.espectra.id]);

        let filter = EspectraFilter {
            identifier: Some(b.espectra.identifier.clone()),
            ..Default::default()
        };
        let rows = list_espectras(&mut conn, TenantScope::Company(a.company.id), &filter).unwrap();
        assert!(rows.is_empty());
    }
}
