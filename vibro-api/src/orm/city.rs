use diesel::prelude::*;

use crate::models::{City, NewCity};
use crate::orm::scope::TenantScope;
use crate::schema::companies;

#[derive(Debug, Default)]
pub struct CityFilter {
    pub name: Option<String>,
}

/// Lists cities. Non-privileged callers only see the cities their own
/// company references (billing and RUT city).
pub fn list_cities(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &CityFilter,
) -> Result<Vec<City>, diesel::result::Error> {
    use crate::schema::cities::dsl::*;

    let mut query = cities.into_boxed();
    if let TenantScope::Company(c) = scope {
        let referenced: Vec<(i32, i32)> = companies::table
            .filter(companies::id.eq(c))
            .select((companies::city_id, companies::rut_city_id))
            .load(conn)?;
        let mut ids: Vec<i32> = referenced.into_iter().flat_map(|(a, b)| [a, b]).collect();
        ids.dedup();
        query = query.filter(id.eq_any(ids));
    }
    if let Some(v) = &filter.name {
        query = query.filter(name.eq(v.clone()));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_city_by_id(
    conn: &mut SqliteConnection,
    city_id: i32,
) -> Result<Option<City>, diesel::result::Error> {
    use crate::schema::cities::dsl::*;
    cities.filter(id.eq(city_id)).first(conn).optional()
}

pub fn insert_city(
    conn: &mut SqliteConnection,
    new_city: NewCity,
) -> Result<City, diesel::result::Error> {
    use crate::schema::cities::dsl::*;
    diesel::insert_into(cities).values(&new_city).execute(conn)?;
    cities.order(id.desc()).first(conn)
}

pub fn update_city(
    conn: &mut SqliteConnection,
    city_id: i32,
    new_name: Option<String>,
) -> Result<City, diesel::result::Error> {
    use crate::schema::cities::dsl::*;

    let current: City = cities.filter(id.eq(city_id)).first(conn)?;
    diesel::update(cities.filter(id.eq(city_id)))
        .set(name.eq(new_name.unwrap_or(current.name)))
        .execute(conn)?;
    cities.filter(id.eq(city_id)).first(conn)
}

/// Whether a company references this city as its billing or RUT city.
pub fn city_referenced_by_company(
    conn: &mut SqliteConnection,
    city_id: i32,
    company: i32,
) -> Result<bool, diesel::result::Error> {
    use diesel::dsl::count_star;
    companies::table
        .filter(companies::id.eq(company))
        .filter(companies::city_id.eq(city_id).or(companies::rut_city_id.eq(city_id)))
        .select(count_star())
        .first::<i64>(conn)
        .map(|n| n > 0)
}

pub fn delete_city(
    conn: &mut SqliteConnection,
    city_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::cities::dsl::*;
    diesel::delete(cities.filter(id.eq(city_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn company_scope_sees_only_referenced_cities() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_cities(
            &mut conn,
            TenantScope::Company(a.company.id),
            &CityFilter::default(),
        )
        .unwrap();
        assert!(rows.iter().all(|c| c.id == a.company.city_id || c.id == a.company.rut_city_id));

        let all = list_cities(&mut conn, TenantScope::All, &CityFilter::default()).unwrap();
        assert!(all.iter().any(|c| c.id == b.company.city_id));
    }

    #[test]
    fn name_filter_is_exact() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");

        let city = get_city_by_id(&mut conn, a.company.city_id).unwrap().unwrap();
        let filter = CityFilter { name: Some(city.name.clone()) };
        let rows = list_cities(&mut conn, TenantScope::All, &filter).unwrap();
        assert!(rows.iter().any(|c| c.id == city.id));

        let filter = CityFilter { name: Some("Nowhere".into()) };
        assert!(list_cities(&mut conn, TenantScope::All, &filter).unwrap().is_empty());
    }
}
