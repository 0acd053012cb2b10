use diesel::prelude::*;

use crate::models::{Company, CompanyInput, NewCompany};
use crate::orm::scope::TenantScope;

#[derive(Debug, Default)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub nit: Option<String>,
    pub address: Option<String>,
    pub rut_address: Option<String>,
    pub pbx: Option<String>,
    pub city: Option<i32>,
    pub rut_city: Option<i32>,
}

pub fn list_companies(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &CompanyFilter,
) -> Result<Vec<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let mut query = companies.into_boxed();
    if let TenantScope::Company(c) = scope {
        query = query.filter(id.eq(c));
    }
    if let Some(v) = &filter.name {
        query = query.filter(name.eq(v.clone()));
    }
    if let Some(v) = &filter.nit {
        query = query.filter(nit.eq(v.clone()));
    }
    if let Some(v) = &filter.address {
        query = query.filter(address.eq(v.clone()));
    }
    if let Some(v) = &filter.rut_address {
        query = query.filter(rut_address.eq(v.clone()));
    }
    if let Some(v) = &filter.pbx {
        query = query.filter(pbx.eq(v.clone()));
    }
    if let Some(v) = filter.city {
        query = query.filter(city_id.eq(v));
    }
    if let Some(v) = filter.rut_city {
        query = query.filter(rut_city_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_company_by_id(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<Option<Company>, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    companies.filter(id.eq(company_id)).first(conn).optional()
}

pub fn insert_company(
    conn: &mut SqliteConnection,
    new_company: NewCompany,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    diesel::insert_into(companies).values(&new_company).execute(conn)?;
    companies.order(id.desc()).first(conn)
}

pub fn update_company(
    conn: &mut SqliteConnection,
    company_id: i32,
    input: &CompanyInput,
) -> Result<Company, diesel::result::Error> {
    use crate::schema::companies::dsl::*;

    let current: Company = companies.filter(id.eq(company_id)).first(conn)?;
    diesel::update(companies.filter(id.eq(company_id)))
        .set((
            name.eq(input.name.clone().unwrap_or(current.name)),
            nit.eq(input.nit.clone().unwrap_or(current.nit)),
            address.eq(input.address.clone().unwrap_or(current.address)),
            rut_address.eq(input.rut_address.clone().unwrap_or(current.rut_address)),
            pbx.eq(input.pbx.clone().unwrap_or(current.pbx)),
            city_id.eq(input.city_id.unwrap_or(current.city_id)),
            rut_city_id.eq(input.rut_city_id.unwrap_or(current.rut_city_id)),
        ))
        .execute(conn)?;
    companies.filter(id.eq(company_id)).first(conn)
}

pub fn delete_company(
    conn: &mut SqliteConnection,
    company_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::companies::dsl::*;
    diesel::delete(companies.filter(id.eq(company_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn company_scope_is_own_row_only() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let _b = seed_chain(&mut conn, "Beta");

        let rows = list_companies(
            &mut conn,
            TenantScope::Company(a.company.id),
            &CompanyFilter::default(),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, a.company.id);
    }

    #[test]
    fn nit_filter_narrows_the_staff_view() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let _b = seed_chain(&mut conn, "Beta");

        let filter = CompanyFilter { nit: Some(a.company.nit.clone()), ..Default::default() };
        let rows = list_companies(&mut conn, TenantScope::All, &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, a.company.id);
    }
}
