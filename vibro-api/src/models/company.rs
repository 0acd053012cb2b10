use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::companies)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub nit: String,
    pub address: String,
    pub rut_address: String,
    pub pbx: String,
    pub city_id: i32,
    pub rut_city_id: i32,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany {
    pub name: String,
    pub nit: String,
    pub address: String,
    pub rut_address: String,
    pub pbx: String,
    pub city_id: i32,
    pub rut_city_id: i32,
}

/// For API inputs where only a subset of fields may be supplied.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub nit: Option<String>,
    pub address: Option<String>,
    pub rut_address: Option<String>,
    pub pbx: Option<String>,
    pub city_id: Option<i32>,
    pub rut_city_id: Option<i32>,
}
