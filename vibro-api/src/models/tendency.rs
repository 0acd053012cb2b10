use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::tendencies)]
pub struct Tendency {
    pub id: i32,
    pub point_id: i32,
    pub name: String,
    pub date: String, // "YYYYMMDD" as recorded by the collector
    pub value: f64,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::tendencies)]
pub struct NewTendency {
    pub point_id: i32,
    pub name: String,
    pub date: String,
    pub value: f64,
}
