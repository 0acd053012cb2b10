use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::points)]
pub struct Point {
    pub id: i32,
    pub measurement_id: i32,
    pub number: i32,
    pub position: String,
    pub point_type: String,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::points)]
pub struct NewPoint {
    pub measurement_id: i32,
    pub number: i32,
    pub position: String,
    pub point_type: String,
}
