use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::images)]
pub struct Image {
    pub id: i32,
    pub machine_id: i32,
    pub title: String,
    pub file_path: String,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::images)]
pub struct NewImage {
    pub machine_id: i32,
    pub title: String,
    pub file_path: String,
}
