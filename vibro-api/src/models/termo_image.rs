use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::termo_images)]
pub struct TermoImage {
    pub id: i32,
    pub measurement_id: i32,
    pub image_type: String,
    pub file_path: String,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::termo_images)]
pub struct NewTermoImage {
    pub measurement_id: i32,
    pub image_type: String,
    pub file_path: String,
}
