use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::cities)]
pub struct City {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::cities)]
pub struct NewCity {
    pub name: String,
}
