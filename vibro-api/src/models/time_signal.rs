use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::time_signals)]
pub struct TimeSignal {
    pub id: i32,
    pub point_id: i32,
    pub identifier: String,
    pub value: f64,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::time_signals)]
pub struct NewTimeSignal {
    pub point_id: i32,
    pub identifier: String,
    pub value: f64,
}
