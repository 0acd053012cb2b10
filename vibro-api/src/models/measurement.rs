use chrono::NaiveDate;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::measurements)]
pub struct Measurement {
    pub id: i32,
    pub machine_id: i32,
    pub date: NaiveDate,
    pub severity: String,
    pub analysis: String,
    pub recommendation: String,
    pub revised: bool,
    pub resolved: bool,
    pub measurement_type: String,
    pub engineer_one_id: Option<i32>,
    pub engineer_two_id: Option<i32>,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::measurements)]
pub struct NewMeasurement {
    pub machine_id: i32,
    pub date: NaiveDate,
    pub severity: String,
    pub analysis: String,
    pub recommendation: String,
    pub revised: bool,
    pub resolved: bool,
    pub measurement_type: String,
    pub engineer_one_id: Option<i32>,
    pub engineer_two_id: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MeasurementInput {
    pub machine_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub severity: Option<String>,
    pub analysis: Option<String>,
    pub recommendation: Option<String>,
    pub revised: Option<bool>,
    pub resolved: Option<bool>,
    pub measurement_type: Option<String>,
    pub engineer_one_id: Option<i32>,
    pub engineer_two_id: Option<i32>,
}
