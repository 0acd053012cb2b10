use diesel::{AsChangeset, Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::machines)]
pub struct Machine {
    pub id: i32,
    pub company_id: i32,
    pub identifier: String,
    pub name: String,
    pub machine_type: String,
}

#[derive(Insertable, AsChangeset, Debug, Deserialize)]
#[diesel(table_name = crate::schema::machines)]
pub struct NewMachine {
    pub company_id: i32,
    pub identifier: String,
    pub name: String,
    pub machine_type: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MachineInput {
    pub company_id: Option<i32>,
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub machine_type: Option<String>,
}
