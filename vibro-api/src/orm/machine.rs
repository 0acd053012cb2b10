use diesel::prelude::*;

use crate::models::{Machine, MachineInput, NewMachine};
use crate::orm::scope::TenantScope;

/// Optional exact-match filters for machine list queries. Absent fields
/// are no-ops; present fields combine with logical AND.
#[derive(Debug, Default)]
pub struct MachineFilter {
    pub id: Option<i32>,
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub machine_type: Option<String>,
    pub company: Option<i32>,
}

pub fn list_machines(
    conn: &mut SqliteConnection,
    scope: TenantScope,
    filter: &MachineFilter,
) -> Result<Vec<Machine>, diesel::result::Error> {
    use crate::schema::machines::dsl::*;

    let mut query = machines.into_boxed();
    if let TenantScope::Company(c) = scope {
        query = query.filter(company_id.eq(c));
    }
    if let Some(v) = filter.id {
        query = query.filter(id.eq(v));
    }
    if let Some(v) = &filter.identifier {
        query = query.filter(identifier.eq(v.clone()));
    }
    if let Some(v) = &filter.name {
        query = query.filter(name.eq(v.clone()));
    }
    if let Some(v) = &filter.machine_type {
        query = query.filter(machine_type.eq(v.clone()));
    }
    if let Some(v) = filter.company {
        query = query.filter(company_id.eq(v));
    }
    query.order(id.asc()).load(conn)
}

pub fn get_machine_by_id(
    conn: &mut SqliteConnection,
    machine_id: i32,
) -> Result<Option<Machine>, diesel::result::Error> {
    use crate::schema::machines::dsl::*;
    machines.filter(id.eq(machine_id)).first(conn).optional()
}

pub fn insert_machine(
    conn: &mut SqliteConnection,
    new_machine: NewMachine,
) -> Result<Machine, diesel::result::Error> {
    use crate::schema::machines::dsl::*;
    diesel::insert_into(machines).values(&new_machine).execute(conn)?;
    machines.order(id.desc()).first(conn)
}

/// Updates a machine, preserving any field the input leaves unset.
pub fn update_machine(
    conn: &mut SqliteConnection,
    machine_id: i32,
    input: &MachineInput,
) -> Result<Machine, diesel::result::Error> {
    use crate::schema::machines::dsl::*;

    let current: Machine = machines.filter(id.eq(machine_id)).first(conn)?;
    diesel::update(machines.filter(id.eq(machine_id)))
        .set((
            company_id.eq(input.company_id.unwrap_or(current.company_id)),
            identifier.eq(input.identifier.clone().unwrap_or(current.identifier)),
            name.eq(input.name.clone().unwrap_or(current.name)),
            machine_type.eq(input.machine_type.clone().unwrap_or(current.machine_type)),
        ))
        .execute(conn)?;
    machines.filter(id.eq(machine_id)).first(conn)
}

pub fn delete_machine(
    conn: &mut SqliteConnection,
    machine_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::machines::dsl::*;
    diesel::delete(machines.filter(id.eq(machine_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::{seed_chain, setup_test_db};

    #[test]
    fn list_combines_filters_conjunctively() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let _b = seed_chain(&mut conn, "Beta");

        let filter = MachineFilter {
            identifier: Some(a.machine.identifier.clone()),
            company: Some(a.company.id),
            ..Default::default()
        };
        let rows = list_machines(&mut conn, TenantScope::All, &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, a.machine.id);

        // Same identifier, wrong company: the AND of both filters is empty.
        let filter = MachineFilter {
            identifier: Some(a.machine.identifier.clone()),
            company: Some(a.company.id + 999),
            ..Default::default()
        };
        let rows = list_machines(&mut conn, TenantScope::All, &filter).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn company_scope_hides_other_tenants() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let rows = list_machines(
            &mut conn,
            TenantScope::Company(a.company.id),
            &MachineFilter::default(),
        )
        .unwrap();
        assert_eq!(rows.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.machine.id]);

        let rows = list_machines(&mut conn, TenantScope::All, &MachineFilter::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|m| m.id == b.machine.id));
    }

    #[test]
    fn update_preserves_unset_fields() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");

        let input = MachineInput {
            company_id: None,
            identifier: None,
            name: Some("Renamed".into()),
            machine_type: None,
        };
        let updated = update_machine(&mut conn, a.machine.id, &input).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.identifier, a.machine.identifier);
        assert_eq!(updated.company_id, a.company.id);
    }
}
