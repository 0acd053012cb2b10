//! Tenant scoping for resource queries.
//!
//! Every entity hangs off exactly one company through its parent chain
//! (company → machine → measurement → point → tendency/espectra/time
//! signal). A `TenantScope` is derived once from the authenticated user
//! and passed explicitly into every query function, so ownership
//! filtering is visible at each call site instead of being implied by
//! the dispatch layer.

use diesel::prelude::*;

use crate::models::User;
use crate::schema::{machines, measurements, points};

/// What slice of the data a caller is allowed to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Staff and superusers see every company's records.
    All,
    /// Everyone else sees only their own company's chain.
    Company(i32),
}

impl TenantScope {
    pub fn for_user(user: &User) -> Self {
        if user.is_staff || user.is_superuser {
            TenantScope::All
        } else {
            TenantScope::Company(user.company_id)
        }
    }

    pub fn company(self) -> Option<i32> {
        match self {
            TenantScope::All => None,
            TenantScope::Company(c) => Some(c),
        }
    }
}

/// Ids of all machines belonging to a company.
pub fn company_machine_ids(
    conn: &mut SqliteConnection,
    company: i32,
) -> Result<Vec<i32>, diesel::result::Error> {
    machines::table
        .filter(machines::company_id.eq(company))
        .select(machines::id)
        .load(conn)
}

/// Ids of all measurements reachable from a company via its machines.
pub fn company_measurement_ids(
    conn: &mut SqliteConnection,
    company: i32,
) -> Result<Vec<i32>, diesel::result::Error> {
    let machine_ids = company_machine_ids(conn, company)?;
    measurements::table
        .filter(measurements::machine_id.eq_any(machine_ids))
        .select(measurements::id)
        .load(conn)
}

/// Ids of all points reachable from a company via its measurements.
pub fn company_point_ids(
    conn: &mut SqliteConnection,
    company: i32,
) -> Result<Vec<i32>, diesel::result::Error> {
    let measurement_ids = company_measurement_ids(conn, company)?;
    points::table
        .filter(points::measurement_id.eq_any(measurement_ids))
        .select(points::id)
        .load(conn)
}

/// The company a machine belongs to, if the machine exists.
pub fn company_of_machine(
    conn: &mut SqliteConnection,
    machine_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    machines::table
        .filter(machines::id.eq(machine_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

/// The company a measurement's machine belongs to.
pub fn company_of_measurement(
    conn: &mut SqliteConnection,
    measurement_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    measurements::table
        .inner_join(machines::table)
        .filter(measurements::id.eq(measurement_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

/// The company a point's measurement chain reaches.
pub fn company_of_point(
    conn: &mut SqliteConnection,
    point_id: i32,
) -> Result<Option<i32>, diesel::result::Error> {
    points::table
        .inner_join(measurements::table.inner_join(machines::table))
        .filter(points::id.eq(point_id))
        .select(machines::company_id)
        .first(conn)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::orm::testing::{seed_chain, setup_test_db};

    fn user(company_id: i32, is_staff: bool, is_superuser: bool) -> User {
        User {
            id: 1,
            email: "u@example.com".into(),
            password_hash: "x".into(),
            company_id,
            is_staff,
            is_superuser,
        }
    }

    #[test]
    fn staff_and_superuser_get_full_scope() {
        assert_eq!(TenantScope::for_user(&user(3, true, false)), TenantScope::All);
        assert_eq!(TenantScope::for_user(&user(3, false, true)), TenantScope::All);
        assert_eq!(
            TenantScope::for_user(&user(3, false, false)),
            TenantScope::Company(3)
        );
    }

    #[test]
    fn chain_walks_only_reach_own_company() {
        let mut conn = setup_test_db();
        let a = seed_chain(&mut conn, "Alpha");
        let b = seed_chain(&mut conn, "Beta");

        let machine_ids = company_machine_ids(&mut conn, a.company.id).unwrap();
        assert_eq!(machine_ids, vec![a.machine.id]);

        let point_ids = company_point_ids(&mut conn, b.company.id).unwrap();
        assert_eq!(point_ids, vec![b.point.id]);

        assert_eq!(
            company_of_point(&mut conn, a.point.id).unwrap(),
            Some(a.company.id)
        );
        assert_eq!(company_of_machine(&mut conn, 9999).unwrap(), None);
    }
}
