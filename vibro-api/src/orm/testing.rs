//! Test support: in-memory databases, a fully wired test Rocket, and
//! seed data builders used across unit and integration tests.

use std::cell::RefCell;

use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::fairing::AdHoc;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket};
use rocket_sync_db_pools::diesel;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::models::{
    City, Company, Espectra, Image, Machine, Measurement, NewCity, NewCompany, NewEspectra,
    NewImage, NewMachine, NewMeasurement, NewPoint, NewProfile, NewTendency, NewTermoImage,
    NewTimeSignal, NewUser, Point, Profile, Tendency, TermoImage, TimeSignal, User,
};
use crate::orm::login::hash_password;

/// Configures SQLite with fast-but-volatile settings suitable only for
/// tests.
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket).await.expect("database connection for migration");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// Creates a Rocket instance for testing against a uniquely named
/// in-memory SQLite database (shared cache, so the whole pool sees the
/// same data). Migrations run and API routes and catchers are mounted.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .register("/", crate::api_catchers());
    crate::mount_api_routes(rocket)
}

/// A fresh, migrated, independent in-memory database connection for
/// synchronous unit tests.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// Wraps an owned SQLite connection behind the async `.run()` interface
/// of Rocket's pooled connections, so `DbRunner` code can be unit
/// tested without a Rocket instance.
pub struct FakeDbConn(RefCell<SqliteConnection>);

impl FakeDbConn {
    pub fn new(conn: SqliteConnection) -> Self {
        FakeDbConn(RefCell::new(conn))
    }

    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        f(&mut self.0.borrow_mut())
    }
}

/// Seeds a staff user attached to an existing company. Returns the
/// user and the plain-text password.
pub fn seed_staff(conn: &mut SqliteConnection, prefix: &str, company_id: i32) -> (User, String) {
    use crate::orm::user::insert_user;

    let password = format!("{prefix}-staff-password");
    let user = insert_user(
        conn,
        NewUser {
            email: format!("{}-staff@example.com", prefix.to_lowercase()),
            password_hash: hash_password(&password),
            company_id,
            is_staff: true,
            is_superuser: false,
        },
    )
    .expect("seed staff user");
    (user, password)
}

/// One fully linked ownership chain: company (with its two cities),
/// user with profile, machine with image, measurement with thermo
/// image, point, and one record of each leaf type.
pub struct SeededChain {
    pub company: Company,
    pub user: User,
    pub password: String,
    pub profile: Profile,
    pub machine: Machine,
    pub image: Image,
    pub measurement: Measurement,
    pub termo_image: TermoImage,
    pub point: Point,
    pub tendency: Tendency,
    pub espectra: Espectra,
    pub time_signal: TimeSignal,
}

/// Seeds a complete chain for one tenant. `prefix` keeps values unique
/// when seeding several tenants into the same database.
pub fn seed_chain(conn: &mut SqliteConnection, prefix: &str) -> SeededChain {
    use crate::orm::{
        city::insert_city, company::insert_company, espectra::insert_espectra,
        image::insert_image, machine::insert_machine, measurement::insert_measurement,
        point::insert_point, profile::insert_profile, tendency::insert_tendency,
        termo_image::insert_termo_image, time_signal::insert_time_signal, user::insert_user,
    };

    let city: City = insert_city(conn, NewCity { name: format!("{prefix} City") })
        .expect("seed city");
    let rut_city: City = insert_city(conn, NewCity { name: format!("{prefix} RUT City") })
        .expect("seed rut city");

    let company = insert_company(
        conn,
        NewCompany {
            name: format!("{prefix} S.A."),
            nit: format!("NIT-{prefix}"),
            address: format!("Calle 1 # {prefix}"),
            rut_address: format!("Carrera 2 # {prefix}"),
            pbx: "601 555 0100".into(),
            city_id: city.id,
            rut_city_id: rut_city.id,
        },
    )
    .expect("seed company");

    let password = format!("{prefix}-password");
    let user = insert_user(
        conn,
        NewUser {
            email: format!("{}@example.com", prefix.to_lowercase()),
            password_hash: hash_password(&password),
            company_id: company.id,
            is_staff: false,
            is_superuser: false,
        },
    )
    .expect("seed user");

    let profile = insert_profile(
        conn,
        NewProfile {
            user_id: user.id,
            name: format!("{prefix} Engineer"),
            phone: "300 555 0101".into(),
        },
    )
    .expect("seed profile");

    let machine = insert_machine(
        conn,
        NewMachine {
            company_id: company.id,
            identifier: format!("M-{prefix}"),
            name: format!("{prefix} Pump"),
            machine_type: "Bomba centrifuga".into(),
        },
    )
    .expect("seed machine");

    let image = insert_image(
        conn,
        NewImage {
            machine_id: machine.id,
            title: "Diagrama esquematico".into(),
            file_path: format!("assets/{prefix}-diagram.png"),
        },
    )
    .expect("seed image");

    let measurement = insert_measurement(
        conn,
        NewMeasurement {
            machine_id: machine.id,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date"),
            severity: format!("Alerta {prefix}"),
            analysis: "Vibracion dentro de norma.".into(),
            recommendation: "Continuar monitoreo.".into(),
            revised: false,
            resolved: false,
            measurement_type: "Espectral".into(),
            engineer_one_id: Some(user.id),
            engineer_two_id: None,
        },
    )
    .expect("seed measurement");

    let termo_image = insert_termo_image(
        conn,
        NewTermoImage {
            measurement_id: measurement.id,
            image_type: "Termografia".into(),
            file_path: format!("assets/{prefix}-termo.png"),
        },
    )
    .expect("seed termo image");

    let point = insert_point(
        conn,
        NewPoint {
            measurement_id: measurement.id,
            number: 1,
            position: "Horizontal".into(),
            point_type: "Rodamiento".into(),
        },
    )
    .expect("seed point");

    let tendency = insert_tendency(
        conn,
        NewTendency {
            point_id: point.id,
            name: "1VEL".into(),
            date: "20260310".into(),
            value: 2.5,
        },
    )
    .expect("seed tendency");

    let espectra = insert_espectra(
        conn,
        NewEspectra {
            point_id: point.id,
            identifier: format!("ESP-{prefix}"),
            value: 0.8,
        },
    )
    .expect("seed espectra");

    let time_signal = insert_time_signal(
        conn,
        NewTimeSignal {
            point_id: point.id,
            identifier: format!("TS-{prefix}"),
            value: 0.4,
        },
    )
    .expect("seed time signal");

    SeededChain {
        company,
        user,
        password,
        profile,
        machine,
        image,
        measurement,
        termo_image,
        point,
        tendency,
        espectra,
        time_signal,
    }
}
